//! Dominant-color palettes from images, with WCAG-aware swatch rendering.

pub mod app;
pub mod args;
pub mod clipboard;
pub mod color;
pub mod display;
pub mod error;
pub mod format;
pub mod object_url;
pub mod palette;
pub mod palette_state;
pub mod path;
pub mod picture_io;
pub mod swatch;
pub mod upload;
pub mod validator;
