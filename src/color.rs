//! Color conversions and WCAG 2.1 contrast helpers.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

pub type Rgb = [u8; 3];

pub const WHITE: Rgb = [255, 255, 255];
pub const BLACK: Rgb = [0, 0, 0];

const LINEAR_THRESHOLD: f64 = 0.03928;

/// Readable text color to put on top of a background.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextColor {
    White,
    Black,
}

impl TextColor {
    pub fn rgb(&self) -> Rgb {
        match self {
            TextColor::White => WHITE,
            TextColor::Black => BLACK,
        }
    }
}

impl fmt::Display for TextColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", match self {
            TextColor::White => "white",
            TextColor::Black => "black",
        })
    }
}

/// Formats a color as `#rrggbb`. Channels outside [0,255] are clamped and
/// fractional values rounded.
pub fn rgb_to_hex(r: f64, g: f64, b: f64) -> String {
    let clamp = |value: f64| value.round().clamp(0.0, 255.0) as u8;
    format!("#{:02x}{:02x}{:02x}", clamp(r), clamp(g), clamp(b))
}

pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// `rgb(r, g, b)`, the exact form `parse_rgb_string` reads back.
pub fn rgb_to_css_string(rgb: Rgb) -> String {
    format!("rgb({}, {}, {})", rgb[0], rgb[1], rgb[2])
}

fn rgb_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"rgb\(\s*(-?\d+)\s*,\s*(-?\d+)\s*,\s*(-?\d+)\s*\)").expect("rgb pattern is valid")
    })
}

/// Best-effort inverse of `rgb_to_css_string`. Returns `None` when the text
/// has no `rgb(..)` triple or a channel is out of range.
pub fn parse_rgb_string(text: &str) -> Option<Rgb> {
    let captures = rgb_pattern().captures(text)?;
    let channel = |i: usize| -> Option<u8> {
        let value: i64 = captures.get(i)?.as_str().parse().ok()?;
        u8::try_from(value).ok()
    };
    Some([channel(1)?, channel(2)?, channel(3)?])
}

fn linear_channel(value: u8) -> f64 {
    let normalized = value as f64 / 255.0;
    if normalized <= LINEAR_THRESHOLD {
        normalized / 12.92
    } else {
        ((normalized + 0.055) / 1.055).powf(2.4)
    }
}

pub fn relative_luminance(rgb: Rgb) -> f64 {
    0.2126 * linear_channel(rgb[0]) + 0.7152 * linear_channel(rgb[1]) + 0.0722 * linear_channel(rgb[2])
}

/// Ranges over [1, 21] and does not depend on argument order.
pub fn contrast_ratio(first: Rgb, second: Rgb) -> f64 {
    let l1 = relative_luminance(first);
    let l2 = relative_luminance(second);
    let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
    (lighter + 0.05) / (darker + 0.05)
}

/// White only when it beats black strictly; ties go to black.
pub fn optimal_text_color(background: Rgb) -> TextColor {
    let with_white = contrast_ratio(background, WHITE);
    let with_black = contrast_ratio(background, BLACK);
    if with_white > with_black {
        TextColor::White
    } else {
        TextColor::Black
    }
}
