use crate::color::{rgb_to_css_string, rgb_to_hex, Rgb};
use serde::{Deserialize, Serialize};

pub const COLOR_NAMES: [&str; 6] = ["Primary", "Secondary", "Accent", "Highlight", "Complement", "Supporting"];

#[derive(PartialEq, Eq, Clone, Debug, Deserialize, Serialize)]
pub struct ColorSwatch {
    pub name: String,
    pub hex: String,
    pub rgb: String,
    pub population: i32,
}

impl ColorSwatch {

    /// Swatch for the color at `index` in dominance order out of `count`.
    pub fn from_rank(color: Rgb, index: usize, count: usize) -> Self {
        let [r, g, b] = color;
        ColorSwatch {
            name: color_name(index),
            hex: rgb_to_hex(r as f64, g as f64, b as f64),
            rgb: rgb_to_css_string(color),
            population: population(index, count),
        }
    }
}

pub fn color_name(index: usize) -> String {
    match COLOR_NAMES.get(index) {
        Some(name) => name.to_string(),
        None => format!("Color {}", index + 1),
    }
}

/// Rank weight: 100, 90, 80... for up to ten colors, a finer step above that
/// so weights stay positive and strictly decreasing.
pub fn population(index: usize, count: usize) -> i32 {
    let step = if count <= 10 { 10 } else { (100 / count).max(1) as i32 };
    100 - step * index as i32
}
