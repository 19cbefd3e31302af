use crate::format::Format;
use crate::palette::{PaletteOptions, COLOR_COUNT, QUALITY};
use crate::path::check_path;
use anyhow::{anyhow, Result};
use clap::Parser;
use std::env;
use std::fmt::Display;
use std::ops::RangeInclusive;
use std::str::FromStr;
use tracing::warn;

const COLORS_ENV_VAR: &str = "CHROMATIC_COLORS";
const QUALITY_ENV_VAR: &str = "CHROMATIC_QUALITY";
const NO_COLOR_ENV_VAR: &str = "NO_COLOR";
const COLORS_RANGE: RangeInclusive<usize> = 2..=20;
const QUALITY_RANGE: RangeInclusive<u8> = 1..=10;

#[derive(Parser, Clone, Debug)]
/// Chromatic
#[command(about("extract color palettes from images"), version, infer_long_args = true, help_template("\
{before-help}{name} {version} {about}
{usage-heading} {usage}

{all-args}{after-help}
"))]
pub struct Args {
    /// image files, or directories to search for images
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<String>,

    /// extract N colors (default is set with variable CHROMATIC_COLORS, else 6)
    #[arg(short, long, value_name = "N")]
    pub colors: Option<usize>,

    /// sample every Nth pixel, 1 is slowest and most accurate (default is set with variable CHROMATIC_QUALITY, else 10)
    #[arg(short, long, value_name = "N")]
    pub quality: Option<u8>,

    /// output format
    #[arg(short, long, value_name = "FORMAT", ignore_case(true), default_value_t = Format::Text)]
    pub format: Format,

    /// copy the hex value of swatch N of the last palette to the clipboard
    #[arg(long, value_name = "N")]
    pub copy: Option<usize>,

    /// print swatches without terminal colors (also set by variable NO_COLOR)
    #[arg(long, default_value_t = false)]
    pub no_color: bool,
}

impl Args {

    pub fn checked_args(&self) -> Result<Args> {
        for path in &self.paths {
            check_path(path)?;
        }
        let colors = setting(self.colors, COLORS_ENV_VAR, "colors", COLOR_COUNT, COLORS_RANGE);
        let copy = match self.copy {
            Some(n) if n == 0 || n > colors => return Err(anyhow!("swatch to copy must be between 1 and {}, got {}", colors, n)),
            other => other,
        };
        Ok(Args {
            paths: self.paths.clone(),
            colors: Some(colors),
            quality: Some(setting(self.quality, QUALITY_ENV_VAR, "quality", QUALITY, QUALITY_RANGE)),
            format: self.format,
            copy,
            no_color: self.no_color || env::var_os(NO_COLOR_ENV_VAR).is_some_and(|value| !value.is_empty()),
        })
    }

    pub fn palette_options(&self) -> PaletteOptions {
        PaletteOptions {
            color_count: self.colors.unwrap_or(COLOR_COUNT),
            quality: self.quality.unwrap_or(QUALITY),
        }
    }
}

fn setting<T>(source: Option<T>, var_name: &str, setting_name: &str, default: T, range: RangeInclusive<T>) -> T
where
    T: FromStr + PartialOrd + Copy + Display,
{
    let candidate = match source {
        Some(n) => n,
        None => match env::var(var_name) {
            Ok(s) => match s.parse::<T>() {
                Ok(n) => n,
                Err(_) => {
                    warn!("illegal {} value: {}, setting to default", setting_name, s);
                    default
                },
            },
            Err(_) => default,
        },
    };
    if range.contains(&candidate) {
        candidate
    } else {
        warn!("illegal {} value: {}, setting to default", setting_name, candidate);
        default
    }
}
