use crate::color::{hex_to_rgb, optimal_text_color, parse_rgb_string, Rgb, TextColor};
use crate::error::{is_known_error, user_message, PaletteError, GENERIC_ERROR_MESSAGE};
use crate::palette::Quantizer;
use crate::palette_state::{PaletteData, PaletteState, PaletteStatus};
use crate::swatch::ColorSwatch;
use crate::upload::UploadState;
use anyhow::Result;
use crossterm::style::{Color, Stylize};
use serde::Serialize;

#[derive(Serialize)]
struct PaletteView<'a> {
    image: String,
    swatches: &'a [ColorSwatch],
}

fn terminal_color(rgb: Rgb) -> Color {
    Color::Rgb { r: rgb[0], g: rgb[1], b: rgb[2] }
}

/// Text color for a swatch; black when its `rgb` string can't be read.
pub fn swatch_text_color(swatch: &ColorSwatch) -> TextColor {
    match parse_rgb_string(&swatch.rgb) {
        Some(rgb) => optimal_text_color(rgb),
        None => TextColor::Black,
    }
}

pub fn swatch_display(swatch: &ColorSwatch, copied: bool, styled: bool) -> String {
    let text_color = swatch_text_color(swatch);
    let label = if copied { String::from("Copied!") } else { swatch.hex.clone() };
    let block = format!(" {:^9} ", label);
    let block = match hex_to_rgb(&swatch.hex) {
        Some(background) if styled => block
            .with(terminal_color(text_color.rgb()))
            .on(terminal_color(background))
            .to_string(),
        _ => format!("[{}]", block.trim_end()),
    };
    format!("{} {:<11} {:<18} {:>3}%  {} text", block, swatch.name, swatch.rgb, swatch.population, text_color)
}

/// One line per swatch, `copied` marks the swatch whose hex was just copied.
pub fn palette_display(palette: &PaletteData, copied: Option<usize>, styled: bool) -> String {
    let mut lines = vec![format!("Palette from {}", palette.image_url)];
    for (index, swatch) in palette.swatches.iter().enumerate() {
        lines.push(format!("{:>2}. {}", index + 1, swatch_display(swatch, copied == Some(index), styled)));
    }
    lines.join("\n")
}

pub fn palette_json(palette: &PaletteData) -> Result<String> {
    let view = PaletteView {
        image: palette.image_url.to_string(),
        swatches: &palette.swatches,
    };
    Ok(serde_json::to_string_pretty(&view)?)
}

pub fn alert_title(err: &anyhow::Error) -> &'static str {
    if is_known_error(err) {
        "Something went wrong"
    } else {
        "Unexpected Error"
    }
}

pub fn alert_display(err: &anyhow::Error) -> String {
    format!("{}: {}", alert_title(err), user_message(err))
}

pub fn palette_error_display(err: &PaletteError) -> String {
    if err.message().is_empty() {
        format!("Something went wrong: {}", GENERIC_ERROR_MESSAGE)
    } else {
        format!("Something went wrong: {}", err.message())
    }
}

pub fn upload_display(upload: &UploadState, error: Option<&PaletteError>, processing: bool) -> String {
    let mut lines = vec![String::from(if processing {
        "Extracting colors..."
    } else if upload.is_dragging() {
        "Drop your image here"
    } else {
        "Drop an image or click to browse (JPEG, PNG, WebP, GIF up to 10MB)"
    })];
    if let Some(message) = upload.error() {
        lines.push(message.to_string());
    }
    if let Some(err) = error {
        lines.push(palette_error_display(err));
    }
    lines.join("\n")
}

/// The whole screen: swatches once a palette is ready, the upload surface
/// otherwise.
pub fn view_display<Q: Quantizer>(state: &PaletteState<Q>, upload: &UploadState, copied: Option<usize>, styled: bool) -> String {
    match (state.status(), state.palette()) {
        (PaletteStatus::Ready, Some(palette)) => palette_display(palette, copied, styled),
        _ => upload_display(upload, state.error(), state.is_processing()),
    }
}
