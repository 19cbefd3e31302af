use crate::color::Rgb;
use crate::error::PaletteError;
use crate::object_url::{ObjectUrl, ObjectUrlStore};
use crate::swatch::ColorSwatch;
use crate::validator::UploadFile;
use anyhow::anyhow;
use image::DynamicImage;
use palette_extract::{get_palette_with_options, MaxColors, PixelEncoding, PixelFilter, Quality};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

pub const COLOR_COUNT: usize = 6;
pub const QUALITY: u8 = 10;

/// Reduces an image to its dominant colors, most dominant first.
pub trait Quantizer {
    fn quantize(&self, image: &DynamicImage, color_count: usize, quality: u8) -> anyhow::Result<Vec<Rgb>>;
}

/// Median-cut quantizer from `palette_extract`. Near-white and transparent
/// pixels are skipped, `quality` is the pixel sampling step.
#[derive(Clone, Copy, Debug, Default)]
pub struct ColorThief;

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::from("unknown panic")
    }
}

const MIN_ALPHA: u8 = 125;
const WHITE_LEVEL: u8 = 250;

/// True if any pixel the quantizer would sample survives its filters.
/// `palette_extract` misbehaves when every sampled pixel is dropped.
fn has_usable_pixels(pixels: &[u8], quality: u8) -> bool {
    pixels
        .chunks_exact(4)
        .step_by(quality.max(1) as usize)
        .any(|p| p[3] >= MIN_ALPHA && !(p[0] > WHITE_LEVEL && p[1] > WHITE_LEVEL && p[2] > WHITE_LEVEL))
}

impl Quantizer for ColorThief {
    fn quantize(&self, image: &DynamicImage, color_count: usize, quality: u8) -> anyhow::Result<Vec<Rgb>> {
        let pixels = image.to_rgba8().into_raw();
        if !has_usable_pixels(&pixels, quality) {
            debug!("no opaque non-white pixels to quantize");
            return Ok(vec![]);
        }
        let max_colors = u8::try_from(color_count).unwrap_or(u8::MAX);
        let colors = panic::catch_unwind(AssertUnwindSafe(|| {
            get_palette_with_options(
                &pixels,
                PixelEncoding::Rgba,
                Quality::new(quality),
                MaxColors::new(max_colors),
                PixelFilter::White,
            )
        }))
        .map_err(|payload| anyhow!("quantizer panicked: {}", panic_message(&*payload)))?;
        Ok(colors.iter().map(|c| [c.r, c.g, c.b]).collect())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaletteOptions {
    pub color_count: usize,
    pub quality: u8,
}

impl Default for PaletteOptions {
    fn default() -> Self {
        PaletteOptions {
            color_count: COLOR_COUNT,
            quality: QUALITY,
        }
    }
}

#[derive(Debug)]
pub struct PaletteExtractor<Q = ColorThief> {
    quantizer: Q,
    options: PaletteOptions,
}

impl Default for PaletteExtractor<ColorThief> {
    fn default() -> Self {
        PaletteExtractor::new(ColorThief, PaletteOptions::default())
    }
}

impl<Q: Quantizer> PaletteExtractor<Q> {

    pub fn new(quantizer: Q, options: PaletteOptions) -> Self {
        PaletteExtractor { quantizer, options }
    }

    pub fn options(&self) -> PaletteOptions {
        self.options
    }

    /// Decodes `file` and maps its dominant colors to named swatches.
    ///
    /// The file bytes are held behind a transient reference in `store` while
    /// decoding; it is released whichever way this returns.
    pub async fn extract(&self, store: &ObjectUrlStore, file: &UploadFile) -> Result<Vec<ColorSwatch>, PaletteError> {
        let url = store.create(file.bytes.clone());
        debug!(file = %file.name, %url, "extracting palette");
        let image = decode(store, &url).await?;
        let colors = self.quantizer
            .quantize(&image, self.options.color_count, self.options.quality)
            .map_err(|err| {
                warn!(file = %file.name, "quantizer failed: {:#}", err);
                PaletteError::extraction("Failed to extract palette from image", Some(err))
            })?;
        if colors.is_empty() {
            return Err(PaletteError::extraction("No colors could be extracted from the image", None));
        }
        let count = self.options.color_count;
        Ok(colors
            .into_iter()
            .take(count)
            .enumerate()
            .map(|(index, color)| ColorSwatch::from_rank(color, index, count))
            .collect())
    }
}

async fn decode(store: &ObjectUrlStore, url: &ObjectUrl) -> Result<DynamicImage, PaletteError> {
    let bytes = store
        .resolve(url)
        .ok_or_else(|| PaletteError::image_load(Some(anyhow!("{} was released before decoding", url))))?;
    match tokio::task::spawn_blocking(move || image::load_from_memory(&bytes)).await {
        Ok(Ok(image)) => Ok(image),
        Ok(Err(err)) => Err(PaletteError::image_load(Some(err.into()))),
        Err(err) => Err(PaletteError::image_load(Some(err.into()))),
    }
}
