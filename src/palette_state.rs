use crate::error::PaletteError;
use crate::object_url::{ObjectUrl, ObjectUrlStore};
use crate::palette::{ColorThief, PaletteExtractor, Quantizer};
use crate::swatch::ColorSwatch;
use crate::validator::UploadFile;
use tracing::{debug, info};

/// Swatches plus the image they came from. Dropping it releases the image.
#[derive(Debug)]
pub struct PaletteData {
    pub swatches: Vec<ColorSwatch>,
    pub image_url: ObjectUrl,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaletteStatus {
    Empty,
    Pending,
    Ready,
    Failed,
}

/// Extraction lifecycle for one session. Holds at most one palette.
#[derive(Debug)]
pub struct PaletteState<Q = ColorThief> {
    extractor: PaletteExtractor<Q>,
    store: ObjectUrlStore,
    palette: Option<PaletteData>,
    error: Option<PaletteError>,
    processing: bool,
}

impl Default for PaletteState<ColorThief> {
    fn default() -> Self {
        PaletteState::new(PaletteExtractor::default())
    }
}

impl<Q: Quantizer> PaletteState<Q> {

    pub fn new(extractor: PaletteExtractor<Q>) -> Self {
        PaletteState {
            extractor,
            store: ObjectUrlStore::new(),
            palette: None,
            error: None,
            processing: false,
        }
    }

    pub fn status(&self) -> PaletteStatus {
        if self.processing {
            PaletteStatus::Pending
        } else if self.palette.is_some() {
            PaletteStatus::Ready
        } else if self.error.is_some() {
            PaletteStatus::Failed
        } else {
            PaletteStatus::Empty
        }
    }

    pub fn palette(&self) -> Option<&PaletteData> {
        self.palette.as_ref()
    }

    pub fn error(&self) -> Option<&PaletteError> {
        self.error.as_ref()
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn store(&self) -> &ObjectUrlStore {
        &self.store
    }

    fn release_image(&mut self) {
        if let Some(palette) = self.palette.take() {
            debug!(url = %palette.image_url, "discarding palette");
            palette.image_url.release();
        }
    }

    /// Drops the current palette and enters `Pending`.
    pub fn begin_extraction(&mut self) {
        self.release_image();
        self.error = None;
        self.processing = true;
    }

    pub fn finish_extraction(&mut self, file: &UploadFile, result: Result<Vec<ColorSwatch>, PaletteError>) {
        match result {
            Ok(swatches) => {
                let image_url = self.store.create(file.bytes.clone());
                info!(file = %file.name, colors = swatches.len(), "palette ready");
                self.palette = Some(PaletteData { swatches, image_url });
            },
            Err(err) => {
                info!(file = %file.name, kind = %err.kind(), "palette extraction failed: {}", err);
                self.error = Some(err);
            },
        }
        self.processing = false;
    }

    pub async fn extract_from_file(&mut self, file: &UploadFile) {
        self.begin_extraction();
        let result = self.extractor.extract(&self.store, file).await;
        self.finish_extraction(file, result);
    }

    pub fn reset(&mut self) {
        self.release_image();
        self.error = None;
    }
}
