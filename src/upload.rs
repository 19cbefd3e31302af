use crate::validator::{validate_file, FileLike};
use tracing::debug;

const ACTIVATION_KEYS: [&str; 4] = ["Enter", "Return", " ", "Space"];

/// Drag and drop / browse state of the upload surface.
///
/// Every trigger takes the caller's `processing` flag; while it is set,
/// drags, drops, clicks and keys do nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadState {
    dragging: bool,
    error: Option<String>,
}

impl UploadState {

    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None
    }

    pub fn drag_over(&mut self, processing: bool) {
        if !processing {
            self.dragging = true
        }
    }

    pub fn drag_leave(&mut self) {
        self.dragging = false
    }

    /// Returns the dropped file if it should be extracted.
    pub fn drop_file<F: FileLike>(&mut self, file: Option<F>, processing: bool) -> Option<F> {
        self.dragging = false;
        if processing {
            return None;
        }
        self.process(file?)
    }

    /// Returns the picked file if it should be extracted.
    pub fn file_input<F: FileLike>(&mut self, file: Option<F>) -> Option<F> {
        self.process(file?)
    }

    /// True when the file picker should open.
    pub fn click(&self, processing: bool) -> bool {
        !processing
    }

    pub fn key_down(&self, key: &str, processing: bool) -> bool {
        if processing {
            return false;
        }
        ACTIVATION_KEYS.contains(&key) && self.click(processing)
    }

    fn process<F: FileLike>(&mut self, file: F) -> Option<F> {
        self.error = None;
        let validation = validate_file(&file);
        if validation.success {
            Some(file)
        } else {
            let message = validation.error.unwrap_or_else(|| String::from("Invalid file"));
            debug!(mime_type = file.mime_type(), size = file.size(), "upload rejected: {}", message);
            self.error = Some(message);
            None
        }
    }
}
