use crate::error::PaletteError;
use std::sync::Arc;

pub const MAX_SIZE_MB: u64 = 10;
pub const MAX_SIZE_BYTES: u64 = MAX_SIZE_MB * 1024 * 1024;
pub const ACCEPTED_TYPES: [&str; 5] = ["image/jpeg", "image/jpg", "image/png", "image/webp", "image/gif"];

/// Anything that can be checked before upload: a byte size and a declared
/// MIME type. The type is whatever the source claims, nothing is sniffed.
pub trait FileLike {
    fn size(&self) -> u64;
    fn mime_type(&self) -> &str;
}

/// An uploaded image, held in memory.
#[derive(Clone, Debug)]
pub struct UploadFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Arc<[u8]>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        UploadFile {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }
}

impl FileLike for UploadFile {
    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationResult {
    pub success: bool,
    pub error: Option<String>,
}

impl ValidationResult {
    fn ok() -> Self {
        ValidationResult { success: true, error: None }
    }

    fn failed(message: String) -> Self {
        ValidationResult { success: false, error: Some(message) }
    }

    pub fn into_result(self) -> Result<(), PaletteError> {
        if self.success {
            Ok(())
        } else {
            Err(PaletteError::validation(self.error.unwrap_or_else(|| String::from("Invalid file"))))
        }
    }
}

fn accepted_type(mime_type: &str) -> bool {
    ACCEPTED_TYPES.contains(&mime_type)
}

/// Checks size first, then type; only the first failure is reported.
pub fn validate_file<F: FileLike + ?Sized>(file: &F) -> ValidationResult {
    if file.size() > MAX_SIZE_BYTES {
        return ValidationResult::failed(format!("File size must be less than {}MB", MAX_SIZE_MB));
    }
    if !accepted_type(file.mime_type()) {
        return ValidationResult::failed(String::from("File must be an image (JPEG, PNG, WebP, or GIF)"));
    }
    ValidationResult::ok()
}
