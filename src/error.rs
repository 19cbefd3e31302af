use std::fmt;
use thiserror::Error;

pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred while processing the image";

/// What went wrong, so callers can dispatch without downcasting causes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The image bytes could not be decoded.
    ImageLoad,
    /// Decoding worked but the quantizer failed or found nothing.
    Extraction,
    /// The upload was rejected before any decoding.
    Validation,
    /// The clipboard is missing or refused the write.
    Clipboard,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", match self {
            ErrorKind::ImageLoad => "image load failure",
            ErrorKind::Extraction => "palette extraction failure",
            ErrorKind::Validation => "file validation failure",
            ErrorKind::Clipboard => "clipboard failure",
        })
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct PaletteError {
    kind: ErrorKind,
    message: String,
    #[source]
    cause: Option<anyhow::Error>,
}

impl PaletteError {

    pub fn new(kind: ErrorKind, message: impl Into<String>, cause: Option<anyhow::Error>) -> Self {
        PaletteError {
            kind,
            message: message.into(),
            cause,
        }
    }

    pub fn image_load(cause: Option<anyhow::Error>) -> Self {
        Self::new(ErrorKind::ImageLoad, "Failed to load image", cause)
    }

    pub fn extraction(message: impl Into<String>, cause: Option<anyhow::Error>) -> Self {
        Self::new(ErrorKind::Extraction, message, cause)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message, None)
    }

    pub fn clipboard(message: impl Into<String>, cause: Option<anyhow::Error>) -> Self {
        Self::new(ErrorKind::Clipboard, message, cause)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&anyhow::Error> {
        self.cause.as_ref()
    }
}

/// Message to show for any error reaching the top of a session. Errors that
/// are not a `PaletteError`, or carry no message, get the generic text.
pub fn user_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<PaletteError>() {
        Some(palette_error) if !palette_error.message().is_empty() => palette_error.message().to_string(),
        _ => GENERIC_ERROR_MESSAGE.to_string(),
    }
}

pub fn is_known_error(err: &anyhow::Error) -> bool {
    err.downcast_ref::<PaletteError>().is_some()
}
