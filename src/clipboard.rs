use crate::error::PaletteError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub const COPY_FEEDBACK_DURATION: Duration = Duration::from_millis(2000);

pub trait ClipboardWriter {
    fn write_text(&mut self, text: &str) -> Result<(), PaletteError>;
}

/// The platform clipboard. A clipboard that could not be opened is kept as
/// `None` and reported on first use.
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        let inner = match arboard::Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(err) => {
                warn!("clipboard unavailable: {}", err);
                None
            },
        };
        SystemClipboard { inner }
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardWriter for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), PaletteError> {
        match self.inner.as_mut() {
            None => Err(PaletteError::clipboard("Clipboard API not available", None)),
            Some(clipboard) => clipboard
                .set_text(text)
                .map_err(|err| PaletteError::clipboard("Failed to copy to clipboard", Some(err.into()))),
        }
    }
}

/// Copies text and keeps a "copied" flag raised for a while afterwards.
///
/// The flag is lowered by a timer task owned here; a new copy or dropping
/// the feedback aborts the pending timer. Copying spawns on the current
/// Tokio runtime.
pub struct CopyFeedback<C> {
    clipboard: C,
    copied: Arc<AtomicBool>,
    timer: Option<JoinHandle<()>>,
    duration: Duration,
}

impl<C: ClipboardWriter> CopyFeedback<C> {

    pub fn new(clipboard: C) -> Self {
        Self::with_duration(clipboard, COPY_FEEDBACK_DURATION)
    }

    pub fn with_duration(clipboard: C, duration: Duration) -> Self {
        CopyFeedback {
            clipboard,
            copied: Arc::new(AtomicBool::new(false)),
            timer: None,
            duration,
        }
    }

    pub fn copied(&self) -> bool {
        self.copied.load(Ordering::SeqCst)
    }

    /// On failure the flag and any running timer are left untouched.
    pub fn copy(&mut self, text: &str) -> Result<(), PaletteError> {
        self.clipboard.write_text(text)?;
        debug!(text, "copied to clipboard");
        self.cancel_timer();
        self.copied.store(true, Ordering::SeqCst);
        let copied = Arc::clone(&self.copied);
        let duration = self.duration;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            copied.store(false, Ordering::SeqCst);
        }));
        Ok(())
    }

    /// Waits for the acknowledgment to expire.
    pub async fn settle(&mut self) {
        if let Some(timer) = self.timer.take() {
            let _ = timer.await;
        }
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl<C> Drop for CopyFeedback<C> {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}
