use crate::args::Args;
use crate::clipboard::{ClipboardWriter, CopyFeedback, SystemClipboard};
use crate::display::{alert_display, palette_error_display, palette_json, swatch_display, view_display};
use crate::format::Format;
use crate::palette::{ColorThief, PaletteExtractor};
use crate::palette_state::{PaletteData, PaletteState, PaletteStatus};
use crate::path::get_picture_file_paths;
use crate::picture_io::picture_file;
use crate::upload::UploadState;
use anyhow::{anyhow, Result};
use tracing::{error, info};

/// Runs every picture named in `args` through one session, printing each
/// palette as it is ready. Fails only when no palette at all was extracted.
pub async fn run(args: &Args) -> Result<()> {
    run_session(args, SystemClipboard::new).await?;
    Ok(())
}

/// Returns how many palettes were extracted. The clipboard is opened only
/// when a swatch is actually copied.
pub async fn run_session<C, F>(args: &Args, clipboard: F) -> Result<usize>
where
    C: ClipboardWriter,
    F: FnOnce() -> C,
{
    let styled = !args.no_color;
    let mut state = PaletteState::new(PaletteExtractor::new(ColorThief, args.palette_options()));
    let mut upload = UploadState::new();
    let file_paths = get_picture_file_paths(&args.paths);
    info!(files = file_paths.len(), "starting session");
    let mut extracted = 0;
    for file_path in &file_paths {
        let picture = match picture_file(file_path) {
            Ok(picture) => picture,
            Err(err) => {
                error!("{:#}", err);
                eprintln!("{}: {}", file_path, alert_display(&err));
                continue;
            },
        };
        let picture = match upload.file_input(Some(picture)) {
            Some(picture) => picture,
            None => {
                eprintln!("{}: {}", file_path, upload.error().unwrap_or("Invalid file"));
                continue;
            },
        };
        let file = match picture.read() {
            Ok(file) => file,
            Err(err) => {
                error!("{:#}", err);
                eprintln!("{}: {}", file_path, alert_display(&err));
                continue;
            },
        };
        state.extract_from_file(&file).await;
        match (state.status(), state.palette()) {
            (PaletteStatus::Ready, Some(palette)) => {
                extracted += 1;
                match args.format {
                    Format::Text => println!("{}\n{}\n", file_path, view_display(&state, &upload, None, styled)),
                    Format::Json => println!("{}", palette_json(palette)?),
                }
            },
            _ => {
                if let Some(err) = state.error() {
                    eprintln!("{}: {}", file_path, palette_error_display(err));
                }
            },
        }
    }
    if extracted == 0 {
        return Err(anyhow!("no palette could be extracted"));
    }
    if let (Some(n), Some(palette)) = (args.copy, state.palette()) {
        if let Err(err) = copy_swatch(palette, n, clipboard(), styled).await {
            error!("{:#}", err);
            eprintln!("{}", alert_display(&err));
        }
    }
    state.reset();
    Ok(extracted)
}

async fn copy_swatch<C: ClipboardWriter>(palette: &PaletteData, n: usize, clipboard: C, styled: bool) -> Result<()> {
    let swatch = palette
        .swatches
        .get(n.saturating_sub(1))
        .ok_or_else(|| anyhow!("the palette has only {} swatches, can't copy swatch {}", palette.swatches.len(), n))?;
    let mut feedback = CopyFeedback::new(clipboard);
    feedback.copy(&swatch.hex)?;
    eprintln!("{}", swatch_display(swatch, feedback.copied(), styled));
    feedback.settle().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PaletteError;
    use crate::palette::tests::png_bytes;
    use std::cell::RefCell;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct SharedClipboard {
        contents: Rc<RefCell<Vec<String>>>,
        fail: bool,
    }

    impl ClipboardWriter for SharedClipboard {
        fn write_text(&mut self, text: &str) -> Result<(), PaletteError> {
            if self.fail {
                return Err(PaletteError::clipboard("Failed to copy to clipboard", Some(anyhow!("denied"))));
            }
            self.contents.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    fn scratch_directory(name: &str) -> PathBuf {
        let directory = std::env::temp_dir().join(format!("chromatic-app-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&directory);
        fs::create_dir_all(&directory).unwrap();
        directory
    }

    fn session_args(paths: Vec<PathBuf>, copy: Option<usize>) -> Args {
        Args {
            paths: paths.iter().map(|path| path.display().to_string()).collect(),
            colors: Some(6),
            quality: Some(10),
            format: Format::Json,
            copy,
            no_color: true,
        }
    }

    fn write_picture(directory: &Path, name: &str, quadrants: [[u8; 3]; 4]) -> PathBuf {
        let path = directory.join(name);
        fs::write(&path, png_bytes(quadrants)).unwrap();
        path
    }

    const PRIMARIES: [[u8; 3]; 4] = [[200, 30, 30], [30, 200, 30], [30, 30, 200], [20, 20, 20]];
    const AUTUMN: [[u8; 3]; 4] = [[240, 200, 40], [90, 40, 120], [180, 90, 20], [60, 110, 40]];

    #[tokio::test]
    async fn session_moves_past_bad_files() {
        let directory = scratch_directory("mixed");
        let garbage = directory.join("garbage.png");
        fs::write(&garbage, b"not a picture").unwrap();
        let notes = directory.join("notes.pdf");
        fs::write(&notes, b"%PDF").unwrap();
        let good = write_picture(&directory, "good.png", PRIMARIES);
        let missing = directory.join("missing.png");
        let args = session_args(vec![garbage, notes, missing, good], None);
        assert_eq!(1, run_session(&args, SharedClipboard::default).await.unwrap());
        let _ = fs::remove_dir_all(&directory);
    }

    #[tokio::test]
    async fn session_without_any_palette_fails() {
        let directory = scratch_directory("garbage");
        let garbage = directory.join("garbage.png");
        fs::write(&garbage, b"not a picture").unwrap();
        let args = session_args(vec![garbage], None);
        assert!(run_session(&args, SharedClipboard::default).await.is_err());
        assert!(run(&args).await.is_err());
        let _ = fs::remove_dir_all(&directory);
    }

    #[tokio::test]
    async fn later_pictures_replace_earlier_palettes() {
        let directory = scratch_directory("replace");
        write_picture(&directory, "a.png", PRIMARIES);
        write_picture(&directory, "b.png", AUTUMN);
        let args = session_args(vec![directory.clone()], None);
        assert_eq!(2, run_session(&args, SharedClipboard::default).await.unwrap());
        let _ = fs::remove_dir_all(&directory);
    }

    #[tokio::test(start_paused = true)]
    async fn copy_takes_the_swatch_from_the_last_palette() {
        let directory = scratch_directory("copy");
        let picture = write_picture(&directory, "autumn.png", AUTUMN);
        let clipboard = SharedClipboard::default();
        let contents = Rc::clone(&clipboard.contents);
        let args = session_args(vec![picture], Some(1));
        assert_eq!(1, run_session(&args, move || clipboard).await.unwrap());
        let copied = contents.borrow();
        assert_eq!(1, copied.len());
        assert!(copied[0].starts_with('#'));
        let _ = fs::remove_dir_all(&directory);
    }

    #[tokio::test]
    async fn clipboard_failure_does_not_fail_the_session() {
        let directory = scratch_directory("clipboard");
        let picture = write_picture(&directory, "autumn.png", AUTUMN);
        let clipboard = SharedClipboard { fail: true, ..SharedClipboard::default() };
        let args = session_args(vec![picture], Some(1));
        assert_eq!(1, run_session(&args, move || clipboard).await.unwrap());
        let _ = fs::remove_dir_all(&directory);
    }
}
