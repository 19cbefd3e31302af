use crate::path::mime_type_for_path;
use crate::validator::{FileLike, UploadFile};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// A picture on disk, known by its metadata only. It can be validated
/// without touching its contents.
#[derive(Clone, Debug)]
pub struct PictureFile {
    path: PathBuf,
    name: String,
    size: u64,
    mime_type: String,
}

impl PictureFile {
    /// Loads the bytes. Call only once the file has passed validation.
    pub fn read(self) -> Result<UploadFile> {
        let bytes = fs::read(&self.path).with_context(|| format!("can't read picture file {}", self.path.display()))?;
        Ok(UploadFile::new(self.name, self.mime_type, bytes))
    }
}

impl FileLike for PictureFile {
    fn size(&self) -> u64 {
        self.size
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }
}

pub fn picture_file(file_path: &str) -> Result<PictureFile> {
    let path = Path::new(file_path);
    let metadata = fs::metadata(path).with_context(|| format!("can't read picture file {}", file_path))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| file_path.to_string());
    Ok(PictureFile {
        path: path.to_path_buf(),
        name,
        size: metadata.len(),
        mime_type: mime_type_for_path(path),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::UploadState;
    use crate::validator::{validate_file, MAX_SIZE_BYTES};

    fn scratch_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("chromatic-{}-{}", std::process::id(), name))
    }

    #[test]
    fn reads_bytes_name_and_declared_type() {
        let file_path = scratch_file("read.png");
        fs::write(&file_path, [1u8, 2, 3, 4]).unwrap();
        let upload = picture_file(&file_path.display().to_string()).unwrap().read().unwrap();
        assert_eq!(4, upload.size());
        assert_eq!("image/png", upload.mime_type());
        assert!(upload.name.ends_with("read.png"));
        let _ = fs::remove_file(&file_path);
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = picture_file("/foo/missing.png");
        assert_eq!(false, result.is_ok());
        assert!(result.unwrap_err().to_string().contains("/foo/missing.png"));
    }

    #[test]
    fn size_comes_from_metadata() {
        let file_path = scratch_file("meta.gif");
        fs::write(&file_path, vec![0u8; 2048]).unwrap();
        let picture = picture_file(&file_path.display().to_string()).unwrap();
        assert_eq!(2048, picture.size());
        assert_eq!("image/gif", picture.mime_type());
        let _ = fs::remove_file(&file_path);
    }

    #[test]
    fn file_removed_after_validation_fails_to_read() {
        let file_path = scratch_file("gone.png");
        fs::write(&file_path, [1u8]).unwrap();
        let picture = picture_file(&file_path.display().to_string()).unwrap();
        fs::remove_file(&file_path).unwrap();
        assert!(picture.read().unwrap_err().to_string().contains("gone.png"));
    }

    #[test]
    fn oversized_file_is_rejected_before_reading() {
        let file_path = scratch_file("huge.png");
        fs::File::create(&file_path).unwrap().set_len(MAX_SIZE_BYTES + 1).unwrap();
        let picture = picture_file(&file_path.display().to_string()).unwrap();
        assert_eq!(MAX_SIZE_BYTES + 1, picture.size());
        assert_eq!(Some(String::from("File size must be less than 10MB")), validate_file(&picture).error);
        let mut upload = UploadState::new();
        assert!(upload.file_input(Some(picture)).is_none());
        assert_eq!(Some("File size must be less than 10MB"), upload.error());
        let _ = fs::remove_file(&file_path);
    }
}
