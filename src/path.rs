use anyhow::{anyhow, Result};
use std::path::Path;
use walkdir::WalkDir;

static VALID_EXTENSIONS: [(&str, &str); 5] = [
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
    ("gif", "image/gif"),
];

/// Declared type for a file, from its extension alone.
pub fn mime_type_for_path(path: &Path) -> String {
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| extension.to_ascii_lowercase());
    match extension.and_then(|extension| VALID_EXTENSIONS.iter().find(|(valid, _)| *valid == extension)) {
        Some((_, mime_type)) => mime_type.to_string(),
        None => mime::APPLICATION_OCTET_STREAM.to_string(),
    }
}

fn has_valid_extension(path: &Path) -> bool {
    mime_type_for_path(path) != mime::APPLICATION_OCTET_STREAM.essence_str()
}

pub fn check_path(path: &str) -> Result<()> {
    if Path::new(path).exists() {
        Ok(())
    } else {
        Err(anyhow!("{} is not a valid path", path))
    }
}

/// Files given directly are kept whatever their extension, so the validator
/// can reject them; directories contribute only their image files, sorted.
pub fn get_picture_file_paths(paths: &[String]) -> Vec<String> {
    let mut file_paths: Vec<String> = Vec::new();
    for path in paths {
        if Path::new(path).is_dir() {
            let mut found: Vec<String> = WalkDir::new(path)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.into_path())
                .filter(|entry| entry.is_file() && has_valid_extension(entry))
                .map(|entry| entry.display().to_string())
                .collect();
            found.sort();
            file_paths.append(&mut found);
        } else {
            file_paths.push(path.clone())
        }
    }
    file_paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_directory(name: &str) -> std::path::PathBuf {
        let directory = std::env::temp_dir().join(format!("chromatic-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&directory);
        fs::create_dir_all(directory.join("nested")).unwrap();
        directory
    }

    #[test]
    fn mime_type_comes_from_extension() {
        assert_eq!("image/jpeg", mime_type_for_path(Path::new("photos/foo.JPG")));
        assert_eq!("image/webp", mime_type_for_path(Path::new("foo.webp")));
        assert_eq!("application/octet-stream", mime_type_for_path(Path::new("notes.pdf")));
        assert_eq!("application/octet-stream", mime_type_for_path(Path::new("README")));
    }

    #[test]
    fn check_path_rejects_missing_paths() {
        assert_eq!(false, check_path("/foo/bar/qux").is_ok());
    }

    #[test]
    fn directories_are_walked_for_pictures_only() {
        let directory = scratch_directory("walk");
        fs::write(directory.join("b.png"), b"x").unwrap();
        fs::write(directory.join("nested").join("a.gif"), b"x").unwrap();
        fs::write(directory.join("notes.txt"), b"x").unwrap();
        let found = get_picture_file_paths(&[directory.display().to_string()]);
        assert_eq!(2, found.len());
        assert!(found.iter().any(|path| path.ends_with("b.png")));
        assert!(found.iter().any(|path| path.ends_with("a.gif")));
        let _ = fs::remove_dir_all(&directory);
    }

    #[test]
    fn plain_files_are_kept_as_given() {
        let files = vec![String::from("notes.txt"), String::from("photo.png")];
        assert_eq!(files, get_picture_file_paths(&files));
    }
}
