//! Writing extracted files to the output folder.
//!
//! Files land under `<output_root>/<folder_name>/<relative path>`,
//! creating subdirectories as needed. Duplicate paths within one
//! extraction are written in order, so the last occurrence wins.

use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::contexts::ExtractedFile;

/// Saves an extraction result and returns the representative path shown to
/// the user: the first extracted file, or the single default file when the
/// extraction was empty.
///
/// When `files` is empty the full raw response is saved under
/// `default_file_name` instead, so the user never loses the model's output.
pub fn save_files(
    output_root: &Path,
    folder_name: &str,
    default_file_name: &str,
    raw_text: &str,
    files: &[ExtractedFile],
) -> Result<PathBuf> {
    let folder_path = output_root.join(folder_name);
    fs::create_dir_all(&folder_path)
        .with_context(|| format!("Failed to create output folder {}", folder_path.display()))?;

    if files.is_empty() {
        info!("No structured files found, saving as a single file");
        let file_path = folder_path.join(default_file_name);
        fs::write(&file_path, raw_text)
            .with_context(|| format!("Failed to write {}", file_path.display()))?;
        return Ok(file_path);
    }

    info!("Found {} structured file(s) to create", files.len());

    for file in files {
        let file_path = folder_path.join(&file.path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create subdirectory {}", parent.display())
            })?;
        }

        fs::write(&file_path, &file.content)
            .with_context(|| format!("Failed to write {}", file_path.display()))?;

        info!("Created file: {}", file_path.display());
    }

    // The first file is the representative one for display purposes.
    Ok(folder_path.join(&files[0].path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root(tag: &str) -> PathBuf {
        PathBuf::from(format!("/tmp/codesmith_{}_{}", tag, std::process::id()))
    }

    #[test]
    fn test_writes_files_with_subdirectories() {
        let root = temp_root("ws_subdirs");
        let files = vec![
            ExtractedFile {
                path: "src/app.js".to_string(),
                content: "const app = 1;".to_string(),
            },
            ExtractedFile {
                path: "src/models/user.js".to_string(),
                content: "class User {}".to_string(),
            },
        ];

        let representative =
            save_files(&root, "proj", "index.js", "raw", &files).unwrap();

        assert_eq!(representative, root.join("proj/src/app.js"));
        assert_eq!(
            fs::read_to_string(root.join("proj/src/models/user.js")).unwrap(),
            "class User {}"
        );

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_empty_extraction_saves_raw_text() {
        let root = temp_root("ws_raw");

        let representative =
            save_files(&root, "proj", "index.js", "the raw response", &[]).unwrap();

        assert_eq!(representative, root.join("proj/index.js"));
        assert_eq!(
            fs::read_to_string(&representative).unwrap(),
            "the raw response"
        );

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_duplicate_paths_last_write_wins() {
        let root = temp_root("ws_dupes");
        let files = vec![
            ExtractedFile {
                path: "app.js".to_string(),
                content: "v1".to_string(),
            },
            ExtractedFile {
                path: "app.js".to_string(),
                content: "v2".to_string(),
            },
        ];

        save_files(&root, "proj", "index.js", "raw", &files).unwrap();

        assert_eq!(fs::read_to_string(root.join("proj/app.js")).unwrap(), "v2");

        let _ = fs::remove_dir_all(&root);
    }
}
