// SPDX-License-Identifier: MPL-2.0
//! Directory scanner module for finding input images and preparing output.
//!
//! This module scans an input directory for supported image formats, sorts
//! them by file name, and creates the sibling `<name>_watermark` output
//! directory used by the batch CLI.

use crate::error::{Error, Result};
use crate::media;
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix appended to the input directory name for batch output.
pub const OUTPUT_DIR_SUFFIX: &str = "_watermark";

/// Checks that `directory` exists and is a directory.
///
/// # Errors
///
/// Returns [`Error::InvalidInputDirectory`] otherwise.
pub fn validate_input_directory(directory: &Path) -> Result<()> {
    if !directory.exists() {
        return Err(Error::InvalidInputDirectory {
            path: directory.to_path_buf(),
            reason: "does not exist",
        });
    }
    if !directory.is_dir() {
        return Err(Error::InvalidInputDirectory {
            path: directory.to_path_buf(),
            reason: "is not a directory",
        });
    }
    Ok(())
}

/// Lists the supported images directly inside `directory`, sorted by name.
///
/// Subdirectories are not descended into.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn get_supported_images(directory: &Path) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();

    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() && media::is_supported_image(&path) {
            images.push(path);
        }
    }

    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(images)
}

/// Returns the batch output directory for `input_directory` without touching
/// the filesystem beyond resolving the path.
///
/// Trailing separators and relative forms such as `.` resolve to the real
/// directory name, so `photos/` maps to `photos_watermark`.
///
/// # Errors
///
/// Returns [`Error::InvalidInputDirectory`] if the path cannot be resolved or
/// has no final component (a filesystem root).
pub fn output_directory_for(input_directory: &Path) -> Result<PathBuf> {
    let resolved = fs::canonicalize(input_directory).map_err(|_| Error::InvalidInputDirectory {
        path: input_directory.to_path_buf(),
        reason: "cannot be resolved",
    })?;

    let name = resolved.file_name().ok_or_else(|| Error::InvalidInputDirectory {
        path: input_directory.to_path_buf(),
        reason: "has no directory name",
    })?;

    let mut output_name = name.to_os_string();
    output_name.push(OUTPUT_DIR_SUFFIX);

    let parent = resolved.parent().unwrap_or(Path::new("."));
    Ok(parent.join(output_name))
}

/// Creates a fresh sibling output directory for `input_directory`.
///
/// An existing directory of the same name is deleted with its contents and
/// recreated empty.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved or the directory cannot
/// be removed or created.
pub fn create_output_directory(input_directory: &Path) -> Result<PathBuf> {
    let output = output_directory_for(input_directory)?;

    if output.exists() {
        tracing::info!(dir = %output.display(), "replacing existing output directory");
        if output.is_dir() {
            fs::remove_dir_all(&output)?;
        } else {
            fs::remove_file(&output)?;
        }
    }

    fs::create_dir_all(&output)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn create_test_file(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).expect("failed to create test file");
        file.write_all(b"fake image data")
            .expect("failed to write test file");
        path
    }

    #[test]
    fn get_supported_images_filters_by_extension() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        create_test_file(temp_dir.path(), "a.jpg");
        create_test_file(temp_dir.path(), "b.PNG");
        create_test_file(temp_dir.path(), "c.tiff");
        create_test_file(temp_dir.path(), "notes.txt");
        create_test_file(temp_dir.path(), "anim.gif");

        let images = get_supported_images(temp_dir.path()).expect("failed to scan directory");

        assert_eq!(images.len(), 3);
    }

    #[test]
    fn get_supported_images_sorts_by_name_and_skips_directories() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        create_test_file(temp_dir.path(), "z.jpg");
        create_test_file(temp_dir.path(), "a.bmp");
        fs::create_dir(temp_dir.path().join("nested.jpg")).expect("mkdir");

        let images = get_supported_images(temp_dir.path()).expect("failed to scan directory");
        let names: Vec<_> = images
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();

        assert_eq!(names, vec!["a.bmp", "z.jpg"]);
    }

    #[test]
    fn get_supported_images_handles_empty_directory() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let images = get_supported_images(temp_dir.path()).expect("failed to scan directory");
        assert!(images.is_empty());
    }

    #[test]
    fn validate_input_directory_rejects_missing_and_files() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let file = create_test_file(temp_dir.path(), "a.jpg");

        assert!(validate_input_directory(temp_dir.path()).is_ok());
        assert!(matches!(
            validate_input_directory(&temp_dir.path().join("missing")),
            Err(Error::InvalidInputDirectory {
                reason: "does not exist",
                ..
            })
        ));
        assert!(matches!(
            validate_input_directory(&file),
            Err(Error::InvalidInputDirectory {
                reason: "is not a directory",
                ..
            })
        ));
    }

    #[test]
    fn output_directory_is_a_sibling_even_with_trailing_slash() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let input = temp_dir.path().join("photos");
        fs::create_dir(&input).expect("mkdir");

        let with_slash = PathBuf::from(format!("{}/", input.display()));
        let output = output_directory_for(&with_slash).expect("output dir");

        assert_eq!(output.file_name().and_then(|n| n.to_str()), Some("photos_watermark"));
        assert_eq!(
            output.parent().map(Path::to_path_buf),
            fs::canonicalize(temp_dir.path()).ok()
        );
    }

    #[test]
    fn create_output_directory_replaces_existing_contents() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let input = temp_dir.path().join("photos");
        fs::create_dir(&input).expect("mkdir");

        let output = create_output_directory(&input).expect("first create");
        create_test_file(&output, "stale.jpg");

        let again = create_output_directory(&input).expect("second create");
        assert_eq!(output, again);
        assert!(again.is_dir());
        assert_eq!(fs::read_dir(&again).expect("read").count(), 0);
    }
}
