//! Addon archive handling: zip validation, all-or-nothing extraction, and
//! the replace-not-merge copy into the bundle tree.

use crate::error::{Result, WrenkitError};
use crate::utils::fs;
use std::fs::File;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Extracted root used when the archive manifest is empty.
const FALLBACK_TOP_LEVEL: &str = "repo";

/// Extract `archive_path` into `extract_dir` and return the extracted root,
/// computed from the first manifest entry's leading path segment (branch
/// archives embed the branch name in it, so it cannot be hardcoded).
///
/// A corrupt archive is deleted before the error is returned, so a rerun
/// does not short-circuit on a poisoned "already downloaded" file.
pub fn extract_archive(archive_path: &Path, extract_dir: &Path) -> Result<PathBuf> {
    fs::ensure_dir_exists(extract_dir)?;

    println!(
        "Extracting {} to {}",
        archive_path.display(),
        extract_dir.display()
    );

    let file = File::open(archive_path)?;
    let mut archive = match ZipArchive::new(file) {
        Ok(archive) => archive,
        Err(_) => return Err(reject_corrupt(archive_path)),
    };

    let top_level = top_level_dir_name(&mut archive).unwrap_or_else(|| FALLBACK_TOP_LEVEL.to_string());

    for i in 0..archive.len() {
        let mut entry = match archive.by_index(i) {
            Ok(entry) => entry,
            Err(_) => return Err(reject_corrupt(archive_path)),
        };
        let outpath = match entry.enclosed_name() {
            Some(path) => extract_dir.join(path),
            None => continue,
        };

        if entry.name().ends_with('/') {
            std::fs::create_dir_all(&outpath)?;
        } else {
            if let Some(parent) = outpath.parent() {
                if !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let mut outfile = File::create(&outpath)?;
            if std::io::copy(&mut entry, &mut outfile).is_err() {
                return Err(reject_corrupt(archive_path));
            }
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode))?;
            }
        }
    }

    let extracted_root = extract_dir.join(top_level);
    println!("Extraction complete: {}", extracted_root.display());
    Ok(extracted_root)
}

fn top_level_dir_name<R: std::io::Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
) -> Option<String> {
    let first = archive.name_for_index(0)?;
    let segment = first.split('/').next()?;
    if segment.is_empty() {
        None
    } else {
        Some(segment.to_string())
    }
}

fn reject_corrupt(archive_path: &Path) -> WrenkitError {
    println!(
        "File is corrupt or not a valid zip archive, removing: {}",
        archive_path.display()
    );
    if archive_path.exists() {
        let _ = std::fs::remove_file(archive_path);
    }
    WrenkitError::InvalidArchive {
        path: archive_path.to_path_buf(),
    }
}

/// Copy `source` wholesale to `destination`, removing an existing
/// destination first. Replace semantics, never a merge.
pub fn install_subtree(source: &Path, destination: &Path) -> Result<()> {
    println!(
        "Copying {} → {}",
        source.display(),
        destination.display()
    );

    if !source.exists() {
        return Err(WrenkitError::MissingSource {
            path: source.to_path_buf(),
        });
    }

    if destination.exists() {
        fs::remove_dir_recursive(destination)?;
        println!("Removed existing destination: {}", destination.display());
    }

    if let Some(parent) = destination.parent() {
        fs::ensure_dir_exists(parent)?;
    }

    fs::copy_dir_recursive(source, destination)?;
    println!("✅ Copy complete: {}", destination.display());
    Ok(())
}

/// Best-effort removal of the archive file and the extracted tree. Runs
/// after the copy step whether it succeeded or not; failures are warnings.
pub fn cleanup_artifacts(archive_path: &Path, extracted_root: &Path) {
    if archive_path.exists() {
        match std::fs::remove_file(archive_path) {
            Ok(()) => println!("Removed temporary archive"),
            Err(e) => println!("⚠️  Could not remove {}: {e}", archive_path.display()),
        }
    }

    if extracted_root.exists() {
        match std::fs::remove_dir_all(extracted_root) {
            Ok(()) => println!("Removed temporary extraction directory"),
            Err(e) => println!("⚠️  Could not remove {}: {e}", extracted_root.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = SimpleFileOptions::default();
        for (name, content) in entries {
            if name.ends_with('/') {
                writer.add_directory(name.trim_end_matches('/'), options).unwrap();
            } else {
                writer.start_file(*name, options).unwrap();
                writer.write_all(content).unwrap();
            }
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_extracted_root_comes_from_first_manifest_entry() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("anything.zip");
        write_zip(
            &archive,
            &[
                ("foo-bar/", b"" as &[u8]),
                ("foo-bar/readme.txt", b"hello"),
            ],
        );

        let root = extract_archive(&archive, dir.path()).unwrap();
        assert_eq!(root, dir.path().join("foo-bar"));
        assert_eq!(
            std::fs::read_to_string(root.join("readme.txt")).unwrap(),
            "hello"
        );
    }

    #[test]
    fn test_invalid_archive_is_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("bogus.zip");
        std::fs::write(&archive, b"this is not a zip file").unwrap();

        let result = extract_archive(&archive, dir.path());
        assert!(matches!(result, Err(WrenkitError::InvalidArchive { .. })));
        assert!(!archive.exists());
    }

    #[test]
    fn test_install_subtree_replaces_existing_destination() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        std::fs::create_dir_all(&source).unwrap();
        std::fs::write(source.join("new.txt"), "new").unwrap();

        let destination = dir.path().join("dest");
        std::fs::create_dir_all(&destination).unwrap();
        std::fs::write(destination.join("stale.txt"), "old").unwrap();

        install_subtree(&source, &destination).unwrap();

        assert!(destination.join("new.txt").exists());
        // Replace, not merge: the stale file must be gone.
        assert!(!destination.join("stale.txt").exists());
    }

    #[test]
    fn test_install_subtree_missing_source_is_terminal() {
        let dir = tempfile::tempdir().unwrap();
        let result = install_subtree(&dir.path().join("nope"), &dir.path().join("dest"));
        assert!(matches!(result, Err(WrenkitError::MissingSource { .. })));
    }

    #[test]
    fn test_cleanup_artifacts_tolerates_missing_paths() {
        let dir = tempfile::tempdir().unwrap();
        cleanup_artifacts(&dir.path().join("gone.zip"), &dir.path().join("gone-dir"));
    }
}
