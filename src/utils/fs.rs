use crate::error::{Result, WrenkitError};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Chunk size for the large-file progress copy (1 MiB).
const COPY_CHUNK_SIZE: usize = 1024 * 1024;

pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => WrenkitError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => WrenkitError::from(e),
        })?;
    }
    Ok(())
}

pub fn remove_dir_recursive(path: &Path) -> Result<()> {
    if path.exists() {
        std::fs::remove_dir_all(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => WrenkitError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => WrenkitError::from(e),
        })?;
    }
    Ok(())
}

pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    ensure_dir_exists(dst)?;

    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }

    Ok(())
}

/// Copy a single large file in fixed-size chunks, printing cumulative
/// percentage progress to the console.
pub fn copy_file_with_progress(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        ensure_dir_exists(parent)?;
    }

    let total = std::fs::metadata(src)?.len();
    let name = src
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| src.display().to_string());

    let mut reader = File::open(src)?;
    let mut writer = File::create(dst)?;
    let mut buffer = vec![0u8; COPY_CHUNK_SIZE];
    let mut copied: u64 = 0;

    loop {
        let read = reader.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        writer.write_all(&buffer[..read])?;
        copied += read as u64;

        if total > 0 {
            let percent = copied as f64 / total as f64 * 100.0;
            print!("\r  copying {name}: {percent:.1}%");
            let _ = std::io::stdout().flush();
        }
    }

    writer.flush()?;
    if total > 0 {
        println!();
    }

    Ok(())
}
