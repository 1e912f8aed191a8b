// Local state store
// One data directory holds the queue document, the sync cursor and the
// photo files. Every state write replaces the whole file via a temp file
// plus rename, so readers never observe a partial write.

pub mod queue;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::constants::{
    APP_NAME, APP_ORG, APP_QUALIFIER, CURSOR_FILENAME, PHOTOS_FOLDER, QUEUE_FILENAME,
    TEMP_FILE_PREFIX,
};
use crate::error::{GeopicError, Result};

/// Resolve the platform data directory for the client.
pub fn default_data_dir() -> Result<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| GeopicError::Other("Could not determine a data directory".to_string()))
}

/// Get the queue file path for a data directory
pub fn queue_path(data_dir: &Path) -> PathBuf {
    data_dir.join(QUEUE_FILENAME)
}

/// Get the sync cursor path for a data directory
pub fn cursor_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CURSOR_FILENAME)
}

/// Get the photo storage folder for a data directory
pub fn photos_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(PHOTOS_FOLDER)
}

/// Initialize the data folder structure
pub fn init_data_folders(data_dir: &Path) -> Result<()> {
    fs::create_dir_all(data_dir)?;
    fs::create_dir_all(photos_dir(data_dir))?;
    Ok(())
}

/// Write a file through a temp file in the same directory, then rename over
/// the final path.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| GeopicError::InvalidPath(path.display().to_string()))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| GeopicError::InvalidPath(path.display().to_string()))?;
    let tmp = parent.join(format!("{}{}", TEMP_FILE_PREFIX, name));

    {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }

    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

/// Load the last-sync cursor, if one has been recorded.
pub fn load_cursor(data_dir: &Path) -> Option<String> {
    fs::read_to_string(cursor_path(data_dir))
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Record a new last-sync cursor, overwriting any previous value.
pub fn store_cursor(data_dir: &Path, cursor: &str) -> Result<()> {
    write_atomic(&cursor_path(data_dir), cursor.as_bytes())
}

/// Find a free destination path for a filename, appending a number on
/// conflict.
pub fn unique_dest_path(dir: &Path, filename: &str) -> Result<PathBuf> {
    let candidate = dir.join(filename);
    if !candidate.exists() {
        return Ok(candidate);
    }

    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("photo");
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    for i in 1..1000 {
        let name = if ext.is_empty() {
            format!("{}_{}", stem, i)
        } else {
            format!("{}_{}.{}", stem, i, ext)
        };
        let next = dir.join(name);
        if !next.exists() {
            return Ok(next);
        }
    }

    Err(GeopicError::Other(
        "Could not generate unique filename".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_photo_folder() {
        let tmp = TempDir::new().unwrap();
        let data_dir = tmp.path().join("geopic");
        init_data_folders(&data_dir).unwrap();
        assert!(photos_dir(&data_dir).is_dir());
    }

    #[test]
    fn test_write_atomic_leaves_no_temp_file() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("state.json");
        write_atomic(&target, b"[]").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"[]");
        for entry in fs::read_dir(tmp.path()).unwrap() {
            let name = entry.unwrap().file_name().to_string_lossy().to_string();
            assert!(
                !name.starts_with(TEMP_FILE_PREFIX),
                "No temp files should remain, found: {}",
                name
            );
        }
    }

    #[test]
    fn test_cursor_round_trip() {
        let tmp = TempDir::new().unwrap();
        assert!(load_cursor(tmp.path()).is_none());

        store_cursor(tmp.path(), "2026-08-06T10:00:00Z").unwrap();
        assert_eq!(
            load_cursor(tmp.path()).as_deref(),
            Some("2026-08-06T10:00:00Z")
        );

        store_cursor(tmp.path(), "2026-08-06T11:00:00Z").unwrap();
        assert_eq!(
            load_cursor(tmp.path()).as_deref(),
            Some("2026-08-06T11:00:00Z")
        );
    }

    #[test]
    fn test_unique_dest_path_bumps_on_conflict() {
        let tmp = TempDir::new().unwrap();
        let first = unique_dest_path(tmp.path(), "a.jpg").unwrap();
        assert_eq!(first, tmp.path().join("a.jpg"));
        fs::write(&first, b"x").unwrap();

        let second = unique_dest_path(tmp.path(), "a.jpg").unwrap();
        assert_eq!(second, tmp.path().join("a_1.jpg"));
        fs::write(&second, b"y").unwrap();

        let third = unique_dest_path(tmp.path(), "a.jpg").unwrap();
        assert_eq!(third, tmp.path().join("a_2.jpg"));
    }
}
