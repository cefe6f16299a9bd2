//! File I/O utilities with atomic writes
//!
//! Documents are replaced with write-temp-then-rename so a reader sees either
//! the old file or the new one, never a half-written one. Collections are
//! append-only JSON lines, synced on every append.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{PurseError, PurseResult};

/// Read a JSON document, returning None if the file doesn't exist
pub fn read_json<T, P>(path: P) -> PurseResult<Option<T>>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path).map_err(|e| {
        PurseError::Persistence(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map(Some).map_err(|e| {
        PurseError::Persistence(format!("Failed to parse {}: {}", path.display(), e))
    })
}

/// Write a JSON document atomically (write to temp, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> PurseResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            PurseError::Persistence(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = temp_path_for(path);

    let file = File::create(&temp_path)
        .map_err(|e| PurseError::Persistence(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| PurseError::Persistence(format!("Failed to serialize data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| PurseError::Persistence(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| PurseError::Persistence(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        PurseError::Persistence(format!("Failed to replace {}: {}", path.display(), e))
    })?;

    Ok(())
}

/// Append one record as a JSON line and sync it to disk
pub fn append_json_line<T, P>(path: P, record: &T) -> PurseResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            PurseError::Persistence(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let json = serde_json::to_string(record)
        .map_err(|e| PurseError::Persistence(format!("Failed to serialize record: {}", e)))?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            PurseError::Persistence(format!("Failed to open {}: {}", path.display(), e))
        })?;

    // One write call per line keeps records whole
    file.write_all(format!("{}\n", json).as_bytes())
        .map_err(|e| PurseError::Persistence(format!("Failed to append record: {}", e)))?;

    file.sync_all()
        .map_err(|e| PurseError::Persistence(format!("Failed to sync {}: {}", path.display(), e)))?;

    Ok(())
}

/// Read every record of a JSON lines file in file order
pub fn read_json_lines<T, P>(path: P) -> PurseResult<Vec<T>>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path).map_err(|e| {
        PurseError::Persistence(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let reader = BufReader::new(file);
    let mut records = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| {
            PurseError::Persistence(format!(
                "Failed to read {} line {}: {}",
                path.display(),
                line_num + 1,
                e
            ))
        })?;

        if line.trim().is_empty() {
            continue;
        }

        let record = serde_json::from_str(&line).map_err(|e| {
            PurseError::Persistence(format!(
                "Failed to parse {} line {}: {}",
                path.display(),
                line_num + 1,
                e
            ))
        })?;

        records.push(record);
    }

    Ok(records)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
