// Queue records and whole-list persistence
// The queue is one ordered JSON document under a single file; every
// mutation is a full-list replace.

use std::fs;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{queue_path, write_atomic};
use crate::error::{GeopicError, Result};

/// Upload lifecycle of a capture record.
/// Legal transitions: pending -> uploading -> {synced, failed};
/// failed -> uploading on retry. Imported records start at synced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Pending,
    Uploading,
    Synced,
    Failed,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Pending => "pending",
            RecordStatus::Uploading => "uploading",
            RecordStatus::Synced => "synced",
            RecordStatus::Failed => "failed",
        }
    }
}

/// One photo tracked through its upload lifecycle. The record exclusively
/// owns the file at `local_path`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CaptureRecord {
    pub id: String,
    pub filename: String,
    pub local_path: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub taken_at: String,
    pub status: RecordStatus,
}

/// Load the whole queue. A missing queue file is an empty queue.
pub fn load_queue(data_dir: &Path) -> Result<Vec<CaptureRecord>> {
    let path = queue_path(data_dir);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let raw = fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Persist the whole queue, replacing the previous list.
pub fn persist_queue(data_dir: &Path, queue: &[CaptureRecord]) -> Result<()> {
    let json = serde_json::to_vec_pretty(queue)?;
    write_atomic(&queue_path(data_dir), &json)
}

/// Update one record's status by id and persist the full list.
pub fn set_status(
    data_dir: &Path,
    queue: &mut [CaptureRecord],
    id: &str,
    status: RecordStatus,
) -> Result<()> {
    let record = queue
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| GeopicError::RecordNotFound(id.to_string()))?;
    record.status = status;
    persist_queue(data_dir, queue)
}

/// Remove a record from the queue and persist. The backing file is deleted
/// best-effort: a failed delete does not block record removal.
pub fn delete_record(
    data_dir: &Path,
    queue: &mut Vec<CaptureRecord>,
    id: &str,
) -> Result<CaptureRecord> {
    let pos = queue
        .iter()
        .position(|r| r.id == id)
        .ok_or_else(|| GeopicError::RecordNotFound(id.to_string()))?;
    let record = queue.remove(pos);

    if let Err(e) = fs::remove_file(&record.local_path) {
        log::warn!("Could not delete {}: {}", record.local_path, e);
    }

    persist_queue(data_dir, queue)?;
    Ok(record)
}

/// Generate a record id unique within the queue: the millisecond timestamp,
/// bumped until free, with an optional prefix for imported records.
pub fn unique_record_id(queue: &[CaptureRecord], prefix: Option<&str>) -> String {
    let base = Utc::now().timestamp_millis();
    for bump in 0..1000 {
        let candidate = match prefix {
            Some(p) => format!("{}-{}", p, base + bump),
            None => (base + bump).to_string(),
        };
        if !queue.iter().any(|r| r.id == candidate) {
            return candidate;
        }
    }
    match prefix {
        Some(p) => format!("{}-{}", p, uuid::Uuid::new_v4()),
        None => uuid::Uuid::new_v4().to_string(),
    }
}
