// Capture pipeline execution
// One shot end to end: frame -> normalized JPEG -> local file -> optional
// geotag -> pending record at the head of the queue. Any step failure
// aborts with the queue unchanged.

use std::fs;
use std::sync::LazyLock;

use chrono::{SecondsFormat, Utc};
use regex::Regex;

use super::device::{AccuracyTier, FrameSource, LocationProvider};
use crate::constants::{CAPTURE_FILENAME_PREFIX, CAPTURE_JPEG_QUALITY};
use crate::context::AppContext;
use crate::error::{GeopicError, Result};
use crate::store::{self, queue::{self, CaptureRecord, RecordStatus}};

// Characters in timestamps that are unsafe in filenames
static UNSAFE_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[:.]").unwrap());

/// Run the capture pipeline: produces exactly one new pending record at the
/// head of the queue, or leaves the queue untouched on failure.
pub fn capture_and_save(
    ctx: &mut AppContext,
    camera: &mut dyn FrameSource,
    location: &mut dyn LocationProvider,
) -> Result<CaptureRecord> {
    if !camera.is_ready() {
        return Err(GeopicError::CameraNotReady);
    }

    let raw = camera.acquire()?;
    let jpeg = normalize_jpeg(&raw)?;

    let taken_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let dest = store::unique_dest_path(&ctx.photos_dir(), &filename_for(&taken_at))?;
    store::write_atomic(&dest, &jpeg)?;

    // Best-effort fix: skipped entirely without permission, but a failing
    // provider aborts the capture like any other step.
    let fix = if location.has_permission() {
        match location.current_fix(AccuracyTier::Balanced) {
            Ok(fix) => Some(fix),
            Err(e) => {
                let _ = fs::remove_file(&dest);
                return Err(e);
            }
        }
    } else {
        None
    };

    let filename = dest
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let record = CaptureRecord {
        id: queue::unique_record_id(&ctx.queue, None),
        filename,
        local_path: dest.to_string_lossy().to_string(),
        lat: fix.map(|f| f.lat),
        lng: fix.map(|f| f.lng),
        taken_at,
        status: RecordStatus::Pending,
    };

    ctx.queue.insert(0, record.clone());
    if let Err(e) = queue::persist_queue(&ctx.data_dir, &ctx.queue) {
        ctx.queue.remove(0);
        let _ = fs::remove_file(&dest);
        return Err(e);
    }

    log::info!("Captured {} ({} queued)", record.filename, ctx.queue.len());
    Ok(record)
}

/// Re-encode a raw frame as JPEG at the fixed capture quality.
fn normalize_jpeg(raw: &[u8]) -> Result<Vec<u8>> {
    let img = image::load_from_memory(raw)?;
    let mut out = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, CAPTURE_JPEG_QUALITY);
    img.write_with_encoder(encoder)?;
    Ok(out)
}

/// Derive a filesystem-safe filename from a capture timestamp.
fn filename_for(taken_at: &str) -> String {
    let safe = UNSAFE_CHARS.replace_all(taken_at, "-");
    format!("{}-{}.jpg", CAPTURE_FILENAME_PREFIX, safe)
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
