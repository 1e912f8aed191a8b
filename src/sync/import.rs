// Server photo import
// Converts one staged descriptor into a local record: download the asset
// into the photo folder and insert an already-synced record at the head of
// the queue. Importing the same descriptor twice creates two records.

use std::fs;

use chrono::{SecondsFormat, Utc};
use url::Url;
use uuid::Uuid;

use crate::api::{ApiClient, ServerPhoto};
use crate::constants::IMPORT_ID_PREFIX;
use crate::context::AppContext;
use crate::error::{GeopicError, Result};
use crate::store::{self, queue::{self, CaptureRecord, RecordStatus}};

/// Import one staged server photo. Download or insertion failure aborts
/// without modifying the queue.
pub fn import_photo(
    ctx: &mut AppContext,
    api: &ApiClient,
    photo: &ServerPhoto,
) -> Result<CaptureRecord> {
    let reference = photo
        .asset_ref()
        .ok_or_else(|| GeopicError::Import("Descriptor has no url or path".to_string()))?;

    let bytes = api.download(reference)?;

    let filename = photo
        .filename
        .clone()
        .or_else(|| filename_from_reference(reference))
        .unwrap_or_else(|| format!("import-{}.jpg", Uuid::new_v4()));

    let dest = store::unique_dest_path(&ctx.photos_dir(), &filename)?;
    store::write_atomic(&dest, &bytes)?;

    let record = CaptureRecord {
        id: queue::unique_record_id(&ctx.queue, Some(IMPORT_ID_PREFIX)),
        filename: dest
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or(filename),
        local_path: dest.to_string_lossy().to_string(),
        lat: photo.lat,
        lng: photo.lng,
        taken_at: photo
            .taken_at
            .clone()
            .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        status: RecordStatus::Synced,
    };

    ctx.queue.insert(0, record.clone());
    if let Err(e) = queue::persist_queue(&ctx.data_dir, &ctx.queue) {
        ctx.queue.remove(0);
        let _ = fs::remove_file(&dest);
        return Err(e);
    }

    log::info!("Imported {} from server", record.filename);
    Ok(record)
}

/// Last path segment of the asset reference, when it has a usable one.
fn filename_from_reference(reference: &str) -> Option<String> {
    if let Ok(parsed) = Url::parse(reference) {
        return parsed
            .path_segments()
            .and_then(|segments| segments.last())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());
    }
    reference
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
