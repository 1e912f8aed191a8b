// Upload engine
// One record, one attempt, one terminal status. The terminal status is
// persisted to the queue before returning; store-level failures are the
// only errors that escape.

pub mod batch;

use std::fs;

use crate::api::ApiClient;
use crate::context::AppContext;
use crate::error::{GeopicError, Result};
use crate::store::queue::{self, CaptureRecord, RecordStatus};

/// Terminal outcome of one upload attempt.
#[derive(Debug)]
pub struct UploadOutcome {
    pub status: RecordStatus,
    /// Error text of a failed attempt, for surfacing to the user.
    pub error: Option<String>,
}

/// Mark a record as uploading (persisted immediately), then run one upload
/// attempt on it.
pub fn upload_one(ctx: &mut AppContext, api: &ApiClient, id: &str) -> Result<UploadOutcome> {
    queue::set_status(&ctx.data_dir, &mut ctx.queue, id, RecordStatus::Uploading)?;
    upload_record(ctx, api, id)
}

/// One upload attempt on the record with the given id. Maps the result to
/// synced or failed and writes that status back by id. No retry is
/// scheduled; a repeat attempt is always a new explicit call.
pub fn upload_record(ctx: &mut AppContext, api: &ApiClient, id: &str) -> Result<UploadOutcome> {
    let record = ctx
        .queue
        .iter()
        .find(|r| r.id == id)
        .cloned()
        .ok_or_else(|| GeopicError::RecordNotFound(id.to_string()))?;

    match attempt(api, &record) {
        Ok(()) => {
            queue::set_status(&ctx.data_dir, &mut ctx.queue, id, RecordStatus::Synced)?;
            Ok(UploadOutcome {
                status: RecordStatus::Synced,
                error: None,
            })
        }
        Err(err) => {
            log::error!("Upload of {} failed: {}", record.filename, err);
            queue::set_status(&ctx.data_dir, &mut ctx.queue, id, RecordStatus::Failed)?;
            Ok(UploadOutcome {
                status: RecordStatus::Failed,
                error: Some(err.to_string()),
            })
        }
    }
}

/// Read the image and post it as one multipart request.
fn attempt(api: &ApiClient, record: &CaptureRecord) -> Result<()> {
    let bytes = fs::read(&record.local_path)?;
    api.upload_photo(
        &record.filename,
        bytes,
        record.lat,
        record.lng,
        Some(&record.taken_at),
    )
}
