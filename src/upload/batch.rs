// Batch upload orchestration

use crate::api::ApiClient;
use crate::context::AppContext;
use crate::error::Result;
use crate::store::queue::RecordStatus;

/// Tally of one batch walk.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub attempted: usize,
    pub synced: usize,
    pub failed: usize,
}

/// Walk the queue once in its current order and upload every record that is
/// neither synced nor already uploading. Strictly sequential: each attempt
/// runs to its terminal status before the next record starts. Failures are
/// surfaced per record by the engine; the walk itself keeps going.
pub fn upload_all(ctx: &mut AppContext, api: &ApiClient) -> Result<BatchResult> {
    let snapshot: Vec<String> = ctx
        .queue
        .iter()
        .filter(|r| r.status != RecordStatus::Synced && r.status != RecordStatus::Uploading)
        .map(|r| r.id.clone())
        .collect();

    let mut result = BatchResult::default();
    for id in snapshot {
        result.attempted += 1;
        match super::upload_one(ctx, api, &id)?.status {
            RecordStatus::Synced => result.synced += 1,
            _ => result.failed += 1,
        }
    }

    Ok(result)
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
