// Server sync pull
// One read query against the server photo listing, filtered by the last
// recorded cursor. Success replaces the staging list and advances the
// cursor to now; failure leaves both untouched.

pub mod import;

use chrono::{SecondsFormat, Utc};

use crate::api::ApiClient;
use crate::context::AppContext;
use crate::error::Result;
use crate::store;

/// Pull the server photo listing since the last sync. Returns the number of
/// photos staged for import.
pub fn pull_photos(ctx: &mut AppContext, api: &ApiClient) -> Result<usize> {
    let photos = api.fetch_photos(ctx.last_sync.as_deref())?;

    // The cursor advances on every successful pull, even an empty one.
    let cursor = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    store::store_cursor(&ctx.data_dir, &cursor)?;
    ctx.last_sync = Some(cursor);

    let count = photos.len();
    ctx.server_photos = photos;
    log::info!("Sync pull staged {} photo(s)", count);
    Ok(count)
}
