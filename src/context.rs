// Application context
// Process-wide state threaded explicitly through every operation: the
// settings snapshot, the in-memory queue copy, the transient staging list
// from the last sync pull, and the sync cursor. The store owns the
// canonical queue on disk; this copy is re-persisted after every mutation.

use std::path::PathBuf;

use crate::api::ServerPhoto;
use crate::error::Result;
use crate::settings::Settings;
use crate::store::{self, queue::CaptureRecord};

pub struct AppContext {
    pub data_dir: PathBuf,
    pub settings: Settings,
    pub queue: Vec<CaptureRecord>,
    /// Server photos staged by the last pull. Never persisted.
    pub server_photos: Vec<ServerPhoto>,
    pub last_sync: Option<String>,
}

impl AppContext {
    /// Load settings, queue and cursor for a data directory, creating the
    /// folder structure on first run.
    pub fn load(data_dir: PathBuf) -> Result<Self> {
        store::init_data_folders(&data_dir)?;
        let settings = Settings::load();
        let queue = store::queue::load_queue(&data_dir)?;
        let last_sync = store::load_cursor(&data_dir);

        Ok(Self {
            data_dir,
            settings,
            queue,
            server_photos: Vec::new(),
            last_sync,
        })
    }

    /// Folder holding the photo files owned by queue records.
    pub fn photos_dir(&self) -> PathBuf {
        store::photos_dir(&self.data_dir)
    }
}
