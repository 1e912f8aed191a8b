// Capture device capabilities
// Camera and geolocation are external collaborators; only their narrow
// contracts live here. Production impls are file-backed (staged frames)
// and fixed-value (operator-supplied coordinates).

use std::fs;
use std::path::PathBuf;

use crate::error::{GeopicError, Result};

/// Accuracy tier requested from the location provider. Captures ask for a
/// balanced fix, not high precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccuracyTier {
    Balanced,
    High,
}

/// A single location fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoFix {
    pub lat: f64,
    pub lng: f64,
}

/// Source of raw camera frames.
pub trait FrameSource {
    /// Whether the source can currently produce a frame.
    fn is_ready(&self) -> bool;

    /// Acquire one raw frame.
    fn acquire(&mut self) -> Result<Vec<u8>>;
}

/// Provider of device location fixes.
pub trait LocationProvider {
    /// Whether location permission has been granted.
    fn has_permission(&self) -> bool;

    /// Get the current fix at the requested accuracy tier.
    fn current_fix(&mut self, tier: AccuracyTier) -> Result<GeoFix>;
}

/// Frame source backed by an image file on disk.
pub struct FileFrameSource {
    path: PathBuf,
}

impl FileFrameSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl FrameSource for FileFrameSource {
    fn is_ready(&self) -> bool {
        self.path.is_file()
    }

    fn acquire(&mut self) -> Result<Vec<u8>> {
        Ok(fs::read(&self.path)?)
    }
}

/// Location provider with an operator-supplied fix, or none at all when
/// no coordinates were given (the no-permission case).
pub struct ManualLocation {
    fix: Option<GeoFix>,
}

impl ManualLocation {
    pub fn new(fix: Option<GeoFix>) -> Self {
        Self { fix }
    }
}

impl LocationProvider for ManualLocation {
    fn has_permission(&self) -> bool {
        self.fix.is_some()
    }

    fn current_fix(&mut self, _tier: AccuracyTier) -> Result<GeoFix> {
        self.fix.ok_or(GeopicError::NoLocationFix)
    }
}
