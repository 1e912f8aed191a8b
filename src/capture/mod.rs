// Capture pipeline module

pub mod device;
pub mod pipeline;

pub use device::{AccuracyTier, FileFrameSource, FrameSource, GeoFix, LocationProvider, ManualLocation};
pub use pipeline::capture_and_save;
