use std::fs;
use std::io::Cursor;
use std::path::Path;

use tempfile::TempDir;

use super::super::device::{FileFrameSource, GeoFix, ManualLocation};
use super::*;
use crate::settings::Settings;
use crate::store::queue::load_queue;

/// Context over a fresh temp data directory, bypassing the keychain.
fn test_ctx(dir: &Path) -> AppContext {
    store::init_data_folders(dir).unwrap();
    AppContext {
        data_dir: dir.to_path_buf(),
        settings: Settings::default(),
        queue: Vec::new(),
        server_photos: Vec::new(),
        last_sync: None,
    }
}

/// A small but real PNG frame, as a camera would hand over.
fn png_frame() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([120, 200, 40]));
    let mut out = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

fn stage_frame(dir: &Path, name: &str, bytes: &[u8]) -> FileFrameSource {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    FileFrameSource::new(path)
}

#[test]
fn test_capture_creates_pending_record_at_head() {
    let tmp = TempDir::new().unwrap();
    let mut ctx = test_ctx(&tmp.path().join("data"));
    let mut camera = stage_frame(tmp.path(), "frame.png", &png_frame());
    let mut location = ManualLocation::new(Some(GeoFix { lat: 48.2, lng: 16.37 }));

    let record = capture_and_save(&mut ctx, &mut camera, &mut location).unwrap();

    assert_eq!(record.status, RecordStatus::Pending);
    assert_eq!(record.lat, Some(48.2));
    assert_eq!(record.lng, Some(16.37));
    assert!(record.filename.starts_with("photo-"));
    assert!(record.filename.ends_with(".jpg"));
    // timestamp portion carries no characters unsafe for filenames
    let stem = record.filename.trim_end_matches(".jpg");
    assert!(!stem.contains(':') && !stem.contains('.'));

    // normalized JPEG landed in the photo folder
    let photo = Path::new(&record.local_path);
    assert!(photo.exists());
    let bytes = fs::read(photo).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8], "File should be JPEG");

    // queue persisted with the new record at the head
    let loaded = load_queue(&ctx.data_dir).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0], record);
}

#[test]
fn test_capture_not_ready_is_a_no_op() {
    let tmp = TempDir::new().unwrap();
    let mut ctx = test_ctx(&tmp.path().join("data"));
    let mut camera = FileFrameSource::new(tmp.path().join("no-such-frame.png"));
    let mut location = ManualLocation::new(None);

    let err = capture_and_save(&mut ctx, &mut camera, &mut location);
    assert!(matches!(err, Err(GeopicError::CameraNotReady)));
    assert!(ctx.queue.is_empty());
    assert!(load_queue(&ctx.data_dir).unwrap().is_empty());
}

#[test]
fn test_capture_without_permission_omits_geotag() {
    let tmp = TempDir::new().unwrap();
    let mut ctx = test_ctx(&tmp.path().join("data"));
    let mut camera = stage_frame(tmp.path(), "frame.png", &png_frame());
    let mut location = ManualLocation::new(None);

    let record = capture_and_save(&mut ctx, &mut camera, &mut location).unwrap();
    assert!(record.lat.is_none());
    assert!(record.lng.is_none());
    assert_eq!(record.status, RecordStatus::Pending);
}

#[test]
fn test_capture_undecodable_frame_aborts_cleanly() {
    let tmp = TempDir::new().unwrap();
    let mut ctx = test_ctx(&tmp.path().join("data"));
    let mut camera = stage_frame(tmp.path(), "frame.png", b"not an image at all");
    let mut location = ManualLocation::new(None);

    let err = capture_and_save(&mut ctx, &mut camera, &mut location);
    assert!(err.is_err());
    assert!(ctx.queue.is_empty());
    assert!(load_queue(&ctx.data_dir).unwrap().is_empty());

    // no orphan file in the photo folder
    let photos = fs::read_dir(ctx.photos_dir()).unwrap().count();
    assert_eq!(photos, 0);
}

#[test]
fn test_capture_ids_unique_across_captures() {
    let tmp = TempDir::new().unwrap();
    let mut ctx = test_ctx(&tmp.path().join("data"));
    let frame = png_frame();

    for i in 0..3 {
        let mut camera = stage_frame(tmp.path(), &format!("frame{}.png", i), &frame);
        let mut location = ManualLocation::new(None);
        capture_and_save(&mut ctx, &mut camera, &mut location).unwrap();
    }

    assert_eq!(ctx.queue.len(), 3);
    let mut ids: Vec<_> = ctx.queue.iter().map(|r| r.id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 3, "Record ids must be unique");

    // each record owns its own file
    let mut paths: Vec<_> = ctx.queue.iter().map(|r| r.local_path.clone()).collect();
    paths.sort();
    paths.dedup();
    assert_eq!(paths.len(), 3);
}
