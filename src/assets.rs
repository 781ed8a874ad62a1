// assets.rs — background image decoding for panoramas and marker icons

use crate::error::{Result, ViewerError};
use crate::marker::MarkerId;
use image::io::Reader as ImageReader;
use image::RgbaImage;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread;

/// Where a decoded image goes once it reaches the main thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetSlot {
    Panorama(usize),
    MarkerIcon(MarkerId),
}

pub struct LoadedAsset {
    pub slot: AssetSlot,
    pub path: PathBuf,
    pub image: RgbaImage,
}

pub fn decode_image(path: &Path) -> Result<RgbaImage> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ViewerError::AssetNotFound(path.to_path_buf()),
        _ => ViewerError::Io(e),
    })?;

    let img = ImageReader::new(BufReader::new(file))
        .with_guessed_format()
        .map_err(image::ImageError::IoError)
        .and_then(|mut r| {
            r.no_limits();
            r.decode()
        })
        .map_err(|source| ViewerError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(img.to_rgba8())
}

/// Decode `path` on a worker thread and send it to the frame loop.
/// Failures are logged; the view keeps whatever it showed before.
pub fn spawn_load(path: PathBuf, slot: AssetSlot, tx: Sender<LoadedAsset>) {
    thread::spawn(move || {
        log::info!("loading {:?} into {:?}", path, slot);
        match decode_image(&path) {
            Ok(image) => {
                log::info!(
                    "decoded {:?}: {}x{}",
                    path,
                    image.width(),
                    image.height()
                );
                if tx.send(LoadedAsset { slot, path, image }).is_err() {
                    log::debug!("frame loop gone, dropping decoded image");
                }
            }
            Err(e) => log::warn!("{}", e),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_asset_not_found() {
        let err = decode_image(Path::new("/definitely/not/here.jpg")).unwrap_err();
        assert!(matches!(err, ViewerError::AssetNotFound(_)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let path = std::env::temp_dir().join("panorama_tour_garbage.png");
        std::fs::write(&path, b"not an image").unwrap();
        let err = decode_image(&path).unwrap_err();
        let _ = std::fs::remove_file(&path);
        assert!(matches!(err, ViewerError::Decode { .. }));
    }

    #[test]
    fn decodes_a_small_png() {
        let path = std::env::temp_dir().join("panorama_tour_small.png");
        RgbaImage::from_pixel(4, 2, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();
        let img = decode_image(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(img.dimensions(), (4, 2));
        assert_eq!(img.get_pixel(3, 1).0, [10, 20, 30, 255]);
    }
}
