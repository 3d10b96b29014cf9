//! Loading masks and saving label maps via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::{BinaryMask, OwnedImage};
use crate::ownership::OwnershipMap;
use crate::util::{SnakeFilterError, SnakeFilterResult};
use std::path::Path;

/// Converts a grayscale image into a binary mask (nonzero becomes `1`).
pub fn mask_from_gray_image(img: &image::GrayImage) -> SnakeFilterResult<BinaryMask> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    let data = img.as_raw().iter().map(|&v| u8::from(v != 0)).collect();
    OwnedImage::new(data, width, height)
}

/// Loads an image from disk and thresholds it into a binary mask.
pub fn load_mask<P: AsRef<Path>>(path: P) -> SnakeFilterResult<BinaryMask> {
    let img = image::open(path).map_err(|err| SnakeFilterError::ImageIo {
        reason: err.to_string(),
    })?;
    mask_from_gray_image(&img.to_luma8())
}

/// Saves a label map as a 16-bit grayscale PNG.
///
/// Labels above `u16::MAX` saturate; non-positive labels are written as `0`.
pub fn save_labels_png<P: AsRef<Path>>(map: &OwnershipMap, path: P) -> SnakeFilterResult<()> {
    let data: Vec<u16> = map
        .labels()
        .iter()
        .map(|&label| label.clamp(0, i32::from(u16::MAX)) as u16)
        .collect();
    let buffer =
        image::ImageBuffer::<image::Luma<u16>, Vec<u16>>::from_raw(
            map.width() as u32,
            map.height() as u32,
            data,
        )
        .ok_or(SnakeFilterError::InvalidDimensions {
            width: map.width(),
            height: map.height(),
        })?;
    buffer.save(path).map_err(|err| SnakeFilterError::ImageIo {
        reason: err.to_string(),
    })
}
