//! Keeps claims inside the validity mask.
//!
//! Exclusions are seeded before any candidate is evaluated, and the final map
//! is multiplied by the mask once the pass completes. After finalization
//! excluded pixels read `0`; the `-1` seed only lives during the pass.

use crate::image::{ImageView, OwnedImage};
use crate::ownership::{OwnershipMap, EXCLUDED, UNCLAIMED};
use crate::util::{SnakeFilterError, SnakeFilterResult};

fn check_dims(
    labels: &OwnedImage<i32>,
    mask: ImageView<'_, u8>,
) -> SnakeFilterResult<()> {
    if labels.dims() != mask.dims() {
        return Err(SnakeFilterError::DimensionMismatch {
            expected: labels.dims(),
            got: mask.dims(),
            context: "validity mask",
        });
    }
    Ok(())
}

/// Resets `labels` to `-1` outside the mask and `0` inside.
pub fn seed_exclusions(
    labels: &mut OwnedImage<i32>,
    mask: ImageView<'_, u8>,
) -> SnakeFilterResult<()> {
    check_dims(labels, mask)?;
    let width = labels.width();
    let data = labels.data_mut();
    for (y, out_row) in data.chunks_exact_mut(width).enumerate() {
        let Some(mask_row) = mask.row(y) else {
            continue;
        };
        for (out, &valid) in out_row.iter_mut().zip(mask_row) {
            *out = if valid == 0 { EXCLUDED } else { UNCLAIMED };
        }
    }
    Ok(())
}

/// Multiplies the map by the mask, zeroing every pixel outside it.
///
/// Idempotent; labels inside the mask are untouched.
pub fn finalize_with_mask(
    map: &mut OwnershipMap,
    mask: ImageView<'_, u8>,
) -> SnakeFilterResult<()> {
    let labels = map.labels_mut();
    check_dims(labels, mask)?;
    let width = labels.width();
    let data = labels.data_mut();
    for (y, out_row) in data.chunks_exact_mut(width).enumerate() {
        let Some(mask_row) = mask.row(y) else {
            continue;
        };
        for (out, &valid) in out_row.iter_mut().zip(mask_row) {
            *out *= i32::from(valid != 0);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{finalize_with_mask, seed_exclusions};
    use crate::image::OwnedImage;
    use crate::ownership::OwnershipMap;

    #[test]
    fn finalize_zeroes_excluded_and_is_idempotent() {
        let mask = OwnedImage::new(vec![1u8, 0, 1, 0], 2, 2).unwrap();
        let mut map = OwnershipMap::from_mask(mask.view()).unwrap();
        assert_eq!(map.labels(), &[0, -1, 0, -1]);

        finalize_with_mask(&mut map, mask.view()).unwrap();
        assert_eq!(map.labels(), &[0, 0, 0, 0]);
        let once = map.clone();
        finalize_with_mask(&mut map, mask.view()).unwrap();
        assert_eq!(map, once);
    }

    #[test]
    fn mismatched_mask_is_rejected() {
        let mask = OwnedImage::filled(3, 2, 1u8).unwrap();
        let mut labels = OwnedImage::filled(2, 2, 0i32).unwrap();
        assert!(seed_exclusions(&mut labels, mask.view()).is_err());
    }

    #[test]
    fn strided_mask_is_honored() {
        let backing = [1u8, 0, 7, 0, 1, 7];
        let mask = crate::image::ImageView::new(&backing, 2, 2, 3).unwrap();
        let mut labels = OwnedImage::filled(2, 2, 5i32).unwrap();
        seed_exclusions(&mut labels, mask).unwrap();
        assert_eq!(labels.data(), &[0, -1, -1, 0]);
    }
}
