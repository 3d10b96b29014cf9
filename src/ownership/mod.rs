//! Per-pixel ownership map shared by one filter pass.
//!
//! Values are `-1` for pixels excluded by the validity mask, `0` for unclaimed
//! pixels, and `k > 0` for pixels claimed by the k-th accepted contour. Labels
//! are handed out in acceptance order starting at `1`.

pub mod enforce;

use crate::contour::Footprint;
use crate::image::{ImageView, OwnedImage};
use crate::util::{SnakeFilterError, SnakeFilterResult};

/// Label of a pixel outside the validity mask during a pass.
pub const EXCLUDED: i32 = -1;
/// Label of a pixel no contour has claimed.
pub const UNCLAIMED: i32 = 0;

/// Pixel counts of a footprint measured against the current map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FootprintTally {
    /// Footprint pixels already claimed or excluded (label != 0).
    pub claimed: usize,
    /// Footprint pixels still unclaimed.
    pub vacant: usize,
    /// Vacant footprint pixels inside the cell-content region.
    pub vacant_dark: usize,
}

/// Label grid recording which accepted contour owns each pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnershipMap {
    labels: OwnedImage<i32>,
    next_label: i32,
}

impl OwnershipMap {
    /// Creates a map seeded from the validity mask.
    pub fn from_mask(mask: ImageView<'_, u8>) -> SnakeFilterResult<Self> {
        let mut labels = OwnedImage::filled(mask.width(), mask.height(), UNCLAIMED)?;
        enforce::seed_exclusions(&mut labels, mask)?;
        Ok(Self {
            labels,
            next_label: 1,
        })
    }

    /// Returns the width in pixels.
    pub fn width(&self) -> usize {
        self.labels.width()
    }

    /// Returns the height in pixels.
    pub fn height(&self) -> usize {
        self.labels.height()
    }

    /// Returns `(width, height)`.
    pub fn dims(&self) -> (usize, usize) {
        self.labels.dims()
    }

    /// Row-major labels.
    pub fn labels(&self) -> &[i32] {
        self.labels.data()
    }

    /// Borrowed view of the labels.
    pub fn view(&self) -> ImageView<'_, i32> {
        self.labels.view()
    }

    /// Label at `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Option<i32> {
        self.labels.get(x, y).copied()
    }

    /// Number of labels handed out so far.
    pub fn accepted_count(&self) -> usize {
        (self.next_label - 1) as usize
    }

    /// Number of pixels carrying `label`.
    pub fn claimed_count(&self, label: i32) -> usize {
        self.labels.data().iter().filter(|&&v| v == label).count()
    }

    /// Consumes the map and returns its label grid.
    pub fn into_labels(self) -> OwnedImage<i32> {
        self.labels
    }

    pub(crate) fn labels_mut(&mut self) -> &mut OwnedImage<i32> {
        &mut self.labels
    }

    /// Checks that `footprint` lies entirely inside the map.
    pub fn check_footprint(&self, index: usize, footprint: &Footprint) -> SnakeFilterResult<()> {
        let (img_width, img_height) = self.dims();
        if footprint.fits_within(img_width, img_height) {
            return Ok(());
        }
        Err(SnakeFilterError::FootprintOutOfBounds {
            index,
            x: footprint.x(),
            y: footprint.y(),
            width: footprint.width(),
            height: footprint.height(),
            img_width,
            img_height,
        })
    }

    /// Counts claimed, vacant and vacant-dark pixels of `footprint`.
    ///
    /// `cell_content` must share the map's dimensions and the footprint must
    /// fit inside the map.
    pub fn tally(
        &self,
        footprint: &Footprint,
        cell_content: ImageView<'_, u8>,
    ) -> SnakeFilterResult<FootprintTally> {
        let content = cell_content.roi(
            footprint.x(),
            footprint.y(),
            footprint.width(),
            footprint.height(),
        )?;
        let labels = self.labels.view().roi(
            footprint.x(),
            footprint.y(),
            footprint.width(),
            footprint.height(),
        )?;
        let local = footprint.local();

        let mut tally = FootprintTally::default();
        for ly in 0..footprint.height() {
            let (Some(shape), Some(owners), Some(darkness)) =
                (local.row(ly), labels.row(ly), content.row(ly))
            else {
                continue;
            };
            for ((&inside, &owner), &dark) in shape.iter().zip(owners).zip(darkness) {
                if inside == 0 {
                    continue;
                }
                if owner != UNCLAIMED {
                    tally.claimed += 1;
                } else {
                    tally.vacant += 1;
                    if dark != 0 {
                        tally.vacant_dark += 1;
                    }
                }
            }
        }
        Ok(tally)
    }

    /// Assigns the next label to every vacant pixel of `footprint`.
    ///
    /// Returns the label used. Already claimed or excluded pixels are left as is.
    pub fn claim_vacant(&mut self, footprint: &Footprint) -> i32 {
        let label = self.next_label;
        let width = self.labels.width();
        let data = self.labels.data_mut();
        for (x, y) in footprint.iter_inside() {
            if let Some(owner) = data.get_mut(y * width + x) {
                if *owner == UNCLAIMED {
                    *owner = label;
                }
            }
        }
        self.next_label += 1;
        label
    }
}

#[cfg(test)]
mod tests {
    use super::{FootprintTally, OwnershipMap, EXCLUDED, UNCLAIMED};
    use crate::contour::Footprint;
    use crate::image::OwnedImage;

    #[test]
    fn from_mask_seeds_exclusions() {
        let mask = OwnedImage::new(vec![1u8, 0, 1, 1], 2, 2).unwrap();
        let map = OwnershipMap::from_mask(mask.view()).unwrap();
        assert_eq!(map.labels(), &[UNCLAIMED, EXCLUDED, UNCLAIMED, UNCLAIMED]);
        assert_eq!(map.accepted_count(), 0);
    }

    #[test]
    fn claim_skips_taken_pixels() {
        let mask = OwnedImage::filled(4, 1, 1u8).unwrap();
        let content = OwnedImage::filled(4, 1, 1u8).unwrap();
        let mut map = OwnershipMap::from_mask(mask.view()).unwrap();

        let first = Footprint::from_rect(0, 0, 2, 1).unwrap();
        assert_eq!(map.claim_vacant(&first), 1);

        let second = Footprint::from_rect(1, 0, 3, 1).unwrap();
        let tally = map.tally(&second, content.view()).unwrap();
        assert_eq!(
            tally,
            FootprintTally {
                claimed: 1,
                vacant: 2,
                vacant_dark: 2,
            }
        );
        assert_eq!(map.claim_vacant(&second), 2);
        assert_eq!(map.labels(), &[1, 1, 2, 2]);
        assert_eq!(map.claimed_count(2), 2);
    }

    #[test]
    fn tally_rejects_footprint_outside_map() {
        let mask = OwnedImage::filled(3, 3, 1u8).unwrap();
        let map = OwnershipMap::from_mask(mask.view()).unwrap();
        let fp = Footprint::from_rect(2, 2, 2, 2).unwrap();
        assert!(map.check_footprint(0, &fp).is_err());
        assert!(map.tally(&fp, mask.view()).is_err());
    }
}
