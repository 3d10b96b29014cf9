//! Image context consumed and updated by a filter pass.
//!
//! The filter reads the validity mask and the cell-content mask from the
//! context and writes the finalized ownership map back as the segmentation.

use crate::image::{BinaryMask, ImageView};
use crate::ownership::OwnershipMap;
use crate::util::{SnakeFilterError, SnakeFilterResult};

/// Source of the masks a filter pass needs, and sink for its segmentation.
pub trait ImageContext {
    /// Validity mask; nonzero pixels may be claimed.
    fn mask(&self) -> ImageView<'_, u8>;

    /// Cell-content region used to measure inner darkness.
    fn cell_content_mask(&self) -> ImageView<'_, u8>;

    /// Stores the finalized ownership map.
    fn set_segmentation(&mut self, segmentation: OwnershipMap);
}

/// Owned masks plus the most recent segmentation.
#[derive(Clone, Debug)]
pub struct ImageRepo {
    mask: BinaryMask,
    cell_content: BinaryMask,
    segmentation: Option<OwnershipMap>,
}

impl ImageRepo {
    /// Creates a context from a validity mask and a cell-content mask of equal size.
    pub fn new(mask: BinaryMask, cell_content: BinaryMask) -> SnakeFilterResult<Self> {
        if mask.dims() != cell_content.dims() {
            return Err(SnakeFilterError::DimensionMismatch {
                expected: mask.dims(),
                got: cell_content.dims(),
                context: "cell-content mask",
            });
        }
        Ok(Self {
            mask,
            cell_content,
            segmentation: None,
        })
    }

    /// Creates a context whose validity mask covers the whole image.
    pub fn unmasked(cell_content: BinaryMask) -> SnakeFilterResult<Self> {
        let mask = BinaryMask::filled(cell_content.width(), cell_content.height(), 1)?;
        Self::new(mask, cell_content)
    }

    /// Returns `(width, height)`.
    pub fn dims(&self) -> (usize, usize) {
        self.mask.dims()
    }

    /// Segmentation written by the last filter pass, if any.
    pub fn segmentation(&self) -> Option<&OwnershipMap> {
        self.segmentation.as_ref()
    }

    /// Removes and returns the stored segmentation.
    pub fn take_segmentation(&mut self) -> Option<OwnershipMap> {
        self.segmentation.take()
    }
}

impl ImageContext for ImageRepo {
    fn mask(&self) -> ImageView<'_, u8> {
        self.mask.view()
    }

    fn cell_content_mask(&self) -> ImageView<'_, u8> {
        self.cell_content.view()
    }

    fn set_segmentation(&mut self, segmentation: OwnershipMap) {
        self.segmentation = Some(segmentation);
    }
}
