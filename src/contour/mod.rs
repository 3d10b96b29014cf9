//! Candidate contours ("snakes") and their quality metrics.
//!
//! A candidate carries a priority rank (lower is better), the scalar metrics
//! consulted by the quality gate, and a local footprint locating its enclosed
//! pixels in the image.

mod footprint;

pub use footprint::Footprint;

use crate::image::ImageView;
use crate::util::math::fraction;
use crate::util::{SnakeFilterError, SnakeFilterResult};

/// Sentinel rank marking a candidate as invalid or unranked.
pub const MAX_RANK: f64 = 100_000.0;

/// Floor added to areas so darkness and overlap ratios never divide by zero.
pub const AREA_EPSILON: f64 = 1e-10;

/// Scalar metrics evaluated by the quality gate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnakeMetrics {
    /// Enclosed pixel count (floored at [`AREA_EPSILON`]).
    pub area: f64,
    /// Fraction of enclosed pixels lying inside the cell-content region.
    pub avg_inner_darkness: f64,
    /// Longest run of boundary points without supporting evidence.
    pub max_contiguous_free_border: usize,
}

/// One candidate contour proposed for the image.
#[derive(Clone, Debug, PartialEq)]
pub struct SnakeCandidate {
    /// Priority score; lower ranks are evaluated first.
    pub rank: f64,
    /// Enclosed pixel count.
    pub area: f64,
    /// Fraction of enclosed pixels inside the cell-content region, in `[0, 1]`.
    pub avg_inner_darkness: f64,
    /// Longest unsupported boundary run, in star points.
    pub max_contiguous_free_border: usize,
    /// Enclosed pixels in image coordinates.
    pub footprint: Footprint,
}

impl SnakeCandidate {
    /// Creates a candidate, flooring `area` at [`AREA_EPSILON`].
    pub fn new(
        rank: f64,
        area: f64,
        avg_inner_darkness: f64,
        max_contiguous_free_border: usize,
        footprint: Footprint,
    ) -> Self {
        Self {
            rank,
            area: area.max(AREA_EPSILON),
            avg_inner_darkness,
            max_contiguous_free_border,
            footprint,
        }
    }

    /// Creates a candidate whose area and darkness are measured from its footprint.
    ///
    /// `cell_content` must cover the whole image the footprint is placed in.
    pub fn from_footprint(
        rank: f64,
        footprint: Footprint,
        cell_content: ImageView<'_, u8>,
        max_contiguous_free_border: usize,
    ) -> SnakeFilterResult<Self> {
        let (img_width, img_height) = cell_content.dims();
        if !footprint.fits_within(img_width, img_height) {
            return Err(SnakeFilterError::FootprintOutOfBounds {
                index: 0,
                x: footprint.x(),
                y: footprint.y(),
                width: footprint.width(),
                height: footprint.height(),
                img_width,
                img_height,
            });
        }
        let inside = footprint.pixel_count();
        let dark = footprint
            .iter_inside()
            .filter(|&(x, y)| cell_content.is_set(x, y))
            .count();
        let area = inside as f64 + AREA_EPSILON;
        Ok(Self {
            rank,
            area,
            avg_inner_darkness: fraction(dark, area),
            max_contiguous_free_border,
            footprint,
        })
    }

    /// Returns the metrics the quality gate evaluates.
    pub fn metrics(&self) -> SnakeMetrics {
        SnakeMetrics {
            area: self.area,
            avg_inner_darkness: self.avg_inner_darkness,
            max_contiguous_free_border: self.max_contiguous_free_border,
        }
    }

    /// True when the rank is the invalid sentinel, worse, or NaN.
    pub fn has_sentinel_rank(&self) -> bool {
        self.rank.is_nan() || self.rank >= MAX_RANK
    }
}
