//! Local binary footprint of a contour placed in image coordinates.

use crate::image::ImageView;
use crate::util::{SnakeFilterError, SnakeFilterResult};

/// Pixels enclosed by a contour, stored as a local mask plus its offset.
///
/// `pixels` is row-major with `width * height` entries; nonzero marks a pixel
/// inside the contour. `(x, y)` is the top-left corner in image coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Footprint {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Footprint {
    /// Creates a footprint from a local mask buffer.
    pub fn new(
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        pixels: Vec<u8>,
    ) -> SnakeFilterResult<Self> {
        if width == 0 || height == 0 {
            return Err(SnakeFilterError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(SnakeFilterError::InvalidDimensions { width, height })?;
        if pixels.len() != needed {
            return Err(SnakeFilterError::BufferTooSmall {
                needed,
                got: pixels.len(),
            });
        }
        Ok(Self {
            x,
            y,
            width,
            height,
            pixels,
        })
    }

    /// Creates a fully filled rectangular footprint.
    pub fn from_rect(x: usize, y: usize, width: usize, height: usize) -> SnakeFilterResult<Self> {
        Self::from_fn(x, y, width, height, |_, _| true)
    }

    /// Creates a footprint whose local pixel `(lx, ly)` is inside when `inside` says so.
    pub fn from_fn<F>(
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        inside: F,
    ) -> SnakeFilterResult<Self>
    where
        F: Fn(usize, usize) -> bool,
    {
        let mut pixels = Vec::with_capacity(width.saturating_mul(height));
        for ly in 0..height {
            for lx in 0..width {
                pixels.push(u8::from(inside(lx, ly)));
            }
        }
        Self::new(x, y, width, height, pixels)
    }

    /// Left edge in image coordinates.
    pub fn x(&self) -> usize {
        self.x
    }

    /// Top edge in image coordinates.
    pub fn y(&self) -> usize {
        self.y
    }

    /// Local mask width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Local mask height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Borrowed view of the local mask.
    pub fn local(&self) -> ImageView<'_, u8> {
        ImageView::contiguous(&self.pixels, self.width, self.height)
    }

    /// Number of pixels inside the contour.
    pub fn pixel_count(&self) -> usize {
        self.pixels.iter().filter(|&&v| v != 0).count()
    }

    /// True when the whole footprint lies inside a `width x height` image.
    pub fn fits_within(&self, width: usize, height: usize) -> bool {
        self.x
            .checked_add(self.width)
            .is_some_and(|end| end <= width)
            && self
                .y
                .checked_add(self.height)
                .is_some_and(|end| end <= height)
    }

    /// Bounding box as `(x0, y0, x1, y1)` with exclusive upper corner.
    ///
    /// The far corner saturates at `usize::MAX`.
    pub fn bounds(&self) -> (usize, usize, usize, usize) {
        (
            self.x,
            self.y,
            self.x.saturating_add(self.width),
            self.y.saturating_add(self.height),
        )
    }

    /// True when the bounding boxes of `self` and `other` share any pixel.
    pub fn bbox_intersects(&self, other: &Footprint) -> bool {
        let (ax0, ay0, ax1, ay1) = self.bounds();
        let (bx0, by0, bx1, by1) = other.bounds();
        ax0 < bx1 && bx0 < ax1 && ay0 < by1 && by0 < ay1
    }

    /// Iterates image coordinates of the pixels inside the contour.
    pub fn iter_inside(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pixels
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0)
            .map(move |(idx, _)| (self.x + idx % self.width, self.y + idx / self.width))
    }
}

#[cfg(test)]
mod tests {
    use super::Footprint;

    #[test]
    fn rejects_wrong_buffer_length() {
        assert!(Footprint::new(0, 0, 2, 2, vec![1, 1, 1]).is_err());
        assert!(Footprint::new(0, 0, 0, 2, Vec::new()).is_err());
    }

    #[test]
    fn iter_inside_is_offset() {
        let fp = Footprint::new(3, 5, 2, 2, vec![1, 0, 0, 1]).unwrap();
        let pts: Vec<_> = fp.iter_inside().collect();
        assert_eq!(pts, vec![(3, 5), (4, 6)]);
        assert_eq!(fp.pixel_count(), 2);
    }

    #[test]
    fn bbox_intersection_is_exclusive_at_edges() {
        let a = Footprint::from_rect(0, 0, 4, 4).unwrap();
        let touching = Footprint::from_rect(4, 0, 2, 2).unwrap();
        let overlapping = Footprint::from_rect(3, 3, 2, 2).unwrap();
        assert!(!a.bbox_intersects(&touching));
        assert!(a.bbox_intersects(&overlapping));
    }

    #[test]
    fn bounds_saturate_for_huge_offsets() {
        let far = Footprint::from_rect(usize::MAX - 1, 0, 4, 2).unwrap();
        assert_eq!(far.bounds(), (usize::MAX - 1, 0, usize::MAX, 2));
        assert!(!far.fits_within(16, 16));
        let near = Footprint::from_rect(0, 0, 4, 4).unwrap();
        assert!(!near.bbox_intersects(&far));
    }

    #[test]
    fn fits_within_checks_far_edge() {
        let fp = Footprint::from_rect(8, 8, 2, 2).unwrap();
        assert!(fp.fits_within(10, 10));
        assert!(!fp.fits_within(9, 10));
    }
}
