//! Owned contiguous grids.

use crate::image::ImageView;
use crate::util::{SnakeFilterError, SnakeFilterResult};

/// Owned contiguous 2D buffer (`stride == width`).
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedImage<T> {
    data: Vec<T>,
    width: usize,
    height: usize,
}

impl<T> OwnedImage<T> {
    /// Wraps a row-major buffer of exactly `width * height` elements.
    pub fn new(data: Vec<T>, width: usize, height: usize) -> SnakeFilterResult<Self> {
        let needed = checked_area(width, height)?;
        if data.len() < needed {
            return Err(SnakeFilterError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(SnakeFilterError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(width, height)`.
    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Returns the row-major pixel buffer.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consumes the grid and returns its buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Returns a borrowed view over the whole grid.
    pub fn view(&self) -> ImageView<'_, T> {
        ImageView::contiguous(&self.data, self.width, self.height)
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x)
    }

    /// Returns a mutable reference to the element at `(x, y)`.
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get_mut(y * self.width + x)
    }
}

impl<T: Clone> OwnedImage<T> {
    /// Creates a grid with every element set to `value`.
    pub fn filled(width: usize, height: usize, value: T) -> SnakeFilterResult<Self> {
        let needed = checked_area(width, height)?;
        Ok(Self {
            data: vec![value; needed],
            width,
            height,
        })
    }

    /// Copies a (possibly strided) view into a contiguous grid.
    pub fn from_view(view: ImageView<'_, T>) -> SnakeFilterResult<Self> {
        let width = view.width();
        let height = view.height();
        let mut data = Vec::with_capacity(checked_area(width, height)?);
        for y in 0..height {
            let row = view.row(y).ok_or(SnakeFilterError::BufferTooSmall {
                needed: y * view.stride() + width,
                got: view.as_slice().len(),
            })?;
            data.extend_from_slice(row);
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }
}

fn checked_area(width: usize, height: usize) -> SnakeFilterResult<usize> {
    if width == 0 || height == 0 {
        return Err(SnakeFilterError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(SnakeFilterError::InvalidDimensions { width, height })
}

#[cfg(test)]
mod tests {
    use super::OwnedImage;
    use crate::image::ImageView;

    #[test]
    fn from_view_drops_row_padding() {
        let data = [1u8, 2, 9, 3, 4, 9];
        let view = ImageView::new(&data, 2, 2, 3).unwrap();
        let owned = OwnedImage::from_view(view).unwrap();
        assert_eq!(owned.data(), &[1, 2, 3, 4]);
        assert_eq!(owned.view().stride(), 2);
    }

    #[test]
    fn filled_and_get_mut() {
        let mut grid = OwnedImage::filled(3, 2, 0i32).unwrap();
        *grid.get_mut(2, 1).unwrap() = 7;
        assert_eq!(grid.get(2, 1), Some(&7));
        assert!(grid.get(3, 0).is_none());
        assert_eq!(grid.data().iter().sum::<i32>(), 7);
    }
}
