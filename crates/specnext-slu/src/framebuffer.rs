//! Frame buffer in display format.

use crate::error::SluError;

/// Width in pixels: 320 columns at double horizontal resolution.
pub const FB_WIDTH: usize = 640;
/// Height in rows, before vertical doubling.
pub const FB_HEIGHT: usize = 256;

/// Row-major `rgb16` pixels.
pub struct FrameBuffer {
    pixels: Vec<u16>,
    width: usize,
    height: usize,
}

impl FrameBuffer {
    /// Allocate a black frame buffer.
    ///
    /// # Errors
    ///
    /// Returns [`SluError::FrameBufferAlloc`] when the pixels cannot be
    /// reserved.
    pub fn new(width: usize, height: usize) -> Result<Self, SluError> {
        let len = width
            .checked_mul(height)
            .ok_or(SluError::FrameBufferAlloc { width, height })?;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| SluError::FrameBufferAlloc { width, height })?;
        pixels.resize(len, 0);
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn pixels(&self) -> &[u16] {
        &self.pixels
    }

    /// Pixel at `(row, column)`, or `None` off the edge.
    #[must_use]
    pub fn get(&self, row: u32, column: u32) -> Option<u16> {
        self.offset(row, column).map(|i| self.pixels[i])
    }

    /// Store a pixel. Coordinates off the edge are dropped.
    pub fn set(&mut self, row: u32, column: u32, rgb16: u16) {
        if let Some(i) = self.offset(row, column) {
            self.pixels[i] = rgb16;
        }
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    fn offset(&self, row: u32, column: u32) -> Option<usize> {
        let (row, column) = (row as usize, column as usize);
        (row < self.height && column < self.width).then_some(row * self.width + column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_black() {
        let fb = FrameBuffer::new(FB_WIDTH, FB_HEIGHT).unwrap();
        assert_eq!((fb.width(), fb.height()), (FB_WIDTH, FB_HEIGHT));
        assert_eq!(fb.pixels().len(), FB_WIDTH * FB_HEIGHT);
        assert!(fb.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn set_is_row_major_and_bounded() {
        let mut fb = FrameBuffer::new(4, 2).unwrap();
        fb.set(1, 2, 0xE000);
        assert_eq!(fb.pixels()[6], 0xE000);
        assert_eq!(fb.get(1, 2), Some(0xE000));

        fb.set(2, 0, 0xFFFF);
        fb.set(0, 4, 0xFFFF);
        assert!(!fb.pixels().contains(&0xFFFF));
        assert_eq!(fb.get(0, 4), None);
    }

    #[test]
    fn impossible_allocation_is_an_error() {
        let err = FrameBuffer::new(usize::MAX / 2, 1).err();
        assert!(matches!(
            err,
            Some(SluError::FrameBufferAlloc { height: 1, .. })
        ));
    }

    #[test]
    fn overflowing_size_is_an_error() {
        let err = FrameBuffer::new(usize::MAX, 2).err();
        assert!(matches!(
            err,
            Some(SluError::FrameBufferAlloc {
                width: usize::MAX,
                height: 2
            })
        ));
    }
}
