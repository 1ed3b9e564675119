//! Packed 1-bit framebuffer, one per ink layer.
//!
//! The e-paper controller takes each layer as rows of bytes, eight pixels per
//! byte, most significant bit first. Drawing targets this RAM buffer; the
//! finished buffers are handed to the display driver in one go.

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// Heap-allocated 1 bpp framebuffer implementing `DrawTarget<Color = BinaryColor>`.
///
/// An 800x480 layer takes 48,000 bytes. `BinaryColor::On` is a set bit (ink).
pub struct MonoFrameBuffer {
    bytes: Vec<u8>,
    size: Size,
    stride: usize,
}

impl MonoFrameBuffer {
    /// Allocate a blank (all paper) buffer of the given size.
    pub fn new(size: Size) -> Self {
        let stride = (size.width as usize).div_ceil(8);
        Self {
            bytes: vec![0; stride * size.height as usize],
            size,
            stride,
        }
    }

    /// Raw rows, `stride` bytes each, MSB is the leftmost pixel
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Bytes per row
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Color of the pixel at `point`, `None` outside the buffer
    pub fn pixel(&self, point: Point) -> Option<BinaryColor> {
        let (index, mask) = self.locate(point.x, point.y)?;
        if self.bytes[index] & mask != 0 {
            Some(BinaryColor::On)
        } else {
            Some(BinaryColor::Off)
        }
    }

    /// Number of inked pixels
    pub fn ink_pixel_count(&self) -> usize {
        self.bytes.iter().map(|b| b.count_ones() as usize).sum()
    }

    #[inline]
    fn locate(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        if x < 0 || y < 0 || x as u32 >= self.size.width || y as u32 >= self.size.height {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        Some((y * self.stride + x / 8, 0x80 >> (x % 8)))
    }

    #[inline]
    fn set_pixel(&mut self, x: i32, y: i32, color: BinaryColor) {
        if let Some((index, mask)) = self.locate(x, y) {
            if color.is_on() {
                self.bytes[index] |= mask;
            } else {
                self.bytes[index] &= !mask;
            }
        }
    }
}

impl OriginDimensions for MonoFrameBuffer {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for MonoFrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            self.set_pixel(coord.x, coord.y, color);
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };

        for y in area.top_left.y..=bottom_right.y {
            for x in area.top_left.x..=bottom_right.x {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        if color.is_on() {
            // Row padding bits stay clear
            return self.fill_solid(&self.bounding_box(), color);
        }
        self.bytes.fill(0);
        Ok(())
    }
}
