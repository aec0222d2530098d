//! Host-side binary framebuffer for previews and tests.

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::Pixel;

/// In-memory 1bpp `DrawTarget` with a PGM writer.
///
/// Pixels are row-packed MSB-first with rows padded to byte boundaries,
/// the same convention as [`IconRaster`](crate::IconRaster) and an e-ink
/// panel buffer. Ink-on bits render black on a white page.
#[derive(Clone, Debug)]
pub struct BitmapDisplay {
    width: u32,
    height: u32,
    rows: Vec<u8>,
}

impl BitmapDisplay {
    /// Create a cleared (all-off) framebuffer.
    pub fn new(width: u32, height: u32) -> Self {
        let stride = width.div_ceil(8) as usize;
        Self {
            width,
            height,
            rows: vec![0u8; stride * height as usize],
        }
    }

    fn stride(&self) -> u32 {
        self.width.div_ceil(8)
    }

    /// Pixel state at `(x, y)`; `None` outside the framebuffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<bool> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.stride() + x / 8) as usize;
        Some(self.rows[idx] & (0x80 >> (x % 8)) != 0)
    }

    /// Iterate pixel states in row-major order as plain bools.
    ///
    /// Row padding bits are skipped.
    pub fn pixels(&self) -> impl Iterator<Item = bool> + '_ {
        let (width, height) = (self.width, self.height);
        (0..height).flat_map(move |y| (0..width).map(move |x| self.pixel(x, y).unwrap_or(false)))
    }

    /// Encode as binary PGM, ink mapped to black.
    pub fn to_pgm(&self) -> Vec<u8> {
        let len = self.width as usize * self.height as usize;
        let mut data = Vec::with_capacity(len + 64);
        data.extend_from_slice(format!("P5\n{} {}\n255\n", self.width, self.height).as_bytes());
        data.extend(self.pixels().map(|on| if on { 0u8 } else { 255u8 }));
        data
    }

    /// Write the PGM encoding to `path`.
    pub fn save_pgm(&self, path: &str) -> Result<(), String> {
        std::fs::write(path, self.to_pgm()).map_err(|e| e.to_string())
    }
}

impl OriginDimensions for BitmapDisplay {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for BitmapDisplay {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let w = self.width as i32;
        let h = self.height as i32;
        let stride = self.stride();
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 || point.x >= w || point.y >= h {
                continue;
            }
            let (x, y) = (point.x as u32, point.y as u32);
            let idx = (y * stride + x / 8) as usize;
            let mask = 0x80 >> (x % 8);
            match color {
                BinaryColor::On => self.rows[idx] |= mask,
                BinaryColor::Off => self.rows[idx] &= !mask,
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        // Padding bits get filled too; they are never read back.
        let fill = match color {
            BinaryColor::On => 0xFFu8,
            BinaryColor::Off => 0x00u8,
        };
        self.rows.fill(fill);
        Ok(())
    }
}
