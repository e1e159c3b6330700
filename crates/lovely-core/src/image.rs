//! Owned 8-bit RGB raster used as the output of the image views.

use std::io::Write;
use std::path::Path;

use crate::colormap::Rgb;
use crate::error::{LovelyError, Result};

/// A `width x height` image with 8-bit RGB pixels in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImage {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl RgbImage {
    /// Create an image filled with `fill`.
    pub fn new(width: usize, height: usize, fill: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; width * height],
        }
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// All pixels, row by row.
    #[inline]
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Pixel at column `x`, row `y`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    /// Set the pixel at column `x`, row `y`. Out-of-bounds writes are ignored.
    #[inline]
    pub fn put(&mut self, x: usize, y: usize, color: Rgb) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    /// Fill a rectangle, clipped to the image.
    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: Rgb) {
        let x_end = (x + w).min(self.width);
        let y_end = (y + h).min(self.height);
        for row in y..y_end {
            for col in x..x_end {
                self.pixels[row * self.width + col] = color;
            }
        }
    }

    /// Copy `src` with its top-left corner at (`x`, `y`), clipped to the image.
    pub fn blit(&mut self, src: &RgbImage, x: usize, y: usize) {
        for row in 0..src.height {
            let dy = y + row;
            if dy >= self.height {
                break;
            }
            for col in 0..src.width {
                let dx = x + col;
                if dx >= self.width {
                    break;
                }
                self.pixels[dy * self.width + dx] = src.pixels[row * src.width + col];
            }
        }
    }

    /// Nearest-neighbour up-scaling by an integer factor.
    ///
    /// Fails when the scaled size does not fit in `usize`.
    pub fn upscale(&self, factor: usize) -> Result<RgbImage> {
        if factor <= 1 {
            return Ok(self.clone());
        }
        let (Some(width), Some(height)) = (
            self.width.checked_mul(factor),
            self.height.checked_mul(factor),
        ) else {
            return Err(LovelyError::invalid_argument(format!(
                "cannot scale a {}x{} image by {factor}",
                self.width, self.height
            )));
        };
        let mut out = RgbImage::new(width, height, Rgb::BLACK);
        for y in 0..out.height {
            for x in 0..out.width {
                out.pixels[y * out.width + x] = self.pixels[(y / factor) * self.width + x / factor];
            }
        }
        Ok(out)
    }

    /// Encode as binary PPM (`P6`).
    pub fn to_ppm(&self) -> Vec<u8> {
        let header = format!("P6\n{} {}\n255\n", self.width, self.height);
        let mut out = Vec::with_capacity(header.len() + self.pixels.len() * 3);
        out.extend_from_slice(header.as_bytes());
        for p in &self.pixels {
            out.extend_from_slice(&[p.r, p.g, p.b]);
        }
        out
    }

    /// Write the image to `path` as binary PPM.
    pub fn save_ppm(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut file = std::fs::File::create(path).map_err(|e| LovelyError::io(path, e))?;
        file.write_all(&self.to_ppm())
            .map_err(|e| LovelyError::io(path, e))?;
        tracing::debug!(path = %path.display(), width = self.width, height = self.height, "saved image");
        Ok(())
    }
}
