// surface/raster.rs
// Software RGBA raster that blends like a 2D canvas context

use super::{RenderTarget, SurfaceHost, SurfaceSize};
use crate::error::FieldError;
use palette::{Srgb, Srgba};
use std::f32::consts::PI;
use ultraviolet::Vec2;

/// Circles with a device radius below this are drawn as a single pixel.
const SUBPIXEL_RADIUS: f32 = 0.5;

pub struct RasterSurface {
    width_px: u32,
    height_px: u32,
    scale: f32,
    pixels: Vec<Srgba<f32>>,
}

impl RasterSurface {
    pub fn new(size: SurfaceSize, pixel_ratio: f32) -> Self {
        let mut surface = Self {
            width_px: 0,
            height_px: 0,
            scale: 1.0,
            pixels: Vec::new(),
        };
        surface.configure(size, pixel_ratio);
        surface
    }

    pub fn dims(&self) -> (u32, u32) {
        (self.width_px, self.height_px)
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Srgba<f32>> {
        if x >= self.width_px || y >= self.height_px {
            return None;
        }
        self.pixels.get((y * self.width_px + x) as usize).copied()
    }

    /// Sum of alpha over all pixels, a cheap measure of how much was drawn.
    pub fn total_coverage(&self) -> f32 {
        self.pixels.iter().map(|p| p.alpha).sum()
    }

    /// Row-major RGBA8 copy of the raster.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for p in &self.pixels {
            let p: Srgba<u8> = p.into_format();
            out.extend_from_slice(&[p.red, p.green, p.blue, p.alpha]);
        }
        out
    }

    fn blend(&mut self, x: i64, y: i64, color: Srgb<f32>, alpha: f32) {
        if x < 0 || y < 0 || x >= self.width_px as i64 || y >= self.height_px as i64 {
            return;
        }
        let a = alpha.clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let idx = (y as u32 * self.width_px + x as u32) as usize;
        let dst = self.pixels[idx];
        // source-over, non-premultiplied
        let out_a = a + dst.alpha * (1.0 - a);
        if out_a <= 0.0 {
            return;
        }
        let mix = |s: f32, d: f32| (s * a + d * dst.alpha * (1.0 - a)) / out_a;
        self.pixels[idx] = Srgba::new(
            mix(color.red, dst.red),
            mix(color.green, dst.green),
            mix(color.blue, dst.blue),
            out_a,
        );
    }
}

impl RenderTarget for RasterSurface {
    fn configure(&mut self, size: SurfaceSize, pixel_ratio: f32) {
        let (w, h) = size.pixel_dims(pixel_ratio);
        self.width_px = w;
        self.height_px = h;
        // Absolute, so repeated resizes never compound the scale
        self.scale = pixel_ratio;
        self.pixels = vec![Srgba::new(0.0, 0.0, 0.0, 0.0); (w as usize) * (h as usize)];
    }

    fn clear(&mut self) {
        for p in &mut self.pixels {
            *p = Srgba::new(0.0, 0.0, 0.0, 0.0);
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Srgb<u8>, alpha: f32) {
        if self.pixels.is_empty() || alpha <= 0.0 || !center.x.is_finite() || !center.y.is_finite() {
            return;
        }
        let color: Srgb<f32> = color.into_format();
        let c = center * self.scale;
        let r = radius * self.scale;

        if r < SUBPIXEL_RADIUS {
            let coverage = (PI * r * r).min(1.0);
            self.blend(c.x.floor() as i64, c.y.floor() as i64, color, alpha * coverage);
            return;
        }

        let r_sq = r * r;
        let x0 = (c.x - r).floor() as i64;
        let x1 = (c.x + r).ceil() as i64;
        let y0 = (c.y - r).floor() as i64;
        let y1 = (c.y + r).ceil() as i64;
        for y in y0.max(0)..y1.min(self.height_px as i64) {
            for x in x0.max(0)..x1.min(self.width_px as i64) {
                let dx = x as f32 + 0.5 - c.x;
                let dy = y as f32 + 0.5 - c.y;
                if dx * dx + dy * dy <= r_sq {
                    self.blend(x, y, color, alpha);
                }
            }
        }
    }
}

/// Host that hands out software rasters of a fixed size.
#[derive(Clone, Copy, Debug)]
pub struct RasterHost {
    pub size: SurfaceSize,
    pub pixel_ratio: f32,
}

impl RasterHost {
    pub fn new(size: SurfaceSize, pixel_ratio: f32) -> Self {
        Self { size, pixel_ratio }
    }
}

impl SurfaceHost for RasterHost {
    type Target = RasterSurface;

    fn acquire(&mut self) -> Result<RasterSurface, FieldError> {
        if !self.pixel_ratio.is_finite() || self.pixel_ratio <= 0.0 {
            return Err(FieldError::SurfaceUnavailable(format!(
                "invalid pixel ratio {}",
                self.pixel_ratio
            )));
        }
        Ok(RasterSurface::new(self.size, self.pixel_ratio))
    }

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }
}
