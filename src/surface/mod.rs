// surface/mod.rs
// Drawing surface geometry and the render target abstraction the field draws into

pub mod raster;
pub mod recording;

pub use raster::{RasterHost, RasterSurface};
pub use recording::{DrawCall, RecordingHost, RecordingSurface};

use crate::error::FieldError;
use palette::Srgb;
use serde::{Deserialize, Serialize};
use ultraviolet::Vec2;

/// Logical size of a surface, before pixel-ratio scaling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

impl SurfaceSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when the surface has no drawable area.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn half(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Whether a surface-centered point lies strictly inside the surface.
    pub fn contains_centered(&self, p: Vec2) -> bool {
        let half = self.half();
        p.x < half.x && p.x > -half.x && p.y < half.y && p.y > -half.y
    }

    /// Backing raster dimensions in device pixels.
    pub fn pixel_dims(&self, pixel_ratio: f32) -> (u32, u32) {
        if self.is_empty() {
            return (0, 0);
        }
        let ratio = pixel_ratio.max(0.0);
        (
            (self.width * ratio).ceil() as u32,
            (self.height * ratio).ceil() as u32,
        )
    }
}

/// Bounding rectangle of the surface in screen space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SurfaceRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl SurfaceRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }

    /// A rect placed at the screen origin with the given size.
    pub fn at_origin(size: SurfaceSize) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }
}

/// Something the field can draw circles into.
pub trait RenderTarget {
    /// Resize the backing store for `size` at `pixel_ratio` and reset the drawing scale.
    fn configure(&mut self, size: SurfaceSize, pixel_ratio: f32);
    fn clear(&mut self);
    /// Fill a circle given in logical (unscaled) coordinates.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Srgb<u8>, alpha: f32);
}

/// Hosting environment that owns the surface and hands out a render target.
pub trait SurfaceHost {
    type Target: RenderTarget;

    fn acquire(&mut self) -> Result<Self::Target, FieldError>;
    fn size(&self) -> SurfaceSize;
    fn pixel_ratio(&self) -> f32;
}
