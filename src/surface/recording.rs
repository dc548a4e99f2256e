// surface/recording.rs
// Render target that records draw calls instead of rasterizing them

use super::{RenderTarget, SurfaceHost, SurfaceSize};
use crate::error::FieldError;
use palette::Srgb;
use ultraviolet::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCall {
    pub center: Vec2,
    pub radius: f32,
    pub color: Srgb<u8>,
    pub alpha: f32,
}

/// Keeps the draw calls issued since the last clear.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub size: SurfaceSize,
    pub pixel_ratio: f32,
    /// Draw calls issued since the most recent `clear`.
    pub calls: Vec<DrawCall>,
    pub clears: usize,
    pub configures: usize,
    /// Total draw calls over the surface's lifetime.
    pub total_draws: usize,
}

impl RenderTarget for RecordingSurface {
    fn configure(&mut self, size: SurfaceSize, pixel_ratio: f32) {
        self.size = size;
        self.pixel_ratio = pixel_ratio;
        self.configures += 1;
        self.calls.clear();
    }

    fn clear(&mut self) {
        self.clears += 1;
        self.calls.clear();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Srgb<u8>, alpha: f32) {
        self.total_draws += 1;
        self.calls.push(DrawCall {
            center,
            radius,
            color,
            alpha,
        });
    }
}

/// Host backed by a `RecordingSurface`. `fail` simulates a host with no drawing context.
#[derive(Clone, Copy, Debug)]
pub struct RecordingHost {
    pub size: SurfaceSize,
    pub pixel_ratio: f32,
    pub fail: bool,
}

impl RecordingHost {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            pixel_ratio: 1.0,
            fail: false,
        }
    }
}

impl SurfaceHost for RecordingHost {
    type Target = RecordingSurface;

    fn acquire(&mut self) -> Result<RecordingSurface, FieldError> {
        if self.fail {
            return Err(FieldError::SurfaceUnavailable(
                "recording host configured to fail".into(),
            ));
        }
        Ok(RecordingSurface::default())
    }

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }
}
