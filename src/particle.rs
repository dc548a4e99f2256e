// particle.rs
// The Particle struct and its randomized construction

use crate::config;
use crate::surface::SurfaceSize;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use ultraviolet::Vec2;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// A single translucent circle in the field.
///
/// `radius`, `target_alpha`, `velocity` and `magnetism` are fixed at creation
/// and only exposed through accessors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub id: u64,
    /// Intrinsic position, not including pointer displacement.
    pub pos: Vec2,
    /// Pointer-induced offset applied at render time.
    pub displacement: Vec2,
    pub alpha: f32,
    radius: f32,
    target_alpha: f32,
    velocity: Vec2,
    magnetism: f32,
}

impl Particle {
    pub fn new(pos: Vec2, radius: f32, target_alpha: f32, velocity: Vec2, magnetism: f32) -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            pos,
            displacement: Vec2::zero(),
            alpha: 0.0,
            radius,
            target_alpha,
            velocity,
            magnetism,
        }
    }

    /// Random particle somewhere inside `bounds`, starting fully transparent.
    pub fn spawn(rng: &mut fastrand::Rng, bounds: SurfaceSize, radius: f32) -> Self {
        let pos = Vec2::new(rng.f32() * bounds.width, rng.f32() * bounds.height);
        let target_alpha = quantize(in_range(rng, config::TARGET_ALPHA_RANGE), 1);
        let velocity = Vec2::new(
            quantize(in_range(rng, config::DRIFT_RANGE), 2),
            quantize(in_range(rng, config::DRIFT_RANGE), 2),
        );
        let magnetism = quantize(in_range(rng, config::MAGNETISM_RANGE), 2);
        Self::new(pos, radius, target_alpha, velocity, magnetism)
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn target_alpha(&self) -> f32 {
        self.target_alpha
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn magnetism(&self) -> f32 {
        self.magnetism
    }

    /// Where the particle is drawn: position plus pointer displacement.
    pub fn rendered_pos(&self) -> Vec2 {
        self.pos + self.displacement
    }

    /// True once the rendered position is more than one radius past any edge,
    /// or is no longer a finite point.
    pub fn has_exited(&self, bounds: SurfaceSize) -> bool {
        let p = self.rendered_pos();
        let r = self.radius;
        !p.x.is_finite()
            || !p.y.is_finite()
            || p.x < -r || p.x > bounds.width + r || p.y < -r || p.y > bounds.height + r
    }
}

fn in_range(rng: &mut fastrand::Rng, (lo, hi): (f32, f32)) -> f32 {
    lo + rng.f32() * (hi - lo)
}

/// Round to a fixed number of decimal places.
pub(crate) fn quantize(value: f32, decimals: i32) -> f32 {
    let scale = 10f32.powi(decimals);
    (value * scale).round() / scale
}
