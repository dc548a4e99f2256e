// field/physics.rs
// Per-particle update steps: edge fade, drift and pointer displacement

use crate::config::{ALPHA_STEP, EDGE_FADE_DISTANCE};
use crate::particle::{quantize, Particle};
use crate::surface::SurfaceSize;
use ultraviolet::Vec2;

/// Linear remap of `value` from `[start1, end1]` to `[start2, end2]`.
/// Negative results clamp to zero; the upper end is left unclamped.
pub fn remap(value: f32, start1: f32, end1: f32, start2: f32, end2: f32) -> f32 {
    let remapped = (value - start1) * (end2 - start2) / (end1 - start1) + start2;
    if remapped > 0.0 {
        remapped
    } else {
        0.0
    }
}

/// Distances from the rendered circle to the left, right, top and bottom edges.
pub fn edge_distances(p: &Particle, bounds: SurfaceSize) -> [f32; 4] {
    let pos = p.rendered_pos();
    let r = p.radius();
    [
        pos.x - r,
        bounds.width - pos.x - r,
        pos.y - r,
        bounds.height - pos.y - r,
    ]
}

/// Edge proximity factor: 0 on an edge, 1 at `EDGE_FADE_DISTANCE`, above 1 further in.
pub fn edge_fade(p: &Particle, bounds: SurfaceSize) -> f32 {
    let closest = edge_distances(p, bounds)
        .into_iter()
        .fold(f32::INFINITY, f32::min);
    quantize(remap(closest, 0.0, EDGE_FADE_DISTANCE, 0.0, 1.0), 2)
}

/// Fade in gradually away from edges, snap to a proportional alpha near them.
pub fn update_alpha(p: &mut Particle, fade: f32) {
    if fade > 1.0 {
        p.alpha = (p.alpha + ALPHA_STEP).min(p.target_alpha());
    } else {
        p.alpha = p.target_alpha() * fade;
    }
}

pub fn drift(p: &mut Particle, base_velocity: Vec2) {
    p.pos += p.velocity() + base_velocity;
}

/// One exponential-smoothing step of the displacement toward the pointer target.
pub fn ease_displacement(p: &mut Particle, pointer: Vec2, staticity: f32, ease: f32) {
    let target = pointer * p.magnetism() / staticity;
    p.displacement += (target - p.displacement) / ease;
}
