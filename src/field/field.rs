// field/field.rs
// ParticleField: pool management, per-frame update and event intake

use std::time::Duration;

use palette::Srgb;
use ultraviolet::Vec2;

use super::physics;
use crate::config::FieldConfig;
use crate::debounce::Debouncer;
use crate::error::FieldError;
use crate::particle::Particle;
use crate::profile_scope;
use crate::surface::{RenderTarget, SurfaceHost, SurfaceRect, SurfaceSize};

/// A resize waiting out the debounce window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeRequest {
    pub size: SurfaceSize,
    pub pixel_ratio: f32,
}

pub struct ParticleField<T: RenderTarget> {
    target: T,
    config: FieldConfig,
    color: Srgb<u8>,
    base_velocity: Vec2,
    particles: Vec<Particle>,
    bounds: SurfaceSize,
    pixel_ratio: f32,
    /// Last accepted pointer target, surface-centered.
    pointer: Vec2,
    rng: fastrand::Rng,
    resize: Debouncer<ResizeRequest>,
    reseed_signal: u64,
    /// Set when a rebuild was requested while the surface had no area.
    rebuild_pending: bool,
    torn_down: bool,
    frame: usize,
    rebuilds: usize,
}

impl<T: RenderTarget> ParticleField<T> {
    /// Acquire a render target from `host` and build the initial pool.
    pub fn new<H>(host: &mut H, config: FieldConfig) -> Result<Self, FieldError>
    where
        H: SurfaceHost<Target = T>,
    {
        let color = config.fill_color()?;
        let target = host.acquire()?;
        let rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        if config.quantity < 0 {
            log::warn!("negative particle quantity {}, pool will be empty", config.quantity);
        }
        if config.staticity == 0.0 || config.ease == 0.0 {
            log::warn!(
                "staticity {} / ease {} will produce non-finite displacement",
                config.staticity,
                config.ease
            );
        }

        let mut field = Self {
            target,
            color,
            base_velocity: config.base_velocity(),
            particles: Vec::with_capacity(config.pool_size()),
            bounds: SurfaceSize::default(),
            pixel_ratio: host.pixel_ratio(),
            pointer: Vec2::zero(),
            rng,
            resize: Debouncer::new(config.debounce_window()),
            reseed_signal: config.reseed,
            rebuild_pending: false,
            torn_down: false,
            frame: 0,
            rebuilds: 0,
            config,
        };
        let size = host.size();
        field.target.configure(size, field.pixel_ratio);
        field.initialize(size);
        Ok(field)
    }

    /// Set the bounds and rebuild the pool. Safe to call repeatedly.
    pub fn initialize(&mut self, size: SurfaceSize) {
        if self.torn_down {
            return;
        }
        self.bounds = size;
        self.rebuild_pool();
    }

    /// Replace the whole pool with `quantity` fresh particles and draw the initial frame.
    ///
    /// On a surface without area the existing pool is left untouched and the
    /// rebuild is retried on the next non-empty resize.
    pub fn rebuild_pool(&mut self) {
        if self.torn_down {
            return;
        }
        profile_scope!("rebuild_pool");
        self.target.clear();
        if self.bounds.is_empty() {
            self.rebuild_pending = true;
            log::debug!("surface has no area, deferring pool rebuild");
            return;
        }

        let count = self.config.pool_size();
        self.particles.clear();
        for _ in 0..count {
            let particle = Particle::spawn(&mut self.rng, self.bounds, self.config.size);
            self.particles.push(particle);
        }
        self.render_pool();
        self.rebuild_pending = false;
        self.rebuilds += 1;
        log::debug!(
            "rebuilt pool of {} particles for {}x{}",
            count,
            self.bounds.width,
            self.bounds.height
        );
    }

    /// Apply a resize immediately: new bounds, rescaled backing raster, full rebuild.
    pub fn resize(&mut self, size: SurfaceSize, pixel_ratio: f32) {
        if self.torn_down {
            return;
        }
        log::debug!(
            "resizing surface to {}x{} at pixel ratio {}",
            size.width,
            size.height,
            pixel_ratio
        );
        self.bounds = size;
        self.pixel_ratio = pixel_ratio;
        self.target.configure(size, pixel_ratio);
        self.rebuild_pool();
    }

    /// Host resize notification. The rebuild happens once the debounce window
    /// passes without a newer notification, see [`Self::poll_timers`].
    pub fn notify_resize(&mut self, size: SurfaceSize, pixel_ratio: f32, now: Duration) {
        if self.torn_down {
            return;
        }
        self.resize.schedule(now, ResizeRequest { size, pixel_ratio });
    }

    /// Fire the debounced resize if it is due. Returns true when a rebuild ran.
    pub fn poll_timers(&mut self, now: Duration) -> bool {
        if self.torn_down {
            return false;
        }
        match self.resize.fire(now) {
            Some(req) => {
                self.resize(req.size, req.pixel_ratio);
                true
            }
            None => false,
        }
    }

    /// Record a pointer position given in screen space. Positions outside the
    /// surface are ignored and the previous target is kept.
    pub fn on_pointer_move(&mut self, screen: Vec2, rect: SurfaceRect) -> bool {
        let local = screen - Vec2::new(rect.left, rect.top) - self.bounds.half();
        if self.bounds.contains_centered(local) {
            self.pointer = local;
            true
        } else {
            false
        }
    }

    /// Rebuild the pool if `signal` differs from the last one seen.
    pub fn reseed(&mut self, signal: u64) -> bool {
        if self.torn_down || signal == self.reseed_signal {
            return false;
        }
        self.reseed_signal = signal;
        self.rebuild_pool();
        true
    }

    /// Unconditional pool rebuild.
    pub fn refresh(&mut self) {
        self.rebuild_pool();
    }

    /// Advance one animation frame and render it.
    ///
    /// Particles that leave the surface are removed after the pass and
    /// replacements are appended to the end of the pool. Replacements are
    /// neither updated nor drawn until the next frame.
    pub fn tick(&mut self) {
        if self.torn_down {
            return;
        }
        profile_scope!("tick");
        self.target.clear();
        self.frame += 1;
        if self.bounds.is_empty() {
            return;
        }

        let bounds = self.bounds;
        let pointer = self.pointer;
        let (staticity, ease) = (self.config.staticity, self.config.ease);
        let mut exited = 0;
        {
            profile_scope!("update_render");
            for p in self.particles.iter_mut() {
                let fade = physics::edge_fade(p, bounds);
                physics::update_alpha(p, fade);
                physics::drift(p, self.base_velocity);
                physics::ease_displacement(p, pointer, staticity, ease);
                self.target
                    .fill_circle(p.rendered_pos(), p.radius(), self.color, p.alpha);
                if p.has_exited(bounds) {
                    exited += 1;
                }
            }
        }

        if exited > 0 {
            self.particles.retain(|p| !p.has_exited(bounds));
            for _ in 0..exited {
                let particle = Particle::spawn(&mut self.rng, bounds, self.config.size);
                self.particles.push(particle);
            }
            log::trace!("frame {}: replaced {} particles", self.frame, exited);
        }
    }

    /// Stop the field: no further ticks or rebuilds, pending resize dropped.
    pub fn teardown(&mut self) {
        if !self.torn_down {
            log::debug!("tearing down particle field after {} frames", self.frame);
        }
        self.torn_down = true;
        self.resize.cancel();
    }

    pub(crate) fn render_pool(&mut self) {
        profile_scope!("render");
        for p in &self.particles {
            self.target
                .fill_circle(p.rendered_pos(), p.radius(), self.color, p.alpha);
        }
    }

    /// Replace bounds, pointer, frame counter and pool wholesale. Any
    /// debounced resize still pending is dropped.
    pub(crate) fn restore_parts(
        &mut self,
        bounds: SurfaceSize,
        pixel_ratio: f32,
        pointer: Vec2,
        frame: usize,
        particles: Vec<Particle>,
    ) {
        self.bounds = bounds;
        self.pixel_ratio = pixel_ratio;
        self.pointer = pointer;
        self.frame = frame;
        self.particles = particles;
        self.rebuild_pending = false;
        self.resize.cancel();
        self.target.configure(bounds, pixel_ratio);
        self.target.clear();
        self.render_pool();
    }

    #[cfg(test)]
    pub(crate) fn particles_mut(&mut self) -> &mut Vec<Particle> {
        &mut self.particles
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn bounds(&self) -> SurfaceSize {
        self.bounds
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Frames advanced since construction.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Completed pool rebuilds since construction.
    pub fn rebuild_count(&self) -> usize {
        self.rebuilds
    }

    pub fn is_rebuild_pending(&self) -> bool {
        self.rebuild_pending
    }

    pub fn has_pending_resize(&self) -> bool {
        self.resize.is_pending()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }
}
