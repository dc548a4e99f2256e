// Particle field behaviour tests: pool invariants, fading, replacement, events

use super::field::ParticleField;
use crate::config::FieldConfig;
use crate::error::FieldError;
use crate::surface::{RecordingHost, RecordingSurface, SurfaceRect, SurfaceSize};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use ultraviolet::Vec2;

fn surface() -> SurfaceSize {
    SurfaceSize::new(400.0, 300.0)
}

fn config(quantity: i32, seed: u64) -> FieldConfig {
    FieldConfig {
        quantity,
        seed: Some(seed),
        ..Default::default()
    }
}

fn field(quantity: i32, seed: u64) -> ParticleField<RecordingSurface> {
    let mut host = RecordingHost::new(surface());
    ParticleField::new(&mut host, config(quantity, seed)).unwrap()
}

fn ids(field: &ParticleField<RecordingSurface>) -> Vec<u64> {
    field.particles().iter().map(|p| p.id).collect()
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[cfg(test)]
mod pool {
    use super::*;

    #[test]
    fn pool_size_is_constant_across_frames() {
        for &quantity in &[0, 1, 37, 100, 300] {
            let mut host = RecordingHost::new(surface());
            let cfg = FieldConfig {
                base_velocity: [3.0, 0.0],
                ..config(quantity, 11)
            };
            let mut f = ParticleField::new(&mut host, cfg).unwrap();
            let initial: HashSet<u64> = ids(&f).into_iter().collect();
            for frame in 0..400 {
                let x = (frame % 400) as f32;
                f.on_pointer_move(Vec2::new(x, 150.0), SurfaceRect::at_origin(surface()));
                f.tick();
                assert_eq!(f.particles().len(), quantity as usize, "frame {}", frame);
            }
            if quantity > 0 {
                // constant drift pushes everything out within 400 frames
                assert!(ids(&f).iter().all(|id| !initial.contains(id)));
            }
        }
    }

    #[test]
    fn negative_quantity_gives_empty_pool() {
        let mut f = field(-10, 1);
        assert!(f.particles().is_empty());
        for _ in 0..10 {
            f.tick();
        }
        assert!(f.particles().is_empty());
        assert!(f.target().calls.is_empty());
    }

    #[test]
    fn initialize_twice_does_not_grow_pool() {
        let mut f = field(50, 2);
        let first: HashSet<u64> = ids(&f).into_iter().collect();
        f.initialize(surface());
        let second: HashSet<u64> = ids(&f).into_iter().collect();
        f.initialize(surface());
        let third: Vec<u64> = ids(&f);

        assert_eq!(first.len(), 50);
        assert_eq!(second.len(), 50);
        assert_eq!(third.len(), 50);
        assert!(first.is_disjoint(&second));
        assert!(third.iter().all(|id| !second.contains(id)));
        assert_eq!(third.iter().collect::<HashSet<_>>().len(), 50);
        assert_eq!(f.rebuild_count(), 3);
    }

    #[test]
    fn rebuild_draws_initial_transparent_frame() {
        let f = field(25, 3);
        let calls = &f.target().calls;
        assert_eq!(calls.len(), 25);
        assert!(calls.iter().all(|c| c.alpha == 0.0));
    }
}

#[cfg(test)]
mod alpha {
    use super::*;

    #[test]
    fn alpha_stays_within_target_every_frame() {
        let mut f = field(200, 5);
        for frame in 0..600 {
            let t = frame as f32 * 0.05;
            let screen = Vec2::new(200.0 + 150.0 * t.cos(), 150.0 + 100.0 * t.sin());
            f.on_pointer_move(screen, SurfaceRect::at_origin(surface()));
            f.tick();
            for p in f.particles() {
                assert!(p.alpha >= 0.0, "negative alpha on frame {}", frame);
                assert!(p.alpha <= p.target_alpha(), "alpha above target on frame {}", frame);
            }
        }
    }

    #[test]
    fn fixed_parameters_never_change() {
        let mut f = field(150, 6);
        let mut seen: HashMap<u64, (f32, f32, Vec2, f32)> = HashMap::new();
        for _ in 0..500 {
            f.on_pointer_move(Vec2::new(320.0, 40.0), SurfaceRect::at_origin(surface()));
            f.tick();
            for p in f.particles() {
                let params = (p.radius(), p.target_alpha(), p.velocity(), p.magnetism());
                let first = *seen.entry(p.id).or_insert(params);
                assert_eq!(first, params, "particle {} changed", p.id);
            }
        }
    }

    #[test]
    fn particle_near_edge_snaps_to_proportional_alpha() {
        let mut f = field(1, 7);
        {
            let p = &mut f.particles_mut()[0];
            // rendered left edge of the circle sits 5 units from the surface edge
            p.pos = Vec2::new(5.0 + p.radius(), 150.0);
            p.alpha = p.target_alpha();
        }
        let target = f.particles()[0].target_alpha();
        f.tick();
        let p = &f.particles()[0];
        assert!((p.alpha - target * 0.25).abs() < 1e-6);
        assert!((f.target().calls[0].alpha - target * 0.25).abs() < 1e-6);
    }

    #[test]
    fn particle_near_bottom_edge_fades_by_its_distance() {
        let mut f = field(1, 24);
        {
            let p = &mut f.particles_mut()[0];
            // bottom of the circle sits 5 units above the surface edge
            p.pos = Vec2::new(200.0, 300.0 - p.radius() - 5.0);
            p.alpha = p.target_alpha();
        }
        let target = f.particles()[0].target_alpha();
        f.tick();
        let p = &f.particles()[0];
        assert!((p.alpha - target * 0.25).abs() < 1e-6);
        assert!((f.target().calls[0].alpha - target * 0.25).abs() < 1e-6);
    }

    #[test]
    fn interior_particle_fades_in_by_fixed_step() {
        let mut f = field(1, 8);
        f.particles_mut()[0].pos = Vec2::new(200.0, 150.0);
        f.tick();
        let p = &f.particles()[0];
        assert!((p.alpha - 0.02_f32.min(p.target_alpha())).abs() < 1e-6);
        f.tick();
        let p = &f.particles()[0];
        assert!((p.alpha - 0.04_f32.min(p.target_alpha())).abs() < 1e-6);
    }
}

#[cfg(test)]
mod replacement {
    use super::*;

    #[test]
    fn particle_past_right_edge_is_replaced_in_same_tick() {
        let mut f = field(3, 9);
        for p in f.particles_mut().iter_mut() {
            p.pos = Vec2::new(200.0, 150.0);
        }
        let leaving = {
            let p = &mut f.particles_mut()[1];
            p.pos = Vec2::new(400.0 + p.radius() + 5.0, 150.0);
            p.id
        };
        let before = ids(&f);

        f.tick();

        let after = ids(&f);
        assert_eq!(after.len(), 3);
        assert!(!after.contains(&leaving));
        assert_eq!(after[0], before[0]);
        assert_eq!(after[1], before[2]);
        let fresh = &f.particles()[2];
        assert!(!before.contains(&fresh.id));
        assert_eq!(fresh.alpha, 0.0);
        assert_eq!(fresh.displacement, Vec2::zero());
        // the replacement is not drawn in the frame it was created
        assert_eq!(f.target().calls.len(), 3);
    }

    #[test]
    fn particle_past_bottom_edge_is_replaced_in_same_tick() {
        let mut f = field(2, 25);
        f.particles_mut()[0].pos = Vec2::new(200.0, 150.0);
        let leaving = {
            let p = &mut f.particles_mut()[1];
            p.pos = Vec2::new(200.0, 300.0 + p.radius() + 5.0);
            p.id
        };
        let kept = f.particles()[0].id;

        f.tick();

        let after = ids(&f);
        assert_eq!(after.len(), 2);
        assert_eq!(after[0], kept);
        assert!(!after.contains(&leaving));
        let fresh = &f.particles()[1];
        assert!(fresh.pos.y >= 0.0 && fresh.pos.y <= 300.0);
    }

    #[test]
    fn degenerate_easing_recycles_instead_of_freezing() {
        let mut host = RecordingHost::new(surface());
        let cfg = FieldConfig {
            staticity: 0.0,
            ease: 0.0,
            ..config(20, 26)
        };
        let mut f = ParticleField::new(&mut host, cfg).unwrap();
        for frame in 0..50 {
            let before: HashSet<u64> = ids(&f).into_iter().collect();
            f.tick();
            assert_eq!(f.particles().len(), 20, "frame {}", frame);
            // every particle ends its first tick at a non-finite displacement
            assert!(ids(&f).iter().all(|id| !before.contains(id)), "frame {}", frame);
            for p in f.particles() {
                assert_eq!(p.displacement, Vec2::zero());
                assert!(p.alpha >= 0.0 && p.alpha <= p.target_alpha());
            }
        }
    }

    #[test]
    fn replacement_spawns_inside_bounds() {
        let mut f = field(1, 10);
        f.particles_mut()[0].pos = Vec2::new(-10.0, -10.0);
        f.tick();
        let p = &f.particles()[0];
        assert!(p.pos.x >= 0.0 && p.pos.x <= 400.0);
        assert!(p.pos.y >= 0.0 && p.pos.y <= 300.0);
    }
}

#[cfg(test)]
mod pointer {
    use super::*;

    #[test]
    fn out_of_bounds_pointer_is_ignored() {
        let mut f = field(10, 12);
        let rect = SurfaceRect::at_origin(surface());
        assert!(f.on_pointer_move(Vec2::new(300.0, 200.0), rect));
        let before = f.pointer();
        assert_eq!(before, Vec2::new(100.0, 50.0));

        assert!(!f.on_pointer_move(Vec2::new(-50.0, 150.0), rect));
        assert_eq!(f.pointer(), before);
    }

    #[test]
    fn pointer_is_translated_by_surface_rect() {
        let mut f = field(10, 13);
        let rect = SurfaceRect::new(100.0, 50.0, 400.0, 300.0);
        assert!(f.on_pointer_move(Vec2::new(300.0, 200.0), rect));
        assert_eq!(f.pointer(), Vec2::zero());
        // inside the screen, outside the offset surface
        assert!(!f.on_pointer_move(Vec2::new(50.0, 200.0), rect));
        assert_eq!(f.pointer(), Vec2::zero());
    }

    #[test]
    fn displacement_eases_toward_pointer() {
        let mut f = field(1, 14);
        f.particles_mut()[0].pos = Vec2::new(200.0, 150.0);
        f.on_pointer_move(Vec2::new(350.0, 50.0), SurfaceRect::at_origin(surface()));
        f.tick();
        let p = &f.particles()[0];
        let expected = Vec2::new(150.0, -100.0) * p.magnetism() / 50.0 / 50.0;
        assert!((p.displacement - expected).mag() < 1e-5);
    }

    #[test]
    fn fields_do_not_share_pointer_state() {
        let mut a = field(5, 15);
        let b = field(5, 16);
        a.on_pointer_move(Vec2::new(390.0, 290.0), SurfaceRect::at_origin(surface()));
        assert_eq!(a.pointer(), Vec2::new(190.0, 140.0));
        assert_eq!(b.pointer(), Vec2::zero());
    }
}

#[cfg(test)]
mod resize {
    use super::*;

    #[test]
    fn burst_of_resizes_rebuilds_once_after_window() {
        let mut f = field(40, 17);
        let rebuilds = f.rebuild_count();
        let new_size = SurfaceSize::new(640.0, 480.0);
        for i in 0..10 {
            f.notify_resize(new_size, 1.0, ms(i * 5));
        }
        for t in (0..=240).step_by(5) {
            assert!(!f.poll_timers(ms(t)), "rebuilt early at {}ms", t);
            f.tick();
        }
        assert_eq!(f.rebuild_count(), rebuilds);
        assert!(f.poll_timers(ms(245)));
        assert_eq!(f.rebuild_count(), rebuilds + 1);
        assert_eq!(f.bounds(), new_size);
        assert_eq!(f.target().size, new_size);
        assert!(!f.poll_timers(ms(1000)));
        assert_eq!(f.rebuild_count(), rebuilds + 1);
        assert_eq!(f.particles().len(), 40);
    }

    #[test]
    fn zero_area_keeps_pool_until_area_returns() {
        let mut f = field(20, 18);
        let before = f.particles().to_vec();
        f.resize(SurfaceSize::new(0.0, 0.0), 1.0);
        assert!(f.is_rebuild_pending());
        assert_eq!(f.particles(), &before[..]);

        f.tick();
        assert_eq!(f.particles(), &before[..]);
        assert!(f.target().calls.is_empty());

        f.resize(SurfaceSize::new(200.0, 100.0), 1.0);
        assert!(!f.is_rebuild_pending());
        assert_eq!(f.particles().len(), 20);
        for p in f.particles() {
            assert!(p.pos.x <= 200.0 && p.pos.y <= 100.0);
        }
    }

    #[test]
    fn resize_rescales_backing_raster() {
        use crate::surface::RasterHost;
        let mut host = RasterHost::new(surface(), 1.0);
        let mut f = ParticleField::new(&mut host, config(10, 19)).unwrap();
        assert_eq!(f.target().dims(), (400, 300));
        f.resize(SurfaceSize::new(100.0, 50.0), 2.0);
        assert_eq!(f.target().dims(), (200, 100));
        assert_eq!(f.target().scale(), 2.0);
        assert_eq!(f.pixel_ratio(), 2.0);
    }
}

#[cfg(test)]
mod lifecycle {
    use super::*;

    #[test]
    fn reseed_rebuilds_only_on_changed_signal() {
        let mut f = field(10, 20);
        let original = ids(&f);
        assert!(!f.reseed(0));
        assert_eq!(ids(&f), original);
        assert!(f.reseed(1));
        assert!(ids(&f).iter().all(|id| !original.contains(id)));
        assert!(!f.reseed(1));
    }

    #[test]
    fn construction_reports_missing_surface() {
        let mut host = RecordingHost {
            fail: true,
            ..RecordingHost::new(surface())
        };
        let result = ParticleField::new(&mut host, config(10, 21));
        assert!(matches!(result, Err(FieldError::SurfaceUnavailable(_))));
    }

    #[test]
    fn construction_reports_bad_color() {
        let mut host = RecordingHost::new(surface());
        let cfg = FieldConfig {
            color: "#zzzzzz".into(),
            ..config(10, 22)
        };
        let result = ParticleField::new(&mut host, cfg);
        assert!(matches!(result, Err(FieldError::InvalidColor { .. })));
    }

    #[test]
    fn teardown_stops_ticks_and_pending_resize() {
        let mut f = field(10, 23);
        f.tick();
        f.notify_resize(SurfaceSize::new(100.0, 100.0), 1.0, ms(0));
        assert!(f.has_pending_resize());
        f.teardown();
        assert!(!f.has_pending_resize());

        let frame = f.frame();
        let rebuilds = f.rebuild_count();
        let snapshot = f.particles().to_vec();
        assert!(!f.poll_timers(ms(10_000)));
        f.tick();
        f.notify_resize(SurfaceSize::new(50.0, 50.0), 1.0, ms(10_000));
        assert!(!f.poll_timers(ms(20_000)));
        assert!(!f.reseed(7));
        f.refresh();
        f.resize(SurfaceSize::new(50.0, 50.0), 2.0);
        f.initialize(SurfaceSize::new(60.0, 60.0));
        f.rebuild_pool();
        assert_eq!(f.frame(), frame);
        assert_eq!(f.rebuild_count(), rebuilds);
        assert_eq!(f.particles(), &snapshot[..]);
        assert_eq!(f.bounds(), surface());
        assert_eq!(f.pixel_ratio(), 1.0);
    }
}
