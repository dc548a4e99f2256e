use particle_field::app::parse_or;
use particle_field::surface::{RasterHost, SurfaceRect, SurfaceSize};
use particle_field::{FieldConfig, ParticleField};
use serde::Serialize;
use std::{env, time::Instant};
use ultraviolet::Vec2;

#[derive(Serialize)]
struct RuntimeReport {
    frames: usize,
    particles: usize,
    sample_window: usize,
    total_tick_micros: u128,
    wall_time_micros: u128,
    avg_tick_micros: f64,
    early_avg_micros: f64,
    late_avg_micros: f64,
    slowdown_factor: f64,
}

fn average(slice: &[u128]) -> f64 {
    if slice.is_empty() {
        0.0
    } else {
        slice.iter().copied().sum::<u128>() as f64 / slice.len() as f64
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let frames = parse_or(&args, "--frames", 600usize).max(1);
    let particles = parse_or(&args, "--particles", 1000usize);
    let sample_window = parse_or(&args, "--window", 60usize).max(1);

    let size = SurfaceSize::new(1280.0, 720.0);
    let mut host = RasterHost::new(size, 2.0);
    let config = FieldConfig {
        quantity: particles as i32,
        seed: Some(0),
        ..Default::default()
    };
    let mut field = ParticleField::new(&mut host, config).expect("failed to create particle field");
    let rect = SurfaceRect::at_origin(size);
    let mut durations = Vec::with_capacity(frames);

    let wall_start = Instant::now();
    for i in 0..frames {
        let t = i as f32 / frames as f32;
        field.on_pointer_move(Vec2::new(size.width * t, size.height * 0.5), rect);
        let tick_start = Instant::now();
        field.tick();
        durations.push(tick_start.elapsed().as_micros());
    }
    let wall_time = wall_start.elapsed().as_micros();

    let total_tick_micros: u128 = durations.iter().copied().sum();
    let window = sample_window.min(frames);

    let early_avg = average(&durations[..window]);
    let late_avg = average(&durations[frames - window..]);

    let report = RuntimeReport {
        frames,
        particles,
        sample_window: window,
        total_tick_micros,
        wall_time_micros: wall_time,
        avg_tick_micros: total_tick_micros as f64 / frames as f64,
        early_avg_micros: early_avg,
        late_avg_micros: late_avg,
        slowdown_factor: if early_avg > 0.0 {
            late_avg / early_avg
        } else {
            0.0
        },
    };

    println!(
        "{}",
        serde_json::to_string(&report).expect("failed to serialize runtime report")
    );
}
