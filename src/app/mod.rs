use crate::config::{self, FieldConfig};
use crate::error::FieldError;
use crate::field::ParticleField;
use crate::io::{save_snapshot, SnapshotFormat};
use crate::surface::{RasterHost, SurfaceRect, SurfaceSize};
use std::path::PathBuf;
use std::time::Duration;
use ultraviolet::Vec2;

pub mod commands;
pub mod frame_loop;

pub use commands::{CancelToken, FieldCommand, FieldHandle};
pub use frame_loop::FrameLoop;

/// Command-line options for the demo driver.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config_path: PathBuf,
    pub frames: usize,
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
    pub realtime: bool,
    pub snapshot: Option<PathBuf>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(config::DEFAULT_CONFIG_PATH),
            frames: 600,
            width: 800.0,
            height: 600.0,
            pixel_ratio: 1.0,
            realtime: false,
            snapshot: None,
        }
    }
}

/// Value of `flag`, given either as `--flag value` or `--flag=value`.
pub fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    for window in args.windows(2) {
        if window[0] == flag {
            return Some(window[1].as_str());
        }
    }
    let prefix = format!("{}=", flag);
    args.iter().find_map(|arg| arg.strip_prefix(&prefix))
}

/// Parse the value of `flag`, falling back to `default` when it is absent or
/// does not parse.
pub fn parse_or<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    match arg_value(args, flag) {
        Some(v) => v.parse().unwrap_or_else(|_| {
            log::warn!("ignoring unparsable value {:?} for {}", v, flag);
            default
        }),
        None => default,
    }
}

impl RunOptions {
    pub fn from_args(args: &[String]) -> Self {
        let d = Self::default();
        Self {
            config_path: arg_value(args, "--config").map(PathBuf::from).unwrap_or(d.config_path),
            frames: parse_or(args, "--frames", d.frames),
            width: parse_or(args, "--width", d.width),
            height: parse_or(args, "--height", d.height),
            pixel_ratio: parse_or(args, "--pixel-ratio", d.pixel_ratio),
            realtime: args.iter().any(|a| a == "--realtime"),
            snapshot: arg_value(args, "--snapshot").map(PathBuf::from),
        }
    }
}

pub fn run(options: RunOptions) -> Result<(), FieldError> {
    let config = FieldConfig::load_or_default(&options.config_path)?;
    let size = SurfaceSize::new(options.width, options.height);
    let mut host = RasterHost::new(size, options.pixel_ratio);
    let field = ParticleField::new(&mut host, config)?;
    log::info!(
        "particle field ready: {} particles on {}x{} @{}x",
        field.particles().len(),
        size.width,
        size.height,
        options.pixel_ratio
    );

    let (mut frame_loop, handle) = FrameLoop::new(field);
    let interval = Duration::from_millis(config::FRAME_INTERVAL_MS);
    let rect = SurfaceRect::at_origin(size);

    // Scripted host input: a pointer sweep, then a burst of resizes halfway through
    let sweep = options.frames.max(1);
    let half = options.frames / 2;
    for i in 0..options.frames {
        let t = i as f32 / sweep as f32;
        let screen = Vec2::new(size.width * t, size.height * (0.5 + 0.3 * (t * 12.0).sin()));
        handle.pointer_move(screen, rect);
        if i >= half && i < half + 5 {
            let grow = (i - half) as f32 * 10.0;
            handle.resize(SurfaceSize::new(size.width + grow, size.height), options.pixel_ratio);
        }
        let keep_going = if options.realtime {
            frame_loop.run(Some(1), interval);
            !handle.is_cancelled()
        } else {
            frame_loop.run_headless(1, interval) == 1
        };
        if !keep_going {
            break;
        }
    }

    let coverage = frame_loop.field().target().total_coverage();
    log::info!(
        "ran {} frames, {} rebuilds, final coverage {:.2}",
        frame_loop.frames(),
        frame_loop.field().rebuild_count(),
        coverage
    );

    if let Some(path) = &options.snapshot {
        let compress = path.extension().map_or(false, |e| e == "gz");
        save_snapshot(path, &frame_loop.field().snapshot(), SnapshotFormat::Json, compress)?;
    }

    handle.teardown();
    frame_loop.teardown();

    #[cfg(feature = "profiling")]
    crate::PROFILER.lock().print_and_clear();

    Ok(())
}
