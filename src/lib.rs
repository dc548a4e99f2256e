pub mod app;
pub mod config;
pub mod debounce;
pub mod error;
pub mod field;
pub mod io;
pub mod particle;
pub mod profiler;
pub mod surface;

pub use config::FieldConfig;
pub use error::FieldError;
pub use field::ParticleField;
pub use particle::Particle;

#[cfg(feature = "profiling")]
use once_cell::sync::Lazy;
#[cfg(feature = "profiling")]
use parking_lot::Mutex;

#[cfg(feature = "profiling")]
pub static PROFILER: Lazy<Mutex<profiler::Profiler>> =
    Lazy::new(|| Mutex::new(profiler::Profiler::new()));
