// Centralized configuration for particle field parameters

use crate::error::FieldError;
use palette::Srgb;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use ultraviolet::Vec2;

// ====================
// Field Defaults
// ====================
pub const DEFAULT_QUANTITY: i32 = 100;
pub const DEFAULT_STATICITY: f32 = 50.0; // Larger means weaker pointer pull
pub const DEFAULT_EASE: f32 = 50.0; // Larger means slower displacement convergence
pub const DEFAULT_SIZE: f32 = 0.4;
pub const DEFAULT_COLOR: &str = "#ffffff";

// ====================
// Per-frame Physics
// ====================
/// Alpha gained per frame by a particle that is clear of every edge
pub const ALPHA_STEP: f32 = 0.02;
/// Distance from an edge over which particles fade out
pub const EDGE_FADE_DISTANCE: f32 = 20.0;

// ====================
// Particle Generation
// ====================
/// Range for the opacity ceiling, quantized to one decimal
pub const TARGET_ALPHA_RANGE: (f32, f32) = (0.1, 0.7);
/// Per-axis drift range, quantized to two decimals
pub const DRIFT_RANGE: (f32, f32) = (-1.0, 1.0);
/// Pointer sensitivity range, quantized to two decimals
pub const MAGNETISM_RANGE: (f32, f32) = (0.6, 0.8);

// ====================
// Scheduling
// ====================
pub const RESIZE_DEBOUNCE_MS: u64 = 200;
pub const FRAME_INTERVAL_MS: u64 = 16; // ~60Hz

pub const DEFAULT_CONFIG_PATH: &str = "field_config.toml";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Number of particles in the pool. Negative values yield an empty pool.
    pub quantity: i32,
    pub staticity: f32,
    pub ease: f32,
    /// Radius of every particle.
    pub size: f32,
    /// Hex fill color, `#rgb` or `#rrggbb`.
    pub color: String,
    /// Constant drift `[vx, vy]` added to every particle each frame.
    pub base_velocity: [f32; 2],
    /// Opaque reseed signal; changing it forces a pool rebuild.
    pub reseed: u64,
    /// Optional RNG seed for reproducible runs.
    pub seed: Option<u64>,
    pub debounce_ms: u64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            quantity: DEFAULT_QUANTITY,
            staticity: DEFAULT_STATICITY,
            ease: DEFAULT_EASE,
            size: DEFAULT_SIZE,
            color: DEFAULT_COLOR.to_string(),
            base_velocity: [0.0, 0.0],
            reseed: 0,
            seed: None,
            debounce_ms: RESIZE_DEBOUNCE_MS,
        }
    }
}

impl FieldConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, FieldError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, FieldError> {
        let config: FieldConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Load `path`, falling back to defaults when the file does not exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, FieldError> {
        let path = path.as_ref();
        if !path.exists() {
            log::warn!(
                "config file {} not found, using default field configuration",
                path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    /// Pool size with negative quantities clamped to zero.
    pub fn pool_size(&self) -> usize {
        self.quantity.max(0) as usize
    }

    pub fn fill_color(&self) -> Result<Srgb<u8>, FieldError> {
        Srgb::<u8>::from_str(self.color.trim()).map_err(|e| FieldError::InvalidColor {
            value: self.color.clone(),
            reason: e.to_string(),
        })
    }

    pub fn base_velocity(&self) -> Vec2 {
        Vec2::new(self.base_velocity[0], self.base_velocity[1])
    }

    pub fn debounce_window(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.debounce_ms)
    }
}
