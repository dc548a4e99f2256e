use crate::error::FieldError;
use crate::field::ParticleField;
use crate::particle::Particle;
use crate::profile_scope;
use crate::surface::{RenderTarget, SurfaceSize};
use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use serde::{Deserialize, Serialize};
use std::io::{BufWriter, Cursor, Read, Write};
use std::path::Path;
use ultraviolet::Vec2;

/// Full simulation state of a field at one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldSnapshot {
    pub bounds: SurfaceSize,
    #[serde(default = "default_pixel_ratio")]
    pub pixel_ratio: f32,
    pub pointer: Vec2,
    #[serde(default)]
    pub frame: usize,
    pub particles: Vec<Particle>,
}

fn default_pixel_ratio() -> f32 {
    1.0
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Binary,
}

impl<T: RenderTarget> ParticleField<T> {
    pub fn snapshot(&self) -> FieldSnapshot {
        FieldSnapshot {
            bounds: self.bounds(),
            pixel_ratio: self.pixel_ratio(),
            pointer: self.pointer(),
            frame: self.frame(),
            particles: self.particles().to_vec(),
        }
    }

    /// Reinstate a snapshot: the pool is replaced, not rebuilt.
    ///
    /// The snapshot must hold exactly as many particles as this field's pool.
    /// On error the field is left untouched.
    pub fn restore(&mut self, snapshot: FieldSnapshot) -> Result<(), FieldError> {
        if self.is_torn_down() {
            return Err(FieldError::Snapshot(
                "cannot restore into a torn-down field".to_string(),
            ));
        }
        let expected = self.config().pool_size();
        if snapshot.particles.len() != expected {
            return Err(FieldError::Snapshot(format!(
                "snapshot holds {} particles but the pool size is {}",
                snapshot.particles.len(),
                expected
            )));
        }
        log::debug!(
            "restoring snapshot of {} particles at frame {}",
            snapshot.particles.len(),
            snapshot.frame
        );
        self.restore_parts(
            snapshot.bounds,
            snapshot.pixel_ratio,
            snapshot.pointer,
            snapshot.frame,
            snapshot.particles,
        );
        Ok(())
    }
}

pub fn save_snapshot<P: AsRef<Path>>(
    path: P,
    snapshot: &FieldSnapshot,
    format: SnapshotFormat,
    compress: bool,
) -> Result<(), FieldError> {
    profile_scope!("save_snapshot");
    let path = path.as_ref();
    // Write to a temporary file first so an interrupted save never truncates the target
    let tmp_path = path.with_extension({
        let mut os = path.extension().map(|e| e.to_os_string()).unwrap_or_default();
        os.push(".tmp");
        os
    });
    {
        let file = std::fs::File::create(&tmp_path)?;
        let writer = BufWriter::new(file);
        match (format, compress) {
            (SnapshotFormat::Json, false) => {
                serde_json::to_writer(writer, snapshot)
                    .map_err(|e| FieldError::Snapshot(e.to_string()))?;
            }
            (SnapshotFormat::Json, true) => {
                let mut encoder = GzEncoder::new(writer, Compression::fast());
                serde_json::to_writer(&mut encoder, snapshot)
                    .map_err(|e| FieldError::Snapshot(e.to_string()))?;
                let mut writer = encoder.finish()?;
                writer.flush()?;
            }
            (SnapshotFormat::Binary, false) => {
                bincode::serialize_into(writer, snapshot)
                    .map_err(|e| FieldError::Snapshot(e.to_string()))?;
            }
            (SnapshotFormat::Binary, true) => {
                let mut encoder = GzEncoder::new(writer, Compression::fast());
                bincode::serialize_into(&mut encoder, snapshot)
                    .map_err(|e| FieldError::Snapshot(e.to_string()))?;
                let mut writer = encoder.finish()?;
                writer.flush()?;
            }
        }
    }
    std::fs::rename(&tmp_path, path)?;
    log::info!(
        "saved snapshot of {} particles to {}",
        snapshot.particles.len(),
        path.display()
    );
    Ok(())
}

pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<FieldSnapshot, FieldError> {
    profile_scope!("load_snapshot");
    let data = std::fs::read(path.as_ref())?;
    match maybe_decompress_gzip(&data)? {
        Some(decoded) => parse_snapshot_bytes(&decoded),
        None => parse_snapshot_bytes(&data),
    }
}

fn parse_snapshot_bytes(bytes: &[u8]) -> Result<FieldSnapshot, FieldError> {
    if let Ok(snapshot) = serde_json::from_slice::<FieldSnapshot>(bytes) {
        return Ok(snapshot);
    }
    bincode::deserialize::<FieldSnapshot>(bytes).map_err(|e| {
        FieldError::Snapshot(format!("not valid JSON or binary snapshot: {}", e))
    })
}

fn maybe_decompress_gzip(data: &[u8]) -> std::io::Result<Option<Vec<u8>>> {
    if data.len() < 2 || data[0] != 0x1f || data[1] != 0x8b {
        return Ok(None);
    }

    let mut decoder = GzDecoder::new(Cursor::new(data));
    let mut decoded = Vec::new();
    decoder.read_to_end(&mut decoded)?;
    Ok(Some(decoded))
}
