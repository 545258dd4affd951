//! Persistence of recorded snapshots and final particle states.

use anyhow::{Context, Result};
use gravity_common::{ParticleState, Snapshot};
use log::{error, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Bincode,
    MessagePack,
}

impl OutputFormat {
    /// Resolves the `output.format` setting. Missing or unknown values fall back to JSON.
    pub fn from_setting(setting: Option<&str>) -> Self {
        match setting.unwrap_or("json") {
            "json" => OutputFormat::Json,
            "bincode" => OutputFormat::Bincode,
            "messagepack" => OutputFormat::MessagePack,
            other => {
                error!("Unknown output format: {}. Using JSON instead.", other);
                OutputFormat::Json
            }
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Bincode => "bin",
            OutputFormat::MessagePack => "msgpack",
        }
    }
}

/// Writes all snapshots to `<base_filename>_snapshots.<ext>` and returns the path.
pub fn save_snapshots(snapshots: &[Snapshot], base_filename: &str, format: OutputFormat) -> Result<PathBuf> {
    let path = PathBuf::from(format!("{}_snapshots.{}", base_filename, format.extension()));
    let file = File::create(&path)
        .with_context(|| format!("Error creating snapshot file '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);

    match format {
        OutputFormat::Json => serde_json::to_writer(&mut writer, snapshots)
            .context("Error serializing snapshots to JSON")?,
        OutputFormat::Bincode => bincode::serialize_into(&mut writer, snapshots)
            .context("Error serializing snapshots to bincode")?,
        OutputFormat::MessagePack => rmp_serde::encode::write(&mut writer, snapshots)
            .context("Error serializing snapshots to MessagePack")?,
    }
    writer.flush()
        .with_context(|| format!("Error writing snapshot file '{}'", path.display()))?;

    info!("{} snapshots saved to {}", snapshots.len(), path.display());
    Ok(path)
}

/// Writes one CSV row per particle to `<base_filename>_final_positions.csv` and returns the path.
pub fn save_final_positions(states: &[ParticleState], base_filename: &str) -> Result<PathBuf> {
    let path = PathBuf::from(format!("{}_final_positions.csv", base_filename));
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("Error creating CSV file '{}'", path.display()))?;

    writer.write_record(["x", "y", "radius", "mass"])?;
    for state in states {
        writer.write_record(&[
            format!("{:.4}", state.x),
            format!("{:.4}", state.y),
            format!("{:.4}", state.radius),
            format!("{:.4}", state.mass),
        ])?;
    }
    writer.flush()?;

    info!("Final positions saved to {}", path.display());
    Ok(path)
}
