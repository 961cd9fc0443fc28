use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::tuning::error::TuneError;
use crate::tuning::presets;
use crate::tuning::table::CalibrationTable;

const VE_FILE: &str = "tuningve.smv";
const SA_FILE: &str = "tuningsa.smv";

/// Serial link settings for the live telemetry feed. Kept on the session so
/// nothing reaches for process-wide state.
#[derive(Clone, Debug)]
pub struct SerialConfig {
    pub port: Option<String>,
    pub baud: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud: 115_200,
        }
    }
}

/// Explicit owner of the two tuning maps plus serial configuration.
///
/// Opened once at startup, torn down with an explicit save-or-discard
/// decision. A missing snapshot falls back to the built-in preset; a
/// snapshot that exists but fails to decode is surfaced, not papered over.
pub struct TuningSession {
    dir: PathBuf,
    ve: CalibrationTable,
    sa: CalibrationTable,
    serial: SerialConfig,
}

impl TuningSession {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, TuneError> {
        let dir = dir.into();
        let ve = load_or_preset(&dir.join(VE_FILE), presets::volumetric_efficiency, "VE")?;
        let sa = load_or_preset(&dir.join(SA_FILE), presets::spark_advance, "SA")?;
        Ok(Self {
            dir,
            ve,
            sa,
            serial: SerialConfig::default(),
        })
    }

    pub fn ve(&self) -> &CalibrationTable {
        &self.ve
    }

    pub fn ve_mut(&mut self) -> &mut CalibrationTable {
        &mut self.ve
    }

    pub fn sa(&self) -> &CalibrationTable {
        &self.sa
    }

    pub fn sa_mut(&mut self) -> &mut CalibrationTable {
        &mut self.sa
    }

    pub fn serial(&self) -> &SerialConfig {
        &self.serial
    }

    pub fn serial_mut(&mut self) -> &mut SerialConfig {
        &mut self.serial
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.ve.is_dirty() || self.sa.is_dirty()
    }

    /// Persists both table snapshots and clears the dirty flags.
    pub fn save(&mut self) -> Result<(), TuneError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(VE_FILE), self.ve.to_json()?)?;
        fs::write(self.dir.join(SA_FILE), self.sa.to_json()?)?;
        self.ve.mark_saved();
        self.sa.mark_saved();
        info!("saved tuning snapshots to {}", self.dir.display());
        Ok(())
    }

    /// Tears the session down. `save` is the exit decision point; passing
    /// `false` discards any edits made since the last save.
    pub fn close(mut self, save: bool) -> Result<(), TuneError> {
        if save {
            self.save()?;
        } else if self.has_unsaved_changes() {
            info!("discarding unsaved tuning changes");
        }
        Ok(())
    }
}

fn load_or_preset(
    path: &Path,
    preset: fn() -> CalibrationTable,
    name: &str,
) -> Result<CalibrationTable, TuneError> {
    if !path.exists() {
        warn!("no existing {name} tuning at {}, using preset", path.display());
        return Ok(preset());
    }
    let blob = fs::read_to_string(path)?;
    CalibrationTable::from_json(&blob)
}
