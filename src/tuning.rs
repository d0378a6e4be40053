//! Data-driven game balance
//!
//! Everything here can be overridden from a JSON file; missing fields fall
//! back to the stock values.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::geometry::GeometryTable;
use crate::sim::level::LevelParams;

/// Playfield size in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
        }
    }
}

/// Runtime and balance configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub viewport: Viewport,
    /// Frames per second of elapsed time for frame-counted timers
    pub animation_speed: f32,
    /// Minimum wall time per simulation frame
    pub frame_budget_ms: u64,
    /// Fixed RNG seed; a fresh one is drawn when absent
    pub seed: Option<u64>,
    /// How long the completion screen is held before the next level
    pub level_complete_secs: f32,
    /// Input channel capacity (presentation to simulation)
    pub input_capacity: usize,
    /// Snapshot channel capacity (simulation to presentation)
    pub snapshot_capacity: usize,
    pub initial_level: LevelParams,
    pub geometry: GeometryTable,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            animation_speed: ANIMATION_SPEED,
            frame_budget_ms: 16,
            seed: None,
            level_complete_secs: 3.0,
            input_capacity: 8,
            snapshot_capacity: 2,
            initial_level: LevelParams::default(),
            geometry: GeometryTable::default(),
        }
    }
}

impl Tuning {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("when loading tuning file at {:?}", path))?;
        let tuning: Self = serde_json::from_str(&content)
            .with_context(|| format!("when parsing tuning file at {:?}", path))?;
        tuning
            .validate()
            .with_context(|| format!("when validating tuning file at {:?}", path))?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.viewport.width > 0.0 && self.viewport.height > 0.0) {
            bail!("viewport must be positive, got {:?}", self.viewport);
        }
        if !(self.animation_speed > 0.0) {
            bail!("animation_speed must be positive, got {}", self.animation_speed);
        }
        if self.level_complete_secs < 0.0 {
            bail!("level_complete_secs must not be negative");
        }
        if self.input_capacity == 0 || self.snapshot_capacity == 0 {
            bail!("channel capacities must be at least 1");
        }
        self.initial_level
            .validate()
            .context("invalid initial_level")?;
        self.geometry.ensure_complete()
    }

    pub fn frame_budget(&self) -> Duration {
        Duration::from_millis(self.frame_budget_ms)
    }
}
