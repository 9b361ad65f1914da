//! Run settings, optionally loaded from a JSON file.
//!
//! Every field has a default, so a file only needs the values it changes:
//!
//! ```json
//! { "sim": { "total_ticks": 1800 }, "flee_window": [300, 600] }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use rn_core::{RoutingPolicy, SimConfig};

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sim:                     SimConfig,
    pub policy:                  RoutingPolicy,
    /// Ticks `[start, end)` during which every pursuer flees.
    pub flee_window:             (u64, u64),
    /// Quarry angular speed around the middle ring.
    pub quarry_degrees_per_tick: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sim:                     SimConfig::default(),
            policy:                  RoutingPolicy::default(),
            flee_window:             (300, 540),
            quarry_degrees_per_tick: 0.6,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        let settings = serde_json::from_str(&text)
            .with_context(|| format!("parsing settings in {}", path.display()))?;
        Ok(settings)
    }
}
