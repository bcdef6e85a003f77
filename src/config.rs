use clap::Args;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::FgResult;

/// Engine configuration: tolerance profile plus the drawing constants the
/// scorer depends on. Every field doubles as a CLI flag so a profile can be
/// overridden per invocation.
#[derive(Args, Debug, Clone)]
pub struct Config {
    #[command(flatten)]
    pub tol: Tolerances,

    /// Minimum arrow length (scene units) for a force to count as drawn.
    #[arg(long, default_value_t = 20.0)]
    pub min_force_len: f32,

    /// Grid step of the drawing surface; sizes direction-wedge overlays.
    #[arg(long, default_value_t = 20.0)]
    pub grid_step: f32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tol: Tolerances::default(),
            min_force_len: 20.0,
            grid_step: 20.0,
        }
    }
}

/// Tolerance bands for every fuzzy check in the scorer. Each check has a
/// full-credit band (`*_tol`) and a linear falloff span (`*_span`) beyond it.
#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    // === Direction (degrees) ===
    #[arg(long, default_value_t = 5.0)]
    pub ang_tol_deg: f32,
    #[arg(long, default_value_t = 20.0)]
    pub ang_span_deg: f32,

    // === Anchor position (scene units) ===
    #[arg(long, default_value_t = 10.0)]
    pub pos_tol: f32,
    #[arg(long, default_value_t = 40.0)]
    pub pos_span: f32,

    // === Equilibrium residual, relative to the largest force ===
    #[arg(long, default_value_t = 0.15)]
    pub sum_tol: f32,
    #[arg(long, default_value_t = 0.40)]
    pub sum_span: f32,

    // === Magnitude relations, relative error on the ratio ===
    #[arg(long, default_value_t = 0.15)]
    pub rel_tol: f32,
    #[arg(long, default_value_t = 0.30)]
    pub rel_span: f32,
}

impl Default for Tolerances {
    fn default() -> Self {
        Tolerances {
            ang_tol_deg: 5.0,
            ang_span_deg: 20.0,
            pos_tol: 10.0,
            pos_span: 40.0,
            sum_tol: 0.15,
            sum_span: 0.40,
            rel_tol: 0.15,
            rel_span: 0.30,
        }
    }
}

impl Tolerances {
    /// Load a tolerance profile from a JSON file. Missing fields fall back
    /// to the defaults, so partial profiles are valid.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> FgResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
