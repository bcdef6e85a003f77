pub mod engine;
pub mod feedback;
pub mod matcher;
pub mod types;

pub use self::types::{
    EquilibriumDetail, EvaluationResult, ForceDetail, OverlayShape, RelationDetail,
};

use crate::config::Config;
use crate::forces::DrawnForce;
use crate::spec::TaskSpec;

pub fn clamp01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// The one fuzzy-equality primitive every tolerance check reuses.
///
/// Returns 1.0 for `|value| <= tol`, falls linearly to 0.0 at
/// `|value| = tol + span`, and 0.0 beyond. Total over all real inputs:
/// a non-positive span degrades to a hard cutoff at `tol`, and infinite
/// values score 0.
pub fn ramp_down_linear(value: f32, tol: f32, span: f32) -> f32 {
    let a = value.abs();
    if a <= tol {
        return 1.0;
    }
    if span <= 0.0 {
        return 0.0;
    }
    clamp01(1.0 - (a - tol) / span)
}

/// Evaluate a drawn-force snapshot against a task with default engine
/// constants (tolerances come from the task itself).
pub fn evaluate(task: &TaskSpec, drawn: &[DrawnForce]) -> EvaluationResult {
    engine::evaluate_with(task, drawn, &Config::default())
}
