use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::geometry::Vec2;

/// Tolerance-zone overlay for the presentation layer. Pure data: shape kind
/// plus geometric parameters; `r_ok` bounds the full-credit zone and
/// `r_span` the falloff band beyond it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OverlayShape {
    Circle {
        center: Vec2,
        r_ok: f32,
        r_span: f32,
    },
    Stadium {
        a: Vec2,
        b: Vec2,
        r_ok: f32,
        r_span: f32,
    },
    Wedge {
        center: Vec2,
        heading_deg: f32,
        ang_ok: f32,
        ang_span: f32,
        r_ok: f32,
        r_span: f32,
    },
}

/// Per-expected-force scoring breakdown.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForceDetail {
    pub expected: String,
    pub found: bool,
    pub editable: bool,
    pub drawn_name: String,

    pub name_score: f32,
    pub dir_score: f32,
    pub pos_score: f32,
    pub combined: f32,

    pub angle_error_deg: Option<f32>,
    pub pos_error: Option<f32>,
}

/// Diagnostic record for the equilibrium check.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquilibriumDetail {
    pub total: Vec2,
    pub c1: f32,
    pub c2: f32,
    pub magnitude: f32,
    pub max_force: f32,
    pub relative_error: f32,
    pub score: f32,
}

/// Diagnostic record for one evaluated magnitude relation.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationDetail {
    pub lhs: f32,
    pub rhs: f32,
    pub ratio: f32,
    pub target: f32,
    pub error: f32,
    pub score: f32,
}

/// Everything one evaluation call produces. Recomputed fresh on every call;
/// overlays are keyed by the index of the feedback line they belong to.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub score: f32,
    pub feedback: Vec<String>,
    pub overlays: BTreeMap<usize, Vec<OverlayShape>>,

    pub coverage: f32,
    pub equilibrium_score: f32,
    pub relations_score: f32,

    pub forces: BTreeMap<String, ForceDetail>,
    pub equilibrium: Option<EquilibriumDetail>,
    pub relations: Vec<RelationDetail>,
}
