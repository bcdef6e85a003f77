use std::collections::BTreeMap;

use super::ramp_down_linear;
use crate::forces::DrawnForce;
use crate::geometry::angle_between_deg;
use crate::spec::ForceSpec;

/// Affinity multiplier for a drawn force whose name does not match the
/// expected force.
/// An unnamed-but-correctly-aimed force can still match, but a named match
/// always outranks an unnamed one of equal direction quality.
pub const NAME_MISMATCH_PENALTY: f32 = 0.5;

/// Pairs at or below this affinity are never committed.
pub const MATCH_THRESHOLD: f32 = 0.2;

/// Assign drawn forces to expected forces, each used at most once.
///
/// Greedy best-score-first over all (expected, drawn) pairs. Not globally
/// optimal, but deterministic (ties broken by declaration order, then draw
/// order) and cheap, which is adequate for the handful of forces a task has.
/// Returns spec name -> index into `drawn`.
pub fn match_forces(
    expected: &[ForceSpec],
    drawn: &[DrawnForce],
    ang_tol: f32,
    ang_span: f32,
) -> BTreeMap<String, usize> {
    let mut pairs: Vec<(f32, usize, usize)> = Vec::with_capacity(expected.len() * drawn.len());

    for (si, spec) in expected.iter().enumerate() {
        for (di, force) in drawn.iter().enumerate() {
            pairs.push((pair_affinity(spec, force, ang_tol, ang_span), si, di));
        }
    }

    pairs.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.1.cmp(&b.1))
            .then(a.2.cmp(&b.2))
    });

    let mut matched: BTreeMap<String, usize> = BTreeMap::new();
    let mut used_spec = vec![false; expected.len()];
    let mut used_drawn = vec![false; drawn.len()];

    for (score, si, di) in pairs {
        if score <= MATCH_THRESHOLD {
            continue;
        }
        if used_spec[si] || used_drawn[di] {
            continue;
        }
        used_spec[si] = true;
        used_drawn[di] = true;
        matched.insert(expected[si].name.clone(), di);
    }

    matched
}

fn pair_affinity(spec: &ForceSpec, force: &DrawnForce, ang_tol: f32, ang_span: f32) -> f32 {
    let name_match = force.name_matches(&spec.name, &spec.aliases);

    let angle_err = match force.vector() {
        Some(v) => angle_between_deg(v, spec.dir_unit),
        None => 180.0,
    };
    let dir_match = ramp_down_linear(angle_err, ang_tol, ang_span);

    if name_match {
        0.5 + 0.5 * dir_match
    } else {
        NAME_MISMATCH_PENALTY * dir_match
    }
}
