use std::collections::BTreeMap;

use tracing::debug;

use super::feedback::FeedbackBuilder;
use super::matcher;
use super::ramp_down_linear;
use super::types::{
    EquilibriumDetail, EvaluationResult, ForceDetail, OverlayShape, RelationDetail,
};
use crate::config::Config;
use crate::forces::DrawnForce;
use crate::geometry::{angle_between_deg, dist_point_to_segment, Vec2, EPS};
use crate::spec::{AnchorSpec, Basis, MagnitudeRelation, TaskSpec};

/// Exponent of the coverage penalty. Missing one of several forces reduces
/// the score more than proportionally.
pub const COVERAGE_PENALTY_EXP: f32 = 1.5;

/// Overlay placement when a scene declares no origin.
const DEFAULT_ORIGIN: Vec2 = Vec2 { x: 320.0, y: 240.0 };

/// Evaluate a drawn-force snapshot against a task.
///
/// Pure and synchronous: reads the task and the snapshot, returns a fresh
/// result. Data-validity problems (unknown relation names, degenerate
/// vectors, zero denominators) score as defined sentinel outcomes and never
/// escape as errors.
pub fn evaluate_with(task: &TaskSpec, drawn: &[DrawnForce], cfg: &Config) -> EvaluationResult {
    let tol = &task.tol;

    // Instructor-predrawn forces join the snapshot as non-editable context;
    // incomplete forces are excluded from scoring entirely.
    let mut snapshot: Vec<DrawnForce> = task.initial_forces.iter().map(|f| f.to_drawn()).collect();
    snapshot.extend(drawn.iter().cloned());
    let complete: Vec<DrawnForce> = snapshot
        .into_iter()
        .filter(|f| f.is_complete(cfg.min_force_len))
        .collect();

    debug!(
        task = %task.id,
        drawn = drawn.len(),
        complete = complete.len(),
        "evaluating snapshot"
    );

    let mut fb = FeedbackBuilder::new();

    // Empty-answer gate.
    if !complete.iter().any(|f| f.editable) {
        fb.push("No forces drawn beyond the ones given.");
        let (feedback, overlays) = fb.into_parts();
        return EvaluationResult {
            score: 0.0,
            feedback,
            overlays,
            coverage: 0.0,
            equilibrium_score: 1.0,
            relations_score: 1.0,
            ..Default::default()
        };
    }

    let matched = matcher::match_forces(
        &task.expected_forces,
        &complete,
        tol.ang_tol_deg,
        tol.ang_span_deg,
    );

    // --- Per-force scoring ---
    let mut details: BTreeMap<String, ForceDetail> = BTreeMap::new();
    let mut total_score = 0.0f32;
    let mut editable_count = 0usize;
    let mut found_count = 0usize;

    for spec in &task.expected_forces {
        let mut detail = ForceDetail {
            expected: spec.name.clone(),
            ..Default::default()
        };

        if let Some(&di) = matched.get(&spec.name) {
            let force = &complete[di];
            detail.found = true;
            detail.editable = force.editable;
            detail.drawn_name = force.name.clone();
            found_count += 1;

            if force.editable {
                score_editable_force(spec, force, task, cfg, &mut detail, &mut fb);
                total_score += detail.combined;
                editable_count += 1;
            } else {
                // Predrawn context: automatically correct, earns no credit,
                // exists so relations can reference it.
                detail.name_score = 1.0;
                detail.dir_score = 1.0;
                detail.pos_score = 1.0;
                detail.combined = 0.0;
            }
        }

        details.insert(spec.name.clone(), detail);
    }

    // Consolidated missing-name line comes first.
    let nameless = details
        .values()
        .filter(|d| d.found && d.editable && d.drawn_name.trim().is_empty())
        .count();
    match nameless {
        0 => {}
        1 => fb.insert_front("One force is missing a name."),
        n => fb.insert_front(format!("{n} forces are missing names.")),
    }

    if found_count < task.expected_forces.len() {
        fb.push("One or more forces are missing.");
    }

    // --- Quality gate: relations when declared, equilibrium otherwise ---
    let has_relations = !task.relations.is_empty();
    let mut equilibrium_score = 1.0f32;
    let mut equilibrium = None;
    let mut relations_score = 1.0f32;
    let mut relation_details = Vec::new();

    if has_relations {
        let mut scores = Vec::new();
        for rel in &task.relations {
            if let Some(detail) =
                evaluate_relation(rel, task, &matched, &complete, &details, &mut fb)
            {
                scores.push(detail.score);
                relation_details.push(detail);
            }
        }
        if !scores.is_empty() {
            relations_score = scores.iter().sum::<f32>() / scores.len() as f32;
        }
    } else if !matched.is_empty() {
        let (eq, detail) = evaluate_equilibrium(task, &matched, &complete, &mut fb);
        equilibrium_score = eq;
        equilibrium = Some(detail);
    }

    // --- Coverage and final score ---
    let total_expected = task.expected_forces.len();
    let (coverage, base_score) = if editable_count > 0 {
        let coverage = if total_expected == 0 {
            1.0
        } else {
            found_count as f32 / total_expected as f32
        };
        (coverage, total_score / editable_count as f32)
    } else {
        (0.0, 0.0)
    };

    let quality = if has_relations {
        relations_score
    } else {
        equilibrium_score
    };
    // Quality scales the result between 0.5x and 1.0x.
    let quality_multiplier = 0.5 + 0.5 * quality;

    let score = (base_score * coverage.powf(COVERAGE_PENALTY_EXP) * quality_multiplier)
        .clamp(0.0, 1.0);

    debug!(task = %task.id, score, coverage, quality, "evaluation complete");

    let (feedback, overlays) = fb.into_parts();
    EvaluationResult {
        score,
        feedback,
        overlays,
        coverage,
        equilibrium_score,
        relations_score,
        forces: details,
        equilibrium,
        relations: relation_details,
    }
}

fn score_editable_force(
    spec: &crate::spec::ForceSpec,
    force: &DrawnForce,
    task: &TaskSpec,
    cfg: &Config,
    detail: &mut ForceDetail,
    fb: &mut FeedbackBuilder,
) {
    let tol = &task.tol;
    let name_ok = force.name_matches(&spec.name, &spec.aliases);
    detail.name_score = if name_ok { 1.0 } else { 0.5 };

    let entered = force.name.trim();
    if !name_ok && !entered.is_empty() {
        fb.push(format!("'{entered}' is not the expected name for this force."));
    }

    // Direction.
    let fvec = force.vector().unwrap_or(Vec2::ZERO);
    let angle_err = angle_between_deg(fvec, spec.dir_unit);
    let dir_score = ramp_down_linear(angle_err, tol.ang_tol_deg, tol.ang_span_deg);
    detail.angle_error_deg = Some(angle_err);
    detail.dir_score = dir_score;

    // Geometric hints are gated on an accepted name.
    if dir_score < 1.0 && name_ok {
        let line = fb.push(format!("Adjust the direction of {}.", spec.name));
        if let Some(center) = force.arrow_base.or(force.anchor) {
            let band = (force.length() * 0.5).clamp(2.0 * cfg.grid_step, 10.0 * cfg.grid_step);
            fb.attach(
                line,
                OverlayShape::Wedge {
                    center,
                    heading_deg: spec.dir_unit.heading_deg(),
                    ang_ok: tol.ang_tol_deg,
                    ang_span: tol.ang_span_deg,
                    r_ok: band,
                    r_span: band,
                },
            );
        }
    }

    // Position: best-scoring candidate anchor wins. Deliberately lenient: a
    // candidate is selected for overlay display even when all score 0.
    let mut pos_score = 0.0f32;
    let mut selected: Option<&AnchorSpec> = None;
    if name_ok {
        if let Some(anchor) = force.anchor {
            for cand in &spec.anchors {
                let d = match cand {
                    AnchorSpec::Point { point } => anchor.distance(*point),
                    AnchorSpec::Segment { a, b } => dist_point_to_segment(anchor, *a, *b),
                };
                let s = ramp_down_linear(d, tol.pos_tol, tol.pos_span);
                if s > pos_score || selected.is_none() {
                    pos_score = s;
                    selected = Some(cand);
                    detail.pos_error = Some(d);
                }
            }
        }
    }
    detail.pos_score = pos_score;

    if let Some(best) = selected {
        if name_ok && pos_score < 1.0 {
            let place = if best.is_point() {
                "the center of mass"
            } else {
                "the contact surface"
            };
            let shown = if entered.is_empty() {
                spec.name.as_str()
            } else {
                entered
            };
            let line = fb.push(format!(
                "The point of application of {shown} should lie at {place}."
            ));
            for cand in &spec.anchors {
                let shape = match cand {
                    AnchorSpec::Point { point } => OverlayShape::Circle {
                        center: *point,
                        r_ok: tol.pos_tol,
                        r_span: tol.pos_span,
                    },
                    AnchorSpec::Segment { a, b } => OverlayShape::Stadium {
                        a: *a,
                        b: *b,
                        r_ok: tol.pos_tol,
                        r_span: tol.pos_span,
                    },
                };
                fb.attach(line, shape);
            }
        }
    }

    let w_sum = spec.w_name + spec.w_dir + spec.w_pos;
    detail.combined = if w_sum > 0.0 {
        (spec.w_name * detail.name_score + spec.w_dir * dir_score + spec.w_pos * pos_score) / w_sum
    } else {
        0.0
    };
}

/// Components of `total` along the task's basis axes. An np basis without a
/// scene plane falls back to xy rather than failing.
fn basis_components(task: &TaskSpec, total: Vec2) -> (f32, f32) {
    match task.basis {
        Basis::Xy => (total.x, total.y),
        Basis::Np => match &task.scene.plane {
            Some(plane) => (total.dot(plane.n_vec), total.dot(plane.p_vec())),
            None => {
                debug!(task = %task.id, "np basis without a plane; using xy components");
                (total.x, total.y)
            }
        },
    }
}

fn evaluate_equilibrium(
    task: &TaskSpec,
    matched: &BTreeMap<String, usize>,
    complete: &[DrawnForce],
    fb: &mut FeedbackBuilder,
) -> (f32, EquilibriumDetail) {
    let tol = &task.tol;

    let mut total = Vec2::ZERO;
    let mut max_force = 0.0f32;
    for &di in matched.values() {
        let v = complete[di].vector().unwrap_or(Vec2::ZERO);
        total = total.add(v);
        max_force = max_force.max(v.norm());
    }

    let (c1, c2) = basis_components(task, total);
    let residual = c1.hypot(c2);

    // Residual imbalance judged relative to the largest force so the
    // tolerance is scale-invariant.
    let relative_error = if max_force > EPS {
        residual / max_force
    } else if residual > EPS {
        f32::INFINITY
    } else {
        0.0
    };

    let score = ramp_down_linear(relative_error, tol.sum_tol, tol.sum_span);

    if score < 1.0 {
        let line = fb.push(format!(
            "The sum of the forces should be \u{2248} 0 ({} basis).",
            task.basis
        ));
        let origin = task.scene.origin.unwrap_or(DEFAULT_ORIGIN);
        let (r_ok, r_span) = if max_force > EPS {
            (tol.sum_tol * max_force, tol.sum_span * max_force)
        } else {
            (10.0, 50.0)
        };
        fb.attach(
            line,
            OverlayShape::Circle {
                center: origin,
                r_ok,
                r_span,
            },
        );
    }

    (
        score,
        EquilibriumDetail {
            total,
            c1,
            c2,
            magnitude: residual,
            max_force,
            relative_error,
            score,
        },
    )
}

/// Evaluate one magnitude relation, or None when it is skipped.
///
/// A relation is skipped (not zero-scored) unless every referenced force is
/// matched with an accepted name.
fn evaluate_relation(
    rel: &MagnitudeRelation,
    task: &TaskSpec,
    matched: &BTreeMap<String, usize>,
    complete: &[DrawnForce],
    details: &BTreeMap<String, ForceDetail>,
    fb: &mut FeedbackBuilder,
) -> Option<RelationDetail> {
    let tol = &task.tol;

    let names_ok = rel.term_names().all(|name| {
        matched.contains_key(name)
            && details
                .get(name)
                .is_some_and(|d| d.found && d.name_score >= 1.0)
    });
    if !names_ok {
        return None;
    }

    let side_value = |terms: &[crate::spec::MagTerm]| -> f32 {
        terms
            .iter()
            .map(|t| {
                let v = matched
                    .get(&t.force_name)
                    .and_then(|&di| complete[di].vector())
                    .unwrap_or(Vec2::ZERO);
                t.value(v)
            })
            .sum()
    };
    let lhs = side_value(&rel.lhs);
    let rhs = side_value(&rel.rhs);

    // Feedback names use what the learner actually wrote.
    let shown = |terms: &[crate::spec::MagTerm]| -> String {
        let names: Vec<&str> = terms
            .iter()
            .map(|t| {
                details
                    .get(&t.force_name)
                    .map(|d| d.drawn_name.trim())
                    .filter(|s| !s.is_empty())
                    .unwrap_or(t.force_name.as_str())
            })
            .collect();
        if names.len() > 1 {
            format!("({})", names.join("+"))
        } else {
            names.join("+")
        }
    };

    if rhs.abs() < EPS {
        fb.push(format!(
            "{}/{}: cannot compute (division by zero).",
            shown(&rel.lhs),
            shown(&rel.rhs)
        ));
        return Some(RelationDetail {
            lhs,
            rhs,
            ratio: f32::INFINITY,
            target: rel.ratio,
            error: f32::INFINITY,
            score: 0.0,
        });
    }

    let ratio = lhs / rhs;
    let error = (ratio - rel.ratio).abs() / rel.ratio.abs().max(1.0);
    let rel_tol = rel.tol_rel.unwrap_or(tol.rel_tol);
    let score = ramp_down_linear(error, rel_tol, tol.rel_span);

    if score < 1.0 {
        fb.push(format!(
            "{}/{} should be \u{2248} {:.2}.",
            shown(&rel.lhs),
            shown(&rel.rhs),
            rel.ratio
        ));
    }

    Some(RelationDetail {
        lhs,
        rhs,
        ratio,
        target: rel.ratio,
        error,
        score,
    })
}
