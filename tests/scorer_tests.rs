use forcegrade::config::Config;
use forcegrade::forces::DrawnForce;
use forcegrade::geometry::Vec2;
use forcegrade::scorer::{engine, evaluate};
use forcegrade::spec::{
    AnchorSpec, Basis, ForceSpec, MagTerm, MagnitudeRelation, SceneSpec, TaskSpec,
};
use forcegrade::tasks::KnownTask;

fn arrow(name: &str, anchor: Vec2, dir: Vec2, len: f32) -> DrawnForce {
    let tip = anchor.add(dir.unit().scale(len));
    DrawnForce::new(name, anchor, anchor, tip)
}

/// Minimal two-force equilibrium task without relations, so the quality
/// gate runs the force-sum check.
fn equilibrium_task() -> TaskSpec {
    let p = Vec2::new(100.0, 100.0);
    let seg_a = Vec2::new(50.0, 200.0);
    let seg_b = Vec2::new(150.0, 200.0);
    TaskSpec {
        id: "eq".to_string(),
        title: "equilibrium".to_string(),
        scene: SceneSpec {
            origin: Some(Vec2::new(100.0, 150.0)),
            ..Default::default()
        },
        basis: Basis::Xy,
        expected_forces: vec![
            ForceSpec::new("G", Vec2::DOWN).anchored(AnchorSpec::point(p)),
            ForceSpec::new("N", Vec2::UP).anchored(AnchorSpec::segment(seg_a, seg_b)),
        ],
        initial_forces: vec![],
        relations: vec![],
        tol: Default::default(),
        short_lines: vec![],
        help_lines: vec![],
    }
}

#[test]
fn perfect_answer_scores_full_marks() {
    let task = KnownTask::FlatRest.spec();
    let rect = &task.scene.rects[0];
    let drawn = vec![
        arrow("G", rect.center(), Vec2::DOWN, 100.0),
        arrow("N", rect.bottom_center(), Vec2::UP, 100.0),
    ];
    let result = evaluate(&task, &drawn);
    assert!(result.score >= 0.95, "score was {}", result.score);
    assert_eq!(result.coverage, 1.0);
    assert!(result.feedback.is_empty(), "feedback: {:?}", result.feedback);
}

#[test]
fn missing_force_applies_coverage_penalty() {
    let task = KnownTask::FlatRest.spec();
    let rect = &task.scene.rects[0];
    let drawn = vec![arrow("G", rect.center(), Vec2::DOWN, 100.0)];
    let result = evaluate(&task, &drawn);

    assert_eq!(result.coverage, 0.5);
    // Per-force score is perfect, so the ceiling is the coverage penalty.
    assert!(result.score <= 0.5f32.powf(1.5) + 1e-4);
    assert!(result.score < 0.5);
    assert!(result
        .feedback
        .iter()
        .any(|l| l.contains("missing")), "feedback: {:?}", result.feedback);
}

#[test]
fn wrong_direction_zeroes_direction_score() {
    let task = KnownTask::FlatRest.spec();
    let rect = &task.scene.rects[0];
    // 45 degrees off vertical, well past the 5+20 degree band.
    let skew = Vec2::new(1.0, 1.0);
    let drawn = vec![
        arrow("G", rect.center(), skew, 100.0),
        arrow("N", rect.bottom_center(), Vec2::UP, 100.0),
    ];
    let result = evaluate(&task, &drawn);

    let g = &result.forces["G"];
    assert_eq!(g.dir_score, 0.0);
    assert!(g.combined < 1.0);
    assert!(g.angle_error_deg.unwrap() > 40.0);
    assert!(result
        .feedback
        .iter()
        .any(|l| l.contains("direction") && l.contains("G")));
}

#[test]
fn relation_violation_lowers_quality() {
    let task = KnownTask::FlatRest.spec();
    let rect = &task.scene.rects[0];
    // Magnitudes 100 vs 150: ratio error 0.33, past 0.15 tolerance.
    let drawn = vec![
        arrow("G", rect.center(), Vec2::DOWN, 100.0),
        arrow("N", rect.bottom_center(), Vec2::UP, 150.0),
    ];
    let result = evaluate(&task, &drawn);

    assert!(result.relations_score < 1.0);
    assert_eq!(result.relations.len(), 1);
    let rel = &result.relations[0];
    assert!((rel.error - 1.0 / 3.0).abs() < 0.01);
    assert!(rel.score < 0.5);
    assert!(result.feedback.iter().any(|l| l.contains("G/N")));
    assert!(result.score < 0.95);
}

#[test]
fn relation_skipped_when_name_is_wrong() {
    let task = KnownTask::FlatRest.spec();
    let rect = &task.scene.rects[0];
    let drawn = vec![
        arrow("G", rect.center(), Vec2::DOWN, 100.0),
        arrow("Q", rect.bottom_center(), Vec2::UP, 150.0),
    ];
    let result = evaluate(&task, &drawn);

    // Naming error already costs the force half its name score; the
    // relation stays out of the quality gate instead of double-counting.
    assert!(result.relations.is_empty());
    assert_eq!(result.relations_score, 1.0);
    assert_eq!(result.forces["N"].name_score, 0.5);
}

#[test]
fn empty_answer_gate() {
    let task = KnownTask::FlatRest.spec();
    let result = evaluate(&task, &[]);
    assert_eq!(result.score, 0.0);
    assert_eq!(result.coverage, 0.0);
    assert_eq!(result.feedback.len(), 1);
    assert!(result.feedback[0].contains("No forces drawn"));
}

#[test]
fn incomplete_forces_do_not_lift_the_gate() {
    let task = KnownTask::FlatRest.spec();
    let rect = &task.scene.rects[0];
    // Arrow shorter than the 20 unit minimum.
    let drawn = vec![arrow("G", rect.center(), Vec2::DOWN, 10.0)];
    let result = evaluate(&task, &drawn);
    assert_eq!(result.score, 0.0);
    assert!(result.feedback[0].contains("No forces drawn"));
}

#[test]
fn predrawn_force_counts_for_coverage_but_not_credit() {
    let task = KnownTask::PulledBlock.spec();
    let rect = &task.scene.rects[0];
    // F is predrawn by the task; the learner adds the other three.
    let drawn = vec![
        arrow("G", rect.center(), Vec2::DOWN, 100.0),
        arrow("N", rect.bottom_center(), Vec2::UP, 100.0),
        arrow("R", rect.bottom_center(), Vec2::LEFT, 60.0),
    ];
    let result = evaluate(&task, &drawn);

    let f = &result.forces["F"];
    assert!(f.found);
    assert!(!f.editable);
    assert_eq!(f.combined, 0.0);
    assert_eq!(result.coverage, 1.0);
    assert!(result.score > 0.5, "score was {}", result.score);
}

#[test]
fn unnamed_force_feedback_comes_first() {
    let task = KnownTask::FlatRest.spec();
    let rect = &task.scene.rects[0];
    let drawn = vec![
        arrow("", rect.center(), Vec2::DOWN, 100.0),
        arrow("N", rect.bottom_center(), Vec2::UP, 150.0),
    ];
    let result = evaluate(&task, &drawn);

    assert_eq!(result.feedback[0], "One force is missing a name.");
    // The unnamed force still matches on geometry at half name credit,
    // but gets no wrong-name complaint.
    let g = &result.forces["G"];
    assert!(g.found);
    assert_eq!(g.name_score, 0.5);
    assert!(!result.feedback.iter().any(|l| l.contains("not the expected name")));
}

#[test]
fn wrong_name_feedback_quotes_the_entered_name() {
    let task = KnownTask::FlatRest.spec();
    let rect = &task.scene.rects[0];
    let drawn = vec![
        arrow("Z", rect.center(), Vec2::DOWN, 100.0),
        arrow("N", rect.bottom_center(), Vec2::UP, 100.0),
    ];
    let result = evaluate(&task, &drawn);
    assert!(result.feedback.iter().any(|l| l.contains("'Z'")));
}

#[test]
fn balanced_forces_pass_the_equilibrium_gate() {
    let task = equilibrium_task();
    let drawn = vec![
        arrow("G", Vec2::new(100.0, 100.0), Vec2::DOWN, 120.0),
        arrow("N", Vec2::new(100.0, 200.0), Vec2::UP, 120.0),
    ];
    let result = evaluate(&task, &drawn);
    assert_eq!(result.equilibrium_score, 1.0);
    let eq = result.equilibrium.unwrap();
    assert!(eq.magnitude < 1e-3);
    assert!(result.score >= 0.95);
}

#[test]
fn unbalanced_forces_fail_the_equilibrium_gate() {
    let task = equilibrium_task();
    let drawn = vec![
        arrow("G", Vec2::new(100.0, 100.0), Vec2::DOWN, 200.0),
        arrow("N", Vec2::new(100.0, 200.0), Vec2::UP, 40.0),
    ];
    let result = evaluate(&task, &drawn);

    let eq = result.equilibrium.as_ref().unwrap();
    // Residual 160 against a 200 max force, past the 0.15+0.40 band.
    assert!((eq.relative_error - 0.8).abs() < 1e-3);
    assert_eq!(result.equilibrium_score, 0.0);
    assert!(result.feedback.iter().any(|l| l.contains("sum of the forces")));
    // Quality floor: the geometric half of the score survives.
    assert!(result.score > 0.0);
    assert!((result.score - 0.5).abs() < 1e-3);
}

#[test]
fn equilibrium_overlay_lands_on_the_scene_origin() {
    let task = equilibrium_task();
    let drawn = vec![
        arrow("G", Vec2::new(100.0, 100.0), Vec2::DOWN, 200.0),
        arrow("N", Vec2::new(100.0, 200.0), Vec2::UP, 40.0),
    ];
    let result = evaluate(&task, &drawn);

    let line = result
        .feedback
        .iter()
        .position(|l| l.contains("sum of the forces"))
        .unwrap();
    let shapes = &result.overlays[&line];
    match &shapes[0] {
        forcegrade::scorer::OverlayShape::Circle { center, r_ok, r_span } => {
            assert_eq!(*center, Vec2::new(100.0, 150.0));
            // Radii scale with the largest force.
            assert!((r_ok - 0.15 * 200.0).abs() < 1e-3);
            assert!((r_span - 0.40 * 200.0).abs() < 1e-3);
        }
        other => panic!("expected a circle overlay, got {:?}", other),
    }
}

#[test]
fn np_basis_splits_the_residual_along_the_plane() {
    let task = KnownTask::Incline.spec();
    let plane = task.scene.plane.clone().unwrap();
    let rect = &task.scene.rects[0];

    // G straight down, N along the plane normal with the exact magnitude
    // that cancels the normal component of G.
    let g_len = 100.0;
    let n_len = -Vec2::DOWN.dot(plane.n_vec) * g_len;
    let drawn = vec![
        arrow("G", rect.center(), Vec2::DOWN, g_len),
        arrow("N", rect.bottom_center(), plane.n_vec, n_len),
    ];
    let result = evaluate(&task, &drawn);

    // The defining relation of the incline holds exactly.
    assert_eq!(result.relations.len(), 1);
    assert!(result.relations[0].error < 1e-3);
    assert_eq!(result.relations_score, 1.0);
    assert!(result.score >= 0.95, "score was {}", result.score);
}

#[test]
fn division_by_zero_relation_scores_zero() {
    let mut task = equilibrium_task();
    task.relations = vec![MagnitudeRelation::new(
        vec![MagTerm::mag("G")],
        // Component of N along a direction perpendicular to it.
        vec![MagTerm::along("N", Vec2::RIGHT)],
        1.0,
    )];
    let drawn = vec![
        arrow("G", Vec2::new(100.0, 100.0), Vec2::DOWN, 100.0),
        arrow("N", Vec2::new(100.0, 200.0), Vec2::UP, 100.0),
    ];
    let result = evaluate(&task, &drawn);

    assert_eq!(result.relations.len(), 1);
    assert_eq!(result.relations[0].score, 0.0);
    assert!(result.relations[0].error.is_infinite());
    assert!(result.feedback.iter().any(|l| l.contains("cannot compute")));
}

#[test]
fn np_basis_without_a_plane_falls_back_to_xy() {
    let mut task = equilibrium_task();
    task.basis = Basis::Np;
    assert!(task.scene.plane.is_none());

    let drawn = vec![
        arrow("G", Vec2::new(100.0, 100.0), Vec2::DOWN, 200.0),
        arrow("N", Vec2::new(100.0, 200.0), Vec2::UP, 40.0),
    ];
    let result = evaluate(&task, &drawn);

    // Residual components are plain screen axes.
    let eq = result.equilibrium.as_ref().unwrap();
    assert_eq!(eq.c1, eq.total.x);
    assert_eq!(eq.c2, eq.total.y);
    assert!((eq.relative_error - 0.8).abs() < 1e-3);
    assert_eq!(result.equilibrium_score, 0.0);
}

#[test]
fn zero_direction_relation_term_contributes_nothing() {
    let mut task = equilibrium_task();
    task.relations = vec![MagnitudeRelation::new(
        vec![MagTerm::along("G", Vec2::ZERO)],
        vec![MagTerm::mag("N")],
        1.0,
    )];
    let drawn = vec![
        arrow("G", Vec2::new(100.0, 100.0), Vec2::DOWN, 100.0),
        arrow("N", Vec2::new(100.0, 200.0), Vec2::UP, 100.0),
    ];
    let result = evaluate(&task, &drawn);

    assert_eq!(result.relations.len(), 1);
    let rel = &result.relations[0];
    assert_eq!(rel.lhs, 0.0);
    // 0/100 against a target of 1: full relative error, zero score.
    assert!((rel.error - 1.0).abs() < 1e-3);
    assert_eq!(rel.score, 0.0);
}

#[test]
fn per_relation_tolerance_overrides_the_task_band() {
    let mut task = KnownTask::FlatRest.spec();
    let rect = task.scene.rects[0].clone();
    // Ratio error 0.33 fails the default 0.15 band (see
    // relation_violation_lowers_quality) but sits inside a widened one.
    task.relations[0].tol_rel = Some(0.5);

    let drawn = vec![
        arrow("G", rect.center(), Vec2::DOWN, 100.0),
        arrow("N", rect.bottom_center(), Vec2::UP, 150.0),
    ];
    let result = evaluate(&task, &drawn);

    assert_eq!(result.relations.len(), 1);
    assert!((result.relations[0].error - 1.0 / 3.0).abs() < 0.01);
    assert_eq!(result.relations[0].score, 1.0);
    assert_eq!(result.relations_score, 1.0);
    assert!(result.score >= 0.95, "score was {}", result.score);
}

#[test]
fn custom_min_length_is_honored() {
    let task = KnownTask::FlatRest.spec();
    let rect = &task.scene.rects[0];
    let cfg = Config {
        min_force_len: 5.0,
        ..Default::default()
    };
    // 10 units: too short by default, long enough under the custom config.
    let drawn = vec![arrow("G", rect.center(), Vec2::DOWN, 10.0)];
    let result = engine::evaluate_with(&task, &drawn, &cfg);
    assert!(result.forces["G"].found);
}

#[test]
fn position_feedback_points_at_the_expected_anchor() {
    let task = KnownTask::FlatRest.spec();
    let rect = &task.scene.rects[0];
    // G anchored far from the block center.
    let off = rect.center().add(Vec2::new(100.0, 0.0));
    let drawn = vec![
        arrow("G", off, Vec2::DOWN, 100.0),
        arrow("N", rect.bottom_center(), Vec2::UP, 100.0),
    ];
    let result = evaluate(&task, &drawn);

    let g = &result.forces["G"];
    assert_eq!(g.pos_score, 0.0);
    assert!((g.pos_error.unwrap() - 100.0).abs() < 1e-3);
    let line = result
        .feedback
        .iter()
        .position(|l| l.contains("point of application"))
        .unwrap();
    assert!(result.feedback[line].contains("center of mass"));
    assert!(!result.overlays[&line].is_empty());
}
