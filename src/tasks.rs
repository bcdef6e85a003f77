use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::geometry::Vec2;
use crate::spec::{
    AnchorSpec, Basis, ForceSpec, InitialForce, MagTerm, MagnitudeRelation, PlaneSpec,
    PositionKind, RectSpec, SceneSpec, TaskSpec,
};

/// Grid step of the default drawing surface.
pub const GRID: f32 = 20.0;

/// Scene point the built-in tasks are laid out around.
pub const DRAW_CENTER: Vec2 = Vec2 { x: 320.0, y: 240.0 };

#[derive(Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum KnownTask {
    FlatRest,
    PulledBlock,
    Incline,
}

impl KnownTask {
    pub fn spec(&self) -> TaskSpec {
        match self {
            Self::FlatRest => flat_rest(),
            Self::PulledBlock => pulled_block(),
            Self::Incline => incline(),
        }
    }
}

pub fn all_tasks() -> Vec<TaskSpec> {
    KnownTask::iter().map(|t| t.spec()).collect()
}

pub fn task_by_id(id: &str) -> Option<TaskSpec> {
    all_tasks().into_iter().find(|t| t.id == id)
}

/// Block at rest on a flat frictionless floor: gravity and the normal force.
fn flat_rest() -> TaskSpec {
    let plane = PlaneSpec::from_angle(DRAW_CENTER, 0.0);
    let rect = RectSpec::new(DRAW_CENTER, GRID * 8.0, GRID * 6.0, PositionKind::BottomCenter);

    let gravity = ForceSpec::new("G", Vec2::DOWN)
        .with_aliases(["g", "fg", "gravity", "weight"])
        .anchored(AnchorSpec::point(rect.center()));
    let normal = ForceSpec::new("N", plane.n_vec)
        .with_aliases(["n", "fn", "normal"])
        .anchored(AnchorSpec::segment(rect.left_bottom(), rect.right_bottom()));

    TaskSpec {
        id: "flat_rest".to_string(),
        title: "Block at rest on a flat floor".to_string(),
        scene: SceneSpec {
            plane: Some(plane),
            rects: vec![rect],
            origin: Some(DRAW_CENTER),
        },
        basis: Basis::Xy,
        expected_forces: vec![gravity, normal],
        initial_forces: vec![],
        relations: vec![MagnitudeRelation::new(
            vec![MagTerm::mag("G")],
            vec![MagTerm::mag("N")],
            1.0,
        )],
        tol: Default::default(),
        short_lines: vec![
            "Draw the forces acting on block A.".to_string(),
            "v = 0 (constant)".to_string(),
        ],
        help_lines: vec![
            "A block A rests on a flat surface.".to_string(),
            "Draw the forces acting on the block.".to_string(),
        ],
    }
}

/// Block pulled at constant speed: the applied force F is predrawn, the
/// learner adds gravity, the normal force and friction.
fn pulled_block() -> TaskSpec {
    let plane = PlaneSpec::from_angle(DRAW_CENTER, 0.0);
    let rect = RectSpec::new(DRAW_CENTER, GRID * 8.0, GRID * 6.0, PositionKind::BottomCenter);

    let applied = ForceSpec::new("F", Vec2::RIGHT)
        .with_aliases(["f", "fa", "applied", "pull"])
        .anchored(AnchorSpec::segment(rect.right_bottom(), rect.right_top()));
    let gravity = ForceSpec::new("G", Vec2::DOWN)
        .with_aliases(["g", "fg", "gravity", "weight"])
        .anchored(AnchorSpec::point(rect.center()));
    let normal = ForceSpec::new("N", plane.n_vec)
        .with_aliases(["n", "fn", "normal"])
        .anchored(AnchorSpec::segment(rect.left_bottom(), rect.right_bottom()));
    let friction = ForceSpec::new("R", Vec2::LEFT)
        .with_aliases(["r", "fr", "friction"])
        .anchored(AnchorSpec::segment(rect.left_bottom(), rect.right_bottom()));

    let grip = rect.right_middle();
    TaskSpec {
        id: "pulled_block".to_string(),
        title: "Block pulled by a force F".to_string(),
        scene: SceneSpec {
            plane: Some(plane),
            rects: vec![rect],
            origin: Some(DRAW_CENTER),
        },
        basis: Basis::Xy,
        expected_forces: vec![applied, gravity, normal, friction],
        initial_forces: vec![InitialForce::new(
            "F",
            grip,
            grip,
            grip.add(Vec2::new(3.0 * GRID, 0.0)),
        )],
        relations: vec![
            MagnitudeRelation::new(vec![MagTerm::mag("G")], vec![MagTerm::mag("N")], 1.0),
            MagnitudeRelation::new(vec![MagTerm::mag("F")], vec![MagTerm::mag("R")], 1.0),
        ],
        tol: Default::default(),
        short_lines: vec![
            "Draw the remaining forces acting on A.".to_string(),
            "v = constant".to_string(),
        ],
        help_lines: vec![
            "A block A on a flat surface is pulled by a force F".to_string(),
            "and moves right at constant speed.".to_string(),
            "Draw the forces acting on the block.".to_string(),
        ],
    }
}

/// Frictionless incline, scored in the plane's normal/parallel basis.
fn incline() -> TaskSpec {
    let plane = PlaneSpec::from_angle(DRAW_CENTER, 30.0);
    let rect = RectSpec::new(DRAW_CENTER, GRID * 8.0, GRID * 6.0, PositionKind::BottomCenter)
        .with_angle(30.0);

    let gravity = ForceSpec::new("G", Vec2::DOWN)
        .with_aliases(["g", "fg", "gravity", "weight"])
        .anchored(AnchorSpec::point(rect.center()));
    let normal = ForceSpec::new("N", plane.n_vec)
        .with_aliases(["n", "fn", "normal"])
        .anchored(AnchorSpec::segment(rect.left_bottom(), rect.right_bottom()));

    // N should cancel the normal component of G.
    let relation = MagnitudeRelation::new(
        vec![MagTerm::along("G", plane.n_vec).signed(-1.0)],
        vec![MagTerm::mag("N")],
        1.0,
    );

    TaskSpec {
        id: "incline".to_string(),
        title: "Block on a frictionless incline".to_string(),
        scene: SceneSpec {
            plane: Some(plane),
            rects: vec![rect],
            origin: Some(DRAW_CENTER),
        },
        basis: Basis::Np,
        expected_forces: vec![gravity, normal],
        initial_forces: vec![],
        relations: vec![relation],
        tol: Default::default(),
        short_lines: vec![
            "Draw the forces acting on A.".to_string(),
            "\u{3bc} = 0".to_string(),
        ],
        help_lines: vec![
            "A block A slides down a frictionless incline.".to_string(),
            "Draw the forces acting on the block.".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tasks_validate() {
        for task in all_tasks() {
            task.validate().unwrap();
        }
    }

    #[test]
    fn task_ids_are_unique_and_resolvable() {
        let tasks = all_tasks();
        for t in &tasks {
            let found = task_by_id(&t.id).unwrap();
            assert_eq!(found.id, t.id);
        }
        assert!(task_by_id("no_such_task").is_none());
    }

    #[test]
    fn incline_normal_opposes_gravity_component() {
        let task = KnownTask::Incline.spec();
        let plane = task.scene.plane.as_ref().unwrap();
        // Gravity points into the plane, so its normal component is negative.
        assert!(Vec2::DOWN.dot(plane.n_vec) < 0.0);
        assert_eq!(task.basis, Basis::Np);
    }
}
