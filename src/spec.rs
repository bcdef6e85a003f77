use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum_macros::{Display, EnumString};

use crate::config::Tolerances;
use crate::error::{FgResult, ForceGradeError};
use crate::forces::DrawnForce;
use crate::geometry::Vec2;

/// Which axes the equilibrium residual is measured along.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Basis {
    /// Screen x/y axes.
    #[default]
    Xy,
    /// Normal/parallel axes of the scene plane.
    Np,
}

/// Expected attachment location for a force: a single point or anywhere
/// along a segment. The scorer picks the best-scoring candidate when a
/// ForceSpec lists several.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnchorSpec {
    Point { point: Vec2 },
    Segment { a: Vec2, b: Vec2 },
}

impl AnchorSpec {
    pub fn point(p: Vec2) -> Self {
        AnchorSpec::Point { point: p }
    }

    pub fn segment(a: Vec2, b: Vec2) -> Self {
        AnchorSpec::Segment { a, b }
    }

    pub fn is_point(&self) -> bool {
        matches!(self, AnchorSpec::Point { .. })
    }
}

/// One expected force in a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceSpec {
    pub name: String,

    #[serde(default)]
    pub aliases: BTreeSet<String>,

    /// Expected direction; constructors normalize this once.
    pub dir_unit: Vec2,

    /// Acceptable anchor locations (alternatives, best one wins).
    #[serde(default)]
    pub anchors: Vec<AnchorSpec>,

    #[serde(default = "default_weight")]
    pub w_name: f32,
    #[serde(default = "default_weight")]
    pub w_dir: f32,
    #[serde(default = "default_weight")]
    pub w_pos: f32,
}

fn default_weight() -> f32 {
    1.0
}

impl ForceSpec {
    pub fn new(name: &str, direction: Vec2) -> Self {
        ForceSpec {
            name: name.to_string(),
            aliases: BTreeSet::new(),
            dir_unit: direction.unit(),
            anchors: Vec::new(),
            w_name: 1.0,
            w_dir: 1.0,
            w_pos: 1.0,
        }
    }

    pub fn from_angle_deg(name: &str, angle_deg: f32) -> Self {
        Self::new(name, Vec2::from_angle_deg(angle_deg))
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn anchored(mut self, anchor: AnchorSpec) -> Self {
        self.anchors.push(anchor);
        self
    }

    pub fn with_weights(mut self, w_name: f32, w_dir: f32, w_pos: f32) -> Self {
        self.w_name = w_name;
        self.w_dir = w_dir;
        self.w_pos = w_pos;
        self
    }
}

/// One term in a linear combination of force magnitudes/components.
///
/// `e_vec = None` reads the vector magnitude; `Some(v)` reads the component
/// along `unit(v)`. A zero `e_vec` makes the term contribute 0 rather than
/// erroring, per the treat-malformed-as-absent rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MagTerm {
    pub force_name: String,

    #[serde(default)]
    pub e_vec: Option<Vec2>,

    #[serde(default = "default_sign")]
    pub sign: f32,
}

fn default_sign() -> f32 {
    1.0
}

impl MagTerm {
    /// Magnitude term: |force|.
    pub fn mag(force_name: &str) -> Self {
        MagTerm {
            force_name: force_name.to_string(),
            e_vec: None,
            sign: 1.0,
        }
    }

    /// Directed component term: dot(force, unit(direction)).
    pub fn along(force_name: &str, direction: Vec2) -> Self {
        MagTerm {
            force_name: force_name.to_string(),
            e_vec: Some(direction),
            sign: 1.0,
        }
    }

    pub fn signed(mut self, sign: f32) -> Self {
        self.sign = sign;
        self
    }

    /// Value of this term for a drawn force vector.
    pub fn value(&self, vec: Vec2) -> f32 {
        match self.e_vec {
            None => self.sign * vec.norm(),
            Some(e) => self.sign * vec.dot(e.unit()),
        }
    }
}

/// Declares that `sum(lhs) / sum(rhs)` should equal `ratio` within a
/// relative tolerance. `tol_rel` overrides the task-level `rel_tol` when set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MagnitudeRelation {
    pub lhs: Vec<MagTerm>,
    pub rhs: Vec<MagTerm>,

    #[serde(default = "default_ratio")]
    pub ratio: f32,

    #[serde(default)]
    pub tol_rel: Option<f32>,
}

fn default_ratio() -> f32 {
    1.0
}

impl MagnitudeRelation {
    pub fn new(lhs: Vec<MagTerm>, rhs: Vec<MagTerm>, ratio: f32) -> Self {
        MagnitudeRelation {
            lhs,
            rhs,
            ratio,
            tol_rel: None,
        }
    }

    pub fn term_names(&self) -> impl Iterator<Item = &str> {
        self.lhs
            .iter()
            .chain(self.rhs.iter())
            .map(|t| t.force_name.as_str())
    }
}

/// Infinite plane through a point, oriented by its upward normal.
/// Screen coordinates: for a horizontal floor (angle 0) the normal is (0,-1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaneSpec {
    pub through: Vec2,
    pub n_vec: Vec2,
    pub angle_deg: f32,
}

impl PlaneSpec {
    /// Plane tilted `angle_deg` counter-clockwise from horizontal.
    pub fn from_angle(through: Vec2, angle_deg: f32) -> Self {
        let a = angle_deg.to_radians();
        let n = Vec2::new(-a.sin(), -a.cos()).unit();
        PlaneSpec {
            through,
            n_vec: n,
            angle_deg,
        }
    }

    pub fn from_normal(through: Vec2, n_vec: Vec2) -> Self {
        let n = n_vec.unit();
        let t = n.perp();
        let angle_deg = (-t.heading_deg()).rem_euclid(360.0);
        PlaneSpec {
            through,
            n_vec: n,
            angle_deg,
        }
    }

    /// Tangent along the plane (perpendicular to the normal).
    pub fn p_vec(&self) -> Vec2 {
        self.n_vec.perp()
    }

    /// Signed distance from `p`, positive on the normal side.
    pub fn signed_distance(&self, p: Vec2) -> f32 {
        p.sub(self.through).dot(self.n_vec)
    }

    /// Orthogonal projection of `p` onto the plane.
    pub fn project_point(&self, p: Vec2) -> Vec2 {
        let e_p = self.p_vec();
        let k = p.sub(self.through).dot(e_p);
        self.through.add(e_p.scale(k))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionKind {
    Center,
    #[default]
    BottomCenter,
}

/// Oriented rectangle, positioned by its center or bottom-center point.
/// Provides the named points and edge segments task authors anchor forces to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectSpec {
    pub width: f32,
    pub height: f32,
    pub position: Vec2,

    #[serde(default)]
    pub position_kind: PositionKind,

    #[serde(default)]
    pub angle_deg: f32,
}

impl RectSpec {
    pub fn new(position: Vec2, width: f32, height: f32, position_kind: PositionKind) -> Self {
        RectSpec {
            width,
            height,
            position,
            position_kind,
            angle_deg: 0.0,
        }
    }

    pub fn with_angle(mut self, angle_deg: f32) -> Self {
        self.angle_deg = angle_deg;
        self
    }

    /// Unit normal of the bottom edge (points away from the ground).
    pub fn n_vec(&self) -> Vec2 {
        let a = self.angle_deg.to_radians();
        Vec2::new(-a.sin(), -a.cos())
    }

    /// Unit tangent along the bottom edge.
    pub fn t_vec(&self) -> Vec2 {
        self.n_vec().perp()
    }

    fn offset(&self, p: Vec2, along_t: f32, along_n: f32) -> Vec2 {
        p.add(self.t_vec().scale(along_t)).add(self.n_vec().scale(along_n))
    }

    pub fn bottom_center(&self) -> Vec2 {
        match self.position_kind {
            PositionKind::BottomCenter => self.position,
            // bottom_center sits half a height against the normal
            PositionKind::Center => self.offset(self.position, 0.0, -self.height * 0.5),
        }
    }

    pub fn center(&self) -> Vec2 {
        self.offset(self.bottom_center(), 0.0, self.height * 0.5)
    }

    pub fn top_center(&self) -> Vec2 {
        self.offset(self.bottom_center(), 0.0, self.height)
    }

    pub fn left_bottom(&self) -> Vec2 {
        self.offset(self.bottom_center(), -self.width * 0.5, 0.0)
    }

    pub fn right_bottom(&self) -> Vec2 {
        self.offset(self.bottom_center(), self.width * 0.5, 0.0)
    }

    pub fn left_top(&self) -> Vec2 {
        self.offset(self.top_center(), -self.width * 0.5, 0.0)
    }

    pub fn right_top(&self) -> Vec2 {
        self.offset(self.top_center(), self.width * 0.5, 0.0)
    }

    pub fn left_middle(&self) -> Vec2 {
        self.offset(self.center(), -self.width * 0.5, 0.0)
    }

    pub fn right_middle(&self) -> Vec2 {
        self.offset(self.center(), self.width * 0.5, 0.0)
    }

    pub fn bottom(&self) -> (Vec2, Vec2) {
        (self.left_bottom(), self.right_bottom())
    }

    pub fn top(&self) -> (Vec2, Vec2) {
        (self.left_top(), self.right_top())
    }

    pub fn left(&self) -> (Vec2, Vec2) {
        (self.left_bottom(), self.left_top())
    }

    pub fn right(&self) -> (Vec2, Vec2) {
        (self.right_bottom(), self.right_top())
    }
}

/// Scene geometry. The scorer only reads `plane` (np-basis projection axes)
/// and `origin` (equilibrium overlay placement); the rest exists for task
/// authoring and the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSpec {
    pub plane: Option<PlaneSpec>,
    pub rects: Vec<RectSpec>,
    pub origin: Option<Vec2>,
}

/// Instructor-predrawn force included in a task for context. Merged into
/// the drawn set as non-editable before scoring; it participates in
/// matching and relations but earns no per-force credit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialForce {
    pub anchor: Vec2,
    pub arrow_base: Vec2,
    pub arrow_tip: Vec2,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub editable: bool,

    #[serde(default)]
    pub moveable: bool,
}

impl InitialForce {
    pub fn new(name: &str, anchor: Vec2, arrow_base: Vec2, arrow_tip: Vec2) -> Self {
        InitialForce {
            anchor,
            arrow_base,
            arrow_tip,
            name: name.to_string(),
            editable: false,
            moveable: false,
        }
    }

    pub fn to_drawn(&self) -> DrawnForce {
        DrawnForce {
            name: self.name.clone(),
            anchor: Some(self.anchor),
            arrow_base: Some(self.arrow_base),
            arrow_tip: Some(self.arrow_tip),
            editable: self.editable,
            moveable: self.moveable,
        }
    }
}

/// Immutable description of one exercise. Constructed once at startup and
/// read-only thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    pub id: String,
    pub title: String,

    #[serde(default)]
    pub scene: SceneSpec,

    #[serde(default)]
    pub basis: Basis,

    pub expected_forces: Vec<ForceSpec>,

    #[serde(default)]
    pub initial_forces: Vec<InitialForce>,

    #[serde(default)]
    pub relations: Vec<MagnitudeRelation>,

    #[serde(default)]
    pub tol: Tolerances,

    #[serde(default)]
    pub short_lines: Vec<String>,

    #[serde(default)]
    pub help_lines: Vec<String>,
}

impl TaskSpec {
    pub fn expected(&self, name: &str) -> Option<&ForceSpec> {
        self.expected_forces.iter().find(|f| f.name == name)
    }

    /// Structural sanity check used by task authors and tests. A failing
    /// relation term does not break evaluation (it is skipped there), but
    /// authors want to hear about it.
    pub fn validate(&self) -> FgResult<()> {
        for fs in &self.expected_forces {
            if fs.dir_unit.is_zero() {
                return Err(ForceGradeError::Validation(format!(
                    "task '{}': force '{}' has a zero direction",
                    self.id, fs.name
                )));
            }
        }
        for (i, rel) in self.relations.iter().enumerate() {
            for name in rel.term_names() {
                if self.expected(name).is_none() {
                    return Err(ForceGradeError::Validation(format!(
                        "task '{}': relation {} references undeclared force '{}'",
                        self.id, i, name
                    )));
                }
            }
        }
        Ok(())
    }
}
