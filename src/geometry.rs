use serde::{Deserialize, Serialize};

/// Epsilon used to treat vectors/denominators as zero.
pub const EPS: f32 = 1e-9;

/// 2D point/vector in screen coordinates (y grows downward).
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const UP: Vec2 = Vec2 { x: 0.0, y: -1.0 };
    pub const DOWN: Vec2 = Vec2 { x: 0.0, y: 1.0 };
    pub const LEFT: Vec2 = Vec2 { x: -1.0, y: 0.0 };
    pub const RIGHT: Vec2 = Vec2 { x: 1.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }

    pub fn add(self, o: Vec2) -> Vec2 {
        Vec2::new(self.x + o.x, self.y + o.y)
    }

    pub fn sub(self, o: Vec2) -> Vec2 {
        Vec2::new(self.x - o.x, self.y - o.y)
    }

    pub fn scale(self, s: f32) -> Vec2 {
        Vec2::new(self.x * s, self.y * s)
    }

    pub fn dot(self, o: Vec2) -> f32 {
        self.x * o.x + self.y * o.y
    }

    /// 2D cross product z-component (orientation/side test).
    pub fn cross(self, o: Vec2) -> f32 {
        self.x * o.y - self.y * o.x
    }

    pub fn norm(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Unit vector, or (0,0) for near-zero input.
    pub fn unit(self) -> Vec2 {
        let n = self.norm();
        if n < EPS {
            Vec2::ZERO
        } else {
            Vec2::new(self.x / n, self.y / n)
        }
    }

    pub fn is_zero(self) -> bool {
        self.norm() < EPS
    }

    /// Perpendicular: 90 degree counter-clockwise rotation.
    pub fn perp(self) -> Vec2 {
        Vec2::new(-self.y, self.x)
    }

    pub fn rotate_deg(self, angle_deg: f32) -> Vec2 {
        if angle_deg == 0.0 {
            return self;
        }
        let a = angle_deg.to_radians();
        let (s, c) = a.sin_cos();
        Vec2::new(c * self.x - s * self.y, s * self.x + c * self.y)
    }

    pub fn distance(self, o: Vec2) -> f32 {
        self.sub(o).norm()
    }

    /// Heading in degrees, measured from +x toward +y.
    pub fn heading_deg(self) -> f32 {
        self.y.atan2(self.x).to_degrees()
    }

    /// Unit vector pointing at `angle_deg` (degrees from +x axis).
    pub fn from_angle_deg(angle_deg: f32) -> Vec2 {
        let a = angle_deg.to_radians();
        Vec2::new(a.cos(), a.sin())
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;
    fn add(self, o: Vec2) -> Vec2 {
        Vec2::add(self, o)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, o: Vec2) -> Vec2 {
        Vec2::sub(self, o)
    }
}

impl std::ops::Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// Angle between two vectors in degrees, in [0, 180].
///
/// Degenerate (near-zero) operands resolve to 180.0, the maximal mismatch,
/// so a malformed direction scores as fully wrong instead of panicking.
pub fn angle_between_deg(a: Vec2, b: Vec2) -> f32 {
    let ua = a.unit();
    let ub = b.unit();
    if ua.is_zero() || ub.is_zero() {
        return 180.0;
    }
    let d = ua.dot(ub).clamp(-1.0, 1.0);
    d.acos().to_degrees()
}

/// Minimum distance from point `p` to the segment `[a, b]`.
pub fn dist_point_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b.sub(a);
    let ab2 = ab.dot(ab);
    if ab2 < EPS {
        return p.distance(a);
    }
    let t = (p.sub(a).dot(ab) / ab2).clamp(0.0, 1.0);
    p.distance(a.add(ab.scale(t)))
}

/// Distance from `p` to the infinite line through `origin` with unit
/// direction `unit_v`.
pub fn dist_point_to_line(p: Vec2, origin: Vec2, unit_v: Vec2) -> f32 {
    let v = p.sub(origin);
    let proj = unit_v.scale(v.dot(unit_v));
    v.sub(proj).norm()
}
