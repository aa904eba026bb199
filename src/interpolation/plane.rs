//! Three-point plane fit, kept alongside the axis containers for callers that
//! still interpolate from a triangle of samples instead of a sorted grid.

use std::ops::{Neg, Sub};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Vec3 {
    x: f32,
    y: f32,
    z: f32,
}

const VERTICAL: Vec3 = Vec3 {
    x: 0.0,
    y: 0.0,
    z: 1.0,
};

impl Vec3 {
    fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

/// Evaluates at `(x, y)` the plane through the points `a`, `b` and `c`
/// (each `[x, y, value]`).
///
/// When the three points are collinear the plane is taken to contain the line
/// `a`→`b` and be level in the perpendicular horizontal direction.
pub fn interpolate_plane(a: [f32; 3], b: [f32; 3], c: [f32; 3], x: f32, y: f32) -> f32 {
    if x == a[0] && y == a[1] {
        return a[2];
    }

    let origin = Vec3::new(a[0], a[1], a[2]);
    let b = Vec3::new(b[0], b[1], b[2]) - origin;
    let c = Vec3::new(c[0], c[1], c[2]) - origin;

    let mut normal = b.cross(c);
    if normal.is_zero() {
        normal = b.cross(b.cross(VERTICAL));
    }
    if normal.z < 0.0 {
        normal = -normal;
    }

    let offset = Vec3::new(x - origin.x, y - origin.y, 0.0);
    let across = offset.cross(VERTICAL);
    let along = normal.cross(across);
    let run = Vec3::new(along.x, along.y, 0.0).length();

    offset.length() / run * along.z + origin.z
}
