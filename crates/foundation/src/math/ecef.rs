use super::Vec3;

/// Earth-centered, Earth-fixed Cartesian coordinates (meters).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ecef {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Ecef {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn offset(self, delta: Vec3) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.z + delta.z)
    }
}

impl std::ops::Sub for Ecef {
    type Output = Vec3;

    fn sub(self, other: Self) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

/// Unit vector pointing from `start` towards `end`.
///
/// Coincident points have no direction; the zero vector is returned so the
/// caller can detect it.
pub fn get_direction(start: Ecef, end: Ecef) -> Vec3 {
    (end - start).normalize().unwrap_or(Vec3::ZERO)
}
