use super::{Ecef, Vec3, geodetic_surface_normal};

/// East-North-Up basis anchored at a point on (or above) the ellipsoid.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EnuFrame {
    pub east: Vec3,
    pub north: Vec3,
    pub up: Vec3,
}

impl EnuFrame {
    pub fn at(position: Ecef) -> Self {
        let up = geodetic_surface_normal(position);
        // At the poles east is undefined; fall back to +Y like the globe axes.
        let east = Vec3::new(0.0, 0.0, 1.0)
            .cross(up)
            .normalize()
            .unwrap_or(Vec3::new(0.0, 1.0, 0.0));
        let north = up.cross(east);
        Self { east, north, up }
    }

    pub fn to_local(&self, v: Vec3) -> Vec3 {
        Vec3::new(v.dot(self.east), v.dot(self.north), v.dot(self.up))
    }

    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.east.scale(local.x) + self.north.scale(local.y) + self.up.scale(local.z)
    }
}

/// Camera attitude relative to the local ENU frame (radians).
///
/// Heading is clockwise from north, pitch is positive above the horizon and
/// roll turns the up vector towards the camera's right.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HeadingPitchRoll {
    pub heading: f64,
    pub pitch: f64,
    pub roll: f64,
}

const DEGENERATE_COS_PITCH: f64 = 1e-9;

impl HeadingPitchRoll {
    pub fn new(heading: f64, pitch: f64, roll: f64) -> Self {
        Self {
            heading,
            pitch,
            roll,
        }
    }

    /// Looking straight down with north at the top of the screen.
    pub fn top_down() -> Self {
        Self::new(0.0, -std::f64::consts::FRAC_PI_2, 0.0)
    }

    /// World-space `(direction, up)` for this attitude in `frame`.
    pub fn to_direction_up(self, frame: &EnuFrame) -> (Vec3, Vec3) {
        let (sh, ch) = self.heading.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        let (sr, cr) = self.roll.sin_cos();

        let direction = frame.to_world(Vec3::new(cp * sh, cp * ch, sp));
        let right = frame.to_world(Vec3::new(ch, -sh, 0.0));
        let up0 = right.cross(direction);
        let up = up0.scale(cr) + right.scale(sr);
        (direction, up)
    }

    /// Inverse of [`HeadingPitchRoll::to_direction_up`]. Roll is reported as
    /// zero when looking straight up or down.
    pub fn from_direction_up(direction: Vec3, up: Vec3, frame: &EnuFrame) -> Self {
        let d = frame.to_local(direction);
        let u = frame.to_local(up);
        let pitch = d.z.clamp(-1.0, 1.0).asin();
        let cos_pitch = pitch.cos();

        if cos_pitch < DEGENERATE_COS_PITCH {
            let heading = if d.z < 0.0 {
                u.x.atan2(u.y)
            } else {
                (-u.x).atan2(-u.y)
            };
            return Self::new(wrap_two_pi(heading), pitch, 0.0);
        }

        let heading = d.x.atan2(d.y);
        let (sh, ch) = heading.sin_cos();
        let right = Vec3::new(ch, -sh, 0.0);
        let up0 = right.cross(d);
        let roll = u.dot(right).atan2(u.dot(up0));
        Self::new(wrap_two_pi(heading), pitch, roll)
    }
}

fn wrap_two_pi(angle: f64) -> f64 {
    angle.rem_euclid(std::f64::consts::TAU)
}
