use foundation::math::{Ecef, Vec3, WGS84_A, WGS84_B};

/// Hits closer to the ray origin than this are treated as the origin itself (meters).
const MIN_HIT_DISTANCE_M: f64 = 1e-3;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Ecef,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Ecef, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    pub fn at(&self, t: f64) -> Ecef {
        self.origin.offset(self.dir.scale(t))
    }
}

/// Axis radii of the picking surface (meters).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EllipsoidSurface {
    pub radii: Vec3,
}

impl EllipsoidSurface {
    pub fn wgs84() -> Self {
        Self {
            radii: Vec3::new(WGS84_A, WGS84_A, WGS84_B),
        }
    }
}

impl Default for EllipsoidSurface {
    fn default() -> Self {
        Self::wgs84()
    }
}

/// First intersection of `ray` with the ellipsoid surface.
///
/// Notes:
/// - The ray direction does not need to be normalized.
/// - A ray starting on or inside the surface hits nothing.
/// - Hits behind or at the origin are ignored.
pub fn pick_ellipsoid(ray: Ray, surface: EllipsoidSurface) -> Option<Ecef> {
    let r = surface.radii;
    // Scale into unit-sphere space.
    let o = Vec3::new(
        ray.origin.x / r.x,
        ray.origin.y / r.y,
        ray.origin.z / r.z,
    );
    let d = Vec3::new(ray.dir.x / r.x, ray.dir.y / r.y, ray.dir.z / r.z);

    let a = d.dot(d);
    if a <= 0.0 {
        return None;
    }
    let c = o.dot(o) - 1.0;
    if c <= 0.0 {
        return None;
    }
    let b = 2.0 * o.dot(d);
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }

    // Outside the surface both roots share a sign; the near one is the hit.
    let t = (-b - disc.sqrt()) / (2.0 * a);
    if t * ray.dir.length() <= MIN_HIT_DISTANCE_M {
        return None;
    }

    Some(ray.at(t))
}

#[cfg(test)]
mod tests {
    use super::{EllipsoidSurface, Ray, pick_ellipsoid};
    use foundation::math::{Ecef, Vec3, WGS84_A, WGS84_B};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn ray_towards_center_hits_equator() {
        let ray = Ray::new(Ecef::new(2.0 * WGS84_A, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        let hit = pick_ellipsoid(ray, EllipsoidSurface::wgs84()).unwrap();
        assert_close(hit.x, WGS84_A, 1e-6);
        assert_close(hit.y, 0.0, 1e-6);
    }

    #[test]
    fn ray_towards_pole_hits_minor_axis() {
        let ray = Ray::new(Ecef::new(0.0, 0.0, 3.0 * WGS84_B), Vec3::new(0.0, 0.0, -5.0));
        let hit = pick_ellipsoid(ray, EllipsoidSurface::wgs84()).unwrap();
        assert_close(hit.z, WGS84_B, 1e-6);
    }

    #[test]
    fn ray_pointing_away_misses() {
        let ray = Ray::new(Ecef::new(2.0 * WGS84_A, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(pick_ellipsoid(ray, EllipsoidSurface::wgs84()).is_none());
    }

    #[test]
    fn ray_from_inside_or_on_surface_misses() {
        let inside = Ray::new(Ecef::new(0.5 * WGS84_A, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(pick_ellipsoid(inside, EllipsoidSurface::wgs84()).is_none());

        let on_surface = Ray::new(Ecef::new(WGS84_A, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        assert!(pick_ellipsoid(on_surface, EllipsoidSurface::wgs84()).is_none());
    }

    #[test]
    fn low_ray_hits_ground_ahead_not_origin() {
        // One meter above the equator, looking east and 45 degrees down.
        let origin = Ecef::new(WGS84_A + 1.0, 0.0, 0.0);
        let ray = Ray::new(origin, Vec3::new(-1.0, 1.0, 0.0));
        let hit = pick_ellipsoid(ray, EllipsoidSurface::wgs84()).unwrap();
        let dist = (hit - origin).length();
        assert!(dist > 1.0 && dist < 2.0, "distance {dist}");
        assert_close(hit.y, 1.0, 1e-3);
    }

    #[test]
    fn ray_passing_beside_globe_misses() {
        let ray = Ray::new(
            Ecef::new(2.0 * WGS84_A, 2.0 * WGS84_A, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
        );
        assert!(pick_ellipsoid(ray, EllipsoidSurface::wgs84()).is_none());
    }
}
