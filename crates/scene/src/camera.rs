//! Camera pose, fire-and-forget flights and screen ray construction.
//!
//! A flight interpolates position in geodetic space (shortest longitude
//! path) and blends the view vectors, easing in and out. Starting a new
//! flight or calling `set_view` replaces whatever flight was running.

use foundation::math::{
    Ecef, EnuFrame, Geodetic, HeadingPitchRoll, Vec2, Vec3, ecef_to_geodetic, geodetic_to_ecef,
};
use tracing::debug;

use crate::picking::Ray;

/// Default vertical field of view (radians).
pub const DEFAULT_FOV_Y: f64 = std::f64::consts::FRAC_PI_3;

/// Upper bound for flights without an explicit duration (seconds).
const MAX_DEFAULT_FLIGHT_S: f64 = 3.0;

/// Lowest eye height above the ellipsoid a pose is placed at (meters).
pub const MIN_EYE_HEIGHT_M: f64 = 1.0;

/// Position plus orthonormal view vectors, all in ECEF.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraPose {
    pub position: Ecef,
    pub direction: Vec3,
    pub up: Vec3,
}

/// Requested attitude at a destination.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Orientation {
    HeadingPitchRoll(HeadingPitchRoll),
    DirectionUp { direction: Vec3, up: Vec3 },
}

/// Follow-up applied once a flight reaches its destination.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum FlightCompletion {
    /// Jump to `destination` keeping the heading, pitch and roll the camera
    /// has on arrival.
    SetViewKeepingAttitude { destination: Ecef },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlyToOptions {
    pub destination: Ecef,
    /// `None` looks straight down with north up.
    pub orientation: Option<Orientation>,
    /// `None` derives the duration from the travelled distance.
    pub duration_s: Option<f64>,
    pub complete: Option<FlightCompletion>,
}

impl FlyToOptions {
    pub fn new(destination: Ecef) -> Self {
        Self {
            destination,
            orientation: None,
            duration_s: None,
            complete: None,
        }
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    pub fn with_duration(mut self, duration_s: f64) -> Self {
        self.duration_s = Some(duration_s);
        self
    }

    pub fn then(mut self, complete: FlightCompletion) -> Self {
        self.complete = Some(complete);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
struct CameraFlight {
    from: CameraPose,
    to: CameraPose,
    duration_s: f64,
    elapsed_s: f64,
    complete: Option<FlightCompletion>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pose: CameraPose,
    /// Vertical field of view (radians).
    pub fov_y: f64,
    flight: Option<CameraFlight>,
}

impl Camera {
    pub fn from_view(destination: Ecef, attitude: HeadingPitchRoll) -> Self {
        Self {
            pose: pose_from_attitude(destination, attitude),
            fov_y: DEFAULT_FOV_Y,
            flight: None,
        }
    }

    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    pub fn position(&self) -> Ecef {
        self.pose.position
    }

    pub fn direction(&self) -> Vec3 {
        self.pose.direction
    }

    pub fn up(&self) -> Vec3 {
        self.pose.up
    }

    pub fn right(&self) -> Vec3 {
        self.pose.direction.cross(self.pose.up)
    }

    /// Heading, pitch and roll in the ENU frame under the camera.
    pub fn attitude(&self) -> HeadingPitchRoll {
        let frame = EnuFrame::at(self.pose.position);
        HeadingPitchRoll::from_direction_up(self.pose.direction, self.pose.up, &frame)
    }

    pub fn heading(&self) -> f64 {
        self.attitude().heading
    }

    pub fn pitch(&self) -> f64 {
        self.attitude().pitch
    }

    pub fn roll(&self) -> f64 {
        self.attitude().roll
    }

    pub fn is_flying(&self) -> bool {
        self.flight.is_some()
    }

    pub fn cancel_flight(&mut self) {
        if self.flight.take().is_some() {
            debug!("camera flight cancelled");
        }
    }

    /// Moves the camera immediately, cancelling any flight.
    pub fn set_view(&mut self, destination: Ecef, orientation: Orientation) {
        self.cancel_flight();
        self.pose = resolve_pose(destination, orientation);
    }

    /// Starts an animated flight. Progress happens in [`Camera::update`].
    pub fn fly_to(&mut self, options: FlyToOptions) {
        self.cancel_flight();

        let orientation = options
            .orientation
            .unwrap_or(Orientation::HeadingPitchRoll(HeadingPitchRoll::top_down()));
        let to = resolve_pose(options.destination, orientation);
        let distance = (to.position - self.pose.position).length();
        let duration_s = options
            .duration_s
            .unwrap_or_else(|| default_flight_duration(distance));

        debug!(distance, duration_s, "camera flight started");

        if duration_s <= 0.0 {
            self.pose = to;
            if let Some(complete) = options.complete {
                self.apply_completion(complete);
            }
            return;
        }

        self.flight = Some(CameraFlight {
            from: self.pose,
            to,
            duration_s,
            elapsed_s: 0.0,
            complete: options.complete,
        });
    }

    /// Advances the active flight by `dt_s` seconds.
    ///
    /// Returns `true` while a flight is still in progress.
    pub fn update(&mut self, dt_s: f64) -> bool {
        let Some(flight) = self.flight.as_mut() else {
            return false;
        };

        flight.elapsed_s += dt_s.max(0.0);
        let t = (flight.elapsed_s / flight.duration_s).min(1.0);
        if t < 1.0 {
            self.pose = interpolate_pose(flight.from, flight.to, smoothstep(t));
            return true;
        }

        self.pose = flight.to;
        let complete = flight.complete;
        self.flight = None;
        debug!("camera flight complete");
        if let Some(complete) = complete {
            self.apply_completion(complete);
        }
        false
    }

    /// World-space ray through pixel `screen` of a `canvas`-sized viewport.
    pub fn pick_ray(&self, screen: Vec2, canvas: Vec2) -> Ray {
        let w = canvas.x.max(1.0);
        let h = canvas.y.max(1.0);
        let ndc_x = 2.0 * screen.x / w - 1.0;
        let ndc_y = 1.0 - 2.0 * screen.y / h;
        let tan_half = (0.5 * self.fov_y).tan();
        let aspect = w / h;

        let offset = self.right().scale(ndc_x * tan_half * aspect) + self.pose.up.scale(ndc_y * tan_half);
        let dir = (self.pose.direction + offset)
            .normalize()
            .unwrap_or(self.pose.direction);
        Ray::new(self.pose.position, dir)
    }

    fn apply_completion(&mut self, complete: FlightCompletion) {
        match complete {
            FlightCompletion::SetViewKeepingAttitude { destination } => {
                let attitude = self.attitude();
                self.pose = pose_from_attitude(destination, attitude);
                debug!(?attitude, "camera snapped to follow-up view");
            }
        }
    }
}

fn default_flight_duration(distance_m: f64) -> f64 {
    ((distance_m / 1_000_000.0).ceil() + 2.0).min(MAX_DEFAULT_FLIGHT_S)
}

fn pose_from_attitude(destination: Ecef, attitude: HeadingPitchRoll) -> CameraPose {
    let frame = EnuFrame::at(destination);
    let (direction, up) = attitude.to_direction_up(&frame);
    CameraPose {
        position: above_surface(destination),
        direction,
        up,
    }
}

/// Lifts `position` to at least [`MIN_EYE_HEIGHT_M`] above the ellipsoid.
fn above_surface(position: Ecef) -> Ecef {
    let geo = ecef_to_geodetic(position);
    if geo.alt_m >= MIN_EYE_HEIGHT_M {
        return position;
    }
    geodetic_to_ecef(Geodetic::new(geo.lat_rad, geo.lon_rad, MIN_EYE_HEIGHT_M))
}

fn resolve_pose(destination: Ecef, orientation: Orientation) -> CameraPose {
    match orientation {
        Orientation::HeadingPitchRoll(hpr) => pose_from_attitude(destination, hpr),
        Orientation::DirectionUp { direction, up } => {
            let Some(direction) = direction.normalize() else {
                return pose_from_attitude(destination, HeadingPitchRoll::top_down());
            };
            let frame = EnuFrame::at(destination);
            // A zero or parallel up vector is replaced by the local vertical,
            // then by local north when looking straight up or down.
            let up = orthogonal_unit(up, direction)
                .or_else(|| orthogonal_unit(frame.up, direction))
                .or_else(|| orthogonal_unit(frame.north, direction))
                .unwrap_or(frame.north);
            CameraPose {
                position: above_surface(destination),
                direction,
                up,
            }
        }
    }
}

/// Component of `v` perpendicular to unit vector `axis`, normalized.
fn orthogonal_unit(v: Vec3, axis: Vec3) -> Option<Vec3> {
    (v - axis.scale(v.dot(axis))).normalize()
}

fn interpolate_pose(from: CameraPose, to: CameraPose, t: f64) -> CameraPose {
    let position = interpolate_geodetic(from.position, to.position, t);
    let direction = nlerp(from.direction, to.direction, t);
    let up = orthogonal_unit(nlerp(from.up, to.up, t), direction).unwrap_or(to.up);
    CameraPose {
        position,
        direction,
        up,
    }
}

fn interpolate_geodetic(from: Ecef, to: Ecef, t: f64) -> Ecef {
    let a = ecef_to_geodetic(from);
    let b = ecef_to_geodetic(to);
    let mut dlon = b.lon_rad - a.lon_rad;
    if dlon > std::f64::consts::PI {
        dlon -= std::f64::consts::TAU;
    } else if dlon < -std::f64::consts::PI {
        dlon += std::f64::consts::TAU;
    }
    geodetic_to_ecef(Geodetic::new(
        a.lat_rad + (b.lat_rad - a.lat_rad) * t,
        a.lon_rad + dlon * t,
        a.alt_m + (b.alt_m - a.alt_m) * t,
    ))
}

fn nlerp(a: Vec3, b: Vec3, t: f64) -> Vec3 {
    (a.scale(1.0 - t) + b.scale(t)).normalize().unwrap_or(b)
}

fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}
