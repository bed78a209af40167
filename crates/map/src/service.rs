//! Owner of the viewer and its pointer-event handler.
//!
//! Every entity mutation, camera move and screen/world conversion made on
//! behalf of the interaction controller goes through [`MapService`].

use std::sync::mpsc::{self, Receiver, Sender};

use foundation::math::{
    Ecef, Vec2, ecef_from_degrees, ecef_from_degrees_array, geodetic_surface_normal, get_direction,
};
use scene::camera::{FlightCompletion, FlyToOptions, Orientation};
use scene::components::{
    Color, EllipsoidGraphics, HeightReference, PolygonGraphics, PolylineGraphics, PositionProperty,
};
use scene::input::{ScreenInput, ScreenSpaceEventHandler, ScreenSpaceEventType};
use scene::{EntityKey, EntitySpec, Viewer, ViewerOptions};
use tracing::{debug, info, trace, warn};

use crate::MapError;

/// Radius of the point markers drawn by [`MapService::show_ellipsoid`] (meters).
pub const MARKER_RADIUS_M: f64 = 0.5;
/// Width of lines drawn by [`MapService::show_polyline`] (pixels).
pub const POLYLINE_WIDTH_PX: f64 = 10.0;
/// Duration of the first leg of [`MapService::direction`] (seconds).
pub const DIRECTION_FLIGHT_S: f64 = 1.0;

/// A pointer event resolved to a world position.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickEvent {
    pub position: Ecef,
    pub kind: ScreenSpaceEventType,
}

const AXIS_EVENTS: [ScreenSpaceEventType; 3] = ScreenSpaceEventType::ALL;

#[derive(Debug)]
pub struct MapService {
    viewer: Viewer,
    event_handler: Option<ScreenSpaceEventHandler<Sender<PickEvent>>>,
}

impl MapService {
    /// Creates the viewer bound to `container`.
    pub fn init_viewer(container: &str, options: ViewerOptions) -> Result<Self, MapError> {
        let mut viewer = Viewer::new(container, options)?;
        viewer.set_depth_test_against_terrain(true);
        info!(container, "map viewer ready");
        Ok(Self {
            viewer,
            event_handler: None,
        })
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn has_entity(&self, id: &str) -> bool {
        self.viewer.entities().contains(&EntityKey::from(id))
    }

    /// Starts a camera flight to a geographic point; does not wait for it.
    pub fn fly_to(&mut self, lon: f64, lat: f64, alt: f64) {
        debug!(lon, lat, alt, "fly to");
        self.viewer
            .camera_mut()
            .fly_to(FlyToOptions::new(ecef_from_degrees(lon, lat, alt)));
    }

    pub fn remove_all_entities(&mut self) {
        self.viewer.entities_mut().remove_all();
    }

    /// Adds an extruded, ground-clamped polygon from `[lon0, lat0, lon1, lat1, ...]`.
    pub fn polygon(
        &mut self,
        lon_lats: &[f64],
        name: &str,
        height: f64,
    ) -> Result<EntityKey, MapError> {
        if lon_lats.len() % 2 != 0 {
            return Err(MapError::OddCoordinateCount(lon_lats.len()));
        }

        let graphics = PolygonGraphics {
            height_reference: HeightReference::ClampToGround,
            outline: true,
            outline_color: Color::DARK_GRAY,
            material: Color::GRAY,
            ..PolygonGraphics::new(ecef_from_degrees_array(lon_lats))
        }
        .extruded(height);

        let id = self
            .viewer
            .entities_mut()
            .add(EntitySpec::new(graphics).with_name(name))?;
        debug!(%id, name, height, vertices = lon_lats.len() / 2, "polygon added");
        Ok(id)
    }

    /// Draws (or replaces) a small marker at `position`.
    pub fn show_ellipsoid(&mut self, id: &str, position: Ecef) -> Result<(), MapError> {
        let key = EntityKey::from(id);
        let entities = self.viewer.entities_mut();
        entities.remove_by_id(&key);
        entities.add(
            EntitySpec::new(
                EllipsoidGraphics::sphere(MARKER_RADIUS_M)
                    .with_height_reference(HeightReference::RelativeToGround),
            )
            .with_id(key)
            .with_name(id)
            .with_position(position),
        )?;
        Ok(())
    }

    /// Draws (or replaces) a line from `start` to `end`. Without a start
    /// nothing happens.
    ///
    /// A shared `end` is re-read every frame, so the line follows it.
    pub fn show_polyline(
        &mut self,
        id: &str,
        start: Option<Ecef>,
        end: impl Into<PositionProperty>,
    ) -> Result<(), MapError> {
        let Some(start) = start else {
            return Ok(());
        };

        let key = EntityKey::from(id);
        let entities = self.viewer.entities_mut();
        entities.remove_by_id(&key);
        entities.add(
            EntitySpec::new(PolylineGraphics {
                width: POLYLINE_WIDTH_PX,
                clamp_to_ground: false,
                material: Color::YELLOW,
                ..PolylineGraphics::new(vec![start.into(), end.into()])
            })
            .with_id(key)
            .with_name(id),
        )?;
        Ok(())
    }

    pub fn remove_entity_by_id(&mut self, id: &str) {
        self.viewer
            .entities_mut()
            .remove_by_id(&EntityKey::from(id));
    }

    /// Flies to `start` looking towards `end`, then jumps to `end` keeping
    /// the attitude reached at `start`.
    pub fn direction(&mut self, start: Ecef, end: Ecef) {
        let direction = get_direction(start, end);
        debug!(?direction, "landscape axis camera move");
        self.viewer.camera_mut().fly_to(
            FlyToOptions::new(start)
                .with_orientation(Orientation::DirectionUp {
                    direction,
                    up: geodetic_surface_normal(start),
                })
                .with_duration(DIRECTION_FLIGHT_S)
                .then(FlightCompletion::SetViewKeepingAttitude { destination: end }),
        );
    }

    /// Registers left click, right click and mouse move, returning the
    /// channel their resolved positions are published on.
    ///
    /// The handler is created on first use and reused afterwards. Calling
    /// this again replaces the registrations, which disconnects any earlier
    /// receiver.
    pub fn start_landscape_axis_event(&mut self) -> Receiver<PickEvent> {
        let (tx, rx) = mpsc::channel();
        let handler = self
            .event_handler
            .get_or_insert_with(ScreenSpaceEventHandler::new);
        for kind in AXIS_EVENTS {
            handler.set_input_action(tx.clone(), kind);
        }
        debug!("landscape axis events registered");
        rx
    }

    pub fn end_landscape_axis_event(&mut self) {
        let Some(handler) = self.event_handler.as_mut() else {
            return;
        };
        for kind in AXIS_EVENTS {
            handler.remove_input_action(kind);
        }
        debug!("landscape axis events removed");
    }

    /// Pointer input from the host window.
    ///
    /// Unregistered kinds, missing screen positions and picks that miss the
    /// globe are dropped silently.
    pub fn handle_input(&mut self, kind: ScreenSpaceEventType, input: ScreenInput) {
        let Some(action) = self
            .event_handler
            .as_ref()
            .and_then(|h| h.input_action(kind))
        else {
            return;
        };

        if !self.viewer.pick_position_supported() {
            warn!("pick position not supported");
            return;
        }

        let Some(screen) = input.screen_position(kind) else {
            return;
        };
        let Some(position) = self.viewer.pick_position(screen) else {
            trace!(?kind, x = screen.x, y = screen.y, "pick missed");
            return;
        };

        if action.send(PickEvent { position, kind }).is_err() {
            trace!(?kind, "pick receiver dropped");
        }
    }

    pub fn from_screen_to_cartesian(&self, screen: Vec2) -> Option<Ecef> {
        self.viewer.pick_position(screen)
    }

    /// Advances the viewer by one frame.
    pub fn tick(&mut self, dt_s: f64) {
        self.viewer.tick(dt_s);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::{MapService, PickEvent};
    use crate::MapError;
    use foundation::math::{Vec2, ecef_from_degrees, from_cartesian_to_geographic};
    use scene::components::Graphics;
    use scene::input::{ScreenInput, ScreenSpaceEventType};
    use scene::{EntityKey, ViewerOptions};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn service() -> MapService {
        MapService::init_viewer("contain", ViewerOptions::default()).unwrap()
    }

    const CENTER: Vec2 = Vec2 { x: 640.0, y: 360.0 };

    #[test]
    fn init_enables_terrain_depth_test() {
        let map = service();
        assert!(map.viewer().depth_test_against_terrain());
        assert!(!ViewerOptions::default().depth_test_against_terrain);
    }

    #[test]
    fn upserts_leave_one_entity_per_id() {
        let mut map = service();
        let a = ecef_from_degrees(127.0, 37.0, 0.0);
        let b = ecef_from_degrees(127.1, 37.1, 0.0);

        map.show_ellipsoid("marker", a).unwrap();
        map.show_ellipsoid("marker", b).unwrap();
        map.show_polyline("line", Some(a), b).unwrap();
        map.show_polyline("line", Some(b), a).unwrap();

        let entities = map.viewer().entities();
        assert_eq!(entities.len(), 2);
        let marker = entities.get_by_id(&EntityKey::from("marker")).unwrap();
        assert_eq!(marker.position, Some(b));
    }

    #[test]
    fn polyline_without_start_is_noop() {
        let mut map = service();
        map.show_polyline("line", None, ecef_from_degrees(0.0, 0.0, 0.0))
            .unwrap();
        assert!(map.viewer().entities().is_empty());
    }

    #[test]
    fn polyline_follows_shared_end() {
        let mut map = service();
        let start = ecef_from_degrees(127.0, 37.0, 0.0);
        let cursor = Rc::new(Cell::new(ecef_from_degrees(127.0, 37.1, 0.0)));
        map.show_polyline("line", Some(start), cursor.clone()).unwrap();

        let moved = ecef_from_degrees(127.2, 37.2, 0.0);
        cursor.set(moved);
        let entity = map
            .viewer()
            .entities()
            .get_by_id(&EntityKey::from("line"))
            .unwrap();
        let Graphics::Polyline(line) = &entity.graphics else {
            panic!("expected a polyline");
        };
        assert_eq!(line.positions_now(), vec![start, moved]);
    }

    #[test]
    fn polygon_requires_pairs() {
        let mut map = service();
        let err = map.polygon(&[1.0, 2.0, 3.0], "odd", 10.0).unwrap_err();
        assert!(matches!(err, MapError::OddCoordinateCount(3)));

        let id = map
            .polygon(&[0.0, 0.0, 0.0, 1.0, 1.0, 1.0], "tri", 10.0)
            .unwrap();
        let entity = map.viewer().entities().get_by_id(&id).unwrap();
        let Graphics::Polygon(polygon) = &entity.graphics else {
            panic!("expected a polygon");
        };
        assert_eq!(polygon.hierarchy.len(), 3);
        assert_eq!(polygon.extruded_height, Some(10.0));
        assert_eq!(entity.name.as_deref(), Some("tri"));
    }

    #[test]
    fn remove_by_id_and_all() {
        let mut map = service();
        map.show_ellipsoid("a", ecef_from_degrees(0.0, 0.0, 0.0)).unwrap();
        map.show_ellipsoid("b", ecef_from_degrees(1.0, 0.0, 0.0)).unwrap();
        map.remove_entity_by_id("missing");
        map.remove_entity_by_id("a");
        assert!(!map.has_entity("a"));
        assert!(map.has_entity("b"));
        map.remove_all_entities();
        assert!(map.viewer().entities().is_empty());
    }

    #[test]
    fn fly_to_arrives_after_ticks() {
        let mut map = service();
        map.fly_to(126.978, 37.5665, 1_000.0);
        for _ in 0..240 {
            map.tick(1.0 / 60.0);
        }
        let geo = from_cartesian_to_geographic(Some(map.viewer().camera().position())).unwrap();
        assert_close(geo.lon_deg, 126.978, 1e-9);
        assert_close(geo.lat_deg, 37.5665, 1e-9);
        assert_close(geo.alt_m.unwrap(), 1_000.0, 1e-6);
    }

    #[test]
    fn direction_flies_then_snaps_to_end() {
        let mut map = service();
        let start = ecef_from_degrees(127.0, 37.0, 10.0);
        let end = ecef_from_degrees(127.001, 37.0, 10.0);
        map.direction(start, end);
        assert!(map.viewer().camera().is_flying());

        for _ in 0..90 {
            map.tick(1.0 / 60.0);
        }
        let camera = map.viewer().camera();
        assert!(!camera.is_flying());
        assert_eq!(camera.position(), end);
        // Looking east along the axis.
        assert_close(camera.heading(), std::f64::consts::FRAC_PI_2, 1e-3);
    }

    #[test]
    fn registered_clicks_publish_picks() {
        let mut map = service();
        let rx = map.start_landscape_axis_event();
        map.handle_input(ScreenSpaceEventType::LeftClick, ScreenInput::click(CENTER));

        let PickEvent { position, kind } = rx.try_recv().unwrap();
        assert_eq!(kind, ScreenSpaceEventType::LeftClick);
        let geo = from_cartesian_to_geographic(Some(position)).unwrap();
        assert_close(geo.lon_deg, 127.5, 1e-6);
    }

    #[test]
    fn moves_resolve_at_end_position() {
        let mut map = service();
        let rx = map.start_landscape_axis_event();
        map.handle_input(
            ScreenSpaceEventType::MouseMove,
            ScreenInput::motion(Vec2::new(0.0, 0.0), CENTER),
        );
        let event = rx.try_recv().unwrap();
        assert_eq!(event.kind, ScreenSpaceEventType::MouseMove);
        assert_eq!(Some(event.position), map.from_screen_to_cartesian(CENTER));
    }

    #[test]
    fn unregistered_or_unresolvable_input_is_dropped() {
        let mut map = service();
        // No handler yet: nothing to end, nothing delivered.
        map.end_landscape_axis_event();
        map.handle_input(ScreenSpaceEventType::LeftClick, ScreenInput::click(CENTER));

        let rx = map.start_landscape_axis_event();
        map.handle_input(ScreenSpaceEventType::LeftClick, ScreenInput::default());
        map.handle_input(
            ScreenSpaceEventType::LeftClick,
            ScreenInput::click(Vec2::new(5_000.0, 5_000.0)),
        );
        assert!(rx.try_recv().is_err());

        map.end_landscape_axis_event();
        map.handle_input(ScreenSpaceEventType::LeftClick, ScreenInput::click(CENTER));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn unsupported_picking_delivers_nothing() {
        let options = ViewerOptions {
            pick_position_supported: false,
            ..ViewerOptions::default()
        };
        let mut map = MapService::init_viewer("contain", options).unwrap();
        let rx = map.start_landscape_axis_event();
        map.handle_input(ScreenSpaceEventType::LeftClick, ScreenInput::click(CENTER));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn restarting_disconnects_previous_receiver() {
        let mut map = service();
        let first = map.start_landscape_axis_event();
        let second = map.start_landscape_axis_event();
        map.handle_input(ScreenSpaceEventType::RightClick, ScreenInput::click(CENTER));
        assert!(first.try_recv().is_err());
        assert_eq!(
            second.try_recv().unwrap().kind,
            ScreenSpaceEventType::RightClick
        );
    }
}
