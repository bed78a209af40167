//! Landscape-axis interaction and building extrusion, driven through a
//! [`MapService`].
//!
//! The axis workflow moves `Idle -> AwaitingStart -> AwaitingEnd -> Idle`:
//! the first left click places the start marker, mouse moves drag a line
//! from it, the second left click places the end marker and points the
//! camera along the axis. A right click abandons the workflow at any point.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::mpsc::Receiver;

use foundation::math::Ecef;
use formats::{AutoPostingResult, PolygonRings, flatten_polygon};
use scene::EntityKey;
use scene::input::ScreenSpaceEventType;
use tracing::{debug, error, info, warn};

use crate::MapError;
use crate::client::AutoPostingClient;
use crate::service::{MapService, PickEvent};

pub const AXIS_START_ID: &str = "landscapeAxis--start";
pub const AXIS_END_ID: &str = "landscapeAxis--end";
pub const AXIS_LINE_ID: &str = "landscapeAxis--line";

/// Camera altitude used when framing an extruded building (meters).
pub const BUILDING_FLIGHT_ALTITUDE_M: f64 = 1_000.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AxisState {
    Idle,
    AwaitingStart,
    AwaitingEnd,
}

/// Points picked during one landscape-axis workflow.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct AxisSession {
    pub start: Option<Ecef>,
    pub end: Option<Ecef>,
}

#[derive(Debug)]
pub struct MapController {
    auto_posting_results: Vec<AutoPostingResult>,
    session: AxisSession,
    picks: Option<Receiver<PickEvent>>,
    cursor: Rc<Cell<Ecef>>,
}

impl Default for MapController {
    fn default() -> Self {
        Self {
            auto_posting_results: Vec::new(),
            session: AxisSession::default(),
            picks: None,
            cursor: Rc::new(Cell::new(Ecef::new(0.0, 0.0, 0.0))),
        }
    }
}

impl MapController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn axis_state(&self) -> AxisState {
        match (&self.picks, self.session.start, self.session.end) {
            (None, _, _) => AxisState::Idle,
            (Some(_), None, _) => AxisState::AwaitingStart,
            (Some(_), Some(_), None) => AxisState::AwaitingEnd,
            (Some(_), Some(_), Some(_)) => AxisState::Idle,
        }
    }

    pub fn session(&self) -> AxisSession {
        self.session
    }

    pub fn fly_to(&self, map: &mut MapService, lon: f64, lat: f64, alt: f64) {
        map.fly_to(lon, lat, alt);
    }

    /// Begins a fresh workflow, discarding any previous one.
    pub fn start_landscape_axis(&mut self, map: &mut MapService) {
        self.end_landscape_axis(map);
        self.picks = Some(map.start_landscape_axis_event());
        self.session = AxisSession::default();
        info!("pick two points on the map");
    }

    /// Stops listening and removes the axis markers and line.
    pub fn end_landscape_axis(&mut self, map: &mut MapService) {
        map.end_landscape_axis_event();
        self.picks = None;
        self.session = AxisSession::default();
        for id in [AXIS_START_ID, AXIS_END_ID, AXIS_LINE_ID] {
            map.remove_entity_by_id(id);
        }
    }

    /// Applies every pick event queued since the last call and returns how
    /// many were handled. Events left over once the workflow stops
    /// listening are dropped.
    pub fn pump(&mut self, map: &mut MapService) -> Result<usize, MapError> {
        let mut handled = 0;
        loop {
            let Some(picks) = self.picks.as_ref() else {
                break;
            };
            let Ok(event) = picks.try_recv() else {
                break;
            };
            self.on_pick(map, event)?;
            handled += 1;
        }
        Ok(handled)
    }

    fn on_pick(&mut self, map: &mut MapService, event: PickEvent) -> Result<(), MapError> {
        let PickEvent { position, kind } = event;
        match kind {
            ScreenSpaceEventType::LeftClick => match self.session {
                AxisSession { start: None, .. } => {
                    self.session.start = Some(position);
                    map.show_ellipsoid(AXIS_START_ID, position)?;
                    debug!(?position, "landscape axis start");
                }
                AxisSession {
                    start: Some(start),
                    end: None,
                } => {
                    self.session.end = Some(position);
                    map.show_ellipsoid(AXIS_END_ID, position)?;
                    map.remove_entity_by_id(AXIS_LINE_ID);
                    map.end_landscape_axis_event();
                    self.picks = None;
                    map.direction(start, position);
                    info!("landscape axis complete");
                }
                AxisSession { end: Some(_), .. } => {}
            },
            ScreenSpaceEventType::MouseMove => {
                if let AxisSession {
                    start: Some(start),
                    end: None,
                } = self.session
                {
                    self.cursor.set(position);
                    map.show_polyline(AXIS_LINE_ID, Some(start), self.cursor.clone())?;
                }
            }
            ScreenSpaceEventType::RightClick => {
                self.end_landscape_axis(map);
                debug!("landscape axis cancelled");
            }
        }
        Ok(())
    }

    /// Draws one polygon extruded to `height` and flies above its bounding
    /// box centre. Returns `None` for a polygon without coordinates.
    pub fn extrude_building_by_polygon(
        &self,
        map: &mut MapService,
        rings: &PolygonRings,
        name: &str,
        height: f64,
    ) -> Result<Option<EntityKey>, MapError> {
        let flat = flatten_polygon(rings);
        let Some([lon, lat]) = flat.centroid() else {
            warn!(name, "skipping polygon without coordinates");
            return Ok(None);
        };

        let id = map.polygon(&flat.lon_lats, name, height)?;
        map.fly_to(lon, lat, BUILDING_FLIGHT_ALTITUDE_M);
        Ok(Some(id))
    }

    /// Extrudes every polygon of `result`. Nothing is drawn unless the
    /// whole payload parses.
    pub fn process_and_show(
        &self,
        map: &mut MapService,
        result: &AutoPostingResult,
    ) -> Result<usize, MapError> {
        let footprints = result.buildings()?.footprints()?;

        let mut shown = 0;
        for footprint in &footprints {
            let name = format!(
                "{}/{}/{}",
                footprint.building, footprint.floor, footprint.polygon_id
            );
            if self
                .extrude_building_by_polygon(map, &footprint.rings, &name, footprint.extrusion_height())?
                .is_some()
            {
                shown += 1;
            }
        }
        debug!(id = result.id, shown, "auto-posting result drawn");
        Ok(shown)
    }

    /// Clears the map and draws the stored result at `index`.
    pub fn show_auto_posting(
        &self,
        map: &mut MapService,
        index: usize,
    ) -> Result<usize, MapError> {
        let result = self
            .auto_posting_results
            .get(index)
            .ok_or(MapError::NoSuchResult {
                index,
                len: self.auto_posting_results.len(),
            })?;
        map.remove_all_entities();
        self.process_and_show(map, result)
    }

    pub fn auto_posting_results(&self) -> &[AutoPostingResult] {
        &self.auto_posting_results
    }

    pub fn set_auto_posting_results(&mut self, results: Vec<AutoPostingResult>) {
        self.auto_posting_results = results;
    }

    /// Replaces the stored results with the group's latest ones. On failure
    /// the error is logged and the stored list is left as it was.
    pub async fn load_auto_posting_results(&mut self, client: &AutoPostingClient, group_id: &str) {
        match client.fetch_results(group_id).await {
            Ok(results) => {
                info!(group_id, count = results.len(), "auto-posting query complete");
                self.auto_posting_results = results;
            }
            Err(e) => error!(group_id, "auto-posting query failed: {e}"),
        }
    }
}
