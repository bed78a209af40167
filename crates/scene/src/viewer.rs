use foundation::math::{Ecef, GeoPoint, HeadingPitchRoll, Vec2};
use tracing::{debug, info};

use crate::ViewerError;
use crate::camera::Camera;
use crate::collection::EntityCollection;
use crate::picking::{EllipsoidSurface, pick_ellipsoid};

/// Construction options for a [`Viewer`].
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerOptions {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Whether the context can resolve pixels to world positions.
    pub pick_position_supported: bool,
    /// Recorded only: no terrain is loaded, so picks resolve against the
    /// ellipsoid either way.
    pub depth_test_against_terrain: bool,
    /// Only render a frame when the scene or the camera changed.
    pub request_render_mode: bool,
    /// Base imagery tile template; recorded, not fetched.
    pub imagery_url: Option<String>,
    /// Initial camera target, viewed from above.
    pub home: GeoPoint,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            canvas_width: 1280,
            canvas_height: 720,
            pick_position_supported: true,
            depth_test_against_terrain: false,
            request_render_mode: true,
            imagery_url: None,
            home: GeoPoint::new(127.5, 36.0, Some(1_500_000.0)),
        }
    }
}

/// Headless scene: entity collection, camera and the picking surface.
#[derive(Debug)]
pub struct Viewer {
    options: ViewerOptions,
    entities: EntityCollection,
    camera: Camera,
    surface: EllipsoidSurface,
    frame_index: u64,
    needs_render: bool,
}

impl Viewer {
    pub fn new(container: &str, options: ViewerOptions) -> Result<Self, ViewerError> {
        if container.trim().is_empty() {
            return Err(ViewerError::MissingContainer);
        }
        if options.canvas_width == 0 || options.canvas_height == 0 {
            return Err(ViewerError::InvalidCanvas {
                width: options.canvas_width,
                height: options.canvas_height,
            });
        }

        let camera = Camera::from_view(options.home.to_ecef(), HeadingPitchRoll::top_down());
        info!(
            container,
            width = options.canvas_width,
            height = options.canvas_height,
            imagery = options.imagery_url.as_deref().unwrap_or("none"),
            "viewer created"
        );

        Ok(Self {
            options,
            entities: EntityCollection::new(),
            camera,
            surface: EllipsoidSurface::wgs84(),
            frame_index: 0,
            needs_render: true,
        })
    }

    pub fn entities(&self) -> &EntityCollection {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut EntityCollection {
        self.needs_render = true;
        &mut self.entities
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        self.needs_render = true;
        &mut self.camera
    }

    pub fn canvas_size(&self) -> Vec2 {
        Vec2::new(
            self.options.canvas_width as f64,
            self.options.canvas_height as f64,
        )
    }

    pub fn pick_position_supported(&self) -> bool {
        self.options.pick_position_supported
    }

    pub fn depth_test_against_terrain(&self) -> bool {
        self.options.depth_test_against_terrain
    }

    pub fn set_depth_test_against_terrain(&mut self, enabled: bool) {
        self.options.depth_test_against_terrain = enabled;
    }

    /// Number of frames rendered so far.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// World position under pixel `screen`, or `None` when picking is
    /// unsupported, the pixel is off-canvas or the ray misses the globe.
    pub fn pick_position(&self, screen: Vec2) -> Option<Ecef> {
        if !self.options.pick_position_supported {
            return None;
        }
        let canvas = self.canvas_size();
        if screen.x < 0.0 || screen.y < 0.0 || screen.x > canvas.x || screen.y > canvas.y {
            return None;
        }
        let ray = self.camera.pick_ray(screen, canvas);
        pick_ellipsoid(ray, self.surface)
    }

    /// Advances one frame of `dt_s` seconds.
    ///
    /// In request-render mode a frame is only rendered when something
    /// changed since the last one.
    pub fn tick(&mut self, dt_s: f64) {
        let moved = self.camera.is_flying();
        let flying = self.camera.update(dt_s);
        if self.options.request_render_mode && !moved && !self.needs_render {
            return;
        }
        self.needs_render = false;
        self.frame_index += 1;
        if flying {
            debug!(frame = self.frame_index, "camera in flight");
        }
    }
}
