use foundation::math::Ecef;

use super::{Color, HeightReference};

/// Filled polygon, optionally extruded into a prism.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonGraphics {
    pub hierarchy: Vec<Ecef>,
    pub extruded_height: Option<f64>,
    pub height_reference: HeightReference,
    pub outline: bool,
    pub outline_color: Color,
    pub material: Color,
}

impl PolygonGraphics {
    pub fn new(hierarchy: Vec<Ecef>) -> Self {
        Self {
            hierarchy,
            extruded_height: None,
            height_reference: HeightReference::None,
            outline: false,
            outline_color: Color::WHITE,
            material: Color::WHITE,
        }
    }

    pub fn extruded(mut self, height: f64) -> Self {
        self.extruded_height = Some(height);
        self
    }
}
