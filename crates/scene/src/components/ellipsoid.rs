use foundation::math::Vec3;

use super::{Color, HeightReference};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EllipsoidGraphics {
    pub radii: Vec3,
    pub height_reference: HeightReference,
    pub material: Color,
}

impl EllipsoidGraphics {
    pub fn sphere(radius: f64) -> Self {
        Self {
            radii: Vec3::new(radius, radius, radius),
            height_reference: HeightReference::None,
            material: Color::WHITE,
        }
    }

    pub fn with_height_reference(mut self, height_reference: HeightReference) -> Self {
        self.height_reference = height_reference;
        self
    }
}
