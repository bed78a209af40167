pub mod color;
pub mod ellipsoid;
pub mod polygon;
pub mod polyline;

pub use color::*;
pub use ellipsoid::*;
pub use polygon::*;
pub use polyline::*;

/// How an entity's height is interpreted against the terrain.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum HeightReference {
    #[default]
    None,
    ClampToGround,
    RelativeToGround,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Graphics {
    Ellipsoid(EllipsoidGraphics),
    Polyline(PolylineGraphics),
    Polygon(PolygonGraphics),
}

impl From<EllipsoidGraphics> for Graphics {
    fn from(g: EllipsoidGraphics) -> Self {
        Graphics::Ellipsoid(g)
    }
}

impl From<PolylineGraphics> for Graphics {
    fn from(g: PolylineGraphics) -> Self {
        Graphics::Polyline(g)
    }
}

impl From<PolygonGraphics> for Graphics {
    fn from(g: PolygonGraphics) -> Self {
        Graphics::Polygon(g)
    }
}
