use geo_types::{Geometry, Polygon};
use geozero::ToGeo;
use geozero::wkt::WktStr;

use crate::polygon::PolygonRings;

#[derive(Debug, Clone, PartialEq)]
pub enum WktPolygonError {
    Parse(String),
    Unsupported(&'static str),
}

impl std::fmt::Display for WktPolygonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WktPolygonError::Parse(reason) => write!(f, "invalid WKT: {reason}"),
            WktPolygonError::Unsupported(kind) => {
                write!(f, "expected POLYGON or MULTIPOLYGON, got {kind}")
            }
        }
    }
}

impl std::error::Error for WktPolygonError {}

/// Parses a `POLYGON` or `MULTIPOLYGON` into GeoJSON-style ring lists, one
/// entry per polygon.
pub fn parse_wkt_polygons(wkt: &str) -> Result<Vec<PolygonRings>, WktPolygonError> {
    let geometry = WktStr(wkt)
        .to_geo()
        .map_err(|e| WktPolygonError::Parse(e.to_string()))?;

    match geometry {
        Geometry::Polygon(polygon) => Ok(vec![polygon_rings(&polygon)]),
        Geometry::MultiPolygon(multi) => Ok(multi.0.iter().map(polygon_rings).collect()),
        other => Err(WktPolygonError::Unsupported(geometry_kind(&other))),
    }
}

fn polygon_rings(polygon: &Polygon<f64>) -> PolygonRings {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(|ring| ring.coords().map(|c| [c.x, c.y]).collect())
        .collect()
}

fn geometry_kind(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "POINT",
        Geometry::LineString(_) => "LINESTRING",
        Geometry::MultiPoint(_) => "MULTIPOINT",
        Geometry::MultiLineString(_) => "MULTILINESTRING",
        Geometry::GeometryCollection(_) => "GEOMETRYCOLLECTION",
        _ => "non-polygon geometry",
    }
}
