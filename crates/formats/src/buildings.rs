use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

use crate::polygon::PolygonRings;
use crate::wkt::{WktPolygonError, parse_wkt_polygons};

/// Extrusion meters per unit of floor `height`.
///
/// The source data is believed to store storey counts, with roughly 3 m per
/// storey; this has not been confirmed by the data owners.
pub const FLOOR_HEIGHT_MULTIPLIER: f64 = 3.0;

/// Decoded `analsPostingBuilds` payload: building key -> building.
///
/// Keys are iterated in ascending order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Buildings(pub BTreeMap<String, Building>);

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Building {
    #[serde(default)]
    pub floor: BTreeMap<String, Floor>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Floor {
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub height: f64,
    /// Polygon id -> WKT.
    #[serde(default)]
    pub polygon: BTreeMap<String, String>,
}

/// One parsed polygon ready for extrusion.
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    pub building: String,
    pub floor: String,
    pub polygon_id: String,
    pub floor_height: f64,
    pub rings: PolygonRings,
}

impl Footprint {
    pub fn extrusion_height(&self) -> f64 {
        self.floor_height * FLOOR_HEIGHT_MULTIPLIER
    }
}

#[derive(Debug)]
pub enum BuildingError {
    Json(serde_json::Error),
    Polygon {
        building: String,
        floor: String,
        polygon: String,
        source: WktPolygonError,
    },
}

impl std::fmt::Display for BuildingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildingError::Json(e) => write!(f, "invalid buildings payload: {e}"),
            BuildingError::Polygon {
                building,
                floor,
                polygon,
                source,
            } => write!(
                f,
                "building {building} floor {floor} polygon {polygon}: {source}"
            ),
        }
    }
}

impl std::error::Error for BuildingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildingError::Json(e) => Some(e),
            BuildingError::Polygon { source, .. } => Some(source),
        }
    }
}

impl Buildings {
    pub fn from_json_str(payload: &str) -> Result<Self, BuildingError> {
        serde_json::from_str(payload).map_err(BuildingError::Json)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parses every polygon of every floor.
    ///
    /// Fails on the first malformed WKT, so callers get either all
    /// footprints or none. A `MULTIPOLYGON` contributes one footprint per
    /// member polygon, all sharing the same ids.
    pub fn footprints(&self) -> Result<Vec<Footprint>, BuildingError> {
        let mut out = Vec::new();
        for (building_key, building) in &self.0 {
            for (floor_key, floor) in &building.floor {
                for (polygon_id, wkt) in &floor.polygon {
                    let polygons =
                        parse_wkt_polygons(wkt).map_err(|source| BuildingError::Polygon {
                            building: building_key.clone(),
                            floor: floor_key.clone(),
                            polygon: polygon_id.clone(),
                            source,
                        })?;
                    for rings in polygons {
                        out.push(Footprint {
                            building: building_key.clone(),
                            floor: floor_key.clone(),
                            polygon_id: polygon_id.clone(),
                            floor_height: floor.height,
                            rings,
                        });
                    }
                }
            }
        }
        Ok(out)
    }
}

fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
