use foundation::bounds::Aabb2;

/// GeoJSON position: `[lon, lat]` in degrees.
pub type Position = [f64; 2];

/// Polygon rings, outer ring first.
pub type PolygonRings = Vec<Vec<Position>>;

/// A polygon flattened into one interleaved `[lon0, lat0, lon1, lat1, ...]`
/// sequence plus its lon/lat bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatPolygon {
    pub lon_lats: Vec<f64>,
    pub bounds: Aabb2,
}

impl FlatPolygon {
    pub fn is_empty(&self) -> bool {
        self.lon_lats.is_empty()
    }

    /// Centre of the bounding box, `[lon, lat]`.
    pub fn centroid(&self) -> Option<Position> {
        self.bounds.center()
    }
}

/// Concatenates every ring into a single coordinate sequence.
///
/// Ring boundaries are not preserved, so holes are drawn as part of the
/// outline. Only single-ring polygons come out exact.
pub fn flatten_polygon(rings: &[Vec<Position>]) -> FlatPolygon {
    let mut lon_lats = Vec::with_capacity(rings.iter().map(|r| r.len() * 2).sum());
    let mut bounds = Aabb2::empty();

    for ring in rings {
        for &[lon, lat] in ring {
            lon_lats.push(lon);
            lon_lats.push(lat);
            bounds.extend(lon, lat);
        }
    }

    FlatPolygon { lon_lats, bounds }
}

#[cfg(test)]
mod tests {
    use super::flatten_polygon;
    use pretty_assertions::assert_eq;

    #[test]
    fn flattens_unit_square() {
        let rings = vec![vec![[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]]];
        let flat = flatten_polygon(&rings);
        assert_eq!(
            flat.lon_lats,
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0]
        );
        assert_eq!(flat.centroid(), Some([0.5, 0.5]));
    }

    #[test]
    fn holes_are_appended_to_the_outline() {
        let rings = vec![
            vec![[0.0, 0.0], [0.0, 4.0], [4.0, 4.0], [0.0, 0.0]],
            vec![[1.0, 1.0], [1.0, 2.0], [2.0, 2.0], [1.0, 1.0]],
        ];
        let flat = flatten_polygon(&rings);
        assert_eq!(flat.lon_lats.len(), 16);
        assert_eq!(&flat.lon_lats[8..10], &[1.0, 1.0]);
        assert_eq!(flat.centroid(), Some([2.0, 2.0]));
    }

    #[test]
    fn empty_polygon_has_no_centroid() {
        let flat = flatten_polygon(&[]);
        assert!(flat.is_empty());
        assert_eq!(flat.centroid(), None);
    }
}
