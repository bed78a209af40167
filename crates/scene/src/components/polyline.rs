use std::cell::Cell;
use std::rc::Rc;

use foundation::math::Ecef;

use super::Color;

/// A position that is either fixed at creation or re-read every frame.
///
/// The shared variant lets the owner of the cell move a vertex after the
/// entity was added (e.g. a line following the pointer).
#[derive(Debug, Clone, PartialEq)]
pub enum PositionProperty {
    Constant(Ecef),
    Shared(Rc<Cell<Ecef>>),
}

impl PositionProperty {
    pub fn value(&self) -> Ecef {
        match self {
            PositionProperty::Constant(p) => *p,
            PositionProperty::Shared(cell) => cell.get(),
        }
    }
}

impl From<Ecef> for PositionProperty {
    fn from(position: Ecef) -> Self {
        PositionProperty::Constant(position)
    }
}

impl From<Rc<Cell<Ecef>>> for PositionProperty {
    fn from(cell: Rc<Cell<Ecef>>) -> Self {
        PositionProperty::Shared(cell)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolylineGraphics {
    pub positions: Vec<PositionProperty>,
    pub width: f64,
    pub clamp_to_ground: bool,
    pub material: Color,
}

impl PolylineGraphics {
    pub fn new(positions: Vec<PositionProperty>) -> Self {
        Self {
            positions,
            width: 1.0,
            clamp_to_ground: false,
            material: Color::WHITE,
        }
    }

    /// Vertices as they would be drawn this frame.
    pub fn positions_now(&self) -> Vec<Ecef> {
        self.positions.iter().map(PositionProperty::value).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::{PolylineGraphics, PositionProperty};
    use foundation::math::Ecef;

    #[test]
    fn shared_vertex_follows_its_cell() {
        let start = Ecef::new(1.0, 0.0, 0.0);
        let cursor = Rc::new(Cell::new(Ecef::new(2.0, 0.0, 0.0)));
        let line = PolylineGraphics::new(vec![
            PositionProperty::from(start),
            PositionProperty::from(cursor.clone()),
        ]);
        assert_eq!(line.positions_now()[1], Ecef::new(2.0, 0.0, 0.0));

        cursor.set(Ecef::new(3.0, 1.0, 0.0));
        assert_eq!(line.positions_now(), vec![start, Ecef::new(3.0, 1.0, 0.0)]);
    }
}
