pub mod buildings;
pub mod polygon;
pub mod posting;
pub mod wkt;

pub use buildings::*;
pub use polygon::*;
pub use posting::*;
pub use wkt::*;
