//! Landscape-axis map: the service owning the viewer, the interaction
//! controller on top of it, and the auto-posting HTTP client.

pub mod client;
pub mod config;
pub mod controller;
pub mod service;

pub use client::{AutoPostingClient, FetchError};
pub use config::{ConfigError, MapConfig};
pub use controller::{AxisSession, AxisState, MapController};
pub use service::{MapService, PickEvent};

use formats::BuildingError;
use scene::ViewerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapError {
    #[error(transparent)]
    Viewer(#[from] ViewerError),
    #[error("flat coordinate list has odd length {0}")]
    OddCoordinateCount(usize),
    #[error(transparent)]
    Building(#[from] BuildingError),
    #[error("no auto-posting result at index {index} (have {len})")]
    NoSuchResult { index: usize, len: usize },
}
