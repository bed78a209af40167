pub mod camera;
pub mod collection;
pub mod components;
pub mod entity;
pub mod input;
pub mod picking;
pub mod viewer;

pub use collection::*;
pub use entity::*;
pub use viewer::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("viewer container id is empty")]
    MissingContainer,
    #[error("cannot create a {width}x{height} rendering context")]
    InvalidCanvas { width: u32, height: u32 },
    #[error("an entity with id {0} already exists")]
    DuplicateEntity(EntityKey),
}
