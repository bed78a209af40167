use std::fmt;

use foundation::math::Ecef;

use crate::components::Graphics;

/// Caller-chosen string identifier of a drawable entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey(String);

impl EntityKey {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityKey {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EntityKey {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Entity description handed to [`crate::EntityCollection::add`].
///
/// `id: None` lets the collection generate a unique key.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySpec {
    pub id: Option<EntityKey>,
    pub name: Option<String>,
    pub position: Option<Ecef>,
    pub graphics: Graphics,
}

impl EntitySpec {
    pub fn new(graphics: impl Into<Graphics>) -> Self {
        Self {
            id: None,
            name: None,
            position: None,
            graphics: graphics.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<EntityKey>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_position(mut self, position: Ecef) -> Self {
        self.position = Some(position);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityKey,
    pub name: Option<String>,
    pub position: Option<Ecef>,
    pub graphics: Graphics,
}
