use tracing::trace;

use crate::ViewerError;
use crate::entity::{Entity, EntityKey, EntitySpec};

/// Ordered set of drawable entities addressed by string key.
///
/// Ordering contract:
/// - Iteration yields entities in insertion order.
#[derive(Debug, Default)]
pub struct EntityCollection {
    entities: Vec<Entity>,
    next_generated: u64,
}

impl EntityCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entity. Fails if an entity with the same key is present.
    pub fn add(&mut self, spec: EntitySpec) -> Result<EntityKey, ViewerError> {
        let id = match spec.id {
            Some(id) => {
                if self.contains(&id) {
                    return Err(ViewerError::DuplicateEntity(id));
                }
                id
            }
            None => self.generate_key(),
        };

        trace!(%id, "entity added");
        self.entities.push(Entity {
            id: id.clone(),
            name: spec.name,
            position: spec.position,
            graphics: spec.graphics,
        });
        Ok(id)
    }

    /// Removes the entity with `id`. Returns `true` if one was removed.
    pub fn remove_by_id(&mut self, id: &EntityKey) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        self.entities.remove(idx);
        trace!(%id, "entity removed");
        true
    }

    pub fn remove_all(&mut self) {
        self.entities.clear();
    }

    pub fn get_by_id(&self, id: &EntityKey) -> Option<&Entity> {
        self.index_of(id).map(|idx| &self.entities[idx])
    }

    pub fn contains(&self, id: &EntityKey) -> bool {
        self.index_of(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.iter()
    }

    fn index_of(&self, id: &EntityKey) -> Option<usize> {
        self.entities.iter().position(|e| &e.id == id)
    }

    fn generate_key(&mut self) -> EntityKey {
        loop {
            self.next_generated += 1;
            let key = EntityKey::new(format!("entity-{}", self.next_generated));
            if !self.contains(&key) {
                return key;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EntityCollection;
    use crate::ViewerError;
    use crate::components::EllipsoidGraphics;
    use crate::entity::{EntityKey, EntitySpec};

    fn marker(id: &str) -> EntitySpec {
        EntitySpec::new(EllipsoidGraphics::sphere(0.5)).with_id(id)
    }

    #[test]
    fn add_and_get_by_id() {
        let mut entities = EntityCollection::new();
        let id = entities.add(marker("a")).unwrap();
        assert_eq!(id, EntityKey::from("a"));
        assert!(entities.get_by_id(&id).is_some());
        assert_eq!(entities.len(), 1);
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut entities = EntityCollection::new();
        entities.add(marker("a")).unwrap();
        let err = entities.add(marker("a")).unwrap_err();
        assert!(matches!(err, ViewerError::DuplicateEntity(ref id) if id.as_str() == "a"));
        assert_eq!(entities.len(), 1);
    }

    #[test]
    fn generated_ids_skip_taken_keys() {
        let mut entities = EntityCollection::new();
        entities.add(marker("entity-1")).unwrap();
        let generated = entities
            .add(EntitySpec::new(EllipsoidGraphics::sphere(1.0)))
            .unwrap();
        assert_eq!(generated.as_str(), "entity-2");
    }

    #[test]
    fn remove_missing_is_noop() {
        let mut entities = EntityCollection::new();
        entities.add(marker("a")).unwrap();
        assert!(!entities.remove_by_id(&EntityKey::from("b")));
        assert!(entities.remove_by_id(&EntityKey::from("a")));
        assert!(entities.is_empty());
    }

    #[test]
    fn iteration_keeps_insertion_order() {
        let mut entities = EntityCollection::new();
        for id in ["c", "a", "b"] {
            entities.add(marker(id)).unwrap();
        }
        let ids: Vec<&str> = entities.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);

        entities.remove_all();
        assert!(entities.is_empty());
    }
}
