use std::collections::BTreeMap;

use scene::entity::EntityId;

use crate::error::CaptureError;
use crate::id::GeometryId;

/// Scene handles owned by one committed geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredGeometry {
    pub line: EntityId,
    pub markers: Vec<EntityId>,
}

/// Committed geometries by session id.
#[derive(Debug, Default)]
pub struct GeometryRegistry {
    entries: BTreeMap<GeometryId, RegisteredGeometry>,
}

impl GeometryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: GeometryId, entry: RegisteredGeometry) -> Result<(), CaptureError> {
        if self.entries.contains_key(&id) {
            return Err(CaptureError::DuplicateGeometry(id));
        }
        self.entries.insert(id, entry);
        Ok(())
    }

    pub fn get(&self, id: GeometryId) -> Option<&RegisteredGeometry> {
        self.entries.get(&id)
    }

    pub fn remove(&mut self, id: GeometryId) -> Result<RegisteredGeometry, CaptureError> {
        self.entries
            .remove(&id)
            .ok_or(CaptureError::UnknownGeometry(id))
    }

    pub fn ids(&self) -> impl Iterator<Item = GeometryId> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{GeometryRegistry, RegisteredGeometry};
    use crate::error::CaptureError;
    use crate::id::GeometryId;
    use foundation::handles::Handle;
    use scene::entity::EntityId;

    fn entity(index: u32) -> EntityId {
        EntityId(Handle::new(index, 0))
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut reg = GeometryRegistry::new();
        let entry = RegisteredGeometry {
            line: entity(0),
            markers: vec![entity(1), entity(2)],
        };
        reg.insert(GeometryId(7), entry.clone()).unwrap();
        assert_eq!(
            reg.insert(GeometryId(7), entry),
            Err(CaptureError::DuplicateGeometry(GeometryId(7)))
        );
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get(GeometryId(7)).unwrap().markers, vec![entity(1), entity(2)]);
    }

    #[test]
    fn remove_unknown_is_an_error() {
        let mut reg = GeometryRegistry::new();
        assert_eq!(
            reg.remove(GeometryId(1)),
            Err(CaptureError::UnknownGeometry(GeometryId(1)))
        );
    }
}
