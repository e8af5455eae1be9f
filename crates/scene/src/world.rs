use foundation::handles::Handle;
use foundation::math::Vec3;

use crate::components::{ComponentBounds, Geometry, GeometryKind, Label, Transform, Visibility};
use crate::dynamic::Dynamic;
use crate::entity::EntityId;

/// Column storage for scene entities.
///
/// Slots are reused after `despawn`; every reuse bumps the slot generation so
/// handles held by a session that outlived its entity are rejected instead of
/// silently addressing the newcomer.
#[derive(Debug, Default)]
pub struct World {
    generations: Vec<u32>,
    alive: Vec<bool>,
    free: Vec<u32>,
    names: Vec<Option<String>>,
    groups: Vec<Option<String>>,
    transforms: Vec<Option<Transform>>,
    geometries: Vec<Option<Geometry>>,
    labels: Vec<Option<Label>>,
    visibility: Vec<Visibility>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self) -> EntityId {
        if let Some(index) = self.free.pop() {
            let idx = index as usize;
            self.alive[idx] = true;
            return EntityId(Handle::new(index, self.generations[idx]));
        }

        let index = self.generations.len() as u32;
        self.generations.push(0);
        self.alive.push(true);
        self.names.push(None);
        self.groups.push(None);
        self.transforms.push(None);
        self.geometries.push(None);
        self.labels.push(None);
        self.visibility.push(Visibility::default());
        EntityId(Handle::new(index, 0))
    }

    /// Removes the entity and all of its components.
    ///
    /// Returns `false` if the handle is stale or was already removed.
    pub fn despawn(&mut self, entity: EntityId) -> bool {
        let Some(idx) = self.slot(entity) else {
            return false;
        };
        self.alive[idx] = false;
        self.generations[idx] = self.generations[idx].wrapping_add(1);
        self.names[idx] = None;
        self.groups[idx] = None;
        self.transforms[idx] = None;
        self.geometries[idx] = None;
        self.labels[idx] = None;
        self.visibility[idx] = Visibility::default();
        self.free.push(entity.index());
        true
    }

    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.slot(entity).is_some()
    }

    pub fn len(&self) -> usize {
        self.alive.iter().filter(|a| **a).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live entities in ascending index order.
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(|(idx, _)| EntityId(Handle::new(idx as u32, self.generations[idx])))
    }

    pub fn set_name(&mut self, entity: EntityId, name: impl Into<String>) {
        if let Some(idx) = self.slot(entity) {
            self.names[idx] = Some(name.into());
        }
    }

    pub fn name(&self, entity: EntityId) -> Option<&str> {
        self.slot(entity).and_then(|idx| self.names[idx].as_deref())
    }

    /// First live entity (lowest index) carrying `name`.
    pub fn find_by_name(&self, name: &str) -> Option<EntityId> {
        self.entities().find(|e| self.name(*e) == Some(name))
    }

    pub fn set_group(&mut self, entity: EntityId, group: impl Into<String>) {
        if let Some(idx) = self.slot(entity) {
            self.groups[idx] = Some(group.into());
        }
    }

    pub fn group(&self, entity: EntityId) -> Option<&str> {
        self.slot(entity).and_then(|idx| self.groups[idx].as_deref())
    }

    pub fn set_transform(&mut self, entity: EntityId, transform: Transform) {
        if let Some(idx) = self.slot(entity) {
            self.transforms[idx] = Some(transform);
        }
    }

    pub fn transform(&self, entity: EntityId) -> Option<Transform> {
        self.slot(entity).and_then(|idx| self.transforms[idx])
    }

    pub fn set_geometry(&mut self, entity: EntityId, geometry: Geometry) {
        if let Some(idx) = self.slot(entity) {
            self.geometries[idx] = Some(geometry);
        }
    }

    pub fn geometry(&self, entity: EntityId) -> Option<&Geometry> {
        self.slot(entity).and_then(|idx| self.geometries[idx].as_ref())
    }

    pub fn geometry_kind(&self, entity: EntityId) -> Option<GeometryKind> {
        self.geometry(entity).map(Geometry::kind)
    }

    /// Rebind a line/polygon vertex source. Returns `false` when the entity is
    /// gone or has no vertex source.
    pub fn bind_vertices(&mut self, entity: EntityId, source: Dynamic<Vec<Vec3>>) -> bool {
        let Some(idx) = self.slot(entity) else {
            return false;
        };
        self.geometries[idx]
            .as_mut()
            .is_some_and(|g| g.set_vertex_source(source))
    }

    /// Current vertices of a line/polygon, pulling live bindings.
    pub fn sample_vertices(&self, entity: EntityId) -> Option<Vec<Vec3>> {
        self.geometry(entity)
            .and_then(Geometry::vertex_source)
            .map(Dynamic::sample)
    }

    pub fn set_label(&mut self, entity: EntityId, label: Label) {
        if let Some(idx) = self.slot(entity) {
            self.labels[idx] = Some(label);
        }
    }

    pub fn label(&self, entity: EntityId) -> Option<&Label> {
        self.slot(entity).and_then(|idx| self.labels[idx].as_ref())
    }

    pub fn set_visibility(&mut self, entity: EntityId, visibility: Visibility) {
        if let Some(idx) = self.slot(entity) {
            self.visibility[idx] = visibility;
        }
    }

    pub fn is_visible(&self, entity: EntityId) -> bool {
        self.slot(entity)
            .is_some_and(|idx| self.visibility[idx].visible)
    }

    /// World bounds of the entity's geometry at the current sample.
    pub fn bounds(&self, entity: EntityId) -> Option<ComponentBounds> {
        match self.geometry(entity)? {
            Geometry::Point { .. } => {
                let p = self.transform(entity)?.position;
                Some(ComponentBounds::new(p, p))
            }
            Geometry::Line { positions, .. } => ComponentBounds::from_points(&positions.sample()),
            Geometry::Polygon { hierarchy, .. } => {
                ComponentBounds::from_points(&hierarchy.sample())
            }
        }
    }

    fn slot(&self, entity: EntityId) -> Option<usize> {
        let idx = entity.index() as usize;
        let alive = *self.alive.get(idx)?;
        (alive && self.generations[idx] == entity.generation()).then_some(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::World;
    use crate::components::{Geometry, LineStyle, PointStyle, Transform, Visibility};
    use crate::dynamic::Dynamic;
    use foundation::math::Vec3;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn despawned_slot_is_reused_with_new_generation() {
        let mut world = World::new();
        let a = world.spawn();
        assert!(world.despawn(a));
        assert!(!world.despawn(a));

        let b = world.spawn();
        assert_eq!(b.index(), a.index());
        assert_ne!(b, a);
        assert!(world.is_alive(b));
        assert!(!world.is_alive(a));

        world.set_name(a, "stale");
        assert_eq!(world.name(b), None);
    }

    #[test]
    fn find_by_name_skips_removed_entities() {
        let mut world = World::new();
        let a = world.spawn();
        world.set_name(a, "1700000000000polyline");
        assert_eq!(world.find_by_name("1700000000000polyline"), Some(a));
        world.despawn(a);
        assert_eq!(world.find_by_name("1700000000000polyline"), None);
        assert!(world.is_empty());
    }

    #[test]
    fn live_vertices_are_pulled_on_sample() {
        let mut world = World::new();
        let source = Rc::new(RefCell::new(vec![Vec3::ZERO]));
        let line = world.spawn();
        let bound = {
            let source = Rc::clone(&source);
            Dynamic::live(move || source.borrow().clone())
        };
        world.set_geometry(
            line,
            Geometry::Line {
                positions: bound,
                style: LineStyle::default(),
            },
        );

        source.borrow_mut().push(Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(world.sample_vertices(line).map(|v| v.len()), Some(2));

        let bounds = world.bounds(line).unwrap();
        assert_eq!(bounds.max, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn points_have_bounds_at_their_transform() {
        let mut world = World::new();
        let p = world.spawn();
        world.set_transform(p, Transform::at(Vec3::new(2.0, 3.0, 0.0)));
        world.set_geometry(
            p,
            Geometry::Point {
                style: PointStyle::default(),
            },
        );
        assert!(world.sample_vertices(p).is_none());
        assert!(!world.bind_vertices(p, Dynamic::Static(Vec::new())));
        assert_eq!(world.bounds(p).unwrap().min, Vec3::new(2.0, 3.0, 0.0));

        world.set_visibility(p, Visibility::hidden());
        assert!(!world.is_visible(p));
    }
}
