use foundation::math::{Geodetic, Vec2, Vec3};
use scene::components::{
    GeometryKind, Label, LineStyle, PointStyle, PolygonStyle, Transform, Visibility,
};
use scene::dynamic::Dynamic;
use scene::entity::EntityId;
use scene::input::{CursorStyle, InputKind, InputOwner};
use scene::picking::PickHit;
use scene::{Scene, SceneSnapshot};

/// Everything the capture sessions need from the map host.
///
/// Sessions never hold the adapter; each call receives it explicitly so the
/// owner (usually a [`crate::Workbench`]) decides who mutates the scene.
pub trait SceneAdapter {
    /// What one frame of the host looks like after all bindings are pulled.
    type Snapshot;

    /// Surface point under the pixel, `None` when the pointer is off the map.
    fn pick_surface_point(&self, screen: Vec2) -> Option<Vec3>;
    /// Topmost entity under the pixel.
    fn pick_entity(&self, screen: Vec2) -> Option<PickHit>;

    fn add_point_marker(
        &mut self,
        position: Vec3,
        style: &PointStyle,
        label: Option<Label>,
        group: Option<&str>,
    ) -> EntityId;
    fn add_line(
        &mut self,
        name: Option<&str>,
        positions: Dynamic<Vec<Vec3>>,
        style: &LineStyle,
    ) -> EntityId;
    fn add_polygon(
        &mut self,
        name: Option<&str>,
        hierarchy: Dynamic<Vec<Vec3>>,
        style: &PolygonStyle,
    ) -> EntityId;
    fn remove_entity(&mut self, entity: EntityId) -> bool;

    /// Replace the vertex source of a line or polygon.
    fn bind_positions(&mut self, entity: EntityId, source: Dynamic<Vec<Vec3>>) -> bool;
    /// Current vertices of a line or polygon, sampling live bindings.
    fn positions(&self, entity: EntityId) -> Option<Vec<Vec3>>;
    fn entity_position(&self, entity: EntityId) -> Option<Vec3>;
    fn set_entity_position(&mut self, entity: EntityId, position: Vec3) -> bool;
    /// Attach a label drawn at `anchor`.
    fn set_label_anchor(&mut self, entity: EntityId, label: Label, anchor: Vec3) -> bool;
    /// Group of a point marker; `None` for anything that is not a marker.
    fn marker_group(&self, entity: EntityId) -> Option<&str>;
    fn find_by_name(&self, name: &str) -> Option<EntityId>;
    fn set_visible(&mut self, entity: EntityId, visible: bool) -> bool;

    fn pick_geographic(&self, screen: Vec2) -> Option<Geodetic> {
        self.pick_surface_point(screen)
            .map(|p| self.world_to_geographic(p))
    }
    fn geographic_to_world(&self, geo: Geodetic) -> Vec3;
    fn world_to_geographic(&self, point: Vec3) -> Geodetic;
    /// Eye height above the surface in meters.
    fn camera_height(&self) -> f64;

    fn allocate_input_owner(&mut self) -> InputOwner;
    /// Bind `kind` to `owner`, replacing (never stacking on) the current owner.
    fn set_input_action(&mut self, kind: InputKind, owner: InputOwner) -> Option<InputOwner>;
    fn remove_input_action(&mut self, kind: InputKind) -> Option<InputOwner>;
    fn input_owner(&self, kind: InputKind) -> Option<InputOwner>;
    fn set_cursor(&mut self, cursor: CursorStyle);

    fn sample_frame(&self) -> Self::Snapshot;
}

/// Bind every pointer kind a capture session listens to.
pub(crate) fn bind_all<S: SceneAdapter + ?Sized>(scene: &mut S, owner: InputOwner) {
    for kind in InputKind::ALL {
        scene.set_input_action(kind, owner);
    }
}

/// Remove the bindings `owner` still holds. Kinds rebound by someone else are
/// left alone.
pub(crate) fn release_all<S: SceneAdapter + ?Sized>(scene: &mut S, owner: InputOwner) {
    for kind in InputKind::ALL {
        if scene.input_owner(kind) == Some(owner) {
            scene.remove_input_action(kind);
        }
    }
}

impl SceneAdapter for Scene {
    type Snapshot = SceneSnapshot;

    fn pick_surface_point(&self, screen: Vec2) -> Option<Vec3> {
        self.pick_surface(screen)
    }

    fn pick_entity(&self, screen: Vec2) -> Option<PickHit> {
        self.pick(screen)
    }

    fn add_point_marker(
        &mut self,
        position: Vec3,
        style: &PointStyle,
        label: Option<Label>,
        group: Option<&str>,
    ) -> EntityId {
        let entity = self.spawn_point(position, style.clone(), label);
        if let Some(group) = group {
            self.world_mut().set_group(entity, group);
        }
        entity
    }

    fn add_line(
        &mut self,
        name: Option<&str>,
        positions: Dynamic<Vec<Vec3>>,
        style: &LineStyle,
    ) -> EntityId {
        let entity = self.spawn_line(positions, style.clone());
        if let Some(name) = name {
            self.world_mut().set_name(entity, name);
        }
        entity
    }

    fn add_polygon(
        &mut self,
        name: Option<&str>,
        hierarchy: Dynamic<Vec<Vec3>>,
        style: &PolygonStyle,
    ) -> EntityId {
        let entity = self.spawn_polygon(hierarchy, style.clone());
        if let Some(name) = name {
            self.world_mut().set_name(entity, name);
        }
        entity
    }

    fn remove_entity(&mut self, entity: EntityId) -> bool {
        self.world_mut().despawn(entity)
    }

    fn bind_positions(&mut self, entity: EntityId, source: Dynamic<Vec<Vec3>>) -> bool {
        self.world_mut().bind_vertices(entity, source)
    }

    fn positions(&self, entity: EntityId) -> Option<Vec<Vec3>> {
        self.world().sample_vertices(entity)
    }

    fn entity_position(&self, entity: EntityId) -> Option<Vec3> {
        self.world().transform(entity).map(|t| t.position)
    }

    fn set_entity_position(&mut self, entity: EntityId, position: Vec3) -> bool {
        if !self.world().is_alive(entity) {
            return false;
        }
        self.world_mut().set_transform(entity, Transform::at(position));
        true
    }

    fn set_label_anchor(&mut self, entity: EntityId, label: Label, anchor: Vec3) -> bool {
        if !self.world().is_alive(entity) {
            return false;
        }
        let world = self.world_mut();
        world.set_label(entity, label);
        world.set_transform(entity, Transform::at(anchor));
        true
    }

    fn marker_group(&self, entity: EntityId) -> Option<&str> {
        let world = self.world();
        match world.geometry_kind(entity)? {
            GeometryKind::Point => world.group(entity),
            _ => None,
        }
    }

    fn find_by_name(&self, name: &str) -> Option<EntityId> {
        self.world().find_by_name(name)
    }

    fn set_visible(&mut self, entity: EntityId, visible: bool) -> bool {
        if !self.world().is_alive(entity) {
            return false;
        }
        self.world_mut()
            .set_visibility(entity, Visibility::from_flag(visible));
        true
    }

    fn geographic_to_world(&self, geo: Geodetic) -> Vec3 {
        self.surface().from_geodetic(geo)
    }

    fn world_to_geographic(&self, point: Vec3) -> Geodetic {
        self.surface().to_geodetic(point)
    }

    fn camera_height(&self) -> f64 {
        self.camera().height()
    }

    fn allocate_input_owner(&mut self) -> InputOwner {
        self.input_mut().allocate_owner()
    }

    fn set_input_action(&mut self, kind: InputKind, owner: InputOwner) -> Option<InputOwner> {
        self.input_mut().bind(kind, owner)
    }

    fn remove_input_action(&mut self, kind: InputKind) -> Option<InputOwner> {
        self.input_mut().unbind(kind)
    }

    fn input_owner(&self, kind: InputKind) -> Option<InputOwner> {
        self.input().owner(kind)
    }

    fn set_cursor(&mut self, cursor: CursorStyle) {
        Scene::set_cursor(self, cursor);
    }

    fn sample_frame(&self) -> SceneSnapshot {
        self.extract()
    }
}
