use std::cell::RefCell;
use std::rc::Rc;

use foundation::math::precision::same_point;
use foundation::math::{Vec2, Vec3};
use scene::components::GeometryKind;
use scene::dynamic::Dynamic;
use scene::entity::EntityId;
use scene::input::{InputKind, InputOwner, PointerEvent};
use tracing::{debug, warn};

use crate::adapter::{SceneAdapter, bind_all, release_all};
use crate::error::CaptureError;
use crate::id::GeometryId;
use crate::registry::GeometryRegistry;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EditState {
    Inactive,
    Armed,
    Editing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditCommit {
    pub geometry: GeometryId,
    pub vertex_index: usize,
    pub vertices: Vec<Vec3>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    Ignored,
    Picked {
        geometry: GeometryId,
        vertex_index: usize,
        /// The edit that was in progress when the new pick landed.
        recommitted: Option<EditCommit>,
    },
    Moved {
        geometry: GeometryId,
        vertex_index: usize,
        position: Vec3,
    },
    Committed(EditCommit),
    RolledBack {
        geometry: GeometryId,
        vertex_index: usize,
    },
    Deactivated,
}

#[derive(Debug)]
struct EditTarget {
    geometry: GeometryId,
    line: EntityId,
    marker: EntityId,
    vertex_index: usize,
    working: Rc<RefCell<Vec<Vec3>>>,
    snapshot: Vec<Vec3>,
    marker_origin: Vec3,
    moved: bool,
}

/// Relocates one vertex of a committed geometry per pick, drag, commit cycle.
#[derive(Debug)]
pub struct EditSession {
    owner: InputOwner,
    active: bool,
    target: Option<EditTarget>,
    settled: Option<EditCommit>,
}

impl EditSession {
    pub fn new(owner: InputOwner) -> Self {
        Self {
            owner,
            active: false,
            target: None,
            settled: None,
        }
    }

    pub fn owner(&self) -> InputOwner {
        self.owner
    }

    pub fn state(&self) -> EditState {
        match (self.active, &self.target) {
            (false, _) => EditState::Inactive,
            (true, None) => EditState::Armed,
            (true, Some(_)) => EditState::Editing,
        }
    }

    pub fn target_geometry(&self) -> Option<GeometryId> {
        self.target.as_ref().map(|t| t.geometry)
    }

    pub fn vertex_index(&self) -> Option<usize> {
        self.target.as_ref().map(|t| t.vertex_index)
    }

    pub fn working_copy(&self) -> Option<Vec<Vec3>> {
        self.target.as_ref().map(|t| t.working.borrow().clone())
    }

    /// Commit forced by a failed pick, waiting to be reported.
    pub fn take_settled(&mut self) -> Option<EditCommit> {
        self.settled.take()
    }

    pub fn activate<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S) -> EditOutcome {
        let outcome = self.deactivate(scene);
        bind_all(scene, self.owner);
        self.active = true;
        debug!("edit session armed");
        outcome
    }

    pub fn handle<S: SceneAdapter + ?Sized>(
        &mut self,
        scene: &mut S,
        registry: &GeometryRegistry,
        event: PointerEvent,
    ) -> Result<EditOutcome, CaptureError> {
        match event.kind {
            InputKind::PrimaryClick => self.on_primary_click(scene, registry, event.position),
            InputKind::PointerMove => Ok(self.on_pointer_move(scene, event.position)),
            InputKind::SecondaryClick => Ok(self.on_secondary_click(scene)),
        }
    }

    /// Pick a marker of a registered geometry and start editing its vertex.
    ///
    /// A marker whose position matches no vertex of its line fails with
    /// [`CaptureError::VertexNotFound`] and leaves the session `Armed`. A drag
    /// in progress is committed first, as a successful re-pick would, and
    /// the commit is held for [`EditSession::take_settled`].
    pub fn on_primary_click<S: SceneAdapter + ?Sized>(
        &mut self,
        scene: &mut S,
        registry: &GeometryRegistry,
        screen: Vec2,
    ) -> Result<EditOutcome, CaptureError> {
        if !self.active {
            return Ok(EditOutcome::Ignored);
        }
        let Some(hit) = scene.pick_entity(screen) else {
            return Ok(EditOutcome::Ignored);
        };
        if hit.kind != GeometryKind::Point {
            return Ok(EditOutcome::Ignored);
        }
        let marker = hit.entity;
        let Some(geometry) = scene.marker_group(marker).and_then(GeometryId::from_group) else {
            return Ok(EditOutcome::Ignored);
        };
        let Some(entry) = registry.get(geometry) else {
            return Ok(EditOutcome::Ignored);
        };
        let line = entry.line;

        let vertices = scene
            .positions(line)
            .ok_or(CaptureError::MissingPositions(line))?;
        let marker_origin = scene
            .entity_position(marker)
            .ok_or(CaptureError::MissingPositions(marker))?;
        let Some(vertex_index) = vertices.iter().position(|v| same_point(*v, marker_origin)) else {
            warn!(%geometry, %marker, "picked marker matches no vertex");
            self.settled = self.commit(scene);
            return Err(CaptureError::VertexNotFound { geometry });
        };

        let recommitted = self.commit(scene);

        let working = Rc::new(RefCell::new(vertices.clone()));
        let source = Rc::clone(&working);
        scene.bind_positions(line, Dynamic::live(move || source.borrow().clone()));
        self.target = Some(EditTarget {
            geometry,
            line,
            marker,
            vertex_index,
            working,
            snapshot: vertices,
            marker_origin,
            moved: false,
        });
        debug!(%geometry, vertex_index, "editing vertex");

        Ok(EditOutcome::Picked {
            geometry,
            vertex_index,
            recommitted,
        })
    }

    pub fn on_pointer_move<S: SceneAdapter + ?Sized>(
        &mut self,
        scene: &mut S,
        screen: Vec2,
    ) -> EditOutcome {
        let Some(target) = self.target.as_mut() else {
            return EditOutcome::Ignored;
        };
        let Some(position) = scene.pick_surface_point(screen) else {
            return EditOutcome::Ignored;
        };

        if let Some(slot) = target.working.borrow_mut().get_mut(target.vertex_index) {
            *slot = position;
        }
        scene.set_entity_position(target.marker, position);
        target.moved = true;

        EditOutcome::Moved {
            geometry: target.geometry,
            vertex_index: target.vertex_index,
            position,
        }
    }

    pub fn on_secondary_click<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S) -> EditOutcome {
        self.commit(scene)
            .map_or(EditOutcome::Ignored, EditOutcome::Committed)
    }

    /// Freeze the working copy into the line and go back to `Armed`.
    pub fn commit<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S) -> Option<EditCommit> {
        let target = self.target.take()?;
        let vertices = std::mem::take(&mut *target.working.borrow_mut());
        scene.bind_positions(target.line, Dynamic::Static(vertices.clone()));
        debug!(geometry = %target.geometry, vertex_index = target.vertex_index, "edit committed");
        Some(EditCommit {
            geometry: target.geometry,
            vertex_index: target.vertex_index,
            vertices,
        })
    }

    /// Stop listening. An uncommitted drag is rolled back: the line gets its
    /// pre-pick vertices again and the marker returns to where it was picked.
    pub fn deactivate<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S) -> EditOutcome {
        if !self.active {
            return EditOutcome::Deactivated;
        }
        release_all(scene, self.owner);
        self.active = false;

        let Some(target) = self.target.take() else {
            return EditOutcome::Deactivated;
        };
        scene.bind_positions(target.line, Dynamic::Static(target.snapshot));
        scene.set_entity_position(target.marker, target.marker_origin);
        if !target.moved {
            return EditOutcome::Deactivated;
        }
        debug!(geometry = %target.geometry, vertex_index = target.vertex_index, "edit rolled back");
        EditOutcome::RolledBack {
            geometry: target.geometry,
            vertex_index: target.vertex_index,
        }
    }

    /// Drop the target without touching the scene, for when its geometry is
    /// being deleted. Returns `true` if `geometry` was the target.
    pub fn forget(&mut self, geometry: GeometryId) -> bool {
        if self.target_geometry() != Some(geometry) {
            return false;
        }
        self.target = None;
        true
    }
}
