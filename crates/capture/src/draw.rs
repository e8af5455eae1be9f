use std::cell::RefCell;
use std::rc::Rc;

use foundation::math::{Vec2, Vec3};
use scene::components::{Label, LabelStyle, LineStyle, PointStyle};
use scene::dynamic::Dynamic;
use scene::entity::EntityId;
use scene::input::{CursorStyle, InputKind, InputOwner, PointerEvent};
use tracing::debug;

use crate::adapter::{SceneAdapter, bind_all, release_all};
use crate::config::CaptureConfig;
use crate::id::{GeometryId, SessionIds};
use crate::vertex::VertexSequence;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DrawState {
    Idle,
    Collecting,
}

/// A finished drawing: its frozen line, the numbered markers and the vertices
/// in click order.
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedGeometry {
    pub id: GeometryId,
    pub line: EntityId,
    pub markers: Vec<EntityId>,
    pub vertices: Vec<Vec3>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOutcome {
    /// Not collecting, or the pointer missed the surface.
    Ignored,
    PointAdded {
        index: usize,
        marker: EntityId,
        position: Vec3,
    },
    Previewed(Vec3),
    Committed(CommittedGeometry),
    /// Terminated with fewer confirmed points than the minimum; every visual
    /// of the session was removed.
    Discarded {
        id: GeometryId,
        points: usize,
    },
    /// Terminated before anything was drawn.
    Deactivated,
}

/// Click-to-place line capture.
///
/// The preview line created on the first click is bound live to the session's
/// vertex sequence, so it follows the cursor with no explicit redraw.
#[derive(Debug)]
pub struct DrawSession {
    owner: InputOwner,
    ids: SessionIds,
    min_vertex_count: usize,
    marker_style: PointStyle,
    marker_label: LabelStyle,
    line_style: LineStyle,
    state: DrawState,
    id: Option<GeometryId>,
    sequence: Rc<RefCell<VertexSequence>>,
    index: usize,
    line: Option<EntityId>,
    markers: Vec<EntityId>,
}

impl DrawSession {
    pub fn new(owner: InputOwner, config: &CaptureConfig, ids: SessionIds) -> Self {
        Self {
            owner,
            ids,
            min_vertex_count: config.min_vertex_count,
            marker_style: config.styles.marker.clone(),
            marker_label: config.styles.marker_label.clone(),
            line_style: config.styles.draw_line.clone(),
            state: DrawState::Idle,
            id: None,
            sequence: Rc::new(RefCell::new(VertexSequence::new())),
            index: 0,
            line: None,
            markers: Vec::new(),
        }
    }

    pub fn owner(&self) -> InputOwner {
        self.owner
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    pub fn is_collecting(&self) -> bool {
        self.state == DrawState::Collecting
    }

    /// Id of the current (or last) session.
    pub fn id(&self) -> Option<GeometryId> {
        self.id
    }

    pub fn line(&self) -> Option<EntityId> {
        self.line
    }

    pub fn markers(&self) -> &[EntityId] {
        &self.markers
    }

    pub fn confirmed(&self) -> Vec<Vec3> {
        self.sequence.borrow().confirmed().to_vec()
    }

    pub fn temp_positions(&self) -> Vec<Vec3> {
        self.sequence.borrow().temp_positions()
    }

    pub fn activate<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S) {
        if self.is_collecting() {
            self.clear(scene);
            self.deactivate(scene);
        }

        bind_all(scene, self.owner);
        let id = self.ids.next_id();
        self.id = Some(id);
        // A fresh sequence: a line abandoned by `deactivate` keeps the old one.
        self.sequence = Rc::new(RefCell::new(VertexSequence::new()));
        self.index = 0;
        self.line = None;
        self.markers.clear();
        scene.set_cursor(CursorStyle::Crosshair);
        self.state = DrawState::Collecting;
        debug!(%id, "draw session collecting");
    }

    pub fn handle<S: SceneAdapter + ?Sized>(
        &mut self,
        scene: &mut S,
        event: PointerEvent,
    ) -> DrawOutcome {
        match event.kind {
            InputKind::PrimaryClick => self.on_primary_click(scene, event.position),
            InputKind::PointerMove => self.on_pointer_move(scene, event.position),
            InputKind::SecondaryClick => self.on_secondary_click(scene),
        }
    }

    pub fn on_primary_click<S: SceneAdapter + ?Sized>(
        &mut self,
        scene: &mut S,
        screen: Vec2,
    ) -> DrawOutcome {
        let Some(id) = self.id.filter(|_| self.is_collecting()) else {
            return DrawOutcome::Ignored;
        };
        let Some(position) = scene.pick_surface_point(screen) else {
            return DrawOutcome::Ignored;
        };

        self.sequence.borrow_mut().confirm(position);
        self.index += 1;
        let label = Label::new(self.index.to_string(), self.marker_label.clone());
        let marker =
            scene.add_point_marker(position, &self.marker_style, Some(label), Some(&id.group()));
        self.markers.push(marker);

        if self.line.is_none() {
            let source = Rc::clone(&self.sequence);
            let line = scene.add_line(
                Some(&id.line_name()),
                Dynamic::live(move || source.borrow().temp_positions()),
                &self.line_style,
            );
            self.line = Some(line);
        }

        DrawOutcome::PointAdded {
            index: self.index,
            marker,
            position,
        }
    }

    pub fn on_pointer_move<S: SceneAdapter + ?Sized>(
        &mut self,
        scene: &mut S,
        screen: Vec2,
    ) -> DrawOutcome {
        if !self.is_collecting() || self.line.is_none() {
            return DrawOutcome::Ignored;
        }
        let Some(position) = scene.pick_surface_point(screen) else {
            return DrawOutcome::Ignored;
        };
        self.sequence.borrow_mut().set_live(position);
        DrawOutcome::Previewed(position)
    }

    pub fn on_secondary_click<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S) -> DrawOutcome {
        let Some(id) = self.id.filter(|_| self.is_collecting()) else {
            return DrawOutcome::Ignored;
        };
        let Some(line) = self.line else {
            self.deactivate(scene);
            return DrawOutcome::Deactivated;
        };

        // Freeze to the confirmed prefix, dropping the cursor tail.
        let vertices = self.confirmed();
        scene.bind_positions(line, Dynamic::Static(vertices.clone()));

        if vertices.len() < self.min_vertex_count {
            self.clear(scene);
            self.deactivate(scene);
            debug!(%id, points = vertices.len(), "drawing discarded");
            return DrawOutcome::Discarded {
                id,
                points: vertices.len(),
            };
        }

        self.index = 0;
        let markers = std::mem::take(&mut self.markers);
        self.deactivate(scene);
        debug!(%id, vertices = vertices.len(), "drawing committed");
        DrawOutcome::Committed(CommittedGeometry {
            id,
            line,
            markers,
            vertices,
        })
    }

    /// Stop listening. Visuals stay in the scene; only the session's
    /// references are dropped so a stray call cannot touch a finished shape.
    pub fn deactivate<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S) {
        if !self.is_collecting() {
            return;
        }
        release_all(scene, self.owner);
        self.line = None;
        self.markers.clear();
        scene.set_cursor(CursorStyle::Pointer);
        self.state = DrawState::Idle;
    }

    /// Remove the in-progress line and markers, restarting the vertex
    /// sequence.
    pub fn clear<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S) {
        if let Some(line) = self.line.take() {
            scene.remove_entity(line);
        }
        for marker in self.markers.drain(..) {
            scene.remove_entity(marker);
        }
        self.sequence = Rc::new(RefCell::new(VertexSequence::new()));
        self.index = 0;
    }
}
