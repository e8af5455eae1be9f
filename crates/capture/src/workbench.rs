use runtime::{Event, EventBus, Frame};
use scene::entity::EntityId;
use scene::input::{InputKind, InputOwner, PointerEvent};
use tracing::debug;

use crate::adapter::SceneAdapter;
use crate::config::CaptureConfig;
use crate::draw::{DrawOutcome, DrawSession};
use crate::edit::{EditOutcome, EditSession, EditState};
use crate::error::CaptureError;
use crate::events::CaptureEvent;
use crate::id::{GeometryId, SessionIds};
use crate::measure::GeoReadout;
use crate::region::{RegionCapture, RegionOutcome};
use crate::registry::{GeometryRegistry, RegisteredGeometry};

/// Which capture mode currently holds the input channel.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mode {
    Inspect,
    Draw,
    Edit,
    Region,
}

/// Result of the default click binding: what was under the cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct Inspection {
    pub entity: Option<EntityId>,
    pub readout: Option<GeoReadout>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Dispatched {
    /// Nobody listens to this event kind right now.
    Unbound,
    Inspect(Inspection),
    Draw(DrawOutcome),
    Edit(EditOutcome),
    Region(RegionOutcome),
}

/// Owns the scene and every capture session.
///
/// The scene has a single input channel, so at most one mode listens at a
/// time. Starting a mode shuts the others down first, and whenever the
/// primary click is left unbound the inspect binding takes it back.
pub struct Workbench<S: SceneAdapter> {
    scene: S,
    config: CaptureConfig,
    frame: Frame,
    events: EventBus<CaptureEvent>,
    registry: GeometryRegistry,
    draw: DrawSession,
    edit: EditSession,
    region: RegionCapture,
    inspect_owner: InputOwner,
}

impl<S: SceneAdapter> Workbench<S> {
    pub fn new(scene: S, config: CaptureConfig) -> Self {
        Self::with_session_ids(scene, config, SessionIds::new())
    }

    pub fn with_session_ids(mut scene: S, config: CaptureConfig, ids: SessionIds) -> Self {
        let inspect_owner = scene.allocate_input_owner();
        let draw = DrawSession::new(scene.allocate_input_owner(), &config, ids);
        let edit = EditSession::new(scene.allocate_input_owner());
        let region = RegionCapture::new(scene.allocate_input_owner(), &config);
        scene.set_input_action(InputKind::PrimaryClick, inspect_owner);

        Self {
            scene,
            config,
            frame: Frame::first(),
            events: EventBus::new(),
            registry: GeometryRegistry::new(),
            draw,
            edit,
            region,
            inspect_owner,
        }
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    pub fn registry(&self) -> &GeometryRegistry {
        &self.registry
    }

    pub fn draw(&self) -> &DrawSession {
        &self.draw
    }

    pub fn edit(&self) -> &EditSession {
        &self.edit
    }

    pub fn region(&self) -> &RegionCapture {
        &self.region
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn mode(&self) -> Mode {
        if self.draw.is_collecting() {
            Mode::Draw
        } else if self.edit.state() != EditState::Inactive {
            Mode::Edit
        } else if self.region.is_capturing() {
            Mode::Region
        } else {
            Mode::Inspect
        }
    }

    /// Start a fresh drawing. One already in progress is discarded.
    pub fn activate_draw(&mut self) {
        self.abandon_draw();
        self.stop_edit();
        self.region.cancel(&mut self.scene);
        self.draw.activate(&mut self.scene);
    }

    pub fn deactivate_draw(&mut self) {
        self.draw.deactivate(&mut self.scene);
        self.restore_inspect();
    }

    pub fn clear_draw(&mut self) {
        self.draw.clear(&mut self.scene);
    }

    pub fn activate_edit(&mut self) {
        self.abandon_draw();
        self.region.cancel(&mut self.scene);
        let outcome = self.edit.activate(&mut self.scene);
        self.record_edit(&outcome);
    }

    pub fn deactivate_edit(&mut self) {
        self.stop_edit();
        self.restore_inspect();
    }

    pub fn start_region(&mut self) {
        self.abandon_draw();
        self.stop_edit();
        self.region.start(&mut self.scene);
    }

    pub fn cancel_region(&mut self) {
        self.region.cancel(&mut self.scene);
        self.restore_inspect();
    }

    /// Route one pointer event to whoever owns its kind.
    pub fn dispatch(&mut self, event: PointerEvent) -> Result<Dispatched, CaptureError> {
        let result = self.route(event);
        self.restore_inspect();
        result
    }

    /// Remove a committed geometry with its line and markers.
    pub fn delete_geometry(&mut self, id: GeometryId) -> Result<(), CaptureError> {
        let entry = self.registry.remove(id)?;
        self.edit.forget(id);
        self.scene.remove_entity(entry.line);
        for marker in entry.markers {
            self.scene.remove_entity(marker);
        }
        debug!(geometry = %id, "geometry deleted");
        self.emit(CaptureEvent::GeometryDeleted { geometry: id });
        Ok(())
    }

    pub fn region_positions(&self, index: usize) -> Result<Vec<GeoReadout>, CaptureError> {
        self.region.region_positions(&self.scene, index)
    }

    pub fn region_area(&self, index: usize) -> Result<f64, CaptureError> {
        self.region.region_area(&self.scene, index)
    }

    pub fn set_regions_visible(&mut self, visible: bool) {
        self.region.set_regions_visible(&mut self.scene, visible);
    }

    /// Sample the scene for the current frame, then advance to the next one.
    pub fn render_frame(&mut self) -> S::Snapshot {
        let snapshot = self.scene.sample_frame();
        self.frame = self.frame.next();
        snapshot
    }

    pub fn events(&self) -> &[Event<CaptureEvent>] {
        self.events.events()
    }

    pub fn drain_events(&mut self) -> Vec<Event<CaptureEvent>> {
        self.events.drain()
    }

    fn route(&mut self, event: PointerEvent) -> Result<Dispatched, CaptureError> {
        let Some(owner) = self.scene.input_owner(event.kind) else {
            return Ok(Dispatched::Unbound);
        };

        if owner == self.draw.owner() {
            let outcome = self.draw.handle(&mut self.scene, event);
            match &outcome {
                DrawOutcome::Committed(done) => {
                    self.registry.insert(
                        done.id,
                        RegisteredGeometry {
                            line: done.line,
                            markers: done.markers.clone(),
                        },
                    )?;
                    self.emit(CaptureEvent::GeometryFinished {
                        geometry: done.id,
                        vertices: done.vertices.clone(),
                    });
                }
                DrawOutcome::Discarded { id, points } => {
                    self.emit(CaptureEvent::GeometryDiscarded {
                        geometry: *id,
                        points: *points,
                    });
                }
                _ => {}
            }
            return Ok(Dispatched::Draw(outcome));
        }

        if owner == self.edit.owner() {
            return match self.edit.handle(&mut self.scene, &self.registry, event) {
                Ok(outcome) => {
                    self.record_edit(&outcome);
                    Ok(Dispatched::Edit(outcome))
                }
                Err(err) => {
                    if let Some(commit) = self.edit.take_settled() {
                        self.record_edit(&EditOutcome::Committed(commit));
                    }
                    if let CaptureError::VertexNotFound { geometry } = err {
                        self.emit(CaptureEvent::EditPickFailed { geometry });
                    }
                    Err(err)
                }
            };
        }

        if owner == self.region.owner() {
            let outcome = self.region.handle(&mut self.scene, event)?;
            if let RegionOutcome::Committed { name, count, .. } = &outcome {
                self.emit(CaptureEvent::RegionCommitted {
                    name: name.clone(),
                    count: *count,
                });
            }
            return Ok(Dispatched::Region(outcome));
        }

        if owner == self.inspect_owner && event.kind == InputKind::PrimaryClick {
            return Ok(Dispatched::Inspect(self.inspect(event)));
        }

        Ok(Dispatched::Unbound)
    }

    fn inspect(&mut self, event: PointerEvent) -> Inspection {
        let entity = self.scene.pick_entity(event.position).map(|hit| hit.entity);
        let readout = self
            .scene
            .pick_geographic(event.position)
            .map(|geo| GeoReadout::new(geo, self.scene.camera_height()));
        debug!(?entity, ?readout, "inspect");
        self.emit(CaptureEvent::Inspected { entity, readout });
        Inspection { entity, readout }
    }

    fn record_edit(&mut self, outcome: &EditOutcome) {
        match outcome {
            EditOutcome::Picked {
                geometry,
                vertex_index,
                recommitted,
            } => {
                if let Some(commit) = recommitted {
                    self.emit(CaptureEvent::EditCommitted {
                        geometry: commit.geometry,
                        vertex_index: commit.vertex_index,
                        vertices: commit.vertices.clone(),
                    });
                }
                self.emit(CaptureEvent::EditPicked {
                    geometry: *geometry,
                    vertex_index: *vertex_index,
                });
            }
            EditOutcome::Committed(commit) => {
                self.emit(CaptureEvent::EditCommitted {
                    geometry: commit.geometry,
                    vertex_index: commit.vertex_index,
                    vertices: commit.vertices.clone(),
                });
            }
            EditOutcome::RolledBack {
                geometry,
                vertex_index,
            } => {
                self.emit(CaptureEvent::EditRolledBack {
                    geometry: *geometry,
                    vertex_index: *vertex_index,
                });
            }
            EditOutcome::Ignored | EditOutcome::Moved { .. } | EditOutcome::Deactivated => {}
        }
    }

    fn stop_edit(&mut self) {
        let outcome = self.edit.deactivate(&mut self.scene);
        self.record_edit(&outcome);
    }

    /// Drop a drawing in progress, visuals included.
    fn abandon_draw(&mut self) {
        if !self.draw.is_collecting() {
            return;
        }
        let points = self.draw.confirmed().len();
        self.draw.clear(&mut self.scene);
        self.draw.deactivate(&mut self.scene);
        if points > 0
            && let Some(id) = self.draw.id()
        {
            self.emit(CaptureEvent::GeometryDiscarded {
                geometry: id,
                points,
            });
        }
    }

    fn restore_inspect(&mut self) {
        if self.scene.input_owner(InputKind::PrimaryClick).is_none() {
            self.scene
                .set_input_action(InputKind::PrimaryClick, self.inspect_owner);
        }
    }

    fn emit(&mut self, event: CaptureEvent) {
        self.events.emit(self.frame, event);
    }
}

#[cfg(test)]
mod tests {
    use super::{Dispatched, Mode, Workbench};
    use crate::adapter::SceneAdapter;
    use crate::config::CaptureConfig;
    use crate::draw::DrawOutcome;
    use crate::edit::EditState;
    use crate::error::CaptureError;
    use crate::events::CaptureEvent;
    use crate::id::{GeometryId, SessionIds};
    use crate::region::RegionOutcome;
    use foundation::math::Vec3;
    use pretty_assertions::assert_eq;
    use scene::Scene;
    use scene::input::{InputKind, PointerEvent};

    fn bench() -> Workbench<Scene> {
        Workbench::with_session_ids(
            Scene::planar(),
            CaptureConfig::default(),
            SessionIds::with_clock(|| 5_000),
        )
    }

    fn draw(bench: &mut Workbench<Scene>, clicks: &[(f64, f64)]) -> Dispatched {
        bench.activate_draw();
        for &(x, y) in clicks {
            bench.dispatch(PointerEvent::primary(x, y)).unwrap();
            bench.dispatch(PointerEvent::moved(x + 1.0, y + 1.0)).unwrap();
        }
        bench.dispatch(PointerEvent::secondary(0.0, 0.0)).unwrap()
    }

    fn payloads(bench: &mut Workbench<Scene>) -> Vec<CaptureEvent> {
        bench.drain_events().into_iter().map(|e| e.payload).collect()
    }

    #[test]
    fn committed_drawing_is_registered_and_announced() {
        let mut bench = bench();
        let outcome = draw(&mut bench, &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        assert!(matches!(outcome, Dispatched::Draw(DrawOutcome::Committed(_))));

        let vertices = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(10.0, 10.0, 0.0),
        ];
        assert_eq!(
            payloads(&mut bench),
            vec![CaptureEvent::GeometryFinished {
                geometry: GeometryId(5_000),
                vertices,
            }]
        );
        assert_eq!(bench.registry().len(), 1);
        assert_eq!(bench.registry().get(GeometryId(5_000)).unwrap().markers.len(), 3);
        assert_eq!(bench.mode(), Mode::Inspect);
    }

    #[test]
    fn single_click_leaves_nothing_behind() {
        let mut bench = bench();
        let outcome = draw(&mut bench, &[(5.0, 5.0)]);
        assert!(matches!(
            outcome,
            Dispatched::Draw(DrawOutcome::Discarded { points: 1, .. })
        ));
        assert!(bench.registry().is_empty());
        assert!(bench.scene().world().is_empty());
        assert_eq!(bench.mode(), Mode::Inspect);
    }

    #[test]
    fn modes_exclude_each_other() {
        let mut bench = bench();
        bench.activate_draw();
        bench.dispatch(PointerEvent::primary(1.0, 1.0)).unwrap();
        assert_eq!(bench.mode(), Mode::Draw);

        bench.activate_edit();
        assert_eq!(bench.mode(), Mode::Edit);
        assert!(!bench.draw().is_collecting());
        assert!(bench.scene().world().is_empty());
        assert_eq!(
            bench.scene().input_owner(InputKind::PrimaryClick),
            Some(bench.edit().owner())
        );

        bench.start_region();
        assert_eq!(bench.mode(), Mode::Region);
        assert_eq!(bench.edit().state(), EditState::Inactive);

        bench.cancel_region();
        assert_eq!(bench.mode(), Mode::Inspect);
        assert!(matches!(
            bench.dispatch(PointerEvent::moved(0.0, 0.0)),
            Ok(Dispatched::Unbound)
        ));
    }

    #[test]
    fn edit_cycle_through_dispatch() {
        let mut bench = bench();
        draw(&mut bench, &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        bench.drain_events();

        bench.activate_edit();
        bench.dispatch(PointerEvent::primary(10.0, 10.0)).unwrap();
        bench.dispatch(PointerEvent::moved(12.0, 14.0)).unwrap();
        bench.dispatch(PointerEvent::secondary(0.0, 0.0)).unwrap();

        let events = payloads(&mut bench);
        assert_eq!(
            events,
            vec![
                CaptureEvent::EditPicked {
                    geometry: GeometryId(5_000),
                    vertex_index: 2,
                },
                CaptureEvent::EditCommitted {
                    geometry: GeometryId(5_000),
                    vertex_index: 2,
                    vertices: vec![
                        Vec3::new(0.0, 0.0, 0.0),
                        Vec3::new(10.0, 0.0, 0.0),
                        Vec3::new(12.0, 14.0, 0.0),
                    ],
                },
            ]
        );
        assert_eq!(bench.edit().state(), EditState::Armed);
    }

    #[test]
    fn failed_repick_reports_the_settled_drag_first() {
        let mut bench = bench();
        draw(&mut bench, &[(0.0, 0.0), (10.0, 0.0)]);
        let marker = bench.registry().get(GeometryId(5_000)).unwrap().markers[1];
        bench.activate_edit();
        bench.dispatch(PointerEvent::primary(0.0, 0.0)).unwrap();
        bench.dispatch(PointerEvent::moved(3.0, 4.0)).unwrap();
        bench
            .scene_mut()
            .set_entity_position(marker, Vec3::new(-20.0, -20.0, 0.0));
        bench.drain_events();

        bench.dispatch(PointerEvent::primary(-20.0, -20.0)).unwrap_err();
        assert_eq!(
            payloads(&mut bench),
            vec![
                CaptureEvent::EditCommitted {
                    geometry: GeometryId(5_000),
                    vertex_index: 0,
                    vertices: vec![Vec3::new(3.0, 4.0, 0.0), Vec3::new(10.0, 0.0, 0.0)],
                },
                CaptureEvent::EditPickFailed {
                    geometry: GeometryId(5_000)
                },
            ]
        );
        assert_eq!(bench.edit().state(), EditState::Armed);
    }

    #[test]
    fn reactivating_draw_discards_the_drawing_in_progress() {
        let mut bench = bench();
        bench.activate_draw();
        bench.dispatch(PointerEvent::primary(1.0, 1.0)).unwrap();
        bench.drain_events();

        bench.activate_draw();
        assert_eq!(
            payloads(&mut bench),
            vec![CaptureEvent::GeometryDiscarded {
                geometry: GeometryId(5_000),
                points: 1,
            }]
        );
        assert!(bench.scene().world().is_empty());
        assert!(bench.draw().is_collecting());
        assert!(bench.draw().confirmed().is_empty());
    }

    #[test]
    fn failed_edit_pick_is_reported_and_recoverable() {
        let mut bench = bench();
        draw(&mut bench, &[(0.0, 0.0), (10.0, 0.0)]);
        let marker = bench.registry().get(GeometryId(5_000)).unwrap().markers[0];
        bench
            .scene_mut()
            .set_entity_position(marker, Vec3::new(-20.0, -20.0, 0.0));
        bench.drain_events();

        bench.activate_edit();
        let err = bench.dispatch(PointerEvent::primary(-20.0, -20.0)).unwrap_err();
        assert_eq!(
            err,
            CaptureError::VertexNotFound {
                geometry: GeometryId(5_000)
            }
        );
        assert_eq!(
            payloads(&mut bench),
            vec![CaptureEvent::EditPickFailed {
                geometry: GeometryId(5_000)
            }]
        );
        assert_eq!(bench.edit().state(), EditState::Armed);
    }

    #[test]
    fn switching_away_mid_drag_rolls_back() {
        let mut bench = bench();
        draw(&mut bench, &[(0.0, 0.0), (10.0, 0.0)]);
        let line = bench.registry().get(GeometryId(5_000)).unwrap().line;
        bench.activate_edit();
        bench.dispatch(PointerEvent::primary(0.0, 0.0)).unwrap();
        bench.dispatch(PointerEvent::moved(3.0, 3.0)).unwrap();
        bench.drain_events();

        bench.activate_draw();
        assert_eq!(
            payloads(&mut bench),
            vec![CaptureEvent::EditRolledBack {
                geometry: GeometryId(5_000),
                vertex_index: 0,
            }]
        );
        assert_eq!(
            bench.scene().positions(line).unwrap()[0],
            Vec3::new(0.0, 0.0, 0.0)
        );
    }

    #[test]
    fn delete_removes_every_owned_entity() {
        let mut bench = bench();
        draw(&mut bench, &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        assert_eq!(bench.scene().world().len(), 4);

        bench.delete_geometry(GeometryId(5_000)).unwrap();
        assert!(bench.scene().world().is_empty());
        assert!(bench.registry().is_empty());
        assert_eq!(
            bench.delete_geometry(GeometryId(5_000)),
            Err(CaptureError::UnknownGeometry(GeometryId(5_000)))
        );
    }

    #[test]
    fn region_commit_bumps_the_counter_by_one() {
        let mut bench = bench();
        bench.start_region();
        for (x, y) in [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)] {
            bench.dispatch(PointerEvent::primary(x, y)).unwrap();
        }
        let before = bench.region().region_count();
        let outcome = bench.dispatch(PointerEvent::secondary(0.0, 0.0)).unwrap();
        assert!(matches!(
            outcome,
            Dispatched::Region(RegionOutcome::Committed { count: 1, .. })
        ));
        assert_eq!(bench.region().region_count(), before + 1);
        assert_eq!(bench.mode(), Mode::Inspect);
        assert!((bench.region_area(0).unwrap() - 50.0).abs() < 1e-9);
        assert!(bench.scene().input_owner(InputKind::PrimaryClick).is_some());
        assert!(payloads(&mut bench).contains(&CaptureEvent::RegionCommitted {
            name: "Region 1".to_string(),
            count: 1,
        }));
    }

    #[test]
    fn default_click_inspects_what_is_under_the_cursor() {
        let mut bench = bench();
        let Dispatched::Inspect(seen) = bench.dispatch(PointerEvent::primary(3.0, 4.0)).unwrap()
        else {
            panic!("expected inspection");
        };
        assert_eq!(seen.entity, None);
        let readout = seen.readout.unwrap();
        assert_eq!((readout.lon, readout.lat, readout.alt_km), (3.0, 4.0, 1.0));
    }

    #[test]
    fn frames_sample_live_previews_and_stamp_events() {
        let mut bench = bench();
        bench.activate_draw();
        bench.dispatch(PointerEvent::primary(0.0, 0.0)).unwrap();
        bench.dispatch(PointerEvent::moved(2.0, 0.0)).unwrap();
        let first = bench.render_frame();
        assert_eq!(first.lines[0].vertices.len(), 2);

        bench.dispatch(PointerEvent::moved(4.0, 0.0)).unwrap();
        let second = bench.render_frame();
        assert_eq!(second.lines[0].vertices[1], Vec3::new(4.0, 0.0, 0.0));

        bench.dispatch(PointerEvent::primary(6.0, 0.0)).unwrap();
        bench.dispatch(PointerEvent::secondary(0.0, 0.0)).unwrap();
        let events = bench.drain_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].frame_index, 2);
    }
}
