//! Scripted replays of pointer input against the headless scene.

use std::path::{Path, PathBuf};

use capture::{
    CaptureConfig, CaptureError, CaptureEvent, ConfigError, GeoReadout, GeometryId, Workbench,
};
use foundation::math::{Vec2, Vec3};
use scene::Scene;
use scene::camera::Camera;
use scene::input::PointerEvent;
use scene::surface::Surface;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse script: {0}")]
    Script(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("bad point {0:?}: expected x,y or x,y,z")]
    BadPoint(String),
}

/// Map surface the replay runs on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceKind {
    /// Flat map, one world unit (and one degree) per pixel.
    #[default]
    Plane,
    /// WGS84 ellipsoid seen from above.
    Globe,
}

/// Nadir view used when replaying on the globe.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeView {
    pub origin_lon_deg: f64,
    pub origin_lat_deg: f64,
    pub deg_per_px: f64,
    pub height_m: f64,
}

impl Default for GlobeView {
    fn default() -> Self {
        Self {
            origin_lon_deg: 0.0,
            origin_lat_deg: 0.0,
            deg_per_px: 0.01,
            height_m: 1_000_000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    ActivateDraw,
    DeactivateDraw,
    ClearDraw,
    ActivateEdit,
    DeactivateEdit,
    StartRegion,
    CancelRegion,
    Click { x: f64, y: f64 },
    RightClick { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Delete { geometry: GeometryId },
    SetRegionsVisible { visible: bool },
    Frame,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Script {
    pub surface: Option<SurfaceKind>,
    pub globe: GlobeView,
    pub steps: Vec<Step>,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self, ToolError> {
        let text = std::fs::read_to_string(path).map_err(|source| ToolError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeometryReport {
    pub id: GeometryId,
    pub vertices: Vec<[f64; 3]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionReport {
    pub name: String,
    pub area: f64,
    pub positions: Vec<GeoReadout>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    pub frame: u64,
    pub event: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<GeometryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertex_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertices: Option<Vec<[f64; 3]>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReplayReport {
    pub geometries: Vec<GeometryReport>,
    pub regions: Vec<RegionReport>,
    pub events: Vec<EventRecord>,
    /// Recoverable failures, one line per failed step.
    pub errors: Vec<String>,
}

/// Run every step of `script` and report what ended up committed.
pub fn replay(script: &Script, config: CaptureConfig, surface: SurfaceKind) -> ReplayReport {
    let scene = match surface {
        SurfaceKind::Plane => Scene::planar(),
        SurfaceKind::Globe => Scene::new(
            Camera::Globe {
                origin_lon_deg: script.globe.origin_lon_deg,
                origin_lat_deg: script.globe.origin_lat_deg,
                deg_per_px: script.globe.deg_per_px,
                height_m: script.globe.height_m,
            },
            Surface::Wgs84,
        ),
    };
    let mut bench = Workbench::new(scene, config);
    let mut report = ReplayReport::default();

    for (index, step) in script.steps.iter().enumerate() {
        if let Err(err) = apply(&mut bench, step) {
            warn!(step = index, %err, "step failed");
            report.errors.push(format!("step {index}: {err}"));
        }
    }

    for event in bench.drain_events() {
        report.events.push(record(event.frame_index, event.payload));
    }

    let scene = bench.scene();
    for id in bench.registry().ids() {
        let Some(entry) = bench.registry().get(id) else {
            continue;
        };
        let vertices = scene.world().sample_vertices(entry.line).unwrap_or_default();
        report.geometries.push(GeometryReport {
            id,
            vertices: vertices.into_iter().map(Vec3::as_array).collect(),
        });
    }

    for (index, region) in bench.region().regions().iter().enumerate() {
        let (Ok(area), Ok(positions)) = (bench.region_area(index), bench.region_positions(index))
        else {
            continue;
        };
        report.regions.push(RegionReport {
            name: region.name.clone(),
            area,
            positions,
        });
    }

    info!(
        geometries = report.geometries.len(),
        regions = report.regions.len(),
        "replay finished"
    );
    report
}

fn apply(bench: &mut Workbench<Scene>, step: &Step) -> Result<(), CaptureError> {
    match *step {
        Step::ActivateDraw => bench.activate_draw(),
        Step::DeactivateDraw => bench.deactivate_draw(),
        Step::ClearDraw => bench.clear_draw(),
        Step::ActivateEdit => bench.activate_edit(),
        Step::DeactivateEdit => bench.deactivate_edit(),
        Step::StartRegion => bench.start_region(),
        Step::CancelRegion => bench.cancel_region(),
        Step::Click { x, y } => {
            bench.dispatch(PointerEvent::primary(x, y))?;
        }
        Step::RightClick { x, y } => {
            bench.dispatch(PointerEvent::secondary(x, y))?;
        }
        Step::Move { x, y } => {
            bench.dispatch(PointerEvent::moved(x, y))?;
        }
        Step::Delete { geometry } => bench.delete_geometry(geometry)?,
        Step::SetRegionsVisible { visible } => bench.set_regions_visible(visible),
        Step::Frame => {
            bench.render_frame();
        }
    }
    Ok(())
}

fn record(frame: u64, event: CaptureEvent) -> EventRecord {
    let base = |event: &'static str| EventRecord {
        frame,
        event,
        geometry: None,
        vertex_index: None,
        vertices: None,
        detail: None,
    };
    let flat = |v: Vec<Vec3>| Some(v.into_iter().map(Vec3::as_array).collect());

    match event {
        CaptureEvent::GeometryFinished { geometry, vertices } => EventRecord {
            geometry: Some(geometry),
            vertices: flat(vertices),
            ..base("geometry_finished")
        },
        CaptureEvent::GeometryDiscarded { geometry, points } => EventRecord {
            geometry: Some(geometry),
            detail: Some(format!("{points} point(s)")),
            ..base("geometry_discarded")
        },
        CaptureEvent::GeometryDeleted { geometry } => EventRecord {
            geometry: Some(geometry),
            ..base("geometry_deleted")
        },
        CaptureEvent::EditPicked {
            geometry,
            vertex_index,
        } => EventRecord {
            geometry: Some(geometry),
            vertex_index: Some(vertex_index),
            ..base("edit_picked")
        },
        CaptureEvent::EditCommitted {
            geometry,
            vertex_index,
            vertices,
        } => EventRecord {
            geometry: Some(geometry),
            vertex_index: Some(vertex_index),
            vertices: flat(vertices),
            ..base("edit_committed")
        },
        CaptureEvent::EditRolledBack {
            geometry,
            vertex_index,
        } => EventRecord {
            geometry: Some(geometry),
            vertex_index: Some(vertex_index),
            ..base("edit_rolled_back")
        },
        CaptureEvent::EditPickFailed { geometry } => EventRecord {
            geometry: Some(geometry),
            ..base("edit_pick_failed")
        },
        CaptureEvent::RegionCommitted { name, count } => EventRecord {
            detail: Some(format!("{name} ({count} total)")),
            ..base("region_committed")
        },
        CaptureEvent::Inspected { entity, readout } => EventRecord {
            detail: Some(match (entity, readout) {
                (Some(e), Some(r)) => format!("entity {e} at {}, {}", r.lon, r.lat),
                (None, Some(r)) => format!("{}, {} ({} km)", r.lon, r.lat, r.alt_km),
                (Some(e), None) => format!("entity {e}"),
                (None, None) => "off the map".to_string(),
            }),
            ..base("inspected")
        },
    }
}

/// Parse `"x,y x,y ..."` (or `x,y,z`) into points.
pub fn parse_points(text: &str) -> Result<Vec<Vec3>, ToolError> {
    text.split(|c: char| c.is_whitespace() || c == ';')
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| {
            let parts: Result<Vec<f64>, _> = chunk.split(',').map(|p| p.trim().parse()).collect();
            match parts.as_deref() {
                Ok([x, y]) => Ok(Vec3::new(*x, *y, 0.0)),
                Ok([x, y, z]) => Ok(Vec3::new(*x, *y, *z)),
                _ => Err(ToolError::BadPoint(chunk.to_string())),
            }
        })
        .collect()
}

/// Area report for the `area` subcommand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaReport {
    pub points: usize,
    pub signed_area: f64,
    pub area: f64,
    pub centroid: Option<[f64; 2]>,
}

pub fn area_report(points: &[Vec3]) -> AreaReport {
    let ring: Vec<Vec2> = points.iter().map(|p| p.xy()).collect();
    AreaReport {
        points: points.len(),
        signed_area: capture::signed_shoelace_area(points),
        area: capture::shoelace_area(points),
        centroid: capture::polygon_centroid(&ring).map(|c| [c.x, c.y]),
    }
}

#[cfg(test)]
mod tests {
    use super::{Script, Step, SurfaceKind, ToolError, area_report, parse_points, replay};
    use capture::{CaptureConfig, GeometryId};
    use foundation::math::Vec3;
    use pretty_assertions::assert_eq;

    #[test]
    fn script_steps_use_action_tags() {
        let script: Script = serde_json::from_str(
            r#"{ "steps": [
                { "action": "activate_draw" },
                { "action": "click", "x": 1, "y": 2 },
                { "action": "delete", "geometry": 17 }
            ] }"#,
        )
        .unwrap();
        assert_eq!(
            script.steps,
            vec![
                Step::ActivateDraw,
                Step::Click { x: 1.0, y: 2.0 },
                Step::Delete {
                    geometry: GeometryId(17)
                },
            ]
        );
        assert_eq!(script.surface, None);
    }

    #[test]
    fn replay_reports_committed_lines_and_regions() {
        let script = Script {
            steps: vec![
                Step::ActivateDraw,
                Step::Click { x: 0.0, y: 0.0 },
                Step::Move { x: 5.0, y: 5.0 },
                Step::Click { x: 10.0, y: 0.0 },
                Step::RightClick { x: 0.0, y: 0.0 },
                Step::StartRegion,
                Step::Click { x: 0.0, y: 0.0 },
                Step::Click { x: 10.0, y: 0.0 },
                Step::Click { x: 10.0, y: 10.0 },
                Step::RightClick { x: 0.0, y: 0.0 },
                Step::Frame,
            ],
            ..Script::default()
        };
        let report = replay(&script, CaptureConfig::default(), SurfaceKind::Plane);

        assert_eq!(report.geometries.len(), 1);
        assert_eq!(
            report.geometries[0].vertices,
            vec![[0.0, 0.0, 0.0], [10.0, 0.0, 0.0]]
        );
        assert_eq!(report.regions.len(), 1);
        assert_eq!(report.regions[0].name, "Region 1");
        assert!((report.regions[0].area - 50.0).abs() < 1e-9);
        assert!(report.errors.is_empty());
        let kinds: Vec<&str> = report.events.iter().map(|e| e.event).collect();
        assert_eq!(kinds, vec!["geometry_finished", "region_committed"]);
    }

    #[test]
    fn failed_steps_are_collected_not_fatal() {
        let script = Script {
            steps: vec![Step::Delete {
                geometry: GeometryId(1),
            }],
            ..Script::default()
        };
        let report = replay(&script, CaptureConfig::default(), SurfaceKind::Plane);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("step 0:"));
    }

    #[test]
    fn globe_replay_commits_on_the_ellipsoid() {
        let script = Script {
            steps: vec![
                Step::ActivateDraw,
                Step::Click { x: 0.0, y: 0.0 },
                Step::Click { x: 100.0, y: 0.0 },
                Step::RightClick { x: 0.0, y: 0.0 },
            ],
            ..Script::default()
        };
        let report = replay(&script, CaptureConfig::default(), SurfaceKind::Globe);
        assert_eq!(report.geometries.len(), 1);
        let first = Vec3::from(report.geometries[0].vertices[0]);
        assert!((first.length() - foundation::math::WGS84_A).abs() < 1.0);
    }

    #[test]
    fn points_parse_and_measure() {
        let pts = parse_points("0,0 1,0; 1,1 0,1").unwrap();
        assert_eq!(pts.len(), 4);
        let report = area_report(&pts);
        assert_eq!(report.area, 1.0);
        assert_eq!(report.signed_area, 1.0);
        assert_eq!(report.centroid, Some([0.5, 0.5]));

        assert!(matches!(parse_points("0,0 1"), Err(ToolError::BadPoint(_))));
    }
}
