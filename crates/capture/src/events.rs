use foundation::math::Vec3;
use scene::entity::EntityId;

use crate::id::GeometryId;
use crate::measure::GeoReadout;

/// Notifications raised by the workbench, stamped with the frame they
/// happened in when drained from the bus.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureEvent {
    GeometryFinished {
        geometry: GeometryId,
        vertices: Vec<Vec3>,
    },
    GeometryDiscarded {
        geometry: GeometryId,
        points: usize,
    },
    GeometryDeleted {
        geometry: GeometryId,
    },
    EditPicked {
        geometry: GeometryId,
        vertex_index: usize,
    },
    EditCommitted {
        geometry: GeometryId,
        vertex_index: usize,
        vertices: Vec<Vec3>,
    },
    EditRolledBack {
        geometry: GeometryId,
        vertex_index: usize,
    },
    EditPickFailed {
        geometry: GeometryId,
    },
    RegionCommitted {
        name: String,
        count: usize,
    },
    Inspected {
        entity: Option<EntityId>,
        readout: Option<GeoReadout>,
    },
}
