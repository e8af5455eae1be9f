//! Interactive geometry capture: pointer events in, committed geometry out.
//!
//! Sessions are plain state machines that mutate a [`SceneAdapter`]; the
//! [`Workbench`] owns the adapter and routes each pointer event to whichever
//! session currently holds that event kind on the input channel.

pub mod adapter;
pub mod config;
pub mod draw;
pub mod edit;
pub mod error;
pub mod events;
pub mod id;
pub mod measure;
pub mod region;
pub mod registry;
pub mod vertex;
pub mod workbench;

pub use adapter::SceneAdapter;
pub use config::{CaptureConfig, CaptureStyles};
pub use draw::{CommittedGeometry, DrawOutcome, DrawSession, DrawState};
pub use edit::{EditCommit, EditOutcome, EditSession, EditState};
pub use error::{CaptureError, ConfigError};
pub use events::CaptureEvent;
pub use id::{GeometryId, SessionIds};
pub use measure::{GeoReadout, polygon_centroid, shoelace_area, signed_shoelace_area};
pub use region::{Region, RegionCapture, RegionOutcome};
pub use registry::{GeometryRegistry, RegisteredGeometry};
pub use vertex::VertexSequence;
pub use workbench::{Dispatched, Inspection, Mode, Workbench};
