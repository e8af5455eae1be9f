pub mod bounds;
pub mod geometry;
pub mod label;
pub mod style;
pub mod transform;
pub mod visibility;

pub use bounds::*;
pub use geometry::*;
pub use label::*;
pub use style::*;
pub use transform::*;
pub use visibility::*;
