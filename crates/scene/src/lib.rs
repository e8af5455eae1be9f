pub mod camera;
pub mod components;
pub mod dynamic;
pub mod entity;
pub mod host;
pub mod input;
pub mod picking;
pub mod surface;
pub mod world;

pub use host::*;
pub use world::*;
