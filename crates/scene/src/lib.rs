pub mod hotspot;
pub mod interaction;
pub mod picking;
pub mod rotation;
pub mod solid;
pub mod tick;

pub use hotspot::*;
pub use rotation::*;
pub use solid::*;
