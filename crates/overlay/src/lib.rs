pub mod labels;

pub use labels::*;
