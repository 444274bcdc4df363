//! Report rendering and publication.

pub mod generator;
pub mod sink;

pub use generator::*;
pub use sink::*;
