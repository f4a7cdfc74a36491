pub mod error;
pub mod geometry;
pub mod interchange;
pub mod math;
pub mod operations;
pub mod placement;
pub mod scene;

pub use error::{DecalisError, Result};
