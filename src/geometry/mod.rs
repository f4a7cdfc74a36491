pub mod contour;
pub mod path;
pub mod sampler;
pub mod shape;

pub use contour::{Contour, ContourRole, Winding};
pub use path::split_contours;
pub use sampler::{sample_contour, SamplerSettings};
pub use shape::{build_shapes, Shape};
