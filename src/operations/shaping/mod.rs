mod extrude;

pub use extrude::{BevelParams, ExtrudeSettings, ExtrudeShape};
