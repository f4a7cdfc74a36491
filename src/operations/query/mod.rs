mod bounding_box;
mod placement_region;

pub use bounding_box::GroupBounds;
pub use placement_region::PlacementRegion;
