mod convert_artwork;

pub use convert_artwork::{ConvertArtwork, ConvertOptions};
