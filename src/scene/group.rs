use slotmap::new_key_type;

use super::SolidId;
use crate::math::Matrix4;

new_key_type! {
    /// Unique identifier for an artwork group in the scene store.
    pub struct GroupId;
}

/// Stable identity of a source artwork, usable as a cache key.
///
/// Derived from the artwork name with everything outside
/// `[A-Za-z0-9_-]` folded to `_`, so the same artwork always maps to
/// the same key regardless of scene state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtworkKey(String);

impl ArtworkKey {
    /// Sanitizes an artwork name into a key.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let cleaned = name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        Self(cleaned)
    }

    /// The sanitized key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A converted artwork: the solids produced by one conversion pass
/// plus the transform that places them in the scene.
///
/// Groups are replaced wholesale on re-conversion and never partially
/// mutated; the transform is always rebuilt from the solids' canonical
/// (untransformed) state.
#[derive(Debug, Clone)]
pub struct GroupData {
    /// Solids belonging to this artwork, one per closed shape.
    pub solids: Vec<SolidId>,
    /// Placement transform applied to every solid in the group.
    pub transform: Matrix4,
    /// Display color, linear RGB.
    pub color: [f32; 3],
    /// Identity of the source artwork.
    pub key: ArtworkKey,
}

impl GroupData {
    /// Creates an empty group with an identity transform.
    #[must_use]
    pub fn new(key: ArtworkKey) -> Self {
        Self {
            solids: Vec::new(),
            transform: Matrix4::identity(),
            color: [1.0, 1.0, 1.0],
            key,
        }
    }
}
