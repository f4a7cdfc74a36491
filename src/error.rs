use thiserror::Error;

/// Top-level error type for the Decalis kernel.
#[derive(Debug, Error)]
pub enum DecalisError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Solid(#[from] SolidError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error(transparent)]
    Interchange(#[from] InterchangeError),
}

/// Errors related to path parsing and contour classification.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("contour has {count} points, need at least 3")]
    TooFewPoints { count: usize },

    #[error("contour encloses no area")]
    ZeroArea,

    #[error("no shape survived conversion across all input paths")]
    NoShapes,
}

/// Errors related to extrusion and triangulation.
#[derive(Debug, Error)]
pub enum SolidError {
    #[error("triangulation failed: {0}")]
    Triangulation(String),

    #[error("extrusion produced an empty triangle index buffer")]
    EmptyMesh,

    #[error("degenerate solid: {0}")]
    Degenerate(String),
}

/// Errors related to the scene store.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),
}

/// Errors related to placement and fitting.
#[derive(Debug, Error)]
pub enum PlacementError {
    #[error("target has zero extent along {axis}")]
    ZeroDimension { axis: &'static str },

    #[error("no projected placement to operate on")]
    NotProjected,

    #[error("invalid placement input: {0}")]
    InvalidInput(String),
}

/// Errors related to the textual mesh interchange boundary.
#[derive(Debug, Error)]
pub enum InterchangeError {
    #[error("missing `solid` header")]
    MissingHeader,

    #[error("malformed vertex on line {line}")]
    MalformedVertex { line: usize },

    #[error("facet on line {line} does not have exactly 3 vertices")]
    MalformedFacet { line: usize },

    #[error("interchange text contains no facets")]
    Empty,

    #[error("mesh service failed: {0}")]
    Service(String),
}

/// Convenience type alias for results using [`DecalisError`].
pub type Result<T> = std::result::Result<T, DecalisError>;
