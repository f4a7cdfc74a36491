mod ascii;

pub use ascii::{encode, parse};

use crate::error::{InterchangeError, Result};
use crate::scene::SolidData;

/// External mesh collaborator reached through the ASCII interchange format.
///
/// An implementation receives one encoded document and answers with
/// another, typically after repairing the mesh or running a boolean
/// against it. The core makes no assumption about what the service
/// guarantees: a failure message is carried verbatim into
/// [`InterchangeError::Service`] and never retried.
pub trait MeshService {
    /// Processes one interchange document and returns the replacement.
    ///
    /// # Errors
    ///
    /// A plain-text reason when the service cannot produce a result.
    fn process(&mut self, document: &str) -> std::result::Result<String, String>;
}

/// Encodes `solid`, hands it to `service`, and parses the response.
///
/// Vertex normals on the returned mesh are freshly recomputed by the
/// parser, so the service only has to answer with positions.
///
/// # Errors
///
/// [`InterchangeError::Service`] when the collaborator fails, or any
/// [`parse`] error when the response is not a valid document.
pub fn round_trip<S>(service: &mut S, solid: &SolidData, name: &str) -> Result<SolidData>
where
    S: MeshService + ?Sized,
{
    let document = encode(solid, name);
    let response = service
        .process(&document)
        .map_err(InterchangeError::Service)?;
    parse(&response)
}
