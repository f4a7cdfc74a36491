use std::fmt::Write as _;

use crate::error::{InterchangeError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::scene::SolidData;

/// Serializes a solid into an ASCII `solid`/`endsolid` document.
///
/// One facet block per triangle, with the face normal recomputed from the
/// triangle itself rather than trusting the stored vertex normals.
/// Coordinates carry six fractional digits, enough for the coordinate
/// ranges this crate produces to round-trip without visible loss.
#[must_use]
pub fn encode(solid: &SolidData, name: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "solid {name}");
    for tri in &solid.indices {
        let v0 = solid.positions[tri[0] as usize];
        let v1 = solid.positions[tri[1] as usize];
        let v2 = solid.positions[tri[2] as usize];
        let n = face_normal(&v0, &v1, &v2);
        let _ = writeln!(out, "  facet normal {:.6} {:.6} {:.6}", n.x, n.y, n.z);
        let _ = writeln!(out, "    outer loop");
        for v in [v0, v1, v2] {
            let _ = writeln!(out, "      vertex {:.6} {:.6} {:.6}", v.x, v.y, v.z);
        }
        let _ = writeln!(out, "    endloop");
        let _ = writeln!(out, "  endfacet");
    }
    let _ = writeln!(out, "endsolid {name}");
    out
}

/// Parses an ASCII solid document back into mesh buffers.
///
/// The scan is line oriented and deliberately tolerant: stated normals,
/// loop markers, the trailing `endsolid`, blank lines, and any amount of
/// indentation are all accepted or ignored. It stays strict where sloppy
/// input would corrupt geometry silently: the document must lead with a
/// `solid` header, a vertex line must carry exactly three coordinates,
/// and a facet must close over exactly three vertices. Vertex normals on
/// the returned mesh are recomputed from the parsed triangles.
///
/// # Errors
///
/// [`InterchangeError::MissingHeader`], [`InterchangeError::MalformedVertex`],
/// or [`InterchangeError::MalformedFacet`] for structural problems, and
/// [`InterchangeError::Empty`] when no facet survives.
#[allow(clippy::cast_possible_truncation)]
pub fn parse(text: &str) -> Result<SolidData> {
    let mut lines = text.lines().enumerate();
    let header = lines
        .by_ref()
        .map(|(_, raw)| raw.trim())
        .find(|line| !line.is_empty())
        .ok_or(InterchangeError::MissingHeader)?;
    if header.split_whitespace().next() != Some("solid") {
        return Err(InterchangeError::MissingHeader.into());
    }

    let mut positions: Vec<Point3> = Vec::new();
    let mut indices: Vec<[u32; 3]> = Vec::new();
    let mut pending: Vec<Point3> = Vec::new();
    let mut facet_start = 0;

    for (index, raw) in lines {
        let line = index + 1;
        let mut parts = raw.split_whitespace();
        match parts.next() {
            Some("vertex") => {
                if pending.is_empty() {
                    facet_start = line;
                }
                pending.push(parse_vertex(parts, line)?);
            }
            Some("endfacet") => {
                if pending.len() != 3 {
                    return Err(InterchangeError::MalformedFacet { line }.into());
                }
                let base = positions.len() as u32;
                positions.append(&mut pending);
                indices.push([base, base + 1, base + 2]);
            }
            _ => {}
        }
    }

    if !pending.is_empty() {
        return Err(InterchangeError::MalformedFacet { line: facet_start }.into());
    }
    if indices.is_empty() {
        return Err(InterchangeError::Empty.into());
    }
    Ok(SolidData::new(positions, indices))
}

fn face_normal(v0: &Point3, v1: &Point3, v2: &Point3) -> Vector3 {
    let face = (v1 - v0).cross(&(v2 - v0));
    let len = face.norm();
    if len > TOLERANCE {
        face / len
    } else {
        Vector3::zeros()
    }
}

fn parse_vertex<'a, I>(mut parts: I, line: usize) -> Result<Point3>
where
    I: Iterator<Item = &'a str>,
{
    let mut coords = [0.0; 3];
    for slot in &mut coords {
        let token = parts
            .next()
            .ok_or(InterchangeError::MalformedVertex { line })?;
        *slot = token
            .parse()
            .map_err(|_| InterchangeError::MalformedVertex { line })?;
    }
    if parts.next().is_some() {
        return Err(InterchangeError::MalformedVertex { line }.into());
    }
    Ok(Point3::new(coords[0], coords[1], coords[2]))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use crate::error::DecalisError;

    use super::*;

    fn quad() -> SolidData {
        SolidData::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
    }

    // ── Encoding ─────────────────────────────────────────────────────────

    #[test]
    fn encode_emits_one_facet_block_per_triangle() {
        let doc = encode(&quad(), "badge");

        assert!(doc.starts_with("solid badge\n"));
        assert!(doc.ends_with("endsolid badge\n"));
        assert_eq!(doc.matches("facet normal").count(), 2);
        assert_eq!(doc.matches("endfacet").count(), 2);
        assert_eq!(doc.matches("vertex").count(), 6);
    }

    #[test]
    fn encode_uses_six_fractional_digits() {
        let doc = encode(&quad(), "badge");

        assert!(doc.contains("  facet normal 0.000000 0.000000 1.000000"));
        assert!(doc.contains("      vertex 1.000000 1.000000 0.000000"));
    }

    // ── Parsing ──────────────────────────────────────────────────────────

    #[test]
    fn parse_round_trips_an_encoded_solid() {
        let solid = quad();
        let parsed = parse(&encode(&solid, "badge")).unwrap();

        assert_eq!(parsed.triangle_count(), 2);
        assert_eq!(parsed.positions.len(), 6);

        let original = solid.aabb().unwrap();
        let recovered = parsed.aabb().unwrap();
        assert_relative_eq!(recovered.min, original.min, epsilon = 1e-9);
        assert_relative_eq!(recovered.max, original.max, epsilon = 1e-9);
        for normal in &parsed.normals {
            assert_relative_eq!(*normal, Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-9);
        }
    }

    #[test]
    fn parse_survives_ragged_whitespace() {
        let doc = "solid scrap\n\nfacet normal 0 0 1\n outer loop\n   vertex 0 0 0\n vertex 1 0 0\n\tvertex 0 1 0\nendloop\nendfacet\nendsolid scrap\n";

        let parsed = parse(doc).unwrap();

        assert_eq!(parsed.triangle_count(), 1);
        assert_relative_eq!(parsed.positions[1], Point3::new(1.0, 0.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn missing_header_is_rejected() {
        for doc in ["", "  \n\n", "facet normal 0 0 1", "solidarity forever"] {
            match parse(doc) {
                Err(DecalisError::Interchange(InterchangeError::MissingHeader)) => {}
                other => panic!("expected missing header for {doc:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn short_vertex_line_reports_its_line_number() {
        let doc = "solid bad\n  facet normal 0 0 1\n    outer loop\n      vertex 0 0\n";

        match parse(doc) {
            Err(DecalisError::Interchange(InterchangeError::MalformedVertex { line })) => {
                assert_eq!(line, 4);
            }
            other => panic!("expected malformed vertex, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_vertex_is_rejected() {
        let doc = "solid bad\n      vertex one two three\n";

        match parse(doc) {
            Err(DecalisError::Interchange(InterchangeError::MalformedVertex { line })) => {
                assert_eq!(line, 2);
            }
            other => panic!("expected malformed vertex, got {other:?}"),
        }
    }

    #[test]
    fn facet_with_wrong_vertex_count_is_rejected() {
        let doc = "solid bad\n  facet normal 0 0 1\n    outer loop\n      vertex 0 0 0\n      vertex 1 0 0\n    endloop\n  endfacet\n";

        match parse(doc) {
            Err(DecalisError::Interchange(InterchangeError::MalformedFacet { line })) => {
                assert_eq!(line, 7);
            }
            other => panic!("expected malformed facet, got {other:?}"),
        }
    }

    #[test]
    fn truncated_trailing_facet_is_rejected() {
        let doc = "solid bad\n  facet normal 0 0 1\n    outer loop\n      vertex 0 0 0\n";

        match parse(doc) {
            Err(DecalisError::Interchange(InterchangeError::MalformedFacet { line })) => {
                assert_eq!(line, 4);
            }
            other => panic!("expected malformed facet, got {other:?}"),
        }
    }

    #[test]
    fn document_without_facets_is_rejected() {
        match parse("solid hollow\nendsolid hollow\n") {
            Err(DecalisError::Interchange(InterchangeError::Empty)) => {}
            other => panic!("expected empty document error, got {other:?}"),
        }
    }
}
