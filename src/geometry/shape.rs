use super::contour::{Contour, ContourRole};

/// One outer contour plus zero-or-more hole contours, ready for extrusion.
///
/// Orientation is enforced on construction: the outer ring ends up
/// counter-clockwise and every hole clockwise, whatever the inputs were.
#[derive(Debug, Clone)]
pub struct Shape {
    outer: Contour,
    holes: Vec<Contour>,
}

impl Shape {
    #[must_use]
    pub fn new(outer: Contour, holes: Vec<Contour>) -> Self {
        Self {
            outer: outer.into_role(ContourRole::Outer),
            holes: holes
                .into_iter()
                .map(|h| h.into_role(ContourRole::Hole))
                .collect(),
        }
    }

    #[must_use]
    pub fn outer(&self) -> &Contour {
        &self.outer
    }

    #[must_use]
    pub fn holes(&self) -> &[Contour] {
        &self.holes
    }

    /// Net enclosed area (outer minus holes). Diagnostic only.
    #[must_use]
    pub fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(Contour::area).sum();
        (self.outer.area() - holes).max(0.0)
    }
}

/// Groups sampled sub-contours into shapes by geometric nesting.
///
/// Each contour's containment depth (how many other contours enclose it)
/// decides its role: even depth starts a new shape as its outer ring, odd
/// depth becomes a hole of its immediate container. An island inside a hole
/// is therefore its own shape again, and a single path string may produce
/// several independent shapes. No textual heuristics participate.
#[must_use]
pub fn build_shapes(contours: Vec<Contour>) -> Vec<Shape> {
    if contours.is_empty() {
        return Vec::new();
    }

    let n = contours.len();
    let mut containers: Vec<Vec<usize>> = vec![Vec::new(); n];
    for i in 0..n {
        for j in 0..n {
            if i != j && contours[j].contains(&contours[i]) {
                containers[i].push(j);
            }
        }
    }
    let depths: Vec<usize> = containers.iter().map(Vec::len).collect();

    // outers keep input order; holes attach to their deepest container
    let mut shapes: Vec<(usize, Shape)> = Vec::new();
    for (i, contour) in contours.iter().enumerate() {
        if depths[i] % 2 == 0 {
            shapes.push((i, Shape::new(contour.clone(), Vec::new())));
        }
    }

    for i in 0..n {
        if depths[i] % 2 == 0 {
            continue;
        }
        let Some(&parent) = containers[i].iter().max_by_key(|&&j| depths[j]) else {
            continue;
        };
        if let Some((_, shape)) = shapes.iter_mut().find(|(idx, _)| *idx == parent) {
            shape
                .holes
                .push(contours[i].clone().into_role(ContourRole::Hole));
        }
    }

    shapes.into_iter().map(|(_, s)| s).collect()
}
