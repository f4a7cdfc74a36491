use std::iter::Peekable;

use crate::error::{GeometryError, Result};
use crate::math::{Point2, Vector2, TOLERANCE};

use super::path::tokenize;

/// Point-density settings for contour sampling.
#[derive(Debug, Clone, Copy)]
pub struct SamplerSettings {
    /// Precision knob, ≥ 1. Typical range is 1–100.
    pub precision: u32,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self { precision: 50 }
    }
}

impl SamplerSettings {
    /// Creates settings with the precision clamped to at least 1.
    #[must_use]
    pub fn new(precision: u32) -> Self {
        Self {
            precision: precision.max(1),
        }
    }

    /// Points sampled per curve command.
    ///
    /// Banded by precision with per-band floors so low-precision output is
    /// not visibly faceted and density never drops across a band seam.
    #[must_use]
    pub fn curve_divisions(&self) -> usize {
        let p = self.precision.max(1) as usize;
        if p > 100 {
            p.div_ceil(8).max(25)
        } else if p > 20 {
            p.div_ceil(4).max(10)
        } else {
            p.div_ceil(2).max(5)
        }
    }
}

/// Samples one sub-contour string into an ordered point ring.
///
/// Move/line commands emit their endpoints; curve commands are sampled at
/// [`SamplerSettings::curve_divisions`] points each. Relative commands,
/// implicit repetition, reflected control points (`S`/`T`) and elliptical
/// arcs are handled; tokens that fail to parse are skipped. The Y axis is
/// flipped on output (path space is y-down, model space is y-up), and a
/// duplicated closing point is removed: the ring is implicitly closed.
///
/// # Errors
///
/// Returns [`GeometryError::TooFewPoints`] if fewer than 3 valid points
/// survive.
pub fn sample_contour(contour: &str, settings: &SamplerSettings) -> Result<Vec<Point2>> {
    let divisions = settings.curve_divisions();
    let mut state = Sampler::new(divisions);
    let mut iter = tokenize(contour).into_iter().peekable();

    while let Some(token) = iter.next() {
        let mut chars = token.chars();
        let (Some(cmd), None) = (chars.next(), chars.next()) else {
            continue;
        };
        match cmd {
            'M' | 'm' => state.run_move(cmd == 'm', &mut iter),
            'L' | 'l' => state.run_line(cmd == 'l', &mut iter),
            'H' | 'h' => state.run_horizontal(cmd == 'h', &mut iter),
            'V' | 'v' => state.run_vertical(cmd == 'v', &mut iter),
            'C' | 'c' => state.run_cubic(cmd == 'c', &mut iter),
            'S' | 's' => state.run_smooth_cubic(cmd == 's', &mut iter),
            'Q' | 'q' => state.run_quadratic(cmd == 'q', &mut iter),
            'T' | 't' => state.run_smooth_quadratic(cmd == 't', &mut iter),
            'A' | 'a' => state.run_arc(cmd == 'a', &mut iter),
            'Z' | 'z' => break,
            // stray garbage token, skip it
            _ => {}
        }
    }

    state.finish()
}

type Tokens = Peekable<std::vec::IntoIter<String>>;

/// Pulls the next numeric argument.
///
/// Command letters end the argument list (not consumed); non-numeric garbage
/// is consumed and aborts the current command invocation.
fn next_number(iter: &mut Tokens) -> Option<f64> {
    let peeked = iter.peek()?;
    if peeked.len() == 1 && peeked.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let token = iter.next()?;
    match token.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => None,
    }
}

fn next_pair(iter: &mut Tokens) -> Option<Point2> {
    let x = next_number(iter)?;
    let y = next_number(iter)?;
    Some(Point2::new(x, y))
}

/// True while the upcoming token continues the current command's repetition.
fn more_args(iter: &mut Tokens) -> bool {
    iter.peek()
        .is_some_and(|t| !(t.len() == 1 && t.chars().all(|c| c.is_ascii_alphabetic())))
}

struct Sampler {
    points: Vec<Point2>,
    current: Point2,
    divisions: usize,
    prev_cubic_ctrl: Option<Point2>,
    prev_quad_ctrl: Option<Point2>,
}

impl Sampler {
    fn new(divisions: usize) -> Self {
        Self {
            points: Vec::new(),
            current: Point2::origin(),
            divisions,
            prev_cubic_ctrl: None,
            prev_quad_ctrl: None,
        }
    }

    fn push(&mut self, p: Point2) {
        if self
            .points
            .last()
            .is_none_or(|last| (p - last).norm() > TOLERANCE)
        {
            self.points.push(p);
        }
        self.current = p;
    }

    fn resolve(&self, rel: bool, p: Point2) -> Point2 {
        if rel {
            self.current + p.coords
        } else {
            p
        }
    }

    fn reset_ctrl(&mut self) {
        self.prev_cubic_ctrl = None;
        self.prev_quad_ctrl = None;
    }

    fn run_move(&mut self, rel: bool, iter: &mut Tokens) {
        self.reset_ctrl();
        let Some(p) = next_pair(iter) else { return };
        let target = self.resolve(rel, p);
        self.push(target);
        // subsequent pairs are implicit line commands
        self.run_line(rel, iter);
    }

    fn run_line(&mut self, rel: bool, iter: &mut Tokens) {
        self.reset_ctrl();
        while more_args(iter) {
            let Some(p) = next_pair(iter) else { return };
            let target = self.resolve(rel, p);
            self.push(target);
        }
    }

    fn run_horizontal(&mut self, rel: bool, iter: &mut Tokens) {
        self.reset_ctrl();
        while more_args(iter) {
            let Some(x) = next_number(iter) else { return };
            let x = if rel { self.current.x + x } else { x };
            self.push(Point2::new(x, self.current.y));
        }
    }

    fn run_vertical(&mut self, rel: bool, iter: &mut Tokens) {
        self.reset_ctrl();
        while more_args(iter) {
            let Some(y) = next_number(iter) else { return };
            let y = if rel { self.current.y + y } else { y };
            self.push(Point2::new(self.current.x, y));
        }
    }

    fn run_cubic(&mut self, rel: bool, iter: &mut Tokens) {
        self.prev_quad_ctrl = None;
        while more_args(iter) {
            let (Some(c1), Some(c2), Some(end)) =
                (next_pair(iter), next_pair(iter), next_pair(iter))
            else {
                return;
            };
            let c1 = self.resolve(rel, c1);
            let c2 = self.resolve(rel, c2);
            let end = self.resolve(rel, end);
            self.sample_cubic(c1, c2, end);
        }
    }

    fn run_smooth_cubic(&mut self, rel: bool, iter: &mut Tokens) {
        self.prev_quad_ctrl = None;
        while more_args(iter) {
            let (Some(c2), Some(end)) = (next_pair(iter), next_pair(iter)) else {
                return;
            };
            let c1 = self
                .prev_cubic_ctrl
                .map_or(self.current, |prev| reflect(prev, self.current));
            let c2 = self.resolve(rel, c2);
            let end = self.resolve(rel, end);
            self.sample_cubic(c1, c2, end);
        }
    }

    fn run_quadratic(&mut self, rel: bool, iter: &mut Tokens) {
        self.prev_cubic_ctrl = None;
        while more_args(iter) {
            let (Some(ctrl), Some(end)) = (next_pair(iter), next_pair(iter)) else {
                return;
            };
            let ctrl = self.resolve(rel, ctrl);
            let end = self.resolve(rel, end);
            self.sample_quadratic(ctrl, end);
        }
    }

    fn run_smooth_quadratic(&mut self, rel: bool, iter: &mut Tokens) {
        self.prev_cubic_ctrl = None;
        while more_args(iter) {
            let Some(end) = next_pair(iter) else { return };
            let ctrl = self
                .prev_quad_ctrl
                .map_or(self.current, |prev| reflect(prev, self.current));
            let end = self.resolve(rel, end);
            self.sample_quadratic(ctrl, end);
        }
    }

    fn run_arc(&mut self, rel: bool, iter: &mut Tokens) {
        self.reset_ctrl();
        while more_args(iter) {
            let (Some(rx), Some(ry), Some(rot), Some(large), Some(sweep)) = (
                next_number(iter),
                next_number(iter),
                next_number(iter),
                next_number(iter),
                next_number(iter),
            ) else {
                return;
            };
            let Some(end) = next_pair(iter) else { return };
            let end = self.resolve(rel, end);
            self.sample_arc(rx.abs(), ry.abs(), rot, large != 0.0, sweep != 0.0, end);
        }
    }

    fn sample_cubic(&mut self, c1: Point2, c2: Point2, end: Point2) {
        let start = self.current;
        for i in 1..=self.divisions {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f64 / self.divisions as f64;
            self.push(cubic_at(start, c1, c2, end, t));
        }
        self.current = end;
        self.prev_cubic_ctrl = Some(c2);
    }

    fn sample_quadratic(&mut self, ctrl: Point2, end: Point2) {
        let start = self.current;
        for i in 1..=self.divisions {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f64 / self.divisions as f64;
            self.push(quadratic_at(start, ctrl, end, t));
        }
        self.current = end;
        self.prev_quad_ctrl = Some(ctrl);
    }

    /// Samples an elliptical arc (endpoint parameterization, SVG semantics).
    #[allow(clippy::similar_names)]
    fn sample_arc(
        &mut self,
        rx: f64,
        ry: f64,
        rot_deg: f64,
        large: bool,
        sweep: bool,
        end: Point2,
    ) {
        let start = self.current;
        if rx < TOLERANCE || ry < TOLERANCE || (end - start).norm() < TOLERANCE {
            self.push(end);
            return;
        }

        let phi = rot_deg.to_radians();
        let (sin_phi, cos_phi) = phi.sin_cos();

        // transform to the ellipse-aligned frame
        let half = (start - end) * 0.5;
        let x1 = cos_phi * half.x + sin_phi * half.y;
        let y1 = -sin_phi * half.x + cos_phi * half.y;

        // scale radii up if the endpoints cannot be connected otherwise
        let mut rx = rx;
        let mut ry = ry;
        let lambda = (x1 * x1) / (rx * rx) + (y1 * y1) / (ry * ry);
        if lambda > 1.0 {
            let s = lambda.sqrt();
            rx *= s;
            ry *= s;
        }

        let num = (rx * rx * ry * ry - rx * rx * y1 * y1 - ry * ry * x1 * x1).max(0.0);
        let den = rx * rx * y1 * y1 + ry * ry * x1 * x1;
        let mut coef = if den < TOLERANCE {
            0.0
        } else {
            (num / den).sqrt()
        };
        if large == sweep {
            coef = -coef;
        }
        let cx1 = coef * rx * y1 / ry;
        let cy1 = -coef * ry * x1 / rx;

        let mid = Point2::from((start.coords + end.coords) * 0.5);
        let center = Point2::new(
            cos_phi * cx1 - sin_phi * cy1 + mid.x,
            sin_phi * cx1 + cos_phi * cy1 + mid.y,
        );

        let angle_of = |x: f64, y: f64| -> f64 { y.atan2(x) };
        let theta1 = angle_of((x1 - cx1) / rx, (y1 - cy1) / ry);
        let theta2 = angle_of((-x1 - cx1) / rx, (-y1 - cy1) / ry);
        let mut delta = theta2 - theta1;
        if sweep && delta < 0.0 {
            delta += std::f64::consts::TAU;
        } else if !sweep && delta > 0.0 {
            delta -= std::f64::consts::TAU;
        }

        for i in 1..=self.divisions {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f64 / self.divisions as f64;
            let theta = theta1 + delta * t;
            let (sin_t, cos_t) = theta.sin_cos();
            let p = Point2::new(
                center.x + rx * cos_t * cos_phi - ry * sin_t * sin_phi,
                center.y + rx * cos_t * sin_phi + ry * sin_t * cos_phi,
            );
            self.push(p);
        }
        self.current = end;
    }

    fn finish(mut self) -> Result<Vec<Point2>> {
        // drop an explicit closing point, the ring closure is implicit
        if self.points.len() > 1 {
            let first = self.points[0];
            if let Some(last) = self.points.last() {
                if (first - last).norm() < TOLERANCE {
                    self.points.pop();
                }
            }
        }

        let count = self.points.len();
        if count < 3 {
            return Err(GeometryError::TooFewPoints { count }.into());
        }

        for p in &mut self.points {
            p.y = -p.y;
        }
        Ok(self.points)
    }
}

fn reflect(prev_ctrl: Point2, about: Point2) -> Point2 {
    about + (about - prev_ctrl)
}

fn cubic_at(p0: Point2, p1: Point2, p2: Point2, p3: Point2, t: f64) -> Point2 {
    let u = 1.0 - t;
    let c: Vector2 = p0.coords * (u * u * u)
        + p1.coords * (3.0 * u * u * t)
        + p2.coords * (3.0 * u * t * t)
        + p3.coords * (t * t * t);
    Point2::from(c)
}

fn quadratic_at(p0: Point2, p1: Point2, p2: Point2, t: f64) -> Point2 {
    let u = 1.0 - t;
    let c: Vector2 = p0.coords * (u * u) + p1.coords * (2.0 * u * t) + p2.coords * (t * t);
    Point2::from(c)
}
