//! Normalization of raw Halo vertices into canonical vertex sequences.
//!
//! Every shape kind stores its geometry differently in the `.annotations`
//! file. The functions here turn those raw vertices into the sequence the
//! rest of the crate works with: closed rings for area shapes, the raw
//! polyline for rulers and the raw point for pins.

use std::f64::consts::PI;

use super::vertex::Vertex;

/// Number of points an ellipse is tessellated into (before the closing point).
pub const ELLIPSE_SEGMENTS: usize = 65;

/// Result of normalizing a region's raw vertices.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedRing {
    /// The canonical vertex sequence.
    pub vertices: Vec<Vertex>,
    /// True if a polygon did not close and the first vertex was appended.
    pub auto_closed: bool,
}

impl NormalizedRing {
    fn as_is(vertices: Vec<Vertex>) -> Self {
        Self {
            vertices,
            auto_closed: false,
        }
    }
}

/// Appends the first vertex if the sequence does not already end on it.
///
/// Returns whether a vertex was appended. Empty sequences are left alone.
pub fn close_ring(vertices: &mut Vec<Vertex>) -> bool {
    match (vertices.first().copied(), vertices.last()) {
        (Some(first), Some(last)) if first != *last => {
            vertices.push(first);
            true
        }
        _ => false,
    }
}

/// Generates `n` points at equal angles along an ellipse centred on the
/// origin with semi-axes `a` and `b`.
///
/// The signs of `a` and `b` are kept, so they decide the winding direction.
pub fn ellipse_to_polygon(a: f64, b: f64, n: usize) -> Vec<Vertex> {
    let step = 2.0 * PI / n as f64;
    (0..n)
        .map(|i| {
            let theta = i as f64 * step;
            Vertex::new(a * theta.cos(), b * theta.sin())
        })
        .collect()
}

pub(crate) fn normalize_polygon(raw: &[Vertex]) -> NormalizedRing {
    let mut vertices = raw.to_vec();
    let auto_closed = close_ring(&mut vertices);
    NormalizedRing {
        vertices,
        auto_closed,
    }
}

pub(crate) fn normalize_rectangle(raw: &[Vertex]) -> NormalizedRing {
    let [p0, p1] = match raw {
        [p0, p1, ..] => [*p0, *p1],
        _ => return NormalizedRing::as_is(raw.to_vec()),
    };
    NormalizedRing::as_is(vec![
        p0,
        Vertex::new(p0.x, p1.y),
        p1,
        Vertex::new(p1.x, p0.y),
        p0,
    ])
}

pub(crate) fn normalize_ellipse(raw: &[Vertex]) -> NormalizedRing {
    let [p0, p1] = match raw {
        [p0, p1, ..] => [*p0, *p1],
        _ => return NormalizedRing::as_is(raw.to_vec()),
    };
    let center = p0.midpoint(&p1);
    let a = (p0.x - p1.x) / 2.0;
    let b = (p0.y - p1.y) / 2.0;

    let mut vertices: Vec<Vertex> = ellipse_to_polygon(a, b, ELLIPSE_SEGMENTS)
        .into_iter()
        .map(|v| Vertex::new(v.x + center.x, v.y + center.y))
        .collect();
    if let Some(first) = vertices.first().copied() {
        vertices.push(first);
    }
    NormalizedRing::as_is(vertices)
}

/// Rulers, pins and unknown shapes keep their raw vertices untouched.
pub(crate) fn normalize_open(raw: &[Vertex]) -> NormalizedRing {
    NormalizedRing::as_is(raw.to_vec())
}

pub(crate) fn first_vertex(raw: &[Vertex]) -> Option<Vertex> {
    raw.first().copied()
}

/// Centre of the bounding rectangle spanned by the first two vertices.
pub(crate) fn corner_midpoint(raw: &[Vertex]) -> Option<Vertex> {
    match raw {
        [p0, p1, ..] => Some(p0.midpoint(p1)),
        _ => None,
    }
}
