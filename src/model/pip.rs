//! Point-in-polygon testing.

use super::vertex::Vertex;

/// Tests whether `point` lies inside the polygon `ring` by horizontal ray
/// casting.
///
/// The ring is treated as closed: the edge from the last vertex back to the
/// first is always tested, whether or not the ring repeats its first vertex.
/// Comparisons are exact. Points on an edge or vertex may go either way.
pub fn contains(point: Vertex, ring: &[Vertex]) -> bool {
    let Some(first) = ring.first() else {
        return false;
    };

    let n = ring.len();
    let mut inside = false;
    let mut x_intersect = 0.0;
    let (mut p1x, mut p1y) = (first.x, first.y);

    for i in 1..=n {
        let p2 = ring[i % n];
        let (p2x, p2y) = (p2.x, p2.y);

        if point.y > p1y.min(p2y) && point.y <= p1y.max(p2y) && point.x <= p1x.max(p2x) {
            if p1y != p2y {
                x_intersect = (point.y - p1y) * (p2x - p1x) / (p2y - p1y) + p1x;
            }
            if p1x == p2x || point.x <= x_intersect {
                inside = !inside;
            }
        }

        p1x = p2x;
        p1y = p2y;
    }

    inside
}

/// Axis-aligned bounds of a vertex sequence, used to skip polygons that
/// cannot contain a point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Computes the bounds of `vertices`, or `None` if the slice is empty.
    pub fn of(vertices: &[Vertex]) -> Option<Self> {
        let first = vertices.first()?;
        let init = Bounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        Some(vertices.iter().skip(1).fold(init, |b, v| Bounds {
            min_x: b.min_x.min(v.x),
            min_y: b.min_y.min(v.y),
            max_x: b.max_x.max(v.x),
            max_y: b.max_y.max(v.y),
        }))
    }

    /// Inclusive containment check.
    #[inline]
    pub fn contains(&self, point: Vertex) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }
}

/// Fuzz-only entrypoint: reads little-endian `f64` pairs from `data`, the
/// first as the probe point and the rest as the ring.
#[cfg(feature = "fuzzing")]
pub fn fuzz_point_in_polygon(data: &[u8]) -> bool {
    let mut coords = data.chunks_exact(16).map(|chunk| {
        let (x, y) = chunk.split_at(8);
        let read = |bytes: &[u8]| {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(bytes);
            f64::from_le_bytes(buf)
        };
        Vertex::new(read(x), read(y))
    });
    let Some(point) = coords.next() else {
        return false;
    };
    let ring: Vec<Vertex> = coords.collect();
    let inside = contains(point, &ring);
    let _ = Bounds::of(&ring).map(|b| b.contains(point));
    inside
}
