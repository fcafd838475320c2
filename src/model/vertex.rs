//! Plain 2D vertex in Halo image space.

/// A 2D coordinate in slide pixel space, as stored in `<V X= Y=>` elements.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
}

impl Vertex {
    /// Creates a new vertex with the given x and y values.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns true if both coordinates are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Returns the point halfway between `self` and `other`.
    #[inline]
    pub fn midpoint(&self, other: &Vertex) -> Vertex {
        Vertex::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Returns the coordinate as a `[x, y]` pair, the GeoJSON position layout.
    #[inline]
    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl From<(f64, f64)> for Vertex {
    fn from((x, y): (f64, f64)) -> Self {
        Vertex::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_creation() {
        let v = Vertex::new(10.0, 20.0);
        assert_eq!(v.x, 10.0);
        assert_eq!(v.y, 20.0);
        assert_eq!(Vertex::from((10.0, 20.0)), v);
    }

    #[test]
    fn test_vertex_is_finite() {
        assert!(Vertex::new(10.0, 20.0).is_finite());
        assert!(!Vertex::new(f64::NAN, 20.0).is_finite());
        assert!(!Vertex::new(10.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_midpoint() {
        let mid = Vertex::new(0.0, 10.0).midpoint(&Vertex::new(4.0, -2.0));
        assert_eq!(mid, Vertex::new(2.0, 4.0));
    }
}
