//! Point-in-polygon by ray casting.
//!
//! A ray is cast from the query point to `x = RAY_END_X` at the same `y` and
//! the polygon sides it crosses are counted. A point lying on a side counts as
//! inside.
//!
//! Known limitation: when the ray passes exactly through a vertex, both sides
//! sharing that vertex are counted and the parity flips. Real coordinates
//! rarely hit this. Any fix changes observable results and has to be called
//! out as a behaviour change.

use serde::{Deserialize, Serialize};

/// Where the cast ray ends. Far east of any longitude.
pub const RAY_END_X: f64 = 9999.0;

/// A planar point. Callers put longitude in `x` and latitude in `y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub const fn from_lat_lon(lat: f64, lon: f64) -> Self {
        Self { x: lon, y: lat }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orientation {
    Collinear,
    Clockwise,
    Anticlockwise,
}

fn orientation(a: Point, b: Point, c: Point) -> Orientation {
    let val = (b.y - a.y) * (c.x - b.x) - (b.x - a.x) * (c.y - b.y);
    if val == 0.0 {
        Orientation::Collinear
    } else if val < 0.0 {
        Orientation::Anticlockwise
    } else {
        Orientation::Clockwise
    }
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    a: Point,
    b: Point,
}

impl Segment {
    /// `p` inside this segment's bounding box.
    fn spans(&self, p: Point) -> bool {
        p.x <= self.a.x.max(self.b.x)
            && p.x >= self.a.x.min(self.b.x)
            && p.y <= self.a.y.max(self.b.y)
            && p.y >= self.a.y.min(self.b.y)
    }

    fn intersects(&self, other: &Segment) -> bool {
        let o1 = orientation(self.a, self.b, other.a);
        let o2 = orientation(self.a, self.b, other.b);
        let o3 = orientation(other.a, other.b, self.a);
        let o4 = orientation(other.a, other.b, self.b);

        if o1 != o2 && o3 != o4 {
            return true;
        }

        (o1 == Orientation::Collinear && self.spans(other.a))
            || (o2 == Orientation::Collinear && self.spans(other.b))
            || (o3 == Orientation::Collinear && other.spans(self.a))
            || (o4 == Orientation::Collinear && other.spans(self.b))
    }
}

/// True if `point` is inside `polygon` or on its boundary. The ring is closed
/// implicitly. Fewer than three vertices contain nothing.
pub fn contains(polygon: &[Point], point: Point) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let ray = Segment { a: point, b: Point::new(RAY_END_X, point.y) };
    let mut crossings = 0usize;
    for i in 0..n {
        let side = Segment { a: polygon[i], b: polygon[(i + 1) % n] };
        if side.intersects(&ray) {
            if orientation(side.a, point, side.b) == Orientation::Collinear {
                return side.spans(point);
            }
            crossings += 1;
        }
    }
    crossings % 2 == 1
}
