use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use itertools::Itertools;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// A place in the plane, before quantization (or after dequantization).
///
/// Point is hashable and totally ordered so an arc can have a canonical
/// direction (smallest point first, conceptually). That helps us dedupe arcs
/// with a single hash lookup instead of checking two directions.
///
/// Equality is bitwise, except `-0.0` equals `0.0`. We never hold NaN: the
/// extractor rejects non-finite coordinates.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Point(pub f64, pub f64);

fn fold_zero(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v }
}

impl Point {
    pub fn is_finite(&self) -> bool {
        self.0.is_finite() && self.1.is_finite()
    }

    fn bits(&self) -> (u64, u64) {
        (fold_zero(self.0).to_bits(), fold_zero(self.1).to_bits())
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Point) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits().hash(state);
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Point) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Point) -> Ordering {
        fold_zero(self.0).total_cmp(&fold_zero(other.0))
            .then_with(|| fold_zero(self.1).total_cmp(&fold_zero(other.1)))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({},{})", self.0, self.1)
    }
}

/// A place on the integer grid: a quantized coordinate, or the difference
/// between two of them.
#[derive(Clone, Copy, Debug, Hash, Ord, Eq, PartialEq, PartialOrd, Serialize)]
pub struct GridPoint(pub i64, pub i64);

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({},{})", self.0, self.1)
    }
}

/// Axis-aligned bounds of every coordinate in a Topology.
///
/// Serializes as `[xmin, ymin, xmax, ymax]`, or `[]` when nothing was added.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl BoundingBox {
    pub fn empty() -> BoundingBox {
        BoundingBox {
            xmin: f64::INFINITY,
            ymin: f64::INFINITY,
            xmax: f64::NEG_INFINITY,
            ymax: f64::NEG_INFINITY,
        }
    }

    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> BoundingBox {
        BoundingBox { xmin: xmin, ymin: ymin, xmax: xmax, ymax: ymax }
    }

    pub fn is_empty(&self) -> bool {
        self.xmin > self.xmax || self.ymin > self.ymax
    }

    pub fn extend(&mut self, point: &Point) {
        self.xmin = self.xmin.min(point.0);
        self.ymin = self.ymin.min(point.1);
        self.xmax = self.xmax.max(point.0);
        self.ymax = self.ymax.max(point.1);
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }
}

impl Serialize for BoundingBox {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_empty() {
            serializer.collect_seq(std::iter::empty::<f64>())
        } else {
            serializer.collect_seq(&[ self.xmin, self.ymin, self.xmax, self.ymax ])
        }
    }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum WindingOrder {
    Clockwise,
    CounterClockwise,
}

/// Returns 2*area, positive iff the ring is counter-clockwise.
///
/// Assumes y grows **upward**, as in WGS84 and most projected coordinate
/// systems. (In SVG or HTML5 <canvas> coordinates the sign flips.)
///
/// Assumes the first and last Points are identical.
pub fn signed_area2(points: &[Point]) -> f64 {
    // https://en.wikipedia.org/wiki/Shoelace_formula
    points.iter().tuple_windows()
        .map(|(p1, p2)| p1.0 * p2.1 - p2.0 * p1.1)
        .sum()
}

/// Returns the winding order of a closed ring, or `None` if it has zero area.
pub fn winding_order(points: &[Point]) -> Option<WindingOrder> {
    let a = signed_area2(points);

    if a > 0.0 {
        Some(WindingOrder::CounterClockwise)
    } else if a < 0.0 {
        Some(WindingOrder::Clockwise)
    } else {
        None
    }
}

/// A geometry as it comes in, before we find its topology.
///
/// Polygon rings are listed exterior first, then holes. A ring may omit its
/// closing point; the extractor adds it.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Point(Point),
    MultiPoint(Vec<Point>),
    LineString(Vec<Point>),
    MultiLineString(Vec<Vec<Point>>),
    Polygon(Vec<Vec<Point>>),
    MultiPolygon(Vec<Vec<Vec<Point>>>),
    GeometryCollection(Vec<Geometry>),
}

/// A Geometry plus whatever it _means_.
#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    pub geometry: Geometry,
    pub id: Option<Value>,
    pub properties: Option<Map<String, Value>>,
}

impl From<Geometry> for Feature {
    fn from(geometry: Geometry) -> Feature {
        Feature { geometry: geometry, id: None, properties: None }
    }
}

/// Locates the feature a ring or line came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FeatureId {
    /// Position of the object in name order.
    pub object: u32,
    /// Position of the feature within its object.
    pub feature: u32,
}

/// The only view of input geometry that junction detection and arc building
/// need.
///
/// A closed Shape repeats its first point at the end.
pub trait Shape {
    fn points(&self) -> &[Point];
    fn is_closed(&self) -> bool;
    fn feature_id(&self) -> FeatureId;
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;
    use super::*;

    #[test]
    fn negative_zero_is_zero() {
        let mut set = HashSet::new();
        set.insert(Point(0.0, -0.0));
        assert!(set.contains(&Point(-0.0, 0.0)));
        assert_eq!(Ordering::Equal, Point(0.0, -0.0).cmp(&Point(-0.0, 0.0)));
    }

    #[test]
    fn points_order_by_x_then_y() {
        let mut points = vec![ Point(1.0, 0.0), Point(0.0, 5.0), Point(0.0, -1.0) ];
        points.sort();
        assert_eq!(vec![ Point(0.0, -1.0), Point(0.0, 5.0), Point(1.0, 0.0) ], points);
    }

    #[test]
    fn counter_clockwise_square() {
        let ring = [ Point(0.0, 0.0), Point(1.0, 0.0), Point(1.0, 1.0), Point(0.0, 1.0), Point(0.0, 0.0) ];
        assert_eq!(2.0, signed_area2(&ring));
        assert_eq!(Some(WindingOrder::CounterClockwise), winding_order(&ring));
    }

    #[test]
    fn clockwise_square() {
        let ring = [ Point(0.0, 0.0), Point(0.0, 1.0), Point(1.0, 1.0), Point(1.0, 0.0), Point(0.0, 0.0) ];
        assert_eq!(Some(WindingOrder::Clockwise), winding_order(&ring));
    }

    #[test]
    fn flat_ring_has_no_winding_order() {
        let ring = [ Point(0.0, 0.0), Point(1.0, 0.0), Point(2.0, 0.0), Point(0.0, 0.0) ];
        assert_eq!(None, winding_order(&ring));
    }

    #[test]
    fn bounding_box_extends() {
        let mut bbox = BoundingBox::empty();
        assert!(bbox.is_empty());
        bbox.extend(&Point(3.0, -1.0));
        bbox.extend(&Point(-2.0, 4.0));
        assert_eq!(BoundingBox::new(-2.0, -1.0, 3.0, 4.0), bbox);
        assert_eq!("[-2.0,-1.0,3.0,4.0]", serde_json::to_string(&bbox).unwrap());
        assert_eq!("[]", serde_json::to_string(&BoundingBox::empty()).unwrap());
    }
}
