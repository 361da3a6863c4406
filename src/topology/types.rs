use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::geo::Point;

// Arcs are referenced by index into the Topology's arc table, not by pointer:
// indexes are easy to serialize, take less space and survive cloning.
pub type ArcId = u32;

/// Index of a ring or line in the extractor's output.
pub type PathId = u32;

#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash)]
pub enum Direction {
    Forward,
    Backward
}

/// A reference to an arc, plus the direction to traverse it in.
///
/// Serializes as a signed integer: `i` for forward, `!i` (that is, `-i - 1`)
/// for backward. Arc 0 reversed is `-1`.
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash)]
pub struct DirectedArc {
    pub arc_id: ArcId,
    pub direction: Direction,
}

impl DirectedArc {
    pub fn forward(arc_id: ArcId) -> DirectedArc {
        DirectedArc { arc_id: arc_id, direction: Direction::Forward }
    }

    pub fn backward(arc_id: ArcId) -> DirectedArc {
        DirectedArc { arc_id: arc_id, direction: Direction::Backward }
    }

    pub fn signed(&self) -> i64 {
        match self.direction {
            Direction::Forward => self.arc_id as i64,
            Direction::Backward => !(self.arc_id as i64),
        }
    }

    pub fn from_signed(i: i64) -> DirectedArc {
        if i >= 0 {
            DirectedArc::forward(i as ArcId)
        } else {
            DirectedArc::backward(!i as ArcId)
        }
    }
}

impl Serialize for DirectedArc {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.signed())
    }
}

/// A geometry whose rings and lines have been replaced by an `R`.
///
/// The extractor builds `TopoGeometry<PathId>`, pointing at its own list of
/// rings and lines. Once arcs exist, each path becomes the list of arcs that
/// traces it: `TopoGeometry<Vec<DirectedArc>>`.
///
/// Points index the Topology's direct coordinate table: they have no
/// boundary to share.
#[derive(Debug, Clone, PartialEq)]
pub enum TopoGeometry<R = Vec<DirectedArc>> {
    Point(usize),
    MultiPoint(Vec<usize>),
    LineString(R),
    MultiLineString(Vec<R>),
    Polygon(Vec<R>),
    MultiPolygon(Vec<Vec<R>>),
    GeometryCollection(Vec<TopoGeometry<R>>),
}

impl<R> TopoGeometry<R> {
    /// Returns the same geometry, with every path replaced by `f(path)`.
    pub fn map<T, F>(self, f: &mut F) -> TopoGeometry<T>
        where F: FnMut(R) -> T
    {
        match self {
            TopoGeometry::Point(i) => TopoGeometry::Point(i),
            TopoGeometry::MultiPoint(is) => TopoGeometry::MultiPoint(is),
            TopoGeometry::LineString(r) => TopoGeometry::LineString(f(r)),
            TopoGeometry::MultiLineString(rs) => TopoGeometry::MultiLineString(rs.into_iter().map(|r| f(r)).collect()),
            TopoGeometry::Polygon(rs) => TopoGeometry::Polygon(rs.into_iter().map(|r| f(r)).collect()),
            TopoGeometry::MultiPolygon(ps) => TopoGeometry::MultiPolygon(
                ps.into_iter().map(|rs| rs.into_iter().map(|r| f(r)).collect()).collect()
            ),
            TopoGeometry::GeometryCollection(gs) => TopoGeometry::GeometryCollection(
                gs.into_iter().map(|g| g.map(&mut *f)).collect()
            ),
        }
    }

    /// Calls `f` on every path, in order.
    pub fn for_each_path<F>(&self, f: &mut F)
        where F: FnMut(&R)
    {
        match self {
            TopoGeometry::Point(_) | TopoGeometry::MultiPoint(_) => {}
            TopoGeometry::LineString(r) => f(r),
            TopoGeometry::MultiLineString(rs) | TopoGeometry::Polygon(rs) => rs.iter().for_each(|r| f(r)),
            TopoGeometry::MultiPolygon(ps) => ps.iter().flatten().for_each(|r| f(r)),
            TopoGeometry::GeometryCollection(gs) => gs.iter().for_each(|g| g.for_each_path(&mut *f)),
        }
    }
}

/// A TopoGeometry plus whatever it _means_.
#[derive(Debug, Clone, PartialEq)]
pub struct TopoFeature<R = Vec<DirectedArc>> {
    pub geometry: TopoGeometry<R>,
    pub id: Option<Value>,
    pub properties: Option<Map<String, Value>>,
}

/// Returns the points traced by following `directed_arcs` through `arcs`, or
/// `None` if a DirectedArc points past the end of `arcs`.
///
/// Consecutive arcs share their joint point; it appears once in the output.
pub fn stitch(arcs: &[Vec<Point>], directed_arcs: &[DirectedArc]) -> Option<Vec<Point>> {
    let mut ret: Vec<Point> = Vec::new();

    for directed_arc in directed_arcs {
        let arc = arcs.get(directed_arc.arc_id as usize)?;
        let skip = if ret.is_empty() { 0 } else { 1 };

        match directed_arc.direction {
            Direction::Forward => ret.extend(arc.iter().skip(skip)),
            Direction::Backward => ret.extend(arc.iter().rev().skip(skip)),
        }
    }

    Some(ret)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn signed_indexes() {
        assert_eq!(0, DirectedArc::forward(0).signed());
        assert_eq!(-1, DirectedArc::backward(0).signed());
        assert_eq!(-4, DirectedArc::backward(3).signed());
        assert_eq!(DirectedArc::backward(3), DirectedArc::from_signed(-4));
        assert_eq!(DirectedArc::forward(7), DirectedArc::from_signed(7));
        assert_eq!("[2,-3]", serde_json::to_string(&[ DirectedArc::forward(2), DirectedArc::backward(2) ]).unwrap());
    }

    #[test]
    fn stitch_joins_arcs() {
        let arcs = vec![
            vec![ Point(1., 0.), Point(1., 1.) ],
            vec![ Point(1., 1.), Point(0., 1.), Point(0., 0.), Point(1., 0.) ],
        ];

        assert_eq!(
            Some(vec![ Point(1., 1.), Point(1., 0.), Point(0., 0.), Point(0., 1.), Point(1., 1.) ]),
            stitch(&arcs, &[ DirectedArc::backward(0), DirectedArc::backward(1) ])
        );
    }

    #[test]
    fn stitch_unknown_arc() {
        let arcs = vec![ vec![ Point(1., 0.), Point(1., 1.) ] ];
        assert_eq!(None, stitch(&arcs, &[ DirectedArc::forward(0), DirectedArc::forward(1) ]));
        assert_eq!(Some(vec![]), stitch(&arcs, &[]));
    }

    #[test]
    fn map_paths() {
        let geometry: TopoGeometry<PathId> = TopoGeometry::GeometryCollection(vec![
            TopoGeometry::Polygon(vec![ 0, 1 ]),
            TopoGeometry::Point(3),
            TopoGeometry::MultiLineString(vec![ 2 ]),
        ]);

        let mapped = geometry.map(&mut |id| id * 10);

        assert_eq!(TopoGeometry::GeometryCollection(vec![
            TopoGeometry::Polygon(vec![ 0, 10 ]),
            TopoGeometry::Point(3),
            TopoGeometry::MultiLineString(vec![ 20 ]),
        ]), mapped);

        let mut seen = vec![];
        mapped.for_each_path(&mut |&id| seen.push(id));
        assert_eq!(vec![ 0, 10, 20 ], seen);
    }
}
