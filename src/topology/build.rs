use std::collections::HashMap;
use std::collections::hash_map::Entry;

use itertools::Itertools;

use crate::geo::{Point, Shape};
use super::types::{ArcId, DirectedArc, Direction};

/// Slices paths into arcs, storing each distinct arc once.
pub struct ArcBuilder {
    arcs: Vec<Vec<Point>>,

    // HashMap's Entry API lets us insert-or-get the key.
    //
    // The key is the arc's canonical sequence. The value's Direction says
    // whether the stored arc runs along the key (Forward) or against it.
    arc_ids: HashMap<Vec<Point>, (ArcId, Direction)>,

    dedup: bool,
}

/// Returns the smallest rotation of `ring` that starts at its smallest point,
/// closed (first point repeated at the end).
///
/// `ring` does not repeat its first point.
fn smallest_rotation(ring: &[Point]) -> Vec<Point> {
    let min = match ring.iter().min() {
        Some(&min) => min,
        None => return Vec::new(),
    };

    (0 .. ring.len())
        .filter(|&i| ring[i] == min)
        .map(|i| {
            let mut rotation: Vec<Point> = ring[i ..].iter().chain(ring[.. i].iter()).cloned().collect();
            rotation.push(min);
            rotation
        })
        .min()
        .unwrap_or_default()
}

impl ArcBuilder {
    pub fn new() -> ArcBuilder {
        ArcBuilder {
            arcs: vec![],
            arc_ids: HashMap::new(),
            dedup: true,
        }
    }

    /// An ArcBuilder that gives every slice its own arc.
    pub fn without_dedup() -> ArcBuilder {
        ArcBuilder {
            dedup: false,
            ..ArcBuilder::new()
        }
    }

    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// Cuts `path` at `cuts` and returns the arcs that trace it, in order.
    ///
    /// A ring with cuts is traced starting at its first cut. A ring without
    /// cuts becomes one closed arc.
    pub fn add_path<S: Shape>(&mut self, path: &S, cuts: &[usize]) -> Vec<DirectedArc> {
        let points = path.points();

        if points.len() < 2 {
            return vec![];
        }

        if !path.is_closed() {
            return cuts.iter()
                .tuple_windows()
                .map(|(&start, &end)| self.add_slice(points[start ..= end].to_vec()))
                .collect();
        }

        if cuts.is_empty() {
            return vec![ self.add_island(points) ];
        }

        let n = points.len() - 1;

        (0 .. cuts.len())
            .map(|i| {
                let start = cuts[i];
                let end = if i + 1 < cuts.len() { cuts[i + 1] } else { cuts[0] + n };
                let slice: Vec<Point> = (start ..= end).map(|k| points[k % n]).collect();
                self.add_slice(slice)
            })
            .collect()
    }

    /// Returns a DirectedArc, building an arc if it is missing.
    fn add_slice(&mut self, points: Vec<Point>) -> DirectedArc {
        if !self.dedup {
            return self.push(points);
        }

        let reversed: Vec<Point> = points.iter().rev().cloned().collect();

        if reversed < points {
            self.insert_or_get(reversed, points, Direction::Backward)
        } else {
            self.insert_or_get(points.clone(), points, Direction::Forward)
        }
    }

    /// Returns a DirectedArc for a ring without junctions, building an arc if
    /// it is missing.
    ///
    /// Two islands are the same arc if one is a rotation of the other, in
    /// either direction. The arc starts at the island's smallest point.
    fn add_island(&mut self, points: &[Point]) -> DirectedArc {
        if !self.dedup {
            return self.push(points.to_vec());
        }

        let ring = &points[.. points.len() - 1];
        let forward = smallest_rotation(ring);
        let reversed_ring: Vec<Point> = ring.iter().rev().cloned().collect();
        let backward = smallest_rotation(&reversed_ring);

        if backward < forward {
            let occurrence: Vec<Point> = backward.iter().rev().cloned().collect();
            self.insert_or_get(backward, occurrence, Direction::Backward)
        } else {
            self.insert_or_get(forward.clone(), forward, Direction::Forward)
        }
    }

    /// `occurrence` runs along `key` if `direction` is Forward, against it
    /// otherwise.
    fn insert_or_get(&mut self, key: Vec<Point>, occurrence: Vec<Point>, direction: Direction) -> DirectedArc {
        let next_id = self.arcs.len() as ArcId;

        match self.arc_ids.entry(key) {
            Entry::Occupied(entry) => {
                let (arc_id, stored) = *entry.get();
                if stored == direction {
                    DirectedArc::forward(arc_id)
                } else {
                    DirectedArc::backward(arc_id)
                }
            }
            Entry::Vacant(entry) => {
                entry.insert((next_id, direction));
                self.arcs.push(occurrence);
                DirectedArc::forward(next_id)
            }
        }
    }

    fn push(&mut self, points: Vec<Point>) -> DirectedArc {
        let arc_id = self.arcs.len() as ArcId;
        self.arcs.push(points);
        DirectedArc::forward(arc_id)
    }

    pub fn into_arcs(self) -> Vec<Vec<Point>> {
        self.arcs
    }
}

#[cfg(test)]
mod tests {
    use crate::extract::ExtractedPath;
    use crate::geo::FeatureId;
    use super::*;
    use super::super::types::stitch;

    fn path(points: &[(f64, f64)], closed: bool) -> ExtractedPath {
        ExtractedPath {
            points: points.iter().map(|&(x, y)| Point(x, y)).collect(),
            closed: closed,
            feature: FeatureId { object: 0, feature: 0 },
        }
    }

    #[test]
    fn shared_edge_is_one_arc() {
        let a = path(&[ (0., 0.), (1., 0.), (1., 1.), (0., 1.), (0., 0.) ], true);
        let b = path(&[ (1., 0.), (2., 0.), (2., 1.), (1., 1.), (1., 0.) ], true);

        let mut builder = ArcBuilder::new();
        let a_arcs = builder.add_path(&a, &[ 1, 2 ]);
        let b_arcs = builder.add_path(&b, &[ 0, 3 ]);

        assert_eq!(vec![ DirectedArc::forward(0), DirectedArc::forward(1) ], a_arcs);
        assert_eq!(vec![ DirectedArc::forward(2), DirectedArc::backward(0) ], b_arcs);
        assert_eq!(3, builder.len());

        let arcs = builder.into_arcs();
        assert_eq!(vec![ Point(1., 0.), Point(1., 1.) ], arcs[0]);

        // a, rotated to start at its first cut
        assert_eq!(
            Some(vec![ Point(1., 0.), Point(1., 1.), Point(0., 1.), Point(0., 0.), Point(1., 0.) ]),
            stitch(&arcs, &a_arcs)
        );
        assert_eq!(Some(b.points.clone()), stitch(&arcs, &b_arcs));
    }

    #[test]
    fn rotated_islands_are_one_arc() {
        let a = path(&[ (0., 0.), (0., 1.), (1., 1.), (1., 0.), (0., 0.) ], true);
        let b = path(&[ (1., 1.), (1., 0.), (0., 0.), (0., 1.), (1., 1.) ], true);
        let c = path(&[ (1., 1.), (0., 1.), (0., 0.), (1., 0.), (1., 1.) ], true);

        let mut builder = ArcBuilder::new();
        let a_arc = builder.add_path(&a, &[]);
        let b_arc = builder.add_path(&b, &[]);
        let c_arc = builder.add_path(&c, &[]);

        assert_eq!(vec![ DirectedArc::forward(0) ], a_arc);
        assert_eq!(vec![ DirectedArc::forward(0) ], b_arc);
        assert_eq!(vec![ DirectedArc::backward(0) ], c_arc);
        assert_eq!(1, builder.len());

        let arcs = builder.into_arcs();
        assert_eq!(a.points, arcs[0]);
    }

    #[test]
    fn slice_line_between_cuts() {
        let line = path(&[ (0., 0.), (1., 0.), (2., 0.), (3., 0.), (4., 0.) ], false);
        let overlap = path(&[ (2., 0.), (1., 0.) ], false);

        let mut builder = ArcBuilder::new();
        assert_eq!(
            vec![ DirectedArc::forward(0), DirectedArc::forward(1), DirectedArc::forward(2) ],
            builder.add_path(&line, &[ 0, 1, 2, 4 ])
        );
        assert_eq!(vec![ DirectedArc::backward(1) ], builder.add_path(&overlap, &[ 0, 1 ]));

        let arcs = builder.into_arcs();
        assert_eq!(vec![ Point(2., 0.), Point(3., 0.), Point(4., 0.) ], arcs[2]);
    }

    #[test]
    fn reversed_first_occurrence_is_stored_as_is() {
        let a = path(&[ (5., 5.), (0., 0.) ], false);
        let b = path(&[ (0., 0.), (5., 5.) ], false);

        let mut builder = ArcBuilder::new();
        assert_eq!(vec![ DirectedArc::forward(0) ], builder.add_path(&a, &[ 0, 1 ]));
        assert_eq!(vec![ DirectedArc::backward(0) ], builder.add_path(&b, &[ 0, 1 ]));
        assert_eq!(vec![ vec![ Point(5., 5.), Point(0., 0.) ] ], builder.into_arcs());
    }

    #[test]
    fn without_dedup_keeps_duplicates() {
        let a = path(&[ (0., 0.), (0., 1.), (1., 1.), (1., 0.), (0., 0.) ], true);

        let mut builder = ArcBuilder::without_dedup();
        builder.add_path(&a, &[]);
        builder.add_path(&a, &[]);

        assert_eq!(vec![ a.points.clone(), a.points.clone() ], builder.into_arcs());
    }

    #[test]
    fn smallest_rotation_starts_at_min() {
        let ring = [ Point(3., 3.), Point(1., 0.), Point(0., 5.), Point(2., 2.) ];
        assert_eq!(
            vec![ Point(0., 5.), Point(2., 2.), Point(3., 3.), Point(1., 0.), Point(0., 5.) ],
            smallest_rotation(&ring)
        );
    }
}
