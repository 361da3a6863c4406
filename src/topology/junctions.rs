//! Finds where rings and lines must be cut so shared boundaries become
//! shared arcs.
//!
//! Output is one sorted list of cut positions per path. A ring's positions
//! run `0 .. len - 1` (the closing point is position 0 again); a line's run
//! `0 .. len`, and its two endpoints are always cuts.

use std::collections::{HashMap, HashSet};
use std::collections::hash_map::Entry;

use itertools::Itertools;

use crate::geo::{Point, Shape};
use crate::options::JunctionStrategy;

/// A segment without direction: smallest Point first.
type Segment = (Point, Point);

fn segment(a: Point, b: Point) -> Segment {
    if a <= b { (a, b) } else { (b, a) }
}

/// Number of distinct positions in a path.
fn n_positions<S: Shape>(path: &S) -> usize {
    let len = path.points().len();
    if path.is_closed() { len.saturating_sub(1) } else { len }
}

/// Returns the sorted cut positions of every path.
pub fn cut_positions<S: Shape>(paths: &[S], strategy: JunctionStrategy) -> Vec<Vec<usize>> {
    match strategy {
        JunctionStrategy::PathConnected => path_connected_cuts(paths),
        JunctionStrategy::CoordsConnected => coords_connected_cuts(paths),
    }
}

/// Returns only the cuts every path needs: line endpoints. Rings become
/// single arcs.
pub fn endpoint_cuts<S: Shape>(paths: &[S]) -> Vec<Vec<usize>> {
    paths.iter()
        .map(|path| {
            let len = path.points().len();
            if path.is_closed() || len == 0 {
                vec![]
            } else if len == 1 {
                vec![ 0 ]
            } else {
                vec![ 0, len - 1 ]
            }
        })
        .collect()
}

/// For each segment of each path, the _other_ paths that traverse it.
///
/// A path that traverses a segment twice lists itself once: it shares that
/// segment with itself.
fn segment_partners<S: Shape>(paths: &[S]) -> Vec<Vec<Vec<u32>>> {
    let mut segment_paths: HashMap<Segment, Vec<u32>> = HashMap::new();

    for (path_id, path) in paths.iter().enumerate() {
        for (&a, &b) in path.points().iter().tuple_windows() {
            segment_paths.entry(segment(a, b)).or_insert_with(Vec::new).push(path_id as u32);
        }
    }

    paths.iter()
        .enumerate()
        .map(|(path_id, path)| {
            path.points().iter().tuple_windows()
                .map(|(&a, &b)| {
                    let mut others = segment_paths[&segment(a, b)].clone();
                    if let Some(i) = others.iter().position(|&id| id == path_id as u32) {
                        others.remove(i);
                    }
                    others.sort();
                    others.dedup();
                    others
                })
                .collect()
        })
        .collect()
}

/// Partners of the segments that end and start at `position`. `None` means
/// there is no such segment: the position is a line endpoint.
fn neighbors<'a>(partners: &'a [Vec<u32>], closed: bool, position: usize) -> (Option<&'a Vec<u32>>, Option<&'a Vec<u32>>) {
    let n = partners.len();

    if closed {
        if n == 0 {
            return (None, None);
        }
        (Some(&partners[(position + n - 1) % n]), Some(&partners[position % n]))
    } else {
        let before = if position > 0 { partners.get(position - 1) } else { None };
        (before, partners.get(position))
    }
}

fn is_shared(neighbor: Option<&Vec<u32>>) -> bool {
    neighbor.map_or(false, |partners| !partners.is_empty())
}

/// Cuts where a path starts or stops sharing segments with other paths.
///
/// A coordinate is a junction when, for any path passing through it, the set
/// of partners on the incoming segment differs from the set on the outgoing
/// one. Every path is then cut at every junction it reaches along a shared
/// segment, so both sides of a shared boundary are cut at the same places.
/// Paths that merely touch at a point share no segment there and stay whole.
fn path_connected_cuts<S: Shape>(paths: &[S]) -> Vec<Vec<usize>> {
    let partners = segment_partners(paths);

    let mut junctions: HashSet<Point> = HashSet::new();

    for (path, path_partners) in paths.iter().zip(partners.iter()) {
        let points = path.points();

        for position in 0 .. n_positions(path) {
            let (before, after) = neighbors(path_partners, path.is_closed(), position);
            if before != after {
                junctions.insert(points[position]);
            }
        }
    }

    debug!("found {} junctions (path-connected)", junctions.len());

    paths.iter()
        .zip(partners.iter())
        .enumerate()
        .map(|(path_id, (path, path_partners))| {
            let points = path.points();
            let n = n_positions(path);

            let mut cuts: Vec<usize> = (0 .. n)
                .filter(|&position| {
                    let (before, after) = neighbors(path_partners, path.is_closed(), position);
                    junctions.contains(&points[position]) && (is_shared(before) || is_shared(after))
                })
                .collect();

            if !path.is_closed() && n > 0 {
                cuts.push(0);
                cuts.push(n - 1);
            }

            cuts.sort();
            cuts.dedup();
            trace!("path {}: cuts {:?}", path_id, cuts);
            cuts
        })
        .collect()
}

/// Cuts at every occurrence of a coordinate that appears in two or more
/// paths.
fn coords_connected_cuts<S: Shape>(paths: &[S]) -> Vec<Vec<usize>> {
    // Point => (first path to reach it, whether another path reached it too)
    let mut owners: HashMap<Point, (usize, bool)> = HashMap::new();

    for (path_id, path) in paths.iter().enumerate() {
        for point in path.points()[.. n_positions(path)].iter() {
            match owners.entry(*point) {
                Entry::Occupied(mut entry) => {
                    if entry.get().0 != path_id {
                        entry.get_mut().1 = true;
                    }
                }
                Entry::Vacant(entry) => {
                    entry.insert((path_id, false));
                }
            }
        }
    }

    debug!("found {} junctions (coords-connected)", owners.values().filter(|&&(_, shared)| shared).count());

    paths.iter()
        .map(|path| {
            let points = path.points();
            let n = n_positions(path);

            let mut cuts: Vec<usize> = (0 .. n)
                .filter(|&position| owners.get(&points[position]).map_or(false, |&(_, shared)| shared))
                .collect();

            if !path.is_closed() && n > 0 {
                cuts.push(0);
                cuts.push(n - 1);
            }

            cuts.sort();
            cuts.dedup();
            cuts
        })
        .collect()
}

#[cfg(test)]
mod test {
    use crate::geo::FeatureId;
    use super::*;

    struct TestPath(Vec<Point>, bool);

    impl Shape for TestPath {
        fn points(&self) -> &[Point] {
            &self.0[..]
        }

        fn is_closed(&self) -> bool {
            self.1
        }

        fn feature_id(&self) -> FeatureId {
            FeatureId { object: 0, feature: 0 }
        }
    }

    fn ring(points: &[(f64, f64)]) -> TestPath {
        TestPath(points.iter().map(|&(x, y)| Point(x, y)).collect(), true)
    }

    fn line(points: &[(f64, f64)]) -> TestPath {
        TestPath(points.iter().map(|&(x, y)| Point(x, y)).collect(), false)
    }

    #[test]
    fn squares_sharing_an_edge() {
        let paths = vec![
            ring(&[ (0., 0.), (1., 0.), (1., 1.), (0., 1.), (0., 0.) ]),
            ring(&[ (1., 0.), (2., 0.), (2., 1.), (1., 1.), (1., 0.) ]),
        ];

        let expected = vec![ vec![ 1, 2 ], vec![ 0, 3 ] ];
        assert_eq!(expected, cut_positions(&paths, JunctionStrategy::PathConnected));
        assert_eq!(expected, cut_positions(&paths, JunctionStrategy::CoordsConnected));
    }

    #[test]
    fn isolated_ring_is_not_cut() {
        let paths = vec![ ring(&[ (0., 0.), (0., 1.), (1., 1.), (1., 0.), (0., 0.) ]) ];
        assert_eq!(vec![ Vec::<usize>::new() ], cut_positions(&paths, JunctionStrategy::PathConnected));
    }

    #[test]
    fn touching_at_a_point() {
        let paths = vec![
            ring(&[ (0., 0.), (0., 1.), (1., 1.), (1., 0.), (0., 0.) ]),
            ring(&[ (1., 1.), (1., 2.), (2., 2.), (2., 1.), (1., 1.) ]),
        ];

        let no_cuts: Vec<Vec<usize>> = vec![ vec![], vec![] ];
        assert_eq!(no_cuts, cut_positions(&paths, JunctionStrategy::PathConnected));
        assert_eq!(vec![ vec![ 2 ], vec![ 0 ] ], cut_positions(&paths, JunctionStrategy::CoordsConnected));
    }

    #[test]
    fn identical_rings_stay_whole() {
        let paths = vec![
            ring(&[ (0., 0.), (0., 1.), (1., 1.), (1., 0.), (0., 0.) ]),
            ring(&[ (1., 1.), (1., 0.), (0., 0.), (0., 1.), (1., 1.) ]),
        ];

        let no_cuts: Vec<Vec<usize>> = vec![ vec![], vec![] ];
        assert_eq!(no_cuts, cut_positions(&paths, JunctionStrategy::PathConnected));
    }

    #[test]
    fn line_endpoints_are_cuts() {
        let paths = vec![ line(&[ (0., 0.), (1., 0.), (2., 0.) ]) ];
        assert_eq!(vec![ vec![ 0, 2 ] ], cut_positions(&paths, JunctionStrategy::PathConnected));
        assert_eq!(vec![ vec![ 0, 2 ] ], endpoint_cuts(&paths));
    }

    #[test]
    fn line_overlapping_part_of_another() {
        let paths = vec![
            line(&[ (0., 0.), (1., 0.), (2., 0.), (3., 0.) ]),
            line(&[ (1., 0.), (2., 0.) ]),
        ];

        assert_eq!(vec![ vec![ 0, 1, 2, 3 ], vec![ 0, 1 ] ], cut_positions(&paths, JunctionStrategy::PathConnected));
    }

    #[test]
    fn line_crossing_a_ring_vertex() {
        let paths = vec![
            ring(&[ (0., 0.), (0., 2.), (2., 2.), (2., 0.), (0., 0.) ]),
            line(&[ (-1., 3.), (0., 2.), (1., 3.) ]),
        ];

        let path_connected = cut_positions(&paths, JunctionStrategy::PathConnected);
        assert_eq!(Vec::<usize>::new(), path_connected[0]);
        assert_eq!(vec![ 0, 2 ], path_connected[1]);

        let coords_connected = cut_positions(&paths, JunctionStrategy::CoordsConnected);
        assert_eq!(vec![ 1 ], coords_connected[0]);
        assert_eq!(vec![ 0, 1, 2 ], coords_connected[1]);
    }

    #[test]
    fn three_way_junction() {
        // Two squares side by side, and a rectangle under both of them.
        let paths = vec![
            ring(&[ (0., 1.), (0., 2.), (1., 2.), (1., 1.), (0., 1.) ]),
            ring(&[ (1., 1.), (1., 2.), (2., 2.), (2., 1.), (1., 1.) ]),
            ring(&[ (0., 0.), (0., 1.), (1., 1.), (2., 1.), (2., 0.), (0., 0.) ]),
        ];

        let cuts = cut_positions(&paths, JunctionStrategy::PathConnected);

        // (1,1) is where all three meet.
        assert!(cuts[0].contains(&3));
        assert!(cuts[1].contains(&0));
        assert!(cuts[2].contains(&2));
    }
}
