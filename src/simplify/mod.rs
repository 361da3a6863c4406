//! Point reduction for arcs (and, before the topology exists, for rings and
//! lines).
//!
//! Each arc is simplified on its own. An arc's first and last points are
//! junctions, so they never move: a boundary shared by two polygons is
//! simplified once and both polygons keep referencing the same arc.

mod douglas_peucker;
mod visvalingam;

use crate::geo::Point;
use crate::options::SimplifyAlgorithm;

pub use self::douglas_peucker::douglas_peucker;
pub use self::visvalingam::visvalingam_whyatt;

/// Returns a simpler version of `points`. `epsilon <= 0` changes nothing.
pub fn simplify_points(points: &[Point], epsilon: f64, algorithm: SimplifyAlgorithm) -> Vec<Point> {
    if epsilon <= 0.0 {
        return points.to_vec();
    }

    match algorithm {
        SimplifyAlgorithm::DouglasPeucker => douglas_peucker(points, epsilon),
        SimplifyAlgorithm::VisvalingamWhyatt => visvalingam_whyatt(points, epsilon),
    }
}

fn is_closed(points: &[Point]) -> bool {
    points.len() > 1 && points[0] == points[points.len() - 1]
}

fn cross(o: &Point, a: &Point, b: &Point) -> f64 {
    (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
}

/// Assumes `p` is collinear with `a`-`b`.
fn within_bounds(p: &Point, a: &Point, b: &Point) -> bool {
    p.0 >= a.0.min(b.0) && p.0 <= a.0.max(b.0) && p.1 >= a.1.min(b.1) && p.1 <= a.1.max(b.1)
}

fn segments_intersect(a1: &Point, a2: &Point, b1: &Point, b2: &Point) -> bool {
    let d1 = cross(b1, b2, a1);
    let d2 = cross(b1, b2, a2);
    let d3 = cross(a1, a2, b1);
    let d4 = cross(a1, a2, b2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0)) && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0)) {
        return true;
    }

    (d1 == 0.0 && within_bounds(a1, b1, b2))
        || (d2 == 0.0 && within_bounds(a2, b1, b2))
        || (d3 == 0.0 && within_bounds(b1, a1, a2))
        || (d4 == 0.0 && within_bounds(b2, a1, a2))
}

/// `true` iff two non-adjacent segments of the polyline touch or cross.
///
/// The first and last segments of a closed polyline are adjacent.
///
/// Segments are swept left to right by their smallest x. Only segments whose
/// x ranges overlap the current one are tested against it.
pub fn self_intersects(points: &[Point]) -> bool {
    let n_segments = points.len().saturating_sub(1);
    let closed = is_closed(points);

    let adjacent = |i: usize, j: usize| {
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        hi == lo + 1 || (closed && lo == 0 && hi == n_segments - 1)
    };

    // (min x, max x, segment index)
    let mut sweep: Vec<(f64, f64, usize)> = (0 .. n_segments)
        .map(|i| {
            let (a, b) = (points[i].0, points[i + 1].0);
            (a.min(b), a.max(b), i)
        })
        .collect();
    sweep.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut active: Vec<(f64, usize)> = vec![];

    for &(min_x, max_x, i) in sweep.iter() {
        active.retain(|&(active_max_x, _)| active_max_x >= min_x);

        for &(_, j) in active.iter() {
            if !adjacent(i, j) && segments_intersect(&points[i], &points[i + 1], &points[j], &points[j + 1]) {
                return true;
            }
        }

        active.push((max_x, i));
    }

    false
}

/// `true` iff `simplified` is no longer a usable replacement for `original`:
/// it lost its second endpoint, a closed arc stopped enclosing anything, or
/// it crosses itself where the original didn't.
fn is_oversimplified(original: &[Point], simplified: &[Point]) -> bool {
    if simplified.len() < 2 {
        return true;
    }

    if is_closed(original) && simplified.len() < 4 {
        return true;
    }

    simplified.len() < original.len() && self_intersects(simplified) && !self_intersects(original)
}

/// Returns a simpler version of one arc.
///
/// With `prevent_oversimplify`, an arc that simplification would collapse or
/// make self-intersecting keeps all its original points.
pub fn simplify_arc(points: &[Point], epsilon: f64, algorithm: SimplifyAlgorithm, prevent_oversimplify: bool) -> Vec<Point> {
    let simplified = simplify_points(points, epsilon, algorithm);

    if prevent_oversimplify && is_oversimplified(points, &simplified) {
        debug!("kept all {} points of an arc that would simplify to {}", points.len(), simplified.len());
        points.to_vec()
    } else {
        simplified
    }
}

/// Simplifies every arc in place.
pub fn simplify_arcs(arcs: &mut [Vec<Point>], epsilon: f64, algorithm: SimplifyAlgorithm, prevent_oversimplify: bool) {
    let before: usize = arcs.iter().map(|a| a.len()).sum();

    for arc in arcs.iter_mut() {
        let new_points = simplify_arc(&arc[..], epsilon, algorithm, prevent_oversimplify);
        *arc = new_points;
    }

    let after: usize = arcs.iter().map(|a| a.len()).sum();
    debug!("simplified {} arcs ({}) from {} to {} points", arcs.len(), algorithm, before, after);
}
