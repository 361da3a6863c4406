use crate::geo::Point;

/// Returns the distance from `p` to the segment `a`-`b`.
fn segment_distance(p: &Point, a: &Point, b: &Point) -> f64 {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    let length2 = dx * dx + dy * dy;

    let (x, y) = if length2 == 0.0 {
        // closed arc: the "chord" is a single point
        (a.0, a.1)
    } else {
        let t = (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / length2).max(0.0).min(1.0);
        (a.0 + t * dx, a.1 + t * dy)
    };

    ((p.0 - x).powi(2) + (p.1 - y).powi(2)).sqrt()
}

/// Returns a simpler version of the given points: a point stays only if it
/// is at least `epsilon` away from the chord that would replace it.
///
/// The first and last points always stay.
pub fn douglas_peucker(points: &[Point], epsilon: f64) -> Vec<Point> {
    let len = points.len();

    if len < 3 {
        return points.to_vec();
    }

    let mut keep = vec![false; len];
    keep[0] = true;
    keep[len - 1] = true;

    // Recursion, with an explicit stack so long arcs can't overflow ours.
    let mut stack = vec![ (0, len - 1) ];

    while let Some((first, last)) = stack.pop() {
        let mut max_distance = -1.0;
        let mut farthest = first;

        for i in first + 1 .. last {
            let d = segment_distance(&points[i], &points[first], &points[last]);
            if d > max_distance {
                max_distance = d;
                farthest = i;
            }
        }

        if farthest != first && max_distance >= epsilon {
            keep[farthest] = true;
            stack.push((first, farthest));
            stack.push((farthest, last));
        }
    }

    points.iter().zip(keep)
        .filter(|&(_, k)| k)
        .map(|(&p, _)| p)
        .collect()
}
