use crate::geo::Point;

fn triangle_area(a: &Point, b: &Point, c: &Point) -> f64 {
    ((b.0 - a.0) * (c.1 - a.1) - (c.0 - a.0) * (b.1 - a.1)).abs() / 2.0
}

#[derive(Debug)]
struct Vertex {
    /// The vertex's place in space.
    point: Point,

    /// The "importance" of the vertex. This is the "output" of Visvalingam and
    /// Whyatt's algorithm. We'll only keep vertices above a certain weight.
    /// (The first and last vertex have infinite weight.)
    weight: f64,

    /// Position in the binary heap (minimum weight first).
    heap_index: usize,

    /// Neighbors in the linked list of unvisited vertices, in order.
    ///
    /// When we remove a vertex from the heap and linked list, we'll
    /// recalculate the weights of its neighbors.
    previous: Option<usize>,
    next: Option<usize>,
}

/// A min-heap of vertex indexes, plus the vertices themselves.
#[derive(Debug)]
struct VertexHeap {
    vertices: Vec<Vertex>,
    heap: Vec<usize>,
}

fn parent(i: usize) -> usize {
    (i - 1) / 2
}

fn left_child(i: usize) -> usize {
    2 * i + 1
}

impl<'a> From<&'a [Point]> for VertexHeap {
    fn from(points: &'a [Point]) -> VertexHeap {
        let len = points.len();

        let vertices: Vec<Vertex> = points.iter().enumerate()
            .map(|(i, &p)| Vertex {
                point: p,
                weight: if i == 0 || i == len - 1 {
                    f64::INFINITY
                } else {
                    triangle_area(&points[i - 1], &p, &points[i + 1])
                },
                heap_index: 0,
                previous: if i == 0 { None } else { Some(i - 1) },
                next: if i + 1 == len { None } else { Some(i + 1) },
            })
            .collect();

        let heap = if len > 2 { (1 .. len - 1).collect() } else { vec![] };

        let mut ret = VertexHeap {
            vertices: vertices,
            heap: heap,
        };
        ret.heapify();
        ret
    }
}

impl VertexHeap {
    fn weight_at(&self, heap_index: usize) -> f64 {
        self.vertices[self.heap[heap_index]].weight
    }

    fn heapify(&mut self) {
        for i in 0 .. self.heap.len() {
            let v = self.heap[i];
            self.vertices[v].heap_index = i;
        }

        // https://en.wikipedia.org/wiki/Heapsort
        for start in (0 .. self.heap.len() / 2).rev() {
            self.sift_down(start);
        }
    }

    fn sift_down(&mut self, start: usize) {
        let len = self.heap.len();
        let mut root = start;

        while left_child(root) < len {
            let child = left_child(root);
            let mut swap = root;

            if self.weight_at(child) < self.weight_at(swap) {
                swap = child;
            }

            if child + 1 < len && self.weight_at(child + 1) < self.weight_at(swap) {
                swap = child + 1;
            }

            if swap == root {
                // root holds smallest element
                return;
            }

            self.swap(root, swap);
            root = swap;
        }
    }

    fn sift_up(&mut self, end: usize) {
        let mut child = end;

        while child > 0 {
            let parent = parent(child);
            if self.weight_at(child) < self.weight_at(parent) {
                self.swap(parent, child);
                child = parent;
            } else {
                return;
            }
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        let (va, vb) = (self.heap[a], self.heap[b]);
        self.vertices[va].heap_index = a;
        self.vertices[vb].heap_index = b;
    }

    /// Removes and returns the smallest-weight vertex in the heap.
    fn pop(&mut self) -> Option<usize> {
        if self.heap.is_empty() {
            return None;
        }

        let last = self.heap.len() - 1;
        self.swap(0, last);
        let top = self.heap.pop();
        self.sift_down(0);
        top
    }

    /// Removes the vertex from the linked list and re-weighs its neighbors.
    fn unlink(&mut self, index: usize) {
        let previous = self.vertices[index].previous;
        let next = self.vertices[index].next;

        if let Some(p) = previous {
            self.vertices[p].next = next;
        }
        if let Some(n) = next {
            self.vertices[n].previous = previous;
        }

        if let Some(p) = previous {
            self.recalculate_weight(p);
        }
        if let Some(n) = next {
            self.recalculate_weight(n);
        }
    }

    /// Changes the weight of the vertex, and adjusts the heap to match.
    ///
    /// Call this after tweaking the linked list of vertices.
    fn recalculate_weight(&mut self, index: usize) {
        let (previous, next) = match (self.vertices[index].previous, self.vertices[index].next) {
            (Some(p), Some(n)) => (p, n),
            // First or last vertex. Its weight can't change.
            _ => return,
        };

        let new_weight = triangle_area(&self.vertices[previous].point, &self.vertices[index].point, &self.vertices[next].point);
        let old_weight = self.vertices[index].weight;
        let heap_index = self.vertices[index].heap_index;
        self.vertices[index].weight = new_weight;

        if new_weight < old_weight {
            self.sift_up(heap_index);
        } else if new_weight > old_weight {
            self.sift_down(heap_index);
        }
    }

    /// Returns only the points worth keeping.
    ///
    /// Modifies self.vertices[*].weight using a priority queue:
    ///
    /// 1. remove the smallest-weight vertex: its weight is correct
    /// 2. recalculate the weights of the vertices before and after it,
    ///    now that it's gone
    /// 3. repeat until we know all the remaining vertices' weights are large
    ///    enough to keep.
    fn visvalingam_whyatt(&mut self, epsilon: f64) -> Vec<Point> {
        let mut last_weight = 0.0; // weight of previously-eliminated vertex

        while let Some(index) = self.pop() {
            // If its area is less than that of the last vertex to be
            // eliminated, use the latter's area instead. (This ensures that
            // the current vertex cannot be eliminated without eliminating
            // previously eliminated vertices.)
            let weight = self.vertices[index].weight.max(last_weight);
            self.vertices[index].weight = weight;

            if weight >= epsilon {
                // Every vertex still in the heap weighs at least this much:
                // we're keeping all of them.
                break;
            }

            last_weight = weight;
            self.unlink(index);
        }

        self.vertices.iter()
            .filter(|v| v.weight >= epsilon)
            .map(|v| v.point)
            .collect()
    }
}

/// Returns a simpler version of the given points, removing every point whose
/// effective triangle area is below `epsilon`.
///
/// The first and last points always stay.
pub fn visvalingam_whyatt(points: &[Point], epsilon: f64) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    VertexHeap::from(points).visvalingam_whyatt(epsilon)
}
