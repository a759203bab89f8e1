//------------------------------------------------------------------------------
// constraint.rs
//------------------------------------------------------------------------------
// Forces edges into the triangulation: the edges crossed by the new segment
// are removed and the two holes left on each side are triangulated again
//------------------------------------------------------------------------------

use super::*;

// Signed area of the parallelogram a, b, c
fn orient(a: Vec2, b: Vec2, c: Vec2) -> Coord { (b - a).cross(c - a) }

enum Walk {
    // The segment runs along an existing edge
    Along(EdgeId),
    // The segment crosses these edges, then reaches `end`. `entry` arrives at
    // the start joint and `exit` leaves `end`, both on the left of the segment
    Across { entry: EdgeId, exit: EdgeId, crossed: Vec<EdgeId>, end: usize }
}

impl DelaunayTriangulation {
    // Force an edge between the joints sitting on p1 and p2. Returns the
    // edge leaving p1, or None when there is no such pair of joints
    pub fn add_constraint(&mut self, p1: Vec2, p2: Vec2) -> Option<EdgeId> {
        self.add_constraint_split(p1, p2).map(|pieces| pieces[0])
    }

    // Same as above, but a segment passing exactly over other joints is made
    // of several edges, all of which are returned in order
    pub fn add_constraint_split(&mut self, p1: Vec2, p2: Vec2) -> Option<Vec<EdgeId>> {
        let (j1, j2) = match (self.find_joint(p1), self.find_joint(p2)) {
            (Some(j1), Some(j2)) if j1 != j2 => (j1, j2),
            _ => {
                warn!("Constraint {} -> {} does not join two distinct joints", p1, p2);
                return None;
            }
        };

        let result = self.insert_constraint(j1, j2);
        if result.is_none() { warn!("Could not insert the constraint {} -> {}", p1, p2); }

        #[cfg(feature = "debug_mesh")] {
            self.check_linkage();
            self.dump();
        }

        result
    }

    fn insert_constraint(&mut self, from: usize, to: usize) -> Option<Vec<EdgeId>> {
        let mut pieces = Vec::new();
        let mut from = from;

        // Each pass reaches either the target or a joint lying on the segment
        while from != to {
            let (e, end) = match self.walk(from, to)? {
                Walk::Along(e) => (e, self.edges[e].dest),
                Walk::Across { entry, exit, crossed, end } => (self.cut(entry, exit, crossed), end)
            };

            self.edges[e].constraint = true;
            self.edges[sym(e)].constraint = true;
            pieces.push(e);
            from = end;
        }

        Some(pieces)
    }

    // Walk the triangles from `from` towards `to`
    fn walk(&self, from: usize, to: usize) -> Option<Walk> {
        let p1 = self.point(from);
        let p2 = self.point(to);
        let len = (p2 - p1).length();
        let on_line = |p: Vec2| (orient(p1, p2, p) / len).fuzzy_zero();

        let start = self.anchors[from];
        if start == NIL { return None; }

        // An edge already going in the direction of the segment
        let mut e = start;
        loop {
            let pb = self.point(self.edges[e].dest);
            if on_line(pb) && (p2 - p1).dot(pb - p1) > 0.0 { return Some(Walk::Along(e)); }
            e = self.edges.org_next(e);
            if e == start { break; }
        }

        // Otherwise, the triangle around `from` the segment goes into
        let mut entry = NIL;
        loop {
            if self.edges.is_triangle(e) {
                let pb = self.point(self.edges[e].dest);
                let pc = self.point(self.edges[self.edges.prev(e)].org);
                if orient(p1, pb, pc) > 0.0 && orient(p1, pb, p2) > 0.0 && orient(p1, pc, p2) < 0.0 {
                    entry = e;
                    break;
                }
            }
            e = self.edges.org_next(e);
            if e == start { break; }
        }
        if entry == NIL { return None; }

        // Crossed edges always go from the right of the segment to its left
        let mut x = self.edges.next(entry);
        let mut crossed = vec![x];
        for _ in 0..self.edges.alive_count() {
            let y = sym(x);
            if !self.edges.is_triangle(y) { return None; }

            let o = self.edges[self.edges.next(y)].dest;
            if o == to || on_line(self.point(o)) {
                return Some(Walk::Across { entry: self.edges.prev(entry), exit: self.edges.prev(y), crossed, end: o });
            }

            let o_left = orient(p1, p2, self.point(o)) > 0.0;
            let yd_left = orient(p1, p2, self.point(self.edges[y].dest)) > 0.0;
            x = if o_left != yd_left { self.edges.next(y) } else { self.edges.prev(y) };
            crossed.push(x);
        }

        None
    }

    // Remove the crossed edges and join both ends through the opened polygon
    fn cut(&mut self, entry: EdgeId, exit: EdgeId, crossed: Vec<EdgeId>) -> EdgeId {
        for x in crossed {
            if self.edges[x].constraint {
                warn!("Constraint {} -> {} is crossed by another constraint and removed", self.org(x), self.dest(x));
            }
            self.destroy(x);
        }

        let cut = self.connect(entry, exit);
        self.shrink(cut);
        self.shrink(sym(cut));
        cut
    }

    // Triangulate the polygon on the left of base. Each step picks the joint
    // whose circle through base holds no other joint of the polygon
    fn shrink(&mut self, base: EdgeId) {
        let mut stack = vec![base];

        while let Some(base) = stack.pop() {
            let first = self.edges.next(base);
            let last = self.edges.prev(base);
            if self.edges.next(first) == last { continue; }

            let (a, b) = (self.edges[base].org, self.edges[base].dest);
            let mut best = first;
            let mut e = self.edges.next(first);
            while e != last {
                if self.in_circle(a, b, self.edges[best].dest, self.edges[e].dest) { best = e; }
                e = self.edges.next(e);
            }

            // Split off the part after the chosen joint
            if self.edges.next(best) != last {
                let e1 = self.connect(best, base);
                stack.push(sym(e1));
            }

            // ...and the part before it
            if best != first {
                let last = self.edges.prev(base);
                let e2 = self.connect(base, last);
                stack.push(sym(e2));
            }
        }
    }
}
