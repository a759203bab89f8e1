//------------------------------------------------------------------------------
// traverse.rs
//------------------------------------------------------------------------------
// Removal of the triangles outside of the constraint loops, and the
// enumeration of the triangles left
//------------------------------------------------------------------------------

use super::*;

impl DelaunayTriangulation {
    // The left face of e is a counter-clockwise triangle, i.e. not the outer face
    fn is_inner_triangle(&self, e: EdgeId) -> bool {
        self.edges.is_triangle(e) && self.ccw(self.edges[e].org, self.edges[e].dest,
            self.edges[self.edges.prev(e)].org)
    }

    // One of the sides of e is the outer face of the mesh
    fn is_hull_edge(&self, e: EdgeId) -> bool {
        !self.is_inner_triangle(e) || !self.is_inner_triangle(sym(e))
    }

    // Remove every triangle on the left of the bound edges, spreading until
    // constraint edges are met. The bound edges become boundary edges
    pub fn trim(&mut self, bound: &[EdgeId]) {
        for &e in bound {
            self.edges[e].boundary = true;
            self.edges[sym(e)].boundary = true;
        }

        let mut doomed = Vec::new();
        let mut stack = Vec::new();
        for &e in bound {
            // Nothing to remove when the outside is already the outer face
            if !self.is_inner_triangle(e) { continue; }

            stack.push(self.edges.next(e));
            stack.push(self.edges.prev(e));
            while let Some(f) = stack.pop() {
                if self.edges[f].checked || self.edges[f].constraint { continue; }
                self.edges[f].checked = true;
                self.edges[sym(f)].checked = true;
                doomed.push(f);

                stack.push(self.edges.next(f));
                stack.push(self.edges.prev(f));
                stack.push(self.edges.next(sym(f)));
                stack.push(self.edges.prev(sym(f)));
            }
        }

        debug!("Trimming {} edges outside of {} bound edges", doomed.len(), bound.len());
        for f in doomed { self.destroy(f); }
        self.reset_traverse();

        // Keep the range pointing at live edges
        if let Some((left, right)) = self.range {
            if !self.edges.is_alive(left) || !self.edges.is_alive(right) {
                let fallback = self.edges.alive().find(|&e| self.edges[e].boundary || self.is_hull_edge(e));
                self.range = fallback.map(|e| {
                    let l = if self.edges.is_alive(left) { left } else { e };
                    let r = if self.edges.is_alive(right) { right } else { e };
                    (l, r)
                });
            }
        }

        #[cfg(debug_assertions)] self.check_linkage();
    }

    pub fn reset_traverse(&mut self) {
        let ids: Vec<_> = self.edges.alive().collect();
        for e in ids { self.edges[e].checked = false; }
    }

    // Visit every triangle once. Edges are marked along the way, so the
    // traversal must be reset before being run again
    pub fn traverse_triangles<F: FnMut(&DtTriangle)>(&mut self, mut visit: F) {
        let ids: Vec<_> = self.edges.alive().collect();
        for e in ids {
            if self.edges[e].checked { continue; }

            let e1 = self.edges.prev(e);
            let e2 = self.edges.next(e);
            let (j1, j2) = (self.edges[e].org, self.edges[e].dest);
            let j3 = self.edges[e1].org;
            if j3 != self.edges[e2].dest { continue; }
            if self.edges[e1].checked || self.edges[e2].checked { continue; }
            if !self.ccw(j1, j2, j3) { continue; }

            let bindings = [self.joints[j1].binding, self.joints[j2].binding, self.joints[j3].binding];
            if bindings[0] == bindings[1] || bindings[1] == bindings[2] || bindings[2] == bindings[0] { continue; }

            visit(&DtTriangle {
                bindings,
                boundary: [self.edges[e].boundary, self.edges[e2].boundary, self.edges[e1].boundary]
            });

            self.edges[e].checked = true;
            self.edges[e1].checked = true;
            self.edges[e2].checked = true;
        }
    }

    // All the triangles of the mesh. Triangles closed by boundary edges on
    // all three sides are triangular holes, kept only if nothing else is there
    pub fn collect_triangles(&mut self) -> Vec<DtTriangle> {
        let mut triangles = Vec::new();
        let mut enclosed = Vec::new();

        self.reset_traverse();
        self.traverse_triangles(|t| {
            if t.is_all_boundary() { enclosed.push(*t); } else { triangles.push(*t); }
        });
        self.reset_traverse();

        if triangles.is_empty() {
            if let Some(&t) = enclosed.first() { triangles.push(t); }
        }
        else if !enclosed.is_empty() {
            debug!("Dropped {} triangles enclosed by boundary edges", enclosed.len());
        }

        triangles
    }
}
