//------------------------------------------------------------------------------
// edge.rs
//------------------------------------------------------------------------------
// The half-edges of the triangulation mesh, stored in pairs inside an arena.
// The two halves of a pair are each other's symmetric (e ^ 1); next and prev
// walk around the face on the left of the edge
//------------------------------------------------------------------------------

use std::ops::{Index, IndexMut};

pub type EdgeId = usize;
pub const NIL: EdgeId = std::usize::MAX;

#[derive(Clone, Debug)]
pub struct DtEdge {
    pub org: usize, pub dest: usize,
    pub prev: EdgeId, pub next: EdgeId,

    // Forced by the caller, never removed by legalization
    pub constraint: bool,
    // Marked by trim, the outside of the mesh is on its left
    pub boundary: bool,
    // Scratch flag used by the traversals
    pub checked: bool,

    alive: bool
}

impl DtEdge {
    fn new(org: usize, dest: usize, sym: EdgeId) -> DtEdge {
        DtEdge { org, dest, prev: sym, next: sym, constraint: false, boundary: false, checked: false, alive: true }
    }
}

#[inline]
pub fn sym(e: EdgeId) -> EdgeId { e ^ 1 }

#[derive(Default)]
pub struct EdgeArena {
    edges: Vec<DtEdge>,
    free: Vec<EdgeId>
}

impl EdgeArena {
    pub fn new() -> EdgeArena { Default::default() }

    // A lone edge from org to dest. Each half is the other one's prev and next
    pub fn make_pair(&mut self, org: usize, dest: usize) -> EdgeId {
        let e = match self.free.pop() {
            Some(e) => e,
            None => {
                let e = self.edges.len();
                self.edges.push(DtEdge::new(0, 0, NIL));
                self.edges.push(DtEdge::new(0, 0, NIL));
                e
            }
        };

        self.edges[e] = DtEdge::new(org, dest, e + 1);
        self.edges[e + 1] = DtEdge::new(dest, org, e);
        e
    }

    // The pair must already be unlinked from the mesh
    pub fn free_pair(&mut self, e: EdgeId) {
        let base = e & !1;
        debug_assert!(self.edges[base].alive, "Edge {} freed twice", base);
        self.edges[base].alive = false;
        self.edges[base + 1].alive = false;
        self.free.push(base);
    }

    pub fn is_alive(&self, e: EdgeId) -> bool { e < self.edges.len() && self.edges[e].alive }

    pub fn alive(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.iter().enumerate().filter(|(_, e)| e.alive).map(|(i, _)| i)
    }

    pub fn alive_count(&self) -> usize { self.edges.iter().filter(|e| e.alive).count() }

    pub fn clear(&mut self) {
        self.edges.clear();
        self.free.clear();
    }

    // Navigation: rotations around the origin and the destination, and walks
    // around the left and right faces
    pub fn next(&self, e: EdgeId) -> EdgeId { self.edges[e].next }
    pub fn prev(&self, e: EdgeId) -> EdgeId { self.edges[e].prev }
    pub fn org_next(&self, e: EdgeId) -> EdgeId { sym(self.prev(e)) }
    pub fn org_prev(&self, e: EdgeId) -> EdgeId { self.next(sym(e)) }
    pub fn right_prev(&self, e: EdgeId) -> EdgeId { sym(self.prev(sym(e))) }

    // Exchange the rings of a and b: joins them if they are apart,
    // separates them if they are together
    pub fn splice(&mut self, a: EdgeId, b: EdgeId) {
        let pa = self.edges[a].prev;
        let pb = self.edges[b].prev;
        self.edges[pa].next = b;
        self.edges[pb].next = a;
        self.edges[a].prev = pb;
        self.edges[b].prev = pa;
    }

    // The left face of e is a triangle
    pub fn is_triangle(&self, e: EdgeId) -> bool {
        let n = self.next(e);
        self.next(self.next(n)) == e && self.edges[self.prev(e)].org == self.edges[n].dest
    }
}

impl Index<EdgeId> for EdgeArena {
    type Output = DtEdge;
    fn index(&self, e: EdgeId) -> &DtEdge { &self.edges[e] }
}

impl IndexMut<EdgeId> for EdgeArena {
    fn index_mut(&mut self, e: EdgeId) -> &mut DtEdge { &mut self.edges[e] }
}
