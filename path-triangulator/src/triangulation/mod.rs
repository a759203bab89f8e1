//------------------------------------------------------------------------------
// mod.rs
//------------------------------------------------------------------------------
// Provides the divide-and-conquer Delaunay triangulation, on top of which the
// constraint insertion and the trimming are built
//------------------------------------------------------------------------------

mod edge;
mod joint;
mod constraint;
mod traverse;

pub use edge::{EdgeId, NIL, sym};
pub use joint::*;

use crate::geometry::*;
use crate::ordered_float::OrderedFloat;
use edge::*;

// Determinant threshold of the in-circle test
const IN_CIRCLE_EPSILON: Coord = 1e-12;

// The algorithm is the one of Guibas and Stolfi, "Primitives for the
// manipulation of general subdivisions and the computation of Voronoi
// diagrams", over a half-edge mesh
#[derive(Default)]
pub struct DelaunayTriangulation {
    joints: Vec<DtJoint>,
    edges: EdgeArena,
    // One outgoing edge per joint, NIL for isolated joints
    anchors: Vec<EdgeId>,
    // Edges on the leftmost and the rightmost parts of the mesh
    range: Option<(EdgeId, EdgeId)>
}

impl DelaunayTriangulation {
    pub fn new() -> DelaunayTriangulation { Default::default() }

    // Sort the joints by x, then y. Joints repeating a point are dropped,
    // the first one with that point is kept
    pub fn initialize(&mut self, joints: impl IntoIterator<Item = DtJoint>) {
        self.clear();
        self.joints.extend(joints);
        self.joints.sort_by_key(|j| (OrderedFloat(j.point.x), OrderedFloat(j.point.y)));

        let before = self.joints.len();
        self.joints.dedup_by(|a, b| a.point == b.point);
        if self.joints.len() != before {
            warn!("Dropped {} joints sharing a point with another joint", before - self.joints.len());
        }

        self.anchors = vec![NIL; self.joints.len()];
    }

    pub fn run(&mut self) {
        let len = self.joints.len();
        if len < 2 {
            warn!("Cannot triangulate {} joint(s)", len);
            return;
        }

        self.range = Some(self.delaunay(0, len));
        debug!("Delaunay triangulation of {} joints: {} edges", len, self.edges.alive_count() / 2);

        #[cfg(debug_assertions)] self.check_linkage();
        self.dump();
    }

    // Destroys every edge and joint; safe to call on an empty triangulation
    pub fn clear(&mut self) {
        self.joints.clear();
        self.edges.clear();
        self.anchors.clear();
        self.range = None;
    }

    pub fn joints(&self) -> &[DtJoint] { &self.joints }
    pub fn edge_range(&self) -> Option<(EdgeId, EdgeId)> { self.range }

    // Inspection of the mesh
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ { self.edges.alive() }
    pub fn edge_count(&self) -> usize { self.edges.alive_count() / 2 }
    pub fn org(&self, e: EdgeId) -> Vec2 { self.joints[self.edges[e].org].point }
    pub fn dest(&self, e: EdgeId) -> Vec2 { self.joints[self.edges[e].dest].point }
    pub fn org_next(&self, e: EdgeId) -> EdgeId { self.edges.org_next(e) }
    pub fn left_next(&self, e: EdgeId) -> EdgeId { self.edges.next(e) }
    pub fn left_prev(&self, e: EdgeId) -> EdgeId { self.edges.prev(e) }
    pub fn is_constraint(&self, e: EdgeId) -> bool { self.edges[e].constraint }
    pub fn is_boundary(&self, e: EdgeId) -> bool { self.edges[e].boundary }

    // The joint sitting exactly on the point
    pub fn find_joint(&self, p: Vec2) -> Option<usize> {
        self.joints.binary_search_by(|j| lexicographic(&j.point, &p)).ok()
            .filter(|&i| self.joints[i].point == p)
    }

    // The edge going from the joint at p1 to the joint at p2
    pub fn find_edge(&self, p1: Vec2, p2: Vec2) -> Option<EdgeId> {
        let j1 = self.find_joint(p1)?;
        let j2 = self.find_joint(p2)?;
        self.find_edge_between(j1, j2)
    }

    fn find_edge_between(&self, j1: usize, j2: usize) -> Option<EdgeId> {
        let start = self.anchors[j1];
        if start == NIL { return None; }

        let mut e = start;
        loop {
            if self.edges[e].dest == j2 { return Some(e); }
            e = self.edges.org_next(e);
            if e == start { return None; }
        }
    }

    fn point(&self, j: usize) -> Vec2 { self.joints[j].point }

    fn ccw(&self, a: usize, b: usize, c: usize) -> bool {
        is_concave_angle(self.point(a), self.point(b), self.point(c))
    }

    fn left_of(&self, j: usize, e: EdgeId) -> bool { self.ccw(j, self.edges[e].org, self.edges[e].dest) }
    fn right_of(&self, j: usize, e: EdgeId) -> bool { self.ccw(j, self.edges[e].dest, self.edges[e].org) }

    // d lies inside the circle through a, b and c (given counter-clockwise)
    fn in_circle(&self, a: usize, b: usize, c: usize, d: usize) -> bool {
        if d == a || d == b || d == c { return false; }

        let pd = self.point(d);
        let pa = self.point(a) - pd;
        let pb = self.point(b) - pd;
        let pc = self.point(c) - pd;

        let det = pa.length_sq() * pb.cross(pc) + pb.length_sq() * pc.cross(pa) + pc.length_sq() * pa.cross(pb);
        det > IN_CIRCLE_EPSILON
    }

    // Mesh primitives, keeping the anchors up to date
    fn make_edge(&mut self, org: usize, dest: usize) -> EdgeId {
        let e = self.edges.make_pair(org, dest);
        if self.anchors[org] == NIL { self.anchors[org] = e; }
        if self.anchors[dest] == NIL { self.anchors[dest] = sym(e); }
        e
    }

    // A new edge from a.dest to b.org, with a, the new edge and b sharing the left face
    fn connect(&mut self, a: EdgeId, b: EdgeId) -> EdgeId {
        let e = self.make_edge(self.edges[a].dest, self.edges[b].org);
        let an = self.edges.next(a);
        self.edges.splice(e, an);
        self.edges.splice(sym(e), b);
        e
    }

    fn destroy(&mut self, e: EdgeId) {
        for &h in [e, sym(e)].iter() {
            let org = self.edges[h].org;
            if self.anchors[org] == h {
                let other = self.edges.org_next(h);
                self.anchors[org] = if other == h { NIL } else { other };
            }
        }

        let op = self.edges.org_prev(e);
        self.edges.splice(e, op);
        let sp = self.edges.org_prev(sym(e));
        self.edges.splice(sym(e), sp);
        self.edges.free_pair(e);
    }

    // Triangulate the sorted joints in [begin, end); returns the counter-clockwise
    // hull edge leaving the leftmost joint and the clockwise one leaving the rightmost
    fn delaunay(&mut self, begin: usize, end: usize) -> (EdgeId, EdgeId) {
        let len = end - begin;

        if len == 2 {
            let a = self.make_edge(begin, begin + 1);
            return (a, sym(a));
        }

        if len == 3 {
            let (s1, s2, s3) = (begin, begin + 1, begin + 2);
            let a = self.make_edge(s1, s2);
            let b = self.make_edge(s2, s3);
            self.edges.splice(sym(a), b);

            if self.ccw(s1, s2, s3) {
                self.connect(b, a);
                return (a, sym(b));
            }
            else if self.ccw(s1, s3, s2) {
                let c = self.connect(b, a);
                return (sym(c), c);
            }
            else { return (a, sym(b)); }
        }

        let mid = begin + len / 2;
        let (mut ldo, mut ldi) = self.delaunay(begin, mid);
        let (mut rdi, mut rdo) = self.delaunay(mid, end);

        // Lower common tangent of both hulls
        loop {
            if self.left_of(self.edges[rdi].org, ldi) { ldi = self.edges.next(ldi); }
            else if self.right_of(self.edges[ldi].org, rdi) { rdi = self.edges.right_prev(rdi); }
            else { break; }
        }

        let mut basel = self.connect(sym(rdi), ldi);
        if self.edges[ldi].org == self.edges[ldo].org { ldo = sym(basel); }
        if self.edges[rdi].org == self.edges[rdo].org { rdo = basel; }

        // Sew both halves together, from the bottom up
        loop {
            let mut lcand = self.edges.org_next(sym(basel));
            if self.valid(lcand, basel) {
                loop {
                    let next = self.edges.org_next(lcand);
                    if !self.in_circle(self.edges[basel].dest, self.edges[basel].org,
                        self.edges[lcand].dest, self.edges[next].dest) { break; }
                    self.destroy(lcand);
                    lcand = next;
                }
            }

            let mut rcand = self.edges.org_prev(basel);
            if self.valid(rcand, basel) {
                loop {
                    let prev = self.edges.org_prev(rcand);
                    if !self.in_circle(self.edges[basel].dest, self.edges[basel].org,
                        self.edges[rcand].dest, self.edges[prev].dest) { break; }
                    self.destroy(rcand);
                    rcand = prev;
                }
            }

            let lvalid = self.valid(lcand, basel);
            let rvalid = self.valid(rcand, basel);
            if !lvalid && !rvalid { break; }

            basel = if !lvalid || (rvalid && self.in_circle(self.edges[lcand].dest, self.edges[lcand].org,
                self.edges[rcand].org, self.edges[rcand].dest)) {
                self.connect(rcand, sym(basel))
            }
            else { self.connect(sym(basel), sym(lcand)) };
        }

        (ldo, rdo)
    }

    // The candidate rises above the base line
    fn valid(&self, e: EdgeId, basel: EdgeId) -> bool { self.right_of(self.edges[e].dest, basel) }

    // Checks the linkage of every edge, panicking on the first broken one
    pub fn check_linkage(&self) {
        for e in self.edges.alive() {
            let edge = &self.edges[e];
            assert!(self.edges.is_alive(edge.next) && self.edges.is_alive(edge.prev),
                "Edge {} links to a destroyed edge", e);
            assert_eq!(self.edges.prev(edge.next), e, "Broken next/prev pair at edge {}", e);
            assert_eq!(self.edges.next(edge.prev), e, "Broken prev/next pair at edge {}", e);
            assert_eq!(edge.dest, self.edges[edge.next].org, "Edge {} does not reach its successor", e);
            assert_eq!(edge.org, self.edges[edge.prev].dest, "Edge {} does not start at its predecessor", e);
            assert_eq!(edge.dest, self.edges[sym(e)].org, "Edge {} disagrees with its symmetric", e);
        }

        for (j, &a) in self.anchors.iter().enumerate() {
            assert!(a == NIL || (self.edges.is_alive(a) && self.edges[a].org == j), "Bad anchor for joint {}", j);
        }
    }

    #[cfg(feature = "debug_mesh")]
    fn dump(&self) {
        for e in self.edges.alive() {
            let edge = &self.edges[e];
            trace!("edge {}: {} -> {} (prev {}, next {}){}{}", e, self.point(edge.org), self.point(edge.dest),
                edge.prev, edge.next, if edge.constraint { " constraint" } else { "" },
                if edge.boundary { " boundary" } else { "" });
        }
    }

    #[cfg(not(feature = "debug_mesh"))]
    fn dump(&self) {}
}

#[cfg(test)]
mod test {
    use super::*;

    pub fn joints_of(points: &[(Coord, Coord)]) -> Vec<DtJoint> {
        points.iter().enumerate().map(|(i, &(x, y))| DtJoint::new(Vec2::new(x, y), Binding(i))).collect()
    }

    pub fn triangulate(points: &[(Coord, Coord)]) -> DelaunayTriangulation {
        let mut dt = DelaunayTriangulation::new();
        dt.initialize(joints_of(points));
        dt.run();
        dt
    }

    #[test]
    fn test_two_points() {
        let mut dt = triangulate(&[(0.0, 0.0), (1.0, 0.0)]);
        assert_eq!(dt.edge_count(), 1);
        assert!(dt.collect_triangles().is_empty());
    }

    #[test]
    fn test_clockwise_triangle_is_corrected() {
        let mut dt = triangulate(&[(0.0, 0.0), (1.0, -1.0), (2.0, 0.0)]);
        assert_eq!(dt.edge_count(), 3);
        assert_eq!(dt.collect_triangles().len(), 1);
        dt.check_linkage();
    }

    #[test]
    fn test_collinear_points() {
        let mut dt = triangulate(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        assert_eq!(dt.edge_count(), 3);
        assert!(dt.collect_triangles().is_empty());
    }

    #[test]
    fn test_square_and_center() {
        let mut dt = triangulate(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (5.0, 5.0)]);
        assert_eq!(dt.collect_triangles().len(), 4);
        assert!(dt.find_edge(Vec2::new(0.0, 0.0), Vec2::new(5.0, 5.0)).is_some());
        assert!(dt.find_edge(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0)).is_none());
    }

    #[test]
    fn test_duplicates_are_dropped() {
        let mut dt = triangulate(&[(0.0, 0.0), (4.0, 0.0), (0.0, 0.0), (2.0, 3.0)]);
        assert_eq!(dt.joints().len(), 3);
        assert_eq!(dt.joints()[0].binding, Binding(0));
        assert_eq!(dt.collect_triangles().len(), 1);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut dt = triangulate(&[(0.0, 0.0), (4.0, 0.0), (2.0, 3.0)]);
        dt.clear();
        dt.clear();
        assert_eq!(dt.edge_count(), 0);
        assert!(dt.edge_range().is_none());
    }
}
