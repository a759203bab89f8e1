//--------------------------------------------------------------------
// triangle.rs
//--------------------------------------------------------------------
// A triangle of the decomposition as seen by the batcher: its render
// mode, per-vertex attributes and the shrunk copy used for overlap
//--------------------------------------------------------------------

use crate::arrayvec::ArrayVec;
use crate::geometry::*;
use crate::loop_blinn::{JointGraph, JointId, JointKind};

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct BatchVertex {
    pub position: Vec2,
    pub klm: Vec3
}

#[derive(Clone, Debug)]
pub struct BatchTriangle {
    pub joints: [JointId; 3],
    pub vertices: [BatchVertex; 3],
    pub curved: bool,
    pub z: i32,
    rect: Rect,
    reduced: [Vec2; 3]
}

impl BatchTriangle {
    pub fn new(graph: &JointGraph, joints: [JointId; 3], z: i32, reduce_offset: Coord) -> BatchTriangle {
        let points = [graph.point(joints[0]), graph.point(joints[1]), graph.point(joints[2])];
        let span = decide(graph, joints);

        let mut vertices = [BatchVertex { position: Vec2::zero(), klm: Vec3::zero() }; 3];
        for i in 0..3 {
            vertices[i].position = points[i];
            if let Some(span) = &span { vertices[i].klm = vertex_klm(graph, span, joints[i]); }
        }

        BatchTriangle {
            joints,
            vertices,
            curved: span.is_some(),
            z,
            rect: Rect::enclosing_rect(points.iter().cloned()).unwrap_or_else(|| Rect::new(0.0, 0.0, 0.0, 0.0)),
            reduced: reduce(points, reduce_offset)
        }
    }

    pub fn rect(&self) -> Rect { self.rect }
    pub fn points(&self) -> [Vec2; 3] { [self.vertices[0].position, self.vertices[1].position, self.vertices[2].position] }
    pub fn reduced_points(&self) -> &[Vec2; 3] { &self.reduced }

    // Checked on the shrunk triangles, so sharing an edge or a vertex is fine
    pub fn is_overlapped(&self, other: &BatchTriangle) -> bool {
        let [p1, p2, p3] = self.reduced;
        let [q1, q2, q3] = other.reduced;
        self.reduced.iter().any(|&p| point_in_triangle(p, q1, q2, q3)) ||
            other.reduced.iter().any(|&q| point_in_triangle(q, p1, p2, p3))
    }
}

// Move each vertex by `offset` along the bisector of its inner angle
fn reduce(p: [Vec2; 3], offset: Coord) -> [Vec2; 3] {
    let v = [(p[1] - p[0]).normalized(), (p[2] - p[1]).normalized(), (p[0] - p[2]).normalized()];
    let mut reduced = p;
    for i in 0..3 {
        let (incoming, outgoing) = (v[(i + 2) % 3], v[i]);
        reduced[i] = p[i] + offset * (outgoing - incoming).normalized();
    }
    reduced
}

// The joints of the curve a triangle belongs to, if all three of its joints
// lie on the span of the same control joint
pub fn decide(graph: &JointGraph, joints: [JointId; 3]) -> Option<ArrayVec<[JointId; 4]>> {
    let ctl = *joints.iter().find(|&&j| graph.is_control(j))?;

    let prev = graph.prev_joint(ctl);
    let next = graph.next_joint(ctl);
    let mut span = ArrayVec::new();
    if graph.is_control(prev) {
        span.push(graph.prev_joint(prev));
        span.push(prev);
        span.push(ctl);
        span.push(next);
    }
    else if graph.is_control(next) {
        span.push(prev);
        span.push(ctl);
        span.push(next);
        span.push(graph.next_joint(next));
    }
    else {
        span.push(prev);
        span.push(ctl);
        span.push(next);
    }

    if joints.iter().all(|j| span.contains(j)) { Some(span) } else { None }
}

// An end joint carries the coordinates of both spans it touches
fn vertex_klm(graph: &JointGraph, span: &[JointId], j: JointId) -> Vec3 {
    match graph.joint(j).kind {
        JointKind::Control { klm } => klm,
        JointKind::End { klm } => if j == span[0] { klm[1] } else { klm[0] }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn v(x: Coord, y: Coord) -> Vec2 { Vec2::new(x, y) }

    fn triangle(graph: &mut JointGraph, pts: [(Coord, Coord); 3]) -> BatchTriangle {
        let joints = [
            graph.create_end_joint(v(pts[0].0, pts[0].1)),
            graph.create_end_joint(v(pts[1].0, pts[1].1)),
            graph.create_end_joint(v(pts[2].0, pts[2].1))
        ];
        BatchTriangle::new(graph, joints, 0, 0.1)
    }

    #[test]
    fn test_reduced_points_move_inwards() {
        let mut graph = JointGraph::new();
        let t = triangle(&mut graph, [(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)]);
        let [a, b, c] = t.points();
        for &r in t.reduced_points().iter() {
            assert!(point_in_triangle(r, a, b, c), "Reduced point {} is not inside", r);
        }

        let r = t.reduced_points()[0];
        assert_abs_diff_eq!(r.length(), 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(r.x, r.y, epsilon = 1e-12);
        assert!(!t.curved);
        assert!(t.vertices.iter().all(|v| v.klm == Vec3::zero()));
    }

    #[test]
    fn test_overlap() {
        let mut graph = JointGraph::new();
        let t1 = triangle(&mut graph, [(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)]);
        let t2 = triangle(&mut graph, [(10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let t3 = triangle(&mut graph, [(1.0, 1.0), (4.0, 1.0), (1.0, 4.0)]);
        let t4 = triangle(&mut graph, [(-5.0, -5.0), (20.0, -5.0), (-5.0, 20.0)]);

        assert!(!t1.is_overlapped(&t2) && !t2.is_overlapped(&t1));
        assert!(t1.is_overlapped(&t3) && t3.is_overlapped(&t1));
        // Enclosed without any vertex of it inside the other
        assert!(t1.is_overlapped(&t4) && t4.is_overlapped(&t1));
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let mut graph = JointGraph::new();
        let big = triangle(&mut graph, [(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)]);
        // Only the second vertex of the spike lies inside the big triangle
        let spike = triangle(&mut graph, [(20.0, 3.0), (2.0, 2.0), (20.0, 2.5)]);

        assert!(big.is_overlapped(&spike));
        assert!(spike.is_overlapped(&big));
    }
}
