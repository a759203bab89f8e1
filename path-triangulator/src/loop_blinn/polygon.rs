//--------------------------------------------------------------------
// polygon.rs
//--------------------------------------------------------------------
// A boundary loop with its holes, and the constrained triangulation
// built over their joints
//--------------------------------------------------------------------

use crate::geometry::*;
use crate::triangulation::*;
use crate::rtree::SpanTree;
use super::graph::*;
use super::span::SpanId;

pub struct LbPolygon {
    boundary: LineId,
    holes: Vec<LineId>,
    // The boundary sampled along its curves, for the inside test
    outline: Vec<Vec2>,
    spans: SpanTree<SpanId>,
    cdt: DelaunayTriangulation,
    triangles: Vec<DtTriangle>
}

impl LbPolygon {
    pub fn new(graph: &JointGraph, boundary: LineId) -> LbPolygon {
        LbPolygon {
            boundary,
            holes: Vec::new(),
            outline: graph.flatten_loop(boundary),
            spans: SpanTree::new(),
            cdt: DelaunayTriangulation::new(),
            triangles: Vec::new()
        }
    }

    pub fn boundary(&self) -> LineId { self.boundary }
    pub fn holes(&self) -> &[LineId] { &self.holes }
    pub fn add_hole(&mut self, start: LineId) { self.holes.push(start); }

    // The boundary first, then the holes
    pub fn loops(&self) -> impl Iterator<Item = LineId> + '_ {
        std::iter::once(self.boundary).chain(self.holes.iter().cloned())
    }

    pub fn is_inside(&self, p: Vec2) -> bool { point_in_polygon(p, &self.outline) }

    pub fn span_index(&self) -> &SpanTree<SpanId> { &self.spans }
    pub fn span_index_mut(&mut self) -> &mut SpanTree<SpanId> { &mut self.spans }

    pub fn cdt(&self) -> &DelaunayTriangulation { &self.cdt }
    pub fn triangles(&self) -> &[DtTriangle] { &self.triangles }

    // Each joint is bound to its id in the graph
    fn create_dt_joints(&self, graph: &JointGraph) -> Vec<DtJoint> {
        self.loops().flat_map(|start| graph.loop_joints(start))
            .map(|j| DtJoint::new(graph.point(j), Binding(j)))
            .collect()
    }

    pub fn build_cdt(&mut self, graph: &JointGraph) {
        let joints = self.create_dt_joints(graph);
        self.cdt.initialize(joints);
        self.cdt.run();
        self.pack_constraints(graph);
        self.triangles = self.cdt.collect_triangles();
        debug!("Polygon with {} holes triangulated into {} triangles", self.holes.len(), self.triangles.len());
    }

    // Force the outline of every span into the triangulation, trim what lies
    // outside, then separate each curve triangle from the rest
    fn pack_constraints(&mut self, graph: &JointGraph) {
        let mut bound = Vec::new();
        let mut pack = Vec::new();

        let loops: Vec<_> = self.loops().collect();
        for start in loops {
            for span in graph.loop_spans(start) {
                let p = graph.span_points(span);
                let (edges, inner) = match span {
                    SpanLines::Linear(_) => (vec![(p[0], p[1])], vec![]),
                    SpanLines::Quadratic(..) => quadratic_constraints(p[0], p[1], p[2]),
                    SpanLines::Cubic(..) => cubic_constraints(p[0], p[1], p[2], p[3])
                };

                for (a, b) in edges {
                    if let Some(pieces) = self.cdt.add_constraint_split(a, b) { bound.extend(pieces); }
                }
                pack.extend(inner);
            }
        }

        if bound.is_empty() {
            warn!("No boundary constraint could be inserted");
            return;
        }

        self.cdt.trim(&bound);
        for (a, b) in pack { self.cdt.add_constraint_split(a, b); }
    }
}

type Segments = Vec<(Vec2, Vec2)>;

// A convex curve keeps its control polygon as the boundary and its chord
// separates it from the inside; a concave one uses the chord as the boundary
fn quadratic_constraints(p1: Vec2, p2: Vec2, p3: Vec2) -> (Segments, Segments) {
    if !is_concave_angle(p1, p2, p3) { (vec![(p1, p2), (p2, p3)], vec![(p1, p3)]) }
    else { (vec![(p1, p3)], vec![(p1, p2), (p2, p3)]) }
}

fn cubic_constraints(p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2) -> (Segments, Segments) {
    match cubic_inflections(p1, p2, p3, p4).len() {
        0 => if !is_concave_angle(p1, p2, p4) {
            (vec![(p1, p2), (p2, p3), (p3, p4)], vec![(p1, p4)])
        } else {
            (vec![(p1, p4)], vec![(p1, p2), (p2, p3), (p3, p4)])
        },
        1 => if !is_concave_angle(p1, p2, p3) {
            (vec![(p1, p2), (p2, p4)], vec![(p1, p3), (p3, p4)])
        } else {
            (vec![(p1, p3), (p3, p4)], vec![(p1, p2), (p2, p4)])
        },
        _ => if !is_concave_angle(p1, p2, p4) {
            (vec![(p1, p3), (p3, p2), (p2, p4)], vec![(p1, p4)])
        } else {
            (vec![(p1, p4)], vec![(p1, p3), (p3, p2), (p2, p4)])
        }
    }
}
