//--------------------------------------------------------------------
// span.rs
//--------------------------------------------------------------------
// The spans stored in the span index of a polygon
//--------------------------------------------------------------------

use crate::geometry::*;
use super::graph::*;

pub type SpanId = usize;

#[derive(Copy, Clone, Debug)]
pub struct Span {
    pub lines: SpanLines,
    // Cached when the span is set up, so the index can find it again
    pub rect: Rect,
    // How many bisections led to this span
    pub depth: usize
}

impl Span {
    pub fn new(graph: &JointGraph, lines: SpanLines, depth: usize) -> Span {
        let rect = span_rect(graph, lines);
        Span { lines, rect, depth }
    }

    pub fn refresh(&mut self, graph: &JointGraph) { self.rect = span_rect(graph, self.lines); }

    pub fn area(&self) -> Coord { self.rect.area() }

    pub fn can_split(&self, max_depth: usize) -> bool { !self.lines.is_linear() && self.depth < max_depth }

    // The control polygons cross somewhere other than at a shared endpoint.
    // Two straight lines never overlap
    pub fn is_overlapped(&self, other: &Span, graph: &JointGraph) -> bool {
        if self.lines.is_linear() && other.lines.is_linear() { return false; }

        let p = graph.span_points(self.lines);
        let q = graph.span_points(other.lines);
        p.windows(2).any(|a| q.windows(2).any(|b| segments_cross(a[0], a[1], b[0], b[1])))
    }
}

pub fn span_rect(graph: &JointGraph, lines: SpanLines) -> Rect {
    let points = graph.span_points(lines);
    Rect::enclosing_rect(points.iter().cloned())
        .unwrap_or_else(|| Rect::enclosing_rect_of_two_points(points[0], points[0]))
}

#[cfg(test)]
mod test {
    use super::*;

    fn v(x: Coord, y: Coord) -> Vec2 { Vec2::new(x, y) }

    fn chain(graph: &mut JointGraph, points: &[(Coord, Coord, bool)]) -> SpanLines {
        let joints: Vec<_> = points.iter().map(|&(x, y, c)| {
            if c { graph.create_control_joint(v(x, y)) } else { graph.create_end_joint(v(x, y)) }
        }).collect();
        let lines: Vec<_> = joints.windows(2).map(|w| {
            let l = graph.create_line();
            graph.connect(w[0], l, w[1]);
            l
        }).collect();

        match lines.len() {
            1 => SpanLines::Linear(lines[0]),
            2 => SpanLines::Quadratic(lines[0], lines[1]),
            _ => SpanLines::Cubic(lines[0], lines[1], lines[2])
        }
    }

    #[test]
    fn test_rect_and_overlap() {
        let mut graph = JointGraph::new();
        let quad = chain(&mut graph, &[(0.0, 0.0, false), (5.0, 10.0, true), (10.0, 0.0, false)]);
        let line = chain(&mut graph, &[(0.0, 5.0, false), (10.0, 5.0, false)]);
        let far = chain(&mut graph, &[(20.0, 0.0, false), (30.0, 0.0, false)]);

        let sq = Span::new(&graph, quad, 0);
        let sl = Span::new(&graph, line, 0);
        let sf = Span::new(&graph, far, 0);
        assert_eq!(sq.rect, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_abs_diff_eq!(sq.area(), 100.0);

        assert!(sq.is_overlapped(&sl, &graph));
        assert!(sl.is_overlapped(&sq, &graph));
        assert!(!sq.is_overlapped(&sf, &graph));
        assert!(!sl.is_overlapped(&sf, &graph));

        assert!(sq.can_split(8));
        assert!(!sq.can_split(0));
        assert!(!sl.can_split(8));
    }

    #[test]
    fn test_shared_endpoint_is_no_overlap() {
        let mut graph = JointGraph::new();
        let q1 = chain(&mut graph, &[(0.0, 0.0, false), (5.0, 10.0, true), (10.0, 0.0, false)]);
        let q2 = chain(&mut graph, &[(10.0, 0.0, false), (15.0, 10.0, true), (20.0, 0.0, false)]);
        let (s1, s2) = (Span::new(&graph, q1, 0), Span::new(&graph, q2, 0));
        assert!(s1.rect.intersects(s2.rect));
        assert!(!s1.is_overlapped(&s2, &graph));
    }
}
