//--------------------------------------------------------------------
// graph.rs
//--------------------------------------------------------------------
// The joints and lines of the decomposed path. Each subpath is a
// circular chain joint -> line -> joint -> ... stored in two arenas
//--------------------------------------------------------------------

use crate::arrayvec::ArrayVec;
use crate::derive_more::*;
use crate::geometry::*;
use crate::curve::*;

pub type JointId = usize;
pub type LineId = usize;

#[derive(Copy, Clone, PartialEq, Debug)]
pub enum JointKind {
    // Index 0 holds the coordinates for the span that ends at the joint,
    // index 1 for the span that starts there
    End { klm: [Vec3; 2] },
    Control { klm: Vec3 }
}

#[derive(Copy, Clone, Debug)]
pub struct LbJoint {
    pub point: Vec2,
    // The point in normalized device coordinates
    pub ncoord: Vec2,
    pub kind: JointKind,
    pub prev_line: LineId,
    pub next_line: LineId
}

impl LbJoint {
    pub fn is_control(&self) -> bool {
        match self.kind { JointKind::Control { .. } => true, _ => false }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct LbLine {
    pub prev_joint: JointId,
    pub next_joint: JointId,
    // Added to close a subpath that did not end on its first point
    pub opened: bool
}

// The lines of one span: a straight line, or the control polygon of a curve
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display)]
pub enum SpanLines {
    #[display(fmt = "Linear({})", _0)]
    Linear(LineId),
    #[display(fmt = "Quadratic({}, {})", _0, _1)]
    Quadratic(LineId, LineId),
    #[display(fmt = "Cubic({}, {}, {})", _0, _1, _2)]
    Cubic(LineId, LineId, LineId)
}

impl SpanLines {
    pub fn first(&self) -> LineId {
        match *self {
            SpanLines::Linear(l) | SpanLines::Quadratic(l, _) | SpanLines::Cubic(l, _, _) => l
        }
    }

    pub fn lines(&self) -> ArrayVec<[LineId; 3]> {
        let mut v = ArrayVec::new();
        match *self {
            SpanLines::Linear(l1) => v.push(l1),
            SpanLines::Quadratic(l1, l2) => { v.push(l1); v.push(l2); }
            SpanLines::Cubic(l1, l2, l3) => { v.push(l1); v.push(l2); v.push(l3); }
        }
        v
    }

    pub fn is_linear(&self) -> bool {
        match self { SpanLines::Linear(_) => true, _ => false }
    }
}

#[derive(Default, Debug)]
pub struct JointGraph {
    joints: Vec<LbJoint>,
    lines: Vec<LbLine>
}

impl JointGraph {
    pub fn new() -> JointGraph { Default::default() }

    pub fn clear(&mut self) {
        self.joints.clear();
        self.lines.clear();
    }

    pub fn joint(&self, j: JointId) -> &LbJoint { &self.joints[j] }
    pub fn joint_mut(&mut self, j: JointId) -> &mut LbJoint { &mut self.joints[j] }
    pub fn line(&self, l: LineId) -> &LbLine { &self.lines[l] }
    pub fn joint_count(&self) -> usize { self.joints.len() }

    pub fn point(&self, j: JointId) -> Vec2 { self.joints[j].point }
    pub fn set_point(&mut self, j: JointId, p: Vec2) { self.joints[j].point = p; }
    pub fn is_control(&self, j: JointId) -> bool { self.joints[j].is_control() }

    fn create_joint(&mut self, point: Vec2, kind: JointKind) -> JointId {
        self.joints.push(LbJoint { point, ncoord: point, kind, prev_line: NONE, next_line: NONE });
        self.joints.len() - 1
    }

    pub fn create_end_joint(&mut self, point: Vec2) -> JointId {
        self.create_joint(point, JointKind::End { klm: [Vec3::zero(); 2] })
    }

    pub fn create_control_joint(&mut self, point: Vec2) -> JointId {
        self.create_joint(point, JointKind::Control { klm: Vec3::zero() })
    }

    pub fn create_line(&mut self) -> LineId {
        self.lines.push(LbLine { prev_joint: NONE, next_joint: NONE, opened: false });
        self.lines.len() - 1
    }

    pub fn set_opened(&mut self, l: LineId) { self.lines[l].opened = true; }

    // Link j1 -> l -> j2
    pub fn connect(&mut self, j1: JointId, l: LineId, j2: JointId) {
        self.connect_joint_line(j1, l);
        self.connect_line_joint(l, j2);
    }

    pub fn connect_joint_line(&mut self, j: JointId, l: LineId) {
        self.joints[j].next_line = l;
        self.lines[l].prev_joint = j;
    }

    pub fn connect_line_joint(&mut self, l: LineId, j: JointId) {
        self.lines[l].next_joint = j;
        self.joints[j].prev_line = l;
    }

    // Navigation along the chain
    pub fn prev_joint(&self, j: JointId) -> JointId { self.lines[self.joints[j].prev_line].prev_joint }
    pub fn next_joint(&self, j: JointId) -> JointId { self.lines[self.joints[j].next_line].next_joint }
    pub fn prev_line(&self, l: LineId) -> LineId { self.joints[self.lines[l].prev_joint].prev_line }
    pub fn next_line(&self, l: LineId) -> LineId { self.joints[self.lines[l].next_joint].next_line }

    // KLM coordinates
    pub fn set_end_klm(&mut self, j: JointId, index: usize, value: Vec3) {
        match &mut self.joints[j].kind {
            JointKind::End { klm } => klm[index] = value,
            JointKind::Control { .. } => debug_assert!(false, "Joint {} is not an end joint", j)
        }
    }

    pub fn set_control_klm(&mut self, j: JointId, value: Vec3) {
        match &mut self.joints[j].kind {
            JointKind::Control { klm } => *klm = value,
            JointKind::End { .. } => debug_assert!(false, "Joint {} is not a control joint", j)
        }
    }

    // The span beginning with line l, which must leave an end joint,
    // followed by the line after it
    pub fn span_at(&self, l: LineId) -> (SpanLines, LineId) {
        debug_assert!(!self.is_control(self.lines[l].prev_joint), "Line {} does not begin a span", l);

        let j1 = self.lines[l].next_joint;
        if !self.is_control(j1) { return (SpanLines::Linear(l), self.joints[j1].next_line); }

        let l2 = self.joints[j1].next_line;
        let j2 = self.lines[l2].next_joint;
        if !self.is_control(j2) { return (SpanLines::Quadratic(l, l2), self.joints[j2].next_line); }

        let l3 = self.joints[j2].next_line;
        let j3 = self.lines[l3].next_joint;
        debug_assert!(!self.is_control(j3), "Three control joints in a row after line {}", l);
        (SpanLines::Cubic(l, l2, l3), self.joints[j3].next_line)
    }

    // The span a control joint belongs to
    pub fn current_span(&self, j: JointId) -> SpanLines {
        let prev = self.prev_joint(j);
        if self.is_control(prev) {
            let first = self.joints[prev].prev_line;
            SpanLines::Cubic(first, self.joints[prev].next_line, self.joints[j].next_line)
        }
        else if self.is_control(self.next_joint(j)) {
            let next = self.next_joint(j);
            SpanLines::Cubic(self.joints[j].prev_line, self.joints[j].next_line, self.joints[next].next_line)
        }
        else { SpanLines::Quadratic(self.joints[j].prev_line, self.joints[j].next_line) }
    }

    // The joints of a span, in chain order
    pub fn span_joints(&self, span: SpanLines) -> ArrayVec<[JointId; 4]> {
        let mut joints = ArrayVec::new();
        let lines = span.lines();
        joints.push(self.lines[lines[0]].prev_joint);
        for &l in lines.iter() { joints.push(self.lines[l].next_joint); }
        joints
    }

    pub fn span_points(&self, span: SpanLines) -> ArrayVec<[Vec2; 4]> {
        self.span_joints(span).iter().map(|&j| self.point(j)).collect()
    }

    pub fn span_curve(&self, span: SpanLines) -> Curve {
        let p = self.span_points(span);
        match span {
            SpanLines::Linear(_) => Curve::line(p[0], p[1]),
            SpanLines::Quadratic(..) => Curve::quadratic_bezier(p[0], p[1], p[2]),
            SpanLines::Cubic(..) => Curve::cubic_bezier(p[0], p[1], p[2], p[3])
        }
    }

    // Every span of the loop starting at line `start`
    pub fn loop_spans(&self, start: LineId) -> Vec<SpanLines> {
        let mut spans = Vec::new();
        let mut line = start;
        loop {
            let (span, next) = self.span_at(line);
            spans.push(span);
            line = next;
            if line == start { break; }
            debug_assert!(spans.len() <= self.lines.len(), "The loop at line {} does not close", start);
        }
        spans
    }

    // Every joint of the loop starting at line `start`, in chain order
    pub fn loop_joints(&self, start: LineId) -> Vec<JointId> {
        let first = self.lines[start].prev_joint;
        let mut joints = vec![first];
        let mut j = self.next_joint(first);
        while j != first {
            joints.push(j);
            j = self.next_joint(j);
            debug_assert!(joints.len() <= self.joints.len(), "The loop at line {} does not close", start);
        }
        joints
    }

    pub fn end_joints(&self, start: LineId) -> Vec<JointId> {
        self.loop_spans(start).iter().map(|s| self.lines[s.first()].prev_joint).collect()
    }

    // The loop sampled along its curves, without repeating the first point
    pub fn flatten_loop(&self, start: LineId) -> Vec<Vec2> {
        let mut points = vec![self.point(self.lines[start].prev_joint)];
        for span in self.loop_spans(start) { self.span_curve(span).flatten_into(&mut points); }
        if points.len() > 1 && points[0] == points[points.len() - 1] { points.pop(); }
        points
    }

    // Clockwise in a y-up frame: the sampled outline has a negative area
    pub fn is_clockwise(&self, start: LineId) -> bool {
        signed_area(&self.flatten_loop(start)) < 0.0
    }

    // A point strictly inside the loop, next to its rightmost vertex
    pub fn sample_inside(&self, start: LineId) -> Vec2 {
        let points = self.flatten_loop(start);
        let len = points.len();
        let mut i = 0;
        for k in 1..len {
            let (p, q) = (points[k], points[i]);
            if p.x > q.x || (p.x == q.x && p.y < q.y) { i = k; }
        }

        let v = points[i];
        let a = points[(i + len - 1) % len];
        let b = points[(i + 1) % len];
        v + 0.05 * ((a - v) + (b - v))
    }

    // Panics if the chain around a loop is broken
    pub fn check_loop(&self, start: LineId) {
        for j in self.loop_joints(start) {
            let joint = &self.joints[j];
            assert_eq!(self.lines[joint.next_line].prev_joint, j, "Joint {} is not the origin of its next line", j);
            assert_eq!(self.lines[joint.prev_line].next_joint, j, "Joint {} is not the end of its previous line", j);
        }
    }
}

const NONE: usize = std::usize::MAX;
