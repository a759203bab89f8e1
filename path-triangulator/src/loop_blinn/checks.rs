//--------------------------------------------------------------------
// checks.rs
//--------------------------------------------------------------------
// Splits the curves whose control polygons would break the
// triangulation: control points outside the polygon, and hole
// curves overlapping other curves of the same polygon
//--------------------------------------------------------------------

use super::*;
use crate::curve::{QuadraticBezier, CubicBezier};

// A half of a split cubic whose control points lie closer than this to
// its chord becomes a straight line
const STRAIGHT_TOLERANCE: Coord = 0.1;

impl LoopBlinnProcessor {
    // Concave control joints can reach outside the boundary, which is
    // always clockwise
    pub(super) fn check_boundary(&mut self, poly: usize) {
        let graph = &self.graph;
        let concaves: Vec<_> = graph.loop_joints(self.polygons[poly].boundary()).into_iter()
            .filter(|&j| graph.is_control(j) && is_concave_angle_wound(
                graph.point(graph.prev_joint(j)), graph.point(j), graph.point(graph.next_joint(j)), true))
            .collect();

        for j in concaves { self.check_span(poly, j); }
    }

    // Any control joint of a hole can
    pub(super) fn check_holes(&mut self, poly: usize) {
        let graph = &self.graph;
        let candidates: Vec<_> = self.polygons[poly].holes().iter()
            .flat_map(|&start| graph.loop_joints(start))
            .filter(|&j| graph.is_control(j))
            .collect();

        for j in candidates { self.check_span(poly, j); }
    }

    // Bisect the curve of a control joint until all of its control joints
    // are inside the polygon
    fn check_span(&mut self, poly: usize, joint: JointId) {
        let mut work = vec![(joint, 0)];
        while let Some((j, depth)) = work.pop() {
            if self.polygons[poly].is_inside(self.graph.point(j)) { continue; }
            if depth >= self.options.max_split_depth {
                warn!("Control joint {} at {} is still outside its polygon after {} splits", j, self.graph.point(j), depth);
                continue;
            }

            match self.graph.current_span(j) {
                SpanLines::Quadratic(l1, l2) => {
                    let sp = self.split_quadratic(l1, l2);
                    work.push((sp[3], depth + 1));
                    work.push((sp[1], depth + 1));
                }
                SpanLines::Cubic(l1, l2, l3) => {
                    let sp = self.split_cubic(l1, l2, l3, 0.5);
                    for &k in [sp[5], sp[4], sp[2], sp[1]].iter() { work.push((k, depth + 1)); }
                }
                SpanLines::Linear(_) => unreachable!()
            }
        }
    }

    // Put every span of the polygon in its index, splitting the hole curves
    // until no two indexed spans overlap
    pub(super) fn check_span_index(&mut self, poly: usize) {
        if self.polygons[poly].holes().is_empty() { return; }

        let boundary = self.polygons[poly].boundary();
        for lines in self.graph.loop_spans(boundary) {
            let id = self.create_span(lines, 0);
            self.polygons[poly].span_index_mut().insert(self.spans[id].rect, id);
        }

        let holes = self.polygons[poly].holes().to_vec();
        for start in holes {
            for lines in self.graph.loop_spans(start) {
                let id = self.create_span(lines, 0);
                if lines.is_linear() {
                    self.polygons[poly].span_index_mut().insert(self.spans[id].rect, id);
                    continue;
                }

                let mut pending = vec![id];
                while let Some(span) = pending.pop() {
                    if let Some(half) = self.check_rtree_span(poly, span) {
                        pending.push(half);
                        pending.push(span);
                    }
                }
            }
        }

        debug!("Span index of polygon {} holds {} spans", poly, self.polygons[poly].span_index().len());
    }

    fn create_span(&mut self, lines: SpanLines, depth: usize) -> SpanId {
        self.spans.push(Span::new(&self.graph, lines, depth));
        self.spans.len() - 1
    }

    // Insert a curved span in the index, splitting the other spans it overlaps
    // when they are the larger ones. If the span itself has to be split, both
    // halves are returned to be checked again and nothing is inserted
    fn check_rtree_span(&mut self, poly: usize, span: SpanId) -> Option<SpanId> {
        let max_depth = self.options.max_split_depth;
        let mut candidates = self.polygons[poly].span_index().query(self.spans[span].rect);

        let mut i = 0;
        while i < candidates.len() {
            let other = candidates[i];
            if !self.spans[span].is_overlapped(&self.spans[other], &self.graph) {
                i += 1;
                continue;
            }

            let span_splittable = self.spans[span].can_split(max_depth);
            let other_splittable = self.spans[other].can_split(max_depth);
            if !span_splittable && !other_splittable {
                warn!("Spans {} and {} still overlap at the split limit", self.spans[span].lines, self.spans[other].lines);
                i += 1;
                continue;
            }

            if !other_splittable || (span_splittable && self.spans[span].area() > self.spans[other].area()) {
                return Some(self.split_span(span));
            }

            let old_rect = self.spans[other].rect;
            self.polygons[poly].span_index_mut().remove(old_rect, &other);
            let half = self.split_span(other);
            let index = self.polygons[poly].span_index_mut();
            index.insert(self.spans[other].rect, other);
            index.insert(self.spans[half].rect, half);

            let rect = self.spans[span].rect;
            match (self.spans[other].rect.intersects(rect), self.spans[half].rect.intersects(rect)) {
                (false, false) => i += 1,
                (true, true) => candidates.insert(i + 1, half),
                (false, true) => {
                    candidates.insert(i + 1, half);
                    i += 1;
                }
                (true, false) => {}
            }
        }

        let rect = self.spans[span].rect;
        self.polygons[poly].span_index_mut().insert(rect, span);
        None
    }

    // Bisect a span in place; it keeps the first half and the second half
    // is returned as a new span
    fn split_span(&mut self, span: SpanId) -> SpanId {
        let (lines, depth) = (self.spans[span].lines, self.spans[span].depth + 1);
        let second = match lines {
            SpanLines::Quadratic(l1, l2) => {
                self.split_quadratic(l1, l2);
                self.span_after(l2)
            }
            SpanLines::Cubic(l1, l2, l3) => {
                self.split_cubic(l1, l2, l3, 0.5);
                self.span_after(l3)
            }
            SpanLines::Linear(_) => unreachable!()
        };

        self.spans[span].depth = depth;
        self.spans[span].refresh(&self.graph);
        self.create_span(second, depth)
    }

    fn span_after(&self, line: LineId) -> SpanLines {
        self.graph.span_at(self.graph.next_line(line)).0
    }

    // Split at t = 0.5: j1 -line1-> j2 -line2-> mid -> nc -> j3, and
    // returns [j1, j2, mid, nc, j3]
    pub(super) fn split_quadratic(&mut self, line1: LineId, line2: LineId) -> [JointId; 5] {
        let graph = &mut self.graph;
        let j1 = graph.line(line1).prev_joint;
        let j2 = graph.line(line1).next_joint;
        let j3 = graph.line(line2).next_joint;

        let p = QuadraticBezier { a: graph.point(j1), b: graph.point(j2), c: graph.point(j3) }.split_points(0.5);
        graph.set_point(j2, p[1]);
        let mid = graph.create_end_joint(p[2]);
        let nc = graph.create_control_joint(p[3]);
        let (nl1, nl2) = (graph.create_line(), graph.create_line());

        graph.connect_line_joint(line2, mid);
        graph.connect(mid, nl1, nc);
        graph.connect(nc, nl2, j3);
        [j1, j2, mid, nc, j3]
    }

    // Split at t: j1 -line1-> j2 -line2-> j3 -line3-> mid -> nc1 -> nc2 -> j4,
    // and returns [j1, j2, j3, mid, nc1, nc2, j4]
    pub(super) fn split_cubic(&mut self, line1: LineId, line2: LineId, line3: LineId, t: Coord) -> [JointId; 7] {
        let graph = &mut self.graph;
        let j1 = graph.line(line1).prev_joint;
        let j2 = graph.line(line2).prev_joint;
        let j3 = graph.line(line3).prev_joint;
        let j4 = graph.line(line3).next_joint;

        let curve = CubicBezier { a: graph.point(j1), b: graph.point(j2), c: graph.point(j3), d: graph.point(j4) };
        let p = curve.split_points(t);
        graph.set_point(j2, p[1]);
        graph.set_point(j3, p[2]);
        let mid = graph.create_end_joint(p[3]);
        let nc1 = graph.create_control_joint(p[4]);
        let nc2 = graph.create_control_joint(p[5]);
        let (nl1, nl2, nl3) = (graph.create_line(), graph.create_line(), graph.create_line());

        graph.connect_line_joint(line3, mid);
        graph.connect(mid, nl1, nc1);
        graph.connect(nc1, nl2, nc2);
        graph.connect(nc2, nl3, j4);
        [j1, j2, j3, mid, nc1, nc2, j4]
    }

    // Split a cubic at t like split_cubic, but the halves that are nearly
    // straight become lines. The chain always begins with line1
    pub(super) fn try_split_cubic(&mut self, line1: LineId, line2: LineId, line3: LineId, t: Coord) {
        let graph = &self.graph;
        let j1 = graph.line(line1).prev_joint;
        let j2 = graph.line(line2).prev_joint;
        let j3 = graph.line(line3).prev_joint;
        let j4 = graph.line(line3).next_joint;

        let (first, second) = CubicBezier { a: graph.point(j1), b: graph.point(j2), c: graph.point(j3), d: graph.point(j4) }.split(t);
        let straight = (first.is_straight(STRAIGHT_TOLERANCE), second.is_straight(STRAIGHT_TOLERANCE));

        let graph = &mut self.graph;
        match straight {
            (true, true) => {
                let mid = graph.create_end_joint(first.d);
                graph.connect_line_joint(line1, mid);
                graph.connect(mid, line2, j4);
            }
            (true, false) => {
                let mid = graph.create_end_joint(first.d);
                graph.set_point(j2, second.b);
                graph.set_point(j3, second.c);
                let nl = graph.create_line();
                graph.connect_line_joint(line1, mid);
                graph.connect(mid, line2, j2);
                graph.connect(j2, line3, j3);
                graph.connect(j3, nl, j4);
            }
            (false, true) => {
                let mid = graph.create_end_joint(first.d);
                graph.set_point(j2, first.b);
                graph.set_point(j3, first.c);
                let nl = graph.create_line();
                graph.connect_line_joint(line3, mid);
                graph.connect(mid, nl, j4);
            }
            (false, false) => { self.split_cubic(line1, line2, line3, t); }
        }

        trace!("Cubic at line {} split at {} with straight halves {:?}", line1, t, straight);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn p(x: Coord, y: Coord) -> Vec2 { Vec2::new(x, y) }

    fn processor_for(path: &[PathCommand]) -> LoopBlinnProcessor {
        let mut processor = LoopBlinnProcessor::default();
        processor.hierarchy_flatten(path).unwrap();
        processor
    }

    fn capped_processor_for(max_split_depth: usize, path: &[PathCommand]) -> LoopBlinnProcessor {
        let mut processor = LoopBlinnProcessor::new(ProcessorOptions { max_split_depth, ..Default::default() });
        processor.hierarchy_flatten(path).unwrap();
        processor
    }

    fn overlapping_hole() -> Path {
        vec![
            PathCommand::MoveTo(p(0.0, 0.0)),
            PathCommand::LineTo(p(0.0, 100.0)),
            PathCommand::QuadraticBezierTo(p(50.0, 60.0), p(100.0, 100.0)),
            PathCommand::LineTo(p(100.0, 0.0)),
            PathCommand::ClosePath,
            PathCommand::MoveTo(p(40.0, 40.0)),
            PathCommand::LineTo(p(60.0, 40.0)),
            PathCommand::LineTo(p(60.0, 65.0)),
            PathCommand::QuadraticBezierTo(p(50.0, 75.0), p(40.0, 65.0)),
            PathCommand::ClosePath
        ]
    }

    fn count_curves(processor: &LoopBlinnProcessor, start: LineId) -> usize {
        processor.graph.loop_spans(start).iter().filter(|s| !s.is_linear()).count()
    }

    #[test]
    fn test_split_cubic_keeps_the_chain() {
        let mut processor = processor_for(&[
            PathCommand::MoveTo(p(0.0, 0.0)),
            PathCommand::CubicBezierTo(p(0.0, 100.0), p(100.0, 100.0), p(100.0, 0.0)),
            PathCommand::ClosePath
        ]);

        let start = processor.polygons[0].boundary();
        let (l1, l2, l3) = match processor.graph.span_at(start).0 {
            SpanLines::Cubic(l1, l2, l3) => (l1, l2, l3),
            s => panic!("Expected a cubic, got {}", s)
        };

        let sp = processor.split_cubic(l1, l2, l3, 0.5);
        processor.graph.check_loop(start);
        assert_eq!(processor.graph.point(sp[3]), p(50.0, 75.0));
        assert_eq!(processor.graph.point(sp[6]), p(100.0, 0.0));

        let spans = processor.graph.loop_spans(start);
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0], SpanLines::Cubic(l1, l2, l3));
        assert!(!spans[1].is_linear() && spans[2].is_linear());
    }

    #[test]
    fn test_try_split_cubic_straightens_halves() {
        let path = vec![
            PathCommand::MoveTo(p(0.0, 0.0)),
            PathCommand::LineTo(p(0.0, 50.0)),
            PathCommand::LineTo(p(90.0, 50.0)),
            PathCommand::LineTo(p(90.0, 0.0)),
            PathCommand::CubicBezierTo(p(60.0, 0.02), p(30.0, -0.02), p(0.0, 0.0)),
            PathCommand::ClosePath
        ];
        let mut processor = processor_for(&path);
        let start = processor.polygons[0].boundary();

        let cubic = processor.graph.loop_spans(start).into_iter().find(|s| !s.is_linear()).unwrap();
        let l = cubic.lines();
        processor.try_split_cubic(l[0], l[1], l[2], 0.5);
        processor.graph.check_loop(start);

        let spans = processor.graph.loop_spans(start);
        assert_eq!(spans.len(), 5);
        assert!(spans.iter().all(|s| s.is_linear()));

        // A curved cubic is split in two
        let mut processor = processor_for(&[
            PathCommand::MoveTo(p(0.0, 0.0)),
            PathCommand::CubicBezierTo(p(0.0, 100.0), p(100.0, 100.0), p(100.0, 0.0)),
            PathCommand::ClosePath
        ]);
        let start = processor.polygons[0].boundary();
        let l = processor.graph.span_at(start).0.lines();
        processor.try_split_cubic(l[0], l[1], l[2], 0.5);
        processor.graph.check_loop(start);
        assert_eq!(count_curves(&processor, start), 2);
    }

    #[test]
    fn test_concave_control_outside_boundary_is_split() {
        // A thin band whose lower edge curves up, with the control point above the band
        let mut processor = processor_for(&[
            PathCommand::MoveTo(p(0.0, 0.0)),
            PathCommand::LineTo(p(0.0, 20.0)),
            PathCommand::LineTo(p(100.0, 20.0)),
            PathCommand::LineTo(p(100.0, 0.0)),
            PathCommand::QuadraticBezierTo(p(50.0, 38.0), p(0.0, 0.0)),
            PathCommand::ClosePath
        ]);

        processor.check_boundary(0);
        let start = processor.polygons[0].boundary();
        processor.graph.check_loop(start);
        assert_eq!(count_curves(&processor, start), 2);

        let graph = &processor.graph;
        for j in graph.loop_joints(start).into_iter().filter(|&j| graph.is_control(j)) {
            assert!(processor.polygons[0].is_inside(graph.point(j)), "Control joint at {} is outside", graph.point(j));
        }
    }

    #[test]
    fn test_hole_control_outside_boundary_is_split() {
        let mut processor = processor_for(&[
            PathCommand::MoveTo(p(0.0, 0.0)),
            PathCommand::LineTo(p(0.0, 100.0)),
            PathCommand::LineTo(p(100.0, 100.0)),
            PathCommand::LineTo(p(100.0, 0.0)),
            PathCommand::ClosePath,
            PathCommand::MoveTo(p(20.0, 60.0)),
            PathCommand::LineTo(p(80.0, 60.0)),
            PathCommand::LineTo(p(80.0, 90.0)),
            PathCommand::QuadraticBezierTo(p(50.0, 106.0), p(20.0, 90.0)),
            PathCommand::ClosePath
        ]);

        let hole = processor.polygons[0].holes()[0];
        processor.check_boundary(0);
        assert_eq!(count_curves(&processor, hole), 1);

        processor.check_holes(0);
        processor.graph.check_loop(hole);
        assert_eq!(count_curves(&processor, hole), 2);
    }

    #[test]
    fn test_split_depth_stops_the_boundary_check() {
        let mut processor = capped_processor_for(0, &[
            PathCommand::MoveTo(p(0.0, 0.0)),
            PathCommand::LineTo(p(0.0, 20.0)),
            PathCommand::LineTo(p(100.0, 20.0)),
            PathCommand::LineTo(p(100.0, 0.0)),
            PathCommand::QuadraticBezierTo(p(50.0, 38.0), p(0.0, 0.0)),
            PathCommand::ClosePath
        ]);

        processor.check_boundary(0);
        let start = processor.polygons[0].boundary();
        processor.graph.check_loop(start);
        assert_eq!(count_curves(&processor, start), 1);

        // The control joint is left where it was
        let graph = &processor.graph;
        let ctl = graph.loop_joints(start).into_iter().find(|&j| graph.is_control(j)).unwrap();
        assert_eq!(graph.point(ctl), p(50.0, 38.0));
        assert!(!processor.polygons[0].is_inside(graph.point(ctl)));
    }

    #[test]
    fn test_split_depth_accepts_overlapping_spans() {
        let mut processor = LoopBlinnProcessor::new(ProcessorOptions { max_split_depth: 0, ..Default::default() });
        processor.proceed(&overlapping_hole()).unwrap();

        let boundary = processor.polygons[0].boundary();
        let hole = processor.polygons[0].holes()[0];
        processor.graph.check_loop(boundary);
        processor.graph.check_loop(hole);
        assert_eq!(count_curves(&processor, boundary), 1);
        assert_eq!(count_curves(&processor, hole), 1);

        // Every span is indexed as it is, overlap included
        let index = processor.polygons[0].span_index();
        index.check_structure();
        assert_eq!(index.len(), 8);
        assert!(processor.spans.iter().all(|s| s.depth == 0));
    }

    #[test]
    fn test_overlapping_hole_curve_splits_the_larger_span() {
        let mut processor = processor_for(&overlapping_hole());

        processor.check_boundary(0);
        processor.check_holes(0);
        processor.check_span_index(0);

        let boundary = processor.polygons[0].boundary();
        let hole = processor.polygons[0].holes()[0];
        assert_eq!(count_curves(&processor, boundary), 2);
        assert_eq!(count_curves(&processor, hole), 1);

        let index = processor.polygons[0].span_index();
        index.check_structure();
        assert_eq!(index.len(), 9);

        let entries = index.entries();
        for (i, &(r1, &s1)) in entries.iter().enumerate() {
            for &(r2, &s2) in &entries[i + 1..] {
                if r1.intersects(r2) {
                    assert!(!processor.spans[s1].is_overlapped(&processor.spans[s2], &processor.graph),
                        "Spans {} and {} overlap", processor.spans[s1].lines, processor.spans[s2].lines);
                }
            }
        }
    }
}
