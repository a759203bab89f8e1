//--------------------------------------------------------------------
// hierarchy.rs
//--------------------------------------------------------------------
// Builds the joint chains of the subpaths and arranges them as
// boundaries and holes
//--------------------------------------------------------------------

use super::*;

impl LoopBlinnProcessor {
    // Chain the joints of one subpath, which must begin with a MoveTo.
    // Returns the first line of the loop
    fn create_patch(&mut self, sub: &[PathCommand]) -> LineId {
        let start = match sub[0] {
            PathCommand::MoveTo(p) => p,
            _ => Vec2::zero()
        };

        let first = self.graph.create_end_joint(start);
        let mut prev = first;
        for cmd in &sub[1..] {
            prev = self.create_segment(prev, cmd);
        }

        // Close the loop, reusing the first joint when the subpath ends on it
        if prev != first && self.graph.point(prev) == start {
            let last_line = self.graph.joint(prev).prev_line;
            self.graph.connect_line_joint(last_line, first);
        }
        else {
            let line = self.graph.create_line();
            self.graph.connect(prev, line, first);
            self.graph.set_opened(line);
        }

        self.graph.joint(first).next_line
    }

    fn create_segment(&mut self, prev: JointId, cmd: &PathCommand) -> JointId {
        let graph = &mut self.graph;
        let link = |graph: &mut JointGraph, from: JointId, to: JointId| {
            let line = graph.create_line();
            graph.connect(from, line, to);
        };

        match *cmd {
            PathCommand::LineTo(p) => {
                let j = graph.create_end_joint(p);
                link(graph, prev, j);
                j
            }
            PathCommand::QuadraticBezierTo(c, p) => {
                let j1 = graph.create_control_joint(c);
                let j2 = graph.create_end_joint(p);
                link(graph, prev, j1);
                link(graph, j1, j2);
                j2
            }
            PathCommand::CubicBezierTo(c1, c2, p) => {
                let j1 = graph.create_control_joint(c1);
                let j2 = graph.create_control_joint(c2);
                let j3 = graph.create_end_joint(p);
                link(graph, prev, j1);
                link(graph, j1, j2);
                link(graph, j2, j3);
                j3
            }
            // Subpaths are closed anyway, and a MoveTo only begins them
            PathCommand::ClosePath | PathCommand::MoveTo(_) => prev
        }
    }

    // The first subpath is a boundary. Every later clockwise subpath begins a
    // new polygon, and every counter-clockwise one is a hole of the innermost
    // polygon containing it
    pub(super) fn hierarchy_flatten(&mut self, path: &[PathCommand]) -> Result<(), ProcessError> {
        let mut stack = Vec::new();
        let mut parent = 0;

        for (i, sub) in subpaths(path).enumerate() {
            let start = self.create_patch(sub);
            let cw = self.graph.is_clockwise(start);

            if i == 0 {
                if !cw { return Err(ProcessError::CounterClockwiseBoundary); }
                self.polygons.push(LbPolygon::new(&self.graph, start));
                continue;
            }

            let sample = self.graph.sample_inside(start);
            if cw {
                if self.polygons[parent].is_inside(sample) { stack.push(parent); }
                self.polygons.push(LbPolygon::new(&self.graph, start));
                parent = self.polygons.len() - 1;
            }
            else {
                while !self.polygons[parent].is_inside(sample) {
                    parent = match stack.pop() {
                        Some(p) => p,
                        None => return Err(ProcessError::OrphanHole(i))
                    };
                }
                self.polygons[parent].add_hole(start);
            }
        }

        Ok(())
    }
}
