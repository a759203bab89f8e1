//--------------------------------------------------------------------
// klm.rs
//--------------------------------------------------------------------
// Assigns the implicit curve coordinates to the joints of every span
//--------------------------------------------------------------------

use super::*;
use crate::curve::{cubic_klm, KlmResult, QUAD_KLM};

impl LoopBlinnProcessor {
    fn to_ndc(&self, p: Vec2) -> Vec2 {
        Vec2::new(2.0 * p.x / self.options.width - 1.0, -2.0 * p.y / self.options.height + 1.0)
    }

    // Recompute the normalized coordinates of the joints from index `from` on
    fn refresh_ncoords(&mut self, from: usize) {
        for j in from..self.graph.joint_count() {
            let ncoord = self.to_ndc(self.graph.point(j));
            self.graph.joint_mut(j).ncoord = ncoord;
        }
    }

    pub(super) fn calc_klm_coords(&mut self) {
        self.refresh_ncoords(0);
        let loops: Vec<_> = self.polygons.iter().flat_map(|p| p.loops()).collect();
        for start in loops { self.calc_loop_klm(start); }
    }

    fn calc_loop_klm(&mut self, start: LineId) {
        let mut line = start;
        let mut splits = 0;
        loop {
            let (span, next) = self.graph.span_at(line);

            // A split cubic is processed again from the same line
            if self.calc_span_klm(span, splits) {
                splits += 1;
                continue;
            }

            splits = 0;
            line = next;
            if line == start { break; }
        }
    }

    // Returns true if the span had to be split instead
    fn calc_span_klm(&mut self, span: SpanLines, splits: usize) -> bool {
        let j = self.graph.span_joints(span);
        match span {
            SpanLines::Linear(_) => {}
            SpanLines::Quadratic(..) => {
                self.graph.set_end_klm(j[0], 1, QUAD_KLM[0]);
                self.graph.set_control_klm(j[1], QUAD_KLM[1]);
                self.graph.set_end_klm(j[2], 0, QUAD_KLM[2]);
            }
            SpanLines::Cubic(l1, l2, l3) => {
                let graph = &self.graph;
                let original = [graph.point(j[0]), graph.point(j[1]), graph.point(j[2]), graph.point(j[3])];
                let ndc = [graph.joint(j[0]).ncoord, graph.joint(j[1]).ncoord, graph.joint(j[2]).ncoord, graph.joint(j[3]).ncoord];

                let m = match cubic_klm(&ndc, &original) {
                    KlmResult::Coords(m) => m,
                    KlmResult::Split(t) if splits < self.options.max_split_depth => {
                        let before = self.graph.joint_count();
                        self.try_split_cubic(l1, l2, l3, t);
                        self.refresh_ncoords(before);
                        return true;
                    }
                    KlmResult::Split(t) => {
                        warn!("Cubic {} still needs a split at {} after {} splits, KLM coordinates are zero", span, t, splits);
                        [Vec3::zero(); 4]
                    }
                };

                self.graph.set_end_klm(j[0], 1, m[0]);
                self.graph.set_control_klm(j[1], m[1]);
                self.graph.set_control_klm(j[2], m[2]);
                self.graph.set_end_klm(j[3], 0, m[3]);
            }
        }
        false
    }
}
