//--------------------------------------------------------------------
// mod.rs
//--------------------------------------------------------------------
// The batch assembler: groups the triangles of the decomposition into
// batches of one render mode whose triangles never overlap
//--------------------------------------------------------------------

use crate::derive_more::*;

mod triangle;
mod line;

pub use triangle::*;
pub use line::*;

use crate::geometry::*;
use crate::path::Polyline;
use crate::rtree::BatchTree;
use crate::loop_blinn::{JointGraph, JointId, LbPolygon, LoopBlinnProcessor};

// Default distance the triangles are shrunk by before testing overlap
pub const REDUCE_OFFSET: Coord = 0.1;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Display)]
pub enum BatchType {
    FillColor,
    FillKlmColor,
    FillTexture,
    FillKlmTexture,
    StrokeCoefColor,
    StrokeCoefTexture
}

impl BatchType {
    pub const ALL: [BatchType; 6] = [
        BatchType::FillColor, BatchType::FillKlmColor, BatchType::FillTexture,
        BatchType::FillKlmTexture, BatchType::StrokeCoefColor, BatchType::StrokeCoefTexture
    ];

    pub fn fill(style: FillStyle, curved: bool) -> BatchType {
        match (style, curved) {
            (FillStyle::Color, false) => BatchType::FillColor,
            (FillStyle::Color, true) => BatchType::FillKlmColor,
            (FillStyle::Texture, false) => BatchType::FillTexture,
            (FillStyle::Texture, true) => BatchType::FillKlmTexture
        }
    }

    pub fn stroke(style: FillStyle) -> BatchType {
        match style {
            FillStyle::Color => BatchType::StrokeCoefColor,
            FillStyle::Texture => BatchType::StrokeCoefTexture
        }
    }

    pub fn is_fill(&self) -> bool {
        match self { BatchType::StrokeCoefColor | BatchType::StrokeCoefTexture => false, _ => true }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Display)]
pub enum FillStyle { Color, Texture }

impl Default for FillStyle {
    fn default() -> Self { FillStyle::Color }
}

pub type TriangleId = usize;
pub type StrokeId = usize;

pub struct Batch {
    kind: BatchType,
    // Fill batches index their triangles, stroke batches only list lines
    tree: BatchTree<TriangleId>,
    triangles: Vec<TriangleId>,
    lines: Vec<StrokeId>
}

impl Batch {
    fn new(kind: BatchType) -> Batch {
        Batch { kind, tree: BatchTree::new(), triangles: Vec::new(), lines: Vec::new() }
    }

    pub fn kind(&self) -> BatchType { self.kind }
    pub fn triangles(&self) -> &[TriangleId] { &self.triangles }
    pub fn lines(&self) -> &[StrokeId] { &self.lines }
    pub fn index(&self) -> &BatchTree<TriangleId> { &self.tree }

    fn insert(&mut self, id: TriangleId, rect: Rect) {
        self.tree.insert(rect, id);
        self.triangles.push(id);
    }
}

pub struct BatchProcessor {
    reduce_offset: Coord,
    fill_style: FillStyle,
    stroke_style: FillStyle,
    triangles: Vec<BatchTriangle>,
    lines: Vec<BatchLine>,
    batches: Vec<Batch>,
    // Lines before this one already belong to a stroke batch
    batched_lines: usize
}

impl Default for BatchProcessor {
    fn default() -> Self { BatchProcessor::with_reduce_offset(REDUCE_OFFSET) }
}

impl BatchProcessor {
    pub fn new() -> BatchProcessor { Default::default() }

    pub fn with_reduce_offset(reduce_offset: Coord) -> BatchProcessor {
        BatchProcessor {
            reduce_offset,
            fill_style: FillStyle::default(),
            stroke_style: FillStyle::default(),
            triangles: Vec::new(),
            lines: Vec::new(),
            batches: Vec::new(),
            batched_lines: 0
        }
    }

    pub fn set_fill_style(&mut self, style: FillStyle) { self.fill_style = style; }
    pub fn set_stroke_style(&mut self, style: FillStyle) { self.stroke_style = style; }

    pub fn batches(&self) -> &[Batch] { &self.batches }
    pub fn triangle(&self, id: TriangleId) -> &BatchTriangle { &self.triangles[id] }
    pub fn triangles(&self) -> &[BatchTriangle] { &self.triangles }
    pub fn line(&self, id: StrokeId) -> &BatchLine { &self.lines[id] }
    pub fn lines(&self) -> &[BatchLine] { &self.lines }

    pub fn batch_count(&self, kind: BatchType) -> usize {
        self.batches.iter().filter(|b| b.kind == kind).count()
    }

    // Put the triangle in the first batch of its type where it overlaps
    // nothing, creating a new batch if there is none
    pub fn add_triangle(&mut self, graph: &JointGraph, joints: [JointId; 3], z: i32) -> TriangleId {
        let triangle = BatchTriangle::new(graph, joints, z, self.reduce_offset);
        let kind = BatchType::fill(self.fill_style, triangle.curved);
        let rect = triangle.rect();
        let id = self.triangles.len();
        self.triangles.push(triangle);

        let triangles = &self.triangles;
        let fits = |batch: &Batch| {
            let mut overlapped = false;
            batch.tree.query_with(rect, |_, &other| {
                if !overlapped && triangles[other].is_overlapped(&triangles[id]) { overlapped = true; }
            });
            !overlapped
        };

        match self.batches.iter().position(|b| b.kind == kind && fits(b)) {
            Some(i) => self.batches[i].insert(id, rect),
            None => {
                let mut batch = Batch::new(kind);
                batch.insert(id, rect);
                self.batches.push(batch);
                trace!("New {} batch for triangle {}", kind, id);
            }
        }
        id
    }

    pub fn add_polygon(&mut self, graph: &JointGraph, poly: &LbPolygon, z: i32) {
        for t in poly.triangles() {
            let [b1, b2, b3] = t.bindings;
            self.add_triangle(graph, [b1.0, b2.0, b3.0], z);
        }
    }

    // Every polygon of a finished decomposition
    pub fn add_decomposition(&mut self, processor: &LoopBlinnProcessor, z: i32) {
        for poly in processor.polygons() { self.add_polygon(processor.graph(), poly, z); }
        debug!("{} triangles in {} batches", self.triangles.len(), self.batches.len());
    }

    pub fn add_line(&mut self, p1: Vec2, p2: Vec2, width: Coord, z: i32) -> StrokeId {
        self.lines.push(BatchLine::new(p1, p2, width, z, self.stroke_style));
        self.lines.len() - 1
    }

    pub fn add_stroke(&mut self, polyline: &Polyline, width: Coord, z: i32) {
        let points = &polyline.points;
        for w in points.windows(2) { self.add_line(w[0], w[1], width, z); }
        if polyline.closed && points.len() > 2 {
            self.add_line(points[points.len() - 1], points[0], width, z);
        }
    }

    // Gather the pending lines into one stroke batch per style
    pub fn finish_batching(&mut self) {
        let pending = self.batched_lines..self.lines.len();
        self.batched_lines = self.lines.len();

        for &style in [FillStyle::Texture, FillStyle::Color].iter() {
            let lines: Vec<_> = pending.clone().filter(|&l| self.lines[l].style == style).collect();
            if lines.is_empty() { continue; }

            let mut batch = Batch::new(BatchType::stroke(style));
            batch.lines = lines;
            self.batches.push(batch);
        }

        debug!("Batching finished: {} batches, {} triangles, {} lines",
            self.batches.len(), self.triangles.len(), self.lines.len());
    }

    pub fn clear_batches(&mut self) {
        self.triangles.clear();
        self.lines.clear();
        self.batches.clear();
        self.batched_lines = 0;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn v(x: Coord, y: Coord) -> Vec2 { Vec2::new(x, y) }

    fn joints(graph: &mut JointGraph, pts: [(Coord, Coord); 3]) -> [JointId; 3] {
        [
            graph.create_end_joint(v(pts[0].0, pts[0].1)),
            graph.create_end_joint(v(pts[1].0, pts[1].1)),
            graph.create_end_joint(v(pts[2].0, pts[2].1))
        ]
    }

    #[test]
    fn test_first_fit() {
        let mut graph = JointGraph::new();
        let big = joints(&mut graph, [(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)]);
        let neighbor = joints(&mut graph, [(10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let inner = joints(&mut graph, [(1.0, 1.0), (4.0, 1.0), (1.0, 4.0)]);
        let far = joints(&mut graph, [(20.0, 20.0), (30.0, 20.0), (20.0, 30.0)]);

        let mut batcher = BatchProcessor::new();
        for &j in [big, neighbor, inner, far].iter() { batcher.add_triangle(&graph, j, 0); }

        let batches = batcher.batches();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].triangles(), &[0, 1, 3]);
        assert_eq!(batches[1].triangles(), &[2]);
        assert!(batches.iter().all(|b| b.kind() == BatchType::FillColor));
    }

    #[test]
    fn test_spike_into_a_batched_triangle() {
        let mut graph = JointGraph::new();
        let big = joints(&mut graph, [(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)]);
        let spike = joints(&mut graph, [(20.0, 3.0), (2.0, 2.0), (20.0, 2.5)]);

        let mut batcher = BatchProcessor::new();
        batcher.add_triangle(&graph, big, 0);
        batcher.add_triangle(&graph, spike, 0);

        assert_eq!(batcher.batch_count(BatchType::FillColor), 2);
    }

    #[test]
    fn test_fill_style_selects_type() {
        let mut graph = JointGraph::new();
        let j = joints(&mut graph, [(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)]);

        let mut batcher = BatchProcessor::new();
        batcher.set_fill_style(FillStyle::Texture);
        batcher.add_triangle(&graph, j, 0);
        batcher.set_fill_style(FillStyle::Color);
        batcher.add_triangle(&graph, j, 0);

        // Identical triangles in different modes never compete
        assert_eq!(batcher.batch_count(BatchType::FillTexture), 1);
        assert_eq!(batcher.batch_count(BatchType::FillColor), 1);
    }

    #[test]
    fn test_stroke_batches() {
        let mut batcher = BatchProcessor::new();
        let square = Polyline { points: vec![v(0.0, 0.0), v(0.0, 10.0), v(10.0, 10.0), v(10.0, 0.0)], closed: true };
        batcher.add_stroke(&square, 2.0, 1);
        batcher.set_stroke_style(FillStyle::Texture);
        batcher.add_line(v(0.0, 0.0), v(10.0, 10.0), 1.0, 1);
        batcher.finish_batching();

        let batches = batcher.batches();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].kind(), BatchType::StrokeCoefTexture);
        assert_eq!(batches[0].lines(), &[4]);
        assert_eq!(batches[1].kind(), BatchType::StrokeCoefColor);
        assert_eq!(batches[1].lines(), &[0, 1, 2, 3]);
        assert!(batches.iter().all(|b| !b.kind().is_fill()));

        // Only the new lines go to the next batches
        batcher.add_line(v(0.0, 0.0), v(5.0, 0.0), 1.0, 2);
        batcher.finish_batching();
        assert_eq!(batcher.batches().len(), 3);
        assert_eq!(batcher.batches()[2].lines(), &[5]);

        batcher.clear_batches();
        assert!(batcher.batches().is_empty() && batcher.lines().is_empty());
    }
}
