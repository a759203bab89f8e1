//--------------------------------------------------------------------
// mod.rs
//--------------------------------------------------------------------
// The Loop-Blinn decomposer: turns a path into polygons whose joints
// carry the implicit curve coordinates, triangulated for rendering
//--------------------------------------------------------------------

mod graph;
mod span;
mod polygon;
mod hierarchy;
mod checks;
mod klm;

pub use graph::*;
pub use span::*;
pub use polygon::*;

use crate::error::ProcessError;
use crate::geometry::*;
use crate::path::*;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ProcessorOptions {
    // The viewport, used to map the points to normalized device coordinates
    pub width: Coord,
    pub height: Coord,
    // Bound on the recursive splitting of the curves
    pub max_split_depth: usize
}

impl Default for ProcessorOptions {
    fn default() -> Self { ProcessorOptions { width: 512.0, height: 512.0, max_split_depth: 8 } }
}

#[derive(Default)]
pub struct LoopBlinnProcessor {
    options: ProcessorOptions,
    graph: JointGraph,
    polygons: Vec<LbPolygon>,
    spans: Vec<Span>
}

impl LoopBlinnProcessor {
    pub fn new(options: ProcessorOptions) -> LoopBlinnProcessor {
        LoopBlinnProcessor { options, ..Default::default() }
    }

    pub fn options(&self) -> &ProcessorOptions { &self.options }
    pub fn graph(&self) -> &JointGraph { &self.graph }
    pub fn polygons(&self) -> &[LbPolygon] { &self.polygons }
    pub fn spans(&self) -> &[Span] { &self.spans }

    pub fn triangle_count(&self) -> usize { self.polygons.iter().map(|p| p.triangles().len()).sum() }

    pub fn clear(&mut self) {
        self.graph.clear();
        self.polygons.clear();
        self.spans.clear();
    }

    // Run the whole decomposition. Everything from a previous run is dropped
    pub fn proceed(&mut self, path: &[PathCommand]) -> Result<(), ProcessError> {
        self.clear();
        validate(path)?;

        self.hierarchy_flatten(path)?;
        debug!("Path flattened into {} polygons", self.polygons.len());

        for poly in 0..self.polygons.len() {
            self.check_boundary(poly);
            self.check_holes(poly);
            self.check_span_index(poly);
        }

        self.calc_klm_coords();

        let graph = &self.graph;
        for poly in self.polygons.iter_mut() {
            #[cfg(debug_assertions)] {
                for start in poly.loops() { graph.check_loop(start); }
            }
            poly.build_cdt(graph);
        }

        debug!("Decomposition done: {} joints, {} spans indexed, {} triangles",
            self.graph.joint_count(), self.spans.len(), self.triangle_count());
        Ok(())
    }
}

// Reject what the decomposer cannot work with
fn validate(path: &[PathCommand]) -> Result<(), ProcessError> {
    if path.is_empty() { return Err(ProcessError::EmptyPath); }

    for (i, sub) in subpaths(path).enumerate() {
        match sub[0] {
            PathCommand::MoveTo(_) => {},
            _ => return Err(ProcessError::MissingMoveTo(i))
        }

        let mut points: Vec<Vec2> = Vec::new();
        let mut add = |p: Vec2| if !points.contains(&p) { points.push(p); };
        for cmd in sub {
            match *cmd {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => add(p),
                PathCommand::QuadraticBezierTo(c, p) => { add(c); add(p); }
                PathCommand::CubicBezierTo(c1, c2, p) => { add(c1); add(c2); add(p); }
                PathCommand::ClosePath => {}
            }
        }

        if points.len() < 3 { return Err(ProcessError::DegenerateSubpath(i)); }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn p(x: Coord, y: Coord) -> Vec2 { Vec2::new(x, y) }

    #[test]
    fn test_validation() {
        assert_eq!(validate(&[]), Err(ProcessError::EmptyPath));
        assert_eq!(validate(&[PathCommand::LineTo(p(1.0, 1.0))]), Err(ProcessError::MissingMoveTo(0)));

        let path = vec![
            PathCommand::MoveTo(p(0.0, 0.0)), PathCommand::LineTo(p(0.0, 10.0)), PathCommand::LineTo(p(10.0, 0.0)),
            PathCommand::MoveTo(p(20.0, 0.0)), PathCommand::LineTo(p(30.0, 0.0)), PathCommand::ClosePath
        ];
        assert_eq!(validate(&path), Err(ProcessError::DegenerateSubpath(1)));
        assert_eq!(validate(&path[..3]), Ok(()));

        // The control point counts as a distinct point
        let lens = vec![PathCommand::MoveTo(p(0.0, 0.0)), PathCommand::QuadraticBezierTo(p(50.0, 100.0), p(100.0, 0.0))];
        assert_eq!(validate(&lens), Ok(()));
    }

    #[test]
    fn test_counter_clockwise_boundary_is_rejected() {
        let path = vec![
            PathCommand::MoveTo(p(0.0, 0.0)), PathCommand::LineTo(p(10.0, 0.0)),
            PathCommand::LineTo(p(10.0, 10.0)), PathCommand::ClosePath
        ];
        let mut processor = LoopBlinnProcessor::new(Default::default());
        assert_eq!(processor.proceed(&path), Err(ProcessError::CounterClockwiseBoundary));
    }

    #[test]
    fn test_bulging_side_is_a_boundary() {
        let path = vec![
            PathCommand::MoveTo(p(0.0, 0.0)), PathCommand::LineTo(p(0.0, 100.0)), PathCommand::LineTo(p(100.0, 100.0)),
            PathCommand::QuadraticBezierTo(p(140.0, -20.0), p(100.0, 0.0)), PathCommand::ClosePath
        ];
        let mut processor = LoopBlinnProcessor::new(Default::default());
        assert_eq!(processor.proceed(&path), Ok(()));
        assert_eq!(processor.polygons().len(), 1);
        assert!(processor.triangle_count() > 0);
    }

    #[test]
    fn test_proceed_clears_previous_run() {
        let square = vec![
            PathCommand::MoveTo(p(0.0, 0.0)), PathCommand::LineTo(p(0.0, 10.0)),
            PathCommand::LineTo(p(10.0, 10.0)), PathCommand::LineTo(p(10.0, 0.0)), PathCommand::ClosePath
        ];
        let mut processor = LoopBlinnProcessor::new(Default::default());
        processor.proceed(&square).unwrap();
        processor.proceed(&square).unwrap();
        assert_eq!(processor.polygons().len(), 1);
        assert_eq!(processor.graph().joint_count(), 4);
        assert_eq!(processor.triangle_count(), 2);
    }
}
