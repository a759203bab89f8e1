//------------------------------------------------------------------------------
// mod.rs
//------------------------------------------------------------------------------
// Provides the Path data structure, which is just a container for PathCommands
//------------------------------------------------------------------------------

use std::fmt::*;

use crate::geometry::*;
use crate::curve::Curve;

// The PathCommand enum
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum PathCommand {
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadraticBezierTo(Vec2, Vec2),
    CubicBezierTo(Vec2, Vec2, Vec2),
    // Subpaths are always closed by the decomposer, this is kept for the stroker
    ClosePath
}

// Implementing the display
impl Display for PathCommand {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            PathCommand::MoveTo(target) => write!(f, "MoveTo({})", target),
            PathCommand::LineTo(target) => write!(f, "LineTo({})", target),
            PathCommand::QuadraticBezierTo(c, t) => write!(f, "QuadraticBezierTo({}, {})", c, t),
            PathCommand::CubicBezierTo(c1, c2, t) => write!(f, "CubicBezierTo({}, {}, {})", c1, c2, t),
            PathCommand::ClosePath => write!(f, "ClosePath()"),
        }
    }
}

// The Path is just a vector of path commands
pub type Path = Vec<PathCommand>;

// Split a path into its subpaths, each one beginning at a MoveTo. Commands
// before the first MoveTo come out as a subpath of their own, so the caller
// can reject them
pub fn subpaths(path: &[PathCommand]) -> SubpathIterator<'_> {
    SubpathIterator { path, pos: 0 }
}

pub struct SubpathIterator<'a> {
    path: &'a [PathCommand],
    pos: usize
}

impl<'a> Iterator for SubpathIterator<'a> {
    type Item = &'a [PathCommand];

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.path.len() { return None; }

        let start = self.pos;
        let mut end = start + 1;
        while end < self.path.len() {
            if let PathCommand::MoveTo(_) = self.path[end] { break; }
            end += 1;
        }

        self.pos = end;
        Some(&self.path[start..end])
    }
}

// A flattened subpath, used to generate stroke lines
#[derive(Clone, Debug)]
pub struct Polyline {
    pub points: Vec<Vec2>,
    pub closed: bool
}

// Sample every curve of the path, with the interpolation step count
pub fn flatten_path(path: &[PathCommand]) -> Vec<Polyline> {
    let mut result = Vec::new();

    for sub in subpaths(path) {
        let mut points = Vec::new();
        let mut closed = false;
        let mut last = Vec2::zero();

        for cmd in sub {
            let curve = match *cmd {
                PathCommand::MoveTo(p) => {
                    points.push(p);
                    last = p;
                    continue;
                }
                PathCommand::LineTo(p) => Curve::line(last, p),
                PathCommand::QuadraticBezierTo(c, p) => Curve::quadratic_bezier(last, c, p),
                PathCommand::CubicBezierTo(c1, c2, p) => Curve::cubic_bezier(last, c1, c2, p),
                PathCommand::ClosePath => { closed = true; continue; }
            };

            if points.is_empty() { points.push(last); }
            curve.flatten_into(&mut points);
            last = curve.at(1.0);
        }

        if closed && points.len() > 1 && points[0] == points[points.len() - 1] { points.pop(); }
        if points.len() > 1 { result.push(Polyline { points, closed }); }
    }

    result
}

#[cfg(test)]
mod test {
    use super::*;

    fn p(x: Coord, y: Coord) -> Vec2 { Vec2::new(x, y) }

    #[test]
    fn test_subpaths() {
        let path = vec![
            PathCommand::MoveTo(p(0.0, 0.0)), PathCommand::LineTo(p(1.0, 0.0)), PathCommand::ClosePath,
            PathCommand::MoveTo(p(5.0, 5.0)), PathCommand::LineTo(p(6.0, 5.0))
        ];
        let subs: Vec<_> = subpaths(&path).collect();
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].len(), 3);
        assert_eq!(subs[1][0], PathCommand::MoveTo(p(5.0, 5.0)));

        // Leading commands without a MoveTo are kept apart
        let path = vec![PathCommand::LineTo(p(1.0, 0.0)), PathCommand::MoveTo(p(0.0, 0.0))];
        let subs: Vec<_> = subpaths(&path).collect();
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0], &[PathCommand::LineTo(p(1.0, 0.0))][..]);
    }

    #[test]
    fn test_flatten_path() {
        let path = vec![
            PathCommand::MoveTo(p(0.0, 0.0)),
            PathCommand::LineTo(p(100.0, 0.0)),
            PathCommand::QuadraticBezierTo(p(100.0, 100.0), p(0.0, 100.0)),
            PathCommand::LineTo(p(0.0, 0.0)),
            PathCommand::ClosePath
        ];

        let lines = flatten_path(&path);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].closed);
        assert_eq!(lines[0].points[0], p(0.0, 0.0));
        assert_eq!(lines[0].points[1], p(100.0, 0.0));
        // The repeated start point is dropped on closed polylines
        assert_ne!(*lines[0].points.last().unwrap(), p(0.0, 0.0));
        assert!(lines[0].points.len() > 4);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", PathCommand::QuadraticBezierTo(p(1.0, 2.0), p(3.0, 4.0))), "QuadraticBezierTo((1,2), (3,4))");
        assert_eq!(format!("{}", PathCommand::ClosePath), "ClosePath()");
    }
}
