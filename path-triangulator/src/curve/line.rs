//--------------------------------------------------------------------
// line.rs
//--------------------------------------------------------------------
// Represents a line segment
//--------------------------------------------------------------------

use crate::derive_more::*;
use crate::geometry::*;
use super::*;

// The line structure
#[derive(Copy, Clone, Display)]
#[display(fmt = "Line({},{})", a, b)]
pub struct Line { pub a: Vec2, pub b: Vec2 }

impl Line {
    pub fn at(&self, t: Coord) -> Vec2 { (1.0-t) * self.a + t * self.b }

    pub fn control_length(&self) -> Coord { (self.b - self.a).length() }

    pub fn control_polygon(&self) -> ControlPolygon {
        [self.a, self.b].iter().copied().collect()
    }

    // Lines need no sampling, only their endpoint is appended
    pub fn flatten_into(&self, out: &mut Vec<Vec2>) { out.push(self.b); }
}
