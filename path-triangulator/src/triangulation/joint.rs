//------------------------------------------------------------------------------
// joint.rs
//------------------------------------------------------------------------------
// The vertices handed to the triangulation, and the triangles it gives back
//------------------------------------------------------------------------------

use crate::derive_more::*;
use crate::geometry::*;

// Opaque tag that the caller attaches to each vertex. The triangulation only
// compares it, it is never looked up
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Display)]
#[display(fmt = "#{}", _0)]
pub struct Binding(pub usize);

#[derive(Copy, Clone, Debug, Constructor)]
pub struct DtJoint { pub point: Vec2, pub binding: Binding }

// A triangle as reported by the traversal. The boundary flags follow the
// edges 1→2, 2→3 and 3→1
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct DtTriangle {
    pub bindings: [Binding; 3],
    pub boundary: [bool; 3]
}

impl DtTriangle {
    pub fn is_all_boundary(&self) -> bool { self.boundary.iter().all(|&b| b) }
}
