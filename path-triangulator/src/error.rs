//--------------------------------------------------------------------
// error.rs
//--------------------------------------------------------------------
// Input contract problems that the decomposer reports to its caller
//--------------------------------------------------------------------

use crate::derive_more::*;

#[derive(Copy, Clone, PartialEq, Eq, Debug, Display)]
pub enum ProcessError {
    #[display(fmt = "the path has no subpaths")]
    EmptyPath,
    #[display(fmt = "subpath {} does not begin with a MoveTo", _0)]
    MissingMoveTo(usize),
    #[display(fmt = "subpath {} has fewer than 3 distinct points", _0)]
    DegenerateSubpath(usize),
    #[display(fmt = "the first subpath must be clockwise")]
    CounterClockwiseBoundary,
    #[display(fmt = "subpath {} is a hole outside of every boundary", _0)]
    OrphanHole(usize)
}

impl std::error::Error for ProcessError {}
