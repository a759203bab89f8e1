//--------------------------------------------------------------------
// lib.rs
//--------------------------------------------------------------------
// Declaration of all modules occurs here
//--------------------------------------------------------------------

#[macro_use] extern crate log;
#[cfg_attr(test, macro_use)] extern crate approx;
extern crate derive_more;
extern crate ordered_float;
extern crate roots;
extern crate arrayvec;

pub mod geometry;
pub mod curve;
pub mod path;
pub mod triangulation;
pub mod rtree;
pub mod loop_blinn;
pub mod batch;
mod error;

pub use geometry::{Coord, Vec2, Vec3, Rect};
pub use path::*;
pub use error::ProcessError;
pub use loop_blinn::{LoopBlinnProcessor, ProcessorOptions};
pub use batch::{BatchProcessor, BatchType, FillStyle};
