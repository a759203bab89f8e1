//--------------------------------------------------------------------
// coord_utils.rs
//--------------------------------------------------------------------
// Provides utilities to work with the coordinate class
//--------------------------------------------------------------------

use super::*;

pub const EPSILON: Coord = 1.0 / 32768.0;
pub const EPSILON2: Coord = EPSILON * EPSILON;

// Tolerance used by the curve classification code
pub const FUZZY_EPSILON: Coord = 1e-10;

// Some utility functions for Coord
// trait used only for implementation
pub trait Geometry where Self: Sized {
    fn roughly_zero(self) -> bool;
    fn roughly_zero_squared(self) -> bool;
    fn roughly_equals(self, other: Self) -> bool;
    fn fuzzy_zero(self) -> bool;
    fn clear_fuzz(self) -> Self;
}

impl Geometry for Coord {
    fn roughly_zero(self) -> bool { self > -EPSILON && self < EPSILON }
    fn roughly_zero_squared(self) -> bool { self > -EPSILON2 && self < EPSILON2 }
    fn roughly_equals(self, other: Self) -> bool { (self - other).roughly_zero() }
    fn fuzzy_zero(self) -> bool { self > -FUZZY_EPSILON && self < FUZZY_EPSILON }
    fn clear_fuzz(self) -> Coord { if self.fuzzy_zero() { 0.0 } else { self } }
}

pub fn inside01(t: Coord) -> bool { t >= 0.0 && t <= 1.0 }
