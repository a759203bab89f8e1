//--------------------------------------------------------------------
// curve.rs
//--------------------------------------------------------------------
// Provides the proxy enumeration Curve, which acts as a dispatcher
// between the known types of curves
//--------------------------------------------------------------------

use crate::derive_more::*;

mod line;
mod quadratic_bezier;
mod cubic_bezier;
mod klm;

pub use line::Line;
pub use quadratic_bezier::QuadraticBezier;
pub use cubic_bezier::CubicBezier;
pub use klm::*;

use crate::geometry::*;
use crate::arrayvec::ArrayVec;

#[derive(Copy, Clone, Display)]
pub enum Curve {
    Line(Line),
    QuadraticBezier(QuadraticBezier),
    CubicBezier(CubicBezier)
}

// Use a simplifier macro to implement the "normal" functions
// Macro idea by https://github.com/u32i64
macro_rules! forward_to_curves {
    ($($i:ident ( $($arg:ident : $arg_ty:ty),* ) -> $result:ty );*) => {
        $(
            pub fn $i(&self, $($arg : $arg_ty,)*) -> $result {
                match self {
                    Curve::Line(l) => l.$i($($arg,)*),
                    Curve::QuadraticBezier(q) => q.$i($($arg,)*),
                    Curve::CubicBezier(c) => c.$i($($arg,)*)
                }
            }
        )*
    }
}

pub const MAX_CONTROL_POINTS: usize = 4;
pub type ControlPolygon = ArrayVec<[Vec2; MAX_CONTROL_POINTS]>;

impl Curve {
    forward_to_curves! {
        at(t: Coord) -> Vec2;
        control_length() -> Coord;
        control_polygon() -> ControlPolygon;
        flatten_into(out: &mut Vec<Vec2>) -> ()
    }

    // Conservative bounds: the control polygon encloses the curve
    pub fn control_rect(&self) -> Rect {
        let poly = self.control_polygon();
        Rect::enclosing_rect(poly.iter().copied()).unwrap_or_else(|| Rect::new(0.0, 0.0, 0.0, 0.0))
    }

    // Create curves of specific types
    pub fn line(a: Vec2, b: Vec2) -> Curve { Curve::Line(Line { a, b }) }
    pub fn quadratic_bezier(a: Vec2, b: Vec2, c: Vec2) -> Curve {
        Curve::QuadraticBezier(QuadraticBezier { a, b, c })
    }
    pub fn cubic_bezier(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> Curve {
        Curve::CubicBezier(CubicBezier { a, b, c, d })
    }

    pub fn is_line(&self) -> bool {
        match self {
            Curve::Line(_) => true,
            _ => false
        }
    }
}

impl std::fmt::Debug for Curve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}
