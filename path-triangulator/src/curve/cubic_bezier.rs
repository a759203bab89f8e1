//--------------------------------------------------------------------
// cubic_bezier.rs
//--------------------------------------------------------------------
// Represents a cubic Bézier curve
//--------------------------------------------------------------------

use crate::derive_more::*;

use crate::geometry::*;
use crate::arrayvec::*;
use super::*;

// The cubic bezier structure
#[derive(Copy, Clone, Display)]
#[display(fmt = "CubicBezier({},{},{},{})", a, b, c, d)]
pub struct CubicBezier { pub a: Vec2, pub b: Vec2, pub c: Vec2, pub d: Vec2 }

impl CubicBezier {
    pub fn at(&self, t: Coord) -> Vec2 {
        let ct = 1.0 - t;
        ct * ct * ct * self.a + 3.0 * ct * ct * t * self.b
            + 3.0 * ct * t * t * self.c + t * t * t * self.d
    }

    // de Casteljau: [start, ctl1, ctl2, middle, ctl3, ctl4, end]
    pub fn split_points(&self, t: Coord) -> [Vec2; 7] {
        let ab = self.a.lerp(self.b, t);
        let bc = self.b.lerp(self.c, t);
        let cd = self.c.lerp(self.d, t);
        let abc = ab.lerp(bc, t);
        let bcd = bc.lerp(cd, t);
        let mid = abc.lerp(bcd, t);
        [self.a, ab, abc, mid, bcd, cd, self.d]
    }

    pub fn split(&self, t: Coord) -> (CubicBezier, CubicBezier) {
        let p = self.split_points(t);
        (CubicBezier { a: p[0], b: p[1], c: p[2], d: p[3] }, CubicBezier { a: p[3], b: p[4], c: p[5], d: p[6] })
    }

    pub fn parameter_equation(&self) -> [Vec4; 2] { cubic_parameter_equation(self.a, self.b, self.c, self.d) }

    pub fn inflections(&self) -> ArrayVec<[Coord; 2]> { cubic_inflections(self.a, self.b, self.c, self.d) }

    // Both control points are closer than the tolerance to the chord
    pub fn is_straight(&self, tolerance: Coord) -> bool {
        if self.a.roughly_equals(self.d) { return false; }
        point_line_distance(self.b, self.a, self.d).abs() < tolerance &&
            point_line_distance(self.c, self.a, self.d).abs() < tolerance
    }

    pub fn control_length(&self) -> Coord {
        (self.b - self.a).length() + (self.c - self.b).length() + (self.d - self.c).length()
    }

    pub fn control_polygon(&self) -> ControlPolygon {
        [self.a, self.b, self.c, self.d].iter().copied().collect()
    }

    pub fn flatten_into(&self, out: &mut Vec<Vec2>) {
        let para = self.parameter_equation();
        let step = interpolate_step(self.control_length());
        for i in 1..=step {
            out.push(eval_cubic(&para, i as Coord / step as Coord));
        }
    }
}
