//--------------------------------------------------------------------
// quadratic_bezier.rs
//--------------------------------------------------------------------
// Represents a quadratic Bézier curve
//--------------------------------------------------------------------

use crate::derive_more::*;

use crate::geometry::*;
use super::*;

// The quadratic bezier structure
#[derive(Copy, Clone, Display)]
#[display(fmt = "QuadraticBezier({},{},{})", a, b, c)]
pub struct QuadraticBezier { pub a: Vec2, pub b: Vec2, pub c: Vec2 }

impl QuadraticBezier {
    pub fn at(&self, t: Coord) -> Vec2 {
        let ct = 1.0 - t;
        ct * ct * self.a + 2.0 * ct * t * self.b + t * t * self.c
    }

    // de Casteljau: [start, ctl1, middle, ctl2, end]
    pub fn split_points(&self, t: Coord) -> [Vec2; 5] {
        let p1 = self.a.lerp(self.b, t);
        let p3 = self.b.lerp(self.c, t);
        let p2 = p1.lerp(p3, t);
        [self.a, p1, p2, p3, self.c]
    }

    pub fn split(&self, t: Coord) -> (QuadraticBezier, QuadraticBezier) {
        let p = self.split_points(t);
        (QuadraticBezier { a: p[0], b: p[1], c: p[2] }, QuadraticBezier { a: p[2], b: p[3], c: p[4] })
    }

    pub fn parameter_equation(&self) -> [Vec3; 2] { quad_parameter_equation(self.a, self.b, self.c) }

    pub fn control_length(&self) -> Coord { (self.b - self.a).length() + (self.c - self.b).length() }

    pub fn control_polygon(&self) -> ControlPolygon {
        [self.a, self.b, self.c].iter().copied().collect()
    }

    pub fn flatten_into(&self, out: &mut Vec<Vec2>) {
        let para = self.parameter_equation();
        let step = interpolate_step(self.control_length());
        for i in 1..=step {
            out.push(eval_quad(&para, i as Coord / step as Coord));
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_split_points() {
        let q = QuadraticBezier { a: Vec2::new(0.0, 0.0), b: Vec2::new(2.0, 4.0), c: Vec2::new(4.0, 0.0) };
        let p = q.split_points(0.5);
        assert_eq!(p[1], Vec2::new(1.0, 2.0));
        assert_eq!(p[2], Vec2::new(2.0, 2.0));
        assert_eq!(p[3], Vec2::new(3.0, 2.0));

        let (l, r) = q.split(0.25);
        assert_abs_diff_eq!(l.at(1.0), q.at(0.25), epsilon = 1e-12);
        assert_abs_diff_eq!(r.at(0.5), q.at(0.625), epsilon = 1e-12);
        assert_abs_diff_eq!(r.c, q.c);
    }

    #[test]
    fn test_flatten_ends_on_endpoint() {
        let q = QuadraticBezier { a: Vec2::new(0.0, 0.0), b: Vec2::new(50.0, 100.0), c: Vec2::new(100.0, 0.0) };
        let mut pts = Vec::new();
        q.flatten_into(&mut pts);
        assert_eq!(pts.len(), interpolate_step(q.control_length()));
        assert_abs_diff_eq!(*pts.last().unwrap(), q.c, epsilon = 1e-9);
    }
}
