//--------------------------------------------------------------------
// line.rs
//--------------------------------------------------------------------
// Stroke segments, drawn by evaluating their line equation
//--------------------------------------------------------------------

use crate::geometry::*;
use super::FillStyle;

#[derive(Copy, Clone, Debug)]
pub struct BatchLine {
    pub points: [Vec2; 2],
    // The line equation ax + by + c, scaled so (a, b, c) has unit length
    pub coef: Vec3,
    pub width: Coord,
    pub z: i32,
    pub style: FillStyle
}

impl BatchLine {
    pub fn new(p1: Vec2, p2: Vec2, width: Coord, z: i32, style: FillStyle) -> BatchLine {
        BatchLine { points: [p1, p2], coef: linear_coefficient(p1, p2 - p1).normalized(), width, z, style }
    }

    pub fn rect(&self) -> Rect { Rect::enclosing_rect_of_two_points(self.points[0], self.points[1]) }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_coefficient_vanishes_on_the_line() {
        let (p1, p2) = (Vec2::new(1.0, 2.0), Vec2::new(4.0, 6.0));
        let line = BatchLine::new(p1, p2, 2.0, 0, FillStyle::Color);
        assert_abs_diff_eq!(line.coef.length(), 1.0, epsilon = 1e-12);

        for &p in [p1, p2, p1.lerp(p2, 0.3)].iter() {
            assert_abs_diff_eq!(line.coef.dot(Vec3::homogeneous(p)), 0.0, epsilon = 1e-12);
        }
        assert!(line.coef.dot(Vec3::homogeneous(Vec2::new(0.0, 5.0))).abs() > 0.1);
        assert_eq!(line.rect(), Rect::new(1.0, 2.0, 3.0, 4.0));
    }
}
