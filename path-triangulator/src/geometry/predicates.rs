//--------------------------------------------------------------------
// predicates.rs
//--------------------------------------------------------------------
// Orientation tests, point containment and the parameter equations
// of the Bézier curves. None of these functions fail: degenerate input
// gives meaningless, but finite or NaN, results
//--------------------------------------------------------------------

use crate::arrayvec::ArrayVec;

use super::*;

// Turning from p1 to p2 to p3 is a counter-clockwise turn
pub fn is_concave_angle(p1: Vec2, p2: Vec2, p3: Vec2) -> bool {
    (p2 - p1).cross(p3 - p2) > 0.0
}

// Same as above, but with the expected winding of the loop
pub fn is_concave_angle_wound(p1: Vec2, p2: Vec2, p3: Vec2, cw: bool) -> bool {
    let c = (p2 - p1).cross(p3 - p2);
    if cw { c > 0.0 } else { c < 0.0 }
}

// Strict barycentric test: points on the border are outside
pub fn point_in_triangle(p: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> bool {
    let v0 = p3 - p1;
    let v1 = p2 - p1;
    let v2 = p - p1;

    let d00 = v0.dot(v0);
    let d01 = v0.dot(v1);
    let d02 = v0.dot(v2);
    let d11 = v1.dot(v1);
    let d12 = v1.dot(v2);

    let invd = 1.0 / (d00 * d11 - d01 * d01);
    let u = invd * (d11 * d02 - d01 * d12);
    if !(u > 0.0) { return false; }
    let v = invd * (d00 * d12 - d01 * d02);
    if !(v > 0.0) { return false; }
    u + v < 1.0
}

// Crossing number test against a closed polyline
pub fn point_in_polygon(p: Vec2, pts: &[Vec2]) -> bool {
    let mut inside = false;
    let len = pts.len();
    for i in 0..len {
        let a = pts[i];
        let b = pts[(i + 1) % len];
        if (a.y > p.y) != (b.y > p.y) {
            let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x { inside = !inside; }
        }
    }
    inside
}

pub fn signed_area(pts: &[Vec2]) -> Coord {
    let len = pts.len();
    (0..len).map(|i| pts[i].cross(pts[(i + 1) % len])).sum::<Coord>() / 2.0
}

// The implicit line a*x + b*y + c = 0 passing through p along d
pub fn linear_coefficient(p: Vec2, d: Vec2) -> Vec3 { Vec3::new(d.y, -d.x, d.cross(p)) }

pub fn point_line_distance(p: Vec2, p1: Vec2, p2: Vec2) -> Coord {
    let coef = linear_coefficient(p1, p2 - p1);
    coef.dot(Vec3::homogeneous(p)) / Vec2::new(coef.x, coef.y).length()
}

// Recover the parameter of p along the segment p1-p2, using the dominant axis
pub fn linear_reparameterize(p1: Vec2, p2: Vec2, p: Vec2) -> Coord {
    let d = p2 - p1;
    if d.x.abs() > d.y.abs() { (p.x - p1.x) / d.x } else { (p.y - p1.y) / d.y }
}

// Intersection of the lines p1 + t*d1 and p2 + s*d2
pub fn line_intersection(p1: Vec2, d1: Vec2, p2: Vec2, d2: Vec2) -> Option<Vec2> {
    let denom = d1.cross(d2);
    if denom == 0.0 { return None; }
    let t = (p2 - p1).cross(d2) / denom;
    Some(p1 + t * d1)
}

// Two segments cross each other. Segments that only share an endpoint,
// or that are parallel, never cross
pub fn segments_cross(p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2) -> bool {
    if p1 == p3 || p1 == p4 || p2 == p3 || p2 == p4 { return false; }
    let d1 = p2 - p1;
    let d2 = p4 - p3;
    if d1.roughly_zero() || d2.roughly_zero() { return false; }

    match line_intersection(p1, d1, p3, d2) {
        Some(p) => inside01(linear_reparameterize(p1, p2, p)) && inside01(linear_reparameterize(p3, p4, p)),
        None => false
    }
}

// Coefficients per axis, so that point(t) = (x . (t², t, 1), y . (t², t, 1))
pub fn quad_parameter_equation(a: Vec2, b: Vec2, c: Vec2) -> [Vec3; 2] {
    let axis = |a: Coord, b: Coord, c: Coord| Vec3::new(a - 2.0 * b + c, 2.0 * (b - a), a);
    [axis(a.x, b.x, c.x), axis(a.y, b.y, c.y)]
}

pub fn eval_quad(para: &[Vec3; 2], t: Coord) -> Vec2 {
    let tv = Vec3::new(t * t, t, 1.0);
    Vec2::new(para[0].dot(tv), para[1].dot(tv))
}

// Coefficients per axis, so that point(t) = (x . (t³, t², t, 1), y . (t³, t², t, 1))
pub fn cubic_parameter_equation(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> [Vec4; 2] {
    let axis = |a: Coord, b: Coord, c: Coord, d: Coord|
        Vec4::new(d - 3.0 * (c - b) - a, 3.0 * (c - 2.0 * b + a), 3.0 * (b - a), a);
    [axis(a.x, b.x, c.x, d.x), axis(a.y, b.y, c.y, d.y)]
}

pub fn eval_cubic(para: &[Vec4; 2], t: Coord) -> Vec2 {
    let tv = Vec4::powers(t);
    Vec2::new(para[0].dot(tv), para[1].dot(tv))
}

// The inflection points of a cubic lie where x'(t)y''(t) - y'(t)x''(t) = 0.
// The cubic term of that polynomial always vanishes, so only a quadratic
// is left to solve
pub fn cubic_inflections(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> ArrayVec<[Coord; 2]> {
    let para = cubic_parameter_equation(a, b, c, d);

    // First derivative factors: (3x3, 2x2, x1); second derivative: (6x3, 2x2)
    let (fa, fb, fc) = (3.0 * para[0].x, 2.0 * para[0].y, para[0].z);
    let (fd, fe, ff) = (3.0 * para[1].x, 2.0 * para[1].y, para[1].z);
    let (sg, sh) = (6.0 * para[0].x, 2.0 * para[0].y);
    let (si, sj) = (6.0 * para[1].x, 2.0 * para[1].y);

    let a2 = fb * si + fa * sj - fe * sg - fd * sh;
    let a1 = fc * si + fb * sj - ff * sg - fe * sh;
    let a0 = fc * sj - ff * sh;

    let mut result = ArrayVec::new();
    for &t in roots::find_roots_quadratic(a2, a1, a0).as_ref() {
        if inside01(t) && !result.is_full() { result.push(t); }
    }
    result
}

// How many segments a curve with the given control polygon length is flattened into
pub fn interpolate_step(control_length: Coord) -> usize {
    let step = (control_length.round() as usize) >> 3;
    if step < 2 { 2 } else { step }
}
