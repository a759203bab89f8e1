//--------------------------------------------------------------------
// klm.rs
//--------------------------------------------------------------------
// Computes the implicit-form (KLM) coordinates that let a fragment
// shader decide on which side of a curve a pixel lies
//--------------------------------------------------------------------

use crate::derive_more::*;
use crate::geometry::*;
use super::cubic_bezier::CubicBezier;

// Texture coordinates for the three points of a quadratic curve.
// The shader tests k² - l against zero, m is kept at 1
pub const QUAD_KLM: [Vec3; 3] = [
    Vec3 { x: 0.0, y: 0.0, z: 1.0 },
    Vec3 { x: 0.5, y: 0.0, z: 1.0 },
    Vec3 { x: 1.0, y: 1.0, z: 1.0 }
];

// Double points closer than this to an endpoint parameter are ignored
const LOOP_PARAMETER_TOLERANCE: Coord = 0.00015;
// ...and so are the ones closer than this to an endpoint in the plane
const LOOP_SPLIT_DISTANCE: Coord = 3.0;

#[derive(Copy, Clone, PartialEq, Debug, Display)]
pub enum CubicKind { Serpentine, Cusp, Loop, Quadratic, Line }

#[derive(Copy, Clone, Debug)]
pub enum KlmResult {
    // One triple per control point, in curve order
    Coords([Vec3; 4]),
    // The curve self-intersects inside the parameter range: split it here and try again
    Split(Coord)
}

pub struct CubicClassification { pub kind: CubicKind, pub d: Vec3 }

pub fn classify_cubic(p: &[Vec2; 4]) -> CubicClassification {
    let b0 = Vec3::homogeneous(p[0]);
    let b1 = Vec3::homogeneous(p[1]);
    let b2 = Vec3::homogeneous(p[2]);
    let b3 = Vec3::homogeneous(p[3]);

    let a1 = b0.dot(b3.cross(b2));
    let a2 = b1.dot(b0.cross(b3));
    let a3 = b2.dot(b1.cross(b0));

    let m = Vec3::new(a1 - 2.0 * a2 + 3.0 * a3, -a2 + 3.0 * a3, 3.0 * a3).normalized();
    let sbst = 3.0 * m.y * m.y - 4.0 * m.x * m.z;
    let discr = m.x * m.x * sbst;
    let d = Vec3::new(m.x.clear_fuzz(), m.y.clear_fuzz(), m.z.clear_fuzz());

    let kind = if discr.fuzzy_zero() {
        if d.x == 0.0 && d.y == 0.0 {
            if d.z == 0.0 { CubicKind::Line } else { CubicKind::Quadratic }
        }
        else if d.x == 0.0 { CubicKind::Cusp }
        else if sbst < 0.0 { CubicKind::Loop }
        else { CubicKind::Serpentine }
    }
    else if discr > 0.0 { CubicKind::Serpentine }
    else { CubicKind::Loop };

    CubicClassification { kind, d }
}

// Bézier control values of the product of three linear functions,
// each one given by its values at t = 0 and t = 1
fn blossom(f: [Coord; 2], g: [Coord; 2], h: [Coord; 2]) -> [Coord; 4] {
    [
        f[0] * g[0] * h[0],
        (f[0] * g[0] * h[1] + f[0] * g[1] * h[0] + f[1] * g[0] * h[0]) / 3.0,
        (f[0] * g[1] * h[1] + f[1] * g[0] * h[1] + f[1] * g[1] * h[0]) / 3.0,
        f[1] * g[1] * h[1]
    ]
}

fn assemble(k: [Coord; 4], l: [Coord; 4], m: [Coord; 4]) -> [Vec3; 4] {
    let mut result = [Vec3::zero(); 4];
    for i in 0..4 { result[i] = Vec3::new(k[i], l[i], m[i]); }
    result
}

fn reversed(coords: [Vec3; 4]) -> [Vec3; 4] {
    let mut result = coords;
    for c in result.iter_mut() { *c = c.reverse_kl(); }
    result
}

// `ndc` drives the classification, `original` is only used to measure
// how far a loop's double point lies from the endpoints
pub fn cubic_klm(ndc: &[Vec2; 4], original: &[Vec2; 4]) -> KlmResult {
    let CubicClassification { kind, d } = classify_cubic(ndc);
    let (d1, d2, d3) = (d.x, d.y, d.z);
    let one = [1.0, 1.0];

    let coords = match kind {
        CubicKind::Serpentine => {
            let sq = (9.0 * d2 * d2 - 12.0 * d1 * d3).sqrt();
            let (ls, lt) = (3.0 * d2 - sq, 6.0 * d1);
            let (ms, mt) = (3.0 * d2 + sq, lt);
            let lf = [ls, ls - lt];
            let mf = [ms, ms - mt];

            let coords = assemble(blossom(lf, mf, one), blossom(lf, lf, lf), blossom(mf, mf, mf));
            if d1 < 0.0 { reversed(coords) } else { coords }
        }
        CubicKind::Cusp => {
            let (ls, lt) = (d3, 3.0 * d2);
            let lf = [ls, ls - lt];
            assemble(blossom(lf, one, one), blossom(lf, lf, lf), [1.0; 4])
        }
        CubicKind::Loop => {
            let sq = (4.0 * d1 * d3 - 3.0 * d2 * d2).sqrt();
            let (ls, lt) = (d2 - sq, 2.0 * d1);
            let (ms, mt) = (d2 + sq, lt);

            // The double point lies on the visible part of the curve
            let curve = CubicBezier { a: original[0], b: original[1], c: original[2], d: original[3] };
            for &q in [ls / lt, ms / mt].iter() {
                if q > LOOP_PARAMETER_TOLERANCE && q < 1.0 - LOOP_PARAMETER_TOLERANCE {
                    let pt = curve.at(q);
                    if (pt - original[0]).length() > LOOP_SPLIT_DISTANCE &&
                        (pt - original[3]).length() > LOOP_SPLIT_DISTANCE {
                        return KlmResult::Split(q);
                    }
                }
            }

            let lf = [ls, ls - lt];
            let mf = [ms, ms - mt];
            let coords = assemble(blossom(lf, mf, one), blossom(lf, lf, mf), blossom(lf, mf, mf));
            if (d1 > 0.0 && coords[0].x < 0.0) || (d1 < 0.0 && coords[0].x > 0.0) { reversed(coords) }
            else { coords }
        }
        CubicKind::Quadratic => {
            let third = 1.0 / 3.0;
            let coords = [
                Vec3::zero(),
                Vec3::new(third, 0.0, third),
                Vec3::new(2.0 * third, third, 2.0 * third),
                Vec3::new(1.0, 1.0, 1.0)
            ];
            if d3 < 0.0 { reversed(coords) } else { coords }
        }
        CubicKind::Line => {
            warn!("Degenerate cubic {:?} classified as a line, KLM coordinates are zero", ndc);
            [Vec3::zero(); 4]
        }
    };

    KlmResult::Coords(coords)
}
