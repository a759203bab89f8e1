//--------------------------------------------------------------------
// properties.rs
//--------------------------------------------------------------------
// Invariants of the triangulation, the span index and the batches
//--------------------------------------------------------------------

extern crate path_triangulator;

use path_triangulator::*;
use path_triangulator::geometry::is_concave_angle;
use path_triangulator::triangulation::*;

fn p(x: Coord, y: Coord) -> Vec2 { Vec2::new(x, y) }

// Deterministic points in [0, 100) x [0, 100)
fn scattered_points(count: usize, seed: u64) -> Vec<Vec2> {
    let mut state = seed;
    let mut next = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (state >> 11) as Coord / (1u64 << 53) as Coord * 100.0
    };
    (0..count).map(|_| { let x = next(); let y = next(); p(x, y) }).collect()
}

fn triangulate(points: &[Vec2]) -> DelaunayTriangulation {
    let mut dt = DelaunayTriangulation::new();
    dt.initialize(points.iter().enumerate().map(|(i, &q)| DtJoint::new(q, Binding(i))));
    dt.run();
    dt
}

// Positive when d lies inside the circumcircle of the counter-clockwise a, b, c
fn in_circle(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> Coord {
    let (ad, bd, cd) = (a - d, b - d, c - d);
    ad.length_sq() * bd.cross(cd) - bd.length_sq() * ad.cross(cd) + cd.length_sq() * ad.cross(bd)
}

#[test]
fn delaunay_circles_are_empty() {
    for seed in 1..6 {
        let points = scattered_points(150, seed);
        let mut dt = triangulate(&points);
        dt.check_linkage();

        let triangles = dt.collect_triangles();
        assert!(triangles.len() >= points.len() - 2);

        for t in &triangles {
            let [a, b, c] = [points[t.bindings[0].0], points[t.bindings[1].0], points[t.bindings[2].0]];
            assert!(is_concave_angle(a, b, c), "Triangle {} {} {} is not counter-clockwise", a, b, c);
            for (i, &d) in points.iter().enumerate() {
                if t.bindings.iter().any(|b| b.0 == i) { continue; }
                assert!(in_circle(a, b, c, d) < 1e-6, "Point {} is inside the circle of {} {} {}", d, a, b, c);
            }
        }
    }
}

#[test]
fn half_edges_stay_linked() {
    let points = scattered_points(80, 42);
    let dt = triangulate(&points);

    for e in dt.edges() {
        assert_eq!(sym(sym(e)), e);
        assert_eq!(dt.org(e), dt.dest(sym(e)));
        assert_eq!(dt.dest(e), dt.org(dt.left_next(e)));
        assert_eq!(dt.left_next(dt.left_prev(e)), e);
    }

    // The fan around each vertex closes after exactly its degree
    let edges: Vec<_> = dt.edges().collect();
    for &e in &edges {
        let origin = dt.org(e);
        let degree = edges.iter().filter(|&&f| dt.org(f) == origin).count();

        let mut steps = 1;
        let mut f = dt.org_next(e);
        while f != e {
            assert_eq!(dt.org(f), origin, "Edge {} left the fan of {}", f, origin);
            steps += 1;
            assert!(steps <= degree, "The fan of {} does not close", origin);
            f = dt.org_next(f);
        }
        assert_eq!(steps, degree, "The fan of {} skips edges", origin);
    }

    // Three distinct bindings on every triangle
    let mut dt = dt;
    for t in dt.collect_triangles() {
        let b = t.bindings;
        assert!(b[0] != b[1] && b[1] != b[2] && b[2] != b[0]);
    }
}

#[test]
fn constraints_are_preserved() {
    let mut grid = Vec::new();
    for i in 0..8 {
        for j in 0..8 { grid.push(p(i as Coord * 10.0 + (j % 2) as Coord * 3.0, j as Coord * 10.0 + (i % 3) as Coord)); }
    }
    let mut dt = triangulate(&grid);

    let segments = [(grid[0], grid[63]), (grid[1], grid[6]), (grid[56], grid[62])];
    let mut inserted = Vec::new();
    for &(a, b) in segments.iter() {
        let pieces = dt.add_constraint_split(a, b).unwrap();
        assert_eq!(dt.org(pieces[0]), a);
        assert_eq!(dt.dest(pieces[pieces.len() - 1]), b);
        for w in pieces.windows(2) { assert_eq!(dt.dest(w[0]), dt.org(w[1])); }
        inserted.extend(pieces.iter().map(|&e| (dt.org(e), dt.dest(e))));
    }
    dt.check_linkage();

    // None of the segments cross, so later insertions keep the earlier ones
    for &(a, b) in &inserted {
        let e = dt.find_edge(a, b);
        assert!(e.map_or(false, |e| dt.is_constraint(e)), "Constraint {} -> {} was lost", a, b);
    }
}

fn shapes() -> Vec<Path> {
    vec![
        vec![
            PathCommand::MoveTo(p(0.0, 0.0)),
            PathCommand::LineTo(p(0.0, 100.0)),
            PathCommand::QuadraticBezierTo(p(50.0, 60.0), p(100.0, 100.0)),
            PathCommand::LineTo(p(100.0, 0.0)),
            PathCommand::ClosePath,
            PathCommand::MoveTo(p(40.0, 40.0)),
            PathCommand::LineTo(p(60.0, 40.0)),
            PathCommand::LineTo(p(60.0, 65.0)),
            PathCommand::QuadraticBezierTo(p(50.0, 75.0), p(40.0, 65.0)),
            PathCommand::ClosePath
        ],
        vec![
            PathCommand::MoveTo(p(10.0, 10.0)),
            PathCommand::CubicBezierTo(p(0.0, 80.0), p(60.0, 120.0), p(110.0, 90.0)),
            PathCommand::QuadraticBezierTo(p(150.0, 40.0), p(100.0, 10.0)),
            PathCommand::LineTo(p(60.0, 30.0)),
            PathCommand::ClosePath,
            PathCommand::MoveTo(p(50.0, 60.0)),
            PathCommand::QuadraticBezierTo(p(70.0, 40.0), p(90.0, 60.0)),
            PathCommand::LineTo(p(70.0, 80.0)),
            PathCommand::ClosePath
        ]
    ]
}

#[test]
fn span_indices_are_clean() {
    for path in shapes() {
        let mut processor = LoopBlinnProcessor::new(Default::default());
        processor.proceed(&path).unwrap();

        for poly in processor.polygons() {
            let index = poly.span_index();
            index.check_structure();

            let entries = index.entries();
            for (i, &(r1, &s1)) in entries.iter().enumerate() {
                for &(r2, &s2) in &entries[i + 1..] {
                    if !r1.intersects(r2) { continue; }
                    let (a, b) = (&processor.spans()[s1], &processor.spans()[s2]);
                    assert!(!a.is_overlapped(b, processor.graph()), "Spans {} and {} overlap", a.lines, b.lines);
                }
            }
        }
    }
}

#[test]
fn batches_never_overlap() {
    let mut processors = Vec::new();
    for path in shapes() {
        let mut processor = LoopBlinnProcessor::new(Default::default());
        processor.proceed(&path).unwrap();
        processors.push(processor);
    }

    let mut batcher = BatchProcessor::new();
    for (z, processor) in processors.iter().enumerate() { batcher.add_decomposition(processor, z as i32); }
    batcher.finish_batching();
    assert!(batcher.triangles().len() > 0);

    for batch in batcher.batches() {
        let ids = batch.triangles();
        for (i, &t1) in ids.iter().enumerate() {
            for &t2 in &ids[i + 1..] {
                let (a, b) = (batcher.triangle(t1), batcher.triangle(t2));
                assert!(!a.is_overlapped(b) && !b.is_overlapped(a), "Triangles {} and {} of a {} batch overlap", t1, t2, batch.kind());
            }
        }
    }
}
