//--------------------------------------------------------------------
// rect.rs
//--------------------------------------------------------------------
// Provides a rectangle class
//--------------------------------------------------------------------

use crate::derive_more::*;

use super::*;
use std::iter::Iterator;
use CoordM::INFINITY;

#[derive(Copy, Clone, PartialEq, Debug, Display, Constructor)]
#[display(fmt = "(x={}, y={}, width={}, height={})", x, y, width, height)]
pub struct Rect { pub x: Coord, pub y: Coord, pub width: Coord, pub height: Coord }

impl Rect {
    pub fn from_ltrb(left: Coord, top: Coord, right: Coord, bottom: Coord) -> Rect {
        Rect::new(left, top, right - left, bottom - top)
    }

    pub fn left(&self) -> Coord { self.x }
    pub fn top(&self) -> Coord { self.y }
    pub fn right(&self) -> Coord { self.x + self.width }
    pub fn bottom(&self) -> Coord { self.y + self.height }

    pub fn area(&self) -> Coord { self.width * self.height }
    pub fn center(&self) -> Vec2 { Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0) }

    // Touching rectangles count as intersecting
    pub fn intersects(&self, other: Rect) -> bool {
        !(self.x > other.right() || other.x > self.right() ||
            self.y > other.bottom() || other.y > self.bottom())
    }

    pub fn contains_rect(&self, other: Rect) -> bool {
        self.x <= other.x && self.y <= other.y && self.right() >= other.right() && self.bottom() >= other.bottom()
    }

    pub fn union(&self, other: Rect) -> Rect {
        Rect::from_ltrb(self.x.min(other.x), self.y.min(other.y),
            self.right().max(other.right()), self.bottom().max(other.bottom()))
    }

    // How much the area grows if other is merged into this rectangle
    pub fn enlargement(&self, other: Rect) -> Coord { self.union(other).area() - self.area() }

    pub fn enclosing_rect(pts: impl Iterator<Item = Vec2>) -> Option<Rect> {
        let mut x1 = INFINITY;
        let mut x2 = -INFINITY;
        let mut y1 = INFINITY;
        let mut y2 = -INFINITY;

        let mut empty = true;
        for pt in pts {
            if x1 > pt.x { x1 = pt.x; }
            if x2 < pt.x { x2 = pt.x; }
            if y1 > pt.y { y1 = pt.y; }
            if y2 < pt.y { y2 = pt.y; }
            empty = false;
        }

        if empty { None } else { Some(Rect::from_ltrb(x1, y1, x2, y2)) }
    }

    pub fn enclosing_rect_of_two_points(pt1: Vec2, pt2: Vec2) -> Rect {
        let x1 = pt1.x.min(pt2.x);
        let x2 = pt1.x.max(pt2.x);
        let y1 = pt1.y.min(pt2.y);
        let y2 = pt1.y.max(pt2.y);
        Rect::from_ltrb(x1, y1, x2, y2)
    }
}
