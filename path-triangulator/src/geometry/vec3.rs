//--------------------------------------------------------------------
// vec3.rs
//--------------------------------------------------------------------
// Provides a three-element vector class, used for homogeneous points,
// linear coefficients and KLM coordinates
//--------------------------------------------------------------------

use crate::derive_more::*;
use crate::approx::AbsDiffEq;

use super::*;

// Vec3
#[derive(Copy, Clone, Add, Sub, Mul, Div, AddAssign, SubAssign, Neg, PartialEq,
    MulAssign, DivAssign, From, Into, Display, Constructor)]
#[display(fmt = "({},{},{})", x, y, z)]
pub struct Vec3 { pub x: Coord, pub y: Coord, pub z: Coord }

impl Vec3 {
    pub fn zero() -> Vec3 { Vec3 { x: 0.0, y: 0.0, z: 0.0 } }
    pub fn homogeneous(p: Vec2) -> Vec3 { Vec3 { x: p.x, y: p.y, z: 1.0 } }

    pub fn dot(&self, other: Vec3) -> Coord { self.x * other.x + self.y * other.y + self.z * other.z }
    pub fn cross(&self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x
        }
    }

    pub fn length_sq(&self) -> Coord { self.dot(*self) }
    pub fn length(&self) -> Coord { self.length_sq().sqrt() }
    pub fn normalized(&self) -> Vec3 {
        let len = self.length();
        if len == 0.0 { *self } else { *self / len }
    }

    // Flip the k and l components, keeping m
    pub fn reverse_kl(&self) -> Vec3 { Vec3 { x: -self.x, y: -self.y, z: self.z } }
}

// Implement scalar * mul as required
impl core::ops::Mul<Vec3> for Coord {
    type Output = Vec3;
    fn mul(self, rhs: Vec3) -> Vec3 { Vec3::new(self * rhs.x, self * rhs.y, self * rhs.z) }
}

impl std::fmt::Debug for Vec3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl AbsDiffEq for Vec3 {
    type Epsilon = Coord;
    fn default_epsilon() -> Coord { Coord::default_epsilon() }
    fn abs_diff_eq(&self, other: &Vec3, epsilon: Coord) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon) && self.y.abs_diff_eq(&other.y, epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
    }
}
