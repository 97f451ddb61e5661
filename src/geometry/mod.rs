use crate::{Vec3f, Point3f, Float, INFINITY};
use cgmath::prelude::*;

pub mod bounds;

pub use bounds::*;

pub fn spherical_direction(sin_theta: Float, cos_theta: Float, phi: Float) -> Vec3f {
    vec3f!(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
}

/// Mirror `wo` about `n`. Both point away from the surface.
pub fn reflect(wo: Vec3f, n: Vec3f) -> Vec3f {
    -wo + 2.0 * wo.dot(n) * n
}

#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Point3f,
    pub dir: Vec3f,
    pub t_min: Float,
    pub t_max: Float,
}

impl Ray {
    pub fn new(origin: Point3f, dir: Vec3f) -> Self {
        Self {
            origin, dir, t_min: 0.0, t_max: INFINITY
        }
    }

    pub fn with_bounds(origin: Point3f, dir: Vec3f, t_min: Float, t_max: Float) -> Self {
        Self { origin, dir, t_min, t_max }
    }

    pub fn at(&self, t: Float) -> Point3f {
        self.origin + (self.dir * t)
    }
}

/// Orthonormal coordinate system. `z` is the normal direction for surface frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub x: Vec3f,
    pub y: Vec3f,
    pub z: Vec3f,
}

impl Frame {
    pub fn new(x: Vec3f, y: Vec3f, z: Vec3f) -> Self {
        Self { x, y, z }
    }

    /// Build a frame around the unit vector `z` (Duff et al., "Building an Orthonormal Basis, Revisited").
    pub fn from_z(z: Vec3f) -> Self {
        let z = z.normalize();
        let sign = 1.0f32.copysign(z.z);
        let a = -1.0 / (sign + z.z);
        let b = z.x * z.y * a;
        let x = vec3f!(1.0 + sign * z.x * z.x * a, sign * b, -sign * z.x);
        let y = vec3f!(b, sign + z.y * z.y * a, -z.y);
        Self { x, y, z }
    }

    /// Build a frame with normal `z` whose `x` axis follows `dpdu` projected onto the tangent plane.
    pub fn from_z_x(z: Vec3f, dpdu: Vec3f) -> Self {
        let z = z.normalize();
        let tangent = dpdu - z * z.dot(dpdu);
        if tangent.magnitude2() < 1.0e-12 {
            return Self::from_z(z);
        }
        let x = tangent.normalize();
        let y = z.cross(x);
        Self { x, y, z }
    }

    pub fn world_to_local(&self, v: Vec3f) -> Vec3f {
        vec3f!(v.dot(self.x), v.dot(self.y), v.dot(self.z))
    }

    pub fn local_to_world(&self, v: Vec3f) -> Vec3f {
        self.x * v.x + self.y * v.y + self.z * v.z
    }

    pub fn in_positive_hemisphere(&self, w: Vec3f) -> bool {
        w.dot(self.z) > 0.0
    }
}
