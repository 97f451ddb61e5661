use crate::{Point2f, Vec3f, Point3f, Float, Ray, Frame, EPS};
use crate::material::Material;
use crate::light::Light;
use cgmath::InnerSpace;

/// A ray hit on a scene entity.
#[derive(Clone, Copy)]
pub struct SurfaceHit<'s> {
    pub p: Point3f,

    /// Ray parameter of the hit
    pub t: Float,

    /// Unit direction back towards the ray origin
    pub wr: Vec3f,

    pub uv: Point2f,

    /// `z` is the geometric normal
    pub geometry: Frame,

    pub shading: Frame,

    pub material: &'s Material,

    /// Set when the entity also emits light
    pub light: Option<&'s Light>,
}

impl<'s> SurfaceHit<'s> {
    /// Point pushed off the surface to the side `dir` leaves on.
    pub fn eps_offset(&self, dir: Vec3f) -> Point3f {
        let scale = EPS * self.p.x.abs().max(self.p.y.abs()).max(self.p.z.abs()).max(1.0);
        let n = self.geometry.z;
        if n.dot(dir) > 0.0 {
            self.p + n * scale
        } else {
            self.p - n * scale
        }
    }

    pub fn spawn_ray(&self, dir: Vec3f) -> Ray {
        Ray::new(self.eps_offset(dir), dir)
    }

    /// Ray towards `target` that stops short of it.
    pub fn spawn_ray_to(&self, target: Point3f) -> Ray {
        let origin = self.eps_offset(target - self.p);
        let d = target - origin;
        let dist = d.magnitude();
        Ray::with_bounds(origin, d / dist, 0.0, dist * (1.0 - 1.0e-3))
    }
}
