use crate::{Float, Point2f, Point3f, Vec3f};
use crate::geometry::{Ray, bounds::Bounds3f};
use crate::shapes::{Shape, ShapeHit, AreaSample};
use crate::sampling::uniform_sample_sphere;
use crate::consts::PI;
use cgmath::{InnerSpace, EuclideanSpace};

#[derive(Clone, Debug)]
pub struct Sphere {
    center: Point3f,
    radius: Float,
}

impl Sphere {
    pub fn new(center: Point3f, radius: Float) -> Self {
        Self { center, radius }
    }

    pub fn center(&self) -> Point3f {
        self.center
    }

    pub fn radius(&self) -> Float {
        self.radius
    }

    fn hit_at(&self, ray: &Ray, t: Float) -> ShapeHit {
        let mut p = ray.at(t);
        let n = (p - self.center).normalize();
        // reproject to cut down on error from the quadratic
        p = self.center + n * self.radius;

        let mut phi = Float::atan2(n.y, n.x);
        if phi < 0.0 { phi += 2.0 * PI }
        let theta = n.z.clamp(-1.0, 1.0).acos();

        let dpdu = if n.x == 0.0 && n.y == 0.0 {
            vec3f!(1, 0, 0)
        } else {
            vec3f!(-n.y, n.x, 0)
        };

        ShapeHit {
            t,
            p,
            n,
            dpdu,
            uv: Point2f::new(phi / (2.0 * PI), theta / PI),
        }
    }
}

impl Shape for Sphere {
    fn world_bound(&self) -> Bounds3f {
        let r = vec3f!(self.radius, self.radius, self.radius);
        Bounds3f::with_bounds(self.center - r, self.center + r)
    }

    fn intersect(&self, ray: &Ray) -> Option<ShapeHit> {
        let oc: Vec3f = ray.origin - self.center;
        let a = ray.dir.magnitude2();
        let half_b = oc.dot(ray.dir);
        let c = oc.magnitude2() - self.radius * self.radius;

        let discrim = half_b * half_b - a * c;
        if discrim < 0.0 {
            return None;
        }
        let root = discrim.sqrt();

        // closest root inside the ray's interval
        let t0 = (-half_b - root) / a;
        let t1 = (-half_b + root) / a;
        let t = if ray.t_min < t0 && t0 < ray.t_max {
            t0
        } else if ray.t_min < t1 && t1 < ray.t_max {
            t1
        } else {
            return None;
        };

        Some(self.hit_at(ray, t))
    }

    fn area(&self) -> Float {
        4.0 * PI * self.radius * self.radius
    }

    fn sample_area(&self, u: Point2f) -> AreaSample {
        let n = uniform_sample_sphere(u);
        let p = self.center + n * self.radius;
        let theta = n.z.clamp(-1.0, 1.0).acos();
        let mut phi = Float::atan2(n.y, n.x);
        if phi < 0.0 { phi += 2.0 * PI }
        AreaSample { p, n, uv: Point2f::new(phi / (2.0 * PI), theta / PI) }
    }
}
