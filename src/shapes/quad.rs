use crate::{Float, Point2f, Point3f, Vec3f};
use crate::geometry::{Ray, bounds::Bounds3f};
use crate::shapes::{Shape, ShapeHit, AreaSample};
use cgmath::InnerSpace;

/// Parallelogram spanned by two edges from a corner. The normal is `edge_u × edge_v`.
#[derive(Clone, Debug)]
pub struct Quad {
    corner: Point3f,
    edge_u: Vec3f,
    edge_v: Vec3f,
    n: Vec3f,
    area: Float,
}

impl Quad {
    pub fn new(corner: Point3f, edge_u: Vec3f, edge_v: Vec3f) -> Self {
        let cross = edge_u.cross(edge_v);
        let area = cross.magnitude();
        Self {
            corner,
            edge_u,
            edge_v,
            n: cross / area,
            area,
        }
    }

    /// Square of half-size `half` centred at `center`, facing `n`. The edges
    /// follow `Frame::from_z(n)`, so they line up with the axes only when `n` does.
    pub fn centered(center: Point3f, n: Vec3f, half: Float) -> Self {
        let frame = crate::Frame::from_z(n);
        let corner = center - frame.x * half - frame.y * half;
        Self::new(corner, frame.x * (2.0 * half), frame.y * (2.0 * half))
    }

    pub fn normal(&self) -> Vec3f {
        self.n
    }
}

impl Shape for Quad {
    fn world_bound(&self) -> Bounds3f {
        Bounds3f::from_point(self.corner)
            .union_point(self.corner + self.edge_u)
            .union_point(self.corner + self.edge_v)
            .union_point(self.corner + self.edge_u + self.edge_v)
    }

    fn intersect(&self, ray: &Ray) -> Option<ShapeHit> {
        let denom = self.n.dot(ray.dir);
        if denom.abs() < 1.0e-9 {
            return None;
        }
        let t = self.n.dot(self.corner - ray.origin) / denom;
        if !(ray.t_min < t && t < ray.t_max) {
            return None;
        }

        let p = ray.at(t);
        let d = p - self.corner;
        // solve d = u * edge_u + v * edge_v in the plane
        let w = self.n / self.area;
        let u = w.dot(d.cross(self.edge_v));
        let v = w.dot(self.edge_u.cross(d));
        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
            return None;
        }

        Some(ShapeHit {
            t,
            p,
            n: self.n,
            dpdu: self.edge_u,
            uv: Point2f::new(u, v),
        })
    }

    fn area(&self) -> Float {
        self.area
    }

    fn sample_area(&self, u: Point2f) -> AreaSample {
        AreaSample {
            p: self.corner + self.edge_u * u.x + self.edge_v * u.y,
            n: self.n,
            uv: u,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_quad_hit_and_miss() {
        let quad = Quad::new(point3f!(-1, -1, 0), vec3f!(2, 0, 0), vec3f!(0, 2, 0));
        assert_abs_diff_eq!(quad.normal(), vec3f!(0, 0, 1), epsilon = 1.0e-6);
        assert_abs_diff_eq!(quad.area(), 4.0, epsilon = 1.0e-6);

        let hit = quad.intersect(&Ray::new(point3f!(0.5, 0.5, 3), vec3f!(0, 0, -1))).unwrap();
        assert_abs_diff_eq!(hit.t, 3.0, epsilon = 1.0e-5);
        assert_abs_diff_eq!(hit.uv.x, 0.75, epsilon = 1.0e-5);
        assert_abs_diff_eq!(hit.uv.y, 0.75, epsilon = 1.0e-5);

        assert!(quad.intersect(&Ray::new(point3f!(1.5, 0, 3), vec3f!(0, 0, -1))).is_none());
    }

    #[test]
    fn test_centered_faces_normal() {
        let quad = Quad::centered(point3f!(0, 2, 0), vec3f!(0, -1, 0), 0.5);
        assert_abs_diff_eq!(quad.normal(), vec3f!(0, -1, 0), epsilon = 1.0e-5);
        assert_abs_diff_eq!(quad.area(), 1.0, epsilon = 1.0e-5);
    }

    #[test]
    fn test_centered_tilted() {
        let n = vec3f!(1, 1, 1).normalize();
        let quad = Quad::centered(point3f!(1, 2, 3), n, 2.0);
        assert_abs_diff_eq!(quad.normal(), n, epsilon = 1.0e-5);
        assert_abs_diff_eq!(quad.area(), 16.0, epsilon = 1.0e-4);

        let mid = quad.sample_area(Point2f::new(0.5, 0.5));
        assert_abs_diff_eq!(mid.p, point3f!(1, 2, 3), epsilon = 1.0e-5);
        // edges lie in the plane, not along the axes
        let edge = quad.sample_area(Point2f::new(1.0, 0.5)).p - mid.p;
        assert_abs_diff_eq!(edge.dot(n), 0.0, epsilon = 1.0e-5);
        assert_abs_diff_eq!(edge.magnitude(), 2.0, epsilon = 1.0e-5);
        assert!(edge.x.abs() < 1.9 && edge.y.abs() < 1.9 && edge.z.abs() < 1.9);
    }
}
