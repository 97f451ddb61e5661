use crate::geometry::bounds::Bounds3f;
use crate::geometry::Ray;
use crate::{Float, Point2f, Point3f, Vec3f};

pub mod sphere;
pub mod quad;

pub use sphere::Sphere;
pub use quad::Quad;

/// Raw hit on a shape, before the scene attaches frames and an entity.
#[derive(Clone, Copy, Debug)]
pub struct ShapeHit {
    pub t: Float,
    pub p: Point3f,
    /// Outward geometric normal
    pub n: Vec3f,
    pub dpdu: Vec3f,
    pub uv: Point2f,
}

/// Point sampled uniformly by area.
#[derive(Clone, Copy, Debug)]
pub struct AreaSample {
    pub p: Point3f,
    pub n: Vec3f,
    pub uv: Point2f,
}

pub trait Shape: Sync + Send {
    fn world_bound(&self) -> Bounds3f;

    fn intersect(&self, ray: &Ray) -> Option<ShapeHit>;

    fn intersect_test(&self, ray: &Ray) -> bool {
        self.intersect(ray).is_some()
    }

    fn area(&self) -> Float;

    /// Uniform-by-area sample; the density is `1 / area()`.
    fn sample_area(&self, u: Point2f) -> AreaSample;
}
