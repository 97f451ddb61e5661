#[macro_use] pub mod macros; // must stay at the top
pub mod geometry;
pub mod spectrum;
pub mod parallel;
pub mod error;
pub mod sampling;
pub mod sampler;
pub mod fresnel;
pub mod reflection;
pub mod material;
pub mod shapes;
pub mod interaction;
pub mod light;
pub mod scene;
pub mod camera;
pub mod integrator;
pub mod film;
pub mod postprocess;
pub mod imageio;
pub mod renderer;
pub mod scenes;

pub use geometry::*;
pub use error::ConstructionError;

use cgmath::{Point2, Point3, Vector2, Vector3, InnerSpace};

pub type Float = f32;

pub type Point2f = Point2<Float>;
pub type Point3f = Point3<Float>;
pub type Vec2f = Vector2<Float>;
pub type Vec3f = Vector3<Float>;
pub type Vec3i = Vector3<i32>;

pub mod consts {
    pub use std::f32::consts::*;

    /// 1 / (4 pi)
    pub const INV_4_PI: f32 = FRAC_1_PI * 0.25;
}

/// Relative epsilon used to reject degenerate pdfs and to offset spawned rays.
pub const EPS: Float = 1.0e-4;

pub const INFINITY: Float = std::f32::INFINITY;

pub fn abs_dot(v1: Vec3f, v2: Vec3f) -> Float {
    v1.dot(v2).abs()
}

pub fn lerp(t: Float, v1: Float, v2: Float) -> Float {
    (1.0 - t) * v1 + t * v2
}
