use crate::{Point3f, Vec3f, Float};
use crate::geometry::bounds::Bounds3f;
use crate::spectrum::Spectrum;
use crate::sampler::Sample5;

pub mod diffuse;
pub mod point;
pub mod sky;

pub use diffuse::DiffuseAreaLight;
pub use point::PointLight;
pub use sky::NativeSky;

/// Incident illumination sampled from a reference point.
#[derive(Clone, Copy, Debug)]
pub struct LightSample {
    /// Unit direction from the reference point towards the light
    pub dir: Vec3f,

    /// Distance to the sampled point; infinite for the environment
    pub dist: Float,

    pub radiance: Spectrum,

    /// Solid-angle density, or 1 for delta lights
    pub pdf: Float,

    pub is_delta: bool,
}

/// A photon leaving a light.
#[derive(Clone, Copy, Debug)]
pub struct LightEmitSample {
    pub pos: Point3f,
    pub dir: Vec3f,
    pub normal: Vec3f,
    pub radiance: Spectrum,
    pub pdf_pos: Float,
    pub pdf_dir: Float,
}

pub enum Light {
    Area(DiffuseAreaLight),
    Point(PointLight),
    Sky(NativeSky),
}

impl Light {
    pub fn sample_li(&self, reference: Point3f, sample: Sample5) -> Option<LightSample> {
        match self {
            Light::Area(l) => l.sample_li(reference, sample),
            Light::Point(l) => l.sample_li(reference),
            Light::Sky(l) => l.sample_li(sample),
        }
    }

    /// Solid-angle density of `sample_li` choosing the point `pos` (normal `n`) from `reference`.
    /// Environment lights ignore the position and use the direction only.
    pub fn pdf_li(&self, reference: Point3f, pos: Point3f, n: Vec3f) -> Float {
        match self {
            Light::Area(l) => l.pdf_li(reference, pos, n),
            Light::Point(_) => 0.0,
            Light::Sky(l) => l.pdf_li(),
        }
    }

    pub fn sample_emit(&self, sample: Sample5) -> Option<LightEmitSample> {
        match self {
            Light::Area(l) => l.sample_emit(sample),
            Light::Point(l) => l.sample_emit(sample),
            Light::Sky(l) => l.sample_emit(sample),
        }
    }

    pub fn is_delta(&self) -> bool {
        matches!(self, Light::Point(_))
    }

    pub fn preprocess(&mut self, world_bound: &Bounds3f) {
        if let Light::Sky(sky) = self {
            sky.preprocess(world_bound);
        }
    }

    pub fn as_area(&self) -> Option<&DiffuseAreaLight> {
        match self {
            Light::Area(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_sky(&self) -> Option<&NativeSky> {
        match self {
            Light::Sky(l) => Some(l),
            _ => None,
        }
    }
}
