use bitflags::bitflags;
use crate::{Vec3f, Float};
use crate::spectrum::Spectrum;
use crate::material::TransportMode;
use crate::sampler::Sample3;
use crate::sampling::{cosine_sample_hemisphere, cosine_hemisphere_pdf};
use crate::consts::FRAC_1_PI;

pub mod bsdf;
pub mod microfacet;
pub mod disney;
pub mod dielectric;

pub use bsdf::{Bsdf, Lobe};
pub use disney::DisneyBrdf;
pub use dielectric::GlassBtdf;

bitflags! {
    pub struct BxdfType: u8 {
        const REFLECTION = 1;
        const TRANSMISSION = 1 << 1;
        const DIFFUSE = 1 << 2;
        const GLOSSY = 1 << 3;
        const SPECULAR = 1 << 4;
    }
}

pub(crate) fn cos_theta(w: Vec3f) -> Float { w.z }
pub(crate) fn cos2_theta(w: Vec3f) -> Float { w.z * w.z }
pub(crate) fn abs_cos_theta(w: Vec3f) -> Float { w.z.abs() }

pub(crate) fn sin2_theta(w: Vec3f) -> Float {
    Float::max(0.0, 1.0 - cos2_theta(w))
}

pub(crate) fn sin_theta(w: Vec3f) -> Float {
    sin2_theta(w).sqrt()
}

pub(crate) fn tan_theta(w: Vec3f) -> Float {
    sin_theta(w) / cos_theta(w)
}

/// Direction sampled by a lobe, in the lobe's local frame.
#[derive(Clone, Copy, Debug)]
pub struct ScatterSample {
    pub f: Spectrum,
    pub wi: Vec3f,
    pub pdf: Float,
    pub is_delta: bool,
}

/// Direction sampled by a [`Bsdf`], in world space.
#[derive(Clone, Copy, Debug)]
pub struct BsdfSample {
    pub dir: Vec3f,
    pub f: Spectrum,
    pub pdf: Float,
    pub is_delta: bool,
}

/// A scattering lobe expressed in its own shading frame, where `z` is the normal.
///
/// Argument order follows light flow: `wi` is where light comes from, `wo` where it leaves.
pub trait BxDF {
    fn get_type(&self) -> BxdfType;

    fn matches_flags(&self, t: BxdfType) -> bool {
        t.contains(self.get_type())
    }

    fn f(&self, wi: Vec3f, wo: Vec3f, mode: TransportMode) -> Spectrum;

    /// Sample an incident direction for `wo`, restricted to the lobe types in `allowed`.
    fn sample_f(&self, wo: Vec3f, mode: TransportMode, sample: Sample3, allowed: BxdfType) -> Option<ScatterSample>;

    fn pdf(&self, wi: Vec3f, wo: Vec3f) -> Float;

    fn albedo(&self) -> Spectrum;

    fn is_delta(&self) -> bool {
        self.get_type().contains(BxdfType::SPECULAR)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LambertianReflection {
    pub r: Spectrum,
}

impl LambertianReflection {
    pub fn new(r: Spectrum) -> Self {
        Self { r }
    }
}

impl BxDF for LambertianReflection {
    fn get_type(&self) -> BxdfType {
        BxdfType::REFLECTION | BxdfType::DIFFUSE
    }

    fn f(&self, wi: Vec3f, wo: Vec3f, _mode: TransportMode) -> Spectrum {
        if wi.z <= 0.0 || wo.z <= 0.0 {
            return Spectrum::zero();
        }
        self.r * FRAC_1_PI
    }

    fn sample_f(&self, wo: Vec3f, mode: TransportMode, sample: Sample3, allowed: BxdfType) -> Option<ScatterSample> {
        if wo.z <= 0.0 || !self.matches_flags(allowed) {
            return None;
        }
        let (_, u) = sample.split();
        let wi = cosine_sample_hemisphere(u);
        Some(ScatterSample {
            f: self.f(wi, wo, mode),
            wi,
            pdf: self.pdf(wi, wo),
            is_delta: false,
        })
    }

    fn pdf(&self, wi: Vec3f, wo: Vec3f) -> Float {
        if wi.z <= 0.0 || wo.z <= 0.0 {
            0.0
        } else {
            cosine_hemisphere_pdf(wi.z)
        }
    }

    fn albedo(&self) -> Spectrum {
        self.r
    }
}
