use crate::{Float, Vec3f, Frame, EPS};
use crate::spectrum::Spectrum;
use crate::material::TransportMode;
use crate::sampler::Sample3;
use crate::reflection::{BxDF, BxdfType, BsdfSample, LambertianReflection, DisneyBrdf, GlassBtdf};
use crate::sampling::{cosine_sample_hemisphere, cosine_hemisphere_pdf};
use crate::consts::FRAC_1_PI;
use cgmath::InnerSpace;

/// The closed set of lobes a material can produce.
#[derive(Clone, Copy, Debug)]
pub enum Lobe {
    Diffuse(LambertianReflection),
    Disney(DisneyBrdf),
    Glass(GlassBtdf),
}

impl Lobe {
    fn bxdf(&self) -> &dyn BxDF {
        match self {
            Lobe::Diffuse(l) => l,
            Lobe::Disney(l) => l,
            Lobe::Glass(l) => l,
        }
    }
}

/// A lobe placed at a surface point.
///
/// Directions passed in and out are in world space and point away from the surface.
/// The lobe lives in the shading frame; the geometry frame is used to catch
/// directions on which the two frames disagree.
#[derive(Clone, Copy, Debug)]
pub struct Bsdf {
    geometry: Frame,
    shading: Frame,
    lobe: Lobe,
}

impl Bsdf {
    pub fn new(geometry: Frame, shading: Frame, lobe: Lobe) -> Self {
        Self { geometry, shading, lobe }
    }

    pub fn lobe(&self) -> &Lobe {
        &self.lobe
    }

    pub fn shading_normal(&self) -> Vec3f {
        self.shading.z
    }

    /// Shading and geometric normals put `w` on opposite sides.
    fn causes_black_fringes(&self, w: Vec3f) -> bool {
        self.geometry.in_positive_hemisphere(w) != self.shading.in_positive_hemisphere(w)
    }

    fn normal_correction(&self, wi: Vec3f) -> Float {
        let denom = self.geometry.z.dot(wi).abs();
        if denom < EPS {
            1.0
        } else {
            self.shading.z.dot(wi).abs() / denom
        }
    }

    fn eval_for_black_fringes(&self, wi: Vec3f, wo: Vec3f) -> Spectrum {
        if self.geometry.in_positive_hemisphere(wi) && self.geometry.in_positive_hemisphere(wo) {
            self.albedo() * FRAC_1_PI
        } else {
            Spectrum::zero()
        }
    }

    fn pdf_for_black_fringes(&self, wi: Vec3f, wo: Vec3f) -> Float {
        if self.geometry.in_positive_hemisphere(wi) && self.geometry.in_positive_hemisphere(wo) {
            cosine_hemisphere_pdf(self.geometry.z.dot(wi.normalize()))
        } else {
            0.0
        }
    }

    fn sample_for_black_fringes(&self, wo: Vec3f, sample: Sample3) -> Option<BsdfSample> {
        if !self.geometry.in_positive_hemisphere(wo) {
            return None;
        }
        let (_, u) = sample.split();
        let local = cosine_sample_hemisphere(u);
        let pdf = cosine_hemisphere_pdf(local.z);
        if pdf < EPS {
            return None;
        }
        Some(BsdfSample {
            dir: self.geometry.local_to_world(local).normalize(),
            f: self.albedo() * FRAC_1_PI,
            pdf,
            is_delta: false,
        })
    }

    pub fn eval(&self, wi: Vec3f, wo: Vec3f, mode: TransportMode) -> Spectrum {
        let bxdf = self.lobe.bxdf();
        if bxdf.is_delta() {
            return Spectrum::zero();
        }
        if self.causes_black_fringes(wi) || self.causes_black_fringes(wo) {
            return self.eval_for_black_fringes(wi, wo);
        }
        let lwi = self.shading.world_to_local(wi).normalize();
        let lwo = self.shading.world_to_local(wo).normalize();
        bxdf.f(lwi, lwo, mode) * self.normal_correction(wi)
    }

    pub fn sample(&self, wo: Vec3f, mode: TransportMode, sample: Sample3) -> Option<BsdfSample> {
        self.sample_with(wo, mode, sample, BxdfType::all())
    }

    /// Like `sample`, but only lobes of the `allowed` types may be chosen.
    pub fn sample_with(&self, wo: Vec3f, mode: TransportMode, sample: Sample3, allowed: BxdfType) -> Option<BsdfSample> {
        let bxdf = self.lobe.bxdf();
        let lwo = self.shading.world_to_local(wo).normalize();

        if bxdf.is_delta() {
            let s = bxdf.sample_f(lwo, mode, sample, allowed)?;
            return Some(BsdfSample {
                dir: self.shading.local_to_world(s.wi).normalize(),
                f: s.f,
                pdf: s.pdf,
                is_delta: true,
            });
        }

        if self.causes_black_fringes(wo) {
            return self.sample_for_black_fringes(wo, sample);
        }

        let s = bxdf.sample_f(lwo, mode, sample, allowed)?;
        let dir = self.shading.local_to_world(s.wi).normalize();
        // `pdf` gives these directions zero density
        if self.causes_black_fringes(dir) {
            return None;
        }

        // re-evaluate through the full BSDF so the sample agrees with `eval` and `pdf`
        let pdf = self.pdf(dir, wo);
        if pdf < EPS {
            return None;
        }
        Some(BsdfSample {
            dir,
            f: self.eval(dir, wo, mode),
            pdf,
            is_delta: false,
        })
    }

    pub fn pdf(&self, wi: Vec3f, wo: Vec3f) -> Float {
        let bxdf = self.lobe.bxdf();
        if bxdf.is_delta() {
            return 0.0;
        }
        if self.causes_black_fringes(wo) {
            return self.pdf_for_black_fringes(wi, wo);
        }
        if self.causes_black_fringes(wi) {
            return 0.0;
        }
        let lwi = self.shading.world_to_local(wi).normalize();
        let lwo = self.shading.world_to_local(wo).normalize();
        bxdf.pdf(lwi, lwo)
    }

    pub fn albedo(&self) -> Spectrum {
        self.lobe.bxdf().albedo()
    }

    pub fn is_delta(&self) -> bool {
        self.lobe.bxdf().is_delta()
    }

    pub fn has_diffuse_component(&self) -> bool {
        !self.is_delta()
    }
}
