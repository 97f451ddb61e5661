use crate::{Vec3f, Float, lerp, EPS};
use crate::spectrum::Spectrum;
use crate::material::TransportMode;
use crate::sampler::Sample3;
use crate::reflection::{BxDF, BxdfType, ScatterSample};
use crate::reflection::microfacet::{Gtr2, gtr1, sample_gtr1, smith_gtr2};
use crate::fresnel::schlick_weight;
use crate::sampling::{cosine_sample_hemisphere, cosine_hemisphere_pdf};
use crate::geometry::reflect;
use crate::consts::FRAC_1_PI;
use cgmath::InnerSpace;

/// Probabilities of sampling the diffuse, specular and clearcoat lobes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleWeights {
    pub diffuse: Float,
    pub specular: Float,
    pub clearcoat: Float,
}

impl SampleWeights {
    pub fn new(metallic: Float, clearcoat: Float) -> Self {
        let diffuse = Float::min(0.8, 1.0 - metallic);
        let specular = (1.0 - diffuse) * 2.0 / (2.0 + clearcoat);
        let clearcoat = (1.0 - diffuse) * clearcoat / (2.0 + clearcoat);
        Self { diffuse, specular, clearcoat }
    }
}

/// Burley's principled reflection model: diffuse with retro-reflection and
/// subsurface approximation, sheen, anisotropic GTR2 specular and a GTR1 clearcoat.
#[derive(Clone, Copy, Debug)]
pub struct DisneyBrdf {
    base_color: Spectrum,
    metallic: Float,
    subsurface: Float,
    specular: Float,
    specular_tint: Float,
    roughness: Float,
    sheen: Float,
    sheen_tint: Float,
    clearcoat: Float,

    distribution: Gtr2,
    clearcoat_alpha: Float,
    weights: SampleWeights,
}

fn f_diffuse(fi: Float, fo: Float, cos_theta_d2: Float, roughness: Float) -> Float {
    let fd90 = 0.5 + 2.0 * cos_theta_d2 * roughness;
    (1.0 + (fd90 - 1.0) * fi) * (1.0 + (fd90 - 1.0) * fo)
}

fn f_subsurface(cos_theta_i: Float, cos_theta_o: Float, fi: Float, fo: Float, cos_theta_d2: Float, roughness: Float) -> Float {
    let fss90 = cos_theta_d2 * roughness;
    let fss = (1.0 + (fss90 - 1.0) * fi) * (1.0 + (fss90 - 1.0) * fo);
    1.25 * (fss * (1.0 / (cos_theta_i + cos_theta_o) - 0.5) + 0.5)
}

impl DisneyBrdf {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        base_color: Spectrum,
        metallic: Float,
        subsurface: Float,
        specular: Float,
        specular_tint: Float,
        roughness: Float,
        anisotropic: Float,
        sheen: Float,
        sheen_tint: Float,
        clearcoat: Float,
        clearcoat_gloss: Float,
    ) -> Self {
        Self {
            base_color,
            metallic,
            subsurface,
            specular,
            specular_tint,
            roughness,
            sheen,
            sheen_tint,
            clearcoat,
            distribution: Gtr2::from_roughness(roughness, anisotropic),
            clearcoat_alpha: lerp(clearcoat_gloss, 0.1, 0.01),
            weights: SampleWeights::new(metallic, clearcoat),
        }
    }

    pub fn sample_weights(&self) -> SampleWeights {
        self.weights
    }

    fn tint(&self) -> Spectrum {
        let lum = self.base_color.luminance();
        if lum < EPS {
            Spectrum::one()
        } else {
            self.base_color / lum
        }
    }
}

impl BxDF for DisneyBrdf {
    fn get_type(&self) -> BxdfType {
        BxdfType::REFLECTION | BxdfType::DIFFUSE | BxdfType::GLOSSY
    }

    fn f(&self, wi: Vec3f, wo: Vec3f, _mode: TransportMode) -> Spectrum {
        if wi.z <= 0.0 || wo.z <= 0.0 {
            return Spectrum::zero();
        }
        let wh = (wi + wo).normalize();

        let cos_theta_i = wi.z;
        let cos_theta_o = wo.z;
        let cos_theta_d = wi.dot(wh);
        let cos_theta_d2 = cos_theta_d * cos_theta_d;

        let fi = schlick_weight(cos_theta_i);
        let fo = schlick_weight(cos_theta_o);
        let fd = schlick_weight(cos_theta_d);

        let c_tint = self.tint();

        // diffuse, subsurface and sheen
        let mut f_d = 0.0;
        let mut f_ss = 0.0;
        let mut f_sh = Spectrum::zero();
        if self.metallic < 1.0 {
            if self.subsurface < 1.0 {
                f_d = f_diffuse(fi, fo, cos_theta_d2, self.roughness);
            }
            if self.subsurface > 0.0 {
                f_ss = f_subsurface(cos_theta_i, cos_theta_o, fi, fo, cos_theta_d2, self.roughness);
            }
            if self.sheen > 0.0 {
                f_sh = Spectrum::lerp(self.sheen_tint, Spectrum::one(), c_tint) * self.sheen * fd;
            }
        }

        // specular
        let c_spec = Spectrum::lerp(
            self.metallic,
            0.08 * self.specular * Spectrum::lerp(self.specular_tint, Spectrum::one(), c_tint),
            self.base_color,
        );
        let f_s = c_spec + (Spectrum::one() - c_spec) * fd;
        let g_s = self.distribution.g1(wi) * self.distribution.g1(wo);
        let d_s = self.distribution.d(wh);

        // clearcoat
        let (f_c, g_c, d_c) = if self.clearcoat > 0.0 {
            (
                0.04 + 0.96 * fd,
                smith_gtr2(wi, 0.25) * smith_gtr2(wo, 0.25),
                gtr1(wh.z, self.clearcoat_alpha),
            )
        } else {
            (0.0, 0.0, 0.0)
        };

        let microfacet_denom = 1.0 / (4.0 * cos_theta_i * cos_theta_o);

        (1.0 - self.metallic) * (self.base_color * FRAC_1_PI * lerp(self.subsurface, f_d, f_ss) + f_sh)
            + f_s * (g_s * d_s * microfacet_denom)
            + self.clearcoat * f_c * g_c * d_c * microfacet_denom
    }

    fn sample_f(&self, wo: Vec3f, mode: TransportMode, sample: Sample3, allowed: BxdfType) -> Option<ScatterSample> {
        if wo.z <= 0.0 || !self.matches_flags(allowed) {
            return None;
        }

        let wi = if sample.u < self.weights.diffuse {
            cosine_sample_hemisphere(sample.split().1).normalize()
        } else {
            let wh = if sample.u - self.weights.diffuse < self.weights.specular {
                self.distribution.sample_visible(wo, sample.v, sample.w)
            } else {
                sample_gtr1(self.clearcoat_alpha, sample.v, sample.w)
            };
            if wh.z <= 0.0 {
                return None;
            }
            let wi = reflect(wo, wh).normalize();
            if wi.z <= 0.0 || wi.dot(wh) <= 0.0 {
                return None;
            }
            wi
        };

        let pdf = self.pdf(wi, wo);
        if pdf < EPS {
            return None;
        }

        Some(ScatterSample {
            f: self.f(wi, wo, mode),
            wi,
            pdf,
            is_delta: false,
        })
    }

    fn pdf(&self, wi: Vec3f, wo: Vec3f) -> Float {
        if wi.z <= 0.0 || wo.z <= 0.0 {
            return 0.0;
        }
        let wh = (wi + wo).normalize();
        let cos_theta_d = wi.dot(wh);
        if cos_theta_d <= 0.0 {
            return 0.0;
        }

        let diffuse_pdf = cosine_hemisphere_pdf(wi.z);
        let specular_pdf = self.distribution.pdf_reflected(wo, wh);
        let clearcoat_pdf = wh.z * gtr1(wh.z, self.clearcoat_alpha) / (4.0 * cos_theta_d);

        self.weights.diffuse * diffuse_pdf
            + self.weights.specular * specular_pdf
            + self.weights.clearcoat * clearcoat_pdf
    }

    fn albedo(&self) -> Spectrum {
        self.base_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use crate::sampler::{RandomSampler, Sampler};

    fn brdf(metallic: Float, roughness: Float, clearcoat: Float) -> DisneyBrdf {
        DisneyBrdf::new(
            Spectrum::new(0.8, 0.5, 0.3), metallic, 0.2, 0.5, 0.3,
            roughness, 0.4, 0.5, 0.5, clearcoat, 0.7,
        )
    }

    #[test]
    fn test_sample_weights_sum_to_one() {
        for i in 0..=10 {
            for j in 0..=10 {
                let w = SampleWeights::new(i as Float / 10.0, j as Float / 10.0);
                assert!(w.diffuse >= 0.0 && w.specular >= 0.0 && w.clearcoat >= 0.0);
                assert_abs_diff_eq!(w.diffuse + w.specular + w.clearcoat, 1.0, epsilon = 1.0e-6);
            }
        }

        // metals never pick the diffuse lobe
        let metal = brdf(1.0, 0.5, 0.0).sample_weights();
        assert_eq!(metal.diffuse, 0.0);
        assert_eq!(metal.specular, 1.0);
        // clearcoat 1 takes a third of the non-diffuse mass
        let coated = brdf(0.0, 0.5, 1.0).sample_weights();
        assert_abs_diff_eq!(coated.diffuse, 0.8);
        assert_abs_diff_eq!(coated.clearcoat, 0.2 / 3.0, epsilon = 1.0e-6);
    }

    #[test]
    fn test_eval_and_pdf_non_negative() {
        let mut sampler = RandomSampler::new_with_seed(3);
        let lobes = [brdf(0.0, 0.3, 0.0), brdf(1.0, 0.6, 1.0), brdf(0.4, 0.1, 0.5)];
        for lobe in &lobes {
            for _ in 0..2000 {
                let wi = crate::sampling::uniform_sample_sphere(sampler.sample2().point());
                let wo = crate::sampling::uniform_sample_sphere(sampler.sample2().point());
                let f = lobe.f(wi, wo, TransportMode::Radiance);
                assert!(f[0] >= 0.0 && f[1] >= 0.0 && f[2] >= 0.0, "{:?}", f);
                assert!(lobe.pdf(wi, wo) >= 0.0);
            }
        }
    }

    #[test]
    fn test_sample_pdf_matches_pdf() {
        let mut sampler = RandomSampler::new_with_seed(11);
        let lobe = brdf(0.3, 0.4, 0.8);
        let wo = Vec3f::new(0.4, 0.1, 0.8).normalize();
        let mut accepted = 0;
        for _ in 0..1000 {
            if let Some(s) = lobe.sample_f(wo, TransportMode::Radiance, sampler.sample3(), BxdfType::all()) {
                accepted += 1;
                assert!(s.pdf >= EPS);
                assert_abs_diff_eq!(s.pdf, lobe.pdf(s.wi, wo), epsilon = 1.0e-3 * s.pdf.max(1.0));
            }
        }
        assert!(accepted > 800);
    }

    #[test]
    fn test_rejects_lower_hemisphere() {
        let lobe = brdf(0.0, 0.5, 0.0);
        let wo = Vec3f::new(0.0, 0.3, -0.9).normalize();
        let s = Sample3 { u: 0.1, v: 0.5, w: 0.5 };
        assert!(lobe.sample_f(wo, TransportMode::Radiance, s, BxdfType::all()).is_none());
    }
}
