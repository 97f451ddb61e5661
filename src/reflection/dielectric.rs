use crate::{Vec3f, Float};
use crate::spectrum::Spectrum;
use crate::material::TransportMode;
use crate::sampler::Sample3;
use crate::reflection::{BxDF, BxdfType, ScatterSample, abs_cos_theta};
use crate::fresnel::schlick;
use cgmath::InnerSpace;

/// Refract `wo` through a surface with normal `n` (same side as `wo`).
/// `eta` is the ratio of the index on the `wo` side to the index on the far side.
/// Returns `None` on total internal reflection.
pub fn refract(wo: Vec3f, n: Vec3f, eta: Float) -> Option<Vec3f> {
    let cos_o = wo.dot(n);
    let sin2_t = eta * eta * Float::max(0.0, 1.0 - cos_o * cos_o);
    if sin2_t >= 1.0 {
        return None;
    }
    let cos_t = Float::sqrt(1.0 - sin2_t);
    Some(eta * -wo + (eta * cos_o - cos_t) * n)
}

/// Smooth dielectric boundary. Reflection and refraction are both delta lobes;
/// the Fresnel term only decides which one is sampled.
#[derive(Clone, Copy, Debug)]
pub struct GlassBtdf {
    reflection_color: Spectrum,
    transmission_color: Spectrum,
    ior: Float,
}

impl GlassBtdf {
    pub fn new(reflection_color: Spectrum, transmission_color: Spectrum, ior: Float) -> Self {
        Self { reflection_color, transmission_color, ior }
    }

    fn reflected(&self, wo: Vec3f) -> ScatterSample {
        let wi = Vec3f::new(-wo.x, -wo.y, wo.z);
        ScatterSample {
            f: self.reflection_color / abs_cos_theta(wi),
            wi,
            pdf: 1.0,
            is_delta: true,
        }
    }
}

impl BxDF for GlassBtdf {
    fn get_type(&self) -> BxdfType {
        BxdfType::REFLECTION | BxdfType::TRANSMISSION | BxdfType::SPECULAR
    }

    fn f(&self, _wi: Vec3f, _wo: Vec3f, _mode: TransportMode) -> Spectrum {
        Spectrum::zero()
    }

    fn sample_f(&self, wo: Vec3f, mode: TransportMode, sample: Sample3, allowed: BxdfType) -> Option<ScatterSample> {
        if wo.z == 0.0 {
            return None;
        }
        let can_reflect = allowed.contains(BxdfType::REFLECTION);
        let can_refract = allowed.contains(BxdfType::TRANSMISSION);

        let entering = wo.z > 0.0;
        let (eta_o, eta_i) = if entering { (1.0, self.ior) } else { (self.ior, 1.0) };
        let n = if entering { Vec3f::new(0.0, 0.0, 1.0) } else { Vec3f::new(0.0, 0.0, -1.0) };

        let mut cos = abs_cos_theta(wo);
        if !entering {
            cos *= self.ior;
        }

        if can_refract && (!can_reflect || sample.u > schlick(cos, self.ior)) {
            if let Some(wi) = refract(wo, n, eta_o / eta_i) {
                let mut f = self.transmission_color / abs_cos_theta(wi);
                if mode == TransportMode::Radiance {
                    f *= sq!(eta_o / eta_i);
                }
                return Some(ScatterSample { f, wi, pdf: 1.0, is_delta: true });
            }
        }

        if can_reflect {
            Some(self.reflected(wo))
        } else {
            None
        }
    }

    fn pdf(&self, _wi: Vec3f, _wo: Vec3f) -> Float {
        0.0
    }

    fn albedo(&self) -> Spectrum {
        self.transmission_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn glass() -> GlassBtdf {
        GlassBtdf::new(Spectrum::uniform(0.9), Spectrum::uniform(0.8), 1.5)
    }

    fn sample(u: Float) -> Sample3 {
        Sample3 { u, v: 0.5, w: 0.5 }
    }

    #[test]
    fn test_only_reflection_requested() {
        let wo = Vec3f::new(0.3, 0.0, 0.9).normalize();
        for &u in &[0.0, 0.5, 0.99] {
            let s = glass().sample_f(wo, TransportMode::Radiance, sample(u), BxdfType::REFLECTION | BxdfType::SPECULAR).unwrap();
            assert!(s.wi.z > 0.0);
            assert!(s.is_delta);
            assert_eq!(s.pdf, 1.0);
            assert_abs_diff_eq!(s.f[0], 0.9 / s.wi.z, epsilon = 1.0e-5);
        }
    }

    #[test]
    fn test_only_transmission_requested() {
        let wo = Vec3f::new(0.3, 0.0, 0.9).normalize();
        for &u in &[0.0, 0.5, 0.99] {
            let s = glass().sample_f(wo, TransportMode::Importance, sample(u), BxdfType::TRANSMISSION | BxdfType::SPECULAR).unwrap();
            assert!(s.wi.z < 0.0);
            assert_abs_diff_eq!(s.wi.magnitude(), 1.0, epsilon = 1.0e-5);
            assert_abs_diff_eq!(s.f[0], 0.8 / s.wi.z.abs(), epsilon = 1.0e-5);
        }
    }

    #[test]
    fn test_radiance_mode_scales_refraction() {
        let wo = Vec3f::new(0.0, 0.0, 1.0);
        let s = glass().sample_f(wo, TransportMode::Radiance, sample(0.99), BxdfType::all()).unwrap();
        assert!(s.wi.z < 0.0);
        assert_abs_diff_eq!(s.f[0], 0.8 / (1.5 * 1.5), epsilon = 1.0e-5);
    }

    #[test]
    fn test_total_internal_reflection() {
        // leaving the glass at a grazing angle
        let wo = Vec3f::new(0.9, 0.0, -0.3).normalize();
        let s = glass().sample_f(wo, TransportMode::Radiance, sample(0.99), BxdfType::all()).unwrap();
        assert!(s.wi.z < 0.0);
        assert_abs_diff_eq!(s.wi, Vec3f::new(-wo.x, -wo.y, wo.z), epsilon = 1.0e-6);

        let none = glass().sample_f(wo, TransportMode::Radiance, sample(0.99), BxdfType::TRANSMISSION | BxdfType::SPECULAR);
        assert!(none.is_none());
    }

    #[test]
    fn test_eval_and_pdf_are_zero() {
        let wo = Vec3f::new(0.0, 0.0, 1.0);
        let wi = Vec3f::new(0.0, 0.0, -1.0);
        assert!(glass().f(wi, wo, TransportMode::Radiance).is_black());
        assert_eq!(glass().pdf(wi, wo), 0.0);
    }
}
