use crate::Point3f;
use crate::spectrum::Spectrum;
use crate::sampler::Sample5;
use crate::light::{LightSample, LightEmitSample};
use crate::sampling::{uniform_sample_sphere, uniform_sphere_pdf};
use cgmath::InnerSpace;

/// Isotropic point emitter. Only reachable through explicit light sampling.
pub struct PointLight {
    pos: Point3f,
    intensity: Spectrum,
}

impl PointLight {
    pub fn new(pos: Point3f, intensity: Spectrum) -> Self {
        Self { pos, intensity }
    }

    pub fn sample_li(&self, reference: Point3f) -> Option<LightSample> {
        let d = self.pos - reference;
        let dist2 = d.magnitude2();
        if dist2 == 0.0 {
            return None;
        }
        let dist = dist2.sqrt();
        Some(LightSample {
            dir: d / dist,
            dist,
            radiance: self.intensity / dist2,
            pdf: 1.0,
            is_delta: true,
        })
    }

    pub fn sample_emit(&self, sample: Sample5) -> Option<LightEmitSample> {
        let dir = uniform_sample_sphere(sample.first());
        Some(LightEmitSample {
            pos: self.pos,
            dir,
            normal: dir,
            radiance: self.intensity,
            pdf_pos: 1.0,
            pdf_dir: uniform_sphere_pdf(),
        })
    }
}
