use std::sync::Arc;
use crate::{Float, Point2f, Point3f, Vec3f, Frame};
use crate::spectrum::Spectrum;
use crate::shapes::Shape;
use crate::sampler::Sample5;
use crate::light::{LightSample, LightEmitSample};
use crate::sampling::{cosine_sample_hemisphere, cosine_hemisphere_pdf};
use cgmath::InnerSpace;

/// Uniform emitter on the front side of a shape.
pub struct DiffuseAreaLight {
    shape: Arc<dyn Shape>,
    emit: Spectrum,
    area: Float,
}

impl DiffuseAreaLight {
    pub fn new(shape: Arc<dyn Shape>, emit: Spectrum) -> Self {
        let area = shape.area();
        Self { shape, emit, area }
    }

    /// Radiance leaving `pos` (normal `n`) towards `wr`.
    pub fn radiance(&self, _pos: Point3f, n: Vec3f, _uv: Point2f, wr: Vec3f) -> Spectrum {
        if n.dot(wr) > 0.0 {
            self.emit
        } else {
            Spectrum::zero()
        }
    }

    pub fn sample_li(&self, reference: Point3f, sample: Sample5) -> Option<LightSample> {
        let s = self.shape.sample_area(sample.first());
        let d = s.p - reference;
        let dist2 = d.magnitude2();
        if dist2 == 0.0 {
            return None;
        }
        let dist = dist2.sqrt();
        let dir = d / dist;
        let cos_light = s.n.dot(-dir);
        if cos_light <= 0.0 {
            return None;
        }
        Some(LightSample {
            dir,
            dist,
            radiance: self.emit,
            pdf: dist2 / (cos_light * self.area),
            is_delta: false,
        })
    }

    pub fn pdf_li(&self, reference: Point3f, pos: Point3f, n: Vec3f) -> Float {
        let d = reference - pos;
        let dist2 = d.magnitude2();
        let cos_light = n.dot(d) / dist2.sqrt();
        if cos_light <= 0.0 || dist2 == 0.0 {
            return 0.0;
        }
        dist2 / (cos_light * self.area)
    }

    pub fn sample_emit(&self, sample: Sample5) -> Option<LightEmitSample> {
        let s = self.shape.sample_area(sample.first());
        let local = cosine_sample_hemisphere(sample.second());
        let pdf_dir = cosine_hemisphere_pdf(local.z);
        if pdf_dir <= 0.0 {
            return None;
        }
        let dir = Frame::from_z(s.n).local_to_world(local).normalize();
        Some(LightEmitSample {
            pos: s.p,
            dir,
            normal: s.n,
            radiance: self.emit,
            pdf_pos: 1.0 / self.area,
            pdf_dir,
        })
    }
}
