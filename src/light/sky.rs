use crate::{Float, Point3f, Vec3f, Frame};
use crate::geometry::bounds::Bounds3f;
use crate::spectrum::Spectrum;
use crate::sampler::Sample5;
use crate::light::{LightSample, LightEmitSample};
use crate::sampling::{uniform_sample_sphere, uniform_sphere_pdf, concentric_sample_disk};
use crate::consts::PI;
use cgmath::{InnerSpace, EuclideanSpace};

/// Environment light blending two colours by the elevation of the view direction.
pub struct NativeSky {
    top: Spectrum,
    bottom: Spectrum,
    world_center: Point3f,
    world_radius: Float,
}

impl NativeSky {
    pub fn new(top: Spectrum, bottom: Spectrum) -> Self {
        Self {
            top,
            bottom,
            world_center: Point3f::origin(),
            world_radius: 1.0,
        }
    }

    /// Fit the photon emission disk to the scene.
    pub fn preprocess(&mut self, world_bound: &Bounds3f) {
        let (center, radius) = world_bound.bounding_sphere();
        self.world_center = center;
        self.world_radius = radius.max(1.0e-3);
    }

    /// Radiance arriving along `-dir`, i.e. seen when looking towards `dir`.
    pub fn radiance(&self, dir: Vec3f) -> Spectrum {
        let cos_theta = dir.normalize().z.clamp(-1.0, 1.0);
        let s = (cos_theta + 1.0) / 2.0;
        self.top * s + self.bottom * (1.0 - s)
    }

    pub fn sample_li(&self, sample: Sample5) -> Option<LightSample> {
        let dir = uniform_sample_sphere(sample.first());
        Some(LightSample {
            dir,
            dist: Float::INFINITY,
            radiance: self.radiance(dir),
            pdf: uniform_sphere_pdf(),
            is_delta: false,
        })
    }

    pub fn pdf_li(&self) -> Float {
        uniform_sphere_pdf()
    }

    /// Photons enter the scene through a disk of the world radius, perpendicular
    /// to their direction and pushed back by the same radius.
    pub fn sample_emit(&self, sample: Sample5) -> Option<LightEmitSample> {
        let dir = uniform_sample_sphere(sample.first());
        let disk = concentric_sample_disk(sample.second());
        let frame = Frame::from_z(dir);
        let pos = self.world_center
            + (frame.x * disk.x + frame.y * disk.y - dir) * self.world_radius;
        Some(LightEmitSample {
            pos,
            dir,
            normal: dir,
            radiance: self.radiance(-dir),
            pdf_pos: 1.0 / (PI * self.world_radius * self.world_radius),
            pdf_dir: uniform_sphere_pdf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_gradient() {
        let sky = NativeSky::new(Spectrum::uniform(1.0), Spectrum::uniform(0.0));
        assert_eq!(sky.radiance(vec3f!(0, 0, 1)), Spectrum::uniform(1.0));
        assert_eq!(sky.radiance(vec3f!(0, 0, -1)), Spectrum::uniform(0.0));
        assert_eq!(sky.radiance(vec3f!(1, 0, 0)), Spectrum::uniform(0.5));
    }
}
