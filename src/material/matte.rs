use crate::spectrum::Spectrum;
use crate::interaction::SurfaceHit;
use crate::reflection::{Bsdf, Lobe, LambertianReflection};
use crate::material::check_color;
use crate::ConstructionError;

#[derive(Clone, Debug)]
pub struct MatteMaterial {
    albedo: Spectrum,
}

impl MatteMaterial {
    pub fn new(albedo: Spectrum) -> Result<Self, ConstructionError> {
        check_color("albedo", albedo)?;
        Ok(Self { albedo })
    }

    pub(crate) fn bsdf(&self, hit: &SurfaceHit) -> Bsdf {
        Bsdf::new(hit.geometry, hit.shading, Lobe::Diffuse(LambertianReflection::new(self.albedo)))
    }
}
