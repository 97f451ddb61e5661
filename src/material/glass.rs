use crate::Float;
use crate::spectrum::Spectrum;
use crate::interaction::SurfaceHit;
use crate::reflection::{Bsdf, Lobe, GlassBtdf};
use crate::material::check_color;
use crate::ConstructionError;

/// Smooth dielectric with separate tints for the reflected and refracted paths.
#[derive(Clone, Debug)]
pub struct GlassMaterial {
    reflection_color: Spectrum,
    transmission_color: Spectrum,
    ior: Float,
}

impl GlassMaterial {
    pub fn new(reflection_color: Spectrum, transmission_color: Spectrum, ior: Float) -> Result<Self, ConstructionError> {
        check_color("reflection_color", reflection_color)?;
        check_color("transmission_color", transmission_color)?;
        if !(ior.is_finite() && ior > 0.0) {
            return Err(ConstructionError::invalid("ior", format!("{} must be positive", ior)));
        }
        Ok(Self { reflection_color, transmission_color, ior })
    }

    pub(crate) fn bsdf(&self, hit: &SurfaceHit) -> Bsdf {
        let lobe = GlassBtdf::new(self.reflection_color, self.transmission_color, self.ior);
        Bsdf::new(hit.geometry, hit.shading, Lobe::Glass(lobe))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_ior() {
        assert!(GlassMaterial::new(Spectrum::one(), Spectrum::one(), 1.5).is_ok());
        assert!(GlassMaterial::new(Spectrum::one(), Spectrum::one(), 0.0).is_err());
        assert!(GlassMaterial::new(Spectrum::one(), Spectrum::one(), Float::NAN).is_err());
        assert!(GlassMaterial::new(Spectrum::uniform(-1.0), Spectrum::one(), 1.5).is_err());
    }
}
