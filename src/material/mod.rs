use bumpalo::Bump;
use crate::interaction::SurfaceHit;
use crate::reflection::Bsdf;
use crate::spectrum::Spectrum;
use crate::ConstructionError;

pub mod matte;
pub mod disney;
pub mod glass;

pub use matte::MatteMaterial;
pub use disney::{DisneyMaterial, DisneyParams};
pub use glass::GlassMaterial;

/// Which quantity a path carries. Only non-symmetric scattering (refraction) cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportMode {
    /// Paths traced from the camera
    Radiance,
    /// Paths traced from the lights
    Importance,
}

#[derive(Clone, Debug)]
pub enum Material {
    Matte(MatteMaterial),
    Disney(DisneyMaterial),
    Glass(GlassMaterial),
}

impl Material {
    /// Build the BSDF at `hit`. It lives in `arena` and is gone once the arena is reset.
    pub fn shade<'a>(&self, hit: &SurfaceHit, arena: &'a Bump) -> &'a Bsdf {
        let bsdf = match self {
            Material::Matte(m) => m.bsdf(hit),
            Material::Disney(m) => m.bsdf(hit),
            Material::Glass(m) => m.bsdf(hit),
        };
        arena.alloc(bsdf)
    }
}

impl From<MatteMaterial> for Material {
    fn from(m: MatteMaterial) -> Self {
        Material::Matte(m)
    }
}

impl From<DisneyMaterial> for Material {
    fn from(m: DisneyMaterial) -> Self {
        Material::Disney(m)
    }
}

impl From<GlassMaterial> for Material {
    fn from(m: GlassMaterial) -> Self {
        Material::Glass(m)
    }
}

pub(crate) fn check_color(name: &'static str, c: Spectrum) -> Result<(), ConstructionError> {
    if c.is_finite() && c[0] >= 0.0 && c[1] >= 0.0 && c[2] >= 0.0 {
        Ok(())
    } else {
        Err(ConstructionError::invalid(name, format!("{:?} must be finite and non-negative", c)))
    }
}
