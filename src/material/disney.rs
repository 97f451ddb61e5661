use crate::Float;
use crate::spectrum::Spectrum;
use crate::interaction::SurfaceHit;
use crate::reflection::{Bsdf, Lobe, DisneyBrdf};
use crate::material::check_color;
use crate::error::check_range;
use crate::ConstructionError;

/// Parameters of the principled reflection model. All scalars live in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisneyParams {
    pub base_color: Spectrum,
    pub metallic: Float,
    pub subsurface: Float,
    pub specular: Float,
    pub specular_tint: Float,
    pub roughness: Float,
    pub anisotropic: Float,
    pub sheen: Float,
    pub sheen_tint: Float,
    pub clearcoat: Float,
    pub clearcoat_gloss: Float,
}

impl Default for DisneyParams {
    fn default() -> Self {
        Self {
            base_color: Spectrum::uniform(0.5),
            metallic: 0.0,
            subsurface: 0.0,
            specular: 0.5,
            specular_tint: 0.0,
            roughness: 0.5,
            anisotropic: 0.0,
            sheen: 0.0,
            sheen_tint: 0.5,
            clearcoat: 0.0,
            clearcoat_gloss: 1.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct DisneyMaterial {
    params: DisneyParams,
}

impl DisneyMaterial {
    pub fn new(params: DisneyParams) -> Result<Self, ConstructionError> {
        check_color("base_color", params.base_color)?;
        check_range("metallic", params.metallic, 0.0, 1.0)?;
        check_range("subsurface", params.subsurface, 0.0, 1.0)?;
        check_range("specular", params.specular, 0.0, 1.0)?;
        check_range("specular_tint", params.specular_tint, 0.0, 1.0)?;
        check_range("roughness", params.roughness, 0.0, 1.0)?;
        check_range("anisotropic", params.anisotropic, 0.0, 1.0)?;
        check_range("sheen", params.sheen, 0.0, 1.0)?;
        check_range("sheen_tint", params.sheen_tint, 0.0, 1.0)?;
        check_range("clearcoat", params.clearcoat, 0.0, 1.0)?;
        check_range("clearcoat_gloss", params.clearcoat_gloss, 0.0, 1.0)?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &DisneyParams {
        &self.params
    }

    pub(crate) fn lobe(&self) -> DisneyBrdf {
        let p = &self.params;
        DisneyBrdf::new(
            p.base_color,
            p.metallic,
            p.subsurface,
            p.specular,
            p.specular_tint,
            p.roughness,
            p.anisotropic,
            p.sheen,
            p.sheen_tint,
            p.clearcoat,
            p.clearcoat_gloss,
        )
    }

    pub(crate) fn bsdf(&self, hit: &SurfaceHit) -> Bsdf {
        Bsdf::new(hit.geometry, hit.shading, Lobe::Disney(self.lobe()))
    }
}
