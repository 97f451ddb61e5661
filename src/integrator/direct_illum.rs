use crate::{abs_dot, EPS};
use crate::interaction::SurfaceHit;
use crate::light::Light;
use crate::material::TransportMode;
use crate::reflection::Bsdf;
use crate::sampler::Sampler;
use crate::scene::Scene;
use crate::spectrum::Spectrum;

/// Direct light from `light` estimated by sampling the light, weighted against
/// BSDF sampling with the balance heuristic.
pub fn mis_sample_light(
    scene: &Scene,
    light: &Light,
    hit: &SurfaceHit,
    bsdf: &Bsdf,
    sampler: &mut dyn Sampler,
) -> Spectrum {
    let ls = match light.sample_li(hit.p, sampler.sample5()) {
        Some(ls) => ls,
        None => return Spectrum::zero(),
    };
    if ls.radiance.is_black() || ls.pdf < EPS {
        return Spectrum::zero();
    }

    let f = bsdf.eval(ls.dir, hit.wr, TransportMode::Radiance);
    if f.is_black() || !scene.visible(hit, &ls) {
        return Spectrum::zero();
    }

    let contrib = ls.radiance * f * abs_dot(hit.geometry.z, ls.dir);
    if ls.is_delta {
        contrib / ls.pdf
    } else {
        contrib / (ls.pdf + bsdf.pdf(ls.dir, hit.wr))
    }
}

/// Direct light reached by sampling the BSDF, weighted against light sampling.
/// Only area lights and the environment can be hit this way.
pub fn mis_sample_bsdf(
    scene: &Scene,
    hit: &SurfaceHit,
    bsdf: &Bsdf,
    sampler: &mut dyn Sampler,
) -> Spectrum {
    let bs = match bsdf.sample(hit.wr, TransportMode::Radiance, sampler.sample3()) {
        Some(bs) if !bs.f.is_black() && bs.pdf >= EPS => bs,
        _ => return Spectrum::zero(),
    };
    let cos = abs_dot(hit.geometry.z, bs.dir);

    let (radiance, light_pdf) = match scene.closest_intersection(&hit.spawn_ray(bs.dir)) {
        Some(light_hit) => match light_hit.light {
            Some(Light::Area(area)) => {
                let n = light_hit.geometry.z;
                let le = area.radiance(light_hit.p, n, light_hit.uv, light_hit.wr);
                (le, area.pdf_li(hit.p, light_hit.p, n))
            }
            _ => return Spectrum::zero(),
        },
        None => match scene.environment_light() {
            Some(sky) => (sky.radiance(bs.dir), sky.pdf_li()),
            None => return Spectrum::zero(),
        },
    };
    if radiance.is_black() {
        return Spectrum::zero();
    }

    let f = radiance * bs.f * cos;
    if bs.is_delta {
        f / bs.pdf
    } else {
        f / (bs.pdf + light_pdf)
    }
}
