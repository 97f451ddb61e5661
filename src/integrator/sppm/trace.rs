use bumpalo::Bump;
use crate::{Ray, Float, EPS, INFINITY, abs_dot};
use crate::integrator::direct_illum::{mis_sample_light, mis_sample_bsdf};
use crate::integrator::sppm::SppmParams;
use crate::integrator::sppm::pixel::{Pixel, CameraRecord, VisiblePoint};
use crate::integrator::sppm::searcher::VisiblePointSearcher;
use crate::light::Light;
use crate::material::TransportMode;
use crate::sampler::Sampler;
use crate::scene::Scene;
use crate::spectrum::Spectrum;

/// Follow a camera ray through specular bounces until it rests on a surface
/// that can gather photons, collecting direct illumination on the way.
pub fn trace_camera_path<'a>(
    params: &SppmParams,
    scene: &Scene,
    mut ray: Ray,
    arena: &'a Bump,
    sampler: &mut dyn Sampler,
) -> CameraRecord<'a> {
    let mut record = CameraRecord::default();
    let mut coef = Spectrum::one();

    for depth in 0..params.forward_max_depth {
        let hit = match scene.closest_intersection(&ray) {
            Some(hit) => hit,
            None => {
                if depth == 0 {
                    if let Some(sky) = scene.environment_light() {
                        record.direct_illum += sky.radiance(ray.dir);
                    }
                }
                break;
            }
        };

        let bsdf = hit.material.shade(&hit, arena);

        if depth == 0 {
            record.albedo = bsdf.albedo();
            record.normal = bsdf.shading_normal();
            if let Some(Light::Area(area)) = hit.light {
                record.direct_illum += area.radiance(hit.p, hit.geometry.z, hit.uv, hit.wr);
            }
        }

        let rounds = params.direct_illum_sample_count;
        let mut direct = Spectrum::zero();
        for _ in 0..rounds {
            for light in scene.lights() {
                direct += mis_sample_light(scene, light, &hit, bsdf, sampler);
            }
            direct += mis_sample_bsdf(scene, &hit, bsdf, sampler);
        }
        let direct = coef * direct / rounds as Float;
        if direct.is_finite() {
            record.direct_illum += direct;
        }

        if bsdf.has_diffuse_component() || depth + 1 == params.forward_max_depth {
            if coef.is_finite() {
                record.vp = Some(VisiblePoint {
                    pos: hit.p,
                    wr: hit.wr,
                    coef,
                    bsdf,
                });
            }
            break;
        }

        let bs = match bsdf.sample(hit.wr, TransportMode::Radiance, sampler.sample3()) {
            Some(bs) => bs,
            None => break,
        };
        coef *= bs.f * (abs_dot(hit.geometry.z, bs.dir) / bs.pdf);
        ray = hit.spawn_ray(bs.dir);
    }

    record
}

/// Emit one photon and scatter it through the scene, depositing into the
/// grid at every hit after the first. Returns the number of deposits.
pub fn trace_photon(
    params: &SppmParams,
    scene: &Scene,
    searcher: &VisiblePointSearcher,
    pixels: &[Pixel],
    records: &[CameraRecord],
    arena: &Bump,
    sampler: &mut dyn Sampler,
) -> usize {
    let (light, select_pdf) = match scene.sample_light(sampler.sample1()) {
        Some(l) => l,
        None => return 0,
    };
    let emit = match light.sample_emit(sampler.sample5()) {
        Some(e) => e,
        None => return 0,
    };
    if emit.radiance.is_black() || emit.pdf_pos <= 0.0 || emit.pdf_dir <= 0.0 {
        return 0;
    }

    let mut coef = emit.radiance
        * (abs_dot(emit.normal, emit.dir) / (select_pdf * emit.pdf_pos * emit.pdf_dir));
    let mut ray = Ray::with_bounds(emit.pos, emit.dir, EPS, INFINITY);
    let mut deposits = 0;

    for depth in 1..=params.photon_max_depth {
        if !coef.is_finite() || coef.is_black() {
            break;
        }
        if depth > params.photon_min_depth {
            if sampler.sample1().u > params.cont_prob {
                break;
            }
            coef /= params.cont_prob;
        }

        let hit = match scene.closest_intersection(&ray) {
            Some(hit) => hit,
            None => break,
        };

        if depth > 1 {
            deposits += searcher.add_photon(hit.p, coef, hit.wr, pixels, records);
        }

        let bsdf = hit.material.shade(&hit, arena);
        let bs = match bsdf.sample(hit.wr, TransportMode::Importance, sampler.sample3()) {
            Some(bs) => bs,
            None => break,
        };
        coef *= bs.f * (abs_dot(hit.geometry.z, bs.dir) / bs.pdf);
        ray = hit.spawn_ray(bs.dir);
    }

    deposits
}
