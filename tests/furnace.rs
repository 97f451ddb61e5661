use approx::assert_abs_diff_eq;
use sppm::{Frame, Float, Vec3f};
use sppm::material::TransportMode;
use sppm::reflection::{Bsdf, Lobe, LambertianReflection, DisneyBrdf};
use sppm::sampler::{RandomSampler, Sampler};
use sppm::spectrum::Spectrum;
use cgmath::InnerSpace;

const SAMPLES: usize = 200_000;

fn up_bsdf(lobe: Lobe) -> Bsdf {
    let frame = Frame::from_z(Vec3f::unit_z());
    Bsdf::new(frame, frame, lobe)
}

/// Mean of `f·cos/pdf` over BSDF samples for a fixed outgoing direction.
/// Rejected samples count as zero.
fn reflectance(bsdf: &Bsdf, wo: Vec3f, sampler: &mut dyn Sampler) -> Spectrum {
    let mut sum = Spectrum::zero();
    for _ in 0..SAMPLES {
        if let Some(s) = bsdf.sample(wo, TransportMode::Radiance, sampler.sample3()) {
            let weight = s.f * (s.dir.z.abs() / s.pdf);
            assert!(weight.is_finite());
            sum += weight;
        }
    }
    sum / SAMPLES as Float
}

fn outgoing(theta_deg: Float) -> Vec3f {
    let theta = theta_deg.to_radians();
    Vec3f::new(theta.sin(), 0.0, theta.cos()).normalize()
}

fn disney(base: Float, metallic: Float, roughness: Float, clearcoat: Float) -> Lobe {
    Lobe::Disney(DisneyBrdf::new(
        Spectrum::uniform(base),
        metallic,
        0.0,
        0.5,
        0.0,
        roughness,
        0.0,
        0.0,
        0.5,
        clearcoat,
        1.0,
    ))
}

#[test]
fn furnace_lambertian_matches_albedo() {
    let mut sampler = RandomSampler::new_with_seed(1);
    let albedo = Spectrum::new(0.2, 0.5, 0.9);
    let bsdf = up_bsdf(Lobe::Diffuse(LambertianReflection::new(albedo)));

    for &theta in &[0.0, 30.0, 60.0, 85.0] {
        let r = reflectance(&bsdf, outgoing(theta), &mut sampler);
        for i in 0..3 {
            // every sample weighs exactly the albedo
            assert_abs_diff_eq!(r[i], albedo[i], epsilon = 1e-3);
        }
    }
}

#[test]
fn furnace_disney_metal_conserves_energy() {
    let mut sampler = RandomSampler::new_with_seed(2);
    for &roughness in &[0.05, 0.3, 0.7, 1.0] {
        let bsdf = up_bsdf(disney(1.0, 1.0, roughness, 0.0));
        for &theta in &[0.0, 45.0, 75.0] {
            let r = reflectance(&bsdf, outgoing(theta), &mut sampler);
            assert!(r.max_component() <= 1.0 + 0.02, "roughness {} theta {}: {:?}", roughness, theta, r);
            assert!(r.max_component() > 0.2);
        }
    }
}

#[test]
fn furnace_disney_dielectric_conserves_energy() {
    let mut sampler = RandomSampler::new_with_seed(3);
    for &(roughness, clearcoat) in &[(0.2, 0.0), (0.5, 0.5), (0.9, 1.0)] {
        let bsdf = up_bsdf(disney(0.5, 0.0, roughness, clearcoat));
        for &theta in &[0.0, 45.0, 70.0] {
            let r = reflectance(&bsdf, outgoing(theta), &mut sampler);
            assert!(r.max_component() <= 1.0 + 0.05, "roughness {} theta {}: {:?}", roughness, theta, r);
        }
    }
}
