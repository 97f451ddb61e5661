//! Small hand-built scenes for the CLI, tests and benchmarks.

use std::sync::Arc;
use crate::{Float, ConstructionError};
use crate::camera::PinholeCamera;
use crate::light::NativeSky;
use crate::material::{MatteMaterial, GlassMaterial, DisneyMaterial, DisneyParams};
use crate::scene::{Scene, SceneBuilder};
use crate::shapes::{Sphere, Quad};
use crate::spectrum::Spectrum;

/// Unit sphere emitting `emission` centred 3 units above a large diffuse
/// ground of albedo `ground_albedo`. Directly below the sphere the ground's
/// outgoing radiance is `ground_albedo * emission / 9`.
pub fn sphere_over_plane(emission: Float, ground_albedo: Float) -> Result<Scene, ConstructionError> {
    let mut builder = SceneBuilder::new();
    builder
        .add_entity(
            Arc::new(Quad::centered(point3f!(0, 0, 0), vec3f!(0, 0, 1), 20.0)),
            MatteMaterial::new(Spectrum::uniform(ground_albedo))?,
        )
        .add_emitter(
            Arc::new(Sphere::new(point3f!(0, 0, 3), 1.0)),
            MatteMaterial::new(Spectrum::zero())?,
            Spectrum::uniform(emission),
        );
    Ok(builder.build())
}

pub fn sphere_over_plane_camera(width: u32, height: u32) -> PinholeCamera {
    PinholeCamera::look_at(point3f!(6, 0, 2.5), point3f!(0, 0, 1.2), vec3f!(0, 0, 1), 45.0, width, height)
}

/// Closed box lit by a ceiling panel, holding a glass ball and a glossy Disney ball.
pub fn cornell_box() -> Result<Scene, ConstructionError> {
    let white = MatteMaterial::new(Spectrum::new(0.73, 0.73, 0.73))?;
    let red = MatteMaterial::new(Spectrum::new(0.65, 0.05, 0.05))?;
    let green = MatteMaterial::new(Spectrum::new(0.12, 0.45, 0.15))?;
    let glass = GlassMaterial::new(Spectrum::one(), Spectrum::one(), 1.5)?;
    let gold = DisneyMaterial::new(DisneyParams {
        base_color: Spectrum::new(1.0, 0.78, 0.34),
        metallic: 1.0,
        roughness: 0.3,
        ..DisneyParams::default()
    })?;

    let wall = |center, n| Arc::new(Quad::centered(center, n, 1.0));
    let mut builder = SceneBuilder::new();
    builder
        .add_entity(wall(point3f!(0, 0, -1), vec3f!(0, 0, 1)), white.clone())
        .add_entity(wall(point3f!(0, 0, 1), vec3f!(0, 0, -1)), white.clone())
        .add_entity(wall(point3f!(0, 1, 0), vec3f!(0, -1, 0)), white.clone())
        .add_entity(wall(point3f!(-1, 0, 0), vec3f!(1, 0, 0)), red)
        .add_entity(wall(point3f!(1, 0, 0), vec3f!(-1, 0, 0)), green)
        .add_emitter(
            Arc::new(Quad::centered(point3f!(0, 0, 0.99), vec3f!(0, 0, -1), 0.25)),
            white,
            Spectrum::new(17.0, 12.0, 4.0),
        )
        .add_entity(Arc::new(Sphere::new(point3f!(0.4, 0.2, -0.6), 0.4)), glass)
        .add_entity(Arc::new(Sphere::new(point3f!(-0.45, 0.45, -0.65), 0.35)), gold);
    Ok(builder.build())
}

pub fn cornell_box_camera(width: u32, height: u32) -> PinholeCamera {
    PinholeCamera::look_at(point3f!(0, -3.4, 0), point3f!(0, 0, 0), vec3f!(0, 0, 1), 40.0, width, height)
}

/// Glass and plastic balls on a floor under a gradient sky.
pub fn sky_spheres() -> Result<Scene, ConstructionError> {
    let plastic = DisneyMaterial::new(DisneyParams {
        base_color: Spectrum::new(0.1, 0.3, 0.8),
        roughness: 0.2,
        clearcoat: 1.0,
        clearcoat_gloss: 0.9,
        ..DisneyParams::default()
    })?;

    let mut builder = SceneBuilder::new();
    builder
        .add_entity(
            Arc::new(Quad::centered(point3f!(0, 0, 0), vec3f!(0, 0, 1), 5.0)),
            MatteMaterial::new(Spectrum::uniform(0.6))?,
        )
        .add_entity(
            Arc::new(Sphere::new(point3f!(-0.6, 0, 0.5), 0.5)),
            GlassMaterial::new(Spectrum::one(), Spectrum::new(0.9, 1.0, 0.95), 1.5)?,
        )
        .add_entity(Arc::new(Sphere::new(point3f!(0.6, 0.3, 0.5), 0.5)), plastic)
        .set_sky(NativeSky::new(Spectrum::new(0.6, 0.75, 1.0), Spectrum::new(0.15, 0.12, 0.1)));
    Ok(builder.build())
}

pub fn sky_spheres_camera(width: u32, height: u32) -> PinholeCamera {
    PinholeCamera::look_at(point3f!(0, -4, 1.5), point3f!(0, 0, 0.5), vec3f!(0, 0, 1), 40.0, width, height)
}
