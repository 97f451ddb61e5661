use std::sync::Arc;
use crate::{Ray, Float, Point3f, Frame};
use crate::geometry::bounds::Bounds3f;
use crate::interaction::SurfaceHit;
use crate::light::{Light, LightSample, DiffuseAreaLight, PointLight, NativeSky};
use crate::material::Material;
use crate::sampler::Sample1;
use crate::shapes::Shape;
use crate::spectrum::Spectrum;
use cgmath::InnerSpace;

/// A shape with a material, optionally emitting light.
pub struct Entity {
    pub shape: Arc<dyn Shape>,
    pub material: Material,
    /// Index into the scene's lights
    pub light: Option<usize>,
}

/// Linear-scan scene. Good enough for the handful of entities the built-in scenes use.
pub struct Scene {
    entities: Vec<Entity>,
    lights: Vec<Light>,
    environment: Option<usize>,
    bound: Bounds3f,
}

impl Scene {
    pub fn closest_intersection(&self, ray: &Ray) -> Option<SurfaceHit<'_>> {
        let mut ray = *ray;
        let mut closest = None;
        for entity in &self.entities {
            if let Some(hit) = entity.shape.intersect(&ray) {
                ray.t_max = hit.t;
                closest = Some((hit, entity));
            }
        }

        closest.map(|(hit, entity)| {
            let frame = Frame::from_z_x(hit.n, hit.dpdu);
            SurfaceHit {
                p: hit.p,
                t: hit.t,
                wr: -ray.dir.normalize(),
                uv: hit.uv,
                geometry: frame,
                shading: frame,
                material: &entity.material,
                light: entity.light.map(|i| &self.lights[i]),
            }
        })
    }

    pub fn has_intersection(&self, ray: &Ray) -> bool {
        self.entities.iter().any(|e| e.shape.intersect_test(ray))
    }

    /// Whether nothing blocks the path from `hit` to the sampled light point.
    pub fn visible(&self, hit: &SurfaceHit, sample: &LightSample) -> bool {
        let ray = if sample.dist.is_infinite() {
            hit.spawn_ray(sample.dir)
        } else {
            hit.spawn_ray_to(hit.p + sample.dir * sample.dist)
        };
        !self.has_intersection(&ray)
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Pick a light uniformly. `None` when the scene has no lights.
    pub fn sample_light(&self, sample: Sample1) -> Option<(&Light, Float)> {
        if self.lights.is_empty() {
            return None;
        }
        let n = self.lights.len();
        let idx = ((sample.u * n as Float) as usize).min(n - 1);
        Some((&self.lights[idx], 1.0 / n as Float))
    }

    pub fn environment_light(&self) -> Option<&NativeSky> {
        self.environment.and_then(|i| self.lights[i].as_sky())
    }

    pub fn world_bound(&self) -> Bounds3f {
        self.bound
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }
}

#[derive(Default)]
pub struct SceneBuilder {
    entities: Vec<Entity>,
    lights: Vec<Light>,
    environment: Option<usize>,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entity(&mut self, shape: Arc<dyn Shape>, material: impl Into<Material>) -> &mut Self {
        self.entities.push(Entity { shape, material: material.into(), light: None });
        self
    }

    /// Entity whose front side emits `radiance` uniformly.
    pub fn add_emitter(&mut self, shape: Arc<dyn Shape>, material: impl Into<Material>, radiance: Spectrum) -> &mut Self {
        let light = self.lights.len();
        self.lights.push(Light::Area(DiffuseAreaLight::new(shape.clone(), radiance)));
        self.entities.push(Entity { shape, material: material.into(), light: Some(light) });
        self
    }

    pub fn add_point_light(&mut self, pos: Point3f, intensity: Spectrum) -> &mut Self {
        self.lights.push(Light::Point(PointLight::new(pos, intensity)));
        self
    }

    /// Replaces any previously set sky.
    pub fn set_sky(&mut self, sky: NativeSky) -> &mut Self {
        match self.environment {
            Some(i) => self.lights[i] = Light::Sky(sky),
            None => {
                self.environment = Some(self.lights.len());
                self.lights.push(Light::Sky(sky));
            }
        }
        self
    }

    pub fn build(self) -> Scene {
        let bound = self.entities.iter()
            .fold(Bounds3f::empty(), |b, e| b.union(&e.shape.world_bound()));

        let mut lights = self.lights;
        for light in &mut lights {
            light.preprocess(&bound);
        }

        tracing::debug!(entities = self.entities.len(), lights = lights.len(), "built scene");

        Scene {
            entities: self.entities,
            lights,
            environment: self.environment,
            bound,
        }
    }
}
