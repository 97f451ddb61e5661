use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use bumpalo::Bump;
use rayon::prelude::*;
use cgmath::InnerSpace;
use tracing::{debug, debug_span, warn};
use crate::{Float, Point2f, Vec3f, ConstructionError};
use crate::error::check_range;
use crate::camera::Camera;
use crate::film::RenderTarget;
use crate::sampler::{Sampler, hash_seed};
use crate::scene::Scene;
use crate::spectrum::Spectrum;

pub mod pixel;
pub mod searcher;
pub mod trace;

use pixel::{Pixel, CameraRecord};
use searcher::VisiblePointSearcher;
use trace::{trace_camera_path, trace_photon};

/// Tunables for [`SppmIntegrator`].
#[derive(Clone, Debug, PartialEq)]
pub struct SppmParams {
    /// Rayon threads; 0 uses every core.
    pub worker_count: usize,

    /// Camera path length limit. The last vertex always becomes a visible point.
    pub forward_max_depth: u32,

    /// Photon bounces before Russian roulette kicks in
    pub photon_min_depth: u32,
    pub photon_max_depth: u32,
    pub cont_prob: Float,

    pub init_radius: Float,

    /// Fraction of new photons kept each iteration
    pub alpha: Float,

    pub photons_per_iteration: usize,

    /// `None` renders until the time limit or until stopped.
    pub iteration_count: Option<u64>,
    pub time_limit: Option<Duration>,

    pub direct_illum_sample_count: u32,

    pub pixel_batch: usize,
    pub photon_batch: usize,

    /// Grid cell side; twice the initial radius when unset.
    pub grid_sidelen: Option<Float>,

    /// Hash bucket count; twice the pixel count when unset.
    pub grid_entries: Option<usize>,

    pub seed: u64,

    /// Iterations between film snapshots; 0 only writes the final one.
    pub snapshot_interval: u64,
}

impl Default for SppmParams {
    fn default() -> Self {
        Self {
            worker_count: 0,
            forward_max_depth: 8,
            photon_min_depth: 5,
            photon_max_depth: 10,
            cont_prob: 0.9,
            init_radius: 0.1,
            alpha: 2.0 / 3.0,
            photons_per_iteration: 100_000,
            iteration_count: Some(100),
            time_limit: None,
            direct_illum_sample_count: 1,
            pixel_batch: 256,
            photon_batch: 1000,
            grid_sidelen: None,
            grid_entries: None,
            seed: 0,
            snapshot_interval: 0,
        }
    }
}

impl SppmParams {
    pub fn worker_count(mut self, n: usize) -> Self {
        self.worker_count = n;
        self
    }

    pub fn forward_max_depth(mut self, depth: u32) -> Self {
        self.forward_max_depth = depth;
        self
    }

    pub fn photon_depth(mut self, min: u32, max: u32) -> Self {
        self.photon_min_depth = min;
        self.photon_max_depth = max;
        self
    }

    pub fn cont_prob(mut self, p: Float) -> Self {
        self.cont_prob = p;
        self
    }

    pub fn init_radius(mut self, r: Float) -> Self {
        self.init_radius = r;
        self
    }

    pub fn alpha(mut self, alpha: Float) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn photons_per_iteration(mut self, n: usize) -> Self {
        self.photons_per_iteration = n;
        self
    }

    pub fn iteration_count(mut self, n: Option<u64>) -> Self {
        self.iteration_count = n;
        self
    }

    pub fn time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit = limit;
        self
    }

    pub fn direct_illum_sample_count(mut self, n: u32) -> Self {
        self.direct_illum_sample_count = n;
        self
    }

    pub fn batches(mut self, pixel_batch: usize, photon_batch: usize) -> Self {
        self.pixel_batch = pixel_batch;
        self.photon_batch = photon_batch;
        self
    }

    pub fn grid(mut self, sidelen: Option<Float>, entries: Option<usize>) -> Self {
        self.grid_sidelen = sidelen;
        self.grid_entries = entries;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn snapshot_interval(mut self, n: u64) -> Self {
        self.snapshot_interval = n;
        self
    }

    pub fn validate(&self) -> Result<(), ConstructionError> {
        let at_least_one = |name: &'static str, v: u64| {
            if v == 0 {
                Err(ConstructionError::invalid(name, "must be at least 1"))
            } else {
                Ok(())
            }
        };
        at_least_one("forward_max_depth", self.forward_max_depth as u64)?;
        at_least_one("photon_max_depth", self.photon_max_depth as u64)?;
        at_least_one("photons_per_iteration", self.photons_per_iteration as u64)?;
        at_least_one("direct_illum_sample_count", self.direct_illum_sample_count as u64)?;
        at_least_one("pixel_batch", self.pixel_batch as u64)?;
        at_least_one("photon_batch", self.photon_batch as u64)?;
        if let Some(n) = self.iteration_count {
            at_least_one("iteration_count", n)?;
        }
        if let Some(n) = self.grid_entries {
            at_least_one("grid_entries", n as u64)?;
        }

        if !(self.cont_prob > 0.0 && self.cont_prob <= 1.0) {
            return Err(ConstructionError::invalid("cont_prob", format!("{} is outside (0, 1]", self.cont_prob)));
        }
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(ConstructionError::invalid("alpha", format!("{} is outside (0, 1]", self.alpha)));
        }
        check_range("init_radius", self.init_radius, Float::MIN_POSITIVE, Float::MAX)?;
        if let Some(sidelen) = self.grid_sidelen {
            check_range("grid_sidelen", sidelen, Float::MIN_POSITIVE, Float::MAX)?;
        }
        Ok(())
    }

    fn resolved_grid_sidelen(&self) -> Float {
        self.grid_sidelen.unwrap_or(2.0 * self.init_radius)
    }

    fn resolved_grid_entries(&self, pixel_count: usize) -> usize {
        self.grid_entries.unwrap_or_else(|| (2 * pixel_count).max(1024))
    }
}

/// What one committed iteration did.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct IterationStats {
    /// Number of committed iterations including this one
    pub iteration: u64,
    pub photons: u64,
    pub visible_points: usize,
    pub grid_nodes: usize,
    pub deposits: usize,
    pub elapsed: Duration,
}

/// Progressive photon mapping state for one image.
pub struct SppmIntegrator {
    params: SppmParams,
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
    searcher: VisiblePointSearcher,
    arenas: Vec<Bump>,
    iterations: u64,
    photons_emitted: u64,
}

impl SppmIntegrator {
    pub fn new(params: SppmParams, scene: &Scene, (width, height): (u32, u32)) -> Result<Self, ConstructionError> {
        params.validate()?;
        if width == 0 || height == 0 {
            return Err(ConstructionError::invalid("resolution", format!("{}x{} has no pixels", width, height)));
        }
        if scene.lights().is_empty() {
            warn!("scene has no lights; the image will be black");
        }

        let pixel_count = width as usize * height as usize;
        let pixels = (0..pixel_count).map(|_| Pixel::new(params.init_radius)).collect();
        let searcher = VisiblePointSearcher::new(
            &scene.world_bound(),
            params.resolved_grid_sidelen(),
            params.resolved_grid_entries(pixel_count),
        );
        let batch_count = (pixel_count + params.pixel_batch - 1) / params.pixel_batch;
        let arenas = (0..batch_count).map(|_| Bump::new()).collect();

        Ok(Self {
            params,
            width,
            height,
            pixels,
            searcher,
            arenas,
            iterations: 0,
            photons_emitted: 0,
        })
    }

    pub fn params(&self) -> &SppmParams {
        &self.params
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn photons_emitted(&self) -> u64 {
        self.photons_emitted
    }

    pub fn radiance(&self, x: u32, y: u32) -> Spectrum {
        let pixel = &self.pixels[(y * self.width + x) as usize];
        pixel.radiance_estimate(self.iterations, self.photons_emitted)
    }

    /// Run one full iteration on the current rayon pool. Returns `None`, leaving
    /// every pixel as it was, if `cancel` was raised before the iteration finished.
    pub fn iteration(
        &mut self,
        scene: &Scene,
        camera: &dyn Camera,
        sampler: &dyn Sampler,
        cancel: &AtomicBool,
    ) -> Option<IterationStats> {
        let start = Instant::now();
        let iteration = self.iterations;
        let span = debug_span!("iteration", iteration);
        let _enter = span.enter();

        let params = &self.params;
        let width = self.width as usize;
        let pixel_count = self.pixels.len();

        // Camera pass
        let batches: Option<Vec<Vec<CameraRecord>>> = self.arenas
            .par_iter_mut()
            .enumerate()
            .map(|(b, arena)| {
                if cancel.load(Ordering::Relaxed) {
                    return None;
                }
                arena.reset();
                let arena: &Bump = arena;

                let mut sampler = sampler.clone_with_seed(hash_seed(&[params.seed, iteration, 0, b as u64]));
                let begin = b * params.pixel_batch;
                let end = (begin + params.pixel_batch).min(pixel_count);
                let records = (begin..end)
                    .map(|i| {
                        let s = sampler.sample2();
                        let p_film = Point2f::new((i % width) as Float + s.u, (i / width) as Float + s.v);
                        let ray = camera.generate_ray(p_film);
                        trace_camera_path(params, scene, ray, arena, sampler.as_mut())
                    })
                    .collect();
                Some(records)
            })
            .collect();
        let records: Vec<CameraRecord> = batches?.into_iter().flatten().collect();

        if cancel.load(Ordering::Relaxed) {
            return None;
        }

        // Grid build
        let pixels = &self.pixels;
        let searcher = &mut self.searcher;
        searcher.clear();
        let node_count = records.iter()
            .zip(pixels)
            .filter_map(|(r, p)| r.vp.as_ref().map(|vp| searcher.cell_count(vp.pos, p.radius)))
            .sum();
        searcher.reserve(node_count);

        let searcher = &*searcher;
        let dropped = records.par_iter()
            .zip(pixels.par_iter())
            .enumerate()
            .filter(|(i, (r, p))| match &r.vp {
                Some(vp) => !searcher.add_vp(*i as u32, vp.pos, p.radius),
                None => false,
            })
            .count();
        if dropped > 0 {
            warn!(dropped, "visible point node arena overflowed");
        }
        let visible_points = records.iter().filter(|r| r.vp.is_some()).count();

        // Photon pass
        let photon_count = params.photons_per_iteration;
        let photon_batches = (photon_count + params.photon_batch - 1) / params.photon_batch;
        let deposits: Option<usize> = (0..photon_batches)
            .into_par_iter()
            .map_init(Bump::new, |arena, b| {
                if cancel.load(Ordering::Relaxed) {
                    return None;
                }
                let mut sampler = sampler.clone_with_seed(hash_seed(&[params.seed, iteration, 1, b as u64]));
                let begin = b * params.photon_batch;
                let end = (begin + params.photon_batch).min(photon_count);
                let mut deposits = 0;
                for _ in begin..end {
                    arena.reset();
                    deposits += trace_photon(params, scene, searcher, pixels, &records, arena, sampler.as_mut());
                }
                Some(deposits)
            })
            .sum();

        let deposits = match deposits {
            Some(d) => d,
            None => {
                pixels.par_iter().for_each(|p| p.reset_photons());
                return None;
            }
        };

        // Statistics update
        let alpha = params.alpha;
        self.pixels
            .par_iter_mut()
            .zip(records.par_iter())
            .for_each(|(pixel, record)| pixel.commit(record, alpha));
        let grid_nodes = self.searcher.node_count();
        drop(records);

        self.iterations += 1;
        self.photons_emitted += photon_count as u64;

        let stats = IterationStats {
            iteration: self.iterations,
            photons: photon_count as u64,
            visible_points,
            grid_nodes,
            deposits,
            elapsed: start.elapsed(),
        };
        debug!(?stats, "iteration committed");
        Some(stats)
    }

    /// Copy the current estimate into `target`.
    pub fn write_target(&self, target: &mut RenderTarget) {
        let iterations = self.iterations;
        let photons = self.photons_emitted;
        let inv_iter = if iterations > 0 { 1.0 / iterations as Float } else { 0.0 };

        target.image.par_iter_mut()
            .zip(target.albedo.par_iter_mut())
            .zip(target.normal.par_iter_mut())
            .zip(self.pixels.par_iter())
            .for_each(|(((image, albedo), normal), pixel)| {
                *image = pixel.radiance_estimate(iterations, photons);
                *albedo = pixel.albedo * inv_iter;
                *normal = normal_or_zero(pixel.normal);
            });
        target.iterations = iterations;
        target.photons = photons;
    }
}

fn normal_or_zero(n: Vec3f) -> Vec3f {
    let len = n.magnitude();
    if len > 0.0 {
        n / len
    } else {
        n
    }
}
