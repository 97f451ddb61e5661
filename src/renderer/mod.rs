use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use anyhow::anyhow;
use parking_lot::Mutex;
use tracing::info;
use crate::ConstructionError;
use crate::camera::Camera;
use crate::film::Film;
use crate::integrator::{SppmParams, SppmIntegrator, IterationStats};
use crate::sampler::Sampler;
use crate::scene::Scene;

pub mod reporter;

pub use reporter::{Reporter, ProgressBarReporter, SilentReporter};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Drives a render on a background thread.
pub trait Renderer {
    /// Start rendering into `film`. Returns once the worker thread is running.
    fn render(
        &mut self,
        scene: Arc<Scene>,
        camera: Arc<dyn Camera>,
        sampler: Box<dyn Sampler>,
        film: Arc<Film>,
        reporter: &mut dyn Reporter,
    ) -> Result<(), ConstructionError>;

    fn is_completed(&self) -> bool;

    /// Block until the render ends, forwarding progress to `reporter`.
    fn join(&mut self, reporter: &mut dyn Reporter) -> anyhow::Result<()>;

    /// Ask the render to end early. The current iteration is discarded.
    fn stop(&self);
}

#[derive(Default)]
struct Progress {
    percent: f32,
    latest: Option<IterationStats>,
    /// Why the render ended before its iteration budget, if it did.
    notice: Option<String>,
}

#[derive(Default)]
struct Shared {
    cancel: AtomicBool,
    progress: Mutex<Progress>,
}

/// Single-use SPPM renderer.
pub struct SppmRenderer {
    params: SppmParams,
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
    used: bool,
    started: Option<Instant>,
}

impl SppmRenderer {
    pub fn new(params: SppmParams) -> Result<Self, ConstructionError> {
        params.validate()?;
        Ok(Self {
            params,
            shared: Arc::new(Shared::default()),
            handle: None,
            used: false,
            started: None,
        })
    }

    pub fn params(&self) -> &SppmParams {
        &self.params
    }

    fn forward_progress(&self, reporter: &mut dyn Reporter, reported: &mut u64) {
        let progress = self.shared.progress.lock();
        if let Some(stats) = progress.latest {
            if stats.iteration > *reported {
                *reported = stats.iteration;
                reporter.progress(progress.percent, &stats);
            }
        }
    }
}

impl Renderer for SppmRenderer {
    fn render(
        &mut self,
        scene: Arc<Scene>,
        camera: Arc<dyn Camera>,
        sampler: Box<dyn Sampler>,
        film: Arc<Film>,
        reporter: &mut dyn Reporter,
    ) -> Result<(), ConstructionError> {
        if self.used {
            return Err(ConstructionError::RendererReused);
        }

        let resolution = film.resolution();
        if camera.resolution() != resolution {
            return Err(ConstructionError::invalid(
                "film",
                format!("film is {:?} but the camera renders {:?}", resolution, camera.resolution()),
            ));
        }

        let integrator = SppmIntegrator::new(self.params.clone(), &scene, resolution)?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.params.worker_count)
            .thread_name(|i| format!("sppm-worker-{}", i))
            .build()
            .map_err(|e| ConstructionError::ThreadPool(e.to_string()))?;

        info!(
            width = resolution.0,
            height = resolution.1,
            threads = pool.current_num_threads(),
            photons_per_iteration = self.params.photons_per_iteration,
            "render started"
        );
        reporter.begin();

        let shared = self.shared.clone();
        let handle = std::thread::Builder::new()
            .name("sppm-render".to_string())
            .spawn(move || {
                pool.install(|| run(integrator, &scene, camera.as_ref(), sampler.as_ref(), &film, &shared))
            })
            .map_err(|e| ConstructionError::ThreadPool(e.to_string()))?;

        self.used = true;
        self.started = Some(Instant::now());
        self.handle = Some(handle);
        Ok(())
    }

    fn is_completed(&self) -> bool {
        match &self.handle {
            Some(handle) => handle.is_finished(),
            None => self.used,
        }
    }

    fn join(&mut self, reporter: &mut dyn Reporter) -> anyhow::Result<()> {
        let handle = match self.handle.take() {
            Some(handle) => handle,
            None => return Ok(()),
        };

        let mut reported = 0;
        while !handle.is_finished() {
            self.forward_progress(reporter, &mut reported);
            std::thread::sleep(POLL_INTERVAL);
        }
        self.forward_progress(reporter, &mut reported);
        if let Some(notice) = self.shared.progress.lock().notice.take() {
            reporter.message(&notice);
        }
        reporter.end();

        handle.join().map_err(|_| anyhow!("render worker thread panicked"))?;
        info!(
            iterations = reported,
            elapsed = ?self.started.map(|s| s.elapsed()),
            "render finished"
        );
        Ok(())
    }

    fn stop(&self) {
        self.shared.cancel.store(true, Ordering::Relaxed);
    }
}

fn run(
    mut integrator: SppmIntegrator,
    scene: &Scene,
    camera: &dyn Camera,
    sampler: &dyn Sampler,
    film: &Film,
    shared: &Shared,
) {
    let start = Instant::now();
    let params = integrator.params().clone();

    let notice = loop {
        if shared.cancel.load(Ordering::Relaxed) {
            break Some(format!("stopped after {} iterations", integrator.iterations()));
        }
        if matches!(params.iteration_count, Some(n) if integrator.iterations() >= n) {
            break None;
        }
        if matches!(params.time_limit, Some(limit) if start.elapsed() >= limit) {
            break Some(format!("time limit reached after {} iterations", integrator.iterations()));
        }

        let stats = match integrator.iteration(scene, camera, sampler, &shared.cancel) {
            Some(stats) => stats,
            None => break Some(format!("stopped after {} iterations", integrator.iterations())),
        };

        {
            let mut progress = shared.progress.lock();
            progress.percent = percent_done(&params, stats.iteration, start.elapsed());
            progress.latest = Some(stats);
        }

        if params.snapshot_interval > 0 && stats.iteration % params.snapshot_interval == 0 {
            film.update(|target| integrator.write_target(target));
        }
    };

    film.update(|target| integrator.write_target(target));
    shared.progress.lock().notice = notice;
}

/// Fraction of the tighter budget used so far, in percent.
fn percent_done(params: &SppmParams, iterations: u64, elapsed: Duration) -> f32 {
    let by_count = params.iteration_count.map(|n| iterations as f32 / n as f32);
    let by_time = params.time_limit.map(|limit| elapsed.as_secs_f32() / limit.as_secs_f32().max(1e-6));
    let done = match (by_count, by_time) {
        (Some(a), Some(b)) => a.max(b),
        (Some(a), None) | (None, Some(a)) => a,
        (None, None) => 0.0,
    };
    100.0 * done.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_done() {
        let params = SppmParams::default().iteration_count(Some(10));
        assert_eq!(percent_done(&params, 5, Duration::from_secs(100)), 50.0);

        let params = params.time_limit(Some(Duration::from_secs(4)));
        assert_eq!(percent_done(&params, 1, Duration::from_secs(2)), 50.0);
        assert_eq!(percent_done(&params, 20, Duration::from_secs(1)), 100.0);

        let params = SppmParams::default().iteration_count(None);
        assert_eq!(percent_done(&params, 3, Duration::from_secs(1)), 0.0);
    }

    #[test]
    fn test_invalid_params_rejected() {
        assert!(SppmRenderer::new(SppmParams::default().alpha(0.0)).is_err());
    }
}
