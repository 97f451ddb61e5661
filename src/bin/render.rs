use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;
use sppm::camera::{Camera, PinholeCamera};
use sppm::film::{Film, RenderTarget};
use sppm::imageio::{write_png, normals_to_spectrum};
use sppm::integrator::SppmParams;
use sppm::postprocess::{AcesToneMapper, GammaCorrection, PostProcessor};
use sppm::renderer::{Renderer, SppmRenderer, ProgressBarReporter, SilentReporter, Reporter};
use sppm::sampler::RandomSampler;
use sppm::scene::Scene;
use sppm::scenes;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SceneChoice {
    SphereOverPlane,
    Cornell,
    Sky,
}

/// Render a built-in scene with stochastic progressive photon mapping.
#[derive(Debug, Parser)]
#[clap(version, about)]
struct Args {
    #[clap(value_enum, default_value = "cornell")]
    scene: SceneChoice,

    #[clap(short, long, default_value = "render.png")]
    output: PathBuf,

    /// Also write the mean first-hit albedo here
    #[clap(long)]
    albedo: Option<PathBuf>,

    /// Also write the mean first-hit normal here
    #[clap(long)]
    normal: Option<PathBuf>,

    #[clap(long, default_value_t = 512)]
    width: u32,

    #[clap(long, default_value_t = 512)]
    height: u32,

    /// Iteration budget; 0 renders until the time limit
    #[clap(short, long, default_value_t = 64)]
    iterations: u64,

    /// Time budget in seconds
    #[clap(short, long)]
    time_limit: Option<f64>,

    #[clap(short, long, default_value_t = 200_000)]
    photons: usize,

    #[clap(long, default_value_t = 0.05)]
    init_radius: f32,

    #[clap(long, default_value_t = 2.0 / 3.0)]
    alpha: f32,

    /// Worker threads; 0 uses every core
    #[clap(short = 'j', long, default_value_t = 0)]
    threads: usize,

    #[clap(long, default_value_t = 0)]
    seed: u64,

    #[clap(long, default_value_t = 1.0)]
    exposure: f32,

    /// Rewrite the output image every N iterations while rendering
    #[clap(long, default_value_t = 0)]
    snapshot_interval: u64,

    #[clap(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let (scene, camera): (Scene, PinholeCamera) = match args.scene {
        SceneChoice::SphereOverPlane => (
            scenes::sphere_over_plane(9.0, 0.5)?,
            scenes::sphere_over_plane_camera(args.width, args.height),
        ),
        SceneChoice::Cornell => (
            scenes::cornell_box()?,
            scenes::cornell_box_camera(args.width, args.height),
        ),
        SceneChoice::Sky => (
            scenes::sky_spheres()?,
            scenes::sky_spheres_camera(args.width, args.height),
        ),
    };

    if matches!(args.time_limit, Some(t) if !(t > 0.0 && t.is_finite())) {
        anyhow::bail!("--time-limit must be a positive number of seconds");
    }
    let iteration_count = if args.iterations == 0 { None } else { Some(args.iterations) };
    if iteration_count.is_none() && args.time_limit.is_none() {
        anyhow::bail!("either --iterations or --time-limit must bound the render");
    }

    let params = SppmParams::default()
        .worker_count(args.threads)
        .photons_per_iteration(args.photons)
        .init_radius(args.init_radius)
        .alpha(args.alpha)
        .iteration_count(iteration_count)
        .time_limit(args.time_limit.map(Duration::from_secs_f64))
        .seed(args.seed)
        .snapshot_interval(args.snapshot_interval);
    let tone_mapper = AcesToneMapper::new(args.exposure)?;

    let mut reporter: Box<dyn Reporter> = if args.quiet {
        Box::new(SilentReporter)
    } else {
        Box::new(ProgressBarReporter::new())
    };

    let film = Arc::new(Film::new(camera.resolution().0, camera.resolution().1));
    let mut renderer = SppmRenderer::new(params)?;
    renderer.render(
        Arc::new(scene),
        Arc::new(camera),
        Box::new(RandomSampler::new_with_seed(args.seed)),
        film.clone(),
        reporter.as_mut(),
    )?;

    if args.snapshot_interval > 0 {
        let mut written = 0;
        while !renderer.is_completed() {
            std::thread::sleep(Duration::from_millis(250));
            let target = film.snapshot();
            if target.iterations > written {
                written = target.iterations;
                write_image(&args.output, &target, &tone_mapper)?;
            }
        }
    }
    renderer.join(reporter.as_mut())?;

    let target = film.snapshot();
    let resolution = (target.width, target.height);
    write_image(&args.output, &target, &tone_mapper)?;

    if let Some(path) = &args.albedo {
        let mut albedo = target.albedo.clone();
        GammaCorrection.process(&mut albedo);
        write_png(path, &albedo, resolution)?;
    }
    if let Some(path) = &args.normal {
        write_png(path, &normals_to_spectrum(&target.normal), resolution)?;
    }

    tracing::info!(
        iterations = target.iterations,
        photons = target.photons,
        output = %args.output.display(),
        "done"
    );
    Ok(())
}

fn write_image(path: &Path, target: &RenderTarget, tone_mapper: &AcesToneMapper) -> anyhow::Result<()> {
    let mut image = target.image.clone();
    tone_mapper.process(&mut image);
    GammaCorrection.process(&mut image);
    write_png(path, &image, (target.width, target.height))
}
