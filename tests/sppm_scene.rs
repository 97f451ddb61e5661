use std::sync::Arc;
use std::time::Duration;
use approx::assert_relative_eq;
use pretty_assertions::assert_eq;
use sppm::{ConstructionError, Float};
use sppm::camera::{Camera, PinholeCamera};
use sppm::film::{Film, RenderTarget};
use sppm::integrator::{SppmParams, IterationStats};
use sppm::material::MatteMaterial;
use sppm::renderer::{Renderer, SppmRenderer, Reporter, SilentReporter};
use sppm::sampler::RandomSampler;
use sppm::scene::{Scene, SceneBuilder};
use sppm::scenes;
use sppm::shapes::{Sphere, Quad};
use sppm::spectrum::Spectrum;

#[derive(Default)]
struct RecordingReporter {
    began: bool,
    ended: bool,
    updates: Vec<(f32, u64)>,
    messages: Vec<String>,
}

impl Reporter for RecordingReporter {
    fn begin(&mut self) {
        self.began = true;
    }

    fn progress(&mut self, percent: f32, stats: &IterationStats) {
        self.updates.push((percent, stats.iteration));
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn end(&mut self) {
        self.ended = true;
    }
}

fn render(
    scene: Scene,
    camera: PinholeCamera,
    params: SppmParams,
    reporter: &mut dyn Reporter,
) -> anyhow::Result<RenderTarget> {
    let (w, h) = camera.resolution();
    let film = Arc::new(Film::new(w, h));
    let mut renderer = SppmRenderer::new(params)?;
    renderer.render(
        Arc::new(scene),
        Arc::new(camera),
        Box::new(RandomSampler::new_with_seed(0)),
        film.clone(),
        reporter,
    )?;
    renderer.join(reporter)?;
    assert!(renderer.is_completed());
    Ok(film.snapshot())
}

fn mean(img: &[Spectrum]) -> Spectrum {
    img.iter().copied().sum::<Spectrum>() / img.len() as Float
}

/// Ground point right below an emissive sphere: L = ρ·Le·(R/d)².
#[test]
fn emissive_sphere_over_plane_converges() -> anyhow::Result<()> {
    let scene = scenes::sphere_over_plane(9.0, 0.5)?;
    let camera = PinholeCamera::look_at(point(2.0, 0.0, 2.5), point(0.0, 0.0, 0.0), sppm::Vec3f::unit_z(), 1.0, 5, 5);
    let params = SppmParams::default()
        .worker_count(2)
        .iteration_count(Some(128))
        .photons_per_iteration(1000)
        .direct_illum_sample_count(4)
        .init_radius(0.05)
        .seed(11);

    let mut reporter = RecordingReporter::default();
    let target = render(scene, camera, params, &mut reporter)?;

    assert_eq!(target.iterations, 128);
    assert_eq!(target.photons, 128 * 1000);
    let expected = 0.5 * 9.0 / 9.0;
    let m = mean(&target.image);
    for i in 0..3 {
        assert_relative_eq!(m[i], expected, max_relative = 0.05);
    }
    assert_relative_eq!(mean(&target.albedo)[0], 0.5, max_relative = 1e-5);

    assert!(reporter.began && reporter.ended);
    let last = reporter.updates.last().copied();
    assert_eq!(last, Some((100.0, 128)));
    // ran to its budget, nothing to report
    assert!(reporter.messages.is_empty());
    Ok(())
}

#[test]
fn no_lights_renders_black() -> anyhow::Result<()> {
    let mut builder = SceneBuilder::new();
    builder
        .add_entity(Arc::new(Quad::centered(point(0.0, 0.0, 0.0), sppm::Vec3f::unit_z(), 4.0)), MatteMaterial::new(Spectrum::uniform(0.8))?)
        .add_entity(Arc::new(Sphere::new(point(0.0, 0.0, 1.0), 0.5)), MatteMaterial::new(Spectrum::uniform(0.8))?);
    let scene = builder.build();
    let camera = PinholeCamera::look_at(point(0.0, -4.0, 2.0), point(0.0, 0.0, 0.5), sppm::Vec3f::unit_z(), 40.0, 8, 6);
    let params = SppmParams::default().iteration_count(Some(3)).photons_per_iteration(500);

    let target = render(scene, camera, params, &mut SilentReporter)?;
    assert_eq!(target.iterations, 3);
    assert!(target.image.iter().all(|s| *s == Spectrum::zero()));
    Ok(())
}

#[test]
fn stop_ends_unbounded_render() -> anyhow::Result<()> {
    let scene = scenes::cornell_box()?;
    let camera = scenes::cornell_box_camera(16, 16);
    let film = Arc::new(Film::new(16, 16));
    let params = SppmParams::default()
        .iteration_count(None)
        .photons_per_iteration(2000)
        .worker_count(2);

    let mut renderer = SppmRenderer::new(params)?;
    renderer.render(
        Arc::new(scene),
        Arc::new(camera),
        Box::new(RandomSampler::new_with_seed(5)),
        film.clone(),
        &mut SilentReporter,
    )?;
    std::thread::sleep(Duration::from_millis(200));
    assert!(!renderer.is_completed());

    renderer.stop();
    let mut reporter = RecordingReporter::default();
    renderer.join(&mut reporter)?;
    assert!(renderer.is_completed());
    assert_eq!(reporter.messages.len(), 1);
    assert!(reporter.messages[0].starts_with("stopped after"));

    // whatever committed is self-consistent
    let target = film.snapshot();
    assert_eq!(target.photons, target.iterations * 2000);
    assert!(target.image.iter().all(|s| s.is_finite()));
    Ok(())
}

fn start_sky(renderer: &mut SppmRenderer) -> Result<(), ConstructionError> {
    renderer.render(
        Arc::new(scenes::sky_spheres()?),
        Arc::new(scenes::sky_spheres_camera(4, 4)),
        Box::new(RandomSampler::new_with_seed(1)),
        Arc::new(Film::new(4, 4)),
        &mut SilentReporter,
    )
}

#[test]
fn renderer_is_single_use() -> anyhow::Result<()> {
    let params = SppmParams::default().iteration_count(Some(1)).photons_per_iteration(100);
    let mut renderer = SppmRenderer::new(params)?;

    start_sky(&mut renderer)?;
    renderer.join(&mut SilentReporter)?;
    assert_eq!(start_sky(&mut renderer), Err(ConstructionError::RendererReused));
    Ok(())
}

#[test]
fn film_must_match_camera() -> anyhow::Result<()> {
    let mut renderer = SppmRenderer::new(SppmParams::default())?;
    let result = renderer.render(
        Arc::new(scenes::cornell_box()?),
        Arc::new(scenes::cornell_box_camera(8, 8)),
        Box::new(RandomSampler::new_with_seed(1)),
        Arc::new(Film::new(4, 4)),
        &mut SilentReporter,
    );
    assert!(matches!(result, Err(ConstructionError::InvalidParameter { name: "film", .. })));
    assert!(!renderer.is_completed());

    // a rejected configuration leaves the renderer usable
    renderer.render(
        Arc::new(scenes::cornell_box()?),
        Arc::new(scenes::cornell_box_camera(4, 4)),
        Box::new(RandomSampler::new_with_seed(1)),
        Arc::new(Film::new(4, 4)),
        &mut SilentReporter,
    )?;
    renderer.stop();
    renderer.join(&mut SilentReporter)?;
    assert!(renderer.is_completed());
    Ok(())
}

fn point(x: Float, y: Float, z: Float) -> sppm::Point3f {
    sppm::Point3f::new(x, y, z)
}
