use indicatif::{ProgressBar, ProgressStyle};
use crate::integrator::IterationStats;

/// Receives progress from a running render.
pub trait Reporter {
    fn begin(&mut self);

    /// `percent` is in `[0, 100]`, or 0 when the render has no budget.
    fn progress(&mut self, percent: f32, stats: &IterationStats);

    fn message(&mut self, msg: &str);

    fn end(&mut self);
}

/// Terminal progress bar.
#[derive(Default)]
pub struct ProgressBarReporter {
    bar: Option<ProgressBar>,
}

impl ProgressBarReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reporter for ProgressBarReporter {
    fn begin(&mut self) {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}")
                .progress_chars("=> "),
        );
        self.bar = Some(bar);
    }

    fn progress(&mut self, percent: f32, stats: &IterationStats) {
        if let Some(bar) = &self.bar {
            bar.set_position(percent.round().clamp(0.0, 100.0) as u64);
            bar.set_message(format!(
                "iteration {} ({} photons, {:.0?})",
                stats.iteration, stats.photons, stats.elapsed
            ));
        }
    }

    fn message(&mut self, msg: &str) {
        match &self.bar {
            Some(bar) => bar.println(msg),
            None => eprintln!("{}", msg),
        }
    }

    fn end(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish();
        }
    }
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn begin(&mut self) {}

    fn progress(&mut self, _percent: f32, _stats: &IterationStats) {}

    fn message(&mut self, _msg: &str) {}

    fn end(&mut self) {}
}
