pub mod direct_illum;
pub mod sppm;

pub use sppm::{SppmParams, SppmIntegrator, IterationStats};
