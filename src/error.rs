use thiserror::Error;

/// Rejected configuration of a material, tone mapper or renderer.
#[derive(Debug, Error, PartialEq)]
pub enum ConstructionError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: String,
    },

    #[error("renderer has already been used; create a new one for each render")]
    RendererReused,

    #[error("failed to build worker thread pool: {0}")]
    ThreadPool(String),
}

impl ConstructionError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ConstructionError::InvalidParameter { name, reason: reason.into() }
    }
}

/// Reject values outside `[lo, hi]` (and NaN).
pub(crate) fn check_range(name: &'static str, v: crate::Float, lo: crate::Float, hi: crate::Float) -> Result<(), ConstructionError> {
    if v >= lo && v <= hi {
        Ok(())
    } else {
        Err(ConstructionError::invalid(name, format!("{} is outside [{}, {}]", v, lo, hi)))
    }
}
