use crate::{Float, ConstructionError};
use crate::spectrum::Spectrum;

/// Maps linear radiance to display values in place.
pub trait PostProcessor: Sync + Send {
    fn process(&self, image: &mut [Spectrum]);
}

/// Narkowicz's fit of the ACES filmic curve, applied after scaling by `exposure`.
#[derive(Clone, Copy, Debug)]
pub struct AcesToneMapper {
    exposure: Float,
}

impl AcesToneMapper {
    pub fn new(exposure: Float) -> Result<Self, ConstructionError> {
        if !(exposure >= 0.0) || !exposure.is_finite() {
            return Err(ConstructionError::invalid("exposure", format!("{} must be finite and non-negative", exposure)));
        }
        Ok(Self { exposure })
    }

    pub fn exposure(&self) -> Float {
        self.exposure
    }

    pub fn map(&self, s: Spectrum) -> Spectrum {
        s.map(|x| aces_curve(x * self.exposure))
    }
}

impl Default for AcesToneMapper {
    fn default() -> Self {
        Self { exposure: 10.0 }
    }
}

impl PostProcessor for AcesToneMapper {
    fn process(&self, image: &mut [Spectrum]) {
        image.iter_mut().for_each(|s| *s = self.map(*s));
    }
}

fn aces_curve(x: Float) -> Float {
    const A: Float = 2.51;
    const B: Float = 0.03;
    const C: Float = 2.43;
    const D: Float = 0.59;
    const E: Float = 0.14;
    ((x * (A * x + B)) / (x * (C * x + D) + E)).clamp(0.0, 1.0)
}

/// Linear to sRGB transfer function.
#[derive(Clone, Copy, Debug, Default)]
pub struct GammaCorrection;

impl PostProcessor for GammaCorrection {
    fn process(&self, image: &mut [Spectrum]) {
        image.iter_mut().for_each(|s| *s = s.map(gamma_correct));
    }
}

pub fn gamma_correct(v: Float) -> Float {
    if v <= 0.0031308 {
        12.92 * v
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_negative_exposure_rejected() {
        assert!(AcesToneMapper::new(-0.5).is_err());
        assert!(AcesToneMapper::new(Float::NAN).is_err());
        assert!(AcesToneMapper::new(0.0).is_ok());
        assert_eq!(AcesToneMapper::default().exposure(), 10.0);
    }

    #[test]
    fn test_aces_curve() {
        let aces = AcesToneMapper::new(1.0).unwrap();
        assert_eq!(aces.map(Spectrum::zero()), Spectrum::zero());
        assert_abs_diff_eq!(aces.map(Spectrum::one())[0], 2.54 / 3.16, epsilon = 1e-6);
        // saturates
        assert_eq!(aces.map(Spectrum::uniform(1.0e4))[1], 1.0);

        let mut img = vec![Spectrum::uniform(0.1), Spectrum::uniform(0.2)];
        aces.process(&mut img);
        assert!(img[0][0] < img[1][0]);
    }

    #[test]
    fn test_gamma_endpoints() {
        assert_eq!(gamma_correct(0.0), 0.0);
        assert_abs_diff_eq!(gamma_correct(1.0), 1.0, epsilon = 1e-6);
    }
}
