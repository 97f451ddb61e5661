use std::sync::atomic::{AtomicU32, Ordering};
use crate::{Float, Point3f, Vec3f};
use crate::parallel::AtomicFloat;
use crate::reflection::Bsdf;
use crate::spectrum::Spectrum;
use crate::consts::PI;

/// Where a camera path came to rest this iteration.
#[derive(Clone, Copy)]
pub struct VisiblePoint<'a> {
    pub pos: Point3f,
    /// Direction back along the camera path
    pub wr: Vec3f,
    /// Camera path throughput up to `pos`
    pub coef: Spectrum,
    pub bsdf: &'a Bsdf,
}

/// Result of the camera pass for one pixel. Folded into [`Pixel`] only once the
/// iteration has finished.
#[derive(Clone, Copy)]
pub struct CameraRecord<'a> {
    pub vp: Option<VisiblePoint<'a>>,
    pub direct_illum: Spectrum,
    pub albedo: Spectrum,
    pub normal: Vec3f,
}

impl Default for CameraRecord<'_> {
    fn default() -> Self {
        Self {
            vp: None,
            direct_illum: Spectrum::zero(),
            albedo: Spectrum::zero(),
            normal: vec3f!(0, 0, 0),
        }
    }
}

/// Per-pixel progressive photon statistics.
#[derive(Debug)]
pub struct Pixel {
    pub radius: Float,

    /// Accumulated (fractional) photon count
    pub n: Float,

    /// Photons gathered this iteration
    pub m: AtomicU32,

    /// Flux gathered this iteration
    pub phi: [AtomicFloat; 3],

    /// Radius-scaled accumulated flux
    pub tau: Spectrum,

    pub direct_illum: Spectrum,

    pub albedo: Spectrum,

    pub normal: Vec3f,
}

impl Pixel {
    pub fn new(radius: Float) -> Self {
        Self {
            radius,
            n: 0.0,
            m: AtomicU32::new(0),
            phi: Default::default(),
            tau: Spectrum::zero(),
            direct_illum: Spectrum::zero(),
            albedo: Spectrum::zero(),
            normal: vec3f!(0, 0, 0),
        }
    }

    pub fn add_flux(&self, delta: Spectrum) {
        for i in 0..3 {
            self.phi[i].fetch_add(delta[i]);
        }
        self.m.fetch_add(1, Ordering::Relaxed);
    }

    pub fn flux(&self) -> Spectrum {
        Spectrum::new_with(|i| self.phi[i].load())
    }

    pub fn photon_count(&self) -> u32 {
        self.m.load(Ordering::Relaxed)
    }

    pub fn reset_photons(&self) {
        for phi in &self.phi {
            phi.store(0.0);
        }
        self.m.store(0, Ordering::Relaxed);
    }

    /// Fold this iteration's photons into the running estimate and shrink the radius.
    pub fn update_statistics(&mut self, alpha: Float, coef: Spectrum) {
        let m = *self.m.get_mut() as Float;
        if m > 0.0 {
            let new_n = self.n + alpha * m;
            let new_r = self.radius * Float::sqrt(new_n / (self.n + m));

            let phi = Spectrum::new_with(|i| self.phi[i].load());
            self.tau = (self.tau + coef * phi) * (sq!(new_r) / sq!(self.radius));

            self.n = new_n;
            self.radius = new_r;
        }
        self.reset_photons();
    }

    /// Merge a finished iteration's camera-pass record.
    pub fn commit(&mut self, record: &CameraRecord, alpha: Float) {
        self.direct_illum += record.direct_illum;
        self.albedo += record.albedo;
        self.normal += record.normal;
        match &record.vp {
            Some(vp) => self.update_statistics(alpha, vp.coef),
            None => self.reset_photons(),
        }
    }

    pub fn radiance_estimate(&self, iterations: u64, photons: u64) -> Spectrum {
        if iterations == 0 {
            return Spectrum::zero();
        }
        let direct = self.direct_illum / iterations as Float;
        if photons == 0 {
            return direct;
        }
        let denom = photons as f64 * PI as f64 * sq!(self.radius as f64);
        direct + self.tau / denom as Float
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_radius_shrinks_only_with_photons() {
        let mut pixel = Pixel::new(0.5);
        pixel.update_statistics(2.0 / 3.0, Spectrum::one());
        assert_eq!(pixel.radius, 0.5);
        assert_eq!(pixel.n, 0.0);

        let mut last = pixel.radius;
        for _ in 0..10 {
            for _ in 0..4 {
                pixel.add_flux(Spectrum::uniform(1.0));
            }
            pixel.update_statistics(2.0 / 3.0, Spectrum::one());
            assert!(pixel.radius < last);
            last = pixel.radius;
            assert_eq!(pixel.photon_count(), 0);
            assert!(pixel.flux().is_black());
        }
    }

    #[test]
    fn test_alpha_one_keeps_radius() {
        let mut pixel = Pixel::new(0.25);
        for k in 1..=5 {
            for _ in 0..3 {
                pixel.add_flux(Spectrum::uniform(1.0));
            }
            pixel.update_statistics(1.0, Spectrum::one());
            assert_eq!(pixel.radius, 0.25);
            assert_eq!(pixel.n, 3.0 * k as Float);
        }
        assert_abs_diff_eq!(pixel.tau[0], 15.0, epsilon = 1.0e-5);
    }

    #[test]
    fn test_first_update() {
        let mut pixel = Pixel::new(1.0);
        pixel.add_flux(Spectrum::uniform(2.0));
        pixel.add_flux(Spectrum::uniform(1.0));
        pixel.update_statistics(0.5, Spectrum::uniform(2.0));

        // N' = 0.5 * 2, R' = sqrt(1 / 2), tau = 2 * 3 * (1 / 2)
        assert_abs_diff_eq!(pixel.n, 1.0);
        assert_abs_diff_eq!(pixel.radius, (0.5 as Float).sqrt(), epsilon = 1.0e-6);
        assert_abs_diff_eq!(pixel.tau[0], 3.0, epsilon = 1.0e-5);
    }

    #[test]
    fn test_radiance_estimate() {
        let mut pixel = Pixel::new(1.0);
        pixel.direct_illum = Spectrum::uniform(4.0);
        pixel.tau = Spectrum::uniform(PI);

        assert_eq!(pixel.radiance_estimate(0, 0), Spectrum::zero());
        assert_eq!(pixel.radiance_estimate(2, 0), Spectrum::uniform(2.0));
        assert_abs_diff_eq!(pixel.radiance_estimate(2, 10)[0], 2.1, epsilon = 1.0e-6);
    }
}
