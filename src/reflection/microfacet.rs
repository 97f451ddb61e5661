use crate::{Vec3f, Float, spherical_direction};
use crate::reflection::{tan_theta, cos2_theta};
use crate::consts::PI;
use cgmath::InnerSpace;

/// Below this the GTR2 lobe degenerates into a delta, which the Disney lobe cannot sample.
pub const MIN_ALPHA: Float = 1.0e-3;

/// Anisotropic GTR2 (GGX / Trowbridge-Reitz) distribution of microfacet normals.
#[derive(Clone, Copy, Debug)]
pub struct Gtr2 {
    pub alpha_x: Float,
    pub alpha_y: Float,
}

impl Gtr2 {
    pub fn new(alpha_x: Float, alpha_y: Float) -> Self {
        Self {
            alpha_x: alpha_x.max(MIN_ALPHA),
            alpha_y: alpha_y.max(MIN_ALPHA),
        }
    }

    /// Disney mapping from perceptual roughness and anisotropy to the two alphas.
    pub fn from_roughness(roughness: Float, anisotropic: Float) -> Self {
        let aspect = if anisotropic > 0.0 { (1.0 - 0.9 * anisotropic).sqrt() } else { 1.0 };
        let a = roughness * roughness;
        Self::new(a / aspect, a * aspect)
    }

    pub fn d(&self, wh: Vec3f) -> Float {
        if wh.z <= 0.0 {
            return 0.0;
        }
        let e = sq!(wh.x / self.alpha_x) + sq!(wh.y / self.alpha_y) + sq!(wh.z);
        1.0 / (PI * self.alpha_x * self.alpha_y * e * e)
    }

    pub fn lambda(&self, w: Vec3f) -> Float {
        let cos2 = cos2_theta(w);
        if cos2 == 0.0 {
            return Float::INFINITY;
        }
        let alpha2_tan2 = (sq!(self.alpha_x * w.x) + sq!(self.alpha_y * w.y)) / cos2;
        (-1.0 + Float::sqrt(1.0 + alpha2_tan2)) / 2.0
    }

    /// Smith masking for a single direction.
    pub fn g1(&self, w: Vec3f) -> Float {
        1.0 / (1.0 + self.lambda(w))
    }

    /// Sample a normal from the distribution of normals visible from `wo` (Heitz 2018).
    /// `wo` must be in the upper hemisphere.
    pub fn sample_visible(&self, wo: Vec3f, u1: Float, u2: Float) -> Vec3f {
        let vh = Vec3f::new(self.alpha_x * wo.x, self.alpha_y * wo.y, wo.z).normalize();

        let lensq = vh.x * vh.x + vh.y * vh.y;
        let t1 = if lensq > 0.0 {
            Vec3f::new(-vh.y, vh.x, 0.0) / lensq.sqrt()
        } else {
            Vec3f::new(1.0, 0.0, 0.0)
        };
        let t2 = vh.cross(t1);

        let r = u1.sqrt();
        let phi = 2.0 * PI * u2;
        let p1 = r * phi.cos();
        let s = 0.5 * (1.0 + vh.z);
        let p2 = (1.0 - s) * Float::sqrt(Float::max(0.0, 1.0 - p1 * p1)) + s * r * phi.sin();

        let nh = p1 * t1 + p2 * t2 + Float::sqrt(Float::max(0.0, 1.0 - p1 * p1 - p2 * p2)) * vh;
        Vec3f::new(self.alpha_x * nh.x, self.alpha_y * nh.y, nh.z.max(0.0)).normalize()
    }

    /// Density of `sample_visible` expressed over reflected directions.
    pub fn pdf_reflected(&self, wo: Vec3f, wh: Vec3f) -> Float {
        if wo.z <= 0.0 {
            return 0.0;
        }
        self.g1(wo) * self.d(wh) / (4.0 * wo.z)
    }
}

/// Berry's GTR1 distribution, used for the clearcoat lobe.
pub fn gtr1(cos_theta_h: Float, alpha: Float) -> Float {
    let a2 = alpha * alpha;
    if a2 >= 1.0 {
        return 1.0 / PI;
    }
    (a2 - 1.0) / (PI * a2.ln() * (1.0 + (a2 - 1.0) * cos_theta_h * cos_theta_h))
}

/// Sample a GTR1 normal proportionally to `D(h) cos(theta_h)`.
pub fn sample_gtr1(alpha: Float, u1: Float, u2: Float) -> Vec3f {
    let a2 = alpha * alpha;
    let cos_theta = if a2 >= 1.0 {
        (1.0 - u1).sqrt()
    } else {
        Float::sqrt(Float::max(0.0, (1.0 - a2.powf(1.0 - u1)) / (1.0 - a2)))
    };
    let sin_theta = Float::sqrt(Float::max(0.0, 1.0 - cos_theta * cos_theta));
    spherical_direction(sin_theta, cos_theta, 2.0 * PI * u2)
}

/// Isotropic GTR2 Smith masking with a fixed alpha.
pub fn smith_gtr2(w: Vec3f, alpha: Float) -> Float {
    let tan = tan_theta(w).abs();
    if tan.is_infinite() || tan.is_nan() {
        return 0.0;
    }
    2.0 / (1.0 + Float::sqrt(1.0 + sq!(alpha * tan)))
}
