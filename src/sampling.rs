use crate::{Point2f, Vec2f, Vec3f, Float};
use crate::consts::{PI, FRAC_PI_2, FRAC_PI_4, FRAC_1_PI, INV_4_PI};

pub fn concentric_sample_disk(u: Point2f) -> Point2f {
    // map sample from [0, 1] to [-1, 1]
    let u_offset = 2.0 * u - Vec2f::new(1.0, 1.0);
    if u_offset == Point2f::new(0.0, 0.0) {
        return Point2f::new(0.0, 0.0);
    }

    let (r, theta) = if u_offset.x.abs() > u_offset.y.abs() {
        (u_offset.x, FRAC_PI_4 * (u_offset.y / u_offset.x))
    } else {
        (u_offset.y, FRAC_PI_2 - FRAC_PI_4 * (u_offset.x / u_offset.y))
    };

    Point2f::new(r * theta.cos(), r * theta.sin())
}

pub fn cosine_sample_hemisphere(u: Point2f) -> Vec3f {
    let d = concentric_sample_disk(u);
    let z = Float::sqrt(Float::max(0.0, 1.0 - d.x * d.x - d.y * d.y));
    Vec3f::new(d.x, d.y, z)
}

pub fn cosine_hemisphere_pdf(cos_theta: Float) -> Float {
    cos_theta.max(0.0) * FRAC_1_PI
}

pub fn uniform_sample_sphere(u: Point2f) -> Vec3f {
    let z = 1.0 - 2.0 * u[0];
    let r = Float::sqrt(Float::max(0.0, 1.0 - z * z));
    let phi = 2.0 * PI * u[1];
    Vec3f::new(r * phi.cos(), r * phi.sin(), z)
}

pub const fn uniform_sphere_pdf() -> Float {
    INV_4_PI
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_hemisphere_samples_are_unit_and_upper() {
        for i in 0..16 {
            for j in 0..16 {
                let u = Point2f::new((i as Float + 0.5) / 16.0, (j as Float + 0.5) / 16.0);
                let w = cosine_sample_hemisphere(u);
                assert!(w.z >= 0.0);
                assert_abs_diff_eq!(w.magnitude(), 1.0, epsilon = 1.0e-4);

                let s = uniform_sample_sphere(u);
                assert_abs_diff_eq!(s.magnitude(), 1.0, epsilon = 1.0e-4);
            }
        }
    }
}
