use crate::{Point2f, Float, Ray, Point3f, Vec3f};
use cgmath::InnerSpace;

pub trait Camera: Sync + Send {
    /// Ray through raster position `p_film`; pixel `(x, y)` covers `[x, x + 1) × [y, y + 1)`.
    fn generate_ray(&self, p_film: Point2f) -> Ray;

    fn resolution(&self) -> (u32, u32);
}

pub struct PinholeCamera {
    eye: Point3f,
    forward: Vec3f,
    right: Vec3f,
    up: Vec3f,
    tan_half_fov: Float,
    width: u32,
    height: u32,
}

impl PinholeCamera {
    /// `fov` is the vertical field of view in degrees.
    pub fn look_at(eye: Point3f, target: Point3f, up: Vec3f, fov: Float, width: u32, height: u32) -> Self {
        let forward = (target - eye).normalize();
        let right = forward.cross(up).normalize();
        let up = right.cross(forward);
        Self {
            eye,
            forward,
            right,
            up,
            tan_half_fov: (fov.to_radians() / 2.0).tan(),
            width,
            height,
        }
    }
}

impl Camera for PinholeCamera {
    fn generate_ray(&self, p_film: Point2f) -> Ray {
        let aspect = self.width as Float / self.height as Float;
        let x = (2.0 * p_film.x / self.width as Float - 1.0) * self.tan_half_fov * aspect;
        let y = (1.0 - 2.0 * p_film.y / self.height as Float) * self.tan_half_fov;
        let dir = (self.forward + self.right * x + self.up * y).normalize();
        Ray::new(self.eye, dir)
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_centre_ray_looks_at_target() {
        let camera = PinholeCamera::look_at(point3f!(0, -5, 0), point3f!(0, 0, 0), vec3f!(0, 0, 1), 45.0, 64, 32);
        let ray = camera.generate_ray(Point2f::new(32.0, 16.0));
        assert_abs_diff_eq!(ray.dir, vec3f!(0, 1, 0), epsilon = 1.0e-6);

        // top of the image points up
        let top = camera.generate_ray(Point2f::new(32.0, 0.0));
        assert!(top.dir.z > 0.0);
    }
}
