use parking_lot::Mutex;
use crate::Vec3f;
use crate::spectrum::Spectrum;

/// One snapshot of a progressive render. Buffers are row-major, `width * height` long.
#[derive(Clone, Debug)]
pub struct RenderTarget {
    pub width: u32,
    pub height: u32,
    pub image: Vec<Spectrum>,
    /// Mean first-hit albedo
    pub albedo: Vec<Spectrum>,
    /// Mean first-hit shading normal, unit length or zero
    pub normal: Vec<Vec3f>,
    pub iterations: u64,
    pub photons: u64,
}

impl RenderTarget {
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            image: vec![Spectrum::zero(); len],
            albedo: vec![Spectrum::zero(); len],
            normal: vec![vec3f!(0, 0, 0); len],
            iterations: 0,
            photons: 0,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Spectrum {
        self.image[(y * self.width + x) as usize]
    }
}

/// Shared destination for render snapshots. The renderer writes into it from its
/// worker thread while other threads take copies.
pub struct Film {
    target: Mutex<RenderTarget>,
}

impl Film {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            target: Mutex::new(RenderTarget::new(width, height)),
        }
    }

    pub fn resolution(&self) -> (u32, u32) {
        let target = self.target.lock();
        (target.width, target.height)
    }

    pub fn snapshot(&self) -> RenderTarget {
        self.target.lock().clone()
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut RenderTarget) -> R) -> R {
        f(&mut self.target.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_visible_in_snapshot() {
        let film = Film::new(3, 2);
        assert_eq!(film.resolution(), (3, 2));
        film.update(|t| {
            t.image[5] = Spectrum::uniform(2.0);
            t.iterations = 4;
        });
        let snap = film.snapshot();
        assert_eq!(snap.pixel(2, 1), Spectrum::uniform(2.0));
        assert_eq!(snap.iterations, 4);
        assert_eq!(snap.albedo.len(), 6);
    }
}
