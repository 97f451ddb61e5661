use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use crate::{Float, Point3f, Vec3f, Vec3i};
use crate::geometry::bounds::Bounds3f;
use crate::material::TransportMode;
use crate::spectrum::Spectrum;
use crate::integrator::sppm::pixel::{Pixel, CameraRecord};
use cgmath::MetricSpace;

/// Null link in a bucket list.
pub const NIL: u32 = u32::MAX;

/// Maps world positions to grid cells and grid cells to hash buckets.
/// Cells are clamped to the world bound so that stray points share the border cells.
#[derive(Clone, Debug)]
pub struct HashedGrid {
    world_min: Point3f,
    sidelen: Float,
    resolution: Vec3i,
    entry_count: usize,
}

impl HashedGrid {
    pub fn new(world_bound: &Bounds3f, sidelen: Float, entry_count: usize) -> Self {
        let (world_min, diag) = if world_bound.is_empty() {
            (point3f!(0, 0, 0), vec3f!(0, 0, 0))
        } else {
            (world_bound.min, world_bound.diagonal())
        };
        let res = |d: Float| ((d / sidelen).ceil() as i32).max(1);
        Self {
            world_min,
            sidelen,
            resolution: Vec3i::new(res(diag.x), res(diag.y), res(diag.z)),
            entry_count: entry_count.max(1),
        }
    }

    pub fn pos_to_grid(&self, p: Point3f) -> Vec3i {
        let cell = |v: Float, min: Float, res: i32| {
            (((v - min) / self.sidelen).floor() as i32).clamp(0, res - 1)
        };
        Vec3i::new(
            cell(p.x, self.world_min.x, self.resolution.x),
            cell(p.y, self.world_min.y, self.resolution.y),
            cell(p.z, self.world_min.z, self.resolution.z),
        )
    }

    pub fn grid_to_entry(&self, g: Vec3i) -> usize {
        let h = (g.x as u64).wrapping_mul(73_856_093)
            ^ (g.y as u64).wrapping_mul(19_349_663)
            ^ (g.z as u64).wrapping_mul(83_492_791);
        (h % self.entry_count as u64) as usize
    }

    pub fn pos_to_entry(&self, p: Point3f) -> usize {
        self.grid_to_entry(self.pos_to_grid(p))
    }

    pub fn entry_count(&self) -> usize {
        self.entry_count
    }
}

#[derive(Debug)]
struct VpNode {
    pixel: AtomicU32,
    next: AtomicU32,
}

/// Bump allocator of list nodes shared by all inserting threads.
#[derive(Debug, Default)]
struct VpNodeArena {
    nodes: Vec<VpNode>,
    len: AtomicUsize,
}

impl VpNodeArena {
    fn clear(&mut self) {
        *self.len.get_mut() = 0;
    }

    fn reserve(&mut self, count: usize) {
        if self.nodes.len() < count {
            self.nodes.resize_with(count, || VpNode {
                pixel: AtomicU32::new(NIL),
                next: AtomicU32::new(NIL),
            });
        }
    }

    fn alloc(&self, pixel: u32) -> Option<u32> {
        let idx = self.len.fetch_add(1, Ordering::Relaxed);
        let node = self.nodes.get(idx)?;
        node.pixel.store(pixel, Ordering::Relaxed);
        Some(idx as u32)
    }

    fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed).min(self.nodes.len())
    }
}

/// Concurrent spatial hash from positions to the pixels whose gather sphere may cover them.
///
/// Visible points are inserted in parallel with lock-free list prepends, then photons
/// are deposited in parallel. The two phases never overlap.
#[derive(Debug)]
pub struct VisiblePointSearcher {
    grid: HashedGrid,
    entries: Vec<AtomicU32>,
    nodes: VpNodeArena,
}

impl VisiblePointSearcher {
    pub fn new(world_bound: &Bounds3f, grid_sidelen: Float, entry_count: usize) -> Self {
        let grid = HashedGrid::new(world_bound, grid_sidelen, entry_count);
        let entries = (0..grid.entry_count()).map(|_| AtomicU32::new(NIL)).collect();
        Self {
            grid,
            entries,
            nodes: VpNodeArena::default(),
        }
    }

    pub fn clear(&mut self) {
        for entry in &mut self.entries {
            *entry.get_mut() = NIL;
        }
        self.nodes.clear();
    }

    /// Number of cells `pos ± radius` overlaps, i.e. nodes `add_vp` will allocate.
    pub fn cell_count(&self, pos: Point3f, radius: Float) -> usize {
        let (min, max) = self.cell_range(pos, radius);
        ((max.x - min.x + 1) * (max.y - min.y + 1) * (max.z - min.z + 1)) as usize
    }

    /// Make room for `count` nodes before a round of concurrent insertion.
    pub fn reserve(&mut self, count: usize) {
        self.nodes.reserve(count);
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn cell_range(&self, pos: Point3f, radius: Float) -> (Vec3i, Vec3i) {
        let r = vec3f!(radius, radius, radius);
        (self.grid.pos_to_grid(pos - r), self.grid.pos_to_grid(pos + r))
    }

    /// Register pixel `pixel` in every cell overlapped by its gather sphere.
    /// Returns `false` if the node arena ran out of room.
    pub fn add_vp(&self, pixel: u32, pos: Point3f, radius: Float) -> bool {
        let (min, max) = self.cell_range(pos, radius);
        for z in min.z..=max.z {
            for y in min.y..=max.y {
                for x in min.x..=max.x {
                    let entry = &self.entries[self.grid.grid_to_entry(Vec3i::new(x, y, z))];
                    let idx = match self.nodes.alloc(pixel) {
                        Some(idx) => idx,
                        None => return false,
                    };
                    let node = &self.nodes.nodes[idx as usize];

                    let mut head = entry.load(Ordering::Acquire);
                    loop {
                        node.next.store(head, Ordering::Relaxed);
                        match entry.compare_exchange_weak(head, idx, Ordering::AcqRel, Ordering::Acquire) {
                            Ok(_) => break,
                            Err(current) => head = current,
                        }
                    }
                }
            }
        }
        true
    }

    /// Deposit a photon of flux `flux` arriving from `wr` at `pos` into every
    /// covering visible point. Returns the number of pixels that received it.
    pub fn add_photon(
        &self,
        pos: Point3f,
        flux: Spectrum,
        wr: Vec3f,
        pixels: &[Pixel],
        records: &[CameraRecord],
    ) -> usize {
        let mut received = 0;
        let mut idx = self.entries[self.grid.pos_to_entry(pos)].load(Ordering::Acquire);
        while idx != NIL {
            let node = &self.nodes.nodes[idx as usize];
            idx = node.next.load(Ordering::Relaxed);

            let p = node.pixel.load(Ordering::Relaxed) as usize;
            let vp = match &records[p].vp {
                Some(vp) => vp,
                None => continue,
            };
            let pixel = &pixels[p];
            if vp.pos.distance2(pos) > sq!(pixel.radius) {
                continue;
            }

            let delta = flux * vp.bsdf.eval(wr, vp.wr, TransportMode::Radiance);
            if !delta.is_finite() {
                continue;
            }
            pixel.add_flux(delta);
            received += 1;
        }
        received
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Frame;
    use crate::consts::PI;
    use crate::reflection::{Bsdf, Lobe, LambertianReflection};
    use crate::sampler::{RandomSampler, Sampler};
    use crate::integrator::sppm::pixel::VisiblePoint;
    use rayon::prelude::*;
    use pretty_assertions::assert_eq;

    // albedo pi makes the lambertian evaluate to exactly one
    fn unit_bsdf() -> Bsdf {
        let frame = Frame::from_z(vec3f!(0, 0, 1));
        Bsdf::new(frame, frame, Lobe::Diffuse(LambertianReflection::new(Spectrum::uniform(PI))))
    }

    fn build(pixels: &[Pixel], records: &[CameraRecord]) -> VisiblePointSearcher {
        let bound = Bounds3f::with_bounds(point3f!(0, 0, 0), point3f!(10, 10, 10));
        let mut searcher = VisiblePointSearcher::new(&bound, 1.0, 61);
        searcher.clear();
        let count = records.iter().zip(pixels)
            .filter_map(|(r, p)| r.vp.as_ref().map(|vp| searcher.cell_count(vp.pos, p.radius)))
            .sum();
        searcher.reserve(count);
        records.par_iter().zip(pixels.par_iter()).enumerate().for_each(|(i, (r, p))| {
            if let Some(vp) = &r.vp {
                assert!(searcher.add_vp(i as u32, vp.pos, p.radius));
            }
        });
        assert_eq!(searcher.node_count(), count);
        searcher
    }

    #[test]
    fn test_photon_hits_and_misses() {
        let bsdf = unit_bsdf();
        let pixels = vec![Pixel::new(0.5), Pixel::new(0.5)];
        let records = vec![
            CameraRecord {
                vp: Some(VisiblePoint { pos: point3f!(5, 5, 5), wr: vec3f!(0, 0, 1), coef: Spectrum::one(), bsdf: &bsdf }),
                ..Default::default()
            },
            CameraRecord::default(),
        ];
        let searcher = build(&pixels, &records);

        let wr = vec3f!(0, 0, 1);
        assert_eq!(searcher.add_photon(point3f!(5, 5, 5), Spectrum::uniform(2.0), wr, &pixels, &records), 1);
        assert_eq!(searcher.add_photon(point3f!(5.3, 5, 5.3), Spectrum::uniform(1.0), wr, &pixels, &records), 1);
        // same cells, outside the gather radius
        assert_eq!(searcher.add_photon(point3f!(5.6, 5, 5), Spectrum::uniform(1.0), wr, &pixels, &records), 0);
        assert_eq!(searcher.add_photon(point3f!(5, 5.45, 5.45), Spectrum::uniform(1.0), wr, &pixels, &records), 0);

        assert_eq!(pixels[0].photon_count(), 2);
        assert_eq!(pixels[0].flux(), Spectrum::uniform(3.0));
        assert_eq!(pixels[1].photon_count(), 0);
    }

    #[test]
    fn test_clear_empties_buckets() {
        let bsdf = unit_bsdf();
        let pixels = vec![Pixel::new(0.5)];
        let records = vec![CameraRecord {
            vp: Some(VisiblePoint { pos: point3f!(1, 1, 1), wr: vec3f!(0, 0, 1), coef: Spectrum::one(), bsdf: &bsdf }),
            ..Default::default()
        }];
        let mut searcher = build(&pixels, &records);
        searcher.clear();
        assert_eq!(searcher.node_count(), 0);
        assert_eq!(searcher.add_photon(point3f!(1, 1, 1), Spectrum::one(), vec3f!(0, 0, 1), &pixels, &records), 0);
    }

    fn deposit_with_threads(threads: usize) -> Vec<(u32, Spectrum)> {
        let bsdf = unit_bsdf();
        let mut sampler = RandomSampler::new_with_seed(42);
        fn point(s: &mut RandomSampler) -> Point3f {
            let a = s.sample3();
            point3f!(a.u * 10.0, a.v * 10.0, a.w * 10.0)
        }

        let pixels: Vec<Pixel> = (0..300).map(|_| Pixel::new(0.8)).collect();
        let records: Vec<CameraRecord> = (0..300).map(|_| CameraRecord {
            vp: Some(VisiblePoint { pos: point(&mut sampler), wr: vec3f!(0, 0, 1), coef: Spectrum::one(), bsdf: &bsdf }),
            ..Default::default()
        }).collect();
        let photons: Vec<(Point3f, Spectrum)> = (0..20_000).map(|_| {
            let p = point(&mut sampler);
            let k = (sampler.sample1().u * 4.0) as u32 + 1;
            (p, Spectrum::new(k as Float, 2.0 * k as Float, 1.0))
        }).collect();

        let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build().unwrap();
        pool.install(|| {
            let searcher = build(&pixels, &records);
            photons.par_iter().for_each(|(p, flux)| {
                searcher.add_photon(*p, *flux, vec3f!(0, 0, 1), &pixels, &records);
            });
        });

        pixels.iter().map(|p| (p.photon_count(), p.flux())).collect()
    }

    #[test]
    fn test_thread_count_does_not_change_result() {
        let single = deposit_with_threads(1);
        let many = deposit_with_threads(8);
        assert!(single.iter().any(|(m, _)| *m > 0));
        assert_eq!(single, many);
    }

    #[test]
    fn test_hash_is_deterministic() {
        let bound = Bounds3f::with_bounds(point3f!(-1, -1, -1), point3f!(1, 1, 1));
        let grid = HashedGrid::new(&bound, 0.25, 97);
        let p = point3f!(0.3, -0.2, 0.9);
        assert_eq!(grid.pos_to_entry(p), grid.pos_to_entry(p));
        assert_eq!(grid.pos_to_grid(point3f!(-5, 0, 5)), Vec3i::new(0, 4, 7));
        assert!(grid.pos_to_entry(p) < 97);
    }
}
