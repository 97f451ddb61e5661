use crate::{Float, Point2f};

pub mod random;

pub use random::RandomSampler;

#[derive(Clone, Copy, Debug)]
pub struct Sample1 {
    pub u: Float,
}

#[derive(Clone, Copy, Debug)]
pub struct Sample2 {
    pub u: Float,
    pub v: Float,
}

impl Sample2 {
    pub fn point(&self) -> Point2f {
        Point2f::new(self.u, self.v)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Sample3 {
    pub u: Float,
    pub v: Float,
    pub w: Float,
}

impl Sample3 {
    /// First coordinate picks a component, the remaining two drive it.
    pub fn split(&self) -> (Float, Point2f) {
        (self.u, Point2f::new(self.v, self.w))
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Sample5 {
    pub u: Float,
    pub v: Float,
    pub w: Float,
    pub r: Float,
    pub s: Float,
}

impl Sample5 {
    pub fn first(&self) -> Point2f {
        Point2f::new(self.u, self.v)
    }

    pub fn second(&self) -> Point2f {
        Point2f::new(self.w, self.r)
    }
}

/// Source of uniform `[0, 1)` tuples. Each parallel unit of work gets its own
/// instance through `clone_with_seed`.
pub trait Sampler: Sync + Send {
    fn sample1(&mut self) -> Sample1;

    fn sample2(&mut self) -> Sample2 {
        let Sample1 { u } = self.sample1();
        let Sample1 { u: v } = self.sample1();
        Sample2 { u, v }
    }

    fn sample3(&mut self) -> Sample3 {
        let Sample2 { u, v } = self.sample2();
        let Sample1 { u: w } = self.sample1();
        Sample3 { u, v, w }
    }

    fn sample5(&mut self) -> Sample5 {
        let Sample3 { u, v, w } = self.sample3();
        let Sample2 { u: r, v: s } = self.sample2();
        Sample5 { u, v, w, r, s }
    }

    fn clone_with_seed(&self, seed: u64) -> Box<dyn Sampler>;
}

/// Mix several integers into one well-spread seed (splitmix64 finaliser).
pub fn hash_seed(parts: &[u64]) -> u64 {
    let mut h: u64 = 0x9e37_79b9_7f4a_7c15;
    for &p in parts {
        h ^= p.wrapping_add(0x9e37_79b9_7f4a_7c15).wrapping_add(h << 6).wrapping_add(h >> 2);
        h = (h ^ (h >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        h = (h ^ (h >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        h ^= h >> 31;
    }
    h
}
