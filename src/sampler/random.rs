use crate::Float;
use crate::sampler::{Sampler, Sample1};
use rand_xoshiro::Xoshiro256Plus;
use rand::{SeedableRng, Rng};

pub struct RandomSampler {
    rng: Xoshiro256Plus,
}

impl RandomSampler {
    pub fn new_with_seed(seed: u64) -> Self {
        Self {
            rng: Xoshiro256Plus::seed_from_u64(seed),
        }
    }
}

impl Sampler for RandomSampler {
    fn sample1(&mut self) -> Sample1 {
        let u: Float = self.rng.gen();
        Sample1 { u }
    }

    fn clone_with_seed(&self, seed: u64) -> Box<dyn Sampler> {
        Box::new(Self::new_with_seed(seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = RandomSampler::new_with_seed(7);
        let mut b = a.clone_with_seed(7);
        for _ in 0..32 {
            let (x, y) = (a.sample1().u, b.sample1().u);
            assert_eq!(x, y);
            assert!((0.0..1.0).contains(&x));
        }
    }
}
