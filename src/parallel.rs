use std::sync::atomic::{AtomicU32, Ordering};
use crate::Float;

/// An `f32` that can be accumulated into from many threads.
///
/// Stored as its bit pattern in an `AtomicU32`; `fetch_add` is a CAS loop.
#[derive(Debug, Default)]
pub struct AtomicFloat {
    bits: AtomicU32,
}

impl AtomicFloat {
    pub fn new(v: Float) -> Self {
        Self { bits: AtomicU32::new(v.to_bits()) }
    }

    pub fn load(&self) -> Float {
        Float::from_bits(self.bits.load(Ordering::Relaxed))
    }

    pub fn store(&self, v: Float) {
        self.bits.store(v.to_bits(), Ordering::Relaxed)
    }

    /// Atomically add `v`, returning the previous value.
    pub fn fetch_add(&self, v: Float) -> Float {
        let mut old = self.bits.load(Ordering::Relaxed);
        loop {
            let new = (Float::from_bits(old) + v).to_bits();
            match self.bits.compare_exchange_weak(old, new, Ordering::Relaxed, Ordering::Relaxed) {
                Ok(_) => return Float::from_bits(old),
                Err(current) => old = current,
            }
        }
    }
}

impl Clone for AtomicFloat {
    fn clone(&self) -> Self {
        Self::new(self.load())
    }
}
