use crate::Float;

/// Three-channel linear RGB radiometric quantity.
#[derive(Clone, Copy, Default, PartialEq)]
pub struct Spectrum([Float; 3]);

impl Spectrum {
    pub const fn new(r: Float, g: Float, b: Float) -> Self {
        Self([r, g, b])
    }

    #[inline]
    pub fn new_with<F: FnMut(usize) -> Float>(mut init: F) -> Self {
        Self([init(0), init(1), init(2)])
    }

    #[inline]
    pub fn zip<F: Fn(Float, Float) -> Float>(&self, other: &Self, f: F) -> Self {
        Self::new_with(|i| f(self[i], other[i]))
    }

    pub const fn uniform(val: Float) -> Self {
        Self([val; 3])
    }

    pub const fn zero() -> Self {
        Self::uniform(0.0)
    }

    pub const fn one() -> Self {
        Self::uniform(1.0)
    }

    pub fn map<F: Fn(Float) -> Float>(&self, f: F) -> Self {
        Self::new_with(|i| f(self[i]))
    }

    pub fn is_black(&self) -> bool {
        self.0.iter().all(|&x| x == 0.0)
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|&x| x.is_finite())
    }

    /// Rec. 709 relative luminance
    pub fn luminance(&self) -> Float {
        0.2126 * self[0] + 0.7152 * self[1] + 0.0722 * self[2]
    }

    pub fn max_component(&self) -> Float {
        self[0].max(self[1]).max(self[2])
    }

    pub fn lerp(t: Float, s1: Self, s2: Self) -> Self {
        (1.0 - t) * s1 + t * s2
    }

}

pub fn spectrum_into_rgb8(s: Spectrum) -> [u8; 3] {
    [
        Float::round(s[0].clamp(0.0, 1.0) * 255.0) as u8,
        Float::round(s[1].clamp(0.0, 1.0) * 255.0) as u8,
        Float::round(s[2].clamp(0.0, 1.0) * 255.0) as u8,
    ]
}

impl std::ops::Index<usize> for Spectrum {
    type Output = Float;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl std::ops::IndexMut<usize> for Spectrum {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl std::fmt::Debug for Spectrum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl From<[Float; 3]> for Spectrum {
    fn from(a: [Float; 3]) -> Self {
        Self(a)
    }
}

impl From<Float> for Spectrum {
    fn from(x: Float) -> Self {
        Self::uniform(x)
    }
}

impl From<Spectrum> for [Float; 3] {
    fn from(s: Spectrum) -> Self {
        s.0
    }
}

impl std::iter::Sum for Spectrum {
    fn sum<I: Iterator<Item=Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), std::ops::Add::add)
    }
}

impl std::ops::Neg for Spectrum {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.map(|x| -x)
    }
}

macro_rules! impl_op {
    ($op:ident, $name:ident, $sym:tt) => {
        impl std::ops::$op for Spectrum {
            type Output = Self;

            fn $name(self, rhs: Self) -> Self::Output {
                Self::zip(&self, &rhs, |x, y| x $sym y)
            }
        }

        impl std::ops::$op<Float> for Spectrum {
            type Output = Self;

            fn $name(self, rhs: Float) -> Self::Output {
                self.map(|x| x $sym rhs)
            }
        }

        impl std::ops::$op<Spectrum> for Float {
            type Output = Spectrum;

            fn $name(self, rhs: Spectrum) -> Self::Output {
                rhs.map(|x| self $sym x)
            }
        }
    }
}

macro_rules! impl_assign_op {
    ($op:ident, $name:ident, $sym:tt) => {
        impl std::ops::$op for Spectrum {
            fn $name(&mut self, rhs: Self) {
                for i in 0..3 {
                    self[i] $sym rhs[i];
                }
            }
        }

        impl std::ops::$op<Float> for Spectrum {
            fn $name(&mut self, rhs: Float) {
                for i in 0..3 {
                    self[i] $sym rhs;
                }
            }
        }
    }
}

impl_op!(Add, add, +);
impl_op!(Sub, sub, -);
impl_op!(Mul, mul, *);
impl_op!(Div, div, /);
impl_assign_op!(AddAssign, add_assign, +=);
impl_assign_op!(SubAssign, sub_assign, -=);
impl_assign_op!(MulAssign, mul_assign, *=);
impl_assign_op!(DivAssign, div_assign, /=);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iter_sum() {
        let spectra = vec![Spectrum::uniform(1.0), Spectrum::from([0.0, 1.0, 0.5])];
        let sum: Spectrum = spectra.into_iter().sum();
        assert_eq!(sum, Spectrum::from([1.0, 2.0, 1.5]));
    }

    #[test]
    fn test_finite() {
        assert!(Spectrum::uniform(3.0).is_finite());
        assert!(!Spectrum::new(1.0, Float::NAN, 0.0).is_finite());
        assert!(!(Spectrum::one() / 0.0).is_finite());
    }

    #[test]
    fn test_luminance_of_white() {
        approx::assert_abs_diff_eq!(Spectrum::one().luminance(), 1.0, epsilon = 1.0e-6);
    }
}
