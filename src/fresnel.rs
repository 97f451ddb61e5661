use crate::Float;

/// `(1 - cos)^5`, the Schlick weight shared by the Fresnel and retro-reflection terms.
pub fn schlick_weight(cos: Float) -> Float {
    let m = (1.0 - cos).clamp(0.0, 1.0);
    let m2 = m * m;
    m2 * m2 * m
}

/// Schlick's approximation of dielectric reflectance for a boundary with relative index `eta`.
pub fn schlick(cos: Float, eta: Float) -> Float {
    let r0 = sq!((1.0 - eta) / (1.0 + eta));
    r0 + (1.0 - r0) * schlick_weight(cos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_schlick_limits() {
        assert_abs_diff_eq!(schlick(1.0, 1.5), 0.04, epsilon = 1.0e-6);
        assert_abs_diff_eq!(schlick(0.0, 1.5), 1.0, epsilon = 1.0e-6);
        assert_abs_diff_eq!(schlick(0.7, 1.0), 0.0 + schlick_weight(0.7), epsilon = 1.0e-6);
    }
}
