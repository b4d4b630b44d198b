//! Numeric helpers shared by the selection systems

/// Relative tolerance used by [`almost_equal`]
pub const EPSILON: f64 = 1e-8;

/// Floating point comparison using relative error.
///
/// Values at or next to zero fall back to an absolute comparison scaled by
/// the smallest positive subnormal, which makes zero only equal to (almost)
/// exactly zero.
pub fn almost_equal(a: f64, b: f64, epsilon: f64) -> bool {
    if a == b {
        return true;
    }
    let diff = (a - b).abs();
    let tiny = f64::from_bits(1); // smallest positive subnormal
    if a == 0.0 || b == 0.0 || diff < tiny {
        diff < epsilon * tiny
    } else {
        diff / (a.abs() + b.abs()) < epsilon
    }
}

/// Fermi function `1 / (1 + e^(-beta * (p1 - p2)))`.
///
/// `beta = +inf` is treated as a step function and `beta = 0` as a coin flip.
pub fn fermi(beta: f64, p1: f64, p2: f64) -> f64 {
    if beta.is_infinite() && beta > 0.0 {
        if p1 > p2 {
            1.0
        } else if p1 < p2 {
            0.0
        } else {
            0.5
        }
    } else if beta == 0.0 {
        0.5
    } else {
        1.0 / (1.0 + (-beta * (p1 - p2)).exp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_almost_equal() {
        assert!(almost_equal(1.0, 1.0, EPSILON));
        assert!(almost_equal(1_000_000.0, 1_000_000.000_000_1, EPSILON));
        assert!(!almost_equal(1.0, 1.001, EPSILON));
        assert!(!almost_equal(0.0, 1e-9, EPSILON));
        assert!(almost_equal(0.0, 0.0, EPSILON));
    }

    #[test]
    fn test_fermi_midpoint() {
        assert!((fermi(1.2, 3.0, 3.0) - 0.5).abs() < 1e-12);
        assert_eq!(fermi(0.0, 10.0, 1.0), 0.5);
    }

    #[test]
    fn test_fermi_infinite_beta() {
        assert_eq!(fermi(f64::INFINITY, 2.0, 1.0), 1.0);
        assert_eq!(fermi(f64::INFINITY, 1.0, 2.0), 0.0);
    }

    #[test]
    fn test_fermi_monotonic() {
        let low = fermi(1.2, 1.0, 2.0);
        let high = fermi(1.2, 2.0, 1.0);
        assert!(low < 0.5 && high > 0.5);
        assert!((low + high - 1.0).abs() < 1e-12);
    }
}
