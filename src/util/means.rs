/// Computes the harmonic mean of two values
///
/// Returns zero if any value is zero (or if both are zero).
///
/// ```text
///        2 a b
/// h = ——————————
///       a + b
/// ```
pub fn harmonic_mean(a: f64, b: f64) -> f64 {
    if a == 0.0 || b == 0.0 {
        return 0.0;
    }
    let den = a + b;
    if den == 0.0 {
        return 0.0;
    }
    2.0 * a * b / den
}

/// Computes the arithmetic mean of two values
pub fn arithmetic_mean(a: f64, b: f64) -> f64 {
    0.5 * (a + b)
}

/// Computes the geometric mean of two non-negative values
pub fn geometric_mean(a: f64, b: f64) -> f64 {
    f64::sqrt(a * b)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{arithmetic_mean, geometric_mean, harmonic_mean};
    use russell_lab::approx_eq;

    #[test]
    fn harmonic_mean_works() {
        assert_eq!(harmonic_mean(0.0, 1.0), 0.0);
        assert_eq!(harmonic_mean(1.0, 0.0), 0.0);
        assert_eq!(harmonic_mean(0.0, 0.0), 0.0);
        assert_eq!(harmonic_mean(2.0, 2.0), 2.0);
        approx_eq(harmonic_mean(1e-12, 5e-14), 2.0 * 1e-12 * 5e-14 / (1e-12 + 5e-14), 1e-28);
    }

    #[test]
    fn other_means_work() {
        assert_eq!(arithmetic_mean(1.0, 3.0), 2.0);
        assert_eq!(geometric_mean(2.0, 8.0), 4.0);
    }
}
