/// Two point objects closer than this (in coordinate units, nominally
/// meters) occupy the same spot.
pub const TOL: f64 = 1e-3;

#[macro_export]
macro_rules! cmplx {
    () => {
        num_complex::Complex64::new(0.0, 0.0)
    };
    ($arg1:expr) => {
        num_complex::Complex64::new($arg1, 0.0)
    };
    ($arg1:expr, $arg2:expr) => {
        num_complex::Complex64::new($arg1, $arg2)
    };
}

/// Euclidean distance between `(x1, y1)` and `(x2, y2)`.
pub fn distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    f64::hypot(x1 - x2, y1 - y2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    #[test]
    fn test_distance() {
        assert_eq!(distance(0.0, 0.0, 3.0, 4.0), 5.0);
        assert!(distance(0.0, 0.0, 0.0, 0.0005) < TOL);
    }

    #[test]
    fn test_cmplx() {
        assert_eq!(cmplx!(1.0, 2.0), Complex64::new(1.0, 2.0));
        assert_eq!(cmplx!(3.0), Complex64::new(3.0, 0.0));
        assert_eq!(cmplx!(), Complex64::default());
    }
}
