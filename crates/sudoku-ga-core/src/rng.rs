//! Randomness helpers shared by the genetic operators.

use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};

/// Draw a fresh seed from the OS so an unseeded run can still be replayed
pub fn entropy_seed() -> u64 {
    let mut seed_bytes = [0u8; 8];
    if getrandom::getrandom(&mut seed_bytes).is_err() {
        // Fallback: a process-wide counter keeps seeds distinct between runs
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        let counter = COUNTER.fetch_add(1, Ordering::Relaxed);
        seed_bytes = counter.to_le_bytes();
    }
    u64::from_le_bytes(seed_bytes)
}

/// Absolute value of a normal sample with mean 0 and standard deviation `sigma`.
///
/// Box-Muller over two uniforms from the caller's generator.
pub fn half_normal<R: Rng + ?Sized>(rng: &mut R, sigma: f64) -> f64 {
    // 1 - [0, 1) keeps u1 away from zero
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen::<f64>();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    (z * sigma).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_half_normal_is_non_negative() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let x = half_normal(&mut rng, 1.0);
            assert!(x >= 0.0 && x.is_finite());
        }
    }

    #[test]
    fn test_half_normal_scales_with_sigma() {
        // E|Z| = sigma * sqrt(2 / pi)
        let mut rng = StdRng::seed_from_u64(7);
        let n = 20_000;
        let mean: f64 = (0..n).map(|_| half_normal(&mut rng, 0.5)).sum::<f64>() / n as f64;
        let expected = 0.5 * (2.0 / std::f64::consts::PI).sqrt();
        assert!((mean - expected).abs() < 0.02, "mean = {}", mean);
    }

    #[test]
    fn test_half_normal_zero_sigma() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(half_normal(&mut rng, 0.0), 0.0);
    }
}
