//! Falloff kernels used to blend heights between samples.
//!
//! Both kernels map a distance `x` and a falloff radius `scale * size` to a
//! weight in [0, 1]: 1 at `x = 0`, 0 at and beyond the radius. Callers must
//! pass `size > 0`.

use crate::biome::Biome;

/// Linear ("sharp") falloff.
pub fn linear(x: f32, size: f32, scale: f32) -> f32 {
    let limit = scale * size;
    if x < limit {
        1.0 - x / limit
    } else {
        0.0
    }
}

/// Degree-6 smoothstep ("smooth") falloff with zero slope at both ends.
pub fn smooth6(x: f32, size: f32, scale: f32) -> f32 {
    let limit = scale * size;
    if x >= limit {
        return 0.0;
    }
    let l3 = limit * limit * limit;
    let l4 = l3 * limit;
    let l5 = l4 * limit;
    let a = -6.0 / l5;
    let b = 15.0 / l4;
    let c = -10.0 / l3;
    let x3 = x * x * x;
    1.0 + x3 * (c + x * (b + x * a))
}

/// Weight of endpoint `a` at distance `x` along an edge of length `x_max`
/// running from `a` to `b`.
///
/// - both sharp: linear over the whole edge
/// - neither sharp: smooth over the whole edge
/// - one sharp: smooth, shrunk to `scale_limit_influence` of the edge and
///   measured from the sharp side
pub fn compute_interpolation_coefficient(
    a: Biome,
    b: Biome,
    x: f32,
    x_max: f32,
    scale_limit_influence: f32,
) -> f32 {
    let x = x.clamp(0.0, x_max);
    match (a.is_sharp(), b.is_sharp()) {
        (true, true) => linear(x, x_max, 1.0),
        (false, false) => smooth6(x, x_max, 1.0),
        (true, false) => smooth6(x, x_max, scale_limit_influence),
        (false, true) => 1.0 - smooth6(x_max - x, x_max, scale_limit_influence),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_linear_endpoints() {
        assert!((linear(0.0, 10.0, 1.0) - 1.0).abs() < EPS);
        assert!((linear(5.0, 10.0, 1.0) - 0.5).abs() < EPS);
        assert_eq!(linear(10.0, 10.0, 1.0), 0.0);
        assert_eq!(linear(25.0, 10.0, 2.0), 0.0);
        assert!((linear(10.0, 10.0, 2.0) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_smooth6_endpoints_and_midpoint() {
        assert!((smooth6(0.0, 8.0, 1.0) - 1.0).abs() < EPS);
        assert!((smooth6(4.0, 8.0, 1.0) - 0.5).abs() < EPS);
        assert!(smooth6(8.0, 8.0, 1.0).abs() < EPS);
        assert_eq!(smooth6(9.0, 8.0, 1.0), 0.0);
    }

    #[test]
    fn test_smooth6_is_flat_at_ends() {
        let h = 1e-3;
        let near_start = (smooth6(h, 1.0, 1.0) - 1.0) / h;
        let near_end = smooth6(1.0 - h, 1.0, 1.0) / h;
        assert!(near_start.abs() < 1e-3);
        assert!(near_end.abs() < 1e-3);
    }

    #[test]
    fn test_smooth6_is_monotonic() {
        let mut prev = smooth6(0.0, 1.0, 1.0);
        for i in 1..=100 {
            let v = smooth6(i as f32 / 100.0, 1.0, 1.0);
            assert!(v <= prev + EPS);
            prev = v;
        }
    }

    #[test]
    fn test_coefficient_both_sharp_is_linear() {
        for i in 0..=10 {
            let x = i as f32;
            let c = compute_interpolation_coefficient(Biome::Mountain, Biome::Sea, x, 10.0, 0.5);
            assert_eq!(c, linear(x, 10.0, 1.0));
        }
    }

    #[test]
    fn test_coefficient_one_sharp_is_scaled_smooth() {
        for i in 0..=10 {
            let x = i as f32;
            let c = compute_interpolation_coefficient(Biome::Peak, Biome::Plains, x, 10.0, 0.4);
            assert_eq!(c, smooth6(x, 10.0, 0.4));
        }
        // Past the limited influence radius the sharp endpoint has no weight.
        let c = compute_interpolation_coefficient(Biome::Peak, Biome::Plains, 5.0, 10.0, 0.4);
        assert_eq!(c, 0.0);
    }

    #[test]
    fn test_coefficient_endpoints_in_every_branch() {
        let pairs = [
            (Biome::Sea, Biome::Mountain),
            (Biome::Plains, Biome::Beach),
            (Biome::Mountain, Biome::Plains),
            (Biome::Lake, Biome::Peak),
        ];
        for (a, b) in pairs {
            let start = compute_interpolation_coefficient(a, b, 0.0, 12.0, 0.3);
            let end = compute_interpolation_coefficient(a, b, 12.0, 12.0, 0.3);
            assert!((start - 1.0).abs() < EPS, "{a}->{b} start {start}");
            assert!(end.abs() < EPS, "{a}->{b} end {end}");
        }
    }

    #[test]
    fn test_coefficient_is_symmetric_under_reversal() {
        let forward = compute_interpolation_coefficient(Biome::Plains, Biome::Mountain, 3.0, 10.0, 0.5);
        let backward = compute_interpolation_coefficient(Biome::Mountain, Biome::Plains, 7.0, 10.0, 0.5);
        assert!((forward - (1.0 - backward)).abs() < EPS);
    }
}
