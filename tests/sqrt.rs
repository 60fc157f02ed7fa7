//! Square root tests: correctly rounded on every tier.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use simdvec::simd::sqrt;
use simdvec::{SimdDouble, SimdSqrt, VectorDouble, LANE_COUNT};

#[test]
fn test_sqrt_perfect_squares() {
    for k in 0..64i32 {
        let root = f64::from(k);
        let r = sqrt(VectorDouble::splat(root * root));

        for i in 0..LANE_COUNT {
            assert_eq!(r[i], root, "sqrt({}) lane {i}", root * root);
        }
    }
}

#[test]
fn test_sqrt_edge_cases() {
    let r = VectorDouble::splat(-0.0).sqrt();
    assert_eq!(r[0].to_bits(), (-0.0f64).to_bits());

    assert_eq!(VectorDouble::splat(f64::INFINITY).sqrt()[0], f64::INFINITY);
    assert!(VectorDouble::splat(-1.0).sqrt()[0].is_nan());
    assert!(VectorDouble::splat(f64::NAN).sqrt()[0].is_nan());
}

#[test]
fn test_sqrt_slice_random_inputs() {
    let mut rng = StdRng::seed_from_u64(12345);
    let test_size = 1000;

    let inputs: Vec<f64> = (0..test_size)
        .map(|_| rng.random_range(0.0..=1_000_000.0))
        .collect();

    let scalar_results = inputs.as_slice().scalar_sqrt();
    let simd_results = inputs.as_slice().simd_sqrt();

    for (i, (&scalar_val, &simd_val)) in scalar_results.iter().zip(&simd_results).enumerate() {
        assert_eq!(
            scalar_val.to_bits(),
            simd_val.to_bits(),
            "index {i}: input={}, scalar={scalar_val}, simd={simd_val}",
            inputs[i]
        );
    }
}
