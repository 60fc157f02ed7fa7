//! Comparison masks, gt_mask table, bitwise and, blend.

use simdvec::simd::blend;
use simdvec::{SimdDouble, VectorDouble, LANE_COUNT};

const TRUE_BITS: u64 = u64::MAX;

fn vd(values: &[f64]) -> VectorDouble {
    assert!(values.len() >= LANE_COUNT);
    unsafe { VectorDouble::load_unaligned(values.as_ptr()) }
}

fn mask_bits(v: VectorDouble) -> Vec<u64> {
    (0..LANE_COUNT).map(|i| v[i].to_bits()).collect()
}

#[test]
fn test_gt_elements_is_canonical_mask() {
    let pairs = [
        (2.0, 1.0, true),
        (1.0, 2.0, false),
        (1.0, 1.0, false),
        (0.0, -0.0, false),
        (f64::INFINITY, f64::MAX, true),
        (f64::NAN, 1.0, false),
        (1.0, f64::NAN, false),
        (f64::NAN, f64::NAN, false),
    ];

    for (a, b, expected) in pairs {
        let m = VectorDouble::splat(a).gt_elements(VectorDouble::splat(b));
        let want = if expected { TRUE_BITS } else { 0 };
        assert!(mask_bits(m).iter().all(|&bits| bits == want), "{a} > {b}");
    }
}

#[test]
fn test_gt_mask_boundaries() {
    let w = LANE_COUNT as i32;

    assert!(mask_bits(VectorDouble::gt_mask(0)).iter().all(|&b| b == TRUE_BITS));
    assert!(mask_bits(VectorDouble::gt_mask(-7)).iter().all(|&b| b == TRUE_BITS));
    assert!(mask_bits(VectorDouble::gt_mask(w)).iter().all(|&b| b == 0));
    assert!(mask_bits(VectorDouble::gt_mask(w + 9)).iter().all(|&b| b == 0));

    for k in 1..w {
        let bits = mask_bits(VectorDouble::gt_mask(k));
        let true_lanes = bits.iter().filter(|&&b| b == TRUE_BITS).count();
        assert_eq!(true_lanes, (w - k) as usize, "gt_mask({k})");

        for (i, &b) in bits.iter().enumerate() {
            let want = if i as i32 >= k { TRUE_BITS } else { 0 };
            assert_eq!(b, want, "gt_mask({k}) lane {i}");
        }
    }
}

#[test]
fn test_blend_with_gt_mask_two() {
    let x1 = vd(&[1.0, 2.0, 3.0, 4.0]);
    let x2 = vd(&[10.0, 20.0, 30.0, 40.0]);
    let r = blend(x1, x2, VectorDouble::gt_mask(2));

    let expected = [1.0, 2.0, 30.0, 40.0];
    for i in 0..LANE_COUNT {
        assert_eq!(r[i], expected[i], "lane {i}");
    }
}

#[test]
fn test_blend_all_true_and_all_false() {
    let x1 = VectorDouble::splat(-1.0);
    let x2 = VectorDouble::splat(1.0);

    let take_x2 = blend(x1, x2, VectorDouble::gt_mask(0));
    let take_x1 = blend(x1, x2, VectorDouble::gt_mask(LANE_COUNT as i32));

    for i in 0..LANE_COUNT {
        assert_eq!(take_x2[i], 1.0);
        assert_eq!(take_x1[i], -1.0);
    }
}

#[test]
fn test_and_combines_masks() {
    let a = vd(&[5.0, 0.0, 5.0, 0.0]);
    let cmp = a.gt_elements(VectorDouble::splat(1.0));
    let combined = cmp & VectorDouble::gt_mask(1);

    let cmp_bits = mask_bits(cmp);
    let range_bits = mask_bits(VectorDouble::gt_mask(1));
    for (i, bits) in mask_bits(combined).into_iter().enumerate() {
        assert_eq!(bits, cmp_bits[i] & range_bits[i], "lane {i}");
        assert!(bits == 0 || bits == TRUE_BITS);
    }
}

#[test]
fn test_and_mask_zeroes_unselected_lanes() {
    let values = vd(&[1.5, -2.5, 3.5, -4.5]);
    let kept = values & VectorDouble::gt_mask(0);
    let dropped = values & VectorDouble::gt_mask(LANE_COUNT as i32);

    for i in 0..LANE_COUNT {
        assert_eq!(kept[i].to_bits(), values[i].to_bits());
        assert_eq!(dropped[i].to_bits(), 0);
    }
}
