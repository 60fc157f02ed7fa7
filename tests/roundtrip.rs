//! store(load(buf)) reproduces buf, aligned and unaligned.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use simdvec::simd::utils::AlignedBuffer;
use simdvec::{SimdDouble, VectorDouble, LANE_COUNT};

#[test]
fn test_aligned_roundtrip_random_bits() {
    let mut rng = StdRng::seed_from_u64(9);
    let len = LANE_COUNT * 64;

    let data: Vec<f64> = (0..len).map(|_| f64::from_bits(rng.random::<u64>())).collect();
    let src = AlignedBuffer::from_slice(&data).unwrap();
    let mut dst = AlignedBuffer::zeroed(len).unwrap();

    for offset in (0..len).step_by(LANE_COUNT) {
        unsafe {
            let v = VectorDouble::load_aligned(src.as_ptr().add(offset));
            v.store_aligned(dst.as_mut_ptr().add(offset));
        }
    }

    let same = src.iter().zip(dst.iter()).all(|(a, b)| a.to_bits() == b.to_bits());
    assert!(same, "aligned roundtrip changed bits");
}

#[test]
fn test_unaligned_roundtrip_every_offset() {
    let data: Vec<f64> = (0..LANE_COUNT + 3).map(|i| i as f64 * -1.25).collect();

    for offset in 0..=3 {
        let v = unsafe { VectorDouble::load_unaligned(data.as_ptr().add(offset)) };

        let mut out = vec![f64::NAN; LANE_COUNT + 3];
        unsafe { v.store_unaligned(out.as_mut_ptr().add(offset)) };

        assert_eq!(&out[offset..offset + LANE_COUNT], &data[offset..offset + LANE_COUNT]);
    }
}

#[test]
fn test_load_store_pick_path_by_alignment() {
    let buf = AlignedBuffer::from_slice(&[3.0; 16]).unwrap();
    assert!(VectorDouble::is_aligned(buf.as_ptr()));

    let v = unsafe { VectorDouble::load(buf.as_ptr().add(1)) };
    let mut out = AlignedBuffer::zeroed(16).unwrap();
    unsafe { v.store(out.as_mut_ptr().add(1)) };

    assert_eq!(&out[1..1 + LANE_COUNT], &buf[1..1 + LANE_COUNT]);
}

#[test]
fn test_explicit_lane_construction_order() {
    let mut lanes = <VectorDouble as SimdDouble>::Lanes::default();
    for (i, lane) in lanes.as_mut().iter_mut().enumerate() {
        *lane = i as f64 + 0.5;
    }

    let v = VectorDouble::from_array(lanes);
    for i in 0..LANE_COUNT {
        assert_eq!(v[i], i as f64 + 0.5);
        assert_eq!(v.extract(i), i as f64 + 0.5);
    }

    let copy = v;
    assert_eq!(copy.to_array().as_ref(), lanes.as_ref());
}

#[test]
fn test_broadcast_and_zero() {
    let v = VectorDouble::from(2.5);
    let z = VectorDouble::zero();
    let d = VectorDouble::default();

    for i in 0..LANE_COUNT {
        assert_eq!(v[i], 2.5);
        assert_eq!(z[i].to_bits(), 0);
        assert_eq!(d[i].to_bits(), 0);
    }
}
