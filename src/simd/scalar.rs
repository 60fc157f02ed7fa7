//! Scalar fallback tier.
//!
//! [`F64x1`] and [`I32x1`] are one-lane vectors whose operations reduce to
//! plain `f64` / `i32` arithmetic. Operations that the 256-bit tier performs
//! on raw bit patterns (masks, `&`, absolute value, blend) are done on the
//! bits here too, so both tiers agree bit for bit.

use std::fmt;
use std::ops::{Add, BitAnd, Div, Index, Mul, Sub};

use crate::simd::{fmt_lanes, SimdDouble, SimdIndex, Tier};

const SIGN_MASK: u64 = 1 << 63;

const MASK_TRUE: u64 = u64::MAX;
const MASK_FALSE: u64 = 0;

/// One-lane gather-offset vector. Converts to and from a plain `i32`.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct I32x1 {
    pub(crate) elements: i32,
}

impl I32x1 {
    /// Wraps a single offset.
    #[inline(always)]
    pub const fn new(value: i32) -> Self {
        Self { elements: value }
    }
}

impl From<i32> for I32x1 {
    #[inline(always)]
    fn from(value: i32) -> Self {
        Self::new(value)
    }
}

impl From<I32x1> for i32 {
    #[inline(always)]
    fn from(value: I32x1) -> Self {
        value.elements
    }
}

impl SimdIndex for I32x1 {
    const LANES: usize = 1;

    type Lanes = [i32; 1];

    #[inline(always)]
    fn splat(value: i32) -> Self {
        Self::new(value)
    }

    #[inline(always)]
    fn from_array(lanes: Self::Lanes) -> Self {
        Self::new(lanes[0])
    }

    #[inline(always)]
    fn to_array(self) -> Self::Lanes {
        [self.elements]
    }

    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const i32) -> Self {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");
        Self::new(unsafe { ptr.read_unaligned() })
    }

    #[inline(always)]
    unsafe fn store_unaligned(&self, ptr: *mut i32) {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");
        unsafe { ptr.write_unaligned(self.elements) }
    }
}

/// One-lane `f64` vector.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default)]
pub struct F64x1 {
    pub(crate) elements: f64,
}

impl F64x1 {
    /// Wraps a single value.
    #[inline(always)]
    pub const fn new(value: f64) -> Self {
        Self { elements: value }
    }

    #[inline(always)]
    fn from_bits(bits: u64) -> Self {
        Self::new(f64::from_bits(bits))
    }

    #[inline(always)]
    fn to_bits(self) -> u64 {
        self.elements.to_bits()
    }
}

impl From<f64> for F64x1 {
    #[inline(always)]
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl SimdDouble for F64x1 {
    const LANES: usize = 1;
    const ALIGNMENT: usize = core::mem::align_of::<f64>();
    const TIER: Tier = Tier::Scalar;

    type Index = I32x1;
    type Lanes = [f64; 1];

    #[inline(always)]
    fn splat(value: f64) -> Self {
        Self::new(value)
    }

    #[inline(always)]
    fn zero() -> Self {
        Self::new(0.0)
    }

    #[inline(always)]
    fn from_array(lanes: Self::Lanes) -> Self {
        Self::new(lanes[0])
    }

    #[inline(always)]
    fn to_array(self) -> Self::Lanes {
        [self.elements]
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f64) -> Self {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");
        debug_assert!(Self::is_aligned(ptr), "Pointer must be aligned");
        Self::new(unsafe { *ptr })
    }

    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const f64) -> Self {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");
        Self::new(unsafe { ptr.read_unaligned() })
    }

    #[inline(always)]
    unsafe fn store_aligned(&self, ptr: *mut f64) {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");
        debug_assert!(Self::is_aligned(ptr), "Pointer must be aligned");
        unsafe { *ptr = self.elements }
    }

    #[inline(always)]
    unsafe fn store_unaligned(&self, ptr: *mut f64) {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");
        unsafe { ptr.write_unaligned(self.elements) }
    }

    #[inline(always)]
    unsafe fn gather(base: *const f64, indices: Self::Index, scale: i32) -> Self {
        let offset = indices.elements.wrapping_mul(scale) as isize;
        Self::new(unsafe { *base.offset(offset) })
    }

    #[inline(always)]
    fn fmadd(self, b: Self, c: Self) -> Self {
        Self::new(b.elements.mul_add(c.elements, self.elements))
    }

    #[inline(always)]
    fn gt_elements(self, rhs: Self) -> Self {
        match self.elements > rhs.elements {
            true => Self::from_bits(MASK_TRUE),
            false => Self::from_bits(MASK_FALSE),
        }
    }

    #[inline(always)]
    fn blend(self, other: Self, mask: Self) -> Self {
        match mask.to_bits() & SIGN_MASK != 0 {
            true => other,
            false => self,
        }
    }

    #[inline(always)]
    fn abs(self) -> Self {
        Self::from_bits(self.to_bits() & !SIGN_MASK)
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        Self::new(self.elements.sqrt())
    }

    #[inline(always)]
    fn gt_mask(idx: i32) -> Self {
        match idx {
            i32::MIN..=0 => Self::from_bits(MASK_TRUE),
            _ => Self::from_bits(MASK_FALSE),
        }
    }
}

impl Add for F64x1 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.elements + rhs.elements)
    }
}

impl Sub for F64x1 {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.elements - rhs.elements)
    }
}

impl Mul for F64x1 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self::Output {
        Self::new(self.elements * rhs.elements)
    }
}

impl Div for F64x1 {
    type Output = Self;

    #[inline(always)]
    fn div(self, rhs: Self) -> Self::Output {
        Self::new(self.elements / rhs.elements)
    }
}

impl BitAnd for F64x1 {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.to_bits() & rhs.to_bits())
    }
}

impl Index<usize> for F64x1 {
    type Output = f64;

    #[inline(always)]
    fn index(&self, idx: usize) -> &Self::Output {
        assert!(idx < Self::LANES, "Lane index {idx} out of range");
        &self.elements
    }
}

impl fmt::Display for F64x1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_lanes(&[self.elements], f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod construction_tests {
        use super::*;

        #[test]
        fn test_default_is_zero() {
            assert_eq!(F64x1::default().to_bits(), 0);
            assert_eq!(I32x1::default().elements, 0);
        }

        #[test]
        fn test_splat_and_from() {
            assert_eq!(F64x1::splat(2.5).extract(0), 2.5);
            assert_eq!(F64x1::from(-1.0)[0], -1.0);
            assert_eq!(F64x1::from_array([7.0]).to_array(), [7.0]);
        }

        #[test]
        fn test_index_transparent_integer() {
            let idx: I32x1 = 42.into();
            let back: i32 = idx.into();
            assert_eq!(back, 42);
            assert_eq!(I32x1::splat(-3).extract(0), -3);
        }

        #[test]
        fn test_zero_is_positive_zero() {
            assert_eq!(F64x1::zero().to_bits(), 0.0f64.to_bits());
        }
    }

    mod memory_tests {
        use super::*;

        #[test]
        fn test_load_store_roundtrip() {
            let src = [3.25f64];
            let v = unsafe { F64x1::load_aligned(src.as_ptr()) };

            let mut dst = [0.0f64];
            unsafe { v.store_aligned(dst.as_mut_ptr()) };
            assert_eq!(dst, src);
        }

        #[test]
        fn test_unaligned_byte_offset() {
            let mut bytes = [0u8; 17];
            let ptr = unsafe { bytes.as_mut_ptr().add(1) } as *mut f64;

            unsafe { F64x1::new(-9.5).store_unaligned(ptr) };
            let v = unsafe { F64x1::load_unaligned(ptr) };
            assert_eq!(v.extract(0), -9.5);
        }

        #[test]
        fn test_gather_scaled() {
            let base = [10.0, 20.0, 30.0, 40.0, 50.0, 60.0];
            let v = unsafe { F64x1::gather(base.as_ptr(), I32x1::new(2), 2) };
            assert_eq!(v.extract(0), 50.0);
        }

        #[test]
        fn test_index_load_store() {
            let src = [11i32];
            let idx = unsafe { I32x1::load_unaligned(src.as_ptr()) };

            let mut dst = [0i32];
            unsafe { idx.store_unaligned(dst.as_mut_ptr()) };
            assert_eq!(dst, src);
        }
    }

    mod mask_tests {
        use super::*;

        #[test]
        fn test_gt_produces_canonical_masks() {
            assert_eq!(F64x1::new(2.0).gt_elements(F64x1::new(1.0)).to_bits(), MASK_TRUE);
            assert_eq!(F64x1::new(1.0).gt_elements(F64x1::new(2.0)).to_bits(), MASK_FALSE);
            assert_eq!(F64x1::new(f64::NAN).gt_elements(F64x1::new(1.0)).to_bits(), MASK_FALSE);
        }

        #[test]
        fn test_gt_mask_boundaries() {
            assert_eq!(F64x1::gt_mask(i32::MIN).to_bits(), MASK_TRUE);
            assert_eq!(F64x1::gt_mask(0).to_bits(), MASK_TRUE);
            assert_eq!(F64x1::gt_mask(1).to_bits(), MASK_FALSE);
            assert_eq!(F64x1::gt_mask(i32::MAX).to_bits(), MASK_FALSE);
        }

        #[test]
        fn test_bitand_is_bitwise() {
            let t = F64x1::gt_mask(0);
            let f = F64x1::gt_mask(1);
            assert_eq!((t & t).to_bits(), MASK_TRUE);
            assert_eq!((t & f).to_bits(), MASK_FALSE);
            assert_eq!((t & F64x1::new(1.5)).extract(0), 1.5);
        }

        #[test]
        fn test_blend_follows_mask() {
            let x1 = F64x1::new(1.0);
            let x2 = F64x1::new(2.0);
            assert_eq!(x1.blend(x2, F64x1::gt_mask(0)).extract(0), 2.0);
            assert_eq!(x1.blend(x2, F64x1::gt_mask(1)).extract(0), 1.0);
        }
    }

    mod arithmetic_tests {
        use super::*;

        #[test]
        fn test_operators() {
            let a = F64x1::new(6.0);
            let b = F64x1::new(1.5);
            assert_eq!((a + b).extract(0), 7.5);
            assert_eq!((a - b).extract(0), 4.5);
            assert_eq!((a * b).extract(0), 9.0);
            assert_eq!((a / b).extract(0), 4.0);
        }

        #[test]
        fn test_fmadd_is_fused() {
            // 0.1 * 10.0 rounds up to exactly 1.0 when not fused.
            let a = F64x1::new(-1.0);
            let r = a.fmadd(F64x1::new(0.1), F64x1::new(10.0));
            assert_eq!(r.extract(0), 0.1f64.mul_add(10.0, -1.0));
            assert_ne!(r.extract(0), 0.0);
        }

        #[test]
        fn test_abs_clears_sign_bit_only() {
            assert_eq!(F64x1::new(-0.0).abs().to_bits(), 0.0f64.to_bits());
            assert_eq!(F64x1::new(-3.0).abs().extract(0), 3.0);

            let negative_nan = f64::from_bits(0xFFF8_0000_0000_0001);
            let cleared = F64x1::new(negative_nan).abs();
            assert_eq!(cleared.to_bits(), 0x7FF8_0000_0000_0001);
        }

        #[test]
        fn test_sqrt_uses_scalar_root() {
            assert_eq!(F64x1::new(2.0).sqrt().extract(0), 2.0f64.sqrt());
            assert_eq!(F64x1::new(f64::INFINITY).sqrt().extract(0), f64::INFINITY);
            assert_eq!(F64x1::new(-0.0).sqrt().to_bits(), (-0.0f64).to_bits());
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(F64x1::new(1.5).to_string(), "1.500000e+00");
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_index_out_of_range_panics() {
        let _ = F64x1::new(1.0)[1];
    }
}
