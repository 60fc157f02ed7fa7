//! Four packed `i32` gather offsets.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::simd::SimdIndex;

/// Number of `i32` lanes, one per `f64` lane of [`F64x4`](super::F64x4).
pub(crate) const LANE_COUNT: usize = 4;

/// Gather-offset vector for the AVX tier.
#[repr(transparent)]
#[derive(Copy, Clone, Debug)]
pub struct I32x4 {
    pub(crate) elements: __m128i,
}

impl I32x4 {
    /// Builds a vector from explicit lanes, lane 0 first.
    #[inline(always)]
    pub fn new(i0: i32, i1: i32, i2: i32, i3: i32) -> Self {
        Self {
            elements: unsafe { _mm_setr_epi32(i0, i1, i2, i3) },
        }
    }
}

impl Default for I32x4 {
    #[inline(always)]
    fn default() -> Self {
        Self {
            elements: unsafe { _mm_setzero_si128() },
        }
    }
}

impl SimdIndex for I32x4 {
    const LANES: usize = LANE_COUNT;

    type Lanes = [i32; LANE_COUNT];

    #[inline(always)]
    fn splat(value: i32) -> Self {
        Self {
            elements: unsafe { _mm_set1_epi32(value) },
        }
    }

    #[inline(always)]
    fn from_array(lanes: Self::Lanes) -> Self {
        unsafe { Self::load_unaligned(lanes.as_ptr()) }
    }

    #[inline(always)]
    fn to_array(self) -> Self::Lanes {
        let mut lanes = [0i32; LANE_COUNT];
        unsafe { self.store_unaligned(lanes.as_mut_ptr()) };
        lanes
    }

    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const i32) -> Self {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");
        Self {
            elements: unsafe { _mm_loadu_si128(ptr as *const __m128i) },
        }
    }

    #[inline(always)]
    unsafe fn store_unaligned(&self, ptr: *mut i32) {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");
        unsafe { _mm_storeu_si128(ptr as *mut __m128i, self.elements) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keeps_lane_order() {
        assert_eq!(I32x4::new(0, 2, 4, 1).to_array(), [0, 2, 4, 1]);
    }

    #[test]
    fn test_splat_and_default() {
        assert_eq!(I32x4::splat(-7).to_array(), [-7; 4]);
        assert_eq!(I32x4::default().to_array(), [0; 4]);
    }

    #[test]
    fn test_load_store_unaligned() {
        let src = [9, 1, 2, 3, 4, 9];
        let idx = unsafe { I32x4::load_unaligned(src.as_ptr().add(1)) };
        assert_eq!(idx.extract(3), 4);

        let mut dst = [0i32; 6];
        unsafe { idx.store_unaligned(dst.as_mut_ptr().add(2)) };
        assert_eq!(dst, [0, 0, 1, 2, 3, 4]);
    }
}
