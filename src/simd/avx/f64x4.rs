//! AVX 4-lane f64 SIMD vector implementation.
//!
//! This module provides `F64x4`, a SIMD vector type that wraps the `__m256d`
//! intrinsic type to operate on 4 double-precision values at once.
//!
//! # Supported Operations
//!
//! ## Loading and Storing
//! - `load_aligned()`, `load_unaligned()`, `load()` - Direct memory loading
//! - `store_aligned()`, `store_unaligned()`, `store()` - Direct memory storing
//! - `gather()` - Indexed loading through an [`I32x4`]
//!
//! ## Arithmetic
//! - Element-wise `+`, `-`, `*`, `/` and fused `fmadd()`
//! - `abs()`, `sqrt()`
//!
//! ## Masks
//! - `gt_elements()`, `gt_mask()` produce masks
//! - `&` and `blend()` consume them

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::fmt;
use std::ops::{Add, BitAnd, Div, Index, Mul, Sub};

use super::i32x4::I32x4;
use crate::simd::{fmt_lanes, SimdDouble, Tier};

/// AVX memory alignment requirement in bytes.
///
/// `_mm256_load_pd` and `_mm256_store_pd` fault on addresses that are not
/// 32-byte aligned.
pub(crate) const AVX_ALIGNMENT: usize = 32;

/// Number of f64 elements that fit in a 256-bit vector.
pub(crate) const LANE_COUNT: usize = 4;

/// AVX SIMD vector containing 4 packed f64 values.
///
/// # Usage
///
/// ```rust,ignore
/// use simdvec::simd::avx::F64x4;
/// use simdvec::simd::SimdDouble;
///
/// let x1 = F64x4::new(1.0, 2.0, 3.0, 4.0);
/// let x2 = F64x4::new(10.0, 20.0, 30.0, 40.0);
///
/// let picked = x1.blend(x2, F64x4::gt_mask(2));
/// assert_eq!(picked.to_array(), [1.0, 2.0, 30.0, 40.0]);
/// ```
#[repr(transparent)]
#[derive(Copy, Clone, Debug)]
pub struct F64x4 {
    /// AVX 256-bit register containing 4 packed f64 values
    pub(crate) elements: __m256d,
}

impl F64x4 {
    /// Builds a vector from explicit lanes, lane 0 first.
    #[inline(always)]
    pub fn new(x0: f64, x1: f64, x2: f64, x3: f64) -> Self {
        Self {
            elements: unsafe { _mm256_setr_pd(x0, x1, x2, x3) },
        }
    }

    #[inline(always)]
    fn from_bits(lanes: [i64; LANE_COUNT]) -> Self {
        Self {
            elements: unsafe {
                _mm256_castsi256_pd(_mm256_setr_epi64x(lanes[0], lanes[1], lanes[2], lanes[3]))
            },
        }
    }

    #[cfg(avx2)]
    #[inline(always)]
    unsafe fn gather_lanes(base: *const f64, indices: I32x4, scale: i32) -> __m256d {
        unsafe {
            let offsets = _mm_mullo_epi32(indices.elements, _mm_set1_epi32(scale));
            _mm256_i32gather_pd::<8>(base, offsets)
        }
    }

    #[cfg(not(avx2))]
    #[inline(always)]
    unsafe fn gather_lanes(base: *const f64, indices: I32x4, scale: i32) -> __m256d {
        use crate::simd::SimdIndex;

        let idx = indices.to_array();
        let lane = |i: usize| unsafe { *base.offset(idx[i].wrapping_mul(scale) as isize) };

        unsafe { _mm256_setr_pd(lane(0), lane(1), lane(2), lane(3)) }
    }

    #[cfg(avx2)]
    #[inline(always)]
    fn fmadd_lanes(a: __m256d, b: __m256d, c: __m256d) -> __m256d {
        unsafe { _mm256_fmadd_pd(b, c, a) }
    }

    // No FMA unit guaranteed: fuse per lane to keep a single rounding.
    #[cfg(not(avx2))]
    #[inline(always)]
    fn fmadd_lanes(a: __m256d, b: __m256d, c: __m256d) -> __m256d {
        let (a, b, c) = (
            Self { elements: a }.to_array(),
            Self { elements: b }.to_array(),
            Self { elements: c }.to_array(),
        );
        let lane = |i: usize| b[i].mul_add(c[i], a[i]);

        unsafe { _mm256_setr_pd(lane(0), lane(1), lane(2), lane(3)) }
    }
}

impl Default for F64x4 {
    #[inline(always)]
    fn default() -> Self {
        Self::zero()
    }
}

impl From<f64> for F64x4 {
    #[inline(always)]
    fn from(value: f64) -> Self {
        Self::splat(value)
    }
}

impl SimdDouble for F64x4 {
    const LANES: usize = LANE_COUNT;
    const ALIGNMENT: usize = AVX_ALIGNMENT;

    #[cfg(avx2)]
    const TIER: Tier = Tier::Avx2;
    #[cfg(not(avx2))]
    const TIER: Tier = Tier::Avx;

    type Index = I32x4;
    type Lanes = [f64; LANE_COUNT];

    #[inline(always)]
    fn splat(value: f64) -> Self {
        Self {
            elements: unsafe { _mm256_set1_pd(value) },
        }
    }

    #[inline(always)]
    fn zero() -> Self {
        Self {
            elements: unsafe { _mm256_setzero_pd() },
        }
    }

    #[inline(always)]
    fn from_array(lanes: Self::Lanes) -> Self {
        unsafe { Self::load_unaligned(lanes.as_ptr()) }
    }

    #[inline(always)]
    fn to_array(self) -> Self::Lanes {
        let mut lanes = [0.0f64; LANE_COUNT];
        unsafe { self.store_unaligned(lanes.as_mut_ptr()) };
        lanes
    }

    /// Loads 4 elements from 32-byte aligned memory with `_mm256_load_pd`.
    ///
    /// # Safety
    ///
    /// Pointer must be 32-byte aligned and point to at least 4 valid f64 values.
    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f64) -> Self {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");
        debug_assert!(Self::is_aligned(ptr), "Pointer must be {AVX_ALIGNMENT}-byte aligned");

        Self {
            elements: unsafe { _mm256_load_pd(ptr) },
        }
    }

    /// Loads 4 elements from unaligned memory with `_mm256_loadu_pd`.
    ///
    /// # Safety
    ///
    /// Pointer must point to at least 4 valid f64 values.
    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const f64) -> Self {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        Self {
            elements: unsafe { _mm256_loadu_pd(ptr) },
        }
    }

    /// Stores 4 elements to 32-byte aligned memory with `_mm256_store_pd`.
    ///
    /// # Safety
    ///
    /// Pointer must be 32-byte aligned and point to at least 4 writable f64 slots.
    #[inline(always)]
    unsafe fn store_aligned(&self, ptr: *mut f64) {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");
        debug_assert!(Self::is_aligned(ptr), "Pointer must be {AVX_ALIGNMENT}-byte aligned");

        unsafe { _mm256_store_pd(ptr, self.elements) }
    }

    /// Stores 4 elements to unaligned memory with `_mm256_storeu_pd`.
    ///
    /// # Safety
    ///
    /// Pointer must point to at least 4 writable f64 slots.
    #[inline(always)]
    unsafe fn store_unaligned(&self, ptr: *mut f64) {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        unsafe { _mm256_storeu_pd(ptr, self.elements) }
    }

    /// Under AVX2 the offsets are scaled with `_mm_mullo_epi32` and fed to
    /// `_mm256_i32gather_pd` with an 8-byte stride; under plain AVX each lane
    /// is read individually.
    #[inline(always)]
    unsafe fn gather(base: *const f64, indices: Self::Index, scale: i32) -> Self {
        debug_assert!(!base.is_null(), "Pointer must not be null");

        Self {
            elements: unsafe { Self::gather_lanes(base, indices, scale) },
        }
    }

    #[inline(always)]
    fn fmadd(self, b: Self, c: Self) -> Self {
        Self {
            elements: Self::fmadd_lanes(self.elements, b.elements, c.elements),
        }
    }

    /// Uses `_CMP_GT_OQ`: ordered, non-signalling, so `NaN` compares false.
    #[inline(always)]
    fn gt_elements(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm256_cmp_pd::<_CMP_GT_OQ>(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn blend(self, other: Self, mask: Self) -> Self {
        Self {
            elements: unsafe { _mm256_blendv_pd(self.elements, other.elements, mask.elements) },
        }
    }

    #[inline(always)]
    fn abs(self) -> Self {
        Self {
            elements: unsafe { _mm256_andnot_pd(_mm256_set1_pd(-0.0), self.elements) },
        }
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        Self {
            elements: unsafe { _mm256_sqrt_pd(self.elements) },
        }
    }

    #[inline(always)]
    fn gt_mask(idx: i32) -> Self {
        match idx {
            i32::MIN..=0 => Self::from_bits([-1, -1, -1, -1]),
            1 => Self::from_bits([0, -1, -1, -1]),
            2 => Self::from_bits([0, 0, -1, -1]),
            3 => Self::from_bits([0, 0, 0, -1]),
            _ => Self::from_bits([0, 0, 0, 0]),
        }
    }
}

impl Add for F64x4 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { _mm256_add_pd(self.elements, rhs.elements) },
        }
    }
}

impl Sub for F64x4 {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { _mm256_sub_pd(self.elements, rhs.elements) },
        }
    }
}

impl Mul for F64x4 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { _mm256_mul_pd(self.elements, rhs.elements) },
        }
    }
}

impl Div for F64x4 {
    type Output = Self;

    #[inline(always)]
    fn div(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { _mm256_div_pd(self.elements, rhs.elements) },
        }
    }
}

impl BitAnd for F64x4 {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { _mm256_and_pd(self.elements, rhs.elements) },
        }
    }
}

impl Index<usize> for F64x4 {
    type Output = f64;

    #[inline(always)]
    fn index(&self, idx: usize) -> &Self::Output {
        assert!(idx < LANE_COUNT, "Lane index {idx} out of range");
        // SAFETY: `F64x4` is a transparent wrapper over `__m256d`, which is laid
        // out as four consecutive f64 values; `idx` was bounds-checked above.
        unsafe { &*(self as *const Self as *const f64).add(idx) }
    }
}

impl fmt::Display for F64x4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_lanes(&self.to_array(), f)
    }
}
