//! Operation sets shared by every vector tier.
//!
//! [`SimdDouble`] is the contract a tier's double-precision vector fulfils and
//! [`SimdIndex`] the one for the companion gather-offset vector. Each tier
//! binds `LANES` at compile time, so code written against these traits is
//! width-agnostic while still compiling down to the tier's instructions.

use std::fmt::{Debug, Display};
use std::ops::{Add, BitAnd, Div, Index, Mul, Sub};

use crate::error::{index_out_of_bounds, Result};
use crate::simd::Tier;

/// Fixed-width vector of `i32` lanes carrying gather offsets.
pub trait SimdIndex: Copy + Default + Debug + Send + Sync {
    /// Number of `i32` lanes.
    const LANES: usize;

    /// Plain array holding one value per lane.
    type Lanes: Copy + Default + Debug + AsRef<[i32]> + AsMut<[i32]>;

    /// Broadcasts `value` to every lane.
    fn splat(value: i32) -> Self;

    /// Builds a vector from explicit lanes, lane 0 first.
    fn from_array(lanes: Self::Lanes) -> Self;

    /// Copies the lanes out, lane 0 first.
    fn to_array(self) -> Self::Lanes;

    /// Reads `LANES` contiguous `i32` values.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads of `LANES` `i32` values. No alignment
    /// requirement.
    unsafe fn load_unaligned(ptr: *const i32) -> Self;

    /// Writes the lanes to `LANES` contiguous `i32` slots.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writes of `LANES` `i32` values. No alignment
    /// requirement.
    unsafe fn store_unaligned(&self, ptr: *mut i32);

    /// Returns lane `idx`. Goes through memory; meant for tests and debugging.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= LANES`.
    #[inline(always)]
    fn extract(&self, idx: usize) -> i32 {
        self.to_array().as_ref()[idx]
    }
}

/// Fixed-width vector of `f64` lanes.
///
/// Every operation is lane-independent and pure. A *mask* is a vector whose
/// lanes are either all-bits-set (true) or all-bits-zero (false); masks are
/// produced by [`gt_elements`](SimdDouble::gt_elements) and
/// [`gt_mask`](SimdDouble::gt_mask) and consumed by
/// [`blend`](SimdDouble::blend) and `&`.
///
/// Results are bit-identical across tiers: a one-lane tier fed the value of
/// lane `i` produces exactly lane `i` of a wider tier's result.
pub trait SimdDouble:
    Copy
    + Default
    + Debug
    + Display
    + Send
    + Sync
    + From<f64>
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + BitAnd<Output = Self>
    + Index<usize, Output = f64>
{
    /// Number of `f64` lanes.
    const LANES: usize;

    /// Natural alignment in bytes required by the aligned load/store paths.
    const ALIGNMENT: usize;

    /// Instruction-set tier this type compiles to.
    const TIER: Tier;

    /// Offset vector of the same width, consumed by [`gather`](SimdDouble::gather).
    type Index: SimdIndex;

    /// Plain array holding one value per lane.
    type Lanes: Copy + Default + Debug + AsRef<[f64]> + AsMut<[f64]>;

    /// Broadcasts `value` to every lane.
    fn splat(value: f64) -> Self;

    /// All lanes `+0.0`.
    fn zero() -> Self;

    /// Builds a vector from explicit lanes, lane 0 first.
    fn from_array(lanes: Self::Lanes) -> Self;

    /// Copies the lanes out, lane 0 first.
    fn to_array(self) -> Self::Lanes;

    /// Checks whether `ptr` satisfies [`ALIGNMENT`](SimdDouble::ALIGNMENT).
    #[inline(always)]
    fn is_aligned(ptr: *const f64) -> bool {
        (ptr as usize) % Self::ALIGNMENT == 0
    }

    /// Loads `LANES` contiguous values from aligned memory.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads of `LANES` `f64` values and aligned to
    /// [`ALIGNMENT`](SimdDouble::ALIGNMENT) bytes. A misaligned pointer may
    /// fault on the 256-bit tier.
    unsafe fn load_aligned(ptr: *const f64) -> Self;

    /// Loads `LANES` contiguous values from memory of any alignment.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads of `LANES` `f64` values.
    unsafe fn load_unaligned(ptr: *const f64) -> Self;

    /// Loads `LANES` values, taking the aligned path when `ptr` allows it.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads of `LANES` `f64` values.
    #[inline(always)]
    unsafe fn load(ptr: *const f64) -> Self {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        match Self::is_aligned(ptr) {
            true => unsafe { Self::load_aligned(ptr) },
            false => unsafe { Self::load_unaligned(ptr) },
        }
    }

    /// Stores the lanes to aligned memory.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writes of `LANES` `f64` values and aligned to
    /// [`ALIGNMENT`](SimdDouble::ALIGNMENT) bytes.
    unsafe fn store_aligned(&self, ptr: *mut f64);

    /// Stores the lanes to memory of any alignment.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writes of `LANES` `f64` values.
    unsafe fn store_unaligned(&self, ptr: *mut f64);

    /// Stores the lanes, taking the aligned path when `ptr` allows it.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writes of `LANES` `f64` values.
    #[inline(always)]
    unsafe fn store(&self, ptr: *mut f64) {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        match Self::is_aligned(ptr) {
            true => unsafe { self.store_aligned(ptr) },
            false => unsafe { self.store_unaligned(ptr) },
        }
    }

    /// Lane `i` of the result is `base[indices[i] * scale]`.
    ///
    /// `scale` is an element multiplier, not a byte multiplier. The product is
    /// computed with wrapping 32-bit arithmetic on every tier.
    ///
    /// # Safety
    ///
    /// For every lane, `base.offset(indices[i] * scale)` must be valid for a
    /// read of one `f64`.
    unsafe fn gather(base: *const f64, indices: Self::Index, scale: i32) -> Self;

    /// Bounds-checked [`gather`](SimdDouble::gather) over a slice.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfBounds`](crate::error::SimdVecError::IndexOutOfBounds)
    /// for the first lane whose offset is negative, does not fit in `i32`, or is
    /// past the end of `base`.
    fn try_gather(base: &[f64], indices: Self::Index, scale: i32) -> Result<Self> {
        for &idx in indices.to_array().as_ref() {
            let offset = i64::from(idx) * i64::from(scale);

            if offset < 0 || offset > i64::from(i32::MAX) || offset as u64 >= base.len() as u64 {
                return Err(index_out_of_bounds(offset, base.len()));
            }
        }

        // SAFETY: every lane offset was checked to lie inside `base` and to fit
        // in an `i32`, so the wrapping product equals the checked one.
        Ok(unsafe { Self::gather(base.as_ptr(), indices, scale) })
    }

    /// Fused multiply-add: `self + b * c` per lane with a single rounding.
    fn fmadd(self, b: Self, c: Self) -> Self;

    /// Ordered greater-than per lane. `NaN` on either side yields false.
    fn gt_elements(self, rhs: Self) -> Self;

    /// Per-lane select: `other[i]` where `mask[i]` is true, else `self[i]`.
    ///
    /// Only the sign bit of each mask lane is consulted, so a proper mask
    /// selects as expected; other bit patterns give unspecified choices.
    fn blend(self, other: Self, mask: Self) -> Self;

    /// Absolute value by clearing the sign bit. Bit-exact, including `-0.0`
    /// and `NaN` payloads.
    fn abs(self) -> Self;

    /// IEEE-754 square root, round-to-nearest.
    fn sqrt(self) -> Self;

    /// Mask with lane `i` true iff `i >= idx`.
    ///
    /// `idx <= 0` gives all lanes true, `idx >= LANES` all lanes false.
    fn gt_mask(idx: i32) -> Self;

    /// Returns lane `idx`. Goes through memory; meant for tests and debugging.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= LANES`.
    #[inline(always)]
    fn extract(&self, idx: usize) -> f64 {
        self.to_array().as_ref()[idx]
    }
}
