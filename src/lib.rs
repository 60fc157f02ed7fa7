//! Portable fixed-width `f64` vectors.
//!
//! [`VectorDouble`] holds [`LANE_COUNT`] doubles and [`VectorIndex`] the same
//! number of `i32` gather offsets. The width and the instruction set behind
//! them are fixed when the crate is built: 4 lanes over AVX when the target
//! guarantees it, 1 scalar lane otherwise. Code written against
//! [`SimdDouble`] runs unchanged on either tier and produces bit-identical
//! results.
//!
//! The tier follows the features the compilation target guarantees, not the
//! host CPU, so a default x86_64 build is scalar. Build with
//! `RUSTFLAGS="-C target-cpu=native"` (or `+avx2,+fma`) for 4 lanes. The
//! 256-bit tiers carry lane-for-lane checks against the scalar tier that only
//! compile in those builds:
//!
//! ```text
//! cargo test             # scalar tier
//! cargo test-avx         # avx: per-lane gather and fused multiply-add
//! cargo test-avx2        # avx2 + fma: hardware gather and vfmadd
//! ```
//!
//! ```rust
//! use simdvec::{SimdDouble, VectorDouble, LANE_COUNT};
//!
//! let data = vec![4.0f64; LANE_COUNT];
//! let v = unsafe { VectorDouble::load_unaligned(data.as_ptr()) };
//!
//! let mut out = vec![0.0f64; LANE_COUNT];
//! unsafe { v.sqrt().store_unaligned(out.as_mut_ptr()) };
//! assert!(out.iter().all(|&x| x == 2.0));
//! ```

pub mod error;

pub mod simd;

pub use simd::slice::{SimdAbs, SimdAdd, SimdFmadd, SimdMax, SimdMul, SimdSqrt};
pub use simd::{
    blend, fabs, fmadd, sqrt, SimdDouble, SimdIndex, Tier, VectorDouble, VectorIndex, ACTIVE_TIER,
    LANE_COUNT,
};
