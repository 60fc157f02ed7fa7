//! AVX 256-bit tier.
//!
//! Contains [`F64x4`], four packed `f64` values in an `__m256d`, and its
//! gather-offset companion [`I32x4`], four packed `i32` in an `__m128i`.
//!
//! # Architecture Requirements
//!
//! - **Target Architecture**: x86 or x86_64
//! - **Compilation**: the build target must guarantee AVX
//!   (`-C target-feature=+avx` or a `target-cpu` that has it). With AVX2 and
//!   FMA also guaranteed, gathers and fused multiply-adds use the dedicated
//!   instructions.
//!
//! This module is only compiled when the build script selects the AVX tier.

pub mod f64x4;

pub mod i32x4;

pub use f64x4::F64x4;
pub use i32x4::I32x4;
