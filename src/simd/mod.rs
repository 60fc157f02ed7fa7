//! Width-agnostic `f64` vectors with a compile-time selected tier.
//!
//! The build script picks one tier for the whole crate:
//!
//! - **avx2**: 4 lanes over `__m256d`, hardware gather and fused multiply-add.
//! - **avx**: 4 lanes over `__m256d`, gather and fused multiply-add done per lane.
//! - **scalar**: 1 lane over a plain `f64`.
//!
//! [`VectorDouble`] and [`VectorIndex`] alias the selected tier's types.
//! The scalar tier is always compiled so the other tiers can be checked
//! against it lane for lane.
//!
//! ```rust
//! use simdvec::simd::{fmadd, SimdDouble, VectorDouble};
//!
//! let a = VectorDouble::splat(1.0);
//! let b = VectorDouble::splat(2.0);
//! let c = VectorDouble::splat(3.0);
//!
//! let r = fmadd(a, b, c);
//! assert_eq!(r.extract(0), 7.0);
//! ```

use std::fmt;

#[cfg(avx)]
pub mod avx;

pub mod scalar;

pub mod slice;

pub mod traits;

pub mod utils;

pub use traits::{SimdDouble, SimdIndex};

/// Double-precision vector of the active tier.
#[cfg(avx)]
pub type VectorDouble = avx::F64x4;

/// Gather-offset vector of the active tier.
#[cfg(avx)]
pub type VectorIndex = avx::I32x4;

/// Double-precision vector of the active tier.
#[cfg(not(avx))]
pub type VectorDouble = scalar::F64x1;

/// Gather-offset vector of the active tier.
#[cfg(not(avx))]
pub type VectorIndex = scalar::I32x1;

/// Lane count of [`VectorDouble`] and [`VectorIndex`].
pub const LANE_COUNT: usize = <VectorDouble as SimdDouble>::LANES;

/// Tier the crate was compiled for.
pub const ACTIVE_TIER: Tier = <VectorDouble as SimdDouble>::TIER;

/// Instruction-set tier a vector type compiles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// 256-bit AVX2 + FMA.
    Avx2,
    /// 256-bit AVX without AVX2/FMA.
    Avx,
    /// One lane, plain scalar arithmetic.
    Scalar,
}

impl Tier {
    /// Number of `f64` lanes vectors of this tier hold.
    pub const fn lanes(self) -> usize {
        match self {
            Tier::Avx2 | Tier::Avx => 4,
            Tier::Scalar => 1,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::Avx2 => "avx2",
            Tier::Avx => "avx",
            Tier::Scalar => "scalar",
        };
        f.write_str(name)
    }
}

/// Returns `a + b * c` per lane, rounded once.
#[inline(always)]
pub fn fmadd<V: SimdDouble>(a: V, b: V, c: V) -> V {
    a.fmadd(b, c)
}

/// Returns `mask ? x2 : x1` per lane.
#[inline(always)]
pub fn blend<V: SimdDouble>(x1: V, x2: V, mask: V) -> V {
    x1.blend(x2, mask)
}

/// Absolute value per lane.
#[inline(always)]
pub fn fabs<V: SimdDouble>(x: V) -> V {
    x.abs()
}

/// Square root per lane.
#[inline(always)]
pub fn sqrt<V: SimdDouble>(x: V) -> V {
    x.sqrt()
}

// Space-separated lanes as `1.000000e+00`: six mantissa digits, signed
// exponent of at least two digits.
pub(crate) fn fmt_lanes(lanes: &[f64], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, &lane) in lanes.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        fmt_exp(lane, f)?;
    }
    Ok(())
}

fn fmt_exp(x: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if x.is_nan() {
        let sign = if x.is_sign_negative() { "-" } else { "" };
        return write!(f, "{sign}nan");
    }
    if x.is_infinite() {
        let sign = if x < 0.0 { "-" } else { "" };
        return write!(f, "{sign}inf");
    }

    let shown = format!("{x:.6e}");
    let Some((mantissa, exponent)) = shown.split_once('e') else {
        return f.write_str(&shown);
    };
    let exponent: i32 = exponent.parse().map_err(|_| fmt::Error)?;
    let sign = if exponent < 0 { '-' } else { '+' };

    write!(f, "{mantissa}e{sign}{:02}", exponent.unsigned_abs())
}
