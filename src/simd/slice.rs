//! Slice-level kernels built on [`VectorDouble`].
//!
//! Every operation comes in three flavours, following the same pattern:
//!
//! - `simd_*`: single-threaded loop over full vectors; the tail that does not
//!   fill a vector is finished with the one-lane scalar tier.
//! - `par_simd_*`: rayon-parallel over fixed-size chunks above
//!   [`PARALLEL_SIMD_THRESHOLD`], otherwise the same as `simd_*`.
//! - `scalar_*`: plain iterator over `f64`.
//!
//! Because every vector operation is bit-identical to its scalar equivalent
//! lane for lane, the three flavours return identical results.
//!
//! ```rust
//! use simdvec::simd::slice::{SimdAbs, SimdFmadd};
//!
//! let a = vec![1.0, -2.0, 3.0, -4.0, 5.0];
//! assert_eq!(a.as_slice().simd_abs(), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
//!
//! let acc = vec![1.0; 5];
//! let r = acc.as_slice().simd_fmadd(&a, &a).unwrap();
//! assert_eq!(r, vec![2.0, 5.0, 10.0, 17.0, 26.0]);
//! ```

use log::trace;
use rayon::prelude::*;

use crate::error::{validation_error, Result};
use crate::simd::{scalar::F64x1, SimdDouble, VectorDouble, ACTIVE_TIER};

/// Inputs longer than this are split across the rayon pool by `par_simd_*`.
pub const PARALLEL_SIMD_THRESHOLD: usize = 1 << 16;

/// Elements handed to one rayon task. A multiple of every tier's lane count.
pub const PARALLEL_CHUNK_SIZE: usize = 1 << 14;

pub trait SimdAbs {
    type Output;

    fn simd_abs(self) -> Self::Output;
    fn par_simd_abs(self) -> Self::Output;
    fn scalar_abs(self) -> Self::Output;
}

pub trait SimdSqrt {
    type Output;

    fn simd_sqrt(self) -> Self::Output;
    fn par_simd_sqrt(self) -> Self::Output;
    fn scalar_sqrt(self) -> Self::Output;
}

pub trait SimdAdd<Rhs = Self> {
    type Output;

    fn simd_add(self, rhs: Rhs) -> Self::Output;
    fn par_simd_add(self, rhs: Rhs) -> Self::Output;
    fn scalar_add(self, rhs: Rhs) -> Self::Output;
}

pub trait SimdMul<Rhs = Self> {
    type Output;

    fn simd_mul(self, rhs: Rhs) -> Self::Output;
    fn par_simd_mul(self, rhs: Rhs) -> Self::Output;
    fn scalar_mul(self, rhs: Rhs) -> Self::Output;
}

/// Element-wise `a > b ? a : b`, built from a comparison mask and a blend.
///
/// A `NaN` in `a` never wins, so `b` is returned for that element.
pub trait SimdMax<Rhs = Self> {
    type Output;

    fn simd_max(self, rhs: Rhs) -> Self::Output;
    fn par_simd_max(self, rhs: Rhs) -> Self::Output;
    fn scalar_max(self, rhs: Rhs) -> Self::Output;
}

/// Element-wise `self + b * c` with a single rounding.
pub trait SimdFmadd<Rhs = Self> {
    type Output;

    fn simd_fmadd(self, b: Rhs, c: Rhs) -> Self::Output;
    fn par_simd_fmadd(self, b: Rhs, c: Rhs) -> Self::Output;
    fn scalar_fmadd(self, b: Rhs, c: Rhs) -> Self::Output;
}

// Lane operations shared by the vector body and the scalar tail.

trait UnaryOp: Copy + Send + Sync {
    fn apply<V: SimdDouble>(self, a: V) -> V;
    fn scalar(self, a: f64) -> f64;
}

trait BinaryOp: Copy + Send + Sync {
    fn apply<V: SimdDouble>(self, a: V, b: V) -> V;
    fn scalar(self, a: f64, b: f64) -> f64;
}

#[derive(Clone, Copy)]
struct Abs;

impl UnaryOp for Abs {
    #[inline(always)]
    fn apply<V: SimdDouble>(self, a: V) -> V {
        a.abs()
    }

    #[inline(always)]
    fn scalar(self, a: f64) -> f64 {
        a.abs()
    }
}

#[derive(Clone, Copy)]
struct Sqrt;

impl UnaryOp for Sqrt {
    #[inline(always)]
    fn apply<V: SimdDouble>(self, a: V) -> V {
        a.sqrt()
    }

    #[inline(always)]
    fn scalar(self, a: f64) -> f64 {
        a.sqrt()
    }
}

#[derive(Clone, Copy)]
struct Plus;

impl BinaryOp for Plus {
    #[inline(always)]
    fn apply<V: SimdDouble>(self, a: V, b: V) -> V {
        a + b
    }

    #[inline(always)]
    fn scalar(self, a: f64, b: f64) -> f64 {
        a + b
    }
}

#[derive(Clone, Copy)]
struct Times;

impl BinaryOp for Times {
    #[inline(always)]
    fn apply<V: SimdDouble>(self, a: V, b: V) -> V {
        a * b
    }

    #[inline(always)]
    fn scalar(self, a: f64, b: f64) -> f64 {
        a * b
    }
}

#[derive(Clone, Copy)]
struct Max;

impl BinaryOp for Max {
    #[inline(always)]
    fn apply<V: SimdDouble>(self, a: V, b: V) -> V {
        b.blend(a, a.gt_elements(b))
    }

    #[inline(always)]
    fn scalar(self, a: f64, b: f64) -> f64 {
        if a > b {
            a
        } else {
            b
        }
    }
}

fn check_len(op: &str, expected: usize, lens: &[usize]) -> Result<()> {
    match lens.iter().find(|&&len| len != expected) {
        Some(len) => Err(validation_error(format!(
            "{op}: input slices must have same length ({expected} != {len})"
        ))),
        None => Ok(()),
    }
}

// Processes whole `V::LANES` blocks and returns how many elements were done.
#[inline(always)]
fn unary_blocks<V: SimdDouble, O: UnaryOp>(op: O, a: &[f64], c: &mut [f64]) -> usize {
    let done = a.len() - a.len() % V::LANES;

    for (src, dst) in a[..done]
        .chunks_exact(V::LANES)
        .zip(c[..done].chunks_exact_mut(V::LANES))
    {
        // SAFETY: both chunks hold exactly `V::LANES` elements.
        unsafe { op.apply(V::load(src.as_ptr())).store(dst.as_mut_ptr()) };
    }

    done
}

#[inline(always)]
fn unary_into<O: UnaryOp>(op: O, a: &[f64], c: &mut [f64]) {
    debug_assert_eq!(a.len(), c.len());

    let done = unary_blocks::<VectorDouble, O>(op, a, c);
    unary_blocks::<F64x1, O>(op, &a[done..], &mut c[done..]);
}

#[inline(always)]
fn binary_blocks<V: SimdDouble, O: BinaryOp>(op: O, a: &[f64], b: &[f64], c: &mut [f64]) -> usize {
    let done = a.len() - a.len() % V::LANES;

    for ((x, y), dst) in a[..done]
        .chunks_exact(V::LANES)
        .zip(b[..done].chunks_exact(V::LANES))
        .zip(c[..done].chunks_exact_mut(V::LANES))
    {
        // SAFETY: all three chunks hold exactly `V::LANES` elements.
        unsafe {
            op.apply(V::load(x.as_ptr()), V::load(y.as_ptr()))
                .store(dst.as_mut_ptr())
        };
    }

    done
}

#[inline(always)]
fn binary_into<O: BinaryOp>(op: O, a: &[f64], b: &[f64], c: &mut [f64]) {
    debug_assert!(a.len() == b.len() && a.len() == c.len());

    let done = binary_blocks::<VectorDouble, O>(op, a, b, c);
    binary_blocks::<F64x1, O>(op, &a[done..], &b[done..], &mut c[done..]);
}

#[inline(always)]
fn fmadd_blocks<V: SimdDouble>(a: &[f64], b: &[f64], c: &[f64], d: &mut [f64]) -> usize {
    let done = a.len() - a.len() % V::LANES;

    for (((x, y), z), dst) in a[..done]
        .chunks_exact(V::LANES)
        .zip(b[..done].chunks_exact(V::LANES))
        .zip(c[..done].chunks_exact(V::LANES))
        .zip(d[..done].chunks_exact_mut(V::LANES))
    {
        // SAFETY: all four chunks hold exactly `V::LANES` elements.
        unsafe {
            V::load(x.as_ptr())
                .fmadd(V::load(y.as_ptr()), V::load(z.as_ptr()))
                .store(dst.as_mut_ptr())
        };
    }

    done
}

#[inline(always)]
fn fmadd_into(a: &[f64], b: &[f64], c: &[f64], d: &mut [f64]) {
    debug_assert!(a.len() == b.len() && a.len() == c.len() && a.len() == d.len());

    let done = fmadd_blocks::<VectorDouble>(a, b, c, d);
    fmadd_blocks::<F64x1>(&a[done..], &b[done..], &c[done..], &mut d[done..]);
}

fn simd_unary<O: UnaryOp>(op: O, a: &[f64]) -> Vec<f64> {
    let mut c = vec![0.0; a.len()];
    unary_into(op, a, &mut c);
    c
}

fn par_simd_unary<O: UnaryOp>(name: &str, op: O, a: &[f64]) -> Vec<f64> {
    if a.len() <= PARALLEL_SIMD_THRESHOLD {
        trace!("{name}: {} elements, sequential {ACTIVE_TIER}", a.len());
        return simd_unary(op, a);
    }

    trace!("{name}: {} elements, parallel {ACTIVE_TIER}", a.len());

    let mut c = vec![0.0; a.len()];
    c.par_chunks_mut(PARALLEL_CHUNK_SIZE)
        .zip(a.par_chunks(PARALLEL_CHUNK_SIZE))
        .for_each(|(dst, src)| unary_into(op, src, dst));
    c
}

fn simd_binary<O: BinaryOp>(name: &str, op: O, a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    check_len(name, a.len(), &[b.len()])?;

    let mut c = vec![0.0; a.len()];
    binary_into(op, a, b, &mut c);
    Ok(c)
}

fn par_simd_binary<O: BinaryOp>(name: &str, op: O, a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    if a.len() <= PARALLEL_SIMD_THRESHOLD {
        trace!("{name}: {} elements, sequential {ACTIVE_TIER}", a.len());
        return simd_binary(name, op, a, b);
    }

    check_len(name, a.len(), &[b.len()])?;
    trace!("{name}: {} elements, parallel {ACTIVE_TIER}", a.len());

    let mut c = vec![0.0; a.len()];
    c.par_chunks_mut(PARALLEL_CHUNK_SIZE)
        .zip(a.par_chunks(PARALLEL_CHUNK_SIZE))
        .zip(b.par_chunks(PARALLEL_CHUNK_SIZE))
        .for_each(|((dst, x), y)| binary_into(op, x, y, dst));
    Ok(c)
}

fn scalar_binary<O: BinaryOp>(name: &str, op: O, a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    check_len(name, a.len(), &[b.len()])?;

    Ok(a.iter().zip(b).map(|(&x, &y)| op.scalar(x, y)).collect())
}

impl SimdAbs for &[f64] {
    type Output = Vec<f64>;

    #[inline(always)]
    fn simd_abs(self) -> Self::Output {
        simd_unary(Abs, self)
    }

    #[inline(always)]
    fn par_simd_abs(self) -> Self::Output {
        par_simd_unary("par_simd_abs", Abs, self)
    }

    #[inline(always)]
    fn scalar_abs(self) -> Self::Output {
        self.iter().map(|&x| Abs.scalar(x)).collect()
    }
}

impl SimdSqrt for &[f64] {
    type Output = Vec<f64>;

    #[inline(always)]
    fn simd_sqrt(self) -> Self::Output {
        simd_unary(Sqrt, self)
    }

    #[inline(always)]
    fn par_simd_sqrt(self) -> Self::Output {
        par_simd_unary("par_simd_sqrt", Sqrt, self)
    }

    #[inline(always)]
    fn scalar_sqrt(self) -> Self::Output {
        self.iter().map(|&x| Sqrt.scalar(x)).collect()
    }
}

impl SimdAdd for &[f64] {
    type Output = Result<Vec<f64>>;

    #[inline(always)]
    fn simd_add(self, rhs: Self) -> Self::Output {
        simd_binary("simd_add", Plus, self, rhs)
    }

    #[inline(always)]
    fn par_simd_add(self, rhs: Self) -> Self::Output {
        par_simd_binary("par_simd_add", Plus, self, rhs)
    }

    #[inline(always)]
    fn scalar_add(self, rhs: Self) -> Self::Output {
        scalar_binary("scalar_add", Plus, self, rhs)
    }
}

impl SimdMul for &[f64] {
    type Output = Result<Vec<f64>>;

    #[inline(always)]
    fn simd_mul(self, rhs: Self) -> Self::Output {
        simd_binary("simd_mul", Times, self, rhs)
    }

    #[inline(always)]
    fn par_simd_mul(self, rhs: Self) -> Self::Output {
        par_simd_binary("par_simd_mul", Times, self, rhs)
    }

    #[inline(always)]
    fn scalar_mul(self, rhs: Self) -> Self::Output {
        scalar_binary("scalar_mul", Times, self, rhs)
    }
}

impl SimdMax for &[f64] {
    type Output = Result<Vec<f64>>;

    #[inline(always)]
    fn simd_max(self, rhs: Self) -> Self::Output {
        simd_binary("simd_max", Max, self, rhs)
    }

    #[inline(always)]
    fn par_simd_max(self, rhs: Self) -> Self::Output {
        par_simd_binary("par_simd_max", Max, self, rhs)
    }

    #[inline(always)]
    fn scalar_max(self, rhs: Self) -> Self::Output {
        scalar_binary("scalar_max", Max, self, rhs)
    }
}

impl SimdFmadd for &[f64] {
    type Output = Result<Vec<f64>>;

    fn simd_fmadd(self, b: Self, c: Self) -> Self::Output {
        check_len("simd_fmadd", self.len(), &[b.len(), c.len()])?;

        let mut d = vec![0.0; self.len()];
        fmadd_into(self, b, c, &mut d);
        Ok(d)
    }

    fn par_simd_fmadd(self, b: Self, c: Self) -> Self::Output {
        if self.len() <= PARALLEL_SIMD_THRESHOLD {
            trace!("par_simd_fmadd: {} elements, sequential {ACTIVE_TIER}", self.len());
            return self.simd_fmadd(b, c);
        }

        check_len("par_simd_fmadd", self.len(), &[b.len(), c.len()])?;
        trace!("par_simd_fmadd: {} elements, parallel {ACTIVE_TIER}", self.len());

        let mut d = vec![0.0; self.len()];
        d.par_chunks_mut(PARALLEL_CHUNK_SIZE)
            .zip(self.par_chunks(PARALLEL_CHUNK_SIZE))
            .zip(b.par_chunks(PARALLEL_CHUNK_SIZE))
            .zip(c.par_chunks(PARALLEL_CHUNK_SIZE))
            .for_each(|(((dst, x), y), z)| fmadd_into(x, y, z, dst));
        Ok(d)
    }

    fn scalar_fmadd(self, b: Self, c: Self) -> Self::Output {
        check_len("scalar_fmadd", self.len(), &[b.len(), c.len()])?;

        Ok(self
            .iter()
            .zip(b)
            .zip(c)
            .map(|((&x, &y), &z)| y.mul_add(z, x))
            .collect())
    }
}

impl SimdAbs for Vec<f64> {
    type Output = Vec<f64>;

    #[inline(always)]
    fn simd_abs(self) -> Self::Output {
        self.as_slice().simd_abs()
    }

    #[inline(always)]
    fn par_simd_abs(self) -> Self::Output {
        self.as_slice().par_simd_abs()
    }

    #[inline(always)]
    fn scalar_abs(self) -> Self::Output {
        self.as_slice().scalar_abs()
    }
}

impl SimdSqrt for Vec<f64> {
    type Output = Vec<f64>;

    #[inline(always)]
    fn simd_sqrt(self) -> Self::Output {
        self.as_slice().simd_sqrt()
    }

    #[inline(always)]
    fn par_simd_sqrt(self) -> Self::Output {
        self.as_slice().par_simd_sqrt()
    }

    #[inline(always)]
    fn scalar_sqrt(self) -> Self::Output {
        self.as_slice().scalar_sqrt()
    }
}

impl SimdAdd<Vec<f64>> for Vec<f64> {
    type Output = Result<Vec<f64>>;

    #[inline(always)]
    fn simd_add(self, rhs: Vec<f64>) -> Self::Output {
        self.as_slice().simd_add(rhs.as_slice())
    }

    #[inline(always)]
    fn par_simd_add(self, rhs: Vec<f64>) -> Self::Output {
        self.as_slice().par_simd_add(rhs.as_slice())
    }

    #[inline(always)]
    fn scalar_add(self, rhs: Vec<f64>) -> Self::Output {
        self.as_slice().scalar_add(rhs.as_slice())
    }
}

impl SimdMul<Vec<f64>> for Vec<f64> {
    type Output = Result<Vec<f64>>;

    #[inline(always)]
    fn simd_mul(self, rhs: Vec<f64>) -> Self::Output {
        self.as_slice().simd_mul(rhs.as_slice())
    }

    #[inline(always)]
    fn par_simd_mul(self, rhs: Vec<f64>) -> Self::Output {
        self.as_slice().par_simd_mul(rhs.as_slice())
    }

    #[inline(always)]
    fn scalar_mul(self, rhs: Vec<f64>) -> Self::Output {
        self.as_slice().scalar_mul(rhs.as_slice())
    }
}

impl SimdMax<Vec<f64>> for Vec<f64> {
    type Output = Result<Vec<f64>>;

    #[inline(always)]
    fn simd_max(self, rhs: Vec<f64>) -> Self::Output {
        self.as_slice().simd_max(rhs.as_slice())
    }

    #[inline(always)]
    fn par_simd_max(self, rhs: Vec<f64>) -> Self::Output {
        self.as_slice().par_simd_max(rhs.as_slice())
    }

    #[inline(always)]
    fn scalar_max(self, rhs: Vec<f64>) -> Self::Output {
        self.as_slice().scalar_max(rhs.as_slice())
    }
}

impl SimdFmadd<Vec<f64>> for Vec<f64> {
    type Output = Result<Vec<f64>>;

    #[inline(always)]
    fn simd_fmadd(self, b: Vec<f64>, c: Vec<f64>) -> Self::Output {
        self.as_slice().simd_fmadd(b.as_slice(), c.as_slice())
    }

    #[inline(always)]
    fn par_simd_fmadd(self, b: Vec<f64>, c: Vec<f64>) -> Self::Output {
        self.as_slice().par_simd_fmadd(b.as_slice(), c.as_slice())
    }

    #[inline(always)]
    fn scalar_fmadd(self, b: Vec<f64>, c: Vec<f64>) -> Self::Output {
        self.as_slice().scalar_fmadd(b.as_slice(), c.as_slice())
    }
}
