use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

use log::debug;

use crate::error::{allocation_error, layout_error, Result};
use crate::simd::{SimdDouble, VectorDouble};

/// Heap buffer of `f64` whose start is aligned for [`VectorDouble`]'s aligned
/// load and store paths.
///
/// Dereferences to `[f64]`; every chunk of `LANE_COUNT` elements starting at a
/// multiple of `LANE_COUNT` is suitably aligned.
///
/// ```rust
/// use simdvec::simd::{utils::AlignedBuffer, SimdDouble, VectorDouble, LANE_COUNT};
///
/// let buf = AlignedBuffer::from_slice(&[1.0; 8]).unwrap();
/// assert!(VectorDouble::is_aligned(buf.as_ptr()));
///
/// let v = unsafe { VectorDouble::load_aligned(buf.as_ptr()) };
/// assert_eq!(v.extract(LANE_COUNT - 1), 1.0);
/// ```
pub struct AlignedBuffer {
    ptr: NonNull<f64>,
    len: usize,
    alignment: usize,
}

// SAFETY: the buffer uniquely owns its allocation, like a `Vec<f64>`.
unsafe impl Send for AlignedBuffer {}
unsafe impl Sync for AlignedBuffer {}

impl AlignedBuffer {
    /// Allocates `len` zeroed elements aligned to `VectorDouble::ALIGNMENT`.
    ///
    /// # Errors
    ///
    /// Fails if the byte size overflows or the allocator returns null.
    pub fn zeroed(len: usize) -> Result<Self> {
        Self::zeroed_with_alignment(len, VectorDouble::ALIGNMENT)
    }

    /// Allocates `len` zeroed elements aligned to `alignment` bytes.
    ///
    /// # Errors
    ///
    /// Fails with a layout error if `alignment` is not a power of two, is
    /// smaller than `f64`'s own alignment, or the byte size overflows; fails
    /// with an allocation error if the allocator returns null.
    pub fn zeroed_with_alignment(len: usize, alignment: usize) -> Result<Self> {
        if alignment < core::mem::align_of::<f64>() {
            return Err(layout_error(0, alignment, "alignment is smaller than f64's"));
        }

        let size = len
            .checked_mul(core::mem::size_of::<f64>())
            .ok_or_else(|| layout_error(usize::MAX, alignment, "size overflow"))?;

        let layout = Layout::from_size_align(size, alignment)
            .map_err(|e| layout_error(size, alignment, e.to_string()))?;

        if size == 0 {
            // `alignment` is a non-zero power of two, hence a valid aligned address.
            let ptr = NonNull::new(alignment as *mut f64)
                .ok_or_else(|| layout_error(size, alignment, "zero alignment"))?;

            return Ok(Self {
                ptr,
                len,
                alignment,
            });
        }

        let raw = unsafe { alloc_zeroed(layout) } as *mut f64;

        let ptr = NonNull::new(raw).ok_or_else(|| {
            debug!("aligned allocation of {size} bytes at {alignment}-byte alignment failed");
            allocation_error(size, alignment, "allocator returned null")
        })?;

        debug!("allocated {len} f64 at {alignment}-byte alignment");

        Ok(Self {
            ptr,
            len,
            alignment,
        })
    }

    /// Copies `data` into a fresh aligned buffer.
    ///
    /// # Errors
    ///
    /// Same as [`zeroed`](Self::zeroed).
    pub fn from_slice(data: &[f64]) -> Result<Self> {
        let mut buffer = Self::zeroed(data.len())?;
        buffer.copy_from_slice(data);
        Ok(buffer)
    }

    /// Alignment of the first element in bytes.
    pub fn alignment(&self) -> usize {
        self.alignment
    }
}

impl Deref for AlignedBuffer {
    type Target = [f64];

    fn deref(&self) -> &Self::Target {
        // SAFETY: `ptr` is valid for `len` initialized elements (or dangling and
        // aligned when `len` is zero).
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl DerefMut for AlignedBuffer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: see `Deref`; `&mut self` guarantees exclusive access.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl Drop for AlignedBuffer {
    fn drop(&mut self) {
        let size = self.len * core::mem::size_of::<f64>();
        if size == 0 {
            return;
        }

        // SAFETY: the same size/alignment pair was accepted by `Layout` on allocation.
        unsafe {
            let layout = Layout::from_size_align_unchecked(size, self.alignment);
            dealloc(self.ptr.as_ptr() as *mut u8, layout);
        }
    }
}

impl fmt::Debug for AlignedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedBuffer")
            .field("alignment", &self.alignment)
            .field("data", &self.deref())
            .finish()
    }
}
