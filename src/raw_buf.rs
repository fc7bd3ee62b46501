use alloc::alloc::{Layout, alloc, dealloc, handle_alloc_error};
use core::{marker::PhantomData, ptr::NonNull};

use crate::error::TryReserveError;
use crate::utils::{IsZST, cold_path};

/// An owned, uninitialized allocation with room for `cap` values of `T`.
///
/// `RawBuf` knows nothing about which slots are live. Dropping it frees the
/// memory without running any element destructor, so the owner must destroy
/// its live elements first.
///
/// For zero sized types nothing is ever allocated; the capacity is kept only
/// as a logical count and the pointer stays dangling.
pub(crate) struct RawBuf<T> {
    ptr: NonNull<T>,
    cap: usize,
    _marker: PhantomData<T>,
}

impl<T> RawBuf<T> {
    /// An empty buffer. Does not allocate.
    #[inline]
    pub(crate) const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: 0,
            _marker: PhantomData,
        }
    }

    /// Allocates room for exactly `capacity` elements.
    ///
    /// A `capacity` of zero returns [`RawBuf::new`].
    pub(crate) fn try_allocate(capacity: usize) -> Result<Self, TryReserveError> {
        if capacity == 0 {
            return Ok(Self::new());
        }

        if T::IS_ZST {
            return Ok(Self {
                ptr: NonNull::dangling(),
                cap: capacity,
                _marker: PhantomData,
            });
        }

        let layout = Layout::array::<T>(capacity).map_err(|_| TryReserveError::CapacityOverflow)?;

        // SAFETY: `layout` has a non-zero size, `T` is not zero sized and `capacity > 0`.
        let ptr = unsafe { alloc(layout) } as *mut T;

        match NonNull::new(ptr) {
            Some(ptr) => Ok(Self {
                ptr,
                cap: capacity,
                _marker: PhantomData,
            }),
            None => {
                cold_path();
                Err(TryReserveError::AllocError { layout })
            }
        }
    }

    /// Infallible form of [`RawBuf::try_allocate`].
    ///
    /// # Panics
    /// Panics on capacity overflow. Allocation failure goes through [`handle_alloc_error`].
    #[inline]
    pub(crate) fn allocate(capacity: usize) -> Self {
        match Self::try_allocate(capacity) {
            Ok(buf) => buf,
            Err(err) => handle_error(err),
        }
    }

    #[inline(always)]
    pub(crate) const fn ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    #[inline(always)]
    pub(crate) const fn capacity(&self) -> usize {
        self.cap
    }

    /// Whether this buffer owns memory obtained from the global allocator.
    #[inline(always)]
    pub(crate) const fn is_allocated(&self) -> bool {
        !T::IS_ZST && self.cap > 0
    }
}

impl<T> Drop for RawBuf<T> {
    fn drop(&mut self) {
        if self.is_allocated() {
            // SAFETY: the layout was valid when the buffer was allocated with this capacity.
            unsafe {
                let layout = Layout::array::<T>(self.cap).unwrap_unchecked();
                dealloc(self.ptr.as_ptr() as *mut u8, layout);
            }
        }
    }
}

/// Turns an allocation error into the same failure `alloc::vec::Vec` produces.
#[cold]
#[inline(never)]
pub(crate) fn handle_error(err: TryReserveError) -> ! {
    match err {
        TryReserveError::CapacityOverflow => panic!("capacity overflow"),
        TryReserveError::AllocError { layout } => handle_alloc_error(layout),
    }
}
