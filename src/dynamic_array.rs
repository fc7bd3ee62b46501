use alloc::{boxed::Box, vec::Vec};
use core::{
    fmt,
    iter::FusedIterator,
    mem::{self, ManuallyDrop},
    ops::RangeBounds,
    ptr, slice,
};

use crate::error::TryReserveError;
use crate::raw_buf::{self, RawBuf};
use crate::utils::{cold_path, split_range_bound};

/// A contiguous growable array that owns its heap buffer.
///
/// `DynamicArray` keeps its live elements in slots `[0, len)` of a single
/// allocation sized for `capacity` elements. Slots `[len, capacity)` are
/// allocated but uninitialized.
///
/// # Growth
///
/// Appending to a full array reallocates to `max(1, capacity * 2)`, so a
/// sequence of `n` pushes from empty moves each element O(1) times on average.
/// An array filled only by single pushes from empty sees the capacities
/// `0, 1, 2, 4, 8, ...`; `reserve`, `extend` and `extend_from_slice` may size
/// the buffer exactly, and doubling then continues from that capacity.
///
/// # Panic safety
///
/// Every operation documents what the array looks like if it unwinds:
///
/// | Operation | Complexity | On panic |
/// |-----------|------------|----------|
/// | [`new`](DynamicArray::new), [`len`](DynamicArray::len), [`capacity`](DynamicArray::capacity), [`swap_with`](DynamicArray::swap_with) | O(1) | cannot panic |
/// | [`push`](DynamicArray::push), [`push_clone`](DynamicArray::push_clone) | O(1) amortized | unchanged |
/// | [`clone`](Clone::clone), [`clone_from`](Clone::clone_from), [`extend_from_slice`](DynamicArray::extend_from_slice) | O(n) | unchanged |
/// | [`reserve`](DynamicArray::reserve), [`shrink_to_fit`](DynamicArray::shrink_to_fit) | O(n) | unchanged |
/// | [`insert`](DynamicArray::insert), [`erase`](DynamicArray::erase) | O(n) | valid, content unspecified |
/// | [`pop_back`](DynamicArray::pop_back), [`truncate`](DynamicArray::truncate), [`clear`](DynamicArray::clear), drop | O(n) | only if an element's `Drop` panics |
///
/// Panics raised by `T::clone` are propagated after any partially built
/// state has been unwound. Allocation failure aborts through
/// [`handle_alloc_error`](alloc::alloc::handle_alloc_error), like [`Vec`];
/// use the `try_*` methods to observe it as a [`TryReserveError`] instead.
///
/// # Positions
///
/// [`insert`](DynamicArray::insert) and [`erase`](DynamicArray::erase) return
/// plain indices. An index obtained this way only means something until the
/// next call that mutates the array.
///
/// # Examples
///
/// ```
/// use dynarray::DynamicArray;
///
/// let mut arr = DynamicArray::new();
/// arr.push(1);
/// arr.push(2);
/// arr.push(3);
/// assert_eq!(arr, [1, 2, 3]);
/// assert_eq!(arr.capacity(), 4);
///
/// arr.erase_at(1);
/// assert_eq!(arr, [1, 3]);
///
/// arr.insert(1, 9);
/// assert_eq!(arr, [1, 9, 3]);
/// ```
pub struct DynamicArray<T> {
    buf: RawBuf<T>,
    len: usize,
}

unsafe impl<T> Send for DynamicArray<T> where T: Send {}
unsafe impl<T> Sync for DynamicArray<T> where T: Sync {}

impl<T> Drop for DynamicArray<T> {
    fn drop(&mut self) {
        // SAFETY: `[0, len)` are live. `buf` frees the memory afterwards, even if a destructor panics.
        unsafe { destroy_reverse(self.buf.ptr(), self.len) }
    }
}

/// Drops `len` live elements starting at `base`, highest index first.
///
/// If one destructor panics the remaining elements are still dropped before
/// the panic continues.
///
/// # Safety
/// `base..base + len` must be live and must not be used again as live values.
unsafe fn destroy_reverse<T>(base: *mut T, len: usize) {
    struct Guard<T> {
        base: *mut T,
        remaining: usize,
    }

    impl<T> Drop for Guard<T> {
        // Runs with `remaining > 0` only while unwinding out of a destructor.
        fn drop(&mut self) {
            while self.remaining > 0 {
                self.remaining -= 1;
                // SAFETY: slots below the panicking one are still live.
                unsafe { ptr::drop_in_place(self.base.add(self.remaining)) }
            }
        }
    }

    if !mem::needs_drop::<T>() {
        return;
    }

    let mut guard = Guard {
        base,
        remaining: len,
    };
    while guard.remaining > 0 {
        guard.remaining -= 1;
        // SAFETY: the caller guarantees the range is live; each slot is dropped once.
        unsafe { ptr::drop_in_place(guard.base.add(guard.remaining)) }
    }
}

/// Clones `src` into the uninitialized slots starting at `dst`, in index order.
///
/// If a clone panics, the clones already written are dropped (last first)
/// before the panic continues, so `dst` is back to fully uninitialized.
///
/// # Safety
/// `dst` must be valid for `src.len()` writes and must not overlap `src`.
unsafe fn clone_into_uninit<T: Clone>(src: &[T], dst: *mut T) {
    struct Partial<T> {
        dst: *mut T,
        written: usize,
    }

    impl<T> Drop for Partial<T> {
        fn drop(&mut self) {
            // SAFETY: exactly the first `written` slots were initialized.
            unsafe { destroy_reverse(self.dst, self.written) }
        }
    }

    let mut partial = Partial { dst, written: 0 };
    for item in src {
        // SAFETY: `written < src.len()`, within the caller's writable range.
        unsafe { ptr::write(partial.dst.add(partial.written), item.clone()) };
        partial.written += 1;
    }
    mem::forget(partial);
}

/// Creates a [`DynamicArray`] containing the arguments.
///
/// The syntax is similar to [`vec!`](https://doc.rust-lang.org/std/macro.vec.html).
/// The empty form is equal to [`DynamicArray::new`] and does not allocate.
///
/// # Examples
///
/// ```
/// # use dynarray::{dynarray, DynamicArray};
/// let arr: DynamicArray<String> = dynarray![];
/// assert_eq!(arr.capacity(), 0);
///
/// let arr = dynarray![7; 3]; // Needs `Clone`.
/// assert_eq!(arr, [7, 7, 7]);
///
/// let arr = dynarray![1, 2, 3, 4];
/// assert_eq!(arr.capacity(), 4);
/// ```
#[macro_export]
macro_rules! dynarray {
    [] => { $crate::DynamicArray::new() };
    [$elem:expr; $n:expr] => { $crate::DynamicArray::from_elem($elem, $n) };
    [$($item:expr),+ $(,)?] => { $crate::DynamicArray::from([ $($item),+ ]) };
}

impl<T> DynamicArray<T> {
    /// Constructs a new, empty `DynamicArray`.
    ///
    /// The array will not allocate until elements are pushed onto it.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dynarray::DynamicArray;
    /// let arr: DynamicArray<i32> = DynamicArray::new();
    /// assert_eq!(arr.len(), 0);
    /// assert_eq!(arr.capacity(), 0);
    /// ```
    #[inline]
    pub const fn new() -> Self {
        Self {
            buf: RawBuf::new(),
            len: 0,
        }
    }

    /// Constructs a new, empty `DynamicArray` with room for exactly `capacity` elements.
    ///
    /// # Panics
    /// Panics if the capacity overflows `isize::MAX` bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dynarray::DynamicArray;
    /// let mut arr = DynamicArray::with_capacity(10);
    /// assert_eq!(arr.capacity(), 10);
    ///
    /// for i in 0..10 {
    ///     arr.push(i);
    /// }
    /// assert_eq!(arr.capacity(), 10);
    /// ```
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: RawBuf::allocate(capacity),
            len: 0,
        }
    }

    /// Fallible form of [`DynamicArray::with_capacity`].
    ///
    /// # Errors
    /// Returns an error if the capacity overflows or the allocator reports failure.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        let buf = RawBuf::try_allocate(capacity).inspect_err(|err| {
            tracing::debug!(capacity, error = %err, "allocation failed");
        })?;
        Ok(Self { buf, len: 0 })
    }

    /// Returns the number of elements in the array.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the array contains no elements.
    ///
    /// # Examples
    /// ```
    /// # use dynarray::DynamicArray;
    /// let mut arr = DynamicArray::new();
    /// assert!(arr.is_empty());
    ///
    /// arr.push(1);
    /// assert!(!arr.is_empty());
    /// ```
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of elements the array can hold without reallocating.
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Returns a raw pointer to the buffer, or a dangling pointer if nothing is allocated.
    ///
    /// Only the first [`len`](DynamicArray::len) elements behind it are initialized.
    /// The pointer is invalidated by any call that reallocates.
    #[inline(always)]
    pub const fn as_ptr(&self) -> *const T {
        self.buf.ptr()
    }

    /// Returns a raw mutable pointer to the buffer, or a dangling pointer if nothing is allocated.
    ///
    /// Only the first [`len`](DynamicArray::len) elements behind it are initialized.
    /// The pointer is invalidated by any call that reallocates.
    #[inline(always)]
    pub const fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.ptr()
    }

    /// Extracts a slice of the live elements.
    #[inline(always)]
    pub const fn as_slice(&self) -> &[T] {
        // SAFETY: `[0, len)` are initialized and the pointer is non-null and aligned.
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len) }
    }

    /// Extracts a mutable slice of the live elements.
    #[inline(always)]
    pub const fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: `[0, len)` are initialized and the pointer is non-null and aligned.
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), self.len) }
    }

    /// Returns a reference to the first element.
    ///
    /// # Panics
    /// Panics if the array is empty.
    ///
    /// # Examples
    /// ```
    /// # use dynarray::dynarray;
    /// let arr = dynarray![10, 20, 30];
    /// assert_eq!(*arr.front(), 10);
    /// ```
    #[inline]
    pub fn front(&self) -> &T {
        assert!(self.len > 0, "`front` called on an empty array");
        // SAFETY: checked above.
        unsafe { &*self.as_ptr() }
    }

    /// Returns a mutable reference to the first element.
    ///
    /// # Panics
    /// Panics if the array is empty.
    #[inline]
    pub fn front_mut(&mut self) -> &mut T {
        assert!(self.len > 0, "`front_mut` called on an empty array");
        // SAFETY: checked above.
        unsafe { &mut *self.as_mut_ptr() }
    }

    /// Returns a reference to the last element.
    ///
    /// # Panics
    /// Panics if the array is empty.
    ///
    /// # Examples
    /// ```
    /// # use dynarray::dynarray;
    /// let arr = dynarray![10, 20, 30];
    /// assert_eq!(*arr.back(), 30);
    /// ```
    #[inline]
    pub fn back(&self) -> &T {
        assert!(self.len > 0, "`back` called on an empty array");
        // SAFETY: checked above.
        unsafe { &*self.as_ptr().add(self.len - 1) }
    }

    /// Returns a mutable reference to the last element.
    ///
    /// # Panics
    /// Panics if the array is empty.
    #[inline]
    pub fn back_mut(&mut self) -> &mut T {
        assert!(self.len > 0, "`back_mut` called on an empty array");
        let last = self.len - 1;
        // SAFETY: checked above.
        unsafe { &mut *self.as_mut_ptr().add(last) }
    }

    /// Capacity used when a push finds the array full.
    #[inline]
    fn next_capacity(&self) -> Result<usize, TryReserveError> {
        match self.capacity() {
            0 => Ok(1),
            cap => cap.checked_mul(2).ok_or(TryReserveError::CapacityOverflow),
        }
    }

    /// Moves the live elements into a fresh buffer of exactly `new_capacity` slots.
    ///
    /// The fresh buffer is allocated before anything else is touched, so on
    /// error the array is unchanged. Relocating elements is a bitwise copy and
    /// cannot fail once the allocation exists.
    fn try_realloc(&mut self, new_capacity: usize) -> Result<(), TryReserveError> {
        debug_assert!(new_capacity >= self.len);

        let mut fresh = RawBuf::try_allocate(new_capacity)?;

        // SAFETY: both buffers hold at least `len` slots and are distinct allocations.
        unsafe {
            ptr::copy_nonoverlapping(self.buf.ptr(), fresh.ptr(), self.len);
        }

        tracing::trace!(
            len = self.len,
            old_capacity = self.buf.capacity(),
            new_capacity,
            "reallocated buffer"
        );

        // `fresh` now owns the old allocation, whose elements were moved out.
        mem::swap(&mut self.buf, &mut fresh);
        Ok(())
    }

    #[inline]
    fn realloc(&mut self, new_capacity: usize) {
        if let Err(err) = self.try_realloc(new_capacity) {
            raw_buf::handle_error(err);
        }
    }

    #[inline(never)]
    fn try_grow_one(&mut self) -> Result<(), TryReserveError> {
        let new_capacity = self.next_capacity()?;
        self.try_realloc(new_capacity)
    }

    /// Appends an element to the back of the array.
    ///
    /// If the array is full, its capacity doubles (or becomes 1 when empty)
    /// before the element is written.
    ///
    /// # Panics
    /// Panics if the new capacity overflows.
    /// If this panics or aborts, the array is unchanged.
    ///
    /// # Time complexity
    /// O(1) amortized, O(n) when it reallocates.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dynarray::DynamicArray;
    /// let mut arr = DynamicArray::new();
    /// let mut caps = vec![];
    /// for i in 0..5 {
    ///     arr.push(i);
    ///     caps.push(arr.capacity());
    /// }
    /// assert_eq!(caps, [1, 2, 4, 4, 8]);
    /// ```
    #[inline]
    pub fn push(&mut self, value: T) {
        if self.len == self.capacity() {
            cold_path();
            if let Err(err) = self.try_grow_one() {
                raw_buf::handle_error(err);
            }
        }

        // SAFETY: `len < capacity` now.
        unsafe {
            ptr::write(self.as_mut_ptr().add(self.len), value);
        }
        self.len += 1;
    }

    /// Appends an element, reporting allocation failure instead of aborting.
    ///
    /// # Errors
    /// On failure the array is unchanged and `value` is handed back with the error.
    ///
    /// # Examples
    /// ```
    /// # use dynarray::DynamicArray;
    /// let mut arr = DynamicArray::new();
    /// assert!(arr.try_push(1).is_ok());
    /// assert_eq!(arr, [1]);
    /// ```
    pub fn try_push(&mut self, value: T) -> Result<(), (T, TryReserveError)> {
        if self.len == self.capacity() {
            cold_path();
            if let Err(err) = self.try_grow_one() {
                tracing::debug!(len = self.len, error = %err, "push failed to grow buffer");
                return Err((value, err));
            }
        }

        // SAFETY: `len < capacity` now.
        unsafe {
            ptr::write(self.as_mut_ptr().add(self.len), value);
        }
        self.len += 1;
        Ok(())
    }

    /// Ensures the capacity is at least `new_capacity`.
    ///
    /// Unlike [`Vec::reserve`], the argument is the total capacity wanted, not
    /// the number of additional elements. If `new_capacity` exceeds the current
    /// capacity the array is moved into a buffer of exactly `new_capacity`
    /// slots; otherwise nothing happens.
    ///
    /// # Panics
    /// Panics if the capacity overflows. If this panics or aborts, the array is unchanged.
    ///
    /// # Examples
    /// ```
    /// # use dynarray::DynamicArray;
    /// let mut arr = DynamicArray::<i32>::new();
    /// arr.reserve(10);
    /// assert_eq!(arr.capacity(), 10);
    ///
    /// arr.reserve(4);
    /// assert_eq!(arr.capacity(), 10);
    /// ```
    pub fn reserve(&mut self, new_capacity: usize) {
        if new_capacity > self.capacity() {
            self.realloc(new_capacity);
        }
    }

    /// Fallible form of [`DynamicArray::reserve`].
    ///
    /// # Errors
    /// On failure the array is unchanged.
    ///
    /// # Examples
    /// ```
    /// # use dynarray::{DynamicArray, TryReserveError};
    /// let mut arr: DynamicArray<u64> = DynamicArray::new();
    /// assert!(arr.try_reserve(16).is_ok());
    /// assert_eq!(arr.try_reserve(usize::MAX), Err(TryReserveError::CapacityOverflow));
    /// assert_eq!(arr.capacity(), 16);
    /// ```
    pub fn try_reserve(&mut self, new_capacity: usize) -> Result<(), TryReserveError> {
        if new_capacity > self.capacity() {
            self.try_realloc(new_capacity).inspect_err(|err| {
                tracing::debug!(new_capacity, error = %err, "reserve failed");
            })?;
        }
        Ok(())
    }

    /// Shrinks the capacity to exactly the length.
    ///
    /// An empty array releases its allocation. Calling this twice has the same
    /// effect as calling it once.
    ///
    /// # Examples
    /// ```
    /// # use dynarray::DynamicArray;
    /// let mut arr = DynamicArray::with_capacity(10);
    /// arr.push(1);
    /// arr.push(2);
    /// arr.shrink_to_fit();
    /// assert_eq!(arr.capacity(), 2);
    /// ```
    pub fn shrink_to_fit(&mut self) {
        if self.capacity() > self.len {
            self.realloc(self.len);
        }
    }

    /// Removes the last element and drops it.
    ///
    /// # Panics
    /// Panics if the array is empty.
    ///
    /// # Examples
    /// ```
    /// # use dynarray::dynarray;
    /// let mut arr = dynarray![1, 9, 3];
    /// arr.pop_back();
    /// assert_eq!(arr, [1, 9]);
    /// ```
    #[inline]
    pub fn pop_back(&mut self) {
        assert!(self.len > 0, "`pop_back` called on an empty array");
        self.truncate(self.len - 1);
    }

    /// Removes the last element and returns it, or `None` if the array is empty.
    ///
    /// # Examples
    /// ```
    /// # use dynarray::dynarray;
    /// let mut arr = dynarray![1, 2];
    /// assert_eq!(arr.pop(), Some(2));
    /// assert_eq!(arr.pop(), Some(1));
    /// assert_eq!(arr.pop(), None);
    /// ```
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            cold_path();
            None
        } else {
            self.len -= 1;
            // SAFETY: the slot was live and is no longer counted.
            unsafe { Some(ptr::read(self.as_ptr().add(self.len))) }
        }
    }

    /// Keeps the first `len` elements and drops the rest, last first.
    ///
    /// If `len` is greater or equal to the current length, this has no effect.
    /// The capacity is not changed.
    ///
    /// # Examples
    /// ```
    /// # use dynarray::dynarray;
    /// let mut arr = dynarray![1, 2, 3, 4, 5];
    /// arr.truncate(2);
    /// assert_eq!(arr, [1, 2]);
    /// assert_eq!(arr.capacity(), 5);
    /// ```
    pub fn truncate(&mut self, len: usize) {
        if len < self.len {
            let tail = self.len - len;
            // Shorten first: a panicking destructor must not make the tail reachable again.
            self.len = len;
            // SAFETY: `[len, len + tail)` were live and are no longer counted.
            unsafe { destroy_reverse(self.as_mut_ptr().add(len), tail) }
        }
    }

    /// Drops every element, last first. The capacity is kept.
    ///
    /// # Examples
    /// ```
    /// # use dynarray::dynarray;
    /// let mut arr = dynarray![1, 2, 3];
    /// arr.clear();
    /// assert!(arr.is_empty());
    /// assert_eq!(arr.capacity(), 3);
    /// ```
    #[inline]
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Inserts `value` at `index` and returns the index it ends up at.
    ///
    /// The value is pushed at the back (growing the buffer like
    /// [`push`](DynamicArray::push)) and then swapped leftwards one slot at a time
    /// until it reaches `index`.
    ///
    /// # Panics
    /// Panics if `index > len`.
    ///
    /// # Time complexity
    /// O(n)
    ///
    /// # Examples
    /// ```
    /// # use dynarray::dynarray;
    /// let mut arr = dynarray![1, 3];
    /// let at = arr.insert(1, 9);
    /// assert_eq!(at, 1);
    /// assert_eq!(arr, [1, 9, 3]);
    /// ```
    pub fn insert(&mut self, index: usize, value: T) -> usize {
        assert!(index <= self.len, "insertion index should be <= len");

        self.push(value);

        let items = self.as_mut_slice();
        for i in (index + 1..items.len()).rev() {
            items.swap(i, i - 1);
        }
        index
    }

    /// Removes the elements in `range` and returns the index of the element
    /// that now follows the removed run.
    ///
    /// The elements after the range slide down to close the gap, then the
    /// vacated trailing slots are dropped last first. An empty range does nothing.
    /// The capacity is not changed.
    ///
    /// # Panics
    /// Panics if the start of the range is greater than its end, or if the end
    /// is greater than `len`.
    ///
    /// # Time complexity
    /// O(n)
    ///
    /// # Examples
    /// ```
    /// # use dynarray::dynarray;
    /// let mut arr = dynarray![1, 2, 3, 4, 5];
    /// let at = arr.erase(1..3);
    /// assert_eq!(at, 1);
    /// assert_eq!(arr, [1, 4, 5]);
    ///
    /// arr.erase(..);
    /// assert!(arr.is_empty());
    /// ```
    pub fn erase<R: RangeBounds<usize>>(&mut self, range: R) -> usize {
        let (start, end) = split_range_bound(&range, self.len);
        assert!(start <= end, "the start of erase range should be <= end");
        assert!(end <= self.len, "the end of erase range should be <= len");

        if start == end {
            return start;
        }

        // Slide the tail over the gap; the erased values end up at the back.
        self.as_mut_slice()[start..].rotate_left(end - start);
        self.truncate(self.len - (end - start));
        start
    }

    /// Removes the element at `index` and returns `index`.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    ///
    /// # Examples
    /// ```
    /// # use dynarray::dynarray;
    /// let mut arr = dynarray![1, 2, 3];
    /// arr.erase_at(1);
    /// assert_eq!(arr, [1, 3]);
    /// ```
    #[inline]
    pub fn erase_at(&mut self, index: usize) -> usize {
        assert!(index < self.len, "erase index should be < len");
        self.erase(index..index + 1)
    }

    /// Removes and returns the element at `index`, shifting everything after it down.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    ///
    /// # Examples
    /// ```
    /// # use dynarray::dynarray;
    /// let mut arr = dynarray!['a', 'b', 'c'];
    /// assert_eq!(arr.remove(0), 'a');
    /// assert_eq!(arr, ['b', 'c']);
    /// ```
    pub fn remove(&mut self, index: usize) -> T {
        assert!(index < self.len, "removal index should be < len");

        // SAFETY: `index < len`, so the slot is live; the tail `(index, len)` is
        // shifted down over it and `len` drops by one before anything can unwind.
        unsafe {
            let ptr = self.as_mut_ptr().add(index);
            let value = ptr::read(ptr);
            ptr::copy(ptr.add(1), ptr, self.len - index - 1);
            self.len -= 1;
            value
        }
    }

    /// Exchanges the contents of two arrays, including their buffers and capacities.
    ///
    /// Never allocates and never panics.
    ///
    /// # Examples
    /// ```
    /// # use dynarray::dynarray;
    /// let mut a = dynarray![1, 2, 3];
    /// let mut b = dynarray![4];
    /// a.swap_with(&mut b);
    /// assert_eq!(a, [4]);
    /// assert_eq!(b, [1, 2, 3]);
    /// ```
    #[inline]
    pub fn swap_with(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Moves the elements into a [`Vec`] with exactly `len` capacity.
    pub fn into_vec(self) -> Vec<T> {
        let mut this = ManuallyDrop::new(self);
        let mut vec: Vec<T> = Vec::with_capacity(this.len);

        // SAFETY: `vec` has room for `len` elements; `this` is never dropped, so
        // each element is moved once and only the allocation is released here.
        unsafe {
            ptr::copy_nonoverlapping(this.as_ptr(), vec.as_mut_ptr(), this.len);
            vec.set_len(this.len);
            this.len = 0;
            // Release our allocation; the elements now belong to `vec`.
            ptr::drop_in_place(&mut this.buf);
        }

        vec
    }

    /// Converts the array into a [`Box<[T]>`](Box).
    #[inline]
    pub fn into_boxed_slice(self) -> Box<[T]> {
        self.into_vec().into_boxed_slice()
    }
}

impl<T: Clone> DynamicArray<T> {
    /// Creates a `DynamicArray` with `num` copies of `elem` and capacity `num`.
    ///
    /// # Examples
    /// ```
    /// # use dynarray::DynamicArray;
    /// let arr = DynamicArray::from_elem("x", 3);
    /// assert_eq!(arr, ["x", "x", "x"]);
    /// ```
    pub fn from_elem(elem: T, num: usize) -> Self {
        let mut arr = Self::with_capacity(num);
        if num > 0 {
            for _ in 1..num {
                arr.push(elem.clone());
            }
            arr.push(elem);
        }
        arr
    }

    /// Appends a clone of `value`.
    ///
    /// The clone is made before the buffer is touched, so a panicking
    /// `clone` leaves the array unchanged.
    ///
    /// # Examples
    /// ```
    /// # use dynarray::DynamicArray;
    /// let name = String::from("dyn");
    /// let mut arr = DynamicArray::new();
    /// arr.push_clone(&name);
    /// assert_eq!(arr, ["dyn"]);
    /// ```
    #[inline]
    pub fn push_clone(&mut self, value: &T) {
        let value = value.clone();
        self.push(value);
    }

    /// Clones and appends every element of `other`, in order.
    ///
    /// If a clone panics, the clones already appended are dropped and the
    /// length is restored; only the capacity may have grown.
    ///
    /// # Examples
    /// ```
    /// # use dynarray::dynarray;
    /// let mut arr = dynarray![1, 2];
    /// arr.extend_from_slice(&[3, 4, 5]);
    /// assert_eq!(arr, [1, 2, 3, 4, 5]);
    /// ```
    pub fn extend_from_slice(&mut self, other: &[T]) {
        let needed = match self.len.checked_add(other.len()) {
            Some(needed) => needed,
            None => raw_buf::handle_error(TryReserveError::CapacityOverflow),
        };

        if needed > self.capacity() {
            let doubled = self.next_capacity().unwrap_or(needed);
            self.realloc(needed.max(doubled));
        }

        // SAFETY: `[len, len + other.len())` is allocated and uninitialized.
        unsafe {
            clone_into_uninit(other, self.as_mut_ptr().add(self.len));
        }
        self.len = needed;
    }
}

impl<T> Default for DynamicArray<T> {
    /// It's eq to [`DynamicArray::new`].
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for DynamicArray<T> {
    /// Clones every element, in index order, into a buffer of exactly `len` slots.
    ///
    /// If an element's `clone` panics, the clones made so far are dropped in
    /// reverse order and the new buffer is freed before the panic continues.
    ///
    /// # Examples
    /// ```
    /// # use dynarray::DynamicArray;
    /// let mut arr = DynamicArray::with_capacity(8);
    /// arr.push(1);
    /// arr.push(2);
    ///
    /// let copy = arr.clone();
    /// assert_eq!(copy, [1, 2]);
    /// assert_eq!(copy.capacity(), 2);
    /// ```
    fn clone(&self) -> Self {
        let buf = RawBuf::<T>::allocate(self.len);
        // SAFETY: `buf` has exactly `len` uninitialized slots. On panic `buf` is freed by its own drop.
        unsafe { clone_into_uninit(self.as_slice(), buf.ptr()) };
        Self { buf, len: self.len }
    }

    /// Replaces the contents with a clone of `source`.
    ///
    /// A full copy is built first and then swapped in, so a panicking clone
    /// leaves `self` unchanged. The resulting capacity equals `source.len()`.
    fn clone_from(&mut self, source: &Self) {
        let mut fresh = source.clone();
        self.swap_with(&mut fresh);
    }
}

impl<T> core::ops::Deref for DynamicArray<T> {
    type Target = [T];
    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T> core::ops::DerefMut for DynamicArray<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T: fmt::Debug> fmt::Debug for DynamicArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_slice(), f)
    }
}

impl<T> AsRef<[T]> for DynamicArray<T> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsMut<[T]> for DynamicArray<T> {
    #[inline]
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> core::borrow::Borrow<[T]> for DynamicArray<T> {
    #[inline]
    fn borrow(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> core::borrow::BorrowMut<[T]> for DynamicArray<T> {
    #[inline]
    fn borrow_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: core::hash::Hash> core::hash::Hash for DynamicArray<T> {
    #[inline]
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        core::hash::Hash::hash(self.as_slice(), state);
    }
}

impl<T, I: slice::SliceIndex<[T]>> core::ops::Index<I> for DynamicArray<T> {
    type Output = I::Output;
    #[inline]
    fn index(&self, index: I) -> &Self::Output {
        core::ops::Index::index(self.as_slice(), index)
    }
}

impl<T, I: slice::SliceIndex<[T]>> core::ops::IndexMut<I> for DynamicArray<T> {
    #[inline]
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        core::ops::IndexMut::index_mut(self.as_mut_slice(), index)
    }
}

impl<T: Ord> Ord for DynamicArray<T> {
    #[inline]
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        Ord::cmp(self.as_slice(), other.as_slice())
    }
}

impl<T: PartialOrd> PartialOrd for DynamicArray<T> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        PartialOrd::partial_cmp(self.as_slice(), other.as_slice())
    }
}

impl<T: Eq> Eq for DynamicArray<T> {}

impl<T, U> PartialEq<DynamicArray<U>> for DynamicArray<T>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &DynamicArray<U>) -> bool {
        PartialEq::eq(self.as_slice(), other.as_slice())
    }
}

impl<T, U> PartialEq<[U]> for DynamicArray<T>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &[U]) -> bool {
        PartialEq::eq(self.as_slice(), other)
    }
}

impl<T, U> PartialEq<&[U]> for DynamicArray<T>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &&[U]) -> bool {
        PartialEq::eq(self.as_slice(), *other)
    }
}

impl<T, U, const P: usize> PartialEq<[U; P]> for DynamicArray<T>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &[U; P]) -> bool {
        PartialEq::eq(self.as_slice(), other.as_slice())
    }
}

impl<T, U, const P: usize> PartialEq<&[U; P]> for DynamicArray<T>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &&[U; P]) -> bool {
        PartialEq::eq(self.as_slice(), other.as_slice())
    }
}

impl<'a, T: 'a + Clone> Extend<&'a T> for DynamicArray<T> {
    /// Clones each item and pushes it.
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().cloned());
    }
}

impl<T> Extend<T> for DynamicArray<T> {
    /// Pushes each item, reserving for the iterator's lower size bound first.
    ///
    /// # Examples
    /// ```
    /// # use dynarray::dynarray;
    /// let mut arr = dynarray![1];
    /// arr.extend([2, 3]);
    /// assert_eq!(arr, [1, 2, 3]);
    /// ```
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        if lower > self.capacity() - self.len {
            self.reserve(self.len.saturating_add(lower));
        }
        for item in iter {
            self.push(item);
        }
    }
}

impl<T> FromIterator<T> for DynamicArray<T> {
    /// # Examples
    /// ```
    /// # use dynarray::DynamicArray;
    /// let arr: DynamicArray<_> = (1..=3).collect();
    /// assert_eq!(arr, [1, 2, 3]);
    /// ```
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut arr = Self::new();
        arr.extend(iter);
        arr
    }
}

impl<T, const P: usize> From<[T; P]> for DynamicArray<T> {
    /// Moves the array's elements into a buffer of exactly `P` slots.
    fn from(value: [T; P]) -> Self {
        let value = ManuallyDrop::new(value);
        let buf = RawBuf::<T>::allocate(P);
        // SAFETY: `value` is never dropped, so each element is moved exactly once.
        unsafe { ptr::copy_nonoverlapping(value.as_ptr(), buf.ptr(), P) };
        Self { buf, len: P }
    }
}

impl<T: Clone> From<&[T]> for DynamicArray<T> {
    /// # Examples
    /// ```
    /// # use dynarray::DynamicArray;
    /// let arr = DynamicArray::from(&[1, 2, 3][..]);
    /// assert_eq!(arr, [1, 2, 3]);
    /// ```
    fn from(value: &[T]) -> Self {
        let buf = RawBuf::<T>::allocate(value.len());
        // SAFETY: `buf` has exactly `value.len()` uninitialized slots.
        unsafe { clone_into_uninit(value, buf.ptr()) };
        Self {
            buf,
            len: value.len(),
        }
    }
}

impl<T> From<Vec<T>> for DynamicArray<T> {
    /// Moves the elements into a buffer of exactly `len` slots.
    fn from(mut value: Vec<T>) -> Self {
        let len = value.len();
        let buf = RawBuf::<T>::allocate(len);
        // SAFETY: `buf` has room for `len` elements and does not overlap `value`;
        // `set_len(0)` hands ownership of the moved elements over to `buf`.
        unsafe {
            ptr::copy_nonoverlapping(value.as_ptr(), buf.ptr(), len);
            value.set_len(0);
        }
        Self { buf, len }
    }
}

impl<T> From<DynamicArray<T>> for Vec<T> {
    #[inline]
    fn from(value: DynamicArray<T>) -> Self {
        value.into_vec()
    }
}

impl<'a, T> IntoIterator for &'a DynamicArray<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynamicArray<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

/// An iterator that consumes a [`DynamicArray`] and yields its items by value.
///
/// Items not yet yielded are dropped, last first, together with the buffer
/// when the iterator is dropped.
///
/// # Examples
///
/// ```
/// # use dynarray::dynarray;
/// let arr = dynarray!["1", "2", "3"];
/// let mut iter = arr.into_iter();
///
/// assert_eq!(iter.next(), Some("1"));
/// assert_eq!(iter.next_back(), Some("3"));
/// assert_eq!(iter.as_slice(), ["2"]);
/// ```
pub struct IntoIter<T> {
    buf: RawBuf<T>,
    start: usize,
    end: usize,
}

unsafe impl<T> Send for IntoIter<T> where T: Send {}
unsafe impl<T> Sync for IntoIter<T> where T: Sync {}

impl<T> IntoIterator for DynamicArray<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        let this = ManuallyDrop::new(self);
        IntoIter {
            // SAFETY: `this` is never dropped, so the buffer has a single owner.
            buf: unsafe { ptr::read(&this.buf) },
            start: 0,
            end: this.len,
        }
    }
}

impl<T> IntoIter<T> {
    /// Returns the remaining items as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots `[start, end)` are still live.
        unsafe { slice::from_raw_parts(self.buf.ptr().add(self.start), self.end - self.start) }
    }

    /// Returns the remaining items as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: slots `[start, end)` are still live.
        unsafe { slice::from_raw_parts_mut(self.buf.ptr().add(self.start), self.end - self.start) }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.start < self.end {
            self.start += 1;
            // SAFETY: the slot was live and is now outside `[start, end)`, so it is read once.
            unsafe { Some(ptr::read(self.buf.ptr().add(self.start - 1))) }
        } else {
            None
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let v = self.end - self.start;
        (v, Some(v))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start < self.end {
            self.end -= 1;
            // SAFETY: the slot was live and is now outside `[start, end)`, so it is read once.
            unsafe { Some(ptr::read(self.buf.ptr().add(self.end))) }
        } else {
            None
        }
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    #[inline]
    fn len(&self) -> usize {
        self.end - self.start
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        let remaining = self.end - self.start;
        self.end = self.start;
        // SAFETY: the un-yielded range is live. `buf` frees the memory afterwards.
        unsafe { destroy_reverse(self.buf.ptr().add(self.start), remaining) }
    }
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}
