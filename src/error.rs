//! Allocation errors reported by the fallible entry points.

use core::alloc::Layout;

/// The error returned by [`DynamicArray::try_reserve`](crate::DynamicArray::try_reserve)
/// and the other `try_*` methods.
///
/// Precondition violations (indexing past the end, `front` on an empty array, ...)
/// are not reported through this type; they panic.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TryReserveError {
    /// The requested capacity does not fit in a valid [`Layout`]
    /// (`capacity * size_of::<T>()` overflows `isize::MAX`).
    #[error("memory allocation failed because the computed capacity exceeded the collection's maximum")]
    CapacityOverflow,

    /// The global allocator returned null.
    #[error("memory allocation of {} bytes failed", .layout.size())]
    AllocError {
        /// The layout that was requested.
        layout: Layout,
    },
}
