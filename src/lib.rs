//! ## Intro
//!
//! A contiguous, growable array with value semantics and a documented
//! panic-safety guarantee for every operation.
//!
//! [`DynamicArray`] owns a single heap buffer. Live elements occupy the front of
//! the buffer and the rest is uninitialized spare capacity. Appending to a full
//! array doubles the capacity, so `n` appends cost O(n) in total.
//!
//! ```
//! # use dynarray::DynamicArray;
//! let mut arr = DynamicArray::new();
//! assert_eq!(arr.capacity(), 0); // no allocation yet
//!
//! arr.push(1);
//! arr.push(2);
//! arr.push(3);
//! assert_eq!(arr, [1, 2, 3]);
//! assert_eq!(arr.capacity(), 4); // 0 -> 1 -> 2 -> 4
//! ```
//!
//! ## Guarantees
//!
//! | Level | Operations | After a panic |
//! |-------|------------|---------------|
//! | Strong | `clone`, `clone_from`, `push`, `push_clone`, `reserve`, `shrink_to_fit` | exactly as before the call |
//! | Weak | `insert`, `erase` | valid, content unspecified |
//! | No-fail | `new`, `len`, `capacity`, `swap_with`, accessors | cannot panic |
//!
//! The only sources of failure are the allocator and the element type's own
//! `Clone`/`Drop`. Allocation failure behaves as it does for [`Vec`]; the
//! `try_*` methods return [`TryReserveError`] instead.
//!
//! Preconditions such as "not empty" for [`DynamicArray::front`] are checked
//! with assertions. Unchecked access is available through the slice methods
//! (`get_unchecked`) the array dereferences to.
//!
//! ## `no_std` support
//!
//! This crate requires only `core` and `alloc`.
//!
//! ## Optional features
//!
//! ### `serde`
//!
//! [`DynamicArray`] implements [`serde::Serialize`] and [`serde::Deserialize`] as a sequence.
//!
//! ### `std`
//!
//! `DynamicArray<u8>` implements [`std::io::Write`] by appending.
//!
//! ## Logging
//!
//! Reallocations emit `tracing` events at `TRACE` level, and allocation
//! failures reported through the `try_*` methods at `DEBUG` level. Without a
//! subscriber these compile to a cheap disabled check.
//!
//! [`serde::Serialize`]: https://docs.rs/serde/latest/serde/trait.Serialize.html
//! [`serde::Deserialize`]: https://docs.rs/serde/latest/serde/trait.Deserialize.html
//! [`std::io::Write`]: https://doc.rust-lang.org/std/io/trait.Write.html
//! [`Vec`]: alloc::vec::Vec
#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod raw_buf;
mod utils;

pub mod error;
#[doc(inline)]
pub use error::TryReserveError;

pub mod dynamic_array;
#[doc(inline)]
pub use dynamic_array::DynamicArray;

#[cfg(feature = "serde")]
mod serde;

#[cfg(feature = "std")]
mod std_io;
