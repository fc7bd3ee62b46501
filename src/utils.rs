/// Compile-time flag for zero sized types.
///
/// Zero sized types never touch the allocator, so the buffer code branches on this
/// and the compiler removes the dead side.
pub(crate) trait IsZST {
    const IS_ZST: bool;
}

impl<T> IsZST for T {
    const IS_ZST: bool = core::mem::size_of::<T>() == 0;
}

/// Marks the enclosing branch as unlikely.
#[cold]
#[inline(always)]
pub(crate) const fn cold_path() {}

#[inline(always)]
pub(crate) fn split_range_bound(
    src: &impl core::ops::RangeBounds<usize>,
    len: usize,
) -> (usize, usize) {
    let start = match src.start_bound() {
        core::ops::Bound::Included(&i) => i,
        core::ops::Bound::Excluded(&i) => i
            .checked_add(1)
            .unwrap_or_else(|| panic!("range start overflows usize")),
        core::ops::Bound::Unbounded => 0,
    };

    let end = match src.end_bound() {
        core::ops::Bound::Included(&i) => i
            .checked_add(1)
            .unwrap_or_else(|| panic!("range end overflows usize")),
        core::ops::Bound::Excluded(&i) => i,
        core::ops::Bound::Unbounded => len,
    };
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_bounds_resolve_against_len() {
        assert_eq!(split_range_bound(&(..), 7), (0, 7));
        assert_eq!(split_range_bound(&(2..5), 7), (2, 5));
        assert_eq!(split_range_bound(&(2..=5), 7), (2, 6));
        assert_eq!(split_range_bound(&(3..), 7), (3, 7));
        assert_eq!(split_range_bound(&(..=0), 7), (0, 1));
    }

    #[test]
    fn zst_flag() {
        assert!(<() as IsZST>::IS_ZST);
        assert!(<[u64; 0] as IsZST>::IS_ZST);
        assert!(!<u8 as IsZST>::IS_ZST);
    }
}
