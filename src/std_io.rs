extern crate std;

use std::io::{IoSlice, Write};

use crate::DynamicArray;

/// Write is implemented for `DynamicArray<u8>` by appending to the array.
/// The array will grow as needed.
impl Write for DynamicArray<u8> {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.extend_from_slice(buf);
        Ok(buf.len())
    }

    #[inline(always)]
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }

    #[inline]
    fn write_vectored(&mut self, bufs: &[IoSlice<'_>]) -> std::io::Result<usize> {
        let num = bufs.iter().map(|b| b.len()).sum::<usize>();

        self.reserve(self.len().saturating_add(num));
        for buf in bufs {
            self.extend_from_slice(buf);
        }

        Ok(num)
    }

    #[inline]
    fn write_all(&mut self, buf: &[u8]) -> std::io::Result<()> {
        self.extend_from_slice(buf);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_and_vectored() {
        let mut arr: DynamicArray<u8> = DynamicArray::new();

        let n = arr.write(b"hello").unwrap();
        assert_eq!(n, 5);
        assert_eq!(arr.len(), 5);
        assert_eq!(arr, b"hello");

        let bufs = [IoSlice::new(b" "), IoSlice::new(b"world")];
        let n = arr.write_vectored(&bufs).unwrap();
        assert_eq!(n, 6);
        assert_eq!(arr, b"hello world");
        assert_eq!(arr.capacity(), 11);
    }

    #[test]
    fn write_all_grows() {
        let mut arr: DynamicArray<u8> = DynamicArray::new();
        let data = [b'x'; 257];
        arr.write_all(&data).unwrap();
        assert_eq!(arr.len(), 257);
        assert!(arr.as_slice().iter().all(|&c| c == b'x'));
    }

    #[test]
    fn works_with_write_macro() {
        let mut arr: DynamicArray<u8> = DynamicArray::new();
        write!(arr, "{}-{}", 4, 2).unwrap();
        assert_eq!(arr, b"4-2");
    }
}
