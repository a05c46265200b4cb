//! Move-only byte buffer handed out by the pools.
//!
//! The backing storage is always fully initialised: a fresh buffer is
//! allocated zeroed and a recycled one is scrubbed before reuse, so every
//! byte in `[0, capacity)` is readable and zero unless it holds content.

use bytes::BytesMut;

/// Number of power-of-two capacity classes (`2^0` through `2^62`).
pub const NUM_BUCKETS: usize = 63;

/// A byte buffer with a length (bytes in use) and a capacity.
///
/// `Buffer` is deliberately not `Clone`. Pools take it by value in
/// `release` and `resize`, so a handle cannot be used after it has been
/// given back.
#[derive(Default)]
pub struct Buffer {
    storage: BytesMut,
    len: usize,
}

impl Buffer {
    /// Allocate a zeroed buffer with the given capacity and length 0.
    #[inline]
    pub(crate) fn zeroed(capacity: usize) -> Self {
        Self {
            storage: BytesMut::zeroed(capacity),
            len: 0,
        }
    }

    /// Allocate a zeroed buffer of `capacity` holding a copy of `old`'s
    /// content, with its length set to `new_len`.
    pub(crate) fn grown_from(old: &Buffer, new_len: usize, capacity: usize) -> Self {
        debug_assert!(new_len <= capacity);
        let mut buf = Self::zeroed(capacity);
        let keep = old.len.min(new_len);
        buf.storage[..keep].copy_from_slice(&old.storage[..keep]);
        buf.len = new_len;
        buf
    }

    /// Bytes currently in use.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if no bytes are in use.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes the storage holds without reallocation.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// The bytes in use.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.storage[..self.len]
    }

    /// The bytes in use, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.storage[..self.len]
    }

    /// The whole backing storage, including bytes past the length.
    #[cfg(test)]
    pub(crate) fn storage(&self) -> &[u8] {
        &self.storage
    }

    /// Change the length without touching storage. Requires `len <= capacity`.
    #[inline]
    pub(crate) fn set_len(&mut self, len: usize) {
        debug_assert!(len <= self.capacity());
        self.len = len;
    }

    /// Zero the full capacity and reset the length to 0.
    #[inline]
    pub(crate) fn scrub(&mut self) {
        self.storage.fill(0);
        self.len = 0;
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

/// Capacity for a buffer that must grow from `old_capacity` to hold
/// `new_len` bytes: at least double the old capacity.
#[inline]
pub fn grown_capacity(old_capacity: usize, new_len: usize) -> usize {
    new_len.max(old_capacity.saturating_mul(2))
}

/// Power-of-two class for a size: the smallest `p` with `2^p >= n`.
///
/// Sizes 0 and 1 both map to class 0.
#[inline]
pub fn bucket_index(n: usize) -> usize {
    if n <= 1 {
        0
    } else {
        (usize::BITS - (n - 1).leading_zeros()) as usize
    }
}

/// Capacity of a power-of-two class.
#[inline]
pub fn bucket_capacity(index: usize) -> usize {
    1usize << index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroed_buffer() {
        let buf = Buffer::zeroed(64);
        assert_eq!(buf.len(), 0);
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 64);
        assert!(buf.storage().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_grown_from_copies_content() {
        let mut old = Buffer::zeroed(4);
        old.set_len(4);
        old.as_mut_slice().copy_from_slice(b"abcd");

        let grown = Buffer::grown_from(&old, 6, 8);
        assert_eq!(grown.len(), 6);
        assert_eq!(grown.capacity(), 8);
        assert_eq!(grown.as_slice(), b"abcd\0\0");
        assert_eq!(&grown.storage()[6..], &[0, 0]);
    }

    #[test]
    fn test_scrub_clears_storage() {
        let mut buf = Buffer::zeroed(8);
        buf.set_len(8);
        buf.as_mut_slice().fill(0xff);
        buf.set_len(3);

        buf.scrub();
        assert_eq!(buf.len(), 0);
        assert!(buf.storage().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_default_is_empty() {
        let buf = Buffer::default();
        assert_eq!(buf.capacity(), 0);
        assert!(buf.as_slice().is_empty());
    }

    #[test]
    fn test_grown_capacity() {
        assert_eq!(grown_capacity(256, 300), 512);
        assert_eq!(grown_capacity(256, 1000), 1000);
        assert_eq!(grown_capacity(0, 10), 10);
        assert_eq!(grown_capacity(usize::MAX, 1), usize::MAX);
    }

    #[test]
    fn test_bucket_index() {
        assert_eq!(bucket_index(0), 0);
        assert_eq!(bucket_index(1), 0);
        assert_eq!(bucket_index(2), 1);
        assert_eq!(bucket_index(3), 2);
        assert_eq!(bucket_index(4), 2);
        assert_eq!(bucket_index(5), 3);
        assert_eq!(bucket_index(256), 8);
        assert_eq!(bucket_index(257), 9);
        assert_eq!(bucket_index(1 << 62), 62);
    }

    #[test]
    fn test_bucket_capacity_covers_size() {
        for n in [1usize, 2, 7, 255, 256, 1000, 4097] {
            let cap = bucket_capacity(bucket_index(n));
            assert!(cap >= n);
            assert!(cap.is_power_of_two());
            assert!(cap / 2 < n);
        }
    }
}
