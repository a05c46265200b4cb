use crate::error::{Error, Result};
use crate::pool::{Buffer, BufferPool};
use crate::record::{encode_record, record_len, KEY_TERMINATOR};

/// Record encoder owning one pooled buffer.
///
/// The buffer is acquired on construction and goes back to the pool
/// exactly once, either through [`release`](Self::release) or when the
/// encoder is dropped. Each append grows the buffer by exactly one
/// record through the pool's `resize`, so all amortisation of growth is
/// left to the pool's policy.
pub struct RecordEncoder<'p, P: BufferPool + ?Sized> {
    pool: &'p P,
    buf: Buffer,
}

impl<'p, P: BufferPool + ?Sized> RecordEncoder<'p, P> {
    /// Acquire a buffer from `pool` and start an empty encoding.
    pub fn new(pool: &'p P) -> Self {
        Self {
            buf: pool.acquire(),
            pool,
        }
    }

    /// Append `key`, a zero terminator and `value` as little-endian i64.
    ///
    /// Fails without touching the buffer if the key contains a zero byte.
    pub fn append_record(&mut self, key: &[u8], value: i64) -> Result<()> {
        if key.contains(&KEY_TERMINATOR) {
            return Err(Error::KeyContainsNul);
        }
        let write_pos = self.buf.len();
        let buf = std::mem::take(&mut self.buf);
        self.buf = self.pool.resize(buf, write_pos + record_len(key));

        let mut tail = &mut self.buf.as_mut_slice()[write_pos..];
        encode_record(&mut tail, key, value);
        Ok(())
    }

    /// The encoded bytes so far.
    #[inline]
    pub fn view(&self) -> &[u8] {
        self.buf.as_slice()
    }

    /// Number of encoded bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if nothing has been encoded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Capacity of the owned buffer.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Return the buffer to the pool. The encoder cannot be used afterwards.
    pub fn release(self) {
        drop(self);
    }
}

impl<P: BufferPool + ?Sized> Drop for RecordEncoder<'_, P> {
    fn drop(&mut self) {
        let buf = std::mem::take(&mut self.buf);
        self.pool.release(buf);
    }
}

impl<P: BufferPool + ?Sized> std::fmt::Debug for RecordEncoder<'_, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordEncoder")
            .field("kind", &self.pool.kind())
            .field("buf", &self.buf)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Pool, PoolConfig, PoolKind};

    fn all_pools() -> Vec<Pool> {
        PoolKind::ALL
            .into_iter()
            .map(|kind| Pool::new(kind, &PoolConfig::default()))
            .collect()
    }

    #[test]
    fn test_encode_two_records() {
        for pool in all_pools() {
            let mut enc = RecordEncoder::new(&pool);
            assert!(enc.is_empty());

            enc.append_record(b"A", 0).unwrap();
            assert_eq!(enc.view(), &[65, 0, 0, 0, 0, 0, 0, 0, 0, 0], "{}", pool.kind());

            enc.append_record(b"B", 2).unwrap();
            assert_eq!(
                enc.view(),
                &[65, 0, 0, 0, 0, 0, 0, 0, 0, 0, 66, 0, 2, 0, 0, 0, 0, 0, 0, 0],
                "{}",
                pool.kind()
            );
            enc.release();
        }
    }

    #[test]
    fn test_recycled_buffer_has_no_stale_content() {
        for pool in all_pools() {
            let mut enc = RecordEncoder::new(&pool);
            enc.append_record(b"A", 0).unwrap();
            enc.append_record(b"B", 2).unwrap();
            enc.release();

            let mut enc = RecordEncoder::new(&pool);
            enc.append_record(b"A", 0).unwrap();
            assert_eq!(enc.view(), &[65, 0, 0, 0, 0, 0, 0, 0, 0, 0], "{}", pool.kind());
        }
    }

    #[test]
    fn test_release_returns_buffer() {
        let pool = Pool::new(PoolKind::Central, &PoolConfig::default());
        let enc = RecordEncoder::new(&pool);
        enc.release();

        let stats = pool.stats();
        assert_eq!(stats.returns, 1);
        assert_eq!(stats.held, 1);
    }

    #[test]
    fn test_drop_returns_buffer_once() {
        let pool = Pool::new(PoolKind::Reserved, &PoolConfig::default());
        {
            let mut enc = RecordEncoder::new(&pool);
            enc.append_record(b"key", 7).unwrap();
        }
        let stats = pool.stats();
        assert_eq!(stats.returns, 1);
        assert_eq!(stats.held, 1);
    }

    #[test]
    fn test_growth_across_many_records() {
        for pool in all_pools() {
            let mut enc = RecordEncoder::new(&pool);
            let key = [b'a'; 100];
            for i in 0..50 {
                enc.append_record(&key, i).unwrap();
            }
            assert_eq!(enc.len(), 50 * 109);
            assert!(enc.capacity() >= enc.len());

            let last = &enc.view()[49 * 109..];
            assert_eq!(&last[..100], &key[..]);
            assert_eq!(last[100], 0);
            assert_eq!(&last[101..], &49i64.to_le_bytes());
        }
    }

    #[test]
    fn test_key_with_nul_rejected() {
        let pool = Pool::new(PoolKind::Null, &PoolConfig::default());
        let mut enc = RecordEncoder::new(&pool);
        enc.append_record(b"ok", 1).unwrap();

        let err = enc.append_record(b"a\0b", 1).unwrap_err();
        assert!(matches!(err, Error::KeyContainsNul));
        assert_eq!(enc.len(), 11);
    }

    #[test]
    fn test_empty_key() {
        let pool = Pool::new(PoolKind::Bucketed, &PoolConfig::default());
        let mut enc = RecordEncoder::new(&pool);
        enc.append_record(b"", 1).unwrap();
        assert_eq!(enc.view(), &[0, 1, 0, 0, 0, 0, 0, 0, 0]);
    }
}
