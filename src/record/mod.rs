//! Key/value record wire format.
//!
//! A record is the key's raw bytes, one zero terminator byte, then the
//! value as an 8-byte little-endian integer. Records are concatenated with
//! no header or framing.

mod encoder;
mod reader;

pub use encoder::RecordEncoder;
pub use reader::Records;

use bytes::BufMut;

/// Terminator byte that ends every key.
pub const KEY_TERMINATOR: u8 = 0;

/// Width of the encoded value.
pub const VALUE_LEN: usize = 8;

/// Encoded size of a record with the given key.
#[inline]
pub fn record_len(key: &[u8]) -> usize {
    key.len() + 1 + VALUE_LEN
}

/// Write one record into `dst`.
///
/// The caller guarantees `key` has no zero byte and `dst` has room for
/// `record_len(key)` bytes.
#[inline]
pub fn encode_record<B: BufMut>(dst: &mut B, key: &[u8], value: i64) {
    dst.put_slice(key);
    dst.put_u8(KEY_TERMINATOR);
    dst.put_i64_le(value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn test_encode_record_layout() {
        let mut buf = BytesMut::new();
        encode_record(&mut buf, b"A", 0);
        assert_eq!(&buf[..], &[0x41, 0, 0, 0, 0, 0, 0, 0, 0, 0]);

        encode_record(&mut buf, b"key", -2);
        assert_eq!(
            &buf[10..],
            &[b'k', b'e', b'y', 0, 0xfe, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
        );
    }

    #[test]
    fn test_encode_into_slice() {
        let mut storage = [0xffu8; 11];
        let mut tail = &mut storage[..];
        encode_record(&mut tail, b"ab", 1);
        assert!(tail.is_empty());
        assert_eq!(storage, [b'a', b'b', 0, 1, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_record_len() {
        assert_eq!(record_len(b""), 9);
        assert_eq!(record_len(b"A"), 10);
    }
}
