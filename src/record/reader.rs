use bytes::Buf;

use crate::error::{Error, Result};
use crate::record::{KEY_TERMINATOR, VALUE_LEN};

/// Iterator over `(key, value)` records in encoded bytes.
///
/// Key boundaries are found by scanning for the terminator byte. A record
/// cut short yields [`Error::Truncated`] and ends the iteration.
pub struct Records<'a> {
    remaining: &'a [u8],
    offset: usize,
}

impl<'a> Records<'a> {
    /// Read records from `bytes`.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            remaining: bytes,
            offset: 0,
        }
    }

    fn next_record(&mut self) -> Result<(&'a [u8], i64)> {
        let key_len = self
            .remaining
            .iter()
            .position(|&b| b == KEY_TERMINATOR)
            .ok_or(Error::Truncated {
                offset: self.offset,
            })?;
        if self.remaining.len() < key_len + 1 + VALUE_LEN {
            return Err(Error::Truncated {
                offset: self.offset,
            });
        }

        let (key, mut rest) = self.remaining.split_at(key_len);
        rest.advance(1);
        let value = rest.get_i64_le();

        self.remaining = rest;
        self.offset += key_len + 1 + VALUE_LEN;
        Ok((key, value))
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = Result<(&'a [u8], i64)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining.is_empty() {
            return None;
        }
        let item = self.next_record();
        if item.is_err() {
            self.remaining = &[];
        }
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_records() {
        let bytes = [65, 0, 0, 0, 0, 0, 0, 0, 0, 0, 66, 0, 2, 0, 0, 0, 0, 0, 0, 0];
        let records: Vec<_> = Records::new(&bytes).collect::<Result<_>>().unwrap();
        assert_eq!(records, vec![(&b"A"[..], 0), (&b"B"[..], 2)]);
    }

    #[test]
    fn test_read_empty() {
        assert_eq!(Records::new(&[]).count(), 0);
    }

    #[test]
    fn test_truncated_value() {
        let bytes = [65, 0, 1, 0, 0, 0, 0, 0, 0, 0, 66, 0, 2, 0];
        let mut records = Records::new(&bytes);
        assert_eq!(records.next().unwrap().unwrap(), (&b"A"[..], 1));
        assert!(matches!(
            records.next(),
            Some(Err(Error::Truncated { offset: 10 }))
        ));
        assert!(records.next().is_none());
    }

    #[test]
    fn test_missing_terminator() {
        let mut records = Records::new(b"abc");
        assert!(matches!(
            records.next(),
            Some(Err(Error::Truncated { offset: 0 }))
        ));
    }
}
