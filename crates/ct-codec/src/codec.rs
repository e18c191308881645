//! Big-endian, length-prefixed reader and writer for the TLS presentation language
//!
//! RFC 6962 structures are built from fixed-width unsigned integers and
//! variable-length opaque vectors. The width of a vector's length prefix is
//! derived from the maximum length the field may hold, see
//! [`bytes_for_data_length`].

use crate::error::{Error, Result};

/// Number of bytes needed to hold a length of at most `max_data_length`.
///
/// `2^8 - 1` needs one byte, `2^16 - 1` two and `2^24 - 1` three.
pub fn bytes_for_data_length(max_data_length: usize) -> usize {
    let bits = (usize::BITS - max_data_length.leading_zeros()) as usize;
    bits.div_ceil(8)
}

/// Accumulates an encoded structure
#[derive(Debug, Default, Clone)]
pub struct Serializer {
    buf: Vec<u8>,
}

impl Serializer {
    /// Create an empty serializer
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `value` big-endian in exactly `width` bytes
    pub fn write_uint(&mut self, value: u64, width: usize) -> Result<()> {
        if width == 0 || width > 8 {
            return Err(Error::ValueTooLarge { value, width });
        }
        if width < 8 && value >> (width * 8) != 0 {
            return Err(Error::ValueTooLarge { value, width });
        }
        let bytes = value.to_be_bytes();
        self.buf.extend_from_slice(&bytes[8 - width..]);
        Ok(())
    }

    /// Write bytes with no length prefix
    pub fn write_fixed(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Write `data` preceded by its length, sized for `max_data_length`
    pub fn write_variable_length(&mut self, data: &[u8], max_data_length: usize) -> Result<()> {
        if data.len() > max_data_length {
            return Err(Error::MalformedLength {
                length: data.len(),
                max: max_data_length,
            });
        }
        self.write_uint(data.len() as u64, bytes_for_data_length(max_data_length))?;
        self.write_fixed(data);
        Ok(())
    }

    /// Bytes written so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume and return the encoded bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Reads fields from an encoded structure
#[derive(Debug, Clone)]
pub struct Deserializer<'a> {
    input: &'a [u8],
}

impl<'a> Deserializer<'a> {
    /// Create a reader over `input`
    pub fn new(input: &'a [u8]) -> Self {
        Self { input }
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.input.len()
    }

    /// Whether all input has been consumed
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Read exactly `length` bytes
    pub fn read_fixed(&mut self, length: usize) -> Result<&'a [u8]> {
        if self.input.len() < length {
            return Err(Error::Truncated {
                needed: length,
                available: self.input.len(),
            });
        }
        let (head, tail) = self.input.split_at(length);
        self.input = tail;
        Ok(head)
    }

    /// Read a big-endian unsigned integer of `width` bytes
    pub fn read_uint(&mut self, width: usize) -> Result<u64> {
        if width == 0 || width > 8 {
            return Err(Error::ValueTooLarge { value: 0, width });
        }
        let bytes = self.read_fixed(width)?;
        Ok(bytes
            .iter()
            .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte)))
    }

    /// Read a vector whose length prefix is sized for `max_data_length`
    pub fn read_variable_length(&mut self, max_data_length: usize) -> Result<&'a [u8]> {
        let length = self.read_uint(bytes_for_data_length(max_data_length))? as usize;
        if length > max_data_length {
            return Err(Error::MalformedLength {
                length,
                max: max_data_length,
            });
        }
        self.read_fixed(length)
    }

    /// Fail unless every byte has been consumed
    pub fn finish(self) -> Result<()> {
        if self.input.is_empty() {
            Ok(())
        } else {
            Err(Error::TrailingData(self.input.len()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{MAX_CERTIFICATE_LENGTH, MAX_EXTENSIONS_LENGTH};

    #[test]
    fn test_bytes_for_data_length() {
        assert_eq!(bytes_for_data_length((1 << 8) - 1), 1);
        assert_eq!(bytes_for_data_length((1 << 16) - 1), 2);
        assert_eq!(bytes_for_data_length((1 << 24) - 1), 3);
    }

    #[test]
    fn test_write_uint_big_endian() {
        let mut s = Serializer::new();
        s.write_uint(0x0102_0304, 4).unwrap();
        s.write_uint(7, 2).unwrap();
        assert_eq!(s.into_bytes(), vec![0x01, 0x02, 0x03, 0x04, 0x00, 0x07]);
    }

    #[test]
    fn test_write_uint_overflow() {
        let mut s = Serializer::new();
        let err = s.write_uint(256, 1).unwrap_err();
        assert_eq!(err, Error::ValueTooLarge { value: 256, width: 1 });
        assert!(s.as_bytes().is_empty());
    }

    #[test]
    fn test_variable_length_prefix_width() {
        let mut s = Serializer::new();
        s.write_variable_length(b"abc", MAX_CERTIFICATE_LENGTH).unwrap();
        assert_eq!(s.as_bytes(), &[0, 0, 3, b'a', b'b', b'c']);

        let mut d = Deserializer::new(s.as_bytes());
        assert_eq!(d.read_variable_length(MAX_CERTIFICATE_LENGTH).unwrap(), b"abc");
        d.finish().unwrap();
    }

    #[test]
    fn test_read_truncated() {
        let mut d = Deserializer::new(&[0x00, 0x05, 0x01]);
        let err = d.read_variable_length(MAX_EXTENSIONS_LENGTH).unwrap_err();
        assert_eq!(
            err,
            Error::Truncated {
                needed: 5,
                available: 1
            }
        );
    }

    #[test]
    fn test_read_length_over_maximum() {
        let mut d = Deserializer::new(&[0x05, 0, 0, 0, 0, 0]);
        let err = d.read_variable_length(4).unwrap_err();
        assert_eq!(err, Error::MalformedLength { length: 5, max: 4 });
    }

    #[test]
    fn test_finish_trailing() {
        let mut d = Deserializer::new(&[1, 2, 3]);
        d.read_uint(1).unwrap();
        assert_eq!(d.finish().unwrap_err(), Error::TrailingData(2));
    }
}
