#![doc = r#"
Variable-length quantities

# Overview

Delta-times (and the lengths of meta events) in a MIDI file are written as
variable-length quantities. Each byte carries 7 bits of the number, most
significant group first. Every byte except the last has its high bit set:

```text
        0x00 -> 00
        0x7F -> 7F
        0x80 -> 81 00
      0x3FFF -> FF 7F
   0x0FFFFFFF -> FF FF FF 7F
```

The MIDI file format only asks for values up to `0x0FFFFFFF` (four groups),
but [`VarInt`] accepts any `u32` and will use a fifth group for the top four
bits rather than dropping them.
"#]

use core::{fmt, ops::Deref};

use thiserror::Error;

/// The most groups a `u32` can need.
pub const MAX_LEN: usize = 5;

/// A `u32` encoded as a variable-length quantity.
///
/// Derefs to the encoded bytes, which are never longer than needed.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct VarInt {
    bytes: [u8; MAX_LEN],
    len: u8,
}

impl VarInt {
    /// Encode a value.
    pub const fn new(value: u32) -> Self {
        let mut len = 1;
        let mut rest = value >> 7;
        while rest != 0 {
            len += 1;
            rest >>= 7;
        }

        let mut bytes = [0; MAX_LEN];
        let mut i = 0;
        while i < len {
            let shift = 7 * (len - 1 - i);
            let mut byte = ((value >> shift) & 0x7F) as u8;
            if i + 1 < len {
                byte |= 0x80;
            }
            bytes[i] = byte;
            i += 1;
        }

        Self {
            bytes,
            len: len as u8,
        }
    }

    /// Returns the encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }
}

impl Deref for VarInt {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for VarInt {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<u32> for VarInt {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for VarInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VarInt").field(&self.as_bytes()).finish()
    }
}

/// Encode a value as a variable-length quantity.
pub const fn encode(value: u32) -> VarInt {
    VarInt::new(value)
}

/// Errors produced by [`decode`]
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum VlqError {
    /// The input ended on a byte with its continuation bit set.
    #[error("Variable-length quantity is not terminated")]
    Unterminated,
    /// More than five groups.
    #[error("Variable-length quantity is longer than {MAX_LEN} bytes")]
    TooLong,
    /// The value does not fit in a `u32`.
    #[error("Variable-length quantity overflows a u32")]
    Overflow,
}

/// Read one variable-length quantity from the front of `bytes`.
///
/// Returns the value and the number of bytes it took up.
pub fn decode(bytes: &[u8]) -> Result<(u32, usize), VlqError> {
    let mut value: u32 = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        if i == MAX_LEN {
            return Err(VlqError::TooLong);
        }
        if value > (u32::MAX >> 7) {
            return Err(VlqError::Overflow);
        }
        value = (value << 7) | (byte & 0x7F) as u32;
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(VlqError::Unterminated)
}

#[test]
fn encode_known_values() {
    let cases: [(u32, &[u8]); 12] = [
        (0x00, &[0x00]),
        (0x40, &[0x40]),
        (0x7F, &[0x7F]),
        (0x80, &[0x81, 0x00]),
        (0x2000, &[0xC0, 0x00]),
        (0x3FFF, &[0xFF, 0x7F]),
        (0x4000, &[0x81, 0x80, 0x00]),
        (0x10_0000, &[0xC0, 0x80, 0x00]),
        (0x1F_FFFF, &[0xFF, 0xFF, 0x7F]),
        (0x20_0000, &[0x81, 0x80, 0x80, 0x00]),
        (0x800_0000, &[0xC0, 0x80, 0x80, 0x00]),
        (0xFFF_FFFF, &[0xFF, 0xFF, 0xFF, 0x7F]),
    ];
    for (value, bytes) in cases {
        assert_eq!(encode(value).as_bytes(), bytes, "encoding {value:#X}");
    }
}

#[test]
fn encode_past_28_bits() {
    assert_eq!(encode(0x1000_0000).as_bytes(), &[0x81, 0x80, 0x80, 0x80, 0x00]);
    assert_eq!(encode(u32::MAX).as_bytes(), &[0x8F, 0xFF, 0xFF, 0xFF, 0x7F]);
    assert_eq!(decode(&encode(u32::MAX)), Ok((u32::MAX, 5)));
}

#[test]
fn round_trip_is_minimal() {
    let mut value = 0u32;
    while value < (1 << 28) {
        let encoded = encode(value);
        let (decoded, read) = decode(&encoded).unwrap();
        assert_eq!(decoded, value);
        assert_eq!(read, encoded.len());

        let groups = (32 - value.leading_zeros()).div_ceil(7).max(1) as usize;
        assert_eq!(encoded.len(), groups, "length of {value:#X}");

        let (last, rest) = encoded.split_last().unwrap();
        assert_eq!(last & 0x80, 0);
        assert!(rest.iter().all(|b| b & 0x80 != 0));

        value = value * 3 + 1;
    }
}

#[test]
fn group_boundaries() {
    for groups in 1..=4u32 {
        let largest = (1u32 << (7 * groups)) - 1;
        let smallest_longer = 1u32 << (7 * groups);

        let encoded = encode(largest);
        assert_eq!(encoded.len(), groups as usize, "length of {largest:#X}");
        assert_eq!(decode(&encoded), Ok((largest, groups as usize)));

        let encoded = encode(smallest_longer);
        assert_eq!(
            encoded.len(),
            groups as usize + 1,
            "length of {smallest_longer:#X}"
        );
        assert_eq!(decode(&encoded), Ok((smallest_longer, groups as usize + 1)));
        assert_eq!(encoded[0], 0x81);
        assert!(encoded[1..].iter().rev().skip(1).all(|b| *b == 0x80));
        assert_eq!(encoded.last(), Some(&0x00));
    }
}

#[test]
fn decode_reads_only_the_first_quantity() {
    assert_eq!(decode(&[0x81, 0x00, 0x90, 0x3C]), Ok((0x80, 2)));
}

#[test]
fn decode_errors() {
    assert_eq!(decode(&[]), Err(VlqError::Unterminated));
    assert_eq!(decode(&[0x81, 0x80]), Err(VlqError::Unterminated));
    assert_eq!(
        decode(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x00]),
        Err(VlqError::TooLong)
    );
    assert_eq!(
        decode(&[0x9F, 0xFF, 0xFF, 0xFF, 0x7F]),
        Err(VlqError::Overflow)
    );
}
