use core::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::FileError;

#[doc = r#"
A MIDI data byte.

Data bytes always have a leading `0` bit, so only `0..=127` can be represented.
Note numbers, velocities and program numbers are all data bytes.

# Example
```rust
# use midiwrite::prelude::*;
let byte = DataByte::new(100).unwrap();
assert_eq!(byte.value(), 100);

assert!(DataByte::new(128).is_err());
```
"#]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataByte(u8);

impl DataByte {
    /// Create a new data byte, checking for the leading `0` bit.
    pub fn new(byte: u8) -> Result<Self, FileError> {
        if byte > 0x7F {
            return Err(FileError::DataByte(byte));
        }
        Ok(Self(byte))
    }

    /// Create a data byte without checking the leading bit.
    ///
    /// The leading bit is masked off.
    pub const fn new_unchecked(byte: u8) -> Self {
        Self(byte & 0x7F)
    }

    /// Returns the underlying byte
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for DataByte {
    type Error = FileError;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DataByte> for u8 {
    fn from(value: DataByte) -> Self {
        value.0
    }
}

impl fmt::Display for DataByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[doc = r#"
One of the sixteen MIDI channels.

The channel occupies the low nibble of a channel message's status byte.
"#]
#[allow(missing_docs)]
#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, IntoPrimitive, TryFromPrimitive,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Channel {
    One = 0,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Eleven,
    Twelve,
    Thirteen,
    Fourteen,
    Fifteen,
    Sixteen,
}

impl Channel {
    /// The channel a track plays on.
    ///
    /// There are only sixteen channels, so indices past fifteen wrap around.
    pub const fn from_track_index(index: usize) -> Self {
        match index % 16 {
            0 => Self::One,
            1 => Self::Two,
            2 => Self::Three,
            3 => Self::Four,
            4 => Self::Five,
            5 => Self::Six,
            6 => Self::Seven,
            7 => Self::Eight,
            8 => Self::Nine,
            9 => Self::Ten,
            10 => Self::Eleven,
            11 => Self::Twelve,
            12 => Self::Thirteen,
            13 => Self::Fourteen,
            14 => Self::Fifteen,
            _ => Self::Sixteen,
        }
    }

    /// Returns the 0-based channel number (`0..=15`).
    pub fn to_byte(self) -> u8 {
        self.into()
    }

    /// Combine a status nibble (`0x80`, `0x90`, ...) with this channel.
    pub fn status(self, kind: u8) -> u8 {
        (kind & 0xF0) | self.to_byte()
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_byte() + 1)
    }
}

#[test]
fn data_byte_rejects_leading_bit() {
    assert_eq!(DataByte::new(127).map(|b| b.value()).ok(), Some(127));
    assert!(matches!(DataByte::new(128), Err(FileError::DataByte(128))));
    assert_eq!(DataByte::new_unchecked(0xFF).value(), 0x7F);
}

#[test]
fn channel_wraps_track_index() {
    assert_eq!(Channel::from_track_index(0), Channel::One);
    assert_eq!(Channel::from_track_index(15), Channel::Sixteen);
    assert_eq!(Channel::from_track_index(16), Channel::One);
    assert_eq!(Channel::from_track_index(33), Channel::Two);
    for index in 0..64 {
        assert_eq!(
            Channel::from_track_index(index).to_byte() as usize,
            index % 16
        );
        assert_eq!(
            Channel::try_from((index % 16) as u8).ok(),
            Some(Channel::from_track_index(index))
        );
    }
}

#[test]
fn channel_status_byte() {
    assert_eq!(Channel::Three.status(0x90), 0x92);
    assert_eq!(Channel::Sixteen.status(0x80), 0x8F);
    assert_eq!(Channel::One.status(0xC5), 0xC0);
}
