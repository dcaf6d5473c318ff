use alloc::vec::Vec;

use super::TICKS_PER_BEAT;

/// The header chunk's type identifier
pub const HEADER_CHUNK: [u8; 4] = *b"MThd";

#[doc = r#"
The contents of the `MThd` chunk.

The header always declares format 1 (simultaneous tracks) and a timing of
[`TICKS_PER_BEAT`] ticks per quarter note. Only the track count varies.

```text
4D 54 68 64   "MThd"
00 00 00 06   length of the chunk
00 01         format 1
nn nn         number of tracks
00 80         128 ticks per quarter note
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    num_tracks: u16,
}

impl Header {
    /// The header chunk's body is always six bytes.
    pub const LENGTH: u32 = 6;
    /// Format 1: any number of tracks, played at the same time
    pub const FORMAT: u16 = 1;
    /// The full length of the chunk, including its type and length fields
    pub const CHUNK_LENGTH: usize = 14;

    /// Create a new header for a number of tracks
    pub const fn new(num_tracks: u16) -> Self {
        Self { num_tracks }
    }
    /// Always `1`
    pub const fn format_type(&self) -> u16 {
        Self::FORMAT
    }
    /// The number of track chunks following the header
    pub const fn num_tracks(&self) -> u16 {
        self.num_tracks
    }
    /// Returns the ticks per quarter note for the file.
    pub const fn ticks_per_quarter_note(&self) -> u16 {
        TICKS_PER_BEAT
    }

    /// The serialized chunk
    pub fn to_bytes(&self) -> [u8; Self::CHUNK_LENGTH] {
        let mut bytes = [0; Self::CHUNK_LENGTH];
        bytes[0..4].copy_from_slice(&HEADER_CHUNK);
        bytes[4..8].copy_from_slice(&Self::LENGTH.to_be_bytes());
        bytes[8..10].copy_from_slice(&Self::FORMAT.to_be_bytes());
        bytes[10..12].copy_from_slice(&self.num_tracks.to_be_bytes());
        bytes[12..14].copy_from_slice(&TICKS_PER_BEAT.to_be_bytes());
        bytes
    }

    /// Append the serialized chunk to `buf`
    pub fn write_into(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.to_bytes());
    }
}

#[test]
fn header_bytes() {
    assert_eq!(
        Header::new(2).to_bytes(),
        [
            0x4D, 0x54, 0x68, 0x64, 0x00, 0x00, 0x00, 0x06, 0x00, 0x01, 0x00, 0x02, 0x00, 0x80
        ]
    );
}

#[test]
fn header_is_big_endian() {
    let bytes = Header::new(0x0102).to_bytes();
    assert_eq!(&bytes[10..12], &[0x01, 0x02]);
}
