use crate::FileError;

/// Microseconds in one minute.
const MICROS_PER_MINUTE: u32 = 60_000_000;

/// The largest value a set tempo meta event can carry (24 bits).
const MAX_MICROS_PER_BEAT: u32 = 0x00FF_FFFF;

#[doc = r#"
The length of one beat, in microseconds.

This is what a set tempo meta event (`FF 51 03`) carries. Tempos are usually
given in beats per minute, so the easiest way to make one is [`Tempo::from_bpm`].

# Example
```rust
# use midiwrite::prelude::*;
let tempo = Tempo::from_bpm(120).unwrap();
assert_eq!(tempo.micros_per_quarter_note(), 500_000);
assert_eq!(tempo.to_be_bytes(), [0x07, 0xA1, 0x20]);
```
"#]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tempo(u32);

impl Tempo {
    /// Create a tempo from a number of microseconds per beat.
    ///
    /// Returns `None` if the value does not fit in 24 bits.
    pub const fn new(micros_per_quarter_note: u32) -> Option<Self> {
        if micros_per_quarter_note > MAX_MICROS_PER_BEAT {
            return None;
        }
        Some(Self(micros_per_quarter_note))
    }

    /// Convert beats per minute into microseconds per beat.
    ///
    /// The division truncates, so `7` bpm is `8_571_428` microseconds.
    /// Fails for `0` bpm and for anything slower than `4` bpm, which would not
    /// fit in the meta event.
    pub fn from_bpm(beats_per_minute: u32) -> Result<Self, FileError> {
        if beats_per_minute == 0 {
            return Err(FileError::Tempo(beats_per_minute));
        }
        Self::new(MICROS_PER_MINUTE / beats_per_minute).ok_or(FileError::Tempo(beats_per_minute))
    }

    /// Returns the microseconds per beat.
    pub const fn micros_per_quarter_note(&self) -> u32 {
        self.0
    }

    /// Returns the tempo in beats per minute, rounded down.
    pub const fn beats_per_minute(&self) -> u32 {
        if self.0 == 0 {
            return 0;
        }
        MICROS_PER_MINUTE / self.0
    }

    /// The three byte big-endian payload of the set tempo meta event.
    pub const fn to_be_bytes(&self) -> [u8; 3] {
        let [_, a, b, c] = self.0.to_be_bytes();
        [a, b, c]
    }
}

impl Default for Tempo {
    /// 120 beats per minute
    fn default() -> Self {
        Self(500_000)
    }
}

#[test]
fn tempo_from_bpm() {
    assert_eq!(Tempo::from_bpm(120).unwrap().micros_per_quarter_note(), 500_000);
    assert_eq!(Tempo::from_bpm(60).unwrap().micros_per_quarter_note(), 1_000_000);
    assert_eq!(Tempo::from_bpm(7).unwrap().micros_per_quarter_note(), 8_571_428);
}

#[test]
fn tempo_bounds() {
    assert!(matches!(Tempo::from_bpm(0), Err(FileError::Tempo(0))));
    assert!(matches!(Tempo::from_bpm(3), Err(FileError::Tempo(3))));
    assert!(Tempo::from_bpm(4).is_ok());
    assert!(Tempo::new(0x0100_0000).is_none());
}

#[test]
fn tempo_payload() {
    let tempo = Tempo::new(0x0012_3456).unwrap();
    assert_eq!(tempo.to_be_bytes(), [0x12, 0x34, 0x56]);
    assert_eq!(Tempo::default().beats_per_minute(), 120);
}
