use alloc::{string::String, vec::Vec};

use crate::{Channel, DataByte, FileError, Tempo, error::length_field, vlq::VarInt};

/// Status nibble of a note off message
pub const NOTE_OFF: u8 = 0x80;
/// Status nibble of a note on message
pub const NOTE_ON: u8 = 0x90;
/// Status nibble of a program change message
pub const PROGRAM_CHANGE: u8 = 0xC0;
/// Status byte of every meta event
pub const META: u8 = 0xFF;

/// Meta event type for a track name
pub const META_TRACK_NAME: u8 = 0x03;
/// Meta event type for the end of a track
pub const META_END_OF_TRACK: u8 = 0x2F;
/// Meta event type for a tempo change
pub const META_TEMPO: u8 = 0x51;

/// The bytes closing every track, after a zero delta-time.
pub const END_OF_TRACK: [u8; 3] = [META, META_END_OF_TRACK, 0x00];

#[doc = r#"
An event as it is written into a track chunk.

Wire events carry no timing of their own, see [`Ticked`](super::Ticked).
"#]
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WireEvent {
    /// `9n kk vv`
    NoteOn {
        /// Channel `n`
        channel: Channel,
        /// Note number `kk`
        note: DataByte,
        /// Velocity `vv`
        velocity: DataByte,
    },
    /// `8n kk vv`
    NoteOff {
        /// Channel `n`
        channel: Channel,
        /// Note number `kk`
        note: DataByte,
        /// Release velocity `vv`
        velocity: DataByte,
    },
    /// `Cn pp`
    ProgramChange {
        /// Channel `n`
        channel: Channel,
        /// Program `pp`
        program: DataByte,
    },
    /// `FF 51 03 tttttt`
    MetaTempo(Tempo),
    /// `FF 03 len text`
    MetaTrackName(String),
}

impl WireEvent {
    /// Orders events that land on the same tick.
    ///
    /// Meta events come first, then program changes, then note offs, then note
    /// ons, so a note ending on a tick is released before one starting there.
    pub(crate) const fn priority(&self) -> u8 {
        match self {
            Self::MetaTrackName(_) | Self::MetaTempo(_) => 0,
            Self::ProgramChange { .. } => 1,
            Self::NoteOff { .. } => 2,
            Self::NoteOn { .. } => 3,
        }
    }

    /// The status byte of the event.
    pub fn status(&self) -> u8 {
        match self {
            Self::NoteOn { channel, .. } => channel.status(NOTE_ON),
            Self::NoteOff { channel, .. } => channel.status(NOTE_OFF),
            Self::ProgramChange { channel, .. } => channel.status(PROGRAM_CHANGE),
            Self::MetaTempo(_) | Self::MetaTrackName(_) => META,
        }
    }

    /// Append the event's bytes, without a delta-time, to `buf`.
    ///
    /// Fails only for a track name longer than a 32-bit length can describe.
    pub fn write_into(&self, buf: &mut Vec<u8>) -> Result<(), FileError> {
        buf.push(self.status());
        match self {
            Self::NoteOn { note, velocity, .. } | Self::NoteOff { note, velocity, .. } => {
                buf.push(note.value());
                buf.push(velocity.value());
            }
            Self::ProgramChange { program, .. } => buf.push(program.value()),
            Self::MetaTempo(tempo) => {
                buf.push(META_TEMPO);
                buf.push(0x03);
                buf.extend_from_slice(&tempo.to_be_bytes());
            }
            Self::MetaTrackName(name) => {
                let len = length_field(name.len())?;
                buf.push(META_TRACK_NAME);
                buf.extend_from_slice(&VarInt::new(len));
                buf.extend_from_slice(name.as_bytes());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
fn bytes_of(event: WireEvent) -> Vec<u8> {
    let mut buf = Vec::new();
    event.write_into(&mut buf).unwrap();
    buf
}

#[test]
fn note_on_and_off_use_their_own_status() {
    let note = DataByte::new_unchecked(60);
    let velocity = DataByte::new_unchecked(100);
    assert_eq!(
        bytes_of(WireEvent::NoteOn {
            channel: Channel::Two,
            note,
            velocity
        }),
        [0x91, 60, 100]
    );
    assert_eq!(
        bytes_of(WireEvent::NoteOff {
            channel: Channel::Two,
            note,
            velocity
        }),
        [0x81, 60, 100]
    );
}

#[test]
fn program_change_is_two_bytes() {
    let event = WireEvent::ProgramChange {
        channel: Channel::Ten,
        program: DataByte::new_unchecked(42),
    };
    assert_eq!(bytes_of(event), [0xC9, 42]);
}

#[test]
fn meta_events() {
    let tempo = Tempo::from_bpm(120).unwrap();
    assert_eq!(
        bytes_of(WireEvent::MetaTempo(tempo)),
        [0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20]
    );
    assert_eq!(
        bytes_of(WireEvent::MetaTrackName(String::from("Bass"))),
        [0xFF, 0x03, 0x04, b'B', b'a', b's', b's']
    );
}
