#![doc = r#"
The two levels of events a track deals with

# Hierarchy
```text
            |-------|    compile    |-----------------|
            | Event | ------------> | Ticked<WireEvent> |
            |-------|   (1 or 2)    |-----------------|
```

An [`Event`] is what a caller adds to a track: a note with a duration, a tempo,
a name. Times are in beats.

A [`WireEvent`] is what ends up in the file: a note on, a note off, a meta
event. Each one is stamped with an absolute tick by [`Ticked`]. A note becomes
two wire events, everything else becomes one.
"#]

mod wire;
pub use wire::*;

use alloc::{string::String, vec::Vec};

use crate::{Channel, DataByte, Tempo, file::TICKS_PER_BEAT};

/// Convert a time in beats to a time in ticks.
///
/// Saturates at `u32::MAX`.
pub const fn beats_to_ticks(beats: u32) -> u32 {
    beats.saturating_mul(TICKS_PER_BEAT as u32)
}

#[doc = r#"
A musical event in a track, timed in beats.
"#]
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    /// A note held for `duration` beats.
    Note {
        /// Beat the note starts on
        time: u32,
        /// The note number
        pitch: DataByte,
        /// How many beats the note is held
        duration: u32,
        /// Used for both the note on and the note off
        velocity: DataByte,
    },
    /// The name of the track
    TrackName {
        /// Beat the name is set on
        time: u32,
        /// The name
        name: String,
    },
    /// Set the tempo from this beat on
    Tempo {
        /// Beat the tempo changes on
        time: u32,
        /// The new tempo
        tempo: Tempo,
    },
    /// Switch the track's channel to another instrument
    ProgramChange {
        /// Beat the program changes on
        time: u32,
        /// The new program
        program: DataByte,
    },
}

impl Event {
    /// The beat the event happens on.
    pub const fn time(&self) -> u32 {
        match self {
            Self::Note { time, .. }
            | Self::TrackName { time, .. }
            | Self::Tempo { time, .. }
            | Self::ProgramChange { time, .. } => *time,
        }
    }

    /// Expand this event into the wire events it stands for, appending them to `out`.
    pub fn compile_into(&self, channel: Channel, out: &mut Vec<Ticked<WireEvent>>) {
        match self {
            Self::Note {
                time,
                pitch,
                duration,
                velocity,
            } => {
                out.push(Ticked::new(
                    beats_to_ticks(*time),
                    WireEvent::NoteOn {
                        channel,
                        note: *pitch,
                        velocity: *velocity,
                    },
                ));
                out.push(Ticked::new(
                    beats_to_ticks(time.saturating_add(*duration)),
                    WireEvent::NoteOff {
                        channel,
                        note: *pitch,
                        velocity: *velocity,
                    },
                ));
            }
            Self::TrackName { time, name } => out.push(Ticked::new(
                beats_to_ticks(*time),
                WireEvent::MetaTrackName(name.clone()),
            )),
            Self::Tempo { time, tempo } => out.push(Ticked::new(
                beats_to_ticks(*time),
                WireEvent::MetaTempo(*tempo),
            )),
            Self::ProgramChange { time, program } => out.push(Ticked::new(
                beats_to_ticks(*time),
                WireEvent::ProgramChange {
                    channel,
                    program: *program,
                },
            )),
        }
    }
}

/// An event stamped with its absolute position in ticks
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ticked<T> {
    ticks: u32,
    event: T,
}

impl<T> Ticked<T> {
    /// Stamp an event with a tick
    pub const fn new(ticks: u32, event: T) -> Self {
        Self { ticks, event }
    }
    /// Ticks since the start of the track
    pub const fn accumulated_ticks(&self) -> u32 {
        self.ticks
    }
    /// Returns a reference to the event
    pub const fn event(&self) -> &T {
        &self.event
    }
    /// Returns the event
    pub fn into_event(self) -> T {
        self.event
    }
}

#[test]
fn note_compiles_to_on_and_off() {
    let note = Event::Note {
        time: 1,
        pitch: DataByte::new_unchecked(60),
        duration: 2,
        velocity: DataByte::new_unchecked(100),
    };
    let mut out = Vec::new();
    note.compile_into(Channel::One, &mut out);

    let on = WireEvent::NoteOn {
        channel: Channel::One,
        note: DataByte::new_unchecked(60),
        velocity: DataByte::new_unchecked(100),
    };
    let off = WireEvent::NoteOff {
        channel: Channel::One,
        note: DataByte::new_unchecked(60),
        velocity: DataByte::new_unchecked(100),
    };
    assert_eq!(out, [Ticked::new(128, on), Ticked::new(384, off)]);
}

#[test]
fn ticks_saturate() {
    assert_eq!(beats_to_ticks(3), 384);
    assert_eq!(beats_to_ticks(u32::MAX), u32::MAX);
}
