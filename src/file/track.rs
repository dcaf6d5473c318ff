use alloc::vec::Vec;
use tracing::{debug, trace};

use crate::{
    Channel, FileError,
    error::length_field,
    event::{END_OF_TRACK, Event, Ticked, WireEvent},
    vlq::VarInt,
};

/// A track chunk's type identifier
pub const TRACK_CHUNK: [u8; 4] = *b"MTrk";

#[doc = r#"
One track of a [`MidiFile`](super::MidiFile).

A track keeps the [`Event`]s added to it in the order they were added. The
[`WireEvent`]s written to the file are derived from them every time the track
is compiled, so adding more events and serializing again always reflects the
current state.

The track's index in the file is also its channel, wrapping after sixteen.
"#]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    index: usize,
    channel: Channel,
    events: Vec<Event>,
}

impl Track {
    pub(crate) fn new(index: usize) -> Self {
        Self {
            index,
            channel: Channel::from_track_index(index),
            events: Vec::new(),
        }
    }

    /// The 0-based position of the track in its file
    pub const fn index(&self) -> usize {
        self.index
    }

    /// The channel every channel message in this track is sent on
    pub const fn channel(&self) -> Channel {
        self.channel
    }

    /// The events added to this track, in insertion order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub(crate) fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Expand every event into wire events, in the order they are written.
    ///
    /// Events are sorted by tick. Events on the same tick are ordered by kind
    /// (meta, program change, note off, note on) and otherwise keep insertion order.
    /// A note held for zero ticks is released right after it is struck.
    pub fn compile(&self) -> Vec<Ticked<WireEvent>> {
        let mut keyed = Vec::with_capacity(self.events.len() * 2);
        let mut expanded = Vec::with_capacity(2);
        for (source, event) in self.events.iter().enumerate() {
            event.compile_into(self.channel, &mut expanded);
            let struck = expanded
                .first()
                .map(|e| (e.accumulated_ticks(), e.event().priority()));

            for (step, wire) in expanded.drain(..).enumerate() {
                let tick = wire.accumulated_ticks();
                let priority = match (struck, wire.event()) {
                    (Some((on_tick, on_priority)), WireEvent::NoteOff { .. }) if on_tick == tick => {
                        on_priority
                    }
                    (_, event) => event.priority(),
                };
                keyed.push(((tick, priority, source, step), wire));
            }
        }
        keyed.sort_by_key(|(key, _)| *key);
        keyed.into_iter().map(|(_, wire)| wire).collect()
    }

    /// The body of the track chunk: every event with its delta-time, then end of track.
    pub fn serialize(&self) -> Result<Vec<u8>, FileError> {
        let wire = self.compile();
        let mut buf = Vec::with_capacity(wire.len() * 4 + 4);

        let mut last_tick = 0;
        for event in &wire {
            let tick = event.accumulated_ticks();
            let delta = tick - last_tick;
            last_tick = tick;

            buf.extend_from_slice(&VarInt::new(delta));
            event.event().write_into(&mut buf)?;
            trace!(
                "track {}: packed {:?} at tick {tick} (delta {delta}), {} bytes",
                self.index,
                event.event(),
                buf.len()
            );
        }

        buf.extend_from_slice(&VarInt::new(0));
        buf.extend_from_slice(&END_OF_TRACK);

        debug!(
            "track {}: {} events compiled to {} wire events, {} bytes",
            self.index,
            self.events.len(),
            wire.len(),
            buf.len()
        );
        Ok(buf)
    }

    /// Append the complete `MTrk` chunk, with its length, to `buf`.
    ///
    /// Fails if the body is longer than a 32-bit length can describe.
    pub fn write_chunk(&self, buf: &mut Vec<u8>) -> Result<(), FileError> {
        let body = self.serialize()?;
        let len = length_field(body.len())?;
        buf.extend_from_slice(&TRACK_CHUNK);
        buf.extend_from_slice(&len.to_be_bytes());
        buf.extend_from_slice(&body);
        Ok(())
    }
}

#[cfg(test)]
use crate::{DataByte, Tempo};

#[cfg(test)]
fn note(time: u32, pitch: u8, duration: u32) -> Event {
    Event::Note {
        time,
        pitch: DataByte::new_unchecked(pitch),
        duration,
        velocity: DataByte::new_unchecked(100),
    }
}

#[test]
fn empty_track_is_end_of_track() {
    let track = Track::new(0);
    assert_eq!(track.serialize().unwrap(), [0x00, 0xFF, 0x2F, 0x00]);

    let mut chunk = Vec::new();
    track.write_chunk(&mut chunk).unwrap();
    assert_eq!(
        chunk,
        [b'M', b'T', b'r', b'k', 0, 0, 0, 4, 0x00, 0xFF, 0x2F, 0x00]
    );
}

#[test]
fn deltas_are_relative() {
    let mut track = Track::new(0);
    track.push(note(1, 60, 2));

    assert_eq!(
        track.serialize().unwrap(),
        [
            0x81, 0x00, 0x90, 60, 100, // +128 note on
            0x82, 0x00, 0x80, 60, 100, // +256 note off
            0x00, 0xFF, 0x2F, 0x00,
        ]
    );
}

#[test]
fn out_of_order_events_are_sorted() {
    let mut track = Track::new(3);
    track.push(note(4, 64, 1));
    track.push(note(0, 60, 1));

    let ticks: Vec<u32> = track
        .compile()
        .iter()
        .map(|e| e.accumulated_ticks())
        .collect();
    assert_eq!(ticks, [0, 128, 512, 640]);
    assert!(
        track
            .compile()
            .iter()
            .all(|e| e.event().status() & 0x0F == 3)
    );
}

#[test]
fn release_before_strike_on_same_tick() {
    let mut track = Track::new(0);
    track.push(note(1, 60, 1));
    track.push(note(0, 60, 1));
    track.push(Event::Tempo {
        time: 1,
        tempo: Tempo::default(),
    });

    let kinds: Vec<u8> = track
        .compile()
        .iter()
        .map(|e| e.event().status())
        .collect();
    assert_eq!(kinds, [0x90, 0xFF, 0x80, 0x90, 0x80]);
}

#[test]
fn zero_length_note_is_struck_then_released() {
    let mut track = Track::new(0);
    track.push(note(1, 60, 0));

    let statuses: Vec<u8> = track
        .compile()
        .iter()
        .map(|e| e.event().status())
        .collect();
    assert_eq!(statuses, [0x90, 0x80]);
    assert_eq!(
        track.serialize().unwrap(),
        [
            0x81, 0x00, 0x90, 60, 100, // +128 note on
            0x00, 0x80, 60, 100, // note off on the same tick
            0x00, 0xFF, 0x2F, 0x00,
        ]
    );
}

#[test]
fn zero_length_note_among_others_on_the_same_tick() {
    let mut track = Track::new(0);
    track.push(note(0, 62, 1));
    track.push(note(1, 60, 0));
    track.push(note(1, 64, 1));

    let order: Vec<(u32, u8, u8)> = track
        .compile()
        .iter()
        .map(|e| {
            let mut bytes = Vec::new();
            e.event().write_into(&mut bytes).unwrap();
            (e.accumulated_ticks(), bytes[0], bytes[1])
        })
        .collect();
    assert_eq!(
        order,
        [
            (0, 0x90, 62),
            (128, 0x80, 62),
            (128, 0x90, 60),
            (128, 0x80, 60),
            (128, 0x90, 64),
            (256, 0x80, 64),
        ]
    );
}

#[test]
fn notes_at_the_tick_limit_stay_paired() {
    let mut track = Track::new(0);
    track.push(note(u32::MAX - 1, 60, 5));

    let wire = track.compile();
    assert_eq!(wire[0].accumulated_ticks(), u32::MAX);
    assert_eq!(wire[1].accumulated_ticks(), u32::MAX);
    assert_eq!(wire[0].event().status(), 0x90);
    assert_eq!(wire[1].event().status(), 0x80);
}
