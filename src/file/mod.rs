#![doc = r#"
Assembling a Standard MIDI File

# Overview

MIDI files are organized into chunks, each identified by a 4-character ASCII
type identifier followed by a 32-bit big-endian length and then the chunk data.

## [`Header`]

The header chunk (`MThd`) comes first. It declares the format of the file, the
number of track chunks that follow, and how many ticks make up a quarter note.
Files written here are always format 1 with [`TICKS_PER_BEAT`] ticks per beat.

## [`Track`]

Each track chunk (`MTrk`) holds a stream of events, each prefixed with its
delta-time (the ticks since the previous event, as a
[variable-length quantity](crate::vlq)), and closed by an end of track meta
event.

# Example Structure

```text
[Header Chunk: "MThd"]
[Track Chunk 0: "MTrk"]
[Track Chunk 1: "MTrk"]
...
[Track Chunk N-1: "MTrk"]
```
"#]

mod header;
pub use header::*;

mod track;
pub use track::*;

use alloc::{string::String, vec::Vec};
use tracing::{debug, warn};

use crate::{DataByte, FileError, Tempo, event::Event};

/// The timing resolution of every file: ticks per quarter note.
pub const TICKS_PER_BEAT: u16 = 128;

#[doc = r#"
A MIDI file being built.

The number of tracks is fixed when the file is created. Events are added to a
track by its index, and the whole file can be serialized at any point, as many
times as needed.

# Example
```rust
# use midiwrite::prelude::*;
let mut file = MidiFile::new(2);
file.set_tempo(0, 0, 90).unwrap();
file.set_program_change(1, 0, 33).unwrap();
file.add_note(1, 36, 0, 2, 110).unwrap();

assert!(file.add_note(2, 36, 0, 2, 110).is_err());
assert_eq!(file.to_bytes().unwrap(), file.to_bytes().unwrap());
```
"#]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MidiFile {
    header: Header,
    tracks: Vec<Track>,
}

impl MidiFile {
    /// Create a file with `num_tracks` empty tracks, numbered from 0.
    pub fn new(num_tracks: u16) -> Self {
        if num_tracks > 16 {
            warn!(
                "{num_tracks} tracks share 16 channels, track 16 onwards reuse channels from track 0"
            );
        }
        Self {
            header: Header::new(num_tracks),
            tracks: (0..num_tracks as usize).map(Track::new).collect(),
        }
    }

    /// Returns the header
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The number of tracks
    pub fn num_tracks(&self) -> usize {
        self.tracks.len()
    }

    /// Returns a track list
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Returns the track at `index`, if there is one
    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    fn track_mut(&mut self, index: usize) -> Result<&mut Track, FileError> {
        let count = self.tracks.len();
        self.tracks
            .get_mut(index)
            .ok_or(FileError::TrackOutOfRange { index, count })
    }

    /// Append any event to a track.
    pub fn add_event(&mut self, track: usize, event: Event) -> Result<(), FileError> {
        self.track_mut(track)?.push(event);
        Ok(())
    }

    /// Add a note starting on beat `time`, held for `duration` beats.
    pub fn add_note(
        &mut self,
        track: usize,
        pitch: u8,
        time: u32,
        duration: u32,
        velocity: u8,
    ) -> Result<(), FileError> {
        let event = Event::Note {
            time,
            pitch: DataByte::new(pitch)?,
            duration,
            velocity: DataByte::new(velocity)?,
        };
        self.add_event(track, event)
    }

    /// Name a track.
    pub fn add_track_name(
        &mut self,
        track: usize,
        time: u32,
        name: impl Into<String>,
    ) -> Result<(), FileError> {
        let event = Event::TrackName {
            time,
            name: name.into(),
        };
        self.add_event(track, event)
    }

    /// Change the tempo on beat `time`.
    ///
    /// The tempo is stored as microseconds per beat, `60_000_000 / beats_per_minute`.
    pub fn set_tempo(
        &mut self,
        track: usize,
        time: u32,
        beats_per_minute: u32,
    ) -> Result<(), FileError> {
        let event = Event::Tempo {
            time,
            tempo: Tempo::from_bpm(beats_per_minute)?,
        };
        self.add_event(track, event)
    }

    /// Switch a track's instrument on beat `time`.
    pub fn set_program_change(
        &mut self,
        track: usize,
        time: u32,
        program: u8,
    ) -> Result<(), FileError> {
        let event = Event::ProgramChange {
            time,
            program: DataByte::new(program)?,
        };
        self.add_event(track, event)
    }

    /// Serialize the whole file.
    ///
    /// Fails only if a track is too long for its 32-bit chunk length.
    pub fn to_bytes(&self) -> Result<Vec<u8>, FileError> {
        let mut buf = Vec::new();
        self.header.write_into(&mut buf);
        for track in &self.tracks {
            track.write_chunk(&mut buf)?;
        }
        debug!(
            "serialized {} tracks into {} bytes",
            self.tracks.len(),
            buf.len()
        );
        Ok(buf)
    }

    /// Write the whole file into `sink`.
    ///
    /// The header goes first, then each track chunk in order. If the sink fails
    /// part way through, whatever was already written stays written.
    #[cfg(feature = "std")]
    pub fn write<W: std::io::Write>(&self, mut sink: W) -> Result<(), FileError> {
        sink.write_all(&self.header.to_bytes())?;
        let mut chunk = Vec::new();
        for track in &self.tracks {
            chunk.clear();
            track.write_chunk(&mut chunk)?;
            sink.write_all(&chunk)?;
        }
        sink.flush()?;
        debug!("wrote {} tracks", self.tracks.len());
        Ok(())
    }
}

#[test]
fn tracks_are_numbered() {
    let file = MidiFile::new(3);
    assert_eq!(file.num_tracks(), 3);
    assert_eq!(file.header().num_tracks(), 3);
    for (i, track) in file.tracks().iter().enumerate() {
        assert_eq!(track.index(), i);
        assert_eq!(track.channel().to_byte() as usize, i);
    }
}

#[test]
fn invalid_data_bytes_are_rejected() {
    let mut file = MidiFile::new(1);
    assert!(matches!(
        file.add_note(0, 128, 0, 1, 100),
        Err(FileError::DataByte(128))
    ));
    assert!(matches!(
        file.add_note(0, 60, 0, 1, 200),
        Err(FileError::DataByte(200))
    ));
    assert!(matches!(
        file.set_program_change(0, 0, 255),
        Err(FileError::DataByte(255))
    ));
    assert!(matches!(file.set_tempo(0, 0, 0), Err(FileError::Tempo(0))));
    assert!(file.tracks()[0].events().is_empty());
}
