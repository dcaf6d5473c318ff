#![doc = r#"
Write Standard MIDI Files from high-level musical events.

Build a [`MidiFile`](crate::file::MidiFile) with a fixed number of tracks, append
notes, tempo changes, track names and program changes to each track, then
serialize the whole thing into a format 1 Standard MIDI File.

# Example
```rust
# use midiwrite::prelude::*;
let mut file = MidiFile::new(1);

file.add_track_name(0, 0, "Piano").unwrap();
file.set_tempo(0, 0, 120).unwrap();
file.add_note(0, 60, 0, 1, 100).unwrap();
file.add_note(0, 64, 1, 1, 100).unwrap();

let bytes = file.to_bytes().unwrap();
assert_eq!(&bytes[..4], b"MThd");
```

# Features
- `std` (default): [`MidiFile::write`](crate::file::MidiFile::write) into any
  [`std::io::Write`] sink.
- `serde`: serialization of the event model.
"#]
#![warn(missing_docs)]
#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod byte;
pub use byte::*;

mod error;
pub use error::*;

mod tempo;
pub use tempo::*;

pub mod event;
pub mod file;
pub mod vlq;

/// Commonly used types
pub mod prelude {
    pub use crate::{
        Channel, DataByte, FileError, Tempo,
        event::{Event, Ticked, WireEvent},
        file::{Header, MidiFile, TICKS_PER_BEAT, Track},
        vlq::{VarInt, VlqError},
    };
}
