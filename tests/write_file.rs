use std::io::{self, Write};

use midiwrite::prelude::*;
use pretty_assertions::assert_eq;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing_subscriber::filter::LevelFilter::TRACE)
        .try_init();
}

/// Accepts `limit` bytes, then fails every write
struct FailingSink {
    accepted: Vec<u8>,
    limit: usize,
}

impl Write for FailingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.accepted.len() >= self.limit {
            return Err(io::Error::other("disk full"));
        }
        let n = buf.len().min(self.limit - self.accepted.len());
        self.accepted.extend_from_slice(&buf[..n]);
        Ok(n)
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Splits the bytes after the header into (type, body) chunks
fn track_chunks(bytes: &[u8]) -> Vec<(&[u8], &[u8])> {
    let mut chunks = Vec::new();
    let mut rest = &bytes[14..];
    while !rest.is_empty() {
        let len = u32::from_be_bytes(rest[4..8].try_into().unwrap()) as usize;
        chunks.push((&rest[..4], &rest[8..8 + len]));
        rest = &rest[8 + len..];
    }
    chunks
}

#[test]
fn header_for_two_tracks() {
    let file = MidiFile::new(2);
    let bytes = file.to_bytes().unwrap();

    assert_eq!(
        &bytes[..14],
        &[
            0x4D, 0x54, 0x68, 0x64, 0x00, 0x00, 0x00, 0x06, 0x00, 0x01, 0x00, 0x02, 0x00, 0x80
        ]
    );
    assert_eq!(track_chunks(&bytes).len(), 2);
}

#[test]
fn note_expands_to_two_wire_events() {
    let mut file = MidiFile::new(1);
    file.add_note(0, 60, 1, 2, 100).unwrap();

    let wire = file.track(0).unwrap().compile();
    assert_eq!(wire.len(), 2);

    assert_eq!(wire[0].accumulated_ticks(), 128);
    assert_eq!(
        wire[0].event(),
        &WireEvent::NoteOn {
            channel: Channel::One,
            note: DataByte::new(60).unwrap(),
            velocity: DataByte::new(100).unwrap(),
        }
    );
    assert_eq!(wire[1].accumulated_ticks(), 384);
    assert_eq!(
        wire[1].event(),
        &WireEvent::NoteOff {
            channel: Channel::One,
            note: DataByte::new(60).unwrap(),
            velocity: DataByte::new(100).unwrap(),
        }
    );
}

#[test]
fn every_track_ends_with_end_of_track() {
    let mut file = MidiFile::new(3);
    file.add_note(1, 60, 0, 1, 90).unwrap();
    file.add_note(1, 62, 1, 1, 90).unwrap();
    file.add_track_name(2, 0, "Strings").unwrap();

    for track in file.tracks() {
        let body = track.serialize().unwrap();
        assert_eq!(&body[body.len() - 3..], &[0xFF, 0x2F, 0x00]);
    }

    let bytes = file.to_bytes().unwrap();
    for (kind, body) in track_chunks(&bytes) {
        assert_eq!(kind, b"MTrk");
        assert_eq!(&body[body.len() - 3..], &[0xFF, 0x2F, 0x00]);
    }
}

#[test]
fn tempo_is_stored_in_microseconds() {
    let mut file = MidiFile::new(1);
    file.set_tempo(0, 0, 120).unwrap();

    let Event::Tempo { time, tempo } = &file.track(0).unwrap().events()[0] else {
        panic!("expected a tempo event");
    };
    assert_eq!(*time, 0);
    assert_eq!(tempo.micros_per_quarter_note(), 500_000);
}

#[test]
fn out_of_range_track_leaves_file_untouched() {
    let mut file = MidiFile::new(2);
    file.add_note(0, 60, 0, 1, 100).unwrap();
    let before = file.clone();

    let err = file.add_note(2, 60, 0, 1, 100).unwrap_err();
    assert!(matches!(
        err,
        FileError::TrackOutOfRange { index: 2, count: 2 }
    ));
    assert!(err.is_out_of_range());

    assert!(file.add_track_name(5, 0, "nope").is_err());
    assert!(file.set_tempo(2, 0, 120).is_err());
    assert!(file.set_program_change(2, 0, 1).is_err());

    assert_eq!(file, before);
}

#[test]
fn writing_twice_is_identical() {
    init_logging();

    let mut file = MidiFile::new(2);
    file.add_track_name(0, 0, "Lead").unwrap();
    file.set_tempo(0, 0, 140).unwrap();
    file.add_note(0, 72, 0, 1, 100).unwrap();
    file.add_note(1, 48, 0, 4, 80).unwrap();

    let mut first = Vec::new();
    let mut second = Vec::new();
    file.write(&mut first).unwrap();
    file.write(&mut second).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, file.to_bytes().unwrap());
}

#[test]
fn adding_after_writing_is_reflected() {
    let mut file = MidiFile::new(1);
    file.add_note(0, 60, 0, 1, 100).unwrap();
    let before = file.to_bytes().unwrap();

    file.add_note(0, 64, 1, 1, 100).unwrap();
    let after = file.to_bytes().unwrap();

    // note on with a zero delta after the first note off, then a note off 128 ticks on
    assert_eq!(after.len(), before.len() + 4 + 5);
}

#[test]
fn whole_file_bytes() {
    let mut file = MidiFile::new(1);
    file.add_track_name(0, 0, "A").unwrap();
    file.set_tempo(0, 0, 120).unwrap();
    file.set_program_change(0, 0, 5).unwrap();
    file.add_note(0, 60, 0, 1, 64).unwrap();

    let mut expected = vec![
        0x4D, 0x54, 0x68, 0x64, 0x00, 0x00, 0x00, 0x06, 0x00, 0x01, 0x00, 0x01, 0x00, 0x80,
    ];
    let body = [
        0x00, 0xFF, 0x03, 0x01, b'A', // track name
        0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, // 500000 us per beat
        0x00, 0xC0, 0x05, // program 5
        0x00, 0x90, 60, 64, // note on
        0x81, 0x00, 0x80, 60, 64, // note off, 128 ticks later
        0x00, 0xFF, 0x2F, 0x00,
    ];
    expected.extend_from_slice(b"MTrk");
    expected.extend_from_slice(&(body.len() as u32).to_be_bytes());
    expected.extend_from_slice(&body);

    assert_eq!(file.to_bytes().unwrap(), expected);
}

#[test]
fn sink_errors_are_returned() {
    let mut file = MidiFile::new(1);
    file.add_note(0, 60, 0, 1, 100).unwrap();

    let mut sink = FailingSink {
        accepted: Vec::new(),
        limit: 20,
    };
    let result = file.write(&mut sink);

    assert!(matches!(result, Err(FileError::Io(_))));
    assert_eq!(sink.accepted.as_slice(), &file.to_bytes().unwrap()[..20]);
}

#[test]
fn failing_in_the_header() {
    let file = MidiFile::new(1);
    let mut sink = FailingSink {
        accepted: Vec::new(),
        limit: 0,
    };
    assert!(matches!(file.write(&mut sink), Err(FileError::Io(_))));
    assert!(sink.accepted.is_empty());
}
