use midiwrite::prelude::*;
use midly::{
    Format, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24},
};
use pretty_assertions::assert_eq;

fn note_on(e: &TrackEvent<'_>, delta: u32, channel: u8, key: u8, vel: u8) {
    assert_eq!(e.delta.as_int(), delta);
    let TrackEventKind::Midi {
        channel: ch,
        message: MidiMessage::NoteOn { key: k, vel: v },
    } = e.kind
    else {
        panic!("expected a note on, got {:?}", e.kind);
    };
    assert_eq!(ch.as_int(), channel);
    assert_eq!(k.as_int(), key);
    assert_eq!(v.as_int(), vel);
}

fn note_off(e: &TrackEvent<'_>, delta: u32, channel: u8, key: u8) {
    assert_eq!(e.delta.as_int(), delta);
    let TrackEventKind::Midi {
        channel: ch,
        message: MidiMessage::NoteOff { key: k, .. },
    } = e.kind
    else {
        panic!("expected a note off, got {:?}", e.kind);
    };
    assert_eq!(ch.as_int(), channel);
    assert_eq!(k.as_int(), key);
}

#[test]
fn output_is_a_valid_smf() {
    let mut file = MidiFile::new(2);
    file.add_track_name(0, 0, "Melody").unwrap();
    file.set_tempo(0, 0, 100).unwrap();
    file.add_note(0, 67, 2, 1, 90).unwrap();
    // added out of order on purpose
    file.add_note(0, 60, 0, 2, 100).unwrap();
    file.set_program_change(1, 0, 32).unwrap();
    file.add_note(1, 36, 0, 4, 80).unwrap();

    let bytes = file.to_bytes().unwrap();
    let smf = Smf::parse(&bytes).unwrap();

    assert_eq!(smf.header.format, Format::Parallel);
    assert_eq!(smf.header.timing, Timing::Metrical(u15::new(128)));
    assert_eq!(smf.tracks.len(), 2);

    let melody = &smf.tracks[0];
    assert_eq!(melody.len(), 7);
    assert_eq!(
        melody[0].kind,
        TrackEventKind::Meta(MetaMessage::TrackName(&b"Melody"[..]))
    );
    assert_eq!(
        melody[1].kind,
        TrackEventKind::Meta(MetaMessage::Tempo(u24::new(600_000)))
    );
    note_on(&melody[2], 0, 0, 60, 100);
    note_off(&melody[3], 256, 0, 60);
    note_on(&melody[4], 0, 0, 67, 90);
    note_off(&melody[5], 128, 0, 67);
    assert_eq!(melody[6].kind, TrackEventKind::Meta(MetaMessage::EndOfTrack));

    let bass = &smf.tracks[1];
    assert_eq!(bass.len(), 4);
    assert_eq!(
        bass[0].kind,
        TrackEventKind::Midi {
            channel: u4::new(1),
            message: MidiMessage::ProgramChange {
                program: u7::new(32)
            },
        }
    );
    note_on(&bass[1], 0, 1, 36, 80);
    note_off(&bass[2], 512, 1, 36);
    assert_eq!(bass[3].kind, TrackEventKind::Meta(MetaMessage::EndOfTrack));
}

#[test]
fn absolute_ticks_add_up() {
    let mut file = MidiFile::new(1);
    for beat in 0..8 {
        file.add_note(0, 60 + beat as u8, beat * 3, 2, 100).unwrap();
    }

    let bytes = file.to_bytes().unwrap();
    let smf = Smf::parse(&bytes).unwrap();

    let mut tick = 0;
    let mut absolute = Vec::new();
    for event in &smf.tracks[0] {
        tick += event.delta.as_int();
        absolute.push(tick);
    }

    let expected: Vec<u32> = file
        .track(0)
        .unwrap()
        .compile()
        .iter()
        .map(|e| e.accumulated_ticks())
        .collect();
    // the end of track sits on the last event's tick
    assert_eq!(&absolute[..absolute.len() - 1], expected.as_slice());
    assert_eq!(absolute.last(), expected.last());
}

#[test]
fn seventeen_tracks_reuse_channels() {
    let mut file = MidiFile::new(17);
    file.add_note(16, 60, 0, 1, 100).unwrap();

    let bytes = file.to_bytes().unwrap();
    let smf = Smf::parse(&bytes).unwrap();

    assert_eq!(smf.tracks.len(), 17);
    note_on(&smf.tracks[16][0], 0, 0, 60, 100);
}

#[test]
fn zero_length_note_is_released_after_it_is_struck() {
    let mut file = MidiFile::new(1);
    file.add_note(0, 60, 1, 0, 100).unwrap();

    let bytes = file.to_bytes().unwrap();
    let smf = Smf::parse(&bytes).unwrap();

    let track = &smf.tracks[0];
    assert_eq!(track.len(), 3);
    note_on(&track[0], 128, 0, 60, 100);
    note_off(&track[1], 0, 0, 60);
    assert_eq!(track[2].kind, TrackEventKind::Meta(MetaMessage::EndOfTrack));
}
