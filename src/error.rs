use thiserror::Error;

/// The error a sink can fail with.
#[cfg(feature = "std")]
pub type IoError = std::io::Error;
/// Without `std` nothing is written to a sink, so nothing can fail.
#[cfg(not(feature = "std"))]
pub type IoError = core::convert::Infallible;

#[doc = r#"
A set of errors that can occur while building or writing a [`MidiFile`](crate::file::MidiFile)
"#]
#[derive(Debug, Error)]
pub enum FileError {
    /// The track index does not name one of the file's tracks.
    #[error("Track {index} is out of range for a file with {count} tracks")]
    TrackOutOfRange {
        /// The requested track
        index: usize,
        /// How many tracks the file was created with
        count: usize,
    },
    /// A note number, velocity or program had its leading bit set.
    #[error("Invalid data byte: {0} (must be 0-127)")]
    DataByte(u8),
    /// The tempo cannot be stored in a set tempo meta event.
    #[error("Invalid tempo: {0} beats per minute")]
    Tempo(u32),
    /// A track chunk or track name is longer than a 32-bit length can describe.
    #[error("{0} bytes do not fit in a 32-bit length")]
    TooLong(usize),
    /// Writing to the output sink failed.
    #[error("Writing {0}")]
    Io(#[from] IoError),
}

impl FileError {
    /// True if a track index was out of range
    pub const fn is_out_of_range(&self) -> bool {
        matches!(self, Self::TrackOutOfRange { .. })
    }
}

/// Fit a byte count into a 32-bit length field.
pub(crate) fn length_field(len: usize) -> Result<u32, FileError> {
    u32::try_from(len).map_err(|_| FileError::TooLong(len))
}

#[test]
fn length_fits() {
    assert_eq!(length_field(0).ok(), Some(0));
    assert_eq!(length_field(u32::MAX as usize).ok(), Some(u32::MAX));
}

#[cfg(target_pointer_width = "64")]
#[test]
fn length_past_four_gibibytes() {
    let len = u32::MAX as usize + 1;
    assert!(matches!(length_field(len), Err(FileError::TooLong(l)) if l == len));
}
