use std::io;

use crate::EntryType;

/// Reasons the decoder can stop.
///
/// Every variant is fatal for the decoder that returned it: afterwards all
/// calls to `push` fail with `Error::Halted` and the decoder has to be
/// replaced.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A header block failed its checksum, so the input is corrupt or not a
    /// tar archive at all.
    #[error("archive header checksum mismatch: header says {stored:o}, computed {computed:o}")]
    BadChecksum {
        /// Value decoded from the checksum field.
        stored: u64,
        /// Sum of the header bytes.
        computed: u32,
    },

    /// A member is neither a regular file nor a directory.
    #[error("unsupported entry type {0:?}")]
    UnsupportedType(EntryType),

    /// One of the visitor's callbacks returned an error.
    #[error("visitor failed")]
    Callback(#[source] io::Error),

    /// The decoder already failed and refuses further input.
    #[error("decoder halted by an earlier error")]
    Halted,
}

impl From<Error> for io::Error {
    fn from(err: Error) -> io::Error {
        match err {
            Error::Callback(err) => err,
            err => io::Error::new(io::ErrorKind::InvalidData, err),
        }
    }
}
