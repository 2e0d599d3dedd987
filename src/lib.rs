//! An incremental decoder for TAR archives.
//!
//! This library decodes TAR archives [1] from bytes as they arrive, in chunks
//! of whatever size the caller happens to have, instead of reading from a
//! seekable file. Files, directories and file contents are reported through
//! a [`Visitor`] while the decoder itself holds no more than one 512-byte
//! block of the archive and never allocates.
//!
//! ```
//! use std::io;
//! use tar_stream::{Decoder, Entry, Visitor};
//!
//! #[derive(Default)]
//! struct Sizes(Vec<(String, u64)>);
//!
//! impl Visitor for Sizes {
//!     fn file_begin(&mut self, entry: &Entry) -> io::Result<()> {
//!         let path = String::from_utf8_lossy(entry.path_bytes()).into_owned();
//!         self.0.push((path, 0));
//!         Ok(())
//!     }
//!     fn directory(&mut self, _entry: &Entry) -> io::Result<()> {
//!         Ok(())
//!     }
//!     fn data(&mut self, bytes: &[u8]) -> io::Result<()> {
//!         if let Some(last) = self.0.last_mut() {
//!             last.1 += bytes.len() as u64;
//!         }
//!         Ok(())
//!     }
//!     fn file_end(&mut self) -> io::Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> Result<(), tar_stream::Error> {
//! let mut decoder = Decoder::new(Sizes::default());
//! // an archive consisting only of its two end-of-archive blocks
//! for chunk in [0u8; 1024].chunks(100) {
//!     decoder.push(chunk)?;
//! }
//! decoder.finish()?;
//! assert!(decoder.into_inner().0.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! [1]: http://en.wikipedia.org/wiki/Tar_%28computing%29

#![deny(missing_docs)]

use std::io;
use std::path::Path;

pub use crate::block::BLOCK_SIZE;
pub use crate::decoder::{Decoder, State};
pub use crate::entry::Entry;
pub use crate::entry_type::EntryType;
pub use crate::error::Error;
pub use crate::header::Header;
#[cfg(feature = "unpack")]
pub use crate::unpack::Unpacker;
pub use crate::visitor::{Callbacks, Visitor};

mod block;
mod decoder;
mod entry;
mod entry_type;
mod error;
mod header;
#[cfg(feature = "unpack")]
mod unpack;
mod visitor;

#[cfg(any(windows, target_arch = "wasm32"))]
fn bytes2path(bytes: &[u8]) -> io::Result<&Path> {
    std::str::from_utf8(bytes).map(Path::new).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "only Unicode paths are supported on this platform: {}",
                String::from_utf8_lossy(bytes)
            ),
        )
    })
}

#[cfg(unix)]
fn bytes2path(bytes: &[u8]) -> io::Result<&Path> {
    use std::ffi::OsStr;
    use std::os::unix::prelude::*;

    Ok(Path::new(OsStr::from_bytes(bytes)))
}
