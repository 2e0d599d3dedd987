use std::cmp;
use std::fmt;
use std::io;

use log::{debug, trace, warn};

use crate::block::Block;
use crate::error::Error;
use crate::{Entry, EntryType, Visitor};

/// Where the decoder is within the archive.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum State {
    /// Collecting the next header block. This is the initial state.
    AwaitingHeader,
    /// Collecting the contents of a regular file.
    ReceivingFileData,
    /// Skipping the padding that rounds a file up to a whole block.
    ConsumingPadding,
    /// An error occurred; no further input is accepted.
    Failed,
}

/// An incremental TAR decoder.
///
/// Bytes are handed to [`push`](Decoder::push) in chunks of any size and the
/// decoder reports what they contain to its [`Visitor`]. A single call may
/// cover many members, or only a few bytes of one header; the sequence of
/// callbacks is the same however the archive is split up.
///
/// The decoder is a plain value holding one 512-byte block and a little
/// bookkeeping. It never allocates, so it can live on the stack, in a
/// `static`, or inside any other structure.
pub struct Decoder<V> {
    block: Block,
    remaining: u64,
    state: State,
    entry: Option<Entry>,
    visitor: V,
}

impl<V: Visitor> Decoder<V> {
    /// Creates a new decoder reporting to `visitor`.
    pub fn new(visitor: V) -> Decoder<V> {
        Decoder {
            block: Block::new(),
            remaining: 0,
            state: State::AwaitingHeader,
            entry: None,
            visitor,
        }
    }

    /// Decodes the next chunk of the archive.
    ///
    /// The whole chunk is consumed unless an error occurs. Chunks must be
    /// pushed in archive order without gaps; empty chunks are allowed.
    ///
    /// Any error leaves the decoder in [`State::Failed`], and every later
    /// call returns `Error::Halted` without looking at its input.
    pub fn push(&mut self, mut data: &[u8]) -> Result<(), Error> {
        if self.state == State::Failed {
            return Err(Error::Halted);
        }
        while !data.is_empty() {
            let written = self.block.fill(data);
            data = &data[written..];
            let step = match self.state {
                State::AwaitingHeader => self.header_bytes(),
                State::ReceivingFileData => self.file_bytes(written),
                State::ConsumingPadding => {
                    self.padding_bytes();
                    Ok(())
                }
                State::Failed => Err(Error::Halted),
            };
            if let Err(e) = step {
                debug!("decoder failed: {}", e);
                self.state = State::Failed;
                return Err(e);
            }
        }
        Ok(())
    }

    /// Signals the end of the archive.
    ///
    /// If the stream stopped in the middle of a file's contents,
    /// [`Visitor::file_end`] is called once so the visitor can release
    /// whatever it acquired in `file_begin`, and the decoder goes back to
    /// waiting for a header. In every other state this does nothing.
    pub fn finish(&mut self) -> Result<(), Error> {
        match self.state {
            State::ReceivingFileData => {
                warn!(
                    "archive ended with {} bytes of `{}` missing",
                    self.remaining,
                    self.entry_name()
                );
                self.block.reset();
                self.remaining = 0;
                self.state = State::AwaitingHeader;
                if let Err(e) = self.visitor.file_end() {
                    self.state = State::Failed;
                    return Err(Error::Callback(e));
                }
            }
            State::AwaitingHeader if self.block.len() > 0 => {
                warn!(
                    "archive ended inside a header block ({} bytes)",
                    self.block.len()
                );
            }
            _ => {}
        }
        Ok(())
    }

    fn header_bytes(&mut self) -> Result<(), Error> {
        if !self.block.is_full() {
            return Ok(());
        }
        let entry = match self.block.header().entry()? {
            Some(entry) => entry,
            None => {
                trace!("skipping null record");
                self.block.reset();
                return Ok(());
            }
        };
        self.block.reset();
        self.entry = Some(entry);

        match entry.entry_type() {
            EntryType::Regular => {
                debug!("file `{}` ({} bytes)", self.entry_name(), entry.size());
                self.visitor.file_begin(&entry).map_err(Error::Callback)?;
                if entry.size() == 0 {
                    // no content blocks follow
                    self.visitor.file_end().map_err(Error::Callback)?;
                } else {
                    self.remaining = entry.size();
                    self.state = State::ReceivingFileData;
                }
            }
            EntryType::Directory => {
                debug!("directory `{}`", self.entry_name());
                self.visitor.directory(&entry).map_err(Error::Callback)?;
            }
            other => return Err(Error::UnsupportedType(other)),
        }
        Ok(())
    }

    fn file_bytes(&mut self, written: usize) -> Result<(), Error> {
        let body = cmp::min(self.remaining, written as u64) as usize;
        self.remaining -= body as u64;

        if self.remaining == 0 {
            // Padding bytes that arrived along with the end of the file stay
            // in the block but are not handed out.
            let end = self.block.len() - (written - body);
            let delivered = self.visitor.data(&self.block.filled()[..end]);
            let finished = self.visitor.file_end();
            delivered.map_err(Error::Callback)?;
            finished.map_err(Error::Callback)?;

            if self.block.is_full() {
                self.block.reset();
                self.state = State::AwaitingHeader;
            } else {
                self.state = State::ConsumingPadding;
            }
        } else if self.block.is_full() {
            self.visitor
                .data(self.block.filled())
                .map_err(Error::Callback)?;
            self.block.reset();
        }
        Ok(())
    }

    fn padding_bytes(&mut self) {
        if self.block.is_full() {
            trace!("end of file padding");
            self.block.reset();
            self.state = State::AwaitingHeader;
        }
    }

    fn entry_name(&self) -> impl fmt::Display + '_ {
        self.entry
            .as_ref()
            .map(Entry::path_bytes)
            .unwrap_or_default()
            .escape_ascii()
    }
}

impl<V> Decoder<V> {
    /// Returns the current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Returns the most recently decoded header, if any.
    pub fn entry(&self) -> Option<&Entry> {
        self.entry.as_ref()
    }

    /// Returns how many bytes of the current file are still to come. Only
    /// meaningful in [`State::ReceivingFileData`].
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Returns a reference to the visitor.
    pub fn get_ref(&self) -> &V {
        &self.visitor
    }

    /// Returns a mutable reference to the visitor.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.visitor
    }

    /// Unwraps this decoder, returning the visitor.
    pub fn into_inner(self) -> V {
        self.visitor
    }
}

/// Pushes everything written into the decoder, so a whole archive can be
/// decoded with `io::copy`. Decoder errors are converted with
/// `From<Error> for io::Error`.
impl<V: Visitor> io::Write for Decoder<V> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.push(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<V> fmt::Debug for Decoder<V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Decoder")
            .field("state", &self.state)
            .field("block_len", &self.block.len())
            .field("remaining", &self.remaining)
            .field("entry", &self.entry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::mem;

    use super::{Decoder, State};
    use crate::{Entry, Error, Visitor, BLOCK_SIZE};

    #[derive(Default)]
    struct Count {
        begins: usize,
        bytes: usize,
        ends: usize,
    }

    impl Visitor for Count {
        fn file_begin(&mut self, _entry: &Entry) -> io::Result<()> {
            self.begins += 1;
            Ok(())
        }
        fn directory(&mut self, _entry: &Entry) -> io::Result<()> {
            Ok(())
        }
        fn data(&mut self, bytes: &[u8]) -> io::Result<()> {
            self.bytes += bytes.len();
            Ok(())
        }
        fn file_end(&mut self) -> io::Result<()> {
            self.ends += 1;
            Ok(())
        }
    }

    fn header(name: &[u8], size: u64, linkflag: u8) -> [u8; BLOCK_SIZE] {
        let mut block = [0u8; BLOCK_SIZE];
        block[..name.len()].copy_from_slice(name);
        let size = format!("{:011o}\0", size);
        block[124..136].copy_from_slice(size.as_bytes());
        block[156] = linkflag;
        let sum = crate::Header::from_block(&block).calculate_cksum();
        block[148..156].copy_from_slice(format!("{:06o}\0 ", sum).as_bytes());
        block
    }

    #[test]
    fn footprint_is_one_block_plus_bookkeeping() {
        assert!(mem::size_of::<Decoder<Count>>() < 2 * BLOCK_SIZE);
        assert!(mem::size_of::<Decoder<&mut Count>>() < 2 * BLOCK_SIZE);
    }

    #[test]
    fn decoders_are_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Decoder<Count>>();
        assert_send::<Decoder<&mut Count>>();
        #[cfg(feature = "unpack")]
        assert_send::<Decoder<crate::Unpacker>>();
    }

    #[test]
    fn states_follow_the_stream() {
        let mut d = Decoder::new(Count::default());
        assert_eq!(d.state(), State::AwaitingHeader);
        assert!(d.entry().is_none());

        d.push(&header(b"f", 10, b'0')[..511]).unwrap();
        assert_eq!(d.state(), State::AwaitingHeader);
        d.push(&header(b"f", 10, b'0')[511..]).unwrap();
        assert_eq!(d.state(), State::ReceivingFileData);
        assert_eq!(d.remaining(), 10);
        assert_eq!(d.entry().unwrap().path_bytes(), b"f");

        d.push(&[b'x'; 4]).unwrap();
        assert_eq!(d.remaining(), 6);
        assert_eq!(d.get_ref().bytes, 0);

        d.push(&[b'x'; 7]).unwrap();
        assert_eq!(d.state(), State::ConsumingPadding);
        assert_eq!(d.get_ref().bytes, 10);
        assert_eq!(d.get_ref().ends, 1);

        d.push(&[0; BLOCK_SIZE - 11]).unwrap();
        assert_eq!(d.state(), State::AwaitingHeader);
    }

    #[test]
    fn finish_closes_an_interrupted_file() {
        let mut d = Decoder::new(Count::default());
        d.push(&header(b"f", 1000, b'0')).unwrap();
        d.push(&[1; 600]).unwrap();
        assert_eq!(d.get_ref().bytes, BLOCK_SIZE);

        d.finish().unwrap();
        assert_eq!(d.state(), State::AwaitingHeader);
        assert_eq!(d.get_ref().ends, 1);

        // nothing left to close
        d.finish().unwrap();
        assert_eq!(d.get_ref().ends, 1);
    }

    #[test]
    fn failed_decoder_ignores_input() {
        let mut d = Decoder::new(Count::default());
        let mut block = header(b"f", 1, b'0');
        block[0] = b'g';
        match d.push(&block) {
            Err(Error::BadChecksum { .. }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(d.state(), State::Failed);
        assert!(matches!(d.push(&[]), Err(Error::Halted)));
        assert!(matches!(d.push(&header(b"f", 1, b'0')), Err(Error::Halted)));
        d.finish().unwrap();
        assert_eq!(d.get_ref().begins, 0);
    }
}
