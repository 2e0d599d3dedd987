use std::cmp;

use crate::header::Header;

/// Size of every header and data block in an archive.
pub const BLOCK_SIZE: usize = 512;

/// One block of the archive, filled incrementally as bytes arrive.
///
/// The number of bytes still missing is always `BLOCK_SIZE - len()`.
pub struct Block {
    buf: [u8; BLOCK_SIZE],
    idx: usize,
}

impl Block {
    pub const fn new() -> Block {
        Block {
            buf: [0; BLOCK_SIZE],
            idx: 0,
        }
    }

    /// Copies as much of `data` as still fits into this block and returns
    /// how many bytes were taken.
    pub fn fill(&mut self, data: &[u8]) -> usize {
        let n = cmp::min(data.len(), self.remaining());
        self.buf[self.idx..self.idx + n].copy_from_slice(&data[..n]);
        self.idx += n;
        n
    }

    pub fn len(&self) -> usize {
        self.idx
    }

    pub fn remaining(&self) -> usize {
        BLOCK_SIZE - self.idx
    }

    pub fn is_full(&self) -> bool {
        self.idx == BLOCK_SIZE
    }

    pub fn filled(&self) -> &[u8] {
        &self.buf[..self.idx]
    }

    /// Views a complete block as a header.
    pub fn header(&self) -> &Header {
        debug_assert!(self.is_full());
        Header::from_block(&self.buf)
    }

    pub fn reset(&mut self) {
        self.idx = 0;
    }
}
