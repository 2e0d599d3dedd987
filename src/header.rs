use std::fmt;

use zerocopy::{transmute_ref, FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::block::BLOCK_SIZE;
use crate::entry::Entry;
use crate::error::Error;
use crate::EntryType;

/// Representation of the header of an entry in an archive.
///
/// This is the pre-POSIX layout. Anything the UStar and GNU formats store
/// after the link name (magic, owner names, device numbers, prefix) lives in
/// `pad` and is not interpreted.
#[derive(Clone, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
#[allow(missing_docs)]
pub struct Header {
    pub name: [u8; 100],
    pub mode: [u8; 8],
    pub owner_id: [u8; 8],
    pub group_id: [u8; 8],
    pub size: [u8; 12],
    pub mtime: [u8; 12],
    pub cksum: [u8; 8],
    pub linkflag: [u8; 1],
    pub linkname: [u8; 100],
    pub pad: [u8; 255],
}

const _: () = assert!(std::mem::size_of::<Header>() == BLOCK_SIZE);

/// Offset of the checksum field, which is left out of its own sum.
const CKSUM_START: usize = 148;
const CKSUM_END: usize = 156;

impl Header {
    /// Views a raw block as a header.
    pub fn from_block(block: &[u8; BLOCK_SIZE]) -> &Header {
        transmute_ref!(block)
    }

    /// Returns a view into this header as a byte array.
    pub fn as_bytes(&self) -> &[u8; BLOCK_SIZE] {
        transmute_ref!(self)
    }

    /// Returns whether this block is a null record.
    ///
    /// Archives end with two zero-filled blocks; any block whose checksum
    /// field starts with a nul byte is treated the same way and skipped.
    pub fn is_null(&self) -> bool {
        self.cksum[0] == 0
    }

    /// Returns the pathname stored in this header as a byte array.
    ///
    /// The name ends at the first nul byte. A name that fills the whole
    /// field without one is returned in full; nothing past the field is ever
    /// read.
    pub fn path_bytes(&self) -> &[u8] {
        truncate(&self.name)
    }

    /// Returns the file size this header represents.
    pub fn size(&self) -> u64 {
        octal_from(&self.size)
    }

    /// Returns the mode bits for this file.
    pub fn mode(&self) -> u32 {
        octal_from(&self.mode) as u32
    }

    /// Returns the last modification time in Unix time format.
    pub fn mtime(&self) -> u64 {
        octal_from(&self.mtime)
    }

    /// Returns the type of file described by this header.
    pub fn entry_type(&self) -> EntryType {
        EntryType::new(self.linkflag[0])
    }

    /// Returns the checksum stored in this header.
    pub fn cksum(&self) -> u64 {
        octal_from(&self.cksum)
    }

    /// Computes the checksum of this header's current contents, counting the
    /// checksum field itself as eight spaces.
    pub fn calculate_cksum(&self) -> u32 {
        let bytes = self.as_bytes();
        bytes[..CKSUM_START]
            .iter()
            .chain(&bytes[CKSUM_END..])
            .fold(0, |a, b| a + (*b as u32))
            + 8 * b' ' as u32
    }

    /// Validates this header and decodes the fields of the entry it
    /// describes.
    ///
    /// Returns `Ok(None)` for a null record and `Error::BadChecksum` if the
    /// stored checksum does not match. The entry type is decoded but not
    /// checked here.
    pub fn entry(&self) -> Result<Option<Entry>, Error> {
        if self.is_null() {
            return Ok(None);
        }

        let stored = self.cksum();
        let computed = self.calculate_cksum();
        if stored != u64::from(computed) {
            return Err(Error::BadChecksum { stored, computed });
        }

        Ok(Some(Entry::from_header(self)))
    }
}

impl fmt::Debug for Header {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Header")
            .field("path", &String::from_utf8_lossy(self.path_bytes()))
            .field("size", &self.size())
            .field("mode", &format_args!("{:o}", self.mode()))
            .field("mtime", &self.mtime())
            .field("entry_type", &self.entry_type())
            .field("cksum", &self.cksum())
            .finish()
    }
}

/// Decodes a numeric field written as ASCII octal.
///
/// Leading spaces are skipped and decoding stops at the first byte that is
/// not an octal digit, so "0000644\0", "   644 " and "644" all decode to the
/// same value and an empty field decodes to 0.
pub fn octal_from(slice: &[u8]) -> u64 {
    slice
        .iter()
        .skip_while(|b| **b == b' ')
        .take_while(|b| (b'0'..=b'7').contains(*b))
        .fold(0, |n, b| (n << 3) | u64::from(b - b'0'))
}

pub fn truncate(slice: &[u8]) -> &[u8] {
    match slice.iter().position(|i| *i == 0) {
        Some(i) => &slice[..i],
        None => slice,
    }
}
