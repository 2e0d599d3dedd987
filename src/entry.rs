use std::fmt;
use std::io;
use std::path::Path;

use crate::header::Header;
use crate::{bytes2path, EntryType};

const NAME_LEN: usize = 100;

/// The decoded header of one archive member.
///
/// An `Entry` is handed to [`Visitor::file_begin`] and
/// [`Visitor::directory`]. It owns a copy of the fields it needs, so it is a
/// small fixed-size value that does not borrow the decoder's block buffer.
///
/// [`Visitor::file_begin`]: crate::Visitor::file_begin
/// [`Visitor::directory`]: crate::Visitor::directory
#[derive(Clone, Copy)]
pub struct Entry {
    name: [u8; NAME_LEN],
    name_len: usize,
    size: u64,
    mode: u32,
    mtime: u64,
    entry_type: EntryType,
}

impl Entry {
    pub(crate) fn from_header(header: &Header) -> Entry {
        let path = header.path_bytes();
        let mut name = [0; NAME_LEN];
        name[..path.len()].copy_from_slice(path);
        Entry {
            name,
            name_len: path.len(),
            size: header.size(),
            mode: header.mode(),
            mtime: header.mtime(),
            entry_type: header.entry_type(),
        }
    }

    /// Returns the path name for this entry.
    ///
    /// This method may fail if the pathname is not valid unicode and this is
    /// called on a Windows platform.
    pub fn path(&self) -> io::Result<&Path> {
        bytes2path(self.path_bytes())
    }

    /// Returns the raw bytes listed for this entry, without any nul padding.
    pub fn path_bytes(&self) -> &[u8] {
        &self.name[..self.name_len]
    }

    /// Returns the size of the file body in bytes. Directories normally
    /// report 0.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns the mode bits for this entry.
    pub fn mode(&self) -> u32 {
        self.mode
    }

    /// Returns the last modification time in Unix time format.
    pub fn mtime(&self) -> u64 {
        self.mtime
    }

    /// Returns the type of this entry.
    pub fn entry_type(&self) -> EntryType {
        self.entry_type
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Entry")
            .field("path", &String::from_utf8_lossy(self.path_bytes()))
            .field("size", &self.size)
            .field("mode", &format_args!("{:o}", self.mode))
            .field("mtime", &self.mtime)
            .field("entry_type", &self.entry_type)
            .finish()
    }
}
