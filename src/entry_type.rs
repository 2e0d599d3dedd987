// See https://en.wikipedia.org/wiki/Tar_%28computing%29#UStar_format
/// Indicate for the type of file described by a header.
///
/// Each `Header` has an `entry_type` method returning an instance of this type
/// which can be used to inspect what the header is describing. Only regular
/// files and directories can be decoded; every other type stops the decoder
/// with `Error::UnsupportedType`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EntryType {
    /// Regular file
    Regular,
    /// Hard link
    Link,
    /// Symbolic link
    Symlink,
    /// Character device
    Char,
    /// Block device
    Block,
    /// Directory
    Directory,
    /// Named pipe (fifo)
    Fifo,
    /// Any other type flag, carrying its raw byte.
    Other(u8),
}

impl EntryType {
    /// Creates a new entry type from a raw byte.
    pub fn new(byte: u8) -> EntryType {
        match byte {
            b'0' => EntryType::Regular,
            b'1' => EntryType::Link,
            b'2' => EntryType::Symlink,
            b'3' => EntryType::Char,
            b'4' => EntryType::Block,
            b'5' => EntryType::Directory,
            b'6' => EntryType::Fifo,
            b => EntryType::Other(b),
        }
    }

    /// Returns the raw underlying byte that this entry type represents.
    pub fn as_byte(&self) -> u8 {
        match *self {
            EntryType::Regular => b'0',
            EntryType::Link => b'1',
            EntryType::Symlink => b'2',
            EntryType::Char => b'3',
            EntryType::Block => b'4',
            EntryType::Directory => b'5',
            EntryType::Fifo => b'6',
            EntryType::Other(other) => other,
        }
    }

    /// Returns whether this type represents a regular file.
    pub fn is_file(&self) -> bool {
        *self == EntryType::Regular
    }

    /// Returns whether this type represents a directory.
    pub fn is_dir(&self) -> bool {
        *self == EntryType::Directory
    }

    /// Returns whether the decoder can handle members of this type.
    pub fn is_supported(&self) -> bool {
        self.is_file() || self.is_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::EntryType;

    #[test]
    fn unknown_flags_keep_their_byte() {
        assert_eq!(EntryType::new(b'L'), EntryType::Other(b'L'));
        assert_eq!(EntryType::new(b'L').as_byte(), b'L');
        assert_eq!(EntryType::Symlink.as_byte(), b'2');
    }

    #[test]
    fn only_files_and_directories_are_supported() {
        assert!(EntryType::new(b'0').is_supported());
        assert!(EntryType::new(b'5').is_supported());
        assert!(!EntryType::new(b'2').is_supported());
        assert!(!EntryType::new(b'1').is_supported());
        // old-style regular files are not accepted
        assert!(!EntryType::new(0).is_supported());
        assert_eq!(EntryType::new(0), EntryType::Other(0));
    }
}
