use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use filetime::{self, FileTime};
use log::{debug, warn};

use crate::{Entry, Visitor};

/// A [`Visitor`] that extracts an archive onto the filesystem.
///
/// Directories are created as they are announced and files are streamed to
/// disk block by block, so nothing but the file currently being written is
/// held open.
///
/// This operation is relatively sensitive in that it will not write files
/// outside of the destination directory. Entries which have a '..' in their
/// path are skipped during the unpacking process.
///
/// # Examples
///
/// ```no_run
/// use std::fs::File;
/// use std::io;
/// use tar_stream::{Decoder, Unpacker};
///
/// let mut decoder = Decoder::new(Unpacker::new("foo"));
/// io::copy(&mut File::open("foo.tar").unwrap(), &mut decoder).unwrap();
/// decoder.finish().unwrap();
/// decoder.into_inner().finish().unwrap();
/// ```
pub struct Unpacker {
    dst: PathBuf,
    preserve_mtime: bool,
    preserve_permissions: bool,
    overwrite: bool,
    file: Option<OpenFile>,
    dirs: Vec<(PathBuf, u32)>,
}

struct OpenFile {
    out: BufWriter<fs::File>,
    path: PathBuf,
    mtime: u64,
    mode: u32,
}

impl Unpacker {
    /// Creates an unpacker extracting into `dst`, which is created if it
    /// does not exist yet.
    pub fn new<P: AsRef<Path>>(dst: P) -> Unpacker {
        Unpacker {
            dst: dst.as_ref().to_path_buf(),
            preserve_mtime: true,
            preserve_permissions: false,
            overwrite: true,
            file: None,
            dirs: Vec::new(),
        }
    }

    /// Indicate whether modification times of extracted files are set from
    /// the archive. Defaults to true.
    pub fn set_preserve_mtime(&mut self, preserve: bool) {
        self.preserve_mtime = preserve;
    }

    /// Indicate whether the archive's permission bits are applied to
    /// extracted files and directories. Defaults to false.
    ///
    /// Directory permissions are only applied by [`finish`](Unpacker::finish),
    /// so a read-only directory can still receive its contents.
    pub fn set_preserve_permissions(&mut self, preserve: bool) {
        self.preserve_permissions = preserve;
    }

    /// Indicate whether existing files are replaced. When false, finding a
    /// file already in place is an error. Defaults to true.
    pub fn set_overwrite(&mut self, overwrite: bool) {
        self.overwrite = overwrite;
    }

    /// Applies the permissions of every extracted directory.
    ///
    /// Call this once the archive is complete, after `Decoder::finish`.
    /// Directories are handled in reverse archive order, so a read-only
    /// parent is locked only after its children. Does nothing unless
    /// `set_preserve_permissions(true)` was requested.
    pub fn finish(&mut self) -> io::Result<()> {
        while let Some((path, mode)) = self.dirs.pop() {
            set_perms(&path, mode)?;
        }
        Ok(())
    }

    /// Returns the destination directory.
    pub fn dst(&self) -> &Path {
        &self.dst
    }

    /// Maps an entry onto a location below `dst`, or `None` if it has to be
    /// skipped.
    fn target(&self, entry: &Entry) -> io::Result<Option<PathBuf>> {
        // Notes regarding bsdtar 2.8.3 / libarchive 2.8.3:
        // * Leading '/'s are trimmed. For example, `///test` is treated as
        //   `test`.
        // * If the filename contains '..', then the file is skipped when
        //   extracting the tarball.
        // * '//' within a filename is effectively skipped.
        let mut file_dst = self.dst.clone();
        for part in entry.path()?.components() {
            match part {
                // Leading '/' characters, root paths, and '.'
                // components are just ignored and treated as "empty
                // components"
                Component::Prefix(..) | Component::RootDir | Component::CurDir => continue,

                // If any part of the filename is '..', then skip over
                // unpacking the file to prevent directory traversal
                // security issues.  See, e.g.: CVE-2001-1267,
                // CVE-2002-0399, CVE-2005-1918, CVE-2007-4131
                Component::ParentDir => {
                    warn!(
                        "skipping `{}`: path leaves the destination",
                        entry.path_bytes().escape_ascii()
                    );
                    return Ok(None);
                }

                Component::Normal(part) => file_dst.push(part),
            }
        }

        // Skip cases where only slashes or '.' parts were seen, because
        // this is effectively an empty filename.
        if file_dst == self.dst {
            return Ok(None);
        }
        Ok(Some(file_dst))
    }

    fn create(&self, path: &Path) -> io::Result<fs::File> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| with_path(e, "creating", parent))?;
        }
        let file = if self.overwrite {
            fs::File::create(path)
        } else {
            fs::OpenOptions::new().write(true).create_new(true).open(path)
        };
        file.map_err(|e| with_path(e, "creating", path))
    }

    fn close(&self, file: OpenFile) -> io::Result<()> {
        let OpenFile {
            out,
            path,
            mtime,
            mode,
        } = file;
        let f = out.into_inner().map_err(|e| with_path(e.into_error(), "writing", &path))?;
        drop(f);

        if self.preserve_mtime {
            let mtime = FileTime::from_unix_time(mtime as i64, 0);
            filetime::set_file_times(&path, mtime, mtime)
                .map_err(|e| with_path(e, "setting mtime of", &path))?;
        }
        if self.preserve_permissions {
            set_perms(&path, mode)?;
        }
        Ok(())
    }
}

impl Visitor for Unpacker {
    fn file_begin(&mut self, entry: &Entry) -> io::Result<()> {
        self.file = None;
        let path = match self.target(entry)? {
            Some(path) => path,
            None => return Ok(()),
        };
        debug!("unpacking `{}`", path.display());
        let file = self.create(&path)?;
        self.file = Some(OpenFile {
            out: BufWriter::new(file),
            path,
            mtime: entry.mtime(),
            mode: entry.mode(),
        });
        Ok(())
    }

    fn directory(&mut self, entry: &Entry) -> io::Result<()> {
        let path = match self.target(entry)? {
            Some(path) => path,
            None => return Ok(()),
        };
        debug!("creating directory `{}`", path.display());
        fs::create_dir_all(&path).map_err(|e| with_path(e, "creating", &path))?;
        if self.preserve_permissions {
            self.dirs.push((path, entry.mode()));
        }
        Ok(())
    }

    fn data(&mut self, bytes: &[u8]) -> io::Result<()> {
        match self.file {
            Some(ref mut file) => file
                .out
                .write_all(bytes)
                .map_err(|e| with_path(e, "writing", &file.path)),
            // skipped entry
            None => Ok(()),
        }
    }

    fn file_end(&mut self) -> io::Result<()> {
        match self.file.take() {
            Some(file) => self.close(file),
            None => Ok(()),
        }
    }
}

fn with_path(err: io::Error, action: &str, path: &Path) -> io::Error {
    io::Error::new(
        err.kind(),
        format!("{} when {} `{}`", err, action, path.display()),
    )
}

#[cfg(unix)]
fn set_perms(dst: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::prelude::*;

    let perm = fs::Permissions::from_mode(mode & 0o7777);
    fs::set_permissions(dst, perm).map_err(|e| {
        io::Error::new(
            e.kind(),
            format!(
                "{} when setting permissions to {:o} for `{}`",
                e,
                mode,
                dst.display()
            ),
        )
    })
}

#[cfg(windows)]
fn set_perms(dst: &Path, mode: u32) -> io::Result<()> {
    let mut perm = fs::metadata(dst)?.permissions();
    perm.set_readonly(mode & 0o200 != 0o200);
    fs::set_permissions(dst, perm)
}
