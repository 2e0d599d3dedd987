use std::fmt;
use std::io;

use crate::Entry;

/// The consumer of a decoded archive.
///
/// The decoder calls these methods synchronously from inside
/// [`Decoder::push`] and [`Decoder::finish`], strictly in archive order:
/// `file_begin`, then zero or more `data` calls with consecutive slices of
/// the body, then `file_end`. Returning an error from any of them stops the
/// decoder for good.
///
/// [`Decoder::push`]: crate::Decoder::push
/// [`Decoder::finish`]: crate::Decoder::finish
pub trait Visitor {
    /// Called once a regular file header has been validated, before any of
    /// its contents. Typically opens a file or prepares storage.
    fn file_begin(&mut self, entry: &Entry) -> io::Result<()>;

    /// Called once a directory header has been validated.
    fn directory(&mut self, entry: &Entry) -> io::Result<()>;

    /// Called with the next slice of the current file's contents. Slices
    /// never include block padding and add up to exactly `entry.size()`.
    fn data(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Called when the current file is complete, or from `finish` when the
    /// stream ended in the middle of it. Typically closes the file.
    fn file_end(&mut self) -> io::Result<()>;
}

impl<V: Visitor + ?Sized> Visitor for &mut V {
    fn file_begin(&mut self, entry: &Entry) -> io::Result<()> {
        (**self).file_begin(entry)
    }

    fn directory(&mut self, entry: &Entry) -> io::Result<()> {
        (**self).directory(entry)
    }

    fn data(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).data(bytes)
    }

    fn file_end(&mut self) -> io::Result<()> {
        (**self).file_end()
    }
}

/// A visitor assembled from a context value and four plain functions.
///
/// Each function receives the context mutably, so state shared between the
/// callbacks lives in one place.
///
/// ```
/// use std::io;
/// use tar_stream::{Callbacks, Decoder, Entry};
///
/// fn begin(count: &mut usize, _: &Entry) -> io::Result<()> {
///     *count += 1;
///     Ok(())
/// }
/// fn dir(_: &mut usize, _: &Entry) -> io::Result<()> {
///     Ok(())
/// }
/// fn data(_: &mut usize, _: &[u8]) -> io::Result<()> {
///     Ok(())
/// }
/// fn end(_: &mut usize) -> io::Result<()> {
///     Ok(())
/// }
///
/// let decoder = Decoder::new(Callbacks::new(0usize, begin, dir, data, end));
/// assert_eq!(*decoder.get_ref().context(), 0);
/// ```
pub struct Callbacks<C> {
    context: C,
    file_begin: fn(&mut C, &Entry) -> io::Result<()>,
    directory: fn(&mut C, &Entry) -> io::Result<()>,
    data: fn(&mut C, &[u8]) -> io::Result<()>,
    file_end: fn(&mut C) -> io::Result<()>,
}

impl<C> Callbacks<C> {
    /// Binds `context` to the four callbacks.
    pub fn new(
        context: C,
        file_begin: fn(&mut C, &Entry) -> io::Result<()>,
        directory: fn(&mut C, &Entry) -> io::Result<()>,
        data: fn(&mut C, &[u8]) -> io::Result<()>,
        file_end: fn(&mut C) -> io::Result<()>,
    ) -> Callbacks<C> {
        Callbacks {
            context,
            file_begin,
            directory,
            data,
            file_end,
        }
    }

    /// Returns a reference to the context.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Returns a mutable reference to the context.
    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    /// Unwraps the context.
    pub fn into_context(self) -> C {
        self.context
    }
}

impl<C> Visitor for Callbacks<C> {
    fn file_begin(&mut self, entry: &Entry) -> io::Result<()> {
        (self.file_begin)(&mut self.context, entry)
    }

    fn directory(&mut self, entry: &Entry) -> io::Result<()> {
        (self.directory)(&mut self.context, entry)
    }

    fn data(&mut self, bytes: &[u8]) -> io::Result<()> {
        (self.data)(&mut self.context, bytes)
    }

    fn file_end(&mut self) -> io::Result<()> {
        (self.file_end)(&mut self.context)
    }
}

impl<C: fmt::Debug> fmt::Debug for Callbacks<C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}
