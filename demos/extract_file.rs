extern crate tar_stream;

use std::env::args_os;
use std::io::{self, stdin, stdout, Write};
use std::path::PathBuf;

use tar_stream::{Decoder, Entry, Visitor};

struct Extract<W> {
    filename: PathBuf,
    selected: bool,
    out: W,
}

impl<W: Write> Visitor for Extract<W> {
    fn file_begin(&mut self, entry: &Entry) -> io::Result<()> {
        self.selected = entry.path()? == self.filename;
        Ok(())
    }

    fn directory(&mut self, _entry: &Entry) -> io::Result<()> {
        Ok(())
    }

    fn data(&mut self, bytes: &[u8]) -> io::Result<()> {
        if self.selected {
            self.out.write_all(bytes)?;
        }
        Ok(())
    }

    fn file_end(&mut self) -> io::Result<()> {
        if self.selected {
            self.selected = false;
            self.out.flush()?;
        }
        Ok(())
    }
}

fn main() {
    env_logger::init();
    let first_arg = args_os().nth(1).unwrap();
    let mut decoder = Decoder::new(Extract {
        filename: PathBuf::from(first_arg),
        selected: false,
        out: stdout().lock(),
    });
    io::copy(&mut stdin().lock(), &mut decoder).unwrap();
    decoder.finish().unwrap();
}
