extern crate tar_stream;

use std::io::{self, stdin};

use tar_stream::{Decoder, Entry, Visitor};

struct List;

impl Visitor for List {
    fn file_begin(&mut self, entry: &Entry) -> io::Result<()> {
        println!("{}", entry.path()?.display());
        Ok(())
    }

    fn directory(&mut self, entry: &Entry) -> io::Result<()> {
        let path = entry.path()?;
        if entry.path_bytes().ends_with(b"/") {
            println!("{}", path.display());
        } else {
            println!("{}/", path.display());
        }
        Ok(())
    }

    fn data(&mut self, _bytes: &[u8]) -> io::Result<()> {
        Ok(())
    }

    fn file_end(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn main() {
    env_logger::init();
    let mut decoder = Decoder::new(List);
    io::copy(&mut stdin().lock(), &mut decoder).unwrap();
    decoder.finish().unwrap();
}
