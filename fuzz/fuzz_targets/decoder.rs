#![no_main]

use std::io;

use libfuzzer_sys::fuzz_target;

use tar_stream::{Decoder, Entry, State, Visitor};

/// Checks the callback ordering while decoding arbitrary input.
#[derive(Default, PartialEq, Debug)]
struct Checker {
    open: Option<u64>,
    delivered: u64,
    files: usize,
    dirs: usize,
    bytes: u64,
}

impl Visitor for Checker {
    fn file_begin(&mut self, entry: &Entry) -> io::Result<()> {
        assert!(self.open.is_none(), "file_begin inside a file");
        assert!(entry.entry_type().is_file());
        self.open = Some(entry.size());
        self.delivered = 0;
        self.files += 1;
        Ok(())
    }

    fn directory(&mut self, entry: &Entry) -> io::Result<()> {
        assert!(self.open.is_none(), "directory inside a file");
        assert!(entry.entry_type().is_dir());
        self.dirs += 1;
        Ok(())
    }

    fn data(&mut self, bytes: &[u8]) -> io::Result<()> {
        let size = self.open.expect("data outside a file");
        assert!(!bytes.is_empty() && bytes.len() <= 512);
        self.delivered += bytes.len() as u64;
        self.bytes += bytes.len() as u64;
        assert!(self.delivered <= size, "more data than the header declared");
        Ok(())
    }

    fn file_end(&mut self) -> io::Result<()> {
        assert!(self.open.take().is_some(), "file_end outside a file");
        Ok(())
    }
}

fn decode(data: &[u8], chunk: usize) -> (Checker, bool) {
    let mut decoder = Decoder::new(Checker::default());
    let mut ok = true;
    for piece in data.chunks(chunk) {
        if decoder.push(piece).is_err() {
            assert_eq!(decoder.state(), State::Failed);
            ok = false;
            break;
        }
    }
    if ok {
        ok = decoder.finish().is_ok();
        assert!(decoder.get_ref().open.is_none());
    }
    (decoder.into_inner(), ok)
}

fuzz_target!(|data: &[u8]| {
    let (chunk, archive) = match data.split_first() {
        Some((&chunk, archive)) => (usize::from(chunk).max(1), archive),
        None => return,
    };
    let whole = decode(archive, archive.len().max(1));
    let pieces = decode(archive, chunk);
    assert_eq!(whole, pieces);
});
