//! Prints the SHA-256 digest of every file in an archive.
//!
//! The archive is read in randomly sized pieces of 90 to 160 bytes to show
//! that the decoder does not care how its input is split. Pass a seed as the
//! second argument to try a different split.

extern crate tar_stream;

use std::env;
use std::fs::File;
use std::io::{self, Read};
use std::process;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};
use tar_stream::{Decoder, Entry, Visitor};

#[derive(Default)]
struct Digests {
    hasher: Sha256,
    size: u64,
}

impl Visitor for Digests {
    fn file_begin(&mut self, entry: &Entry) -> io::Result<()> {
        print!("{} ", entry.path_bytes().escape_ascii());
        self.hasher = Sha256::new();
        self.size = 0;
        Ok(())
    }

    fn directory(&mut self, entry: &Entry) -> io::Result<()> {
        println!("create dir {}", entry.path_bytes().escape_ascii());
        Ok(())
    }

    fn data(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.hasher.update(bytes);
        self.size += bytes.len() as u64;
        Ok(())
    }

    fn file_end(&mut self) -> io::Result<()> {
        let digest = self.hasher.finalize_reset();
        println!("{} (sz {})", hex::encode(digest), self.size);
        Ok(())
    }
}

fn main() {
    env_logger::init();
    let mut args = env::args().skip(1);
    let path = match args.next() {
        Some(path) => path,
        None => {
            eprintln!("usage: tar2sha256 <file> [seed]");
            process::exit(2);
        }
    };
    let seed = match args.next() {
        Some(seed) => seed.parse().unwrap(),
        None => 5612093,
    };

    let mut file = File::open(&path).unwrap();
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut decoder = Decoder::new(Digests::default());
    let mut buf = [0u8; 160];
    loop {
        let len = rng.gen_range(90..=160);
        let n = file.read(&mut buf[..len]).unwrap();
        if n == 0 {
            break;
        }
        if let Err(e) = decoder.push(&buf[..n]) {
            eprintln!("{}: {}", path, e);
            process::exit(1);
        }
    }
    decoder.finish().unwrap();
}
