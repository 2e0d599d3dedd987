extern crate tar_stream;

use std::env::args_os;
use std::fs::File;
use std::io;

use tar_stream::{Decoder, Unpacker};

fn main() {
    env_logger::init();
    let mut args = args_os().skip(1);
    let archive = args.next().unwrap();
    let dst = args.next().unwrap();

    let mut unpacker = Unpacker::new(dst);
    unpacker.set_preserve_permissions(true);
    let mut decoder = Decoder::new(unpacker);
    io::copy(&mut File::open(archive).unwrap(), &mut decoder).unwrap();
    decoder.finish().unwrap();
    decoder.into_inner().finish().unwrap();
}
