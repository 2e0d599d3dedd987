use std::iter;

use tar_stream::{EntryType, Error, Header, BLOCK_SIZE};

fn regular(h: &mut tar::Header, path: &str, size: u64) {
    t!(h.set_path(path));
    h.set_size(size);
    h.set_mode(0o600);
    h.set_mtime(1234567890);
    h.set_entry_type(tar::EntryType::Regular);
    h.set_cksum();
}

#[test]
fn reads_all_header_flavors() {
    for mut h in [
        tar::Header::new_old(),
        tar::Header::new_ustar(),
        tar::Header::new_gnu(),
    ] {
        regular(&mut h, "foo/bar", 42);
        let ours = Header::from_block(h.as_bytes());
        assert_eq!(ours.path_bytes(), b"foo/bar");
        assert_eq!(ours.size(), 42);
        assert_eq!(ours.mode(), 0o600);
        assert_eq!(ours.mtime(), 1234567890);
        assert_eq!(ours.entry_type(), EntryType::Regular);
        assert_eq!(ours.cksum(), u64::from(ours.calculate_cksum()));
        assert_eq!(ours.calculate_cksum(), t!(h.cksum()));
        assert!(!ours.is_null());

        let entry = t!(ours.entry()).unwrap();
        assert_eq!(entry.path_bytes(), b"foo/bar");
        assert_eq!(entry.size(), 42);
    }
}

#[test]
fn same_bytes() {
    let mut h = tar::Header::new_ustar();
    regular(&mut h, "x", 1);
    let ours = Header::from_block(h.as_bytes());
    assert_eq!(&ours.as_bytes()[..], &h.as_bytes()[..]);
    assert_eq!(ours.as_bytes().len(), BLOCK_SIZE);
}

#[test]
fn directory() {
    let mut h = tar::Header::new_gnu();
    t!(h.set_path("foo"));
    h.set_size(0);
    h.set_mode(0o755);
    h.set_entry_type(tar::EntryType::Directory);
    h.set_cksum();

    let entry = t!(Header::from_block(h.as_bytes()).entry()).unwrap();
    assert!(entry.entry_type().is_dir());
    assert_eq!(entry.mode(), 0o755);
}

#[test]
fn ustar_prefix_is_ignored() {
    // only the 100 byte name field is decoded
    let medium = iter::repeat("fo/").take(52).collect::<String>();
    let mut h = tar::Header::new_ustar();
    regular(&mut h, &medium, 0);
    let ours = Header::from_block(h.as_bytes());
    assert!(ours.path_bytes().len() <= 100);
    assert!(medium.as_bytes().ends_with(ours.path_bytes()));
}

#[test]
fn large_sizes() {
    let mut h = tar::Header::new_old();
    // the largest size an eleven digit octal field can hold
    regular(&mut h, "big", 0o77777777777);
    assert_eq!(Header::from_block(h.as_bytes()).size(), 0o77777777777);
}

#[test]
fn zero_block_is_null() {
    let block = [0u8; BLOCK_SIZE];
    let h = Header::from_block(&block);
    assert!(h.is_null());
    assert!(t!(h.entry()).is_none());
}

#[test]
fn bad_checksum() {
    let mut h = tar::Header::new_gnu();
    regular(&mut h, "foo", 3);
    let original = t!(h.cksum());
    h.as_old_mut().size[0] ^= 0x40;

    match Header::from_block(h.as_bytes()).entry() {
        Err(Error::BadChecksum { stored, computed }) => {
            assert_eq!(stored, u64::from(original));
            assert_eq!(computed, original + 0x40);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn checksum_field_is_excluded() {
    let mut h = tar::Header::new_old();
    regular(&mut h, "foo", 3);
    let expected = Header::from_block(h.as_bytes()).calculate_cksum();
    h.as_old_mut().cksum = *b"garbage!";
    assert_eq!(Header::from_block(h.as_bytes()).calculate_cksum(), expected);
}

#[test]
fn link_header() {
    let mut h = tar::Header::new_gnu();
    t!(h.set_path("lnk"));
    t!(h.set_link_name("target"));
    h.set_size(0);
    h.set_entry_type(tar::EntryType::Symlink);
    h.set_cksum();

    let entry = t!(Header::from_block(h.as_bytes()).entry()).unwrap();
    assert_eq!(entry.entry_type(), EntryType::Symlink);
    assert!(!entry.entry_type().is_supported());
}
