extern crate sprout_wasm;
extern crate tempfile;

use std::io::Write;

use sprout_wasm::{decode_file, ErrorKind, LoadError};

fn write_file(bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn loads_module_from_file() {
    let file = write_file(&[
        0x00, 0x61, 0x73, 0x6D, 0x01, 0x00, 0x00, 0x00,
        0x01, 0x04, 0x01, 0x60, 0x00, 0x00,
        0x03, 0x02, 0x01, 0x00,
        0x0a, 0x04, 0x01, 0x02, 0x00, 0x0b,
    ]);
    let module = decode_file(file.path()).unwrap();
    assert_eq!(module.func_count(), 1);
    assert_eq!(module.code_count(), 1);
}

#[test]
fn decode_errors_pass_through() {
    let file = write_file(&[0x00, 0x61, 0x73, 0x6D, 0x02, 0x00, 0x00, 0x00]);
    match decode_file(file.path()) {
        Err(LoadError::Decode(e)) => {
            assert_eq!(e.kind(), ErrorKind::StructuralViolation);
            assert_eq!(e.offset, 4);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    match decode_file(dir.path().join("missing.wasm")) {
        Err(LoadError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
        other => panic!("unexpected result: {:?}", other),
    }
}
