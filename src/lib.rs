//! Decoding of Webassembly binary modules, based on the wasm-core-1 W3C standard
//!
//! The abstract module structure lives in [`structure`], the decoder in
//! [`binary_format`]. This crate ties both together and adds loading from
//! the filesystem.

pub extern crate sproutwasm_structure as structure;
pub extern crate sproutwasm_binary_format as binary_format;

use std::path::Path;

use thiserror::Error;

pub use crate::binary_format::{decode, DecodeError, ErrorKind};
pub use crate::structure::modules::Module;

/// Failure to load a module from a file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read module: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Reads the file at `path` and decodes it as a module binary.
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<Module, LoadError> {
    let bytes = std::fs::read(path)?;
    Ok(decode(&bytes)?)
}
