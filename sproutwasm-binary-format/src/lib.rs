//! A decoder for the binary format of the wasm-core-1 W3C standard.
//!
//! [`decode`] turns a complete module binary into a
//! [`Module`](sproutwasm_structure::modules::Module) or reports the first
//! violation it found. Instructions are not decoded; expressions and
//! function bodies are kept as opaque byte spans.

#[macro_use]
extern crate log;

extern crate sproutwasm_structure;

/// Reads one byte and maps it through the given patterns, failing with
/// `$reason(byte)` on any other value.
macro_rules! btagmap {
    ($input:expr, $reason:path; $($b:pat => $r:expr),+ $(,)*) => ({
        let input = $input;
        let (rest, b) = crate::values::parse_byte(input)?;
        match b {
            $($b => Ok((rest, $r)),)+
            other => crate::error::fail(input, $reason(other)),
        }
    })
}

pub mod error;
pub mod leb128;
pub mod values;
mod types;
mod instructions;
mod sections;
mod module;

pub use crate::error::{DecodeError, ErrorKind, Reason};
pub use crate::sections::SectionId;

use sproutwasm_structure::modules::Module;

/// Decodes a complete module binary.
///
/// Either the whole input is a well-formed module, or the first violation
/// encountered is returned; a partially decoded module is never exposed.
pub fn decode(bytes: &[u8]) -> Result<Module, DecodeError> {
    match module::parse_module(bytes) {
        Ok((_, module)) => Ok(module),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            Err(e.into_decode_error(bytes))
        }
        Err(nom::Err::Incomplete(_)) => Err(DecodeError {
            offset: bytes.len(),
            reason: Reason::UnexpectedEnd,
        }),
    }
}

#[cfg(test)]
#[path="tests_binary_format.rs"]
mod tests;
