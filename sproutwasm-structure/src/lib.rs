//! The abstract structure of a Webassembly module as produced by a decoder.
//!
//! Everything in here is plain data: it is built once during decoding and
//! never mutated afterwards.

pub mod types;
pub mod instructions;
pub mod modules;
