//! Instructions are not decoded; expressions are kept as opaque byte spans.

/// Opcode terminating every expression and function body.
pub const END: u8 = 0x0B;

/// An expression as a raw instruction sequence.
///
/// `bytes` holds the encoded instructions up to, but excluding, the
/// terminating `end` opcode.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Expr {
    pub bytes: Vec<u8>,
}
impl Expr {
    pub fn new(bytes: Vec<u8>) -> Self {
        Expr { bytes }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
