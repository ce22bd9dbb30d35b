//! 5.4 Instructions
//!
//! Instructions are not decoded. An expression is scanned up to its first
//! `end` opcode, so an immediate that happens to contain that byte ends the
//! expression early.

use nom::bytes::complete::take_till;

use sproutwasm_structure::instructions::{Expr, END};

use crate::error::{fail, PResult, Reason};
use crate::values::{parse_byte, Inp};

// 5.4.6. Expressions
pub fn parse_expr<'a>(input: Inp<'a>) -> PResult<'a, Expr> {
    let (rest, instrs) = take_till(|b: u8| b == END)(input)?;
    let (rest, _end) = parse_byte(rest)?;
    Ok((rest, Expr::new(instrs.to_vec())))
}

/// A function body, which spans the rest of its bounded code entry and
/// must be closed by `end`.
pub fn parse_body<'a>(input: Inp<'a>) -> PResult<'a, Expr> {
    let rest = &input[input.len()..];
    match input.split_last() {
        Some((&END, instrs)) => Ok((rest, Expr::new(instrs.to_vec()))),
        _ => fail(rest, Reason::UnexpectedEnd),
    }
}
