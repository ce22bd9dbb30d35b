//! 5.1 Conventions and 5.2 Values
//!
//! The cursor is the remaining input slice: every parser takes it by value
//! and hands back the suffix it did not consume.

use nom::bytes::complete::take;
use nom::multi::count;
use nom::number::complete::{le_f32, le_f64, le_u32, le_u64, le_u8};

use sproutwasm_structure::types::Name;

use crate::error::{fail, PResult, Reason};
use crate::leb128;

pub type Inp<'a> = &'a [u8];

// 5.1.3. Vectors
pub fn parse_vec<'a, F, B>(mut parse_b: F) -> impl FnMut(Inp<'a>) -> PResult<'a, Vec<B>>
    where F: FnMut(Inp<'a>) -> PResult<'a, B>
{
    move |input| {
        let (input, n) = parse_u32(input)?;
        count(&mut parse_b, n as usize)(input)
    }
}

// 5.2.1. Bytes
pub fn parse_byte<'a>(input: Inp<'a>) -> PResult<'a, u8> {
    le_u8(input)
}

pub fn parse_fixed_u32<'a>(input: Inp<'a>) -> PResult<'a, u32> {
    le_u32(input)
}

pub fn parse_fixed_u64<'a>(input: Inp<'a>) -> PResult<'a, u64> {
    le_u64(input)
}

// 5.2.2. Integers
fn leb<'a, T>(input: Inp<'a>, res: Result<(T, usize), Reason>) -> PResult<'a, T> {
    match res {
        Ok((v, n)) => Ok((&input[n..], v)),
        Err(reason) => fail(input, reason),
    }
}

pub fn parse_u32<'a>(input: Inp<'a>) -> PResult<'a, u32> {
    leb(input, leb128::decode_unsigned(input, 32)).map(|(i, x)| (i, x as u32))
}

pub fn parse_u64<'a>(input: Inp<'a>) -> PResult<'a, u64> {
    leb(input, leb128::decode_unsigned(input, 64))
}

pub fn parse_s32<'a>(input: Inp<'a>) -> PResult<'a, i32> {
    leb(input, leb128::decode_signed(input, 32)).map(|(i, x)| (i, x as i32))
}

pub fn parse_s64<'a>(input: Inp<'a>) -> PResult<'a, i64> {
    leb(input, leb128::decode_signed(input, 64))
}

// 5.2.3. Floating-Point
pub fn parse_f32<'a>(input: Inp<'a>) -> PResult<'a, f32> {
    le_f32(input)
}

pub fn parse_f64<'a>(input: Inp<'a>) -> PResult<'a, f64> {
    le_f64(input)
}

/// A length-prefixed run of raw bytes, borrowed from the input.
pub fn parse_bytes<'a>(input: Inp<'a>) -> PResult<'a, &'a [u8]> {
    let (input, n) = parse_u32(input)?;
    take(n)(input)
}

// 5.2.4. Names
pub fn parse_name<'a>(input: Inp<'a>) -> PResult<'a, Name> {
    let (rest, bytes) = parse_bytes(input)?;
    match ::std::str::from_utf8(bytes) {
        Ok(s) => Ok((rest, s.into())),
        Err(_) => fail(bytes, Reason::MalformedUtf8),
    }
}
