//! 5.3 Types

use sproutwasm_structure::types::*;

use crate::error::{PResult, Reason};
use crate::values::{parse_byte, parse_u32, parse_vec, Inp};

// 5.3.1 Value Types
pub fn parse_valtype<'a>(input: Inp<'a>) -> PResult<'a, ValType> {
    btagmap!(input, Reason::MalformedValType;
        ValType::I32_BYTE => ValType::I32,
        ValType::I64_BYTE => ValType::I64,
        ValType::F32_BYTE => ValType::F32,
        ValType::F64_BYTE => ValType::F64,
    )
}

// 5.3.3 Function Types
pub fn parse_functype<'a>(input: Inp<'a>) -> PResult<'a, FuncType> {
    let (rest, tag) = parse_byte(input)?;
    if tag != FUNC_TYPE_TAG {
        return crate::error::fail(input, Reason::InvalidFuncTypeTag(tag));
    }
    let (rest, params) = parse_vec(parse_valtype)(rest)?;
    let (rest, results) = parse_vec(parse_valtype)(rest)?;
    Ok((rest, FuncType { params, results }))
}

// 5.3.4 Limits
pub fn parse_limits<'a>(input: Inp<'a>) -> PResult<'a, Limits> {
    let (rest, has_max) = btagmap!(input, Reason::MalformedLimitsFlag;
        Limits::MIN_ONLY_FLAG => false,
        Limits::MIN_MAX_FLAG => true,
    )?;
    let (rest, min) = parse_u32(rest)?;
    if !has_max {
        return Ok((rest, Limits { min, max: None }));
    }
    let (rest, max) = parse_u32(rest)?;
    Ok((rest, Limits { min, max: Some(max) }))
}

// 5.3.5 Memory Types
pub fn parse_memtype<'a>(input: Inp<'a>) -> PResult<'a, MemType> {
    let (rest, limits) = parse_limits(input)?;
    Ok((rest, MemType { limits }))
}

// 5.3.6. Table Types
pub fn parse_tabletype<'a>(input: Inp<'a>) -> PResult<'a, TableType> {
    let (rest, elemtype) = parse_elemtype(input)?;
    let (rest, limits) = parse_limits(rest)?;
    Ok((rest, TableType { elemtype, limits }))
}

pub fn parse_elemtype<'a>(input: Inp<'a>) -> PResult<'a, ElemType> {
    btagmap!(input, Reason::InvalidElemType;
        ElemType::FUNC_REF_BYTE => ElemType::FuncRef,
    )
}

// 5.3.7. Global Types
pub fn parse_globaltype<'a>(input: Inp<'a>) -> PResult<'a, GlobalType> {
    let (rest, valtype) = parse_valtype(input)?;
    let (rest, mutability) = parse_mut(rest)?;
    Ok((rest, GlobalType { valtype, mutability }))
}

pub fn parse_mut<'a>(input: Inp<'a>) -> PResult<'a, Mut> {
    btagmap!(input, Reason::MalformedMutability;
        Mut::CONST_BYTE => Mut::Const,
        Mut::VAR_BYTE => Mut::Var,
    )
}
