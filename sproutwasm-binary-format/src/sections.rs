//! 5.5 Modules: indices and the contents of each section.

use nom::combinator::all_consuming;

use sproutwasm_structure::modules::*;
use sproutwasm_structure::types::*;

use crate::error::{fail, PResult, Reason};
use crate::instructions::{parse_body, parse_expr};
use crate::types::*;
use crate::values::*;

/// The id byte in front of every section.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionId {
    Custom = 0,
    Type = 1,
    Import = 2,
    Function = 3,
    Table = 4,
    Memory = 5,
    Global = 6,
    Export = 7,
    Start = 8,
    Element = 9,
    Code = 10,
    Data = 11,
}
impl SectionId {
    pub fn from_byte(b: u8) -> Option<SectionId> {
        use self::SectionId::*;

        Some(match b {
            0 => Custom,
            1 => Type,
            2 => Import,
            3 => Function,
            4 => Table,
            5 => Memory,
            6 => Global,
            7 => Export,
            8 => Start,
            9 => Element,
            10 => Code,
            11 => Data,
            _ => return None,
        })
    }
}

pub fn parse_section_id<'a>(input: Inp<'a>) -> PResult<'a, SectionId> {
    let (rest, b) = parse_byte(input)?;
    match SectionId::from_byte(b) {
        Some(id) => Ok((rest, id)),
        None => fail(input, Reason::MalformedSectionId(b)),
    }
}

// 5.5.1. Indices
pub fn parse_typeidx<'a>(input: Inp<'a>) -> PResult<'a, TypeIdx> {
    parse_u32(input).map(|(i, x)| (i, TypeIdx(x)))
}
pub fn parse_funcidx<'a>(input: Inp<'a>) -> PResult<'a, FuncIdx> {
    parse_u32(input).map(|(i, x)| (i, FuncIdx(x)))
}
pub fn parse_tableidx<'a>(input: Inp<'a>) -> PResult<'a, TableIdx> {
    parse_u32(input).map(|(i, x)| (i, TableIdx(x)))
}
pub fn parse_memidx<'a>(input: Inp<'a>) -> PResult<'a, MemIdx> {
    parse_u32(input).map(|(i, x)| (i, MemIdx(x)))
}

// 5.5.3. Custom Section
/// Everything after the id byte. The payload is cut out first, so the name
/// can never be read from the following section.
pub fn parse_customsec<'a>(input: Inp<'a>) -> PResult<'a, CustomSection> {
    let (rest, payload) = parse_bytes(input)?;
    let (bytes, name) = parse_name(payload)?;
    Ok((rest, CustomSection { name, bytes: bytes.to_vec() }))
}

// 5.5.4. Type Section
pub fn parse_typesec<'a>(input: Inp<'a>) -> PResult<'a, Vec<FuncType>> {
    parse_vec(parse_functype)(input)
}

// 5.5.5. Import Section
pub fn parse_import<'a>(input: Inp<'a>) -> PResult<'a, Import> {
    let (rest, module) = parse_name(input)?;
    let (rest, name) = parse_name(rest)?;
    let (rest, desc) = parse_importdesc(rest)?;
    Ok((rest, Import { module, name, desc }))
}
pub fn parse_importdesc<'a>(input: Inp<'a>) -> PResult<'a, ImportDesc> {
    let (rest, tag) = parse_byte(input)?;
    match tag {
        ImportDesc::FUNC_TAG => {
            let (rest, x) = parse_typeidx(rest)?;
            Ok((rest, ImportDesc::Func(x)))
        }
        ImportDesc::TABLE_TAG => {
            let (rest, tt) = parse_tabletype(rest)?;
            Ok((rest, ImportDesc::Table(tt)))
        }
        ImportDesc::MEM_TAG => {
            let (rest, mt) = parse_memtype(rest)?;
            Ok((rest, ImportDesc::Mem(mt)))
        }
        ImportDesc::GLOBAL_TAG => {
            let (rest, gt) = parse_globaltype(rest)?;
            Ok((rest, ImportDesc::Global(gt)))
        }
        other => fail(input, Reason::InvalidImportDescTag(other)),
    }
}
pub fn parse_importsec<'a>(input: Inp<'a>) -> PResult<'a, Vec<Import>> {
    parse_vec(parse_import)(input)
}

// 5.5.6. Function Section
pub fn parse_funcsec<'a>(input: Inp<'a>) -> PResult<'a, Vec<TypeIdx>> {
    parse_vec(parse_typeidx)(input)
}

// 5.5.7. Table Section
pub fn parse_tablesec<'a>(input: Inp<'a>) -> PResult<'a, Vec<TableType>> {
    parse_vec(parse_tabletype)(input)
}

// 5.5.8. Memory Section
pub fn parse_memsec<'a>(input: Inp<'a>) -> PResult<'a, Vec<MemType>> {
    parse_vec(parse_memtype)(input)
}

// 5.5.9. Global Section
pub fn parse_global<'a>(input: Inp<'a>) -> PResult<'a, Global> {
    let (rest, type_) = parse_globaltype(input)?;
    let (rest, init) = parse_expr(rest)?;
    Ok((rest, Global { type_, init }))
}
pub fn parse_globalsec<'a>(input: Inp<'a>) -> PResult<'a, Vec<Global>> {
    parse_vec(parse_global)(input)
}

// 5.5.10. Export Section
pub fn parse_export<'a>(input: Inp<'a>) -> PResult<'a, Export> {
    let (rest, name) = parse_name(input)?;
    let (rest, desc) = parse_exportdesc(rest)?;
    Ok((rest, Export { name, desc }))
}
pub fn parse_exportdesc<'a>(input: Inp<'a>) -> PResult<'a, ExportDesc> {
    let (rest, tag) = parse_byte(input)?;
    let (rest, idx) = parse_u32(rest)?;
    let desc = match tag {
        ExportDesc::FUNC_TAG => ExportDesc::Func(FuncIdx(idx)),
        ExportDesc::TABLE_TAG => ExportDesc::Table(TableIdx(idx)),
        ExportDesc::MEM_TAG => ExportDesc::Mem(MemIdx(idx)),
        ExportDesc::GLOBAL_TAG => ExportDesc::Global(GlobalIdx(idx)),
        other => return fail(input, Reason::InvalidExportDescTag(other)),
    };
    Ok((rest, desc))
}
pub fn parse_exportsec<'a>(input: Inp<'a>) -> PResult<'a, Vec<Export>> {
    parse_vec(parse_export)(input)
}

// 5.5.11. Start Section
pub fn parse_startsec<'a>(input: Inp<'a>) -> PResult<'a, FuncIdx> {
    parse_funcidx(input)
}

// 5.5.12. Element Section
pub fn parse_elem<'a>(input: Inp<'a>) -> PResult<'a, Elem> {
    let (rest, table) = parse_tableidx(input)?;
    let (rest, offset) = parse_expr(rest)?;
    let (rest, init) = parse_vec(parse_funcidx)(rest)?;
    Ok((rest, Elem { table, offset, init }))
}
pub fn parse_elemsec<'a>(input: Inp<'a>) -> PResult<'a, Vec<Elem>> {
    parse_vec(parse_elem)(input)
}

// 5.5.13. Code Section
pub fn parse_locals<'a>(input: Inp<'a>) -> PResult<'a, Locals> {
    let (rest, n) = parse_u32(input)?;
    let (rest, valtype) = parse_valtype(rest)?;
    Ok((rest, Locals { n, valtype }))
}
fn parse_func<'a>(input: Inp<'a>) -> PResult<'a, Code> {
    let (rest, locals) = parse_vec(parse_locals)(input)?;
    let n: u64 = locals.iter().map(|l| u64::from(l.n)).sum();
    if n >= VEC_MAX_SIZE as u64 {
        return fail(input, Reason::TooManyLocals(n));
    }
    let (rest, body) = parse_body(rest)?;
    Ok((rest, Code { locals, body }))
}
/// A single code entry, decoded from its own size-bounded slice.
pub fn parse_code<'a>(input: Inp<'a>) -> PResult<'a, Code> {
    let (rest, entry) = parse_bytes(input)?;
    let (_, code) = all_consuming(parse_func)(entry)?;
    Ok((rest, code))
}
pub fn parse_codesec<'a>(input: Inp<'a>) -> PResult<'a, Vec<Code>> {
    parse_vec(parse_code)(input)
}

// 5.5.14. Data Section
pub fn parse_data<'a>(input: Inp<'a>) -> PResult<'a, Data> {
    let (rest, data) = parse_memidx(input)?;
    let (rest, offset) = parse_expr(rest)?;
    let (rest, init) = parse_bytes(rest)?;
    Ok((rest, Data { data, offset, init: init.to_vec() }))
}
pub fn parse_datasec<'a>(input: Inp<'a>) -> PResult<'a, Vec<Data>> {
    parse_vec(parse_data)(input)
}
