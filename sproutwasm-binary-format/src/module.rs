//! 5.5.2 Sections and 5.5.15 Modules

use sproutwasm_structure::modules::{Module, MAGIC, VERSION};

use crate::error::{fail, failure, PResult, Reason};
use crate::sections::*;
use crate::values::{parse_fixed_u32, parse_u32, Inp};

pub fn parse_magic<'a>(input: Inp<'a>) -> PResult<'a, u32> {
    if input.len() < 4 {
        return fail(input, Reason::UnexpectedEndOfMagic);
    }
    let (rest, magic) = parse_fixed_u32(input)?;
    if magic != MAGIC {
        return fail(input, Reason::MagicMismatch(magic));
    }
    Ok((rest, magic))
}

pub fn parse_version<'a>(input: Inp<'a>) -> PResult<'a, u32> {
    if input.len() < 4 {
        return fail(input, Reason::UnexpectedEndOfVersion);
    }
    let (rest, version) = parse_fixed_u32(input)?;
    if version != VERSION {
        return fail(input, Reason::UnknownVersion(version));
    }
    Ok((rest, version))
}

fn fill<'a, T, F>(input: Inp<'a>, parse: F, slot: &mut Option<T>) -> PResult<'a, ()>
    where F: FnOnce(Inp<'a>) -> PResult<'a, T>
{
    let (rest, value) = parse(input)?;
    *slot = Some(value);
    Ok((rest, ()))
}

/// Decodes the body of section `id` into `module`.
fn parse_section_body<'a>(input: Inp<'a>, id: SectionId, module: &mut Module) -> PResult<'a, ()> {
    match id {
        SectionId::Custom => {
            let (rest, custom) = parse_customsec(input)?;
            trace!("custom section {:?}, {} bytes", &*custom.name, custom.bytes.len());
            module.customs.push(custom);
            Ok((rest, ()))
        }
        SectionId::Type => fill(input, parse_typesec, &mut module.types),
        SectionId::Import => fill(input, parse_importsec, &mut module.imports),
        SectionId::Function => fill(input, parse_funcsec, &mut module.funcs),
        SectionId::Table => fill(input, parse_tablesec, &mut module.tables),
        SectionId::Memory => fill(input, parse_memsec, &mut module.mems),
        SectionId::Global => fill(input, parse_globalsec, &mut module.globals),
        SectionId::Export => fill(input, parse_exportsec, &mut module.exports),
        SectionId::Start => fill(input, parse_startsec, &mut module.start),
        SectionId::Element => fill(input, parse_elemsec, &mut module.elems),
        SectionId::Code => fill(input, parse_codesec, &mut module.codes),
        SectionId::Data => fill(input, parse_datasec, &mut module.datas),
    }
}

/// Consumes sections until the input is exhausted.
///
/// Custom sections may appear anywhere. All other sections appear at most
/// once and in increasing id order, and must consume exactly their declared
/// size.
pub fn parse_sections<'a>(mut input: Inp<'a>, module: &mut Module) -> PResult<'a, ()> {
    let mut prev: Option<SectionId> = None;

    while !input.is_empty() {
        let (rest, id) = parse_section_id(input)?;
        if id == SectionId::Custom {
            let (rest, ()) = parse_section_body(rest, id, module)?;
            input = rest;
            continue;
        }

        if prev.map_or(false, |prev| id <= prev) {
            return fail(input, Reason::SectionOutOfOrder(id as u8));
        }
        prev = Some(id);

        let (rest, size) = parse_u32(rest)?;
        let before = rest.len();
        let (rest, ()) = parse_section_body(rest, id, module)?;
        let consumed = before - rest.len();
        if consumed != size as usize {
            return Err(failure(rest, Reason::SectionSizeMismatch {
                id: id as u8,
                declared: size,
                consumed,
            }));
        }
        debug!("{:?} section, {} bytes", id, size);

        input = rest;
    }

    Ok((input, ()))
}

pub fn parse_module<'a>(input: Inp<'a>) -> PResult<'a, Module> {
    let (rest, magic) = parse_magic(input)?;
    let (rest, version) = parse_version(rest)?;

    let mut module = Module {
        magic,
        version,
        ..Module::default()
    };
    let (rest, ()) = parse_sections(rest, &mut module)?;

    let (funcs, codes) = (module.func_count(), module.code_count());
    if funcs != codes {
        return fail(rest, Reason::FuncCodeMismatch { funcs, codes });
    }
    if !rest.is_empty() {
        return fail(rest, Reason::TrailingBytes);
    }

    debug!(
        "decoded module: {} types, {} imports, {} functions, {} exports, {} custom sections",
        module.types.as_ref().map_or(0, Vec::len),
        module.imports.as_ref().map_or(0, Vec::len),
        funcs,
        module.exports.as_ref().map_or(0, Vec::len),
        module.customs.len(),
    );
    Ok((rest, module))
}
