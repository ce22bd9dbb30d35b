use super::*;
use std::fmt::Debug;

use proptest::prelude::*;

use sproutwasm_structure::instructions::Expr;
use sproutwasm_structure::modules::*;
use sproutwasm_structure::types::*;

use crate::error::PResult;
use crate::instructions::*;
use crate::module::*;
use crate::sections::*;
use crate::types::*;
use crate::values::*;

enum CheckRes<T> {
    Failed(ErrorKind),
    FailedWith(Reason),
    OkWith(T),
}
use self::CheckRes::*;

fn check<'a, T, F>(mut parse: F, input: &'a [u8], res: CheckRes<T>)
    where T: Debug + PartialEq,
          F: FnMut(Inp<'a>) -> PResult<'a, T>,
{
    let mut err = None;
    match parse(input) {
        Ok((&[], is)) => {
            match res {
                OkWith(should) => if is != should {
                    err = Some(format!("Should have parsed with {:?}, but is {:?}", should, is));
                },
                _ => err = Some(format!("Should have failed, but parsed with {:?}", is)),
            }
        }
        Ok((x, is)) => {
            err = Some(format!("Accepted without parsing all input. Remaining: {:?}, result: {:?}", x, is));
        }
        Err(nom::Err::Incomplete(n)) => {
            err = Some(format!("Parser asked for more input: {:?}", n));
        }
        Err(nom::Err::Error(x)) | Err(nom::Err::Failure(x)) => {
            match res {
                OkWith(should) => {
                    err = Some(format!("Should have parsed with {:?}, but failed with {:?}", should, x));
                }
                Failed(kind) => if x.reason.kind() != kind {
                    err = Some(format!("Should have failed with {:?}, but failed with {:?}", kind, x));
                },
                FailedWith(reason) => if x.reason != reason {
                    err = Some(format!("Should have failed with {:?}, but failed with {:?}", reason, x));
                },
            }
        }
    }
    if let Some(err) = err {
        panic!("\n\nERROR: {}\nInput:\n{:?}\n\n", err, input);
    }
}

const TRUNCATED: ErrorKind = ErrorKind::TruncatedInput;
const MALFORMED: ErrorKind = ErrorKind::MalformedEncoding;
const INTEGER: ErrorKind = ErrorKind::IntegerEncoding;
const STRUCTURE: ErrorKind = ErrorKind::StructuralViolation;

const HEADER: [u8; 8] = [0x00, 0x61, 0x73, 0x6D, 0x01, 0x00, 0x00, 0x00];

fn module(sections: &[&[u8]]) -> Vec<u8> {
    let mut v = HEADER.to_vec();
    for s in sections {
        v.extend_from_slice(s);
    }
    v
}

fn test_parse_uN<F>(mut parse: F, bits: u32)
    where F: FnMut(Inp) -> PResult<u64>,
{
    check(&mut parse, &[0x00], OkWith(0x00));
    check(&mut parse, &[0x7f], OkWith(0x7f));
    check(&mut parse, &[0xff], Failed(TRUNCATED));
    check(&mut parse, &[], Failed(TRUNCATED));

    check(&mut parse, &[0xff, 0x00], OkWith(0x7f));
    check(&mut parse, &[0xff, 0x01], OkWith(0xff));
    check(&mut parse, &[0xff, 0x80, 0x00], OkWith(0x7f));
    check(&mut parse, &[0xff, 0x80, 0x80, 0x00], OkWith(0x7f));
    check(&mut parse, &[0xff, 0x80, 0x80, 0x80, 0x00], OkWith(0x7f));
    check(&mut parse, &[0xE5, 0x8E, 0x26], OkWith(624485));
    if bits == 32 {
        check(&mut parse, &[0xff, 0x80, 0x80, 0x80, 0x80, 0x00], FailedWith(Reason::IntTooLong));
        check(&mut parse, &[0xff, 0xff, 0xff, 0xff, 0x0f], OkWith(0xff_ff_ff_ff));
        check(&mut parse, &[0xff, 0xff, 0xff, 0xff, 0x1f], FailedWith(Reason::IntTooLarge));
    } else {
        check(&mut parse, &[0xff, 0x80, 0x80, 0x80, 0x80, 0x00], OkWith(0x7f));
        check(&mut parse, &[0xff, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x00], OkWith(0x7f));
        check(&mut parse, &[0xff, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x00], Failed(INTEGER));
        check(&mut parse, &[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01], OkWith(::std::u64::MAX));
    }

    check(&mut parse, &[0xff, 0xff, 0xff, 0x7f], OkWith(0b1111111_1111111_1111111_1111111));
    check(&mut parse, &[0b1_0011111, 0b1_0001111, 0b1_0000111, 0b0_0000011],
             OkWith(0b__0000011______0000111______0001111______0011111));
}

#[test]
fn test_parse_u32() {
    test_parse_uN(|inp| parse_u32(inp).map(|(i, x)| (i, x as u64)), 32);
}

#[test]
fn test_parse_u64() {
    test_parse_uN(parse_u64, 64);
}

fn test_parse_sN<F>(mut parse: F, bits: u32)
    where F: FnMut(Inp) -> PResult<i64>,
{
    check(&mut parse, &[0x00], OkWith(0x00));
    check(&mut parse, &[0x3f], OkWith(0x3f));
    check(&mut parse, &[0x7f], OkWith(-0x01));
    check(&mut parse, &[0xff], Failed(TRUNCATED));

    check(&mut parse, &[0xff, 0x00], OkWith(0x7f));
    check(&mut parse, &[0xff, 0x01], OkWith(0xff));
    check(&mut parse, &[0xff, 0x80, 0x00], OkWith(0x7f));
    check(&mut parse, &[0xff, 0x80, 0x80, 0x00], OkWith(0x7f));
    check(&mut parse, &[0xff, 0x80, 0x80, 0x80, 0x00], OkWith(0x7f));

    check(&mut parse, &[0xff, 0x7f], OkWith(-1));
    check(&mut parse, &[0xff, 0xff, 0x7f], OkWith(-1));
    check(&mut parse, &[0xff, 0xff, 0xff, 0x7f], OkWith(-1));
    check(&mut parse, &[0xff, 0xff, 0xff, 0xff, 0x7f], OkWith(-1));

    if bits == 32 {
        check(&mut parse, &[0xff, 0x80, 0x80, 0x80, 0x80, 0x00], FailedWith(Reason::IntTooLong));
        check(&mut parse, &[0xff, 0xff, 0xff, 0xff, 0x4f], FailedWith(Reason::IntTooLarge));
    } else {
        check(&mut parse, &[0xff, 0x80, 0x80, 0x80, 0x80, 0x00], OkWith(0x7f));
        check(&mut parse, &[0xff, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x00], OkWith(0x7f));
        check(&mut parse, &[0xff, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x00], Failed(INTEGER));
    }

    check(&mut parse, &[0b1_0011111, 0b1_0001111, 0b1_0000111, 0b0_0000011],
             OkWith(0b__0000011______0000111______0001111______0011111));
}

#[test]
fn test_parse_s32() {
    test_parse_sN(|inp| parse_s32(inp).map(|(i, x)| (i, x as i64)), 32);
}

#[test]
fn test_parse_s64() {
    test_parse_sN(parse_s64, 64);
}

#[test]
fn test_parse_fixed() {
    check(parse_fixed_u32, &[0x00, 0x61, 0x73, 0x6D], OkWith(MAGIC));
    check(parse_fixed_u32, &[0x00, 0x61, 0x73], Failed(TRUNCATED));
    check(parse_fixed_u64, &[1, 0, 0, 0, 0, 0, 0, 0x80], OkWith(0x8000_0000_0000_0001));
    check(parse_fixed_u64, &[1, 0, 0, 0, 0, 0, 0], Failed(TRUNCATED));
}

#[test]
fn test_parse_f32() {
    let x: f32 = -1459.78965;
    let b = x.to_bits().to_le_bytes();

    check(parse_f32, &b, OkWith(x));
    check(parse_f32, &b[..3], Failed(TRUNCATED));
}

#[test]
fn test_parse_f64() {
    let x: f64 = -1459.78965;
    let b = x.to_bits().to_le_bytes();

    check(parse_f64, &b, OkWith(x));
    check(parse_f64, &b[..7], Failed(TRUNCATED));
}

#[test]
fn test_parse_bytes() {
    check(parse_bytes, &[3, 1, 2, 3], OkWith(&[1u8, 2, 3][..]));
    check(parse_bytes, &[0], OkWith(&[][..]));
    check(parse_bytes, &[4, 1, 2, 3], Failed(TRUNCATED));
}

#[test]
fn test_parse_name() {
    let s = "hello wörldß";

    check(parse_name, &{
        let mut v = vec![s.len() as u8];
        v.extend(s.bytes());
        v
    }, OkWith(s.into()));

    check(parse_name, &{
        let mut v = vec![s.len() as u8 + 1];
        v.extend(s.bytes());
        v
    }, Failed(TRUNCATED));

    // cuts 'ß' in half
    check(parse_name, &{
        let mut v = vec![s.len() as u8 - 1];
        v.extend(s.bytes().take(s.len() - 1));
        v
    }, FailedWith(Reason::MalformedUtf8));

    check(parse_name, &[5, 0xff, 0xff, 0xff, 0xff, 0xff], FailedWith(Reason::MalformedUtf8));
}

#[test]
fn test_parse_vec() {
    check(parse_vec(parse_byte), &[3, 7, 8, 9], OkWith(vec![7, 8, 9]));
    check(parse_vec(parse_byte), &[0], OkWith(vec![]));
    check(parse_vec(parse_byte), &[3, 7, 8], Failed(TRUNCATED));
    check(parse_vec(parse_byte), &[0xff, 0xff, 0xff, 0xff, 0x0f, 1], Failed(TRUNCATED));
}

#[test]
fn test_parse_valtype() {
    check(parse_valtype, &[0x7f], OkWith(ValType::I32));
    check(parse_valtype, &[0x7e], OkWith(ValType::I64));
    check(parse_valtype, &[0x7d], OkWith(ValType::F32));
    check(parse_valtype, &[0x7c], OkWith(ValType::F64));
    check(parse_valtype, &[0x7b], FailedWith(Reason::MalformedValType(0x7b)));
    check(parse_valtype, &[0x40], Failed(MALFORMED));
}

#[test]
fn test_parse_functype() {
    check(parse_functype, &[0x60, 1, 0x7f, 2, 0x7e, 0x7c], OkWith(
        FuncType {
            params: vec![ValType::I32],
            results: vec![ValType::I64, ValType::F64],
        }
    ));
    check(parse_functype, &[0x60, 0, 0], OkWith(FuncType::default()));
    check(parse_functype, &[0x61, 0, 0], FailedWith(Reason::InvalidFuncTypeTag(0x61)));
    check(parse_functype, &[0x60, 1, 0x70, 0], FailedWith(Reason::MalformedValType(0x70)));
    check(parse_functype, &[0x60, 1], Failed(TRUNCATED));
}

#[test]
fn test_parse_limits() {
    check(parse_limits, &[0x00, 0x00], OkWith(
        Limits {
            min: 0x00,
            max: None,
        }
    ));
    check(parse_limits, &[0x00, 0xff, 0x01], OkWith(
        Limits {
            min: 0xff,
            max: None,
        }
    ));
    check(parse_limits, &[0x01, 0x00, 0x00], OkWith(
        Limits {
            min: 0x00,
            max: Some(0x00),
        }
    ));
    check(parse_limits, &[0x01, 0xff, 0x01, 0xff, 0x01], OkWith(
        Limits {
            min: 0xff,
            max: Some(0xff),
        }
    ));
    check(parse_limits, &[0x01, 0x00], Failed(TRUNCATED));
    check(parse_limits, &[0x02, 0x00], FailedWith(Reason::MalformedLimitsFlag(2)));
}

#[test]
fn test_parse_tabletype_and_globaltype() {
    check(parse_tabletype, &[0x70, 0x00, 0x01], OkWith(TableType {
        elemtype: ElemType::FuncRef,
        limits: Limits { min: 1, max: None },
    }));
    check(parse_tabletype, &[0x6f, 0x00, 0x01], FailedWith(Reason::InvalidElemType(0x6f)));

    check(parse_globaltype, &[0x7e, 0x01], OkWith(GlobalType {
        valtype: ValType::I64,
        mutability: Mut::Var,
    }));
    check(parse_globaltype, &[0x7f, 0x00], OkWith(GlobalType {
        valtype: ValType::I32,
        mutability: Mut::Const,
    }));
    check(parse_globaltype, &[0x7f, 0x02], FailedWith(Reason::MalformedMutability(2)));
}

#[test]
fn test_parse_expr() {
    check(parse_expr, &[0x0B], OkWith(Expr::default()));
    check(parse_expr, &[0x41, 0x2a, 0x0B], OkWith(Expr::new(vec![0x41, 0x2a])));
    check(parse_expr, &[0x41, 0x2a], Failed(TRUNCATED));
    check(parse_expr, &[], Failed(TRUNCATED));

    match parse_expr(&[0x23, 0x00, 0x0B, 0xaa]) {
        Ok((rest, e)) => {
            assert_eq!(rest, &[0xaa]);
            assert_eq!(e.bytes, vec![0x23, 0x00]);
        }
        Err(e) => panic!("{:?}", e),
    }
}

#[test]
fn test_parse_importdesc() {
    check(parse_import, &[1, b'm', 1, b'f', 0x00, 0x02], OkWith(Import {
        module: "m".into(),
        name: "f".into(),
        desc: ImportDesc::Func(TypeIdx(2)),
    }));
    check(parse_importdesc, &[0x01, 0x70, 0x00, 0x00], OkWith(ImportDesc::Table(TableType {
        elemtype: ElemType::FuncRef,
        limits: Limits { min: 0, max: None },
    })));
    check(parse_importdesc, &[0x02, 0x01, 0x01, 0x02], OkWith(ImportDesc::Mem(MemType {
        limits: Limits { min: 1, max: Some(2) },
    })));
    check(parse_importdesc, &[0x03, 0x7d, 0x00], OkWith(ImportDesc::Global(GlobalType {
        valtype: ValType::F32,
        mutability: Mut::Const,
    })));
    check(parse_importdesc, &[0x04, 0x00], FailedWith(Reason::InvalidImportDescTag(4)));
}

#[test]
fn test_parse_exportdesc() {
    check(parse_export, &[3, b'f', b'a', b'c', 0x00, 0x00], OkWith(Export {
        name: "fac".into(),
        desc: ExportDesc::Func(FuncIdx(0)),
    }));
    check(parse_exportdesc, &[0x01, 0x05], OkWith(ExportDesc::Table(TableIdx(5))));
    check(parse_exportdesc, &[0x02, 0x00], OkWith(ExportDesc::Mem(MemIdx(0))));
    check(parse_exportdesc, &[0x03, 0x80, 0x01], OkWith(ExportDesc::Global(GlobalIdx(128))));
    check(parse_exportdesc, &[0x04, 0x00], FailedWith(Reason::InvalidExportDescTag(4)));
}

#[test]
fn test_parse_customsec() {
    check(parse_customsec, &[
        6, 3, 97, 98, 99, 0xff, 0xee,
    ], OkWith(
        CustomSection { name: "abc".into(), bytes: vec![0xff, 0xee] }
    ));

    check(parse_customsec, &[
        6, 3, 97, 98, 99, 0xff,
    ], Failed(TRUNCATED));

    // the name may not reach past the section payload
    check(parse_customsec, &[
        3, 3, 97, 98, 99,
    ], Failed(TRUNCATED));

    check(parse_customsec, &[
        2, 1, 0xff,
    ], FailedWith(Reason::MalformedUtf8));
}

#[test]
fn test_parse_code() {
    check(parse_code, &[
        4,    // 4 bytes
        1,    // 1 compressed locals
        2,    // 2x f32 types
        0x7D,
        0x0B, // empty expression
    ], OkWith(
        Code {
            locals: vec![Locals { n: 2, valtype: ValType::F32 }],
            body: Expr::default(),
        }
    ));

    check(parse_code, &[
        6,    // 6 bytes
        1,    // 1 compressed locals
        2,    // 2x f32 types
        0x7D,
        0x0B,
        0x00, // trash bytes
        0x00,
    ], FailedWith(Reason::UnexpectedEnd));

    check(parse_code, &[
        8,    // 8 bytes
        2,    // 2 compressed locals
        2,    // 2x f32 types
        0x7D,
        1,    // 1x i32 types
        0x7F,
        0x00,
        0x47,
        0x0B,
    ], OkWith(
        Code {
            locals: vec![
                Locals { n: 2, valtype: ValType::F32 },
                Locals { n: 1, valtype: ValType::I32 },
            ],
            body: Expr::new(vec![0x00, 0x47]),
        }
    ));

    // entry size cuts the locals short
    check(parse_code, &[2, 1, 2, 0x7D, 0x0B], Failed(TRUNCATED));
    check(parse_code, &[5, 1, 2, 0x7D, 0x0B], Failed(TRUNCATED));
}

#[test]
fn test_parse_code_too_many_locals() {
    check(parse_code, &[
        13,
        2,
        0xff, 0xff, 0xff, 0xff, 0x0f, 0x7f,
        0x01, 0x7e,
        0x0B,
        0x00, 0x00, 0x00,
    ], FailedWith(Reason::TooManyLocals(::std::u32::MAX as u64 + 1)));

    check(parse_code, &[
        9,
        1,
        0xfe, 0xff, 0xff, 0xff, 0x0f, 0x7f,
        0x0B,
        0x0B,
    ], OkWith(Code {
        locals: vec![Locals { n: ::std::u32::MAX - 1, valtype: ValType::I32 }],
        body: Expr::new(vec![0x0B]),
    }));
}

#[test]
fn test_parse_elem_and_data() {
    check(parse_elem, &[0x00, 0x41, 0x00, 0x0B, 2, 0x01, 0x02], OkWith(Elem {
        table: TableIdx(0),
        offset: Expr::new(vec![0x41, 0x00]),
        init: vec![FuncIdx(1), FuncIdx(2)],
    }));
    check(parse_data, &[0x00, 0x41, 0x08, 0x0B, 3, b'a', b'b', b'c'], OkWith(Data {
        data: MemIdx(0),
        offset: Expr::new(vec![0x41, 0x08]),
        init: b"abc".to_vec(),
    }));
    check(parse_data, &[0x00, 0x41, 0x08, 0x0B, 3, b'a'], Failed(TRUNCATED));
}

#[test]
fn test_parse_global() {
    check(parse_global, &[0x7f, 0x01, 0x41, 0x2a, 0x0B], OkWith(Global {
        type_: GlobalType { valtype: ValType::I32, mutability: Mut::Var },
        init: Expr::new(vec![0x41, 0x2a]),
    }));
}

#[test]
fn test_parse_section_id() {
    check(parse_section_id, &[0], OkWith(SectionId::Custom));
    check(parse_section_id, &[11], OkWith(SectionId::Data));
    check(parse_section_id, &[12], FailedWith(Reason::MalformedSectionId(12)));
}

#[test]
fn test_parse_header() {
    check(parse_magic, &[0x00, 0x61, 0x73, 0x6D], OkWith(MAGIC));
    check(parse_magic, &[0x00, 0x61, 0x73], FailedWith(Reason::UnexpectedEndOfMagic));
    check(parse_magic, &[0x00, 0x61, 0x73, 0x6E], FailedWith(Reason::MagicMismatch(0x6E73_6100)));
    check(parse_version, &[0x01, 0x00, 0x00, 0x00], OkWith(VERSION));
    check(parse_version, &[0x01, 0x00], FailedWith(Reason::UnexpectedEndOfVersion));
    check(parse_version, &[0x02, 0x00, 0x00, 0x00], FailedWith(Reason::UnknownVersion(2)));
}

#[test]
fn test_empty_module() {
    let m = decode(&HEADER).unwrap();
    assert_eq!(m.magic, MAGIC);
    assert_eq!(m.version, VERSION);
    assert_eq!(m, Module { magic: MAGIC, version: VERSION, ..Module::default() });
}

#[test]
fn test_section_order() {
    let types: &[u8] = &[1, 1, 0];
    let imports: &[u8] = &[2, 1, 0];
    let custom: &[u8] = &[0, 2, 1, b'x'];

    decode(&module(&[types, imports])).unwrap();
    decode(&module(&[custom, types, custom, imports, custom])).unwrap();

    let err = decode(&module(&[types, types])).unwrap_err();
    assert_eq!(err.reason, Reason::SectionOutOfOrder(1));
    assert_eq!(err.kind(), STRUCTURE);
    assert_eq!(err.offset, 11);

    let err = decode(&module(&[imports, types])).unwrap_err();
    assert_eq!(err.reason, Reason::SectionOutOfOrder(1));

    let err = decode(&module(&[&[12, 0]])).unwrap_err();
    assert_eq!(err.reason, Reason::MalformedSectionId(12));
    assert_eq!(err.kind(), MALFORMED);
    assert_eq!(err.offset, 8);
}

#[test]
fn test_custom_sections_keep_order() {
    let m = decode(&module(&[
        &[0, 3, 1, b'a', 0x01],
        &[1, 1, 0],
        &[0, 2, 1, b'b'],
        &[0, 2, 1, b'a'],
    ])).unwrap();

    let names: Vec<&str> = m.customs.iter().map(|c| &*c.name).collect();
    assert_eq!(names, vec!["a", "b", "a"]);
    assert_eq!(m.customs[0].bytes, vec![0x01]);
    assert_eq!(m.types, Some(vec![]));
}

#[test]
fn test_section_size_mismatch() {
    // type section claims 5 bytes but its vector ends after 4
    let err = decode(&module(&[&[1, 5, 1, 0x60, 0, 0]])).unwrap_err();
    assert_eq!(err.reason, Reason::SectionSizeMismatch { id: 1, declared: 5, consumed: 4 });
    assert_eq!(err.kind(), STRUCTURE);
    assert_eq!(err.offset, 14);

    // start section claims 2 bytes but the index is 1 byte long
    let err = decode(&module(&[&[8, 2, 0, 0]])).unwrap_err();
    assert_eq!(err.reason, Reason::SectionSizeMismatch { id: 8, declared: 2, consumed: 1 });

    // declared too short: the body runs into the next section
    let err = decode(&module(&[&[1, 3, 1, 0x60, 0, 0]])).unwrap_err();
    assert_eq!(err.reason, Reason::SectionSizeMismatch { id: 1, declared: 3, consumed: 4 });
}

#[test]
fn test_func_code_mismatch() {
    let types: &[u8] = &[1, 4, 1, 0x60, 0, 0];
    let funcs: &[u8] = &[3, 3, 2, 0, 0];
    let code: &[u8] = &[10, 4, 1, 2, 0, 0x0B];

    let err = decode(&module(&[types, funcs, code])).unwrap_err();
    assert_eq!(err.reason, Reason::FuncCodeMismatch { funcs: 2, codes: 1 });
    assert_eq!(err.kind(), STRUCTURE);

    let err = decode(&module(&[types, funcs])).unwrap_err();
    assert_eq!(err.reason, Reason::FuncCodeMismatch { funcs: 2, codes: 0 });
}

#[test]
fn test_end_to_end() {
    let m = decode(&module(&[
        &[1, 5, 1, 0x60, 0, 1, 0x7f],
        &[3, 2, 1, 0],
        &[10, 4, 1, 2, 0, 0x0B],
    ])).unwrap();

    assert_eq!(m.types, Some(vec![FuncType { params: vec![], results: vec![ValType::I32] }]));
    assert_eq!(m.funcs, Some(vec![TypeIdx(0)]));
    assert_eq!(m.codes, Some(vec![Code { locals: vec![], body: Expr::default() }]));
    assert_eq!(m.imports, None);
    assert_eq!(m.start, None);
}

#[test]
fn test_magic_and_version() {
    let err = decode(&[0x00, 0x61, 0x73]).unwrap_err();
    assert_eq!(err.reason, Reason::UnexpectedEndOfMagic);
    assert_eq!(err.kind(), TRUNCATED);

    let err = decode(&[0x01, 0x61, 0x73, 0x6D, 0x01, 0x00, 0x00, 0x00]).unwrap_err();
    assert_eq!(err.reason.to_string(), "magic header not detected");
    assert_eq!(err.kind(), STRUCTURE);

    let err = decode(&[0x00, 0x61, 0x73, 0x6D, 0x01]).unwrap_err();
    assert_eq!(err.reason, Reason::UnexpectedEndOfVersion);
    assert_eq!(err.offset, 4);

    let err = decode(&[0x00, 0x61, 0x73, 0x6D, 0x0d, 0x00, 0x00, 0x00]).unwrap_err();
    assert_eq!(err.reason, Reason::UnknownVersion(13));
    assert_eq!(err.kind(), STRUCTURE);
}

#[test]
fn test_offsets_inside_sub_readers() {
    // the code section starts at 18, its single local has a bad type at 24
    let bytes = module(&[
        &[1, 4, 1, 0x60, 0, 0],
        &[3, 2, 1, 0],
        &[10, 6, 1, 4, 1, 1, 0x55, 0x0B],
    ]);
    let err = decode(&bytes).unwrap_err();
    assert_eq!(err.reason, Reason::MalformedValType(0x55));
    assert_eq!(err.offset, 24);
    assert_eq!(bytes[err.offset], 0x55);
}

fn full_module() -> Vec<u8> {
    module(&[
        &[0, 4, 3, b'a', b'b', b'c'],
        // type: () -> (i32)
        &[1, 5, 1, 0x60, 0, 1, 0x7f],
        // import "env" "g": global const i32
        &[2, 10, 1, 3, b'e', b'n', b'v', 1, b'g', 0x03, 0x7f, 0x00],
        // function: type 0
        &[3, 2, 1, 0],
        // table: funcref {min 1}
        &[4, 4, 1, 0x70, 0x00, 0x01],
        // memory: {min 1, max 2}
        &[5, 4, 1, 0x01, 0x01, 0x02],
        // global: mut i32 = i32.const 7
        &[6, 6, 1, 0x7f, 0x01, 0x41, 0x07, 0x0B],
        // export "f": func 0
        &[7, 5, 1, 1, b'f', 0x00, 0x00],
        // start: func 0
        &[8, 1, 0],
        // elem: table 0, offset i32.const 0, [0]
        &[9, 7, 1, 0x00, 0x41, 0x00, 0x0B, 1, 0x00],
        // code: one body, one i64 local, i32.const 1
        &[10, 7, 1, 5, 1, 1, 0x7e, 0x41, 0x0B],
        // data: memory 0, offset i32.const 0, "hi"
        &[11, 8, 1, 0x00, 0x41, 0x00, 0x0B, 2, b'h', b'i'],
    ])
}

#[test]
fn test_full_module() {
    let m = decode(&full_module()).unwrap();

    assert_eq!(m.customs, vec![CustomSection { name: "abc".into(), bytes: vec![] }]);
    assert_eq!(m.imports, Some(vec![Import {
        module: "env".into(),
        name: "g".into(),
        desc: ImportDesc::Global(GlobalType { valtype: ValType::I32, mutability: Mut::Const }),
    }]));
    assert_eq!(m.tables, Some(vec![TableType {
        elemtype: ElemType::FuncRef,
        limits: Limits { min: 1, max: None },
    }]));
    assert_eq!(m.mems, Some(vec![MemType { limits: Limits { min: 1, max: Some(2) } }]));
    assert_eq!(m.globals, Some(vec![Global {
        type_: GlobalType { valtype: ValType::I32, mutability: Mut::Var },
        init: Expr::new(vec![0x41, 0x07]),
    }]));
    assert_eq!(m.exports, Some(vec![Export { name: "f".into(), desc: ExportDesc::Func(FuncIdx(0)) }]));
    assert_eq!(m.start, Some(FuncIdx(0)));
    assert_eq!(m.elems, Some(vec![Elem {
        table: TableIdx(0),
        offset: Expr::new(vec![0x41, 0x00]),
        init: vec![FuncIdx(0)],
    }]));
    assert_eq!(m.codes, Some(vec![Code {
        locals: vec![Locals { n: 1, valtype: ValType::I64 }],
        body: Expr::new(vec![0x41]),
    }]));
    assert_eq!(m.datas, Some(vec![Data {
        data: MemIdx(0),
        offset: Expr::new(vec![0x41, 0x00]),
        init: b"hi".to_vec(),
    }]));
}

#[test]
fn test_truncated_last_section() {
    let bytes = full_module();
    // the data section is the last 10 bytes; every cut inside it is a truncation
    for len in bytes.len() - 9..bytes.len() {
        let err = decode(&bytes[..len]).unwrap_err();
        assert_eq!(err.kind(), TRUNCATED, "cut at {}: {}", len, err);
    }
}

#[test]
fn test_truncated_header() {
    for len in 0..8 {
        let err = decode(&HEADER[..len]).unwrap_err();
        assert_eq!(err.kind(), TRUNCATED, "cut at {}: {}", len, err);
    }
}

proptest! {
    #[test]
    fn arbitrary_sections_never_panic(body in prop::collection::vec(any::<u8>(), 0..512)) {
        let bytes = module(&[&body[..]]);
        if let Err(e) = decode(&bytes) {
            prop_assert!(e.offset <= bytes.len());
        }
    }

    #[test]
    fn truncated_data_payload_is_truncation(payload in prop::collection::vec(any::<u8>(), 1..64),
                                           cut in 1usize..64) {
        let cut = cut.min(payload.len());
        let mut sec = vec![1, 0x00, 0x41, 0x00, 0x0B, payload.len() as u8];
        sec.extend_from_slice(&payload);
        let mut bytes = module(&[&[11, sec.len() as u8]]);
        bytes.extend_from_slice(&sec);
        prop_assert!(decode(&bytes).is_ok());

        let err = decode(&bytes[..bytes.len() - cut]).unwrap_err();
        prop_assert_eq!(err.kind(), TRUNCATED);
    }
}
