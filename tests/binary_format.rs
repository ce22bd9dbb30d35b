extern crate sprout_wasm;

use sprout_wasm::structure::instructions::*;
use sprout_wasm::structure::modules::*;
use sprout_wasm::structure::types::*;
use sprout_wasm::binary_format::Reason;
use sprout_wasm::{decode, ErrorKind};

fn wasm(sections: &[&[u8]]) -> Vec<u8> {
    let mut v = vec![0x00, 0x61, 0x73, 0x6D, 0x01, 0x00, 0x00, 0x00];
    for s in sections {
        v.extend_from_slice(s);
    }
    v
}

/// `(func $fac (param f64) (result f64) ...)` exported as "fac", with a
/// `name` custom section at the end.
fn factorial() -> Vec<u8> {
    wasm(&[
        &[0x01, 0x06, 0x01, 0x60, 0x01, 0x7c, 0x01, 0x7c],
        &[0x03, 0x02, 0x01, 0x00],
        &[0x07, 0x07, 0x01, 0x03, b'f', b'a', b'c', 0x00, 0x00],
        &[
            0x0a, 0x2e, 0x01, 0x2c, 0x00,
            0x20, 0x00,
            0x44, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xf0, 0x3f,
            0x63,
            0x04, 0x7c,
            0x44, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xf0, 0x3f,
            0x05,
            0x20, 0x00,
            0x20, 0x00,
            0x44, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xf0, 0x3f,
            0xa1,
            0x10, 0x00,
            0xa2,
            0x0b,
            0x0b,
        ],
        &[0x00, 0x05, 0x04, b'n', b'a', b'm', b'e'],
    ])
}

#[test]
fn decodes_factorial() {
    let module = decode(&factorial()).unwrap();

    assert_eq!(module.types, Some(vec![FuncType {
        params: vec![ValType::F64],
        results: vec![ValType::F64],
    }]));
    assert_eq!(module.funcs, Some(vec![TypeIdx(0)]));
    assert_eq!(module.exports, Some(vec![Export {
        name: "fac".into(),
        desc: ExportDesc::Func(FuncIdx(0)),
    }]));
    assert_eq!(module.customs, vec![CustomSection { name: "name".into(), bytes: vec![] }]);

    let codes = module.codes.as_ref().unwrap();
    assert_eq!(codes.len(), 1);
    assert!(codes[0].locals.is_empty());
    assert_eq!(codes[0].local_count(), 0);
    // the inner `end` of the if/else stays part of the body
    assert_eq!(codes[0].body.bytes.len(), 0x2c - 2);
    assert_eq!(codes[0].body.bytes.last(), Some(&END));

    assert_eq!(module.func_type(0).map(|t| t.signature()), Some("(f64)->(f64)".to_string()));
}

#[test]
fn absent_and_empty_sections_differ() {
    let module = decode(&wasm(&[&[0x01, 0x01, 0x00]])).unwrap();
    assert_eq!(module.types, Some(vec![]));
    assert_eq!(module.imports, None);
    assert_eq!(module.func_count(), 0);
    assert_eq!(module.code_count(), 0);
}

#[test]
fn reports_first_violation() {
    let err = decode(&wasm(&[&[0x01, 0x01, 0x00], &[0x01, 0x01, 0x00]])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StructuralViolation);
    assert_eq!(err.to_string(), "junk after last section, id: 1 (at offset 0xb)");

    let err = decode(&wasm(&[&[0x01, 0x02, 0x01, 0x61]])).unwrap_err();
    assert_eq!(err.reason, Reason::InvalidFuncTypeTag(0x61));
    assert_eq!(err.kind(), ErrorKind::MalformedEncoding);
    assert_eq!(err.offset, 11);

    let err = decode(&wasm(&[&[0x03, 0x06, 0x01, 0x80, 0x80, 0x80, 0x80, 0x80]])).unwrap_err();
    assert_eq!(err.reason, Reason::IntTooLong);
    assert_eq!(err.kind(), ErrorKind::IntegerEncoding);

    let err = decode(&factorial()[..19]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TruncatedInput);
}

#[test]
fn name_section_is_kept_opaque() {
    let module = decode(&wasm(&[
        &[0x00, 0x09, 0x04, b'n', b'a', b'm', b'e', 0x01, 0x02, 0x03, 0x04],
    ])).unwrap();
    assert_eq!(module.customs.len(), 1);
    assert_eq!(&*module.customs[0].name, "name");
    assert_eq!(module.customs[0].bytes, vec![0x01, 0x02, 0x03, 0x04]);
}

#[test]
fn expressions_are_opaque() {
    // global i64 = i64.const 11; the immediate is 0x0b and ends the expression
    // early, so the section is one byte too long
    let err = decode(&wasm(&[&[0x06, 0x06, 0x01, 0x7e, 0x00, 0x42, 0x0b, 0x0b]])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StructuralViolation);

    let module = decode(&wasm(&[&[0x06, 0x06, 0x01, 0x7e, 0x00, 0x42, 0x0c, 0x0b]])).unwrap();
    assert_eq!(module.globals, Some(vec![Global {
        type_: GlobalType { valtype: ValType::I64, mutability: Mut::Const },
        init: Expr::new(vec![0x42, 0x0c]),
    }]));
}
