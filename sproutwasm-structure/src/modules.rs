use super::types::FuncType;
use super::types::ValType;
use super::types::TableType;
use super::types::MemType;
use super::types::GlobalType;
use super::types::Name;

use super::instructions::Expr;

/// `\0asm`, read as a little endian u32.
pub const MAGIC: u32 = 0x6D73_6100;
pub const VERSION: u32 = 0x0000_0001;

/// A decoded module.
///
/// Each standard section is `None` if it did not occur in the binary,
/// which is distinct from a section that occurred with zero entries.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Module {
    pub magic: u32,
    pub version: u32,
    pub customs: Vec<CustomSection>,

    pub types:   Option<Vec<FuncType>>,
    pub imports: Option<Vec<Import>>,
    pub funcs:   Option<Vec<TypeIdx>>,
    pub tables:  Option<Vec<TableType>>,
    pub mems:    Option<Vec<MemType>>,
    pub globals: Option<Vec<Global>>,
    pub exports: Option<Vec<Export>>,
    pub start:   Option<FuncIdx>,
    pub elems:   Option<Vec<Elem>>,
    pub codes:   Option<Vec<Code>>,
    pub datas:   Option<Vec<Data>>,
}
impl Module {
    /// Number of entries in the function section, 0 if absent.
    pub fn func_count(&self) -> usize {
        self.funcs.as_ref().map_or(0, Vec::len)
    }

    /// Number of entries in the code section, 0 if absent.
    pub fn code_count(&self) -> usize {
        self.codes.as_ref().map_or(0, Vec::len)
    }

    /// The function type a locally defined function refers to.
    pub fn func_type(&self, func: usize) -> Option<&FuncType> {
        let TypeIdx(idx) = *self.funcs.as_ref()?.get(func)?;
        self.types.as_ref()?.get(idx as usize)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct TypeIdx(pub u32);
#[derive(Copy, Clone, Debug, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct FuncIdx(pub u32);
#[derive(Copy, Clone, Debug, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct TableIdx(pub u32);
#[derive(Copy, Clone, Debug, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct MemIdx(pub u32);
#[derive(Copy, Clone, Debug, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct GlobalIdx(pub u32);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomSection {
    pub name: Name,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Import {
    pub module: Name,
    pub name: Name,
    pub desc: ImportDesc,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportDesc {
    Func(TypeIdx),
    Table(TableType),
    Mem(MemType),
    Global(GlobalType),
}
impl ImportDesc {
    pub const FUNC_TAG: u8 = 0x00;
    pub const TABLE_TAG: u8 = 0x01;
    pub const MEM_TAG: u8 = 0x02;
    pub const GLOBAL_TAG: u8 = 0x03;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Global {
    pub type_: GlobalType,
    pub init: Expr,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Export {
    pub name: Name,
    pub desc: ExportDesc,
}

/// The index is not resolved against its index space.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExportDesc {
    Func(FuncIdx),
    Table(TableIdx),
    Mem(MemIdx),
    Global(GlobalIdx),
}
impl ExportDesc {
    pub const FUNC_TAG: u8 = 0x00;
    pub const TABLE_TAG: u8 = 0x01;
    pub const MEM_TAG: u8 = 0x02;
    pub const GLOBAL_TAG: u8 = 0x03;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Elem {
    pub table: TableIdx,
    pub offset: Expr,
    pub init: Vec<FuncIdx>,
}

/// A function body together with its compressed local declarations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Code {
    pub locals: Vec<Locals>,
    pub body: Expr,
}
impl Code {
    /// Total number of declared locals, summed in 64 bits so it can't wrap.
    pub fn local_count(&self) -> u64 {
        self.locals.iter().map(|l| u64::from(l.n)).sum()
    }
}

/// `n` locals of type `valtype`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Locals {
    pub n: u32,
    pub valtype: ValType,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Data {
    pub data: MemIdx,
    pub offset: Expr,
    pub init: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_count_does_not_wrap() {
        let code = Code {
            locals: vec![
                Locals { n: ::std::u32::MAX, valtype: ValType::I32 },
                Locals { n: 2, valtype: ValType::F64 },
            ],
            body: Expr::default(),
        };
        assert_eq!(code.local_count(), ::std::u32::MAX as u64 + 2);
    }

    #[test]
    fn func_type_lookup() {
        let module = Module {
            types: Some(vec![FuncType { params: vec![], results: vec![ValType::I32] }]),
            funcs: Some(vec![TypeIdx(0), TypeIdx(3)]),
            ..Module::default()
        };
        assert_eq!(module.func_type(0).map(|t| t.signature()), Some("()->(i32)".to_string()));
        assert_eq!(module.func_type(1), None);
        assert_eq!(module.func_type(2), None);
        assert_eq!(module.func_count(), 2);
        assert_eq!(module.code_count(), 0);
    }
}
