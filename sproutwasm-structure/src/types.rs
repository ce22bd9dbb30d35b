//! Types according to the _structure_ chapter of wasm-core-1

use std::fmt;

/// Vectors may have at most 2^32 - 1 elements, since their
/// length is encoded as a u32.
pub const VEC_MAX_SIZE: usize = ::std::u32::MAX as usize;

/// A name: a UTF-8 string of at most `VEC_MAX_SIZE` bytes.
///
/// Only ever constructed from well-formed UTF-8.
#[derive(Clone, Debug, PartialEq, Eq, Ord, PartialOrd, Hash, Default)]
pub struct Name {
    inner: String
}
impl From<String> for Name {
    fn from(inner: String) -> Self {
        Name { inner }
    }
}
impl<'a> From<&'a str> for Name {
    fn from(inner: &'a str) -> Self {
        Name { inner: inner.into() }
    }
}
impl From<Name> for String {
    fn from(name: Name) -> Self {
        name.inner
    }
}
impl ::std::ops::Deref for Name {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.inner)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum ValType {
    I32,
    I64,
    F32,
    F64,
}
impl ValType {
    pub const I32_BYTE: u8 = 0x7f;
    pub const I64_BYTE: u8 = 0x7e;
    pub const F32_BYTE: u8 = 0x7d;
    pub const F64_BYTE: u8 = 0x7c;

    pub fn from_byte(b: u8) -> Option<ValType> {
        match b {
            Self::I32_BYTE => Some(ValType::I32),
            Self::I64_BYTE => Some(ValType::I64),
            Self::F32_BYTE => Some(ValType::F32),
            Self::F64_BYTE => Some(ValType::F64),
            _ => None,
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            ValType::I32 => Self::I32_BYTE,
            ValType::I64 => Self::I64_BYTE,
            ValType::F32 => Self::F32_BYTE,
            ValType::F64 => Self::F64_BYTE,
        }
    }

    pub fn bit_width(self) -> u32 {
        match self {
            ValType::I32 | ValType::F32 => 32,
            ValType::I64 | ValType::F64 => 64,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValType::I32 => "i32",
            ValType::I64 => "i64",
            ValType::F32 => "f32",
            ValType::F64 => "f64",
        }
    }
}
impl fmt::Display for ValType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The leading byte of every encoded function type.
pub const FUNC_TYPE_TAG: u8 = 0x60;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct FuncType {
    pub params: Vec<ValType>,
    pub results: Vec<ValType>,
}
impl FuncType {
    /// Renders the type as `(i32,i32)->(i32)`.
    pub fn signature(&self) -> String {
        self.to_string()
    }
}
impl fmt::Display for FuncType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fn list(f: &mut fmt::Formatter, ts: &[ValType]) -> fmt::Result {
            f.write_str("(")?;
            for (i, t) in ts.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{}", t)?;
            }
            f.write_str(")")
        }
        list(f, &self.params)?;
        f.write_str("->")?;
        list(f, &self.results)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Limits {
    pub min: u32,
    pub max: Option<u32>,
}
impl Limits {
    pub const MIN_ONLY_FLAG: u8 = 0x00;
    pub const MIN_MAX_FLAG: u8 = 0x01;
}
impl fmt::Display for Limits {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{{min: {}, max: {}}}", self.min, max),
            None => write!(f, "{{min: {}}}", self.min),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MemType {
    pub limits: Limits,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TableType {
    pub elemtype: ElemType,
    pub limits: Limits,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum ElemType {
    FuncRef,
}
impl ElemType {
    pub const FUNC_REF_BYTE: u8 = 0x70;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GlobalType {
    pub valtype: ValType,
    pub mutability: Mut,
}
impl fmt::Display for GlobalType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let m = match self.mutability {
            Mut::Const => "const",
            Mut::Var => "var",
        };
        write!(f, "{{type: {}, mut: {}}}", self.valtype, m)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Mut {
    Const,
    Var,
}
impl Mut {
    pub const CONST_BYTE: u8 = 0x00;
    pub const VAR_BYTE: u8 = 0x01;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn functype_signature() {
        let ft = FuncType {
            params: vec![ValType::I32, ValType::I64],
            results: vec![ValType::F64],
        };
        assert_eq!(ft.signature(), "(i32,i64)->(f64)");
        assert_eq!(FuncType::default().signature(), "()->()");
    }

    #[test]
    fn functype_equality_is_structural() {
        let a = FuncType { params: vec![ValType::I32], results: vec![] };
        let b = FuncType { params: vec![ValType::I32], results: vec![] };
        let c = FuncType { params: vec![], results: vec![ValType::I32] };
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn valtype_bytes() {
        for &t in &[ValType::I32, ValType::I64, ValType::F32, ValType::F64] {
            assert_eq!(ValType::from_byte(t.to_byte()), Some(t));
        }
        assert_eq!(ValType::from_byte(0x7b), None);
        assert_eq!(ValType::from_byte(0x40), None);
    }

    #[test]
    fn display_limits_and_globaltype() {
        assert_eq!(Limits { min: 1, max: None }.to_string(), "{min: 1}");
        assert_eq!(Limits { min: 1, max: Some(2) }.to_string(), "{min: 1, max: 2}");

        let gt = GlobalType { valtype: ValType::F32, mutability: Mut::Var };
        assert_eq!(gt.to_string(), "{type: f32, mut: var}");
    }
}
