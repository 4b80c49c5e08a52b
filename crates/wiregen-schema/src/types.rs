use crate::node::{EnumId, StructId};
use derive_more::{Display, FromStr};
use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use serde::{Deserialize, Serialize};

///
/// ScalarKind
///
/// Fixed-width scalar base types of the wire format.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, FromStr, Hash, PartialEq, Serialize)]
#[remain::sorted]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    Bool,
    Byte,
    Double,
    Float,
    Int,
    Long,
    Short,
    UByte,
    UInt,
    ULong,
    UShort,
}

impl ScalarKind {
    /// Size in bytes on the wire.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Self::Bool | Self::Byte | Self::UByte => 1,
            Self::Short | Self::UShort => 2,
            Self::Int | Self::UInt | Self::Float => 4,
            Self::Long | Self::ULong | Self::Double => 8,
        }
    }

    #[must_use]
    pub const fn is_bool(self) -> bool {
        matches!(self, Self::Bool)
    }

    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float | Self::Double)
    }

    #[must_use]
    pub const fn is_integer(self) -> bool {
        !self.is_bool() && !self.is_float()
    }

    #[must_use]
    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            Self::Byte | Self::Short | Self::Int | Self::Long | Self::Float | Self::Double
        )
    }

    /// The Rust type a caller sees.
    #[must_use]
    pub fn rust_type(self) -> TokenStream {
        match self {
            Self::Bool => quote!(bool),
            Self::Byte => quote!(i8),
            Self::UByte => quote!(u8),
            Self::Short => quote!(i16),
            Self::UShort => quote!(u16),
            Self::Int => quote!(i32),
            Self::UInt => quote!(u32),
            Self::Long => quote!(i64),
            Self::ULong => quote!(u64),
            Self::Float => quote!(f32),
            Self::Double => quote!(f64),
        }
    }

    /// The type stored in the buffer; booleans travel as a single byte.
    #[must_use]
    pub fn raw_type(self) -> TokenStream {
        match self {
            Self::Bool => quote!(u8),
            other => other.rust_type(),
        }
    }

    /// Inclusive value range of an integer kind.
    #[must_use]
    pub const fn int_range(self) -> Option<(i128, i128)> {
        let range = match self {
            Self::Byte => (i8::MIN as i128, i8::MAX as i128),
            Self::UByte => (0, u8::MAX as i128),
            Self::Short => (i16::MIN as i128, i16::MAX as i128),
            Self::UShort => (0, u16::MAX as i128),
            Self::Int => (i32::MIN as i128, i32::MAX as i128),
            Self::UInt => (0, u32::MAX as i128),
            Self::Long => (i64::MIN as i128, i64::MAX as i128),
            Self::ULong => (0, u64::MAX as i128),
            Self::Bool | Self::Float | Self::Double => return None,
        };

        Some(range)
    }

    /// Interpret a declared default constant for this kind.
    #[must_use]
    pub fn parse_value(self, text: &str) -> Option<ScalarValue> {
        let text = text.trim();

        if self.is_bool() {
            return match text {
                "true" | "1" => Some(ScalarValue::Bool(true)),
                "false" | "0" => Some(ScalarValue::Bool(false)),
                _ => None,
            };
        }

        if self.is_float() {
            return text
                .trim_start_matches('+')
                .parse::<f64>()
                .ok()
                .map(ScalarValue::Float);
        }

        let value = text.parse::<i128>().ok()?;
        let (min, max) = self.int_range()?;

        (min..=max).contains(&value).then_some(ScalarValue::Int(value))
    }
}

///
/// ScalarValue
///
/// A parsed default constant.
///

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScalarValue {
    Bool(bool),
    Int(i128),
    Float(f64),
}

impl ToTokens for ScalarKind {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        tokens.extend(self.rust_type());
    }
}

///
/// Type
///
/// Resolved field type. `Struct` covers both fixed records and tables;
/// which one is decided by the referenced definition's `fixed` flag.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Type {
    Scalar(ScalarKind),
    Enum(ScalarKind, EnumId),
    Struct(StructId),
    Union(EnumId),
    String,
    Vector(Box<Self>),
}

impl Type {
    #[must_use]
    pub const fn scalar(&self) -> Option<ScalarKind> {
        match self {
            Self::Scalar(kind) | Self::Enum(kind, _) => Some(*kind),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        self.scalar().is_some()
    }

    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Self::String)
    }

    #[must_use]
    pub const fn is_vector(&self) -> bool {
        matches!(self, Self::Vector(_))
    }

    #[must_use]
    pub const fn is_union(&self) -> bool {
        matches!(self, Self::Union(_))
    }

    #[must_use]
    pub fn element(&self) -> Option<&Self> {
        match self {
            Self::Vector(inner) => Some(inner),
            _ => None,
        }
    }

    /// Enum definition backing a scalar enum or a union discriminant.
    #[must_use]
    pub const fn enum_def(&self) -> Option<EnumId> {
        match self {
            Self::Enum(_, id) => Some(*id),
            _ => None,
        }
    }

    /// Width used when ordering table fields by size. Everything that is
    /// not a scalar is stored as a 32-bit offset.
    #[must_use]
    pub const fn slot_width(&self) -> usize {
        match self.scalar() {
            Some(kind) => kind.size(),
            None => 4,
        }
    }
}

///
/// TESTS
///
