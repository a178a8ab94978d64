/*!
Registry of the semantic CBOR types.

Each entry names a CDDL-style type, the major type it lives under, an
optional fixed additional-info value and the types it may resolve to.
*/

use super::*;
use core::str::FromStr;
use native::Native;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CborType {
    UnsignedInt,
    NegativeInt,
    Int,
    ByteString,
    TextString,
    Array,
    Map,
    Tag,
    Special,
    Bool,
    False,
    True,
    Null,
    Undefined,
    Float,
    Half,
    Single,
    Double,
    Any,
}

impl CborType {
    pub const ALL: [CborType; 19] = [
        CborType::UnsignedInt,
        CborType::NegativeInt,
        CborType::Int,
        CborType::ByteString,
        CborType::TextString,
        CborType::Array,
        CborType::Map,
        CborType::Tag,
        CborType::Special,
        CborType::Bool,
        CborType::False,
        CborType::True,
        CborType::Null,
        CborType::Undefined,
        CborType::Float,
        CborType::Half,
        CborType::Single,
        CborType::Double,
        CborType::Any,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CborType::UnsignedInt => "uint",
            CborType::NegativeInt => "nint",
            CborType::Int => "int",
            CborType::ByteString => "bstr",
            CborType::TextString => "tstr",
            CborType::Array => "array",
            CborType::Map => "map",
            CborType::Tag => "tag",
            CborType::Special => "special",
            CborType::Bool => "bool",
            CborType::False => "false",
            CborType::True => "true",
            CborType::Null => "null",
            CborType::Undefined => "undefined",
            CborType::Float => "float",
            CborType::Half => "float16",
            CborType::Single => "float32",
            CborType::Double => "float64",
            CborType::Any => "any",
        }
    }

    pub fn major_type(&self) -> Option<u8> {
        match self {
            CborType::UnsignedInt => Some(0),
            CborType::NegativeInt => Some(1),
            CborType::ByteString => Some(2),
            CborType::TextString => Some(3),
            CborType::Array => Some(4),
            CborType::Map => Some(5),
            CborType::Tag => Some(6),
            CborType::Special
            | CborType::Bool
            | CborType::False
            | CborType::True
            | CborType::Null
            | CborType::Undefined
            | CborType::Float
            | CborType::Half
            | CborType::Single
            | CborType::Double => Some(7),
            CborType::Int | CborType::Any => None,
        }
    }

    /// The additional-info value, for types where it is fixed
    pub fn additional_info(&self) -> Option<u8> {
        match self {
            CborType::False => Some(20),
            CborType::True => Some(21),
            CborType::Null => Some(22),
            CborType::Undefined => Some(23),
            CborType::Half => Some(25),
            CborType::Single => Some(26),
            CborType::Double => Some(27),
            _ => None,
        }
    }

    pub fn aliases(&self) -> &'static [CborType] {
        match self {
            CborType::Int => &[CborType::UnsignedInt, CborType::NegativeInt],
            CborType::Special => &[
                CborType::Bool,
                CborType::Null,
                CborType::Undefined,
                CborType::Float,
            ],
            CborType::Bool => &[CborType::True, CborType::False],
            CborType::Float => &[CborType::Half, CborType::Single, CborType::Double],
            _ => &[],
        }
    }

    /// Resolve through the aliases to a concrete type.
    ///
    /// Without `info` the first alias is followed.  With `info` the alias
    /// whose fixed additional-info matches is searched for, depth first.
    pub fn resolve(self, info: Option<u8>) -> Result<CborType> {
        let aliases = self.aliases();
        if aliases.is_empty() {
            return match (info, self.additional_info()) {
                (Some(info), Some(fixed)) if info != fixed => Err(self.unresolved(Some(info))),
                _ => Ok(self),
            };
        }

        match info {
            None => aliases[0].resolve(None),
            Some(info) => aliases
                .iter()
                .find_map(|alias| match alias.resolve(Some(info)) {
                    Ok(t) if t.additional_info() == Some(info) => Some(t),
                    _ => None,
                })
                .ok_or_else(|| self.unresolved(Some(info))),
        }
    }

    /// Pick unsigned or negative integer by sign, for the types that allow either
    pub fn resolve_integer(self, value: i128) -> Result<CborType> {
        match self {
            CborType::Int | CborType::Any => Ok(if value < 0 {
                CborType::NegativeInt
            } else {
                CborType::UnsignedInt
            }),
            CborType::UnsignedInt if value >= 0 => Ok(self),
            CborType::NegativeInt if value < 0 => Ok(self),
            _ => Err(Error::TypeConversion(format!("{value} to {}", self.name()))),
        }
    }

    fn unresolved(&self, info: Option<u8>) -> Error {
        match info {
            Some(info) => Error::UnknownType(format!("{}.{info}", self.name())),
            None => Error::UnknownType(self.name().to_string()),
        }
    }

    /// Render as `#<major>.<info>`, or `#<major>` when no info applies
    pub fn to_tag_string(&self, info: Option<u8>) -> Result<String> {
        let resolved = self.resolve(info)?;
        let major = resolved
            .major_type()
            .ok_or_else(|| self.unresolved(info))?;

        Ok(match info.or(resolved.additional_info()) {
            Some(info) => format!("#{major}.{info}"),
            None => format!("#{major}"),
        })
    }

    /// Parse a `#<major>[.<info>]` string back into a type
    pub fn from_tag_string(s: &str) -> Result<CborType> {
        let invalid = || Error::InvalidTagString(s.to_string());
        let body = s.strip_prefix('#').ok_or_else(invalid)?;
        let (major, info) = match body.split_once('.') {
            Some((major, info)) => (major, Some(info.parse::<u8>().map_err(|_| invalid())?)),
            None => (body, None),
        };
        let major = major.parse::<u8>().map_err(|_| invalid())?;
        if major > 7 || info.is_some_and(|i| i > 31) {
            return Err(invalid());
        }

        let base = Self::from_major_type(major);
        match info {
            None => Ok(base),
            Some(_) if major != 7 => Ok(base),
            Some(info) => base.resolve(Some(info)).map_err(|_| invalid()),
        }
    }

    /// Derive the type from the top three bits of an initial byte
    pub fn from_initial_byte(b: u8) -> CborType {
        Self::from_major_type(b >> 5)
    }

    fn from_major_type(major: u8) -> CborType {
        match major {
            0 => CborType::UnsignedInt,
            1 => CborType::NegativeInt,
            2 => CborType::ByteString,
            3 => CborType::TextString,
            4 => CborType::Array,
            5 => CborType::Map,
            6 => CborType::Tag,
            _ => CborType::Special,
        }
    }

    /// Construct an item of this type from a host value
    pub fn create(self, value: Native) -> Result<Item> {
        match (self, value) {
            (_, Native::Item(item)) => self.accept(item),
            (CborType::Any, value) => create_any(value),
            (CborType::Special, value) => match value {
                v @ (Native::Null | Native::Bool(_) | Native::Float(_)) => create_any(v),
                v => Err(conversion(&v, self)),
            },
            (CborType::Int | CborType::UnsignedInt | CborType::NegativeInt, Native::Int(i)) => {
                self.resolve_integer(i)?;
                Item::integer(i)
            }
            (CborType::ByteString, Native::Bytes(b)) => Ok(Item::Bytes(b)),
            (CborType::TextString, Native::Text(s)) => Ok(Item::Text(s)),
            (CborType::Array, Native::List(values)) => values
                .into_iter()
                .map(create_any)
                .collect::<Result<Vec<_>>>()
                .map(|items| Item::Array(Array::new(items))),
            (CborType::Map, Native::Map(entries)) => entries
                .into_iter()
                .map(|(k, v)| Ok((create_any(k)?, create_any(v)?)))
                .collect::<Result<Vec<_>>>()
                .map(|entries| Item::Map(Map::from_entries(entries))),
            (CborType::Tag, Native::Tagged(tag, value)) => {
                Ok(Item::tagged(tag, create_any(*value)?))
            }
            (CborType::Bool, Native::Bool(b)) => Ok(b.into()),
            (CborType::True, Native::Bool(true)) => Ok(Item::True),
            (CborType::False, Native::Bool(false)) => Ok(Item::False),
            (CborType::Null, Native::Null) => Ok(Item::Null),
            (CborType::Undefined, Native::Null) => Ok(Item::Undefined),
            (CborType::Float, Native::Float(f)) => Ok(narrowest_float(f)),
            (CborType::Float, Native::Int(i)) => Ok(narrowest_float(i as f64)),
            (CborType::Half, Native::Float(f)) => Ok(Item::Half(half::f16::from_f64(f))),
            (CborType::Half, Native::Int(i)) => Ok(Item::Half(half::f16::from_f64(i as f64))),
            (CborType::Single, Native::Float(f)) => Ok(Item::Single(f as f32)),
            (CborType::Single, Native::Int(i)) => Ok(Item::Single(i as f32)),
            (CborType::Double, Native::Float(f)) => Ok(Item::Double(f)),
            (CborType::Double, Native::Int(i)) => Ok(Item::Double(i as f64)),
            (t, v) => Err(conversion(&v, t)),
        }
    }

    fn accept(self, item: Item) -> Result<Item> {
        let t = item.cbor_type();
        let ok = match self {
            CborType::Any => true,
            CborType::Int => matches!(t, CborType::UnsignedInt | CborType::NegativeInt),
            CborType::Special => t.major_type() == Some(7),
            CborType::Bool => matches!(t, CborType::True | CborType::False),
            CborType::Float => matches!(t, CborType::Half | CborType::Single | CborType::Double),
            _ => t == self,
        };
        if ok {
            Ok(item)
        } else {
            Err(Error::TypeConversion(format!(
                "{} item to {}",
                t.name(),
                self.name()
            )))
        }
    }
}

impl core::fmt::Display for CborType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CborType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.starts_with('#') {
            return Self::from_tag_string(s);
        }
        Self::ALL
            .iter()
            .find(|t| t.name() == s)
            .copied()
            .ok_or_else(|| Error::UnknownType(s.to_string()))
    }
}

fn conversion(value: &Native, t: CborType) -> Error {
    Error::TypeConversion(format!("{value:?} to {}", t.name()))
}

fn create_any(value: Native) -> Result<Item> {
    match value {
        Native::Null => Ok(Item::Null),
        Native::Bool(b) => Ok(b.into()),
        Native::Int(i) => Item::integer(i),
        Native::Float(f) => Ok(Item::Double(f)),
        Native::Text(s) => Ok(Item::Text(s)),
        Native::Bytes(b) => Ok(Item::Bytes(b)),
        v @ Native::List(_) => CborType::Array.create(v),
        v @ Native::Map(_) => CborType::Map.create(v),
        v @ Native::Tagged(..) => CborType::Tag.create(v),
        Native::Item(item) => Ok(item),
    }
}

fn lossless_float_coerce<T>(value: f64) -> Option<T>
where
    T: num_traits::FromPrimitive + Into<f64> + Copy,
{
    match <T as num_traits::FromPrimitive>::from_f64(value) {
        Some(f) if <T as Into<f64>>::into(f) == value => Some(f),
        _ => None,
    }
}

fn narrowest_float(value: f64) -> Item {
    if let Some(f) = lossless_float_coerce::<half::f16>(value) {
        Item::Half(f)
    } else if let Some(f) = lossless_float_coerce::<f32>(value) {
        Item::Single(f)
    } else {
        Item::Double(value)
    }
}
