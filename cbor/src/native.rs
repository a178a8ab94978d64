/*!
Host-side values accepted by the type registry factory.
*/

use super::*;

/// A runtime value of not-yet-known CBOR type
#[derive(Debug, Clone, PartialEq)]
pub enum Native {
    Null,
    Bool(bool),
    Int(i128),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    List(Vec<Native>),
    Map(Vec<(Native, Native)>),
    Tagged(u64, Box<Native>),
    /// Already an item, passed through unchanged
    Item(Item),
}

macro_rules! impl_int_to_native {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Native {
                fn from(value: $ty) -> Self {
                    Native::Int(value as i128)
                }
            }
        )*
    };
}

impl_int_to_native!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl From<f64> for Native {
    fn from(value: f64) -> Self {
        Native::Float(value)
    }
}

impl From<f32> for Native {
    fn from(value: f32) -> Self {
        Native::Float(value.into())
    }
}

impl From<bool> for Native {
    fn from(value: bool) -> Self {
        Native::Bool(value)
    }
}

impl From<&str> for Native {
    fn from(value: &str) -> Self {
        Native::Text(value.to_owned())
    }
}

impl From<String> for Native {
    fn from(value: String) -> Self {
        Native::Text(value)
    }
}

impl From<&[u8]> for Native {
    fn from(value: &[u8]) -> Self {
        Native::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for Native {
    fn from(value: Vec<u8>) -> Self {
        Native::Bytes(value)
    }
}

impl From<Vec<Native>> for Native {
    fn from(value: Vec<Native>) -> Self {
        Native::List(value)
    }
}

impl From<Item> for Native {
    fn from(value: Item) -> Self {
        Native::Item(value)
    }
}

impl<T> From<Option<T>> for Native
where
    T: Into<Native>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Native::Null, Into::into)
    }
}

impl From<serde_json::Value> for Native {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Native::Null,
            serde_json::Value::Bool(b) => Native::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    Native::Int(u as i128)
                } else if let Some(i) = n.as_i64() {
                    Native::Int(i as i128)
                } else {
                    Native::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Native::Text(s),
            serde_json::Value::Array(a) => Native::List(a.into_iter().map(Into::into).collect()),
            serde_json::Value::Object(o) => Native::Map(
                o.into_iter()
                    .map(|(k, v)| (Native::Text(k), v.into()))
                    .collect(),
            ),
        }
    }
}
