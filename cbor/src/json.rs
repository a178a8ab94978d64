/*!
Lossy projection of items onto JSON, for debugging and display.
*/

use super::*;
use base64::prelude::*;
use serde_json::{Number, Value};

impl Item {
    pub fn to_json(&self) -> Result<Value> {
        match self {
            Item::Unsigned(v) => Ok(Value::Number((*v).into())),
            Item::Negative(_) => {
                let v = i64::try_from(self.as_integer()?).map_err(|_| Error::OutOfRange)?;
                Ok(Value::Number(v.into()))
            }
            Item::Bytes(_) | Item::ByteChunks(_) => Ok(Value::String(
                BASE64_URL_SAFE_NO_PAD.encode(self.as_bytes()?),
            )),
            Item::Text(_) | Item::TextChunks(_) => Ok(Value::String(self.as_text()?.into_owned())),
            Item::Array(a) => a
                .iter()
                .map(Item::to_json)
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            Item::Map(m) => m
                .iter()
                .map(|(k, v)| Ok((json_key(k), v.to_json()?)))
                .collect::<Result<serde_json::Map<_, _>>>()
                .map(Value::Object),
            Item::DateTime(s) | Item::FullDate(s) => Ok(Value::String(s.clone())),
            Item::EpochTime(i) => i.to_json(),
            Item::False => Ok(Value::Bool(false)),
            Item::True => Ok(Value::Bool(true)),
            Item::Null | Item::Undefined => Ok(Value::Null),
            Item::Half(_) | Item::Single(_) | Item::Double(_) => {
                // JSON has no NaN or infinities
                Ok(Number::from_f64(self.as_float()?).map_or(Value::Null, Value::Number))
            }
            Item::Tagged(_) => Err(Error::NotImplemented("JSON projection of tag")),
            Item::EncodedCbor(_) => Err(Error::NotImplemented("JSON projection of encoded-cbor")),
            Item::Simple(_) => Err(Error::NotImplemented("JSON projection of simple value")),
            Item::Raw(_) => Err(Error::NotImplemented("JSON projection of raw CBOR")),
        }
    }
}

fn json_key(key: &Item) -> String {
    match key.as_text() {
        Ok(s) => s.into_owned(),
        Err(_) => key.to_diagnostic(&DiagnosticOptions::compact()),
    }
}
