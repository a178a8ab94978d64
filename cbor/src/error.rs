use super::*;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Out of data at offset {0}")]
    NotEnoughData(usize),

    #[error("Invalid additional-info value {info} at offset {offset}")]
    InvalidMinorValue { info: u8, offset: usize },

    #[error("BREAK outside indefinite-length item at offset {0}")]
    UnexpectedBreak(usize),

    #[error("Chunked string contains an invalid chunk at offset {0}")]
    InvalidChunk(usize),

    #[error("Invalid simple value {0}")]
    InvalidSimpleValue(u8),

    #[error("Invalid UTF-8 in text string at offset {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("Maximum recursion depth reached")]
    MaxRecursion,

    #[error("{0} bytes of additional data after top-level item")]
    AdditionalData(usize),

    #[error("Incorrect type, expecting {expected}, found {found}")]
    IncorrectType {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Value out of range")]
    OutOfRange,

    #[error("Missing required value: {0}")]
    MissingValue(&'static str),

    #[error("Cannot convert {0} to the requested type")]
    TypeConversion(String),

    #[error("Unknown CBOR type '{0}'")]
    UnknownType(String),

    #[error("Invalid type tag string '{0}'")]
    InvalidTagString(String),

    #[error("Not implemented for {0}")]
    NotImplemented(&'static str),
}
