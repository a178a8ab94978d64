#![no_std]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

use alloc::{
    borrow::ToOwned,
    boxed::Box,
    format,
    string::{String, ToString},
    vec,
    vec::Vec,
};

pub mod builder;
pub mod decode;
pub mod diag;
pub mod encode;
pub mod item;
pub mod json;
pub mod native;
pub mod types;

mod error;

pub use builder::{ArrayBuilder, MapBuilder, Root};
pub use decode::{decode, decode_length, decode_sequence, decode_with_offset};
pub use diag::DiagnosticOptions;
pub use encode::{encode, encode_length, encode_option};
pub use error::{Error, Result};
pub use item::{Array, Item, Map, Simple, Tagged};
pub use native::Native;
pub use types::CborType;

/// Tag numbers that select a specialised item shape
pub mod tags {
    pub const DATE_TIME: u64 = 0;
    pub const EPOCH_TIME: u64 = 1;
    pub const ENCODED_CBOR: u64 = 24;
    pub const FULL_DATE: u64 = 1004;
}

#[cfg(test)]
mod decode_tests;
