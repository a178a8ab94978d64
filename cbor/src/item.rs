/*!
The CBOR item model.

An [`Item`] is one decoded (or to-be-encoded) CBOR data item.  The family is
closed: the encoder, decoder and diagnostic printer all match on it
exhaustively.
*/

use super::*;
use alloc::borrow::Cow;
use core::hash::{BuildHasher, Hash, Hasher};
use hashbrown::{DefaultHashBuilder, HashTable};

#[derive(Debug, Clone)]
pub enum Item {
    Unsigned(u64),
    /// Magnitude `m` of the wire value `-(m + 1)`
    Negative(u64),
    Bytes(Vec<u8>),
    /// Indefinite-length byte string
    ByteChunks(Vec<Vec<u8>>),
    Text(String),
    /// Indefinite-length text string
    TextChunks(Vec<String>),
    Array(Array),
    Map(Map),
    Tagged(Tagged),
    /// Tag 0 over a text string
    DateTime(String),
    /// Tag 1 over an integer or float
    EpochTime(Box<Item>),
    /// Tag 24 over a byte string holding encoded CBOR
    EncodedCbor(Vec<u8>),
    /// Tag 1004 over a text string
    FullDate(String),
    False,
    True,
    Null,
    Undefined,
    Simple(Simple),
    Half(half::f16),
    Single(f32),
    Double(f64),
    /// Pre-encoded CBOR, emitted verbatim
    Raw(Vec<u8>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Array {
    items: Vec<Item>,
    indefinite: bool,
}

impl Array {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items,
            indefinite: false,
        }
    }

    pub fn new_indefinite(items: Vec<Item>) -> Self {
        Self {
            items,
            indefinite: true,
        }
    }

    pub fn is_indefinite(&self) -> bool {
        self.indefinite
    }

    pub fn as_slice(&self) -> &[Item] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<Item> {
        self.items
    }

    pub(crate) fn set_indefinite(&mut self, indefinite: bool) {
        self.indefinite = indefinite
    }

    pub(crate) fn push(&mut self, item: Item) -> usize {
        self.items.push(item);
        self.items.len() - 1
    }

    pub(crate) fn replace(&mut self, idx: usize, item: Item) {
        self.items[idx] = item
    }
}

impl core::ops::Deref for Array {
    type Target = [Item];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Item;
    type IntoIter = core::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Ordered map with keys unique by item equality
#[derive(Clone, Default)]
pub struct Map {
    entries: Vec<(Item, Item)>,
    indefinite: bool,
    // Positions into `entries`, hashed by key
    index: HashTable<usize>,
    hasher: DefaultHashBuilder,
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from pairs; a repeated key keeps its first position and its last value
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Item, Item)>,
    {
        let mut map = Self::new();
        for (k, v) in entries {
            map.insert(k, v);
        }
        map
    }

    pub fn is_indefinite(&self) -> bool {
        self.indefinite
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &Item) -> Option<usize> {
        let hash = self.hasher.hash_one(key);
        self.index
            .find(hash, |&idx| self.entries[idx].0 == *key)
            .copied()
    }

    pub fn get(&self, key: &Item) -> Option<&Item> {
        self.position(key).map(|idx| &self.entries[idx].1)
    }

    pub fn get_text(&self, key: &str) -> Option<&Item> {
        self.get(&key.into())
    }

    pub fn get_int(&self, key: i64) -> Option<&Item> {
        self.get(&key.into())
    }

    pub fn contains_key(&self, key: &Item) -> bool {
        self.position(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Item, &Item)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Item> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Item> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn into_entries(self) -> Vec<(Item, Item)> {
        self.entries
    }

    pub(crate) fn set_indefinite(&mut self, indefinite: bool) {
        self.indefinite = indefinite
    }

    /// Returns the index the value landed at
    pub(crate) fn insert(&mut self, key: Item, value: Item) -> usize {
        if let Some(idx) = self.position(&key) {
            self.entries[idx].1 = value;
            return idx;
        }

        let idx = self.entries.len();
        let hash = self.hasher.hash_one(&key);
        let (entries, hasher) = (&self.entries, &self.hasher);
        self.index
            .insert_unique(hash, idx, |&i| hasher.hash_one(&entries[i].0));
        self.entries.push((key, value));
        idx
    }

    pub(crate) fn replace(&mut self, idx: usize, value: Item) {
        self.entries[idx].1 = value
    }
}

impl core::fmt::Debug for Map {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Map")
            .field("entries", &self.entries)
            .field("indefinite", &self.indefinite)
            .finish()
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.indefinite == other.indefinite && self.entries == other.entries
    }
}

impl Eq for Map {}

impl Hash for Map {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entries.hash(state);
        self.indefinite.hash(state);
    }
}

/// A simple value with no item of its own: 0..=19 or 32..=255
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Simple(u8);

impl Simple {
    /// 20..=23 are `false`, `true`, `null` and `undefined`; 24..=31 are reserved
    pub fn new(value: u8) -> Result<Self> {
        match value {
            20..=31 => Err(Error::InvalidSimpleValue(value)),
            _ => Ok(Self(value)),
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Simple {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Simple> for u8 {
    fn from(value: Simple) -> Self {
        value.0
    }
}

impl From<Simple> for Item {
    fn from(value: Simple) -> Self {
        Item::Simple(value)
    }
}

impl core::fmt::Display for Simple {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "simple({})", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tagged {
    tag: u64,
    item: Box<Item>,
}

impl Tagged {
    pub fn tag(&self) -> u64 {
        self.tag
    }

    pub fn item(&self) -> &Item {
        &self.item
    }

    pub fn into_item(self) -> Item {
        *self.item
    }
}

impl Item {
    /// Unsigned or negative by sign; values outside the CBOR integer range fail
    pub fn integer(value: i128) -> Result<Item> {
        if value >= 0 {
            u64::try_from(value)
                .map(Item::Unsigned)
                .map_err(|_| Error::OutOfRange)
        } else {
            u64::try_from(-1 - value)
                .map(Item::Negative)
                .map_err(|_| Error::OutOfRange)
        }
    }

    /// Wrap `item` in `tag`, selecting the specialised shape for the recognised tags
    pub fn tagged(tag: u64, item: Item) -> Item {
        match (tag, item) {
            (tags::DATE_TIME, Item::Text(s)) => Item::DateTime(s),
            (
                tags::EPOCH_TIME,
                item @ (Item::Unsigned(_)
                | Item::Negative(_)
                | Item::Half(_)
                | Item::Single(_)
                | Item::Double(_)),
            ) => Item::EpochTime(Box::new(item)),
            (tags::ENCODED_CBOR, Item::Bytes(b)) => Item::EncodedCbor(b),
            (tags::FULL_DATE, Item::Text(s)) => Item::FullDate(s),
            (tag, item) => Item::Tagged(Tagged {
                tag,
                item: Box::new(item),
            }),
        }
    }

    pub fn simple(value: u8) -> Result<Item> {
        Simple::new(value).map(Item::Simple)
    }

    /// Encode `item` and wrap the bytes in tag 24
    pub fn encoded_cbor(item: &Item) -> Item {
        Item::EncodedCbor(encode::encode(item))
    }

    pub fn array<I, T>(items: I) -> Item
    where
        I: IntoIterator<Item = T>,
        T: Into<Item>,
    {
        Item::Array(Array::new(items.into_iter().map(Into::into).collect()))
    }

    pub fn cbor_type(&self) -> CborType {
        match self {
            Item::Unsigned(_) => CborType::UnsignedInt,
            Item::Negative(_) => CborType::NegativeInt,
            Item::Bytes(_) | Item::ByteChunks(_) => CborType::ByteString,
            Item::Text(_) | Item::TextChunks(_) => CborType::TextString,
            Item::Array(_) => CborType::Array,
            Item::Map(_) => CborType::Map,
            Item::Tagged(_)
            | Item::DateTime(_)
            | Item::EpochTime(_)
            | Item::EncodedCbor(_)
            | Item::FullDate(_) => CborType::Tag,
            Item::False => CborType::False,
            Item::True => CborType::True,
            Item::Null => CborType::Null,
            Item::Undefined => CborType::Undefined,
            Item::Simple(_) => CborType::Special,
            Item::Half(_) => CborType::Half,
            Item::Single(_) => CborType::Single,
            Item::Double(_) => CborType::Double,
            Item::Raw(_) => CborType::Any,
        }
    }

    /// Name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Item::ByteChunks(_) => "indefinite bstr",
            Item::TextChunks(_) => "indefinite tstr",
            Item::DateTime(_) => "tdate",
            Item::EpochTime(_) => "time",
            Item::EncodedCbor(_) => "encoded-cbor",
            Item::FullDate(_) => "full-date",
            Item::Simple(_) => "simple",
            Item::Raw(_) => "raw",
            _ => self.cbor_type().name(),
        }
    }

    pub fn major_type(&self) -> u8 {
        match self {
            Item::Raw(b) => b.first().map_or(7, |b| b >> 5),
            _ => self.cbor_type().major_type().unwrap_or(7),
        }
    }

    /// The additional-info the encoder will emit in the initial byte
    pub fn additional_info(&self) -> u8 {
        match self {
            Item::Unsigned(v) | Item::Negative(v) => encode::minor_for(*v),
            Item::Bytes(b) => encode::minor_for(b.len() as u64),
            Item::Text(s) => encode::minor_for(s.len() as u64),
            Item::ByteChunks(_) | Item::TextChunks(_) => 31,
            Item::Array(a) if a.indefinite => 31,
            Item::Array(a) => encode::minor_for(a.len() as u64),
            Item::Map(m) if m.indefinite => 31,
            Item::Map(m) => encode::minor_for(m.len() as u64),
            Item::Tagged(t) => encode::minor_for(t.tag),
            Item::DateTime(_) => encode::minor_for(tags::DATE_TIME),
            Item::EpochTime(_) => encode::minor_for(tags::EPOCH_TIME),
            Item::EncodedCbor(_) => encode::minor_for(tags::ENCODED_CBOR),
            Item::FullDate(_) => encode::minor_for(tags::FULL_DATE),
            Item::False => 20,
            Item::True => 21,
            Item::Null => 22,
            Item::Undefined => 23,
            Item::Simple(v) => encode::minor_for(v.value() as u64),
            Item::Half(_) => 25,
            Item::Single(_) => 26,
            Item::Double(_) => 27,
            Item::Raw(b) => b.first().map_or(31, |b| b & 0x1F),
        }
    }

    /// The tag number of any tagged shape
    pub fn tag_number(&self) -> Option<u64> {
        match self {
            Item::Tagged(t) => Some(t.tag),
            Item::DateTime(_) => Some(tags::DATE_TIME),
            Item::EpochTime(_) => Some(tags::EPOCH_TIME),
            Item::EncodedCbor(_) => Some(tags::ENCODED_CBOR),
            Item::FullDate(_) => Some(tags::FULL_DATE),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Item::Null)
    }

    pub(crate) fn is_compound(&self) -> bool {
        match self {
            Item::Array(_) | Item::Map(_) => true,
            Item::Tagged(t) => t.item.is_compound(),
            Item::EpochTime(i) => i.is_compound(),
            _ => false,
        }
    }

    /// Empty strings and containers, used by the `required` builder calls
    pub(crate) fn is_blank(&self) -> bool {
        match self {
            Item::Bytes(b) | Item::EncodedCbor(b) | Item::Raw(b) => b.is_empty(),
            Item::ByteChunks(c) => c.iter().all(|c| c.is_empty()),
            Item::Text(s) => s.is_empty(),
            Item::TextChunks(c) => c.iter().all(|c| c.is_empty()),
            Item::Array(a) => a.is_empty(),
            Item::Map(m) => m.is_empty(),
            _ => false,
        }
    }

    fn incorrect(&self, expected: &'static str) -> Error {
        Error::IncorrectType {
            expected,
            found: self.type_name(),
        }
    }

    pub fn as_integer(&self) -> Result<i128> {
        match self {
            Item::Unsigned(v) => Ok(*v as i128),
            Item::Negative(m) => Ok(-1 - *m as i128),
            _ => Err(self.incorrect("int")),
        }
    }

    pub fn as_u64(&self) -> Result<u64> {
        self.as_integer()?
            .try_into()
            .map_err(|_| Error::OutOfRange)
    }

    pub fn as_i64(&self) -> Result<i64> {
        self.as_integer()?
            .try_into()
            .map_err(|_| Error::OutOfRange)
    }

    pub fn as_u32(&self) -> Result<u32> {
        self.as_integer()?
            .try_into()
            .map_err(|_| Error::OutOfRange)
    }

    pub fn as_i32(&self) -> Result<i32> {
        self.as_integer()?
            .try_into()
            .map_err(|_| Error::OutOfRange)
    }

    pub fn as_float(&self) -> Result<f64> {
        match self {
            Item::Half(f) => Ok(f.to_f64()),
            Item::Single(f) => Ok(*f as f64),
            Item::Double(f) => Ok(*f),
            _ => Err(self.incorrect("float")),
        }
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Item::True => Ok(true),
            Item::False => Ok(false),
            _ => Err(self.incorrect("bool")),
        }
    }

    /// Text string content, with indefinite-length chunks joined
    pub fn as_text(&self) -> Result<Cow<'_, str>> {
        match self {
            Item::Text(s) => Ok(Cow::Borrowed(s)),
            Item::TextChunks(c) => Ok(Cow::Owned(c.concat())),
            _ => Err(self.incorrect("tstr")),
        }
    }

    /// Byte string content, with indefinite-length chunks joined
    pub fn as_bytes(&self) -> Result<Cow<'_, [u8]>> {
        match self {
            Item::Bytes(b) => Ok(Cow::Borrowed(b)),
            Item::ByteChunks(c) => Ok(Cow::Owned(c.concat())),
            _ => Err(self.incorrect("bstr")),
        }
    }

    pub fn as_array(&self) -> Result<&Array> {
        match self {
            Item::Array(a) => Ok(a),
            _ => Err(self.incorrect("array")),
        }
    }

    pub fn as_map(&self) -> Result<&Map> {
        match self {
            Item::Map(m) => Ok(m),
            _ => Err(self.incorrect("map")),
        }
    }

    pub fn as_tagged(&self) -> Result<&Tagged> {
        match self {
            Item::Tagged(t) => Ok(t),
            _ => Err(self.incorrect("tag")),
        }
    }

    pub fn as_date_time(&self) -> Result<&str> {
        match self {
            Item::DateTime(s) => Ok(s),
            _ => Err(self.incorrect("tdate")),
        }
    }

    pub fn as_full_date(&self) -> Result<&str> {
        match self {
            Item::FullDate(s) => Ok(s),
            _ => Err(self.incorrect("full-date")),
        }
    }

    pub fn as_epoch_time(&self) -> Result<&Item> {
        match self {
            Item::EpochTime(i) => Ok(i),
            _ => Err(self.incorrect("time")),
        }
    }

    /// The raw tag 24 payload, still encoded
    pub fn as_encoded_cbor(&self) -> Result<&[u8]> {
        match self {
            Item::EncodedCbor(b) => Ok(b),
            _ => Err(self.incorrect("encoded-cbor")),
        }
    }

    /// Decode the tag 24 payload
    pub fn as_tagged_embedded_cbor(&self) -> Result<Item> {
        decode::decode(self.as_encoded_cbor()?)
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Item::Unsigned(a), Item::Unsigned(b)) | (Item::Negative(a), Item::Negative(b)) => {
                a == b
            }
            (Item::Bytes(a), Item::Bytes(b))
            | (Item::EncodedCbor(a), Item::EncodedCbor(b))
            | (Item::Raw(a), Item::Raw(b)) => a == b,
            (Item::ByteChunks(a), Item::ByteChunks(b)) => a == b,
            (Item::Text(a), Item::Text(b))
            | (Item::DateTime(a), Item::DateTime(b))
            | (Item::FullDate(a), Item::FullDate(b)) => a == b,
            (Item::TextChunks(a), Item::TextChunks(b)) => a == b,
            (Item::Array(a), Item::Array(b)) => a == b,
            (Item::Map(a), Item::Map(b)) => a == b,
            (Item::Tagged(a), Item::Tagged(b)) => a == b,
            (Item::EpochTime(a), Item::EpochTime(b)) => a == b,
            (Item::False, Item::False)
            | (Item::True, Item::True)
            | (Item::Null, Item::Null)
            | (Item::Undefined, Item::Undefined) => true,
            (Item::Simple(a), Item::Simple(b)) => a == b,
            // Floats compare by bit pattern so NaN payloads survive a round trip
            (Item::Half(a), Item::Half(b)) => a.to_bits() == b.to_bits(),
            (Item::Single(a), Item::Single(b)) => a.to_bits() == b.to_bits(),
            (Item::Double(a), Item::Double(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl Eq for Item {}

impl Hash for Item {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Item::Unsigned(v) | Item::Negative(v) => v.hash(state),
            Item::Bytes(b) | Item::EncodedCbor(b) | Item::Raw(b) => b.hash(state),
            Item::ByteChunks(c) => c.hash(state),
            Item::Text(s) | Item::DateTime(s) | Item::FullDate(s) => s.hash(state),
            Item::TextChunks(c) => c.hash(state),
            Item::Array(a) => a.hash(state),
            Item::Map(m) => m.hash(state),
            Item::Tagged(t) => t.hash(state),
            Item::EpochTime(i) => i.hash(state),
            Item::False | Item::True | Item::Null | Item::Undefined => {}
            Item::Simple(v) => v.hash(state),
            Item::Half(f) => f.to_bits().hash(state),
            Item::Single(f) => f.to_bits().hash(state),
            Item::Double(f) => f.to_bits().hash(state),
        }
    }
}

macro_rules! impl_uint_to_item {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Item {
                fn from(value: $ty) -> Self {
                    Item::Unsigned(value as u64)
                }
            }
        )*
    };
}

impl_uint_to_item!(u8, u16, u32, u64, usize);

macro_rules! impl_int_to_item {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Item {
                fn from(value: $ty) -> Self {
                    let value = value as i64;
                    if value >= 0 {
                        Item::Unsigned(value as u64)
                    } else {
                        Item::Negative((-1 - value) as u64)
                    }
                }
            }
        )*
    };
}

impl_int_to_item!(i8, i16, i32, i64, isize);

impl From<half::f16> for Item {
    fn from(value: half::f16) -> Self {
        Item::Half(value)
    }
}

impl From<f32> for Item {
    fn from(value: f32) -> Self {
        Item::Single(value)
    }
}

impl From<f64> for Item {
    fn from(value: f64) -> Self {
        Item::Double(value)
    }
}

impl From<bool> for Item {
    fn from(value: bool) -> Self {
        if value { Item::True } else { Item::False }
    }
}

impl From<&str> for Item {
    fn from(value: &str) -> Self {
        Item::Text(value.to_owned())
    }
}

impl From<String> for Item {
    fn from(value: String) -> Self {
        Item::Text(value)
    }
}

impl From<&[u8]> for Item {
    fn from(value: &[u8]) -> Self {
        Item::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for Item {
    fn from(value: Vec<u8>) -> Self {
        Item::Bytes(value)
    }
}

impl<const N: usize> From<[u8; N]> for Item {
    fn from(value: [u8; N]) -> Self {
        Item::Bytes(value.to_vec())
    }
}

impl From<Array> for Item {
    fn from(value: Array) -> Self {
        Item::Array(value)
    }
}

impl From<Map> for Item {
    fn from(value: Map) -> Self {
        Item::Map(value)
    }
}

impl<T> From<Option<T>> for Item
where
    T: Into<Item>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Item::Null, Into::into)
    }
}
