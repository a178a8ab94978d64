/*!
Fluent construction of nested arrays and maps.

A child builder owns its parent, and `end()` hands the parent back with the
finished child written into the slot reserved for it when the child was
opened:

```
use mdoc_cbor::{ArrayBuilder, Item};

let item = ArrayBuilder::new()
    .add(1)
    .add_map()
    .put("a", true)
    .put_array("b")
    .add("x")
    .end()
    .end()
    .build();

assert_eq!(mdoc_cbor::encode(&item), b"\x82\x01\xa2\x61a\xf5\x61b\x81\x61x");
```
*/

use super::*;

/// Parent of a top-level builder
#[derive(Debug, Default)]
pub struct Root;

/// A builder that can receive a finished child
pub trait Nest {
    fn fill(&mut self, slot: usize, item: Item);
}

#[derive(Debug)]
pub struct ArrayBuilder<P = Root> {
    array: Array,
    parent: P,
    slot: usize,
}

#[derive(Debug)]
pub struct MapBuilder<P = Root> {
    map: Map,
    parent: P,
    slot: usize,
}

impl ArrayBuilder<Root> {
    pub fn new() -> Self {
        Self {
            array: Array::default(),
            parent: Root,
            slot: 0,
        }
    }

    pub fn build(self) -> Item {
        Item::Array(self.array)
    }

    pub fn encode(self) -> Vec<u8> {
        encode::encode(&self.build())
    }
}

impl Default for ArrayBuilder<Root> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Nest> ArrayBuilder<P> {
    /// Close this array and return to the builder that opened it
    pub fn end(self) -> P {
        let mut parent = self.parent;
        parent.fill(self.slot, Item::Array(self.array));
        parent
    }
}

impl<P> Nest for ArrayBuilder<P> {
    fn fill(&mut self, slot: usize, item: Item) {
        self.array.replace(slot, item)
    }
}

impl<P> ArrayBuilder<P> {
    /// Encode as an indefinite-length array
    pub fn indefinite(mut self) -> Self {
        self.array.set_indefinite(true);
        self
    }

    pub fn len(&self) -> usize {
        self.array.len()
    }

    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    pub fn add<V>(mut self, value: V) -> Self
    where
        V: Into<Item>,
    {
        self.array.push(value.into());
        self
    }

    /// Add a host value, converted by the `any` factory
    pub fn add_value<V>(self, value: V) -> Result<Self>
    where
        V: Into<Native>,
    {
        self.add_typed(CborType::Any, value)
    }

    /// Add a host value, converted to `cbor_type`
    pub fn add_typed<V>(self, cbor_type: CborType, value: V) -> Result<Self>
    where
        V: Into<Native>,
    {
        Ok(self.add(cbor_type.create(value.into())?))
    }

    pub fn add_tagged<V>(self, tag: u64, value: V) -> Self
    where
        V: Into<Item>,
    {
        self.add(Item::tagged(tag, value.into()))
    }

    /// Add already-encoded CBOR verbatim
    pub fn add_raw<B>(self, data: B) -> Self
    where
        B: Into<Vec<u8>>,
    {
        self.add(Item::Raw(data.into()))
    }

    /// Fails if `value` is absent or empty
    pub fn add_required<V>(self, value: Option<V>) -> Result<Self>
    where
        V: Into<Item>,
    {
        match value.map(Into::into) {
            None => Err(Error::MissingValue("array element")),
            Some(item) if item.is_blank() => Err(Error::MissingValue("non-empty array element")),
            Some(item) => Ok(self.add(item)),
        }
    }

    /// Skips an absent `value`
    pub fn add_optional<V>(self, value: Option<V>) -> Self
    where
        V: Into<Item>,
    {
        match value {
            Some(value) => self.add(value),
            None => self,
        }
    }

    pub fn add_array(mut self) -> ArrayBuilder<Self> {
        let slot = self.array.push(Item::Null);
        ArrayBuilder {
            array: Array::default(),
            parent: self,
            slot,
        }
    }

    pub fn add_map(mut self) -> MapBuilder<Self> {
        let slot = self.array.push(Item::Null);
        MapBuilder {
            map: Map::new(),
            parent: self,
            slot,
        }
    }
}

impl MapBuilder<Root> {
    pub fn new() -> Self {
        Self {
            map: Map::new(),
            parent: Root,
            slot: 0,
        }
    }

    pub fn build(self) -> Item {
        Item::Map(self.map)
    }

    pub fn encode(self) -> Vec<u8> {
        encode::encode(&self.build())
    }
}

impl Default for MapBuilder<Root> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Nest> MapBuilder<P> {
    /// Close this map and return to the builder that opened it
    pub fn end(self) -> P {
        let mut parent = self.parent;
        parent.fill(self.slot, Item::Map(self.map));
        parent
    }
}

impl<P> Nest for MapBuilder<P> {
    fn fill(&mut self, slot: usize, item: Item) {
        self.map.replace(slot, item)
    }
}

impl<P> MapBuilder<P> {
    /// Encode as an indefinite-length map
    pub fn indefinite(mut self) -> Self {
        self.map.set_indefinite(true);
        self
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Insert `value` under `key`, replacing any value already held for an equal key
    pub fn put<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<Item>,
        V: Into<Item>,
    {
        self.map.insert(key.into(), value.into());
        self
    }

    /// Put a host value, converted by the `any` factory
    pub fn put_value<K, V>(self, key: K, value: V) -> Result<Self>
    where
        K: Into<Item>,
        V: Into<Native>,
    {
        self.put_typed(key, CborType::Any, value)
    }

    /// Put a host value, converted to `cbor_type`
    pub fn put_typed<K, V>(self, key: K, cbor_type: CborType, value: V) -> Result<Self>
    where
        K: Into<Item>,
        V: Into<Native>,
    {
        Ok(self.put(key, cbor_type.create(value.into())?))
    }

    pub fn put_tagged<K, V>(self, key: K, tag: u64, value: V) -> Self
    where
        K: Into<Item>,
        V: Into<Item>,
    {
        self.put(key, Item::tagged(tag, value.into()))
    }

    /// Fails if `value` is absent
    pub fn put_required<K, V>(self, key: K, value: Option<V>) -> Result<Self>
    where
        K: Into<Item>,
        V: Into<Item>,
    {
        match value {
            Some(value) => Ok(self.put(key, value)),
            None => Err(Error::MissingValue("map value")),
        }
    }

    /// Skips an absent `value`
    pub fn put_optional<K, V>(self, key: K, value: Option<V>) -> Self
    where
        K: Into<Item>,
        V: Into<Item>,
    {
        match value {
            Some(value) => self.put(key, value),
            None => self,
        }
    }

    pub fn put_array<K>(mut self, key: K) -> ArrayBuilder<Self>
    where
        K: Into<Item>,
    {
        let slot = self.map.insert(key.into(), Item::Null);
        ArrayBuilder {
            array: Array::default(),
            parent: self,
            slot,
        }
    }

    pub fn put_map<K>(mut self, key: K) -> MapBuilder<Self>
    where
        K: Into<Item>,
    {
        let slot = self.map.insert(key.into(), Item::Null);
        MapBuilder {
            map: Map::new(),
            parent: self,
            slot,
        }
    }
}
