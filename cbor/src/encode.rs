use super::*;

pub trait ToCbor {
    fn to_cbor(&self, encoder: &mut Encoder);
}

#[derive(Default)]
pub struct Encoder {
    data: Vec<u8>,
}

impl Encoder {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }

    pub fn offset(&self) -> usize {
        self.data.len()
    }

    /// Initial byte plus the shortest big-endian argument for `val`
    pub fn emit_uint_minor(&mut self, major: u8, val: u64) {
        match minor_for(val) {
            24 => {
                self.data.push((major << 5) | 24u8);
                self.data.push(val as u8)
            }
            25 => {
                self.data.push((major << 5) | 25u8);
                self.data.extend((val as u16).to_be_bytes())
            }
            26 => {
                self.data.push((major << 5) | 26u8);
                self.data.extend((val as u32).to_be_bytes())
            }
            27 => {
                self.data.push((major << 5) | 27u8);
                self.data.extend(val.to_be_bytes())
            }
            minor => self.data.push((major << 5) | minor),
        }
    }

    pub fn emit_raw_slice(&mut self, data: &[u8]) {
        self.data.extend_from_slice(data)
    }

    pub fn emit<T>(&mut self, value: &T)
    where
        T: ToCbor + ?Sized,
    {
        value.to_cbor(self)
    }

    pub fn emit_tagged<T>(&mut self, tag: u64, value: &T)
    where
        T: ToCbor + ?Sized,
    {
        self.emit_uint_minor(6, tag);
        self.emit(value)
    }

    fn emit_bytes(&mut self, major: u8, b: &[u8]) {
        self.emit_uint_minor(major, b.len() as u64);
        self.data.extend_from_slice(b)
    }

    fn emit_chunks<I, T>(&mut self, major: u8, chunks: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.data.push((major << 5) | 31);
        for chunk in chunks {
            self.emit_bytes(major, chunk.as_ref());
        }
        self.data.push(0xFF)
    }

    fn emit_array(&mut self, array: &Array) {
        if array.is_indefinite() {
            self.data.push((4 << 5) | 31);
        } else {
            self.emit_uint_minor(4, array.len() as u64);
        }
        for item in array {
            self.emit(item);
        }
        if array.is_indefinite() {
            self.data.push(0xFF)
        }
    }

    fn emit_map(&mut self, map: &Map) {
        if map.is_indefinite() {
            self.data.push((5 << 5) | 31);
        } else {
            self.emit_uint_minor(5, map.len() as u64);
        }
        for (k, v) in map.iter() {
            self.emit(k);
            self.emit(v);
        }
        if map.is_indefinite() {
            self.data.push(0xFF)
        }
    }
}

/// The additional-info that the shortest encoding of `val` uses
pub fn minor_for(val: u64) -> u8 {
    if val < 24 {
        val as u8
    } else if val <= u8::MAX as u64 {
        24
    } else if val <= u16::MAX as u64 {
        25
    } else if val <= u32::MAX as u64 {
        26
    } else {
        27
    }
}

impl ToCbor for Item {
    fn to_cbor(&self, encoder: &mut Encoder) {
        match self {
            Item::Unsigned(v) => encoder.emit_uint_minor(0, *v),
            Item::Negative(m) => encoder.emit_uint_minor(1, *m),
            Item::Bytes(b) => encoder.emit_bytes(2, b),
            Item::ByteChunks(c) => encoder.emit_chunks(2, c),
            Item::Text(s) => encoder.emit_bytes(3, s.as_bytes()),
            Item::TextChunks(c) => encoder.emit_chunks(3, c),
            Item::Array(a) => encoder.emit_array(a),
            Item::Map(m) => encoder.emit_map(m),
            Item::Tagged(t) => encoder.emit_tagged(t.tag(), t.item()),
            Item::DateTime(s) => {
                encoder.emit_uint_minor(6, tags::DATE_TIME);
                encoder.emit_bytes(3, s.as_bytes())
            }
            Item::EpochTime(i) => encoder.emit_tagged(tags::EPOCH_TIME, i.as_ref()),
            Item::EncodedCbor(b) => {
                encoder.emit_uint_minor(6, tags::ENCODED_CBOR);
                encoder.emit_bytes(2, b)
            }
            Item::FullDate(s) => {
                encoder.emit_uint_minor(6, tags::FULL_DATE);
                encoder.emit_bytes(3, s.as_bytes())
            }
            Item::False => encoder.data.push((7 << 5) | 20),
            Item::True => encoder.data.push((7 << 5) | 21),
            Item::Null => encoder.data.push((7 << 5) | 22),
            Item::Undefined => encoder.data.push((7 << 5) | 23),
            Item::Simple(v) => encoder.emit_uint_minor(7, v.value() as u64),
            Item::Half(f) => {
                encoder.data.push((7 << 5) | 25);
                encoder.data.extend(f.to_be_bytes())
            }
            Item::Single(f) => {
                encoder.data.push((7 << 5) | 26);
                encoder.data.extend(f.to_be_bytes())
            }
            Item::Double(f) => {
                encoder.data.push((7 << 5) | 27);
                encoder.data.extend(f.to_be_bytes())
            }
            Item::Raw(b) => encoder.emit_raw_slice(b),
        }
    }
}

impl ToCbor for Array {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.emit_array(self)
    }
}

impl ToCbor for Map {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.emit_map(self)
    }
}

impl<T> ToCbor for Option<T>
where
    T: ToCbor,
{
    fn to_cbor(&self, encoder: &mut Encoder) {
        match self {
            Some(value) => encoder.emit(value),
            None => encoder.data.push((7 << 5) | 22),
        }
    }
}

impl<T> ToCbor for &T
where
    T: ToCbor + ?Sized,
{
    fn to_cbor(&self, encoder: &mut Encoder) {
        (**self).to_cbor(encoder)
    }
}

/// The header bytes for `len` under `major`
pub fn encode_length(major: u8, len: u64) -> Vec<u8> {
    let mut e = Encoder::new();
    e.emit_uint_minor(major, len);
    e.build()
}

pub fn encode<T>(value: &T) -> Vec<u8>
where
    T: ToCbor + ?Sized,
{
    let mut e = Encoder::new();
    e.emit(value);
    e.build()
}

/// An absent item encodes as `null`
pub fn encode_option(item: Option<&Item>) -> Vec<u8> {
    encode(&item)
}
