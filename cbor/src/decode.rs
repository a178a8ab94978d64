use super::*;
use tracing::trace;

/// Default bound on container and tag nesting
pub const MAX_DEPTH: usize = 256;

fn read_array<const N: usize>(data: &[u8], offset: usize) -> Result<[u8; N]> {
    offset
        .checked_add(N)
        .and_then(|end| data.get(offset..end))
        .and_then(|s| s.try_into().ok())
        .ok_or(Error::NotEnoughData(offset))
}

/// Decode the argument of the initial byte at `offset`, returning it with the offset of the
/// next byte
fn parse_uint_minor(minor: u8, data: &[u8], offset: usize) -> Result<(u64, usize)> {
    let start = offset + 1;
    match minor {
        0..=23 => Ok((minor as u64, start)),
        24 => read_array::<1>(data, start).map(|b| (b[0] as u64, start + 1)),
        25 => read_array::<2>(data, start).map(|b| (u16::from_be_bytes(b) as u64, start + 2)),
        26 => read_array::<4>(data, start).map(|b| (u32::from_be_bytes(b) as u64, start + 4)),
        27 => read_array::<8>(data, start).map(|b| (u64::from_be_bytes(b), start + 8)),
        // Indefinite length, the caller loops to the BREAK
        31 => Ok((0, start)),
        _ => Err(Error::InvalidMinorValue { info: minor, offset }),
    }
}

/// Inverse of [`encode::encode_length`]: returns `(length, next_offset)`.
///
/// An additional-info of 31 yields `(0, offset + 1)`, meaning the item is
/// indefinite-length and terminated by a BREAK byte.
pub fn decode_length(data: &[u8], offset: usize) -> Result<(u64, usize)> {
    let initial = *data.get(offset).ok_or(Error::NotEnoughData(offset))?;
    parse_uint_minor(initial & 0x1F, data, offset)
}

fn parse_data_minor(minor: u8, data: &[u8], offset: usize) -> Result<(&[u8], usize)> {
    let (len, start) = parse_uint_minor(minor, data, offset)?;
    let end = usize::try_from(len)
        .ok()
        .and_then(|len| start.checked_add(len))
        .filter(|end| *end <= data.len())
        .ok_or(Error::NotEnoughData(start))?;
    Ok((&data[start..end], end))
}

fn parse_text(b: &[u8], offset: usize) -> Result<String> {
    core::str::from_utf8(b)
        .map(ToString::to_string)
        .map_err(|_| Error::InvalidUtf8 { offset })
}

/// Chunks of an indefinite-length string, `offset` is just past the initial byte
fn parse_data_chunked(major: u8, data: &[u8], mut offset: usize) -> Result<(Vec<&[u8]>, usize)> {
    let mut chunks = Vec::new();
    loop {
        let initial = *data.get(offset).ok_or(Error::NotEnoughData(offset))?;
        if initial == 0xFF {
            break Ok((chunks, offset + 1));
        }

        let minor = initial & 0x1F;
        if initial >> 5 != major || minor == 31 {
            return Err(Error::InvalidChunk(offset));
        }

        let (chunk, next) = parse_data_minor(minor, data, offset)?;
        chunks.push(chunk);
        offset = next;
    }
}

fn check_depth(depth: usize) -> Result<usize> {
    depth.checked_sub(1).ok_or(Error::MaxRecursion)
}

fn parse_array(minor: u8, data: &[u8], offset: usize, depth: usize) -> Result<(Array, usize)> {
    let depth = check_depth(depth)?;
    let (count, mut offset) = parse_uint_minor(minor, data, offset)?;
    if minor == 31 {
        let mut items = Vec::new();
        loop {
            match data.get(offset) {
                None => return Err(Error::NotEnoughData(offset)),
                Some(0xFF) => break Ok((Array::new_indefinite(items), offset + 1)),
                Some(_) => {
                    let (item, next) = decode_item(data, offset, depth)?;
                    items.push(item);
                    offset = next;
                }
            }
        }
    } else {
        // Every item takes at least one byte, so never trust `count` for the allocation
        let mut items = Vec::with_capacity(remaining(data, offset, count));
        for _ in 0..count {
            let (item, next) = decode_item(data, offset, depth)?;
            items.push(item);
            offset = next;
        }
        Ok((Array::new(items), offset))
    }
}

fn parse_map(minor: u8, data: &[u8], offset: usize, depth: usize) -> Result<(Map, usize)> {
    let depth = check_depth(depth)?;
    let (count, mut offset) = parse_uint_minor(minor, data, offset)?;
    let mut map = Map::new();
    if minor == 31 {
        map.set_indefinite(true);
        loop {
            match data.get(offset) {
                None => return Err(Error::NotEnoughData(offset)),
                Some(0xFF) => break Ok((map, offset + 1)),
                Some(_) => {
                    let (key, next) = decode_item(data, offset, depth)?;
                    let (value, next) = decode_item(data, next, depth)?;
                    map.insert(key, value);
                    offset = next;
                }
            }
        }
    } else {
        for _ in 0..count {
            let (key, next) = decode_item(data, offset, depth)?;
            let (value, next) = decode_item(data, next, depth)?;
            map.insert(key, value);
            offset = next;
        }
        Ok((map, offset))
    }
}

fn remaining(data: &[u8], offset: usize, count: u64) -> usize {
    let left = data.len().saturating_sub(offset);
    usize::try_from(count).map_or(left, |count| count.min(left))
}

fn decode_item(data: &[u8], offset: usize, depth: usize) -> Result<(Item, usize)> {
    let initial = *data.get(offset).ok_or(Error::NotEnoughData(offset))?;
    let (item, next) = match (initial >> 5, initial & 0x1F) {
        (0 | 1 | 6, 31) => return Err(Error::InvalidMinorValue { info: 31, offset }),
        (0, minor) => {
            let (v, next) = parse_uint_minor(minor, data, offset)?;
            (Item::Unsigned(v), next)
        }
        (1, minor) => {
            let (v, next) = parse_uint_minor(minor, data, offset)?;
            (Item::Negative(v), next)
        }
        (2, 31) => {
            /* Indefinite length byte string */
            let (chunks, next) = parse_data_chunked(2, data, offset + 1)?;
            (
                Item::ByteChunks(chunks.into_iter().map(<[u8]>::to_vec).collect()),
                next,
            )
        }
        (2, minor) => {
            /* Known length byte string */
            let (b, next) = parse_data_minor(minor, data, offset)?;
            (Item::Bytes(b.to_vec()), next)
        }
        (3, 31) => {
            /* Indefinite length text string */
            let (chunks, next) = parse_data_chunked(3, data, offset + 1)?;
            let chunks = chunks
                .into_iter()
                .map(|b| parse_text(b, offset))
                .collect::<Result<Vec<_>>>()?;
            (Item::TextChunks(chunks), next)
        }
        (3, minor) => {
            /* Known length text string */
            let (b, next) = parse_data_minor(minor, data, offset)?;
            (Item::Text(parse_text(b, offset)?), next)
        }
        (4, minor) => {
            let (a, next) = parse_array(minor, data, offset, depth)?;
            (Item::Array(a), next)
        }
        (5, minor) => {
            let (m, next) = parse_map(minor, data, offset, depth)?;
            (Item::Map(m), next)
        }
        (6, minor) => {
            let (tag, next) = parse_uint_minor(minor, data, offset)?;
            let (inner, next) = decode_item(data, next, check_depth(depth)?)?;
            let item = Item::tagged(tag, inner);
            trace!("Tag {tag} at offset {offset} decoded as {}", item.type_name());
            (item, next)
        }
        (7, minor @ 0..=19) => (Item::simple(minor)?, offset + 1),
        (7, 20) => (Item::False, offset + 1),
        (7, 21) => (Item::True, offset + 1),
        (7, 22) => (Item::Null, offset + 1),
        (7, 23) => (Item::Undefined, offset + 1),
        (7, 24) => {
            let [v] = read_array::<1>(data, offset + 1)?;
            if v < 32 {
                return Err(Error::InvalidSimpleValue(v));
            }
            (Item::simple(v)?, offset + 2)
        }
        (7, 25) => {
            /* FP16 */
            let b = read_array::<2>(data, offset + 1)?;
            (Item::Half(half::f16::from_be_bytes(b)), offset + 3)
        }
        (7, 26) => {
            /* FP32 */
            let b = read_array::<4>(data, offset + 1)?;
            (Item::Single(f32::from_be_bytes(b)), offset + 5)
        }
        (7, 27) => {
            /* FP64 */
            let b = read_array::<8>(data, offset + 1)?;
            (Item::Double(f64::from_be_bytes(b)), offset + 9)
        }
        (7, 31) => return Err(Error::UnexpectedBreak(offset)),
        (7, minor) => return Err(Error::InvalidMinorValue { info: minor, offset }),
        (8.., _) => unreachable!(),
    };
    assert!(
        next > offset,
        "Decoder failed to advance past offset {offset}"
    );
    Ok((item, next))
}

/// Decode one item starting at `offset`, returning it with the offset just past it
pub fn decode_with_offset(data: &[u8], offset: usize) -> Result<(Item, usize)> {
    decode_item(data, offset, MAX_DEPTH)
}

/// As [`decode_with_offset`], with a caller-chosen nesting limit
pub fn decode_with_depth(data: &[u8], offset: usize, max_depth: usize) -> Result<(Item, usize)> {
    decode_item(data, offset, max_depth)
}

/// Decode exactly one item spanning the whole of `data`
pub fn decode(data: &[u8]) -> Result<Item> {
    let (item, len) = decode_with_offset(data, 0)?;
    if len < data.len() {
        return Err(Error::AdditionalData(data.len() - len));
    }
    Ok(item)
}

/// Decode an RFC 8742 CBOR sequence: zero or more items back to back
pub fn decode_sequence(data: &[u8]) -> Result<Vec<Item>> {
    let mut items = Vec::new();
    let mut offset = 0;
    while offset < data.len() {
        let (item, next) = decode_with_offset(data, offset)?;
        items.push(item);
        offset = next;
    }
    trace!("Decoded sequence of {} items", items.len());
    Ok(items)
}
