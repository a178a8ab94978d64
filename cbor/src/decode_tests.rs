use super::decode::*;
use super::*;
use hex_literal::hex;

// RFC 8949, Appendix A, all in preferred serialization
const RFC_VECTORS: &[&[u8]] = &[
    &hex!("00"),
    &hex!("01"),
    &hex!("0a"),
    &hex!("17"),
    &hex!("1818"),
    &hex!("1819"),
    &hex!("1864"),
    &hex!("1903e8"),
    &hex!("1a000f4240"),
    &hex!("1b000000e8d4a51000"),
    &hex!("1bffffffffffffffff"),
    &hex!("3bffffffffffffffff"),
    &hex!("20"),
    &hex!("29"),
    &hex!("3863"),
    &hex!("3903e7"),
    &hex!("f90000"),
    &hex!("f98000"),
    &hex!("f93c00"),
    &hex!("fb3ff199999999999a"),
    &hex!("f93e00"),
    &hex!("f97bff"),
    &hex!("fa47c35000"),
    &hex!("fa7f7fffff"),
    &hex!("fb7e37e43c8800759c"),
    &hex!("f90001"),
    &hex!("f90400"),
    &hex!("f9c400"),
    &hex!("fbc010666666666666"),
    &hex!("f97c00"),
    &hex!("f97e00"),
    &hex!("f9fc00"),
    &hex!("fa7f800000"),
    &hex!("fa7fc00000"),
    &hex!("faff800000"),
    &hex!("fb7ff0000000000000"),
    &hex!("fb7ff8000000000000"),
    &hex!("fbfff0000000000000"),
    &hex!("f4"),
    &hex!("f5"),
    &hex!("f6"),
    &hex!("f7"),
    &hex!("f0"),
    &hex!("f8ff"),
    &hex!("c074323031332d30332d32315432303a30343a30305a"),
    &hex!("c11a514b67b0"),
    &hex!("c1fb41d452d9ec200000"),
    &hex!("d74401020304"),
    &hex!("d818456449455446"),
    &hex!("d82076687474703a2f2f7777772e6578616d706c652e636f6d"),
    &hex!("40"),
    &hex!("4401020304"),
    &hex!("60"),
    &hex!("6161"),
    &hex!("6449455446"),
    &hex!("62225c"),
    &hex!("62c3bc"),
    &hex!("63e6b0b4"),
    &hex!("64f0908591"),
    &hex!("80"),
    &hex!("83010203"),
    &hex!("8301820203820405"),
    &hex!("98190102030405060708090a0b0c0d0e0f101112131415161718181819"),
    &hex!("a0"),
    &hex!("a201020304"),
    &hex!("a26161016162820203"),
    &hex!("826161a161626163"),
    &hex!("a56161614161626142616361436164614461656145"),
    &hex!("5f42010243030405ff"),
    &hex!("7f657374726561646d696e67ff"),
    &hex!("9fff"),
    &hex!("9f018202039f0405ffff"),
    &hex!("9f01820203820405ff"),
    &hex!("83018202039f0405ff"),
    &hex!("83019f0203ff820405"),
    &hex!("9f0102030405060708090a0b0c0d0e0f101112131415161718181819ff"),
    &hex!("bf61610161629f0203ffff"),
    &hex!("826161bf61626163ff"),
    &hex!("bf6346756ef563416d7421ff"),
];

#[test]
fn rfc_tests() {
    assert_eq!(decode(&hex!("00")).unwrap(), Item::Unsigned(0));
    assert_eq!(decode(&hex!("17")).unwrap(), Item::Unsigned(23));
    assert_eq!(decode(&hex!("1818")).unwrap(), Item::Unsigned(24));
    assert_eq!(decode(&hex!("1903e8")).unwrap(), Item::Unsigned(1000));
    assert_eq!(
        decode(&hex!("1bffffffffffffffff")).unwrap(),
        Item::Unsigned(u64::MAX)
    );
    assert_eq!(
        decode(&hex!("3bffffffffffffffff")).unwrap().as_integer(),
        Ok(-18446744073709551616)
    );
    assert_eq!(decode(&hex!("20")).unwrap().as_i64(), Ok(-1));
    assert_eq!(decode(&hex!("3903e7")).unwrap().as_i32(), Ok(-1000));

    assert_eq!(
        decode(&hex!("f98000")).unwrap(),
        Item::Half(half::f16::NEG_ZERO)
    );
    assert_eq!(decode(&hex!("f93e00")).unwrap().as_float(), Ok(1.5));
    assert_eq!(decode(&hex!("fa47c35000")).unwrap(), Item::Single(100000.0));
    assert_eq!(decode(&hex!("fb3ff199999999999a")).unwrap(), Item::Double(1.1));
    assert_eq!(
        decode(&hex!("f90001")).unwrap().as_float(),
        Ok(5.960464477539063e-8)
    );
    assert!(decode(&hex!("f97e00")).unwrap().as_float().unwrap().is_nan());
    assert_eq!(
        decode(&hex!("fbfff0000000000000")).unwrap(),
        Item::Double(f64::NEG_INFINITY)
    );

    assert_eq!(decode(&hex!("f4")).unwrap(), Item::False);
    assert_eq!(decode(&hex!("f5")).unwrap().as_bool(), Ok(true));
    assert!(decode(&hex!("f6")).unwrap().is_null());
    assert_eq!(decode(&hex!("f7")).unwrap(), Item::Undefined);
    assert_eq!(decode(&hex!("f0")).unwrap(), Item::simple(16).unwrap());
    assert_eq!(decode(&hex!("f8ff")).unwrap(), Item::simple(255).unwrap());

    assert_eq!(
        decode(&hex!("c074323031332d30332d32315432303a30343a30305a"))
            .unwrap()
            .as_date_time(),
        Ok("2013-03-21T20:04:00Z")
    );
    assert_eq!(
        decode(&hex!("c11a514b67b0")).unwrap().as_epoch_time(),
        Ok(&Item::Unsigned(1363896240))
    );
    assert_eq!(
        decode(&hex!("c1fb41d452d9ec200000")).unwrap().as_epoch_time(),
        Ok(&Item::Double(1363896240.5))
    );
    let item = decode(&hex!("d74401020304")).unwrap();
    let tagged = item.as_tagged().unwrap();
    assert_eq!(tagged.tag(), 23);
    assert_eq!(tagged.item(), &Item::Bytes(hex!("01020304").to_vec()));
    assert_eq!(
        decode(&hex!("d818456449455446"))
            .unwrap()
            .as_tagged_embedded_cbor(),
        Ok(Item::from("IETF"))
    );
    assert_eq!(
        decode(&hex!("d82076687474703a2f2f7777772e6578616d706c652e636f6d"))
            .unwrap()
            .tag_number(),
        Some(32)
    );

    assert_eq!(decode(&hex!("40")).unwrap(), Item::Bytes(vec![]));
    assert_eq!(decode(&hex!("60")).unwrap(), Item::from(""));
    assert_eq!(decode(&hex!("62225c")).unwrap().as_text().unwrap(), "\"\\");
    assert_eq!(decode(&hex!("64f0908591")).unwrap().as_text().unwrap(), "\u{10151}");
    assert_eq!(
        decode(&hex!("5f42010243030405ff")).unwrap().as_bytes().unwrap(),
        &hex!("0102030405")[..]
    );
    assert_eq!(
        decode(&hex!("7f657374726561646d696e67ff")).unwrap().as_text().unwrap(),
        "streaming"
    );

    assert_eq!(
        decode(&hex!("8301820203820405")).unwrap(),
        Item::array([Item::from(1), Item::array([2, 3]), Item::array([4, 5])])
    );
    let item = decode(&hex!("98190102030405060708090a0b0c0d0e0f101112131415161718181819")).unwrap();
    assert_eq!(item.as_array().unwrap().len(), 25);

    let item = decode(&hex!("a56161614161626142616361436164614461656145")).unwrap();
    let map = item.as_map().unwrap();
    assert_eq!(
        map.keys().map(|k| k.as_text().unwrap().into_owned()).collect::<Vec<_>>(),
        ["a", "b", "c", "d", "e"]
    );
    assert_eq!(map.get_text("e").unwrap().as_text().unwrap(), "E");
    assert_eq!(
        decode(&hex!("a201020304")).unwrap().as_map().unwrap().get_int(3),
        Some(&Item::Unsigned(4))
    );

    let item = decode(&hex!("bf6346756ef563416d7421ff")).unwrap();
    let map = item.as_map().unwrap();
    assert!(map.is_indefinite());
    assert_eq!(map.get_text("Fun"), Some(&Item::True));
    assert_eq!(map.get_text("Amt").unwrap().as_i64(), Ok(-2));
}

#[test]
fn rfc_round_trip() {
    for data in RFC_VECTORS {
        let item = decode(data).unwrap_or_else(|e| panic!("{}: {e}", hex::encode(data)));
        assert_eq!(encode(&item), *data, "re-encoding {}", hex::encode(data));
    }
}

#[test]
fn item_round_trip() {
    let item = MapBuilder::new()
        .put(1, "one")
        .put(-2, half::f16::from_f32(-2.5))
        .put("bytes", hex!("deadbeef"))
        .put_tagged("tag", 1004, "2024-02-29")
        .put("embedded", Item::encoded_cbor(&Item::array([1, 2])))
        .put_array("list")
        .indefinite()
        .add(f32::MIN_POSITIVE)
        .add(f64::NAN)
        .add(Simple::new(99).unwrap())
        .add_map()
        .put(Item::Undefined, Item::Null)
        .end()
        .end()
        .put("chunks", Item::TextChunks(vec!["a".into(), "".into(), "bc".into()]))
        .build();

    let data = encode(&item);
    assert_eq!(decode(&data).unwrap(), item);
}

#[test]
fn containers() {
    let item = decode(&hex!("80")).unwrap();
    assert!(item.as_array().unwrap().is_empty());
    assert!(!item.as_array().unwrap().is_indefinite());

    let item = decode(&hex!("9fff")).unwrap();
    assert!(item.as_array().unwrap().is_empty());
    assert!(item.as_array().unwrap().is_indefinite());

    let item = decode(&hex!("9f0102ff")).unwrap();
    assert_eq!(item.as_array().unwrap().as_slice(), &[Item::Unsigned(1), Item::Unsigned(2)]);

    // Duplicate keys keep the first position and the last value
    let item = decode(&hex!("a3 616101 616202 616103")).unwrap();
    let map = item.as_map().unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map.keys().next(), Some(&Item::from("a")));
    assert_eq!(map.get_text("a"), Some(&Item::Unsigned(3)));

    // Only well-formed payloads of the recognised tags are specialised
    let item = decode(&hex!("c001")).unwrap();
    assert_eq!(item.as_tagged().map(Tagged::tag), Ok(0));
    assert!(item.as_date_time().is_err());
    assert!(decode(&hex!("d8186161")).unwrap().as_encoded_cbor().is_err());
    assert!(decode(&hex!("d903ec01")).unwrap().as_full_date().is_err());
}

#[test]
fn large_maps() {
    // Wide enough for a four-byte length argument
    const COUNT: u64 = 70_000;

    let mut data = encode_length(5, COUNT);
    for key in 0..COUNT {
        data.extend(encode(&Item::from(key)));
        data.extend(encode(&Item::from(COUNT - key)));
    }
    // A repeated key at the end updates the first entry in place
    data[1..5].copy_from_slice(&((COUNT + 1) as u32).to_be_bytes());
    data.extend(hex!("00 f5"));

    let item = decode(&data).unwrap();
    let map = item.as_map().unwrap();
    assert_eq!(map.len(), COUNT as usize);
    assert_eq!(map.keys().next(), Some(&Item::Unsigned(0)));
    assert_eq!(map.get_int(0), Some(&Item::True));
    assert_eq!(map.get_int(69_999), Some(&Item::Unsigned(1)));
    assert!(!map.contains_key(&Item::from(COUNT)));
}

#[test]
fn offsets_and_sequences() {
    assert_eq!(
        decode_with_offset(&hex!("0102"), 1),
        Ok((Item::Unsigned(2), 2))
    );
    assert_eq!(
        decode_with_offset(&hex!("820102f6"), 0),
        Ok((Item::array([1, 2]), 3))
    );

    assert_eq!(decode_sequence(&[]), Ok(vec![]));
    assert_eq!(
        decode_sequence(&hex!("01 820203 6161")),
        Ok(vec![Item::from(1), Item::array([2, 3]), Item::from("a")])
    );
    assert_eq!(decode_sequence(&hex!("01ff")), Err(Error::UnexpectedBreak(1)));
    assert_eq!(decode_sequence(&hex!("0118")), Err(Error::NotEnoughData(2)));

    assert_eq!(decode_length(&hex!("83"), 0), Ok((3, 1)));
    assert_eq!(decode_length(&hex!("00190100"), 1), Ok((256, 4)));
    assert_eq!(decode_length(&hex!("9f"), 0), Ok((0, 1)));
    assert_eq!(decode_length(&[], 0), Err(Error::NotEnoughData(0)));
    assert_eq!(
        decode_length(&hex!("1c"), 0),
        Err(Error::InvalidMinorValue { info: 28, offset: 0 })
    );
}

#[test]
fn truncation() {
    for data in RFC_VECTORS {
        for len in 0..data.len() {
            assert!(
                matches!(decode(&data[..len]), Err(Error::NotEnoughData(_))),
                "{} truncated to {len}",
                hex::encode(data)
            );
        }
    }
}

#[test]
fn malformed() {
    assert_eq!(decode(&[]), Err(Error::NotEnoughData(0)));
    assert_eq!(decode(&hex!("0102")), Err(Error::AdditionalData(1)));
    assert_eq!(decode(&hex!("80ffff")), Err(Error::AdditionalData(2)));

    for (data, info) in [
        (&hex!("1c"), 28),
        (&hex!("3d"), 29),
        (&hex!("5e"), 30),
        (&hex!("fc"), 28),
    ] {
        assert_eq!(
            decode(data),
            Err(Error::InvalidMinorValue { info, offset: 0 })
        );
    }
    for data in [hex!("1f"), hex!("3f"), hex!("df")] {
        assert_eq!(
            decode(&data),
            Err(Error::InvalidMinorValue { info: 31, offset: 0 })
        );
    }

    assert_eq!(decode(&hex!("ff")), Err(Error::UnexpectedBreak(0)));
    assert_eq!(decode(&hex!("8201ff")), Err(Error::UnexpectedBreak(2)));
    assert_eq!(decode(&hex!("a1ff")), Err(Error::UnexpectedBreak(1)));
    assert_eq!(decode(&hex!("bf01ff")), Err(Error::UnexpectedBreak(2)));

    assert_eq!(decode(&hex!("5f6161ff")), Err(Error::InvalidChunk(1)));
    assert_eq!(decode(&hex!("7f4161ff")), Err(Error::InvalidChunk(1)));
    assert_eq!(decode(&hex!("5f5fffff")), Err(Error::InvalidChunk(1)));
    assert_eq!(decode(&hex!("5f01ff")), Err(Error::InvalidChunk(1)));

    assert_eq!(decode(&hex!("62c328")), Err(Error::InvalidUtf8 { offset: 0 }));
    assert_eq!(decode(&hex!("8262c328")), Err(Error::InvalidUtf8 { offset: 1 }));

    assert_eq!(decode(&hex!("f818")), Err(Error::InvalidSimpleValue(24)));
    assert_eq!(decode(&hex!("f81f")), Err(Error::InvalidSimpleValue(31)));
    assert_eq!(decode(&hex!("f820")), Item::simple(32));
}

#[test]
fn huge_lengths() {
    // None of these may allocate what they claim
    assert_eq!(
        decode(&hex!("5bffffffffffffffff")),
        Err(Error::NotEnoughData(9))
    );
    assert_eq!(
        decode(&hex!("7b00000000ffffffff00")),
        Err(Error::NotEnoughData(9))
    );
    assert_eq!(
        decode(&hex!("9bffffffffffffffff")),
        Err(Error::NotEnoughData(9))
    );
    assert_eq!(decode(&hex!("bb00000000ffffffff")), Err(Error::NotEnoughData(9)));
}

#[test]
fn recursion_limit() {
    let nested = |depth: usize| {
        let mut data = vec![0x81; depth];
        data.push(0x00);
        data
    };

    assert!(decode(&nested(MAX_DEPTH)).is_ok());
    assert_eq!(decode(&nested(MAX_DEPTH + 1)), Err(Error::MaxRecursion));

    // Tags count towards the depth too
    let mut data = vec![0xc6; MAX_DEPTH + 1];
    data.push(0x00);
    assert_eq!(decode(&data), Err(Error::MaxRecursion));

    assert!(decode_with_depth(&hex!("818100"), 0, 2).is_ok());
    assert_eq!(
        decode_with_depth(&hex!("81818100"), 0, 2),
        Err(Error::MaxRecursion)
    );
    assert_eq!(
        decode_with_depth(&hex!("a1 00 a1 00 a1 00 00"), 0, 2),
        Err(Error::MaxRecursion)
    );
}

#[test]
fn arbitrary_input() {
    // Cheap deterministic generator, a stand-in for the fuzz corpus
    let mut state = 0x2545_f491_4f6c_dd1du64;
    let mut next = || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 33) as u8
    };

    for _ in 0..5000 {
        let len = next() as usize % 32;
        let data: Vec<u8> = (0..len).map(|_| next()).collect();
        if let Ok(items) = decode_sequence(&data) {
            // Whatever decodes must re-encode and decode to the same items
            let reencoded: Vec<u8> = items.iter().flat_map(|i| encode(i)).collect();
            assert_eq!(decode_sequence(&reencoded), Ok(items));
        }
    }
}

#[test]
fn error_messages() {
    assert_eq!(
        Error::NotEnoughData(3).to_string(),
        "Out of data at offset 3"
    );
    assert_eq!(
        Error::AdditionalData(2).to_string(),
        "2 bytes of additional data after top-level item"
    );
}
