use bson::{doc, Bson};
use bson2json::{Error, Transcoder};
use pretty_assertions::assert_eq;

fn encode(doc: &bson::Document) -> Vec<u8> {
    bson::to_vec(doc).unwrap()
}

fn transcode_doc(doc: &bson::Document) -> String {
    let json = Transcoder::new().transcode(&encode(doc), false).unwrap();
    String::from_utf8(json).unwrap()
}

fn transcode_bytes(bytes: &[u8], is_array: bool) -> Result<String, Error> {
    Transcoder::new()
        .transcode(bytes, is_array)
        .map(|json| String::from_utf8(json).unwrap())
}

#[test]
fn test_int_and_string() {
    // {a: 1, b: "hi"}, spelled out byte for byte.
    let bytes = b"\x15\x00\x00\x00\x10a\x00\x01\x00\x00\x00\x02b\x00\x03\x00\x00\x00hi\x00\x00";
    assert_eq!(transcode_bytes(bytes, false).unwrap(), r#"{"a":1,"b":"hi"}"#);
    assert_eq!(transcode_doc(&doc! { "a": 1, "b": "hi" }), r#"{"a":1,"b":"hi"}"#);
}

#[test]
fn test_booleans_and_null() {
    assert_eq!(
        transcode_doc(&doc! { "x": true, "y": false, "z": null }),
        r#"{"x":true,"y":false,"z":null}"#
    );
}

#[test]
fn test_nonstandard_boolean_byte_is_false() {
    let bytes = b"\x09\x00\x00\x00\x08a\x00\x02\x00";
    assert_eq!(transcode_bytes(bytes, false).unwrap(), r#"{"a":false}"#);
}

#[test]
fn test_datetime() {
    assert_eq!(
        transcode_doc(&doc! { "when": bson::DateTime::from_millis(1_575_271_655_028) }),
        r#"{"when":"2019-12-02T08:47:35.028Z"}"#
    );
    assert_eq!(
        transcode_doc(&doc! { "epoch": bson::DateTime::from_millis(0) }),
        r#"{"epoch":"1970-01-01T00:00:00.000Z"}"#
    );
}

#[test]
fn test_datetime_out_of_range() {
    let mut bytes = b"\x10\x00\x00\x00\x09a\x00".to_vec();
    bytes.extend_from_slice(&i64::MAX.to_le_bytes());
    bytes.push(0);
    assert_eq!(
        transcode_bytes(&bytes, false),
        Err(Error::DateOutOfRange { millis: i64::MAX })
    );
}

#[test]
fn test_object_id() {
    let id = bson::oid::ObjectId::parse_str("000102030405060708090a0b").unwrap();
    assert_eq!(
        transcode_doc(&doc! { "id": id }),
        r#"{"id":"000102030405060708090a0b"}"#
    );
}

#[test]
fn test_string_escapes() {
    let s = "\u{8}\t\n\u{c}\r\"\\\u{1} ~";
    assert_eq!(
        transcode_doc(&doc! { "s": s }),
        r#"{"s":"\b\t\n\f\r\"\\\u0001 ~"}"#
    );
}

#[test]
fn test_key_escapes() {
    assert_eq!(transcode_doc(&doc! { "a\"b": 1 }), r#"{"a\"b":1}"#);
    assert_eq!(transcode_doc(&doc! { "a\nb": 1 }), r#"{"a\nb":1}"#);
}

#[test]
fn test_forward_slash_and_del_unescaped() {
    assert_eq!(
        transcode_doc(&doc! { "s": "a/b\u{7f}c" }),
        "{\"s\":\"a/b\u{7f}c\"}"
    );
}

#[test]
fn test_undefined_in_array_is_omitted() {
    // {a: [1, undefined, 2]}
    let bytes = b"\x1e\x00\x00\x00\x04a\x00\x16\x00\x00\x00\x100\x00\x01\x00\x00\x00\x061\x00\x102\x00\x02\x00\x00\x00\x00\x00";
    assert_eq!(transcode_bytes(bytes, false).unwrap(), r#"{"a":[1,2]}"#);
}

#[test]
fn test_undefined_in_object_leaves_no_comma() {
    // {u: undefined, a: 1}
    let bytes = b"\x0f\x00\x00\x00\x06u\x00\x10a\x00\x01\x00\x00\x00\x00";
    assert_eq!(transcode_bytes(bytes, false).unwrap(), r#"{"a":1}"#);

    // {a: 1, u: undefined}
    let bytes = b"\x0f\x00\x00\x00\x10a\x00\x01\x00\x00\x00\x06u\x00\x00";
    assert_eq!(transcode_bytes(bytes, false).unwrap(), r#"{"a":1}"#);

    // {u: undefined}
    let bytes = b"\x08\x00\x00\x00\x06u\x00\x00";
    assert_eq!(transcode_bytes(bytes, false).unwrap(), "{}");
}

#[test]
fn test_long_full_precision() {
    assert_eq!(
        transcode_doc(&doc! { "v": 0x0FFF_FFFF_0FFF_FFFFi64 }),
        r#"{"v":1152921500580315135}"#
    );
    assert_eq!(
        transcode_doc(&doc! { "min": i64::MIN, "max": i64::MAX }),
        r#"{"min":-9223372036854775808,"max":9223372036854775807}"#
    );
}

#[test]
fn test_int32_extremes() {
    assert_eq!(
        transcode_doc(&doc! { "min": i32::MIN, "max": i32::MAX, "zero": 0 }),
        r#"{"min":-2147483648,"max":2147483647,"zero":0}"#
    );
}

#[test]
fn test_doubles() {
    assert_eq!(
        transcode_doc(&doc! { "a": 1.5, "b": -2.25, "c": 3.0 }),
        r#"{"a":1.5,"b":-2.25,"c":3}"#
    );
    assert_eq!(
        transcode_doc(&doc! { "nan": f64::NAN, "inf": f64::INFINITY }),
        r#"{"nan":null,"inf":null}"#
    );
}

#[test]
fn test_nested_documents_and_arrays() {
    let doc = doc! {
        "em1": { "arr1": [ { "k4": 1 }, { "k4": 2 } ] },
        "tail": "end",
    };
    assert_eq!(
        transcode_doc(&doc),
        r#"{"em1":{"arr1":[{"k4":1},{"k4":2}]},"tail":"end"}"#
    );
}

#[test]
fn test_empty_containers() {
    assert_eq!(transcode_bytes(b"\x05\x00\x00\x00\x00", false).unwrap(), "{}");
    assert_eq!(transcode_bytes(b"\x05\x00\x00\x00\x00", true).unwrap(), "[]");
    assert_eq!(transcode_doc(&doc! { "a": {}, "b": [] }), r#"{"a":{},"b":[]}"#);
}

#[test]
fn test_top_level_array() {
    // Arrays share document framing with keys "0", "1", ...
    let bytes = encode(&doc! { "0": 1, "1": "x", "2": [true] });
    assert_eq!(transcode_bytes(&bytes, true).unwrap(), r#"[1,"x",[true]]"#);
}

#[test]
fn test_array_with_more_than_ten_elements() {
    // Two-digit array keys must be skipped by their computed width.
    let items: Vec<Bson> = (0..25).map(Bson::Int32).collect();
    let doc = doc! { "a": items };
    let expected = format!(
        r#"{{"a":[{}]}}"#,
        (0..25).map(|i| i.to_string()).collect::<Vec<_>>().join(",")
    );
    assert_eq!(transcode_doc(&doc), expected);
}

#[test]
fn test_semantic_equivalence_for_mixed_document() {
    let doc = doc! {
        "string": "hello\nworld",
        "int": 42,
        "long": 9_007_199_254_740_993i64,
        "double": 0.1,
        "bool": true,
        "null": null,
        "nested": { "list": [1, 2.5, "three"] },
    };
    let json = transcode_doc(&doc);
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["string"], serde_json::json!("hello\nworld"));
    assert_eq!(parsed["int"], serde_json::json!(42));
    assert_eq!(parsed["long"].as_i64(), Some(9_007_199_254_740_993));
    assert_eq!(parsed["double"].as_f64(), Some(0.1));
    assert_eq!(parsed["bool"], serde_json::json!(true));
    assert_eq!(parsed["null"], serde_json::Value::Null);
    assert_eq!(parsed["nested"]["list"][2], serde_json::json!("three"));
}

#[test]
fn test_input_too_short() {
    for len in 0..5 {
        let bytes = vec![0u8; len];
        assert_eq!(transcode_bytes(&bytes, false), Err(Error::InputTooShort));
    }
}

#[test]
fn test_bad_document_size() {
    // Header below the minimum.
    assert_eq!(
        transcode_bytes(b"\x04\x00\x00\x00\x00", false),
        Err(Error::BadDocumentSize { size: 4 })
    );
    // Header past the end of input.
    assert_eq!(
        transcode_bytes(b"\x20\x00\x00\x00\x00", false),
        Err(Error::BadDocumentSize { size: 32 })
    );
    // Negative header.
    assert_eq!(
        transcode_bytes(b"\xff\xff\xff\xff\x00", false),
        Err(Error::BadDocumentSize { size: -1 })
    );
}

#[test]
fn test_bad_string_length() {
    // Declared length of zero (it must count the trailing NUL).
    assert_eq!(
        transcode_bytes(b"\x0d\x00\x00\x00\x02a\x00\x00\x00\x00\x00hi", false),
        Err(Error::BadStringLength { len: 0 })
    );
    // Declared length past the end of input.
    assert_eq!(
        transcode_bytes(b"\x0d\x00\x00\x00\x02a\x00\x64\x00\x00\x00hi", false),
        Err(Error::BadStringLength { len: 100 })
    );
}

#[test]
fn test_truncated_values() {
    // Int cut off after two of four bytes.
    assert_eq!(
        transcode_bytes(b"\x09\x00\x00\x00\x10a\x00\x01\x00", false),
        Err(Error::TruncatedValue { context: "Int" })
    );
    // ObjectId cut off after four of twelve bytes.
    assert_eq!(
        transcode_bytes(b"\x0b\x00\x00\x00\x07a\x00\xaa\xbb\xcc\xdd", false),
        Err(Error::TruncatedValue { context: "ObjectId" })
    );
    // Long cut off after one byte.
    assert_eq!(
        transcode_bytes(b"\x08\x00\x00\x00\x12a\x00\x01", false),
        Err(Error::TruncatedValue { context: "Long" })
    );
    // Boolean with no payload byte.
    assert_eq!(
        transcode_bytes(b"\x07\x00\x00\x00\x08a\x00", false),
        Err(Error::TruncatedValue { context: "Boolean" })
    );
}

#[test]
fn test_truncated_key() {
    assert_eq!(
        transcode_bytes(b"\x08\x00\x00\x00\x10abcd", false),
        Err(Error::TruncatedKey)
    );
}

#[test]
fn test_unsupported_types() {
    for tag in [0x05u8, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f, 0x11, 0x13, 0x7f, 0xff] {
        let bytes = [8, 0, 0, 0, tag, b'a', 0, 0];
        assert_eq!(
            transcode_bytes(&bytes, false),
            Err(Error::UnsupportedType { tag }),
            "tag {tag:#04x}"
        );
    }
}

#[test]
fn test_unknown_types() {
    for tag in [0x14u8, 0x20, 0x80] {
        let bytes = [8, 0, 0, 0, tag, b'a', 0, 0];
        assert_eq!(
            transcode_bytes(&bytes, false),
            Err(Error::UnknownType { tag }),
            "tag {tag:#04x}"
        );
    }
}

#[test]
fn test_binary_via_encoder_is_rejected() {
    let doc = doc! {
        "b": bson::Binary { subtype: bson::spec::BinarySubtype::Generic, bytes: vec![1, 2, 3] },
    };
    assert_eq!(
        transcode_bytes(&encode(&doc), false),
        Err(Error::UnsupportedType { tag: 0x05 })
    );
}

fn nested_doc(levels: usize) -> Vec<u8> {
    let mut doc = vec![5, 0, 0, 0, 0];
    for _ in 0..levels {
        let len = (4 + 1 + 2 + doc.len() + 1) as i32;
        let mut outer = len.to_le_bytes().to_vec();
        outer.push(0x03);
        outer.extend_from_slice(b"a\x00");
        outer.extend_from_slice(&doc);
        outer.push(0);
        doc = outer;
    }
    doc
}

#[test]
fn test_deep_nesting_within_limit() {
    let json = transcode_bytes(&nested_doc(100), false).unwrap();
    assert!(json.starts_with(r#"{"a":{"a":"#));
    assert!(json.ends_with("}}"));
}

#[test]
fn test_deep_nesting_beyond_limit() {
    assert_eq!(
        transcode_bytes(&nested_doc(300), false),
        Err(Error::DepthLimitExceeded)
    );
}

#[test]
fn test_trailing_bytes_after_document_are_ignored() {
    let bytes = b"\x05\x00\x00\x00\x00garbage";
    assert_eq!(transcode_bytes(bytes, false).unwrap(), "{}");
}

#[test]
fn test_chunk_size_hint_does_not_change_output() {
    let doc = doc! { "s": "a string long enough to outgrow a tiny buffer", "n": 1 };
    let bytes = encode(&doc);
    let baseline = Transcoder::new().transcode(&bytes, false).unwrap();
    let tiny = Transcoder::new().chunk_size(1).transcode(&bytes, false).unwrap();
    assert_eq!(baseline, tiny);
}
