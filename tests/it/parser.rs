// Copyright 2023 Datafuse Labs.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use jsonspan::{parse_value, parse_value_utf16, JsonReader, ParseErrorCode, MAX_NESTING_DEPTH};
use proptest::prelude::*;
use serde_json::json;

fn test_parse_err(errors: &[(&str, &'static str)]) {
    for &(s, err) in errors {
        let res = parse_value(s.as_bytes());
        assert!(res.is_err(), "input: {}", s);
        assert_eq!(res.err().unwrap().to_string(), err, "input: {}", s);
    }
}

fn test_parse_ok(tests: Vec<(&str, serde_json::Value)>) {
    for (s, val) in tests {
        let value = parse_value(s.as_bytes()).unwrap();
        assert_eq!(serde_json::to_value(&value).unwrap(), val, "input: {}", s);

        let utf16: Vec<u16> = s.encode_utf16().collect();
        let value = parse_value_utf16(&utf16).unwrap();
        assert_eq!(serde_json::to_value(&value).unwrap(), val, "input: {}", s);
    }
}

#[test]
fn test_parse_null() {
    test_parse_err(&[
        ("n", "invalid symbol, pos 1"),
        ("nul", "invalid symbol, pos 3"),
        ("nulla", "trailing characters, pos 4"),
        ("  ", "EOF while parsing a value, pos 2"),
    ]);

    test_parse_ok(vec![("null", json!(null)), (" \r\n\tnull\n", json!(null))]);
}

#[test]
fn test_parse_boolean() {
    test_parse_err(&[
        ("t", "invalid symbol while reading bool, pos 1"),
        ("truz", "invalid symbol while reading bool, pos 3"),
        ("f", "invalid symbol while reading bool, pos 1"),
        ("faz", "invalid symbol while reading bool, pos 2"),
        ("truea", "trailing characters, pos 4"),
        ("falsea", "trailing characters, pos 5"),
    ]);

    test_parse_ok(vec![
        ("true", json!(true)),
        (" true ", json!(true)),
        ("false", json!(false)),
        (" false ", json!(false)),
    ]);
}

#[test]
fn test_parse_number() {
    test_parse_ok(vec![
        ("0", json!(0)),
        ("3", json!(3)),
        ("-2", json!(-2)),
        ("-1234", json!(-1234)),
        ("18446744073709551615", json!(u64::MAX)),
        ("-9223372036854775808", json!(i64::MIN)),
        ("3.0", json!(3.0)),
        ("3.1", json!(3.1)),
        ("-1.2", json!(-1.2)),
        ("0.4e5", json!(40000.0)),
        ("0.4E-5", json!(0.000004)),
        ("1e2", json!(100.0)),
        ("18446744073709551616", json!(18446744073709551616.0)),
        (" 0.5 ", json!(0.5)),
    ]);

    // numbers are kept raw, a bad literal only fails on conversion
    let value = parse_value(b"[1.2.3]").unwrap();
    let number = value.as_array().unwrap()[0].as_number().unwrap();
    assert_eq!(
        number.as_f64().unwrap_err().code(),
        ParseErrorCode::InvalidNumberFormat
    );
    assert_eq!(number.as_decimal().unwrap_err().to_string(), "invalid number format, pos 4");
}

#[test]
fn test_parse_string() {
    test_parse_err(&[
        ("\"", "EOF while parsing a value, pos 1"),
        ("\"lol", "EOF while parsing a value, pos 4"),
        ("\"lol\"a", "trailing characters, pos 5"),
    ]);

    test_parse_ok(vec![
        ("\"abc\"", json!("abc")),
        ("\"\"", json!("")),
        (" \"foo\" ", json!("foo")),
        ("\"\\\"\"", json!("\"")),
        ("\"\\\\\"", json!("\\")),
        ("\"\\/\"", json!("/")),
        ("\"\\b\\f\\n\\r\\t\"", json!("\x08\x0c\n\r\t")),
        ("\"\\u000b\\u000B\"", json!("\x0B\x0B")),
        ("\"\u{3A3}\"", json!("\u{3A3}")),
        (r#""\u12ab\uAB12""#, json!("\u{12ab}\u{AB12}")),
        (r#""\uD83C\uDF95""#, json!("\u{1F395}")),
        (r#""\u5b57""#, json!("字")),
        (r#""\u0000""#, json!("\0")),
        (r#""\uDEAD""#, json!("\u{FFFD}")),
        (r#""\uDC00\uD800""#, json!("\u{FFFD}\u{FFFD}")),
        (r#""\uD803\uDC0B""#, json!("𐰋")),
        (r#""\\uD83D""#, json!("\\uD83D")),
        (r#""\"ab\"\uD803\uDC0B测试""#, json!("\"ab\"𐰋测试")),
        (r#""Hello \"World""#, json!("Hello \"World")),
    ]);

    let text = r#""Hello \"World""#;
    let value = parse_value(text.as_bytes()).unwrap();
    let expected: String = serde_json::from_str(text).unwrap();
    assert_eq!(value.as_str().unwrap(), expected);
}

#[test]
fn test_parse_array() {
    test_parse_err(&[
        ("[", "EOF while parsing a value, pos 1"),
        ("[ ", "EOF while parsing a value, pos 2"),
        ("[1", "EOF while parsing a value, pos 2"),
        ("[1,", "EOF while parsing a value, pos 3"),
        ("[1,]", "invalid symbol, pos 3"),
        ("[1 2]", "expected separator, pos 3"),
        ("[]a", "trailing characters, pos 2"),
    ]);

    test_parse_ok(vec![
        ("[]", json!([])),
        ("[ ]", json!([])),
        ("[null]", json!([null])),
        (" [ null ] ", json!([null])),
        ("[true, false]", json!([true, false])),
        ("[3,1]", json!([3, 1])),
        ("[[], [[]]]", json!([[], [[]]])),
        ("[\"a\", {\"b\": [1.5]}]", json!(["a", {"b": [1.5]}])),
    ]);
}

#[test]
fn test_parse_object() {
    test_parse_err(&[
        ("{", "EOF while parsing a value, pos 1"),
        ("{ ", "EOF while parsing a value, pos 2"),
        ("{1", "expected double quote, pos 1"),
        ("{ \"a\"", "EOF while parsing a value, pos 5"),
        ("{\"a\"", "EOF while parsing a value, pos 4"),
        ("{\"a\" ", "EOF while parsing a value, pos 5"),
        ("{\"a\" 1", "expected separator, pos 5"),
        ("{\"a\":", "EOF while parsing a value, pos 5"),
        ("{\"a\":1", "EOF while parsing a value, pos 6"),
        ("{\"a\":1 1", "expected separator, pos 7"),
        ("{\"a\":1,", "EOF while parsing a value, pos 7"),
        ("{\"a\":1,}", "expected double quote, pos 7"),
        ("{}a", "trailing characters, pos 2"),
    ]);

    test_parse_ok(vec![
        ("{}", json!({})),
        ("{ }", json!({})),
        ("{\"a\":3}", json!({"a": 3})),
        ("{ \"a\" : 3 }", json!({"a": 3})),
        ("{\"a\":3,\"b\":4}", json!({"a": 3, "b": 4})),
        ("{\"a\":1,\"a\":2}", json!({"a": 2})),
        ("{\"a\\u0041\":{\"b\":[null]}}", json!({"aA": {"b": [null]}})),
    ]);
}

#[test]
fn test_parse_nesting() {
    let text = format!(
        "{}{}",
        "[".repeat(MAX_NESTING_DEPTH),
        "]".repeat(MAX_NESTING_DEPTH)
    );
    assert!(parse_value(text.as_bytes()).is_ok());

    let text = format!(
        "{}{}",
        "[".repeat(MAX_NESTING_DEPTH + 1),
        "]".repeat(MAX_NESTING_DEPTH + 1)
    );
    let err = parse_value(text.as_bytes()).unwrap_err();
    assert_eq!(err.to_string(), "nesting too deep, pos 256");

    let text = format!(
        "{}1{}",
        "{\"a\":".repeat(MAX_NESTING_DEPTH + 1),
        "}".repeat(MAX_NESTING_DEPTH + 1)
    );
    assert_eq!(
        parse_value(text.as_bytes()).unwrap_err().code(),
        ParseErrorCode::NestingTooDeep
    );
}

#[test]
fn test_skip_and_read_agree() {
    let docs = [
        "null",
        "  -12.5e3",
        r#""a\"b""#,
        r#"{"a": [1, 2, {"b": null}], "c": "}"}"#,
        "[[[]], {}, [{}], true, false]",
    ];
    for doc in docs {
        let text = format!("{} , 1", doc);
        let mut skipping = JsonReader::new(text.as_bytes());
        skipping.skip_next_segment().unwrap();
        let mut reading = JsonReader::new(text.as_bytes());
        reading.read_dynamic().unwrap();
        assert_eq!(skipping.position(), reading.position(), "input: {}", doc);
    }
}

fn arb_json() -> impl Strategy<Value = serde_json::Value> {
    let leaf = prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(serde_json::Value::Bool),
        any::<i64>().prop_map(serde_json::Value::from),
        any::<f64>()
            .prop_filter("finite", |f| f.is_finite())
            .prop_map(serde_json::Value::from),
        ".*".prop_map(serde_json::Value::String),
    ];
    leaf.prop_recursive(6, 96, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(serde_json::Value::Array),
            prop::collection::btree_map(".*", inner, 0..8)
                .prop_map(|m| serde_json::Value::Object(m.into_iter().collect())),
        ]
    })
}

fn skip_and_read_offsets<S: jsonspan::Symbol>(text: &[S]) -> (usize, usize) {
    let mut skipping = JsonReader::new(text);
    skipping.skip_next_segment().unwrap();
    let mut reading = JsonReader::new(text);
    reading.read_dynamic().unwrap();
    (skipping.position(), reading.position())
}

proptest! {
    #[test]
    fn test_skip_and_read_agree_on_generated(doc in arb_json(), pretty in any::<bool>()) {
        let doc = if pretty {
            serde_json::to_string_pretty(&doc).unwrap()
        } else {
            serde_json::to_string(&doc).unwrap()
        };
        let text = format!("{} , 1", doc);
        let (skipped, read) = skip_and_read_offsets(text.as_bytes());
        prop_assert_eq!(skipped, read);
        prop_assert_eq!(skipped, doc.len());

        let utf16: Vec<u16> = text.encode_utf16().collect();
        let (skipped, read) = skip_and_read_offsets(&utf16);
        prop_assert_eq!(skipped, read);
        prop_assert_eq!(skipped, doc.encode_utf16().count());
    }
}
