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

use std::thread;

use jsonspan::{parse_value, DateTimeKind, Error, JsonReader, JsonToken, ParseErrorCode, Value};
use proptest::prelude::*;

/// A record read field by field, the way generated deserializers drive the
/// reader.
#[derive(Debug, PartialEq)]
struct Event {
    id: u32,
    name: String,
    tags: Vec<String>,
    score: Option<f64>,
}

fn read_event<S: jsonspan::Symbol>(reader: &mut JsonReader<'_, S>) -> Result<Event, Error> {
    let mut event = Event {
        id: 0,
        name: String::new(),
        tags: vec![],
        score: None,
    };
    reader.read_begin_object_or_err()?;
    let mut count = 0;
    while !reader.try_read_end_object_or_value_separator(&mut count)? {
        let name = reader.read_escaped_name()?;
        match name.as_ref() {
            "id" => event.id = reader.read_u32()?,
            "name" => event.name = reader.read_string()?.unwrap_or_default().into_owned(),
            "tags" => {
                reader.read_begin_array_or_err()?;
                let mut count = 0;
                while !reader.try_read_end_array_or_value_separator(&mut count)? {
                    if let Some(tag) = reader.read_string()? {
                        event.tags.push(tag.into_owned());
                    }
                }
            }
            "score" => {
                if !reader.read_is_null()? {
                    event.score = Some(reader.read_f64()?);
                }
            }
            _ => reader.skip_next_segment()?,
        }
    }
    Ok(event)
}

const EVENT: &str = r#"{
    "id": 42,
    "extra": {"nested": [1, 2, {"deep": null}]},
    "name": "deploy \"blue\"",
    "tags": ["a", null, "b"],
    "score": 0.75
}"#;

#[test_log::test]
fn test_read_record() {
    let expected = Event {
        id: 42,
        name: "deploy \"blue\"".to_string(),
        tags: vec!["a".to_string(), "b".to_string()],
        score: Some(0.75),
    };
    let mut reader = JsonReader::new(EVENT.as_bytes());
    assert_eq!(read_event(&mut reader).unwrap(), expected);
    assert!(reader.is_end());

    let utf16: Vec<u16> = EVENT.encode_utf16().collect();
    let mut reader = JsonReader::new(&utf16[..]);
    assert_eq!(read_event(&mut reader).unwrap(), expected);
}

#[test_log::test]
fn test_read_record_mismatch() {
    let text = r#"{"id": -1}"#;
    let mut reader = JsonReader::new(text.as_bytes());
    let err = read_event(&mut reader).unwrap_err();
    assert_eq!(err, Error::Syntax(ParseErrorCode::InvalidNumberFormat, 7));

    let text = r#"{"id": 4294967296}"#;
    let mut reader = JsonReader::new(text.as_bytes());
    let err = read_event(&mut reader).unwrap_err();
    assert_eq!(err, Error::Syntax(ParseErrorCode::NumericOverflow, 7));
}

#[test_log::test]
fn test_token_walk() {
    let mut reader = JsonReader::new(br#"{"a": [true, 1]}"#);
    let mut tokens = vec![];
    loop {
        let token = reader.next_token();
        if token == JsonToken::None {
            break;
        }
        tokens.push(token);
        reader.skip_next_value(token).unwrap();
    }
    assert_eq!(
        tokens,
        vec![
            JsonToken::BeginObject,
            JsonToken::String,
            JsonToken::NameSeparator,
            JsonToken::BeginArray,
            JsonToken::True,
            JsonToken::ValueSeparator,
            JsonToken::Number,
            JsonToken::EndArray,
            JsonToken::EndObject,
        ]
    );
    let values: Vec<_> = tokens.iter().filter(|t| t.is_value()).collect();
    assert_eq!(values.len(), 5);
}

#[test_log::test]
fn test_read_temporal_values() {
    let text = r#"["2017-06-12T05:30:45.768Z", "2017-06-12T05:30:45", "12:00:00"]"#;
    let mut reader = JsonReader::new(text.as_bytes());
    let mut count = 0;
    reader.read_begin_array_or_err().unwrap();
    reader.try_read_end_array_or_value_separator(&mut count).unwrap();
    let utc = reader.read_date_time().unwrap();
    assert_eq!(utc.kind, DateTimeKind::Utc);
    assert_eq!(utc.ticks, 768);
    reader.try_read_end_array_or_value_separator(&mut count).unwrap();
    let local = reader.read_date_time().unwrap();
    assert_eq!(local.kind, DateTimeKind::Unspecified);
    reader.try_read_end_array_or_value_separator(&mut count).unwrap();
    assert_eq!(reader.read_duration().unwrap().as_secs(), 12 * 3600);
    assert!(reader.try_read_end_array_or_value_separator(&mut count).unwrap());
}

#[test_log::test]
fn test_share_buffer_across_threads() {
    let text = r#"[{"k": "v"}, [1, 2, 3], "s", 4.5]"#;
    let value = parse_value(text.as_bytes()).unwrap();

    thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    let mut reader = JsonReader::new(text.as_bytes());
                    reader.skip_next_segment().unwrap();
                    reader.position()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), text.len());
        }

        let value = &value;
        scope
            .spawn(move || {
                let items = value.as_array().unwrap();
                assert_eq!(items[3].as_f64(), Some(4.5));
            })
            .join()
            .unwrap();
    });

    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Value<'static>>();
    assert_send_sync::<Value<'static, u16>>();
}

proptest! {
    #[test]
    fn test_i64_round_trip(v in any::<i64>()) {
        let text = v.to_string();
        let mut reader = JsonReader::new(text.as_bytes());
        prop_assert_eq!(reader.read_i64().unwrap(), v);
        prop_assert!(reader.is_end());

        let utf16: Vec<u16> = text.encode_utf16().collect();
        let mut reader = JsonReader::new(&utf16[..]);
        prop_assert_eq!(reader.read_i64().unwrap(), v);
    }

    #[test]
    fn test_u64_round_trip(v in any::<u64>()) {
        let text = v.to_string();
        let mut reader = JsonReader::new(text.as_bytes());
        prop_assert_eq!(reader.read_u64().unwrap(), v);
    }

    #[test]
    fn test_i64_overflow(v in (i64::MAX as i128 + 1)..=(u64::MAX as i128 * 4)) {
        for text in [v.to_string(), (-v - 1).to_string()] {
            let mut reader = JsonReader::new(text.as_bytes());
            let err = reader.read_i64().unwrap_err();
            prop_assert_eq!(err, Error::Syntax(ParseErrorCode::NumericOverflow, 0));
        }
    }

    #[test]
    fn test_u64_overflow(v in (u64::MAX as u128 + 1)..=u128::MAX) {
        let text = v.to_string();
        let mut reader = JsonReader::new(text.as_bytes());
        let err = reader.read_u64().unwrap_err();
        prop_assert_eq!(err.code(), ParseErrorCode::NumericOverflow);
    }

    #[test]
    fn test_string_matches_serde_json(s in ".*") {
        let text = serde_json::to_string(&s).unwrap();
        let mut reader = JsonReader::new(text.as_bytes());
        let decoded = reader.read_string().unwrap().unwrap();
        prop_assert_eq!(decoded.as_ref(), s.as_str());
        prop_assert!(reader.is_end());
    }

    #[test]
    fn test_f64_matches_serde_json(v in any::<f64>().prop_filter("finite", |f| f.is_finite())) {
        let text = serde_json::to_string(&v).unwrap();
        let mut reader = JsonReader::new(text.as_bytes());
        prop_assert_eq!(reader.read_f64().unwrap(), v);
    }
}
