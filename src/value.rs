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

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Write;

use jiff::SignedDuration;
use serde::ser::Error as _;
use serde::ser::SerializeMap;
use serde::ser::SerializeSeq;
use serde::Serialize;
use serde::Serializer;
use uuid::Uuid;

use crate::datetime::parse_date_time;
use crate::datetime::parse_duration;
use crate::datetime::DateTime;
use crate::error::Error;
use crate::error::ParseErrorCode;
use crate::error::Result;
use crate::error::TargetType;
use crate::number::Decimal128;
use crate::reader::JsonReader;
use crate::scalar::decode_char;
use crate::scalar::parse_guid;
use crate::symbol::Symbol;
use crate::util::unescape;

pub type Object<'a, S = u8> = BTreeMap<Cow<'a, str>, Value<'a, S>>;

/// A JSON value materialized from a buffer.
///
/// Containers are built eagerly, while numbers and strings keep their raw
/// text borrowed from the buffer and are converted only when asked for.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value<'a, S: Symbol = u8> {
    #[default]
    Null,
    Bool(bool),
    Number(RawNumber<'a, S>),
    String(RawString<'a, S>),
    Array(Vec<Value<'a, S>>),
    Object(Object<'a, S>),
}

/// The text of a number literal, unvalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawNumber<'a, S: Symbol = u8> {
    span: &'a [S],
    offset: usize,
}

/// The body of a string literal, still escaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawString<'a, S: Symbol = u8> {
    span: &'a [S],
    escapes: usize,
    offset: usize,
}

impl<'a, S: Symbol> RawNumber<'a, S> {
    pub(crate) fn new(span: &'a [S], offset: usize) -> Self {
        Self { span, offset }
    }

    pub fn span(&self) -> &'a [S] {
        self.span
    }

    /// Offset of the literal in the source buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn as_i64(&self) -> Result<i64> {
        self.convert(|r| r.read_i64())
    }

    pub fn as_u64(&self) -> Result<u64> {
        self.convert(|r| r.read_u64())
    }

    pub fn as_f64(&self) -> Result<f64> {
        self.convert(|r| r.read_f64())
    }

    pub fn as_f32(&self) -> Result<f32> {
        self.convert(|r| r.read_f32())
    }

    pub fn as_decimal(&self) -> Result<Decimal128> {
        self.convert(|r| r.read_decimal())
    }

    /// Run a typed read over the literal alone, which must use all of it.
    fn convert<T>(&self, read: impl FnOnce(&mut JsonReader<'a, S>) -> Result<T>) -> Result<T> {
        let mut reader = JsonReader::new(self.span);
        let value = read(&mut reader).map_err(|e| e.shifted(self.offset))?;
        if !reader.is_end() {
            return Err(Error::Syntax(
                ParseErrorCode::InvalidNumberFormat,
                self.offset + reader.position(),
            ));
        }
        Ok(value)
    }
}

impl<'a, S: Symbol> RawString<'a, S> {
    pub(crate) fn new(span: &'a [S], escapes: usize, offset: usize) -> Self {
        Self {
            span,
            escapes,
            offset,
        }
    }

    /// The escaped body, quotes excluded.
    pub fn span(&self) -> &'a [S] {
        self.span
    }

    /// Escape count as defined by [`JsonReader::find_string_end`].
    pub fn escapes(&self) -> usize {
        self.escapes
    }

    /// Offset of the body in the source buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Unescape the string, borrowing when the body needs no work.
    pub fn as_str(&self) -> Result<Cow<'a, str>> {
        if self.escapes == 0 {
            return S::decode(self.span)
                .ok_or(Error::Syntax(ParseErrorCode::InvalidStringValue, self.offset));
        }
        unescape(self.span, self.escapes)
            .map(Cow::Owned)
            .map_err(|e| e.shifted(self.offset))
    }

    pub fn as_char(&self) -> Result<char> {
        decode_char(self.span).map_err(|pos| {
            Error::Unexpected(
                ParseErrorCode::InvalidSymbol,
                self.offset + pos,
                TargetType::Char,
            )
        })
    }

    pub fn as_date_time(&self) -> Result<DateTime> {
        self.parse_whole(TargetType::DateTime, parse_date_time)
    }

    pub fn as_duration(&self) -> Result<SignedDuration> {
        self.parse_whole(TargetType::Duration, parse_duration)
    }

    pub fn as_guid(&self) -> Result<Uuid> {
        parse_guid(self.span).ok_or(Error::Unexpected(
            ParseErrorCode::InvalidSymbol,
            self.offset,
            TargetType::Guid,
        ))
    }

    fn parse_whole<T>(
        &self,
        target: TargetType,
        parse: impl Fn(&[S]) -> Option<(T, usize)>,
    ) -> Result<T> {
        match parse(self.span) {
            Some((value, consumed)) if consumed == self.span.len() => Ok(value),
            _ => Err(Error::Unexpected(
                ParseErrorCode::InvalidSymbol,
                self.offset,
                target,
            )),
        }
    }
}

impl<'a, S: Symbol> Value<'a, S> {
    pub fn is_scalar(&self) -> bool {
        !self.is_array() && !self.is_object()
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_v))
    }

    pub fn as_object(&self) -> Option<&Object<'a, S>> {
        match self {
            Value::Object(ref obj) => Some(obj),
            _ => None,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_v))
    }

    pub fn as_array(&self) -> Option<&Vec<Value<'a, S>>> {
        match self {
            Value::Array(ref array) => Some(array),
            _ => None,
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_v))
    }

    pub fn as_raw_string(&self) -> Option<&RawString<'a, S>> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The unescaped string, `None` for other variants or undecodable text.
    pub fn as_str(&self) -> Option<Cow<'a, str>> {
        self.as_raw_string().and_then(|s| s.as_str().ok())
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    pub fn as_number(&self) -> Option<&RawNumber<'a, S>> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn is_i64(&self) -> bool {
        self.as_i64().is_some()
    }

    pub fn is_u64(&self) -> bool {
        self.as_u64().is_some()
    }

    pub fn is_f64(&self) -> bool {
        self.as_f64().is_some()
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_number().and_then(|n| n.as_i64().ok())
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.as_number().and_then(|n| n.as_u64().ok())
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().and_then(|n| n.as_f64().ok())
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Value::Bool(_v))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_null(&self) -> Option<()> {
        match self {
            Value::Null => Some(()),
            _ => None,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value<'a, S>> {
        self.as_object().and_then(|obj| obj.get(name))
    }

    pub fn get_by_name_ignore_case(&self, name: &str) -> Option<&Value<'a, S>> {
        match self {
            Value::Object(obj) => match obj.get(name) {
                Some(val) => Some(val),
                None => {
                    for key in obj.keys() {
                        if name.eq_ignore_ascii_case(key) {
                            return obj.get(key);
                        }
                    }
                    None
                }
            },
            _ => None,
        }
    }

    pub fn array_length(&self) -> Option<usize> {
        match self {
            Value::Array(arr) => Some(arr.len()),
            _ => None,
        }
    }
}

/// Writes compact JSON text. Numbers and strings are written as they appear
/// in the source, escapes included. Member names were unescaped while
/// parsing and are escaped again.
impl<S: Symbol> Display for Value<'_, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => {
                if *v {
                    write!(f, "true")
                } else {
                    write!(f, "false")
                }
            }
            Value::Number(n) => write_raw(f, n.span),
            Value::String(s) => {
                write!(f, "\"")?;
                write_raw(f, s.span)?;
                write!(f, "\"")
            }
            Value::Array(ref vs) => {
                write!(f, "[")?;
                for (i, v) in vs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            Value::Object(ref vs) => {
                write!(f, "{{")?;
                for (i, (k, v)) in vs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write_escaped(f, k)?;
                    write!(f, ":{v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Write an unescaped member name back as a JSON string.
fn write_escaped(f: &mut Formatter<'_>, s: &str) -> std::fmt::Result {
    f.write_char('"')?;
    let mut last_start = 0;
    for (i, c) in s.char_indices() {
        let escaped = match c {
            '\\' => "\\\\",
            '"' => "\\\"",
            '\x08' => "\\b",
            '\x0C' => "\\f",
            '\n' => "\\n",
            '\r' => "\\r",
            '\t' => "\\t",
            c if c < ' ' => "",
            _ => continue,
        };
        f.write_str(&s[last_start..i])?;
        if escaped.is_empty() {
            write!(f, "\\u{:04x}", c as u32)?;
        } else {
            f.write_str(escaped)?;
        }
        last_start = i + c.len_utf8();
    }
    f.write_str(&s[last_start..])?;
    f.write_char('"')
}

fn write_raw<S: Symbol>(f: &mut Formatter<'_>, span: &[S]) -> std::fmt::Result {
    match S::decode(span) {
        Some(text) => f.write_str(&text),
        None => Err(std::fmt::Error),
    }
}

/// Numbers serialize as the first of `u64`, `i64` and `f64` that holds them.
impl<S: Symbol> Serialize for Value<'_, S> {
    fn serialize<Ser>(&self, serializer: Ser) -> std::result::Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Number(n) => {
                if let Ok(v) = n.as_u64() {
                    serializer.serialize_u64(v)
                } else if let Ok(v) = n.as_i64() {
                    serializer.serialize_i64(v)
                } else {
                    match n.as_f64() {
                        Ok(v) => serializer.serialize_f64(v),
                        Err(e) => Err(Ser::Error::custom(e)),
                    }
                }
            }
            Value::String(s) => match s.as_str() {
                Ok(v) => serializer.serialize_str(&v),
                Err(e) => Err(Ser::Error::custom(e)),
            },
            Value::Array(vs) => {
                let mut seq = serializer.serialize_seq(Some(vs.len()))?;
                for v in vs {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
            Value::Object(vs) => {
                let mut map = serializer.serialize_map(Some(vs.len()))?;
                for (k, v) in vs {
                    map.serialize_entry(k.as_ref(), v)?;
                }
                map.end()
            }
        }
    }
}
