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

use log::trace;

use super::constants::*;
use super::error::ParseErrorCode;
use super::error::Result;
use super::reader::JsonReader;
use super::symbol::Symbol;
use super::token::JsonToken;
use super::value::Object;
use super::value::RawNumber;
use super::value::RawString;
use super::value::Value;

/// Parse a complete UTF-8 JSON document into a [`Value`].
///
/// Only whitespace may follow the value. Numbers and strings in the result
/// borrow from `buf`.
pub fn parse_value(buf: &[u8]) -> Result<Value<'_>> {
    parse_document(buf)
}

/// Parse a complete JSON document held as UTF-16 code units.
pub fn parse_value_utf16(buf: &[u16]) -> Result<Value<'_, u16>> {
    parse_document(buf)
}

fn parse_document<S: Symbol>(buf: &[S]) -> Result<Value<'_, S>> {
    let mut reader = JsonReader::new(buf);
    let value = reader.read_dynamic()?;
    reader.skip_whitespace();
    if !reader.is_end() {
        return Err(reader.error(ParseErrorCode::UnexpectedTrailingCharacters));
    }
    Ok(value)
}

impl<'a, S: Symbol> JsonReader<'a, S> {
    /// Materialize the next value without knowing its shape in advance.
    ///
    /// Containers are built recursively, up to `MAX_NESTING_DEPTH` levels.
    /// Duplicate object keys keep the last value.
    pub fn read_dynamic(&mut self) -> Result<Value<'a, S>> {
        self.read_dynamic_at(0)
    }

    fn read_dynamic_at(&mut self, depth: usize) -> Result<Value<'a, S>> {
        match self.next_token() {
            JsonToken::Null => {
                self.read_null()?;
                Ok(Value::Null)
            }
            JsonToken::True | JsonToken::False => Ok(Value::Bool(self.read_bool()?)),
            JsonToken::Number => {
                let span = self.read_number_span()?;
                let offset = self.position() - span.len();
                Ok(Value::Number(RawNumber::new(span, offset)))
            }
            JsonToken::String => {
                let (span, escapes) = self.read_string_span_internal()?;
                let offset = self.span_start(span);
                Ok(Value::String(RawString::new(span, escapes, offset)))
            }
            JsonToken::BeginObject => {
                self.enter_container(depth)?;
                let mut count = 0;
                let mut object = Object::new();
                while !self.try_read_end_object_or_value_separator(&mut count)? {
                    let name = self.read_escaped_name()?;
                    let value = self.read_dynamic_at(depth + 1)?;
                    object.insert(name, value);
                }
                Ok(Value::Object(object))
            }
            JsonToken::BeginArray => {
                self.enter_container(depth)?;
                let mut count = 0;
                let mut array = Vec::new();
                while !self.try_read_end_array_or_value_separator(&mut count)? {
                    array.push(self.read_dynamic_at(depth + 1)?);
                }
                Ok(Value::Array(array))
            }
            _ => Err(self.expected(ParseErrorCode::InvalidSymbol)),
        }
    }

    /// Consume the opening symbol of a container found at `depth`.
    pub(crate) fn enter_container(&mut self, depth: usize) -> Result<()> {
        if depth >= MAX_NESTING_DEPTH {
            trace!("nesting limit of {} reached", MAX_NESTING_DEPTH);
            return Err(self.error(ParseErrorCode::NestingTooDeep));
        }
        self.step();
        Ok(())
    }
}
