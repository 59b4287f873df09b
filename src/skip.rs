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

impl<S: Symbol> JsonReader<'_, S> {
    /// Skip the next segment of the document.
    ///
    /// A scalar, a separator or a closing symbol is skipped on its own. An
    /// opening symbol skips the whole container up to its matching closing
    /// symbol, without building anything. At the end of input this is a
    /// no-op.
    pub fn skip_next_segment(&mut self) -> Result<()> {
        match self.next_token() {
            JsonToken::BeginObject | JsonToken::BeginArray => self.skip_container(),
            JsonToken::None if !self.is_end() => Err(self.error(ParseErrorCode::InvalidSymbol)),
            token => self.skip_next_value(token),
        }
    }

    fn skip_container(&mut self) -> Result<()> {
        let mut closers: Vec<u8> = Vec::new();
        loop {
            match self.next_token() {
                token @ (JsonToken::BeginObject | JsonToken::BeginArray) => {
                    if closers.len() >= MAX_NESTING_DEPTH {
                        trace!("nesting limit of {} reached", MAX_NESTING_DEPTH);
                        return Err(self.error(ParseErrorCode::NestingTooDeep));
                    }
                    closers.push(if token == JsonToken::BeginObject {
                        END_OBJECT
                    } else {
                        END_ARRAY
                    });
                    self.step();
                }
                JsonToken::EndObject | JsonToken::EndArray => {
                    if closers.pop() != self.ascii_at(self.position()) {
                        return Err(self.error(ParseErrorCode::InvalidSymbol));
                    }
                    self.step();
                    if closers.is_empty() {
                        return Ok(());
                    }
                }
                JsonToken::None => return Err(self.expected(ParseErrorCode::InvalidSymbol)),
                token => self.skip_next_value(token)?,
            }
        }
    }

    /// Skip the single token `token`, which must be the one under the cursor
    /// as reported by [`JsonReader::next_token`]. Containers are not
    /// descended into, only their opening symbol is consumed.
    pub fn skip_next_value(&mut self, token: JsonToken) -> Result<()> {
        self.skip_whitespace();
        match token {
            JsonToken::None => {}
            JsonToken::BeginObject
            | JsonToken::EndObject
            | JsonToken::BeginArray
            | JsonToken::EndArray
            | JsonToken::ValueSeparator
            | JsonToken::NameSeparator => self.step(),
            JsonToken::Number => {
                let len = self
                    .find_number_end(self.position())
                    .ok_or_else(|| self.expected(ParseErrorCode::InvalidNumberFormat))?;
                self.step_by(len);
            }
            JsonToken::String => {
                self.read_string_span_internal()?;
            }
            JsonToken::True => self.skip_literal(TRUE_LITERAL)?,
            JsonToken::False => self.skip_literal(FALSE_LITERAL)?,
            JsonToken::Null => self.skip_literal(NULL_LITERAL)?,
        }
        Ok(())
    }

    fn skip_literal(&mut self, literal: &[u8]) -> Result<()> {
        if let Some(pos) = self.literal_mismatch(literal) {
            return Err(self.error_at(ParseErrorCode::InvalidSymbol, pos));
        }
        self.step_by(literal.len());
        Ok(())
    }
}
