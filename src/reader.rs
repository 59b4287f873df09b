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

use log::debug;

use super::constants::*;
use super::error::Error;
use super::error::ParseErrorCode;
use super::error::Result;
use super::error::TargetType;
use super::symbol::Symbol;
use super::token::JsonToken;
use super::util::unescape;

/// A pull reader over a JSON document held in one contiguous buffer.
///
/// The reader owns nothing but a cursor: the buffer is borrowed for `'a`,
/// and every span or string handed out without unescaping borrows from it.
/// Callers drive the reader with their own knowledge of the document shape,
/// calling the typed `read_*` functions and the structural navigation
/// functions in the order the document is expected to appear. A call that
/// does not match the document fails with an [`Error`] carrying the offset
/// of the mismatch; nothing is consumed past a failure point that callers
/// should rely on, so a failed decode must be treated as final.
pub struct JsonReader<'a, S: Symbol = u8> {
    buf: &'a [S],
    pos: usize,
}

impl<'a, S: Symbol> JsonReader<'a, S> {
    pub fn new(buf: &'a [S]) -> JsonReader<'a, S> {
        Self { buf, pos: 0 }
    }

    /// Current offset of the cursor in symbols.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The whole buffer the reader was created over.
    #[inline]
    pub fn buffer(&self) -> &'a [S] {
        self.buf
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.pos >= self.buf.len()
    }

    #[inline]
    pub(crate) fn ascii_at(&self, idx: usize) -> Option<u8> {
        self.buf.get(idx).and_then(|c| c.ascii())
    }

    /// The symbol under the cursor, `EndOfData` if the buffer is exhausted.
    #[inline]
    pub(crate) fn next(&self) -> Result<Option<u8>> {
        match self.buf.get(self.pos) {
            Some(c) => Ok(c.ascii()),
            None => Err(self.error(ParseErrorCode::EndOfData)),
        }
    }

    #[inline]
    pub(crate) fn step(&mut self) {
        self.pos += 1;
    }

    #[inline]
    pub(crate) fn step_by(&mut self, n: usize) {
        self.pos += n;
    }

    pub(crate) fn error(&self, code: ParseErrorCode) -> Error {
        self.error_at(code, self.pos)
    }

    pub(crate) fn error_at(&self, code: ParseErrorCode, pos: usize) -> Error {
        debug!("json decode failed: {} at pos {}", code, pos);
        Error::Syntax(code, pos)
    }

    pub(crate) fn typed_error_at(
        &self,
        code: ParseErrorCode,
        pos: usize,
        target: TargetType,
    ) -> Error {
        debug!(
            "json decode failed: {} while reading {} at pos {}",
            code, target, pos
        );
        Error::Unexpected(code, pos, target)
    }

    /// Advance past space, tab, carriage return and line feed.
    #[inline]
    pub fn skip_whitespace(&mut self) {
        while let Some(c) = self.buf.get(self.pos) {
            match c.ascii() {
                Some(b' ' | b'\t' | b'\r' | b'\n') => self.pos += 1,
                _ => break,
            }
        }
    }

    /// Skip whitespace and classify the symbol under the cursor without
    /// consuming it.
    pub fn next_token(&mut self) -> JsonToken {
        self.skip_whitespace();
        match self.buf.get(self.pos) {
            Some(c) => JsonToken::classify(c.ascii()),
            None => JsonToken::None,
        }
    }

    #[inline]
    fn consume_if(&mut self, c: u8) -> bool {
        self.skip_whitespace();
        if self.ascii_at(self.pos) == Some(c) {
            self.step();
            true
        } else {
            false
        }
    }

    pub fn read_begin_array(&mut self) -> bool {
        self.consume_if(BEGIN_ARRAY)
    }

    pub fn read_begin_array_or_err(&mut self) -> Result<()> {
        if self.read_begin_array() {
            return Ok(());
        }
        Err(self.expected(ParseErrorCode::ExpectedBeginArray))
    }

    /// Returns `true` after consuming the closing `]`. Otherwise a `,` is
    /// required and consumed before every element but the first; `count`
    /// tracks the elements seen so far.
    pub fn try_read_end_array_or_value_separator(&mut self, count: &mut usize) -> Result<bool> {
        self.try_read_end_or_value_separator(END_ARRAY, count)
    }

    pub fn read_is_begin_object(&mut self) -> bool {
        self.consume_if(BEGIN_OBJECT)
    }

    pub fn read_begin_object_or_err(&mut self) -> Result<()> {
        if self.read_is_begin_object() {
            return Ok(());
        }
        Err(self.expected(ParseErrorCode::ExpectedBeginObject))
    }

    pub fn read_is_end_object(&mut self) -> bool {
        self.consume_if(END_OBJECT)
    }

    pub fn read_end_object_or_err(&mut self) -> Result<()> {
        if self.read_is_end_object() {
            return Ok(());
        }
        Err(self.expected(ParseErrorCode::ExpectedEndObject))
    }

    /// Object counterpart of [`JsonReader::try_read_end_array_or_value_separator`].
    pub fn try_read_end_object_or_value_separator(&mut self, count: &mut usize) -> Result<bool> {
        self.try_read_end_or_value_separator(END_OBJECT, count)
    }

    fn try_read_end_or_value_separator(&mut self, end: u8, count: &mut usize) -> Result<bool> {
        if self.consume_if(end) {
            return Ok(true);
        }
        let seen = *count;
        *count += 1;
        if seen > 0 {
            if self.consume_if(VALUE_SEPARATOR) {
                return Ok(false);
            }
            return Err(self.expected(ParseErrorCode::ExpectedSeparator));
        }
        Ok(false)
    }

    /// `EndOfData` when the buffer is exhausted, `code` otherwise.
    #[inline]
    pub(crate) fn expected(&self, code: ParseErrorCode) -> Error {
        if self.is_end() {
            self.error(ParseErrorCode::EndOfData)
        } else {
            self.error(code)
        }
    }

    /// Read a member name and the `:` that follows it, without unescaping.
    pub fn read_name_span(&mut self) -> Result<&'a [S]> {
        let (span, _) = self.read_string_span_internal()?;
        self.read_name_separator()?;
        Ok(span)
    }

    /// Read a member name and the `:` that follows it.
    pub fn read_escaped_name(&mut self) -> Result<Cow<'a, str>> {
        let (span, escapes) = self.read_string_span_internal()?;
        let start = self.span_start(span);
        self.read_name_separator()?;
        self.decode_string(span, escapes, start)
    }

    fn read_name_separator(&mut self) -> Result<()> {
        if self.consume_if(NAME_SEPARATOR) {
            return Ok(());
        }
        Err(self.expected(ParseErrorCode::ExpectedSeparator))
    }

    /// Scan a number literal starting at `start` over the symbols
    /// `0-9 + - . E e`, returning the number of symbols matched.
    ///
    /// No grammar is checked here; a malformed literal such as `1.2.3` is
    /// rejected by the conversion that consumes the span.
    pub fn find_number_end(&self, start: usize) -> Option<usize> {
        let mut idx = start;
        while let Some(c) = self.ascii_at(idx) {
            if !matches!(c, b'0'..=b'9' | b'+' | b'-' | b'.' | b'E' | b'e') {
                break;
            }
            idx += 1;
        }
        if idx > start {
            Some(idx - start)
        } else {
            None
        }
    }

    /// Scan a string body starting just past the opening quote.
    ///
    /// Returns the number of symbols before the closing quote and the escape
    /// count: every escape adds one, and a `\u`/`\U` escape adds four more,
    /// so that `span.len() - escapes` is the decoded length in UTF-16 units.
    pub fn find_string_end(&self, start: usize) -> Option<(usize, usize)> {
        let mut escapes = 0;
        let mut idx = start;
        while idx < self.buf.len() {
            match self.ascii_at(idx) {
                Some(REVERSE_SOLIDUS) => {
                    escapes += 1;
                    idx += 1;
                    if matches!(self.ascii_at(idx), Some(b'u' | b'U')) {
                        escapes += UNICODE_LEN;
                        idx += UNICODE_LEN;
                    }
                }
                Some(DOUBLE_QUOTE) => return Some((idx - start, escapes)),
                _ => {}
            }
            idx += 1;
        }
        None
    }

    /// Consume a number literal and return its span.
    pub(crate) fn read_number_span(&mut self) -> Result<&'a [S]> {
        self.skip_whitespace();
        if self.is_end() {
            return Err(self.error(ParseErrorCode::EndOfData));
        }
        match self.find_number_end(self.pos) {
            Some(len) => {
                let span = &self.buf[self.pos..self.pos + len];
                self.step_by(len);
                Ok(span)
            }
            None => Err(self.error(ParseErrorCode::InvalidNumberFormat)),
        }
    }

    /// Consume a string literal, returning the span between the quotes and
    /// its escape count.
    pub(crate) fn read_string_span_internal(&mut self) -> Result<(&'a [S], usize)> {
        self.skip_whitespace();
        if self.next()? != Some(DOUBLE_QUOTE) {
            return Err(self.error(ParseErrorCode::ExpectedDoubleQuote));
        }
        self.step();
        match self.find_string_end(self.pos) {
            Some((len, escapes)) => {
                let span = &self.buf[self.pos..self.pos + len];
                // skip the closing quote too
                self.step_by(len + 1);
                Ok((span, escapes))
            }
            None => Err(self.error_at(ParseErrorCode::EndOfData, self.buf.len())),
        }
    }

    /// Offset of a string body returned by the last string read.
    #[inline]
    pub(crate) fn span_start(&self, span: &[S]) -> usize {
        self.pos - span.len() - 1
    }

    /// Decode a string span, borrowing it when no escapes were seen and the
    /// encoding allows it. `start` is the offset of the span in the buffer.
    pub(crate) fn decode_string(
        &self,
        span: &'a [S],
        escapes: usize,
        start: usize,
    ) -> Result<Cow<'a, str>> {
        if escapes == 0 {
            return S::decode(span)
                .ok_or_else(|| self.error_at(ParseErrorCode::InvalidStringValue, start));
        }
        unescape(span, escapes)
            .map(Cow::Owned)
            .map_err(|e| e.shifted(start))
    }

    /// Offset of the first symbol that differs from `literal`, or `None`
    /// when the whole literal is present under the cursor.
    pub(crate) fn literal_mismatch(&self, literal: &[u8]) -> Option<usize> {
        literal
            .iter()
            .enumerate()
            .find(|(i, c)| self.ascii_at(self.pos + i) != Some(**c))
            .map(|(i, _)| self.pos + i)
    }
}
