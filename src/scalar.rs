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

//! Typed scalar decoders of [`JsonReader`].

use std::borrow::Cow;

use jiff::tz::TimeZone;
use jiff::SignedDuration;
use jiff::Zoned;
use num_traits::NumCast;
use url::Url;
use uuid::Uuid;

use super::constants::*;
use super::datetime::parse_date_time;
use super::datetime::parse_duration;
use super::datetime::DateTime;
use super::error::ParseErrorCode;
use super::error::Result;
use super::error::TargetType;
use super::number::parse_decimal;
use super::number::push_digit;
use super::number::Decimal128;
use super::reader::JsonReader;
use super::symbol::Symbol;
use super::util::decode_hex_escape;
use super::util::parse_escaped_char;
use super::version::Version;

impl<'a, S: Symbol> JsonReader<'a, S> {
    /// Read an integer with an optional leading `-`.
    ///
    /// `i64::MIN` is accepted, everything past the range of `i64` fails with
    /// `NumericOverflow` at the first symbol of the literal.
    pub fn read_i64(&mut self) -> Result<i64> {
        self.skip_whitespace();
        let start = self.position();
        let negative = self.next()? == Some(b'-');
        if negative {
            self.step();
        }
        let magnitude = self.read_digits(start)?;
        let value = if negative {
            -(magnitude as i128)
        } else {
            magnitude as i128
        };
        i64::try_from(value).map_err(|_| self.error_at(ParseErrorCode::NumericOverflow, start))
    }

    /// Read a non-negative integer, a leading `-` is an invalid digit.
    pub fn read_u64(&mut self) -> Result<u64> {
        self.skip_whitespace();
        let start = self.position();
        self.read_digits(start)
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        self.read_signed()
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.read_signed()
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.read_signed()
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_unsigned()
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_unsigned()
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_unsigned()
    }

    fn read_signed<T: NumCast>(&mut self) -> Result<T> {
        self.skip_whitespace();
        let start = self.position();
        let value = self.read_i64()?;
        <T as NumCast>::from(value)
            .ok_or_else(|| self.error_at(ParseErrorCode::NumericOverflow, start))
    }

    fn read_unsigned<T: NumCast>(&mut self) -> Result<T> {
        self.skip_whitespace();
        let start = self.position();
        let value = self.read_u64()?;
        <T as NumCast>::from(value)
            .ok_or_else(|| self.error_at(ParseErrorCode::NumericOverflow, start))
    }

    /// Accumulate a run of at least one decimal digit.
    fn read_digits(&mut self, start: usize) -> Result<u64> {
        match self.next()? {
            Some(b'0'..=b'9') => {}
            _ => return Err(self.error(ParseErrorCode::InvalidNumberFormat)),
        }
        let mut value = 0_u64;
        while let Some(c @ b'0'..=b'9') = self.ascii_at(self.position()) {
            value = push_digit(value, c - b'0')
                .ok_or_else(|| self.error_at(ParseErrorCode::NumericOverflow, start))?;
            self.step();
        }
        Ok(value)
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        self.read_float()
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.read_float()
    }

    fn read_float<T: fast_float2::FastFloat>(&mut self) -> Result<T> {
        let span = self.read_number_span()?;
        let start = self.position() - span.len();
        let bytes = S::ascii_bytes(span);
        match fast_float2::parse_partial::<T, _>(&*bytes) {
            Ok((value, consumed)) if consumed == span.len() => Ok(value),
            _ => Err(self.error_at(ParseErrorCode::InvalidNumberFormat, start)),
        }
    }

    /// Read a number without going through binary floating point.
    pub fn read_decimal(&mut self) -> Result<Decimal128> {
        let span = self.read_number_span()?;
        let start = self.position() - span.len();
        parse_decimal(span).map_err(|e| self.error_at(e.code(), start + e.offset()))
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        self.skip_whitespace();
        let (literal, value) = match self.next()? {
            Some(b't') => (TRUE_LITERAL, true),
            Some(b'f') => (FALSE_LITERAL, false),
            _ => {
                return Err(self.typed_error_at(
                    ParseErrorCode::InvalidSymbol,
                    self.position(),
                    TargetType::Bool,
                ))
            }
        };
        if let Some(pos) = self.literal_mismatch(literal) {
            return Err(self.typed_error_at(ParseErrorCode::InvalidSymbol, pos, TargetType::Bool));
        }
        self.step_by(literal.len());
        Ok(value)
    }

    /// Consume `null` if it is the next token.
    pub fn read_is_null(&mut self) -> Result<bool> {
        self.skip_whitespace();
        if self.ascii_at(self.position()) != Some(b'n') {
            return Ok(false);
        }
        if let Some(pos) = self.literal_mismatch(NULL_LITERAL) {
            return Err(self.error_at(ParseErrorCode::InvalidSymbol, pos));
        }
        self.step_by(NULL_LITERAL.len());
        Ok(true)
    }

    pub fn read_null(&mut self) -> Result<()> {
        if self.read_is_null()? {
            return Ok(());
        }
        Err(self.expected(ParseErrorCode::InvalidSymbol))
    }

    /// Read a string holding a single character.
    ///
    /// Only the first character is looked at. An escaped lone surrogate has
    /// no `char` representation and is rejected.
    pub fn read_char(&mut self) -> Result<char> {
        let (span, _) = self.read_string_span_internal()?;
        let start = self.span_start(span);
        decode_char(span).map_err(|pos| {
            self.typed_error_at(ParseErrorCode::InvalidSymbol, start + pos, TargetType::Char)
        })
    }

    /// Read a string, `None` for `null`.
    ///
    /// The result borrows from the buffer when the string has no escapes and
    /// the buffer is UTF-8.
    pub fn read_string(&mut self) -> Result<Option<Cow<'a, str>>> {
        if self.read_is_null()? {
            return Ok(None);
        }
        let (span, escapes) = self.read_string_span_internal()?;
        let start = self.span_start(span);
        self.decode_string(span, escapes, start).map(Some)
    }

    /// Read the raw body of a string without unescaping, `null` yields an
    /// empty span.
    pub fn read_string_span(&mut self) -> Result<&'a [S]> {
        if self.read_is_null()? {
            let pos = self.position();
            return Ok(&self.buffer()[pos..pos]);
        }
        let (span, _) = self.read_string_span_internal()?;
        Ok(span)
    }

    pub fn read_date_time(&mut self) -> Result<DateTime> {
        let (value, _) = self.read_formatted(TargetType::DateTime, parse_date_time)?;
        Ok(value)
    }

    /// Read a date-time as a zoned value. Values without an offset are
    /// interpreted in the system time zone.
    pub fn read_date_time_offset(&mut self) -> Result<Zoned> {
        let (value, start) = self.read_formatted(TargetType::DateTimeOffset, parse_date_time)?;
        value.to_zoned(TimeZone::system()).map_err(|_| {
            self.typed_error_at(ParseErrorCode::InvalidSymbol, start, TargetType::DateTimeOffset)
        })
    }

    pub fn read_duration(&mut self) -> Result<SignedDuration> {
        let (value, _) = self.read_formatted(TargetType::Duration, parse_duration)?;
        Ok(value)
    }

    /// Run a fixed-grammar parser over a string body, which must consume all
    /// of it. Returns the value and the offset of the body.
    fn read_formatted<T>(
        &mut self,
        target: TargetType,
        parse: impl Fn(&[S]) -> Option<(T, usize)>,
    ) -> Result<(T, usize)> {
        let (span, _) = self.read_string_span_internal()?;
        let start = self.span_start(span);
        match parse(span) {
            Some((value, consumed)) if consumed == span.len() => Ok((value, start)),
            _ => Err(self.typed_error_at(ParseErrorCode::InvalidSymbol, start, target)),
        }
    }

    /// Read an absolute URI, `None` for `null`.
    pub fn read_uri(&mut self) -> Result<Option<Url>> {
        self.skip_whitespace();
        let start = self.position();
        match self.read_string()? {
            Some(s) => Url::parse(&s).map(Some).map_err(|_| {
                self.typed_error_at(ParseErrorCode::InvalidSymbol, start, TargetType::Uri)
            }),
            None => Ok(None),
        }
    }

    /// Read a `major.minor[.build[.revision]]` version, `None` for `null`.
    pub fn read_version(&mut self) -> Result<Option<Version>> {
        self.skip_whitespace();
        let start = self.position();
        match self.read_string()? {
            Some(s) => s.parse().map(Some).map_err(|_| {
                self.typed_error_at(ParseErrorCode::InvalidSymbol, start, TargetType::Version)
            }),
            None => Ok(None),
        }
    }

    /// Read a GUID. `null` is not a GUID and fails like any other
    /// malformed value.
    pub fn read_guid(&mut self) -> Result<Uuid> {
        self.skip_whitespace();
        let start = self.position();
        let span = self.read_string_span()?;
        parse_guid(span).ok_or_else(|| {
            self.typed_error_at(ParseErrorCode::InvalidSymbol, start, TargetType::Guid)
        })
    }
}

/// Parse a string body as a GUID in any of the forms `uuid` accepts:
/// hyphenated, simple, braced or URN.
pub(crate) fn parse_guid<S: Symbol>(span: &[S]) -> Option<Uuid> {
    if span.iter().any(|c| c.ascii().is_none()) {
        return None;
    }
    Uuid::try_parse_ascii(&S::ascii_bytes(span)).ok()
}

/// First character of a string body, or the offset of the offending symbol.
pub(crate) fn decode_char<S: Symbol>(span: &[S]) -> std::result::Result<char, usize> {
    if span.first().and_then(|c| c.ascii()) != Some(REVERSE_SOLIDUS) {
        return S::first_char(span).ok_or(0);
    }
    let (c, _) = parse_escaped_char(span, 1).map_err(|e| e.offset())?;
    if c == char::REPLACEMENT_CHARACTER && decode_hex_escape(span, 2) != Ok(0xFFFD) {
        return Err(0);
    }
    Ok(c)
}
