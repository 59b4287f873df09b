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

//! Fixed-grammar parsers for ISO-8601 date-times and constant-format
//! durations.
//!
//! Both parsers work on an already extracted string body, never backtrack,
//! and report failure as `None`; range errors raised while building the
//! calendar values are folded into that same `None`.

use jiff::civil;
use jiff::tz::Offset;
use jiff::tz::TimeZone;
use jiff::SignedDuration;
use jiff::Timestamp;
use jiff::Zoned;

use crate::constants::MAX_FRACTION_DIGITS;
use crate::constants::MIN_DATE_TIME_LEN;
use crate::constants::NANOS_PER_TICK;
use crate::symbol::Symbol;

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;
const MAX_OFFSET_HOURS: i32 = 14;
const MAX_DURATION_DAY_DIGITS: usize = 8;

/// How the offset of a parsed date-time was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTimeKind {
    /// No offset designator, the value is a local/unspecified wall time.
    Unspecified,
    /// `Z` designator.
    Utc,
    /// Explicit `+hh:mm` or `-hh:mm` offset.
    Offset(Offset),
}

/// A date-time read from JSON text together with its offset tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTime {
    /// Wall-clock date and time, fraction included.
    pub civil: civil::DateTime,
    /// Fraction digits as written, in ticks of 100 ns. The digits are
    /// accumulated without positional scaling, so `.768` is 768 ticks.
    pub ticks: u32,
    pub kind: DateTimeKind,
}

impl DateTime {
    /// The offset from UTC, `None` for unspecified values.
    pub fn offset(&self) -> Option<Offset> {
        match self.kind {
            DateTimeKind::Unspecified => None,
            DateTimeKind::Utc => Some(Offset::UTC),
            DateTimeKind::Offset(offset) => Some(offset),
        }
    }

    /// The absolute instant, `None` for unspecified values.
    pub fn to_timestamp(&self) -> Option<Timestamp> {
        self.offset()?.to_timestamp(self.civil).ok()
    }

    /// Attach a time zone: the parsed offset when there is one, `local`
    /// for unspecified values.
    pub fn to_zoned(&self, local: TimeZone) -> Result<Zoned, jiff::Error> {
        match self.offset() {
            Some(offset) => self.civil.to_zoned(offset.to_time_zone()),
            None => self.civil.to_zoned(local),
        }
    }
}

#[inline]
fn ascii_at<S: Symbol>(source: &[S], idx: usize) -> Option<u8> {
    source.get(idx).and_then(|c| c.ascii())
}

#[inline]
fn digit_at<S: Symbol>(source: &[S], idx: usize) -> Option<u32> {
    match ascii_at(source, idx)? {
        c @ b'0'..=b'9' => Some((c - b'0') as u32),
        _ => None,
    }
}

/// Exactly `len` digits starting at `idx`.
#[inline]
fn fixed_digits<S: Symbol>(source: &[S], idx: usize, len: usize) -> Option<u32> {
    let mut value = 0;
    for i in idx..idx + len {
        value = value * 10 + digit_at(source, i)?;
    }
    Some(value)
}

/// Between one and `max` digits starting at `idx`, with the count read.
#[inline]
fn variable_digits<S: Symbol>(source: &[S], idx: usize, max: usize) -> Option<(u64, usize)> {
    let mut value = 0_u64;
    let mut len = 0;
    while len < max {
        match digit_at(source, idx + len) {
            Some(d) => value = value * 10 + d as u64,
            None => break,
        }
        len += 1;
    }
    if len == 0 {
        None
    } else {
        Some((value, len))
    }
}

#[inline]
fn expect<S: Symbol>(source: &[S], idx: usize, c: u8) -> Option<()> {
    if ascii_at(source, idx) == Some(c) {
        Some(())
    } else {
        None
    }
}

/// Parse `YYYY-MM-DDThh:mm:ss[.f{1,7}][Z|(+|-)hh:mm]`.
///
/// Returns the value and the number of symbols consumed. Symbols after the
/// grammar are left alone, callers decide whether they are allowed.
pub fn parse_date_time<S: Symbol>(source: &[S]) -> Option<(DateTime, usize)> {
    if source.len() < MIN_DATE_TIME_LEN {
        return None;
    }

    let year = fixed_digits(source, 0, 4)?;
    expect(source, 4, b'-')?;
    let month = fixed_digits(source, 5, 2)?;
    expect(source, 7, b'-')?;
    let day = fixed_digits(source, 8, 2)?;
    expect(source, 10, b'T')?;
    let hour = fixed_digits(source, 11, 2)?;
    expect(source, 13, b':')?;
    let minute = fixed_digits(source, 14, 2)?;
    expect(source, 16, b':')?;
    let second = fixed_digits(source, 17, 2)?;

    // up until here everything is fixed
    let mut pos = MIN_DATE_TIME_LEN;

    let mut ticks = 0;
    if source.len() > pos + 1 && ascii_at(source, pos) == Some(b'.') {
        pos += 1;
        let (fraction, len) = variable_digits(source, pos, MAX_FRACTION_DIGITS)?;
        ticks = fraction as u32;
        pos += len;
    }

    let kind = match ascii_at(source, pos) {
        Some(b'Z') => {
            pos += 1;
            DateTimeKind::Utc
        }
        Some(sign @ (b'+' | b'-')) => {
            pos += 1;
            let hours = fixed_digits(source, pos, 2)? as i32;
            expect(source, pos + 2, b':')?;
            let minutes = fixed_digits(source, pos + 3, 2)? as i32;
            pos += 5;
            if minutes > 59 || hours * 60 + minutes > MAX_OFFSET_HOURS * 60 {
                return None;
            }
            let mut seconds = hours * 3600 + minutes * 60;
            if sign == b'-' {
                seconds = -seconds;
            }
            DateTimeKind::Offset(Offset::from_seconds(seconds).ok()?)
        }
        _ => DateTimeKind::Unspecified,
    };

    if year == 0 {
        return None;
    }
    let civil = civil::DateTime::new(
        year as i16,
        month as i8,
        day as i8,
        hour as i8,
        minute as i8,
        second as i8,
        ticks as i32 * NANOS_PER_TICK as i32,
    )
    .ok()?;
    Some((DateTime { civil, ticks, kind }, pos))
}

/// Parse a constant-format duration: `[-]d` or `[-][d.]h:mm[:ss[.f{1,7}]]`.
///
/// Hours are below 24, minutes and seconds below 60. Unlike the date-time
/// grammar the fraction is positional, `.5` is half a second.
pub fn parse_duration<S: Symbol>(source: &[S]) -> Option<(SignedDuration, usize)> {
    let mut pos = 0;
    let negative = ascii_at(source, pos) == Some(b'-');
    if negative {
        pos += 1;
    }

    let (first, len) = variable_digits(source, pos, MAX_DURATION_DAY_DIGITS)?;
    pos += len;

    let (days, hours) = match ascii_at(source, pos) {
        Some(b'.') => {
            pos += 1;
            let (hours, len) = variable_digits(source, pos, 2)?;
            pos += len;
            (first, hours)
        }
        Some(b':') if len <= 2 => (0, first),
        Some(b':') => return None,
        _ => {
            let secs = (first as i64).checked_mul(SECONDS_PER_DAY)?;
            return Some((signed(SignedDuration::new(secs, 0), negative), pos));
        }
    };

    expect(source, pos, b':')?;
    let minutes = fixed_digits(source, pos + 1, 2)? as u64;
    pos += 3;

    let mut seconds = 0;
    let mut nanos = 0;
    if ascii_at(source, pos) == Some(b':') {
        seconds = fixed_digits(source, pos + 1, 2)? as u64;
        pos += 3;
        if ascii_at(source, pos) == Some(b'.') && digit_at(source, pos + 1).is_some() {
            pos += 1;
            let (fraction, len) = variable_digits(source, pos, MAX_FRACTION_DIGITS)?;
            pos += len;
            let ticks = fraction * 10_u64.pow((MAX_FRACTION_DIGITS - len) as u32);
            nanos = ticks as i32 * NANOS_PER_TICK as i32;
        }
    }

    if hours > 23 || minutes > 59 || seconds > 59 {
        return None;
    }
    let secs = (days as i64)
        .checked_mul(SECONDS_PER_DAY)?
        .checked_add(hours as i64 * SECONDS_PER_HOUR)?
        .checked_add(minutes as i64 * SECONDS_PER_MINUTE)?
        .checked_add(seconds as i64)?;
    Some((signed(SignedDuration::new(secs, nanos), negative), pos))
}

#[inline]
fn signed(duration: SignedDuration, negative: bool) -> SignedDuration {
    if negative {
        -duration
    } else {
        duration
    }
}
