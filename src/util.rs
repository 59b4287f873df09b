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

use super::constants::*;
use super::error::Error;
use super::error::ParseErrorCode;
use super::error::Result;
use super::symbol::Symbol;

#[allow(clippy::zero_prefixed_literal)]
static HEX: [u8; 256] = {
    const __: u8 = 255; // not a hex digit
    [
        //   1   2   3   4   5   6   7   8   9   A   B   C   D   E   F
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 0
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 1
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 2
        00, 01, 02, 03, 04, 05, 06, 07, 08, 09, __, __, __, __, __, __, // 3
        __, 10, 11, 12, 13, 14, 15, __, __, __, __, __, __, __, __, __, // 4
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 5
        __, 10, 11, 12, 13, 14, 15, __, __, __, __, __, __, __, __, __, // 6
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 7
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 8
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 9
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // A
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // B
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // C
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // D
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // E
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // F
    ]
};

/// Unescape a string body in a single pass.
///
/// `escapes` is the count reported by `find_string_end`; the decoded text
/// occupies exactly `utf16_len(data) - escapes` UTF-16 code units. That does
/// not give an exact UTF-8 size, so the output buffer is allocated once for
/// the worst case and `escapes` is only checked in debug builds. Errors carry
/// offsets relative to the start of `data`.
pub(crate) fn unescape<S: Symbol>(data: &[S], escapes: usize) -> Result<String> {
    let mut buf = String::with_capacity(data.len() * S::MAX_UTF8_LEN);
    let mut from = 0;
    let mut idx = 0;
    while idx < data.len() {
        if data[idx].ascii() != Some(REVERSE_SOLIDUS) {
            idx += 1;
            continue;
        }
        // copy the verbatim run up to the escape marker
        if !S::decode_into(&data[from..idx], &mut buf) {
            return Err(Error::Syntax(ParseErrorCode::InvalidStringValue, from));
        }
        let (c, next) = parse_escaped_char(data, idx + 1)?;
        buf.push(c);
        idx = next;
        from = idx;
    }
    if from < data.len() && !S::decode_into(&data[from..], &mut buf) {
        return Err(Error::Syntax(ParseErrorCode::InvalidStringValue, from));
    }
    debug_assert_eq!(
        S::utf16_len(data).map(|n| n - escapes),
        Some(buf.encode_utf16().count())
    );
    Ok(buf)
}

/// Decode the escape whose selector is at `idx`, returning the character
/// and the index just past the escape.
///
/// Surrogate pairs spelled as two `\u` escapes are combined; an unpaired
/// surrogate decodes to U+FFFD so every escape still yields one UTF-16 unit.
pub(crate) fn parse_escaped_char<S: Symbol>(data: &[S], idx: usize) -> Result<(char, usize)> {
    let selector = match data.get(idx) {
        Some(c) => c.ascii(),
        None => return Err(Error::Syntax(ParseErrorCode::EndOfData, idx)),
    };
    match selector {
        Some(b'u' | b'U') => {
            let hex_idx = idx + 1;
            let n1 = decode_hex_escape(data, hex_idx)?;
            let next = hex_idx + UNICODE_LEN;
            let c = match n1 {
                0xD800..=0xDBFF => {
                    // Non-BMP characters are encoded as a sequence of two hex
                    // escapes, representing UTF-16 surrogates.
                    if let Some(n2) = low_surrogate_at(data, next) {
                        #[allow(clippy::precedence)]
                        let n = (((n1 - 0xD800) as u32) << 10 | (n2 - 0xDC00) as u32) + 0x1_0000;
                        if let Some(c) = char::from_u32(n) {
                            return Ok((c, next + 2 + UNICODE_LEN));
                        }
                    }
                    char::REPLACEMENT_CHARACTER
                }
                n => char::from_u32(n as u32).unwrap_or(char::REPLACEMENT_CHARACTER),
            };
            Ok((c, next))
        }
        Some(c) => match simple_escape(c) {
            Some(c) => Ok((c, idx + 1)),
            None => Err(Error::Syntax(ParseErrorCode::InvalidSymbol, idx)),
        },
        None => Err(Error::Syntax(ParseErrorCode::InvalidSymbol, idx)),
    }
}

#[inline]
fn low_surrogate_at<S: Symbol>(data: &[S], idx: usize) -> Option<u16> {
    let marker = data.get(idx)?.ascii()?;
    let selector = data.get(idx + 1)?.ascii()?;
    if marker != REVERSE_SOLIDUS || !matches!(selector, b'u' | b'U') {
        return None;
    }
    match decode_hex_escape(data, idx + 2) {
        Ok(n @ 0xDC00..=0xDFFF) => Some(n),
        _ => None,
    }
}

/// The character a one-symbol escape selector stands for.
#[inline]
pub(crate) fn simple_escape(selector: u8) -> Option<char> {
    let c = match selector {
        b'\\' => BS,
        b'"' => QU,
        b'/' => SD,
        b'b' => BB,
        b'f' => FF,
        b'n' => NN,
        b'r' => RR,
        b't' => TT,
        _ => return None,
    };
    Some(c)
}

#[inline]
fn decode_hex_val(val: u8) -> Option<u16> {
    let n = HEX[val as usize] as u16;
    if n == 255 {
        None
    } else {
        Some(n)
    }
}

/// Decode the four hex symbols starting at `idx`, either case.
#[inline]
pub(crate) fn decode_hex_escape<S: Symbol>(data: &[S], idx: usize) -> Result<u16> {
    let mut n = 0;
    for i in idx..idx + UNICODE_LEN {
        let c = match data.get(i) {
            Some(c) => c,
            None => return Err(Error::Syntax(ParseErrorCode::EndOfData, i)),
        };
        match c.ascii().and_then(decode_hex_val) {
            Some(hex) => n = (n << 4) + hex,
            None => return Err(Error::Syntax(ParseErrorCode::InvalidSymbol, i)),
        }
    }
    Ok(n)
}
