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

use std::fmt::Display;
use std::fmt::Formatter;

use num_traits::CheckedAdd;
use num_traits::CheckedMul;

use crate::constants::MAX_DECIMAL_SCALE;
use crate::error::Error;
use crate::error::ParseErrorCode;
use crate::error::Result;
use crate::symbol::Symbol;

/// Represents a decimal number with 128-bit precision.
///
/// The value is stored as an integer mantissa with a scale factor, so the
/// decimal text of a JSON number survives without floating-point rounding.
/// A scale of 2 means the mantissa counts hundredths (`12345` is `123.45`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decimal128 {
    /// Number of decimal places
    pub scale: u8,
    /// The actual value, scaled by 10^scale
    pub value: i128,
}

impl Decimal128 {
    /// Converts the decimal value to a floating-point representation.
    ///
    /// Note that for very large values, this conversion may lose precision
    /// as f64 has limited precision compared to i128.
    pub fn to_float64(&self) -> f64 {
        let div = 10_f64.powi(self.scale as i32);
        self.value as f64 / div
    }
}

impl Display for Decimal128 {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.value);
        }
        let pow_scale = 10_u128.pow(self.scale as u32);
        let abs = self.value.unsigned_abs();
        let sign = if self.value < 0 { "-" } else { "" };
        write!(
            f,
            "{}{}.{:0>width$}",
            sign,
            abs / pow_scale,
            abs % pow_scale,
            width = self.scale as usize
        )
    }
}

/// Shift one decimal digit into `acc`, `None` on overflow.
#[inline]
pub(crate) fn push_digit<T>(acc: T, digit: u8) -> Option<T>
where
    T: CheckedMul + CheckedAdd + From<u8>,
{
    acc.checked_mul(&T::from(10))
        .and_then(|v| v.checked_add(&T::from(digit)))
}

/// Parse a number span as a [`Decimal128`].
///
/// Accepts an optional sign, integer and fraction digits (at least one digit
/// overall) and an optional exponent that shifts the scale. Offsets in
/// errors are relative to the start of `span`.
pub(crate) fn parse_decimal<S: Symbol>(span: &[S]) -> Result<Decimal128> {
    let at = |idx: usize| span.get(idx).and_then(|c| c.ascii());
    let invalid = |idx: usize| Error::Syntax(ParseErrorCode::InvalidNumberFormat, idx);
    let overflow = |idx: usize| Error::Syntax(ParseErrorCode::NumericOverflow, idx);

    let mut idx = 0;
    let mut negative = false;
    match at(idx) {
        Some(b'-') => {
            negative = true;
            idx += 1;
        }
        Some(b'+') => idx += 1,
        _ => {}
    }

    let mut value = 0_i128;
    let mut digits = 0;
    let mut fraction_digits = 0_i64;
    let mut seen_point = false;
    loop {
        match at(idx) {
            Some(c @ b'0'..=b'9') => {
                value = push_digit(value, c - b'0').ok_or_else(|| overflow(idx))?;
                digits += 1;
                if seen_point {
                    fraction_digits += 1;
                }
            }
            Some(b'.') if !seen_point => seen_point = true,
            _ => break,
        }
        idx += 1;
    }
    if digits == 0 {
        return Err(invalid(idx));
    }

    let mut exponent = 0_i64;
    if matches!(at(idx), Some(b'e' | b'E')) {
        idx += 1;
        let mut exponent_negative = false;
        match at(idx) {
            Some(b'-') => {
                exponent_negative = true;
                idx += 1;
            }
            Some(b'+') => idx += 1,
            _ => {}
        }
        let exponent_start = idx;
        while let Some(c @ b'0'..=b'9') = at(idx) {
            exponent = push_digit(exponent, c - b'0').ok_or_else(|| overflow(idx))?;
            idx += 1;
        }
        if idx == exponent_start {
            return Err(invalid(idx));
        }
        if exponent_negative {
            exponent = -exponent;
        }
    }
    if idx != span.len() {
        return Err(invalid(idx));
    }

    let mut scale = fraction_digits - exponent;
    if scale < 0 {
        if value != 0 {
            value = u32::try_from(-scale)
                .ok()
                .and_then(|shift| 10_i128.checked_pow(shift))
                .and_then(|pow| value.checked_mul(pow))
                .ok_or_else(|| overflow(0))?;
        }
        scale = 0;
    }
    if scale > MAX_DECIMAL_SCALE as i64 {
        return Err(overflow(0));
    }
    if negative {
        value = -value;
    }
    Ok(Decimal128 {
        scale: scale as u8,
        value,
    })
}
