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

//! `jsonspan` is a zero-copy JSON decoding engine. It reads JSON text held in one contiguous buffer of UTF-8 bytes or UTF-16 code units, and lets the caller pull typed values out of it in document order.
//!
//! ## Features
//!
//! - Pull API: a [`JsonReader`] keeps only a cursor into the buffer. Callers that know the shape of the document drive it with typed reads (`read_i64`, `read_string`, `read_date_time`, ...) and structural navigation (`read_begin_array_or_err`, `try_read_end_object_or_value_separator`, ...).
//! - Zero-copy: strings without escapes borrow from a UTF-8 buffer, and the dynamic [`Value`] keeps numbers and strings as raw spans until a typed conversion is asked for.
//! - Two encodings: every operation is generic over [`Symbol`], implemented for `u8` and `u16`.
//! - Bounded: recursion stops at `MAX_NESTING_DEPTH` nested containers, integers are checked for overflow, and every failure carries the offset where it happened.
//!
//! ## Escape accounting
//!
//! While looking for the end of a string the reader counts escapes: each `\` adds one, and a `\u` escape adds four more. The unescaped text then occupies exactly `len - escapes` UTF-16 code units.
//!
//! #### An example
//!
//! ```text
//! // JSON text
//! {"id": 7, "tags": ["a\u0041", "b"]}
//!
//! // pull reads
//! read_begin_object_or_err()                     {
//! try_read_end_object_or_value_separator(&mut 0) false
//! read_escaped_name()                            "id"
//! read_i64()                                     7
//! try_read_end_object_or_value_separator(&mut 1) false, `,` consumed
//! read_escaped_name()                            "tags"
//! skip_next_segment()                            ["a\u0041", "b"]
//! try_read_end_object_or_value_separator(&mut 2) true, `}` consumed
//! ```

#![allow(clippy::uninlined_format_args)]

mod constants;
mod datetime;
mod error;
mod number;
mod parser;
mod reader;
mod scalar;
mod skip;
mod symbol;
mod token;
mod util;
mod value;
mod version;

pub use constants::MAX_NESTING_DEPTH;
pub use datetime::parse_date_time;
pub use datetime::parse_duration;
pub use datetime::DateTime;
pub use datetime::DateTimeKind;
pub use error::Error;
pub use error::ParseErrorCode;
pub use error::Result;
pub use error::TargetType;
pub use number::Decimal128;
pub use parser::parse_value;
pub use parser::parse_value_utf16;
pub use reader::JsonReader;
pub use symbol::Symbol;
pub use token::JsonToken;
pub use value::*;
pub use version::ParseVersionError;
pub use version::Version;
