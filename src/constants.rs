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

// JSON text structural constants
pub(crate) const BEGIN_OBJECT: u8 = b'{';
pub(crate) const END_OBJECT: u8 = b'}';
pub(crate) const BEGIN_ARRAY: u8 = b'[';
pub(crate) const END_ARRAY: u8 = b']';
pub(crate) const DOUBLE_QUOTE: u8 = b'"';
pub(crate) const REVERSE_SOLIDUS: u8 = b'\\';
pub(crate) const VALUE_SEPARATOR: u8 = b',';
pub(crate) const NAME_SEPARATOR: u8 = b':';

// JSON text literals
pub(crate) const TRUE_LITERAL: &[u8] = b"true";
pub(crate) const FALSE_LITERAL: &[u8] = b"false";
pub(crate) const NULL_LITERAL: &[u8] = b"null";

// JSON text constants
pub(crate) const UNICODE_LEN: usize = 4;

// JSON text escape characters constants
pub(crate) const BS: char = '\x5C'; // \\ Backslash
pub(crate) const QU: char = '\x22'; // \" Double quotation mark
pub(crate) const SD: char = '\x2F'; // \/ Slash or divide
pub(crate) const BB: char = '\x08'; // \b Backspace
pub(crate) const FF: char = '\x0C'; // \f Formfeed Page Break
pub(crate) const NN: char = '\x0A'; // \n Newline
pub(crate) const RR: char = '\x0D'; // \r Carriage Return
pub(crate) const TT: char = '\x09'; // \t Horizontal Tab

/// Maximum number of nested arrays and objects accepted by the
/// materializer and the segment skipper.
pub const MAX_NESTING_DEPTH: usize = 256;

// Date and time grammar
pub(crate) const MIN_DATE_TIME_LEN: usize = 19;
pub(crate) const MAX_FRACTION_DIGITS: usize = 7;
pub(crate) const NANOS_PER_TICK: i64 = 100;

// Decimal limits
pub(crate) const MAX_DECIMAL_SCALE: u32 = 38;
