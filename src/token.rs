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

/// Classification of the next meaningful symbol in a JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonToken {
    /// End of input, or a symbol that cannot start a token.
    None,
    BeginObject,
    EndObject,
    BeginArray,
    EndArray,
    String,
    Number,
    True,
    False,
    Null,
    ValueSeparator,
    NameSeparator,
}

impl JsonToken {
    #[inline]
    pub(crate) fn classify(c: Option<u8>) -> JsonToken {
        match c {
            Some(BEGIN_OBJECT) => JsonToken::BeginObject,
            Some(END_OBJECT) => JsonToken::EndObject,
            Some(BEGIN_ARRAY) => JsonToken::BeginArray,
            Some(END_ARRAY) => JsonToken::EndArray,
            Some(DOUBLE_QUOTE) => JsonToken::String,
            Some(b't') => JsonToken::True,
            Some(b'f') => JsonToken::False,
            Some(b'n') => JsonToken::Null,
            Some(VALUE_SEPARATOR) => JsonToken::ValueSeparator,
            Some(NAME_SEPARATOR) => JsonToken::NameSeparator,
            Some(b'-' | b'0'..=b'9') => JsonToken::Number,
            _ => JsonToken::None,
        }
    }

    /// Whether the token can start a value.
    pub fn is_value(&self) -> bool {
        matches!(
            self,
            JsonToken::BeginObject
                | JsonToken::BeginArray
                | JsonToken::String
                | JsonToken::Number
                | JsonToken::True
                | JsonToken::False
                | JsonToken::Null
        )
    }
}
