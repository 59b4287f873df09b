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
use std::fmt::Debug;

mod private {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
}

/// A unit of JSON text in the input buffer.
///
/// The reader is generic over the encoding of the buffer: `u8` for UTF-8
/// text and `u16` for UTF-16 code units. Every structural and numeric symbol
/// of JSON is ASCII, so the tokenizer only ever looks at [`Symbol::ascii`];
/// text content is decoded through the remaining methods.
pub trait Symbol: private::Sealed + Copy + Eq + Debug + Send + Sync + 'static {
    /// Upper bound of UTF-8 bytes a single symbol decodes to.
    const MAX_UTF8_LEN: usize;

    /// The ASCII value of this symbol, `None` outside of `0x00..0x80`.
    fn ascii(self) -> Option<u8>;

    /// Decode a run of symbols as text, borrowing when the encoding allows it.
    fn decode(span: &[Self]) -> Option<Cow<'_, str>>;

    /// Append a decoded run of symbols to `out`, `false` if the run is not
    /// valid text.
    fn decode_into(span: &[Self], out: &mut String) -> bool;

    /// View a span that is known to hold only ASCII symbols as bytes.
    fn ascii_bytes(span: &[Self]) -> Cow<'_, [u8]>;

    /// Number of UTF-16 code units the decoded span occupies.
    fn utf16_len(span: &[Self]) -> Option<usize>;

    /// First code point of the decoded span.
    fn first_char(span: &[Self]) -> Option<char>;
}

impl Symbol for u8 {
    const MAX_UTF8_LEN: usize = 1;

    #[inline]
    fn ascii(self) -> Option<u8> {
        if self.is_ascii() {
            Some(self)
        } else {
            None
        }
    }

    #[inline]
    fn decode(span: &[u8]) -> Option<Cow<'_, str>> {
        std::str::from_utf8(span).ok().map(Cow::Borrowed)
    }

    #[inline]
    fn decode_into(span: &[u8], out: &mut String) -> bool {
        match std::str::from_utf8(span) {
            Ok(s) => {
                out.push_str(s);
                true
            }
            Err(_) => false,
        }
    }

    #[inline]
    fn ascii_bytes(span: &[u8]) -> Cow<'_, [u8]> {
        Cow::Borrowed(span)
    }

    fn utf16_len(span: &[u8]) -> Option<usize> {
        std::str::from_utf8(span)
            .ok()
            .map(|s| s.encode_utf16().count())
    }

    fn first_char(span: &[u8]) -> Option<char> {
        // only the leading code point has to be well formed
        let len = match span.first()? {
            0x00..=0x7F => 1,
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            _ => 4,
        };
        let head = span.get(..len)?;
        std::str::from_utf8(head).ok()?.chars().next()
    }
}

impl Symbol for u16 {
    const MAX_UTF8_LEN: usize = 3;

    #[inline]
    fn ascii(self) -> Option<u8> {
        if self < 0x80 {
            Some(self as u8)
        } else {
            None
        }
    }

    #[inline]
    fn decode(span: &[u16]) -> Option<Cow<'_, str>> {
        String::from_utf16(span).ok().map(Cow::Owned)
    }

    fn decode_into(span: &[u16], out: &mut String) -> bool {
        for c in char::decode_utf16(span.iter().copied()) {
            match c {
                Ok(c) => out.push(c),
                Err(_) => return false,
            }
        }
        true
    }

    fn ascii_bytes(span: &[u16]) -> Cow<'_, [u8]> {
        Cow::Owned(span.iter().map(|c| *c as u8).collect())
    }

    fn utf16_len(span: &[u16]) -> Option<usize> {
        if char::decode_utf16(span.iter().copied()).all(|c| c.is_ok()) {
            Some(span.len())
        } else {
            None
        }
    }

    fn first_char(span: &[u16]) -> Option<char> {
        char::decode_utf16(span.iter().copied()).next()?.ok()
    }
}
