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

use thiserror::Error;

/// The kind of failure raised while decoding JSON text.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
#[non_exhaustive]
pub enum ParseErrorCode {
    #[error("EOF while parsing a value")]
    EndOfData,
    #[error("invalid symbol")]
    InvalidSymbol,
    #[error("invalid number format")]
    InvalidNumberFormat,
    #[error("numeric overflow")]
    NumericOverflow,
    #[error("expected double quote")]
    ExpectedDoubleQuote,
    #[error("expected begin array")]
    ExpectedBeginArray,
    #[error("expected begin object")]
    ExpectedBeginObject,
    #[error("expected end object")]
    ExpectedEndObject,
    #[error("expected separator")]
    ExpectedSeparator,
    #[error("nesting too deep")]
    NestingTooDeep,
    #[error("invalid string value")]
    InvalidStringValue,
    #[error("trailing characters")]
    UnexpectedTrailingCharacters,
}

/// The typed value a caller asked for when a decode failed.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[non_exhaustive]
pub enum TargetType {
    Bool,
    Char,
    DateTime,
    DateTimeOffset,
    Duration,
    Uri,
    Version,
    Guid,
}

impl Display for TargetType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TargetType::Bool => "bool",
            TargetType::Char => "char",
            TargetType::DateTime => "date time",
            TargetType::DateTimeOffset => "date time offset",
            TargetType::Duration => "duration",
            TargetType::Uri => "uri",
            TargetType::Version => "version",
            TargetType::Guid => "guid",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum Error {
    #[error("{0}, pos {1}")]
    Syntax(ParseErrorCode, usize),
    #[error("{0} while reading {2}, pos {1}")]
    Unexpected(ParseErrorCode, usize, TargetType),
}

impl Error {
    pub fn code(&self) -> ParseErrorCode {
        match self {
            Error::Syntax(code, _) | Error::Unexpected(code, _, _) => *code,
        }
    }

    /// Offset of the failure in symbols from the start of the buffer.
    pub fn offset(&self) -> usize {
        match self {
            Error::Syntax(_, pos) | Error::Unexpected(_, pos, _) => *pos,
        }
    }

    pub fn target(&self) -> Option<TargetType> {
        match self {
            Error::Syntax(_, _) => None,
            Error::Unexpected(_, _, target) => Some(*target),
        }
    }

    /// Rebase an error raised over a sub-span onto the enclosing buffer.
    pub(crate) fn shifted(self, base: usize) -> Error {
        match self {
            Error::Syntax(code, pos) => Error::Syntax(code, base + pos),
            Error::Unexpected(code, pos, target) => Error::Unexpected(code, base + pos, target),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
