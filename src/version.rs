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
use std::str::FromStr;

use thiserror::Error;

/// A `major.minor[.build[.revision]]` version number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub build: Option<u32>,
    pub revision: Option<u32>,
}

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum ParseVersionError {
    #[error("expected 2 to 4 version components, found {0}")]
    ComponentCount(usize),
    #[error("invalid version component at index {0}")]
    InvalidComponent(usize),
}

impl Version {
    pub fn new(major: u32, minor: u32) -> Version {
        Version {
            major,
            minor,
            build: None,
            revision: None,
        }
    }
}

impl FromStr for Version {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        if !(2..=4).contains(&parts.len()) {
            return Err(ParseVersionError::ComponentCount(parts.len()));
        }
        let mut components = [None; 4];
        for (i, part) in parts.iter().enumerate() {
            // components are plain decimal digits, `u32::from_str` alone would allow `+`
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ParseVersionError::InvalidComponent(i));
            }
            let value = part
                .parse::<u32>()
                .map_err(|_| ParseVersionError::InvalidComponent(i))?;
            components[i] = Some(value);
        }
        Ok(Version {
            major: components[0].unwrap_or_default(),
            minor: components[1].unwrap_or_default(),
            build: components[2],
            revision: components[3],
        })
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if let Some(build) = self.build {
            write!(f, ".{}", build)?;
            if let Some(revision) = self.revision {
                write!(f, ".{}", revision)?;
            }
        }
        Ok(())
    }
}
