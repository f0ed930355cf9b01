use std::fmt;
use std::str::FromStr;

use crate::error::{EntCertError, Result};

/// Certificate format version as sent by the entitlement server, e.g. `"3.2"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    text: String,
    segments: Vec<u64>,
}

impl Version {
    /// The version implied when a certificate carries no version extension.
    pub const DEFAULT: &'static str = "1.0";

    pub fn segments(&self) -> &[u64] {
        &self.segments
    }

    pub fn major(&self) -> u64 {
        self.segments[0]
    }

    /// Second segment, or `0` when the version is a bare major number.
    pub fn minor(&self) -> u64 {
        self.segments.get(1).copied().unwrap_or(0)
    }
}

impl Default for Version {
    fn default() -> Self {
        Self {
            text: Self::DEFAULT.to_string(),
            segments: vec![1, 0],
        }
    }
}

impl FromStr for Version {
    type Err = EntCertError;

    fn from_str(s: &str) -> Result<Self> {
        let segments = s
            .split('.')
            .map(|segment| {
                if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(EntCertError::invalid_field("version", s));
                }
                segment
                    .parse::<u64>()
                    .map_err(|_| EntCertError::invalid_field("version", s))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            text: s.to_string(),
            segments,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Major format generations this crate knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MajorVersion {
    V1,
    /// Reserved for formats without a reader yet.
    Unsupported(u64),
}

impl From<&Version> for MajorVersion {
    fn from(version: &Version) -> Self {
        match version.major() {
            1 => MajorVersion::V1,
            other => MajorVersion::Unsupported(other),
        }
    }
}
