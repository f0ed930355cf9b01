//! Hierarchical dotted identifiers and wildcard patterns over them.
//!
//! An [`Oid`] here is a plain sequence of numeric arcs, not a DER object identifier:
//! extension keys are re-rooted and sliced freely while walking the vendor namespace,
//! which produces paths such as `1` or `4.1` that are not valid ASN.1 OIDs.

use std::fmt;
use std::str::FromStr;

use crate::error::{EntCertError, Result};

/// An immutable, non-empty dotted identifier such as `1.3.6.1.4.1.2312.9`.
///
/// Ordering is segment-wise lexicographic. Segments are unsigned 128-bit
/// integers, wide enough for UUID arcs under `2.25`; a longer arc is rejected
/// as `MalformedIdentifier`.
///
/// # Example
/// ```
/// use entcert::oid::Oid;
///
/// let oid: Oid = "1.3.6.1".parse().unwrap();
/// assert_eq!(oid.len(), 4);
/// assert_eq!(oid.ltrim(2).unwrap().to_string(), "6.1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Oid {
    segments: Vec<u128>,
}

impl Oid {
    /// Creates an identifier from its segments.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `segments` is empty.
    pub fn new(segments: Vec<u128>) -> Result<Self> {
        if segments.is_empty() {
            return Err(EntCertError::InvalidArgument(
                "identifier must have at least one segment".to_string(),
            ));
        }
        Ok(Self { segments })
    }

    /// Non-empty constant segment lists only.
    pub(crate) fn from_static(segments: &[u128]) -> Self {
        debug_assert!(!segments.is_empty());
        Self {
            segments: segments.to_vec(),
        }
    }

    pub fn segments(&self) -> &[u128] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always `false`; identifiers cannot be empty.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the segment at `index`.
    ///
    /// # Errors
    /// Returns `IndexOutOfRange` if `index >= self.len()`.
    pub fn at(&self, index: usize) -> Result<u128> {
        self.segments
            .get(index)
            .copied()
            .ok_or(EntCertError::IndexOutOfRange {
                index,
                len: self.len(),
            })
    }

    /// Drops the last `n` segments.
    ///
    /// # Errors
    /// Returns `InvalidArgument` unless `n < self.len()`.
    pub fn rtrim(&self, n: usize) -> Result<Self> {
        self.check_trim(n)?;
        Ok(Self {
            segments: self.segments[..self.len() - n].to_vec(),
        })
    }

    /// Drops the first `n` segments.
    ///
    /// # Errors
    /// Returns `InvalidArgument` unless `n < self.len()`.
    pub fn ltrim(&self, n: usize) -> Result<Self> {
        self.check_trim(n)?;
        Ok(Self {
            segments: self.segments[n..].to_vec(),
        })
    }

    fn check_trim(&self, n: usize) -> Result<()> {
        if n >= self.len() {
            return Err(EntCertError::InvalidArgument(format!(
                "cannot trim {n} segments from {self}"
            )));
        }
        Ok(())
    }

    /// Whether every segment of `prefix` leads this identifier.
    pub fn starts_with(&self, prefix: &Oid) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// Appends `suffix` to this identifier.
    pub fn join(&self, suffix: &Oid) -> Self {
        let mut segments = Vec::with_capacity(self.len() + suffix.len());
        segments.extend_from_slice(&self.segments);
        segments.extend_from_slice(&suffix.segments);
        Self { segments }
    }
}

fn parse_segment(segment: &str, whole: &str) -> Result<u128> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EntCertError::MalformedIdentifier(whole.to_string()));
    }
    segment
        .parse()
        .map_err(|_| EntCertError::MalformedIdentifier(whole.to_string()))
}

impl FromStr for Oid {
    type Err = EntCertError;

    fn from_str(s: &str) -> Result<Self> {
        let segments = s
            .split('.')
            .map(|segment| parse_segment(segment, s))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { segments })
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// One position of an [`OidPattern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arc {
    /// Matches exactly this segment value.
    Literal(u128),
    /// Matches any single segment.
    Any,
}

/// A fixed-length identifier pattern, written like `2.*.1.1`.
///
/// A pattern only matches identifiers of the same length; `*` never spans
/// more than one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OidPattern {
    arcs: Vec<Arc>,
}

impl OidPattern {
    pub fn arcs(&self) -> &[Arc] {
        &self.arcs
    }

    pub fn matches(&self, oid: &Oid) -> bool {
        self.arcs.len() == oid.len()
            && self
                .arcs
                .iter()
                .zip(oid.segments())
                .all(|(arc, segment)| match arc {
                    Arc::Literal(value) => value == segment,
                    Arc::Any => true,
                })
    }
}

impl FromStr for OidPattern {
    type Err = EntCertError;

    fn from_str(s: &str) -> Result<Self> {
        let arcs = s
            .split('.')
            .map(|segment| match segment {
                "*" => Ok(Arc::Any),
                _ => parse_segment(segment, s).map(Arc::Literal),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { arcs })
    }
}

impl fmt::Display for OidPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arc) in self.arcs.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            match arc {
                Arc::Literal(value) => write!(f, "{value}")?,
                Arc::Any => f.write_str("*")?,
            }
        }
        Ok(())
    }
}
