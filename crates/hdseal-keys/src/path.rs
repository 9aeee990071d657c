//! Derivation paths.
//!
//! A path names a position in the key tree:
//!
//! ```text
//! m/schema:1'/recovery:1'/invoices:4/7
//! ```
//!
//! ## Grammar
//!
//! - The path starts with `m`, the master key
//! - Each `/`-separated segment is `[name:]index[']`
//! - `name` is an optional label made of alphanumerics, `_` and `-`; it does
//!   not take part in derivation
//! - `index` is a decimal integer below 2^31
//! - A trailing `'` (or `h`) marks a hardened segment
//!
//! Labels are kept so a path prints back the way it was written, but two
//! paths with the same indices address the same key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::limits::{HARDENED_OFFSET, MAX_PATH_DEPTH};
use crate::{KeyError, Result};

/// One step in a derivation path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PathSegment {
    name: Option<String>,
    index: u32,
    hardened: bool,
}

impl PathSegment {
    /// Create a non-hardened segment.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::InvalidChild` if `index` is 2^31 or above.
    pub fn normal(index: u32) -> Result<Self> {
        Self::new(None, index, false)
    }

    /// Create a hardened segment.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::InvalidChild` if `index` is 2^31 or above.
    pub fn hardened(index: u32) -> Result<Self> {
        Self::new(None, index, true)
    }

    fn new(name: Option<String>, index: u32, hardened: bool) -> Result<Self> {
        if index >= HARDENED_OFFSET {
            return Err(KeyError::InvalidChild { index });
        }
        Ok(Self {
            name,
            index,
            hardened,
        })
    }

    /// Attach a label to this segment.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The optional label.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The index without the hardened bit.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Whether this segment is hardened.
    pub fn is_hardened(&self) -> bool {
        self.hardened
    }

    /// The BIP32 child number, with the hardened bit set when applicable.
    pub fn child_number(&self) -> u32 {
        if self.hardened {
            self.index | HARDENED_OFFSET
        } else {
            self.index
        }
    }

    fn parse(path: &str, segment: &str) -> Result<Self> {
        let invalid = |reason: String| KeyError::InvalidPath {
            path: path.to_string(),
            reason,
        };

        let (name, rest) = match segment.split_once(':') {
            Some((name, rest)) => {
                if name.is_empty() {
                    return Err(invalid("empty segment label".into()));
                }
                if !name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
                {
                    return Err(invalid(format!("invalid segment label '{}'", name)));
                }
                (Some(name.to_string()), rest)
            }
            None => (None, segment),
        };

        let (digits, hardened) = match rest.strip_suffix(is_hardened_marker) {
            Some(digits) => (digits, true),
            None => (rest, false),
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid(format!("invalid segment index '{}'", rest)));
        }

        let index: u32 = digits
            .parse()
            .map_err(|_| invalid(format!("segment index '{}' out of range", digits)))?;
        if index >= HARDENED_OFFSET {
            return Err(invalid(format!("segment index {} out of range", index)));
        }

        Ok(Self {
            name,
            index,
            hardened,
        })
    }
}

fn is_hardened_marker(c: char) -> bool {
    matches!(c, '\'' | 'h' | 'H')
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{}:", name)?;
        }
        write!(f, "{}", self.index)?;
        if self.hardened {
            write!(f, "'")?;
        }
        Ok(())
    }
}

/// A parsed derivation path, starting at the master key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DerivationPath {
    segments: Vec<PathSegment>,
}

impl DerivationPath {
    /// The path of the master key, `m`.
    pub fn master() -> Self {
        Self::default()
    }

    /// Parse a path string.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::InvalidPath` for malformed input and
    /// `KeyError::DepthExceeded` for paths with more than 255 segments.
    ///
    /// # Examples
    ///
    /// ```
    /// use hdseal_keys::DerivationPath;
    ///
    /// let path = DerivationPath::parse("m/schema:1'/0").unwrap();
    /// assert_eq!(path.depth(), 2);
    /// assert!(DerivationPath::parse("1/2").is_err());
    /// ```
    pub fn parse(path: &str) -> Result<Self> {
        let rest = path.strip_prefix('m').ok_or_else(|| KeyError::InvalidPath {
            path: path.to_string(),
            reason: "path must start with 'm'".into(),
        })?;

        if rest.is_empty() {
            return Ok(Self::master());
        }

        let rest = rest.strip_prefix('/').ok_or_else(|| KeyError::InvalidPath {
            path: path.to_string(),
            reason: "expected '/' after 'm'".into(),
        })?;

        let mut segments = Vec::new();
        for part in rest.split('/') {
            if segments.len() == MAX_PATH_DEPTH {
                return Err(KeyError::DepthExceeded { max: MAX_PATH_DEPTH });
            }
            if part.is_empty() {
                return Err(KeyError::InvalidPath {
                    path: path.to_string(),
                    reason: "empty segment".into(),
                });
            }
            segments.push(PathSegment::parse(path, part)?);
        }

        Ok(Self { segments })
    }

    /// The segments below the master key.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Number of segments; the master key has depth 0.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Whether any segment is hardened.
    pub fn has_hardened(&self) -> bool {
        self.segments.iter().any(PathSegment::is_hardened)
    }

    /// Return this path extended by one segment.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::DepthExceeded` if the result would be too deep.
    pub fn child(&self, segment: PathSegment) -> Result<Self> {
        if self.segments.len() >= MAX_PATH_DEPTH {
            return Err(KeyError::DepthExceeded { max: MAX_PATH_DEPTH });
        }
        let mut segments = self.segments.clone();
        segments.push(segment);
        Ok(Self { segments })
    }

    /// Whether `other` is this path or a descendant of it.
    ///
    /// Only child numbers are compared; labels are ignored.
    pub fn is_prefix_of(&self, other: &DerivationPath) -> bool {
        self.segments.len() <= other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| a.child_number() == b.child_number())
    }

    /// The segments of `other` below this path, if this path is a prefix.
    pub fn suffix_of<'a>(&self, other: &'a DerivationPath) -> Option<&'a [PathSegment]> {
        self.is_prefix_of(other)
            .then(|| &other.segments[self.segments.len()..])
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DerivationPath {
    type Error = KeyError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<DerivationPath> for String {
    fn from(path: DerivationPath) -> Self {
        path.to_string()
    }
}
