use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// A positional identifier for a container.
///
/// Format: dash-separated non-negative integers (e.g. `"0-1-2"`), encoding
/// the full path from the root container (`"0"`) down to the identified node.
/// A child's id is always its parent's id followed by `-k` for some
/// non-negative integer `k`, so the id carries both identity and location.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContainerId {
    segments: Vec<u32>,
}

impl ContainerId {
    /// The id of a root container: `"0"`.
    #[must_use]
    pub fn root() -> Self {
        Self { segments: vec![0] }
    }

    /// Returns the path segments from the root to this container.
    #[must_use]
    pub fn segments(&self) -> &[u32] {
        &self.segments
    }

    /// Returns the trailing path segment (the integer after the last dash).
    ///
    /// This is the slot the container occupies among its parent's children.
    #[must_use]
    pub fn trailing(&self) -> u32 {
        *self
            .segments
            .last()
            .expect("a container id has at least one segment")
    }

    /// Returns the depth of the container below the root (the root is 0).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len() - 1
    }

    /// Returns the id of the `k`-th child slot under this id.
    #[must_use]
    pub fn child(&self, k: u32) -> Self {
        let mut segments = self.segments.clone();
        segments.push(k);
        Self { segments }
    }

    /// Returns the parent id, or `None` for a root id.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Whether this id lies on the path from the root to `other`.
    ///
    /// Comparison is segment-wise, so `0-1` is *not* a prefix of `0-10`.
    /// An id is a prefix of itself.
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        other.segments.len() >= self.segments.len()
            && self.segments == other.segments[..self.segments.len()]
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut segments = self.segments.iter();
        if let Some(first) = segments.next() {
            write!(f, "{first}")?;
        }
        for segment in segments {
            write!(f, "-{segment}")?;
        }
        Ok(())
    }
}

/// Errors that can occur when parsing a container id.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// Malformed structure (empty, or misplaced dashes).
    #[error("invalid container id '{0}': expected dash-separated integers")]
    Syntax(String),

    /// A path segment is not a non-negative integer.
    #[error("invalid segment '{1}' in container id '{0}': expected a non-negative integer")]
    Segment(String, String),
}

impl FromStr for ContainerId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.starts_with('-') || s.ends_with('-') || s.contains("--") {
            return Err(Error::Syntax(s.to_string()));
        }

        let segments = s
            .split('-')
            .map(|segment| {
                segment
                    .parse::<u32>()
                    .map_err(|_| Error::Segment(s.to_string(), segment.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { segments })
    }
}

impl TryFrom<&str> for ContainerId {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_str(value)
    }
}

impl Serialize for ContainerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ContainerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
