// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hierarchical node addresses.

use alloc::string::ToString;
use core::fmt;
use core::str::FromStr;

use smallvec::SmallVec;

use crate::error::PathParseError;

/// Root-to-node address of a node, written `0-2-1`.
///
/// The first segment is always `0` (the root); every further segment is the
/// index of the child taken at that level. A path stays the same across
/// re-layouts as long as the tree's shape and ordering do, which makes it the
/// identity key renderers should use to match nodes between two layouts.
///
/// ```rust
/// use arbor_layout::Path;
///
/// let root = Path::root();
/// let third = root.child(2);
/// assert_eq!(third.to_string(), "0-2");
/// assert_eq!("0-2".parse::<Path>().unwrap(), third);
/// assert_eq!(third.parent(), Some(root));
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path(SmallVec<[u32; 8]>);

impl Path {
    /// The root path, `0`.
    pub fn root() -> Self {
        let mut segments = SmallVec::new();
        segments.push(0);
        Self(segments)
    }

    /// Path of this node's child at `index`.
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Child indices are bounded by u32, like NodeId slots."
        )]
        segments.push(index as u32);
        Self(segments)
    }

    /// Path of the parent, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.0.len() <= 1 {
            return None;
        }
        let mut segments = self.0.clone();
        segments.pop();
        Some(Self(segments))
    }

    /// Depth of the addressed node; the root is at depth 0.
    pub fn depth(&self) -> u32 {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Trees deeper than u32::MAX cannot be allocated."
        )]
        let depth = (self.0.len() - 1) as u32;
        depth
    }

    /// Index of the addressed node among its siblings (0 for the root).
    pub fn index(&self) -> usize {
        self.0.last().copied().unwrap_or(0) as usize
    }

    /// Whether `self` is a strict ancestor of `other`.
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        self.0.len() < other.0.len() && other.0.starts_with(&self.0)
    }

    /// The raw child-index segments, root first.
    pub fn segments(&self) -> &[u32] {
        &self.0
    }
}

impl Default for Path {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.0 {
            if !first {
                f.write_str("-")?;
            }
            first = false;
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({self})")
    }
}

impl FromStr for Path {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(PathParseError::Empty);
        }
        let mut segments = SmallVec::new();
        for (position, segment) in s.split('-').enumerate() {
            if segment.is_empty() {
                return Err(PathParseError::EmptySegment(position));
            }
            // `u32::from_str` accepts a leading `+`, which is not a valid path.
            if !segment.bytes().all(|b| b.is_ascii_digit()) {
                return Err(PathParseError::InvalidSegment {
                    segment: segment.to_string(),
                    position,
                });
            }
            let index = segment
                .parse::<u32>()
                .map_err(|_| PathParseError::InvalidSegment {
                    segment: segment.to_string(),
                    position,
                })?;
            if position == 0 && index != 0 {
                return Err(PathParseError::NotRooted);
            }
            segments.push(index);
        }
        Ok(Self(segments))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Path {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Path {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = alloc::string::String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
