//! Hierarchical channel keys.
//!
//! A [`Channel`] is an immutable dotted path such as `Game.Damage.Fire`. Every
//! channel can derive its parent by dropping the last segment, and every walk
//! up the hierarchy ends at the root channel:
//!
//! ```text
//! Game.Damage.Fire ──▶ Game.Damage ──▶ Game ──▶ <root> ──▶ None
//! ```
//!
//! The root channel is the empty path. It is the most general level of every
//! walk, so listeners registered on it observe every broadcast.
//!
//! ```rust,ignore
//! use tidings_core::Channel;
//!
//! let channel: Channel = "Game.Damage".parse()?;
//! assert_eq!(channel.parent(), Some(Channel::new("Game")?));
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::ChannelError;

/// Separator between path segments.
pub const SEPARATOR: char = '.';

/// An immutable hierarchical channel identifier.
///
/// Cloning is cheap (the path is reference counted). Equality and hashing are
/// structural over the full path.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Channel {
    path: Arc<str>,
}

impl Channel {
    /// Parses and validates a dotted path.
    ///
    /// An empty string yields the root channel.
    pub fn new(path: &str) -> Result<Self, ChannelError> {
        if path.is_empty() {
            return Ok(Self::root());
        }

        for (index, segment) in path.split(SEPARATOR).enumerate() {
            if segment.is_empty() {
                return Err(ChannelError::EmptySegment {
                    path: path.to_string(),
                    index,
                });
            }
            if let Some(ch) = segment
                .chars()
                .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
            {
                return Err(ChannelError::InvalidCharacter {
                    path: path.to_string(),
                    ch,
                });
            }
        }

        Ok(Self {
            path: Arc::from(path),
        })
    }

    /// The root channel. Listeners on it receive every broadcast.
    pub fn root() -> Self {
        Self {
            path: Arc::from(""),
        }
    }

    /// Returns `true` for the root channel.
    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Returns the next less specific channel, or `None` past the root.
    pub fn parent(&self) -> Option<Channel> {
        if self.is_root() {
            return None;
        }
        match self.path.rfind(SEPARATOR) {
            Some(idx) => Some(Self {
                path: Arc::from(&self.path[..idx]),
            }),
            None => Some(Self::root()),
        }
    }

    /// Iterates from this channel up to (and including) the root.
    pub fn lineage(&self) -> Lineage {
        Lineage {
            next: Some(self.clone()),
        }
    }

    /// Number of segments. The root has depth 0.
    pub fn depth(&self) -> usize {
        if self.is_root() {
            0
        } else {
            self.path.split(SEPARATOR).count()
        }
    }

    /// Iterates over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split(SEPARATOR).filter(|s| !s.is_empty())
    }

    /// Returns the dotted path. The root renders as an empty string.
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Returns `true` if `self` equals `ancestor` or lies beneath it.
    pub fn is_descendant_of(&self, ancestor: &Channel) -> bool {
        if ancestor.is_root() || self == ancestor {
            return true;
        }
        self.path.len() > ancestor.path.len()
            && self.path.starts_with(&*ancestor.path)
            && self.path[ancestor.path.len()..].starts_with(SEPARATOR)
    }
}

impl Default for Channel {
    fn default() -> Self {
        Self::root()
    }
}

impl FromStr for Channel {
    type Err = ChannelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for Channel {
    type Error = ChannelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.path)
        }
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Channel({self})")
    }
}

impl Serialize for Channel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.path)
    }
}

impl<'de> Deserialize<'de> for Channel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Channel::new(&raw).map_err(serde::de::Error::custom)
    }
}

/// Iterator over a channel and its ancestors, most specific first.
#[derive(Debug, Clone)]
pub struct Lineage {
    next: Option<Channel>,
}

impl Iterator for Lineage {
    type Item = Channel;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = current.parent();
        Some(current)
    }
}
