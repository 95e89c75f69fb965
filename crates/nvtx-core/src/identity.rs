//! Value identity: the semantic name a slot is bound to.
//!
//! The identity checksum seeds both the header identity bits and the tail
//! checksum, so a cell written under one identity never validates under
//! another.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::crc16::Crc16;
use crate::error::CoreError;

/// A tag string plus an optional instance id.
///
/// Instance 0 is the tag-only form and checksums exactly like the bare tag,
/// which keeps it compatible with tag-only cells. Other instances extend the
/// tag checksum with the instance id as two little-endian bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identity {
    tag: String,
    #[serde(default)]
    instance: u16,
}

impl Identity {
    /// Tag-only identity (instance 0).
    ///
    /// The tag is not checked. The checksum stops at the first NUL, so
    /// `"a\0b"` checksums like `"a"` and addresses the same cells; use
    /// [`try_new`](Self::try_new) for tags from untrusted input.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            instance: 0,
        }
    }

    /// Identity for one of several values sharing a tag. Unchecked, like
    /// [`new`](Self::new).
    pub fn with_instance(tag: impl Into<String>, instance: u16) -> Self {
        Self {
            tag: tag.into(),
            instance,
        }
    }

    /// Checked constructor: rejects empty tags and tags containing NUL.
    pub fn try_new(tag: impl Into<String>, instance: u16) -> Result<Self, CoreError> {
        let tag = tag.into();
        if tag.is_empty() {
            return Err(CoreError::EmptyTag);
        }
        if let Some(pos) = tag.bytes().position(|b| b == 0) {
            return Err(CoreError::NulInTag(pos));
        }
        Ok(Self { tag, instance })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn instance(&self) -> u16 {
        self.instance
    }

    /// The 16-bit identity checksum.
    pub fn checksum(&self) -> u16 {
        let mut crc = Crc16::new();
        crc.update_str(&self.tag);
        if self.instance != 0 {
            crc.update_bytes(&self.instance.to_le_bytes());
        }
        crc.value()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance == 0 {
            write!(f, "{}", self.tag)
        } else {
            write!(f, "{}#{}", self.tag, self.instance)
        }
    }
}

impl From<&str> for Identity {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// Parses `tag` or `tag#instance`.
impl FromStr for Identity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tag, instance) = match s.rsplit_once('#') {
            Some((tag, n)) => {
                let instance = n
                    .parse::<u16>()
                    .map_err(|_| CoreError::InvalidInstance(n.to_string()))?;
                (tag, instance)
            }
            None => (s, 0),
        };

        Self::try_new(tag, instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crc16::checksum_str;

    #[test]
    fn test_tag_only_matches_bare_tag_checksum() {
        let id = Identity::new("123456789");
        assert_eq!(id.checksum(), 0xBB3D);
        assert_eq!(Identity::with_instance("counter", 0).checksum(), checksum_str("counter"));
    }

    #[test]
    fn test_instance_changes_checksum() {
        let a = Identity::with_instance("volume", 1);
        let b = Identity::with_instance("volume", 2);
        assert_ne!(a.checksum(), b.checksum());
        assert_ne!(a.checksum(), Identity::new("volume").checksum());
        assert_eq!(Identity::with_instance("volume", 3).checksum(), 0xEC90);
    }

    #[test]
    fn test_display_and_parse() {
        let id: Identity = "volume#3".parse().unwrap();
        assert_eq!(id, Identity::with_instance("volume", 3));
        assert_eq!(id.to_string(), "volume#3");

        let plain: Identity = "counter".parse().unwrap();
        assert_eq!(plain.instance(), 0);
        assert_eq!(plain.to_string(), "counter");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Identity>(), Err(CoreError::EmptyTag));
        assert_eq!("#4".parse::<Identity>(), Err(CoreError::EmptyTag));
        assert_eq!(
            "x#abc".parse::<Identity>(),
            Err(CoreError::InvalidInstance("abc".to_string()))
        );
        assert_eq!("a\0b".parse::<Identity>(), Err(CoreError::NulInTag(1)));
    }

    #[test]
    fn test_checked_constructor() {
        assert_eq!(Identity::try_new("volume", 3), Ok(Identity::with_instance("volume", 3)));
        assert_eq!(Identity::try_new("", 0), Err(CoreError::EmptyTag));
        assert_eq!(Identity::try_new("a\0b", 0), Err(CoreError::NulInTag(1)));

        // The unchecked form collides with the truncated tag.
        assert_eq!(Identity::new("a\0b").checksum(), Identity::new("a").checksum());
    }

    #[test]
    fn test_serde_default_instance() {
        let id: Identity = serde_json::from_str(r#"{"tag":"counter"}"#).unwrap();
        assert_eq!(id, Identity::new("counter"));
    }
}
