//! Slot address allocation.
//!
//! Slots are laid out once at start-up, either in code with
//! [`LayoutBuilder`] or from a JSON [`LayoutConfig`]. The resulting
//! [`SlotMap`] guarantees that every slot fits the medium, that no two slot
//! regions overlap and that each identity appears once.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use nvtx_core::{CoreError, Identity, SlotGeometry};

/// Errors from building a slot layout.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("slot {identity} ends at {end} which is past capacity {capacity}")]
    DoesNotFit {
        identity: Identity,
        end: usize,
        capacity: usize,
    },

    #[error("slot {identity} at {base} overflows the address space")]
    AddressOverflow { identity: Identity, base: usize },

    #[error("slots {first} and {second} overlap")]
    Overlap { first: Identity, second: Identity },

    #[error("identity {0} is declared more than once")]
    DuplicateIdentity(Identity),

    #[error("no slot declared for {0}")]
    UnknownSlot(Identity),

    #[error("invalid slot identity: {0}")]
    InvalidIdentity(#[from] CoreError),

    #[error("layout config error: {0}")]
    Config(#[from] serde_json::Error),
}

/// A placed slot: identity, base address and payload size.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub identity: Identity,
    pub base: usize,
    pub size: usize,
}

impl Slot {
    pub fn new(identity: Identity, base: usize, size: usize) -> Self {
        Self { identity, base, size }
    }

    pub fn geometry(&self) -> SlotGeometry {
        SlotGeometry::new(self.base, self.size)
    }

    /// Bytes occupied on the medium (both cells), saturating at `usize::MAX`.
    pub fn len(&self) -> usize {
        self.geometry().len()
    }

    /// First address after the slot, saturating at `usize::MAX`.
    /// [`LayoutBuilder::build`] rejects slots where that happens.
    pub fn end(&self) -> usize {
        self.base.saturating_add(self.len())
    }
}

/// Builder for a [`SlotMap`].
///
/// ```rust
/// use nvtx::{Identity, LayoutBuilder};
///
/// let map = LayoutBuilder::new(1024)
///     .place(Identity::new("boot_count"), 4, 0)
///     .after(Identity::new("volume"), 1)
///     .after(Identity::with_instance("channel", 1), 2)
///     .build()
///     .unwrap();
///
/// assert_eq!(map.get(&Identity::new("volume")).unwrap().base, 16);
/// assert_eq!(map.end(), 38);
/// ```
#[derive(Debug, Clone)]
pub struct LayoutBuilder {
    capacity: Option<usize>,
    next: usize,
    slots: Vec<Slot>,
}

impl LayoutBuilder {
    /// Start a layout for a medium of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            next: 0,
            slots: Vec::new(),
        }
    }

    /// Start a layout with no capacity limit.
    pub fn unbounded() -> Self {
        Self {
            capacity: None,
            next: 0,
            slots: Vec::new(),
        }
    }

    /// Address used by the next [`after`](Self::after) when no slot has been
    /// declared yet.
    pub fn starting_at(mut self, addr: usize) -> Self {
        self.next = addr;
        self
    }

    /// Declare a slot at an explicit address.
    pub fn place(mut self, identity: Identity, size: usize, addr: usize) -> Self {
        self.push(Slot::new(identity, addr, size));
        self
    }

    /// Declare a slot directly after the previously declared one.
    pub fn after(mut self, identity: Identity, size: usize) -> Self {
        let base = self.next;
        self.push(Slot::new(identity, base, size));
        self
    }

    fn push(&mut self, slot: Slot) {
        self.next = slot.end();
        self.slots.push(slot);
    }

    /// Check the declarations and produce the map.
    pub fn build(self) -> Result<SlotMap, LayoutError> {
        for slot in &self.slots {
            let end = slot
                .geometry()
                .end()
                .ok_or_else(|| LayoutError::AddressOverflow {
                    identity: slot.identity.clone(),
                    base: slot.base,
                })?;
            if let Some(capacity) = self.capacity {
                if end > capacity {
                    return Err(LayoutError::DoesNotFit {
                        identity: slot.identity.clone(),
                        end,
                        capacity,
                    });
                }
            }
        }

        for (i, a) in self.slots.iter().enumerate() {
            for b in &self.slots[i + 1..] {
                if a.identity == b.identity {
                    return Err(LayoutError::DuplicateIdentity(a.identity.clone()));
                }
                if a.geometry().overlaps(&b.geometry()) {
                    return Err(LayoutError::Overlap {
                        first: a.identity.clone(),
                        second: b.identity.clone(),
                    });
                }
            }
        }

        Ok(SlotMap {
            capacity: self.capacity,
            slots: self.slots,
        })
    }
}

/// A checked set of slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotMap {
    capacity: Option<usize>,
    slots: Vec<Slot>,
}

impl SlotMap {
    pub fn get(&self, identity: &Identity) -> Option<&Slot> {
        self.slots.iter().find(|s| &s.identity == identity)
    }

    /// Like [`get`](Self::get) but with an error for unknown identities.
    pub fn slot(&self, identity: &Identity) -> Result<&Slot, LayoutError> {
        self.get(identity)
            .ok_or_else(|| LayoutError::UnknownSlot(identity.clone()))
    }

    /// Slots in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// First address past every slot.
    pub fn end(&self) -> usize {
        self.slots.iter().map(Slot::end).max().unwrap_or(0)
    }
}

/// One slot declaration in a [`LayoutConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSpec {
    pub tag: String,
    #[serde(default)]
    pub instance: u16,
    pub size: usize,
    /// Explicit base address; when absent the slot follows the previous one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addr: Option<usize>,
}

/// Serializable layout description.
///
/// ```json
/// {
///   "capacity": 1024,
///   "slots": [
///     { "tag": "boot_count", "size": 4, "addr": 0 },
///     { "tag": "channel", "instance": 1, "size": 2 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Address of the first slot without an explicit `addr`.
    #[serde(default)]
    pub start: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
    pub slots: Vec<SlotSpec>,
}

impl LayoutConfig {
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, LayoutError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Lay the declared slots out and check them.
    pub fn build(&self) -> Result<SlotMap, LayoutError> {
        let builder = match self.capacity {
            Some(capacity) => LayoutBuilder::new(capacity),
            None => LayoutBuilder::unbounded(),
        };

        let mut builder = builder.starting_at(self.start);
        for spec in &self.slots {
            let identity = Identity::try_new(spec.tag.clone(), spec.instance)?;
            builder = match spec.addr {
                Some(addr) => builder.place(identity, spec.size, addr),
                None => builder.after(identity, spec.size),
            };
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_allocation() {
        let map = LayoutBuilder::new(64)
            .starting_at(4)
            .after(Identity::new("a"), 2)
            .after(Identity::new("b"), 0)
            .build()
            .unwrap();

        assert_eq!(map.get(&Identity::new("a")).unwrap().base, 4);
        assert_eq!(map.get(&Identity::new("b")).unwrap().base, 16);
        assert_eq!(map.end(), 24);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_does_not_fit() {
        let err = LayoutBuilder::new(20)
            .place(Identity::new("big"), 8, 0)
            .build()
            .unwrap_err();
        assert!(matches!(err, LayoutError::DoesNotFit { end: 24, capacity: 20, .. }));
    }

    #[test]
    fn test_exact_fit() {
        let map = LayoutBuilder::new(24).place(Identity::new("big"), 8, 0).build().unwrap();
        assert_eq!(map.end(), 24);
    }

    #[test]
    fn test_overlap_detected() {
        let err = LayoutBuilder::new(128)
            .place(Identity::new("a"), 4, 0)
            .place(Identity::new("b"), 4, 10)
            .build()
            .unwrap_err();
        assert!(matches!(err, LayoutError::Overlap { .. }));
    }

    #[test]
    fn test_duplicate_identity() {
        let err = LayoutBuilder::unbounded()
            .after(Identity::with_instance("ch", 1), 1)
            .after(Identity::with_instance("ch", 1), 1)
            .build()
            .unwrap_err();
        assert!(matches!(err, LayoutError::DuplicateIdentity(_)));

        // Different instances of one tag are distinct slots.
        LayoutBuilder::unbounded()
            .after(Identity::with_instance("ch", 1), 1)
            .after(Identity::with_instance("ch", 2), 1)
            .build()
            .unwrap();
    }

    #[test]
    fn test_unknown_slot() {
        let map = LayoutBuilder::unbounded().build().unwrap();
        assert!(map.is_empty());
        assert!(matches!(
            map.slot(&Identity::new("missing")),
            Err(LayoutError::UnknownSlot(_))
        ));
    }

    #[test]
    fn test_config_from_json() {
        let config = LayoutConfig::from_json(
            r#"{
                "start": 8,
                "capacity": 256,
                "slots": [
                    { "tag": "boot_count", "size": 4 },
                    { "tag": "channel", "instance": 1, "size": 2 },
                    { "tag": "calibration", "size": 16, "addr": 128 }
                ]
            }"#,
        )
        .unwrap();

        let map = config.build().unwrap();
        assert_eq!(map.get(&Identity::new("boot_count")).unwrap().base, 8);
        assert_eq!(map.get(&Identity::with_instance("channel", 1)).unwrap().base, 24);
        assert_eq!(map.get(&Identity::new("calibration")).unwrap().base, 128);
        assert_eq!(map.capacity(), Some(256));
    }

    #[test]
    fn test_config_json_roundtrip_and_errors() {
        let config = LayoutConfig {
            start: 0,
            capacity: None,
            slots: vec![SlotSpec {
                tag: "x".into(),
                instance: 0,
                size: 1,
                addr: None,
            }],
        };
        let json = config.to_json().unwrap();
        assert_eq!(LayoutConfig::from_json(&json).unwrap(), config);

        assert!(matches!(
            LayoutConfig::from_json("{ not json"),
            Err(LayoutError::Config(_))
        ));
    }

    #[test]
    fn test_config_huge_size_reports_overflow() {
        let json = format!(r#"{{ "slots": [{{ "tag": "x", "size": {} }}] }}"#, usize::MAX);
        let err = LayoutConfig::from_json(&json).unwrap().build().unwrap_err();
        assert!(matches!(err, LayoutError::AddressOverflow { base: 0, .. }));

        // A slot placed after the saturated one does not panic either.
        let err = LayoutBuilder::unbounded()
            .after(Identity::new("a"), usize::MAX - 3)
            .after(Identity::new("b"), 1)
            .build()
            .unwrap_err();
        assert!(matches!(err, LayoutError::AddressOverflow { .. }));
    }

    #[test]
    fn test_config_rejects_bad_tags() {
        let err = LayoutConfig::from_json(r#"{ "slots": [{ "tag": "", "size": 1 }] }"#)
            .unwrap()
            .build()
            .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidIdentity(CoreError::EmptyTag)));

        let err = LayoutConfig::from_json(r#"{ "slots": [{ "tag": "a\u0000b", "size": 1 }] }"#)
            .unwrap()
            .build()
            .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidIdentity(CoreError::NulInTag(1))));
    }
}
