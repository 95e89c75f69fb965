//! Proptest generators for property-based testing.

use proptest::prelude::*;

use nvtx::Identity;

/// Generate a tag: non-empty, no NUL.
pub fn tag() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,15}".prop_map(String::from)
}

/// Generate an identity, sometimes with a non-zero instance.
pub fn identity() -> impl Strategy<Value = Identity> {
    (tag(), prop_oneof![3 => Just(0u16), 1 => any::<u16>()])
        .prop_map(|(tag, instance)| Identity::with_instance(tag, instance))
}

/// Generate a pair of identities with different checksums.
pub fn distinct_identities() -> impl Strategy<Value = (Identity, Identity)> {
    (identity(), identity()).prop_filter("identity checksums collide", |(a, b)| {
        a.checksum() != b.checksum()
    })
}

/// Generate payload bytes of exactly `len` bytes.
pub fn payload(len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), len)
}

/// Generate a payload size and base address that fit in `capacity`.
pub fn placement(capacity: usize, max_size: usize) -> impl Strategy<Value = (usize, usize)> {
    (0..=max_size).prop_flat_map(move |size| {
        let slot = nvtx::slot_size(size);
        let last_base = capacity.saturating_sub(slot);
        (Just(size), 0..=last_base)
    })
}

/// One put in a scripted sequence, optionally cut short by a power loss.
#[derive(Debug, Clone)]
pub struct PutStep {
    pub value: Vec<u8>,
    /// Number of byte writes allowed before the cut. `None` runs to completion.
    pub cut_after: Option<u64>,
}

/// Generate a sequence of puts of `size`-byte values, some of them
/// interrupted at an arbitrary write.
pub fn put_script(size: usize, max_steps: usize) -> impl Strategy<Value = Vec<PutStep>> {
    // A put attempts at most size + 5 byte writes.
    let max_cut = size as u64 + 5;
    let step = (payload(size), prop::option::weighted(0.4, 0..max_cut))
        .prop_map(|(value, cut_after)| PutStep { value, cut_after });
    prop::collection::vec(step, 1..=max_steps)
}

/// A single-bit flip somewhere in a region of `len` bytes.
pub fn bit_flip(len: usize) -> impl Strategy<Value = (usize, u8)> {
    (0..len, 0u8..8)
}
