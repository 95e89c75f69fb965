//! Golden test vectors for byte-exact verification.
//!
//! These vectors pin the on-medium format: the CRC-16 parameters, the
//! identity checksum, the header bit layout and the tail seeding. Any other
//! implementation that reads or writes the same EEPROM image must reproduce
//! them exactly.

use nvtx::codec;
use nvtx::{Epoch, Identity, SlotMap};
use nvtx_core::{crc16, CellIndex, SlotGeometry};
use nvtx_store::MemoryMedium;
use serde::Serialize;

/// A CRC-16 check value.
#[derive(Debug, Clone, Serialize)]
pub struct CrcVector {
    pub name: &'static str,
    pub input: &'static [u8],
    pub expected: u16,
}

/// A complete cell image.
#[derive(Debug, Clone, Serialize)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub tag: &'static str,
    pub instance: u16,
    pub epoch: Epoch,
    pub payload: &'static [u8],
    /// Expected identity checksum.
    pub expected_identity: u16,
    /// Expected cell bytes (hex): header, payload, tail.
    pub expected_cell: &'static str,
}

impl GoldenVector {
    pub fn identity(&self) -> Identity {
        Identity::with_instance(self.tag, self.instance)
    }
}

/// CRC-16/ARC check values.
pub fn crc_vectors() -> Vec<CrcVector> {
    vec![
        CrcVector {
            name: "standard check string",
            input: b"123456789",
            expected: 0xBB3D,
        },
        CrcVector {
            name: "empty input",
            input: b"",
            expected: 0x0000,
        },
        CrcVector {
            name: "single byte",
            input: b"A",
            expected: 0x30C0,
        },
        CrcVector {
            name: "counter tag",
            input: b"counter",
            expected: 0x1520,
        },
        CrcVector {
            name: "settings tag",
            input: b"settings",
            expected: 0x1CDF,
        },
    ]
}

/// Get all golden cell vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "empty payload",
            tag: "123456789",
            instance: 0,
            epoch: Epoch::One,
            payload: b"",
            expected_identity: 0xBB3D,
            expected_cell: "3dbb3dbb",
        },
        GoldenVector {
            name: "u32 counter",
            tag: "counter",
            instance: 0,
            epoch: Epoch::One,
            payload: &[1, 0, 0, 0],
            expected_identity: 0x1520,
            expected_cell: "2915010000001bf8",
        },
        GoldenVector {
            name: "instanced byte",
            tag: "volume",
            instance: 3,
            epoch: Epoch::One,
            payload: &[0x2A],
            expected_identity: 0xEC90,
            expected_cell: "99ec2a6db3",
        },
        GoldenVector {
            name: "eight byte record",
            tag: "settings",
            instance: 0,
            epoch: Epoch::One,
            payload: &[0, 1, 2, 3, 4, 5, 6, 7],
            expected_identity: 0x1CDF,
            expected_cell: "df1c000102030405060796ac",
        },
        GoldenVector {
            name: "ascii payload",
            tag: "A",
            instance: 0,
            epoch: Epoch::One,
            payload: b"hello",
            expected_identity: 0x30C0,
            expected_cell: "c93068656c6c6fdd25",
        },
        GoldenVector {
            name: "epoch zero",
            tag: "boot_count",
            instance: 0,
            epoch: Epoch::Zero,
            payload: &[0xFF, 0xFF],
            expected_identity: 0xC7D1,
            expected_cell: "d8c7ffff1c72",
        },
    ]
}

/// Encode the first cell of a slot at address 0 of a zeroed medium.
pub fn encode_cell(vector: &GoldenVector) -> Vec<u8> {
    let geo = SlotGeometry::new(0, vector.payload.len());
    let mut medium = MemoryMedium::new(geo.len());
    let checksum = vector.identity().checksum();

    codec::write_cell(
        &mut medium,
        checksum,
        &geo,
        CellIndex::First,
        vector.epoch,
        vector.payload,
    )
    .expect("in-memory write failed");

    let mut bytes = medium.into_bytes();
    bytes.truncate(geo.cell_base(CellIndex::Second));
    bytes
}

/// Verify all golden vectors.
///
/// Returns `(name, matches, hex)` per vector, CRC vectors first.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    let crcs = crc_vectors().into_iter().map(|v| {
        let got = crc16::checksum(v.input);
        (v.name.to_string(), got == v.expected, format!("{got:04x}"))
    });

    let cells = all_vectors().into_iter().map(|v| {
        let hex = hex::encode(encode_cell(&v));
        let matches =
            v.identity().checksum() == v.expected_identity && hex == v.expected_cell;
        (v.name.to_string(), matches, hex)
    });

    crcs.chain(cells).collect()
}

/// Dump the vectors as JSON, for consumption by other implementations.
pub fn vectors_json(layout: Option<&SlotMap>) -> serde_json::Value {
    let crcs: Vec<_> = crc_vectors()
        .iter()
        .map(|v| {
            serde_json::json!({
                "name": v.name,
                "input": hex::encode(v.input),
                "expected": format!("{:04x}", v.expected),
            })
        })
        .collect();
    let slots: Option<Vec<_>> = layout.map(|map| map.iter().cloned().collect());

    serde_json::json!({
        "crc": crcs,
        "cells": all_vectors(),
        "layout": slots,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_match() {
        for (name, matches, hex) in verify_all_vectors() {
            assert!(matches, "vector '{}' produced {}", name, hex);
        }
    }

    #[test]
    fn test_vectors_are_deterministic() {
        for vector in all_vectors() {
            assert_eq!(encode_cell(&vector), encode_cell(&vector), "{}", vector.name);
        }
    }

    #[test]
    fn test_cell_length() {
        for vector in all_vectors() {
            assert_eq!(encode_cell(&vector).len(), vector.payload.len() + 4);
        }
    }

    #[test]
    fn test_vectors_json_shape() {
        let json = vectors_json(None);
        assert_eq!(json["crc"][0]["expected"], "bb3d");
        assert_eq!(json["cells"][1]["expected_cell"], "2915010000001bf8");
        assert!(json["layout"].is_null());
    }
}
