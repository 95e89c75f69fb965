//! Golden test vectors for cross-implementation verification.
//!
//! Every implementation sharing an EEPROM image with this one must produce
//! identical:
//! - CRC-16 check values
//! - identity checksums
//! - cell bytes (header, payload, tail)
//!
//! Run with `--nocapture` to print the vectors as JSON.

use nvtx::{CellIndex, Identity, LayoutBuilder, MemoryMedium, NvTx};
use nvtx_testkit::vectors::{all_vectors, crc_vectors, encode_cell, vectors_json};

#[test]
fn golden_crc_values() {
    for vector in crc_vectors() {
        assert_eq!(
            nvtx::core::checksum(vector.input),
            vector.expected,
            "CRC mismatch for '{}'",
            vector.name
        );
    }
}

#[test]
fn golden_identity_checksums() {
    for vector in all_vectors() {
        assert_eq!(
            vector.identity().checksum(),
            vector.expected_identity,
            "identity mismatch for '{}'",
            vector.name
        );
    }
}

#[test]
fn golden_cell_bytes() {
    for vector in all_vectors() {
        let cell = encode_cell(&vector);
        assert_eq!(
            hex::encode(&cell),
            vector.expected_cell,
            "cell mismatch for '{}'",
            vector.name
        );
    }
}

/// A first `put` on a zeroed medium lays down exactly the epoch-one vectors.
#[test]
fn golden_put_matches_vectors() {
    for vector in all_vectors().into_iter().filter(|v| v.epoch == nvtx::Epoch::One) {
        let size = vector.payload.len();
        let mut nv = NvTx::new(MemoryMedium::new(nvtx::slot_size(size)));
        nv.put(&vector.identity(), 0, vector.payload).unwrap();

        let bytes = nv.medium().as_bytes();
        let first = &bytes[..nvtx::cell_size(size)];
        let second = &bytes[nvtx::cell_size(size)..];
        assert_eq!(hex::encode(first), vector.expected_cell, "{}", vector.name);
        assert!(second.iter().all(|&b| b == 0), "{}", vector.name);
    }
}

/// Each vector decodes back to its payload through `get`.
#[test]
fn golden_vectors_read_back() {
    for vector in all_vectors() {
        let size = vector.payload.len();
        let mut image = hex::decode(vector.expected_cell).unwrap();
        image.resize(nvtx::slot_size(size), 0);

        let mut nv = NvTx::new(MemoryMedium::from_bytes(image));
        let mut out = vec![0u8; size];
        assert!(nv.get(&vector.identity(), 0, &mut out).unwrap(), "{}", vector.name);
        assert_eq!(out, vector.payload, "{}", vector.name);

        let status = nv.inspect(&vector.identity(), size, 0).unwrap();
        assert_eq!(status.newest(), Some(CellIndex::First));
    }
}

#[test]
fn golden_vector_dump() {
    let layout = LayoutBuilder::unbounded()
        .after(Identity::new("counter"), 4)
        .after(Identity::with_instance("volume", 3), 1)
        .build()
        .unwrap();

    let json = vectors_json(Some(&layout));
    println!("{}", serde_json::to_string_pretty(&json).unwrap());

    assert_eq!(json["cells"].as_array().unwrap().len(), all_vectors().len());
    assert_eq!(json["layout"][1]["base"], 12);
}
