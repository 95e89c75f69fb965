//! # nvtx Testkit
//!
//! Testing utilities for nvtx.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Byte-exact cell images pinning the on-medium format
//! - **Fault injection**: A medium wrapper that simulates power loss mid-write
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Helper structs for setting up test scenarios
//!
//! ## Golden Vectors
//!
//! ```rust
//! use nvtx_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, hex) in verify_all_vectors() {
//!     assert!(matches, "{name}: {hex}");
//! }
//! ```
//!
//! ## Power Loss
//!
//! ```rust
//! use nvtx::Identity;
//! use nvtx_testkit::fixtures::TestFixture;
//!
//! let mut fixture = TestFixture::new(64);
//! let id = Identity::new("counter");
//! fixture.nv.put(&id, 0, &[1]).unwrap();
//!
//! fixture.cut_power_after(2);
//! assert!(fixture.nv.put(&id, 0, &[2]).is_err());
//! fixture.restore_power();
//!
//! assert_eq!(fixture.read(&id, 0, 1), Some(vec![1]));
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use nvtx_testkit::generators::{identity, payload};
//!
//! proptest! {
//!     #[test]
//!     fn roundtrip(id in identity(), value in payload(8)) {
//!         // ...
//!     }
//! }
//! ```

pub mod fault;
pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fault::PowerCutMedium;
pub use fixtures::{FixtureMedium, TestFixture};
pub use generators::{put_script, PutStep};
pub use vectors::{all_vectors, crc_vectors, encode_cell, verify_all_vectors, GoldenVector};
