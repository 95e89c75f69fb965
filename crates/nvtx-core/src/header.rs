//! Cell header encoding.
//!
//! The 16-bit header packs the identity checksum together with two control
//! bits in the low byte:
//!
//! ```text
//! bit   15 ........ 4   3   2 1   0
//!       identity bits   V   id    E
//! ```
//!
//! `E` is the epoch bit and `V` the valid bit. The remaining fourteen bits
//! must equal the same bits of the identity checksum.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Epoch bit position.
pub const EPOCH_BIT: u16 = 0x0001;

/// Valid bit position.
pub const VALID_BIT: u16 = 0x0008;

/// Header bits that carry the identity checksum.
pub const IDENTITY_MASK: u16 = !(EPOCH_BIT | VALID_BIT);

/// The single freshness bit of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Epoch {
    Zero,
    One,
}

impl Epoch {
    pub const fn from_bit(set: bool) -> Self {
        if set {
            Epoch::One
        } else {
            Epoch::Zero
        }
    }

    /// Epoch carried in a raw header (or header low byte widened to u16).
    pub const fn from_raw(raw: u16) -> Self {
        Self::from_bit(raw & EPOCH_BIT != 0)
    }

    pub const fn bit(self) -> u16 {
        match self {
            Epoch::Zero => 0,
            Epoch::One => EPOCH_BIT,
        }
    }

    /// The other epoch.
    pub const fn toggled(self) -> Self {
        match self {
            Epoch::Zero => Epoch::One,
            Epoch::One => Epoch::Zero,
        }
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Epoch::Zero => f.write_str("0"),
            Epoch::One => f.write_str("1"),
        }
    }
}

/// A decoded cell header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellHeader {
    /// Identity checksum bits, already masked with [`IDENTITY_MASK`].
    pub identity_bits: u16,
    pub epoch: Epoch,
    pub valid: bool,
}

impl CellHeader {
    /// Header for a committed cell of the given identity.
    pub const fn new(identity_checksum: u16, epoch: Epoch) -> Self {
        Self {
            identity_bits: identity_checksum & IDENTITY_MASK,
            epoch,
            valid: true,
        }
    }

    /// Decode a raw little-endian header value.
    pub const fn from_raw(raw: u16) -> Self {
        Self {
            identity_bits: raw & IDENTITY_MASK,
            epoch: Epoch::from_raw(raw),
            valid: raw & VALID_BIT != 0,
        }
    }

    /// Encode back into the raw 16-bit form.
    pub const fn to_raw(&self) -> u16 {
        let valid = if self.valid { VALID_BIT } else { 0 };
        (self.identity_bits & IDENTITY_MASK) | self.epoch.bit() | valid
    }

    /// Same header with the valid bit cleared.
    pub const fn pending(self) -> Self {
        Self {
            valid: false,
            ..self
        }
    }

    /// True when the valid bit is set and the identity bits belong to
    /// `identity_checksum`. The epoch bit never takes part.
    pub const fn matches(&self, identity_checksum: u16) -> bool {
        self.valid && self.identity_bits == identity_checksum & IDENTITY_MASK
    }

    pub const fn low_byte(&self) -> u8 {
        self.to_raw().to_le_bytes()[0]
    }
}

impl fmt::Display for CellHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04x} (epoch {}, {})",
            self.to_raw(),
            self.epoch,
            if self.valid { "valid" } else { "invalid" }
        )
    }
}

/// The control bits of a header as seen from its low byte alone.
///
/// Writers look only at this byte when choosing a target cell; no checksum
/// is verified at write time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderProbe {
    pub epoch: Epoch,
    pub valid: bool,
}

impl HeaderProbe {
    pub const fn from_byte(byte: u8) -> Self {
        let raw = byte as u16;
        Self {
            epoch: Epoch::from_raw(raw),
            valid: raw & VALID_BIT != 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_header_raw() {
        // 0xBB3D is the checksum of "123456789".
        assert_eq!(CellHeader::new(0xBB3D, Epoch::Zero).to_raw(), 0xBB3C);
        assert_eq!(CellHeader::new(0xBB3D, Epoch::One).to_raw(), 0xBB3D);
        // Bit 3 clear in the checksum is forced on by the valid bit.
        assert_eq!(CellHeader::new(0x1520, Epoch::Zero).to_raw(), 0x1528);
    }

    #[test]
    fn test_raw_decode() {
        let header = CellHeader::from_raw(0xBB3D);
        assert_eq!(header.epoch, Epoch::One);
        assert!(header.valid);
        assert_eq!(header.identity_bits, 0xBB34);
        assert_eq!(CellHeader::from_raw(header.to_raw()), header);
    }

    #[test]
    fn test_matches_ignores_epoch() {
        let crc = 0x1CDF;
        assert!(CellHeader::new(crc, Epoch::Zero).matches(crc));
        assert!(CellHeader::new(crc, Epoch::One).matches(crc));
        assert!(!CellHeader::new(crc, Epoch::One).pending().matches(crc));
        assert!(!CellHeader::new(crc, Epoch::One).matches(0x1520));
    }

    #[test]
    fn test_matches_agrees_with_bitwise_rule() {
        // (crc | V | E) == (head | E) is the reference formulation.
        for crc in [0x0000u16, 0xFFFF, 0xBB3D, 0x1520, 0x30C0] {
            for head in [0x0000u16, 0xFFFF, 0xBB3C, 0xBB35, 0x1528, 0x1529, 0x30C8] {
                let reference = (crc | VALID_BIT | EPOCH_BIT) == (head | EPOCH_BIT);
                assert_eq!(CellHeader::from_raw(head).matches(crc), reference, "crc {crc:04x} head {head:04x}");
            }
        }
    }

    #[test]
    fn test_probe() {
        let probe = HeaderProbe::from_byte(0x09);
        assert!(probe.valid);
        assert_eq!(probe.epoch, Epoch::One);

        let erased = HeaderProbe::from_byte(0x00);
        assert!(!erased.valid);
        assert_eq!(erased.epoch, Epoch::Zero);

        assert_eq!(
            HeaderProbe::from_byte(CellHeader::new(0xBB3D, Epoch::Zero).low_byte()),
            HeaderProbe { epoch: Epoch::Zero, valid: true }
        );
    }

    #[test]
    fn test_epoch_toggle() {
        assert_eq!(Epoch::Zero.toggled(), Epoch::One);
        assert_eq!(Epoch::One.toggled().toggled(), Epoch::One);
        assert_eq!(Epoch::from_raw(0xFFFF), Epoch::One);
    }
}
