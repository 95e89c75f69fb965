//! CRC-16/ANSI (also known as CRC-16/IBM or CRC-16/ARC).
//!
//! Table-free, bit-reversed implementation: polynomial 0xA001, LSB first,
//! initial value 0, no final XOR. Cells written by earlier firmware builds
//! depend on this being bit-exact, so the stepping function must not change.

/// Initial accumulator value.
pub const CRC16_INIT: u16 = 0;

/// Reflected form of the 0x8005 polynomial.
pub const CRC16_POLY: u16 = 0xA001;

/// Feed a single byte into the accumulator.
#[inline]
pub const fn update(mut crc: u16, mut byte: u8) -> u16 {
    let mut i = 0;
    while i < 8 {
        let mix = (crc as u8 ^ byte) & 1;
        crc >>= 1;
        if mix != 0 {
            crc ^= CRC16_POLY;
        }
        byte >>= 1;
        i += 1;
    }
    crc
}

/// Feed a byte buffer into the accumulator.
pub fn update_bytes(crc: u16, data: &[u8]) -> u16 {
    data.iter().fold(crc, |crc, &b| update(crc, b))
}

/// Feed a string into the accumulator, stopping at the first NUL byte.
///
/// Tags are NUL-terminated on the firmware side, so anything after an
/// embedded NUL never took part in the checksum there either.
pub fn update_str(crc: u16, s: &str) -> u16 {
    s.bytes()
        .take_while(|&b| b != 0)
        .fold(crc, update)
}

/// Checksum of a byte buffer, seeded with [`CRC16_INIT`].
pub fn checksum(data: &[u8]) -> u16 {
    update_bytes(CRC16_INIT, data)
}

/// Checksum of a string, seeded with [`CRC16_INIT`].
pub fn checksum_str(s: &str) -> u16 {
    update_str(CRC16_INIT, s)
}

/// Streaming accumulator.
///
/// The codec seeds one of these with an identity checksum and extends it
/// byte by byte while payload bytes move to or from the medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crc16(u16);

impl Crc16 {
    /// Start from [`CRC16_INIT`].
    pub const fn new() -> Self {
        Self(CRC16_INIT)
    }

    /// Continue from an existing checksum.
    pub const fn with_seed(seed: u16) -> Self {
        Self(seed)
    }

    pub fn update(&mut self, byte: u8) -> &mut Self {
        self.0 = update(self.0, byte);
        self
    }

    pub fn update_bytes(&mut self, data: &[u8]) -> &mut Self {
        self.0 = update_bytes(self.0, data);
        self
    }

    pub fn update_str(&mut self, s: &str) -> &mut Self {
        self.0 = update_str(self.0, s);
        self
    }

    /// Current checksum value.
    pub const fn value(&self) -> u16 {
        self.0
    }
}

impl Default for Crc16 {
    fn default() -> Self {
        Self::new()
    }
}
