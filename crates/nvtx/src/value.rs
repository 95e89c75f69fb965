//! Fixed-size values that can live in a slot.

/// A value with a fixed byte encoding.
///
/// Scalars use little-endian order. `read_bytes` and `write_bytes` are always
/// handed a buffer of exactly [`SIZE`](NvValue::SIZE) bytes.
pub trait NvValue: Sized {
    /// Payload size in bytes.
    const SIZE: usize;

    fn write_bytes(&self, out: &mut [u8]);

    fn read_bytes(bytes: &[u8]) -> Self;

    /// Encode into a fresh buffer.
    fn to_vec(&self) -> Vec<u8> {
        let mut buf = vec![0u8; Self::SIZE];
        self.write_bytes(&mut buf);
        buf
    }
}

macro_rules! impl_nv_value_le {
    ($($t:ty),* $(,)?) => {
        $(
            impl NvValue for $t {
                const SIZE: usize = std::mem::size_of::<$t>();

                fn write_bytes(&self, out: &mut [u8]) {
                    out.copy_from_slice(&self.to_le_bytes());
                }

                fn read_bytes(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$t>()];
                    raw.copy_from_slice(bytes);
                    <$t>::from_le_bytes(raw)
                }
            }
        )*
    };
}

impl_nv_value_le!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

impl NvValue for bool {
    const SIZE: usize = 1;

    fn write_bytes(&self, out: &mut [u8]) {
        out[0] = u8::from(*self);
    }

    fn read_bytes(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }
}

impl<const N: usize> NvValue for [u8; N] {
    const SIZE: usize = N;

    fn write_bytes(&self, out: &mut [u8]) {
        out.copy_from_slice(self);
    }

    fn read_bytes(bytes: &[u8]) -> Self {
        let mut raw = [0u8; N];
        raw.copy_from_slice(bytes);
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_encoding_is_little_endian() {
        assert_eq!(0x1234u16.to_vec(), vec![0x34, 0x12]);
        assert_eq!((-2i32).to_vec(), vec![0xFE, 0xFF, 0xFF, 0xFF]);
        assert_eq!(u32::read_bytes(&[1, 0, 0, 0]), 1);
    }

    #[test]
    fn test_sizes() {
        assert_eq!(<u8 as NvValue>::SIZE, 1);
        assert_eq!(<f64 as NvValue>::SIZE, 8);
        assert_eq!(<bool as NvValue>::SIZE, 1);
        assert_eq!(<[u8; 5] as NvValue>::SIZE, 5);
    }

    #[test]
    fn test_bool_reads_any_nonzero_as_true() {
        assert!(bool::read_bytes(&[2]));
        assert!(!bool::read_bytes(&[0]));
        assert_eq!(true.to_vec(), vec![1]);
    }

    #[test]
    fn test_float_bits_preserved() {
        let v = -0.0f32;
        assert_eq!(f32::read_bytes(&v.to_vec()).to_bits(), v.to_bits());
    }
}
