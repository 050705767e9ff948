//! Fixed-width packed element codec.

use ssz_backing_tree::Root;

/// A basic element with a fixed byte width that divides 32, so a whole
/// number of elements packs into each 32-byte bottom node.
///
/// Encoding is little-endian for the unsigned integers and verbatim for
/// 32-byte roots.
pub trait BasicElement: Sized {
    /// Encoded width in bytes. Must be one of 1, 2, 4, 8, 16 or 32.
    const BYTE_LENGTH: u8;

    /// Write the encoding into `out`, which is exactly `BYTE_LENGTH` long.
    fn write_to(&self, out: &mut [u8]);

    /// Decode from `bytes`, which is exactly `BYTE_LENGTH` long.
    fn read_from(bytes: &[u8]) -> Self;
}

macro_rules! uint_element {
    ($t:ty, $len:expr) => {
        impl BasicElement for $t {
            const BYTE_LENGTH: u8 = $len;

            fn write_to(&self, out: &mut [u8]) {
                out.copy_from_slice(&self.to_le_bytes());
            }

            fn read_from(bytes: &[u8]) -> Self {
                let mut buf = [0u8; $len];
                buf.copy_from_slice(bytes);
                <$t>::from_le_bytes(buf)
            }
        }
    };
}

uint_element!(u8, 1);
uint_element!(u16, 2);
uint_element!(u32, 4);
uint_element!(u64, 8);
uint_element!(u128, 16);

impl BasicElement for Root {
    const BYTE_LENGTH: u8 = 32;

    fn write_to(&self, out: &mut [u8]) {
        out.copy_from_slice(self);
    }

    fn read_from(bytes: &[u8]) -> Self {
        let mut buf = [0u8; 32];
        buf.copy_from_slice(bytes);
        buf
    }
}
