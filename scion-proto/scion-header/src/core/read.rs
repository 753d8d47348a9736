// Copyright 2026 Anapaya Systems
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Big-endian reads of arbitrary bit ranges.

use crate::core::layout::BitRange;

const LANE_BYTES: usize = 16;

/// Integer types a bit range can be read into.
pub trait FromBits {
    /// Converts the already masked value. Bits beyond the target width are discarded.
    fn from_bits(value: u128) -> Self;
}

macro_rules! impl_from_bits {
    ($($t:ty),*) => {
        $(
            impl FromBits for $t {
                #[inline(always)]
                fn from_bits(value: u128) -> Self {
                    value as $t
                }
            }
        )*
    };
}
impl_from_bits!(u8, u16, u32, u64, u128);

/// Reads `range` from `buf` as a big-endian unsigned integer.
///
/// # Panics
///
/// Panics if `buf` does not contain all bytes touched by `range`. Views validate their buffer on
/// construction, so reads through a view never panic.
#[inline]
pub fn read_bits<T: FromBits>(buf: &[u8], range: BitRange) -> T {
    let byte_range = range.containing_byte_range();
    let bytes = &buf[byte_range.clone()];
    debug_assert!(bytes.len() <= LANE_BYTES, "bit range wider than a lane");

    let mut lane = [0u8; LANE_BYTES];
    lane[LANE_BYTES - bytes.len()..].copy_from_slice(bytes);

    // Drop the bits that trail the range in its last byte
    let trailing_bits = byte_range.end * 8 - range.end;
    let value = (u128::from_be_bytes(lane) >> trailing_bits) & range.max_value();

    T::from_bits(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_read_aligned_fields() {
        let buf = [0xAB, 0xCD, 0xEF, 0x01];
        assert_eq!(read_bits::<u8>(&buf, BitRange::new(0, 8)), 0xAB);
        assert_eq!(read_bits::<u16>(&buf, BitRange::new(8, 16)), 0xCDEF);
        assert_eq!(read_bits::<u32>(&buf, BitRange::new(0, 32)), 0xABCD_EF01);
    }

    #[test]
    fn should_read_nibbles() {
        let buf = [0b0011_0100];
        assert_eq!(read_bits::<u8>(&buf, BitRange::new(0, 4)), 0b0011);
        assert_eq!(read_bits::<u8>(&buf, BitRange::new(4, 4)), 0b0100);
    }

    #[test]
    fn should_read_fields_crossing_bytes() {
        // Version 0, traffic class 0xB8, flow id 0xD_EAD1
        let buf = [0x0B, 0x8D, 0xEA, 0xD1];
        assert_eq!(read_bits::<u8>(&buf, BitRange::new(4, 8)), 0xB8);
        assert_eq!(read_bits::<u32>(&buf, BitRange::new(12, 20)), 0xD_EAD1);
    }

    #[test]
    fn should_read_48_bit_fields() {
        let buf = [0x00, 0x01, 0xFF, 0x00, 0x00, 0x00, 0x01, 0x10];
        assert_eq!(read_bits::<u16>(&buf, BitRange::new(0, 16)), 1);
        assert_eq!(read_bits::<u64>(&buf, BitRange::new(16, 48)), 0xFF00_0000_0110);
        assert_eq!(read_bits::<u64>(&buf, BitRange::new(0, 64)), 0x0001_FF00_0000_0110);
    }

    #[test]
    #[should_panic]
    fn should_panic_on_short_buffer() {
        let buf = [0u8; 2];
        let _: u32 = read_bits(&buf, BitRange::new(0, 32));
    }
}
