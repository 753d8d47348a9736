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

//! Big-endian writes of arbitrary bit ranges.

use crate::core::layout::BitRange;

const LANE_BYTES: usize = 16;

/// Integer types that can be written into a bit range.
pub trait IntoBits {
    /// Widens the value. Bits that do not fit the target range are discarded on write.
    fn into_bits(self) -> u128;
}

macro_rules! impl_into_bits {
    ($($t:ty),*) => {
        $(
            impl IntoBits for $t {
                #[inline(always)]
                fn into_bits(self) -> u128 {
                    self as u128
                }
            }
        )*
    };
}
impl_into_bits!(u8, u16, u32, u64, u128);

/// Writes `value` big-endian into `range` of `buf`, leaving all bits outside the range untouched.
///
/// Bits of `value` that exceed the range width are dropped.
///
/// # Panics
///
/// Panics if `buf` does not contain all bytes touched by `range`.
#[inline]
pub fn write_bits<T: IntoBits>(buf: &mut [u8], range: BitRange, value: T) {
    let byte_range = range.containing_byte_range();
    let bytes = &mut buf[byte_range.clone()];
    let len = bytes.len();
    debug_assert!(len <= LANE_BYTES, "bit range wider than a lane");

    let mut lane = [0u8; LANE_BYTES];
    lane[LANE_BYTES - len..].copy_from_slice(bytes);

    let trailing_bits = byte_range.end * 8 - range.end;
    let mask = range.max_value() << trailing_bits;
    let merged = (u128::from_be_bytes(lane) & !mask) | ((value.into_bits() << trailing_bits) & mask);

    bytes.copy_from_slice(&merged.to_be_bytes()[LANE_BYTES - len..]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::read::read_bits;

    #[test]
    fn should_write_aligned_fields() {
        let mut buf = [0u8; 4];
        write_bits(&mut buf, BitRange::new(8, 16), 0xCDEFu16);
        assert_eq!(buf, [0x00, 0xCD, 0xEF, 0x00]);
    }

    #[test]
    fn should_keep_neighbouring_bits() {
        let mut buf = [0xFF; 4];
        write_bits(&mut buf, BitRange::new(12, 20), 0u32);
        assert_eq!(buf, [0xFF, 0xF0, 0x00, 0x00]);

        write_bits(&mut buf, BitRange::new(4, 4), 0b0101u8);
        assert_eq!(buf, [0xF5, 0xF0, 0x00, 0x00]);
    }

    #[test]
    fn should_truncate_oversized_values() {
        let mut buf = [0u8; 1];
        write_bits(&mut buf, BitRange::new(6, 2), 0xFFu8);
        assert_eq!(buf, [0b0000_0011]);
    }

    #[test]
    fn should_read_back_written_fields() {
        let mut buf = [0u8; 12];
        write_bits(&mut buf, BitRange::new(4, 8), 0xB8u8);
        write_bits(&mut buf, BitRange::new(12, 20), 0xD_EAD1u32);
        write_bits(&mut buf, BitRange::new(32, 64), 0x0001_FF00_0000_0110u64);

        assert_eq!(read_bits::<u8>(&buf, BitRange::new(4, 8)), 0xB8);
        assert_eq!(read_bits::<u32>(&buf, BitRange::new(12, 20)), 0xD_EAD1);
        assert_eq!(read_bits::<u64>(&buf, BitRange::new(32, 64)), 0x0001_FF00_0000_0110);
        assert_eq!(read_bits::<u8>(&buf, BitRange::new(0, 4)), 0);
    }
}
