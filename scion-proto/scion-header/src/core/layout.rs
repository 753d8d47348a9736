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

//! Bit-level layout descriptions.
//!
//! A layout states where each field of a header lives. Views read fields through the layout
//! constants, models write them through the same constants, so both representations agree on the
//! wire format by construction.
//!
//! Layouts that depend on field values (e.g. the address header, whose size depends on the
//! address length classes) are computed once while validating a buffer and are cheap to
//! recompute afterwards.

use std::ops::Range;

/// Size information of a header or header part.
pub trait Layout {
    /// Size of the layout in bytes.
    fn size_bytes(&self) -> usize;

    /// Splits `buf` at the layout size, `None` if the buffer is too short.
    #[inline]
    fn split_off_checked<'a>(&self, buf: &'a [u8]) -> Option<(&'a [u8], &'a [u8])> {
        buf.split_at_checked(self.size_bytes())
    }
}

/// A half-open range of bits, counted from the most significant bit of the first byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitRange {
    /// First bit of the range.
    pub start: usize,
    /// First bit after the range.
    pub end: usize,
}
impl BitRange {
    /// Range of `width` bits starting at bit `start`.
    #[inline]
    pub const fn new(start: usize, width: usize) -> Self {
        Self {
            start,
            end: start + width,
        }
    }

    /// Number of bits covered.
    #[inline]
    pub const fn size_bits(&self) -> usize {
        self.end - self.start
    }

    /// Bytes touched by the range. The range does not have to be byte aligned.
    #[inline]
    pub const fn containing_byte_range(&self) -> Range<usize> {
        self.start / 8..self.end.div_ceil(8)
    }

    /// Number of bytes touched by the range.
    #[inline]
    pub const fn size_bytes(&self) -> usize {
        let range = self.containing_byte_range();
        range.end - range.start
    }

    /// Same range moved `bytes` bytes further into the buffer.
    #[inline]
    pub const fn shift(self, bytes: usize) -> Self {
        Self {
            start: self.start + bytes * 8,
            end: self.end + bytes * 8,
        }
    }

    /// Largest value that fits into the range.
    #[inline]
    pub const fn max_value(&self) -> u128 {
        if self.size_bits() >= 128 {
            u128::MAX
        } else {
            (1u128 << self.size_bits()) - 1
        }
    }
}

/// Rounds `len` up to the next multiple of `line`.
#[inline]
pub const fn padded_len(len: usize, line: usize) -> usize {
    len.div_ceil(line) * line
}

/// Macros for layout definitions
pub mod macros {
    /// Declares a `BitRange` constant for a field starting at `$start` spanning `$width` bits.
    macro_rules! gen_bitrange_const {
        ($range_name:ident, $start:expr, $width:expr) => {
            #[allow(missing_docs)]
            pub const $range_name: $crate::core::layout::BitRange =
                $crate::core::layout::BitRange::new($start, $width);
        };
    }

    pub(crate) use gen_bitrange_const;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_compute_containing_bytes_for_unaligned_ranges() {
        let flow_id = BitRange::new(12, 20);
        assert_eq!(flow_id.containing_byte_range(), 1..4);
        assert_eq!(flow_id.size_bytes(), 3);
        assert_eq!(flow_id.max_value(), 0xF_FFFF);
    }

    #[test]
    fn should_shift_by_whole_bytes() {
        let isd = BitRange::new(0, 16).shift(12);
        assert_eq!(isd, BitRange::new(96, 16));
        assert_eq!(isd.containing_byte_range(), 12..14);
    }

    #[test]
    fn should_pad_to_line() {
        assert_eq!(padded_len(0, 8), 0);
        assert_eq!(padded_len(26, 8), 32);
        assert_eq!(padded_len(2, 4), 4);
        assert_eq!(padded_len(16, 4), 16);
    }
}
