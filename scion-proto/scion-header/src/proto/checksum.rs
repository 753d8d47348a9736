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

//! Internet checksum (RFC 1071) as used by SCION upper-layer protocols.
//!
//! Upper-layer checksums cover a pseudo-header followed by the upper-layer packet:
//!
//! ```text
//! +-----------------------------------------------+
//! | address header (IAs, dst host, src host)       |
//! +-----------------------------------------------+
//! | upper-layer packet length (u32)                |
//! +-----------------------------------------------+
//! | zero (3 bytes)              | next header (u8) |
//! +-----------------------------------------------+
//! ```
//!
//! The pseudo-header is fed through [`ChecksumDigest`] by
//! [`AddressHeader::checksum_digest`](crate::header::model::AddressHeader::checksum_digest) and
//! the view equivalent, so the address header never has to be copied.

/// Streaming ones-complement sum over big-endian 16-bit words.
///
/// Input may be split at arbitrary byte boundaries; an odd trailing byte is carried into the
/// next call and padded with a zero byte when the checksum is taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChecksumDigest {
    sum: u64,
    pending: Option<u8>,
}
impl ChecksumDigest {
    /// An empty digest.
    pub const fn new() -> Self {
        Self {
            sum: 0,
            pending: None,
        }
    }

    /// Adds a 16-bit word.
    pub fn add_u16(&mut self, value: u16) -> &mut Self {
        self.add_slice(&value.to_be_bytes())
    }

    /// Adds a 32-bit value as two words.
    pub fn add_u32(&mut self, value: u32) -> &mut Self {
        self.add_slice(&value.to_be_bytes())
    }

    /// Adds a byte slice.
    pub fn add_slice(&mut self, mut data: &[u8]) -> &mut Self {
        if data.is_empty() {
            return self;
        }

        if let Some(high) = self.pending.take() {
            self.sum += u64::from(u16::from_be_bytes([high, data[0]]));
            data = &data[1..];
        }

        let mut words = data.chunks_exact(2);
        for word in &mut words {
            self.sum += u64::from(u16::from_be_bytes([word[0], word[1]]));
        }
        if let [last] = words.remainder() {
            self.pending = Some(*last);
        }

        // Keep the accumulator far away from overflow on very long inputs
        if self.sum > u64::from(u32::MAX) {
            self.sum = fold(self.sum);
        }
        self
    }

    /// The complemented checksum of everything added so far.
    pub fn checksum(&self) -> u16 {
        let mut sum = self.sum;
        if let Some(high) = self.pending {
            sum += u64::from(u16::from_be_bytes([high, 0]));
        }
        !(fold(sum) as u16)
    }
}

/// Folds the carries of `sum` back into its lower 16 bits.
#[inline]
fn fold(mut sum: u64) -> u64 {
    while sum > 0xFFFF {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    sum
}

/// Checksum of a single buffer.
pub fn checksum(data: &[u8]) -> u16 {
    ChecksumDigest::new().add_slice(data).checksum()
}
