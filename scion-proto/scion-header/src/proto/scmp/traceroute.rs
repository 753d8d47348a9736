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

//! Traceroute informational block.
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                              Id                               |
//! +                                                               +
//! |                                                               |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                              IA                               |
//! +                                                               +
//! |                                                               |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                             IfID                              |
//! +                                                               +
//! |                                                               |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |    HopOff     |      In       |           padding             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                            padding                            |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```

use crate::{
    core::{
        decode::DecodeError,
        encode::{EncodeError, InvalidStructureError, WireEncode},
        layout::{macros::gen_bitrange_const, padded_len},
        read::read_bits,
        write::write_bits,
    },
    scmp::LINE_LEN,
    types::address::IsdAsn,
};

struct TracerouteLayout;
impl TracerouteLayout {
    gen_bitrange_const!(ID_RNG, 0, 64);
    gen_bitrange_const!(IA_RNG, 64, 64);
    gen_bitrange_const!(IF_ID_RNG, 128, 64);
    gen_bitrange_const!(HOP_OFFSET_RNG, 192, 8);
    gen_bitrange_const!(INGRESS_RNG, 200, 8);
}

/// Traceroute request and reply information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TracerouteInfo {
    /// Request identifier
    pub id: u64,
    /// AS that answered
    pub ia: IsdAsn,
    /// Interface the request was received on
    pub if_id: u64,
    /// Offset of the hop field that triggered the reply
    pub hop_offset: u8,
    /// Whether `if_id` is the ingress interface
    pub ingress: bool,
}
impl TracerouteInfo {
    /// Length of the block without padding.
    pub const LEN: usize = 26;
    /// Length of the block on the wire.
    pub const PADDED_LEN: usize = padded_len(Self::LEN, LINE_LEN);

    /// Reads a block from the start of `buf`.
    pub fn from_raw(buf: &[u8]) -> Result<Self, DecodeError> {
        if buf.len() < Self::LEN {
            return Err(DecodeError::BufferTooShort {
                at: "TracerouteInfo",
                required: Self::LEN,
                actual: buf.len(),
            });
        }

        Ok(TracerouteInfo {
            id: read_bits(buf, TracerouteLayout::ID_RNG),
            ia: IsdAsn(read_bits(buf, TracerouteLayout::IA_RNG)),
            if_id: read_bits(buf, TracerouteLayout::IF_ID_RNG),
            hop_offset: read_bits(buf, TracerouteLayout::HOP_OFFSET_RNG),
            ingress: read_bits::<u8>(buf, TracerouteLayout::INGRESS_RNG) == 1,
        })
    }

    /// Writes the block followed by zero padding to the next line boundary.
    ///
    /// Returns the number of bytes written.
    pub fn write(&self, buf: &mut [u8]) -> Result<usize, EncodeError> {
        self.encode(buf)
    }
}
impl WireEncode for TracerouteInfo {
    fn required_size(&self) -> usize {
        Self::PADDED_LEN
    }

    fn wire_valid(&self) -> Result<(), InvalidStructureError> {
        Ok(())
    }

    fn encode_unchecked(&self, buf: &mut [u8]) -> usize {
        write_bits(buf, TracerouteLayout::ID_RNG, self.id);
        write_bits(buf, TracerouteLayout::IA_RNG, self.ia.0);
        write_bits(buf, TracerouteLayout::IF_ID_RNG, self.if_id);
        write_bits(buf, TracerouteLayout::HOP_OFFSET_RNG, self.hop_offset);
        write_bits(buf, TracerouteLayout::INGRESS_RNG, u8::from(self.ingress));
        buf[Self::LEN..Self::PADDED_LEN].fill(0);
        Self::PADDED_LEN
    }
}
