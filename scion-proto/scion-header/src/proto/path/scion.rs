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

//! Standard SCION path, kept as raw bytes.
//!
//! Only the meta header is interpreted, since it determines the path length. Info and hop fields
//! are preserved byte for byte.

use crate::{
    core::{
        decode::DecodeError,
        encode::{InvalidStructureError, WireEncode},
        layout::{Layout, macros::gen_bitrange_const},
        read::read_bits,
        write::write_bits,
    },
    path::{PathCodec, PathType},
};

/// Layout of a standard SCION path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScionPathLayout {
    /// Number of hop fields per segment.
    pub segment_lengths: [u8; 3],
}
impl ScionPathLayout {
    //  0                   1                   2                   3
    //  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // | C |  CurrHF   |    RSV    |  Seg0Len  |  Seg1Len  |  Seg2Len  |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // |                     InfoField (8 bytes) ...                   |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // |                     HopField (12 bytes) ...                   |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    gen_bitrange_const!(CURR_INFO_FIELD_RNG, 0, 2);
    gen_bitrange_const!(CURR_HOP_FIELD_RNG, 2, 6);
    gen_bitrange_const!(SEG0_LEN_RNG, 14, 6);
    gen_bitrange_const!(SEG1_LEN_RNG, 20, 6);
    gen_bitrange_const!(SEG2_LEN_RNG, 26, 6);

    /// Size of the meta header.
    pub const META_SIZE: usize = 4;
    /// Size of an info field.
    pub const INFO_FIELD_SIZE: usize = 8;
    /// Size of a hop field.
    pub const HOP_FIELD_SIZE: usize = 12;

    /// Reads the meta header at the start of `buf`.
    ///
    /// Segments must be filled front to back: a segment may only be non-empty if all segments
    /// before it are, and at least the first segment must be present.
    pub fn from_slice(buf: &[u8]) -> Result<Self, DecodeError> {
        let (meta, _rest) = buf.split_at_checked(Self::META_SIZE).ok_or(
            DecodeError::BufferTooShort {
                at: "PathMeta",
                required: Self::META_SIZE,
                actual: buf.len(),
            },
        )?;

        let segment_lengths = [
            read_bits::<u8>(meta, Self::SEG0_LEN_RNG),
            read_bits::<u8>(meta, Self::SEG1_LEN_RNG),
            read_bits::<u8>(meta, Self::SEG2_LEN_RNG),
        ];

        if segment_lengths[0] == 0 {
            return Err(DecodeError::InvalidPath("first segment is empty"));
        }
        if segment_lengths[1] == 0 && segment_lengths[2] != 0 {
            return Err(DecodeError::InvalidPath("segments are not contiguous"));
        }

        Ok(Self { segment_lengths })
    }

    /// Number of info fields, one per non-empty segment.
    pub fn info_fields(&self) -> usize {
        self.segment_lengths.iter().filter(|len| **len > 0).count()
    }

    /// Total number of hop fields.
    pub fn hop_fields(&self) -> usize {
        self.segment_lengths.iter().map(|len| *len as usize).sum()
    }
}
impl Layout for ScionPathLayout {
    fn size_bytes(&self) -> usize {
        Self::META_SIZE
            + self.info_fields() * Self::INFO_FIELD_SIZE
            + self.hop_fields() * Self::HOP_FIELD_SIZE
    }
}

/// Standard SCION path with uninterpreted info and hop fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScionRawPath {
    raw: Vec<u8>,
}
impl ScionRawPath {
    /// Takes ownership of an encoded path, which must be exactly as long as its meta header
    /// describes.
    pub fn from_bytes(raw: Vec<u8>) -> Result<Self, DecodeError> {
        let size = ScionPathLayout::from_slice(&raw)?.size_bytes();
        if raw.len() != size {
            return Err(DecodeError::PathLengthMismatch {
                advertised: raw.len(),
                actual: size,
            });
        }
        Ok(Self { raw })
    }

    /// Callers guarantee that `raw` holds exactly one valid path.
    pub(crate) fn from_validated(raw: &[u8]) -> Self {
        Self { raw: raw.to_vec() }
    }

    /// The encoded path.
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// The layout described by the meta header.
    pub fn layout(&self) -> ScionPathLayout {
        ScionPathLayout {
            segment_lengths: [
                read_bits::<u8>(&self.raw, ScionPathLayout::SEG0_LEN_RNG),
                read_bits::<u8>(&self.raw, ScionPathLayout::SEG1_LEN_RNG),
                read_bits::<u8>(&self.raw, ScionPathLayout::SEG2_LEN_RNG),
            ],
        }
    }

    /// Index of the info field currently in use.
    pub fn curr_info_field(&self) -> u8 {
        read_bits(&self.raw, ScionPathLayout::CURR_INFO_FIELD_RNG)
    }

    /// Index of the hop field currently in use.
    pub fn curr_hop_field(&self) -> u8 {
        read_bits(&self.raw, ScionPathLayout::CURR_HOP_FIELD_RNG)
    }

    /// Sets the current info field index. Values beyond 2 bits are truncated.
    pub fn set_curr_info_field(&mut self, index: u8) {
        write_bits(&mut self.raw, ScionPathLayout::CURR_INFO_FIELD_RNG, index)
    }

    /// Sets the current hop field index. Values beyond 6 bits are truncated.
    pub fn set_curr_hop_field(&mut self, index: u8) {
        write_bits(&mut self.raw, ScionPathLayout::CURR_HOP_FIELD_RNG, index)
    }

    /// Raw bytes of the info field at `index`.
    pub fn info_field(&self, index: usize) -> Option<&[u8]> {
        if index >= self.layout().info_fields() {
            return None;
        }
        let start = ScionPathLayout::META_SIZE + index * ScionPathLayout::INFO_FIELD_SIZE;
        self.raw.get(start..start + ScionPathLayout::INFO_FIELD_SIZE)
    }

    /// Raw bytes of the hop field at `index`, counted over all segments.
    pub fn hop_field(&self, index: usize) -> Option<&[u8]> {
        let layout = self.layout();
        if index >= layout.hop_fields() {
            return None;
        }
        let start = ScionPathLayout::META_SIZE
            + layout.info_fields() * ScionPathLayout::INFO_FIELD_SIZE
            + index * ScionPathLayout::HOP_FIELD_SIZE;
        self.raw.get(start..start + ScionPathLayout::HOP_FIELD_SIZE)
    }
}
impl PathCodec for ScionRawPath {
    const PATH_TYPE: PathType = PathType::Scion;

    fn wire_len(buf: &[u8]) -> Result<usize, DecodeError> {
        Ok(ScionPathLayout::from_slice(buf)?.size_bytes())
    }

    fn decode_from_bytes(buf: &[u8]) -> Result<Self, DecodeError> {
        let size = Self::wire_len(buf)?;
        let raw = buf.get(..size).ok_or(DecodeError::BufferTooShort {
            at: "Path",
            required: size,
            actual: buf.len(),
        })?;
        Ok(Self::from_validated(raw))
    }
}
impl WireEncode for ScionRawPath {
    fn required_size(&self) -> usize {
        self.raw.len()
    }

    fn wire_valid(&self) -> Result<(), InvalidStructureError> {
        // Length consistency is established on construction
        Ok(())
    }

    fn encode_unchecked(&self, buf: &mut [u8]) -> usize {
        buf[..self.raw.len()].copy_from_slice(&self.raw);
        self.raw.len()
    }
}
