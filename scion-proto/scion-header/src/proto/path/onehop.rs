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

//! One-hop path: a single info field followed by two hop fields, kept as raw bytes.
//!
//! The second hop field is filled in by the receiving AS.

use crate::{
    core::{
        decode::DecodeError,
        encode::{InvalidStructureError, WireEncode},
    },
    path::{PathCodec, PathType, scion::ScionPathLayout},
};

const ONE_HOP_PATH_SIZE: usize =
    ScionPathLayout::INFO_FIELD_SIZE + 2 * ScionPathLayout::HOP_FIELD_SIZE;

/// One-hop path with uninterpreted fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OneHopPath {
    raw: [u8; ONE_HOP_PATH_SIZE],
}
impl OneHopPath {
    /// Encoded size.
    pub const SIZE: usize = ONE_HOP_PATH_SIZE;

    const FIRST_HOP: usize = ScionPathLayout::INFO_FIELD_SIZE;
    const SECOND_HOP: usize = Self::FIRST_HOP + ScionPathLayout::HOP_FIELD_SIZE;

    /// Wraps encoded path bytes.
    pub fn new(raw: [u8; ONE_HOP_PATH_SIZE]) -> Self {
        Self { raw }
    }

    /// Callers guarantee that `raw` is exactly [`OneHopPath::SIZE`] bytes long.
    pub(crate) fn from_validated(raw: &[u8]) -> Self {
        let mut path = Self::default();
        path.raw.copy_from_slice(raw);
        path
    }

    /// The encoded path.
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Raw info field.
    pub fn info_field(&self) -> &[u8] {
        &self.raw[..Self::FIRST_HOP]
    }

    /// Raw hop field of the sending AS.
    pub fn first_hop(&self) -> &[u8] {
        &self.raw[Self::FIRST_HOP..Self::SECOND_HOP]
    }

    /// Raw hop field of the receiving AS.
    pub fn second_hop(&self) -> &[u8] {
        &self.raw[Self::SECOND_HOP..]
    }

    /// Mutable hop field of the receiving AS.
    pub fn second_hop_mut(&mut self) -> &mut [u8] {
        &mut self.raw[Self::SECOND_HOP..]
    }
}
impl Default for OneHopPath {
    fn default() -> Self {
        Self {
            raw: [0; ONE_HOP_PATH_SIZE],
        }
    }
}
impl PathCodec for OneHopPath {
    const PATH_TYPE: PathType = PathType::OneHop;

    fn wire_len(_buf: &[u8]) -> Result<usize, DecodeError> {
        Ok(Self::SIZE)
    }

    fn decode_from_bytes(buf: &[u8]) -> Result<Self, DecodeError> {
        let raw = buf
            .get(..Self::SIZE)
            .and_then(|raw| <[u8; ONE_HOP_PATH_SIZE]>::try_from(raw).ok())
            .ok_or(DecodeError::BufferTooShort {
                at: "OneHopPath",
                required: Self::SIZE,
                actual: buf.len(),
            })?;
        Ok(Self { raw })
    }
}
impl WireEncode for OneHopPath {
    fn required_size(&self) -> usize {
        Self::SIZE
    }

    fn wire_valid(&self) -> Result<(), InvalidStructureError> {
        Ok(())
    }

    fn encode_unchecked(&self, buf: &mut [u8]) -> usize {
        buf[..Self::SIZE].copy_from_slice(&self.raw);
        Self::SIZE
    }
}
