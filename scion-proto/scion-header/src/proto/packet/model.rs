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

//! SCION packet models

use crate::{
    core::{
        decode::DecodeError,
        encode::{EncodeError, InvalidStructureError, SerializeOptions, WireEncode},
    },
    header::model::ScionPacketHeader,
    packet::view::ScionPacketView,
};

/// An owned SCION packet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScionPacket {
    /// Header
    pub header: ScionPacketHeader,
    /// Payload
    pub payload: Vec<u8>,
}
impl ScionPacket {
    /// Copies a packet out of a view.
    pub fn from_view(view: &ScionPacketView) -> Self {
        ScionPacket {
            header: ScionPacketHeader::from_view(view.header()),
            payload: view.payload().to_vec(),
        }
    }

    /// Decodes a packet from the start of `buf`.
    ///
    /// Returns the packet and the bytes following its payload.
    pub fn from_slice(buf: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
        let (header, rest) = ScionPacketHeader::from_slice(buf)?;
        let payload_len = header.common.payload_len as usize;
        let (payload, rest) =
            rest.split_at_checked(payload_len)
                .ok_or(DecodeError::BufferTooShort {
                    at: "Payload",
                    required: header.common.header_len_bytes() + payload_len,
                    actual: buf.len(),
                })?;

        Ok((
            ScionPacket {
                header,
                payload: payload.to_vec(),
            },
            rest,
        ))
    }

    /// Encodes the packet into a new buffer, setting header and payload lengths from the
    /// current contents.
    pub fn serialize(&mut self) -> Result<Vec<u8>, EncodeError> {
        let header_size = self.header.header_size();
        let mut buf = vec![0u8; header_size + self.payload.len()];
        buf[header_size..].copy_from_slice(&self.payload);
        self.header
            .serialize_to(&mut buf, SerializeOptions::FIX_LENGTHS)?;
        Ok(buf)
    }
}
impl WireEncode for ScionPacket {
    fn required_size(&self) -> usize {
        self.header.required_size() + self.payload.len()
    }

    fn wire_valid(&self) -> Result<(), InvalidStructureError> {
        self.header.wire_valid()?;

        if self.payload.len() != self.header.common.payload_len as usize {
            return Err("payload does not match the header's payload_len".into());
        }
        Ok(())
    }

    fn encode_unchecked(&self, buf: &mut [u8]) -> usize {
        let header_size = self.header.encode_unchecked(buf);
        let end = header_size + self.payload.len();
        buf[header_size..end].copy_from_slice(&self.payload);
        end
    }
}
