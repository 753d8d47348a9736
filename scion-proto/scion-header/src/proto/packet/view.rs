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

//! SCION packet views
//!
//! See [`View`](crate::core::view) for more information about views in general.

use crate::{
    core::{
        decode::DecodeError,
        view::{View, macros::impl_view_casts},
    },
    header::{layout::ScionHeaderLayout, view::ScionHeaderView},
};

/// A view over a complete SCION packet: the header followed by exactly `payload_len` bytes.
#[repr(transparent)]
pub struct ScionPacketView([u8]);
impl View for ScionPacketView {
    #[inline]
    fn has_required_size(buf: &[u8]) -> Result<usize, DecodeError> {
        let layout = ScionHeaderLayout::from_slice(buf)?;

        let packet_len = layout.header_len + layout.payload_len;
        if buf.len() < packet_len {
            return Err(DecodeError::BufferTooShort {
                at: "Payload",
                required: packet_len,
                actual: buf.len(),
            });
        }

        Ok(packet_len)
    }

    impl_view_casts!();
}
impl ScionPacketView {
    #[inline]
    fn header_len(&self) -> usize {
        // SAFETY: the packet buffer starts with a validated header
        unsafe { ScionHeaderView::cast(&self.0) }.header_len()
    }

    /// The SCION header.
    #[inline]
    pub fn header(&self) -> &ScionHeaderView {
        let header_len = self.header_len();
        // SAFETY: the header was validated when the packet view was created
        unsafe { ScionHeaderView::cast(&self.0[..header_len]) }
    }

    /// The SCION header, mutable.
    #[inline]
    pub fn header_mut(&mut self) -> &mut ScionHeaderView {
        let header_len = self.header_len();
        // SAFETY: the header was validated and its setters cannot change its size
        unsafe { ScionHeaderView::cast_mut(&mut self.0[..header_len]) }
    }

    /// The payload.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.0[self.header_len()..]
    }

    /// The payload, mutable.
    #[inline]
    pub fn payload_mut(&mut self) -> &mut [u8] {
        let header_len = self.header_len();
        &mut self.0[header_len..]
    }
}
