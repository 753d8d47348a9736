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

//! SCION header views
//!
//! See [`View`](crate::core::view) for more information about views in general.

use std::fmt::{self, Debug};

use crate::{
    checksum::ChecksumDigest,
    core::{
        decode::DecodeError,
        encode::EncodeError,
        read::read_bits,
        view::{
            View,
            macros::{gen_field_read, gen_field_write, impl_view_casts},
        },
        write::write_bits,
    },
    header::layout::{
        AddressHeaderLayout, CommonHeaderLayout, LINE_LEN, ScionHeaderLayout, in_header,
    },
    path::{OneHopPath, Path, PathType, ScionRawPath},
    types::address::{AddressError, AddressInfo, HostAddr, IsdAsn, parse_addr},
};

/// A view over a complete SCION header: common header, address header and path.
///
/// Construction validates the whole header (see [`ScionHeaderLayout::from_slice`]), so all
/// accessors are infallible afterwards.
#[repr(transparent)]
pub struct ScionHeaderView([u8]);
impl View for ScionHeaderView {
    #[inline]
    fn has_required_size(buf: &[u8]) -> Result<usize, DecodeError> {
        Ok(ScionHeaderLayout::from_slice(buf)?.header_len)
    }

    impl_view_casts!();
}
// Common header
impl ScionHeaderView {
    gen_field_read!(version, CommonHeaderLayout::VERSION_RNG, u8);
    gen_field_read!(traffic_class, CommonHeaderLayout::TRAFFIC_CLASS_RNG, u8);
    gen_field_read!(flow_id, CommonHeaderLayout::FLOW_ID_RNG, u32);
    gen_field_read!(next_header, CommonHeaderLayout::NEXT_HEADER_RNG, u8);
    gen_field_read!(payload_len, CommonHeaderLayout::PAYLOAD_LEN_RNG, u16);

    gen_field_write!(set_traffic_class, CommonHeaderLayout::TRAFFIC_CLASS_RNG, u8);
    gen_field_write!(set_flow_id, CommonHeaderLayout::FLOW_ID_RNG, u32);
    gen_field_write!(set_next_header, CommonHeaderLayout::NEXT_HEADER_RNG, u8);
    gen_field_write!(set_payload_len, CommonHeaderLayout::PAYLOAD_LEN_RNG, u16);

    /// Header length in bytes.
    #[inline]
    pub fn header_len(&self) -> usize {
        read_bits::<u8>(&self.0, CommonHeaderLayout::HEADER_LEN_RNG) as usize * LINE_LEN
    }

    /// The path type.
    #[inline]
    pub fn path_type(&self) -> PathType {
        read_bits::<u8>(&self.0, CommonHeaderLayout::PATH_TYPE_RNG).into()
    }

    /// Format of the destination host address.
    #[inline]
    pub fn dst_addr_info(&self) -> AddressInfo {
        CommonHeaderLayout::dst_addr_info(&self.0)
    }

    /// Format of the source host address.
    #[inline]
    pub fn src_addr_info(&self) -> AddressInfo {
        CommonHeaderLayout::src_addr_info(&self.0)
    }

    #[inline]
    fn address_layout(&self) -> AddressHeaderLayout {
        AddressHeaderLayout::new(self.dst_addr_info(), self.src_addr_info())
    }
}
// Address header
impl ScionHeaderView {
    /// Destination ISD-AS.
    #[inline]
    pub fn dst_ia(&self) -> IsdAsn {
        IsdAsn(read_bits(&self.0, in_header(AddressHeaderLayout::DST_IA_RNG)))
    }

    /// Source ISD-AS.
    #[inline]
    pub fn src_ia(&self) -> IsdAsn {
        IsdAsn(read_bits(&self.0, in_header(AddressHeaderLayout::SRC_IA_RNG)))
    }

    /// Sets the destination ISD-AS.
    #[inline]
    pub fn set_dst_ia(&mut self, ia: IsdAsn) {
        write_bits(&mut self.0, in_header(AddressHeaderLayout::DST_IA_RNG), ia.0)
    }

    /// Sets the source ISD-AS.
    #[inline]
    pub fn set_src_ia(&mut self, ia: IsdAsn) {
        write_bits(&mut self.0, in_header(AddressHeaderLayout::SRC_IA_RNG), ia.0)
    }

    /// The address header bytes, which double as the start of the checksum pseudo-header.
    #[inline]
    pub fn address_header_bytes(&self) -> &[u8] {
        let start = CommonHeaderLayout::SIZE_BYTES;
        &self.0[start..start + self.address_layout().size_bytes()]
    }

    /// Raw destination host address, including padding.
    #[inline]
    pub fn raw_dst_addr(&self) -> &[u8] {
        &self.address_header_bytes()[self.address_layout().dst_host_addr_range()]
    }

    /// Raw source host address, including padding.
    #[inline]
    pub fn raw_src_addr(&self) -> &[u8] {
        &self.address_header_bytes()[self.address_layout().src_host_addr_range()]
    }

    /// Destination host address.
    #[inline]
    pub fn dst_addr(&self) -> Result<HostAddr, AddressError> {
        let info = self.dst_addr_info();
        parse_addr(info.addr_type(), info.addr_len(), self.raw_dst_addr())
    }

    /// Source host address.
    #[inline]
    pub fn src_addr(&self) -> Result<HostAddr, AddressError> {
        let info = self.src_addr_info();
        parse_addr(info.addr_type(), info.addr_len(), self.raw_src_addr())
    }

    // Impl Note: host addresses have no setters, changing their format changes the header size
}
// Path
impl ScionHeaderView {
    /// A view over the path.
    #[inline]
    pub fn path(&self) -> ScionPathView<'_> {
        let start = CommonHeaderLayout::SIZE_BYTES + self.address_layout().size_bytes();
        let raw = &self.0[start..self.header_len()];

        match self.path_type() {
            PathType::Scion => ScionPathView::Scion(raw),
            PathType::OneHop => ScionPathView::OneHop(raw),
            // Validation only admits registered path types
            _ => ScionPathView::Empty,
        }
    }
}
// Checksum
impl ScionHeaderView {
    /// Checksum of `upper_layer` with this header's pseudo-header.
    ///
    /// Passing an upper-layer packet whose checksum field holds the correct value yields 0.
    pub fn compute_checksum(&self, upper_layer: &[u8], protocol: u8) -> Result<u16, EncodeError> {
        let len = u32::try_from(upper_layer.len())
            .map_err(|_| EncodeError::PayloadTooLarge(upper_layer.len()))?;

        let checksum = ChecksumDigest::new()
            .add_slice(self.address_header_bytes())
            .add_u32(len)
            .add_u32(u32::from(protocol))
            .add_slice(upper_layer)
            .checksum();
        Ok(checksum)
    }
}
impl Debug for ScionHeaderView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScionHeaderView")
            .field("traffic_class", &self.traffic_class())
            .field("flow_id", &self.flow_id())
            .field("next_header", &self.next_header())
            .field("header_len", &self.header_len())
            .field("payload_len", &self.payload_len())
            .field("path_type", &self.path_type())
            .field("dst_ia", &self.dst_ia())
            .field("src_ia", &self.src_ia())
            .field("dst_addr", &self.dst_addr())
            .field("src_addr", &self.src_addr())
            .field("path", &self.path())
            .finish()
    }
}

/// A borrowed path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScionPathView<'a> {
    /// No path.
    Empty,
    /// Raw standard SCION path.
    Scion(&'a [u8]),
    /// Raw one-hop path.
    OneHop(&'a [u8]),
}
impl<'a> ScionPathView<'a> {
    /// The path type.
    pub fn path_type(&self) -> PathType {
        match self {
            ScionPathView::Empty => PathType::Empty,
            ScionPathView::Scion(_) => PathType::Scion,
            ScionPathView::OneHop(_) => PathType::OneHop,
        }
    }

    /// The raw path bytes.
    pub fn as_bytes(&self) -> &'a [u8] {
        match self {
            ScionPathView::Empty => &[],
            ScionPathView::Scion(raw) | ScionPathView::OneHop(raw) => raw,
        }
    }

    /// Copies the path into an owned [`Path`].
    pub fn to_path(&self) -> Path {
        match self {
            ScionPathView::Empty => Path::Empty,
            ScionPathView::Scion(raw) => Path::Scion(ScionRawPath::from_validated(raw)),
            ScionPathView::OneHop(raw) => Path::OneHop(OneHopPath::from_validated(raw)),
        }
    }
}
