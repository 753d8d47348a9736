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

//! SCION header models

use crate::{
    checksum::ChecksumDigest,
    core::{
        decode::DecodeError,
        encode::{EncodeError, InvalidStructureError, SerializeOptions, WireEncode},
        view::View,
        write::write_bits,
    },
    header::{
        layout::{AddressHeaderLayout, CommonHeaderLayout, LINE_LEN, MAX_HEADER_LEN},
        view::ScionHeaderView,
    },
    path::{Path, PathType},
    types::address::{AddressError, HostAddr, IsdAsn, RawHostAddress},
};

/// An owned SCION packet header
///
/// Contains the common header, the address header and the path. The path type and the address
/// info fields of the common header are not stored, they are derived from `path` and `address`
/// on encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScionPacketHeader {
    /// The common header
    pub common: CommonHeader,
    /// The address header
    pub address: AddressHeader,
    /// The path
    pub path: Path,
}
impl ScionPacketHeader {
    /// Copies a header out of a view.
    pub fn from_view(view: &ScionHeaderView) -> Self {
        ScionPacketHeader {
            common: CommonHeader::from_view(view),
            address: AddressHeader::from_view(view),
            path: view.path().to_path(),
        }
    }

    /// Decodes a header from the start of `buf`.
    ///
    /// Returns the header and the bytes following it.
    pub fn from_slice(buf: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
        let (view, rest) = ScionHeaderView::from_slice(buf)?;
        Ok((Self::from_view(view), rest))
    }

    /// Encoded header size in bytes.
    pub fn header_size(&self) -> usize {
        self.required_size()
    }

    /// Type of the stored path.
    pub fn path_type(&self) -> PathType {
        self.path.path_type()
    }

    /// Recomputes the header length from the current contents and sets the payload length.
    pub fn fix_lengths(&mut self, payload_len: usize) -> Result<(), EncodeError> {
        let header_size = self.header_size();
        if header_size > MAX_HEADER_LEN {
            return Err(EncodeError::HeaderTooLarge(header_size));
        }
        let payload =
            u16::try_from(payload_len).map_err(|_| EncodeError::PayloadTooLarge(payload_len))?;

        self.common.header_len = (header_size / LINE_LEN) as u8;
        self.common.payload_len = payload;
        Ok(())
    }

    /// Writes the header to the start of `buf`.
    ///
    /// With [`SerializeOptions::fix_lengths`], the header length is recomputed and the payload
    /// length is set to the number of bytes in `buf` behind the header, i.e. the payload is
    /// expected to be in place already. Otherwise the stored lengths are written as they are,
    /// after checking that the header length matches the encoded size.
    ///
    /// Fails with [`EncodeError::UnsupportedAddress`] if a host address has no registered wire
    /// format.
    ///
    /// Returns the number of header bytes written.
    pub fn serialize_to(
        &mut self,
        buf: &mut [u8],
        opts: SerializeOptions,
    ) -> Result<usize, EncodeError> {
        self.address.check_host_formats()?;
        if opts.fix_lengths {
            let payload_len = buf.len().saturating_sub(self.header_size());
            self.fix_lengths(payload_len)?;
        }
        self.encode(buf)
    }

    /// Checksum of `upper_layer` with this header's pseudo-header.
    pub fn compute_checksum(&self, upper_layer: &[u8], protocol: u8) -> Result<u16, EncodeError> {
        self.address.compute_checksum(upper_layer, protocol)
    }

    fn encode_common(&self, buf: &mut [u8]) {
        use CommonHeaderLayout as CHL;

        let common = &self.common;
        write_bits(buf, CHL::VERSION_RNG, CommonHeader::VERSION);
        write_bits(buf, CHL::TRAFFIC_CLASS_RNG, common.traffic_class);
        write_bits(buf, CHL::FLOW_ID_RNG, common.flow_id);
        write_bits(buf, CHL::NEXT_HEADER_RNG, common.next_header);
        write_bits(buf, CHL::HEADER_LEN_RNG, common.header_len);
        write_bits(buf, CHL::PAYLOAD_LEN_RNG, common.payload_len);
        write_bits(buf, CHL::PATH_TYPE_RNG, u8::from(self.path_type()));
        write_bits(buf, CHL::DST_ADDR_INFO_RNG, self.address.dst_host.info().bits());
        write_bits(buf, CHL::SRC_ADDR_INFO_RNG, self.address.src_host.info().bits());
        write_bits(buf, CHL::RSV_RNG, 0u16);
    }
}
impl Default for ScionPacketHeader {
    /// An IPv4-to-IPv4 header with an empty path and consistent lengths.
    fn default() -> Self {
        let address = AddressHeader::default();
        let header_len = (CommonHeaderLayout::SIZE_BYTES + address.addr_hdr_len()) / LINE_LEN;
        ScionPacketHeader {
            common: CommonHeader {
                header_len: header_len as u8,
                ..Default::default()
            },
            address,
            path: Path::Empty,
        }
    }
}
impl WireEncode for ScionPacketHeader {
    fn required_size(&self) -> usize {
        CommonHeaderLayout::SIZE_BYTES + self.address.required_size() + self.path.required_size()
    }

    fn wire_valid(&self) -> Result<(), InvalidStructureError> {
        self.common.wire_valid()?;
        self.address.wire_valid()?;
        self.path.wire_valid()?;

        let size = self.required_size();
        if size > MAX_HEADER_LEN {
            return Err("header exceeds the maximum header length".into());
        }
        if self.common.header_len as usize * LINE_LEN != size {
            return Err("header_len does not match the encoded header size".into());
        }
        Ok(())
    }

    fn encode_unchecked(&self, buf: &mut [u8]) -> usize {
        self.encode_common(buf);

        let mut offset = CommonHeaderLayout::SIZE_BYTES;
        offset += self.address.encode_unchecked(&mut buf[offset..]);
        offset += self.path.encode_unchecked(&mut buf[offset..]);
        offset
    }
}

/// The common header fields that are not derived from address header or path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CommonHeader {
    /// Traffic class
    pub traffic_class: u8,
    /// Flow id, 20 bits
    pub flow_id: u32,
    /// Protocol of the header following the SCION header, e.g. UDP or SCMP
    pub next_header: u8,
    /// Header length in 4-byte units
    pub header_len: u8,
    /// Payload length in bytes
    pub payload_len: u16,
}
impl CommonHeader {
    /// The only supported header version.
    pub const VERSION: u8 = 0;

    /// Copies the common header fields out of a view.
    pub fn from_view(view: &ScionHeaderView) -> Self {
        CommonHeader {
            traffic_class: view.traffic_class(),
            flow_id: view.flow_id(),
            next_header: view.next_header(),
            header_len: (view.header_len() / LINE_LEN) as u8,
            payload_len: view.payload_len(),
        }
    }

    /// Header length in bytes.
    pub fn header_len_bytes(&self) -> usize {
        self.header_len as usize * LINE_LEN
    }

    fn wire_valid(&self) -> Result<(), InvalidStructureError> {
        if self.flow_id > CommonHeaderLayout::MAX_FLOW_ID {
            return Err("flow_id exceeds 20 bits".into());
        }
        Ok(())
    }
}

/// The SCION address header
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct AddressHeader {
    /// Destination ISD-AS
    pub dst_ia: IsdAsn,
    /// Source ISD-AS
    pub src_ia: IsdAsn,
    /// Destination host address
    pub dst_host: RawHostAddress,
    /// Source host address
    pub src_host: RawHostAddress,
}
impl AddressHeader {
    /// Copies the address header out of a view.
    pub fn from_view(view: &ScionHeaderView) -> Self {
        AddressHeader {
            dst_ia: view.dst_ia(),
            src_ia: view.src_ia(),
            dst_host: RawHostAddress::from_validated(view.dst_addr_info(), view.raw_dst_addr()),
            src_host: RawHostAddress::from_validated(view.src_addr_info(), view.raw_src_addr()),
        }
    }

    /// Sets the destination host address, updating its format.
    pub fn set_dst_addr(&mut self, addr: impl Into<HostAddr>) -> Result<(), AddressError> {
        self.dst_host = RawHostAddress::from_host_addr(&addr.into())?;
        Ok(())
    }

    /// Sets the source host address, updating its format.
    pub fn set_src_addr(&mut self, addr: impl Into<HostAddr>) -> Result<(), AddressError> {
        self.src_host = RawHostAddress::from_host_addr(&addr.into())?;
        Ok(())
    }

    /// The destination host address.
    pub fn dst_addr(&self) -> Result<HostAddr, AddressError> {
        self.dst_host.host_addr()
    }

    /// The source host address.
    pub fn src_addr(&self) -> Result<HostAddr, AddressError> {
        self.src_host.host_addr()
    }

    /// Layout of the encoded address header.
    pub fn layout(&self) -> AddressHeaderLayout {
        AddressHeaderLayout::new(self.dst_host.info(), self.src_host.info())
    }

    /// Encoded size of the address header in bytes.
    pub fn addr_hdr_len(&self) -> usize {
        self.layout().size_bytes()
    }

    fn check_host_formats(&self) -> Result<(), EncodeError> {
        if self.dst_host.info().is_registered() && self.src_host.info().is_registered() {
            Ok(())
        } else {
            Err(EncodeError::UnsupportedAddress)
        }
    }

    /// A checksum digest primed with the pseudo-header for an upper-layer packet of
    /// `upper_layer_len` bytes.
    ///
    /// Add the upper-layer packet to the digest to obtain its checksum.
    pub fn checksum_digest(&self, upper_layer_len: u32, protocol: u8) -> ChecksumDigest {
        let mut buf = [0u8; AddressHeaderLayout::MAX_SIZE_BYTES];
        let len = self.encode_unchecked(&mut buf);

        let mut digest = ChecksumDigest::new();
        digest
            .add_slice(&buf[..len])
            .add_u32(upper_layer_len)
            .add_u32(u32::from(protocol));
        digest
    }

    /// Checksum of `upper_layer` with the pseudo-header of this address header.
    pub fn compute_checksum(&self, upper_layer: &[u8], protocol: u8) -> Result<u16, EncodeError> {
        self.check_host_formats()?;
        let len = u32::try_from(upper_layer.len())
            .map_err(|_| EncodeError::PayloadTooLarge(upper_layer.len()))?;
        Ok(self
            .checksum_digest(len, protocol)
            .add_slice(upper_layer)
            .checksum())
    }
}
impl WireEncode for AddressHeader {
    fn required_size(&self) -> usize {
        self.addr_hdr_len()
    }

    fn wire_valid(&self) -> Result<(), InvalidStructureError> {
        if !self.dst_host.info().is_registered() {
            return Err("destination host address format is not registered".into());
        }
        if !self.src_host.info().is_registered() {
            return Err("source host address format is not registered".into());
        }
        Ok(())
    }

    fn encode_unchecked(&self, buf: &mut [u8]) -> usize {
        let layout = self.layout();
        write_bits(buf, AddressHeaderLayout::DST_IA_RNG, self.dst_ia.0);
        write_bits(buf, AddressHeaderLayout::SRC_IA_RNG, self.src_ia.0);
        buf[layout.dst_host_addr_range()].copy_from_slice(self.dst_host.as_bytes());
        buf[layout.src_host_addr_range()].copy_from_slice(self.src_host.as_bytes());
        layout.size_bytes()
    }
}

#[cfg(test)]
mod tests {
    use std::net::{Ipv4Addr, Ipv6Addr};

    use super::*;
    use crate::{
        path::{OneHopPath, ScionRawPath},
        types::address::{AddressInfo, ServiceAddr},
    };

    fn header() -> ScionPacketHeader {
        let mut header = ScionPacketHeader::default();
        header.common.traffic_class = 7;
        header.common.flow_id = 0x12345;
        header.common.next_header = 17;
        header.address.dst_ia = "1-ff00:0:112".parse().unwrap();
        header.address.src_ia = "1-ff00:0:110".parse().unwrap();
        header
            .address
            .set_src_addr(Ipv4Addr::new(174, 16, 4, 1))
            .unwrap();
        header
            .address
            .set_dst_addr("dead::beef".parse::<Ipv6Addr>().unwrap())
            .unwrap();
        header
    }

    #[test]
    fn should_default_to_consistent_lengths() {
        let header = ScionPacketHeader::default();
        assert_eq!(header.header_size(), 36);
        assert_eq!(header.common.header_len_bytes(), 36);
        assert!(header.wire_valid().is_ok());
        assert_eq!(header.address.dst_addr(), Ok(HostAddr::Ipv4(Ipv4Addr::UNSPECIFIED)));
    }

    #[test]
    fn should_fix_lengths_from_buffer() {
        let mut header = header();
        let mut buf = vec![0u8; header.header_size() + 10];

        let written = header
            .serialize_to(&mut buf, SerializeOptions::FIX_LENGTHS)
            .unwrap();

        assert_eq!(written, 12 + 16 + 16 + 4);
        assert_eq!(header.common.header_len, 12);
        assert_eq!(header.common.payload_len, 10);

        let (decoded, rest) = ScionPacketHeader::from_slice(&buf).unwrap();
        assert_eq!(decoded, header);
        assert_eq!(rest.len(), 10);
    }

    #[test]
    fn should_reject_stale_header_len_when_trusting_lengths() {
        let mut header = header();
        let mut buf = vec![0u8; 128];

        // Address change after the last length fix
        assert_eq!(
            header.serialize_to(&mut buf, SerializeOptions::KEEP_LENGTHS),
            Err(EncodeError::InvalidStructure(
                "header_len does not match the encoded header size".into()
            ))
        );

        header.fix_lengths(0).unwrap();
        assert_eq!(
            header.serialize_to(&mut buf, SerializeOptions::KEEP_LENGTHS),
            Ok(48)
        );
    }

    #[test]
    fn should_reject_small_buffer() {
        let mut header = header();
        let mut buf = vec![0u8; 47];
        assert_eq!(
            header.serialize_to(&mut buf, SerializeOptions::FIX_LENGTHS),
            Err(EncodeError::BufferTooSmall(48))
        );
    }

    #[test]
    fn should_reject_oversized_fields() {
        let mut header = header();
        assert_eq!(
            header.fix_lengths(70_000),
            Err(EncodeError::PayloadTooLarge(70_000))
        );

        header.fix_lengths(0).unwrap();
        header.common.flow_id = 1 << 20;
        assert!(matches!(
            header.encode_to_vec(),
            Err(EncodeError::InvalidStructure(_))
        ));

        let mut header = ScionPacketHeader {
            path: ScionRawPath::from_bytes(big_scion_path()).unwrap().into(),
            ..Default::default()
        };
        assert_eq!(
            header.fix_lengths(0),
            Err(EncodeError::HeaderTooLarge(36 + 4 + 3 * 8 + 63 * 3 * 12))
        );
    }

    fn big_scion_path() -> Vec<u8> {
        // Three segments with 63 hop fields each
        let meta = (63u32 << 12) | (63 << 6) | 63;
        let mut raw = meta.to_be_bytes().to_vec();
        raw.resize(4 + 3 * 8 + 63 * 3 * 12, 0);
        raw
    }

    #[test]
    fn should_encode_path_type_and_address_info() {
        let mut header = header();
        header.address.set_src_addr(ServiceAddr::CONTROL).unwrap();
        header.path = OneHopPath::default().into();
        let mut buf = vec![0u8; header.header_size()];
        header
            .serialize_to(&mut buf, SerializeOptions::FIX_LENGTHS)
            .unwrap();

        let (view, _) = ScionHeaderView::from_slice(&buf).unwrap();
        assert_eq!(view.path_type(), PathType::OneHop);
        assert_eq!(view.dst_addr_info(), AddressInfo::IPV6);
        assert_eq!(view.src_addr_info(), AddressInfo::SVC);
        assert_eq!(view.header_len(), 12 + 16 + 16 + 4 + 32);
        assert_eq!(view.payload_len(), 0);
    }

    #[test]
    fn should_compute_address_header_length() {
        let mut address = AddressHeader::default();
        assert_eq!(address.addr_hdr_len(), 24);
        address.set_dst_addr(Ipv6Addr::LOCALHOST).unwrap();
        assert_eq!(address.addr_hdr_len(), 36);
        address.set_src_addr(ServiceAddr::DISCOVERY).unwrap();
        assert_eq!(address.addr_hdr_len(), 36);
        assert_eq!(address.encode_to_vec().unwrap().len(), 36);
    }

    #[test]
    fn should_reject_unknown_address_family() {
        let mut address = AddressHeader::default();
        let unknown = HostAddr::Unknown {
            addr_type: 3,
            bytes: Default::default(),
        };
        assert_eq!(
            address.set_dst_addr(unknown),
            Err(AddressError::UnsupportedAddress)
        );
        // Unchanged
        assert_eq!(address.dst_host, RawHostAddress::default());
    }

    #[test]
    fn should_not_encode_unregistered_address_format() {
        let address = AddressHeader {
            src_host: RawHostAddress::new(AddressInfo::from_bits(0b0001), &[0; 8]).unwrap(),
            ..Default::default()
        };
        assert_eq!(
            address.encode_to_vec(),
            Err(EncodeError::InvalidStructure(
                "source host address format is not registered".into()
            ))
        );
        assert!(matches!(
            address.src_addr(),
            Err(AddressError::UnsupportedAddrType { .. })
        ));
        assert_eq!(
            address.compute_checksum(&[], 17),
            Err(EncodeError::UnsupportedAddress)
        );
    }

    #[test]
    fn should_not_serialize_unregistered_address_format() {
        let mut header = ScionPacketHeader::default();
        header.address.dst_host =
            RawHostAddress::new(AddressInfo::from_bits(0b1000), &[0; 4]).unwrap();

        let mut buf = vec![0u8; 64];
        for opts in [SerializeOptions::FIX_LENGTHS, SerializeOptions::KEEP_LENGTHS] {
            assert_eq!(
                header.serialize_to(&mut buf, opts),
                Err(EncodeError::UnsupportedAddress)
            );
        }
        assert_eq!(buf, [0u8; 64]);
    }

    #[test]
    fn should_verify_own_checksum() {
        let header = header();
        let mut udp = vec![0x30, 0x39, 0x00, 0x35, 0x00, 0x0B, 0x00, 0x00, 1, 2, 3];
        let sum = header.compute_checksum(&udp, 17).unwrap();
        udp[6..8].copy_from_slice(&sum.to_be_bytes());
        assert_eq!(header.compute_checksum(&udp, 17), Ok(0));
    }
}
