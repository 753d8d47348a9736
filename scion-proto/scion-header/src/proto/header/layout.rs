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

//! SCION header layout calculations
//!
//! See [`Layout`](crate::core::layout) for more information about layouts in general.

use crate::{
    core::{
        decode::DecodeError,
        layout::{BitRange, Layout, macros::gen_bitrange_const},
        read::read_bits,
    },
    path::{Path, PathType},
    types::address::{AddrType, AddressInfo},
};

/// Unit of the header length field in bytes.
pub const LINE_LEN: usize = 4;

/// Largest header the 8-bit header length field can describe.
pub const MAX_HEADER_LEN: usize = u8::MAX as usize * LINE_LEN;

/// Sizes of all parts of a validated SCION header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScionHeaderLayout {
    /// Layout of the address header
    pub address: AddressHeaderLayout,
    /// Path type announced in the common header
    pub path_type: PathType,
    /// Length of the path in bytes
    pub path_len: usize,
    /// Total header length in bytes
    pub header_len: usize,
    /// Payload length in bytes, as advertised
    pub payload_len: usize,
}
impl ScionHeaderLayout {
    /// Reads the size relevant fields from `buf` and validates them.
    ///
    /// Validates:
    /// - the version
    /// - that both address info fields name registered address formats
    /// - that the header length covers the common and address headers, and that the buffer holds
    ///   the whole header
    /// - that a path variant is registered for the path type and that its length matches exactly
    ///   the room left by the header length
    ///
    /// Does not validate field values beyond that, nor that the payload is present.
    pub fn from_slice(buf: &[u8]) -> Result<Self, DecodeError> {
        let (common, _rest) = CommonHeaderLayout.split_off_checked(buf).ok_or(
            DecodeError::BufferTooShort {
                at: "CommonHeader",
                required: CommonHeaderLayout::SIZE_BYTES,
                actual: buf.len(),
            },
        )?;

        let version = read_bits::<u8>(common, CommonHeaderLayout::VERSION_RNG);
        if version != 0 {
            return Err(DecodeError::UnsupportedVersion(version));
        }

        let dst_info = CommonHeaderLayout::dst_addr_info(common);
        let src_info = CommonHeaderLayout::src_addr_info(common);
        for info in [dst_info, src_info] {
            if !info.is_registered() {
                let addr_type: u8 = info.addr_type().into();
                let addr_len = info.size_bytes();
                return Err(match info.addr_type() {
                    AddrType::Reserved(_) => DecodeError::UnsupportedAddrType {
                        addr_type,
                        addr_len,
                    },
                    AddrType::Ip | AddrType::Svc => DecodeError::UnsupportedAddrLen {
                        addr_type,
                        addr_len,
                    },
                });
            }
        }

        let address = AddressHeaderLayout::new(dst_info, src_info);
        let addr_end = CommonHeaderLayout::SIZE_BYTES + address.size_bytes();
        if buf.len() < addr_end {
            return Err(DecodeError::BufferTooShort {
                at: "AddressHeader",
                required: addr_end,
                actual: buf.len(),
            });
        }

        let header_len =
            read_bits::<u8>(common, CommonHeaderLayout::HEADER_LEN_RNG) as usize * LINE_LEN;
        if header_len < addr_end {
            return Err(DecodeError::InvalidHeaderLength {
                advertised: header_len,
                minimum: addr_end,
            });
        }

        let path_type = PathType::from(read_bits::<u8>(common, CommonHeaderLayout::PATH_TYPE_RNG));
        let path_buf = buf.get(addr_end..header_len).ok_or(DecodeError::BufferTooShort {
            at: "Path",
            required: header_len,
            actual: buf.len(),
        })?;

        let path_len = match Path::wire_len(path_type, path_buf) {
            Ok(len) => len,
            // The header length cut the path short
            Err(DecodeError::BufferTooShort { required, .. }) => required,
            Err(e) => return Err(e),
        };
        if path_len != path_buf.len() {
            return Err(DecodeError::PathLengthMismatch {
                advertised: path_buf.len(),
                actual: path_len,
            });
        }

        Ok(Self {
            address,
            path_type,
            path_len,
            header_len,
            payload_len: read_bits::<u16>(common, CommonHeaderLayout::PAYLOAD_LEN_RNG) as usize,
        })
    }

    /// Offset of the address header.
    #[inline]
    pub const fn address_offset(&self) -> usize {
        CommonHeaderLayout::SIZE_BYTES
    }

    /// Offset of the path.
    #[inline]
    pub const fn path_offset(&self) -> usize {
        CommonHeaderLayout::SIZE_BYTES + self.address.size_bytes()
    }
}
impl Layout for ScionHeaderLayout {
    #[inline]
    fn size_bytes(&self) -> usize {
        self.header_len
    }
}

/// Layout for the SCION common header
pub struct CommonHeaderLayout;
impl CommonHeaderLayout {
    //  0                   1                   2                   3
    //  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // |Version| TrafficClass  |                FlowID                 |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // |    NextHdr    |    HdrLen     |          PayloadLen           |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // |    PathType   |DT |DL |ST |SL |              RSV              |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    gen_bitrange_const!(VERSION_RNG, 0, 4);
    gen_bitrange_const!(TRAFFIC_CLASS_RNG, 4, 8);
    gen_bitrange_const!(FLOW_ID_RNG, 12, 20);
    gen_bitrange_const!(NEXT_HEADER_RNG, 32, 8);
    gen_bitrange_const!(HEADER_LEN_RNG, 40, 8);
    gen_bitrange_const!(PAYLOAD_LEN_RNG, 48, 16);
    gen_bitrange_const!(PATH_TYPE_RNG, 64, 8);
    gen_bitrange_const!(DST_ADDR_INFO_RNG, 72, 4);
    gen_bitrange_const!(SRC_ADDR_INFO_RNG, 76, 4);
    gen_bitrange_const!(RSV_RNG, 80, 16);

    /// Total size in bytes
    pub const SIZE_BYTES: usize = 12;

    /// Largest flow id.
    pub const MAX_FLOW_ID: u32 = Self::FLOW_ID_RNG.max_value() as u32;

    /// Destination address info of a common header at the start of `buf`.
    #[inline]
    pub fn dst_addr_info(buf: &[u8]) -> AddressInfo {
        AddressInfo::from_bits(read_bits(buf, Self::DST_ADDR_INFO_RNG))
    }

    /// Source address info of a common header at the start of `buf`.
    #[inline]
    pub fn src_addr_info(buf: &[u8]) -> AddressInfo {
        AddressInfo::from_bits(read_bits(buf, Self::SRC_ADDR_INFO_RNG))
    }
}
impl Layout for CommonHeaderLayout {
    #[inline]
    fn size_bytes(&self) -> usize {
        Self::SIZE_BYTES
    }
}

/// Layout for the SCION address header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressHeaderLayout {
    /// Length of the destination host address in bytes
    pub dst_addr_len: usize,
    /// Length of the source host address in bytes
    pub src_addr_len: usize,
}
impl AddressHeaderLayout {
    //  0                   1                   2                   3
    //  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // |            DstISD             |                               |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+                               +
    // |                             DstAS                             |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // |            SrcISD             |                               |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+                               +
    // |                             SrcAS                             |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // |                    DstHostAddr (variable Len)                 |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // |                    SrcHostAddr (variable Len)                 |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    gen_bitrange_const!(DST_IA_RNG, 0, 64);
    gen_bitrange_const!(SRC_IA_RNG, 64, 64);

    /// Size of the two ISD-AS fields.
    pub const IA_SIZE_BYTES: usize = 16;

    /// Largest possible address header, two 16-byte host addresses.
    pub const MAX_SIZE_BYTES: usize = Self::IA_SIZE_BYTES + 2 * 16;

    /// Layout for host addresses of the given formats.
    #[inline]
    pub fn new(dst: AddressInfo, src: AddressInfo) -> Self {
        Self {
            dst_addr_len: dst.size_bytes(),
            src_addr_len: src.size_bytes(),
        }
    }

    /// Byte range of the destination host address, relative to the address header.
    #[inline]
    pub const fn dst_host_addr_range(&self) -> std::ops::Range<usize> {
        let start = Self::IA_SIZE_BYTES;
        start..start + self.dst_addr_len
    }

    /// Byte range of the source host address, relative to the address header.
    #[inline]
    pub const fn src_host_addr_range(&self) -> std::ops::Range<usize> {
        let start = Self::IA_SIZE_BYTES + self.dst_addr_len;
        start..start + self.src_addr_len
    }

    /// Total size in bytes.
    #[inline]
    pub const fn size_bytes(&self) -> usize {
        Self::IA_SIZE_BYTES + self.dst_addr_len + self.src_addr_len
    }
}
impl Layout for AddressHeaderLayout {
    #[inline]
    fn size_bytes(&self) -> usize {
        AddressHeaderLayout::size_bytes(self)
    }
}

/// Bit range of the ISD-AS fields shifted behind the common header.
#[inline]
pub(crate) const fn in_header(range: BitRange) -> BitRange {
    range.shift(CommonHeaderLayout::SIZE_BYTES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::write::write_bits;

    /// Builds a common header and address header with zeroed IAs and host addresses.
    fn header_buf(dst: AddressInfo, src: AddressInfo, path: &[u8], path_type: u8) -> Vec<u8> {
        let addr = AddressHeaderLayout::new(dst, src).size_bytes();
        let len = CommonHeaderLayout::SIZE_BYTES + addr + path.len();
        let mut buf = vec![0u8; len];
        write_bits(&mut buf, CommonHeaderLayout::HEADER_LEN_RNG, (len / LINE_LEN) as u8);
        write_bits(&mut buf, CommonHeaderLayout::PATH_TYPE_RNG, path_type);
        write_bits(&mut buf, CommonHeaderLayout::DST_ADDR_INFO_RNG, dst.bits());
        write_bits(&mut buf, CommonHeaderLayout::SRC_ADDR_INFO_RNG, src.bits());
        buf[len - path.len()..].copy_from_slice(path);
        buf
    }

    #[test]
    fn should_compute_sizes_for_all_address_formats() {
        for (dst, src, expected) in [
            (AddressInfo::IPV4, AddressInfo::IPV4, 24),
            (AddressInfo::IPV6, AddressInfo::IPV4, 36),
            (AddressInfo::SVC, AddressInfo::IPV6, 36),
            (AddressInfo::IPV6, AddressInfo::IPV6, 48),
        ] {
            let layout = AddressHeaderLayout::new(dst, src);
            assert_eq!(layout.size_bytes(), expected);
            assert_eq!(layout.src_host_addr_range().end, expected);
        }
    }

    #[test]
    fn should_parse_empty_path_header() {
        let buf = header_buf(AddressInfo::IPV4, AddressInfo::SVC, &[], 0);
        let layout = ScionHeaderLayout::from_slice(&buf).unwrap();
        assert_eq!(layout.header_len, 36);
        assert_eq!(layout.path_len, 0);
        assert_eq!(layout.path_type, PathType::Empty);
        assert_eq!(layout.path_offset(), 36);
    }

    #[test]
    fn should_reject_unsupported_version() {
        let mut buf = header_buf(AddressInfo::IPV4, AddressInfo::IPV4, &[], 0);
        write_bits(&mut buf, CommonHeaderLayout::VERSION_RNG, 1u8);
        assert_eq!(
            ScionHeaderLayout::from_slice(&buf),
            Err(DecodeError::UnsupportedVersion(1))
        );
    }

    #[test]
    fn should_reject_unregistered_address_length() {
        let mut buf = header_buf(AddressInfo::IPV4, AddressInfo::IPV4, &[], 0);
        // IP with 8 bytes
        write_bits(&mut buf, CommonHeaderLayout::SRC_ADDR_INFO_RNG, 0b0001u8);
        assert_eq!(
            ScionHeaderLayout::from_slice(&buf),
            Err(DecodeError::UnsupportedAddrLen {
                addr_type: 0,
                addr_len: 8
            })
        );

        // SVC with 16 bytes
        write_bits(&mut buf, CommonHeaderLayout::SRC_ADDR_INFO_RNG, 0b0111u8);
        assert_eq!(
            ScionHeaderLayout::from_slice(&buf),
            Err(DecodeError::UnsupportedAddrLen {
                addr_type: 1,
                addr_len: 16
            })
        );
    }

    #[test]
    fn should_reject_reserved_address_type() {
        let mut buf = header_buf(AddressInfo::IPV4, AddressInfo::IPV4, &[], 0);
        // Type 2 with 4 bytes
        write_bits(&mut buf, CommonHeaderLayout::DST_ADDR_INFO_RNG, 0b1000u8);
        assert_eq!(
            ScionHeaderLayout::from_slice(&buf),
            Err(DecodeError::UnsupportedAddrType {
                addr_type: 2,
                addr_len: 4
            })
        );
    }

    #[test]
    fn should_reject_header_length_below_address_header() {
        let mut buf = header_buf(AddressInfo::IPV4, AddressInfo::IPV4, &[], 0);
        write_bits(&mut buf, CommonHeaderLayout::HEADER_LEN_RNG, 5u8);
        assert_eq!(
            ScionHeaderLayout::from_slice(&buf),
            Err(DecodeError::InvalidHeaderLength {
                advertised: 20,
                minimum: 36
            })
        );
    }

    #[test]
    fn should_reject_truncated_buffers() {
        let buf = header_buf(AddressInfo::IPV6, AddressInfo::IPV6, &[0; 32], 2);
        assert!(matches!(
            ScionHeaderLayout::from_slice(&buf[..11]),
            Err(DecodeError::BufferTooShort { at: "CommonHeader", .. })
        ));
        assert!(matches!(
            ScionHeaderLayout::from_slice(&buf[..40]),
            Err(DecodeError::BufferTooShort { at: "AddressHeader", .. })
        ));
        assert_eq!(
            ScionHeaderLayout::from_slice(&buf[..70]),
            Err(DecodeError::BufferTooShort {
                at: "Path",
                required: 92,
                actual: 70
            })
        );
    }

    #[test]
    fn should_reject_path_length_mismatch() {
        // A one-hop path needs 32 bytes, the header leaves 28
        let buf = header_buf(AddressInfo::IPV4, AddressInfo::IPV4, &[0; 28], 2);
        assert_eq!(
            ScionHeaderLayout::from_slice(&buf),
            Err(DecodeError::PathLengthMismatch {
                advertised: 28,
                actual: 32
            })
        );

        // An empty path with room left for a path
        let buf = header_buf(AddressInfo::IPV4, AddressInfo::IPV4, &[0; 4], 0);
        assert_eq!(
            ScionHeaderLayout::from_slice(&buf),
            Err(DecodeError::PathLengthMismatch {
                advertised: 4,
                actual: 0
            })
        );
    }

    #[test]
    fn should_reject_unsupported_path_type() {
        let buf = header_buf(AddressInfo::IPV4, AddressInfo::IPV4, &[0; 8], 3);
        assert_eq!(
            ScionHeaderLayout::from_slice(&buf),
            Err(DecodeError::UnsupportedPathType(PathType::Epic))
        );
    }
}
