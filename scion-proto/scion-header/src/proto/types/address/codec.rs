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

use std::net::{Ipv4Addr, Ipv6Addr};

use tinyvec::ArrayVec;

use super::{AddrLen, AddrType, AddressError, AddressInfo, HostAddr, ServiceAddr};

/// Raw host address bytes, at most 16.
pub type RawAddr = ArrayVec<[u8; 16]>;

/// Converts a host address into its length class, type and raw bytes.
///
/// Service addresses are two bytes wide and padded with two zero bytes to the 4-byte class.
/// [`HostAddr::Unknown`] fails with [`AddressError::UnsupportedAddress`].
pub fn pack_addr(addr: &HostAddr) -> Result<(AddrLen, AddrType, RawAddr), AddressError> {
    let mut raw = RawAddr::new();
    let info = match addr {
        HostAddr::Ipv4(v4) => {
            raw.extend_from_slice(&v4.octets());
            AddressInfo::IPV4
        }
        HostAddr::Ipv6(v6) => {
            raw.extend_from_slice(&v6.octets());
            AddressInfo::IPV6
        }
        HostAddr::Svc(svc) => {
            raw.extend_from_slice(&svc.0.to_be_bytes());
            raw.extend_from_slice(&[0, 0]);
            AddressInfo::SVC
        }
        HostAddr::Unknown { .. } => return Err(AddressError::UnsupportedAddress),
    };
    Ok((info.addr_len(), info.addr_type(), raw))
}

/// Interprets raw address bytes according to type and length class.
///
/// Only the pairs produced by [`pack_addr`] are recognized, any other pair fails with
/// [`AddressError::UnsupportedAddrType`]. A byte count that differs from the length class fails
/// with [`AddressError::UnsupportedAddrLen`].
pub fn parse_addr(
    addr_type: AddrType,
    addr_len: AddrLen,
    raw: &[u8],
) -> Result<HostAddr, AddressError> {
    let info = AddressInfo::new(addr_type, addr_len);
    if !info.is_registered() {
        return Err(AddressError::UnsupportedAddrType {
            addr_type,
            addr_len,
        });
    }

    let length_error = || {
        AddressError::UnsupportedAddrLen {
            expected: addr_len.size_bytes(),
            actual: raw.len(),
        }
    };

    let addr = match info {
        AddressInfo::IPV4 => {
            let octets: [u8; 4] = raw.try_into().map_err(|_| length_error())?;
            HostAddr::Ipv4(Ipv4Addr::from(octets))
        }
        AddressInfo::IPV6 => {
            let octets: [u8; 16] = raw.try_into().map_err(|_| length_error())?;
            HostAddr::Ipv6(Ipv6Addr::from(octets))
        }
        _ => {
            let field: [u8; 4] = raw.try_into().map_err(|_| length_error())?;
            HostAddr::Svc(ServiceAddr(u16::from_be_bytes([field[0], field[1]])))
        }
    };
    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_pack_ipv4() {
        let (len, ty, raw) = pack_addr(&Ipv4Addr::new(172, 16, 4, 2).into()).unwrap();
        assert_eq!(len, AddrLen::L4);
        assert_eq!(ty, AddrType::Ip);
        assert_eq!(raw.as_slice(), &[172, 16, 4, 2]);
    }

    #[test]
    fn should_pack_ipv6() {
        let addr: Ipv6Addr = "2001:db8::68".parse().unwrap();
        let (len, ty, raw) = pack_addr(&addr.into()).unwrap();
        assert_eq!(len, AddrLen::L16);
        assert_eq!(ty, AddrType::Ip);
        assert_eq!(raw.as_slice(), &addr.octets());
    }

    #[test]
    fn should_pad_service_address() {
        let (len, ty, raw) = pack_addr(&ServiceAddr::CONTROL.into()).unwrap();
        assert_eq!(len, AddrLen::L4);
        assert_eq!(ty, AddrType::Svc);
        assert_eq!(raw.as_slice(), &[0x00, 0x02, 0x00, 0x00]);
    }

    #[test]
    fn should_reject_packing_unknown_family() {
        let addr = HostAddr::Unknown {
            addr_type: 2,
            bytes: RawAddr::from_array_len([0; 16], 8),
        };
        assert_eq!(pack_addr(&addr), Err(AddressError::UnsupportedAddress));
    }

    #[test]
    fn should_invert_pack() {
        let addrs = [
            HostAddr::from(Ipv4Addr::new(10, 0, 0, 1)),
            HostAddr::from("dead::beef".parse::<Ipv6Addr>().unwrap()),
            HostAddr::from(ServiceAddr::DISCOVERY),
            HostAddr::from(ServiceAddr::WILDCARD.multicast()),
        ];
        for addr in addrs {
            let (len, ty, raw) = pack_addr(&addr).unwrap();
            assert_eq!(parse_addr(ty, len, &raw).unwrap(), addr);
        }
    }

    #[test]
    fn should_ignore_service_padding_on_parse() {
        let addr = parse_addr(AddrType::Svc, AddrLen::L4, &[0x00, 0x02, 0xAB, 0xCD]).unwrap();
        assert_eq!(addr, HostAddr::Svc(ServiceAddr::CONTROL));
    }

    #[test]
    fn should_reject_ip_with_8_bytes() {
        assert_eq!(
            parse_addr(AddrType::Ip, AddrLen::L8, &[0; 8]),
            Err(AddressError::UnsupportedAddrType {
                addr_type: AddrType::Ip,
                addr_len: AddrLen::L8
            })
        );
    }

    #[test]
    fn should_reject_every_unregistered_pair() {
        for bits in 0..16u8 {
            let info = AddressInfo::from_bits(bits);
            if info.is_registered() {
                continue;
            }
            let raw = vec![0u8; info.size_bytes()];
            assert!(matches!(
                parse_addr(info.addr_type(), info.addr_len(), &raw),
                Err(AddressError::UnsupportedAddrType { .. })
            ));
        }
    }

    #[test]
    fn should_reject_mismatched_raw_length() {
        assert_eq!(
            parse_addr(AddrType::Ip, AddrLen::L16, &[0; 4]),
            Err(AddressError::UnsupportedAddrLen {
                expected: 16,
                actual: 4
            })
        );
    }
}
