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

use std::{
    fmt,
    net::{IpAddr, Ipv4Addr, Ipv6Addr},
};

use super::{
    AddressError,
    codec::{RawAddr, pack_addr, parse_addr},
};

/// Two-bit host address type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddrType {
    /// IP address, length class selects the family.
    Ip,
    /// Service address.
    Svc,
    /// Unassigned type value (2 or 3).
    Reserved(u8),
}
impl From<u8> for AddrType {
    /// Interprets the two least significant bits.
    fn from(value: u8) -> Self {
        match value & 0b11 {
            0 => AddrType::Ip,
            1 => AddrType::Svc,
            other => AddrType::Reserved(other),
        }
    }
}
impl From<AddrType> for u8 {
    fn from(value: AddrType) -> Self {
        match value {
            AddrType::Ip => 0,
            AddrType::Svc => 1,
            AddrType::Reserved(other) => other & 0b11,
        }
    }
}

/// Two-bit host address length class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddrLen {
    /// 4 bytes
    L4,
    /// 8 bytes
    L8,
    /// 12 bytes
    L12,
    /// 16 bytes
    L16,
}
impl AddrLen {
    /// Length of the address field in bytes.
    pub const fn size_bytes(&self) -> usize {
        match self {
            AddrLen::L4 => 4,
            AddrLen::L8 => 8,
            AddrLen::L12 => 12,
            AddrLen::L16 => 16,
        }
    }

    /// The length class of a field of `size` bytes, if there is one.
    pub const fn from_size_bytes(size: usize) -> Option<Self> {
        match size {
            4 => Some(AddrLen::L4),
            8 => Some(AddrLen::L8),
            12 => Some(AddrLen::L12),
            16 => Some(AddrLen::L16),
            _ => None,
        }
    }
}
impl From<u8> for AddrLen {
    /// Interprets the two least significant bits.
    fn from(value: u8) -> Self {
        match value & 0b11 {
            0 => AddrLen::L4,
            1 => AddrLen::L8,
            2 => AddrLen::L12,
            _ => AddrLen::L16,
        }
    }
}
impl From<AddrLen> for u8 {
    fn from(value: AddrLen) -> Self {
        match value {
            AddrLen::L4 => 0,
            AddrLen::L8 => 1,
            AddrLen::L12 => 2,
            AddrLen::L16 => 3,
        }
    }
}

/// The four-bit address info field of the common header: type in the upper two bits, length
/// class in the lower two.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressInfo(u8);
impl AddressInfo {
    /// IPv4 host address.
    pub const IPV4: AddressInfo = AddressInfo::new(AddrType::Ip, AddrLen::L4);
    /// IPv6 host address.
    pub const IPV6: AddressInfo = AddressInfo::new(AddrType::Ip, AddrLen::L16);
    /// Service address.
    pub const SVC: AddressInfo = AddressInfo::new(AddrType::Svc, AddrLen::L4);

    /// Combines type and length class.
    pub const fn new(addr_type: AddrType, addr_len: AddrLen) -> Self {
        let addr_type = match addr_type {
            AddrType::Ip => 0,
            AddrType::Svc => 1,
            AddrType::Reserved(other) => other & 0b11,
        };
        let addr_len = match addr_len {
            AddrLen::L4 => 0,
            AddrLen::L8 => 1,
            AddrLen::L12 => 2,
            AddrLen::L16 => 3,
        };
        AddressInfo((addr_type << 2) | addr_len)
    }

    /// Interprets the four least significant bits.
    pub const fn from_bits(bits: u8) -> Self {
        AddressInfo(bits & 0b1111)
    }

    /// The four-bit wire value.
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// The address type.
    pub fn addr_type(&self) -> AddrType {
        AddrType::from(self.0 >> 2)
    }

    /// The length class.
    pub fn addr_len(&self) -> AddrLen {
        AddrLen::from(self.0)
    }

    /// Size of the host address field in bytes.
    pub fn size_bytes(&self) -> usize {
        self.addr_len().size_bytes()
    }

    /// Whether the pair is one of the registered address formats.
    pub const fn is_registered(&self) -> bool {
        matches!(
            *self,
            AddressInfo::IPV4 | AddressInfo::IPV6 | AddressInfo::SVC
        )
    }
}
impl Default for AddressInfo {
    fn default() -> Self {
        AddressInfo::IPV4
    }
}
impl fmt::Debug for AddressInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddressInfo")
            .field("addr_type", &self.addr_type())
            .field("addr_len", &self.addr_len())
            .finish()
    }
}

/// SCION service address, a 16-bit identifier of an infrastructure service rather than a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceAddr(pub u16);
impl ServiceAddr {
    /// Discovery service.
    pub const DISCOVERY: ServiceAddr = ServiceAddr(0x0001);
    /// Control service.
    pub const CONTROL: ServiceAddr = ServiceAddr(0x0002);
    /// Any service.
    pub const WILDCARD: ServiceAddr = ServiceAddr(0x0010);
    /// No service.
    pub const NONE: ServiceAddr = ServiceAddr(0xFFFF);

    const MULTICAST_FLAG: u16 = 0x8000;

    /// Whether the address targets all instances instead of any one.
    pub const fn is_multicast(&self) -> bool {
        self.0 != Self::NONE.0 && self.0 & Self::MULTICAST_FLAG != 0
    }

    /// The multicast variant of the address.
    pub const fn multicast(self) -> Self {
        ServiceAddr(self.0 | Self::MULTICAST_FLAG)
    }

    /// The anycast variant of the address.
    pub const fn anycast(self) -> Self {
        ServiceAddr(self.0 & !Self::MULTICAST_FLAG)
    }
}
impl fmt::Display for ServiceAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::NONE {
            return write!(f, "NONE");
        }
        let name = match self.anycast() {
            Self::DISCOVERY => "DS",
            Self::CONTROL => "CS",
            Self::WILDCARD => "Wildcard",
            other => return write!(f, "SVC({:#06x})", other.0),
        };
        if self.is_multicast() {
            write!(f, "{name}_M")
        } else {
            write!(f, "{name}")
        }
    }
}

/// A host address inside an AS.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HostAddr {
    /// IPv4 host.
    Ipv4(Ipv4Addr),
    /// IPv6 host.
    Ipv6(Ipv6Addr),
    /// Service address.
    Svc(ServiceAddr),
    /// Address of a family this codec cannot put on the wire.
    Unknown {
        /// Address type the family would use.
        addr_type: u8,
        /// Raw address bytes.
        bytes: RawAddr,
    },
}
impl HostAddr {
    /// The IP address, if this is an IP host.
    pub fn ip(&self) -> Option<IpAddr> {
        match self {
            HostAddr::Ipv4(v4) => Some(IpAddr::V4(*v4)),
            HostAddr::Ipv6(v6) => Some(IpAddr::V6(*v6)),
            _ => None,
        }
    }

    /// The service address, if this is one.
    pub fn svc(&self) -> Option<ServiceAddr> {
        match self {
            HostAddr::Svc(svc) => Some(*svc),
            _ => None,
        }
    }
}
impl From<Ipv4Addr> for HostAddr {
    fn from(value: Ipv4Addr) -> Self {
        HostAddr::Ipv4(value)
    }
}
impl From<Ipv6Addr> for HostAddr {
    fn from(value: Ipv6Addr) -> Self {
        HostAddr::Ipv6(value)
    }
}
impl From<IpAddr> for HostAddr {
    fn from(value: IpAddr) -> Self {
        match value {
            IpAddr::V4(v4) => HostAddr::Ipv4(v4),
            IpAddr::V6(v6) => HostAddr::Ipv6(v6),
        }
    }
}
impl From<ServiceAddr> for HostAddr {
    fn from(value: ServiceAddr) -> Self {
        HostAddr::Svc(value)
    }
}
impl fmt::Display for HostAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostAddr::Ipv4(v4) => write!(f, "{v4}"),
            HostAddr::Ipv6(v6) => write!(f, "{v6}"),
            HostAddr::Svc(svc) => write!(f, "{svc}"),
            HostAddr::Unknown { addr_type, bytes } => {
                write!(f, "unknown({addr_type}, {:02x?})", bytes.as_slice())
            }
        }
    }
}

/// A host address as stored in the address header: address info plus raw bytes.
///
/// The byte count always matches the length class. The pair itself may be unregistered, in
/// which case [`RawHostAddress::host_addr`] fails.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawHostAddress {
    info: AddressInfo,
    bytes: RawAddr,
}
impl RawHostAddress {
    /// Combines address info and raw bytes.
    ///
    /// Fails with [`AddressError::UnsupportedAddrLen`] if the byte count does not match the
    /// length class.
    pub fn new(info: AddressInfo, bytes: &[u8]) -> Result<Self, AddressError> {
        let expected = info.size_bytes();
        if bytes.len() != expected {
            return Err(AddressError::UnsupportedAddrLen {
                expected,
                actual: bytes.len(),
            });
        }
        Ok(Self::from_validated(info, bytes))
    }

    /// Packs a host address.
    pub fn from_host_addr(addr: &HostAddr) -> Result<Self, AddressError> {
        let (addr_len, addr_type, bytes) = pack_addr(addr)?;
        Ok(RawHostAddress {
            info: AddressInfo::new(addr_type, addr_len),
            bytes,
        })
    }

    /// Callers guarantee that `bytes` matches the length class.
    pub(crate) fn from_validated(info: AddressInfo, bytes: &[u8]) -> Self {
        let mut raw = RawAddr::new();
        raw.extend_from_slice(bytes);
        RawHostAddress { info, bytes: raw }
    }

    /// The address info.
    pub fn info(&self) -> AddressInfo {
        self.info
    }

    /// The raw address bytes, including padding.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Parses the raw bytes into a host address.
    pub fn host_addr(&self) -> Result<HostAddr, AddressError> {
        parse_addr(self.info.addr_type(), self.info.addr_len(), &self.bytes)
    }
}
impl Default for RawHostAddress {
    /// The unspecified IPv4 address.
    fn default() -> Self {
        RawHostAddress::from_validated(AddressInfo::IPV4, &[0; 4])
    }
}
