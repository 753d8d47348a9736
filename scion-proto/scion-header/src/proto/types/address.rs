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

//! SCION addressing: ISD-AS identifiers and host addresses.
//!
//! A host address travels as raw bytes together with a 4-bit address info field: a 2-bit
//! address type and a 2-bit length class (4, 8, 12 or 16 bytes). Only three pairs are registered:
//!
//! | Address   | Type      | Length |
//! |-----------|-----------|--------|
//! | IPv4      | [`AddrType::Ip`]  | 4  |
//! | IPv6      | [`AddrType::Ip`]  | 16 |
//! | Service   | [`AddrType::Svc`] | 4 (2 bytes + 2 bytes padding) |
//!
//! [`pack_addr`] and [`parse_addr`] convert between [`HostAddr`] and this representation.

mod codec;
mod host;
mod ia;

pub use codec::{RawAddr, pack_addr, parse_addr};
pub use host::{AddrLen, AddrType, AddressInfo, HostAddr, RawHostAddress, ServiceAddr};
pub use ia::{Asn, Isd, IsdAsn};

/// Errors of the address codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum AddressError {
    /// The address type and length class are not a registered pair.
    #[error("unsupported address type {addr_type:?} with length {addr_len:?}")]
    UnsupportedAddrType {
        /// Address type
        addr_type: AddrType,
        /// Length class
        addr_len: AddrLen,
    },
    /// Raw bytes do not match the declared length class.
    #[error("unsupported address length: expected {expected} bytes, got {actual}")]
    UnsupportedAddrLen {
        /// Length implied by the length class.
        expected: usize,
        /// Length of the raw bytes.
        actual: usize,
    },
    /// The address family has no wire representation.
    #[error("unsupported address")]
    UnsupportedAddress,
    /// Text is not a valid `<isd>-<as>` identifier.
    #[error("invalid ISD-AS")]
    InvalidIsdAsn,
}
