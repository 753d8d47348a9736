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

//! Codec for the SCION network-layer header.
//!
//! The crate decodes and encodes the SCION common header, the address header with its
//! polymorphic host addresses, and the forwarding path, and computes the pseudo-header checksum
//! used by upper-layer protocols such as UDP and SCMP.
//!
//! Two representations are offered for every header:
//!
//! * Views ([`ScionHeaderView`](header::view::ScionHeaderView)) borrow the packet buffer and read
//!   fields in place. Decoding a view validates the complete header once; afterwards every
//!   accessor is infallible.
//! * Models ([`ScionPacketHeader`](header::model::ScionPacketHeader)) own their data and can be
//!   mutated freely before being serialized again.
//!
//! ```
//! use std::net::Ipv4Addr;
//!
//! use scion_header::{
//!     core::{encode::SerializeOptions, view::View},
//!     header::{model::ScionPacketHeader, view::ScionHeaderView},
//!     types::address::{Asn, Isd, IsdAsn},
//! };
//!
//! let mut header = ScionPacketHeader::default();
//! header.address.dst_ia = "1-ff00:0:112".parse().unwrap();
//! header.address.src_ia = "1-ff00:0:110".parse().unwrap();
//! header.address.set_dst_addr(Ipv4Addr::new(172, 16, 4, 2)).unwrap();
//! header.address.set_src_addr(Ipv4Addr::new(174, 16, 4, 1)).unwrap();
//!
//! let mut buf = vec![0u8; header.header_size()];
//! header.serialize_to(&mut buf, SerializeOptions::FIX_LENGTHS).unwrap();
//!
//! let (view, _payload) = ScionHeaderView::from_slice(&buf).unwrap();
//! assert_eq!(view.src_ia(), IsdAsn::new(Isd(1), Asn::new(0xff00_0000_0110)));
//! ```

pub mod core;
mod proto;
pub use proto::*;
