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

//! SCMP, the SCION control message protocol.
//!
//! Only the informational blocks carried by traceroute messages are implemented here.

pub mod traceroute;

/// Next header value announcing SCMP.
pub const SCMP_PROTOCOL_NUMBER: u8 = 202;

/// SCMP aligns informational blocks to lines of this many bytes.
pub const LINE_LEN: usize = 8;
