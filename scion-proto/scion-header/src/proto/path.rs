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

//! Forwarding paths carried after the address header.
//!
//! The header does not know the layout of any path. It asks the variant registered for the path
//! type to decode itself and to report its length, and checks that length against the room the
//! header length field leaves for the path. Registered variants:
//!
//! | Path type            | Variant            | Length |
//! |----------------------|--------------------|--------|
//! | [`PathType::Empty`]  | [`EmptyPath`]      | 0 |
//! | [`PathType::Scion`]  | [`ScionRawPath`]   | meta header + info and hop fields |
//! | [`PathType::OneHop`] | [`OneHopPath`]     | 32 |
//!
//! All other path types are rejected with [`DecodeError::UnsupportedPathType`].

use std::fmt;

use crate::core::{
    decode::DecodeError,
    encode::{InvalidStructureError, WireEncode},
};

pub mod onehop;
pub mod scion;

pub use onehop::OneHopPath;
pub use scion::ScionRawPath;

/// Path type field of the common header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathType {
    /// No path, source and destination are in the same AS.
    Empty,
    /// Standard SCION path.
    Scion,
    /// One-hop path used for beaconing between neighbouring ASes.
    OneHop,
    /// EPIC path.
    Epic,
    /// COLIBRI path.
    Colibri,
    /// Unassigned path type.
    Other(u8),
}
impl From<u8> for PathType {
    fn from(value: u8) -> Self {
        match value {
            0 => PathType::Empty,
            1 => PathType::Scion,
            2 => PathType::OneHop,
            3 => PathType::Epic,
            4 => PathType::Colibri,
            other => PathType::Other(other),
        }
    }
}
impl From<PathType> for u8 {
    fn from(value: PathType) -> Self {
        match value {
            PathType::Empty => 0,
            PathType::Scion => 1,
            PathType::OneHop => 2,
            PathType::Epic => 3,
            PathType::Colibri => 4,
            PathType::Other(other) => other,
        }
    }
}
impl fmt::Display for PathType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathType::Empty => write!(f, "Empty"),
            PathType::Scion => write!(f, "SCION"),
            PathType::OneHop => write!(f, "OneHop"),
            PathType::Epic => write!(f, "EPIC"),
            PathType::Colibri => write!(f, "COLIBRI"),
            PathType::Other(other) => write!(f, "Other({other})"),
        }
    }
}

/// Capability every path variant provides to the header.
///
/// [`WireEncode::required_size`] is the path length. It must equal the length
/// [`PathCodec::wire_len`] reports for the encoded bytes, and stays stable until the path is
/// mutated.
pub trait PathCodec: WireEncode + Sized {
    /// Path type announced in the common header.
    const PATH_TYPE: PathType;

    /// Length of the path encoded at the start of `buf`, read without copying.
    fn wire_len(buf: &[u8]) -> Result<usize, DecodeError>;

    /// Decodes the path at the start of `buf`. Bytes after the path are ignored.
    fn decode_from_bytes(buf: &[u8]) -> Result<Self, DecodeError>;
}

/// The path of a header without a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EmptyPath;
impl PathCodec for EmptyPath {
    const PATH_TYPE: PathType = PathType::Empty;

    fn wire_len(_buf: &[u8]) -> Result<usize, DecodeError> {
        Ok(0)
    }

    fn decode_from_bytes(_buf: &[u8]) -> Result<Self, DecodeError> {
        Ok(EmptyPath)
    }
}
impl WireEncode for EmptyPath {
    fn required_size(&self) -> usize {
        0
    }

    fn wire_valid(&self) -> Result<(), InvalidStructureError> {
        Ok(())
    }

    fn encode_unchecked(&self, _buf: &mut [u8]) -> usize {
        0
    }
}

/// Any registered path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Path {
    /// No path.
    #[default]
    Empty,
    /// Standard SCION path.
    Scion(ScionRawPath),
    /// One-hop path.
    OneHop(OneHopPath),
}
impl Path {
    /// Path type announced in the common header.
    pub fn path_type(&self) -> PathType {
        match self {
            Path::Empty => EmptyPath::PATH_TYPE,
            Path::Scion(_) => ScionRawPath::PATH_TYPE,
            Path::OneHop(_) => OneHopPath::PATH_TYPE,
        }
    }

    /// Length of the path of type `path_type` encoded at the start of `buf`.
    pub fn wire_len(path_type: PathType, buf: &[u8]) -> Result<usize, DecodeError> {
        match path_type {
            PathType::Empty => EmptyPath::wire_len(buf),
            PathType::Scion => ScionRawPath::wire_len(buf),
            PathType::OneHop => OneHopPath::wire_len(buf),
            other => Err(DecodeError::UnsupportedPathType(other)),
        }
    }

    /// Decodes a path of type `path_type` from the start of `buf`.
    pub fn decode(path_type: PathType, buf: &[u8]) -> Result<Self, DecodeError> {
        match path_type {
            PathType::Empty => EmptyPath::decode_from_bytes(buf).map(|_| Path::Empty),
            PathType::Scion => ScionRawPath::decode_from_bytes(buf).map(Path::Scion),
            PathType::OneHop => OneHopPath::decode_from_bytes(buf).map(Path::OneHop),
            other => Err(DecodeError::UnsupportedPathType(other)),
        }
    }
}
impl WireEncode for Path {
    fn required_size(&self) -> usize {
        match self {
            Path::Empty => EmptyPath.required_size(),
            Path::Scion(path) => path.required_size(),
            Path::OneHop(path) => path.required_size(),
        }
    }

    fn wire_valid(&self) -> Result<(), InvalidStructureError> {
        match self {
            Path::Empty => Ok(()),
            Path::Scion(path) => path.wire_valid(),
            Path::OneHop(path) => path.wire_valid(),
        }
    }

    fn encode_unchecked(&self, buf: &mut [u8]) -> usize {
        match self {
            Path::Empty => EmptyPath.encode_unchecked(buf),
            Path::Scion(path) => path.encode_unchecked(buf),
            Path::OneHop(path) => path.encode_unchecked(buf),
        }
    }
}
impl From<ScionRawPath> for Path {
    fn from(value: ScionRawPath) -> Self {
        Path::Scion(value)
    }
}
impl From<OneHopPath> for Path {
    fn from(value: OneHopPath) -> Self {
        Path::OneHop(value)
    }
}
