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

//! Errors raised while interpreting bytes received from the wire.
//!
//! A decode error is terminal for the buffer it was raised on. Nothing is retried or guessed.

use crate::path::PathType;

/// Reasons a buffer could not be decoded.
#[derive(Clone, Copy, Debug, thiserror::Error, PartialEq, Eq, Hash)]
pub enum DecodeError {
    /// The buffer ends before the named part is complete.
    #[error("buffer too short at {at}: required {required}, actual {actual}")]
    BufferTooShort {
        /// Part of the structure that did not fit.
        at: &'static str,
        /// Bytes required up to the end of that part.
        required: usize,
        /// Bytes available.
        actual: usize,
    },
    /// The version field holds a value other than 0.
    #[error("unsupported header version {0}")]
    UnsupportedVersion(u8),
    /// The address type and length pair is not registered.
    #[error("unsupported address type {addr_type} with length {addr_len} bytes")]
    UnsupportedAddrType {
        /// Two-bit address type.
        addr_type: u8,
        /// Address length in bytes.
        addr_len: usize,
    },
    /// The address type is known but the length class is not registered for it.
    #[error("unsupported length {addr_len} bytes for address type {addr_type}")]
    UnsupportedAddrLen {
        /// Two-bit address type.
        addr_type: u8,
        /// Address length in bytes.
        addr_len: usize,
    },
    /// No path variant is registered for the path type.
    #[error("unsupported path type {0}")]
    UnsupportedPathType(PathType),
    /// The path reports a length that differs from the room the header length leaves for it.
    #[error("path length mismatch: header leaves {advertised} bytes, path needs {actual}")]
    PathLengthMismatch {
        /// Bytes between the end of the address header and the end of the header.
        advertised: usize,
        /// Bytes the path reports for itself.
        actual: usize,
    },
    /// The header length does not even cover the common and address headers.
    #[error("invalid header length: advertised {advertised}, minimum {minimum}")]
    InvalidHeaderLength {
        /// Header length in bytes as advertised.
        advertised: usize,
        /// Bytes taken by the common and address headers.
        minimum: usize,
    },
    /// The path bytes are structurally invalid.
    #[error("invalid path: {0}")]
    InvalidPath(&'static str),
}
