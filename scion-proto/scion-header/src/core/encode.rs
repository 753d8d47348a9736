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

//! Encoding of models into byte buffers.
//!
//! Every model that can be put on the wire implements [`WireEncode`]:
//!
//! 1. [`WireEncode::required_size`] reports the encoded size.
//! 2. [`WireEncode::wire_valid`] checks the fields that encoding relies on. This is not a semantic
//!    validation, it only rejects states that would produce bytes a decoder cannot read back
//!    (e.g. a raw path whose length is not a multiple of 4).
//! 3. [`WireEncode::encode_unchecked`] writes the bytes.

/// Allows encoding to wire format.
pub trait WireEncode {
    /// Size of the wire encoding in bytes.
    ///
    /// Must be exact, it is used to size buffers for [`WireEncode::encode_unchecked`].
    fn required_size(&self) -> usize;

    /// Checks that the structure can be encoded into a decodable byte sequence.
    fn wire_valid(&self) -> Result<(), InvalidStructureError>;

    /// Writes the wire encoding to the start of `buf` and returns the number of bytes written.
    ///
    /// # Panics
    ///
    /// May panic if `buf` is shorter than [`WireEncode::required_size`] or if
    /// [`WireEncode::wire_valid`] fails.
    fn encode_unchecked(&self, buf: &mut [u8]) -> usize;

    /// Writes the wire encoding to the start of `buf` after validating structure and buffer size.
    ///
    /// Returns the number of bytes written.
    fn encode(&self, buf: &mut [u8]) -> Result<usize, EncodeError> {
        self.wire_valid()?;

        let required_size = self.required_size();
        if buf.len() < required_size {
            return Err(EncodeError::BufferTooSmall(required_size));
        }

        Ok(self.encode_unchecked(buf))
    }

    /// Encodes into a freshly allocated buffer of exactly the required size.
    fn encode_to_vec(&self) -> Result<Vec<u8>, EncodeError> {
        let mut buf = vec![0u8; self.required_size()];
        self.encode(&mut buf)?;
        Ok(buf)
    }
}

/// Errors that can occur during encoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// The structure which was attempted to be encoded is invalid.
    #[error(transparent)]
    InvalidStructure(#[from] InvalidStructureError),
    /// The provided buffer is too small.
    #[error("buffer too small: required {0}")]
    BufferTooSmall(usize),
    /// The address belongs to a family without a wire representation.
    #[error("unsupported address")]
    UnsupportedAddress,
    /// The header does not fit the 8-bit header length field.
    #[error("header too large: {0} bytes")]
    HeaderTooLarge(usize),
    /// The payload does not fit its length field.
    #[error("payload too large: {0} bytes")]
    PayloadTooLarge(usize),
}

/// Given structure has fields that cannot be encoded correctly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot encode structure: {0}")]
pub struct InvalidStructureError(&'static str);
impl InvalidStructureError {
    /// Description of the offending field.
    pub fn reason(&self) -> &'static str {
        self.0
    }
}
impl From<&'static str> for InvalidStructureError {
    fn from(s: &'static str) -> Self {
        InvalidStructureError(s)
    }
}

/// Options for serializing structures whose length fields depend on their content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SerializeOptions {
    /// Recompute length fields from the actual sizes instead of writing the stored values.
    pub fix_lengths: bool,
}
impl SerializeOptions {
    /// Recompute all length fields before writing.
    pub const FIX_LENGTHS: SerializeOptions = SerializeOptions { fix_lengths: true };
    /// Write length fields as stored.
    pub const KEEP_LENGTHS: SerializeOptions = SerializeOptions { fix_lengths: false };
}
