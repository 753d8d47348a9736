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

//! Zero-copy views over byte buffers.
//!
//! A view is a `#[repr(transparent)]` wrapper around `[u8]`, so `&[u8]`, `&mut [u8]` and
//! `Box<[u8]>` can be reinterpreted as `&View`, `&mut View` and `Box<View>`. Borrowing and
//! ownership stay with the standard pointer types.
//!
//! The buffer is validated once in [`View::has_required_size`]. Every accessor afterwards relies
//! on that validation. Views only expose setters for fields that cannot change the size of the
//! structure; size-changing edits go through the owned models.

use crate::core::decode::DecodeError;

/// A zero-copy view over a byte buffer.
///
/// Views are only reachable through the validating constructors; skipping validation requires
/// `unsafe`:
///
/// ```compile_fail
/// use scion_header::{core::view::View, header::view::ScionHeaderView};
///
/// let _ = ScionHeaderView::cast(&[0u8; 4]).dst_ia();
/// ```
pub trait View {
    /// Validates `buf` and returns the number of bytes the view covers.
    ///
    /// Every accessor of the view may index into the first `n` bytes, where `n` is the returned
    /// size, so the implementation must check every size relevant field.
    fn has_required_size(buf: &[u8]) -> Result<usize, DecodeError>;

    /// Reinterprets a byte slice as the view without validating it.
    ///
    /// # Safety
    /// The caller must ensure that [`View::has_required_size`] accepts `buf`. Accessors index
    /// into the buffer based on the validated fields.
    unsafe fn cast(buf: &[u8]) -> &Self;

    /// Reinterprets a mutable byte slice as the view without validating it.
    ///
    /// # Safety
    /// The caller must ensure that [`View::has_required_size`] accepts `buf`.
    unsafe fn cast_mut(buf: &mut [u8]) -> &mut Self;

    /// Reinterprets a boxed byte slice as the view without validating it.
    ///
    /// # Safety
    /// The caller must ensure that [`View::has_required_size`] accepts `buf`.
    unsafe fn cast_boxed(buf: Box<[u8]>) -> Box<Self>;

    /// The bytes covered by the view.
    fn as_bytes(&self) -> &[u8];

    /// Validates `buf` and splits it into the view and the remaining bytes.
    #[inline]
    fn from_slice(buf: &[u8]) -> Result<(&Self, &[u8]), DecodeError> {
        let size = Self::has_required_size(buf)?;
        let (view_buf, rest) = buf.split_at(size);
        // SAFETY: view_buf holds exactly the validated size
        Ok((unsafe { Self::cast(view_buf) }, rest))
    }

    /// Validates `buf` and splits it into a mutable view and the remaining bytes.
    #[inline]
    fn from_mut_slice(buf: &mut [u8]) -> Result<(&mut Self, &mut [u8]), DecodeError> {
        let size = Self::has_required_size(buf)?;
        let (view_buf, rest) = buf.split_at_mut(size);
        // SAFETY: view_buf holds exactly the validated size
        Ok((unsafe { Self::cast_mut(view_buf) }, rest))
    }

    /// Validates a boxed buffer and takes ownership of it. Trailing bytes beyond the view are
    /// dropped.
    #[inline]
    fn from_boxed(buf: Box<[u8]>) -> Result<Box<Self>, DecodeError> {
        let size = Self::has_required_size(&buf)?;
        if buf.len() == size {
            // SAFETY: buf was validated above
            return Ok(unsafe { Self::cast_boxed(buf) });
        }

        let mut buf = buf.into_vec();
        buf.truncate(size);
        // SAFETY: truncating to the validated size keeps every field the view reads
        Ok(unsafe { Self::cast_boxed(buf.into_boxed_slice()) })
    }

    /// Copies the view into an owned allocation.
    #[inline]
    fn to_owned(&self) -> Box<Self> {
        // SAFETY: the bytes of an existing view were validated when it was created
        unsafe { Self::cast_boxed(self.as_bytes().to_vec().into_boxed_slice()) }
    }
}

pub(crate) mod macros {
    /// Implements the pointer casts of [`View`](crate::core::view::View) for a
    /// `#[repr(transparent)]` wrapper around `[u8]`.
    macro_rules! impl_view_casts {
        () => {
            #[inline]
            unsafe fn cast(buf: &[u8]) -> &Self {
                // SAFETY: Self is repr(transparent) over [u8]
                unsafe { &*(buf as *const [u8] as *const Self) }
            }

            #[inline]
            unsafe fn cast_mut(buf: &mut [u8]) -> &mut Self {
                // SAFETY: Self is repr(transparent) over [u8]
                unsafe { &mut *(buf as *mut [u8] as *mut Self) }
            }

            #[inline]
            unsafe fn cast_boxed(buf: Box<[u8]>) -> Box<Self> {
                // SAFETY: Self is repr(transparent) over [u8], the allocation layout is identical
                unsafe { Box::from_raw(Box::into_raw(buf) as *mut Self) }
            }

            #[inline]
            fn as_bytes(&self) -> &[u8] {
                &self.0
            }
        };
    }
    pub(crate) use impl_view_casts;

    /// Generates a reader for a fixed position field - expects self to be a wrapper around [u8]
    macro_rules! gen_field_read {
        ($name:ident, $bit_range:expr, $repr:ty) => {
            #[inline]
            #[allow(missing_docs)]
            pub fn $name(&self) -> $repr {
                $crate::core::read::read_bits::<$repr>(&self.0, $bit_range)
            }
        };
    }
    pub(crate) use gen_field_read;

    /// Generates a writer for a fixed position field - expects self to be a wrapper around [u8]
    macro_rules! gen_field_write {
        ($name:ident, $bit_range:expr, $repr:ty) => {
            #[inline]
            #[allow(missing_docs)]
            pub fn $name(&mut self, value: $repr) {
                $crate::core::write::write_bits::<$repr>(&mut self.0, $bit_range, value)
            }
        };
    }
    pub(crate) use gen_field_write;
}
