// Copyright 2025 Anapaya Systems
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

//! # SCION stack helpers
//!
//! Control-plane helpers for SCION end hosts built on the
//! [`scion-header`](scion_header) codec.
//!
//! The [`segfetcher`] module requests path segments for a set of
//! [`SegmentRequest`](segfetcher::SegmentRequest)s concurrently. Each request is retried a
//! configurable number of times, and every attempt is bounded by a share of the caller's
//! deadline. Results are delivered over a channel in completion order, exactly one per request.
//!
//! Transport and server discovery are left to the caller through the
//! [`SegmentRpc`](segfetcher::SegmentRpc) and [`DstProvider`](segfetcher::DstProvider) traits.

pub mod segfetcher;
pub mod types;
