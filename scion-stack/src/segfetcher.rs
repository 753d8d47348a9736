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

//! Segment requests.
//!
//! A [`Requester`] fans a batch of [`SegmentRequest`]s out to one task each. Every task asks
//! the [`DstProvider`] which server to query and then fetches the segments through the
//! [`SegmentRpc`]. Failed attempts are retried until the request succeeds, runs out of
//! attempts, or the [`RequestContext`] is cancelled or expires.

use std::{fmt, net::SocketAddr};

use scion_header::types::address::IsdAsn;

use crate::types::ResFut;

mod config;
mod requester;

pub use config::{DEFAULT_MAX_TRIES, DEFAULT_TIMEOUT_FACTOR, RequesterConfig};
pub use requester::{AttemptError, RequestContext, RequestError, Requester};

/// Error returned by [`SegmentRpc`] and [`DstProvider`] implementations.
pub type RpcError = Box<dyn std::error::Error + Send + Sync>;

/// Type of a path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SegmentType {
    /// Segment from a non-core AS up to a core AS.
    Up,
    /// Segment between core ASes.
    Core,
    /// Segment from a core AS down to a non-core AS.
    Down,
}
impl fmt::Display for SegmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentType::Up => write!(f, "up"),
            SegmentType::Core => write!(f, "core"),
            SegmentType::Down => write!(f, "down"),
        }
    }
}

/// A request for segments of one type between two ASes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentRequest {
    /// Start of the segments.
    pub src: IsdAsn,
    /// End of the segments.
    pub dst: IsdAsn,
    /// Requested segment type.
    pub seg_type: SegmentType,
}
impl SegmentRequest {
    /// Creates a new segment request.
    pub fn new(src: IsdAsn, dst: IsdAsn, seg_type: SegmentType) -> Self {
        Self { src, dst, seg_type }
    }
}
impl fmt::Display for SegmentRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}", self.seg_type, self.src, self.dst)
    }
}

/// Fetches segments from a remote server.
pub trait SegmentRpc: Send + Sync + 'static {
    /// Segments returned by the server.
    type Segments: Send + 'static;

    /// Requests segments for `request` from `peer`.
    fn segments(
        &self,
        request: SegmentRequest,
        peer: SocketAddr,
    ) -> impl ResFut<'_, Self::Segments, RpcError>;
}

/// Provides the server to send a segment request to.
#[async_trait::async_trait]
pub trait DstProvider: Send + Sync + 'static {
    /// Returns the server that should answer `request`.
    async fn dst(&self, request: &SegmentRequest) -> Result<SocketAddr, RpcError>;
}

/// Segments received for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentReply<S> {
    /// The segments.
    pub segments: S,
    /// Server that answered.
    pub peer: SocketAddr,
}

/// Outcome of one request of a batch.
#[derive(Debug)]
pub struct ReplyOrErr<S> {
    /// The request this outcome belongs to.
    pub request: SegmentRequest,
    /// The reply or the reason the request failed.
    pub result: Result<SegmentReply<S>, RequestError>,
}
