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

//! Concurrent segment requester.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use tokio::{select, sync::mpsc, time::Instant};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use super::{
    DstProvider, ReplyOrErr, RequesterConfig, RpcError, SegmentReply, SegmentRequest, SegmentRpc,
};

/// Deadline and cancellation shared by all requests of a batch.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    deadline: Option<Instant>,
    cancel: CancellationToken,
}

impl RequestContext {
    /// A context without deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the deadline to `timeout` from now.
    ///
    /// A timeout too large to represent leaves the context without deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Instant::now().checked_add(timeout);
        self
    }

    /// Uses `token` to cancel the requests.
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// The deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Token cancelling all requests using this context.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Cancels all requests using this context.
    pub fn cancel(&self) {
        self.cancel.cancel()
    }

    /// Time left until the deadline, `None` without deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// The reason this context is done, `None` while it is still active.
    pub fn err(&self) -> Option<RequestError> {
        if self.cancel.is_cancelled() {
            return Some(RequestError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if deadline <= Instant::now() => Some(RequestError::DeadlineExceeded),
            _ => None,
        }
    }
}

/// Reason a segment request failed.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// The context was cancelled.
    #[error("request cancelled")]
    Cancelled,
    /// The context deadline passed.
    #[error("request deadline exceeded")]
    DeadlineExceeded,
    /// Every attempt failed.
    #[error("no attempts left after {tries} tries: {last}")]
    AttemptsExhausted {
        /// Number of attempts made.
        tries: usize,
        /// Error of the last attempt.
        #[source]
        last: AttemptError,
    },
}

/// Reason a single attempt failed.
#[derive(Debug, thiserror::Error)]
pub enum AttemptError {
    /// No server could be determined.
    #[error("resolving destination failed: {0}")]
    Dst(#[source] RpcError),
    /// The server did not provide segments.
    #[error("segment request to {peer} failed: {source}")]
    Rpc {
        /// Server that was queried.
        peer: SocketAddr,
        /// Error returned by the RPC.
        source: RpcError,
    },
    /// The attempt took longer than its share of the deadline.
    #[error("attempt timed out after {0:?}")]
    Timeout(Duration),
    /// The context was cancelled during the attempt.
    #[error("attempt cancelled")]
    Cancelled,
}

/// Requests segments for batches of [`SegmentRequest`]s.
pub struct Requester<R: SegmentRpc, D: DstProvider> {
    inner: Arc<RequesterInner<R, D>>,
}

struct RequesterInner<R, D> {
    rpc: R,
    dst_provider: D,
    config: RequesterConfig,
}

impl<R: SegmentRpc, D: DstProvider> Clone for Requester<R, D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: SegmentRpc, D: DstProvider> Requester<R, D> {
    /// Creates a new requester.
    pub fn new(rpc: R, dst_provider: D, config: RequesterConfig) -> Self {
        Self {
            inner: Arc::new(RequesterInner {
                rpc,
                dst_provider,
                config,
            }),
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &RequesterConfig {
        &self.inner.config
    }

    /// Starts one task per request and returns the channel their outcomes are delivered on.
    ///
    /// Exactly one [`ReplyOrErr`] is sent per request, in completion order. The channel closes
    /// once every request has finished. Dropping the receiver does not stop the requests, use
    /// the context for that.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    pub fn request(
        &self,
        ctx: &RequestContext,
        requests: Vec<SegmentRequest>,
    ) -> mpsc::Receiver<ReplyOrErr<R::Segments>> {
        let (tx, rx) = mpsc::channel(requests.len().max(1));

        for request in requests {
            let inner = Arc::clone(&self.inner);
            let ctx = ctx.clone();
            let tx = tx.clone();
            let span = tracing::debug_span!(
                "segment_request",
                src = %request.src,
                dst = %request.dst,
                seg_type = %request.seg_type,
            );

            tokio::spawn(
                async move {
                    let result = inner.run(&ctx, request).await;
                    // Capacity covers every request, so this never waits
                    let _ = tx.send(ReplyOrErr { request, result }).await;
                }
                .instrument(span),
            );
        }

        rx
    }
}

impl<R: SegmentRpc, D: DstProvider> RequesterInner<R, D> {
    async fn run(
        &self,
        ctx: &RequestContext,
        request: SegmentRequest,
    ) -> Result<SegmentReply<R::Segments>, RequestError> {
        let max_tries = self.config.effective_max_tries();
        let mut tries = 0;

        loop {
            if let Some(error) = ctx.err() {
                tracing::debug!(tries, %error, "Segment request aborted");
                return Err(error);
            }

            tries += 1;
            match self.attempt(ctx, request).await {
                Ok(reply) => {
                    tracing::trace!(tries, peer = %reply.peer, "Segment request succeeded");
                    return Ok(reply);
                }
                Err(error) => {
                    tracing::debug!(attempt = tries, %error, "Segment lookup failed");

                    if tries >= max_tries {
                        let error = ctx.err().unwrap_or(RequestError::AttemptsExhausted {
                            tries,
                            last: error,
                        });
                        tracing::debug!(%error, "Segment request failed");
                        return Err(error);
                    }
                }
            }
        }
    }

    async fn attempt(
        &self,
        ctx: &RequestContext,
        request: SegmentRequest,
    ) -> Result<SegmentReply<R::Segments>, AttemptError> {
        let lookup = async {
            let peer = self
                .dst_provider
                .dst(&request)
                .await
                .map_err(AttemptError::Dst)?;
            let segments = self
                .rpc
                .segments(request, peer)
                .await
                .map_err(|source| AttemptError::Rpc { peer, source })?;
            Ok(SegmentReply { segments, peer })
        };

        let timeout = self.attempt_timeout(ctx);
        // The lookup is polled first so that a finished lookup wins over a concurrent cancel
        select! {
            biased;
            res = async {
                match timeout {
                    Some(timeout) => {
                        tokio::time::timeout(timeout, lookup)
                            .await
                            .unwrap_or(Err(AttemptError::Timeout(timeout)))
                    }
                    None => lookup.await,
                }
            } => res,
            _ = ctx.cancel.cancelled() => Err(AttemptError::Cancelled),
        }
    }

    /// Time budget of the next attempt: the configured share of the remaining deadline, and
    /// never more than the deadline itself.
    fn attempt_timeout(&self, ctx: &RequestContext) -> Option<Duration> {
        let remaining = ctx.remaining()?;
        let Some(factor) = self.config.effective_timeout_factor() else {
            return Some(remaining);
        };

        let share = Duration::try_from_secs_f64(remaining.as_secs_f64() * factor)
            .unwrap_or(remaining);
        Some(share.min(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn context_should_expire_at_deadline() {
        let ctx = RequestContext::new().with_timeout(Duration::from_secs(2));
        assert!(ctx.err().is_none());
        assert_eq!(ctx.remaining(), Some(Duration::from_secs(2)));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(matches!(ctx.err(), Some(RequestError::DeadlineExceeded)));
        assert_eq!(ctx.remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn cancellation_should_take_precedence() {
        let ctx = RequestContext::new();
        assert!(ctx.err().is_none());
        assert_eq!(ctx.remaining(), None);

        ctx.clone().cancel();
        assert!(matches!(ctx.err(), Some(RequestError::Cancelled)));
    }
}
