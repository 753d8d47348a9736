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

//! Segment requester behavior against scripted RPC and destination providers.

use std::{
    collections::{HashMap, VecDeque},
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use scion_header::types::address::IsdAsn;
use scion_stack::segfetcher::{
    AttemptError, DstProvider, ReplyOrErr, RequestContext, RequestError, Requester,
    RequesterConfig, RpcError, SegmentReply, SegmentRequest, SegmentRpc, SegmentType,
};
use tokio::{sync::mpsc, time::Instant};

const PEER: &str = "10.0.0.1:30252";

#[derive(Debug, Clone, Copy)]
enum Reply {
    Segments(u32),
    Fail,
    Hang,
    Delayed(Duration, u32),
}

#[derive(Default)]
struct RpcState {
    replies: HashMap<SegmentRequest, VecDeque<Reply>>,
    calls: Vec<(SegmentRequest, SocketAddr)>,
}

/// Answers each request with its scripted replies in order, failing once they run out.
#[derive(Clone, Default)]
struct ScriptedRpc {
    state: Arc<Mutex<RpcState>>,
}

impl ScriptedRpc {
    fn script(&self, request: SegmentRequest, replies: impl IntoIterator<Item = Reply>) {
        self.state
            .lock()
            .unwrap()
            .replies
            .insert(request, replies.into_iter().collect());
    }

    fn calls(&self, request: SegmentRequest) -> usize {
        let state = self.state.lock().unwrap();
        state.calls.iter().filter(|(req, _)| *req == request).count()
    }
}

impl SegmentRpc for ScriptedRpc {
    type Segments = u32;

    async fn segments(&self, request: SegmentRequest, peer: SocketAddr) -> Result<u32, RpcError> {
        let reply = {
            let mut state = self.state.lock().unwrap();
            state.calls.push((request, peer));
            state
                .replies
                .get_mut(&request)
                .and_then(|replies| replies.pop_front())
                .unwrap_or(Reply::Fail)
        };

        match reply {
            Reply::Segments(segments) => Ok(segments),
            Reply::Fail => Err("server error".into()),
            Reply::Hang => std::future::pending().await,
            Reply::Delayed(delay, segments) => {
                tokio::time::sleep(delay).await;
                Ok(segments)
            }
        }
    }
}

/// Returns a fixed peer after failing a given number of times.
struct FlakyDst {
    failures_left: AtomicUsize,
}

impl FlakyDst {
    fn reliable() -> Self {
        Self::failing(0)
    }

    fn failing(times: usize) -> Self {
        Self {
            failures_left: AtomicUsize::new(times),
        }
    }
}

#[async_trait::async_trait]
impl DstProvider for FlakyDst {
    async fn dst(&self, _request: &SegmentRequest) -> Result<SocketAddr, RpcError> {
        let failed = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failed {
            return Err("no server known".into());
        }
        Ok(PEER.parse()?)
    }
}

fn request(dst: &str, seg_type: SegmentType) -> SegmentRequest {
    SegmentRequest::new(
        "1-ff00:0:110".parse::<IsdAsn>().unwrap(),
        dst.parse().unwrap(),
        seg_type,
    )
}

async fn collect<S>(
    mut rx: mpsc::Receiver<ReplyOrErr<S>>,
) -> HashMap<SegmentRequest, Result<SegmentReply<S>, RequestError>> {
    let mut results = HashMap::new();
    while let Some(ReplyOrErr { request, result }) = rx.recv().await {
        assert!(
            results.insert(request, result).is_none(),
            "duplicate reply for {request}"
        );
    }
    results
}

#[test_log::test(tokio::test(start_paused = true))]
async fn every_request_should_get_exactly_one_reply() {
    let rpc = ScriptedRpc::default();
    let first_try = request("1-ff00:0:1", SegmentType::Up);
    let second_try = request("1-ff00:0:2", SegmentType::Core);
    let never = request("1-ff00:0:3", SegmentType::Down);
    rpc.script(first_try, [Reply::Segments(1)]);
    rpc.script(second_try, [Reply::Fail, Reply::Segments(2)]);
    rpc.script(never, [Reply::Fail, Reply::Fail, Reply::Fail, Reply::Segments(3)]);

    let requester = Requester::new(rpc.clone(), FlakyDst::reliable(), RequesterConfig::default());
    let rx = requester.request(&RequestContext::new(), vec![first_try, second_try, never]);
    let mut results = collect(rx).await;

    assert_eq!(results.len(), 3);
    let peer: SocketAddr = PEER.parse().unwrap();
    assert_eq!(
        results.remove(&first_try).unwrap().unwrap(),
        SegmentReply { segments: 1, peer }
    );
    assert_eq!(results.remove(&second_try).unwrap().unwrap().segments, 2);
    match results.remove(&never).unwrap() {
        Err(RequestError::AttemptsExhausted { tries, last }) => {
            assert_eq!(tries, 3);
            assert!(matches!(last, AttemptError::Rpc { peer: p, .. } if p == peer));
        }
        other => panic!("unexpected result {other:?}"),
    }

    assert_eq!(rpc.calls(first_try), 1);
    assert_eq!(rpc.calls(second_try), 2);
    assert_eq!(rpc.calls(never), 3);
}

#[test_log::test(tokio::test(start_paused = true))]
async fn destination_failures_should_be_retried() {
    let rpc = ScriptedRpc::default();
    let req = request("1-ff00:0:1", SegmentType::Up);
    rpc.script(req, [Reply::Segments(7)]);

    let requester = Requester::new(rpc.clone(), FlakyDst::failing(2), RequesterConfig::default());
    let mut results = collect(requester.request(&RequestContext::new(), vec![req])).await;

    assert_eq!(results.remove(&req).unwrap().unwrap().segments, 7);
    // Only the last attempt reached the server
    assert_eq!(rpc.calls(req), 1);
}

#[test_log::test(tokio::test(start_paused = true))]
async fn zero_max_tries_should_use_default() {
    let rpc = ScriptedRpc::default();
    let req = request("1-ff00:0:1", SegmentType::Core);

    let config = RequesterConfig::default().with_max_tries(0);
    let requester = Requester::new(rpc.clone(), FlakyDst::reliable(), config);
    let mut results = collect(requester.request(&RequestContext::new(), vec![req])).await;

    assert!(matches!(
        results.remove(&req).unwrap(),
        Err(RequestError::AttemptsExhausted { tries: 3, .. })
    ));
    assert_eq!(rpc.calls(req), 3);
}

#[test_log::test(tokio::test(start_paused = true))]
async fn attempts_should_get_a_share_of_the_deadline() {
    let rpc = ScriptedRpc::default();
    let req = request("1-ff00:0:1", SegmentType::Down);
    rpc.script(req, [Reply::Hang, Reply::Segments(4)]);

    let config = RequesterConfig::default().with_timeout_factor(0.5);
    let requester = Requester::new(rpc.clone(), FlakyDst::reliable(), config);
    let ctx = RequestContext::new().with_timeout(Duration::from_secs(10));

    let start = Instant::now();
    let mut results = collect(requester.request(&ctx, vec![req])).await;
    let elapsed = start.elapsed();

    assert_eq!(results.remove(&req).unwrap().unwrap().segments, 4);
    assert_eq!(rpc.calls(req), 2);
    // First attempt was cut off after half of the deadline
    assert!(elapsed >= Duration::from_secs(5), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_secs(6), "elapsed {elapsed:?}");
}

#[test_log::test(tokio::test(start_paused = true))]
async fn deadline_should_end_hanging_request() {
    let rpc = ScriptedRpc::default();
    let req = request("1-ff00:0:1", SegmentType::Up);
    rpc.script(req, [Reply::Hang; 3]);

    // No per-attempt timeout, only the deadline bounds the attempt
    let config = RequesterConfig::default().with_timeout_factor(0.0);
    let requester = Requester::new(rpc.clone(), FlakyDst::reliable(), config);
    let ctx = RequestContext::new().with_timeout(Duration::from_secs(1));

    let mut results = collect(requester.request(&ctx, vec![req])).await;

    assert!(matches!(
        results.remove(&req).unwrap(),
        Err(RequestError::DeadlineExceeded)
    ));
    assert_eq!(rpc.calls(req), 1);
}

#[test_log::test(tokio::test(start_paused = true))]
async fn cancellation_should_end_all_requests() {
    let rpc = ScriptedRpc::default();
    let requests = [
        request("1-ff00:0:1", SegmentType::Up),
        request("1-ff00:0:2", SegmentType::Up),
    ];
    for req in requests {
        rpc.script(req, [Reply::Hang]);
    }

    let requester = Requester::new(rpc.clone(), FlakyDst::reliable(), RequesterConfig::default());
    let ctx = RequestContext::new();
    let rx = requester.request(&ctx, requests.to_vec());

    tokio::spawn({
        let ctx = ctx.clone();
        async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            ctx.cancel();
        }
    });

    let results = collect(rx).await;
    assert_eq!(results.len(), 2);
    for result in results.values() {
        assert!(matches!(result, Err(RequestError::Cancelled)));
    }
}

#[test_log::test(tokio::test(start_paused = true))]
async fn reply_arriving_with_cancellation_should_be_reported() {
    let rpc = ScriptedRpc::default();
    let req = request("1-ff00:0:1", SegmentType::Down);
    rpc.script(req, [Reply::Delayed(Duration::from_secs(1), 5)]);

    let requester = Requester::new(rpc.clone(), FlakyDst::reliable(), RequesterConfig::default());
    let ctx = RequestContext::new();
    tokio::spawn({
        let ctx = ctx.clone();
        async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            ctx.cancel();
        }
    });

    let mut results = collect(requester.request(&ctx, vec![req])).await;
    let reply = results.remove(&req).unwrap().unwrap();
    assert_eq!(reply.segments, 5);
    assert_eq!(rpc.calls(req), 1);
}

#[test_log::test(tokio::test(start_paused = true))]
async fn cancelled_context_should_not_send_requests() {
    let rpc = ScriptedRpc::default();
    let req = request("1-ff00:0:1", SegmentType::Core);
    rpc.script(req, [Reply::Segments(1)]);

    let requester = Requester::new(rpc.clone(), FlakyDst::reliable(), RequesterConfig::default());
    let ctx = RequestContext::new();
    ctx.cancel();

    let mut results = collect(requester.request(&ctx, vec![req])).await;
    assert!(matches!(
        results.remove(&req).unwrap(),
        Err(RequestError::Cancelled)
    ));
    assert_eq!(rpc.calls(req), 0);
}

#[test_log::test(tokio::test(start_paused = true))]
async fn empty_batch_should_close_channel() {
    let requester = Requester::new(
        ScriptedRpc::default(),
        FlakyDst::reliable(),
        RequesterConfig::default(),
    );
    let mut rx = requester.request(&RequestContext::new(), Vec::new());
    assert!(rx.recv().await.is_none());
}
