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

//! Requester configuration.

use serde::{Deserialize, Serialize};

/// Default share of the remaining deadline granted to a single attempt.
pub const DEFAULT_TIMEOUT_FACTOR: f64 = 0.5;

/// Default number of attempts per request.
pub const DEFAULT_MAX_TRIES: usize = 3;

/// Configuration for the [`Requester`](super::Requester).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequesterConfig {
    /// Share of the remaining context deadline a single attempt may take.
    ///
    /// `0` disables the per-attempt timeout, attempts are then only bounded by the deadline
    /// itself. Negative or non-finite values are treated as `0`.
    pub timeout_factor: f64,
    /// Number of attempts per request. `0` selects [`DEFAULT_MAX_TRIES`].
    pub max_tries: usize,
}

impl Default for RequesterConfig {
    fn default() -> Self {
        Self {
            timeout_factor: DEFAULT_TIMEOUT_FACTOR,
            max_tries: DEFAULT_MAX_TRIES,
        }
    }
}

impl RequesterConfig {
    /// Sets the per-attempt timeout factor.
    ///
    /// Defaults to [DEFAULT_TIMEOUT_FACTOR]
    pub fn with_timeout_factor(mut self, timeout_factor: f64) -> Self {
        self.timeout_factor = timeout_factor;
        self
    }

    /// Sets the number of attempts per request.
    ///
    /// Defaults to [DEFAULT_MAX_TRIES]
    pub fn with_max_tries(mut self, max_tries: usize) -> Self {
        self.max_tries = max_tries;
        self
    }

    /// Effective number of attempts per request, at least one.
    pub fn effective_max_tries(&self) -> usize {
        if self.max_tries == 0 {
            return DEFAULT_MAX_TRIES;
        }
        self.max_tries
    }

    /// Effective timeout factor, `None` if attempts are not limited separately.
    pub fn effective_timeout_factor(&self) -> Option<f64> {
        (self.timeout_factor.is_finite() && self.timeout_factor > 0.0).then_some(self.timeout_factor)
    }
}
