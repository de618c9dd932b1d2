//! In-flight randomness requests.

use serde::{Deserialize, Serialize};

use crate::{Address, BoxId, RequestId};

/// A randomness request issued by `open_box` and awaiting the provider.
///
/// At most one exists per box. Its removal by `vrf_callback` is what makes
/// the callback exactly-once: a replayed callback finds nothing to consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VrfPending {
    pub box_id: BoxId,
    pub request_id: RequestId,
    pub request_time: i64,
    pub pool_size: u64,
    pub requester: Address,
}

impl VrfPending {
    /// Earliest time at which the requester may cancel the request.
    ///
    /// Saturates, so a huge timeout simply means "never".
    #[must_use]
    pub fn expires_at(&self, timeout_secs: i64) -> i64 {
        self.request_time.saturating_add(timeout_secs)
    }

    #[must_use]
    pub fn is_expired(&self, now: i64, timeout_secs: i64) -> bool {
        now >= self.expires_at(timeout_secs)
    }
}
