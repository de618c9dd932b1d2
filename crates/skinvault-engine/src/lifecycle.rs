//! # Box Lifecycle Engine
//!
//! ```text
//!   mint_box ──▶ MINTED ──open_box──▶ (VrfPending) ──vrf_callback──▶ OPENED
//!                              ▲                 │
//!                              └──cancel_open_request (after timeout)
//! ```
//!
//! `open_box` only files a randomness request; the box flips to opened when
//! the registered provider delivers randomness through `vrf_callback`. The
//! request record is consumed by the callback, so a replayed callback has
//! nothing to match against.
//!
//! Every request-record operation runs under the box's guard, which makes
//! "consume the request" and "mark the box opened" one atomic step.

use skinvault_core::{reduce_to_index, validate_randomness};
use skinvault_types::{
    Address, BatchId, BoxId, BoxState, ProtocolEvent, RequestId, Result, SkinVaultError,
    VrfPending,
};
use tracing::{debug, info, warn};

use crate::Vault;

impl Vault {
    /// Mint a new box against a published batch. The caller becomes the owner.
    ///
    /// # Errors
    /// - [`SkinVaultError::ProtocolPaused`] while paused
    /// - [`SkinVaultError::InvalidMetadata`] for an empty or oversized URI
    /// - [`SkinVaultError::InvalidBatchId`] if the batch does not exist
    /// - [`SkinVaultError::BoxAlreadyExists`] if `box_id` already has a record
    pub fn mint_box(
        &self,
        caller: Address,
        batch_id: BatchId,
        box_id: BoxId,
        metadata_uri: &str,
    ) -> Result<()> {
        self.global_snapshot()?.require_not_paused()?;

        if metadata_uri.is_empty() {
            return Err(SkinVaultError::InvalidMetadata {
                reason: "metadata URI is empty".to_string(),
            });
        }
        if metadata_uri.len() > self.config.max_metadata_uri_len {
            return Err(SkinVaultError::InvalidMetadata {
                reason: format!(
                    "metadata URI is {} bytes, limit {}",
                    metadata_uri.len(),
                    self.config.max_metadata_uri_len
                ),
            });
        }

        let now = self.now();
        self.boxes.create_with(
            box_id,
            || SkinVaultError::BoxAlreadyExists(box_id),
            || {
                let total = self.batches.update(
                    &batch_id,
                    || SkinVaultError::InvalidBatchId {
                        batch_id,
                        reason: "batch not found".to_string(),
                    },
                    |batch| {
                        let minted = batch
                            .boxes_minted
                            .checked_add(1)
                            .ok_or(SkinVaultError::overflow("boxes_minted"))?;
                        let total =
                            self.global.update(&(), || SkinVaultError::NotInitialized, |g| {
                                g.require_not_paused()?;
                                let total = g
                                    .total_boxes_minted
                                    .checked_add(1)
                                    .ok_or(SkinVaultError::overflow("total_boxes_minted"))?;
                                g.total_boxes_minted = total;
                                Ok(total)
                            })?;
                        batch.boxes_minted = minted;
                        Ok(total)
                    },
                )?;
                self.emit(ProtocolEvent::BoxMinted {
                    box_id,
                    owner: caller,
                    batch_id,
                    metadata_uri: metadata_uri.to_string(),
                });
                let record =
                    BoxState::minted(box_id, caller, batch_id, metadata_uri.to_string(), now);
                Ok((record, total))
            },
        )
        .map(|total| {
            info!(box_id = %box_id, owner = %caller, batch = %batch_id, total, "Box minted");
        })
    }

    /// Request randomness to open a box. Owner only.
    ///
    /// The box stays unopened until the provider answers through
    /// [`Vault::vrf_callback`].
    ///
    /// # Errors
    /// - [`SkinVaultError::ProtocolPaused`] while paused
    /// - [`SkinVaultError::InvalidPoolSize`] unless `1 ≤ pool_size ≤ max_pool_size`
    /// - [`SkinVaultError::BoxNotFound`], [`SkinVaultError::NotBoxOwner`],
    ///   [`SkinVaultError::AlreadyOpened`]
    /// - [`SkinVaultError::VrfRequestPending`] if a request is already in flight
    pub fn open_box(&self, caller: Address, box_id: BoxId, pool_size: u64) -> Result<RequestId> {
        self.global_snapshot()?.require_not_paused()?;

        if pool_size == 0 || pool_size > self.config.max_pool_size {
            return Err(SkinVaultError::InvalidPoolSize {
                pool_size,
                max: self.config.max_pool_size,
            });
        }

        let now = self.now();
        let request_id = self.boxes.update(
            &box_id,
            || SkinVaultError::BoxNotFound(box_id),
            |b| {
                if b.owner != caller {
                    return Err(SkinVaultError::NotBoxOwner { box_id, caller });
                }
                if b.opened {
                    return Err(SkinVaultError::AlreadyOpened(box_id));
                }
                let request_id = RequestId::new();
                self.vrf_pending.create(
                    box_id,
                    VrfPending {
                        box_id,
                        request_id,
                        request_time: now,
                        pool_size,
                        requester: caller,
                    },
                    || SkinVaultError::VrfRequestPending(box_id),
                )?;
                self.emit(ProtocolEvent::BoxOpenRequested {
                    box_id,
                    request_id,
                    pool_size,
                });
                Ok(request_id)
            },
        )?;

        info!(box_id = %box_id, request = %request_id, pool_size, "Box open requested");
        Ok(request_id)
    }

    /// Deliver randomness for a pending open request. Randomness provider only.
    ///
    /// Runs while paused so in-flight requests can drain. Returns the
    /// resulting `random_index`.
    ///
    /// # Errors
    /// - [`SkinVaultError::Unauthorized`] unless `caller` is the VRF authority
    /// - [`SkinVaultError::VrfNotFulfilled`] for degenerate randomness or no
    ///   matching request
    /// - [`SkinVaultError::BoxNotFound`], [`SkinVaultError::AlreadyOpened`]
    pub fn vrf_callback(
        &self,
        caller: Address,
        box_id: BoxId,
        request_id: RequestId,
        randomness: [u8; 32],
    ) -> Result<u64> {
        let global = self.global_snapshot()?;
        if caller != global.vrf_authority {
            warn!(caller = %caller, box_id = %box_id, "VRF callback from unregistered caller");
            return Err(SkinVaultError::Unauthorized(caller));
        }
        validate_randomness(&randomness)?;

        let now = self.now();
        let random_index = self.boxes.update(
            &box_id,
            || SkinVaultError::BoxNotFound(box_id),
            |b| {
                if b.opened {
                    return Err(SkinVaultError::AlreadyOpened(box_id));
                }
                let pending = self
                    .vrf_pending
                    .get(&box_id)
                    .filter(|p| p.request_id == request_id)
                    .ok_or_else(|| SkinVaultError::VrfNotFulfilled {
                        reason: format!("no pending request {request_id} for {box_id}"),
                    })?;
                let random_index = reduce_to_index(&randomness, pending.pool_size)?;
                let batch_id = b.batch_id;
                let batch_missing = || SkinVaultError::InvalidBatchId {
                    batch_id,
                    reason: "batch not found".to_string(),
                };
                if !self.batches.contains(&batch_id) {
                    return Err(batch_missing());
                }
                debug!(box_id = %box_id, pool_size = pending.pool_size, random_index, "Randomness reduced");

                // Commit point. The box guard keeps every other request
                // operation for this box out, so the request is still there.
                self.vrf_pending
                    .consume_if(&box_id, |p| p.request_id == request_id)
                    .ok_or_else(|| SkinVaultError::VrfNotFulfilled {
                        reason: format!("request {request_id} already consumed"),
                    })?;
                self.batches.update(&batch_id, batch_missing, |batch| {
                    // Bounded by boxes_minted, and this box is minted but unopened.
                    batch.boxes_opened = batch.boxes_opened.saturating_add(1);
                    Ok(())
                })?;
                b.opened = true;
                b.open_time = now;
                b.random_index = random_index;
                self.emit(ProtocolEvent::BoxOpened {
                    box_id,
                    request_id,
                    random_index,
                });
                Ok(random_index)
            },
        )?;

        info!(box_id = %box_id, request = %request_id, random_index, "Box opened");
        Ok(random_index)
    }

    /// Drop an unanswered open request after the timeout so the owner can
    /// call [`Vault::open_box`] again. Original requester only.
    ///
    /// # Errors
    /// - [`SkinVaultError::BoxNotFound`]
    /// - [`SkinVaultError::VrfNotFulfilled`] if there is no pending request
    /// - [`SkinVaultError::NotBoxOwner`] unless `caller` filed the request
    /// - [`SkinVaultError::VrfRequestNotExpired`] before the timeout
    pub fn cancel_open_request(&self, caller: Address, box_id: BoxId) -> Result<RequestId> {
        self.global_snapshot()?;
        let now = self.now();
        let timeout = self.config.vrf_request_timeout_secs;

        let request_id = self.boxes.update(
            &box_id,
            || SkinVaultError::BoxNotFound(box_id),
            |_| {
                let pending = self.vrf_pending.get(&box_id).ok_or_else(|| {
                    SkinVaultError::VrfNotFulfilled {
                        reason: format!("no pending request for {box_id}"),
                    }
                })?;
                if pending.requester != caller {
                    return Err(SkinVaultError::NotBoxOwner { box_id, caller });
                }
                if !pending.is_expired(now, timeout) {
                    return Err(SkinVaultError::VrfRequestNotExpired {
                        box_id,
                        expires_at: pending.expires_at(timeout),
                    });
                }
                self.vrf_pending
                    .consume_if(&box_id, |p| p.request_id == pending.request_id)
                    .ok_or_else(|| SkinVaultError::VrfNotFulfilled {
                        reason: format!("request {} already consumed", pending.request_id),
                    })?;
                self.emit(ProtocolEvent::OpenRequestCancelled {
                    box_id,
                    request_id: pending.request_id,
                });
                Ok(pending.request_id)
            },
        )?;

        info!(box_id = %box_id, request = %request_id, "Open request cancelled");
        Ok(request_id)
    }
}
