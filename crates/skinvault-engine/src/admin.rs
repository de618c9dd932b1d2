//! Admin / authority controller.
//!
//! Runtime switches, the oracle and randomness-provider registrations, and
//! the two-step authority handover. Every operation here is authority-only
//! (except `accept_authority`, which belongs to the nominee) and keeps
//! working while the protocol is paused.

use skinvault_core::parse_oracle_key;
use skinvault_types::{Address, GlobalConfig, OraclePubkey, ProtocolEvent, Result, SkinVaultError};
use tracing::{info, warn};

use crate::Vault;

impl Vault {
    /// Apply `f` to the singleton as the authority and emit the event it returns.
    fn admin_update(
        &self,
        caller: Address,
        f: impl FnOnce(&mut GlobalConfig) -> Option<ProtocolEvent>,
    ) -> Result<()> {
        self.global.update(&(), || SkinVaultError::NotInitialized, |g| {
            g.require_authority(caller).inspect_err(|_| {
                warn!(caller = %caller, "Admin operation from non-authority");
            })?;
            if let Some(event) = f(g) {
                self.emit(event);
            }
            Ok(())
        })
    }

    /// Halt or resume user operations.
    ///
    /// # Errors
    /// [`SkinVaultError::Unauthorized`] unless `caller` is the authority.
    pub fn emergency_pause(&self, caller: Address, paused: bool) -> Result<()> {
        self.admin_update(caller, |g| {
            g.paused = paused;
            Some(ProtocolEvent::PauseSet { paused })
        })?;
        if paused {
            warn!(authority = %caller, "Protocol paused");
        } else {
            info!(authority = %caller, "Protocol resumed");
        }
        Ok(())
    }

    /// Enable or disable buybacks.
    pub fn toggle_buyback(&self, caller: Address, enabled: bool) -> Result<()> {
        self.admin_update(caller, |g| {
            g.buyback_enabled = enabled;
            Some(ProtocolEvent::BuybackToggled { enabled })
        })?;
        info!(enabled, "Buyback toggled");
        Ok(())
    }

    /// Move the treasury circuit-breaker floor. Takes effect on the next
    /// payout or withdrawal; an existing balance below the new floor is not
    /// touched.
    pub fn set_min_treasury_balance(&self, caller: Address, amount: u64) -> Result<()> {
        self.admin_update(caller, |g| {
            g.min_treasury_balance = amount;
            Some(ProtocolEvent::MinTreasuryBalanceSet { amount })
        })?;
        info!(
            floor = %skinvault_types::amount::to_decimal(amount),
            "Minimum treasury balance set"
        );
        Ok(())
    }

    /// Register the key that signs price quotes.
    ///
    /// # Errors
    /// - [`SkinVaultError::InvalidSignature`] if the key is not a valid ed25519 point
    /// - [`SkinVaultError::Unauthorized`] unless `caller` is the authority
    pub fn set_oracle(&self, caller: Address, oracle_pubkey: OraclePubkey) -> Result<()> {
        parse_oracle_key(&oracle_pubkey)?;
        self.admin_update(caller, |g| {
            g.oracle_pubkey = Some(oracle_pubkey);
            Some(ProtocolEvent::OracleUpdated { oracle_pubkey })
        })?;
        info!(oracle = %oracle_pubkey, "Oracle updated");
        Ok(())
    }

    /// Register the only caller allowed to deliver randomness.
    pub fn set_vrf_authority(&self, caller: Address, vrf_authority: Address) -> Result<()> {
        self.admin_update(caller, |g| {
            g.vrf_authority = vrf_authority;
            Some(ProtocolEvent::VrfAuthorityUpdated { vrf_authority })
        })?;
        info!(vrf_authority = %vrf_authority, "VRF authority updated");
        Ok(())
    }

    /// Nominate `new_authority`. Nothing changes hands until the nominee
    /// calls [`Vault::accept_authority`]. A later nomination replaces an
    /// earlier one.
    pub fn initiate_authority_transfer(&self, caller: Address, new_authority: Address) -> Result<()> {
        self.admin_update(caller, |g| {
            g.pending_authority = Some(new_authority);
            Some(ProtocolEvent::AuthorityTransferInitiated {
                current: g.authority,
                pending: new_authority,
            })
        })?;
        info!(current = %caller, pending = %new_authority, "Authority transfer initiated");
        Ok(())
    }

    /// Take over as authority. Pending nominee only.
    ///
    /// # Errors
    /// [`SkinVaultError::Unauthorized`] unless `caller` is the pending authority.
    pub fn accept_authority(&self, caller: Address) -> Result<()> {
        let previous = self.global.update(&(), || SkinVaultError::NotInitialized, |g| {
            if g.pending_authority != Some(caller) {
                return Err(SkinVaultError::Unauthorized(caller));
            }
            let previous = g.authority;
            g.authority = caller;
            g.pending_authority = None;
            self.emit(ProtocolEvent::AuthorityTransferred {
                previous,
                new_authority: caller,
            });
            Ok(previous)
        })?;
        info!(previous = %previous, authority = %caller, "Authority transferred");
        Ok(())
    }

    /// Withdraw a pending nomination. A no-op without one.
    pub fn cancel_authority_transfer(&self, caller: Address) -> Result<()> {
        let mut cancelled = false;
        self.admin_update(caller, |g| {
            g.pending_authority.take().map(|_| {
                cancelled = true;
                ProtocolEvent::AuthorityTransferCancelled {
                    authority: g.authority,
                }
            })
        })?;
        if cancelled {
            info!(authority = %caller, "Authority transfer cancelled");
        }
        Ok(())
    }
}
