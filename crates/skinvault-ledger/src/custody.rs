//! Asset custody seam.
//!
//! Box assets (the NFTs) are held by an external custody layer. The engine
//! only needs one action from it: burn the asset when a box is sold back.
//! A failed burn aborts the buyback before any protocol state changes.

use skinvault_types::{Address, BoxId, Result};

pub trait AssetCustody: Send + Sync {
    /// Destroy the asset backing `box_id`, held by `owner`.
    fn burn_box_asset(&self, box_id: &BoxId, owner: &Address) -> Result<()>;
}

/// Custody that accepts every burn. For deployments where the asset side is
/// settled elsewhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCustody;

impl AssetCustody for NoopCustody {
    fn burn_box_asset(&self, box_id: &BoxId, owner: &Address) -> Result<()> {
        tracing::debug!(box_id = %box_id, owner = %owner, "Burn acknowledged");
        Ok(())
    }
}

#[cfg(any(test, feature = "test-helpers"))]
mod helpers {
    use parking_lot::Mutex;
    use skinvault_types::{Address, BoxId, Result, SkinVaultError};

    use super::AssetCustody;

    /// Records every burn it is asked to perform.
    #[derive(Debug, Default)]
    pub struct RecordingCustody {
        burned: Mutex<Vec<(BoxId, Address)>>,
    }

    impl RecordingCustody {
        pub fn burned(&self) -> Vec<(BoxId, Address)> {
            self.burned.lock().clone()
        }
    }

    impl AssetCustody for RecordingCustody {
        fn burn_box_asset(&self, box_id: &BoxId, owner: &Address) -> Result<()> {
            self.burned.lock().push((*box_id, *owner));
            Ok(())
        }
    }

    /// Refuses every burn.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct RejectingCustody;

    impl AssetCustody for RejectingCustody {
        fn burn_box_asset(&self, box_id: &BoxId, _owner: &Address) -> Result<()> {
            Err(SkinVaultError::CustodyRejected {
                reason: format!("burn of {box_id} refused"),
            })
        }
    }
}

#[cfg(any(test, feature = "test-helpers"))]
pub use helpers::{RecordingCustody, RejectingCustody};
