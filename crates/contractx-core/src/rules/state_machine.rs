//! Contract status transition rules
//!
//! | target | allowed current status |
//! |---|---|
//! | `Approved` (manual) | `PublishedToProvider` |
//! | `Approved` (confirmation) | `ApprovedWaitingConfirmation` |
//! | `WithdrawnByProvider` | `PublishedToProvider` |
//! | `WithdrawnByAgency` | `PublishedToProvider` |
//! | `PublishedToProvider`, `Replaced`, `ApprovedWaitingConfirmation` | any |
//! | anything else | none |

use crate::errors::{ContractError, Result};
use crate::model::{Contract, ContractStatus};

/// Which approval path is moving a contract to `Approved`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalPath {
    /// An agency user approves a published contract directly
    Manual,
    /// The provider's signature confirms an approval awaiting confirmation
    Confirmation,
}

/// Guard applied when moving into a target status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionRule {
    /// Any current status is accepted
    Unguarded,
    /// Current status must be one of the listed statuses
    RequiresCurrent(&'static [ContractStatus]),
    /// The target can never be entered
    Forbidden,
}

const FROM_PUBLISHED: &[ContractStatus] = &[ContractStatus::PublishedToProvider];
const FROM_AWAITING_CONFIRMATION: &[ContractStatus] =
    &[ContractStatus::ApprovedWaitingConfirmation];

/// Look up the guard for moving into `target`
pub fn transition_rule(target: ContractStatus, path: ApprovalPath) -> TransitionRule {
    match target {
        ContractStatus::Approved => match path {
            ApprovalPath::Manual => TransitionRule::RequiresCurrent(FROM_PUBLISHED),
            ApprovalPath::Confirmation => {
                TransitionRule::RequiresCurrent(FROM_AWAITING_CONFIRMATION)
            }
        },
        ContractStatus::WithdrawnByProvider | ContractStatus::WithdrawnByAgency => {
            TransitionRule::RequiresCurrent(FROM_PUBLISHED)
        }
        ContractStatus::PublishedToProvider
        | ContractStatus::Replaced
        | ContractStatus::ApprovedWaitingConfirmation => TransitionRule::Unguarded,
        ContractStatus::AutoWithdrawn => TransitionRule::Forbidden,
    }
}

/// Check that `contract` may move from its current status to `new_status`
///
/// `path` only matters when `new_status` is `Approved`.
///
/// # Errors
///
/// Returns `StatusConflict` carrying the current status, the requested status
/// and the statuses that would have been accepted.
pub fn validate_status_change(
    contract: &Contract,
    new_status: ContractStatus,
    path: ApprovalPath,
) -> Result<()> {
    let allowed: &[ContractStatus] = match transition_rule(new_status, path) {
        TransitionRule::Unguarded => return Ok(()),
        TransitionRule::RequiresCurrent(allowed) if allowed.contains(&contract.status) => {
            return Ok(())
        }
        TransitionRule::RequiresCurrent(allowed) => allowed,
        TransitionRule::Forbidden => &[],
    };

    Err(ContractError::StatusConflict {
        contract_number: contract.contract_number.clone(),
        contract_version: contract.contract_version,
        current: contract.status,
        requested: new_status,
        allowed: allowed.to_vec(),
    })
}
