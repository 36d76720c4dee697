//! Status transition evaluation
//!
//! Checks run in a fixed order: unchanged target, transition table, settled
//! balance, then authority. The grant lookup is only performed when the
//! authority rule actually needs it.

use shared::models::Aggregate;

use super::{Authority, LifecycleStatus};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Target equals the current status; nothing to write
    Unchanged,
    Apply {
        /// Authority came from an approved request rather than privilege
        via_grant: bool,
    },
}

/// Decide whether `aggregate` may move to `to`
pub fn evaluate_transition<S, F>(
    aggregate: &Aggregate<S>,
    to: S,
    privileged: bool,
    has_grant: F,
) -> AppResult<Transition>
where
    S: LifecycleStatus,
    F: FnOnce() -> AppResult<bool>,
{
    let from = aggregate.status;
    if from == to {
        return Ok(Transition::Unchanged);
    }

    let table = S::transitions();
    if !table.permits(from, to) {
        return Err(AppError::invalid_transition(from, to, table.allowed(from)));
    }

    let guard = S::guard(to);
    if guard.requires_settled && !aggregate.balance.is_zero() {
        return Err(AppError::validation(format!(
            "{} {} has an outstanding balance of {}; it must be settled before moving to {}",
            S::RESOURCE,
            aggregate.number,
            aggregate.balance,
            to
        )));
    }

    match guard.authority {
        Authority::Anyone => Ok(Transition::Apply { via_grant: false }),
        Authority::Privileged if privileged => Ok(Transition::Apply { via_grant: false }),
        Authority::Privileged => Err(AppError::authorization_required(format!(
            "only a privileged user may move {} {} to {}",
            S::RESOURCE,
            aggregate.number,
            to
        ))),
        Authority::PrivilegedOrGrant if privileged => Ok(Transition::Apply { via_grant: false }),
        Authority::PrivilegedOrGrant => {
            if has_grant()? {
                Ok(Transition::Apply { via_grant: true })
            } else {
                Err(AppError::authorization_required(format!(
                    "moving {} {} to {} needs a privileged user or an approved request",
                    S::RESOURCE,
                    aggregate.number,
                    to
                )))
            }
        }
    }
}
