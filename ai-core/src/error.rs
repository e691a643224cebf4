use thiserror::Error;

use crate::ResultKind;

/// Faults raised by authored actions while a transition is applied.
///
/// These are logged and recovered by keeping the previous node active; they never
/// escape `Behavior::update`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("{action} requested {} without a target action", .kind.name())]
    MissingTarget { kind: ResultKind, action: String },

    #[error("{action} exceeded {limit} chained transitions in a single update")]
    Runaway { action: String, limit: usize },
}
