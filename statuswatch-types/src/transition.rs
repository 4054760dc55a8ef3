//! Transition events produced by comparing consecutive observations.

use std::fmt;

use crate::NormalizedStatus;

/// Classification of a fresh observation against the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TransitionKind {
    /// No previous observation exists (e.g. first poll after startup).
    FirstObservation,
    /// Good to bad.
    Degraded,
    /// Bad to good.
    Recovered,
    /// Same side of the good/bad line as before.
    Unchanged,
}

impl TransitionKind {
    /// Only real good/bad flips are worth a notification.
    pub fn is_dispatchable(&self) -> bool {
        matches!(self, TransitionKind::Degraded | TransitionKind::Recovered)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionKind::FirstObservation => "first_observation",
            TransitionKind::Degraded => "degraded",
            TransitionKind::Recovered => "recovered",
            TransitionKind::Unchanged => "unchanged",
        }
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified observation for one service.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionEvent {
    pub service_id: String,
    pub previous_status: Option<NormalizedStatus>,
    pub new_status: NormalizedStatus,
    pub kind: TransitionKind,
}

impl TransitionEvent {
    pub fn is_dispatchable(&self) -> bool {
        self.kind.is_dispatchable()
    }
}
