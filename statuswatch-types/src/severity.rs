//! Severity - the canonical five-value health scale.

use std::fmt;

/// Normalized severity of a monitored service.
///
/// Every provider adapter maps its own vocabulary onto this scale.
/// [`Severity::Unknown`] marks an observation that could not be determined
/// (fetch or parse failure) and is never stored as a last-known state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Severity {
    Operational,
    Degraded,
    PartialOutage,
    MajorOutage,
    Unknown,
}

impl Severity {
    /// All severities, best first.
    pub const ALL: [Severity; 5] = [
        Severity::Operational,
        Severity::Degraded,
        Severity::PartialOutage,
        Severity::MajorOutage,
        Severity::Unknown,
    ];

    /// Whether this severity counts as "bad" for transition detection.
    ///
    /// The classification is binary: anything other than `Operational` is bad.
    pub fn is_bad(&self) -> bool {
        *self != Severity::Operational
    }

    /// Human readable label used in notifications and command output.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Operational => "operational",
            Severity::Degraded => "degraded performance",
            Severity::PartialOutage => "partial outage",
            Severity::MajorOutage => "major outage",
            Severity::Unknown => "unknown",
        }
    }

    /// Short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::Operational => "✅",
            Severity::Degraded => "⚠️",
            Severity::PartialOutage => "❌",
            Severity::MajorOutage => "🚨",
            Severity::Unknown => "❔",
        }
    }

    /// Stable machine name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Operational => "operational",
            Severity::Degraded => "degraded",
            Severity::PartialOutage => "partial_outage",
            Severity::MajorOutage => "major_outage",
            Severity::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
