//! NotificationTarget - an opaque recipient handle.

use std::fmt;

/// Where a notification should be delivered.
///
/// The value is whatever the host uses to address a recipient (a chat
/// session id, a webhook URL, an e-mail address). The monitoring core never
/// looks inside it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NotificationTarget(String);

impl NotificationTarget {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for NotificationTarget {
    fn from(handle: String) -> Self {
        Self(handle)
    }
}

impl From<&str> for NotificationTarget {
    fn from(handle: &str) -> Self {
        Self(handle.to_string())
    }
}
