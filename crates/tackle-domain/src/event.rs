//! Structured detail payloads attached to campaign events.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request metadata captured when a tracking endpoint observes a recipient.
///
/// `payload` holds query/form values (multi-valued, as submitted);
/// `browser` holds things like `address` and `user-agent`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingDetails {
    #[serde(default)]
    pub payload: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub browser: BTreeMap<String, String>,
}

impl TrackingDetails {
    pub fn with_browser(address: &str, user_agent: &str) -> Self {
        let mut browser = BTreeMap::new();
        browser.insert("address".to_owned(), address.to_owned());
        browser.insert("user-agent".to_owned(), user_agent.to_owned());
        Self {
            payload: BTreeMap::new(),
            browser,
        }
    }
}

/// Detail payload of a single event.
///
/// Serialized untagged so the stored JSON is `{"error": ...}` for delivery
/// failures and `{"payload": {...}, "browser": {...}}` for tracking events.
/// A temporary failure also carries `retry_at`, the rescheduled send time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventDetails {
    Error {
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        retry_at: Option<DateTime<Utc>>,
    },
    Tracking(TrackingDetails),
}

impl EventDetails {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
            retry_at: None,
        }
    }

    pub fn backoff(message: impl Into<String>, retry_at: DateTime<Utc>) -> Self {
        Self::Error {
            error: message.into(),
            retry_at: Some(retry_at),
        }
    }

    /// Rescheduled send time, present only on temporary delivery failures.
    pub fn retry_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Error { retry_at, .. } => *retry_at,
            Self::Tracking(_) => None,
        }
    }
}

impl From<TrackingDetails> for EventDetails {
    fn from(details: TrackingDetails) -> Self {
        Self::Tracking(details)
    }
}
