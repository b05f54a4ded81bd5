//! Result status and event kinds.
//!
//! Funnel order is `queued → sent → opened → clicked → submitted-data`.
//! `sending-error` and `retry` sit outside the funnel: they carry no rank and
//! never take part in dominance checks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Returned when a stored status or event string is not one of the known values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value: {0:?}")]
pub struct UnknownValue(pub String);

/// Materialized status of a target result.
///
/// Wire format: kebab-case string (`"submitted-data"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResultStatus {
    Queued,
    Sent,
    SendingError,
    Retry,
    Opened,
    Clicked,
    SubmittedData,
}

impl ResultStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Sent => "sent",
            Self::SendingError => "sending-error",
            Self::Retry => "retry",
            Self::Opened => "opened",
            Self::Clicked => "clicked",
            Self::SubmittedData => "submitted-data",
        }
    }

    /// Position in the engagement funnel. `None` for delivery-error states.
    pub fn funnel_rank(self) -> Option<u8> {
        match self {
            Self::Queued => Some(0),
            Self::Sent => Some(1),
            Self::Opened => Some(2),
            Self::Clicked => Some(3),
            Self::SubmittedData => Some(4),
            Self::SendingError | Self::Retry => None,
        }
    }

    /// `true` when `self` is strictly further down the funnel than `other`,
    /// i.e. writing `other` over `self` would regress engagement.
    pub fn dominates(self, other: Self) -> bool {
        match (self.funnel_rank(), other.funnel_rank()) {
            (Some(current), Some(next)) => current > next,
            _ => false,
        }
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultStatus {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(Self::Queued),
            "sent" => Ok(Self::Sent),
            "sending-error" => Ok(Self::SendingError),
            "retry" => Ok(Self::Retry),
            "opened" => Ok(Self::Opened),
            "clicked" => Ok(Self::Clicked),
            "submitted-data" => Ok(Self::SubmittedData),
            other => Err(UnknownValue(other.to_owned())),
        }
    }
}

/// Kind of an event appended to a campaign's event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    Sent,
    SendingError,
    Opened,
    Clicked,
    SubmittedData,
    Reported,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::SendingError => "sending-error",
            Self::Opened => "opened",
            Self::Clicked => "clicked",
            Self::SubmittedData => "submitted-data",
            Self::Reported => "reported",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sent" => Ok(Self::Sent),
            "sending-error" => Ok(Self::SendingError),
            "opened" => Ok(Self::Opened),
            "clicked" => Ok(Self::Clicked),
            "submitted-data" => Ok(Self::SubmittedData),
            "reported" => Ok(Self::Reported),
            other => Err(UnknownValue(other.to_owned())),
        }
    }
}
