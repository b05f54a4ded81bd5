use chrono::{DateTime, Utc};

use tackle_domain::id::{CampaignId, ResultId, UserId};
use tackle_domain::status::{EventKind, ResultStatus};

use crate::domain::address::format_address;

/// A target result: one recipient's progress through one campaign.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetResult {
    pub id: ResultId,
    pub campaign_id: CampaignId,
    pub user_id: UserId,
    /// Opaque external identifier (`RID_LEN` chars from `RID_ALPHABET`).
    pub rid: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub status: ResultStatus,
    pub reported: bool,
    pub ip: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub send_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
    /// Optimistic-lock counter; the value this copy was read at.
    pub version: i64,
}

impl TargetResult {
    /// Address for the `To` header.
    pub fn format_address(&self) -> String {
        format_address(&self.email, &self.first_name, &self.last_name)
    }
}

/// Fields for a result row that has not been inserted yet.
#[derive(Debug, Clone)]
pub struct NewTargetResult {
    pub campaign_id: CampaignId,
    pub user_id: UserId,
    pub rid: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub send_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// The slice of a campaign this service needs in order to append events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Campaign {
    pub id: CampaignId,
    pub user_id: UserId,
    pub name: String,
}

/// One entry in a campaign's event log.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub campaign_id: CampaignId,
    pub email: String,
    pub kind: EventKind,
    pub details: Option<serde_json::Value>,
    pub time: DateTime<Utc>,
}

/// Approximate location resolved from an IP address.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// A status-affecting occurrence applied to a result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    Sent,
    SendError,
    Backoff { send_date: DateTime<Utc> },
    Opened,
    Clicked,
    Submitted,
    Reported,
}

impl Transition {
    pub fn event_kind(self) -> EventKind {
        match self {
            Self::Sent => EventKind::Sent,
            Self::SendError | Self::Backoff { .. } => EventKind::SendingError,
            Self::Opened => EventKind::Opened,
            Self::Clicked => EventKind::Clicked,
            Self::Submitted => EventKind::SubmittedData,
            Self::Reported => EventKind::Reported,
        }
    }

    /// Apply to `result` as of event time `at`.
    ///
    /// Returns `false` (leaving `result` untouched) when the funnel guard
    /// suppresses the write. Delivery-error states are never guarded and
    /// `Reported` only ever flips the `reported` flag.
    pub fn apply(self, result: &mut TargetResult, at: DateTime<Utc>) -> bool {
        let applied = match self {
            Self::Sent => advance(result, ResultStatus::Sent),
            Self::SendError => {
                result.status = ResultStatus::SendingError;
                true
            }
            Self::Backoff { send_date } => {
                result.status = ResultStatus::Retry;
                result.send_date = send_date;
                true
            }
            Self::Opened => advance(result, ResultStatus::Opened),
            Self::Clicked => advance(result, ResultStatus::Clicked),
            Self::Submitted => advance(result, ResultStatus::SubmittedData),
            Self::Reported => {
                result.reported = true;
                true
            }
        };
        if applied {
            result.modified_date = at;
        }
        applied
    }
}

fn advance(result: &mut TargetResult, next: ResultStatus) -> bool {
    if result.status.dominates(next) {
        return false;
    }
    result.status = next;
    true
}

/// Identifier length in characters.
pub const RID_LEN: usize = 7;

/// Alphanumeric alphabet identifiers are drawn from (62 symbols).
pub const RID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Default cap on identifier candidates tried before giving up.
pub const DEFAULT_RID_MAX_ATTEMPTS: u32 = 20;

/// Conditional-update attempts before a transition reports `ConcurrentUpdate`.
pub const MAX_UPDATE_ATTEMPTS: u32 = 5;
