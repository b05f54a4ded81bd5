use chrono::{DateTime, Utc};
use tracing::{info, warn};

use tackle_domain::event::EventDetails;
use tackle_domain::status::{EventKind, ResultStatus};

use crate::domain::repository::{CampaignRepository, ResultRepository};
use crate::domain::types::{Event, MAX_UPDATE_ATTEMPTS, TargetResult, Transition};
use crate::error::ResultsServiceError;

/// Recompute a result's materialized fields from its events.
///
/// Starts from `queued`/unreported and folds every event through the same
/// guards the live transitions use. A `sending-error` whose details carry
/// `retry_at` replays as a backoff to that send time. Older events without
/// it replay as a backoff only when the stored status is already `retry`.
pub fn replay(result: &TargetResult, events: &[Event]) -> TargetResult {
    let mut replayed = TargetResult {
        status: ResultStatus::Queued,
        reported: false,
        ..result.clone()
    };
    for event in events {
        let transition = match event.kind {
            EventKind::Sent => Transition::Sent,
            EventKind::SendingError => match retry_at(event) {
                Some(send_date) => Transition::Backoff { send_date },
                None if result.status == ResultStatus::Retry => Transition::Backoff {
                    send_date: result.send_date,
                },
                None => Transition::SendError,
            },
            EventKind::Opened => Transition::Opened,
            EventKind::Clicked => Transition::Clicked,
            EventKind::SubmittedData => Transition::Submitted,
            EventKind::Reported => Transition::Reported,
        };
        transition.apply(&mut replayed, event.time);
    }
    replayed
}

fn retry_at(event: &Event) -> Option<DateTime<Utc>> {
    let details = event.details.clone()?;
    serde_json::from_value::<EventDetails>(details)
        .ok()?
        .retry_at()
}

/// Brings a result whose save failed after its event was logged back in line
/// with the event log.
pub struct ReconcileResultUseCase<C, R>
where
    C: CampaignRepository,
    R: ResultRepository,
{
    pub campaigns: C,
    pub results: R,
}

impl<C, R> ReconcileResultUseCase<C, R>
where
    C: CampaignRepository,
    R: ResultRepository,
{
    /// Returns `true` if the stored result changed.
    ///
    /// Compares against the stored row rather than the caller's copy, whose
    /// timestamps may be finer than the database keeps. On return `result`
    /// holds the stored row.
    pub async fn execute(&self, result: &mut TargetResult) -> Result<bool, ResultsServiceError> {
        let campaign = self
            .campaigns
            .find(result.campaign_id, result.user_id)
            .await?
            .ok_or(ResultsServiceError::CampaignNotFound)?;

        for attempt in 1..=MAX_UPDATE_ATTEMPTS {
            *result = self
                .results
                .find_by_id(result.id)
                .await?
                .ok_or(ResultsServiceError::ResultNotFound)?;
            let events = self
                .campaigns
                .list_events(campaign.id, &result.email)
                .await?;
            let mut replayed = replay(result, &events);
            if replayed.status == result.status
                && replayed.reported == result.reported
                && replayed.send_date == result.send_date
                && replayed.modified_date == result.modified_date
            {
                return Ok(false);
            }

            if self.results.update_if_version(&replayed).await? {
                info!(
                    result_id = %result.id,
                    from = %result.status,
                    to = %replayed.status,
                    "result reconciled with event log"
                );
                replayed.version += 1;
                *result = replayed;
                return Ok(true);
            }

            warn!(result_id = %result.id, attempt, "stale result version during reconcile");
        }
        Err(ResultsServiceError::ConcurrentUpdate)
    }
}
