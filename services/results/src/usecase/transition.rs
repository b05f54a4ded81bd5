use std::fmt;

use chrono::{DateTime, Utc};
use tracing::{debug, error, warn};

use tackle_domain::event::{EventDetails, TrackingDetails};

use crate::domain::repository::{CampaignRepository, ResultRepository};
use crate::domain::types::{Event, MAX_UPDATE_ATTEMPTS, TargetResult, Transition};
use crate::error::ResultsServiceError;
use crate::usecase::event::EventRecorder;

/// Drives a result's status from observed campaign events.
///
/// Every operation appends its event first, then applies the funnel guard and
/// persists with a conditional write. On success `result` reflects the stored
/// row (including the bumped version).
pub struct ResultStateMachine<C, R>
where
    C: CampaignRepository,
    R: ResultRepository,
{
    pub recorder: EventRecorder<C>,
    pub results: R,
}

impl<C, R> ResultStateMachine<C, R>
where
    C: CampaignRepository,
    R: ResultRepository,
{
    pub fn new(campaigns: C, results: R) -> Self {
        Self {
            recorder: EventRecorder { campaigns },
            results,
        }
    }

    /// The message was accepted by the remote mail server.
    pub async fn mark_sent(&self, result: &mut TargetResult) -> Result<(), ResultsServiceError> {
        self.apply(result, Transition::Sent, None).await
    }

    /// Delivery failed permanently.
    pub async fn mark_send_error(
        &self,
        result: &mut TargetResult,
        err: impl fmt::Display,
    ) -> Result<(), ResultsServiceError> {
        let details = EventDetails::error(err.to_string());
        self.apply(result, Transition::SendError, Some(&details)).await
    }

    /// Delivery failed temporarily; the message is rescheduled for `send_date`.
    pub async fn mark_backoff(
        &self,
        result: &mut TargetResult,
        err: impl fmt::Display,
        send_date: DateTime<Utc>,
    ) -> Result<(), ResultsServiceError> {
        let details = EventDetails::backoff(err.to_string(), send_date);
        self.apply(result, Transition::Backoff { send_date }, Some(&details)).await
    }

    pub async fn mark_opened(
        &self,
        result: &mut TargetResult,
        details: TrackingDetails,
    ) -> Result<(), ResultsServiceError> {
        self.apply(result, Transition::Opened, Some(&EventDetails::from(details))).await
    }

    pub async fn mark_clicked(
        &self,
        result: &mut TargetResult,
        details: TrackingDetails,
    ) -> Result<(), ResultsServiceError> {
        self.apply(result, Transition::Clicked, Some(&EventDetails::from(details))).await
    }

    pub async fn mark_submitted(
        &self,
        result: &mut TargetResult,
        details: TrackingDetails,
    ) -> Result<(), ResultsServiceError> {
        self.apply(result, Transition::Submitted, Some(&EventDetails::from(details))).await
    }

    /// The recipient reported the message. Leaves the funnel status alone.
    pub async fn mark_reported(
        &self,
        result: &mut TargetResult,
        details: TrackingDetails,
    ) -> Result<(), ResultsServiceError> {
        self.apply(result, Transition::Reported, Some(&EventDetails::from(details))).await
    }

    async fn apply(
        &self,
        result: &mut TargetResult,
        transition: Transition,
        details: Option<&EventDetails>,
    ) -> Result<(), ResultsServiceError> {
        let event = self
            .recorder
            .record(result, transition.event_kind(), details)
            .await?;

        // The event is already in the log; from here on a failure leaves the
        // stored status behind the event history.
        self.persist(result, transition, &event)
            .await
            .inspect_err(|e| {
                error!(
                    result_id = %result.id,
                    rid = %result.rid,
                    campaign_id = %event.campaign_id,
                    kind = %event.kind,
                    error = %e,
                    "event recorded but result not updated; status lags event log"
                );
            })
    }

    async fn persist(
        &self,
        result: &mut TargetResult,
        transition: Transition,
        event: &Event,
    ) -> Result<(), ResultsServiceError> {
        for attempt in 1..=MAX_UPDATE_ATTEMPTS {
            let mut next = result.clone();
            if !transition.apply(&mut next, event.time) {
                debug!(
                    result_id = %result.id,
                    status = %result.status,
                    kind = %event.kind,
                    "status write suppressed by funnel guard"
                );
                return Ok(());
            }

            if self.results.update_if_version(&next).await? {
                next.version += 1;
                *result = next;
                return Ok(());
            }

            warn!(
                result_id = %result.id,
                attempt,
                "stale result version; reloading before retry"
            );
            *result = self
                .results
                .find_by_id(result.id)
                .await?
                .ok_or(ResultsServiceError::ResultNotFound)?;
        }
        Err(ResultsServiceError::ConcurrentUpdate)
    }
}
