use chrono::Utc;

use tackle_domain::event::EventDetails;
use tackle_domain::status::EventKind;

use crate::domain::repository::CampaignRepository;
use crate::domain::types::{Event, TargetResult};
use crate::error::ResultsServiceError;

/// Appends events for a result to its owning campaign's log.
pub struct EventRecorder<C: CampaignRepository> {
    pub campaigns: C,
}

impl<C: CampaignRepository> EventRecorder<C> {
    /// Look up the owning campaign, append `kind` with `details`, and return
    /// the recorded event. Its `time` is the authoritative transition time.
    pub async fn record(
        &self,
        result: &TargetResult,
        kind: EventKind,
        details: Option<&EventDetails>,
    ) -> Result<Event, ResultsServiceError> {
        let campaign = self
            .campaigns
            .find(result.campaign_id, result.user_id)
            .await?
            .ok_or(ResultsServiceError::CampaignNotFound)?;

        let details = details
            .map(serde_json::to_value)
            .transpose()
            .map_err(|_| ResultsServiceError::InvalidDetails)?;

        let event = Event {
            campaign_id: campaign.id,
            email: result.email.clone(),
            kind,
            details,
            time: Utc::now(),
        };
        self.campaigns.add_event(&campaign, &event).await?;
        Ok(event)
    }
}
