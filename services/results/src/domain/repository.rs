#![allow(async_fn_in_trait)]

use std::net::IpAddr;

use tackle_domain::id::{CampaignId, ResultId, UserId};

use crate::domain::types::{Campaign, Event, GeoPoint, NewTargetResult, TargetResult};
use crate::error::ResultsServiceError;

/// Port onto the campaign aggregate and its append-only event log.
pub trait CampaignRepository: Send + Sync {
    async fn find(
        &self,
        campaign_id: CampaignId,
        user_id: UserId,
    ) -> Result<Option<Campaign>, ResultsServiceError>;

    async fn add_event(&self, campaign: &Campaign, event: &Event)
    -> Result<(), ResultsServiceError>;

    /// Events recorded for one recipient, oldest first.
    async fn list_events(
        &self,
        campaign_id: CampaignId,
        email: &str,
    ) -> Result<Vec<Event>, ResultsServiceError>;
}

/// Repository for target results.
pub trait ResultRepository: Send + Sync {
    async fn find_by_id(&self, id: ResultId) -> Result<Option<TargetResult>, ResultsServiceError>;

    async fn find_by_rid(&self, rid: &str) -> Result<Option<TargetResult>, ResultsServiceError>;

    async fn rid_exists(&self, rid: &str) -> Result<bool, ResultsServiceError>;

    /// Insert a new `queued` result. A taken `rid` fails with `DuplicateIdentifier`.
    async fn create(&self, result: &NewTargetResult) -> Result<TargetResult, ResultsServiceError>;

    /// Write `status`, `reported`, `send_date` and `modified_date` only if the
    /// stored version still equals `result.version`, bumping it on success.
    /// Returns `false` when the stored row moved on (or is gone).
    async fn update_if_version(&self, result: &TargetResult) -> Result<bool, ResultsServiceError>;

    /// Write the geo-enrichment columns only.
    async fn update_geo(
        &self,
        id: ResultId,
        ip: &str,
        point: GeoPoint,
    ) -> Result<(), ResultsServiceError>;
}

/// Read-only IP geolocation dataset, shared across callers.
pub trait GeoLookup: Send + Sync {
    /// `Ok(None)` when the dataset has no location for `ip`.
    fn lookup(&self, ip: IpAddr) -> Result<Option<GeoPoint>, ResultsServiceError>;
}
