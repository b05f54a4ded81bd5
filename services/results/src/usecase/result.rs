use chrono::{DateTime, Utc};
use tracing::{info, warn};

use tackle_domain::id::{CampaignId, UserId};

use crate::domain::repository::ResultRepository;
use crate::domain::types::{NewTargetResult, TargetResult};
use crate::error::ResultsServiceError;
use crate::usecase::identifier::IdentifierGenerator;

// ── CreateResult ─────────────────────────────────────────────────────────────

pub struct CreateResultInput {
    pub campaign_id: CampaignId,
    pub user_id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub send_date: DateTime<Utc>,
}

pub struct CreateResultUseCase<R: ResultRepository> {
    pub results: R,
    pub generator: IdentifierGenerator,
}

impl<R: ResultRepository> CreateResultUseCase<R> {
    pub async fn execute(
        &self,
        input: CreateResultInput,
    ) -> Result<TargetResult, ResultsServiceError> {
        for attempt in 1..=self.generator.max_attempts {
            let rid = self.generator.generate(&self.results).await?;
            let new = NewTargetResult {
                campaign_id: input.campaign_id,
                user_id: input.user_id,
                rid,
                email: input.email.clone(),
                first_name: input.first_name.clone(),
                last_name: input.last_name.clone(),
                position: input.position.clone(),
                send_date: input.send_date,
                created_at: Utc::now(),
            };
            match self.results.create(&new).await {
                Err(ResultsServiceError::DuplicateIdentifier) => {
                    warn!(attempt, "rid claimed by a concurrent insert; regenerating");
                }
                Ok(created) => {
                    info!(
                        result_id = %created.id,
                        campaign_id = %created.campaign_id,
                        "result created"
                    );
                    return Ok(created);
                }
                Err(e) => return Err(e),
            }
        }
        Err(ResultsServiceError::GenerationExhausted)
    }
}

// ── GetResult ────────────────────────────────────────────────────────────────

pub struct GetResultUseCase<R: ResultRepository> {
    pub results: R,
}

impl<R: ResultRepository> GetResultUseCase<R> {
    pub async fn execute(&self, rid: &str) -> Result<TargetResult, ResultsServiceError> {
        self.results
            .find_by_rid(rid)
            .await?
            .ok_or(ResultsServiceError::ResultNotFound)
    }
}
