use anyhow::Context as _;
use sea_orm::{Database, DatabaseConnection};
use tracing::warn;

use crate::config::ResultsConfig;
use crate::error::ResultsServiceError;
use crate::infra::db::{DbCampaignRepository, DbResultRepository};
use crate::infra::geo::MaxMindGeoLookup;
use crate::usecase::geo::UpdateGeoUseCase;
use crate::usecase::identifier::IdentifierGenerator;
use crate::usecase::reconcile::ReconcileResultUseCase;
use crate::usecase::result::{CreateResultUseCase, GetResultUseCase};
use crate::usecase::transition::ResultStateMachine;

/// Process-wide handles. Built once at startup and cloned into callers.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    /// `None` when the dataset could not be opened; enrichment is then skipped.
    pub geo: Option<MaxMindGeoLookup>,
    pub generator: IdentifierGenerator,
}

impl AppState {
    pub async fn connect(config: &ResultsConfig) -> anyhow::Result<Self> {
        let db = Database::connect(&config.database_url)
            .await
            .context("failed to connect to database")?;

        let geo = MaxMindGeoLookup::open(&config.geo_database_path)
            .inspect_err(|e| warn!(error = %e, "geo enrichment disabled"))
            .ok();

        Ok(Self {
            db,
            geo,
            generator: IdentifierGenerator {
                max_attempts: config.rid_max_attempts,
            },
        })
    }

    pub fn campaign_repo(&self) -> DbCampaignRepository {
        DbCampaignRepository {
            db: self.db.clone(),
        }
    }

    pub fn result_repo(&self) -> DbResultRepository {
        DbResultRepository {
            db: self.db.clone(),
        }
    }

    pub fn state_machine(&self) -> ResultStateMachine<DbCampaignRepository, DbResultRepository> {
        ResultStateMachine::new(self.campaign_repo(), self.result_repo())
    }

    pub fn create_result(&self) -> CreateResultUseCase<DbResultRepository> {
        CreateResultUseCase {
            results: self.result_repo(),
            generator: self.generator,
        }
    }

    pub fn get_result(&self) -> GetResultUseCase<DbResultRepository> {
        GetResultUseCase {
            results: self.result_repo(),
        }
    }

    pub fn update_geo(
        &self,
    ) -> Result<UpdateGeoUseCase<DbResultRepository, MaxMindGeoLookup>, ResultsServiceError> {
        let geo = self.geo.clone().ok_or_else(|| {
            ResultsServiceError::LookupUnavailable("geo dataset not loaded".to_owned())
        })?;
        Ok(UpdateGeoUseCase {
            results: self.result_repo(),
            geo,
        })
    }

    pub fn reconcile(&self) -> ReconcileResultUseCase<DbCampaignRepository, DbResultRepository> {
        ReconcileResultUseCase {
            campaigns: self.campaign_repo(),
            results: self.result_repo(),
        }
    }
}
