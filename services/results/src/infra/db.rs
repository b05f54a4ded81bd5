use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, SqlErr, sea_query::Expr,
};

use tackle_domain::id::{CampaignId, ResultId, UserId};
use tackle_domain::status::{EventKind, ResultStatus};
use tackle_results_schema::{campaigns, events, results};

use crate::domain::repository::{CampaignRepository, ResultRepository};
use crate::domain::types::{Campaign, Event, GeoPoint, NewTargetResult, TargetResult};
use crate::error::ResultsServiceError;

// ── Campaign repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCampaignRepository {
    pub db: DatabaseConnection,
}

impl CampaignRepository for DbCampaignRepository {
    async fn find(
        &self,
        campaign_id: CampaignId,
        user_id: UserId,
    ) -> Result<Option<Campaign>, ResultsServiceError> {
        let model = campaigns::Entity::find_by_id(campaign_id.0)
            .filter(campaigns::Column::UserId.eq(user_id.0))
            .one(&self.db)
            .await
            .context("find campaign by id and owner")?;
        Ok(model.map(|m| Campaign {
            id: CampaignId(m.id),
            user_id: UserId(m.user_id),
            name: m.name,
        }))
    }

    async fn add_event(
        &self,
        campaign: &Campaign,
        event: &Event,
    ) -> Result<(), ResultsServiceError> {
        events::ActiveModel {
            campaign_id: Set(campaign.id.0),
            email: Set(event.email.clone()),
            time: Set(event.time),
            message: Set(event.kind.as_str().to_owned()),
            details: Set(event.details.clone()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("append campaign event")?;
        Ok(())
    }

    async fn list_events(
        &self,
        campaign_id: CampaignId,
        email: &str,
    ) -> Result<Vec<Event>, ResultsServiceError> {
        let models = events::Entity::find()
            .filter(events::Column::CampaignId.eq(campaign_id.0))
            .filter(events::Column::Email.eq(email))
            .order_by_asc(events::Column::Time)
            .order_by_asc(events::Column::Id)
            .all(&self.db)
            .await
            .context("list recipient events")?;
        models.into_iter().map(event_from_model).collect()
    }
}

fn event_from_model(model: events::Model) -> Result<Event, ResultsServiceError> {
    let kind = model
        .message
        .parse::<EventKind>()
        .with_context(|| format!("event {} has unknown kind", model.id))?;
    Ok(Event {
        campaign_id: CampaignId(model.campaign_id),
        email: model.email,
        kind,
        details: model.details,
        time: model.time,
    })
}

// ── Result repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbResultRepository {
    pub db: DatabaseConnection,
}

impl ResultRepository for DbResultRepository {
    async fn find_by_id(&self, id: ResultId) -> Result<Option<TargetResult>, ResultsServiceError> {
        let model = results::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find result by id")?;
        model.map(result_from_model).transpose()
    }

    async fn find_by_rid(&self, rid: &str) -> Result<Option<TargetResult>, ResultsServiceError> {
        let model = results::Entity::find()
            .filter(results::Column::RId.eq(rid))
            .one(&self.db)
            .await
            .context("find result by rid")?;
        model.map(result_from_model).transpose()
    }

    async fn rid_exists(&self, rid: &str) -> Result<bool, ResultsServiceError> {
        let count = results::Entity::find()
            .filter(results::Column::RId.eq(rid))
            .count(&self.db)
            .await
            .context("check rid availability")?;
        Ok(count > 0)
    }

    async fn create(&self, result: &NewTargetResult) -> Result<TargetResult, ResultsServiceError> {
        let inserted = results::ActiveModel {
            campaign_id: Set(result.campaign_id.0),
            user_id: Set(result.user_id.0),
            r_id: Set(result.rid.clone()),
            email: Set(result.email.clone()),
            first_name: Set(result.first_name.clone()),
            last_name: Set(result.last_name.clone()),
            position: Set(result.position.clone()),
            status: Set(ResultStatus::Queued.as_str().to_owned()),
            ip: Set(None),
            latitude: Set(None),
            longitude: Set(None),
            send_date: Set(result.send_date),
            reported: Set(false),
            modified_date: Set(result.created_at),
            version: Set(0),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(insert_error)?;
        result_from_model(inserted)
    }

    async fn update_if_version(&self, result: &TargetResult) -> Result<bool, ResultsServiceError> {
        let outcome = results::Entity::update_many()
            .col_expr(results::Column::Status, Expr::value(result.status.as_str()))
            .col_expr(results::Column::Reported, Expr::value(result.reported))
            .col_expr(results::Column::SendDate, Expr::value(result.send_date))
            .col_expr(
                results::Column::ModifiedDate,
                Expr::value(result.modified_date),
            )
            .col_expr(
                results::Column::Version,
                Expr::col(results::Column::Version).add(1),
            )
            .filter(results::Column::Id.eq(result.id.0))
            .filter(results::Column::Version.eq(result.version))
            .exec(&self.db)
            .await
            .context("conditional result status update")?;
        Ok(outcome.rows_affected == 1)
    }

    async fn update_geo(
        &self,
        id: ResultId,
        ip: &str,
        point: GeoPoint,
    ) -> Result<(), ResultsServiceError> {
        let outcome = results::Entity::update_many()
            .col_expr(results::Column::Ip, Expr::value(ip))
            .col_expr(results::Column::Latitude, Expr::value(point.latitude))
            .col_expr(results::Column::Longitude, Expr::value(point.longitude))
            .filter(results::Column::Id.eq(id.0))
            .exec(&self.db)
            .await
            .context("update result geo")?;
        if outcome.rows_affected == 0 {
            return Err(ResultsServiceError::ResultNotFound);
        }
        Ok(())
    }
}

fn insert_error(err: DbErr) -> ResultsServiceError {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
        return ResultsServiceError::DuplicateIdentifier;
    }
    ResultsServiceError::Persistence(anyhow::Error::new(err).context("create result"))
}

fn result_from_model(model: results::Model) -> Result<TargetResult, ResultsServiceError> {
    let status = model
        .status
        .parse::<ResultStatus>()
        .with_context(|| format!("result {} has unknown status", model.id))?;
    Ok(TargetResult {
        id: ResultId(model.id),
        campaign_id: CampaignId(model.campaign_id),
        user_id: UserId(model.user_id),
        rid: model.r_id,
        email: model.email,
        first_name: model.first_name,
        last_name: model.last_name,
        position: model.position,
        status,
        reported: model.reported,
        ip: model.ip,
        latitude: model.latitude,
        longitude: model.longitude,
        send_date: model.send_date,
        modified_date: model.modified_date,
        version: model.version,
    })
}
