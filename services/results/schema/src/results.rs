use sea_orm::entity::prelude::*;

/// Per-recipient target result within a campaign.
///
/// `version` is bumped on every status write and used as the optimistic lock.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "results")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub campaign_id: i64,
    pub user_id: i64,
    #[sea_orm(unique)]
    pub r_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub status: String,
    pub ip: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub send_date: chrono::DateTime<chrono::Utc>,
    pub reported: bool,
    pub modified_date: chrono::DateTime<chrono::Utc>,
    pub version: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::campaigns::Entity",
        from = "Column::CampaignId",
        to = "super::campaigns::Column::Id"
    )]
    Campaign,
}

impl Related<super::campaigns::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Campaign.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
