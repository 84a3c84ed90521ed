use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One completed outbound sub-request
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "request_log")]
pub struct Model {
    /// Row ID
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Target URL of the sub-request
    pub url: String,

    /// HTTP method as submitted
    pub method: String,

    /// Status code returned by the remote endpoint
    pub response_code: i32,

    /// Insertion timestamp
    pub created_at: DateTimeWithTimeZone,
}

/// Request log entity relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
