use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,
    pub password: String,

    /// Superusers bypass all permission and row-scope checks.
    pub is_superuser: bool,

    #[sea_orm(has_many)]
    pub groups: HasMany<super::user_group::Entity>,

    #[sea_orm(has_many)]
    pub resumes: HasMany<super::resume::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
