use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "group_permission")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub group_name: String,
    #[sea_orm(primary_key)]
    pub permission: String,
}

impl ActiveModelBehavior for ActiveModel {}
