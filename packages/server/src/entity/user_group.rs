use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Group names a user may be assigned to.
pub const VALID_GROUPS: &[&str] = &["hr", "interviewer"];

/// Membership row mapping a user into a named group.
///
/// A user maps to a *set* of group names; permissions are granted
/// per group via `group_permission`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_group")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub user_id: i32,
    #[sea_orm(primary_key)]
    pub group_name: String,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: Option<super::user::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
