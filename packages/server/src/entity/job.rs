use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Static label table for `job_type`. Stored values index into this slice.
pub const JOB_TYPES: &[&str] = &["Technology", "Product", "Operations", "Design", "Marketing"];

/// Static label table for `job_city`. Stored values index into this slice.
pub const CITIES: &[&str] = &["Beijing", "Shanghai", "Shenzhen"];

/// Human-readable label for a stored `job_type` index.
pub fn job_type_name(job_type: i32) -> Option<&'static str> {
    usize::try_from(job_type)
        .ok()
        .and_then(|i| JOB_TYPES.get(i).copied())
}

/// Human-readable label for a stored `job_city` index.
pub fn city_name(job_city: i32) -> Option<&'static str> {
    usize::try_from(job_city)
        .ok()
        .and_then(|i| CITIES.get(i).copied())
}

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "job")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub job_name: String,
    /// Index into [`JOB_TYPES`].
    pub job_type: i32,
    /// Index into [`CITIES`].
    pub job_city: i32,
    pub job_responsibility: Option<String>,
    pub job_requirement: Option<String>,

    /// Username of the posting staff member.
    pub creator: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
