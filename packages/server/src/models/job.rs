use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::job::{self, CITIES, JOB_TYPES};
use crate::error::AppError;

use super::shared::validate_name;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateJobRequest {
    pub job_name: String,
    /// Index into the job type table.
    pub job_type: i32,
    /// Index into the city table.
    pub job_city: i32,
    pub job_responsibility: Option<String>,
    pub job_requirement: Option<String>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateJobRequest {
    pub job_name: Option<String>,
    pub job_type: Option<i32>,
    pub job_city: Option<i32>,
    pub job_responsibility: Option<String>,
    pub job_requirement: Option<String>,
}

/// Job posting with its label-table annotations resolved.
#[derive(Serialize, utoipa::ToSchema)]
pub struct JobResponse {
    pub id: i32,
    pub job_name: String,
    pub job_type: i32,
    pub job_city: i32,
    /// Label for `job_type`, e.g. "Technology".
    pub type_name: Option<String>,
    /// Label for `job_city`, e.g. "Beijing".
    pub city_name: Option<String>,
    pub job_responsibility: Option<String>,
    pub job_requirement: Option<String>,
    pub creator: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<job::Model> for JobResponse {
    fn from(m: job::Model) -> Self {
        let type_name = job::job_type_name(m.job_type).map(str::to_string);
        let city_name = job::city_name(m.job_city).map(str::to_string);
        Self {
            id: m.id,
            job_name: m.job_name,
            job_type: m.job_type,
            job_city: m.job_city,
            type_name,
            city_name,
            job_responsibility: m.job_responsibility,
            job_requirement: m.job_requirement,
            creator: m.creator,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

fn validate_job_type(job_type: i32) -> Result<(), AppError> {
    if job::job_type_name(job_type).is_none() {
        return Err(AppError::Validation(format!(
            "job_type must be an index 0-{}",
            JOB_TYPES.len() - 1
        )));
    }
    Ok(())
}

fn validate_job_city(job_city: i32) -> Result<(), AppError> {
    if job::city_name(job_city).is_none() {
        return Err(AppError::Validation(format!(
            "job_city must be an index 0-{}",
            CITIES.len() - 1
        )));
    }
    Ok(())
}

pub fn validate_create_job(req: &CreateJobRequest) -> Result<(), AppError> {
    validate_name(&req.job_name, "Job name")?;
    validate_job_type(req.job_type)?;
    validate_job_city(req.job_city)?;
    Ok(())
}

pub fn validate_update_job(req: &UpdateJobRequest) -> Result<(), AppError> {
    if let Some(ref job_name) = req.job_name {
        validate_name(job_name, "Job name")?;
    }
    if let Some(job_type) = req.job_type {
        validate_job_type(job_type)?;
    }
    if let Some(job_city) = req.job_city {
        validate_job_city(job_city)?;
    }
    Ok(())
}
