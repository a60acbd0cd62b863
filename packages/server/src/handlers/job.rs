use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::job;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::job::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Jobs",
    operation_id = "listJobs",
    summary = "List job postings",
    description = "Public. Returns all postings ordered by job type, each annotated with its resolved type and city labels.",
    responses(
        (status = 200, description = "Job postings", body = Vec<JobResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_jobs(State(state): State<AppState>) -> Result<Json<Vec<JobResponse>>, AppError> {
    let jobs = job::Entity::find()
        .order_by_asc(job::Column::JobType)
        .order_by_asc(job::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(jobs.into_iter().map(JobResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Jobs",
    operation_id = "getJob",
    summary = "Get a job posting",
    description = "Public. Returns one posting with its label annotations.",
    params(("id" = i32, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Job posting", body = JobResponse),
        (status = 404, description = "Job not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<JobResponse>, AppError> {
    let model = find_job(&state.db, id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Jobs",
    operation_id = "createJob",
    summary = "Create a job posting",
    description = "Requires `job:create` permission. Records the creator's username.",
    request_body = CreateJobRequest,
    responses(
        (status = 201, description = "Job created", body = JobResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(job_name = %payload.job_name))]
pub async fn create_job(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateJobRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("job:create")?;
    validate_create_job(&payload)?;

    let now = chrono::Utc::now();
    let new_job = job::ActiveModel {
        job_name: Set(payload.job_name.trim().to_string()),
        job_type: Set(payload.job_type),
        job_city: Set(payload.job_city),
        job_responsibility: Set(payload.job_responsibility),
        job_requirement: Set(payload.job_requirement),
        creator: Set(Some(auth_user.username.clone())),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = new_job.insert(&state.db).await?;

    Ok((StatusCode::CREATED, Json(JobResponse::from(model))))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Jobs",
    operation_id = "updateJob",
    summary = "Update a job posting",
    description = "Partially updates a posting; only provided fields change. Requires `job:edit` permission.",
    params(("id" = i32, Path, description = "Job ID")),
    request_body = UpdateJobRequest,
    responses(
        (status = 200, description = "Job updated", body = JobResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Job not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_job(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateJobRequest>,
) -> Result<Json<JobResponse>, AppError> {
    auth_user.require_permission("job:edit")?;
    validate_update_job(&payload)?;

    if payload == UpdateJobRequest::default() {
        let existing = find_job(&state.db, id).await?;
        return Ok(Json(existing.into()));
    }

    let txn = state.db.begin().await?;

    let existing = find_job(&txn, id).await?;
    let mut active: job::ActiveModel = existing.into();

    if let Some(ref job_name) = payload.job_name {
        active.job_name = Set(job_name.trim().to_string());
    }
    if let Some(job_type) = payload.job_type {
        active.job_type = Set(job_type);
    }
    if let Some(job_city) = payload.job_city {
        active.job_city = Set(job_city);
    }
    if let Some(job_responsibility) = payload.job_responsibility {
        active.job_responsibility = Set(Some(job_responsibility));
    }
    if let Some(job_requirement) = payload.job_requirement {
        active.job_requirement = Set(Some(job_requirement));
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Jobs",
    operation_id = "deleteJob",
    summary = "Delete a job posting",
    description = "Requires `job:delete` permission.",
    params(("id" = i32, Path, description = "Job ID")),
    responses(
        (status = 204, description = "Job deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Job not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_job(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("job:delete")?;

    let existing = find_job(&state.db, id).await?;
    job::Entity::delete_by_id(existing.id).exec(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn find_job<C: ConnectionTrait>(db: &C, id: i32) -> Result<job::Model, AppError> {
    job::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".into()))
}
