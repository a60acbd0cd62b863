use std::collections::HashMap;

use axum::Json;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::*;
use tracing::{info, instrument};

use crate::candidate_fields::{self, EXPORT_FIELDS, export_title, export_value};
use crate::entity::{candidate, resume, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::candidate::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Candidates",
    operation_id = "listCandidates",
    summary = "List candidates",
    description = "Returns a paginated candidate list. Requires `candidate:view` permission. Superusers and `hr` members see every row; anyone else sees only the rows where they are the first or second interviewer. Supports the admin's filters, a case-insensitive search over username/phone/email/bachelor_school, and sorting; the default order is by hr_result, second_result, first_result. Each row carries `resume_id` when a resume with the same phone number exists.",
    params(CandidateListQuery),
    responses(
        (status = 200, description = "Candidate list", body = CandidateListResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_candidates(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<CandidateListQuery>,
) -> Result<Json<CandidateListResponse>, AppError> {
    auth_user.require_permission("candidate:view")?;

    let page = Ord::max(query.page.unwrap_or(1), 1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let mut select = candidate::Entity::find();

    if !sees_all_rows(&auth_user) {
        select = select.filter(interviewer_scope(&auth_user));
    }

    if let Some(ref city) = query.city {
        select = select.filter(candidate::Column::City.eq(city.clone()));
    }
    if let Some(ref first_result) = query.first_result {
        select = select.filter(candidate::Column::FirstResult.eq(first_result.clone()));
    }
    if let Some(ref second_result) = query.second_result {
        select = select.filter(candidate::Column::SecondResult.eq(second_result.clone()));
    }
    if let Some(ref hr_result) = query.hr_result {
        select = select.filter(candidate::Column::HrResult.eq(hr_result.clone()));
    }
    if let Some(first_interviewer) = query.first_interviewer_user_id {
        select = select.filter(candidate::Column::FirstInterviewerUserId.eq(first_interviewer));
    }
    if let Some(second_interviewer) = query.second_interviewer_user_id {
        select = select.filter(candidate::Column::SecondInterviewerUserId.eq(second_interviewer));
    }
    if let Some(second_score) = query.second_score {
        select = select.filter(candidate::Column::SecondScore.eq(second_score));
    }

    if let Some(ref search) = query.search {
        let term = escape_like(search.trim());
        if !term.is_empty() {
            let pattern = format!("%{}%", term.to_lowercase());
            let mut cond = Condition::any();
            for col in [
                candidate::Column::Username,
                candidate::Column::Phone,
                candidate::Column::Email,
                candidate::Column::BachelorSchool,
            ] {
                cond = cond.add(
                    Expr::expr(Func::lower(Expr::col(col)))
                        .like(LikeExpr::new(pattern.clone()).escape('\\')),
                );
            }
            select = select.filter(cond);
        }
    }

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;
    let total_pages = total.div_ceil(per_page);

    select = match query.sort_by.as_deref() {
        None => select
            .order_by(candidate::Column::HrResult, Order::Asc)
            .order_by(candidate::Column::SecondResult, Order::Asc)
            .order_by(candidate::Column::FirstResult, Order::Asc),
        Some(sort_by) => {
            let sort_order = if query.sort_order.as_deref() == Some("asc") {
                Order::Asc
            } else {
                Order::Desc
            };
            let sort_column = match sort_by {
                "created_at" => candidate::Column::CreatedAt,
                "updated_at" => candidate::Column::UpdatedAt,
                "username" => candidate::Column::Username,
                "first_score" => candidate::Column::FirstScore,
                _ => {
                    return Err(AppError::Validation(
                        "sort_by must be one of: created_at, updated_at, username, first_score"
                            .into(),
                    ));
                }
            };
            select.order_by(sort_column, sort_order)
        }
    };

    let rows = select
        .select_only()
        .column(candidate::Column::Id)
        .column(candidate::Column::Username)
        .column(candidate::Column::City)
        .column(candidate::Column::BachelorSchool)
        .column(candidate::Column::Phone)
        .column(candidate::Column::FirstScore)
        .column(candidate::Column::FirstResult)
        .column(candidate::Column::FirstInterviewerUserId)
        .column(candidate::Column::SecondResult)
        .column(candidate::Column::SecondInterviewerUserId)
        .column(candidate::Column::HrScore)
        .column(candidate::Column::HrResult)
        .column(candidate::Column::LastEditor)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .into_model::<CandidateListRow>()
        .all(&state.db)
        .await?;

    let resume_ids = resume_ids_by_phone(&state.db, &rows).await?;

    let data = rows
        .into_iter()
        .map(|row| {
            let resume_id = row
                .phone
                .as_deref()
                .and_then(|p| resume_ids.get(p).copied());
            CandidateListItem {
                id: row.id,
                username: row.username,
                city: row.city,
                bachelor_school: row.bachelor_school,
                resume_id,
                first_score: row.first_score,
                first_result: row.first_result,
                first_interviewer_user_id: row.first_interviewer_user_id,
                second_result: row.second_result,
                second_interviewer_user_id: row.second_interviewer_user_id,
                hr_score: row.hr_score,
                hr_result: row.hr_result,
                last_editor: row.last_editor,
            }
        })
        .collect();

    Ok(Json(CandidateListResponse {
        data,
        pagination: Pagination {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Candidates",
    operation_id = "createCandidate",
    summary = "Create a candidate record",
    description = "Manual entry of a candidate into the pipeline. Requires `candidate:create` permission. The creator's username is recorded.",
    request_body = CreateCandidateRequest,
    responses(
        (status = 201, description = "Candidate created", body = CandidateResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(username = %payload.username))]
pub async fn create_candidate(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCandidateRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("candidate:create")?;
    validate_create_candidate(&payload)?;

    let now = chrono::Utc::now();
    let new_candidate = candidate::ActiveModel {
        userid: Set(payload.userid),
        username: Set(payload.username.trim().to_string()),
        city: Set(payload.city),
        phone: Set(payload.phone),
        email: Set(payload.email),
        apply_position: Set(payload.apply_position),
        born_address: Set(payload.born_address),
        gender: Set(payload.gender),
        candidate_remark: Set(payload.candidate_remark),
        bachelor_school: Set(payload.bachelor_school),
        master_school: Set(payload.master_school),
        doctor_school: Set(payload.doctor_school),
        major: Set(payload.major),
        degree: Set(payload.degree),
        test_score_of_general_ability: Set(payload.test_score_of_general_ability),
        paper_score: Set(payload.paper_score),
        first_score: Set(payload.first_score),
        first_learning_ability: Set(payload.first_learning_ability),
        first_professional_competency: Set(payload.first_professional_competency),
        first_advantage: Set(payload.first_advantage),
        first_disadvantage: Set(payload.first_disadvantage),
        first_result: Set(payload.first_result),
        first_recommend_position: Set(payload.first_recommend_position),
        first_interviewer_user_id: Set(payload.first_interviewer_user_id),
        first_remark: Set(payload.first_remark),
        second_score: Set(payload.second_score),
        second_learning_ability: Set(payload.second_learning_ability),
        second_professional_competency: Set(payload.second_professional_competency),
        second_pursue_of_excellence: Set(payload.second_pursue_of_excellence),
        second_communication_ability: Set(payload.second_communication_ability),
        second_pressure_score: Set(payload.second_pressure_score),
        second_advantage: Set(payload.second_advantage),
        second_disadvantage: Set(payload.second_disadvantage),
        second_result: Set(payload.second_result),
        second_recommend_position: Set(payload.second_recommend_position),
        second_interviewer_user_id: Set(payload.second_interviewer_user_id),
        second_remark: Set(payload.second_remark),
        hr_score: Set(payload.hr_score),
        hr_responsibility: Set(payload.hr_responsibility),
        hr_communication_ability: Set(payload.hr_communication_ability),
        hr_logic_ability: Set(payload.hr_logic_ability),
        hr_potential: Set(payload.hr_potential),
        hr_stability: Set(payload.hr_stability),
        hr_advantage: Set(payload.hr_advantage),
        hr_disadvantage: Set(payload.hr_disadvantage),
        hr_result: Set(payload.hr_result),
        hr_interviewer_user_id: Set(payload.hr_interviewer_user_id),
        hr_remark: Set(payload.hr_remark),
        creator: Set(Some(auth_user.username.clone())),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = new_candidate.insert(&state.db).await?;

    Ok((StatusCode::CREATED, Json(CandidateResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Candidates",
    operation_id = "getCandidate",
    summary = "Get a candidate with form metadata",
    description = "Returns the full record plus the fieldset groups and read-only fields the requesting user's edit screen would show for it. Requires `candidate:view` permission; rows outside the caller's scope are not found.",
    params(("id" = i32, Path, description = "Candidate ID")),
    responses(
        (status = 200, description = "Candidate detail", body = CandidateDetailResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Candidate not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_candidate(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CandidateDetailResponse>, AppError> {
    auth_user.require_permission("candidate:view")?;

    let model = find_candidate_scoped(&state.db, &auth_user, id).await?;

    let fieldsets = candidate_fields::fieldsets_for(&auth_user, &model)
        .iter()
        .map(|fs| FieldsetGroup {
            title: fs.title.map(str::to_string),
            fields: fs.fields.iter().map(|f| f.to_string()).collect(),
        })
        .collect();
    let readonly_fields = candidate_fields::readonly_fields_for(&auth_user)
        .iter()
        .map(|f| f.to_string())
        .collect();

    Ok(Json(CandidateDetailResponse {
        candidate: model.into(),
        fieldsets,
        readonly_fields,
    }))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Candidates",
    operation_id = "updateCandidate",
    summary = "Edit a candidate",
    description = "Stage-scoped partial edit. Requires `candidate:view` permission and row scope. Every field in the payload must be editable for the caller on this record, otherwise the request is rejected naming the field. Stamps `last_editor`.",
    params(("id" = i32, Path, description = "Candidate ID")),
    request_body = UpdateCandidateRequest,
    responses(
        (status = 200, description = "Candidate updated", body = CandidateResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Field outside the caller's editable set (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Candidate not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_candidate(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateCandidateRequest>,
) -> Result<Json<CandidateResponse>, AppError> {
    auth_user.require_permission("candidate:view")?;
    validate_update_candidate(&payload)?;

    if payload == UpdateCandidateRequest::default() {
        let existing = find_candidate_scoped(&state.db, &auth_user, id).await?;
        return Ok(Json(existing.into()));
    }

    let txn = state.db.begin().await?;
    let existing = find_candidate_scoped(&txn, &auth_user, id).await?;

    let editable = candidate_fields::editable_fields_for(&auth_user, &existing);
    for field in payload.provided_fields() {
        if !editable.contains(field) {
            return Err(AppError::FieldNotEditable(field.to_string()));
        }
    }

    let mut active: candidate::ActiveModel = existing.into();
    payload.apply(&mut active);
    active.last_editor = Set(Some(auth_user.username.clone()));
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    post,
    path = "/export",
    tag = "Candidates",
    operation_id = "exportCandidates",
    summary = "Export selected candidates as CSV",
    description = "Requires the `candidate:export` permission. Exports the selected rows, still subject to the caller's row scope, as a CSV attachment with a timestamped filename. Values are raw field values; interviewer columns carry the referenced user id.",
    request_body = ExportCandidatesRequest,
    responses(
        (status = 200, description = "CSV attachment"),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn export_candidates(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ExportCandidatesRequest>,
) -> Result<Response, AppError> {
    auth_user.require_permission("candidate:export")?;
    validate_export_request(&payload)?;

    let rows = find_selected_scoped(&state.db, &auth_user, &payload.candidate_ids).await?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    let header: Vec<String> = EXPORT_FIELDS.iter().map(|f| export_title(f)).collect();
    writer
        .write_record(&header)
        .map_err(|e| AppError::Internal(format!("CSV write error: {e}")))?;
    for row in &rows {
        let record: Vec<String> = EXPORT_FIELDS.iter().map(|f| export_value(row, f)).collect();
        writer
            .write_record(&record)
            .map_err(|e| AppError::Internal(format!("CSV write error: {e}")))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV flush error: {e}")))?;

    info!(
        "{} exported {} candidate records",
        auth_user.username,
        rows.len()
    );

    let filename = format!(
        "recruitment-candidates-list-{}.csv",
        chrono::Utc::now().format("%Y-%m-%d-%H-%M-%S")
    );

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={filename}"),
        )
        .body(Body::from(bytes))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))?;

    Ok(response)
}

#[utoipa::path(
    post,
    path = "/notify-interviewer",
    tag = "Candidates",
    operation_id = "notifyInterviewer",
    summary = "Notify first interviewers about selected candidates",
    description = "Requires the `candidate:notify` permission. Logs a notification naming the selected candidates and their first interviewers; candidates without a first interviewer are skipped. No delivery backend is attached.",
    request_body = NotifyInterviewerRequest,
    responses(
        (status = 200, description = "Notification logged", body = NotifyInterviewerResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn notify_interviewer(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<NotifyInterviewerRequest>,
) -> Result<Json<NotifyInterviewerResponse>, AppError> {
    auth_user.require_permission("candidate:notify")?;
    validate_notify_request(&payload)?;

    let rows = find_selected_scoped(&state.db, &auth_user, &payload.candidate_ids).await?;

    let interviewer_ids: Vec<i32> = rows
        .iter()
        .filter_map(|r| r.first_interviewer_user_id)
        .collect();
    let interviewer_names: HashMap<i32, String> = if interviewer_ids.is_empty() {
        HashMap::new()
    } else {
        user::Entity::find()
            .filter(user::Column::Id.is_in(interviewer_ids))
            .all(&state.db)
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect()
    };

    let mut candidates = String::new();
    let mut interviewers = String::new();
    let mut notified = 0usize;
    for row in &rows {
        let Some(uid) = row.first_interviewer_user_id else {
            continue;
        };
        let Some(name) = interviewer_names.get(&uid) else {
            continue;
        };
        candidates = format!("{};{}", row.username, candidates);
        interviewers = format!("{};{}", name, interviewers);
        notified += 1;
    }

    info!(
        "{} notified interviewers [{}] about candidates [{}]",
        auth_user.username, interviewers, candidates
    );

    Ok(Json(NotifyInterviewerResponse {
        message: "Notification sent".into(),
        notified,
    }))
}

/// HR members and superusers see the whole pipeline.
fn sees_all_rows(auth_user: &AuthUser) -> bool {
    auth_user.is_superuser || auth_user.in_group("hr")
}

/// Rows where the user is the first or the second interviewer.
fn interviewer_scope(auth_user: &AuthUser) -> Condition {
    Condition::any()
        .add(candidate::Column::FirstInterviewerUserId.eq(auth_user.user_id))
        .add(candidate::Column::SecondInterviewerUserId.eq(auth_user.user_id))
}

/// Fetch one candidate, treating rows outside the caller's scope as absent.
async fn find_candidate_scoped<C: ConnectionTrait>(
    db: &C,
    auth_user: &AuthUser,
    id: i32,
) -> Result<candidate::Model, AppError> {
    let mut select = candidate::Entity::find_by_id(id);
    if !sees_all_rows(auth_user) {
        select = select.filter(interviewer_scope(auth_user));
    }
    select
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Candidate not found".into()))
}

/// Fetch the selected rows intersected with the caller's row scope,
/// ordered by id.
async fn find_selected_scoped<C: ConnectionTrait>(
    db: &C,
    auth_user: &AuthUser,
    ids: &[i32],
) -> Result<Vec<candidate::Model>, AppError> {
    let mut select = candidate::Entity::find()
        .filter(candidate::Column::Id.is_in(ids.iter().copied()));
    if !sees_all_rows(auth_user) {
        select = select.filter(interviewer_scope(auth_user));
    }
    Ok(select.order_by_asc(candidate::Column::Id).all(db).await?)
}

/// Map each listed phone number to the lowest-id resume sharing it.
async fn resume_ids_by_phone<C: ConnectionTrait>(
    db: &C,
    rows: &[CandidateListRow],
) -> Result<HashMap<String, i32>, AppError> {
    let phones: Vec<String> = rows
        .iter()
        .filter_map(|r| r.phone.clone())
        .filter(|p| !p.is_empty())
        .collect();
    if phones.is_empty() {
        return Ok(HashMap::new());
    }

    let resume_rows = resume::Entity::find()
        .filter(resume::Column::Phone.is_in(phones))
        .select_only()
        .column(resume::Column::Id)
        .column(resume::Column::Phone)
        .order_by_asc(resume::Column::Id)
        .into_model::<ResumePhoneRow>()
        .all(db)
        .await?;

    let mut map = HashMap::new();
    for row in resume_rows {
        if let Some(phone) = row.phone {
            map.entry(phone).or_insert(row.id);
        }
    }
    Ok(map)
}
