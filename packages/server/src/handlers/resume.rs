use axum::body::Body;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use sea_orm::*;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::resume;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::resume::{
    CreateResumeRequest, ResumeResponse, ResumeUploadResponse, validate_create_resume,
};
use crate::state::AppState;
use crate::storage::{BlobStore, BoxReader, ContentHash};

/// Body limit layer for the file upload route, sized from configuration
/// with headroom for multipart framing.
pub fn upload_body_limit(max_upload_size: u64) -> DefaultBodyLimit {
    let limit = usize::try_from(max_upload_size)
        .unwrap_or(usize::MAX)
        .saturating_add(64 * 1024);
    DefaultBodyLimit::max(limit)
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Resumes",
    operation_id = "createResume",
    summary = "Submit a resume",
    description = "Creates a resume bound to the authenticated caller. The applicant is always the caller; it cannot be set in the payload.",
    request_body = CreateResumeRequest,
    responses(
        (status = 201, description = "Resume created", body = ResumeResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn create_resume(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateResumeRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_resume(&payload)?;

    let now = chrono::Utc::now();
    let new_resume = resume::ActiveModel {
        applicant_user_id: Set(auth_user.user_id),
        username: Set(payload.username.trim().to_string()),
        city: Set(payload.city),
        phone: Set(payload.phone),
        email: Set(payload.email),
        apply_position: Set(payload.apply_position),
        born_address: Set(payload.born_address),
        gender: Set(payload.gender),
        bachelor_school: Set(payload.bachelor_school),
        master_school: Set(payload.master_school),
        doctor_school: Set(payload.doctor_school),
        major: Set(payload.major),
        degree: Set(payload.degree),
        candidate_introduction: Set(payload.candidate_introduction),
        work_experience: Set(payload.work_experience),
        project_experience: Set(payload.project_experience),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = new_resume.insert(&state.db).await?;

    Ok((StatusCode::CREATED, Json(ResumeResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/mine",
    tag = "Resumes",
    operation_id = "listMyResumes",
    summary = "List the caller's resumes",
    description = "Returns the caller's own submissions, newest first.",
    responses(
        (status = 200, description = "Resumes", body = Vec<ResumeResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_my_resumes(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ResumeResponse>>, AppError> {
    let resumes = resume::Entity::find()
        .filter(resume::Column::ApplicantUserId.eq(auth_user.user_id))
        .order_by_desc(resume::Column::CreatedAt)
        .order_by_desc(resume::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(resumes.into_iter().map(ResumeResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Resumes",
    operation_id = "getResume",
    summary = "Get a resume",
    description = "Visible to the owner, holders of `resume:view_all`, and superusers.",
    params(("id" = i32, Path, description = "Resume ID")),
    responses(
        (status = 200, description = "Resume", body = ResumeResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Resume not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_resume(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ResumeResponse>, AppError> {
    let model = find_resume(&state.db, id).await?;
    require_view_access(&auth_user, &model)?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    post,
    path = "/{id}/upload",
    tag = "Resumes",
    operation_id = "uploadResumeFile",
    summary = "Upload a resume photo or document",
    description = "Multipart upload; the field name selects the slot: `picture` for the photo, `attachment` for the document. Owner only. Re-uploading replaces the slot.",
    params(("id" = i32, Path, description = "Resume ID")),
    request_body(content_type = "multipart/form-data", description = "One `picture` or `attachment` file field"),
    responses(
        (status = 200, description = "File stored", body = ResumeUploadResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Resume not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(id))]
pub async fn upload_resume_file(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    mut multipart: Multipart,
) -> Result<Json<ResumeUploadResponse>, AppError> {
    let model = find_resume(&state.db, id).await?;
    if model.applicant_user_id != auth_user.user_id && !auth_user.is_superuser {
        return Err(AppError::PermissionDenied);
    }

    let mut stored: Option<(&'static str, ContentHash, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        let kind = match field.name() {
            Some("picture") => "picture",
            Some("attachment") => "attachment",
            _ => continue,
        };

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .ok_or_else(|| AppError::Validation("File field must have a filename".into()))?;

        let hash = stream_field_to_store(field, &*state.blob_store).await?;
        stored = Some((kind, hash, filename));
        break;
    }

    let (kind, hash, filename) =
        stored.ok_or_else(|| AppError::Validation("Missing 'picture' or 'attachment' field".into()))?;

    let mut active: resume::ActiveModel = model.into();
    match kind {
        "picture" => {
            active.picture = Set(Some(hash.to_hex()));
            active.picture_name = Set(Some(filename.clone()));
        }
        _ => {
            active.attachment = Set(Some(hash.to_hex()));
            active.attachment_name = Set(Some(filename.clone()));
        }
    }
    active.updated_at = Set(chrono::Utc::now());
    active.update(&state.db).await?;

    Ok(Json(ResumeUploadResponse {
        kind: kind.to_string(),
        hash: hash.to_hex(),
        filename,
    }))
}

#[utoipa::path(
    get,
    path = "/{id}/files/{kind}",
    tag = "Resumes",
    operation_id = "downloadResumeFile",
    summary = "Download a resume photo or document",
    description = "Streams the stored file with a MIME type guessed from its original filename. Same visibility as the resume detail. Supports ETag caching via If-None-Match.",
    params(
        ("id" = i32, Path, description = "Resume ID"),
        ("kind" = String, Path, description = "File slot: picture or attachment"),
    ),
    responses(
        (status = 200, description = "File content"),
        (status = 304, description = "Not Modified (ETag match)"),
        (status = 400, description = "Unknown kind (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "No file in that slot (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, headers), fields(id, kind = %kind))]
pub async fn download_resume_file(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((id, kind)): Path<(i32, String)>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let model = find_resume(&state.db, id).await?;
    require_view_access(&auth_user, &model)?;

    let (hash_hex, filename, disposition) = match kind.as_str() {
        "picture" => (model.picture, model.picture_name, "inline"),
        "attachment" => (model.attachment, model.attachment_name, "attachment"),
        _ => {
            return Err(AppError::Validation(
                "kind must be 'picture' or 'attachment'".into(),
            ));
        }
    };

    let hash_hex = hash_hex.ok_or_else(|| AppError::NotFound("File not found".into()))?;
    let filename = filename.unwrap_or_else(|| "download".to_string());

    let etag_value = format!("\"{hash_hex}\"");
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && let Ok(val) = if_none_match.to_str()
        && (val == etag_value || val == "*")
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let hash = ContentHash::from_hex(&hash_hex)?;
    let reader = state.blob_store.get_stream(&hash).await?;
    let body = Body::from_stream(ReaderStream::new(reader));

    let content_type = mime_guess::from_path(&filename)
        .first()
        .map(|m| m.to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_value(disposition, &filename),
        )
        .header(header::ETAG, &etag_value)
        .header(header::CACHE_CONTROL, "private, max-age=3600")
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))?;

    Ok(response)
}

fn require_view_access(auth_user: &AuthUser, model: &resume::Model) -> Result<(), AppError> {
    if model.applicant_user_id == auth_user.user_id || auth_user.has_permission("resume:view_all") {
        return Ok(());
    }
    Err(AppError::PermissionDenied)
}

async fn find_resume<C: ConnectionTrait>(db: &C, id: i32) -> Result<resume::Model, AppError> {
    resume::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Resume not found".into()))
}

/// Build a `Content-Disposition` value that survives non-ASCII filenames.
fn content_disposition_value(disposition: &str, filename: &str) -> String {
    let ascii_safe: String = filename
        .chars()
        .filter(|c| c.is_ascii_graphic() && !matches!(c, '"' | ';' | '\\'))
        .collect();
    let ascii_name = if ascii_safe.is_empty() {
        "download".to_string()
    } else {
        ascii_safe
    };

    // RFC 5987 percent-encoding for filename*.
    let encoded: String = filename
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'!'
            | b'#'
            | b'$'
            | b'&'
            | b'+'
            | b'-'
            | b'.'
            | b'^'
            | b'_'
            | b'`'
            | b'|'
            | b'~' => String::from(b as char),
            _ => format!("%{b:02X}"),
        })
        .collect();

    format!("{disposition}; filename=\"{ascii_name}\"; filename*=UTF-8''{encoded}")
}

/// Stream a multipart field to blob storage via a temp file. The store
/// enforces the configured size limit while hashing.
async fn stream_field_to_store(
    mut field: axum::extract::multipart::Field<'_>,
    blob_store: &dyn BlobStore,
) -> Result<ContentHash, AppError> {
    let temp_path = std::env::temp_dir().join(format!("recruitment-upload-{}", Uuid::new_v4()));

    let result = async {
        let mut temp_file = tokio::fs::File::create(&temp_path)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create temp file: {e}")))?;

        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
        {
            temp_file
                .write_all(&chunk)
                .await
                .map_err(|e| AppError::Internal(format!("Temp file write failed: {e}")))?;
        }

        temp_file
            .flush()
            .await
            .map_err(|e| AppError::Internal(format!("Temp file flush failed: {e}")))?;
        drop(temp_file);

        let file = tokio::fs::File::open(&temp_path)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to reopen temp file: {e}")))?;
        let reader: BoxReader = Box::new(file);
        let hash = blob_store.put_stream(reader).await?;

        Ok(hash)
    }
    .await;

    // Best effort.
    let _ = tokio::fs::remove_file(&temp_path).await;

    result
}
