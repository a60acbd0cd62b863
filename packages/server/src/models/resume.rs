use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::resume;
use crate::error::AppError;

use super::shared::validate_name;

/// Resume submission. The applicant is always the authenticated caller;
/// there is no way to submit on someone else's behalf.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateResumeRequest {
    /// The applicant's name as it should appear to HR.
    pub username: String,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub apply_position: Option<String>,
    pub born_address: Option<String>,
    pub gender: Option<String>,
    pub bachelor_school: Option<String>,
    pub master_school: Option<String>,
    pub doctor_school: Option<String>,
    pub major: Option<String>,
    pub degree: Option<String>,
    pub candidate_introduction: Option<String>,
    pub work_experience: Option<String>,
    pub project_experience: Option<String>,
}

pub fn validate_create_resume(req: &CreateResumeRequest) -> Result<(), AppError> {
    validate_name(&req.username, "Username")
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ResumeResponse {
    pub id: i32,
    pub applicant_user_id: i32,
    pub username: String,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub apply_position: Option<String>,
    pub born_address: Option<String>,
    pub gender: Option<String>,
    pub bachelor_school: Option<String>,
    pub master_school: Option<String>,
    pub doctor_school: Option<String>,
    pub major: Option<String>,
    pub degree: Option<String>,
    pub candidate_introduction: Option<String>,
    pub work_experience: Option<String>,
    pub project_experience: Option<String>,
    /// Content hash of the uploaded photo; fetch via `files/picture`.
    pub picture: Option<String>,
    pub picture_name: Option<String>,
    /// Content hash of the uploaded document; fetch via `files/attachment`.
    pub attachment: Option<String>,
    pub attachment_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<resume::Model> for ResumeResponse {
    fn from(m: resume::Model) -> Self {
        Self {
            id: m.id,
            applicant_user_id: m.applicant_user_id,
            username: m.username,
            city: m.city,
            phone: m.phone,
            email: m.email,
            apply_position: m.apply_position,
            born_address: m.born_address,
            gender: m.gender,
            bachelor_school: m.bachelor_school,
            master_school: m.master_school,
            doctor_school: m.doctor_school,
            major: m.major,
            degree: m.degree,
            candidate_introduction: m.candidate_introduction,
            work_experience: m.work_experience,
            project_experience: m.project_experience,
            picture: m.picture,
            picture_name: m.picture_name,
            attachment: m.attachment,
            attachment_name: m.attachment_name,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Result of a picture/attachment upload.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ResumeUploadResponse {
    /// Which slot was filled: "picture" or "attachment".
    pub kind: String,
    /// Content hash of the stored file.
    pub hash: String,
    /// Original filename as uploaded.
    pub filename: String,
}
