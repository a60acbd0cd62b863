use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use crate::entity::candidate::{self, HR_GRADES, RESULT_VALUES};
use crate::error::AppError;

pub use super::shared::{Pagination, escape_like};
use super::shared::{validate_bulk_ids, validate_name};

/// Manual candidate entry. Staff-facing, so the whole record is writable
/// at creation; audit columns are stamped server-side.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateCandidateRequest {
    pub username: String,
    pub userid: Option<i32>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub apply_position: Option<String>,
    pub born_address: Option<String>,
    pub gender: Option<String>,
    pub candidate_remark: Option<String>,
    pub bachelor_school: Option<String>,
    pub master_school: Option<String>,
    pub doctor_school: Option<String>,
    pub major: Option<String>,
    pub degree: Option<String>,
    pub test_score_of_general_ability: Option<f64>,
    pub paper_score: Option<f64>,

    pub first_score: Option<f64>,
    pub first_learning_ability: Option<i32>,
    pub first_professional_competency: Option<i32>,
    pub first_advantage: Option<String>,
    pub first_disadvantage: Option<String>,
    pub first_result: Option<String>,
    pub first_recommend_position: Option<String>,
    pub first_interviewer_user_id: Option<i32>,
    pub first_remark: Option<String>,

    pub second_score: Option<f64>,
    pub second_learning_ability: Option<i32>,
    pub second_professional_competency: Option<i32>,
    pub second_pursue_of_excellence: Option<i32>,
    pub second_communication_ability: Option<i32>,
    pub second_pressure_score: Option<i32>,
    pub second_advantage: Option<String>,
    pub second_disadvantage: Option<String>,
    pub second_result: Option<String>,
    pub second_recommend_position: Option<String>,
    pub second_interviewer_user_id: Option<i32>,
    pub second_remark: Option<String>,

    pub hr_score: Option<String>,
    pub hr_responsibility: Option<i32>,
    pub hr_communication_ability: Option<i32>,
    pub hr_logic_ability: Option<i32>,
    pub hr_potential: Option<i32>,
    pub hr_stability: Option<i32>,
    pub hr_advantage: Option<String>,
    pub hr_disadvantage: Option<String>,
    pub hr_result: Option<String>,
    pub hr_interviewer_user_id: Option<i32>,
    pub hr_remark: Option<String>,
}

/// Stage-scoped partial edit. Absent fields are left unchanged; clearing a
/// stored value is not supported.
#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateCandidateRequest {
    pub userid: Option<i32>,
    pub username: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub apply_position: Option<String>,
    pub born_address: Option<String>,
    pub gender: Option<String>,
    pub candidate_remark: Option<String>,
    pub bachelor_school: Option<String>,
    pub master_school: Option<String>,
    pub doctor_school: Option<String>,
    pub major: Option<String>,
    pub degree: Option<String>,
    pub test_score_of_general_ability: Option<f64>,
    pub paper_score: Option<f64>,

    pub first_score: Option<f64>,
    pub first_learning_ability: Option<i32>,
    pub first_professional_competency: Option<i32>,
    pub first_advantage: Option<String>,
    pub first_disadvantage: Option<String>,
    pub first_result: Option<String>,
    pub first_recommend_position: Option<String>,
    pub first_interviewer_user_id: Option<i32>,
    pub first_remark: Option<String>,

    pub second_score: Option<f64>,
    pub second_learning_ability: Option<i32>,
    pub second_professional_competency: Option<i32>,
    pub second_pursue_of_excellence: Option<i32>,
    pub second_communication_ability: Option<i32>,
    pub second_pressure_score: Option<i32>,
    pub second_advantage: Option<String>,
    pub second_disadvantage: Option<String>,
    pub second_result: Option<String>,
    pub second_recommend_position: Option<String>,
    pub second_interviewer_user_id: Option<i32>,
    pub second_remark: Option<String>,

    pub hr_score: Option<String>,
    pub hr_responsibility: Option<i32>,
    pub hr_communication_ability: Option<i32>,
    pub hr_logic_ability: Option<i32>,
    pub hr_potential: Option<i32>,
    pub hr_stability: Option<i32>,
    pub hr_advantage: Option<String>,
    pub hr_disadvantage: Option<String>,
    pub hr_result: Option<String>,
    pub hr_interviewer_user_id: Option<i32>,
    pub hr_remark: Option<String>,
}

impl UpdateCandidateRequest {
    /// Column names of every field present in the payload, for checking
    /// against the caller's editable set before anything is written.
    pub fn provided_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.userid.is_some() {
            fields.push("userid");
        }
        if self.username.is_some() {
            fields.push("username");
        }
        if self.city.is_some() {
            fields.push("city");
        }
        if self.phone.is_some() {
            fields.push("phone");
        }
        if self.email.is_some() {
            fields.push("email");
        }
        if self.apply_position.is_some() {
            fields.push("apply_position");
        }
        if self.born_address.is_some() {
            fields.push("born_address");
        }
        if self.gender.is_some() {
            fields.push("gender");
        }
        if self.candidate_remark.is_some() {
            fields.push("candidate_remark");
        }
        if self.bachelor_school.is_some() {
            fields.push("bachelor_school");
        }
        if self.master_school.is_some() {
            fields.push("master_school");
        }
        if self.doctor_school.is_some() {
            fields.push("doctor_school");
        }
        if self.major.is_some() {
            fields.push("major");
        }
        if self.degree.is_some() {
            fields.push("degree");
        }
        if self.test_score_of_general_ability.is_some() {
            fields.push("test_score_of_general_ability");
        }
        if self.paper_score.is_some() {
            fields.push("paper_score");
        }
        if self.first_score.is_some() {
            fields.push("first_score");
        }
        if self.first_learning_ability.is_some() {
            fields.push("first_learning_ability");
        }
        if self.first_professional_competency.is_some() {
            fields.push("first_professional_competency");
        }
        if self.first_advantage.is_some() {
            fields.push("first_advantage");
        }
        if self.first_disadvantage.is_some() {
            fields.push("first_disadvantage");
        }
        if self.first_result.is_some() {
            fields.push("first_result");
        }
        if self.first_recommend_position.is_some() {
            fields.push("first_recommend_position");
        }
        if self.first_interviewer_user_id.is_some() {
            fields.push("first_interviewer_user_id");
        }
        if self.first_remark.is_some() {
            fields.push("first_remark");
        }
        if self.second_score.is_some() {
            fields.push("second_score");
        }
        if self.second_learning_ability.is_some() {
            fields.push("second_learning_ability");
        }
        if self.second_professional_competency.is_some() {
            fields.push("second_professional_competency");
        }
        if self.second_pursue_of_excellence.is_some() {
            fields.push("second_pursue_of_excellence");
        }
        if self.second_communication_ability.is_some() {
            fields.push("second_communication_ability");
        }
        if self.second_pressure_score.is_some() {
            fields.push("second_pressure_score");
        }
        if self.second_advantage.is_some() {
            fields.push("second_advantage");
        }
        if self.second_disadvantage.is_some() {
            fields.push("second_disadvantage");
        }
        if self.second_result.is_some() {
            fields.push("second_result");
        }
        if self.second_recommend_position.is_some() {
            fields.push("second_recommend_position");
        }
        if self.second_interviewer_user_id.is_some() {
            fields.push("second_interviewer_user_id");
        }
        if self.second_remark.is_some() {
            fields.push("second_remark");
        }
        if self.hr_score.is_some() {
            fields.push("hr_score");
        }
        if self.hr_responsibility.is_some() {
            fields.push("hr_responsibility");
        }
        if self.hr_communication_ability.is_some() {
            fields.push("hr_communication_ability");
        }
        if self.hr_logic_ability.is_some() {
            fields.push("hr_logic_ability");
        }
        if self.hr_potential.is_some() {
            fields.push("hr_potential");
        }
        if self.hr_stability.is_some() {
            fields.push("hr_stability");
        }
        if self.hr_advantage.is_some() {
            fields.push("hr_advantage");
        }
        if self.hr_disadvantage.is_some() {
            fields.push("hr_disadvantage");
        }
        if self.hr_result.is_some() {
            fields.push("hr_result");
        }
        if self.hr_interviewer_user_id.is_some() {
            fields.push("hr_interviewer_user_id");
        }
        if self.hr_remark.is_some() {
            fields.push("hr_remark");
        }
        fields
    }

    /// Write every provided field into the active model.
    pub fn apply(self, active: &mut candidate::ActiveModel) {
        if let Some(v) = self.userid {
            active.userid = Set(Some(v));
        }
        if let Some(v) = self.username {
            active.username = Set(v.trim().to_string());
        }
        if let Some(v) = self.city {
            active.city = Set(Some(v));
        }
        if let Some(v) = self.phone {
            active.phone = Set(Some(v));
        }
        if let Some(v) = self.email {
            active.email = Set(Some(v));
        }
        if let Some(v) = self.apply_position {
            active.apply_position = Set(Some(v));
        }
        if let Some(v) = self.born_address {
            active.born_address = Set(Some(v));
        }
        if let Some(v) = self.gender {
            active.gender = Set(Some(v));
        }
        if let Some(v) = self.candidate_remark {
            active.candidate_remark = Set(Some(v));
        }
        if let Some(v) = self.bachelor_school {
            active.bachelor_school = Set(Some(v));
        }
        if let Some(v) = self.master_school {
            active.master_school = Set(Some(v));
        }
        if let Some(v) = self.doctor_school {
            active.doctor_school = Set(Some(v));
        }
        if let Some(v) = self.major {
            active.major = Set(Some(v));
        }
        if let Some(v) = self.degree {
            active.degree = Set(Some(v));
        }
        if let Some(v) = self.test_score_of_general_ability {
            active.test_score_of_general_ability = Set(Some(v));
        }
        if let Some(v) = self.paper_score {
            active.paper_score = Set(Some(v));
        }
        if let Some(v) = self.first_score {
            active.first_score = Set(Some(v));
        }
        if let Some(v) = self.first_learning_ability {
            active.first_learning_ability = Set(Some(v));
        }
        if let Some(v) = self.first_professional_competency {
            active.first_professional_competency = Set(Some(v));
        }
        if let Some(v) = self.first_advantage {
            active.first_advantage = Set(Some(v));
        }
        if let Some(v) = self.first_disadvantage {
            active.first_disadvantage = Set(Some(v));
        }
        if let Some(v) = self.first_result {
            active.first_result = Set(Some(v));
        }
        if let Some(v) = self.first_recommend_position {
            active.first_recommend_position = Set(Some(v));
        }
        if let Some(v) = self.first_interviewer_user_id {
            active.first_interviewer_user_id = Set(Some(v));
        }
        if let Some(v) = self.first_remark {
            active.first_remark = Set(Some(v));
        }
        if let Some(v) = self.second_score {
            active.second_score = Set(Some(v));
        }
        if let Some(v) = self.second_learning_ability {
            active.second_learning_ability = Set(Some(v));
        }
        if let Some(v) = self.second_professional_competency {
            active.second_professional_competency = Set(Some(v));
        }
        if let Some(v) = self.second_pursue_of_excellence {
            active.second_pursue_of_excellence = Set(Some(v));
        }
        if let Some(v) = self.second_communication_ability {
            active.second_communication_ability = Set(Some(v));
        }
        if let Some(v) = self.second_pressure_score {
            active.second_pressure_score = Set(Some(v));
        }
        if let Some(v) = self.second_advantage {
            active.second_advantage = Set(Some(v));
        }
        if let Some(v) = self.second_disadvantage {
            active.second_disadvantage = Set(Some(v));
        }
        if let Some(v) = self.second_result {
            active.second_result = Set(Some(v));
        }
        if let Some(v) = self.second_recommend_position {
            active.second_recommend_position = Set(Some(v));
        }
        if let Some(v) = self.second_interviewer_user_id {
            active.second_interviewer_user_id = Set(Some(v));
        }
        if let Some(v) = self.second_remark {
            active.second_remark = Set(Some(v));
        }
        if let Some(v) = self.hr_score {
            active.hr_score = Set(Some(v));
        }
        if let Some(v) = self.hr_responsibility {
            active.hr_responsibility = Set(Some(v));
        }
        if let Some(v) = self.hr_communication_ability {
            active.hr_communication_ability = Set(Some(v));
        }
        if let Some(v) = self.hr_logic_ability {
            active.hr_logic_ability = Set(Some(v));
        }
        if let Some(v) = self.hr_potential {
            active.hr_potential = Set(Some(v));
        }
        if let Some(v) = self.hr_stability {
            active.hr_stability = Set(Some(v));
        }
        if let Some(v) = self.hr_advantage {
            active.hr_advantage = Set(Some(v));
        }
        if let Some(v) = self.hr_disadvantage {
            active.hr_disadvantage = Set(Some(v));
        }
        if let Some(v) = self.hr_result {
            active.hr_result = Set(Some(v));
        }
        if let Some(v) = self.hr_interviewer_user_id {
            active.hr_interviewer_user_id = Set(Some(v));
        }
        if let Some(v) = self.hr_remark {
            active.hr_remark = Set(Some(v));
        }
    }
}

/// Full candidate record as stored.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CandidateResponse {
    pub id: i32,
    pub userid: Option<i32>,
    pub username: String,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub apply_position: Option<String>,
    pub born_address: Option<String>,
    pub gender: Option<String>,
    pub candidate_remark: Option<String>,
    pub bachelor_school: Option<String>,
    pub master_school: Option<String>,
    pub doctor_school: Option<String>,
    pub major: Option<String>,
    pub degree: Option<String>,
    pub test_score_of_general_ability: Option<f64>,
    pub paper_score: Option<f64>,

    pub first_score: Option<f64>,
    pub first_learning_ability: Option<i32>,
    pub first_professional_competency: Option<i32>,
    pub first_advantage: Option<String>,
    pub first_disadvantage: Option<String>,
    pub first_result: Option<String>,
    pub first_recommend_position: Option<String>,
    pub first_interviewer_user_id: Option<i32>,
    pub first_remark: Option<String>,

    pub second_score: Option<f64>,
    pub second_learning_ability: Option<i32>,
    pub second_professional_competency: Option<i32>,
    pub second_pursue_of_excellence: Option<i32>,
    pub second_communication_ability: Option<i32>,
    pub second_pressure_score: Option<i32>,
    pub second_advantage: Option<String>,
    pub second_disadvantage: Option<String>,
    pub second_result: Option<String>,
    pub second_recommend_position: Option<String>,
    pub second_interviewer_user_id: Option<i32>,
    pub second_remark: Option<String>,

    pub hr_score: Option<String>,
    pub hr_responsibility: Option<i32>,
    pub hr_communication_ability: Option<i32>,
    pub hr_logic_ability: Option<i32>,
    pub hr_potential: Option<i32>,
    pub hr_stability: Option<i32>,
    pub hr_advantage: Option<String>,
    pub hr_disadvantage: Option<String>,
    pub hr_result: Option<String>,
    pub hr_interviewer_user_id: Option<i32>,
    pub hr_remark: Option<String>,

    pub creator: Option<String>,
    pub last_editor: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<candidate::Model> for CandidateResponse {
    fn from(m: candidate::Model) -> Self {
        Self {
            id: m.id,
            userid: m.userid,
            username: m.username,
            city: m.city,
            phone: m.phone,
            email: m.email,
            apply_position: m.apply_position,
            born_address: m.born_address,
            gender: m.gender,
            candidate_remark: m.candidate_remark,
            bachelor_school: m.bachelor_school,
            master_school: m.master_school,
            doctor_school: m.doctor_school,
            major: m.major,
            degree: m.degree,
            test_score_of_general_ability: m.test_score_of_general_ability,
            paper_score: m.paper_score,
            first_score: m.first_score,
            first_learning_ability: m.first_learning_ability,
            first_professional_competency: m.first_professional_competency,
            first_advantage: m.first_advantage,
            first_disadvantage: m.first_disadvantage,
            first_result: m.first_result,
            first_recommend_position: m.first_recommend_position,
            first_interviewer_user_id: m.first_interviewer_user_id,
            first_remark: m.first_remark,
            second_score: m.second_score,
            second_learning_ability: m.second_learning_ability,
            second_professional_competency: m.second_professional_competency,
            second_pursue_of_excellence: m.second_pursue_of_excellence,
            second_communication_ability: m.second_communication_ability,
            second_pressure_score: m.second_pressure_score,
            second_advantage: m.second_advantage,
            second_disadvantage: m.second_disadvantage,
            second_result: m.second_result,
            second_recommend_position: m.second_recommend_position,
            second_interviewer_user_id: m.second_interviewer_user_id,
            second_remark: m.second_remark,
            hr_score: m.hr_score,
            hr_responsibility: m.hr_responsibility,
            hr_communication_ability: m.hr_communication_ability,
            hr_logic_ability: m.hr_logic_ability,
            hr_potential: m.hr_potential,
            hr_stability: m.hr_stability,
            hr_advantage: m.hr_advantage,
            hr_disadvantage: m.hr_disadvantage,
            hr_result: m.hr_result,
            hr_interviewer_user_id: m.hr_interviewer_user_id,
            hr_remark: m.hr_remark,
            creator: m.creator,
            last_editor: m.last_editor,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// A named group of form fields, mirroring what the admin screen would
/// render for the requesting user.
#[derive(Serialize, utoipa::ToSchema)]
pub struct FieldsetGroup {
    pub title: Option<String>,
    pub fields: Vec<String>,
}

/// Candidate detail plus the role-scoped form metadata.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CandidateDetailResponse {
    pub candidate: CandidateResponse,
    /// Field groups this user's edit screen shows for this record.
    pub fieldsets: Vec<FieldsetGroup>,
    /// Fields rendered but not editable for this user.
    pub readonly_fields: Vec<String>,
}

/// Row shape fetched for the list query; phone stays internal for the
/// resume correlation and is not serialized.
#[derive(FromQueryResult)]
pub struct CandidateListRow {
    pub id: i32,
    pub username: String,
    pub city: Option<String>,
    pub bachelor_school: Option<String>,
    pub phone: Option<String>,
    pub first_score: Option<f64>,
    pub first_result: Option<String>,
    pub first_interviewer_user_id: Option<i32>,
    pub second_result: Option<String>,
    pub second_interviewer_user_id: Option<i32>,
    pub hr_score: Option<String>,
    pub hr_result: Option<String>,
    pub last_editor: Option<String>,
}

/// Minimal resume row used to correlate candidates by phone.
#[derive(FromQueryResult)]
pub struct ResumePhoneRow {
    pub id: i32,
    pub phone: Option<String>,
}

/// One row of the candidate list: the admin list columns plus the id of a
/// phone-matching resume when one exists.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CandidateListItem {
    pub id: i32,
    pub username: String,
    pub city: Option<String>,
    pub bachelor_school: Option<String>,
    pub resume_id: Option<i32>,
    pub first_score: Option<f64>,
    pub first_result: Option<String>,
    pub first_interviewer_user_id: Option<i32>,
    pub second_result: Option<String>,
    pub second_interviewer_user_id: Option<i32>,
    pub hr_score: Option<String>,
    pub hr_result: Option<String>,
    pub last_editor: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CandidateListResponse {
    pub data: Vec<CandidateListItem>,
    pub pagination: Pagination,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct CandidateListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Case-insensitive match over username, phone, email, bachelor_school.
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub city: Option<String>,
    pub first_result: Option<String>,
    pub second_result: Option<String>,
    pub hr_result: Option<String>,
    pub first_interviewer_user_id: Option<i32>,
    pub second_interviewer_user_id: Option<i32>,
    pub second_score: Option<f64>,
}

/// Body for the CSV export action: the selected row set.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct ExportCandidatesRequest {
    pub candidate_ids: Vec<i32>,
}

/// Body for the notify-interviewer action.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct NotifyInterviewerRequest {
    pub candidate_ids: Vec<i32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct NotifyInterviewerResponse {
    pub message: String,
    /// Number of candidates that had a first interviewer to notify.
    pub notified: usize,
}

fn validate_result_value(value: Option<&str>, name: &str) -> Result<(), AppError> {
    if let Some(v) = value
        && !RESULT_VALUES.contains(&v)
    {
        return Err(AppError::Validation(format!(
            "{name} must be one of: {}",
            RESULT_VALUES.join(", ")
        )));
    }
    Ok(())
}

fn validate_hr_grade(value: Option<&str>) -> Result<(), AppError> {
    if let Some(v) = value
        && !HR_GRADES.contains(&v)
    {
        return Err(AppError::Validation(format!(
            "hr_score must be one of: {}",
            HR_GRADES.join(", ")
        )));
    }
    Ok(())
}

pub fn validate_create_candidate(req: &CreateCandidateRequest) -> Result<(), AppError> {
    validate_name(&req.username, "Username")?;
    validate_result_value(req.first_result.as_deref(), "first_result")?;
    validate_result_value(req.second_result.as_deref(), "second_result")?;
    validate_result_value(req.hr_result.as_deref(), "hr_result")?;
    validate_hr_grade(req.hr_score.as_deref())?;
    Ok(())
}

pub fn validate_update_candidate(req: &UpdateCandidateRequest) -> Result<(), AppError> {
    if let Some(ref username) = req.username {
        validate_name(username, "Username")?;
    }
    validate_result_value(req.first_result.as_deref(), "first_result")?;
    validate_result_value(req.second_result.as_deref(), "second_result")?;
    validate_result_value(req.hr_result.as_deref(), "hr_result")?;
    validate_hr_grade(req.hr_score.as_deref())?;
    Ok(())
}

pub fn validate_export_request(req: &ExportCandidatesRequest) -> Result<(), AppError> {
    validate_bulk_ids(&req.candidate_ids, "candidate_ids", 1000)
}

pub fn validate_notify_request(req: &NotifyInterviewerRequest) -> Result<(), AppError> {
    validate_bulk_ids(&req.candidate_ids, "candidate_ids", 1000)
}
