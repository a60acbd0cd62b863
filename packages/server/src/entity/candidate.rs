use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Valid values for the per-stage `*_result` columns.
pub const RESULT_VALUES: &[&str] = &["advance", "hire", "hold", "reject"];

/// Valid values for the HR interview grade (`hr_score`).
pub const HR_GRADES: &[&str] = &["S", "A", "B", "C"];

/// A candidate moving through the interview pipeline.
///
/// Each interview stage has its own evaluation block with exactly one
/// nullable interviewer reference. Rows are never hard-deleted.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "candidate")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Staff-assigned external applicant ID.
    pub userid: Option<i32>,
    /// The candidate's name.
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

    // First interview.
    pub first_score: Option<f64>,
    pub first_learning_ability: Option<i32>,
    pub first_professional_competency: Option<i32>,
    pub first_advantage: Option<String>,
    pub first_disadvantage: Option<String>,
    /// One of: advance, hire, hold, reject
    pub first_result: Option<String>,
    pub first_recommend_position: Option<String>,
    pub first_interviewer_user_id: Option<i32>,
    #[sea_orm(belongs_to, from = "first_interviewer_user_id", to = "id", relation_enum = "FirstInterviewerUser")]
    pub first_interviewer_user: Option<super::user::Entity>,
    pub first_remark: Option<String>,

    // Second interview.
    pub second_score: Option<f64>,
    pub second_learning_ability: Option<i32>,
    pub second_professional_competency: Option<i32>,
    pub second_pursue_of_excellence: Option<i32>,
    pub second_communication_ability: Option<i32>,
    pub second_pressure_score: Option<i32>,
    pub second_advantage: Option<String>,
    pub second_disadvantage: Option<String>,
    /// One of: advance, hire, hold, reject
    pub second_result: Option<String>,
    pub second_recommend_position: Option<String>,
    pub second_interviewer_user_id: Option<i32>,
    #[sea_orm(belongs_to, from = "second_interviewer_user_id", to = "id", relation_enum = "SecondInterviewerUser")]
    pub second_interviewer_user: Option<super::user::Entity>,
    pub second_remark: Option<String>,

    // HR interview.
    /// Grade, one of: S, A, B, C
    pub hr_score: Option<String>,
    pub hr_responsibility: Option<i32>,
    pub hr_communication_ability: Option<i32>,
    pub hr_logic_ability: Option<i32>,
    pub hr_potential: Option<i32>,
    pub hr_stability: Option<i32>,
    pub hr_advantage: Option<String>,
    pub hr_disadvantage: Option<String>,
    /// One of: advance, hire, hold, reject
    pub hr_result: Option<String>,
    pub hr_interviewer_user_id: Option<i32>,
    #[sea_orm(belongs_to, from = "hr_interviewer_user_id", to = "id", relation_enum = "HrInterviewerUser")]
    pub hr_interviewer_user: Option<super::user::Entity>,
    pub hr_remark: Option<String>,

    /// Username of whoever created the record (staff or import).
    pub creator: Option<String>,
    /// Username of whoever last edited the record.
    pub last_editor: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
