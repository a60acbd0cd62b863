use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A resume submitted by an applicant through the job site.
///
/// Correlates with `candidate` rows only informally, by phone number.
/// There is deliberately no foreign key between the two.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "resume")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// The authenticated submitter. Always set server-side.
    pub applicant_user_id: i32,
    #[sea_orm(belongs_to, from = "applicant_user_id", to = "id")]
    pub applicant_user: Option<super::user::Entity>,

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

    /// Content hash of the uploaded photo, if any.
    pub picture: Option<String>,
    /// Original filename of the uploaded photo.
    pub picture_name: Option<String>,
    /// Content hash of the uploaded resume document, if any.
    pub attachment: Option<String>,
    /// Original filename of the uploaded resume document.
    pub attachment_name: Option<String>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
