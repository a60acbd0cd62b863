use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::user_group::VALID_GROUPS;
use crate::error::AppError;

/// One user row in the administration list, with resolved group memberships.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UserListItem {
    pub id: i32,
    pub username: String,
    pub is_superuser: bool,
    #[schema(example = json!(["hr"]))]
    pub groups: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Replace a user's group memberships wholesale.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SetGroupsRequest {
    /// Group names from the known set; an empty list removes all memberships.
    #[schema(example = json!(["interviewer"]))]
    pub groups: Vec<String>,
}

pub fn validate_set_groups(req: &SetGroupsRequest) -> Result<(), AppError> {
    let mut seen = std::collections::HashSet::new();
    for group in &req.groups {
        if !VALID_GROUPS.contains(&group.as_str()) {
            return Err(AppError::Validation(format!(
                "Unknown group '{group}'; valid groups: {}",
                VALID_GROUPS.join(", ")
            )));
        }
        if !seen.insert(group.as_str()) {
            return Err(AppError::Validation(format!("Duplicate group '{group}'")));
        }
    }
    Ok(())
}
