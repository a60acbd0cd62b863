//! Field-level metadata for candidate records: which fields each staff role
//! sees and edits, and the fixed field list for CSV export.

use std::collections::HashSet;

use crate::entity::candidate;
use crate::extractors::auth::AuthUser;

/// A titled group of candidate fields shown together on an edit screen.
#[derive(Debug, Clone, Copy)]
pub struct Fieldset {
    /// `None` for the untitled basic-information group.
    pub title: Option<&'static str>,
    pub fields: &'static [&'static str],
}

pub const BASIC_FIELDS: &[&str] = &[
    "userid",
    "username",
    "city",
    "phone",
    "email",
    "apply_position",
    "born_address",
    "gender",
    "candidate_remark",
    "bachelor_school",
    "master_school",
    "doctor_school",
    "major",
    "test_score_of_general_ability",
    "paper_score",
    "degree",
];

pub const FIRST_INTERVIEW_FIELDS: &[&str] = &[
    "first_score",
    "first_learning_ability",
    "first_professional_competency",
    "first_advantage",
    "first_disadvantage",
    "first_result",
    "first_recommend_position",
    "first_interviewer_user_id",
    "first_remark",
];

pub const SECOND_INTERVIEW_FIELDS: &[&str] = &[
    "second_score",
    "second_learning_ability",
    "second_professional_competency",
    "second_pursue_of_excellence",
    "second_communication_ability",
    "second_pressure_score",
    "second_advantage",
    "second_disadvantage",
    "second_result",
    "second_recommend_position",
    "second_interviewer_user_id",
    "second_remark",
];

pub const HR_INTERVIEW_FIELDS: &[&str] = &[
    "hr_score",
    "hr_responsibility",
    "hr_communication_ability",
    "hr_logic_ability",
    "hr_potential",
    "hr_stability",
    "hr_advantage",
    "hr_disadvantage",
    "hr_result",
    "hr_interviewer_user_id",
    "hr_remark",
];

/// The full field layout: basic info plus all three interview stages.
pub const DEFAULT_FIELDSETS: &[Fieldset] = &[
    Fieldset {
        title: None,
        fields: BASIC_FIELDS,
    },
    Fieldset {
        title: Some("First interview"),
        fields: FIRST_INTERVIEW_FIELDS,
    },
    Fieldset {
        title: Some("Second interview"),
        fields: SECOND_INTERVIEW_FIELDS,
    },
    Fieldset {
        title: Some("HR interview"),
        fields: HR_INTERVIEW_FIELDS,
    },
];

/// Layout for a first-stage interviewer: basic info plus their own stage.
pub const FIRST_INTERVIEWER_FIELDSETS: &[Fieldset] = &[
    Fieldset {
        title: None,
        fields: BASIC_FIELDS,
    },
    Fieldset {
        title: Some("First interview"),
        fields: FIRST_INTERVIEW_FIELDS,
    },
];

/// Layout for a second-stage interviewer: basic info plus their own stage.
pub const SECOND_INTERVIEWER_FIELDSETS: &[Fieldset] = &[
    Fieldset {
        title: None,
        fields: BASIC_FIELDS,
    },
    Fieldset {
        title: Some("Second interview"),
        fields: SECOND_INTERVIEW_FIELDS,
    },
];

/// Interviewers may never reassign who interviews a candidate.
pub const INTERVIEWER_READONLY_FIELDS: &[&str] =
    &["first_interviewer_user_id", "second_interviewer_user_id"];

/// Select the fieldset layout a user gets for a specific candidate.
///
/// A first-stage match wins over a second-stage match when the same user
/// holds both roles on one candidate. Everyone else, HR and superusers
/// included, gets the full layout.
pub fn fieldsets_for(user: &AuthUser, record: &candidate::Model) -> &'static [Fieldset] {
    if user.in_group("interviewer") && record.first_interviewer_user_id == Some(user.user_id) {
        return FIRST_INTERVIEWER_FIELDSETS;
    }
    if user.in_group("interviewer") && record.second_interviewer_user_id == Some(user.user_id) {
        return SECOND_INTERVIEWER_FIELDSETS;
    }
    DEFAULT_FIELDSETS
}

/// Fields shown but not editable for the given user, on any candidate.
pub fn readonly_fields_for(user: &AuthUser) -> &'static [&'static str] {
    if user.in_group("interviewer") {
        INTERVIEWER_READONLY_FIELDS
    } else {
        &[]
    }
}

/// The set of fields the user may modify on this candidate:
/// their fieldset layout flattened, minus their read-only fields.
pub fn editable_fields_for(user: &AuthUser, record: &candidate::Model) -> HashSet<&'static str> {
    let readonly = readonly_fields_for(user);
    fieldsets_for(user, record)
        .iter()
        .flat_map(|fs| fs.fields.iter().copied())
        .filter(|f| !readonly.contains(f))
        .collect()
}

/// Fixed field list for the CSV export action, in column order.
pub const EXPORT_FIELDS: &[&str] = &[
    "username",
    "city",
    "phone",
    "bachelor_school",
    "master_school",
    "degree",
    "first_result",
    "first_interviewer_user",
    "second_result",
    "second_interviewer_user",
    "hr_result",
    "hr_score",
    "hr_remark",
    "hr_interviewer_user",
];

/// Display title for an export column: underscores become spaces and each
/// word is capitalized ("hr_remark" -> "Hr Remark").
pub fn export_title(field: &str) -> String {
    field
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Raw value of an export column for one candidate row.
///
/// Interviewer columns export the referenced user id, matching what the
/// record itself stores. NULL becomes the empty string.
pub fn export_value(record: &candidate::Model, field: &str) -> String {
    match field {
        "username" => record.username.clone(),
        "city" => text(&record.city),
        "phone" => text(&record.phone),
        "bachelor_school" => text(&record.bachelor_school),
        "master_school" => text(&record.master_school),
        "degree" => text(&record.degree),
        "first_result" => text(&record.first_result),
        "first_interviewer_user" => fk(record.first_interviewer_user_id),
        "second_result" => text(&record.second_result),
        "second_interviewer_user" => fk(record.second_interviewer_user_id),
        "hr_result" => text(&record.hr_result),
        "hr_score" => text(&record.hr_score),
        "hr_remark" => text(&record.hr_remark),
        "hr_interviewer_user" => fk(record.hr_interviewer_user_id),
        _ => String::new(),
    }
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn fk(value: Option<i32>) -> String {
    value.map(|id| id.to_string()).unwrap_or_default()
}
