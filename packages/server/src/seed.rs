use sea_orm::sea_query::{Index, OnConflict, PostgresQueryBuilder};
use sea_orm::*;
use tracing::info;

use crate::entity::{candidate, group_permission, resume};

/// Default group-permission grants seeded on startup.
///
/// HR runs the whole pipeline; interviewers are limited to viewing and
/// editing (stage-scoped) the candidates assigned to them.
const DEFAULT_GRANTS: &[(&str, &str)] = &[
    // HR
    ("hr", "candidate:view"),
    ("hr", "candidate:create"),
    ("hr", "candidate:export"),
    ("hr", "candidate:notify"),
    ("hr", "job:create"),
    ("hr", "job:edit"),
    ("hr", "job:delete"),
    ("hr", "resume:view_all"),
    ("hr", "user:manage"),
    // Interviewer
    ("interviewer", "candidate:view"),
    ("interviewer", "resume:view_all"),
];

/// Seed the `group_permission` table with the default grants.
pub async fn seed_group_permissions(db: &DatabaseConnection) -> Result<(), DbErr> {
    let mut grants_inserted = 0u32;
    for &(group, permission) in DEFAULT_GRANTS {
        let model = group_permission::ActiveModel {
            group_name: Set(group.to_string()),
            permission: Set(permission.to_string()),
        };

        let result = group_permission::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    group_permission::Column::GroupName,
                    group_permission::Column::Permission,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(_) => grants_inserted += 1,
            Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if grants_inserted > 0 {
        info!("Seeded {} new group-permission grants", grants_inserted);
    }

    Ok(())
}

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't create indexes for plain FK columns,
/// so we create the hot ones manually on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Row-scope filter for non-HR staff:
    // WHERE first_interviewer_user_id = ? OR second_interviewer_user_id = ?
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_candidate_first_interviewer")
        .table(candidate::Entity)
        .col(candidate::Column::FirstInterviewerUserId)
        .to_string(PostgresQueryBuilder);
    create_index(db, "idx_candidate_first_interviewer", stmt).await;

    let stmt = Index::create()
        .if_not_exists()
        .name("idx_candidate_second_interviewer")
        .table(candidate::Entity)
        .col(candidate::Column::SecondInterviewerUserId)
        .to_string(PostgresQueryBuilder);
    create_index(db, "idx_candidate_second_interviewer", stmt).await;

    // Phone correlation between candidates and resumes.
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_resume_phone")
        .table(resume::Entity)
        .col(resume::Column::Phone)
        .to_string(PostgresQueryBuilder);
    create_index(db, "idx_resume_phone", stmt).await;

    // "My resumes" listing.
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_resume_applicant")
        .table(resume::Entity)
        .col(resume::Column::ApplicantUserId)
        .to_string(PostgresQueryBuilder);
    create_index(db, "idx_resume_applicant", stmt).await;

    Ok(())
}

async fn create_index(db: &DatabaseConnection, name: &str, stmt: String) {
    match db.execute_unprepared(&stmt).await {
        Ok(_) => {
            info!("Ensured index {} exists", name);
        }
        Err(e) => {
            tracing::warn!("Failed to create index {}: {}", name, e);
        }
    }
}
