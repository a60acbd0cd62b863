use anyhow::{Context, bail};
use sea_orm::ActiveValue::Set;
use sea_orm::{EntityTrait, SqlErr};

use server::entity::user;
use server::entity::user_group::{self, VALID_GROUPS};
use server::utils::hash;

pub async fn run(
    username: &str,
    password: &str,
    superuser: bool,
    groups: &[String],
    database_url: &str,
) -> anyhow::Result<()> {
    for group in groups {
        if !VALID_GROUPS.contains(&group.as_str()) {
            bail!(
                "unknown group '{group}'; valid groups: {}",
                VALID_GROUPS.join(", ")
            );
        }
    }

    let password_hash = hash::hash_password(password)
        .map_err(|e| anyhow::anyhow!("failed to hash password: {e}"))?;

    let db = server::database::init_db(database_url)
        .await
        .context("failed to connect to the database")?;

    let model = user::ActiveModel {
        username: Set(username.to_string()),
        password: Set(password_hash),
        is_superuser: Set(superuser),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let created = user::Entity::insert(model)
        .exec(&db)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                anyhow::anyhow!("username '{username}' is already taken")
            }
            _ => anyhow::Error::from(e),
        })?;
    let user_id = created.last_insert_id;

    for group in groups {
        user_group::Entity::insert(user_group::ActiveModel {
            user_id: Set(user_id),
            group_name: Set(group.clone()),
        })
        .exec_without_returning(&db)
        .await
        .with_context(|| format!("failed to add user to group '{group}'"))?;
    }

    if groups.is_empty() {
        println!("Created user '{username}' (id {user_id})");
    } else {
        println!(
            "Created user '{username}' (id {user_id}) in groups [{}]",
            groups.join(", ")
        );
    }
    Ok(())
}
