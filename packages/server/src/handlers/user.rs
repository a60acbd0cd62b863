use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, State};
use sea_orm::*;
use tracing::{info, instrument};

use crate::entity::{user, user_group};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::user::{SetGroupsRequest, UserListItem, validate_set_groups};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Users",
    operation_id = "listUsers",
    summary = "List users with their groups",
    description = "Requires `user:manage` permission.",
    responses(
        (status = 200, description = "Users", body = Vec<UserListItem>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_users(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserListItem>>, AppError> {
    auth_user.require_permission("user:manage")?;

    let users = user::Entity::find()
        .order_by_asc(user::Column::Id)
        .all(&state.db)
        .await?;

    let memberships = user_group::Entity::find().all(&state.db).await?;
    let mut groups_by_user: HashMap<i32, Vec<String>> = HashMap::new();
    for m in memberships {
        groups_by_user.entry(m.user_id).or_default().push(m.group_name);
    }

    let items = users
        .into_iter()
        .map(|u| {
            let mut groups = groups_by_user.remove(&u.id).unwrap_or_default();
            groups.sort();
            UserListItem {
                id: u.id,
                username: u.username,
                is_superuser: u.is_superuser,
                groups,
                created_at: u.created_at,
            }
        })
        .collect();

    Ok(Json(items))
}

#[utoipa::path(
    put,
    path = "/{id}/groups",
    tag = "Users",
    operation_id = "setUserGroups",
    summary = "Replace a user's group memberships",
    description = "Requires `user:manage` permission. Replaces the membership set wholesale; an empty list removes the user from every group. Takes effect on the user's next login, outstanding tokens keep the claims they were issued with.",
    params(("id" = i32, Path, description = "User ID")),
    request_body = SetGroupsRequest,
    responses(
        (status = 200, description = "Memberships replaced", body = UserListItem),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn set_user_groups(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<SetGroupsRequest>,
) -> Result<Json<UserListItem>, AppError> {
    auth_user.require_permission("user:manage")?;
    validate_set_groups(&payload)?;

    let txn = state.db.begin().await?;

    let target = user::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    user_group::Entity::delete_many()
        .filter(user_group::Column::UserId.eq(target.id))
        .exec(&txn)
        .await?;

    for group in &payload.groups {
        user_group::ActiveModel {
            user_id: Set(target.id),
            group_name: Set(group.clone()),
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    info!(
        "{} set groups of user {} to [{}]",
        auth_user.username,
        target.username,
        payload.groups.join(", ")
    );

    let mut groups = payload.groups;
    groups.sort();

    Ok(Json(UserListItem {
        id: target.id,
        username: target.username,
        is_superuser: target.is_superuser,
        groups,
        created_at: target.created_at,
    }))
}
