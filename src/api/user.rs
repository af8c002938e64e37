use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::model::user::User;

/// Replaces the whole quota map, all five types at once.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeaveQuota {
    #[schema(example = 8)]
    pub sick: i64,
    #[schema(example = 15)]
    pub annual: i64,
    #[schema(example = 10)]
    pub casual: i64,
    #[schema(example = 0)]
    pub no_pay: i64,
    #[schema(example = 5)]
    pub liue: i64,
}

/// List users
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All accounts", body = [User]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn list_users(auth: AuthUser, pool: web::Data<DbPool>) -> Result<impl Responder, ApiError> {
    auth.require_admin()?;

    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id")
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(users))
}

/// Fetch one user
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn get_user(
    _auth: AuthUser,
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<impl Responder, ApiError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(path.into_inner())
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(HttpResponse::Ok().json(user))
}

/// Replace a user's leave quota
#[utoipa::path(
    put,
    path = "/api/users/update-leave/quota/{id}",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateLeaveQuota,
    responses(
        (status = 200, description = "Quota updated", body = Object, example = json!({
            "message": "Leave quota updated successfully"
        })),
        (status = 400, description = "Negative quota value"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn update_leave_quota(
    auth: AuthUser,
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
    payload: web::Json<UpdateLeaveQuota>,
) -> Result<impl Responder, ApiError> {
    let user_id = path.into_inner();

    let quotas = [
        payload.sick,
        payload.annual,
        payload.casual,
        payload.no_pay,
        payload.liue,
    ];
    if quotas.iter().any(|q| *q < 0) {
        return Err(ApiError::validation("Quota values must be non-negative"));
    }

    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET quota_sick = ?, quota_annual = ?, quota_casual = ?,
            quota_no_pay = ?, quota_liue = ?, updated_at = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(payload.sick)
    .bind(payload.annual)
    .bind(payload.casual)
    .bind(payload.no_pay)
    .bind(payload.liue)
    .bind(Utc::now())
    .bind(user_id)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| ApiError::not_found("User not found"))?;

    info!(user_id, acting_user = auth.user_id, "leave quota replaced");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave quota updated successfully",
        "user": user
    })))
}
