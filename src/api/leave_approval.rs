use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::leave::balance::apply_approval;
use crate::model::leave_approval::ApprovalStatus;
use crate::model::leave_request::{LeaveRequest, LeaveStatus};
use crate::model::role::Role;

#[derive(Deserialize, ToSchema)]
pub struct DecideLeave {
    #[schema(example = "Approved")]
    pub status: ApprovalStatus,
    #[schema(example = "Enjoy the break")]
    pub remarks: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct DeclineLeave {
    pub remarks: Option<String>,
}

/// Shared decision path for the approve and decline endpoints.
///
/// Write order is fixed: request row first, then the audit row, then (only on
/// approval) the employee's taken counter. The three writes are separate
/// statements with no transaction or rollback across them, matching the
/// observed workflow. A request already in a terminal state is not guarded
/// against a second decision.
async fn decide(
    pool: &DbPool,
    acting: &AuthUser,
    request_id: i64,
    decision: ApprovalStatus,
    remarks: Option<&str>,
) -> Result<LeaveRequest, ApiError> {
    let request = sqlx::query_as::<_, LeaveRequest>("SELECT * FROM leave_requests WHERE id = ?")
        .bind(request_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Leave request not found"))?;

    // Only the assigned supervisor, or any admin, may decide.
    if request.supervisor_id != Some(acting.user_id) && acting.role != Role::Admin {
        return Err(ApiError::forbidden(
            "You are not authorized to decide this request",
        ));
    }

    let now = Utc::now();
    let updated = sqlx::query_as::<_, LeaveRequest>(
        "UPDATE leave_requests SET status = ?, updated_at = ? WHERE id = ? RETURNING *",
    )
    .bind(LeaveStatus::from(decision))
    .bind(now)
    .bind(request_id)
    .fetch_one(pool)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO leave_approvals (leave_request_id, approved_by, status, remarks, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(request_id)
    .bind(acting.user_id)
    .bind(decision)
    .bind(remarks)
    .bind(now)
    .execute(pool)
    .await?;

    if decision == ApprovalStatus::Approved {
        apply_approval(
            pool,
            updated.employee_id,
            updated.leave_type,
            updated.start_date,
            updated.end_date,
        )
        .await?;
    }

    info!(
        request_id,
        acting_user = acting.user_id,
        decision = %decision,
        "leave request decided"
    );

    Ok(updated)
}

/// Approve or decline a leave request
#[utoipa::path(
    put,
    path = "/api/leave/approve/{id}",
    params(("id" = i64, Path, description = "Leave request ID")),
    request_body = DecideLeave,
    responses(
        (status = 200, description = "Decision recorded", body = Object, example = json!({
            "message": "Leave request updated successfully"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is neither the assigned supervisor nor an admin"),
        (status = 404, description = "Leave request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn approve_leave_request(
    auth: AuthUser,
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
    payload: web::Json<DecideLeave>,
) -> Result<impl Responder, ApiError> {
    auth.require_supervisor_or_admin()?;

    let request = decide(
        pool.get_ref(),
        &auth,
        path.into_inner(),
        payload.status,
        payload.remarks.as_deref(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave request updated successfully",
        "leaveRequest": request
    })))
}

/// Force-decline a leave request
#[utoipa::path(
    put,
    path = "/api/leave/decline/{id}",
    params(("id" = i64, Path, description = "Leave request ID")),
    request_body = DeclineLeave,
    responses(
        (status = 200, description = "Request declined", body = Object, example = json!({
            "message": "Leave request declined successfully"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is neither the assigned supervisor nor an admin"),
        (status = 404, description = "Leave request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn decline_leave_request(
    auth: AuthUser,
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
    payload: web::Json<DeclineLeave>,
) -> Result<impl Responder, ApiError> {
    auth.require_supervisor_or_admin()?;

    let request = decide(
        pool.get_ref(),
        &auth,
        path.into_inner(),
        ApprovalStatus::Declined,
        payload.remarks.as_deref(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave request declined successfully",
        "leaveRequest": request
    })))
}
