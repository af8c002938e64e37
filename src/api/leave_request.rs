use actix_web::{HttpResponse, Responder, web};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use tracing::info;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::leave::balance::remaining_balance;
use crate::model::department::{Department, DepartmentName};
use crate::model::leave_request::{LeaveRequest, LeaveStatus};
use crate::model::leave_type::LeaveType;
use crate::model::role::Role;
use crate::model::user::User;

#[derive(Deserialize, ToSchema)]
pub struct CreateLeaveRequest {
    #[schema(example = "casual")]
    pub leave_type: LeaveType,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-07", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Family visit")]
    pub reason: String,
}

/// Request row joined with employee and supervisor identity, the read shape
/// the dashboard consumes.
#[derive(Serialize, Deserialize, FromRow, ToSchema)]
pub struct LeaveRequestDetail {
    pub id: i64,
    pub employee_id: i64,
    pub employee_name: String,
    pub employee_email: String,
    pub department: DepartmentName,
    pub leave_type: LeaveType,
    #[schema(format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(format = "date", value_type = String)]
    pub end_date: NaiveDate,
    pub reason: String,
    pub status: LeaveStatus,
    pub supervisor_name: Option<String>,
    pub supervisor_email: Option<String>,
    #[schema(format = "date-time", value_type = String)]
    pub created_at: chrono::DateTime<Utc>,
}

const DETAIL_SQL: &str = r#"
    SELECT
        lr.id,
        lr.employee_id,
        e.name AS employee_name,
        e.email AS employee_email,
        lr.department,
        lr.leave_type,
        lr.start_date,
        lr.end_date,
        lr.reason,
        lr.status,
        s.name AS supervisor_name,
        s.email AS supervisor_email,
        lr.created_at
    FROM leave_requests lr
    JOIN users e ON e.id = lr.employee_id
    LEFT JOIN users s ON s.id = lr.supervisor_id
"#;

/// Submit a leave request
#[utoipa::path(
    post,
    path = "/api/leave/request",
    request_body = CreateLeaveRequest,
    responses(
        (status = 201, description = "Leave request submitted", body = Object, example = json!({
            "message": "Leave request submitted successfully"
        })),
        (status = 400, description = "Bad date range, empty reason or insufficient balance"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User or department not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn submit_leave_request(
    auth: AuthUser,
    pool: web::Data<DbPool>,
    payload: web::Json<CreateLeaveRequest>,
) -> Result<impl Responder, ApiError> {
    if payload.end_date < payload.start_date {
        return Err(ApiError::validation("End date cannot be before start date"));
    }

    if payload.reason.trim().is_empty() {
        return Err(ApiError::validation("Reason is required"));
    }

    let employee = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(auth.user_id)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    // Advisory check only: balance is not reserved here, it is deducted when
    // the request is approved.
    if remaining_balance(&employee, payload.leave_type) <= 0 {
        return Err(ApiError::validation("Insufficient leave balance"));
    }

    let department =
        sqlx::query_as::<_, Department>("SELECT * FROM departments WHERE name = ?")
            .bind(employee.department)
            .fetch_optional(pool.get_ref())
            .await?
            .ok_or_else(|| ApiError::not_found("Department not found"))?;

    let now = Utc::now();
    let request = sqlx::query_as::<_, LeaveRequest>(
        r#"
        INSERT INTO leave_requests
            (employee_id, department, leave_type, start_date, end_date, reason,
             status, supervisor_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(employee.id)
    .bind(employee.department)
    .bind(payload.leave_type)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(payload.reason.trim())
    .bind(LeaveStatus::Pending)
    .bind(department.supervisor_id)
    .bind(now)
    .bind(now)
    .fetch_one(pool.get_ref())
    .await?;

    info!(
        request_id = request.id,
        employee_id = employee.id,
        leave_type = %payload.leave_type,
        "leave request submitted"
    );

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Leave request submitted successfully",
        "leaveRequest": request
    })))
}

/// Fetch one leave request
#[utoipa::path(
    get,
    path = "/api/leave/leave-request/{id}",
    params(("id" = i64, Path, description = "Leave request ID")),
    responses(
        (status = 200, description = "Leave request found", body = LeaveRequestDetail),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Leave request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn get_leave_request(
    _auth: AuthUser,
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<impl Responder, ApiError> {
    let request_id = path.into_inner();

    let sql = format!("{DETAIL_SQL} WHERE lr.id = ?");
    let detail = sqlx::query_as::<_, LeaveRequestDetail>(&sql)
        .bind(request_id)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::not_found("Leave request not found"))?;

    Ok(HttpResponse::Ok().json(detail))
}

/// Role-scoped leave history
#[utoipa::path(
    get,
    path = "/api/leave/history",
    responses(
        (status = 200, description = "Requests visible to the caller", body = [LeaveRequestDetail]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Role has no history view"),
        (status = 404, description = "Supervisor has no department")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn leave_history(
    auth: AuthUser,
    pool: web::Data<DbPool>,
) -> Result<impl Responder, ApiError> {
    let rows = match auth.role {
        Role::User => {
            let sql = format!("{DETAIL_SQL} WHERE lr.employee_id = ? ORDER BY lr.created_at DESC");
            sqlx::query_as::<_, LeaveRequestDetail>(&sql)
                .bind(auth.user_id)
                .fetch_all(pool.get_ref())
                .await?
        }
        Role::Supervisor => {
            let department = sqlx::query_as::<_, Department>(
                "SELECT * FROM departments WHERE supervisor_id = ?",
            )
            .bind(auth.user_id)
            .fetch_optional(pool.get_ref())
            .await?
            .ok_or_else(|| ApiError::not_found("Department not found"))?;

            let sql = format!("{DETAIL_SQL} WHERE lr.department = ? ORDER BY lr.created_at DESC");
            sqlx::query_as::<_, LeaveRequestDetail>(&sql)
                .bind(department.name)
                .fetch_all(pool.get_ref())
                .await?
        }
        Role::Admin => {
            let sql = format!("{DETAIL_SQL} ORDER BY lr.created_at DESC");
            sqlx::query_as::<_, LeaveRequestDetail>(&sql)
                .fetch_all(pool.get_ref())
                .await?
        }
        Role::SuperAdmin => return Err(ApiError::forbidden("Forbidden")),
    };

    Ok(HttpResponse::Ok().json(rows))
}

fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Export approved leaves as CSV
#[utoipa::path(
    get,
    path = "/api/leave/export",
    responses(
        (status = 200, description = "CSV attachment of approved requests"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn export_approved_leaves(
    auth: AuthUser,
    pool: web::Data<DbPool>,
) -> Result<impl Responder, ApiError> {
    auth.require_admin_or_super_admin()?;

    let sql = format!("{DETAIL_SQL} WHERE lr.status = ? ORDER BY lr.created_at DESC");
    let rows = sqlx::query_as::<_, LeaveRequestDetail>(&sql)
        .bind(LeaveStatus::Approved)
        .fetch_all(pool.get_ref())
        .await?;

    let mut csv = String::from("id,employee,email,department,leave_type,start_date,end_date,status\n");
    for row in rows {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            row.id,
            csv_escape(&row.employee_name),
            csv_escape(&row.employee_email),
            row.department,
            row.leave_type,
            row.start_date,
            row.end_date,
            row.status
        ));
    }

    Ok(HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header((
            "Content-Disposition",
            "attachment; filename=approved_leaves.csv",
        ))
        .body(csv))
}
