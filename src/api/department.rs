use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::model::department::{Department, DepartmentName};
use crate::model::role::Role;
use crate::model::user::User;

#[derive(Deserialize, ToSchema)]
pub struct CreateDepartment {
    #[schema(example = "Marketing")]
    pub name: DepartmentName,
}

#[derive(Deserialize, ToSchema)]
pub struct AssignSupervisor {
    #[schema(example = "Marketing")]
    pub department_name: DepartmentName,
    pub supervisor_id: i64,
}

#[derive(Serialize, FromRow, ToSchema)]
pub struct DepartmentDetail {
    pub id: i64,
    pub name: DepartmentName,
    pub supervisor_name: Option<String>,
    pub supervisor_email: Option<String>,
}

/// Create a department
#[utoipa::path(
    post,
    path = "/api/department",
    request_body = CreateDepartment,
    responses(
        (status = 201, description = "Department created", body = Department),
        (status = 400, description = "Department already exists"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Department"
)]
pub async fn create_department(
    auth: AuthUser,
    pool: web::Data<DbPool>,
    payload: web::Json<CreateDepartment>,
) -> Result<impl Responder, ApiError> {
    auth.require_admin_or_super_admin()?;

    let existing = sqlx::query_as::<_, Department>("SELECT * FROM departments WHERE name = ?")
        .bind(payload.name)
        .fetch_optional(pool.get_ref())
        .await?;

    if existing.is_some() {
        return Err(ApiError::validation("Department already exists"));
    }

    let department = sqlx::query_as::<_, Department>(
        "INSERT INTO departments (name) VALUES (?) RETURNING *",
    )
    .bind(payload.name)
    .fetch_one(pool.get_ref())
    .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Department created successfully",
        "department": department
    })))
}

/// List departments with their supervisors
#[utoipa::path(
    get,
    path = "/api/department",
    responses(
        (status = 200, description = "All departments", body = [DepartmentDetail]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Department"
)]
pub async fn list_departments(
    auth: AuthUser,
    pool: web::Data<DbPool>,
) -> Result<impl Responder, ApiError> {
    auth.require_admin_or_super_admin()?;

    let departments = sqlx::query_as::<_, DepartmentDetail>(
        r#"
        SELECT d.id, d.name, s.name AS supervisor_name, s.email AS supervisor_email
        FROM departments d
        LEFT JOIN users s ON s.id = d.supervisor_id
        ORDER BY d.name
        "#,
    )
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(departments))
}

/// Assign a supervisor to a department
#[utoipa::path(
    put,
    path = "/api/department/assign-supervisor",
    request_body = AssignSupervisor,
    responses(
        (status = 200, description = "Supervisor assigned", body = Object, example = json!({
            "message": "Supervisor assigned successfully"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Department or supervisor not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Department"
)]
pub async fn assign_supervisor(
    auth: AuthUser,
    pool: web::Data<DbPool>,
    payload: web::Json<AssignSupervisor>,
) -> Result<impl Responder, ApiError> {
    auth.require_admin_or_super_admin()?;

    let department = sqlx::query_as::<_, Department>("SELECT * FROM departments WHERE name = ?")
        .bind(payload.department_name)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::not_found("Department not found"))?;

    // The reference must resolve to a supervisor-role account.
    let supervisor = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(payload.supervisor_id)
        .fetch_optional(pool.get_ref())
        .await?
        .filter(|u| u.role == Role::Supervisor)
        .ok_or_else(|| ApiError::not_found("Supervisor not found"))?;

    let department = sqlx::query_as::<_, Department>(
        "UPDATE departments SET supervisor_id = ? WHERE id = ? RETURNING *",
    )
    .bind(supervisor.id)
    .bind(department.id)
    .fetch_one(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Supervisor assigned successfully",
        "department": department
    })))
}
