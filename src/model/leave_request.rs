use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use super::department::DepartmentName;
use super::leave_type::LeaveType;

/// Lifecycle of a request: `Pending` until a supervisor or admin decides,
/// then terminal.
#[derive(
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    sqlx::Type,
    ToSchema,
)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Declined,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveRequest {
    pub id: i64,
    pub employee_id: i64,
    /// Snapshot of the employee's department at submission time.
    pub department: DepartmentName,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub status: LeaveStatus,
    pub supervisor_id: Option<i64>,
    pub admin_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
