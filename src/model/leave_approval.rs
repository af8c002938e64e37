use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use super::leave_request::LeaveStatus;

/// A decision is always terminal, so `Pending` is not a valid outcome.
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
pub enum ApprovalStatus {
    Approved,
    Declined,
}

impl From<ApprovalStatus> for LeaveStatus {
    fn from(status: ApprovalStatus) -> Self {
        match status {
            ApprovalStatus::Approved => LeaveStatus::Approved,
            ApprovalStatus::Declined => LeaveStatus::Declined,
        }
    }
}

/// Append-only audit row, one per approve/decline action.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveApproval {
    pub id: i64,
    pub leave_request_id: i64,
    pub approved_by: i64,
    pub status: ApprovalStatus,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
}
