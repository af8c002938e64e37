use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::department::DepartmentName;
use super::leave_type::LeaveType;
use super::role::Role;

/// Full account row, including the per-type leave ledger.
///
/// The password hash is never serialized out of the API.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    #[serde(default)]
    pub password: String,
    pub department: DepartmentName,
    pub role: Role,
    pub quota_sick: i64,
    pub quota_annual: i64,
    pub quota_casual: i64,
    pub quota_no_pay: i64,
    pub quota_liue: i64,
    pub taken_sick: i64,
    pub taken_annual: i64,
    pub taken_casual: i64,
    pub taken_no_pay: i64,
    pub taken_liue: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn quota(&self, leave_type: LeaveType) -> i64 {
        match leave_type {
            LeaveType::Sick => self.quota_sick,
            LeaveType::Annual => self.quota_annual,
            LeaveType::Casual => self.quota_casual,
            LeaveType::NoPay => self.quota_no_pay,
            LeaveType::Liue => self.quota_liue,
        }
    }

    pub fn taken(&self, leave_type: LeaveType) -> i64 {
        match leave_type {
            LeaveType::Sick => self.taken_sick,
            LeaveType::Annual => self.taken_annual,
            LeaveType::Casual => self.taken_casual,
            LeaveType::NoPay => self.taken_no_pay,
            LeaveType::Liue => self.taken_liue,
        }
    }
}
