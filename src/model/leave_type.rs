use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// The closed set of leave categories a quota is tracked for.
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
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub enum LeaveType {
    Sick,
    Annual,
    Casual,
    NoPay,
    Liue,
}

impl LeaveType {
    /// Column holding the consumed-day counter for this type.
    pub fn taken_column(&self) -> &'static str {
        match self {
            LeaveType::Sick => "taken_sick",
            LeaveType::Annual => "taken_annual",
            LeaveType::Casual => "taken_casual",
            LeaveType::NoPay => "taken_no_pay",
            LeaveType::Liue => "taken_liue",
        }
    }
}
