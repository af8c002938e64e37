use chrono::NaiveDate;

use crate::db::DbPool;
use crate::error::ApiError;
use crate::model::leave_type::LeaveType;
use crate::model::user::User;

/// Days remaining for one leave type: quota minus taken. Advisory only --
/// nothing reserves balance at submission time, so concurrent submissions
/// can both pass this check (see `apply_approval`).
pub fn remaining_balance(user: &User, leave_type: LeaveType) -> i64 {
    user.quota(leave_type) - user.taken(leave_type)
}

/// Inclusive day count of a leave span. A single-day leave counts as 1.
pub fn duration_in_days(start_date: NaiveDate, end_date: NaiveDate) -> i64 {
    (end_date - start_date).num_days() + 1
}

/// The one place leave counters change: adds the span's inclusive day count
/// to the employee's taken counter for the request's type and writes the row
/// back. Read-then-write, no optimistic version check.
pub async fn apply_approval(
    pool: &DbPool,
    employee_id: i64,
    leave_type: LeaveType,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<(), ApiError> {
    let employee = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(employee_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let updated = employee.taken(leave_type) + duration_in_days(start_date, end_date);

    // Column name comes from the closed LeaveType enum, never from input.
    let sql = format!(
        "UPDATE users SET {} = ?, updated_at = ? WHERE id = ?",
        leave_type.taken_column()
    );
    sqlx::query(&sql)
        .bind(updated)
        .bind(chrono::Utc::now())
        .bind(employee_id)
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{duration_in_days, remaining_balance};
    use crate::model::department::DepartmentName;
    use crate::model::leave_type::LeaveType;
    use crate::model::role::Role;
    use crate::model::user::User;
    use chrono::NaiveDate;

    fn user_with(quota_casual: i64, taken_casual: i64) -> User {
        User {
            id: 1,
            name: "Jane".into(),
            email: "jane@company.test".into(),
            password: String::new(),
            department: DepartmentName::Marketing,
            role: Role::User,
            quota_sick: 8,
            quota_annual: 15,
            quota_casual,
            quota_no_pay: 0,
            quota_liue: 5,
            taken_sick: 2,
            taken_annual: 0,
            taken_casual,
            taken_no_pay: 0,
            taken_liue: 0,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn remaining_balance_is_quota_minus_taken() {
        let user = user_with(10, 4);
        assert_eq!(remaining_balance(&user, LeaveType::Casual), 6);
        assert_eq!(remaining_balance(&user, LeaveType::Sick), 6);
        assert_eq!(remaining_balance(&user, LeaveType::NoPay), 0);
    }

    #[test]
    fn exhausted_quota_leaves_zero_balance() {
        let user = user_with(10, 10);
        assert_eq!(remaining_balance(&user, LeaveType::Casual), 0);
    }

    #[test]
    fn duration_counts_both_endpoints() {
        assert_eq!(duration_in_days(date(2024, 3, 1), date(2024, 3, 3)), 3);
        assert_eq!(duration_in_days(date(2024, 3, 1), date(2024, 3, 1)), 1);
        // Spans a month boundary.
        assert_eq!(duration_in_days(date(2024, 2, 28), date(2024, 3, 1)), 3);
    }
}
