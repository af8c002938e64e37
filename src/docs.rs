use crate::api::department::{AssignSupervisor, CreateDepartment, DepartmentDetail};
use crate::api::leave_approval::{DecideLeave, DeclineLeave};
use crate::api::leave_request::{CreateLeaveRequest, LeaveRequestDetail};
use crate::api::user::UpdateLeaveQuota;
use crate::auth::handlers::LoginRequest;
use crate::model::department::{Department, DepartmentName};
use crate::model::leave_approval::{ApprovalStatus, LeaveApproval};
use crate::model::leave_request::{LeaveRequest, LeaveStatus};
use crate::model::leave_type::LeaveType;
use crate::model::role::Role;
use crate::model::user::User;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LeaveDesk API",
        version = "1.0.0",
        description = r#"
## Employee Leave Management

REST API behind the leave-management dashboard.

### Key Features
- **Leave Requests**
  - Submit, fetch, role-scoped history, CSV export
- **Approval Workflow**
  - Supervisors and admins approve or decline with an append-only audit
    trail; approved days are deducted from the employee's per-type balance
- **Departments**
  - Create, list, and assign supervisors
- **Leave Quotas**
  - Per-user, per-type allotments

### Security
All protected endpoints use **JWT Bearer authentication**. Decisions are
restricted to the request's assigned supervisor or an admin.
"#,
    ),
    paths(
        crate::auth::handlers::login,

        crate::api::leave_request::submit_leave_request,
        crate::api::leave_request::get_leave_request,
        crate::api::leave_request::leave_history,
        crate::api::leave_request::export_approved_leaves,

        crate::api::leave_approval::approve_leave_request,
        crate::api::leave_approval::decline_leave_request,

        crate::api::department::create_department,
        crate::api::department::list_departments,
        crate::api::department::assign_supervisor,

        crate::api::user::list_users,
        crate::api::user::get_user,
        crate::api::user::update_leave_quota
    ),
    components(
        schemas(
            LoginRequest,
            CreateLeaveRequest,
            LeaveRequestDetail,
            DecideLeave,
            DeclineLeave,
            CreateDepartment,
            AssignSupervisor,
            DepartmentDetail,
            UpdateLeaveQuota,
            User,
            Department,
            DepartmentName,
            LeaveRequest,
            LeaveApproval,
            LeaveType,
            LeaveStatus,
            ApprovalStatus,
            Role
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Token issuance"),
        (name = "Leave", description = "Leave request and approval APIs"),
        (name = "Department", description = "Department management APIs"),
        (name = "User", description = "Account and quota APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
