use actix_web::test::TestRequest;
use chrono::Utc;

use leavedesk::auth::jwt::generate_access_token;
use leavedesk::config::Config;
use leavedesk::db::{DbPool, init_test_db};
use leavedesk::model::department::DepartmentName;
use leavedesk::model::role::Role;

pub const TEST_SECRET: &str = "test-secret";

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".into(),
        jwt_secret: TEST_SECRET.into(),
        server_addr: "127.0.0.1:0".into(),
        access_token_ttl: 3600,
        rate_login_per_min: 6000,
        rate_protected_per_min: 6000,
        api_prefix: "/api".into(),
    }
}

pub fn token_for(user_id: i64, email: &str, role: Role) -> String {
    generate_access_token(user_id, email.to_string(), role, TEST_SECRET, 3600)
        .expect("token should sign")
}

/// Bearer-authenticated request skeleton. A peer address is set because the
/// rate limiter keys on it.
pub fn authed(req: TestRequest, token: &str) -> TestRequest {
    req.peer_addr("127.0.0.1:9999".parse().unwrap())
        .insert_header(("Authorization", format!("Bearer {token}")))
}

pub async fn seed_user(
    pool: &DbPool,
    name: &str,
    email: &str,
    department: DepartmentName,
    role: Role,
) -> i64 {
    let now = Utc::now();
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO users (name, email, password, department, role, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(email)
    .bind("not-a-real-hash")
    .bind(department)
    .bind(role)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .expect("user should insert");
    id
}

pub async fn seed_department(pool: &DbPool, name: DepartmentName, supervisor_id: i64) {
    sqlx::query("INSERT INTO departments (name, supervisor_id) VALUES (?, ?)")
        .bind(name)
        .bind(supervisor_id)
        .execute(pool)
        .await
        .expect("department should insert");
}

pub struct Scenario {
    pub pool: DbPool,
    pub employee_id: i64,
    pub employee_token: String,
    pub supervisor_id: i64,
    pub supervisor_token: String,
    pub admin_id: i64,
    pub admin_token: String,
}

/// One Marketing employee, their supervisor (assigned to the department) and
/// an admin.
pub async fn marketing_scenario() -> Scenario {
    let pool = init_test_db().await;

    let employee_id = seed_user(
        &pool,
        "Jane Doe",
        "jane@company.test",
        DepartmentName::Marketing,
        Role::User,
    )
    .await;
    let supervisor_id = seed_user(
        &pool,
        "Sam Lead",
        "sam@company.test",
        DepartmentName::Marketing,
        Role::Supervisor,
    )
    .await;
    let admin_id = seed_user(
        &pool,
        "Ada Boss",
        "ada@company.test",
        DepartmentName::Academic,
        Role::Admin,
    )
    .await;

    seed_department(&pool, DepartmentName::Marketing, supervisor_id).await;

    Scenario {
        employee_token: token_for(employee_id, "jane@company.test", Role::User),
        supervisor_token: token_for(supervisor_id, "sam@company.test", Role::Supervisor),
        admin_token: token_for(admin_id, "ada@company.test", Role::Admin),
        pool,
        employee_id,
        supervisor_id,
        admin_id,
    }
}

pub async fn taken_sick(pool: &DbPool, user_id: i64) -> i64 {
    sqlx::query_scalar("SELECT taken_sick FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("counter should read")
}

pub async fn request_status(pool: &DbPool, request_id: i64) -> String {
    sqlx::query_scalar("SELECT status FROM leave_requests WHERE id = ?")
        .bind(request_id)
        .fetch_one(pool)
        .await
        .expect("status should read")
}

pub async fn approval_count(pool: &DbPool, request_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM leave_approvals WHERE leave_request_id = ?")
        .bind(request_id)
        .fetch_one(pool)
        .await
        .expect("count should read")
}
