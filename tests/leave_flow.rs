mod common;

use actix_web::web::Data;
use actix_web::{App, test};
use serde_json::{Value, json};

use common::{approval_count, authed, marketing_scenario, request_status, taken_sick};
use leavedesk::routes;

macro_rules! init_app {
    ($pool:expr) => {{
        let config = common::test_config();
        test::init_service(
            App::new()
                .app_data(Data::new($pool.clone()))
                .app_data(Data::new(config.clone()))
                .configure(|cfg| routes::configure(cfg, config.clone())),
        )
        .await
    }};
}

macro_rules! submit {
    ($app:expr, $token:expr, $body:expr) => {{
        let req = authed(test::TestRequest::post().uri("/api/leave/request"), $token)
            .set_json($body)
            .to_request();
        test::call_service(&$app, req).await
    }};
}

fn sick_request_body() -> Value {
    json!({
        "leave_type": "sick",
        "start_date": "2024-03-01",
        "end_date": "2024-03-03",
        "reason": "flu"
    })
}

#[actix_web::test]
async fn submitted_request_round_trips_through_fetch() {
    let s = marketing_scenario().await;
    let app = init_app!(s.pool);

    let resp = submit!(app, &s.employee_token, sick_request_body());
    assert_eq!(resp.status(), 201);
    let body: Value = test::read_body_json(resp).await;
    let request = &body["leaveRequest"];
    assert_eq!(request["status"], "Pending");
    assert_eq!(request["supervisor_id"], json!(s.supervisor_id));
    assert_eq!(request["department"], "Marketing");
    let id = request["id"].as_i64().unwrap();

    let req = authed(
        test::TestRequest::get().uri(&format!("/api/leave/leave-request/{id}")),
        &s.employee_token,
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let fetched: Value = test::read_body_json(resp).await;
    assert_eq!(fetched["employee_id"], json!(s.employee_id));
    assert_eq!(fetched["employee_name"], "Jane Doe");
    assert_eq!(fetched["leave_type"], "sick");
    assert_eq!(fetched["start_date"], "2024-03-01");
    assert_eq!(fetched["end_date"], "2024-03-03");
    assert_eq!(fetched["status"], "Pending");
    assert_eq!(fetched["supervisor_email"], "sam@company.test");
}

#[actix_web::test]
async fn backwards_date_range_is_rejected_before_persistence() {
    let s = marketing_scenario().await;
    let app = init_app!(s.pool);

    let resp = submit!(app, &s.employee_token, json!({
            "leave_type": "sick",
            "start_date": "2024-03-03",
            "end_date": "2024-03-01",
            "reason": "flu"
        }));
    assert_eq!(resp.status(), 400);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM leave_requests")
        .fetch_one(&s.pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[actix_web::test]
async fn blank_reason_is_rejected() {
    let s = marketing_scenario().await;
    let app = init_app!(s.pool);

    let resp = submit!(app, &s.employee_token, json!({
            "leave_type": "casual",
            "start_date": "2024-03-01",
            "end_date": "2024-03-01",
            "reason": "   "
        }));
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn exhausted_quota_blocks_submission_with_no_row_written() {
    let s = marketing_scenario().await;
    sqlx::query("UPDATE users SET quota_casual = 10, taken_casual = 10 WHERE id = ?")
        .bind(s.employee_id)
        .execute(&s.pool)
        .await
        .unwrap();
    let app = init_app!(s.pool);

    let resp = submit!(app, &s.employee_token, json!({
            "leave_type": "casual",
            "start_date": "2024-04-01",
            "end_date": "2024-04-02",
            "reason": "trip"
        }));
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Insufficient leave balance");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM leave_requests")
        .fetch_one(&s.pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[actix_web::test]
async fn unassigned_supervisor_cannot_decide_and_status_is_unchanged() {
    let s = marketing_scenario().await;
    let app = init_app!(s.pool);

    let resp = submit!(app, &s.employee_token, sick_request_body());
    let body: Value = test::read_body_json(resp).await;
    let id = body["leaveRequest"]["id"].as_i64().unwrap();

    // Supervisor of another department, not the one on the request.
    let other_id = common::seed_user(
        &s.pool,
        "Olive Other",
        "olive@company.test",
        leavedesk::model::department::DepartmentName::Academic,
        leavedesk::model::role::Role::Supervisor,
    )
    .await;
    let other_token = common::token_for(
        other_id,
        "olive@company.test",
        leavedesk::model::role::Role::Supervisor,
    );

    let req = authed(
        test::TestRequest::put().uri(&format!("/api/leave/approve/{id}")),
        &other_token,
    )
    .set_json(json!({"status": "Approved"}))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    assert_eq!(request_status(&s.pool, id).await, "Pending");
    assert_eq!(approval_count(&s.pool, id).await, 0);
}

#[actix_web::test]
async fn regular_user_cannot_decide() {
    let s = marketing_scenario().await;
    let app = init_app!(s.pool);

    let resp = submit!(app, &s.employee_token, sick_request_body());
    let body: Value = test::read_body_json(resp).await;
    let id = body["leaveRequest"]["id"].as_i64().unwrap();

    let req = authed(
        test::TestRequest::put().uri(&format!("/api/leave/approve/{id}")),
        &s.employee_token,
    )
    .set_json(json!({"status": "Approved"}))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);
    assert_eq!(request_status(&s.pool, id).await, "Pending");
}

#[actix_web::test]
async fn approving_a_three_day_sick_span_deducts_exactly_three_days() {
    let s = marketing_scenario().await;
    let app = init_app!(s.pool);

    let resp = submit!(app, &s.employee_token, sick_request_body());
    let body: Value = test::read_body_json(resp).await;
    let id = body["leaveRequest"]["id"].as_i64().unwrap();

    let req = authed(
        test::TestRequest::put().uri(&format!("/api/leave/approve/{id}")),
        &s.supervisor_token,
    )
    .set_json(json!({"status": "Approved", "remarks": "get well"}))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    assert_eq!(request_status(&s.pool, id).await, "Approved");
    assert_eq!(taken_sick(&s.pool, s.employee_id).await, 3);
    assert_eq!(approval_count(&s.pool, id).await, 1);

    let (approved_by, remarks): (i64, Option<String>) = sqlx::query_as(
        "SELECT approved_by, remarks FROM leave_approvals WHERE leave_request_id = ?",
    )
    .bind(id)
    .fetch_one(&s.pool)
    .await
    .unwrap();
    assert_eq!(approved_by, s.supervisor_id);
    assert_eq!(remarks.as_deref(), Some("get well"));
}

#[actix_web::test]
async fn admin_can_decide_requests_they_do_not_supervise() {
    let s = marketing_scenario().await;
    let app = init_app!(s.pool);

    let resp = submit!(app, &s.employee_token, sick_request_body());
    let body: Value = test::read_body_json(resp).await;
    let id = body["leaveRequest"]["id"].as_i64().unwrap();

    let req = authed(
        test::TestRequest::put().uri(&format!("/api/leave/approve/{id}")),
        &s.admin_token,
    )
    .set_json(json!({"status": "Approved"}))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(taken_sick(&s.pool, s.employee_id).await, 3);
}

#[actix_web::test]
async fn declining_records_an_audit_row_but_never_touches_counters() {
    let s = marketing_scenario().await;
    let app = init_app!(s.pool);

    let resp = submit!(app, &s.employee_token, sick_request_body());
    let body: Value = test::read_body_json(resp).await;
    let id = body["leaveRequest"]["id"].as_i64().unwrap();

    let req = authed(
        test::TestRequest::put().uri(&format!("/api/leave/decline/{id}")),
        &s.supervisor_token,
    )
    .set_json(json!({"remarks": "short staffed"}))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    assert_eq!(request_status(&s.pool, id).await, "Declined");
    assert_eq!(approval_count(&s.pool, id).await, 1);
    assert_eq!(taken_sick(&s.pool, s.employee_id).await, 0);
}

#[actix_web::test]
async fn deciding_a_missing_request_returns_not_found() {
    let s = marketing_scenario().await;
    let app = init_app!(s.pool);

    let req = authed(
        test::TestRequest::put().uri("/api/leave/approve/9999"),
        &s.supervisor_token,
    )
    .set_json(json!({"status": "Approved"}))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

/// Regression baseline, not desired behavior: nothing stops a second
/// decision on an already-terminal request. The second call overwrites the
/// status and appends a second audit row; the balance deduction from the
/// first approval stays applied.
#[actix_web::test]
async fn second_decision_on_a_terminal_request_is_not_guarded() {
    let s = marketing_scenario().await;
    let app = init_app!(s.pool);

    let resp = submit!(app, &s.employee_token, sick_request_body());
    let body: Value = test::read_body_json(resp).await;
    let id = body["leaveRequest"]["id"].as_i64().unwrap();

    let req = authed(
        test::TestRequest::put().uri(&format!("/api/leave/approve/{id}")),
        &s.supervisor_token,
    )
    .set_json(json!({"status": "Approved"}))
    .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    let req = authed(
        test::TestRequest::put().uri(&format!("/api/leave/approve/{id}")),
        &s.admin_token,
    )
    .set_json(json!({"status": "Declined"}))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    assert_eq!(request_status(&s.pool, id).await, "Declined");
    assert_eq!(approval_count(&s.pool, id).await, 2);
    // The approval's deduction is never compensated.
    assert_eq!(taken_sick(&s.pool, s.employee_id).await, 3);
}

#[actix_web::test]
async fn unauthenticated_calls_are_turned_away_at_the_scope() {
    let s = marketing_scenario().await;
    let app = init_app!(s.pool);

    let req = test::TestRequest::get()
        .uri("/api/leave/history")
        .peer_addr("127.0.0.1:9999".parse().unwrap())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}
