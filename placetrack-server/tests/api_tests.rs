//! Integration tests for the placetrack HTTP API
//!
//! Each test drives the full router in-process against a fresh in-memory
//! database, covering:
//! - Batch CRUD round-trips and the domain count aggregation
//! - Bulk student import defaults
//! - Opportunity-student reassignment semantics
//! - Score create/update asymmetry
//! - Dashboard stats and graph shaping
//! - Trainer-timing assignment validation
//! - Team leader field validation

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Datelike;
use placetrack_server::{build_router, AppState};
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tower::util::ServiceExt; // for `oneshot`

/// Test helper: fresh app over a fresh in-memory database.
async fn setup() -> (Router, SqlitePool) {
    // One connection: each :memory: connection is its own database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Should create in-memory database");
    placetrack_common::db::create_schema(&pool)
        .await
        .expect("Should create schema");

    // Minimum bcrypt cost keeps user-creation tests fast
    let state = AppState::new(pool.clone(), 4);
    (build_router(state), pool)
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = extract_json(response.into_body()).await;
    (status, body)
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn health_endpoint() {
    let (app, _pool) = setup().await;
    let (status, body) = send(&app, get_request("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "placetrack-server");
    assert!(body["version"].is_string());
}

// ============================================================================
// Batches
// ============================================================================

fn batch_payload(batch_no: &str, domain: &str) -> Value {
    json!({
        "batch_no": batch_no,
        "batch_name": batch_no,
        "status": "Ongoing",
        "mode": "Online",
        "start_date": "2026-01-05",
        "end_date": "2026-06-30",
        "domain": domain,
        "trainer_name": "Asha",
        "total_count": 30,
    })
}

#[tokio::test]
async fn batch_create_roundtrip() {
    let (app, _pool) = setup().await;

    let (status, body) = send(
        &app,
        json_request("POST", "/batches/addBatch", batch_payload("FS01", "Full Stack")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Batch added successfully");
    let id = body["batchId"].as_i64().unwrap();

    let (status, body) = send(&app, get_request(&format!("/batches/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    let batch = &body["batch"];
    assert_eq!(batch["batch_no"], "FS01");
    assert_eq!(batch["status"], "Ongoing");
    assert_eq!(batch["mode"], "Online");
    assert_eq!(batch["start_date"], "2026-01-05");
    assert_eq!(batch["end_date"], "2026-06-30");
    assert_eq!(batch["domain"], "Full Stack");
    assert_eq!(batch["trainer_name"], "Asha");
    assert_eq!(batch["total_count"], 30);
    assert!(body["students"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn batch_not_found_and_delete() {
    let (app, _pool) = setup().await;

    let (status, _) = send(&app, get_request("/batches/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(
        &app,
        json_request("POST", "/batches/addBatch", batch_payload("DA01", "Data Analytics")),
    )
    .await;
    let id = body["batchId"].as_i64().unwrap();

    let delete = Request::builder()
        .method("DELETE")
        .uri(format!("/batches/{}", id))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, delete).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Batch deleted successfully");

    let (status, _) = send(&app, get_request(&format!("/batches/{}", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn total_batches_seeds_all_six_domains() {
    let (app, _pool) = setup().await;

    let (status, body) = send(&app, get_request("/batches/totalBatches")).await;
    assert_eq!(status, StatusCode::OK);

    let map = body["totalBatchesPerDomain"].as_object().unwrap();
    for key in ["fullstack", "data", "marketing", "sap", "banking", "devops"] {
        assert_eq!(map[key], 0, "missing zero seed for {}", key);
    }
}

// ============================================================================
// Bulk import
// ============================================================================

#[tokio::test]
async fn bulk_import_applies_defaults() {
    let (app, _pool) = setup().await;

    let payload = json!({
        "students": [
            { "booking_id": "BK100", "name": "Ravi", "batch_no": "FS01" },
            { "booking_id": "BK101", "name": "Meera", "batch_no": "FS01" },
            { "booking_id": "BK102", "name": "Arjun", "batch_no": "FS01" },
        ]
    });
    let (status, body) = send(&app, json_request("POST", "/students/bulkAdd/FS01", payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["insertedCount"], 3);

    let (status, body) = send(&app, get_request("/sme/students/BK100")).await;
    assert_eq!(status, StatusCode::OK);
    let student = &body["data"];
    assert_eq!(student["epic_status"], "");
    assert_eq!(student["status"], "on going");
    assert_eq!(student["certificate_received"], "N");
    assert_eq!(student["batch_name"], "FS01");
    assert_eq!(student["salary"], Value::Null);
}

#[tokio::test]
async fn bulk_import_rejects_empty_list() {
    let (app, _pool) = setup().await;

    let (status, _) = send(
        &app,
        json_request("POST", "/students/bulkAdd/FS01", json!({ "students": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        json_request("POST", "/students/bulkAdd/FS01", json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Student filters and placement
// ============================================================================

#[tokio::test]
async fn student_filters_require_parameters() {
    let (app, _pool) = setup().await;

    let (status, _) = send(&app, get_request("/students/")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, get_request("/students/filter")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn placement_route_accepts_only_two_statuses() {
    let (app, _pool) = setup().await;

    send(
        &app,
        json_request(
            "POST",
            "/students/bulkAdd/FS01",
            json!({ "students": [{ "booking_id": "BK100" }] }),
        ),
    )
    .await;

    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            "/students/placement/BK100",
            json!({ "status": "Placed" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            "/students/placement/BK100",
            json!({ "status": "Not Required" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Student marked as Not Required successfully");

    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            "/students/placement/BK999",
            json!({ "status": "Ineligible" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Dashboard stats
// ============================================================================

#[tokio::test]
async fn stats_scenario_counts_fullstack_batch() {
    let (app, _pool) = setup().await;

    let (_, body) = send(
        &app,
        json_request("POST", "/batches/addBatch", batch_payload("FS01", "Full Stack")),
    )
    .await;
    let batch_id = body["batchId"].as_i64().unwrap();

    let payload = json!({
        "students": [{
            "booking_id": "BK100",
            "batch_id": batch_id,
            "batch_no": "FS01",
            "domain": "Full Stack",
        }]
    });
    send(&app, json_request("POST", "/students/bulkAdd/FS01", payload)).await;

    let (status, body) = send(&app, get_request("/students/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalBatchesPerDomain"]["fullstack"], 1);
    assert_eq!(body["totalBatchesPerDomain"]["banking"], 0);
    assert_eq!(body["placedStudentsPerDomain"]["fullstack"], 0);
}

#[tokio::test]
async fn graphs_return_twelve_months_both_years() {
    let (app, pool) = setup().await;

    let year = chrono::Utc::now().year();
    sqlx::query(
        "INSERT INTO students (booking_id, placement, placed_month, salary) VALUES ('BK1', 'Placed', ?, 5.0)",
    )
    .bind(format!("{}-02-10", year))
    .execute(&pool)
    .await
    .unwrap();

    let (status, body) = send(&app, get_request("/students/graphs")).await;
    assert_eq!(status, StatusCode::OK);

    let current = body["currentData"].as_array().unwrap();
    let previous = body["previousData"].as_array().unwrap();
    assert_eq!(current.len(), 12);
    assert_eq!(previous.len(), 12);
    assert_eq!(current[0]["name"], "Jan");
    assert_eq!(current[11]["name"], "Dec");
    assert_eq!(current[1]["value"], 1);
    assert_eq!(current[1]["avgPackage"], 5.0);
    assert_eq!(previous[1]["value"], 0);
}

#[tokio::test]
async fn owner_dashboard_graphs_have_six_bars() {
    let (app, _pool) = setup().await;

    let (status, body) = send(&app, get_request("/owner/dashboard/graphs")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["placedData"].as_array().unwrap().len(), 6);
    assert_eq!(body["yetToPlaceData"].as_array().unwrap().len(), 6);
    assert_eq!(body["placedData"][0]["name"], "FSD");
}

// ============================================================================
// Opportunities
// ============================================================================

async fn seed_opportunity(app: &Router) -> i64 {
    let (_, body) = send(
        app,
        json_request(
            "POST",
            "/opportunities/addOpportunity",
            json!({
                "company_name": "Initech",
                "drive_date": "2026-09-01",
                "drive_role": "Analyst",
                "package": 4.2,
                "selected_batch": "FS01",
                "domain": "Full Stack",
            }),
        ),
    )
    .await;
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn reassignment_replaces_previous_students() {
    let (app, _pool) = setup().await;
    let opportunity_id = seed_opportunity(&app).await;

    // Students must exist for the junction join to surface them
    let payload = json!({
        "students": [
            { "booking_id": "BK1" },
            { "booking_id": "BK2" },
            { "booking_id": "BK3" },
        ]
    });
    send(&app, json_request("POST", "/students/bulkAdd/FS01", payload)).await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/opportunities/assignStudents",
            json!({ "opportunity_id": opportunity_id, "student_ids": ["BK1", "BK2"] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["insertedRows"], 2);

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            "/opportunities/assignStudents",
            json!({ "opportunity_id": opportunity_id, "student_ids": ["BK3"] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["insertedRows"], 1);

    let (status, body) = send(
        &app,
        get_request(&format!("/opportunities/opportunity/{}/students", opportunity_id)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["booking_id"], "BK3");
}

#[tokio::test]
async fn assignment_requires_student_ids() {
    let (app, _pool) = setup().await;
    let opportunity_id = seed_opportunity(&app).await;

    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            "/opportunities/assignStudents",
            json!({ "opportunity_id": opportunity_id, "student_ids": [] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/opportunities/assignStudents",
            json!({ "opportunity_id": opportunity_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Scores
// ============================================================================

#[tokio::test]
async fn score_create_then_update_and_asymmetry() {
    let (app, _pool) = setup().await;

    send(
        &app,
        json_request(
            "POST",
            "/students/bulkAdd/FS01",
            json!({ "students": [{ "booking_id": "BK100" }, { "booking_id": "BK200" }] }),
        ),
    )
    .await;

    // Update before any create: 404, the update path cannot insert
    let (status, _) = send(
        &app,
        json_request("PUT", "/scores/BK100", json!({ "mile1": 50 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Create (upsert) succeeds without an existing row
    let (status, body) = send(
        &app,
        json_request("POST", "/scores/BK100", json!({ "mile1": 70.0, "attendance": 90.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Score saved successfully for BK100");

    // Now the update path works
    let (status, body) = send(
        &app,
        json_request("PUT", "/scores/BK100", json!({ "mile1": 85.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["affectedRows"], 1);

    // Creating for an unknown student is a validation failure
    let (status, _) = send(
        &app,
        json_request("POST", "/scores/BK999", json!({ "mile1": 10.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, get_request("/scores/allScores")).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["mile1"], 85.0);
}

// ============================================================================
// Trainer-timing assignment
// ============================================================================

async fn seed_trainer(pool: &SqlitePool, name: &str) {
    sqlx::query("INSERT INTO trainers (name, is_active) VALUES (?, 1)")
        .bind(name)
        .execute(pool)
        .await
        .unwrap();
}

#[tokio::test]
async fn trainer_assignment_lifecycle() {
    let (app, pool) = setup().await;
    seed_trainer(&pool, "Asha").await;

    // Identical times: rejected even though both are validly formatted
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/sme/batches/FS01/trainer-assignments",
            json!({ "trainer_name": "Asha", "s_timing": "9:00 AM", "e_timing": "9:00 AM" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    // Malformed time
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/sme/batches/FS01/trainer-assignments",
            json!({ "trainer_name": "Asha", "s_timing": "13:00 PM", "e_timing": "2:00 PM" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unknown trainer
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/sme/batches/FS01/trainer-assignments",
            json!({ "trainer_name": "Nobody", "s_timing": "9:00 AM", "e_timing": "11:00 AM" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Two valid assignments accumulate
    for (s, e) in [("9:00 AM", "11:00 AM"), ("2:00 PM", "4:00 PM")] {
        let (status, _) = send(
            &app,
            json_request(
                "POST",
                "/sme/batches/FS01/trainer-assignments",
                json!({ "trainer_name": "Asha", "s_timing": s, "e_timing": e }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, get_request("/sme/batches/FS01/trainer-assignments")).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["trainer"], json!(["Asha", "Asha"]));
    assert_eq!(data["s_timing"], json!(["9:00 AM", "2:00 PM"]));
    assert_eq!(data["e_timing"], json!(["11:00 AM", "4:00 PM"]));
}

// ============================================================================
// SME dashboard
// ============================================================================

#[tokio::test]
async fn sme_dashboard_validates_domain() {
    let (app, _pool) = setup().await;

    let (status, _) = send(&app, get_request("/sme/dashboard")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, get_request("/sme/dashboard?domain=robotics")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, get_request("/sme/dashboard?domain=fullstack")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["totalStudents"], 0);
}

#[tokio::test]
async fn sme_student_update_is_partial() {
    let (app, _pool) = setup().await;

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/sme/students",
            json!({ "booking_id": "BK500", "name": "Divya", "placement": "Yet to Place" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            "/sme/students/BK500",
            json!({ "placement": "Placed", "company": "Initech" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, get_request("/sme/students/BK500")).await;
    assert_eq!(body["data"]["placement"], "Placed");
    assert_eq!(body["data"]["company"], "Initech");
    assert_eq!(body["data"]["name"], "Divya");

    // Empty update body is a validation failure
    let (status, _) = send(&app, json_request("PUT", "/sme/students/BK500", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Team leaders
// ============================================================================

#[tokio::test]
async fn team_leader_validation_and_conflict() {
    let (app, _pool) = setup().await;

    let (status, body) = send(&app, json_request("POST", "/teamLeader/", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
    assert!(body["details"]["name"].is_string());
    assert!(body["details"]["email"].is_string());
    assert!(body["details"]["phone"].is_string());

    let payload = json!({
        "name": "Priya",
        "email": "priya@example.com",
        "phone": "9876543210",
    });
    let (status, body) = send(&app, json_request("POST", "/teamLeader/", payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "Placement TL");
    let id = body["id"].as_str().unwrap().to_string();

    // Duplicate email
    let (status, body) = send(&app, json_request("POST", "/teamLeader/", payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email already exists");

    let delete = Request::builder()
        .method("DELETE")
        .uri(format!("/teamLeader/{}", id))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, delete).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Team Leader Priya deleted successfully");
}

// ============================================================================
// Users and lookup tables
// ============================================================================

#[tokio::test]
async fn user_creation_returns_row_without_password() {
    let (app, _pool) = setup().await;

    let (status, _) = send(
        &app,
        json_request("POST", "/users/create", json!({ "name": "Anil", "email": "anil@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/users/create",
            json!({ "name": "Anil", "email": "anil@example.com", "phone": "9876512340", "role": "spoc" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Anil");
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn lookup_tables_crud() {
    let (app, _pool) = setup().await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/domain/createDomain",
            json!({ "key": "fullstack", "label": "Full Stack Development" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().unwrap();

    let (status, body) = send(&app, get_request(&format!("/domain/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["key"], "fullstack");

    let (status, _) = send(
        &app,
        json_request("POST", "/epic/createEPIC", json!({ "key": "excellent" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        json_request("POST", "/batch_status/create", json!({ "label": "Ongoing" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["label"], "Ongoing");
    assert!(body["id"].is_number());

    let (status, body) = send(
        &app,
        json_request("POST", "/eligibilityStatus/create", json!({ "label": "Eligible" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["label"], "Eligible");

    // Eligibility delete is idempotent by design
    let delete = Request::builder()
        .method("DELETE")
        .uri("/eligibilityStatus/999")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, delete).await;
    assert_eq!(status, StatusCode::OK);
}

// ============================================================================
// Owner reports
// ============================================================================

#[tokio::test]
async fn owner_reports_filter_by_domain_prefix() {
    let (app, _pool) = setup().await;

    let payload = json!({
        "students": [
            { "booking_id": "BK1", "batch_no": "FS01", "placement": "Placed", "name": "Ravi" },
            { "booking_id": "BK2", "batch_no": "DA01", "placement": "Placed", "name": "Meera" },
        ]
    });
    send(&app, json_request("POST", "/students/bulkAdd/FS01", payload)).await;

    let (status, body) = send(&app, get_request("/owner/reports/placements?domain=fullstack")).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["booking_id"], "BK1");

    let (status, _) = send(&app, get_request("/owner/reports/placements?domain=robotics")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, get_request("/owner/reports/domains")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 6);

    let (status, body) = send(&app, get_request("/owner/reports/student/BK1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["batch"], "FS01");

    let (status, _) = send(&app, get_request("/owner/reports/student/BK99")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
