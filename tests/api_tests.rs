use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use clinicdesk::config::Config;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn spawn_app_with(single_user_mode: bool) -> Router {
    let path = std::env::temp_dir().join(format!("clinicdesk_api_{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", path.display());
    config.security.single_user_mode = single_user_mode;
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    let state = clinicdesk::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    clinicdesk::api::router(state)
}

async fn spawn_app() -> Router {
    spawn_app_with(true).await
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn login(app: &Router, username: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await
}

async fn create_student(app: &Router, name: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/students",
        None,
        Some(json!({ "name": name, "grade": "5A", "phone": "96890000000", "isSpecialCase": "1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"]["id"].as_i64().unwrap()
}

async fn create_nurse_token(app: &Router) -> String {
    let (status, _) = send(
        app,
        "POST",
        "/api/users",
        None,
        Some(json!({ "username": "nurse1", "password": "secret1", "role": "School Nurse" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = login(app, "nurse1", "secret1").await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_login_flow() {
    let app = spawn_app().await;

    let (status, body) = login(&app, "admin", "admin123").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["token"].is_string());
    assert_eq!(body["data"]["user"]["username"], "admin");
    assert_eq!(body["data"]["user"]["role"], "Admin");

    let (status, wrong_password) = login(&app, "admin", "nope").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown_user) = login(&app, "ghost", "nope").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password["error"], unknown_user["error"]);
    assert_eq!(unknown_user["success"], false);

    let (status, _) = login(&app, "", "x").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_lockout_after_repeated_failures() {
    let app = spawn_app().await;

    for _ in 0..5 {
        let (status, _) = login(&app, "admin", "wrong").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    let (status, body) = login(&app, "admin", "admin123").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("locked"));
}

#[tokio::test]
async fn test_session_required_without_single_user_mode() {
    let app = spawn_app_with(false).await;

    let (status, _) = send(&app, "GET", "/api/students", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/students", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, body) = login(&app, "admin", "admin123").await;
    let token = body["data"]["token"].as_str().unwrap();

    let (status, body) = send(&app, "GET", "/api/auth/me", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "admin");

    let (status, _) = send(&app, "GET", "/api/students", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_single_user_mode_runs_as_admin() {
    let app = spawn_app().await;

    let (status, body) = send(&app, "GET", "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["role"], "Admin");

    let (status, _) = send(&app, "GET", "/api/users", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_rejected_token_is_not_replaced_by_admin() {
    let app = spawn_app().await;

    let (status, _) = send(&app, "GET", "/api/auth/me", Some("garbage.token.value"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/users", Some("garbage.token.value"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_account_changes_apply_to_open_sessions() {
    let app = spawn_app_with(false).await;

    let (_, body) = login(&app, "admin", "admin123").await;
    let admin = body["data"]["token"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "POST",
        "/api/users",
        Some(&admin),
        Some(json!({ "username": "deputy", "password": "secret1", "role": "Admin" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = login(&app, "deputy", "secret1").await;
    let deputy = body["data"]["token"].as_str().unwrap().to_string();
    let deputy_id = body["data"]["user"]["id"].as_i64().unwrap();

    let (status, _) = send(&app, "GET", "/api/users", Some(&deputy), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/users/{deputy_id}"),
        Some(&admin),
        Some(json!({ "role": "School Nurse", "isActive": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/api/auth/me", Some(&deputy), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "School Nurse");
    let (status, _) = send(&app, "GET", "/api/users", Some(&deputy), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/users/{deputy_id}"),
        Some(&admin),
        Some(json!({ "role": "School Nurse", "isActive": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/api/auth/me", Some(&deputy), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(&app, "GET", "/api/visits", Some(&deputy), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = login(&app, "deputy", "secret1").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_role_gates() {
    let app = spawn_app().await;
    let nurse = create_nurse_token(&app).await;
    let student_id = create_student(&app, "Maryam Salim").await;

    let (status, body) = send(&app, "GET", "/api/users", Some(&nurse), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Forbidden");

    let (status, _) = send(&app, "DELETE", "/api/settings/reset-year", Some(&nurse), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", "/api/settings/backup", Some(&nurse), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        "POST",
        "/api/visits",
        Some(&nurse),
        Some(json!({ "studentId": student_id, "diagnosis": "Headache", "treatment": "Rest", "paracTab": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (status, body) = send(&app, "GET", "/api/visits", Some(&nurse), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["studentName"], "Maryam Salim");
    assert_eq!(body["data"][0]["createdBy"], "nurse1");
    assert_eq!(body["data"][0]["paracTab"], true);
}

#[tokio::test]
async fn test_visit_validation_and_referential_delete() {
    let app = spawn_app().await;
    let student_id = create_student(&app, "Omar Khalid").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/visits",
        None,
        Some(json!({ "studentId": student_id, "treatment": "Rest" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Diagnosis"));

    let (status, body) = send(
        &app,
        "POST",
        "/api/visits",
        None,
        Some(json!({ "studentId": 999, "diagnosis": "Cough", "treatment": "Syrup" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");

    let (status, _) = send(
        &app,
        "POST",
        "/api/visits",
        None,
        Some(json!({ "studentId": student_id.to_string(), "diagnosis": "Cough", "treatment": "Syrup", "paracSyrup": "1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "DELETE", &format!("/api/students/{student_id}"), None, None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = send(&app, "GET", "/api/students", None, None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["isSpecialCase"], true);

    let (status, _) = send(&app, "PUT", "/api/visits/999/whatsapp", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bulk_import_skips_existing_names() {
    let app = spawn_app().await;
    let roster = json!([{ "name": "A" }, { "name": "A" }, { "name": "B", "grade": "2", "phone": 968123 }]);

    let (status, body) = send(&app, "POST", "/api/students/bulk", None, Some(roster.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 2);

    let (_, body) = send(&app, "POST", "/api/students/bulk", None, Some(roster)).await;
    assert_eq!(body["data"]["count"], 0);

    let (_, body) = send(&app, "GET", "/api/students", None, None).await;
    let students = body["data"].as_array().unwrap();
    assert_eq!(students.len(), 2);
    assert_eq!(students[0]["grade"], "غير محدد");
    assert_eq!(students[1]["phone"], "968123");
}

#[tokio::test]
async fn test_csv_roster_import() {
    let app = spawn_app().await;

    let request = |csv: &'static str| {
        Request::builder()
            .method("POST")
            .uri("/api/students/import")
            .header("Content-Type", "text/csv")
            .body(Body::from(csv))
            .unwrap()
    };

    let response = app
        .clone()
        .oneshot(request("الاسم,الصف,رقم ولي الأمر\nأحمد,3,9999\nسارة,4,\n"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["data"]["count"], 2);

    let response = app
        .clone()
        .oneshot(request("grade,phone\n3,9999\n"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/students/export")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/csv")
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("أحمد,3,9999"));
}

#[tokio::test]
async fn test_backup_restore_and_reset() {
    let app = spawn_app().await;
    let student_id = create_student(&app, "Reem Nasser").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/referrals",
        None,
        Some(json!({ "studentId": student_id, "reason": "Vision", "destination": "Eye clinic", "age": 11 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, snapshot) = send(&app, "GET", "/api/settings/backup", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["students"][0]["Name"], "Reem Nasser");
    assert_eq!(snapshot["students"][0]["IsSpecialCase"], 1);
    assert_eq!(snapshot["referrals"][0]["Age"], "11");
    assert!(snapshot["clinicAppointments"].as_array().unwrap().is_empty());

    let (status, _) = send(&app, "DELETE", "/api/settings/reset-year", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, "GET", "/api/students", None, None).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, body) = send(&app, "POST", "/api/settings/restore", None, Some(snapshot)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, body) = send(&app, "GET", "/api/referrals", None, None).await;
    assert_eq!(body["data"][0]["studentId"], student_id);
    assert_eq!(body["data"][0]["studentName"], "Reem Nasser");

    let broken = json!({ "students": [], "visits": [{ "Id": 1, "StudentId": 404, "DateTime": "2025-01-01 08:00:00" }] });
    let (status, body) = send(&app, "POST", "/api/settings/restore", None, Some(broken)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);

    let (_, body) = send(&app, "GET", "/api/students", None, None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "POST", "/api/settings/restore", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, "GET", "/api/settings", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["schoolName"], "");
}

#[tokio::test]
async fn test_dashboard_and_audit() {
    let app = spawn_app().await;

    let (_, body) = send(&app, "GET", "/api/dashboard", None, None).await;
    assert_eq!(body["data"]["schoolName"], "المدرسة");
    assert_eq!(body["data"]["visitsToday"], 0);

    let (status, _) = send(
        &app,
        "PUT",
        "/api/settings",
        None,
        Some(json!({ "schoolName": "Al Noor School", "supervisorName": "Huda" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let student_id = create_student(&app, "Lina Saeed").await;
    send(
        &app,
        "POST",
        "/api/visits",
        None,
        Some(json!({ "studentId": student_id, "diagnosis": "Fever", "treatment": "Paracetamol" })),
    )
    .await;

    let (_, body) = send(&app, "GET", "/api/dashboard", None, None).await;
    assert_eq!(body["data"]["schoolName"], "Al Noor School");
    assert_eq!(body["data"]["visitsToday"], 1);
    assert_eq!(body["data"]["weeklyStats"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["weeklyStats"][0]["count"], 1);

    let (status, body) = send(&app, "GET", "/api/audit", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let actions: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["actionType"].as_str().unwrap())
        .collect();
    assert!(actions.contains(&"UPDATE_SETTINGS"));
    assert!(actions.contains(&"CREATE_STUDENT"));
    assert!(actions.contains(&"CREATE_VISIT"));
}

#[tokio::test]
async fn test_health_probes() {
    let app = spawn_app().await;

    let (status, body) = send(&app, "GET", "/api/system/health/live", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "alive");

    let (status, body) = send(&app, "GET", "/api/system/health/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["ready"], true);
}
