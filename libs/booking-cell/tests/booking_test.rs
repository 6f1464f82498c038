use std::sync::Arc;

use assert_matches::assert_matches;
use axum::extract::Query;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use booking_cell::handlers;
use booking_cell::models::{
    BookDepartmentRequest, BookDoctorRequest, BookingError, ConfirmationQuery,
};
use booking_cell::services::BookingService;
use doctor_cell::services::DoctorDirectoryService;
use shared_utils::test_utils::{MockSheetResponses, TestConfig};

const DOCTORS_VALUES_PATH: &str = "/v4/spreadsheets/main-spreadsheet/values/Doctors";
const LEAVE_VALUES_PATH: &str = "/v4/spreadsheets/main-spreadsheet/values/Leave";
const MAIN_META_PATH: &str = "/v4/spreadsheets/main-spreadsheet";
const STATS_CELL_PATH: &str = "/v4/spreadsheets/main-spreadsheet/values/BookingStats!A2";

fn booking_service(mock_server: &MockServer) -> BookingService {
    let config = TestConfig::default()
        .with_sheets_url(&mock_server.uri())
        .to_app_config();
    let directory = Arc::new(DoctorDirectoryService::new(&config));
    BookingService::new(&config, directory)
}

fn direct_request(date: &str) -> BookDoctorRequest {
    BookDoctorRequest {
        sheet_url: "https://docs.google.com/spreadsheets/d/asha-sheet".to_string(),
        name: "Ravi".to_string(),
        age: "34".to_string(),
        gender: "Male".to_string(),
        phone_number: "9876543210".to_string(),
        date: date.to_string(),
    }
}

async fn mount_doctors_tab(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(DOCTORS_VALUES_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(MockSheetResponses::doctors_values()),
        )
        .mount(mock_server)
        .await;
}

async fn mount_main_meta(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(MAIN_META_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockSheetResponses::sheet_list(
            vec![("Doctors", 0), ("Leave", 1), ("BookingStats", 2)],
        )))
        .mount(mock_server)
        .await;
}

async fn mount_leave_tab(mock_server: &MockServer, rows: Vec<Vec<&str>>) {
    Mock::given(method("GET"))
        .and(path(LEAVE_VALUES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockSheetResponses::value_range(rows)))
        .mount(mock_server)
        .await;
}

async fn mount_stats_counter(mock_server: &MockServer, value: &str) {
    Mock::given(method("GET"))
        .and(path(STATS_CELL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockSheetResponses::value_range(
            vec![vec![value]],
        )))
        .mount(mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path(STATS_CELL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(mock_server)
        .await;
}

/// Date tab mocks for one doctor's spreadsheet: tab listing, a values read
/// and the booking append.
async fn mount_doctor_sheet(
    mock_server: &MockServer,
    spreadsheet_id: &str,
    tab: &str,
    data_rows: Vec<Vec<&str>>,
    expected_appends: u64,
) {
    let mut rows = vec![vec!["Token", "Name", "Age", "Gender", "Phone_Number", "Date"]];
    rows.extend(data_rows);

    Mock::given(method("GET"))
        .and(path(format!("/v4/spreadsheets/{}", spreadsheet_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockSheetResponses::sheet_list(
            vec![("Sheet1", 0), (tab, 7)],
        )))
        .mount(mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!(
            "/v4/spreadsheets/{}/values/{}",
            spreadsheet_id, tab
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockSheetResponses::value_range(rows)))
        .mount(mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!(
            "/v4/spreadsheets/{}/values/{}:append",
            spreadsheet_id, tab
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(expected_appends)
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_direct_booking_assigns_sequential_token() {
    let mock_server = MockServer::start().await;
    mount_doctors_tab(&mock_server).await;
    mount_main_meta(&mock_server).await;
    mount_leave_tab(
        &mock_server,
        vec![vec!["DoctorName", "Specialization", "Date", "Reason"]],
    )
    .await;
    mount_stats_counter(&mock_server, "3").await;
    // Two booked rows plus a blank row that must not consume a token.
    mount_doctor_sheet(
        &mock_server,
        "asha-sheet",
        "02-03-2026",
        vec![
            vec!["1", "Sunita", "40", "Female", "9000000001", "2026-03-02"],
            vec!["2", "Arun", "25", "Male", "9000000002", "2026-03-02"],
            vec!["", "", "", "", "", ""],
        ],
        1,
    )
    .await;

    let service = booking_service(&mock_server);
    let confirmation = service
        .book_direct(direct_request("2026-03-02"))
        .await
        .expect("booking should succeed");

    assert!(confirmation.success);
    assert_eq!(confirmation.token, 3);
    assert_eq!(confirmation.doctor, "Asha Rao");
    assert_eq!(confirmation.time, "09:00-11:00");
    assert!(confirmation.redirect.contains("token=3"));
}

#[tokio::test]
async fn test_direct_booking_rejects_wrong_weekday() {
    let mock_server = MockServer::start().await;
    mount_doctors_tab(&mock_server).await;

    let service = booking_service(&mock_server);
    // 2026-03-03 is a Tuesday; Asha Rao works Monday and Wednesday.
    let result = service.book_direct(direct_request("2026-03-03")).await;

    assert_matches!(
        result.unwrap_err(),
        BookingError::Unavailable(msg) if msg.contains("not available")
    );
}

#[tokio::test]
async fn test_direct_booking_rejects_leave_date() {
    let mock_server = MockServer::start().await;
    mount_doctors_tab(&mock_server).await;
    mount_main_meta(&mock_server).await;
    mount_leave_tab(
        &mock_server,
        vec![
            vec!["DoctorName", "Specialization", "Date", "Reason"],
            vec!["asha rao", "Cardiology", "2026-03-02", "Sick"],
        ],
    )
    .await;

    let service = booking_service(&mock_server);
    let result = service.book_direct(direct_request("2026-03-02")).await;

    assert_matches!(
        result.unwrap_err(),
        BookingError::Unavailable(msg) if msg.contains("on leave")
    );
}

#[tokio::test]
async fn test_direct_booking_rejects_unknown_sheet_url() {
    let mock_server = MockServer::start().await;
    mount_doctors_tab(&mock_server).await;

    let mut request = direct_request("2026-03-02");
    request.sheet_url = "https://docs.google.com/spreadsheets/d/unknown".to_string();

    let service = booking_service(&mock_server);
    let result = service.book_direct(request).await;

    assert_matches!(result.unwrap_err(), BookingError::NotFound(_));
}

#[tokio::test]
async fn test_direct_booking_rejects_bad_date() {
    let mock_server = MockServer::start().await;

    let service = booking_service(&mock_server);
    let result = service.book_direct(direct_request("02-03-2026")).await;

    assert_matches!(
        result.unwrap_err(),
        BookingError::ValidationError(msg) if msg == "Invalid date format"
    );
}

#[tokio::test]
async fn test_department_booking_picks_least_loaded() {
    let mock_server = MockServer::start().await;
    mount_doctors_tab(&mock_server).await;
    mount_main_meta(&mock_server).await;
    mount_leave_tab(
        &mock_server,
        vec![vec!["DoctorName", "Specialization", "Date", "Reason"]],
    )
    .await;
    mount_stats_counter(&mock_server, "0").await;
    // Both cardiologists work Mondays; Asha has two bookings, Vikram one.
    mount_doctor_sheet(
        &mock_server,
        "asha-sheet",
        "02-03-2026",
        vec![
            vec!["1", "Sunita", "40", "Female", "9000000001", "2026-03-02"],
            vec!["2", "Arun", "25", "Male", "9000000002", "2026-03-02"],
        ],
        0,
    )
    .await;
    mount_doctor_sheet(
        &mock_server,
        "vikram-sheet",
        "02-03-2026",
        vec![vec!["1", "Leela", "51", "Female", "9000000003", "2026-03-02"]],
        1,
    )
    .await;

    let service = booking_service(&mock_server);
    let confirmation = service
        .book_department(BookDepartmentRequest {
            specialization: "Cardiology".to_string(),
            name: "Ravi".to_string(),
            age: "34".to_string(),
            gender: "Male".to_string(),
            phone_number: "9876543210".to_string(),
            date: "2026-03-02".to_string(),
            doctor_sheet_url: None,
        })
        .await
        .expect("department booking should succeed");

    assert_eq!(confirmation.doctor, "Vikram Shah");
    assert_eq!(confirmation.token, 2);
    assert_eq!(confirmation.time, "14:00-16:00");
}

#[tokio::test]
async fn test_department_booking_no_candidates() {
    let mock_server = MockServer::start().await;
    mount_doctors_tab(&mock_server).await;

    let service = booking_service(&mock_server);
    let result = service
        .book_department(BookDepartmentRequest {
            specialization: "Dermatology".to_string(),
            name: "Ravi".to_string(),
            age: "34".to_string(),
            gender: "Male".to_string(),
            phone_number: "9876543210".to_string(),
            date: "2026-03-02".to_string(),
            doctor_sheet_url: None,
        })
        .await;

    assert_matches!(
        result.unwrap_err(),
        BookingError::Unavailable(msg) if msg.contains("No doctors available")
    );
}

#[tokio::test]
async fn test_cleanup_threshold_resets_counter_and_prunes_tabs() {
    let mock_server = MockServer::start().await;
    mount_doctors_tab(&mock_server).await;
    Mock::given(method("GET"))
        .and(path(MAIN_META_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockSheetResponses::sheet_list(
            vec![("Doctors", 0), ("Leave", 1), ("BookingStats", 2)],
        )))
        .mount(&mock_server)
        .await;
    mount_leave_tab(
        &mock_server,
        vec![vec!["DoctorName", "Specialization", "Date", "Reason"]],
    )
    .await;

    // Counter at 9: this booking is the tenth, so the counter resets and
    // the two oldest of the six date tabs get deleted.
    Mock::given(method("GET"))
        .and(path(STATS_CELL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockSheetResponses::value_range(
            vec![vec!["9"]],
        )))
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path(STATS_CELL_PATH))
        .and(body_partial_json(serde_json::json!({ "values": [["0"]] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/asha-sheet"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockSheetResponses::sheet_list(
            vec![
                ("Sheet1", 0),
                ("25-02-2026", 1),
                ("26-02-2026", 2),
                ("27-02-2026", 3),
                ("28-02-2026", 4),
                ("01-03-2026", 5),
                ("02-03-2026", 6),
            ],
        )))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/asha-sheet/values/02-03-2026"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockSheetResponses::value_range(
            vec![vec!["Token", "Name", "Age", "Gender", "Phone_Number", "Date"]],
        )))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/asha-sheet/values/02-03-2026:append"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/asha-sheet:batchUpdate"))
        .and(body_partial_json(serde_json::json!({
            "requests": [{ "deleteSheet": { "sheetId": 1 } }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/asha-sheet:batchUpdate"))
        .and(body_partial_json(serde_json::json!({
            "requests": [{ "deleteSheet": { "sheetId": 2 } }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = booking_service(&mock_server);
    let confirmation = service
        .book_direct(direct_request("2026-03-02"))
        .await
        .expect("booking should succeed");

    assert_eq!(confirmation.token, 1);
}

#[tokio::test]
async fn test_cleanup_failure_does_not_fail_booking() {
    let mock_server = MockServer::start().await;
    mount_doctors_tab(&mock_server).await;
    mount_main_meta(&mock_server).await;
    mount_leave_tab(
        &mock_server,
        vec![vec!["DoctorName", "Specialization", "Date", "Reason"]],
    )
    .await;
    mount_doctor_sheet(
        &mock_server,
        "asha-sheet",
        "02-03-2026",
        vec![],
        1,
    )
    .await;
    // Counter cell read blows up; the booking must still come back.
    Mock::given(method("GET"))
        .and(path(STATS_CELL_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend error"))
        .mount(&mock_server)
        .await;

    let service = booking_service(&mock_server);
    let confirmation = service
        .book_direct(direct_request("2026-03-02"))
        .await
        .expect("booking should succeed despite cleanup failure");

    assert_eq!(confirmation.token, 1);
}

#[tokio::test]
async fn test_confirmation_endpoint_echoes_query() {
    let axum::Json(body) = handlers::booking_confirmation(Query(ConfirmationQuery {
        token: "3".to_string(),
        doctor: "Asha Rao".to_string(),
        specialization: "Cardiology".to_string(),
        date: "2026-03-02".to_string(),
        time: "09:00-11:00".to_string(),
        name: "Ravi".to_string(),
        age: "34".to_string(),
        phone: "9876543210".to_string(),
    }))
    .await;

    assert_eq!(body["success"], true);
    assert_eq!(body["confirmation"]["token"], "3");
    assert_eq!(body["confirmation"]["doctor"], "Asha Rao");
}
