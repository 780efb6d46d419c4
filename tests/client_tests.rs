//! Integration tests for the FrappeClient and the site-backed repositories
//! using mockito for HTTP mocking.

use chrono::NaiveDate;
use crm_followup_server::client::{
    AsyncFrappeClient, AsyncFrappeClientImpl, Filter, ListQuery, PermissionType,
};
use crm_followup_server::error::CrmError;
use crm_followup_server::models::{CallLog, CallStatus};
use crm_followup_server::repositories::{
    CallLogRepository, ContactRepository, DealRepository, FrappeCallLogRepository,
    FrappeContactRepository, FrappeDealRepository, FrappeHolidayRepository, HolidayRepository,
};
use crm_followup_server::FrappeClient;
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use std::sync::Arc;

const AUTH: &str = "token test-key:test-secret";

fn client(server: &ServerGuard) -> FrappeClient {
    FrappeClient::with_base_url(
        server.url(),
        "test-key".to_string(),
        "test-secret".to_string(),
    )
}

fn async_client(server: &ServerGuard) -> Arc<dyn AsyncFrappeClient> {
    Arc::new(AsyncFrappeClientImpl::new(client(server)))
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn test_get_list_sends_query_and_unwraps_data() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/api/resource/Contact")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("filters".into(), r#"[["email_id","is","set"]]"#.into()),
            Matcher::UrlEncoded("fields".into(), r#"["name","email_id"]"#.into()),
            Matcher::UrlEncoded("limit_page_length".into(), "20".into()),
        ]))
        .match_header("authorization", AUTH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data": [{"name": "jane", "email_id": "jane@example.com"}]}"#)
        .create();

    let query = ListQuery::new()
        .filter(Filter::is_set("email_id"))
        .fields(&["name", "email_id"])
        .limit(20);
    let client = client(&server);
    let rows = client.get_list("Contact", &query).unwrap();

    mock.assert();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "jane");
    assert_eq!(client.metrics().http_requests_total(), 1);
    assert_eq!(client.metrics().documents_read_total(), 1);
}

#[test]
fn test_get_doc_not_found() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/api/resource/Contact/ghost")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"exc_type": "DoesNotExistError", "exception": "Contact ghost not found"}"#)
        .create();

    let client = client(&server);
    let result = client.get_doc("Contact", "ghost");

    mock.assert();
    match result {
        Err(CrmError::NotFound(message)) => assert_eq!(message, "Contact ghost not found"),
        other => panic!("Expected NotFound, got {:?}", other),
    }
    assert!(!client.exists("Contact", "ghost").unwrap());
    assert_eq!(client.metrics().http_errors_total(), 2);
}

#[test]
fn test_insert_posts_json() {
    let mut server = Server::new();

    let mock = server
        .mock("POST", "/api/resource/Contact")
        .match_header("authorization", AUTH)
        .match_body(Matcher::PartialJson(json!({"first_name": "Sam"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data": {"name": "Sam", "first_name": "Sam"}}"#)
        .create();

    let client = client(&server);
    let saved = client
        .insert("Contact", &json!({"first_name": "Sam"}))
        .unwrap();

    mock.assert();
    assert_eq!(saved["name"], "Sam");
    assert_eq!(client.metrics().documents_written_total(), 1);
}

#[test]
fn test_update_puts_to_document() {
    let mut server = Server::new();

    let mock = server
        .mock("PUT", "/api/resource/Contact/jane")
        .match_body(Matcher::PartialJson(json!({"email_id": "new@example.com"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data": {"name": "jane", "email_id": "new@example.com"}}"#)
        .create();

    let saved = client(&server)
        .update("Contact", "jane", &json!({"email_id": "new@example.com"}))
        .unwrap();

    mock.assert();
    assert_eq!(saved["email_id"], "new@example.com");
}

#[test]
fn test_has_permission() {
    let mut server = Server::new();

    let allowed = server
        .mock("GET", "/api/method/frappe.client.has_permission")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("doctype".into(), "Contact".into()),
            Matcher::UrlEncoded("docname".into(), "jane".into()),
            Matcher::UrlEncoded("perm_type".into(), "write".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": {"has_permission": true}}"#)
        .create();

    let client = client(&server);
    assert!(client
        .has_permission("Contact", "jane", PermissionType::Write)
        .unwrap());
    allowed.assert();
}

#[test]
fn test_unauthorized_error() {
    let mut server = Server::new();

    let _mock = server
        .mock("GET", "/api/resource/Contact/jane")
        .with_status(401)
        .with_body(r#"{"exc_type": "AuthenticationError"}"#)
        .create();

    let result = client(&server).get_doc("Contact", "jane");
    assert!(matches!(result, Err(CrmError::Unauthorized)));
}

#[test]
fn test_permission_error() {
    let mut server = Server::new();

    let _mock = server
        .mock("PUT", "/api/resource/Contact/jane")
        .with_status(403)
        .with_body(r#"{"exc_type": "PermissionError", "exception": "Not permitted"}"#)
        .create();

    let result = client(&server).update("Contact", "jane", &json!({}));
    match result {
        Err(CrmError::PermissionDenied(message)) => assert_eq!(message, "Not permitted"),
        other => panic!("Expected PermissionDenied, got {:?}", other),
    }
}

#[test]
fn test_generic_api_error() {
    let mut server = Server::new();

    let _mock = server
        .mock("POST", "/api/resource/Contact")
        .with_status(417)
        .with_body(r#"{"exc_type": "MandatoryError", "message": "first_name is required"}"#)
        .create();

    let result = client(&server).insert("Contact", &json!({}));
    match result {
        Err(CrmError::ApiError { status, message }) => {
            assert_eq!(status, 417);
            assert_eq!(message, "first_name is required");
        }
        other => panic!("Expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_contact_repository_finds_due_contacts_with_or_filters() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/api/resource/Contact")
        .match_query(Matcher::UrlEncoded(
            "or_filters".into(),
            r#"[["custom_creation_date","=","2024-01-09"],["custom_first_date","=","2024-01-09"],["custom_second_date","=","2024-01-09"]]"#.into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"data": [{"name": "jane", "first_name": "Jane", "email_id": "jane@example.com",
                "custom_creation_date": "2024-01-05", "custom_first_date": "2024-01-09",
                "custom_second_date": "2024-01-15"}]}"#,
        )
        .create_async()
        .await;

    let repo = FrappeContactRepository::new(async_client(&server));
    let contacts = repo.find_due_on(d(2024, 1, 9)).await.unwrap();

    mock.assert_async().await;
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].first_follow_up_date, Some(d(2024, 1, 9)));
}

#[tokio::test]
async fn test_contact_repository_not_found_message() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/api/resource/Contact/ghost")
        .with_status(404)
        .with_body(r#"{"exc_type": "DoesNotExistError"}"#)
        .create_async()
        .await;

    let repo = FrappeContactRepository::new(async_client(&server));
    let err = repo.get("ghost").await.unwrap_err();
    assert_eq!(err.to_string(), "Contact not found");
}

#[tokio::test]
async fn test_call_log_repository_checks_day_window() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", Matcher::Regex(r"^/api/resource/CRM(%20| )Call(%20| )Log$".into()))
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded(
                "filters".into(),
                r#"[["reference_doctype","=","Contact"],["reference_docname","=","jane"],["creation","between",["2024-01-09 00:00:00","2024-01-09 23:59:59"]]]"#.into(),
            ),
            Matcher::UrlEncoded("limit_page_length".into(), "1".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data": [{"name": "CL-0001"}]}"#)
        .create_async()
        .await;

    let repo = FrappeCallLogRepository::new(async_client(&server));
    let start = d(2024, 1, 9).and_hms_opt(0, 0, 0).unwrap();
    let end = d(2024, 1, 9).and_hms_opt(23, 59, 59).unwrap();
    assert!(repo
        .exists_for_contact_between("jane", start, end)
        .await
        .unwrap());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_call_log_repository_insert() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", Matcher::Regex(r"^/api/resource/CRM(%20| )Call(%20| )Log$".into()))
        .match_body(Matcher::PartialJson(json!({
            "type": "Outgoing",
            "status": "Completed",
            "reference_doctype": "Contact",
            "reference_docname": "jane"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"data": {"name": "CL-0002", "id": "a1b2c3d4e5f6", "caller": "agent", "to": "jane",
                "type": "Outgoing", "status": "Completed",
                "start_time": "2024-01-09 10:00:00", "end_time": "2024-01-09 10:00:00",
                "reference_doctype": "Contact", "reference_docname": "jane",
                "creation": "2024-01-09 10:00:01.123456"}}"#,
        )
        .create_async()
        .await;

    let at = d(2024, 1, 9).and_hms_opt(10, 0, 0).unwrap();
    let log = CallLog::outgoing_to_contact("a1b2c3d4e5f6", "agent", "jane", CallStatus::Completed, at);
    let repo = FrappeCallLogRepository::new(async_client(&server));
    let saved = repo.insert(&log).await.unwrap();

    mock.assert_async().await;
    assert_eq!(saved.name.as_deref(), Some("CL-0002"));
}

#[tokio::test]
async fn test_deal_repository_dedupes_linked_deals() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", Matcher::Regex(r"^/api/resource/CRM(%20| )Deal$".into()))
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"data": [
                {"name": "CRM-DEAL-0001", "status": "Qualification"},
                {"name": "CRM-DEAL-0001", "status": "Qualification"},
                {"name": "CRM-DEAL-0002", "status": "Won"}
            ]}"#,
        )
        .create_async()
        .await;

    let repo = FrappeDealRepository::new(async_client(&server));
    let deals = repo.linked_to_contact("jane").await.unwrap();

    let names: Vec<&str> = deals.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["CRM-DEAL-0001", "CRM-DEAL-0002"]);
}

#[tokio::test]
async fn test_deal_repository_primary_deals_rechecks_links() {
    let mut server = Server::new_async().await;

    let _list = server
        .mock("GET", Matcher::Regex(r"^/api/resource/CRM(%20| )Deal$".into()))
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data": [{"name": "CRM-DEAL-0001"}, {"name": "CRM-DEAL-0002"}]}"#)
        .create_async()
        .await;
    let _primary = server
        .mock("GET", Matcher::Regex(r"^/api/resource/CRM(%20| )Deal/CRM-DEAL-0001$".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"data": {"name": "CRM-DEAL-0001", "email": "old@example.com",
                "contacts": [{"name": "row-abc", "contact": "jane", "is_primary": 1, "full_name": "Jane Doe"}]}}"#,
        )
        .create_async()
        .await;
    let _moved = server
        .mock("GET", Matcher::Regex(r"^/api/resource/CRM(%20| )Deal/CRM-DEAL-0002$".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"data": {"name": "CRM-DEAL-0002",
                "contacts": [{"name": "row-def", "contact": "jane", "is_primary": 0}]}}"#,
        )
        .create_async()
        .await;

    let repo = FrappeDealRepository::new(async_client(&server));
    let deals = repo.with_primary_contact("jane").await.unwrap();

    assert_eq!(deals.len(), 1);
    assert_eq!(deals[0].name, "CRM-DEAL-0001");
}

#[tokio::test]
async fn test_deal_contact_details_sent_as_partial_update() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("PUT", Matcher::Regex(r"^/api/resource/CRM(%20| )Deal/CRM-DEAL-0001$".into()))
        .match_header("authorization", AUTH)
        .match_body(Matcher::Json(json!({
            "email": "new@example.com",
            "mobile_no": null,
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"data": {"name": "CRM-DEAL-0001", "email": "new@example.com",
                "contacts": [{"name": "row-abc", "contact": "jane", "is_primary": 1}]}}"#,
        )
        .create_async()
        .await;

    let repo = FrappeDealRepository::new(async_client(&server));
    repo.update_contact_details("CRM-DEAL-0001", Some("new@example.com"), None)
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_holiday_repository_loads_lists_with_holidays() {
    let mut server = Server::new_async().await;

    let _list = server
        .mock("GET", Matcher::Regex(r"^/api/resource/CRM(%20| )Holiday(%20| )List$".into()))
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data": [{"name": "Office 2024"}]}"#)
        .create_async()
        .await;
    let _doc = server
        .mock(
            "GET",
            Matcher::Regex(r"^/api/resource/CRM(%20| )Holiday(%20| )List/Office(%20| )2024$".into()),
        )
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"data": {"name": "Office 2024", "from_date": "2024-01-01", "to_date": "2024-12-31",
                "holidays": [{"date": "2024-01-08", "description": "Company day"}]}}"#,
        )
        .create_async()
        .await;

    let repo = FrappeHolidayRepository::new(async_client(&server));
    let lists = repo.list_holiday_lists().await.unwrap();

    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0].from_date, Some(d(2024, 1, 1)));
    assert_eq!(lists[0].holidays[0].date, Some(d(2024, 1, 8)));
}
