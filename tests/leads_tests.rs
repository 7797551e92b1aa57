//! Leads resource tests against a mock amoCRM server

use amocrm_client::models::{CustomFieldInput, LeadAdd, LeadFilter, LeadUpdate};
use amocrm_client::{AmoClient, CrmConfig, CrmError};
use httpmock::prelude::*;
use serde_json::json;

/// Start a mock server that accepts the login and return a connected client
async fn connected() -> (MockServer, AmoClient) {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/private/api/auth.php");
            then.status(200)
                .header("Set-Cookie", "session_id=abc123; path=/")
                .json_body(json!({"response": {"auth": true, "accounts": []}}));
        })
        .await;

    let config = CrmConfig::new(server.base_url(), "manager", "0123456789abcdef");
    let client = AmoClient::connect(&config).await.unwrap();
    (server, client)
}

fn lead(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "name": format!("Deal {id}"),
        "responsible_user_id": 7,
        "created_by": 7,
        "created_at": 1_700_000_000,
        "updated_at": 1_700_000_500,
        "account_id": 1001,
        "is_deleted": false,
        "main_contact": {},
        "company": {"id": 88, "name": "Acme"},
        "contacts": {"id": [501, 502]},
        "tags": [{"id": 1, "name": "vip"}],
        "custom_fields": [{"id": 300, "name": "Source", "values": [{"value": "web"}]}],
        "status_id": 142,
        "sale": 1500,
        "pipeline_id": 55,
        "_links": {"self": {"href": format!("/api/v2/leads?id={id}"), "method": "get"}}
    })
}

#[tokio::test]
async fn test_list_leads() {
    let (server, client) = connected().await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v2/leads")
                .header("Cookie", "session_id=abc123")
                .query_param("id", "11,12")
                .query_param("limit_rows", "50")
                .query_param("limit_offset", "100");
            then.status(200).json_body(json!({
                "_links": {"self": {"href": "/api/v2/leads", "method": "get"}},
                "_embedded": {"items": [lead(11), lead(12)]}
            }));
        })
        .await;

    let leads = client
        .leads()
        .list(&LeadFilter::by_ids([11, 12]).page(50, 100))
        .await
        .unwrap()
        .unwrap();

    list.assert_async().await;
    assert_eq!(leads.len(), 2);
    assert_eq!(leads[0].id, 11);
    assert_eq!(leads[0].company.id, 88);
    assert_eq!(leads[0].contacts.id, vec![501, 502]);
    assert_eq!(leads[1].tags[0].name, "vip");
}

#[tokio::test]
async fn test_list_leads_repairs_null_collections() {
    let (server, client) = connected().await;
    let mut broken = lead(13);
    broken["tags"] = json!(null);
    broken["custom_fields"] = json!({});
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v2/leads");
            then.status(200)
                .json_body(json!({"_embedded": {"items": [lead(11), broken]}}));
        })
        .await;

    let leads = client
        .leads()
        .list(&LeadFilter::default())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(leads.len(), 2);
    assert!(leads[1].tags.is_empty());
    assert!(leads[1].custom_fields.is_empty());
}

#[tokio::test]
async fn test_list_leads_no_content_is_none() {
    let (server, client) = connected().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v2/leads");
            then.status(204);
        })
        .await;

    let leads = client.leads().list(&LeadFilter::default()).await.unwrap();
    assert!(leads.is_none());
}

#[tokio::test]
async fn test_list_leads_empty_items_is_empty_result() {
    let (server, client) = connected().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v2/leads");
            then.status(200).json_body(json!({"_links": {}, "_embedded": {"items": []}}));
        })
        .await;

    let err = client.leads().list(&LeadFilter::default()).await.unwrap_err();
    assert!(matches!(err, CrmError::EmptyResult));
}

#[tokio::test]
async fn test_list_leads_invalid_filter_is_not_sent() {
    let (server, client) = connected().await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v2/leads");
            then.status(200).body("{}");
        })
        .await;

    let filter = LeadFilter {
        id: vec![5, 0],
        limit_rows: 501,
        ..Default::default()
    };
    let err = client.leads().list(&filter).await.unwrap_err();

    match err {
        CrmError::Validation(v) => {
            assert!(v.has_field("id"));
            assert!(v.has_field("limit_rows"));
        }
        other => panic!("Expected validation error, got {other:?}"),
    }
    list.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_add_lead_returns_id() {
    let (server, client) = connected().await;
    let add = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v2/leads")
                .header("Cookie", "session_id=abc123")
                .json_body(json!({
                    "add": [{
                        "name": "New deal",
                        "status_id": "142",
                        "sale": "2500",
                        "custom_fields": [{"id": "300", "values": [{"value": "web"}]}]
                    }]
                }));
            then.status(200).json_body(json!({
                "_links": {"self": {"href": "/api/v2/leads", "method": "post"}},
                "_embedded": {"items": [{"id": 4021, "_links": {"self": {"href": "/api/v2/leads?id=4021"}}}]}
            }));
        })
        .await;

    let mut lead = LeadAdd::new("New deal", 142);
    lead.sale = 2500;
    lead.custom_fields = vec![CustomFieldInput::text(300, "web")];

    let id = client.leads().add(&lead).await.unwrap();

    add.assert_async().await;
    assert_eq!(id, 4021);
}

#[tokio::test]
async fn test_add_lead_validation_lists_every_field() {
    let (_server, client) = connected().await;

    let mut lead = LeadAdd::new("", 0);
    lead.sale = -1;
    let err = client.leads().add(&lead).await.unwrap_err();

    match err {
        CrmError::Validation(v) => {
            assert_eq!(v.fields(), vec!["name", "status_id", "sale"]);
        }
        other => panic!("Expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_update_lead_service_error() {
    let (server, client) = connected().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v2/leads")
                .body_contains("\"update\"")
                .body_contains("\"id\":\"4021\"");
            then.status(200).json_body(json!({
                "_links": {"self": {"href": "/api/v2/leads", "method": "post"}},
                "_embedded": {
                    "items": [],
                    "errors": {"update": {"4021": "Last modified date is older than in database"}}
                }
            }));
        })
        .await;

    let mut update = LeadUpdate::new(4021, 1_700_000_000);
    update.name = "Renamed".to_string();
    let err = client.leads().update(&update).await.unwrap_err();

    match err {
        CrmError::Service { message, .. } => assert!(message.contains("Last modified date")),
        other => panic!("Expected service error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_update_lead_without_items_is_empty_result() {
    let (server, client) = connected().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v2/leads");
            then.status(200).json_body(json!({"_links": {}}));
        })
        .await;

    let err = client
        .leads()
        .update(&LeadUpdate::new(4021, 1_700_000_000))
        .await
        .unwrap_err();
    assert!(matches!(err, CrmError::EmptyResult));
}
