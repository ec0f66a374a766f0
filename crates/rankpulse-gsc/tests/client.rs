//! Integration tests for `GscClient` using wiremock HTTP mocks.

use rankpulse_gsc::{Dimension, GscClient, GscError};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> GscClient {
    GscClient::with_base_url("test-token", 30, base_url)
        .expect("client construction should not fail")
        .with_retry_policy(0, 0)
}

#[tokio::test]
async fn list_sites_returns_inventory() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "siteEntry": [
            { "siteUrl": "https://a.com/", "permissionLevel": "siteOwner" },
            { "siteUrl": "sc-domain:b.com", "permissionLevel": "siteFullUser" }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/webmasters/v3/sites"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let sites = test_client(&server.uri())
        .list_sites()
        .await
        .expect("should parse site list");

    assert_eq!(sites.len(), 2);
    assert_eq!(sites[0].site_url, "https://a.com/");
    assert_eq!(sites[1].site_url, "sc-domain:b.com");
    assert_eq!(sites[1].permission_level.as_deref(), Some("siteFullUser"));
}

#[tokio::test]
async fn list_sites_tolerates_missing_site_entry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/webmasters/v3/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let sites = test_client(&server.uri()).list_sites().await.unwrap();
    assert!(sites.is_empty());
}

#[tokio::test]
async fn query_normalizes_rows_at_the_boundary() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "rows": [
            { "keys": ["2025-11-03"], "clicks": 12.0, "impressions": 300.0, "ctr": 0.04, "position": 8.2 },
            { "keys": ["2025-11-04"], "clicks": 0.0, "impressions": 50.0, "ctr": 0.0, "position": 14.6 }
        ],
        "responseAggregationType": "byProperty"
    });

    Mock::given(method("POST"))
        .and(path(
            "/webmasters/v3/sites/sc-domain:a.com/searchAnalytics/query",
        ))
        .and(body_partial_json(serde_json::json!({
            "startDate": "2025-11-01",
            "endDate": "2025-11-30",
            "dimensions": ["date"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let start = chrono::NaiveDate::from_ymd_opt(2025, 11, 1).unwrap();
    let end = chrono::NaiveDate::from_ymd_opt(2025, 11, 30).unwrap();
    let rows = test_client(&server.uri())
        .query("sc-domain:a.com", start, end, Dimension::Date)
        .await
        .expect("should parse rows");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].key, "2025-11-03");
    assert_eq!(rows[0].clicks, 12);
    // Fractional CTR from the wire is already percent here.
    assert!((rows[0].ctr - 4.0).abs() < 1e-9);
    assert!((rows[0].position.unwrap() - 8.2).abs() < 1e-9);
}

#[tokio::test]
async fn query_with_month_dimension_returns_month_keys() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "rows": [
            { "keys": ["2025-10"], "clicks": 900.0, "impressions": 18000.0, "ctr": 0.05, "position": 11.0 },
            { "keys": ["2025-11"], "clicks": 1000.0, "impressions": 20000.0, "ctr": 0.05, "position": 10.4 }
        ]
    });

    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({
            "dimensions": ["month"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let start = chrono::NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
    let end = chrono::NaiveDate::from_ymd_opt(2025, 11, 30).unwrap();
    let rows = test_client(&server.uri())
        .query("https://a.com/", start, end, Dimension::Month)
        .await
        .unwrap();

    assert_eq!(rows[0].key, "2025-10");
    assert_eq!(rows[1].key, "2025-11");
}

#[tokio::test]
async fn query_dimension_returns_search_terms_as_keys() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "rows": [
            { "keys": ["best running shoes"], "clicks": 140.0, "impressions": 2100.0, "ctr": 0.0667, "position": 4.1 },
            { "keys": ["trail shoes"], "clicks": 90.0, "impressions": 3000.0, "ctr": 0.03, "position": 9.8 }
        ]
    });

    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({
            "dimensions": ["query"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let start = chrono::NaiveDate::from_ymd_opt(2025, 11, 1).unwrap();
    let end = chrono::NaiveDate::from_ymd_opt(2025, 11, 30).unwrap();
    let rows = test_client(&server.uri())
        .query("https://a.com/", start, end, Dimension::Query)
        .await
        .unwrap();

    assert_eq!(rows[0].key, "best running shoes");
    assert_eq!(rows[0].clicks, 140);
}

#[tokio::test]
async fn api_error_envelope_is_surfaced() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "error": { "code": 403, "message": "User does not have sufficient permission" }
    });

    Mock::given(method("GET"))
        .and(path("/webmasters/v3/sites"))
        .respond_with(ResponseTemplate::new(403).set_body_json(&body))
        .mount(&server)
        .await;

    let err = test_client(&server.uri()).list_sites().await.unwrap_err();
    match err {
        GscError::Api { code, message } => {
            assert_eq!(code, 403);
            assert!(message.contains("permission"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn transient_server_errors_are_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/webmasters/v3/sites"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/webmasters/v3/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "siteEntry": [{ "siteUrl": "https://a.com/" }]
        })))
        .mount(&server)
        .await;

    let client = GscClient::with_base_url("test-token", 30, &server.uri())
        .unwrap()
        .with_retry_policy(2, 0);

    let sites = client.list_sites().await.expect("retry should recover");
    assert_eq!(sites.len(), 1);
}
