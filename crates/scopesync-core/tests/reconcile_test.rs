#![allow(clippy::unwrap_used)]
// End-to-end reconciliation tests against a mock controller.
//
// These exercise the whole run -- resolve, fetch, diff, sanitize,
// replicate, report -- through the real `ApiClient`, asserting on both
// the returned report and the requests the mock controller received.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scopesync_api::{ApiClient, TransportConfig};
use scopesync_core::{CoreError, ScopeStatus, reconcile};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let token: SecretString = "test-token".to_string().into();
    let client = ApiClient::with_token(&server.uri(), &token, &TransportConfig::default())
        .expect("client should build");
    (server, client)
}

async fn mount_sites(server: &MockServer) {
    let envelope = json!({
        "count": 2,
        "items": [
            { "id": "site-src", "name": "Branch-East" },
            { "id": "site-dst", "name": "Branch-West" }
        ]
    });
    Mock::given(method("GET"))
        .and(path("/v2.1/api/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .mount(server)
        .await;
}

async fn mount_inventory(server: &MockServer, site_id: &str, scopes: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/v2.1/api/sites/{site_id}/dhcpservers")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "count": scopes.as_array().map_or(0, Vec::len), "items": scopes })),
        )
        .mount(server)
        .await;
}

fn statuses(report: &scopesync_core::RunReport) -> Vec<&'static str> {
    report.outcomes.iter().map(|o| o.status.label()).collect()
}

// ── The worked example: one present, one missing ────────────────────

#[tokio::test]
async fn creates_exactly_the_missing_scope() {
    let (server, client) = setup().await;
    mount_sites(&server).await;
    mount_inventory(
        &server,
        "site-src",
        json!([
            { "id": "a", "subnet": "10.1.1.0/24", "default_lease_time": 86400 },
            { "id": "b", "subnet": "10.1.2.0/24", "default_lease_time": 86400 }
        ]),
    )
    .await;
    mount_inventory(
        &server,
        "site-dst",
        json!([{ "id": "c", "subnet": "10.1.1.0/24" }]),
    )
    .await;

    Mock::given(method("POST"))
        .and(path("/v2.1/api/sites/site-dst/dhcpservers"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "new", "subnet": "10.1.2.0/24" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let report = reconcile(&client, "Branch-East", "Branch-West").await.unwrap();

    assert_eq!(statuses(&report), ["already present", "created"]);
    assert_eq!(report.outcomes[0].subnet.as_deref(), Some("10.1.1.0/24"));
    assert_eq!(report.outcomes[1].subnet.as_deref(), Some("10.1.2.0/24"));
    assert_eq!(report.created(), 1);
    assert_eq!(report.already_present(), 1);
    assert!(report.is_clean());
}

// ── Sanitization completeness on the wire ───────────────────────────

#[tokio::test]
async fn submitted_payload_carries_no_system_fields() {
    let (server, client) = setup().await;
    mount_sites(&server).await;
    mount_inventory(
        &server,
        "site-src",
        json!([{
            "id": "a",
            "subnet": "10.1.2.0/24",
            "_etag": 12,
            "_schema": 2,
            "_created_on_utc": 1_700_000_000u64,
            "_updated_on_utc": 1_700_000_500u64,
            "_debug": null,
            "_info": null,
            "_warning": null,
            "_error": null,
            "default_lease_time": 86400,
            "dns_servers": ["10.1.2.2"]
        }]),
    )
    .await;
    mount_inventory(&server, "site-dst", json!([])).await;

    Mock::given(method("POST"))
        .and(path("/v2.1/api/sites/site-dst/dhcpservers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "new" })))
        .expect(1)
        .mount(&server)
        .await;

    let report = reconcile(&client, "Branch-East", "Branch-West").await.unwrap();
    assert_eq!(report.created(), 1);

    let requests = server.received_requests().await.unwrap();
    let body: Value = requests
        .iter()
        .find(|r| r.method.as_str() == "POST")
        .map(|r| r.body_json().unwrap())
        .expect("one create was submitted");

    for field in scopesync_core::SYSTEM_FIELDS {
        assert!(
            body.get(*field).is_none(),
            "system field {field:?} leaked into the create payload: {body}"
        );
    }
    assert_eq!(body["subnet"], "10.1.2.0/24");
    assert_eq!(body["default_lease_time"], 86400);
    assert_eq!(body["dns_servers"], json!(["10.1.2.2"]));
}

// ── Failure isolation ───────────────────────────────────────────────

#[tokio::test]
async fn one_failed_create_does_not_stop_the_rest() {
    let (server, client) = setup().await;
    mount_sites(&server).await;
    mount_inventory(
        &server,
        "site-src",
        json!([
            { "id": "a", "subnet": "10.9.1.0/24" },
            { "id": "b", "subnet": "10.9.2.0/24" },
            { "id": "c", "subnet": "10.9.3.0/24" }
        ]),
    )
    .await;
    mount_inventory(&server, "site-dst", json!([])).await;

    // The middle subnet is rejected by the controller.
    Mock::given(method("POST"))
        .and(path("/v2.1/api/sites/site-dst/dhcpservers"))
        .and(body_partial_json(json!({ "subnet": "10.9.2.0/24" })))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "_error": [{ "code": "INVALID_REQUEST", "message": "subnet overlaps interface" }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2.1/api/sites/site-dst/dhcpservers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "new" })))
        .expect(2)
        .mount(&server)
        .await;

    let report = reconcile(&client, "Branch-East", "Branch-West").await.unwrap();

    assert_eq!(statuses(&report), ["created", "failed", "created"]);
    assert_eq!(report.created(), 2);
    assert_eq!(report.failed(), 1);
    assert!(!report.is_clean());

    match &report.outcomes[1].status {
        ScopeStatus::Failed { detail } => {
            assert!(detail.contains("overlaps"), "unexpected detail: {detail}");
        }
        other => panic!("expected failed outcome, got: {other:?}"),
    }
}

// ── Malformed records fail alone ────────────────────────────────────

#[tokio::test]
async fn record_without_subnet_fails_without_stopping_the_run() {
    let (server, client) = setup().await;
    mount_sites(&server).await;
    mount_inventory(
        &server,
        "site-src",
        json!([
            { "id": "broken", "default_lease_time": 3600 },
            { "id": "b", "subnet": "10.9.2.0/24" }
        ]),
    )
    .await;
    mount_inventory(&server, "site-dst", json!([])).await;

    Mock::given(method("POST"))
        .and(path("/v2.1/api/sites/site-dst/dhcpservers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "new" })))
        .expect(1)
        .mount(&server)
        .await;

    let report = reconcile(&client, "Branch-East", "Branch-West").await.unwrap();

    assert_eq!(statuses(&report), ["failed", "created"]);
    assert!(report.outcomes[0].subnet.is_none());
}

// ── Hard aborts happen before any scope I/O ─────────────────────────

#[tokio::test]
async fn unresolved_destination_aborts_before_any_fetch() {
    let (server, client) = setup().await;
    mount_sites(&server).await;

    let err = reconcile(&client, "Branch-East", "Branch-Nowhere")
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::SiteNotFound { ref name } if name == "Branch-Nowhere"));

    // Only the site listing went out -- no inventory fetch, no create.
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/v2.1/api/sites");
}

#[tokio::test]
async fn ambiguous_site_name_aborts() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v2.1/api/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3,
            "items": [
                { "id": "site-src", "name": "Branch-East" },
                { "id": "site-dst", "name": "Branch-West" },
                { "id": "site-dup", "name": "Branch-West" }
            ]
        })))
        .mount(&server)
        .await;

    let err = reconcile(&client, "Branch-East", "Branch-West")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CoreError::AmbiguousSiteName { ref name, matches: 2 } if name == "Branch-West"
    ));
}

#[tokio::test]
async fn inventory_fetch_failure_aborts_the_run() {
    let (server, client) = setup().await;
    mount_sites(&server).await;

    Mock::given(method("GET"))
        .and(path("/v2.1/api/sites/site-src/dhcpservers"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = reconcile(&client, "Branch-East", "Branch-West")
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::InventoryFetch { ref site, .. } if site == "Branch-East"));

    // Nothing was created.
    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.method.as_str() != "POST"));
}

// ── Idempotence ─────────────────────────────────────────────────────

#[tokio::test]
async fn second_run_with_everything_present_creates_nothing() {
    let (server, client) = setup().await;
    mount_sites(&server).await;

    let inventory = json!([
        { "id": "a", "subnet": "10.1.1.0/24" },
        { "id": "b", "subnet": "10.1.2.0/24" }
    ]);
    mount_inventory(&server, "site-src", inventory.clone()).await;
    mount_inventory(&server, "site-dst", inventory).await;

    let report = reconcile(&client, "Branch-East", "Branch-West").await.unwrap();

    assert_eq!(report.created(), 0);
    assert_eq!(report.already_present(), 2);

    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.method.as_str() != "POST"));
}

// ── Source-side duplicates are evaluated independently ──────────────

#[tokio::test]
async fn duplicate_source_subnets_each_get_an_attempt() {
    let (server, client) = setup().await;
    mount_sites(&server).await;
    mount_inventory(
        &server,
        "site-src",
        json!([
            { "id": "a", "subnet": "10.5.0.0/24" },
            { "id": "b", "subnet": "10.5.0.0/24" }
        ]),
    )
    .await;
    mount_inventory(&server, "site-dst", json!([])).await;

    Mock::given(method("POST"))
        .and(path("/v2.1/api/sites/site-dst/dhcpservers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "new" })))
        .expect(2)
        .mount(&server)
        .await;

    let report = reconcile(&client, "Branch-East", "Branch-West").await.unwrap();

    assert_eq!(statuses(&report), ["created", "created"]);
}
