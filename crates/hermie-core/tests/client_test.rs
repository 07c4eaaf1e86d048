#![allow(clippy::unwrap_used)]
// Integration tests for the cached channels on `Client` using wiremock.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use hermie_api::Fetcher;
use hermie_core::{AlertKind, Client, Device, DeviceState, FailureKind, Thresholds};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Client) {
    setup_with_timeout(Duration::from_secs(5)).await
}

async fn setup_with_timeout(timeout: Duration) -> (MockServer, Client) {
    let server = MockServer::start().await;
    let fetcher = Fetcher::from_reqwest(hermie_api::reqwest::Client::new(), timeout);
    let client = Client::with_fetcher(fetcher, &server.uri());
    (server, client)
}

async fn mount_control(server: &MockServer, device: &str, status: u16, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path(format!("/control/{device}")))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_sensor(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/sensor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ── Defaults ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_accessors_before_any_fetch() {
    let (_server, client) = setup().await;

    assert_eq!(client.device_field(Device::Heat, "status"), "");
    assert_eq!(client.device_error(Device::Heat), "");
    assert_eq!(client.device_as_json(Device::Pump), "{}");
    assert!(!client.is_device_on(Device::Heat));

    assert_eq!(client.sensor_field("temperature_f"), "");
    assert_eq!(client.sensor_error(), "");
    assert_eq!(client.sensor_as_json(), "{}");
    assert_eq!(client.sensor_number("humidity"), None);
    assert!(!client.is_sensor_read_ok());
    assert!(!client.has_alert());

    assert_eq!(client.health_status(), "");
    assert_eq!(client.health_error(), "");
    assert_eq!(client.health_as_json(), "{}");
    assert!(!client.is_healthy());
}

// ── Device control ──────────────────────────────────────────────────

#[tokio::test]
async fn test_set_device_success_caches_response() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/control/heat"))
        .and(body_json(json!({ "state": "on" })))
        .and(header("cache-control", "no-cache"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "heat_on": true,
            "timestamp": "2025-01-15T12:00:00+00:00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    client.set_device(Device::Heat, DeviceState::On).await;

    assert_eq!(client.device_error(Device::Heat), "");
    assert_eq!(client.device_field(Device::Heat, "status"), "success");
    assert_eq!(client.device_field(Device::Heat, "heat_on"), "true");
    assert_eq!(client.device_field(Device::Heat, "nonexistent"), "");
    assert!(client.is_device_on(Device::Heat));
    assert!(client.device_response(Device::Heat).is_some());
}

#[tokio::test]
async fn test_parsed_state_is_sent_lowercase() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/control/pump"))
        .and(body_json(json!({ "state": "off" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "pump_on": false })))
        .expect(1)
        .mount(&server)
        .await;

    let state: DeviceState = "OFF".parse().unwrap();
    client.set_device(Device::Pump, state).await;

    assert_eq!(client.device_error(Device::Pump), "");
    assert_eq!(client.device_as_json(Device::Pump), r#"{"pump_on":false}"#);
}

#[tokio::test]
async fn test_set_device_failure_clears_response() {
    let (server, client) = setup().await;

    mount_control(&server, "heat", 200, json!({ "status": "success", "heat_on": true })).await;
    client.set_device(Device::Heat, DeviceState::On).await;
    assert_eq!(client.device_field(Device::Heat, "status"), "success");

    server.reset().await;
    mount_control(
        &server,
        "heat",
        500,
        json!({ "error": "Failed to set heat state: relay fault" }),
    )
    .await;
    client.set_device(Device::Heat, DeviceState::Off).await;

    assert_eq!(client.device_as_json(Device::Heat), "{}");
    assert_eq!(client.device_field(Device::Heat, "status"), "");
    assert_eq!(
        client.device_error(Device::Heat),
        "Failed to set heat state: relay fault"
    );
}

#[tokio::test]
async fn test_success_after_failure_clears_error() {
    let (server, client) = setup().await;

    mount_control(&server, "pump", 400, json!({ "error": "State must be 'on' or 'off'" })).await;
    client.set_device(Device::Pump, DeviceState::On).await;
    assert_eq!(client.device_error(Device::Pump), "State must be 'on' or 'off'");

    server.reset().await;
    mount_control(&server, "pump", 200, json!({ "status": "success", "pump_on": true })).await;
    client.set_device(Device::Pump, DeviceState::On).await;

    assert_eq!(client.device_error(Device::Pump), "");
    assert!(client.is_device_on(Device::Pump));
}

#[tokio::test]
async fn test_error_without_message_uses_status() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    client.set_device(Device::Heat, DeviceState::On).await;

    assert_eq!(client.device_error(Device::Heat), "HTTP 503");
}

// ── isDeviceOn fallback ─────────────────────────────────────────────

#[tokio::test]
async fn test_device_on_prefers_control_response() {
    let (server, client) = setup().await;

    mount_control(&server, "heat", 200, json!({ "heat_on": true })).await;
    mount_sensor(&server, json!({ "heat_on": false, "last_read_ok": true })).await;

    client.fetch_sensor().await;
    client.set_device(Device::Heat, DeviceState::On).await;

    assert!(client.is_device_on(Device::Heat));
}

#[tokio::test]
async fn test_device_on_falls_back_to_telemetry() {
    let (server, client) = setup().await;

    mount_sensor(&server, json!({ "heat_on": true, "last_read_ok": true })).await;
    client.fetch_sensor().await;

    assert!(client.is_device_on(Device::Heat));
    assert!(!client.is_device_on(Device::Pump));
}

#[tokio::test]
async fn test_device_on_falls_back_when_control_lacks_field() {
    let (server, client) = setup().await;

    mount_control(&server, "heat", 200, json!({ "status": "success" })).await;
    mount_sensor(&server, json!({ "heat_on": true })).await;

    client.set_device(Device::Heat, DeviceState::On).await;
    client.fetch_sensor().await;

    assert!(client.is_device_on(Device::Heat));
}

#[tokio::test]
async fn test_device_on_defaults_false() {
    let (server, client) = setup().await;

    mount_sensor(&server, json!({ "temperature_f": 72.0 })).await;
    client.fetch_sensor().await;

    assert!(!client.is_device_on(Device::Heat));
}

#[tokio::test]
async fn test_device_on_falls_back_when_control_failed() {
    let (server, client) = setup().await;

    mount_control(&server, "heat", 500, json!({ "error": "relay stuck" })).await;
    mount_sensor(&server, json!({ "heat_on": true, "last_read_ok": true })).await;

    client.fetch_sensor().await;
    client.set_device(Device::Heat, DeviceState::Off).await;

    assert_eq!(client.device_error(Device::Heat), "relay stuck");
    assert!(client.is_device_on(Device::Heat));
}

// ── Telemetry ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_sensor_sends_cache_buster() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/sensor"))
        .and(|req: &Request| req.url.query_pairs().any(|(k, v)| k == "_" && !v.is_empty()))
        .and(header("cache-control", "no-cache"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "temperature_c": 22.5,
            "temperature_f": 70.5,
            "humidity": 71.2,
            "alert": null,
            "error": null,
            "last_read_ok": true,
            "timestamp_iso": "2025-01-15T12:00:00+00:00",
            "heat_on": false,
            "pump_on": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    client.fetch_sensor().await;

    assert_eq!(client.sensor_field("temperature_f"), "70.5");
    assert_eq!(client.sensor_number("humidity"), Some(71.2));
    assert_eq!(client.sensor_error(), "");
    assert!(client.is_sensor_read_ok());
    assert!(!client.has_alert());

    let reading = client.sensor_reading().unwrap();
    assert_eq!(reading.temperature_c, Some(22.5));
    assert_eq!(reading.device_on(Device::Pump), Some(true));
}

#[tokio::test]
async fn test_fetch_sensor_replaces_snapshot() {
    let (server, client) = setup().await;

    mount_sensor(&server, json!({ "temperature_f": 70 })).await;
    client.fetch_sensor().await;
    assert_eq!(client.sensor_field("temperature_f"), "70");

    server.reset().await;
    mount_sensor(&server, json!({ "humidity": 50 })).await;
    client.fetch_sensor().await;

    assert_eq!(client.sensor_field("temperature_f"), "");
    assert_eq!(client.sensor_field("humidity"), "50");
    assert_eq!(client.sensor_as_json(), r#"{"humidity":50}"#);
}

#[tokio::test]
async fn test_sensor_failure_drops_prior_fields() {
    let (server, client) = setup().await;

    mount_sensor(&server, json!({ "temperature_f": 72.0, "last_read_ok": true })).await;
    client.fetch_sensor().await;
    assert!(client.is_sensor_read_ok());

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/sensor"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;
    client.fetch_sensor().await;

    assert_eq!(client.sensor_field("temperature_f"), "");
    assert_eq!(client.sensor_field("last_read_ok"), "false");
    assert!(!client.is_sensor_read_ok());
    assert!(client.sensor_error().starts_with("Invalid JSON response"));

    let reading = client.sensor_reading().unwrap();
    assert!(!reading.last_read_ok);
    assert!(reading.error.is_some());
}

#[tokio::test]
async fn test_server_reported_read_error() {
    let (server, client) = setup().await;

    mount_sensor(
        &server,
        json!({
            "temperature_f": 72.0,
            "error": "read_error: OSError: [Errno 121] Remote I/O error",
            "last_read_ok": false,
            "alert": "Humidity 60.0% below 65.0%"
        }),
    )
    .await;
    client.fetch_sensor().await;

    assert_eq!(
        client.sensor_error(),
        "read_error: OSError: [Errno 121] Remote I/O error"
    );
    assert!(!client.is_sensor_read_ok());
    assert!(client.has_alert());
    assert_eq!(client.sensor_field("temperature_f"), "72.0");
}

#[tokio::test]
async fn test_loosely_typed_snapshot_still_evaluates() {
    let (server, client) = setup().await;

    mount_sensor(
        &server,
        json!({
            "temperature_f": 90.0,
            "humidity": "70.0",
            "alert": 1,
            "last_read_ok": true
        }),
    )
    .await;
    client.fetch_sensor().await;

    assert!(client.has_alert());
    assert_eq!(client.sensor_number("humidity"), Some(70.0));

    let reading = client.sensor_reading().unwrap();
    assert_eq!(reading.temperature_f, Some(90.0));
    assert_eq!(reading.humidity, Some(70.0));
    assert!(reading.has_alert());

    let alert = Thresholds::default().evaluate_reading(&reading).unwrap();
    assert_eq!(alert.kind, AlertKind::HighTemperature);
}

#[tokio::test]
async fn test_spawned_fetch_updates_cache() {
    let (server, client) = setup().await;

    mount_sensor(&server, json!({ "last_read_ok": true, "alert": true })).await;

    client.spawn_fetch_sensor().await.unwrap();

    assert!(client.is_sensor_read_ok());
    assert!(client.has_alert());
}

// ── Health ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_check_health_ok() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .and(header("cache-control", "no-cache"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "timestamp": "2025-01-15T12:00:00+00:00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    client.check_health().await;

    assert_eq!(client.health_status(), "ok");
    assert!(client.is_healthy());
    assert_eq!(client.health_error(), "");
    assert!(client.health_report().unwrap().is_ok());
}

#[tokio::test]
async fn test_check_health_degraded_is_not_healthy() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "degraded" })))
        .mount(&server)
        .await;

    client.check_health().await;

    assert_eq!(client.health_status(), "degraded");
    assert!(!client.is_healthy());
}

#[tokio::test]
async fn test_check_health_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "db down" })))
        .mount(&server)
        .await;

    client.check_health().await;

    assert_eq!(client.health_status(), "error");
    assert!(!client.is_healthy());
    assert_eq!(client.health_error(), "db down");
    assert_eq!(
        client.health_as_json(),
        r#"{"error":"db down","status":"error"}"#
    );
}

#[tokio::test]
async fn test_connection_refused_is_cached() {
    let fetcher = Fetcher::from_reqwest(hermie_api::reqwest::Client::new(), Duration::from_secs(5));
    let client = Client::with_fetcher(fetcher, "http://127.0.0.1:9");

    client.check_health().await;
    client.set_device(Device::Pump, DeviceState::On).await;

    assert_eq!(client.health_status(), "error");
    assert!(client.health_error().starts_with("Network error"));
    assert_eq!(
        client.health_failure().map(|f| f.kind),
        Some(FailureKind::Connection)
    );
    assert!(!client.device_error(Device::Pump).is_empty());
    assert_eq!(client.device_as_json(Device::Pump), "{}");
}

// ── Timeouts, base URL and concurrency ─────────────────────────────

#[tokio::test]
async fn test_timeout_leaves_other_slots_untouched() {
    let (server, client) = setup_with_timeout(Duration::from_millis(200)).await;

    mount_control(&server, "heat", 200, json!({ "status": "success", "heat_on": true })).await;
    Mock::given(method("POST"))
        .and(path("/control/pump"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "pump_on": true }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    client.set_device(Device::Heat, DeviceState::On).await;
    client.set_device(Device::Pump, DeviceState::On).await;

    assert_eq!(
        client.device_error(Device::Pump),
        "Request timed out after 200ms"
    );
    assert_eq!(client.device_as_json(Device::Pump), "{}");
    assert_eq!(
        client.device_failure(Device::Pump).map(|f| f.kind),
        Some(FailureKind::Timeout)
    );
    assert_eq!(client.device_field(Device::Heat, "status"), "success");
    assert_eq!(client.device_error(Device::Heat), "");
}

#[tokio::test]
async fn test_base_url_change_affects_later_requests() {
    let (first, client) = setup().await;
    let second = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "degraded" })))
        .expect(1)
        .mount(&first)
        .await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .expect(1)
        .mount(&second)
        .await;

    client.check_health().await;
    assert_eq!(client.health_status(), "degraded");

    client.set_base_url(&format!("  {}/  ", second.uri()));
    client.check_health().await;
    assert_eq!(client.health_status(), "ok");

    client.set_base_url("");
    assert_eq!(client.base_url(), second.uri());
}

#[tokio::test]
async fn test_last_completion_wins_for_same_device() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/control/heat"))
        .and(body_json(json!({ "state": "on" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "heat_on": true }))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/control/heat"))
        .and(body_json(json!({ "state": "off" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "heat_on": false })))
        .mount(&server)
        .await;

    futures_util::join!(
        client.set_device(Device::Heat, DeviceState::On),
        client.set_device(Device::Heat, DeviceState::Off),
    );

    // The slower "on" acknowledgement completed last.
    assert!(client.is_device_on(Device::Heat));
    assert_eq!(client.device_error(Device::Heat), "");
}

#[tokio::test]
async fn test_channels_run_concurrently() {
    let (server, client) = setup().await;

    mount_control(&server, "heat", 200, json!({ "heat_on": true })).await;
    mount_control(&server, "pump", 500, json!({ "error": "relay fault" })).await;
    mount_sensor(&server, json!({ "temperature_f": 75.0, "last_read_ok": true })).await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&server)
        .await;

    let handles = vec![
        client.spawn_set_device(Device::Heat, DeviceState::On),
        client.spawn_set_device(Device::Pump, DeviceState::On),
        client.spawn_fetch_sensor(),
        client.spawn_check_health(),
    ];
    for result in futures_util::future::join_all(handles).await {
        result.unwrap();
    }

    assert!(client.is_device_on(Device::Heat));
    assert_eq!(client.device_error(Device::Pump), "relay fault");
    assert_eq!(
        client.device_failure(Device::Pump).map(|f| f.kind),
        Some(FailureKind::Rejected { status: 500 })
    );
    assert!(client.is_sensor_read_ok());
    assert!(client.is_healthy());
}
