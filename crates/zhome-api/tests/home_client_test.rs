#![allow(clippy::unwrap_used)]
// Integration tests for `HomeClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use zhome_api::{Error, HomeClient, RecordId};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, HomeClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = HomeClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn device_json() -> serde_json::Value {
    json!({
        "id": "e6614103e7",
        "platform": "rp2",
        "display_name": "Living Room",
        "device_info": {
            "name": "Living Room",
            "manufacturer": "ZRW",
            "model": "RP2-PICO-W",
            "identifiers": "e6614103e7",
            "sw_version": "1.4.0"
        },
        "config": {
            "id": 3,
            "sensors": [{
                "sensor_type": "button",
                "name": "Main Light",
                "sensor_config": { "pin": 14, "retrigger_delay_ms": 300 }
            }],
            "device_settings": { "led_on_after_connect": true }
        }
    })
}

// ── Device tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_devices() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/home/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([device_json()])))
        .mount(&server)
        .await;

    let devices = client.fetch_devices().await.unwrap();

    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].display_name, "Living Room");
    assert_eq!(devices[0].config.id, RecordId::Numeric(3));
    assert_eq!(devices[0].config.sensors[0].sensor_type, "button");
    assert_eq!(
        devices[0].device_info.as_ref().unwrap().sw_version.as_deref(),
        Some("1.4.0")
    );
}

#[tokio::test]
async fn test_fetch_device_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/home/devices/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = client.fetch_device("missing").await;

    assert!(
        matches!(result, Err(ref e) if e.is_not_found()),
        "expected NotFound, got: {result:?}"
    );
}

#[tokio::test]
async fn test_fetch_device_by_id() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/home/devices/e6614103e7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(device_json()))
        .mount(&server)
        .await;

    let device = client.fetch_device("e6614103e7").await.unwrap();
    assert_eq!(device.platform.as_deref(), Some("rp2"));
}

// ── Sensor tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_add_sensor_posts_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/home/sensors/add"))
        .and(body_partial_json(json!({
            "sensor_type": "button",
            "name": "Main Light",
            "device_config_id": 3,
            "sensor_config": { "pin": 14 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let details = json!({ "pin": 14, "retrigger_delay_ms": 300 });
    let resp = client
        .add_sensor("button", "Main Light", &RecordId::Numeric(3), &details)
        .await
        .unwrap();

    assert!(resp.success);
}

#[tokio::test]
async fn test_add_sensor_in_band_rejection() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/home/sensors/add"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "pin already in use"
        })))
        .mount(&server)
        .await;

    let resp = client
        .add_sensor("fan", "Ceiling", &RecordId::Numeric(3), &json!({}))
        .await
        .unwrap();

    assert!(!resp.success);
    assert_eq!(resp.message.as_deref(), Some("pin already in use"));
}

// ── Log tests ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_logs() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/home/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 1,
                "unit_id": "e6614103e7",
                "display_name": "Living Room",
                "message": "connected to mqtt",
                "type": "info",
                "level": 2,
                "version": "1.4.0"
            },
            {
                "id": 2,
                "unit_id": "e6614103e7",
                "display_name": "Living Room",
                "message": "wifi lost - Restarting",
                "type": "error",
                "level": 1
            }
        ])))
        .mount(&server)
        .await;

    let logs = client.fetch_logs().await.unwrap();

    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].level, 2);
    assert_eq!(logs[1].log_type, "error");
    assert!(logs[1].version.is_none());
}

// ── System tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_mqtt_details() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/mqtt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "port": 1883,
            "username": "home",
            "password": "secret"
        })))
        .mount(&server)
        .await;

    let details = client.fetch_mqtt_details().await.unwrap();
    assert_eq!(details.port, Some(1883));
    assert_eq!(details.username.as_deref(), Some("home"));
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_server_error_maps_to_http() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/home/devices"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client.fetch_devices().await.unwrap_err();

    assert!(err.is_transient());
    match err {
        Error::Http { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected Http error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_maps_to_deserialization() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/home/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.fetch_logs().await;

    match result {
        Err(Error::Deserialization { ref body, .. }) => {
            assert!(body.contains("oops"));
        }
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}
