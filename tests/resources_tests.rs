// Resource router tests: request classification, introspection listing, interface lookup

mod common;

use std::collections::BTreeMap;

use astarte_datasource::error::ResourceError;
use astarte_datasource::models::InterfaceVersion;
use astarte_datasource::resources::{ResourceRequest, route};
use axum::http::StatusCode;
use common::FakeApi;
use serde_json::json;

fn api_with_device() -> FakeApi {
    let mut api = FakeApi::default();
    let mut introspection = BTreeMap::new();
    introspection.insert(
        "org.example.Temp".to_string(),
        InterfaceVersion { major: 1, minor: 2 },
    );
    api.introspection.insert("abc123".into(), introspection);
    api.introspection.insert("empty".into(), BTreeMap::new());
    api.interfaces.insert(
        ("org.example.Temp".into(), 1),
        json!({
            "interface_name": "org.example.Temp",
            "version_major": 1,
            "version_minor": 2,
            "type": "datastream",
            "ownership": "device",
            "mappings": [{"endpoint": "/value", "type": "double"}]
        }),
    );
    api
}

#[test]
fn parse_classifies_requests() {
    assert_eq!(
        ResourceRequest::parse("/resources?device_id=abc123").unwrap(),
        ResourceRequest::DeviceIntrospection {
            device_id: "abc123".into()
        }
    );
    assert_eq!(
        ResourceRequest::parse("http://host/api/resources?name=org.example.Temp&major=1").unwrap(),
        ResourceRequest::Interface {
            name: "org.example.Temp".into(),
            major: 1
        }
    );
    // device_id wins over name+major
    assert_eq!(
        ResourceRequest::parse("?name=x&major=1&device_id=d").unwrap(),
        ResourceRequest::DeviceIntrospection {
            device_id: "d".into()
        }
    );
}

#[test]
fn parse_rejects_bad_major() {
    for url in [
        "?name=org.example.Temp&major=notanumber",
        "?name=org.example.Temp&major=-1",
        "?name=org.example.Temp&major=",
    ] {
        let err = ResourceRequest::parse(url).unwrap_err();
        assert!(matches!(err, ResourceError::InvalidParameter(_)), "{}", url);
    }
}

#[test]
fn parse_rejects_unrecognized() {
    for url in ["/resources", "?name=only", "?major=1", "?foo=bar"] {
        let err = ResourceRequest::parse(url).unwrap_err();
        assert!(matches!(err, ResourceError::Unrecognized), "{}", url);
    }
}

#[tokio::test]
async fn device_introspection_returns_entries() {
    let api = api_with_device();
    let response = route(&api, "test", "/resources?device_id=abc123").await;

    assert_eq!(response.status, StatusCode::OK);
    let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(
        body,
        json!([{"name": "org.example.Temp", "major": 1, "minor": 2}])
    );
}

#[tokio::test]
async fn device_without_interfaces_returns_empty_list() {
    let api = api_with_device();
    let response = route(&api, "test", "/resources?device_id=empty").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(&response.body[..], b"[]");
}

#[tokio::test]
async fn introspection_is_sorted_by_name() {
    let mut api = FakeApi::default();
    let mut introspection = BTreeMap::new();
    for (name, major) in [("org.z.Last", 2), ("org.a.First", 0), ("org.m.Middle", 1)] {
        introspection.insert(name.to_string(), InterfaceVersion { major, minor: 0 });
    }
    api.introspection.insert("dev".into(), introspection);

    let response = route(&api, "test", "?device_id=dev").await;
    let body: Vec<serde_json::Value> = serde_json::from_slice(&response.body).unwrap();
    let names: Vec<&str> = body.iter().map(|e| e["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["org.a.First", "org.m.Middle", "org.z.Last"]);
}

#[tokio::test]
async fn interface_lookup_passes_document_through() {
    let api = api_with_device();
    let response = route(&api, "test", "/resources?name=org.example.Temp&major=1").await;

    assert_eq!(response.status, StatusCode::OK);
    let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(body["interface_name"], "org.example.Temp");
    assert_eq!(body["mappings"][0]["type"], "double");
}

#[tokio::test]
async fn non_numeric_major_is_bad_request_without_remote_call() {
    let api = api_with_device();
    let response = route(&api, "test", "/resources?name=org.example.Temp&major=notanumber").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(String::from_utf8_lossy(&response.body).contains("notanumber"));
    assert_eq!(api.calls(), 0);
}

#[tokio::test]
async fn unrecognized_request_is_bad_request_without_remote_call() {
    let api = api_with_device();
    let response = route(&api, "test", "/resources?foo=bar").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(&response.body[..], b"unexpected request");
    assert_eq!(api.calls(), 0);
}

#[tokio::test]
async fn remote_failure_is_bad_request_with_message() {
    let api = api_with_device();
    let response = route(&api, "test", "/resources?device_id=unknown").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        String::from_utf8_lossy(&response.body),
        "Not found: device unknown not found"
    );
    assert_eq!(api.calls(), 1);
}
