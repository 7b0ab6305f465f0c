//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results or error kinds. Request bodies are compared as
//! parsed JSON so field ordering does not matter.

use std::collections::BTreeMap;

use people_core::{ApiConfig, HttpMethod, HttpRequest, HttpResponse, PeopleClient, PeopleError, Person};

const BASE_URL: &str = "http://localhost:3000/";

/// The vectors only exercise `build_*` / `parse_*`, so no transport is needed.
fn client() -> PeopleClient<()> {
    PeopleClient::new(ApiConfig::new(BASE_URL), ())
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "PATCH" => HttpMethod::Patch,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated(sim: &serde_json::Value) -> HttpResponse {
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn assert_request(name: &str, req: &HttpRequest, expected: &serde_json::Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.uri, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");
}

fn assert_error_kind(name: &str, err: &PeopleError, expected: &str) {
    let matched = match expected {
        "RequestFailed" => matches!(err, PeopleError::RequestFailed { .. }),
        "InvalidResponseShape" => matches!(err, PeopleError::InvalidResponseShape { .. }),
        "MissingServerKey" => matches!(err, PeopleError::MissingServerKey),
        "Unhandled" => matches!(err, PeopleError::Unhandled(_)),
        other => panic!("{name}: unknown expected_error: {other}"),
    };
    assert!(matched, "{name}: expected {expected}, got {err:?}");
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[test]
fn search_test_vectors() {
    let raw = include_str!("../../test-vectors/search.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();

        // Verify build
        let req = c.build_search(case["filter"].as_str());
        assert_request(name, &req, &case["expected_request"]);
        assert!(req.body.is_none(), "{name}: body should be None");

        // Verify parse
        let result = c.parse_search(simulated(&case["simulated_response"]));
        if let Some(expected_error) = case.get("expected_error") {
            assert_error_kind(name, &result.unwrap_err(), expected_error.as_str().unwrap());
        } else {
            let people = result.unwrap();
            let expected: Vec<Person> = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(people, expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Get by user name
// ---------------------------------------------------------------------------

#[test]
fn get_by_user_name_test_vectors() {
    let raw = include_str!("../../test-vectors/get_by_user_name.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();

        // Verify build
        let req = c.build_get_by_user_name(case["user_name"].as_str().unwrap());
        assert_request(name, &req, &case["expected_request"]);
        assert!(req.body.is_none(), "{name}: body should be None");

        // Verify parse
        let result = c.parse_get_by_user_name(simulated(&case["simulated_response"]));
        if let Some(expected_error) = case.get("expected_error") {
            assert_error_kind(name, &result.unwrap_err(), expected_error.as_str().unwrap());
        } else {
            let person = result.unwrap();
            let expected: Person = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(person, expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Update user field
// ---------------------------------------------------------------------------

#[test]
fn update_user_field_test_vectors() {
    let raw = include_str!("../../test-vectors/update_user_field.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let user_name = case["user_name"].as_str().unwrap();
        let fields: BTreeMap<String, String> = serde_json::from_value(case["fields"].clone()).unwrap();

        // Step 1: service document lookup
        let req = c.build_server_key_lookup();
        assert_request(name, &req, &case["expected_key_request"]);

        let key_result = c.parse_server_key(simulated(&case["simulated_key_response"]));
        if let Some(expected_error) = case.get("expected_key_error") {
            assert_error_kind(name, &key_result.unwrap_err(), expected_error.as_str().unwrap());
            continue;
        }
        let key = key_result.unwrap();
        assert_eq!(key, case["expected_key"].as_str().unwrap(), "{name}: server key");

        // Step 2: PATCH
        let expected_req = &case["expected_request"];
        let req = c.build_update_user_field(&key, user_name, &fields).unwrap();
        assert_request(name, &req, expected_req);

        let expected_headers: Vec<(String, String)> = expected_req["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");

        let req_body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(req_body, expected_req["body"], "{name}: body");

        let updated = c.parse_update_user_field(simulated(&case["simulated_response"])).unwrap();
        assert!(updated, "{name}: expected success");
    }
}
