//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector names an operation, the request it must build, a simulated
//! response, and either the expected parse result or the expected error
//! status. Comparing parsed JSON (not raw strings) avoids false negatives
//! from field-ordering differences.

use piwebapi_system::{ApiError, HttpMethod, HttpRequest, HttpResponse, SystemApi};

fn build(c: &SystemApi, operation: &str) -> HttpRequest {
    match operation {
        "landing" => c.build_landing(),
        "cache_instances" => c.build_cache_instances(),
        "status" => c.build_status(),
        "user_info" => c.build_user_info(),
        "versions" => c.build_versions(),
        other => panic!("unknown operation: {other}"),
    }
}

/// Parse through the typed `parse_*` method, then back to JSON for comparison.
fn parse(c: &SystemApi, operation: &str, response: HttpResponse) -> Result<serde_json::Value, ApiError> {
    let value = match operation {
        "landing" => serde_json::to_value(c.parse_landing(response)?.data),
        "cache_instances" => serde_json::to_value(c.parse_cache_instances(response)?.data),
        "status" => serde_json::to_value(c.parse_status(response)?.data),
        "user_info" => serde_json::to_value(c.parse_user_info(response)?.data),
        "versions" => serde_json::to_value(c.parse_versions(response)?.data),
        other => panic!("unknown operation: {other}"),
    };
    Ok(value.unwrap())
}

fn simulated(sim: &serde_json::Value) -> HttpResponse {
    let headers = sim["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect();
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers,
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

#[test]
fn system_test_vectors() {
    let raw = include_str!("../../test-vectors/system.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();
    let base_url = vectors["base_url"].as_str().unwrap();
    let c = SystemApi::from_base_path(base_url).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let operation = case["operation"].as_str().unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = build(&c, operation);
        assert_eq!(req.method, HttpMethod::Get, "{name}: method");
        assert_eq!(expected_req["method"], "GET", "{name}: vector method");
        assert_eq!(
            req.path,
            format!("{base_url}{}", expected_req["path"].as_str().unwrap()),
            "{name}: path"
        );
        assert!(req.body.is_none(), "{name}: body");

        // Verify parse
        let response = simulated(&case["simulated_response"]);
        match case.get("expected_error_status") {
            Some(status) => {
                let err = parse(&c, operation, response).unwrap_err();
                assert_eq!(
                    err.status().map(u64::from),
                    status.as_u64(),
                    "{name}: error status"
                );
            }
            None => {
                let result = parse(&c, operation, response).unwrap();
                assert_eq!(result, case["expected_result"], "{name}: parsed result");
            }
        }
    }
}
