//! USPS client tests against a wiremock server standing in for tools.usps.com.

use address_enrich::app::ports::AddressLookup;
use address_enrich::config::UspsConfig;
use address_enrich::error::LookupError;
use address_enrich::infra::{PostalAddress, UspsClient, ZipCode};
use address_enrich::types::AddressQuery;
use serde_json::json;
use wiremock::{
    matchers::{body_string_contains, header, method, path, query_param, query_param_contains},
    Mock, MockServer, ResponseTemplate,
};

const ZIP_PATH: &str = "/tools/app/ziplookup/zipByAddress";
const API_PATH: &str = "/ShippingAPITest.dll";

fn client_for(server: &MockServer, username: &str) -> UspsClient {
    let config = UspsConfig::new(username, "secret").with_endpoint(format!("{}{}", server.uri(), ZIP_PATH));
    UspsClient::new(config, reqwest::Client::new())
}

fn api_client_for(server: &MockServer, username: &str) -> UspsClient {
    let config = UspsConfig::new(username, "secret").with_api_endpoint(format!("{}{}", server.uri(), API_PATH));
    UspsClient::new(config, reqwest::Client::new())
}

fn ivy_lane() -> PostalAddress {
    PostalAddress {
        address2: "6406 Ivy Lane".to_string(),
        city: "Greenbelt".to_string(),
        state: "MD".to_string(),
        ..Default::default()
    }
}

fn xml_body(doc: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}"),
        "text/xml",
    )
}

fn query() -> AddressQuery {
    AddressQuery {
        address1: "826 Treat Ave".to_string(),
        address2: String::new(),
        city: "San Francisco".to_string(),
        state: "CA".to_string(),
        zip5: "94110".to_string(),
    }
}

#[tokio::test]
async fn test_success_returns_candidates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ZIP_PATH))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("address1=826+Treat+Ave"))
        .and(body_string_contains("city=San+Francisco"))
        .and(body_string_contains("state=CA"))
        .and(body_string_contains("zip=94110"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resultStatus": "SUCCESS",
            "addressList": [{
                "addressLine1": "826 TREAT AVE",
                "city": "SAN FRANCISCO",
                "state": "CA",
                "zip5": "94110",
                "zip4": "2624",
                "countyName": "SAN FRANCISCO"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client_for(&server, "user").zip_by_address(&query()).await.unwrap();
    let address = resp.first_address();
    assert_eq!(address.address_line1, "826 TREAT AVE");
    assert_eq!(address.zip4, "2624");
    assert_eq!(address.county_name, "SAN FRANCISCO");
}

#[tokio::test]
async fn test_not_found_status_maps_to_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ZIP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resultStatus": "ADDRESS NOT FOUND"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server, "user").zip_by_address(&query()).await.unwrap_err();
    assert!(matches!(err, LookupError::AddressNotFound));
}

#[tokio::test]
async fn test_other_status_is_unexpected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ZIP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resultStatus": "SYSTEM ERROR",
            "addressList": []
        })))
        .mount(&server)
        .await;

    let err = client_for(&server, "user").zip_by_address(&query()).await.unwrap_err();
    assert_eq!(err.to_string(), "usps: unexpected result status: 'SYSTEM ERROR'");
}

#[tokio::test]
async fn test_malformed_body_is_a_json_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ZIP_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server, "user").zip_by_address(&query()).await.unwrap_err();
    assert!(matches!(err, LookupError::Json(_)));
}

#[tokio::test]
async fn test_missing_username_sends_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, "");
    for _ in 0..3 {
        let err = client.zip_by_address(&query()).await.unwrap_err();
        assert!(matches!(err, LookupError::MissingUsername));
    }
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_connection_refused_is_an_http_error() {
    let config = UspsConfig::new("user", "secret").with_endpoint("http://127.0.0.1:9/zipByAddress");
    let client = UspsClient::new(config, reqwest::Client::new());

    let err = client.zip_by_address(&query()).await.unwrap_err();
    assert!(matches!(err, LookupError::Http(_)));
}

#[tokio::test]
async fn test_address_verification_sends_xml_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("API", "Verify"))
        .and(query_param_contains("XML", r#"<AddressValidateRequest USERID="user"><Address>"#))
        .and(query_param_contains("XML", "<Address2>6406 Ivy Lane</Address2>"))
        .and(query_param_contains("XML", "<City>Greenbelt</City>"))
        .respond_with(xml_body(
            "<AddressValidateResponse><Address><Address2>6406 IVY LN</Address2><City>GREENBELT</City>\
             <State>MD</State><Zip5>20770</Zip5><Zip4>1441</Zip4></Address></AddressValidateResponse>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let resp = api_client_for(&server, "user")
        .address_verification(&ivy_lane())
        .await
        .unwrap();
    assert_eq!(resp.address.address2, "6406 IVY LN");
    assert_eq!(resp.address.city, "GREENBELT");
    assert_eq!(resp.address.zip5, "20770");
    assert_eq!(resp.address.zip4, "1441");
}

#[tokio::test]
async fn test_address_verification_error_element() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("API", "Verify"))
        .respond_with(xml_body(
            "<AddressValidateResponse><Address><Error><Number>-2147219401</Number>\
             <Source>clsAMS</Source><Description>Address Not Found.</Description>\
             </Error></Address></AddressValidateResponse>",
        ))
        .mount(&server)
        .await;

    let err = api_client_for(&server, "user")
        .address_verification(&ivy_lane())
        .await
        .unwrap_err();
    assert!(matches!(err, LookupError::Api { ref number, .. } if number == "-2147219401"));
    assert_eq!(err.to_string(), "usps: api error: Address Not Found.");
}

#[tokio::test]
async fn test_zip_code_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("API", "ZipCodeLookup"))
        .and(query_param_contains("XML", r#"<ZipCodeLookupRequest USERID="user"><Address>"#))
        .respond_with(xml_body(
            "<ZipCodeLookupResponse><Address><Address2>6406 IVY LN</Address2><City>GREENBELT</City>\
             <State>MD</State><Zip5>20770</Zip5><Zip4>1441</Zip4></Address></ZipCodeLookupResponse>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let resp = api_client_for(&server, "user").zip_code_lookup(&ivy_lane()).await.unwrap();
    assert_eq!(resp.address.zip5, "20770");
    assert_eq!(resp.address.zip4, "1441");
}

#[tokio::test]
async fn test_city_state_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("API", "CityStateLookup"))
        .and(query_param(
            "XML",
            r#"<CityStateLookupRequest USERID="user"><ZipCode><Zip5>90210</Zip5></ZipCode></CityStateLookupRequest>"#,
        ))
        .respond_with(xml_body(
            "<CityStateLookupResponse><ZipCode><Zip5>90210</Zip5><City>BEVERLY HILLS</City>\
             <State>CA</State></ZipCode></CityStateLookupResponse>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let zip = ZipCode {
        zip5: "90210".to_string(),
    };
    let resp = api_client_for(&server, "user").city_state_lookup(&zip).await.unwrap();
    assert_eq!(resp.zip_code.city, "BEVERLY HILLS");
    assert_eq!(resp.zip_code.state, "CA");
}

#[tokio::test]
async fn test_city_state_lookup_invalid_zip() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(xml_body(
            "<CityStateLookupResponse><ZipCode><Error><Number>-2147219399</Number>\
             <Source>WebtoolsAMS</Source><Description>Invalid Zip Code.</Description>\
             </Error></ZipCode></CityStateLookupResponse>",
        ))
        .mount(&server)
        .await;

    let zip = ZipCode {
        zip5: "00000".to_string(),
    };
    let err = api_client_for(&server, "user").city_state_lookup(&zip).await.unwrap_err();
    assert_eq!(err.to_string(), "usps: api error: Invalid Zip Code.");
}

#[tokio::test]
async fn test_authorization_failure_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(xml_body(
            "<Error><Number>80040B1A</Number><Description>Authorization failure.</Description>\
             <Source>USPSCOM::DoAuth</Source></Error>",
        ))
        .mount(&server)
        .await;

    let err = api_client_for(&server, "nobody")
        .zip_code_lookup(&ivy_lane())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "usps: api error: Authorization failure.");
}

#[tokio::test]
async fn test_xml_operations_require_username() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(xml_body("<Error/>"))
        .expect(0)
        .mount(&server)
        .await;

    let client = api_client_for(&server, "");
    let zip = ZipCode {
        zip5: "90210".to_string(),
    };
    assert!(matches!(
        client.address_verification(&ivy_lane()).await.unwrap_err(),
        LookupError::MissingUsername
    ));
    assert!(matches!(
        client.zip_code_lookup(&ivy_lane()).await.unwrap_err(),
        LookupError::MissingUsername
    ));
    assert!(matches!(
        client.city_state_lookup(&zip).await.unwrap_err(),
        LookupError::MissingUsername
    ));
}

#[tokio::test]
async fn test_malformed_xml_is_an_xml_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(xml_body("<AddressValidateResponse><Address><City>X</Zip5>"))
        .mount(&server)
        .await;

    let err = api_client_for(&server, "user")
        .address_verification(&ivy_lane())
        .await
        .unwrap_err();
    assert!(matches!(err, LookupError::Xml(_)));
}
