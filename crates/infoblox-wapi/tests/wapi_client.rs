//! End-to-end tests for the WAPI client against a mock HTTP server.

use infoblox_wapi::{
    DhcpOption, Error, HttpMethod, RecordData, RecordType, WapiClient, WapiConfig, WapiResponse,
};
use serde_json::json;
use wiremock::matchers::{basic_auth, body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MEMBER_REF: &str = "member/b25lLnZpcnR1YWxfbm9kZSQw:grid.example.com";
const NETWORK_REF: &str =
    "network/ZG5zLm5ldHdvcmskMTAuMjI0LjI1NC4wLzI4LzA:10.224.254.0/28/default";
const HOST_REF: &str =
    "record:host/ZG5zLmhvc3QkLl9kZWZhdWx0LmNvbS5leGFtcGxlLm15aG9zdA:myhost.example.com/default";

fn client(server: &MockServer) -> WapiClient {
    WapiClient::new(server.uri(), "admin", "secret").unwrap()
}

fn quoted(value: &str) -> String {
    format!("\"{value}\"")
}

#[tokio::test]
async fn create_network_posts_bare_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/wapi/v1.2.1/network"))
        .and(basic_auth("admin", "secret"))
        .and(body_json(json!({"network": "10.224.254.0/28"})))
        .respond_with(ResponseTemplate::new(201).set_body_string(quoted(NETWORK_REF)))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server)
        .create_network("10.224.254.0/28", None, &[])
        .await
        .unwrap();

    assert!(response.is_confirmed());
    assert_eq!(response.object_ref().unwrap().as_str(), NETWORK_REF);
}

#[tokio::test]
async fn create_network_with_member_and_options() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/wapi/v1.2.1/network"))
        .and(body_json(json!({
            "network": "10.224.254.0/28",
            "options": [
                {"name": "routers", "value": "10.224.254.1"},
                {"name": "domain-name", "value": "ictest.local", "use_option": true}
            ],
            "members": [{"_struct": "dhcpmember", "ipv4addr": "10.224.43.36"}]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_string(quoted(NETWORK_REF)))
        .expect(1)
        .mount(&server)
        .await;

    let options = [
        DhcpOption::new("routers", "10.224.254.1"),
        DhcpOption::new("domain-name", "ictest.local").with_use_option(true),
    ];
    let response = client(&server)
        .create_network("10.224.254.0/28", Some("10.224.43.36"), &options)
        .await
        .unwrap();
    assert!(response.is_confirmed());
}

#[tokio::test]
async fn execute_returns_json_when_body_is_not_an_echo() {
    let server = MockServer::start().await;
    let body = json!([{"_ref": MEMBER_REF, "host_name": "grid.example.com"}]);
    Mock::given(method("GET"))
        .and(path("/wapi/v1.2.1/member"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .mount(&server)
        .await;

    let response = client(&server)
        .execute("member", &json!({}), HttpMethod::Get)
        .await
        .unwrap();
    assert_eq!(response, WapiResponse::Json(body));
}

#[tokio::test]
async fn execute_treats_quoted_path_as_confirmation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/wapi/v1.2.1/record:a"))
        .respond_with(ResponseTemplate::new(200).set_body_string(quoted("record:a")))
        .mount(&server)
        .await;

    let response = client(&server)
        .execute(
            "record:a",
            &json!({"name": "a.example.com", "ipv4addr": "10.0.0.1"}),
            HttpMethod::Post,
        )
        .await
        .unwrap();
    assert!(response.is_confirmed());
}

#[tokio::test]
async fn remote_error_carries_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wapi/v1.2.1/network"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"text": "not found"})))
        .mount(&server)
        .await;

    let err = client(&server).get_network("10.0.0.0/8").await.unwrap_err();
    assert_eq!(
        err,
        Error::RemoteApi {
            status: 404,
            message: "not found".to_string()
        }
    );
}

#[tokio::test]
async fn remote_error_on_other_statuses() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/wapi/v1.2.1/range"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "Error": "AdmConDataError: None (IBDataConflictError: IB.Data.Conflict:Duplicate object)",
            "code": "Client.Ibap.Data.Conflict",
            "text": "The range 10.224.254.4-10.224.254.14 overlaps an existing range"
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .network_range("10.224.254.0/28", "10.224.254.4", "10.224.254.14")
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert!(err.to_string().contains("overlaps an existing range"));
}

#[tokio::test]
async fn unreadable_error_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wapi/v1.2.1/member"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string("<html>Authorization Required</html>"),
        )
        .mount(&server)
        .await;

    let err = client(&server).get_grid_members().await.unwrap_err();
    assert!(matches!(err, Error::MalformedResponse(_)));
}

#[tokio::test]
async fn unsupported_record_type_never_reaches_server() {
    let server = MockServer::start().await;

    let client = client(&server);
    assert!(matches!(
        client.get_record("example.com", "NS").await,
        Err(Error::UnsupportedRecordType(_))
    ));
    assert!(matches!(
        client.create_record("CAA", "example.com", "0 issue \"ca.example.net\"").await,
        Err(Error::UnsupportedRecordType(_))
    ));

    let requests = server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn create_mx_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/wapi/v1.2.1/record:mx"))
        .and(body_json(json!({
            "name": "myhost.example.com",
            "mail_exchanger": "10.0.0.1",
            "preference": 20
        })))
        .respond_with(ResponseTemplate::new(201).set_body_string(quoted(
            "record:mx/ZG5zLmJpbmRfbXgkLl9kZWZhdWx0:myhost.example.com/default",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server)
        .create_record("MX", "myhost.example.com", RecordData::mx("10.0.0.1", 20))
        .await
        .unwrap();
    assert!(response.is_confirmed());
}

#[tokio::test]
async fn create_host_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/wapi/v1.2.1/record:host"))
        .and(body_json(json!({
            "name": "myhost.example.com",
            "ipv4addrs": [{"ipv4addr": "10.0.0.3"}]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_string(quoted(HOST_REF)))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .create_record(RecordType::Host, "myhost.example.com", "10.0.0.3")
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_record_deletes_resolved_reference() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wapi/v1.2.1/record:host"))
        .and(body_json(json!({"name": "myhost.example.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "_ref": HOST_REF,
            "name": "myhost.example.com",
            "ipv4addrs": [{"ipv4addr": "10.0.0.1", "configure_for_dhcp": false}],
            "view": "default"
        }])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/wapi/v1.2.1/{HOST_REF}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(quoted(HOST_REF)))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server)
        .delete_record("myhost.example.com", "host")
        .await
        .unwrap();
    assert!(response.is_confirmed());
}

#[tokio::test]
async fn delete_missing_record_sends_no_delete() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wapi/v1.2.1/record:a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server)
        .delete_record("gone.example.com", "A")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::RecordNotFound(_)));
}

#[tokio::test]
async fn get_next_ip_uses_network_reference() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wapi/v1.2.1/network"))
        .and(body_json(json!({"network": "10.224.254.0/28"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "_ref": NETWORK_REF,
            "network": "10.224.254.0/28",
            "network_view": "default",
            "comment": "lab"
        }])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/wapi/v1.2.1/{NETWORK_REF}").as_str()))
        .and(query_param("_function", "next_available_ip"))
        .and(body_json(json!({"num": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ips": ["10.224.254.2", "10.224.254.3"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let next = client(&server).get_next_ip("10.224.254.0/28", 2).await.unwrap();
    assert_eq!(
        next.ips,
        vec![
            "10.224.254.2".parse::<std::net::IpAddr>().unwrap(),
            "10.224.254.3".parse().unwrap()
        ]
    );
}

#[tokio::test]
async fn get_next_ip_unknown_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wapi/v1.2.1/network"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server).get_next_ip("10.99.0.0/24", 1).await.unwrap_err();
    assert!(matches!(err, Error::NetworkNotFound(_)));
}

#[tokio::test]
async fn create_fixed_address_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/wapi/v1.2.1/fixedaddress"))
        .and(body_json(json!({
            "name": "ops-test1.example.com",
            "ipv4addr": "10.224.253.1",
            "mac": "90:b1:1c:71:86:e6",
            "comment": "rack 12"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_string(quoted(
            "fixedaddress/ZG5zLmZpeGVkX2FkZHJlc3MkMTAuMjI0LjI1My4xLjAuLg:10.224.253.1/default",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server)
        .create_fixed_address(
            "ops-test1.example.com",
            "10.224.253.1",
            "90:b1:1c:71:86:e6",
            "rack 12",
        )
        .await
        .unwrap();
    assert!(response.is_confirmed());
}

#[tokio::test]
async fn configured_version_changes_base_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wapi/v2.12/member"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_ref": MEMBER_REF, "host_name": "grid.example.com"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let config = WapiConfig::new(server.uri(), "admin", "secret")
        .unwrap()
        .with_version("2.12")
        .with_timeout(5);
    let client = WapiClient::from_config(config).unwrap();
    assert_eq!(
        client.base_url().as_str(),
        format!("{}/wapi/v2.12/", server.uri())
    );

    let members = client.get_grid_members().await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].host_name.as_deref(), Some("grid.example.com"));
}
