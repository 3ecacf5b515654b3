// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use ec2_tags::imds::{IDENTITY_DOCUMENT_PATH, TOKEN_PATH};
use ec2_tags::{run, Config, Error, ImdsConfig};
use mockito::{Matcher, Mock, ServerGuard};
use serial_test::serial;
use std::env;

const INSTANCE_ID: &str = "i-0a1b2c3d4e5f60718";

const DESCRIBE_TAGS_RESPONSE: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
    <DescribeTagsResponse xmlns=\"http://ec2.amazonaws.com/doc/2016-11-15/\">\
    <requestId>7a62c49f-347e-4fc4-9331-6e8eEXAMPLE</requestId><tagSet>\
    <item><resourceId>i-0a1b2c3d4e5f60718</resourceId><resourceType>instance</resourceType><key>Name</key><value>myhost</value></item>\
    <item><resourceId>i-0a1b2c3d4e5f60718</resourceId><resourceType>instance</resourceType><key>Env</key><value>prod</value></item>\
    </tagSet></DescribeTagsResponse>";

fn use_static_credentials() {
    env::set_var("AWS_ACCESS_KEY_ID", "AKIDENVIRONMENT");
    env::set_var("AWS_SECRET_ACCESS_KEY", "secret");
    env::remove_var("AWS_SESSION_TOKEN");
    env::remove_var("AWS_PROFILE");
}

async fn mock_imds(server: &mut ServerGuard) -> Vec<Mock> {
    let token = server
        .mock("PUT", TOKEN_PATH)
        .with_status(200)
        .with_body("session-token")
        .create_async()
        .await;
    let document = server
        .mock("GET", IDENTITY_DOCUMENT_PATH)
        .with_status(200)
        .with_body(format!(
            r#"{{"instanceId":"{INSTANCE_ID}","region":"ap-northeast-1"}}"#
        ))
        .create_async()
        .await;
    vec![token, document]
}

async fn mock_describe_tags(server: &mut ServerGuard) -> Mock {
    server
        .mock("POST", "/")
        .match_body(Matcher::Regex(format!("Filter.1.Value.1={INSTANCE_ID}")))
        .with_status(200)
        .with_header("content-type", "text/xml;charset=UTF-8")
        .with_body(DESCRIBE_TAGS_RESPONSE)
        .expect(1)
        .create_async()
        .await
}

fn config(server: &ServerGuard, profile: &str, endpoint: String, key: &str) -> Config {
    Config::new(
        profile.to_string(),
        "ap-northeast-1".to_string(),
        endpoint,
        key.to_string(),
        ImdsConfig {
            endpoint: server.url(),
            disabled: false,
        },
    )
}

#[tokio::test]
#[serial]
async fn run_prints_all_tags_as_json() {
    use_static_credentials();
    let mut server = mockito::Server::new_async().await;
    let _imds = mock_imds(&mut server).await;
    let describe_tags = mock_describe_tags(&mut server).await;

    let mut out = Vec::new();
    run(&config(&server, "", server.url(), ""), &mut out)
        .await
        .expect("run should succeed");

    describe_tags.assert_async().await;
    assert_eq!(
        String::from_utf8(out).unwrap(),
        r#"{"tags":[{"key":"Name","value":"myhost"},{"key":"Env","value":"prod"}]}"#
    );
}

#[tokio::test]
#[serial]
async fn run_prints_single_value() {
    use_static_credentials();
    let mut server = mockito::Server::new_async().await;
    let _imds = mock_imds(&mut server).await;
    let _describe_tags = mock_describe_tags(&mut server).await;

    let mut out = Vec::new();
    run(&config(&server, "", server.url(), "Env"), &mut out)
        .await
        .expect("run should succeed");

    assert_eq!(String::from_utf8(out).unwrap(), "prod");
}

#[tokio::test]
#[serial]
async fn run_missing_key_prints_nothing() {
    use_static_credentials();
    let mut server = mockito::Server::new_async().await;
    let _imds = mock_imds(&mut server).await;
    let _describe_tags = mock_describe_tags(&mut server).await;

    let mut out = Vec::new();
    run(&config(&server, "", server.url(), "Owner"), &mut out)
        .await
        .expect("missing key is not an error");

    assert!(out.is_empty());
}

#[tokio::test]
#[serial]
async fn run_fails_when_api_is_unreachable() {
    use_static_credentials();
    let mut server = mockito::Server::new_async().await;
    let _imds = mock_imds(&mut server).await;

    let mut out = Vec::new();
    let err = run(
        &config(&server, "", "http://127.0.0.1:1".to_string(), ""),
        &mut out,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::DescribeTags(_)));
    assert_eq!(err.exit_code(), 1);
    assert!(out.is_empty());
}

#[tokio::test]
#[serial]
async fn run_fails_when_metadata_is_unavailable() {
    use_static_credentials();
    let mut server = mockito::Server::new_async().await;
    let _token = server
        .mock("PUT", TOKEN_PATH)
        .with_status(404)
        .create_async()
        .await;
    let _document = server
        .mock("GET", IDENTITY_DOCUMENT_PATH)
        .with_status(404)
        .create_async()
        .await;
    let describe_tags = server
        .mock("POST", "/")
        .expect(0)
        .create_async()
        .await;

    let mut out = Vec::new();
    let err = run(&config(&server, "", server.url(), ""), &mut out)
        .await
        .unwrap_err();

    describe_tags.assert_async().await;
    assert_eq!(err.exit_code(), 3);
    assert!(out.is_empty());
}

#[tokio::test]
#[serial]
async fn run_signs_with_named_profile() {
    env::remove_var("AWS_ACCESS_KEY_ID");
    env::remove_var("AWS_SECRET_ACCESS_KEY");
    env::remove_var("AWS_SESSION_TOKEN");

    let dir = tempfile::tempdir().unwrap();
    let credentials = dir.path().join("credentials");
    std::fs::write(
        &credentials,
        "[default]\naws_access_key_id = AKIDDEFAULT\naws_secret_access_key = secret\n\n\
         [tagreader]\naws_access_key_id = AKIDTAGREADER\naws_secret_access_key = secret\n",
    )
    .unwrap();
    env::set_var("AWS_SHARED_CREDENTIALS_FILE", &credentials);
    env::set_var("AWS_CONFIG_FILE", dir.path().join("config"));

    let mut server = mockito::Server::new_async().await;
    let _imds = mock_imds(&mut server).await;
    let describe_tags = server
        .mock("POST", "/")
        .match_header(
            "authorization",
            Matcher::Regex("Credential=AKIDTAGREADER/".to_string()),
        )
        .with_status(200)
        .with_header("content-type", "text/xml;charset=UTF-8")
        .with_body(DESCRIBE_TAGS_RESPONSE)
        .expect(1)
        .create_async()
        .await;

    let mut out = Vec::new();
    let result = run(&config(&server, "tagreader", server.url(), "Name"), &mut out).await;

    env::remove_var("AWS_SHARED_CREDENTIALS_FILE");
    env::remove_var("AWS_CONFIG_FILE");

    result.expect("run should succeed with profile credentials");
    describe_tags.assert_async().await;
    assert_eq!(String::from_utf8(out).unwrap(), "myhost");
}
