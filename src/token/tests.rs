use serde_json::json;

use super::*;
use crate::testing::{FakeServer, time};

const TOKEN_ID: &str = "3a6b94b5-d20e-40bd-a7cc-521f5c79fab3";

fn default_subnets() -> Option<Vec<String>> {
    Some(vec!["0.0.0.0/0".to_string(), "::/0".to_string()])
}

#[test]
fn create() {
    let server = FakeServer::new();
    server.route(
        Method::POST,
        "auth/tokens/",
        StatusCode::CREATED,
        include_str!("../../fixtures/tokens_create.json"),
    );

    let token = server.client().tokens().create("my new token").unwrap();

    assert_eq!(
        token,
        Token {
            id: TOKEN_ID.to_string(),
            name: "my new token".to_string(),
            value: Some("4pnk7u-NHvrEkFzrhFDRTjGFyX_S".to_string()),
            is_valid: true,
            allowed_subnets: default_subnets(),
            max_age: Some("365 00:00:00".to_string()),
            owner: Some("youremailaddress@example.com".to_string()),
            created: Some(time("2018-09-06T09:08:43.762697Z")),
            ..Default::default()
        }
    );
    assert_eq!(server.last_body(), json!({"name": "my new token"}));
}

#[test]
fn create_with_permissions() {
    let server = FakeServer::new();
    server.route(
        Method::POST,
        "auth/tokens/",
        StatusCode::CREATED,
        include_str!("../../fixtures/tokens_create.json"),
    );

    let template = Token {
        name: "dyndns".to_string(),
        perm_create_domain: true,
        allowed_subnets: Some(vec!["192.0.2.0/24".to_string()]),
        auto_policy: true,
        max_unused_period: Some("30 00:00:00".to_string()),
        ..Default::default()
    };
    server.client().tokens().create_with(&template).unwrap();

    assert_eq!(
        server.last_body(),
        json!({
            "name": "dyndns",
            "perm_create_domain": true,
            "perm_delete_domain": false,
            "perm_manage_tokens": false,
            "allowed_subnets": ["192.0.2.0/24"],
            "auto_policy": true,
            "max_age": null,
            "max_unused_period": "30 00:00:00",
        })
    );
}

#[test]
fn get_all() {
    let server = FakeServer::new();
    server.route(
        Method::GET,
        "auth/tokens/",
        StatusCode::OK,
        include_str!("../../fixtures/tokens_getall.json"),
    );

    let tokens = server.client().tokens().get_all().unwrap();

    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].id, "3159e485-5499-46c0-ae2b-aeb84d627a8e");
    assert_eq!(tokens[0].name, "login");
    assert!(tokens[0].perm_manage_tokens);
    assert_eq!(
        tokens[0].last_used,
        Some(time("2020-12-18T10:21:44.114826Z"))
    );
    assert_eq!(tokens[0].value, None);
    assert_eq!(tokens[1].name, "sample");
    assert!(tokens[1].auto_policy);
    assert_eq!(tokens[1].last_used, None);
}

#[test]
fn get() {
    let server = FakeServer::new();
    server.route(
        Method::GET,
        &format!("auth/tokens/{TOKEN_ID}/"),
        StatusCode::OK,
        include_str!("../../fixtures/tokens_create.json"),
    );

    let token = server.client().tokens().get(TOKEN_ID).unwrap().unwrap();
    assert_eq!(token.id, TOKEN_ID);
}

#[test]
fn get_missing_is_none() {
    let server = FakeServer::new();

    let token = server.client().tokens().get("nope").unwrap();
    assert_eq!(token, None);
}

#[test]
fn get_other_errors_propagate() {
    let server = FakeServer::new();
    server.route(
        Method::GET,
        "auth/tokens/forbidden/",
        StatusCode::FORBIDDEN,
        r#"{"detail":"You do not have permission to perform this action."}"#,
    );

    let err = server.client().tokens().get("forbidden").unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
}

#[test]
fn update_sends_only_writable_fields() {
    let server = FakeServer::new();
    server.route(
        Method::PATCH,
        &format!("auth/tokens/{TOKEN_ID}/"),
        StatusCode::OK,
        include_str!("../../fixtures/tokens_update.json"),
    );

    let change = Token {
        id: "ignored".to_string(),
        name: "renamed".to_string(),
        value: Some("secret".to_string()),
        perm_create_domain: true,
        allowed_subnets: Some(vec!["192.0.2.0/24".to_string()]),
        owner: Some("someone@example.com".to_string()),
        created: Some(time("2018-09-06T09:08:43.762697Z")),
        ..Default::default()
    };
    let updated = server.client().tokens().update(TOKEN_ID, &change).unwrap();

    assert_eq!(updated.name, "renamed");
    assert!(updated.perm_create_domain);
    assert_eq!(updated.allowed_subnets, Some(vec!["192.0.2.0/24".to_string()]));
    assert_eq!(
        server.last_body(),
        json!({
            "name": "renamed",
            "perm_create_domain": true,
            "perm_delete_domain": false,
            "perm_manage_tokens": false,
            "allowed_subnets": ["192.0.2.0/24"],
            "auto_policy": false,
            "max_age": null,
            "max_unused_period": null,
        })
    );
}

#[test]
fn update_can_clear_allowed_subnets() {
    let server = FakeServer::new();
    server.route(
        Method::PATCH,
        &format!("auth/tokens/{TOKEN_ID}/"),
        StatusCode::OK,
        include_str!("../../fixtures/tokens_update.json"),
    );

    let change = Token {
        name: "locked".to_string(),
        allowed_subnets: Some(Vec::new()),
        ..Default::default()
    };
    server.client().tokens().update(TOKEN_ID, &change).unwrap();

    assert_eq!(server.last_body()["allowed_subnets"], json!([]));
}

#[test]
fn unset_allowed_subnets_are_not_sent() {
    let server = FakeServer::new();
    server.route(
        Method::PATCH,
        &format!("auth/tokens/{TOKEN_ID}/"),
        StatusCode::OK,
        include_str!("../../fixtures/tokens_update.json"),
    );

    let change = Token {
        name: "renamed".to_string(),
        ..Default::default()
    };
    server.client().tokens().update(TOKEN_ID, &change).unwrap();

    assert!(server.last_body().get("allowed_subnets").is_none());
}

#[test]
fn delete() {
    let server = FakeServer::new();
    server.route(
        Method::DELETE,
        &format!("auth/tokens/{TOKEN_ID}/"),
        StatusCode::NO_CONTENT,
        "",
    );

    server.client().tokens().delete(TOKEN_ID).unwrap();
}
