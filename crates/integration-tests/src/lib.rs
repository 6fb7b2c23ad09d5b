//! Shared fixtures for the in-process integration tests.
//!
//! The tests drive the real routers through `tower::ServiceExt::oneshot`
//! against a seeded in-memory store, so the full middleware stack
//! (sessions, extractors, guards, rate-limit key extraction) is exercised
//! without a network or a live database. One `#[ignore]`d smoke suite
//! additionally targets a running deployment over HTTP.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc)]

use std::net::IpAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;

use loanmitra_access::store::{MemoryStore, collections, config_keys};
use loanmitra_access::{DevIdentityProvider, DocumentStore, IdentityHub};
use loanmitra_backoffice::BackofficeConfig;
use loanmitra_site::SiteConfig;

/// Identities present in the seeded fixture.
pub mod fixtures {
    /// Legacy superuser-array member.
    pub const SUPERUSER: &str = "root@loanmitra.in";
    /// Legacy admin allow-list member.
    pub const ALLOWLISTED_ADMIN: &str = "ops@loanmitra.in";
    /// Active `admin_users` document.
    pub const LEGACY_ADMIN: &str = "legacy@loanmitra.in";
    /// Active roster agent (key `agent-asha`, manager `agent-meena`).
    pub const AGENT: &str = "asha@loanmitra.in";
    /// Active roster manager (key `agent-meena`, manager `adm-42`).
    pub const MANAGER: &str = "meena@loanmitra.in";
    /// Valid identity with no registry entry anywhere.
    pub const OUTSIDER: &str = "visitor@example.com";
}

/// Client IP injected so the site rate limiters can key the request.
pub const CLIENT_IP: &str = "203.0.113.10";

/// A store populated with every registry generation plus roster, branch
/// and lead data. Mirrors a small production snapshot.
pub async fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());

    store
        .put(
            collections::CONFIG,
            config_keys::SUPERUSERS,
            json!({ "emails": [fixtures::SUPERUSER] }),
        )
        .await
        .expect("seed superusers");
    store
        .put(
            collections::CONFIG,
            config_keys::ADMIN_ALLOWLIST,
            json!({ "admin_emails": [fixtures::ALLOWLISTED_ADMIN] }),
        )
        .await
        .expect("seed admin allow-list");
    store
        .put(
            collections::ADMIN_USERS,
            fixtures::LEGACY_ADMIN,
            json!({
                "email": fixtures::LEGACY_ADMIN,
                "name": "Legacy Admin",
                "status": "active",
            }),
        )
        .await
        .expect("seed admin_users");

    store
        .put(
            collections::AGENTS,
            "agent-asha",
            json!({
                "agent_code": "AGT-104",
                "name": "Asha Verma",
                "email": fixtures::AGENT,
                "role": "agent",
                "manager_id": "agent-meena",
                "status": "active",
                "created_at": "2024-03-01T09:00:00Z",
            }),
        )
        .await
        .expect("seed agent");
    store
        .put(
            collections::AGENTS,
            "agent-meena",
            json!({
                "agent_code": "MGR-001",
                "name": "Meena Rao",
                "email": fixtures::MANAGER,
                "role": "manager",
                "manager_id": "adm-42",
                "status": "active",
                "created_at": "2024-01-15T09:00:00Z",
            }),
        )
        .await
        .expect("seed manager");
    store
        .put(
            collections::ADMINS,
            "adm-42",
            json!({ "email": "vikram@loanmitra.in", "name": "Vikram Shah", "status": "active" }),
        )
        .await
        .expect("seed admins");

    store
        .put(
            collections::BRANCHES,
            "branch-del-01",
            json!({
                "name": "Connaught Place",
                "address": "12 Barakhamba Road",
                "city": "New Delhi",
                "state": "Delhi",
                "phone": "+91-11-4000-0000",
                "status": "active",
                "created_at": "2023-06-01T09:00:00Z",
            }),
        )
        .await
        .expect("seed branch");
    store
        .put(
            collections::BRANCHES,
            "branch-old-09",
            json!({
                "name": "Closed Pilot Office",
                "address": "1 Old Lane",
                "city": "Pune",
                "state": "Maharashtra",
                "status": "inactive",
                "created_at": "2022-01-01T09:00:00Z",
            }),
        )
        .await
        .expect("seed inactive branch");

    store
        .put(
            collections::LEADS,
            "0000000000001-aaaa",
            json!({
                "category": "loan",
                "created_at": "2024-03-01T10:00:00Z",
                "data": { "name": "First Caller", "phone": "9000000001" },
            }),
        )
        .await
        .expect("seed lead");
    store
        .put(
            collections::LEADS,
            "0000000000002-bbbb",
            json!({
                "category": "contact",
                "created_at": "2024-03-01T11:00:00Z",
                "data": { "name": "Second Caller", "email": "caller@example.com" },
            }),
        )
        .await
        .expect("seed lead");

    store
}

/// Backoffice configuration for in-process tests. The secret clears the
/// entropy and placeholder checks applied to the env-loaded one.
#[must_use]
pub fn backoffice_config() -> BackofficeConfig {
    BackofficeConfig {
        database_url: SecretString::from("postgres://localhost/loanmitra_test"),
        host: IpAddr::from([127, 0, 0, 1]),
        port: 0,
        base_url: "http://localhost:3001".to_owned(),
        session_secret: SecretString::from("k9QX2mv7Rw4tUzhJ3bN6pLs1aYd5feCg"),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

#[must_use]
pub fn site_config() -> SiteConfig {
    SiteConfig {
        database_url: SecretString::from("postgres://localhost/loanmitra_test"),
        host: IpAddr::from([127, 0, 0, 1]),
        port: 0,
        base_url: "http://localhost:3000".to_owned(),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Backoffice router over a freshly seeded store, with the dev identity
/// provider wired in. The store is returned alongside for direct asserts.
pub async fn backoffice_app() -> (Router, Arc<MemoryStore>) {
    let store = seeded_store().await;
    let identity = IdentityHub::new(Some(Arc::new(DevIdentityProvider)));
    let state = loanmitra_backoffice::AppState::new(
        backoffice_config(),
        Arc::clone(&store) as Arc<dyn DocumentStore>,
        identity,
    );
    (loanmitra_backoffice::app(state), store)
}

/// Site router over a freshly seeded store.
pub async fn site_app() -> (Router, Arc<MemoryStore>) {
    let store = seeded_store().await;
    let state = loanmitra_site::AppState::new(
        site_config(),
        Arc::clone(&store) as Arc<dyn DocumentStore>,
    );
    (loanmitra_site::app(state), store)
}

#[must_use]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

#[must_use]
pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[must_use]
pub fn patch_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("PATCH")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

/// Attach the proxy client-IP header the site rate limiters key on.
#[must_use]
pub fn from_client_ip(mut req: Request<Body>) -> Request<Body> {
    req.headers_mut().insert(
        "x-forwarded-for",
        CLIENT_IP.parse().expect("header value"),
    );
    req
}

/// Attach a session cookie obtained from [`sign_in`].
#[must_use]
pub fn with_session(mut req: Request<Body>, cookie: &str) -> Request<Body> {
    req.headers_mut()
        .insert(header::COOKIE, cookie.parse().expect("header value"));
    req
}

/// Drive one request through the router.
pub async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
    app.clone().oneshot(req).await.expect("router is infallible")
}

/// Sign in through the real login endpoint and return the session cookie
/// pair (`name=value`) for follow-up requests.
pub async fn sign_in(app: &Router, assertion: &str) -> String {
    let response = send(
        app,
        post_json("/api/auth/login", &json!({ "assertion": assertion })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "login should succeed");
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login sets a session cookie")
        .to_str()
        .expect("ascii cookie")
        .split(';')
        .next()
        .expect("cookie pair")
        .to_owned()
}

/// Collect and parse a JSON response body.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

/// Collect a response body as text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}
