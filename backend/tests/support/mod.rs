//! Shared HTTP harness for end-to-end marketplace tests.

use std::sync::Arc;

use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{Method, StatusCode};
use actix_web::{test, web};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};

use marketplace::domain::DEFAULT_JOB_LIFETIME;
use marketplace::inbound::http::health::HealthState;
use marketplace::inbound::http::session_config::SessionSettings;
use marketplace::server::{AppDependencies, build_app, build_http_state};
use marketplace::test_support::clock::MutableClock;

/// Fixed starting instant for deterministic timestamps.
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub fn clock() -> Arc<MutableClock> {
    Arc::new(MutableClock::new(start_time()))
}

/// Initialise the full application over a fresh in-memory store.
pub async fn spawn_app(
    clock: Arc<MutableClock>,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    let deps = AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state: build_http_state(clock, DEFAULT_JOB_LIFETIME),
        session: SessionSettings {
            key: Key::generate(),
            cookie_secure: false,
            same_site: SameSite::Lax,
        },
    };
    test::init_service(build_app(deps)).await
}

/// Issue a request and decode the JSON body, if any.
pub async fn send(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    method: Method,
    uri: &str,
    cookie: Option<&Cookie<'static>>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = test::TestRequest::default().method(method).uri(uri);
    if let Some(cookie) = cookie {
        req = req.cookie(cookie.clone());
    }
    if let Some(body) = body {
        req = req.set_json(body);
    }
    let res = test::call_service(app, req.to_request()).await;
    let status = res.status();
    let bytes = test::read_body(res).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, value)
}

/// A registered user with a live session cookie.
pub struct Account {
    pub id: String,
    pub cookie: Cookie<'static>,
}

pub async fn register(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    name: &str,
) -> Account {
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({
            "name": name,
            "email": format!("{}@example.com", name.to_lowercase()),
            "password": "correct horse",
            "phoneNumber": "555 0100",
        }))
        .to_request();
    let res = test::call_service(app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED, "register {name}");
    let cookie = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie");
    let body: Value = test::read_body_json(res).await;
    Account {
        id: body["id"].as_str().expect("user id").to_owned(),
        cookie,
    }
}

pub fn job_body() -> Value {
    json!({
        "title": "Walk the dog",
        "description": "Forty minutes around the park",
        "category": "Other",
        "reward": 12.5,
        "location": {"address": "5 Park Road", "coordinates": [-2.24, 53.48]},
        "timeEstimate": "1 hour"
    })
}

/// Post [`job_body`] as `creator` and return the new job's id.
pub async fn create_job(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    creator: &Account,
    body: Value,
) -> String {
    let (status, job) = send(app, Method::POST, "/api/v1/jobs", Some(&creator.cookie), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "create job: {job}");
    job["id"].as_str().expect("job id").to_owned()
}
