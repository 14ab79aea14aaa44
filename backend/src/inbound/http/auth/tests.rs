//! Tests for the account handlers.

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use rstest::{fixture, rstest};
use serde_json::Value;

use super::*;
use crate::domain::ports::{MockAccountService, MockJobCommand, MockJobQuery};
use crate::domain::{EmailAddress, PhoneNumber, Rating, UserId, UserName};
use crate::inbound::http::test_utils::{mock_state, session_cookie, test_session_middleware};

#[fixture]
fn profile() -> UserProfile {
    UserProfile {
        id: UserId::random(),
        name: UserName::new("Ada").expect("valid name"),
        email: EmailAddress::new("ada@example.com").expect("valid email"),
        phone_number: PhoneNumber::new("555").expect("valid phone"),
        rating: Rating::default(),
        completed_jobs: 0,
        created_jobs: 0,
    }
}

fn test_app(
    accounts: MockAccountService,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(mock_state(
            MockJobCommand::new(),
            MockJobQuery::new(),
            accounts,
        ))
        .wrap(test_session_middleware())
        .service(
            web::scope("/api/v1")
                .service(register)
                .service(login)
                .service(logout)
                .service(me),
        )
}

fn register_body(password: &str) -> RegisterRequest {
    RegisterRequest {
        name: "Ada".into(),
        email: "ada@example.com".into(),
        password: password.into(),
        phone_number: "555".into(),
    }
}

#[rstest]
#[actix_web::test]
async fn register_starts_a_session(profile: UserProfile) {
    let user_id = profile.id.clone();
    let me_profile = profile.clone();
    let mut accounts = MockAccountService::new();
    accounts
        .expect_register()
        .withf(|request: &RegistrationRequest| request.email().as_ref() == "ada@example.com")
        .times(1)
        .return_once(move |_| Ok(profile));
    accounts
        .expect_profile()
        .withf(move |id: &UserId| *id == user_id)
        .return_once(move |_| Ok(me_profile));
    let app = actix_test::init_service(test_app(accounts)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(register_body("secret"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let cookie = session_cookie(&res);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["email"], "ada@example.com");
    assert_eq!(body["completedJobs"], 0);
    assert_eq!(body["rating"], 0.0);
    assert!(body.get("passwordHash").is_none());

    let me_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/auth/me")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(me_res.status(), StatusCode::OK);
}

#[rstest]
#[case::short_password("ab", "password")]
#[case::blank_name("secret", "name")]
#[actix_web::test]
async fn register_rejects_invalid_payload(#[case] password: &str, #[case] field: &str) {
    let mut accounts = MockAccountService::new();
    accounts.expect_register().times(0);
    let app = actix_test::init_service(test_app(accounts)).await;

    let mut body = register_body(password);
    if field == "name" {
        body.name = "   ".into();
    }
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(body)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], field);
}

#[rstest]
#[actix_web::test]
async fn login_with_bad_credentials_is_unauthorised() {
    let mut accounts = MockAccountService::new();
    accounts
        .expect_authenticate()
        .return_once(|_| Err(Error::unauthorized("invalid credentials")));
    accounts.expect_profile().times(0);
    let app = actix_test::init_service(test_app(accounts)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(LoginRequest {
                email: "ada@example.com".into(),
                password: "wrong".into(),
            })
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(
        res.response()
            .cookies()
            .all(|cookie| cookie.name() != "session")
    );
}

#[rstest]
#[actix_web::test]
async fn login_rejects_blank_email() {
    let mut accounts = MockAccountService::new();
    accounts.expect_authenticate().times(0);
    let app = actix_test::init_service(test_app(accounts)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(LoginRequest {
                email: "  ".into(),
                password: "secret".into(),
            })
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], "email");
}

#[rstest]
#[actix_web::test]
async fn me_requires_login() {
    let mut accounts = MockAccountService::new();
    accounts.expect_profile().times(0);
    let app = actix_test::init_service(test_app(accounts)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/auth/me")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn logout_ends_the_session(profile: UserProfile) {
    let user_id = profile.id.clone();
    let mut accounts = MockAccountService::new();
    accounts
        .expect_authenticate()
        .return_once(move |_| Ok(user_id));
    accounts.expect_profile().times(1).return_once(move |_| Ok(profile));
    let app = actix_test::init_service(test_app(accounts)).await;

    let login_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(LoginRequest {
                email: "ada@example.com".into(),
                password: "secret".into(),
            })
            .to_request(),
    )
    .await;
    assert_eq!(login_res.status(), StatusCode::OK);
    let cookie = session_cookie(&login_res);

    let logout_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(logout_res.status(), StatusCode::NO_CONTENT);
    let cleared = session_cookie(&logout_res);

    let me_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/auth/me")
            .cookie(cleared)
            .to_request(),
    )
    .await;
    assert_eq!(me_res.status(), StatusCode::UNAUTHORIZED);
}
