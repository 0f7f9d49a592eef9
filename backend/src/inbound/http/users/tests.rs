//! Tests for account API handlers.

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{MockSequenceAnalysis, MockUserAccounts};
use crate::inbound::http::test_utils::{sample_user, state_with, test_session_middleware};

#[derive(Debug)]
struct ValidationExpectation<'a> {
    message: &'a str,
    field: &'a str,
    code: &'a str,
}

fn test_app(
    accounts: MockUserAccounts,
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
        .app_data(web::Data::new(state_with(accounts, MockSequenceAnalysis::new())))
        .wrap(test_session_middleware())
        .service(
            web::scope("/user")
                .service(signup)
                .service(login)
                .service(current_user)
                .service(logout),
        )
}

fn session_cookie(response: &actix_web::dev::ServiceResponse) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

async fn json_body(response: actix_web::dev::ServiceResponse) -> Value {
    let body = actix_test::read_body(response).await;
    serde_json::from_slice(&body).expect("JSON body")
}

fn assert_validation(value: &Value, expected: &ValidationExpectation<'_>) {
    assert_eq!(value["code"], "invalid_request");
    assert_eq!(value["message"], expected.message);
    assert_eq!(value["details"]["field"], expected.field);
    assert_eq!(value["details"]["code"], expected.code);
}

#[actix_web::test]
async fn signup_returns_created_profile_without_password() {
    let mut accounts = MockUserAccounts::new();
    accounts
        .expect_sign_up()
        .withf(|request| {
            request.login_id().as_ref() == "rosalind" && request.password() == "photo-51"
        })
        .times(1)
        .return_once(|_| Ok(sample_user("rosalind")));
    let app = actix_test::init_service(test_app(accounts)).await;

    let request = actix_test::TestRequest::post()
        .uri("/user/signup")
        .set_json(json!({
            "firstName": "Rosalind",
            "lastName": "Franklin",
            "loginId": " rosalind ",
            "password": "photo-51",
        }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let value = json_body(response).await;
    assert_eq!(value["loginId"], "rosalind");
    assert_eq!(value["firstName"], "Rosalind");
    assert_eq!(value["lastName"], "Franklin");
    assert!(value.get("password").is_none());
    assert_eq!(value.as_object().map(serde_json::Map::len), Some(4));
}

#[rstest]
#[case(
    json!({"firstName": "R", "lastName": "F", "loginId": "   ", "password": "pw"}),
    ValidationExpectation { message: "login id must not be empty", field: "loginId", code: "empty_login_id" }
)]
#[case(
    json!({"firstName": "R", "lastName": "F", "loginId": "ros alind", "password": "pw"}),
    ValidationExpectation { message: "login id must not contain whitespace", field: "loginId", code: "login_id_whitespace" }
)]
#[case(
    json!({"firstName": " ", "lastName": "F", "loginId": "ros", "password": "pw"}),
    ValidationExpectation { message: "first name must not be empty", field: "firstName", code: "empty_name" }
)]
#[case(
    json!({"firstName": "R", "lastName": "F".repeat(65), "loginId": "ros", "password": "pw"}),
    ValidationExpectation { message: "last name must be at most 64 characters", field: "lastName", code: "too_long" }
)]
#[case(
    json!({"firstName": "R", "lastName": "F", "loginId": "ros", "password": ""}),
    ValidationExpectation { message: "password must not be empty", field: "password", code: "empty_password" }
)]
#[actix_web::test]
async fn signup_rejects_invalid_fields(
    #[case] payload: Value,
    #[case] expected: ValidationExpectation<'_>,
) {
    let mut accounts = MockUserAccounts::new();
    accounts.expect_sign_up().never();
    let app = actix_test::init_service(test_app(accounts)).await;

    let request = actix_test::TestRequest::post()
        .uri("/user/signup")
        .set_json(payload)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_validation(&json_body(response).await, &expected);
}

#[actix_web::test]
async fn duplicate_signup_is_conflict() {
    let mut accounts = MockUserAccounts::new();
    accounts
        .expect_sign_up()
        .return_once(|_| Err(Error::conflict("login id `rosalind` is already taken")));
    let app = actix_test::init_service(test_app(accounts)).await;

    let request = actix_test::TestRequest::post()
        .uri("/user/signup")
        .set_json(&SignupRequest {
            first_name: "Rosalind".into(),
            last_name: "Franklin".into(),
            login_id: "rosalind".into(),
            password: "photo-51".into(),
        })
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(response).await["code"], "conflict");
}

#[rstest]
#[case("   ", "pw", ValidationExpectation { message: "login id must not be empty", field: "loginId", code: "empty_login_id" })]
#[case("rosalind", "", ValidationExpectation { message: "password must not be empty", field: "password", code: "empty_password" })]
#[actix_web::test]
async fn login_rejects_invalid_payloads(
    #[case] login_id: &str,
    #[case] password: &str,
    #[case] expected: ValidationExpectation<'_>,
) {
    let mut accounts = MockUserAccounts::new();
    accounts.expect_authenticate().never();
    let app = actix_test::init_service(test_app(accounts)).await;

    let request = actix_test::TestRequest::post()
        .uri("/user/login")
        .set_json(&LoginRequest {
            login_id: login_id.into(),
            password: password.into(),
        })
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_validation(&json_body(response).await, &expected);
}

#[actix_web::test]
async fn login_rejects_wrong_credentials_with_unauthorised_status() {
    let mut accounts = MockUserAccounts::new();
    accounts
        .expect_authenticate()
        .return_once(|_| Err(Error::unauthorized("invalid credentials")));
    let app = actix_test::init_service(test_app(accounts)).await;

    let request = actix_test::TestRequest::post()
        .uri("/user/login")
        .set_json(&LoginRequest {
            login_id: "rosalind".into(),
            password: "wrong".into(),
        })
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let value = json_body(response).await;
    assert_eq!(value["code"], "unauthorized");
    assert_eq!(value["message"], "invalid credentials");
}

#[actix_web::test]
async fn login_session_unlocks_profile_until_logout() {
    let user = sample_user("rosalind");
    let user_id = *user.id();
    let mut accounts = MockUserAccounts::new();
    let authenticated = user.clone();
    accounts
        .expect_authenticate()
        .return_once(move |_| Ok(authenticated));
    accounts
        .expect_profile()
        .withf(move |id| *id == user_id)
        .times(1)
        .return_once(move |_| Ok(user));
    let app = actix_test::init_service(test_app(accounts)).await;

    let login_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/user/login")
            .set_json(json!({"loginId": "rosalind", "password": "photo-51"}))
            .to_request(),
    )
    .await;
    assert_eq!(login_res.status(), StatusCode::OK);
    let cookie = session_cookie(&login_res);
    let profile: UserProfile =
        serde_json::from_value(json_body(login_res).await).expect("profile body");
    assert_eq!(profile.id, user_id.to_string());

    let me_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/user/me")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(me_res.status(), StatusCode::OK);
    let me: UserProfile = serde_json::from_value(json_body(me_res).await).expect("profile body");
    assert_eq!(me, profile);

    let logout_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/user/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(logout_res.status(), StatusCode::NO_CONTENT);
    let cleared = session_cookie(&logout_res);

    let after_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/user/me")
            .cookie(cleared)
            .to_request(),
    )
    .await;
    assert_eq!(after_res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn profile_without_session_is_unauthorised() {
    let mut accounts = MockUserAccounts::new();
    accounts.expect_profile().never();
    let app = actix_test::init_service(test_app(accounts)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/user/me").to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
