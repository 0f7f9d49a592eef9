//! Account API handlers.
//!
//! ```text
//! POST /user/signup {"firstName":"Rosalind","lastName":"Franklin","loginId":"rosalind","password":"photo-51"}
//! POST /user/login {"loginId":"rosalind","password":"photo-51"}
//! GET /user/me
//! POST /user/logout
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{
    Error, LoginCredentials, LoginValidationError, SignUp, SignUpValidationError, User,
    UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::AccountSession;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::field_error;

/// Signup request body for `POST /user/signup`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[schema(example = "Rosalind")]
    pub first_name: String,
    #[schema(example = "Franklin")]
    pub last_name: String,
    #[schema(example = "rosalind")]
    pub login_id: String,
    pub password: String,
}

impl TryFrom<SignupRequest> for SignUp {
    type Error = SignUpValidationError;

    fn try_from(value: SignupRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            &value.login_id,
            &value.first_name,
            &value.last_name,
            &value.password,
        )
    }
}

/// Login request body for `POST /user/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "rosalind")]
    pub login_id: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.login_id, &value.password)
    }
}

/// Public account view; never carries password material.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    pub login_id: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            login_id: user.login_id().to_string(),
            first_name: user.first_name().to_string(),
            last_name: user.last_name().to_string(),
        }
    }
}

fn wire_field(field: &str) -> &'static str {
    match field {
        "first name" => "firstName",
        "last name" => "lastName",
        _ => "loginId",
    }
}

fn map_user_validation_error(err: &UserValidationError) -> Error {
    let message = err.to_string();
    match err {
        UserValidationError::EmptyLoginId => field_error("loginId", "empty_login_id", message),
        UserValidationError::LoginIdWhitespace => {
            field_error("loginId", "login_id_whitespace", message)
        }
        UserValidationError::EmptyName { field } => {
            field_error(wire_field(field), "empty_name", message)
        }
        UserValidationError::TooLong { field, .. } => {
            field_error(wire_field(field), "too_long", message)
        }
        UserValidationError::InvalidId => Error::invalid_request(message),
    }
}

fn map_signup_validation_error(err: &SignUpValidationError) -> Error {
    match err {
        SignUpValidationError::Field(inner) => map_user_validation_error(inner),
        SignUpValidationError::EmptyPassword => {
            field_error("password", "empty_password", err.to_string())
        }
    }
}

fn map_login_validation_error(err: &LoginValidationError) -> Error {
    match err {
        LoginValidationError::InvalidLoginId(inner) => map_user_validation_error(inner),
        LoginValidationError::EmptyPassword => {
            field_error("password", "empty_password", err.to_string())
        }
    }
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/user/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = UserProfile),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Login id already taken", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "signup",
    security([])
)]
#[post("/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let request =
        SignUp::try_from(payload.into_inner()).map_err(|err| map_signup_validation_error(&err))?;
    let user = state.accounts.sign_up(&request).await?;
    info!(user_id = %user.id(), "account created");
    Ok(HttpResponse::Created().json(UserProfile::from(&user)))
}

/// Authenticate and establish a session.
///
/// Unknown login ids and wrong passwords share one `401` response.
#[utoipa::path(
    post,
    path = "/user/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UserProfile,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: AccountSession,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from(payload.into_inner())
        .map_err(|err| map_login_validation_error(&err))?;
    let user = state.accounts.authenticate(&credentials).await?;
    session.sign_in(&user)?;
    info!(user_id = %user.id(), "signed in");
    Ok(HttpResponse::Ok().json(UserProfile::from(&user)))
}

/// Profile of the signed-in user.
#[utoipa::path(
    get,
    path = "/user/me",
    responses(
        (status = 200, description = "Current user", body = UserProfile),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Account no longer exists", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: AccountSession,
) -> ApiResult<web::Json<UserProfile>> {
    let signed_in = session.require_signed_in()?;
    let user = state.accounts.profile(&signed_in.user_id).await?;
    Ok(web::Json(UserProfile::from(&user)))
}

/// End the session.
#[utoipa::path(
    post,
    path = "/user/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["users"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: AccountSession) -> HttpResponse {
    if let Ok(Some(signed_in)) = session.signed_in() {
        info!(user_id = %signed_in.user_id, login_id = ?signed_in.login_id, "signed out");
    }
    session.sign_out();
    HttpResponse::NoContent().finish()
}

#[cfg(test)]
mod tests;
