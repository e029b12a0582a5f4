//! Account HTTP handlers.
//!
//! ```text
//! POST /api/register
//! POST /api/login
//! POST /api/logout
//! ```
//!
//! Login is stateless: it verifies credentials and echoes the user's id and
//! name without establishing a session. Clients hold on to the id and send it
//! with each comment.

use actix_web::{HttpResponse, post, web};
use serde::Serialize;
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::{
    AuthenticatedUser, CredentialsValidationError, Error, LoginCredentials, Registration,
    UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::form::FormData;
use crate::inbound::http::schemas::{ErrorSchema, MessageBody};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_value_error};

/// Form fields accepted by registration.
#[derive(Debug, ToSchema)]
pub struct RegisterForm {
    /// Display name.
    pub name: String,
    /// Institutional email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Form fields accepted by login.
#[derive(Debug, ToSchema)]
pub struct LoginForm {
    /// Registered email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Identity returned by a successful login.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Account identifier.
    #[schema(format = "uuid")]
    pub user_id: String,
    /// Display name.
    pub user_name: String,
}

impl From<AuthenticatedUser> for LoginResponse {
    fn from(value: AuthenticatedUser) -> Self {
        Self {
            user_id: value.user_id.to_string(),
            user_name: value.user_name.as_ref().to_owned(),
        }
    }
}

const NAME: FieldName = FieldName::new("name");
const EMAIL: FieldName = FieldName::new("email");
const PASSWORD: FieldName = FieldName::new("password");

fn credentials_error(err: &CredentialsValidationError) -> Error {
    let field = match err {
        CredentialsValidationError::EmptyEmail
        | CredentialsValidationError::User(
            UserValidationError::EmptyEmail | UserValidationError::MalformedEmail,
        ) => EMAIL,
        CredentialsValidationError::EmptyPassword => PASSWORD,
        CredentialsValidationError::User(
            UserValidationError::EmptyDisplayName | UserValidationError::DisplayNameTooLong { .. },
        ) => NAME,
    };
    invalid_value_error(field, err.to_string())
}

/// Register an account under the institutional email domain.
#[utoipa::path(
    post,
    path = "/api/register",
    request_body(content = RegisterForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "User registered", body = MessageBody),
        (status = 400, description = "Invalid request or foreign email domain", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "register"
)]
#[post("/register")]
pub async fn register(state: web::Data<HttpState>, form: FormData) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from_parts(
        form.require_text(NAME)?,
        form.require_text(EMAIL)?,
        form.require_text(PASSWORD)?,
    )
    .map_err(|err| credentials_error(&err))?;
    state.registration.register(&registration).await?;
    Ok(HttpResponse::Created().json(MessageBody::new("User registered")))
}

/// Verify credentials and return the user's identity.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Credentials accepted", body = LoginResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "login"
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    form: FormData,
) -> ApiResult<web::Json<LoginResponse>> {
    let credentials =
        LoginCredentials::try_from_parts(form.require_text(EMAIL)?, form.require_text(PASSWORD)?)
            .map_err(|err| credentials_error(&err))?;
    let user = state.login.authenticate(&credentials).await?;
    debug!(user_id = %user.user_id, "login accepted");
    Ok(web::Json(LoginResponse::from(user)))
}

/// Acknowledge a logout. There is no server-side session to end.
#[utoipa::path(
    post,
    path = "/api/logout",
    responses((status = 200, description = "Logged out", body = MessageBody)),
    tags = ["accounts"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout() -> web::Json<MessageBody> {
    web::Json(MessageBody::new("Logged out"))
}
