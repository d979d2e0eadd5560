//! Authentication API Endpoints
//! Mission: Provide signup, login, and session introspection endpoints

use crate::auth::{
    jwt::SessionTokens,
    middleware::extract_claims,
    models::{AccountResponse, LoginRequest, SessionResponse, SignupRequest},
    store::{AccountStore, SignupError},
};
use crate::hierarchy::RoleHierarchy;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Shared auth state
#[derive(Clone)]
pub struct AuthState {
    pub accounts: Arc<AccountStore>,
    pub tokens: Arc<SessionTokens>,
    pub hierarchy: Arc<RoleHierarchy>,
}

impl AuthState {
    pub fn new(
        accounts: Arc<AccountStore>,
        tokens: Arc<SessionTokens>,
        hierarchy: Arc<RoleHierarchy>,
    ) -> Self {
        Self {
            accounts,
            tokens,
            hierarchy,
        }
    }
}

/// Signup endpoint - POST /api/auth/signup
///
/// Creates the account and logs it straight in, as the original signup
/// form did.
pub async fn signup(
    State(state): State<AuthState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<SessionResponse>, AuthApiError> {
    validate_signup(&payload)?;

    let account = state
        .accounts
        .create_account(
            payload.username.trim(),
            payload.email.trim(),
            &payload.password,
            payload.role,
            &state.hierarchy,
        )
        .map_err(|e| {
            warn!("Failed to create account: {}", e);
            AuthApiError::InternalError
        })?
        .map_err(|e| match e {
            SignupError::UsernameTaken => AuthApiError::UsernameTaken,
            SignupError::UnknownRole(_) => AuthApiError::UnknownRole,
        })?;

    let (token, expires_in) = state
        .tokens
        .generate_token(&account)
        .map_err(|_| AuthApiError::InternalError)?;

    Ok(Json(SessionResponse {
        token,
        expires_in,
        account: AccountResponse::from_account(&account),
    }))
}

/// Login endpoint - POST /api/auth/login
pub async fn login(
    State(state): State<AuthState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AuthApiError> {
    info!("🔐 Login attempt: {}", payload.username);

    let account = state
        .accounts
        .authenticate(&payload.username, &payload.password, &payload.role)
        .map_err(|_| AuthApiError::InternalError)?
        .ok_or_else(|| {
            warn!("❌ Failed login attempt: {}", payload.username);
            AuthApiError::InvalidCredentials
        })?;

    let (token, expires_in) = state
        .tokens
        .generate_token(&account)
        .map_err(|_| AuthApiError::InternalError)?;

    info!("✅ Login successful: {} ({})", account.username, account.role);

    Ok(Json(SessionResponse {
        token,
        expires_in,
        account: AccountResponse::from_account(&account),
    }))
}

/// Get current session info - GET /api/auth/me
pub async fn get_current_account(
    State(state): State<AuthState>,
    req: Request,
) -> Result<Json<AccountResponse>, AuthApiError> {
    let claims = extract_claims(&req).ok_or(AuthApiError::Unauthorized)?;

    let account = state
        .accounts
        .get_by_username(&claims.username)
        .ok_or(AuthApiError::Unauthorized)?;

    Ok(Json(AccountResponse::from_account(&account)))
}

/// Field validation matching the original signup form rules.
fn validate_signup(payload: &SignupRequest) -> Result<(), AuthApiError> {
    if payload.username.trim().len() < 3 {
        return Err(AuthApiError::InvalidUsername);
    }
    if !is_valid_email(payload.email.trim()) {
        return Err(AuthApiError::InvalidEmail);
    }
    if payload.password.len() < 6 {
        return Err(AuthApiError::WeakPassword);
    }
    if payload.password != payload.confirm_password {
        return Err(AuthApiError::PasswordMismatch);
    }
    if payload.role.as_str().trim().is_empty() {
        return Err(AuthApiError::RoleRequired);
    }
    Ok(())
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let no_whitespace = !email.chars().any(char::is_whitespace);
    let domain_ok = match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty() && !domain.contains('@'),
        None => false,
    };
    !local.is_empty() && no_whitespace && domain_ok
}

/// Auth API errors
#[derive(Debug)]
pub enum AuthApiError {
    InvalidUsername,
    InvalidEmail,
    WeakPassword,
    PasswordMismatch,
    RoleRequired,
    UnknownRole,
    UsernameTaken,
    InvalidCredentials,
    Unauthorized,
    InternalError,
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthApiError::InvalidUsername => (
                StatusCode::BAD_REQUEST,
                "Username must be at least 3 characters",
            ),
            AuthApiError::InvalidEmail => (
                StatusCode::BAD_REQUEST,
                "Please enter a valid email address",
            ),
            AuthApiError::WeakPassword => (
                StatusCode::BAD_REQUEST,
                "Password must be at least 6 characters",
            ),
            AuthApiError::PasswordMismatch => (StatusCode::BAD_REQUEST, "Passwords do not match"),
            AuthApiError::RoleRequired => (StatusCode::BAD_REQUEST, "Please select a role"),
            AuthApiError::UnknownRole => (
                StatusCode::BAD_REQUEST,
                "Role is not part of the hierarchy",
            ),
            AuthApiError::UsernameTaken => (StatusCode::CONFLICT, "Username already exists"),
            AuthApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Invalid username, password, or role",
            ),
            AuthApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Authentication required"),
            AuthApiError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::Role;

    fn signup_payload() -> SignupRequest {
        SignupRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "password1".to_string(),
            confirm_password: "password1".to_string(),
            role: Role::from("role5"),
        }
    }

    #[test]
    fn test_signup_validation_accepts_good_payload() {
        assert!(validate_signup(&signup_payload()).is_ok());
    }

    #[test]
    fn test_signup_validation_rejects_short_username() {
        let mut payload = signup_payload();
        payload.username = "al".to_string();
        assert!(matches!(
            validate_signup(&payload),
            Err(AuthApiError::InvalidUsername)
        ));
    }

    #[test]
    fn test_signup_validation_rejects_short_password() {
        let mut payload = signup_payload();
        payload.password = "pw".to_string();
        payload.confirm_password = "pw".to_string();
        assert!(matches!(
            validate_signup(&payload),
            Err(AuthApiError::WeakPassword)
        ));
    }

    #[test]
    fn test_signup_validation_rejects_mismatched_passwords() {
        let mut payload = signup_payload();
        payload.confirm_password = "different1".to_string();
        assert!(matches!(
            validate_signup(&payload),
            Err(AuthApiError::PasswordMismatch)
        ));
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("alice@example.com"));
        assert!(is_valid_email("a.b@sub.example.org"));
        assert!(!is_valid_email("alice"));
        assert!(!is_valid_email("alice@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("alice@example"));
        assert!(!is_valid_email("al ice@example.com"));
    }

    #[test]
    fn test_auth_api_error_responses() {
        let invalid_creds = AuthApiError::InvalidCredentials.into_response();
        assert_eq!(invalid_creds.status(), StatusCode::UNAUTHORIZED);

        let taken = AuthApiError::UsernameTaken.into_response();
        assert_eq!(taken.status(), StatusCode::CONFLICT);

        let unknown_role = AuthApiError::UnknownRole.into_response();
        assert_eq!(unknown_role.status(), StatusCode::BAD_REQUEST);
    }
}
