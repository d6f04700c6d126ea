//! Auth Service
//!
//! Login, registration, phone OTP and logout. Every successful sign-in
//! persists the token pair and the user record.

use serde::Serialize;
use tracing::{info, warn};

use super::{ApiClient, CancelToken, Endpoint};
use crate::error::{ApiError, ApiResult};
use crate::models::{AuthResponse, OtpPurpose, OtpRequested, RegisterForm, Session, User};

// ========================
// Argument Structs
// ========================

#[derive(Serialize)]
struct LoginArgs<'a> {
    identifier: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct OtpRequestArgs<'a> {
    phone: &'a str,
    purpose: OtpPurpose,
}

#[derive(Serialize)]
struct OtpVerifyArgs<'a> {
    phone: &'a str,
    code: &'a str,
    purpose: OtpPurpose,
}

#[derive(Serialize)]
struct LogoutArgs<'a> {
    refresh: &'a str,
}

fn persist(client: &ApiClient, response: AuthResponse) -> ApiResult<Session> {
    let session = response.into_session();
    client.session().save(&session)?;
    info!(user = %session.user.name(), role = %session.user.role, "signed in");
    Ok(session)
}

// ========================
// Sign-in
// ========================

/// `identifier` is an email or a phone number
pub async fn login(
    client: &ApiClient,
    identifier: &str,
    password: &str,
    cancel: &CancelToken,
) -> ApiResult<Session> {
    let response: AuthResponse = client
        .post(&Endpoint::AuthLogin, &LoginArgs { identifier: identifier.trim(), password }, cancel)
        .await?;
    persist(client, response)
}

/// Mismatched confirmation is rejected before any request is sent
pub async fn register(client: &ApiClient, form: &RegisterForm, cancel: &CancelToken) -> ApiResult<Session> {
    if form.password != form.password_confirm {
        return Err(ApiError::Validation("Las contraseñas no coinciden".to_string()));
    }
    let response: AuthResponse = client.post(&Endpoint::AuthRegister, form, cancel).await?;
    persist(client, response)
}

pub async fn request_otp(
    client: &ApiClient,
    phone: &str,
    purpose: OtpPurpose,
    cancel: &CancelToken,
) -> ApiResult<OtpRequested> {
    client
        .post(&Endpoint::AuthOtpRequest, &OtpRequestArgs { phone: phone.trim(), purpose }, cancel)
        .await
}

pub async fn verify_otp(
    client: &ApiClient,
    phone: &str,
    code: &str,
    purpose: OtpPurpose,
    cancel: &CancelToken,
) -> ApiResult<Session> {
    let args = OtpVerifyArgs { phone: phone.trim(), code: code.trim(), purpose };
    let response: AuthResponse = client.post(&Endpoint::AuthOtpVerify, &args, cancel).await?;
    persist(client, response)
}

// ========================
// Session
// ========================

/// Blacklists the refresh token server-side when possible; the local
/// session is purged whatever the server answers.
pub async fn logout(client: &ApiClient) {
    if let Some(refresh) = client.session().refresh_token() {
        let result: ApiResult<serde_json::Value> = client
            .post(&Endpoint::AuthLogout, &LogoutArgs { refresh: &refresh }, &CancelToken::new())
            .await;
        if let Err(e) = result {
            warn!(error = %e, "server logout failed");
        }
    }
    client.session().clear();
    info!("signed out");
}

pub async fn profile(client: &ApiClient, cancel: &CancelToken) -> ApiResult<User> {
    client.get(&Endpoint::AuthProfile, cancel).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{client_with, FakeTransport};
    use crate::api::Method;
    use crate::session::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY};
    use serde_json::json;

    fn admin_json() -> serde_json::Value {
        json!({
            "id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
            "email": "admin@latacunga.gob.ec",
            "first_name": "Admin",
            "last_name": "EPAGAL",
            "display_name": "Administrador",
            "role": "admin",
            "status": "active"
        })
    }

    #[tokio::test]
    async fn test_login_persists_tokens_and_user() {
        let fake = FakeTransport::new();
        fake.on(
            Method::Post,
            "/auth/login/",
            200,
            json!({"access": "acc-admin", "refresh": "ref-admin", "user": admin_json()}),
        );
        let client = client_with(fake.clone());

        let session = login(&client, "admin@latacunga.gob.ec", "admin123", &CancelToken::new())
            .await
            .unwrap();

        assert_eq!(
            fake.last_body(Method::Post, "/auth/login/"),
            Some(json!({"identifier": "admin@latacunga.gob.ec", "password": "admin123"}))
        );
        let store = client.session();
        assert_eq!(store.raw(ACCESS_TOKEN_KEY).as_deref(), Some("acc-admin"));
        assert_eq!(store.raw(REFRESH_TOKEN_KEY).as_deref(), Some("ref-admin"));
        let stored: User = serde_json::from_str(&store.raw(USER_KEY).unwrap()).unwrap();
        assert_eq!(stored, session.user);
        assert_eq!(store.restore(), Some(session));
    }

    #[tokio::test]
    async fn test_failed_login_stores_nothing() {
        let fake = FakeTransport::new();
        fake.on(Method::Post, "/auth/login/", 401, json!({"message": "Credenciales inválidas"}));
        let client = client_with(fake.clone());

        let err = login(&client, "admin@latacunga.gob.ec", "nope", &CancelToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.user_message("Error al iniciar sesión"), "Credenciales inválidas");
        assert!(!client.session().has_any_key());
    }

    #[tokio::test]
    async fn test_otp_request_then_verify() {
        let fake = FakeTransport::new();
        fake.on(
            Method::Post,
            "/auth/otp/request/",
            200,
            json!({"success": true, "message": "Código enviado", "expires_at": "2024-05-01T10:05:00Z", "debug_code": "482913"}),
        );
        fake.on(
            Method::Post,
            "/auth/otp/verify/",
            200,
            json!({"success": true, "user": admin_json(), "tokens": {"access": "acc-otp", "refresh": "ref-otp"}}),
        );
        let client = client_with(fake.clone());
        let cancel = CancelToken::new();

        let requested = request_otp(&client, "+593987654321", OtpPurpose::Login, &cancel).await.unwrap();
        let code = requested.debug_code.unwrap();
        let session = verify_otp(&client, "+593987654321", &code, OtpPurpose::Login, &cancel)
            .await
            .unwrap();

        assert_eq!(
            fake.last_body(Method::Post, "/auth/otp/request/"),
            Some(json!({"phone": "+593987654321", "purpose": "LOGIN"}))
        );
        assert_eq!(
            fake.last_body(Method::Post, "/auth/otp/verify/"),
            Some(json!({"phone": "+593987654321", "code": "482913", "purpose": "LOGIN"}))
        );
        assert_eq!(session.tokens.access, "acc-otp");
        assert_eq!(client.session().raw(REFRESH_TOKEN_KEY).as_deref(), Some("ref-otp"));
        assert!(client.session().raw(USER_KEY).is_some());
    }

    #[tokio::test]
    async fn test_register_rejects_mismatched_confirmation() {
        let fake = FakeTransport::new();
        let client = client_with(fake.clone());
        let form = RegisterForm {
            email: "vecino@mail.com".into(),
            password: "segura123".into(),
            password_confirm: "segura124".into(),
            ..Default::default()
        };

        let err = register(&client, &form, &CancelToken::new()).await.unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
        assert!(fake.requests().is_empty());
    }

    #[tokio::test]
    async fn test_logout_purges_even_when_server_fails() {
        let fake = FakeTransport::new();
        fake.on(Method::Post, "/auth/logout/", 500, json!({}));
        let client = client_with(fake.clone());
        client.session().set_access_token("acc").unwrap();
        client.session().set_refresh_token("ref").unwrap();

        logout(&client).await;

        assert_eq!(fake.last_body(Method::Post, "/auth/logout/"), Some(json!({"refresh": "ref"})));
        assert!(!client.session().has_any_key());
    }
}
