//! User and Session
//!
//! Authenticated user record plus the JWT pair issued by the auth views.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "super::common::string_or_number")]
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl User {
    /// Best human-readable name available
    pub fn name(&self) -> String {
        if !self.display_name.is_empty() {
            return self.display_name.clone();
        }
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if !full.is_empty() {
            return full.to_string();
        }
        self.email
            .clone()
            .or_else(|| self.phone.clone())
            .unwrap_or_else(|| "Usuario".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

/// An authenticated session as restored from storage or returned by login
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: User,
    pub tokens: TokenPair,
}

/// Login answers `{access, refresh, user}`; register and OTP verify answer
/// `{user, tokens: {access, refresh}}`. Both normalise into a `Session`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AuthResponse {
    Nested { user: User, tokens: TokenPair },
    Flat { access: String, #[serde(default)] refresh: Option<String>, user: User },
}

impl AuthResponse {
    pub fn into_session(self) -> Session {
        match self {
            AuthResponse::Nested { user, tokens } => Session { user, tokens },
            AuthResponse::Flat { access, refresh, user } => Session {
                user,
                tokens: TokenPair { access, refresh },
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OtpPurpose {
    Login,
    Register,
    ResetPassword,
}

/// Answer to an OTP request; `debug_code` is only filled by development backends
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OtpRequested {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default, deserialize_with = "debug_code")]
    pub debug_code: Option<String>,
}

fn debug_code<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let code = super::common::string_or_number(deserializer)?;
    Ok(if code.is_empty() { None } else { Some(code) })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegisterForm {
    pub email: String,
    pub phone: String,
    pub password: String,
    pub password_confirm: String,
    pub first_name: String,
    pub last_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_login_response() {
        let json = r#"{"access": "a1", "refresh": "r1", "user": {"id": "u-1", "email": "admin@latacunga.gob.ec", "role": "admin"}}"#;
        let session = serde_json::from_str::<AuthResponse>(json).unwrap().into_session();
        assert_eq!(session.tokens.access, "a1");
        assert_eq!(session.tokens.refresh.as_deref(), Some("r1"));
        assert_eq!(session.user.role, "admin");
    }

    #[test]
    fn test_nested_register_response() {
        let json = r#"{"success": true, "user": {"id": 5, "phone": "+593987654321"}, "tokens": {"access": "a", "refresh": "r"}}"#;
        let session = serde_json::from_str::<AuthResponse>(json).unwrap().into_session();
        assert_eq!(session.user.id, "5");
        assert_eq!(session.tokens.access, "a");
    }

    #[test]
    fn test_user_name_fallbacks() {
        let mut user = User { id: "1".into(), phone: Some("+593".into()), ..Default::default() };
        assert_eq!(user.name(), "+593");
        user.first_name = "Ana".into();
        assert_eq!(user.name(), "Ana");
        user.display_name = "Ana Toapanta".into();
        assert_eq!(user.name(), "Ana Toapanta");
    }

    #[test]
    fn test_otp_debug_code_number_or_null() {
        let r: OtpRequested = serde_json::from_str(r#"{"debug_code": 123456}"#).unwrap();
        assert_eq!(r.debug_code.as_deref(), Some("123456"));
        let r: OtpRequested = serde_json::from_str(r#"{"debug_code": null}"#).unwrap();
        assert_eq!(r.debug_code, None);
    }
}
