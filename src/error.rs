//! Client Error Taxonomy
//!
//! Every failure a page can see, from transport to local validation.

use serde_json::Value;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// No response received
    #[error("network error: {0}")]
    Network(String),
    /// Backend answered with 4xx/5xx
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    /// 401/403 that a token refresh could not repair; session already purged
    #[error("session expired or not authorized")]
    Unauthorized,
    /// Body did not match the expected shape
    #[error("unexpected response: {0}")]
    Parse(String),
    /// Rejected before any request was sent
    #[error("{0}")]
    Validation(String),
    /// Persisted storage unavailable or malformed
    #[error("storage error: {0}")]
    Storage(String),
    /// The caller's cancel token fired
    #[error("request cancelled")]
    Cancelled,
}

impl ApiError {
    /// Build an `Http` error, pulling the backend's explanation out of the body.
    ///
    /// DRF answers `{"detail": ...}`, the auth views answer `{"message": ...}`.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<Value>(body)
            .ok()
            .and_then(|v| {
                ["detail", "message", "error"]
                    .iter()
                    .find_map(|k| v.get(*k).and_then(Value::as_str).map(str::to_string))
            })
            .unwrap_or_default();
        ApiError::Http { status, message }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }

    /// Banner text: the backend's own message when it sent one, else `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Http { message, .. } if !message.is_empty() => message.clone(),
            ApiError::Network(_) => {
                "Error de conexión. Verifica que el backend esté ejecutándose.".to_string()
            }
            ApiError::Validation(msg) => msg.clone(),
            _ => fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_is_extracted() {
        let err = ApiError::from_response(400, br#"{"detail": "Campo requerido"}"#);
        assert_eq!(err, ApiError::Http { status: 400, message: "Campo requerido".into() });
        assert_eq!(err.user_message("Error al crear"), "Campo requerido");
    }

    #[test]
    fn test_message_field_is_extracted() {
        let err = ApiError::from_response(400, r#"{"success": false, "message": "Código OTP inválido"}"#.as_bytes());
        assert_eq!(err.user_message("x"), "Código OTP inválido");
    }

    #[test]
    fn test_fallback_for_opaque_bodies() {
        let err = ApiError::from_response(500, b"<html>Server Error</html>");
        assert_eq!(err.user_message("Error al cargar tareas"), "Error al cargar tareas");
        assert_eq!(ApiError::Parse("eof".into()).user_message("Error"), "Error");
    }

    #[test]
    fn test_validation_message_passes_through() {
        let err = ApiError::Validation("Las contraseñas no coinciden".into());
        assert_eq!(err.user_message("ignored"), "Las contraseñas no coinciden");
        assert_eq!(err.to_string(), "Las contraseñas no coinciden");
    }
}
