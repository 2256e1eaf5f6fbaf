//! Puerta del modo edición
//! 
//! Frase compartida para las operaciones que modifican datos. No es un
//! límite de seguridad: solo evita ediciones accidentales.

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};

use crate::state::AppState;
use crate::utils::errors::AppError;

pub const EDIT_PASSPHRASE_HEADER: &str = "x-edit-passphrase";

/// Ruta que comprueba la frase; nunca se bloquea
pub const VERIFY_PATH: &str = "/api/edit-mode/verify";

/// Compara la frase recibida con la configurada
pub fn passphrase_matches(expected: Option<&str>, provided: Option<&str>) -> bool {
    match expected {
        None => true,
        Some(expected) => provided == Some(expected),
    }
}

pub async fn edit_gate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let read_only = matches!(*request.method(), Method::GET | Method::HEAD | Method::OPTIONS);
    if read_only || request.uri().path() == VERIFY_PATH {
        return Ok(next.run(request).await);
    }

    let provided = request
        .headers()
        .get(EDIT_PASSPHRASE_HEADER)
        .and_then(|h| h.to_str().ok());

    if !passphrase_matches(state.config.edit_passphrase.as_deref(), provided) {
        return Err(AppError::Unauthorized(
            "edit mode requires the shared passphrase".to_string(),
        ));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passphrase_matches() {
        assert!(passphrase_matches(None, None));
        assert!(passphrase_matches(None, Some("anything")));
        assert!(passphrase_matches(Some("ql"), Some("ql")));
        assert!(!passphrase_matches(Some("ql"), Some("QL")));
        assert!(!passphrase_matches(Some("ql"), None));
    }
}
