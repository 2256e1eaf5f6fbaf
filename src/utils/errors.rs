//! Sistema de manejo de errores
//! 
//! Este módulo define los errores del motor de orden y los errores de la
//! aplicación, junto con su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::models::{LocationId, PresetId, RouteId};
use crate::services::rank_table::Rank;

/// Errores del motor de orden. Ninguno deja estado mutado.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderingError {
    #[error("at least one location must have a number before applying")]
    NoRanksSet,

    #[error("numbers cannot be duplicated: {rank} is used by {} locations", location_ids.len())]
    DuplicateRanks {
        rank: Rank,
        location_ids: Vec<LocationId>,
    },

    #[error("preset name is required")]
    EmptyPresetName,

    #[error("preset must contain at least one number")]
    EmptyPresetSnapshot,

    #[error("preset belongs to route {preset_route}, but route {open_route} is open")]
    PresetRouteMismatch {
        preset_route: RouteId,
        open_route: RouteId,
    },

    #[error("preset {0} not found")]
    PresetNotFound(PresetId),

    #[error("location {0} does not belong to this route")]
    UnknownLocation(LocationId),
}

/// Errores de persistencia
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Ordering error: {0}")]
    Ordering(#[from] OrderingError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl ErrorResponse {
    fn new(error: &str, message: String, code: &str) -> Self {
        Self {
            error: error.to_string(),
            message,
            details: None,
            code: Some(code.to_string()),
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

fn ordering_response(e: OrderingError) -> (StatusCode, ErrorResponse) {
    let message = e.to_string();
    match e {
        OrderingError::NoRanksSet => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("Bad Request", message, "NO_RANKS_SET"),
        ),
        OrderingError::DuplicateRanks { rank, location_ids } => (
            StatusCode::CONFLICT,
            ErrorResponse::new("Conflict", message, "DUPLICATE_RANKS")
                .with_details(json!({ "rank": rank, "location_ids": location_ids })),
        ),
        OrderingError::EmptyPresetName => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("Bad Request", message, "EMPTY_PRESET_NAME"),
        ),
        OrderingError::EmptyPresetSnapshot => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("Bad Request", message, "EMPTY_PRESET_SNAPSHOT"),
        ),
        OrderingError::PresetRouteMismatch { preset_route, open_route } => (
            StatusCode::CONFLICT,
            ErrorResponse::new("Conflict", message, "PRESET_ROUTE_MISMATCH").with_details(
                json!({ "preset_route": preset_route, "open_route": open_route }),
            ),
        ),
        OrderingError::PresetNotFound(_) => (
            StatusCode::NOT_FOUND,
            ErrorResponse::new("Not Found", message, "PRESET_NOT_FOUND"),
        ),
        OrderingError::UnknownLocation(_) => (
            StatusCode::NOT_FOUND,
            ErrorResponse::new("Not Found", message, "UNKNOWN_LOCATION"),
        ),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Ordering(e) => {
                warn!("⚠️ Operación de orden rechazada: {}", e);
                ordering_response(e)
            }

            AppError::Validation(e) => {
                warn!("⚠️ Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new(
                        "Validation Error",
                        "The provided data is invalid".to_string(),
                        "VALIDATION_ERROR",
                    )
                    .with_details(json!(e)),
                )
            }

            AppError::Unauthorized(msg) => {
                warn!("🔒 Unauthorized access: {}", msg);
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::new("Unauthorized", msg, "UNAUTHORIZED"),
                )
            }

            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("Not Found", msg, "NOT_FOUND"),
            ),

            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ErrorResponse::new("Conflict", msg, "CONFLICT"),
            ),

            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("Bad Request", msg, "BAD_REQUEST"),
            ),

            AppError::Storage(e) => {
                error!("❌ Storage error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "Storage Error",
                        "An error occurred while accessing storage".to_string(),
                        "STORAGE_ERROR",
                    )
                    .with_details(json!({ "storage_error": e.to_string() })),
                )
            }

            AppError::Internal(msg) => {
                error!("❌ Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "Internal Server Error",
                        "An unexpected error occurred".to_string(),
                        "INTERNAL_ERROR",
                    )
                    .with_details(json!({ "internal_error": msg })),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de validación
pub fn validation_error(field: &'static str, message: &'static str) -> AppError {
    use validator::ValidationError;

    let mut error = ValidationError::new("custom");
    error.add_param("message".into(), &message);

    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);

    AppError::Validation(errors)
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de solicitud incorrecta
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_ranks_maps_to_conflict() {
        let error = AppError::from(OrderingError::DuplicateRanks {
            rank: Rank(1),
            location_ids: vec![LocationId::new(), LocationId::new()],
        });
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_duplicate_ranks_message() {
        let error = OrderingError::DuplicateRanks {
            rank: Rank(3),
            location_ids: vec![LocationId::new(), LocationId::new()],
        };
        assert!(error.to_string().starts_with("numbers cannot be duplicated"));
    }

    #[test]
    fn test_not_found_helper() {
        let response = not_found_error("Route", "abc").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
