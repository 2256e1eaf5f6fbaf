//! DTOs de la API
//! 
//! Cuerpos de request/response y el sobre genérico `ApiResponse`.

pub mod route_dto;
pub mod location_dto;
pub mod ordering_dto;
pub mod preset_dto;
pub mod changelog_dto;
pub mod edit_mode_dto;

use serde::Serialize;

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}
