//! Controladores
//! 
//! Orquestan sesión de orden, repositorio e historial para cada request.

pub mod route_controller;
pub mod location_controller;
pub mod ordering_controller;
pub mod preset_controller;
