//! Middleware del sistema
//! 
//! Este módulo contiene el middleware de CORS y la puerta del modo edición.

pub mod cors;
pub mod edit_gate;

pub use cors::*;
pub use edit_gate::*;
