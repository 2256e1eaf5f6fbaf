//! Modelos del sistema
//! 
//! Este módulo contiene los modelos de datos de rutas, ubicaciones,
//! presets de orden y el historial de cambios.

pub mod ids;
pub mod location;
pub mod route;
pub mod preset;
pub mod changelog;

pub use ids::*;
pub use location::*;
pub use route::*;
pub use preset::*;
pub use changelog::*;
