//! Servicios del motor de orden
//! 
//! Distancias, tabla de rangos, resolución del orden, anotación de
//! distancias, presets, sesión de orden e historial de cambios.

pub mod geo;
pub mod rank_table;
pub mod sort_resolver;
pub mod distance_annotator;
pub mod preset_store;
pub mod ordering_session;
pub mod changelog_service;
