//! Configuración del proyecto
//! 
//! Este módulo contiene la configuración de entorno, el origen de las
//! distancias y la persistencia.

pub mod environment;

pub use environment::*;
