//! Configuración de variables de entorno
//! 
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::models::Coordinates;
use crate::utils::validation::{validate_latitude, validate_longitude};

/// Máximo de días configurables para archivar el historial (~100 años)
pub const MAX_ARCHIVE_AFTER_DAYS: i64 = 36_500;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a valid {expected} (got '{value}')")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Punto de referencia (depósito) para todas las distancias
#[derive(Debug, Clone, PartialEq)]
pub struct OriginConfig {
    pub code: String,
    pub coordinates: Coordinates,
}

impl Default for OriginConfig {
    fn default() -> Self {
        // QL Kitchen
        Self {
            code: "QL01".to_string(),
            coordinates: Coordinates::new(3.0695500, 101.5469179),
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    /// Frase compartida del modo edición; `None` desactiva la puerta
    pub edit_passphrase: Option<String>,
    pub origin: OriginConfig,
    /// Snapshot JSON de persistencia; `None` = solo memoria
    pub data_file: Option<PathBuf>,
    pub seed_demo_data: bool,
    pub changelog_archive_after_days: i64,
    pub changelog_sweep_interval: Duration,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            cors_origins: Vec::new(),
            edit_passphrase: None,
            origin: OriginConfig::default(),
            data_file: None,
            seed_demo_data: false,
            changelog_archive_after_days: 30,
            changelog_sweep_interval: Duration::from_secs(3600),
        }
    }
}

fn parse<T: std::str::FromStr>(
    name: &'static str,
    expected: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value: raw,
        }),
    }
}

fn checked<T: std::fmt::Display>(
    name: &'static str,
    expected: &'static str,
    value: T,
    valid: bool,
) -> Result<T, ConfigError> {
    if valid {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            name,
            expected,
            value: value.to_string(),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl EnvironmentConfig {
    /// Leer la configuración desde variables de entorno
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Leer la configuración desde una función de búsqueda arbitraria
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let origin_defaults = OriginConfig::default();

        let latitude = parse(
            "ORIGIN_LATITUDE",
            "number",
            lookup("ORIGIN_LATITUDE"),
            origin_defaults.coordinates.latitude,
        )?;
        let longitude = parse(
            "ORIGIN_LONGITUDE",
            "number",
            lookup("ORIGIN_LONGITUDE"),
            origin_defaults.coordinates.longitude,
        )?;
        let latitude = checked(
            "ORIGIN_LATITUDE",
            "latitude between -90 and 90",
            latitude,
            validate_latitude(latitude).is_ok(),
        )?;
        let longitude = checked(
            "ORIGIN_LONGITUDE",
            "longitude between -180 and 180",
            longitude,
            validate_longitude(longitude).is_ok(),
        )?;

        let archive_after_days = parse(
            "CHANGELOG_ARCHIVE_AFTER_DAYS",
            "number of days",
            lookup("CHANGELOG_ARCHIVE_AFTER_DAYS"),
            defaults.changelog_archive_after_days,
        )?;
        let archive_after_days = checked(
            "CHANGELOG_ARCHIVE_AFTER_DAYS",
            "number of days between 1 and 36500",
            archive_after_days,
            (1..=MAX_ARCHIVE_AFTER_DAYS).contains(&archive_after_days),
        )?;

        Ok(Self {
            environment: non_empty(lookup("ENVIRONMENT")).unwrap_or(defaults.environment),
            port: parse("PORT", "port number", lookup("PORT"), defaults.port)?,
            host: non_empty(lookup("HOST")).unwrap_or(defaults.host),
            cors_origins: lookup("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            edit_passphrase: non_empty(lookup("EDIT_PASSPHRASE")),
            origin: OriginConfig {
                code: non_empty(lookup("ORIGIN_CODE")).unwrap_or(origin_defaults.code),
                coordinates: Coordinates::new(latitude, longitude),
            },
            data_file: non_empty(lookup("DATA_FILE")).map(PathBuf::from),
            seed_demo_data: parse(
                "SEED_DEMO_DATA",
                "boolean",
                lookup("SEED_DEMO_DATA"),
                defaults.seed_demo_data,
            )?,
            changelog_archive_after_days: archive_after_days,
            changelog_sweep_interval: Duration::from_secs(parse(
                "CHANGELOG_SWEEP_INTERVAL_SECS",
                "number of seconds",
                lookup("CHANGELOG_SWEEP_INTERVAL_SECS"),
                defaults.changelog_sweep_interval.as_secs(),
            )?
            .max(1)),
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn log(&self) {
        info!("⚙️ Entorno: {}", self.environment);
        info!(
            "📍 Origen {} en ({}, {})",
            self.origin.code, self.origin.coordinates.latitude, self.origin.coordinates.longitude
        );
        match &self.data_file {
            Some(path) => info!("💾 Persistencia en {}", path.display()),
            None => info!("💾 Persistencia solo en memoria"),
        }
        if self.edit_passphrase.is_none() {
            info!("🔓 Modo edición sin frase de acceso");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = EnvironmentConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.origin, OriginConfig::default());
        assert!(config.edit_passphrase.is_none());
        assert!(config.data_file.is_none());
        assert!(config.is_development());
    }

    #[test]
    fn test_overrides() {
        let config = EnvironmentConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("EDIT_PASSPHRASE", "ql-2024"),
            ("ORIGIN_CODE", "DEPOT"),
            ("ORIGIN_LATITUDE", "3.1"),
            ("ORIGIN_LONGITUDE", "101.6"),
            ("CORS_ORIGINS", "http://a.test, http://b.test,"),
            ("DATA_FILE", "/tmp/routes.json"),
            ("CHANGELOG_SWEEP_INTERVAL_SECS", "60"),
        ]))
        .unwrap();

        assert_eq!(config.server_url(), "0.0.0.0:8080");
        assert_eq!(config.edit_passphrase.as_deref(), Some("ql-2024"));
        assert_eq!(config.origin.code, "DEPOT");
        assert_eq!(config.origin.coordinates, Coordinates::new(3.1, 101.6));
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.data_file, Some(PathBuf::from("/tmp/routes.json")));
        assert_eq!(config.changelog_sweep_interval, Duration::from_secs(60));
    }

    #[test]
    fn test_invalid_number_is_an_error() {
        let result = EnvironmentConfig::from_lookup(lookup(&[("PORT", "abc")]));
        assert!(matches!(result, Err(ConfigError::Invalid { name: "PORT", .. })));
    }

    #[test]
    fn test_invalid_origin_coordinates_are_errors() {
        let result = EnvironmentConfig::from_lookup(lookup(&[("ORIGIN_LATITUDE", "NaN")]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { name: "ORIGIN_LATITUDE", .. })
        ));

        let result = EnvironmentConfig::from_lookup(lookup(&[("ORIGIN_LONGITUDE", "200")]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { name: "ORIGIN_LONGITUDE", .. })
        ));

        let result = EnvironmentConfig::from_lookup(lookup(&[("ORIGIN_LATITUDE", "-91")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_archive_age_is_an_error() {
        for value in ["100000000", "0", "-5"] {
            let result = EnvironmentConfig::from_lookup(lookup(&[(
                "CHANGELOG_ARCHIVE_AFTER_DAYS",
                value,
            )]));
            assert!(
                matches!(
                    result,
                    Err(ConfigError::Invalid { name: "CHANGELOG_ARCHIVE_AFTER_DAYS", .. })
                ),
                "{value} should be rejected"
            );
        }

        let config = EnvironmentConfig::from_lookup(lookup(&[(
            "CHANGELOG_ARCHIVE_AFTER_DAYS",
            "36500",
        )]))
        .unwrap();
        assert_eq!(config.changelog_archive_after_days, MAX_ARCHIVE_AFTER_DAYS);
    }
}
