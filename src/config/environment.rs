//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    /// Token del servicio de mapas; sin token las rutas se crean sin
    /// estimaciones de distancia/tiempo
    pub mapbox_token: Option<String>,
    /// URL base del subsistema de pedidos (notificaciones en tránsito)
    pub pedidos_service_url: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").expect("ENVIRONMENT must be set"),
            port: env::var("PORT")
                .expect("PORT must be set")
                .parse()
                .expect("PORT must be a valid number"),
            host: env::var("HOST").expect("HOST must be set"),
            cors_origins: env::var("CORS_ORIGINS")
                .expect("CORS_ORIGINS must be set")
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            mapbox_token: env::var("MAPBOX_TOKEN").ok(),
            pedidos_service_url: env::var("PEDIDOS_SERVICE_URL")
                .expect("PEDIDOS_SERVICE_URL must be set"),
        }
    }
}

impl EnvironmentConfig {
    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
