//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum: el pool de PostgreSQL, la configuración
//! y los clientes de colaboradores externos detrás de sus traits.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::services::{
    HttpTransitNotifier, MapboxMappingClient, MappingClient, NoopMappingClient, TransitNotifier,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub mapas: Arc<dyn MappingClient>,
    pub notificador: Arc<dyn TransitNotifier>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let mapas: Arc<dyn MappingClient> = match config.mapbox_token.clone() {
            Some(token) => Arc::new(MapboxMappingClient::new(token)),
            None => Arc::new(NoopMappingClient),
        };
        let notificador: Arc<dyn TransitNotifier> =
            Arc::new(HttpTransitNotifier::new(config.pedidos_service_url.clone()));

        Self {
            pool,
            config,
            mapas,
            notificador,
        }
    }
}
