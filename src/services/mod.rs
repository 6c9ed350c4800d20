//! Services module
//!
//! Este módulo contiene los clientes de colaboradores externos del
//! núcleo de rutas: el servicio de mapas (estimaciones consultivas) y
//! el notificador de tránsito hacia el subsistema de pedidos.

pub mod mapping_service;
pub mod transit_notifier;

pub use mapping_service::{EstimacionRuta, MapboxMappingClient, MappingClient, NoopMappingClient};
pub use transit_notifier::{HttpTransitNotifier, TransitNotifier};
