//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL con las convenciones estándar.

pub mod parada;
pub mod pedido;
pub mod repartidor;
pub mod route;
pub mod ruta_alternativa;
