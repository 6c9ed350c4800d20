//! Routers de la API

pub mod pedido_routes;
pub mod ruta_routes;
