//! Repositorios de acceso a datos

pub mod pedido_repository;
pub mod repartidor_repository;
pub mod ruta_repository;
