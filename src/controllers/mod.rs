//! Controllers de la API
//!
//! Orquestan validación, repositorios y colaboradores externos.

pub mod pedido_controller;
pub mod ruta_controller;
