//! Modelo de Repartidor
//!
//! Directorio de repartidores; el núcleo de rutas solo lo consulta para
//! validar existencia al asignar pedidos.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Repartidor - mapea a la tabla repartidores
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Repartidor {
    pub id: Uuid,
    pub nombre: String,
    pub telefono: Option<String>,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
}
