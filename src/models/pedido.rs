//! Vista del pool de pedidos
//!
//! El pedido pertenece al subsistema de pedidos; el núcleo de rutas solo
//! lee y escribe su vínculo de ruta (`ruta_id`) y el precondicionante
//! `repartidor_asignado`. El resto de los flags de preparación gobiernan
//! una transición ("en proceso") que este núcleo no realiza.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Pedido - vista sobre la tabla pedidos del subsistema de pedidos
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Pedido {
    pub id: Uuid,
    /// Vínculo de ruta: NULL cuando el pedido está en el pool,
    /// elegible para asignación
    pub ruta_id: Option<Uuid>,
    pub direccion: String,
    pub destinatario: String,
    pub total: Decimal,
    // Precondiciones de preparación del pedido (TNS/ERP). Este núcleo
    // solo es responsable de `repartidor_asignado`.
    pub contraparte_registrada: bool,
    pub pedido_registrado: bool,
    pub repartidor_asignado: bool,
    pub cargado_en_vehiculo: bool,
    pub created_at: DateTime<Utc>,
}
