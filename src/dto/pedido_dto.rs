//! DTOs del pool de pedidos

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::pedido::Pedido;

/// Response de un pedido elegible para asignación
#[derive(Debug, Serialize)]
pub struct PedidoPendienteResponse {
    pub id: Uuid,
    pub direccion: String,
    pub destinatario: String,
    pub total: Decimal,
    pub contraparte_registrada: bool,
    pub pedido_registrado: bool,
    pub repartidor_asignado: bool,
    pub cargado_en_vehiculo: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Pedido> for PedidoPendienteResponse {
    fn from(p: Pedido) -> Self {
        Self {
            id: p.id,
            direccion: p.direccion,
            destinatario: p.destinatario,
            total: p.total,
            contraparte_registrada: p.contraparte_registrada,
            pedido_registrado: p.pedido_registrado,
            repartidor_asignado: p.repartidor_asignado,
            cargado_en_vehiculo: p.cargado_en_vehiculo,
            created_at: p.created_at,
        }
    }
}
