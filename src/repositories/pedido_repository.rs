//! Repositorio del pool de pedidos
//!
//! Adaptador de solo-consulta sobre la tabla del subsistema de pedidos.
//! Las escrituras del vínculo de ruta (reserva y liberación) viven en
//! las transacciones del repositorio de rutas.

use sqlx::PgPool;

use crate::models::pedido::Pedido;
use crate::utils::errors::AppError;

pub struct PedidoRepository {
    pool: PgPool,
}

impl PedidoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Pedidos elegibles para asignación: sin ruta vinculada
    pub async fn listar_pendientes(&self) -> Result<Vec<Pedido>, AppError> {
        let pedidos = sqlx::query_as::<_, Pedido>(
            "SELECT * FROM pedidos WHERE ruta_id IS NULL ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(pedidos)
    }
}
