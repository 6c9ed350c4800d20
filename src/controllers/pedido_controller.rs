//! Controller del pool de pedidos
//!
//! Solo lectura: el operador consulta qué pedidos siguen elegibles para
//! asignación. Las escrituras del vínculo de ruta pasan por el
//! controller de rutas.

use sqlx::PgPool;

use crate::dto::pedido_dto::PedidoPendienteResponse;
use crate::repositories::pedido_repository::PedidoRepository;
use crate::utils::errors::AppError;

pub struct PedidoController {
    repository: PedidoRepository,
}

impl PedidoController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PedidoRepository::new(pool),
        }
    }

    pub async fn listar_pendientes(&self) -> Result<Vec<PedidoPendienteResponse>, AppError> {
        let pedidos = self.repository.listar_pendientes().await?;

        Ok(pedidos
            .into_iter()
            .map(PedidoPendienteResponse::from)
            .collect())
    }
}
