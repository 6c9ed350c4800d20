//! Repositorio del directorio de repartidores
//!
//! El núcleo de rutas solo necesita validar existencia al asignar.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::repartidor::Repartidor;
use crate::utils::errors::AppError;

pub struct RepartidorRepository {
    pool: PgPool,
}

impl RepartidorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Repartidor>, AppError> {
        let repartidor =
            sqlx::query_as::<_, Repartidor>("SELECT * FROM repartidores WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(repartidor)
    }

    /// Un repartidor existe para el ruteo solo si sigue activo
    pub async fn existe(&self, id: Uuid) -> Result<bool, AppError> {
        let repartidor = self.find_by_id(id).await?;
        Ok(repartidor.map(|r| r.activo).unwrap_or(false))
    }
}
