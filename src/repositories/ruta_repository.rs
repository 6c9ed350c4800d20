//! Repositorio de rutas
//!
//! Toda mutación de una ruta (con sus paradas y su alternativa) se
//! ejecuta como una transacción única sobre esa ruta: leer, validar
//! contra el estado actual, escribir. Las transiciones de ciclo de vida
//! usan UPDATEs condicionados al estado vigente, de modo que dos
//! llamadas concurrentes nunca pueden ganar las dos.

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::parada::Parada;
use crate::models::pedido::Pedido;
use crate::models::route::{RouteStatus, Ruta};
use crate::models::ruta_alternativa::{EntradaSecuencia, RutaAlternativa};
use crate::utils::errors::{not_found_error, AppError};

pub struct RutaRepository {
    pool: PgPool,
}

impl RutaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Crear una ruta `planificada` con una parada por pedido, reservando
    /// los pedidos en la misma transacción.
    ///
    /// La reserva es un UPDATE condicionado a `ruta_id IS NULL`: si algún
    /// pedido ya está vinculado a otra ruta el conteo queda corto, la
    /// transacción se revierte completa y se reporta qué pedidos no
    /// estaban disponibles.
    pub async fn crear_con_paradas(
        &self,
        repartidor_id: Uuid,
        pedido_ids: &[Uuid],
        capacidad_maxima: i32,
        nombre: &str,
        descripcion: Option<&str>,
        creada_por: Uuid,
    ) -> Result<(Ruta, Vec<Parada>), AppError> {
        let mut tx = self.pool.begin().await?;

        // Un repartidor tiene a lo sumo una ruta sin terminar
        let ocupado: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM rutas
                WHERE repartidor_id = $1
                  AND estado IN ('planificada', 'activa', 'en_curso')
            )
            "#,
        )
        .bind(repartidor_id)
        .fetch_one(&mut *tx)
        .await?;

        if ocupado {
            return Err(AppError::CourierBusy { repartidor_id });
        }

        let ruta_id = Uuid::new_v4();
        let ruta = sqlx::query_as::<_, Ruta>(
            r#"
            INSERT INTO rutas (id, repartidor_id, nombre, descripcion, capacidad_maxima,
                               total_paradas, estado, creada_por, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, 'planificada', $7, $8)
            RETURNING *
            "#,
        )
        .bind(ruta_id)
        .bind(repartidor_id)
        .bind(nombre)
        .bind(descripcion)
        .bind(capacidad_maxima)
        .bind(pedido_ids.len() as i32)
        .bind(creada_por)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        // Reservar los pedidos: solo los que siguen en el pool
        let reservados = sqlx::query_as::<_, Pedido>(
            r#"
            UPDATE pedidos
            SET ruta_id = $1, repartidor_asignado = TRUE
            WHERE id = ANY($2) AND ruta_id IS NULL
            RETURNING *
            "#,
        )
        .bind(ruta_id)
        .bind(pedido_ids)
        .fetch_all(&mut *tx)
        .await?;

        if reservados.len() != pedido_ids.len() {
            let reservados_ids: Vec<Uuid> = reservados.iter().map(|p| p.id).collect();
            let no_disponibles: Vec<Uuid> = pedido_ids
                .iter()
                .filter(|id| !reservados_ids.contains(id))
                .copied()
                .collect();
            tx.rollback().await?;
            return Err(AppError::OrderUnavailable { no_disponibles });
        }

        let por_id: HashMap<Uuid, Pedido> =
            reservados.into_iter().map(|p| (p.id, p)).collect();

        // Una parada por pedido; secuencia = orden de asignación
        let mut paradas = Vec::with_capacity(pedido_ids.len());
        for (idx, pedido_id) in pedido_ids.iter().enumerate() {
            let pedido = por_id.get(pedido_id).ok_or_else(|| {
                AppError::Internal(format!("pedido reservado {} no encontrado", pedido_id))
            })?;

            let parada = sqlx::query_as::<_, Parada>(
                r#"
                INSERT INTO paradas (id, ruta_id, pedido_id, asignacion_id, secuencia,
                                     estado, direccion, destinatario, total, created_at)
                VALUES ($1, $2, $3, $4, $5, 'pendiente', $6, $7, $8, $9)
                RETURNING *
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(ruta_id)
            .bind(pedido_id)
            .bind(Uuid::new_v4())
            .bind((idx as i32) + 1)
            .bind(&pedido.direccion)
            .bind(&pedido.destinatario)
            .bind(pedido.total)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await?;

            paradas.push(parada);
        }

        tx.commit().await?;
        Ok((ruta, paradas))
    }

    /// Iniciar la ruta: válido solo desde `planificada`/`activa`.
    /// Todas las paradas pendientes pasan a `en_camino`.
    pub async fn iniciar(&self, ruta_id: Uuid) -> Result<(Ruta, Vec<Parada>), AppError> {
        let mut tx = self.pool.begin().await?;

        let ruta = sqlx::query_as::<_, Ruta>(
            r#"
            UPDATE rutas
            SET estado = 'en_curso', started_at = $2
            WHERE id = $1 AND estado IN ('planificada', 'activa')
            RETURNING *
            "#,
        )
        .bind(ruta_id)
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await?;

        let ruta = match ruta {
            Some(ruta) => ruta,
            None => return Err(error_de_transicion(&mut tx, ruta_id, "iniciar").await),
        };

        sqlx::query(
            "UPDATE paradas SET estado = 'en_camino' WHERE ruta_id = $1 AND estado = 'pendiente'",
        )
        .bind(ruta_id)
        .execute(&mut *tx)
        .await?;

        let paradas = paradas_de(&mut tx, ruta_id).await?;

        tx.commit().await?;
        Ok((ruta, paradas))
    }

    /// Cerrar la ruta reconciliando cada parada como entregada o no
    /// entregada. Los pedidos no entregados vuelven al pool en la misma
    /// transacción: o la ruta cierra y todas las paradas quedan
    /// reconciliadas, o no pasa nada.
    ///
    /// La partición ya viene validada por el controller; aquí solo se
    /// aplica, condicionada a que la ruta siga `en_curso`.
    pub async fn finalizar(
        &self,
        ruta_id: Uuid,
        entregados: &[Uuid],
        no_entregados: &[Uuid],
    ) -> Result<(Ruta, Vec<Parada>), AppError> {
        let mut tx = self.pool.begin().await?;

        let ruta = sqlx::query_as::<_, Ruta>(
            r#"
            UPDATE rutas
            SET estado = 'completada', ended_at = $2
            WHERE id = $1 AND estado = 'en_curso'
            RETURNING *
            "#,
        )
        .bind(ruta_id)
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await?;

        let ruta = match ruta {
            Some(ruta) => ruta,
            None => return Err(error_de_transicion(&mut tx, ruta_id, "finalizar").await),
        };

        sqlx::query(
            "UPDATE paradas SET estado = 'entregado' WHERE ruta_id = $1 AND pedido_id = ANY($2)",
        )
        .bind(ruta_id)
        .bind(entregados)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE paradas SET estado = 'no_entregado' WHERE ruta_id = $1 AND pedido_id = ANY($2)",
        )
        .bind(ruta_id)
        .bind(no_entregados)
        .execute(&mut *tx)
        .await?;

        // Reconciliador: liberar los no entregados para reasignación.
        // Es el único camino por el que un pedido ya ruteado vuelve al pool.
        sqlx::query(
            r#"
            UPDATE pedidos
            SET ruta_id = NULL, repartidor_asignado = FALSE
            WHERE id = ANY($1)
            "#,
        )
        .bind(no_entregados)
        .execute(&mut *tx)
        .await?;

        let paradas = paradas_de(&mut tx, ruta_id).await?;

        tx.commit().await?;
        Ok((ruta, paradas))
    }

    /// Cancelar una ruta sin terminar. Las paradas no finales pasan a
    /// `cancelado` y todos los pedidos no entregados vuelven al pool.
    pub async fn cancelar(&self, ruta_id: Uuid) -> Result<(Ruta, Vec<Parada>), AppError> {
        let mut tx = self.pool.begin().await?;

        let ruta = sqlx::query_as::<_, Ruta>(
            r#"
            UPDATE rutas
            SET estado = 'cancelada', ended_at = $2
            WHERE id = $1 AND estado IN ('planificada', 'activa', 'en_curso')
            RETURNING *
            "#,
        )
        .bind(ruta_id)
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await?;

        let ruta = match ruta {
            Some(ruta) => ruta,
            None => return Err(error_de_transicion(&mut tx, ruta_id, "cancelar").await),
        };

        sqlx::query(
            r#"
            UPDATE paradas
            SET estado = 'cancelado'
            WHERE ruta_id = $1 AND estado IN ('pendiente', 'en_camino')
            "#,
        )
        .bind(ruta_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE pedidos
            SET ruta_id = NULL, repartidor_asignado = FALSE
            WHERE id IN (
                SELECT pedido_id FROM paradas
                WHERE ruta_id = $1 AND estado <> 'entregado'
            )
            "#,
        )
        .bind(ruta_id)
        .execute(&mut *tx)
        .await?;

        let paradas = paradas_de(&mut tx, ruta_id).await?;

        tx.commit().await?;
        Ok((ruta, paradas))
    }

    /// Guardar las estimaciones consultivas del servicio de mapas
    pub async fn actualizar_estimaciones(
        &self,
        ruta_id: Uuid,
        distancia_km: Decimal,
        tiempo_estimado_min: i32,
    ) -> Result<Ruta, AppError> {
        let ruta = sqlx::query_as::<_, Ruta>(
            r#"
            UPDATE rutas
            SET distancia_km = $2, tiempo_estimado_min = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(ruta_id)
        .bind(distancia_km)
        .bind(tiempo_estimado_min)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found_error("Ruta", &ruta_id.to_string()))?;

        Ok(ruta)
    }

    pub async fn find_by_id(&self, ruta_id: Uuid) -> Result<Option<Ruta>, AppError> {
        let ruta = sqlx::query_as::<_, Ruta>("SELECT * FROM rutas WHERE id = $1")
            .bind(ruta_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(ruta)
    }

    pub async fn find_paradas(&self, ruta_id: Uuid) -> Result<Vec<Parada>, AppError> {
        let paradas = sqlx::query_as::<_, Parada>(
            "SELECT * FROM paradas WHERE ruta_id = $1 ORDER BY secuencia",
        )
        .bind(ruta_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(paradas)
    }

    pub async fn find_alternativa(
        &self,
        ruta_id: Uuid,
    ) -> Result<Option<RutaAlternativa>, AppError> {
        let alternativa = sqlx::query_as::<_, RutaAlternativa>(
            "SELECT * FROM rutas_alternativas WHERE ruta_id = $1",
        )
        .bind(ruta_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(alternativa)
    }

    pub async fn listar_por_repartidor(
        &self,
        repartidor_id: Uuid,
        estado: Option<RouteStatus>,
    ) -> Result<Vec<Ruta>, AppError> {
        let rutas = sqlx::query_as::<_, Ruta>(
            r#"
            SELECT * FROM rutas
            WHERE repartidor_id = $1
              AND ($2::route_status IS NULL OR estado = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(repartidor_id)
        .bind(estado)
        .fetch_all(&self.pool)
        .await?;

        Ok(rutas)
    }

    /// Reemplazar por completo la secuencia alternativa de la ruta.
    /// La propuesta nueva entra desactivada.
    pub async fn reemplazar_alternativa(
        &self,
        ruta_id: Uuid,
        entradas: &[EntradaSecuencia],
        motivo: Option<&str>,
    ) -> Result<RutaAlternativa, AppError> {
        let alternativa = sqlx::query_as::<_, RutaAlternativa>(
            r#"
            INSERT INTO rutas_alternativas (ruta_id, secuencia, activa, motivo, created_at)
            VALUES ($1, $2, FALSE, $3, $4)
            ON CONFLICT (ruta_id) DO UPDATE
            SET secuencia = EXCLUDED.secuencia,
                activa = FALSE,
                motivo = EXCLUDED.motivo,
                created_at = EXCLUDED.created_at
            RETURNING *
            "#,
        )
        .bind(ruta_id)
        .bind(sqlx::types::Json(entradas))
        .bind(motivo)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(alternativa)
    }

    /// Activar o desactivar la alternativa. No toca ninguna parada.
    pub async fn activar_alternativa(
        &self,
        ruta_id: Uuid,
        activar: bool,
    ) -> Result<RutaAlternativa, AppError> {
        let alternativa = sqlx::query_as::<_, RutaAlternativa>(
            "UPDATE rutas_alternativas SET activa = $2 WHERE ruta_id = $1 RETURNING *",
        )
        .bind(ruta_id)
        .bind(activar)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("La ruta {} no tiene secuencia alternativa", ruta_id))
        })?;

        Ok(alternativa)
    }
}

/// Construir el error de estado preciso cuando un UPDATE condicional no
/// afectó ninguna fila: la ruta no existe, está cerrada, o está en un
/// estado que no admite la operación.
async fn error_de_transicion(
    tx: &mut Transaction<'_, Postgres>,
    ruta_id: Uuid,
    operacion: &'static str,
) -> AppError {
    let estado = sqlx::query_scalar::<_, RouteStatus>("SELECT estado FROM rutas WHERE id = $1")
        .bind(ruta_id)
        .fetch_optional(&mut **tx)
        .await;

    match estado {
        Ok(Some(estado)) if estado.es_terminal() => AppError::RouteClosed(estado),
        Ok(Some(estado)) => AppError::InvalidTransition { estado, operacion },
        Ok(None) => not_found_error("Ruta", &ruta_id.to_string()),
        Err(e) => AppError::Database(e),
    }
}

async fn paradas_de(
    tx: &mut Transaction<'_, Postgres>,
    ruta_id: Uuid,
) -> Result<Vec<Parada>, AppError> {
    let paradas = sqlx::query_as::<_, Parada>(
        "SELECT * FROM paradas WHERE ruta_id = $1 ORDER BY secuencia",
    )
    .bind(ruta_id)
    .fetch_all(&mut **tx)
    .await?;

    Ok(paradas)
}
