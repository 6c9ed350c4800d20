//! Modelo de Parada
//!
//! Una parada es la entrada de un pedido dentro de una ruta. Las paradas
//! nunca se borran: solo transicionan de estado. La posición canónica
//! (`secuencia`) es una permutación contigua 1..n dentro de la ruta.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado de la parada - mapea al ENUM stop_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "stop_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StopStatus {
    Pendiente,
    EnCamino,
    Entregado,
    NoEntregado,
    Cancelado,
}

impl StopStatus {
    /// Estados finales de una parada: ya no cambian
    pub fn es_final(&self) -> bool {
        matches!(
            self,
            StopStatus::Entregado | StopStatus::NoEntregado | StopStatus::Cancelado
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StopStatus::Pendiente => "pendiente",
            StopStatus::EnCamino => "en_camino",
            StopStatus::Entregado => "entregado",
            StopStatus::NoEntregado => "no_entregado",
            StopStatus::Cancelado => "cancelado",
        }
    }
}

impl std::fmt::Display for StopStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parada - mapea exactamente a la tabla paradas
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Parada {
    pub id: Uuid,
    pub ruta_id: Uuid,
    pub pedido_id: Uuid,
    pub asignacion_id: Uuid,
    /// Posición canónica dentro de la ruta, 1-based
    pub secuencia: i32,
    pub estado: StopStatus,
    // Metadatos del pedido denormalizados, solo para mostrar
    pub direccion: String,
    pub destinatario: String,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Verificar que las posiciones canónicas forman la permutación
/// contigua 1..n sin huecos ni repetidos.
pub fn secuencia_contigua(paradas: &[Parada]) -> bool {
    let mut posiciones: Vec<i32> = paradas.iter().map(|p| p.secuencia).collect();
    posiciones.sort_unstable();
    posiciones
        .iter()
        .enumerate()
        .all(|(i, s)| *s == (i as i32) + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parada(secuencia: i32) -> Parada {
        Parada {
            id: Uuid::new_v4(),
            ruta_id: Uuid::new_v4(),
            pedido_id: Uuid::new_v4(),
            asignacion_id: Uuid::new_v4(),
            secuencia,
            estado: StopStatus::Pendiente,
            direccion: "Calle Falsa 123".to_string(),
            destinatario: "Cliente".to_string(),
            total: Decimal::ZERO,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn secuencia_contigua_acepta_permutacion_completa() {
        let paradas = vec![parada(3), parada(1), parada(2)];
        assert!(secuencia_contigua(&paradas));
    }

    #[test]
    fn secuencia_con_hueco_es_invalida() {
        let paradas = vec![parada(1), parada(3)];
        assert!(!secuencia_contigua(&paradas));
    }

    #[test]
    fn secuencia_con_repetido_es_invalida() {
        let paradas = vec![parada(1), parada(2), parada(2)];
        assert!(!secuencia_contigua(&paradas));
    }

    #[test]
    fn secuencia_vacia_es_valida() {
        assert!(secuencia_contigua(&[]));
    }

    #[test]
    fn estados_finales_de_parada() {
        assert!(StopStatus::Entregado.es_final());
        assert!(StopStatus::NoEntregado.es_final());
        assert!(StopStatus::Cancelado.es_final());
        assert!(!StopStatus::Pendiente.es_final());
        assert!(!StopStatus::EnCamino.es_final());
    }
}
