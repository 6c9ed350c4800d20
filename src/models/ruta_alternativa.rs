//! Modelo de Ruta Alternativa
//!
//! Una ruta alternativa es un reordenamiento propuesto de las paradas de
//! una ruta. Es un registro paralelo: nunca muta el campo `secuencia`
//! canónico de las paradas, y se activa/desactiva con un flag para poder
//! probar un orden y revertirlo al instante. Hay a lo sumo una por ruta
//! y cada ProposeOrder la reemplaza por completo.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::parada::Parada;

/// Par (pedido, posición) dentro de la secuencia alternativa.
/// Se persiste como JSONB en la columna `secuencia`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntradaSecuencia {
    pub pedido_id: Uuid,
    pub secuencia: i32,
}

/// Ruta alternativa - mapea a la tabla rutas_alternativas (1:1 con rutas)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RutaAlternativa {
    pub ruta_id: Uuid,
    pub secuencia: sqlx::types::Json<Vec<EntradaSecuencia>>,
    pub activa: bool,
    pub motivo: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl RutaAlternativa {
    /// Una alternativa es válida solo si su conjunto de pedidos coincide
    /// exactamente con el de las paradas actuales. Si divergen, la
    /// alternativa quedó obsoleta y los lectores deben ignorarla.
    pub fn cubre_paradas(&self, paradas: &[Parada]) -> bool {
        if self.secuencia.len() != paradas.len() {
            return false;
        }
        let propios: HashSet<Uuid> = self.secuencia.iter().map(|e| e.pedido_id).collect();
        propios.len() == paradas.len() && paradas.iter().all(|p| propios.contains(&p.pedido_id))
    }
}

/// Resolver el orden de entrega vigente de una ruta.
///
/// Única función de resolución: si existe una alternativa activa y no
/// obsoleta, su orden gobierna; en cualquier otro caso gobierna la
/// secuencia canónica de las paradas. Todo lector de orden de ruta
/// (detalle, próxima parada) pasa por aquí.
pub fn secuencia_efectiva(
    paradas: &[Parada],
    alternativa: Option<&RutaAlternativa>,
) -> Vec<Uuid> {
    if let Some(alt) = alternativa {
        if alt.activa && alt.cubre_paradas(paradas) {
            let mut entradas: Vec<&EntradaSecuencia> = alt.secuencia.iter().collect();
            entradas.sort_by_key(|e| e.secuencia);
            return entradas.iter().map(|e| e.pedido_id).collect();
        }
    }

    let mut ordenadas: Vec<&Parada> = paradas.iter().collect();
    ordenadas.sort_by_key(|p| p.secuencia);
    ordenadas.iter().map(|p| p.pedido_id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parada::StopStatus;
    use rust_decimal::Decimal;

    fn parada(pedido_id: Uuid, secuencia: i32) -> Parada {
        Parada {
            id: Uuid::new_v4(),
            ruta_id: Uuid::new_v4(),
            pedido_id,
            asignacion_id: Uuid::new_v4(),
            secuencia,
            estado: StopStatus::Pendiente,
            direccion: "Av. Principal 1".to_string(),
            destinatario: "Cliente".to_string(),
            total: Decimal::ZERO,
            created_at: Utc::now(),
        }
    }

    fn alternativa(ruta_id: Uuid, orden: &[Uuid], activa: bool) -> RutaAlternativa {
        RutaAlternativa {
            ruta_id,
            secuencia: sqlx::types::Json(
                orden
                    .iter()
                    .enumerate()
                    .map(|(i, id)| EntradaSecuencia {
                        pedido_id: *id,
                        secuencia: (i as i32) + 1,
                    })
                    .collect(),
            ),
            activa,
            motivo: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn sin_alternativa_gobierna_la_secuencia_canonica() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let paradas = vec![parada(b, 2), parada(a, 1), parada(c, 3)];

        assert_eq!(secuencia_efectiva(&paradas, None), vec![a, b, c]);
    }

    #[test]
    fn alternativa_activa_gobierna_sin_tocar_lo_canonico() {
        // Escenario: paradas [A:1, B:2, C:3], propuesta [C, A, B]
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let paradas = vec![parada(a, 1), parada(b, 2), parada(c, 3)];
        let alt = alternativa(paradas[0].ruta_id, &[c, a, b], true);

        assert_eq!(secuencia_efectiva(&paradas, Some(&alt)), vec![c, a, b]);
        // Las posiciones canónicas no cambiaron
        assert_eq!(paradas[0].secuencia, 1);
        assert_eq!(paradas[1].secuencia, 2);
        assert_eq!(paradas[2].secuencia, 3);
    }

    #[test]
    fn alternativa_inactiva_restaura_el_orden_canonico() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let paradas = vec![parada(a, 1), parada(b, 2), parada(c, 3)];
        let alt = alternativa(paradas[0].ruta_id, &[c, a, b], false);

        assert_eq!(secuencia_efectiva(&paradas, Some(&alt)), vec![a, b, c]);
    }

    #[test]
    fn alternativa_obsoleta_se_ignora() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let paradas = vec![parada(a, 1), parada(b, 2), parada(c, 3)];
        // La alternativa referencia un pedido que ya no es parada
        let ajeno = Uuid::new_v4();
        let alt = alternativa(paradas[0].ruta_id, &[ajeno, a, b], true);

        assert!(!alt.cubre_paradas(&paradas));
        assert_eq!(secuencia_efectiva(&paradas, Some(&alt)), vec![a, b, c]);
    }

    #[test]
    fn alternativa_incompleta_se_ignora() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let paradas = vec![parada(a, 1), parada(b, 2), parada(c, 3)];
        let alt = alternativa(paradas[0].ruta_id, &[b, a], true);

        assert_eq!(secuencia_efectiva(&paradas, Some(&alt)), vec![a, b, c]);
    }
}
