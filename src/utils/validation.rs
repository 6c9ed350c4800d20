//! Utilidades de validación
//!
//! Este módulo contiene las validaciones de conjuntos de pedidos que
//! comparten ProposeOrder y FinalizeRoute: ambas operaciones reciben
//! ids de pedido del caller y deben cubrir exactamente las paradas
//! actuales de la ruta antes de tocar ningún estado.

use std::collections::HashSet;

use uuid::Uuid;

use crate::utils::errors::AppError;

/// Diferencia entre el conjunto de paradas de una ruta y los ids
/// recibidos del caller.
#[derive(Debug, Default, PartialEq)]
pub struct DiferenciaPedidos {
    /// Paradas de la ruta que el caller no mencionó
    pub faltantes: Vec<Uuid>,
    /// Ids del caller que no son paradas de la ruta
    pub sobrantes: Vec<Uuid>,
    /// Ids que el caller repitió (o listó en ambos conjuntos)
    pub duplicados: Vec<Uuid>,
}

impl DiferenciaPedidos {
    pub fn es_exacta(&self) -> bool {
        self.faltantes.is_empty() && self.sobrantes.is_empty() && self.duplicados.is_empty()
    }
}

/// Comparar los ids propuestos contra el conjunto de paradas esperado.
///
/// El orden de los vectores devueltos es determinista (orden de
/// aparición en la entrada) para que los mensajes de error sean
/// reproducibles.
pub fn diferencia_pedidos(esperados: &HashSet<Uuid>, propuestos: &[Uuid]) -> DiferenciaPedidos {
    let mut vistos: HashSet<Uuid> = HashSet::with_capacity(propuestos.len());
    let mut diff = DiferenciaPedidos::default();

    for id in propuestos {
        if !vistos.insert(*id) {
            if !diff.duplicados.contains(id) {
                diff.duplicados.push(*id);
            }
            continue;
        }
        if !esperados.contains(id) {
            diff.sobrantes.push(*id);
        }
    }

    for id in esperados {
        if !vistos.contains(id) {
            diff.faltantes.push(*id);
        }
    }
    // HashSet no garantiza orden de iteración
    diff.faltantes.sort();

    diff
}

/// Validar que `propuestos` es una permutación exacta de las paradas.
///
/// Usado por ProposeOrder: cualquier id faltante, sobrante o duplicado
/// rechaza la secuencia completa.
pub fn validar_permutacion(esperados: &HashSet<Uuid>, propuestos: &[Uuid]) -> Result<(), AppError> {
    let diff = diferencia_pedidos(esperados, propuestos);
    if diff.es_exacta() {
        Ok(())
    } else {
        Err(AppError::SequenceMismatch {
            faltantes: diff.faltantes,
            sobrantes: diff.sobrantes,
            duplicados: diff.duplicados,
        })
    }
}

/// Validar que `entregados` y `no_entregados` particionan exactamente
/// las paradas de la ruta: sin omisiones, sin extras y sin solape.
///
/// Usado por FinalizeRoute; la violación no produce ninguna mutación.
pub fn validar_particion(
    esperados: &HashSet<Uuid>,
    entregados: &[Uuid],
    no_entregados: &[Uuid],
) -> Result<(), AppError> {
    let combinados: Vec<Uuid> = entregados
        .iter()
        .chain(no_entregados.iter())
        .copied()
        .collect();

    let diff = diferencia_pedidos(esperados, &combinados);
    if diff.es_exacta() {
        Ok(())
    } else {
        Err(AppError::IncompleteReconciliation {
            faltantes: diff.faltantes,
            sobrantes: diff.sobrantes,
            duplicados: diff.duplicados,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn permutacion_exacta_es_aceptada() {
        let pedidos = ids(3);
        let esperados: HashSet<Uuid> = pedidos.iter().copied().collect();
        let mut propuesta = pedidos.clone();
        propuesta.reverse();

        assert!(validar_permutacion(&esperados, &propuesta).is_ok());
    }

    #[test]
    fn permutacion_con_id_faltante_es_rechazada() {
        let pedidos = ids(3);
        let esperados: HashSet<Uuid> = pedidos.iter().copied().collect();
        let propuesta = vec![pedidos[0], pedidos[1]];

        match validar_permutacion(&esperados, &propuesta) {
            Err(AppError::SequenceMismatch { faltantes, sobrantes, duplicados }) => {
                assert_eq!(faltantes, vec![pedidos[2]]);
                assert!(sobrantes.is_empty());
                assert!(duplicados.is_empty());
            }
            other => panic!("se esperaba SequenceMismatch, se obtuvo {:?}", other),
        }
    }

    #[test]
    fn permutacion_con_id_ajeno_es_rechazada() {
        let pedidos = ids(2);
        let esperados: HashSet<Uuid> = pedidos.iter().copied().collect();
        let ajeno = Uuid::new_v4();
        let propuesta = vec![pedidos[0], pedidos[1], ajeno];

        match validar_permutacion(&esperados, &propuesta) {
            Err(AppError::SequenceMismatch { sobrantes, .. }) => {
                assert_eq!(sobrantes, vec![ajeno]);
            }
            other => panic!("se esperaba SequenceMismatch, se obtuvo {:?}", other),
        }
    }

    #[test]
    fn permutacion_con_duplicado_es_rechazada() {
        let pedidos = ids(2);
        let esperados: HashSet<Uuid> = pedidos.iter().copied().collect();
        let propuesta = vec![pedidos[0], pedidos[0]];

        match validar_permutacion(&esperados, &propuesta) {
            Err(AppError::SequenceMismatch { faltantes, duplicados, .. }) => {
                assert_eq!(duplicados, vec![pedidos[0]]);
                assert_eq!(faltantes, vec![pedidos[1]]);
            }
            other => panic!("se esperaba SequenceMismatch, se obtuvo {:?}", other),
        }
    }

    #[test]
    fn particion_exacta_es_aceptada() {
        let pedidos = ids(5);
        let esperados: HashSet<Uuid> = pedidos.iter().copied().collect();

        assert!(validar_particion(&esperados, &pedidos[..2], &pedidos[2..]).is_ok());
    }

    #[test]
    fn particion_con_omision_es_rechazada() {
        let pedidos = ids(5);
        let esperados: HashSet<Uuid> = pedidos.iter().copied().collect();

        // 3 de 5 paradas sin reconciliar
        match validar_particion(&esperados, &pedidos[..1], &pedidos[1..2]) {
            Err(AppError::IncompleteReconciliation { faltantes, .. }) => {
                assert_eq!(faltantes.len(), 3);
            }
            other => panic!("se esperaba IncompleteReconciliation, se obtuvo {:?}", other),
        }
    }

    #[test]
    fn particion_con_solape_es_rechazada() {
        let pedidos = ids(3);
        let esperados: HashSet<Uuid> = pedidos.iter().copied().collect();

        // pedidos[0] aparece como entregado y como no entregado
        match validar_particion(&esperados, &pedidos[..2], &pedidos[..1]) {
            Err(AppError::IncompleteReconciliation { duplicados, faltantes, .. }) => {
                assert_eq!(duplicados, vec![pedidos[0]]);
                assert_eq!(faltantes, vec![pedidos[2]]);
            }
            other => panic!("se esperaba IncompleteReconciliation, se obtuvo {:?}", other),
        }
    }

    #[test]
    fn particion_con_extra_es_rechazada() {
        let pedidos = ids(2);
        let esperados: HashSet<Uuid> = pedidos.iter().copied().collect();
        let ajeno = Uuid::new_v4();

        match validar_particion(&esperados, &pedidos[..], &[ajeno]) {
            Err(AppError::IncompleteReconciliation { sobrantes, .. }) => {
                assert_eq!(sobrantes, vec![ajeno]);
            }
            other => panic!("se esperaba IncompleteReconciliation, se obtuvo {:?}", other),
        }
    }
}
