//! Modelo de Ruta
//!
//! Este módulo contiene el struct Ruta y su máquina de estados.
//! Mapea exactamente al schema PostgreSQL con primary key 'id'.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado de la ruta - mapea al ENUM route_status
///
/// `planificada` y `activa` son ambos estados previos al inicio y
/// equivalentes para la transición de arranque; `completada` y
/// `cancelada` son terminales e inmutables.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "route_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RouteStatus {
    Planificada,
    Activa,
    EnCurso,
    Completada,
    Cancelada,
}

impl RouteStatus {
    /// Estados terminales: rechazan toda mutación posterior
    pub fn es_terminal(&self) -> bool {
        matches!(self, RouteStatus::Completada | RouteStatus::Cancelada)
    }

    /// Estados desde los que se acepta StartRoute
    pub fn acepta_inicio(&self) -> bool {
        matches!(self, RouteStatus::Planificada | RouteStatus::Activa)
    }

    /// Estados desde los que se acepta FinalizeRoute
    pub fn acepta_finalizacion(&self) -> bool {
        matches!(self, RouteStatus::EnCurso)
    }

    /// Nombre tal como se persiste en el ENUM de PostgreSQL
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteStatus::Planificada => "planificada",
            RouteStatus::Activa => "activa",
            RouteStatus::EnCurso => "en_curso",
            RouteStatus::Completada => "completada",
            RouteStatus::Cancelada => "cancelada",
        }
    }
}

impl std::fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ruta principal - mapea exactamente a la tabla rutas
///
/// Una ruta pertenece a exactamente un repartidor; un repartidor tiene
/// como máximo una ruta sin terminar a la vez (invariante verificado en
/// la transacción de creación, no por el modelo).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ruta {
    pub id: Uuid,
    pub repartidor_id: Uuid,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub capacidad_maxima: i32,
    pub total_paradas: i32,
    pub estado: RouteStatus,
    /// Estimaciones consultivas del servicio de mapas; NULL si el
    /// servicio falló al crear la ruta
    pub distancia_km: Option<Decimal>,
    pub tiempo_estimado_min: Option<i32>,
    pub creada_por: Uuid,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solo_completada_y_cancelada_son_terminales() {
        assert!(RouteStatus::Completada.es_terminal());
        assert!(RouteStatus::Cancelada.es_terminal());
        assert!(!RouteStatus::Planificada.es_terminal());
        assert!(!RouteStatus::Activa.es_terminal());
        assert!(!RouteStatus::EnCurso.es_terminal());
    }

    #[test]
    fn planificada_y_activa_aceptan_inicio() {
        assert!(RouteStatus::Planificada.acepta_inicio());
        assert!(RouteStatus::Activa.acepta_inicio());
        assert!(!RouteStatus::EnCurso.acepta_inicio());
        assert!(!RouteStatus::Completada.acepta_inicio());
        assert!(!RouteStatus::Cancelada.acepta_inicio());
    }

    #[test]
    fn solo_en_curso_acepta_finalizacion() {
        assert!(RouteStatus::EnCurso.acepta_finalizacion());
        assert!(!RouteStatus::Planificada.acepta_finalizacion());
        assert!(!RouteStatus::Activa.acepta_finalizacion());
        assert!(!RouteStatus::Completada.acepta_finalizacion());
        assert!(!RouteStatus::Cancelada.acepta_finalizacion());
    }

    #[test]
    fn display_usa_el_nombre_persistido() {
        assert_eq!(RouteStatus::EnCurso.to_string(), "en_curso");
        assert_eq!(RouteStatus::Planificada.to_string(), "planificada");
    }
}
