//! DTOs de rutas de reparto

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::parada::{Parada, StopStatus};
use crate::models::route::{RouteStatus, Ruta};
use crate::models::ruta_alternativa::{EntradaSecuencia, RutaAlternativa};

/// Request para asignar pedidos a un repartidor creando una ruta nueva
#[derive(Debug, Deserialize, Validate)]
pub struct AsignarPedidosRequest {
    pub repartidor_id: Uuid,

    #[validate(length(min = 1, message = "debe incluir al menos un pedido"))]
    pub pedido_ids: Vec<Uuid>,

    #[validate(range(min = 1, message = "la capacidad debe ser positiva"))]
    pub capacidad_maxima: i32,

    #[validate(length(min = 3, max = 100))]
    pub nombre: String,

    #[validate(length(max = 500))]
    pub descripcion: Option<String>,

    pub creada_por: Uuid,
}

/// Request para finalizar una ruta en curso.
///
/// Los dos conjuntos deben particionar exactamente los pedidos de la
/// ruta; cualquier omisión, extra o solape rechaza la operación entera.
#[derive(Debug, Deserialize)]
pub struct FinalizarRutaRequest {
    pub entregados: Vec<Uuid>,
    pub no_entregados: Vec<Uuid>,
}

/// Request para proponer una secuencia alternativa de paradas
#[derive(Debug, Deserialize, Validate)]
pub struct ProponerSecuenciaRequest {
    /// Ids de pedido en el orden propuesto; debe ser una permutación
    /// completa de las paradas actuales
    #[validate(length(min = 1, message = "la secuencia no puede estar vacía"))]
    pub secuencia: Vec<Uuid>,

    #[validate(length(max = 500))]
    pub motivo: Option<String>,
}

/// Request para activar o desactivar la secuencia alternativa
#[derive(Debug, Deserialize)]
pub struct ActivarAlternativaRequest {
    pub activar: bool,
}

/// Response de una parada
#[derive(Debug, Serialize)]
pub struct ParadaResponse {
    pub id: Uuid,
    pub pedido_id: Uuid,
    pub asignacion_id: Uuid,
    pub secuencia: i32,
    pub estado: StopStatus,
    pub direccion: String,
    pub destinatario: String,
    pub total: Decimal,
}

/// Response de la secuencia alternativa
#[derive(Debug, Serialize)]
pub struct RutaAlternativaResponse {
    pub secuencia: Vec<EntradaSecuencia>,
    pub activa: bool,
    pub motivo: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Response de detalle de ruta
#[derive(Debug, Serialize)]
pub struct RutaResponse {
    pub id: Uuid,
    pub repartidor_id: Uuid,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub estado: RouteStatus,
    pub capacidad_maxima: i32,
    pub total_paradas: i32,
    pub distancia_km: Option<Decimal>,
    pub tiempo_estimado_min: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    /// Paradas en orden canónico
    pub paradas: Vec<ParadaResponse>,
    pub ruta_alternativa: Option<RutaAlternativaResponse>,
    /// Orden de entrega vigente: el de la alternativa si está activa y
    /// al día, el canónico en cualquier otro caso
    pub secuencia_efectiva: Vec<Uuid>,
}

/// Response resumida para listados
#[derive(Debug, Serialize)]
pub struct RutaResumenResponse {
    pub id: Uuid,
    pub repartidor_id: Uuid,
    pub nombre: String,
    pub estado: RouteStatus,
    pub total_paradas: i32,
    pub distancia_km: Option<Decimal>,
    pub tiempo_estimado_min: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Response de una operación de ciclo de vida (asignar/iniciar/finalizar/
/// cancelar). Las advertencias reportan fallos de colaboradores externos
/// que no anulan la operación local.
#[derive(Debug, Serialize)]
pub struct OperacionRutaResponse {
    pub ruta: RutaResumenResponse,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub advertencias: Vec<String>,
}

impl From<Parada> for ParadaResponse {
    fn from(p: Parada) -> Self {
        Self {
            id: p.id,
            pedido_id: p.pedido_id,
            asignacion_id: p.asignacion_id,
            secuencia: p.secuencia,
            estado: p.estado,
            direccion: p.direccion,
            destinatario: p.destinatario,
            total: p.total,
        }
    }
}

impl From<RutaAlternativa> for RutaAlternativaResponse {
    fn from(alt: RutaAlternativa) -> Self {
        Self {
            secuencia: alt.secuencia.0,
            activa: alt.activa,
            motivo: alt.motivo,
            created_at: alt.created_at,
        }
    }
}

impl From<Ruta> for RutaResumenResponse {
    fn from(ruta: Ruta) -> Self {
        Self {
            id: ruta.id,
            repartidor_id: ruta.repartidor_id,
            nombre: ruta.nombre,
            estado: ruta.estado,
            total_paradas: ruta.total_paradas,
            distancia_km: ruta.distancia_km,
            tiempo_estimado_min: ruta.tiempo_estimado_min,
            created_at: ruta.created_at,
        }
    }
}
