//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::models::route::RouteStatus;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // Errores de validación del núcleo de rutas: se rechazan antes de
    // mutar estado; el caller corrige la entrada y reintenta.
    #[error("se asignaron {solicitados} pedidos pero la capacidad de la ruta es {capacidad}")]
    CapacityExceeded { solicitados: usize, capacidad: i32 },

    #[error("la secuencia propuesta no coincide con las paradas de la ruta")]
    SequenceMismatch {
        faltantes: Vec<Uuid>,
        sobrantes: Vec<Uuid>,
        duplicados: Vec<Uuid>,
    },

    #[error("la reconciliación no cubre exactamente las paradas de la ruta")]
    IncompleteReconciliation {
        faltantes: Vec<Uuid>,
        sobrantes: Vec<Uuid>,
        duplicados: Vec<Uuid>,
    },

    // Errores de estado: la vista del caller quedó obsoleta; debe
    // re-leer el estado actual antes de reintentar.
    #[error("la ruta está en estado '{estado}' y no admite la operación '{operacion}'")]
    InvalidTransition {
        estado: RouteStatus,
        operacion: &'static str,
    },

    #[error("la ruta está cerrada en estado '{0}' y no admite más cambios")]
    RouteClosed(RouteStatus),

    #[error("{} pedido(s) ya están asignados a otra ruta activa", .no_disponibles.len())]
    OrderUnavailable { no_disponibles: Vec<Uuid> },

    #[error("el repartidor {repartidor_id} ya tiene una ruta sin terminar")]
    CourierBusy { repartidor_id: Uuid },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("External API error: {0}")]
    ExternalApi(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Database(e) => {
                eprintln!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Database Error".to_string(),
                        message: "An error occurred while accessing the database".to_string(),
                        details: Some(json!({ "sql_error": e.to_string() })),
                        code: Some("DB_ERROR".to_string()),
                    },
                )
            }

            AppError::Validation(e) => {
                eprintln!("Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Validation Error".to_string(),
                        message: "The provided data is invalid".to_string(),
                        details: Some(json!(e)),
                        code: Some("VALIDATION_ERROR".to_string()),
                    },
                )
            }

            AppError::CapacityExceeded { solicitados, capacidad } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse {
                    error: "Capacity Exceeded".to_string(),
                    message: format!(
                        "Se intentaron asignar {} pedidos pero la capacidad máxima de la ruta es {}",
                        solicitados, capacidad
                    ),
                    details: Some(json!({
                        "pedidos_solicitados": solicitados,
                        "capacidad_maxima": capacidad,
                    })),
                    code: Some("CAPACITY_EXCEEDED".to_string()),
                },
            ),

            AppError::SequenceMismatch { faltantes, sobrantes, duplicados } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse {
                    error: "Sequence Mismatch".to_string(),
                    message: format!(
                        "La secuencia propuesta no es una permutación de las paradas: {} faltante(s), {} sobrante(s), {} duplicado(s)",
                        faltantes.len(),
                        sobrantes.len(),
                        duplicados.len()
                    ),
                    details: Some(json!({
                        "pedidos_faltantes": faltantes,
                        "pedidos_sobrantes": sobrantes,
                        "pedidos_duplicados": duplicados,
                    })),
                    code: Some("SEQUENCE_MISMATCH".to_string()),
                },
            ),

            AppError::IncompleteReconciliation { faltantes, sobrantes, duplicados } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse {
                    error: "Incomplete Reconciliation".to_string(),
                    message: format!(
                        "La reconciliación no particiona las paradas de la ruta: {} faltante(s), {} sobrante(s), {} repetido(s)",
                        faltantes.len(),
                        sobrantes.len(),
                        duplicados.len()
                    ),
                    details: Some(json!({
                        "pedidos_faltantes": faltantes,
                        "pedidos_sobrantes": sobrantes,
                        "pedidos_repetidos": duplicados,
                    })),
                    code: Some("INCOMPLETE_RECONCILIATION".to_string()),
                },
            ),

            AppError::InvalidTransition { estado, operacion } => (
                StatusCode::CONFLICT,
                ErrorResponse {
                    error: "Invalid Transition".to_string(),
                    message: format!(
                        "La ruta está en estado '{}' y no admite la operación '{}'",
                        estado, operacion
                    ),
                    details: Some(json!({ "estado_actual": estado, "operacion": operacion })),
                    code: Some("INVALID_TRANSITION".to_string()),
                },
            ),

            AppError::RouteClosed(estado) => (
                StatusCode::CONFLICT,
                ErrorResponse {
                    error: "Route Closed".to_string(),
                    message: format!(
                        "La ruta está cerrada en estado '{}' y no admite más cambios",
                        estado
                    ),
                    details: Some(json!({ "estado_actual": estado })),
                    code: Some("ROUTE_CLOSED".to_string()),
                },
            ),

            AppError::OrderUnavailable { no_disponibles } => (
                StatusCode::CONFLICT,
                ErrorResponse {
                    error: "Order Unavailable".to_string(),
                    message: format!(
                        "{} pedido(s) ya están asignados a otra ruta activa",
                        no_disponibles.len()
                    ),
                    details: Some(json!({ "pedidos_no_disponibles": no_disponibles })),
                    code: Some("ORDER_UNAVAILABLE".to_string()),
                },
            ),

            AppError::CourierBusy { repartidor_id } => (
                StatusCode::CONFLICT,
                ErrorResponse {
                    error: "Courier Busy".to_string(),
                    message: format!(
                        "El repartidor {} ya tiene una ruta sin terminar asignada",
                        repartidor_id
                    ),
                    details: Some(json!({ "repartidor_id": repartidor_id })),
                    code: Some("COURIER_BUSY".to_string()),
                },
            ),

            AppError::NotFound(msg) => {
                eprintln!("Resource not found: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse {
                        error: "Not Found".to_string(),
                        message: msg,
                        details: None,
                        code: Some("NOT_FOUND".to_string()),
                    },
                )
            }

            AppError::Conflict(msg) => {
                eprintln!("Conflict: {}", msg);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse {
                        error: "Conflict".to_string(),
                        message: msg,
                        details: None,
                        code: Some("CONFLICT".to_string()),
                    },
                )
            }

            AppError::BadRequest(msg) => {
                eprintln!("Bad request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Bad Request".to_string(),
                        message: msg,
                        details: None,
                        code: Some("BAD_REQUEST".to_string()),
                    },
                )
            }

            AppError::Internal(msg) => {
                eprintln!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal Server Error".to_string(),
                        message: "An unexpected error occurred".to_string(),
                        details: Some(json!({ "internal_error": msg })),
                        code: Some("INTERNAL_ERROR".to_string()),
                    },
                )
            }

            AppError::ExternalApi(msg) => {
                eprintln!("External API error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse {
                        error: "External API Error".to_string(),
                        message: "An error occurred while communicating with external service"
                            .to_string(),
                        details: Some(json!({ "external_api_error": msg })),
                        code: Some("EXTERNAL_API_ERROR".to_string()),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn validation_errors_map_to_422() {
        assert_eq!(
            status_of(AppError::CapacityExceeded { solicitados: 3, capacidad: 2 }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(AppError::SequenceMismatch {
                faltantes: vec![],
                sobrantes: vec![],
                duplicados: vec![Uuid::new_v4()],
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(AppError::IncompleteReconciliation {
                faltantes: vec![Uuid::new_v4()],
                sobrantes: vec![],
                duplicados: vec![],
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn state_errors_map_to_409() {
        assert_eq!(
            status_of(AppError::RouteClosed(RouteStatus::Completada)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::InvalidTransition {
                estado: RouteStatus::Completada,
                operacion: "iniciar",
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::OrderUnavailable {
                no_disponibles: vec![Uuid::new_v4()]
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::CourierBusy { repartidor_id: Uuid::new_v4() }),
            StatusCode::CONFLICT
        );
    }
}
