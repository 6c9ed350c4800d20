use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::controllers::ruta_controller::RutaController;
use crate::dto::ruta_dto::{
    ActivarAlternativaRequest, AsignarPedidosRequest, FinalizarRutaRequest,
    OperacionRutaResponse, ProponerSecuenciaRequest, RutaAlternativaResponse, RutaResponse,
    RutaResumenResponse,
};
use crate::dto::ApiResponse;
use crate::models::route::RouteStatus;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_ruta_router() -> Router<AppState> {
    Router::new()
        .route("/", post(asignar_pedidos))
        .route("/:id", get(detalle_ruta))
        .route("/:id/iniciar", post(iniciar_ruta))
        .route("/:id/finalizar", post(finalizar_ruta))
        .route("/:id/cancelar", post(cancelar_ruta))
        .route("/:id/secuencia", put(proponer_secuencia))
        .route("/:id/secuencia/activar", put(activar_alternativa))
        .route("/repartidor/:repartidor_id", get(listar_por_repartidor))
}

#[derive(Debug, Deserialize)]
struct ListarRutasQuery {
    estado: Option<RouteStatus>,
}

async fn asignar_pedidos(
    State(state): State<AppState>,
    Json(request): Json<AsignarPedidosRequest>,
) -> Result<Json<ApiResponse<OperacionRutaResponse>>, AppError> {
    let controller = RutaController::new(&state);
    let response = controller.asignar_pedidos(request).await?;
    Ok(Json(response))
}

async fn detalle_ruta(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RutaResponse>, AppError> {
    let controller = RutaController::new(&state);
    let response = controller.detalle(id).await?;
    Ok(Json(response))
}

async fn iniciar_ruta(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<OperacionRutaResponse>>, AppError> {
    let controller = RutaController::new(&state);
    let response = controller.iniciar_ruta(id).await?;
    Ok(Json(response))
}

async fn finalizar_ruta(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<FinalizarRutaRequest>,
) -> Result<Json<ApiResponse<OperacionRutaResponse>>, AppError> {
    let controller = RutaController::new(&state);
    let response = controller.finalizar_ruta(id, request).await?;
    Ok(Json(response))
}

async fn cancelar_ruta(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<OperacionRutaResponse>>, AppError> {
    let controller = RutaController::new(&state);
    let response = controller.cancelar_ruta(id).await?;
    Ok(Json(response))
}

async fn proponer_secuencia(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ProponerSecuenciaRequest>,
) -> Result<Json<ApiResponse<RutaAlternativaResponse>>, AppError> {
    let controller = RutaController::new(&state);
    let response = controller.proponer_secuencia(id, request).await?;
    Ok(Json(response))
}

async fn activar_alternativa(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ActivarAlternativaRequest>,
) -> Result<Json<ApiResponse<RutaAlternativaResponse>>, AppError> {
    let controller = RutaController::new(&state);
    let response = controller.activar_alternativa(id, request).await?;
    Ok(Json(response))
}

async fn listar_por_repartidor(
    State(state): State<AppState>,
    Path(repartidor_id): Path<Uuid>,
    Query(query): Query<ListarRutasQuery>,
) -> Result<Json<Vec<RutaResumenResponse>>, AppError> {
    let controller = RutaController::new(&state);
    let response = controller
        .listar_por_repartidor(repartidor_id, query.estado)
        .await?;
    Ok(Json(response))
}
