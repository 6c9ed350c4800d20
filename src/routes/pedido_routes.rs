use axum::{extract::State, routing::get, Json, Router};

use crate::controllers::pedido_controller::PedidoController;
use crate::dto::pedido_dto::PedidoPendienteResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_pedido_router() -> Router<AppState> {
    Router::new().route("/pendientes", get(listar_pendientes))
}

async fn listar_pendientes(
    State(state): State<AppState>,
) -> Result<Json<Vec<PedidoPendienteResponse>>, AppError> {
    let controller = PedidoController::new(state.pool.clone());
    let response = controller.listar_pendientes().await?;
    Ok(Json(response))
}
