use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["service"], "reparto-backend");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_ruta_inexistente_devuelve_404() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/rutas/00000000-0000-0000-0000-000000000000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_de_asignacion_es_json_valido() {
    // El contrato de asignación: repartidor, pedidos en orden, capacidad
    let request = json!({
        "repartidor_id": "7d9d5b8e-1111-4222-8333-444455556666",
        "pedido_ids": [
            "7d9d5b8e-aaaa-4bbb-8ccc-dddd00000001",
            "7d9d5b8e-aaaa-4bbb-8ccc-dddd00000002"
        ],
        "capacidad_maxima": 10,
        "nombre": "Ruta Centro",
        "creada_por": "7d9d5b8e-9999-4888-8777-666655554444"
    });

    assert!(request["pedido_ids"].is_array());
    assert_eq!(request["pedido_ids"].as_array().unwrap().len(), 2);
}

// Función helper para crear la app de test
fn create_test_app() -> Router {
    Router::new().route(
        "/health",
        get(|| async {
            Json(json!({
                "service": "reparto-backend",
                "status": "healthy",
            }))
        }),
    )
}
