//! Notificador de pedidos en tránsito
//!
//! Avisa al subsistema de pedidos que los pedidos de una ruta iniciada
//! están en camino. Es una notificación best-effort que se despacha
//! después de confirmar la transacción local: si falla se registra y se
//! reporta como advertencia, nunca revierte el inicio de la ruta.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

#[async_trait]
pub trait TransitNotifier: Send + Sync {
    async fn marcar_en_transito(&self, pedido_ids: &[Uuid]) -> Result<()>;
}

pub struct HttpTransitNotifier {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTransitNotifier {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self { base_url, client }
    }
}

#[async_trait]
impl TransitNotifier for HttpTransitNotifier {
    async fn marcar_en_transito(&self, pedido_ids: &[Uuid]) -> Result<()> {
        let url = format!("{}/pedidos/en-transito", self.base_url.trim_end_matches('/'));

        log::info!(
            "📦 Notificando {} pedido(s) en tránsito al subsistema de pedidos",
            pedido_ids.len()
        );

        let response = self
            .client
            .post(&url)
            .json(&json!({ "pedido_ids": pedido_ids }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "El subsistema de pedidos respondió {}: {}",
                status,
                error_text
            ));
        }

        Ok(())
    }
}
