//! Cliente del servicio de mapas
//!
//! Calcula estimaciones consultivas de distancia y tiempo para una ruta
//! a partir de las direcciones de sus paradas, usando el geocoding y el
//! Directions API de Mapbox. Las estimaciones son opcionales: si el
//! servicio falla, la ruta se crea igual con los campos sin valor.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Deserialize;

/// Estimación consultiva de una ruta completa
#[derive(Debug, Clone, PartialEq)]
pub struct EstimacionRuta {
    pub distancia_km: f64,
    pub tiempo_estimado_min: i32,
}

/// Colaborador externo de mapas. Se consume de forma opaca: un valor o
/// un fallo, y el fallo nunca bloquea la operación local.
#[async_trait]
pub trait MappingClient: Send + Sync {
    async fn estimar_ruta(&self, direcciones: &[String]) -> Result<EstimacionRuta>;
}

#[derive(Debug, Deserialize)]
struct MapboxGeocodingResponse {
    features: Vec<MapboxFeature>,
}

#[derive(Debug, Deserialize)]
struct MapboxFeature {
    geometry: MapboxGeometry,
}

#[derive(Debug, Deserialize)]
struct MapboxGeometry {
    coordinates: Vec<f64>, // [longitude, latitude]
}

#[derive(Debug, Deserialize)]
struct MapboxDirectionsResponse {
    routes: Vec<MapboxRoute>,
}

#[derive(Debug, Deserialize)]
struct MapboxRoute {
    distance: f64, // metros
    duration: f64, // segundos
}

/// Cliente usado cuando no hay token configurado: siempre falla, con lo
/// que las rutas quedan sin estimaciones y la operación sigue su curso.
pub struct NoopMappingClient;

#[async_trait]
impl MappingClient for NoopMappingClient {
    async fn estimar_ruta(&self, _direcciones: &[String]) -> Result<EstimacionRuta> {
        Err(anyhow!("MAPBOX_TOKEN no configurado"))
    }
}

pub struct MapboxMappingClient {
    mapbox_token: String,
    client: reqwest::Client,
}

impl MapboxMappingClient {
    pub fn new(mapbox_token: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            mapbox_token,
            client,
        }
    }

    /// Geocodificar una dirección a (longitude, latitude)
    async fn geocode(&self, direccion: &str) -> Result<(f64, f64)> {
        let encoded = urlencoding::encode(direccion);
        let url = format!(
            "https://api.mapbox.com/search/geocode/v6/forward?q={}&access_token={}&limit=1",
            encoded, self.mapbox_token
        );

        let response = self
            .client
            .get(&url)
            .header("User-Agent", "RepartoBackend/1.0")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Geocoding failed with status {}", status));
        }

        let body: MapboxGeocodingResponse = response.json().await?;
        let feature = body
            .features
            .first()
            .ok_or_else(|| anyhow!("Sin resultados de geocoding para '{}'", direccion))?;

        if feature.geometry.coordinates.len() < 2 {
            return Err(anyhow!("Coordenadas incompletas para '{}'", direccion));
        }

        Ok((
            feature.geometry.coordinates[0],
            feature.geometry.coordinates[1],
        ))
    }
}

#[async_trait]
impl MappingClient for MapboxMappingClient {
    async fn estimar_ruta(&self, direcciones: &[String]) -> Result<EstimacionRuta> {
        if direcciones.len() < 2 {
            // Con una sola parada no hay tramo que estimar
            return Ok(EstimacionRuta {
                distancia_km: 0.0,
                tiempo_estimado_min: 0,
            });
        }

        log::info!("🗺️ Estimando ruta de {} paradas", direcciones.len());

        let mut coordenadas = Vec::with_capacity(direcciones.len());
        for direccion in direcciones {
            coordenadas.push(self.geocode(direccion).await?);
        }

        let pares: Vec<String> = coordenadas
            .iter()
            .map(|(lon, lat)| format!("{},{}", lon, lat))
            .collect();

        let url = format!(
            "https://api.mapbox.com/directions/v5/mapbox/driving/{}?access_token={}&overview=false",
            pares.join(";"),
            self.mapbox_token
        );

        let response = self
            .client
            .get(&url)
            .header("User-Agent", "RepartoBackend/1.0")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Directions API error {}: {}", status, error_text));
        }

        let body: MapboxDirectionsResponse = response.json().await?;
        let route = body
            .routes
            .first()
            .ok_or_else(|| anyhow!("Directions API no devolvió rutas"))?;

        let estimacion = EstimacionRuta {
            distancia_km: route.distance / 1000.0,
            tiempo_estimado_min: (route.duration / 60.0).round() as i32,
        };

        log::info!(
            "✅ Estimación: {:.1} km, {} min",
            estimacion.distancia_km,
            estimacion.tiempo_estimado_min
        );

        Ok(estimacion)
    }
}
