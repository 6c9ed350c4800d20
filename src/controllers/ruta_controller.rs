//! Controller del ciclo de vida de rutas
//!
//! Orquesta cada operación del núcleo: valida la entrada contra el
//! estado actual, delega la mutación transaccional al repositorio y
//! despacha los efectos externos (estimaciones de mapas, notificación
//! de tránsito) después del commit. Los fallos de colaboradores se
//! degradan a advertencias en la respuesta.

use std::collections::HashSet;
use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::dto::ruta_dto::{
    ActivarAlternativaRequest, AsignarPedidosRequest, FinalizarRutaRequest,
    OperacionRutaResponse, ParadaResponse, ProponerSecuenciaRequest, RutaAlternativaResponse,
    RutaResponse, RutaResumenResponse,
};
use crate::dto::ApiResponse;
use crate::models::parada::{secuencia_contigua, Parada, StopStatus};
use crate::models::route::{RouteStatus, Ruta};
use crate::models::ruta_alternativa::{secuencia_efectiva, EntradaSecuencia};
use crate::repositories::repartidor_repository::RepartidorRepository;
use crate::repositories::ruta_repository::RutaRepository;
use crate::services::{MappingClient, TransitNotifier};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::validation::{validar_particion, validar_permutacion};

pub struct RutaController {
    rutas: RutaRepository,
    repartidores: RepartidorRepository,
    mapas: Arc<dyn MappingClient>,
    notificador: Arc<dyn TransitNotifier>,
}

impl RutaController {
    pub fn new(state: &AppState) -> Self {
        Self {
            rutas: RutaRepository::new(state.pool.clone()),
            repartidores: RepartidorRepository::new(state.pool.clone()),
            mapas: state.mapas.clone(),
            notificador: state.notificador.clone(),
        }
    }

    /// AssignOrders: crear una ruta `planificada` para el repartidor con
    /// una parada por pedido, en el orden recibido.
    pub async fn asignar_pedidos(
        &self,
        request: AsignarPedidosRequest,
    ) -> Result<ApiResponse<OperacionRutaResponse>, AppError> {
        request.validate()?;

        let unicos: HashSet<Uuid> = request.pedido_ids.iter().copied().collect();
        if unicos.len() != request.pedido_ids.len() {
            return Err(AppError::BadRequest(
                "La lista de pedidos contiene ids repetidos".to_string(),
            ));
        }

        // Rechazo antes de cualquier escritura
        if request.pedido_ids.len() > request.capacidad_maxima as usize {
            return Err(AppError::CapacityExceeded {
                solicitados: request.pedido_ids.len(),
                capacidad: request.capacidad_maxima,
            });
        }

        if !self.repartidores.existe(request.repartidor_id).await? {
            return Err(not_found_error(
                "Repartidor",
                &request.repartidor_id.to_string(),
            ));
        }

        let (ruta, paradas) = self
            .rutas
            .crear_con_paradas(
                request.repartidor_id,
                &request.pedido_ids,
                request.capacidad_maxima,
                &request.nombre,
                request.descripcion.as_deref(),
                request.creada_por,
            )
            .await?;

        // Estimaciones consultivas, ya fuera de la transacción: si el
        // servicio de mapas falla la ruta queda sin estimar
        let mut advertencias = Vec::new();
        let ruta = self.estimar(ruta, &paradas, &mut advertencias).await;

        log::info!(
            "🚚 Ruta {} creada para repartidor {} con {} parada(s)",
            ruta.id,
            ruta.repartidor_id,
            paradas.len()
        );

        Ok(ApiResponse::success_with_message(
            OperacionRutaResponse {
                ruta: ruta.into(),
                advertencias,
            },
            "Ruta creada exitosamente".to_string(),
        ))
    }

    /// StartRoute: transicionar a `en_curso` y marcar las paradas en
    /// camino. La notificación al pool de pedidos es best-effort.
    pub async fn iniciar_ruta(
        &self,
        ruta_id: Uuid,
    ) -> Result<ApiResponse<OperacionRutaResponse>, AppError> {
        let ruta = self.cargar_ruta(ruta_id).await?;
        if ruta.estado.es_terminal() {
            return Err(AppError::RouteClosed(ruta.estado));
        }
        if !ruta.estado.acepta_inicio() {
            return Err(AppError::InvalidTransition {
                estado: ruta.estado,
                operacion: "iniciar",
            });
        }

        // El UPDATE condicional del repositorio re-verifica el estado;
        // una carrera perdida produce el mismo error de estado
        let (ruta, paradas) = self.rutas.iniciar(ruta_id).await?;

        let mut advertencias = Vec::new();
        let pedido_ids: Vec<Uuid> = paradas.iter().map(|p| p.pedido_id).collect();
        if let Err(e) = self.notificador.marcar_en_transito(&pedido_ids).await {
            log::warn!(
                "⚠️ No se pudo notificar el tránsito de la ruta {}: {}",
                ruta_id,
                e
            );
            advertencias.push(format!(
                "No se pudo notificar al subsistema de pedidos: {}",
                e
            ));
        }

        log::info!("🚚 Ruta {} iniciada con {} parada(s)", ruta.id, paradas.len());

        Ok(ApiResponse::success_with_message(
            OperacionRutaResponse {
                ruta: ruta.into(),
                advertencias,
            },
            "Ruta iniciada exitosamente".to_string(),
        ))
    }

    /// FinalizeRoute: particionar las paradas en entregadas/no entregadas,
    /// cerrar la ruta y devolver los pedidos no entregados al pool.
    pub async fn finalizar_ruta(
        &self,
        ruta_id: Uuid,
        request: FinalizarRutaRequest,
    ) -> Result<ApiResponse<OperacionRutaResponse>, AppError> {
        let ruta = self.cargar_ruta(ruta_id).await?;

        if ruta.estado.es_terminal() {
            return Err(AppError::RouteClosed(ruta.estado));
        }
        if !ruta.estado.acepta_finalizacion() {
            return Err(AppError::InvalidTransition {
                estado: ruta.estado,
                operacion: "finalizar",
            });
        }

        // Las paradas no cambian de conjunto después de la creación, así
        // que validar sobre esta lectura es seguro; el UPDATE condicional
        // del repositorio garantiza que solo una finalización gana.
        let paradas = self.rutas.find_paradas(ruta_id).await?;
        let esperados: HashSet<Uuid> = paradas.iter().map(|p| p.pedido_id).collect();
        validar_particion(&esperados, &request.entregados, &request.no_entregados)?;

        let (ruta, _paradas) = self
            .rutas
            .finalizar(ruta_id, &request.entregados, &request.no_entregados)
            .await?;

        log::info!(
            "🏁 Ruta {} completada: {} entregado(s), {} devuelto(s) al pool",
            ruta.id,
            request.entregados.len(),
            request.no_entregados.len()
        );

        Ok(ApiResponse::success_with_message(
            OperacionRutaResponse {
                ruta: ruta.into(),
                advertencias: Vec::new(),
            },
            format!(
                "Ruta completada: {} pedido(s) entregado(s), {} liberado(s) para reasignación",
                request.entregados.len(),
                request.no_entregados.len()
            ),
        ))
    }

    /// CancelRoute: abortar una ruta sin terminar devolviendo al pool
    /// todos los pedidos no entregados.
    pub async fn cancelar_ruta(
        &self,
        ruta_id: Uuid,
    ) -> Result<ApiResponse<OperacionRutaResponse>, AppError> {
        let (ruta, paradas) = self.rutas.cancelar(ruta_id).await?;

        let liberadas = paradas
            .iter()
            .filter(|p| p.estado != StopStatus::Entregado)
            .count();
        log::info!(
            "🛑 Ruta {} cancelada; {} pedido(s) devueltos al pool",
            ruta.id,
            liberadas
        );

        Ok(ApiResponse::success_with_message(
            OperacionRutaResponse {
                ruta: ruta.into(),
                advertencias: Vec::new(),
            },
            "Ruta cancelada exitosamente".to_string(),
        ))
    }

    /// ProposeOrder: reemplazar la secuencia alternativa con una
    /// permutación completa de las paradas actuales. No muta la
    /// secuencia canónica.
    pub async fn proponer_secuencia(
        &self,
        ruta_id: Uuid,
        request: ProponerSecuenciaRequest,
    ) -> Result<ApiResponse<RutaAlternativaResponse>, AppError> {
        request.validate()?;

        let ruta = self.cargar_ruta(ruta_id).await?;
        if ruta.estado.es_terminal() {
            return Err(AppError::RouteClosed(ruta.estado));
        }

        let paradas = self.rutas.find_paradas(ruta_id).await?;
        let esperados: HashSet<Uuid> = paradas.iter().map(|p| p.pedido_id).collect();
        validar_permutacion(&esperados, &request.secuencia)?;

        let entradas: Vec<EntradaSecuencia> = request
            .secuencia
            .iter()
            .enumerate()
            .map(|(i, pedido_id)| EntradaSecuencia {
                pedido_id: *pedido_id,
                secuencia: (i as i32) + 1,
            })
            .collect();

        let alternativa = self
            .rutas
            .reemplazar_alternativa(ruta_id, &entradas, request.motivo.as_deref())
            .await?;

        Ok(ApiResponse::success_with_message(
            alternativa.into(),
            "Secuencia alternativa registrada".to_string(),
        ))
    }

    /// ToggleOverlay: activar o desactivar la alternativa sin tocar
    /// ninguna parada.
    pub async fn activar_alternativa(
        &self,
        ruta_id: Uuid,
        request: ActivarAlternativaRequest,
    ) -> Result<ApiResponse<RutaAlternativaResponse>, AppError> {
        let ruta = self.cargar_ruta(ruta_id).await?;
        if ruta.estado.es_terminal() {
            return Err(AppError::RouteClosed(ruta.estado));
        }

        let alternativa = self
            .rutas
            .activar_alternativa(ruta_id, request.activar)
            .await?;

        let mensaje = if request.activar {
            "Secuencia alternativa activada"
        } else {
            "Secuencia alternativa desactivada"
        };

        Ok(ApiResponse::success_with_message(
            alternativa.into(),
            mensaje.to_string(),
        ))
    }

    /// Detalle de ruta con paradas, alternativa y orden vigente
    pub async fn detalle(&self, ruta_id: Uuid) -> Result<RutaResponse, AppError> {
        let ruta = self.cargar_ruta(ruta_id).await?;
        let paradas = self.rutas.find_paradas(ruta_id).await?;
        let alternativa = self.rutas.find_alternativa(ruta_id).await?;

        // La secuencia canónica debe ser la permutación contigua 1..n
        if !ruta.estado.es_terminal() && !secuencia_contigua(&paradas) {
            log::warn!(
                "⚠️ La ruta {} tiene una secuencia canónica con huecos o repetidos",
                ruta_id
            );
        }

        let efectiva = secuencia_efectiva(&paradas, alternativa.as_ref());

        Ok(RutaResponse {
            id: ruta.id,
            repartidor_id: ruta.repartidor_id,
            nombre: ruta.nombre,
            descripcion: ruta.descripcion,
            estado: ruta.estado,
            capacidad_maxima: ruta.capacidad_maxima,
            total_paradas: ruta.total_paradas,
            distancia_km: ruta.distancia_km,
            tiempo_estimado_min: ruta.tiempo_estimado_min,
            created_at: ruta.created_at,
            started_at: ruta.started_at,
            ended_at: ruta.ended_at,
            paradas: paradas.into_iter().map(ParadaResponse::from).collect(),
            ruta_alternativa: alternativa.map(RutaAlternativaResponse::from),
            secuencia_efectiva: efectiva,
        })
    }

    pub async fn listar_por_repartidor(
        &self,
        repartidor_id: Uuid,
        estado: Option<RouteStatus>,
    ) -> Result<Vec<RutaResumenResponse>, AppError> {
        let rutas = self
            .rutas
            .listar_por_repartidor(repartidor_id, estado)
            .await?;

        Ok(rutas.into_iter().map(RutaResumenResponse::from).collect())
    }

    async fn cargar_ruta(&self, ruta_id: Uuid) -> Result<Ruta, AppError> {
        self.rutas
            .find_by_id(ruta_id)
            .await?
            .ok_or_else(|| not_found_error("Ruta", &ruta_id.to_string()))
    }

    /// Pedir la estimación consultiva y persistirla; cualquier fallo se
    /// degrada a advertencia
    async fn estimar(
        &self,
        ruta: Ruta,
        paradas: &[Parada],
        advertencias: &mut Vec<String>,
    ) -> Ruta {
        let direcciones: Vec<String> = paradas.iter().map(|p| p.direccion.clone()).collect();

        match self.mapas.estimar_ruta(&direcciones).await {
            Ok(estimacion) => {
                let distancia = Decimal::from_f64_retain(estimacion.distancia_km);
                match distancia {
                    Some(distancia) => match self
                        .rutas
                        .actualizar_estimaciones(ruta.id, distancia, estimacion.tiempo_estimado_min)
                        .await
                    {
                        Ok(actualizada) => actualizada,
                        Err(e) => {
                            log::warn!("⚠️ No se pudo guardar la estimación de la ruta {}: {}", ruta.id, e);
                            advertencias
                                .push("No se pudo guardar la estimación de distancia".to_string());
                            ruta
                        }
                    },
                    None => {
                        advertencias
                            .push("La estimación de distancia recibida no es válida".to_string());
                        ruta
                    }
                }
            }
            Err(e) => {
                log::warn!("⚠️ Servicio de mapas no disponible para la ruta {}: {}", ruta.id, e);
                advertencias.push(format!("Sin estimación de distancia/tiempo: {}", e));
                ruta
            }
        }
    }
}
