use anyhow::Result;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use ecsrefresh_orchestrations::flows::{get_flow, FlowDiagram, ALL_FLOWS};
use ecsrefresh_orchestrations::names::orchestrations;
use ecsrefresh_orchestrations::registry::OrchestrationRegistry;
use ecsrefresh_orchestrations::RefreshError;
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared API state
#[derive(Clone)]
pub struct AppState {
    pub registry: OrchestrationRegistry,
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/orchestrations", get(list_orchestrations))
        .route("/api/flows", get(list_flows))
        .route("/api/flows/:name", get(get_flow_diagram))
        .route("/api/invoke/:name", post(invoke))
        .route("/api/refresh", post(refresh))
        .route("/api/verify", post(verify))
        .route("/api/trigger", post(trigger))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the API server, stopping on Ctrl+C
pub async fn start_server(host: &str, port: u16, state: AppState) -> Result<()> {
    let app = create_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("✓ API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutdown signal received");
        })
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}

// ============================================================================
// Health Check
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "ecsrefresh",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

// ============================================================================
// Orchestrations
// ============================================================================

async fn list_orchestrations(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.registry.names().to_vec())
}

async fn invoke(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    run(&state, &name, &body).await
}

async fn refresh(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, AppError> {
    run(&state, orchestrations::REFRESH_SERVICES, &body).await
}

async fn verify(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, AppError> {
    run(&state, orchestrations::VERIFY_REFRESHED_SERVICES, &body).await
}

async fn trigger(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    run(&state, orchestrations::IMMEDIATE_REFRESH, &[]).await
}

async fn run(state: &AppState, name: &str, body: &[u8]) -> Result<Json<Value>, AppError> {
    // An empty body is a null payload
    let payload = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(body)
            .map_err(|e| AppError::BadRequest(format!("Request body is not valid JSON: {}", e)))?
    };

    match state.registry.invoke(name, &payload).await {
        Ok(result) => Ok(Json(result)),
        Err(RefreshError::UnknownOrchestration(name)) => {
            Err(AppError::NotFound(format!("Unknown orchestration: {}", name)))
        }
        Err(e) => Err(AppError::Internal(e.to_string())),
    }
}

// ============================================================================
// Flows
// ============================================================================

fn flow_json(flow: &FlowDiagram) -> Value {
    serde_json::json!({
        "orchestration_name": flow.orchestration_name,
        "mermaid": flow.mermaid,
        "node_mappings": flow.node_mappings
            .iter()
            .map(|(node, activity)| serde_json::json!({ "node": node, "activity": activity }))
            .collect::<Vec<_>>(),
    })
}

async fn list_flows() -> impl IntoResponse {
    Json(ALL_FLOWS.iter().map(|flow| flow_json(flow)).collect::<Vec<_>>())
}

async fn get_flow_diagram(Path(name): Path<String>) -> Result<Json<Value>, AppError> {
    get_flow(&name)
        .map(|flow| Json(flow_json(flow)))
        .ok_or_else(|| AppError::NotFound(format!("No flow for orchestration: {}", name)))
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({ "error": message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use ecsrefresh_models::{AlarmBinding, OutboundEvent, RedeployAck, ServiceState};
    use ecsrefresh_orchestrations::capabilities::{AlarmStore, EventChannel, ServiceRegistry};
    use ecsrefresh_orchestrations::registry::{create_orchestration_registry, Collaborators};
    use ecsrefresh_orchestrations::{ProviderError, RefreshSettings};
    use tower::ServiceExt;

    /// Knows no services and no alarms; redeploys always succeed
    struct EmptyAccount;

    #[async_trait]
    impl ServiceRegistry for EmptyAccount {
        async fn describe_services(
            &self,
            _region: &str,
            _cluster: &str,
            _services: &[String],
        ) -> Result<Vec<ServiceState>, ProviderError> {
            Ok(Vec::new())
        }

        async fn force_new_deployment(
            &self,
            _region: &str,
            cluster: &str,
            service: &str,
        ) -> Result<RedeployAck, ProviderError> {
            Ok(RedeployAck {
                cluster: cluster.to_string(),
                service: service.to_string(),
                service_arn: None,
                status: Some("ACTIVE".to_string()),
                desired_count: 1,
                running_count: 1,
                primary_deployment_id: Some("ecs-svc/1".to_string()),
            })
        }
    }

    #[async_trait]
    impl AlarmStore for EmptyAccount {
        async fn describe_alarms(
            &self,
            _region: &str,
            _metric_name: Option<&str>,
        ) -> Result<Vec<AlarmBinding>, ProviderError> {
            Ok(Vec::new())
        }

        async fn set_alarm_actions_enabled(
            &self,
            _region: &str,
            _alarm_names: &[String],
            _enabled: bool,
        ) -> Result<(), ProviderError> {
            Ok(())
        }
    }

    #[async_trait]
    impl EventChannel for EmptyAccount {
        async fn publish(&self, _event: &OutboundEvent) -> Result<Option<String>, ProviderError> {
            Ok(None)
        }
    }

    fn app() -> Router {
        let account = Arc::new(EmptyAccount);
        let registry = create_orchestration_registry(Collaborators {
            registry: account.clone(),
            alarms: account.clone(),
            events: account,
            settings: RefreshSettings::default(),
        });
        create_router(AppState { registry })
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_list_orchestrations() {
        let request = Request::get("/api/orchestrations").body(Body::empty()).unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), orchestrations::ALL.len());
    }

    #[tokio::test]
    async fn test_flows() {
        let (status, body) = send(Request::get("/api/flows").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), ALL_FLOWS.len());

        let uri = format!("/api/flows/{}", orchestrations::IMMEDIATE_REFRESH);
        let (status, body) = send(Request::get(uri).body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["orchestration_name"], orchestrations::IMMEDIATE_REFRESH);

        let (status, _) = send(Request::get("/api/flows/nope").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_trigger() {
        let (status, body) = send(post("/api/trigger", "")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "ECS Service refresh triggered successfully");
        assert_eq!(body["response"]["service"], "nginx-service");
    }

    #[tokio::test]
    async fn test_refresh_skips_unknown_service() {
        let payload = serde_json::json!({
            "detail": {
                "events": [{"region": "us-east-1", "entities": [{"entityValue": "clusterA|ghost"}]}]
            }
        });
        let (status, body) = send(post("/api/refresh", &payload.to_string())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "ECS Service Refresh Completed");
        assert_eq!(body["entities"][0]["outcome"], "skipped");
    }

    #[tokio::test]
    async fn test_verify_reports_missing_names_in_body() {
        let (status, body) = send(post("/api/verify", r#"{"clusterName": "clusterA"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Missing cluster or service names in event");
    }

    #[tokio::test]
    async fn test_invoke_unknown_orchestration() {
        let (status, body) = send(post("/api/invoke/nope", "{}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("nope"));
    }

    #[tokio::test]
    async fn test_invalid_json_body() {
        let (status, _) = send(post("/api/refresh", "{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
