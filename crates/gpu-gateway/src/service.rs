//! GPU gateway service: router assembly and server lifecycle.

use crate::domain::config::{LimitsConfig, ServiceConfig};
use crate::domain::error::{panic_response, GatewayError};
use crate::handlers;
use crate::middleware::{create_cors_layer, AuthConfig, AuthLayer, TracingLayer};
use axum::{
    routing::{get, post},
    Router,
};
use gpu_compute::ComputeEngine;
use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info, warn};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ComputeEngine>,
    pub limits: LimitsConfig,
}

/// Build the full router for `config`, serving requests with `engine`.
///
/// Layer order, outermost first: CatchPanic → Tracing → CORS → BodyLimit.
/// Protected routes also run [`AuthLayer`]; unknown paths still 404.
pub fn build_router(config: &ServiceConfig, engine: Arc<ComputeEngine>) -> Router {
    let state = AppState {
        engine,
        limits: config.limits.clone(),
    };

    let protected = Router::new()
        .route("/gpu-status", get(handlers::gpu_status))
        .route("/compute", post(handlers::compute))
        .route("/batch-compute", post(handlers::batch_compute))
        .route_layer(AuthLayer::new(AuthConfig {
            service_token: config.service_token.clone(),
        }));

    let include_details = config.is_development();

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(protected)
        .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
        .layer(create_cors_layer(&config.cors))
        .layer(TracingLayer::new())
        .layer(CatchPanicLayer::custom(
            move |panic: Box<dyn Any + Send + 'static>| panic_response(panic, include_details),
        ))
        .with_state(state)
}

/// Triggers graceful shutdown of a running [`GpuService`].
#[derive(Clone, Debug)]
pub struct ShutdownHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.tx.send_replace(true);
    }
}

/// GPU gateway service state
pub struct GpuService {
    config: ServiceConfig,
    engine: Arc<ComputeEngine>,
    shutdown_tx: Arc<watch::Sender<bool>>,
}

impl GpuService {
    /// Create a new service from validated configuration
    pub fn new(config: ServiceConfig) -> Result<Self, GatewayError> {
        config.validate()?;

        let engine = Arc::new(ComputeEngine::new(config.engine.clone()));
        let (shutdown_tx, _) = watch::channel(false);

        Ok(Self {
            config,
            engine,
            shutdown_tx: Arc::new(shutdown_tx),
        })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Router sharing this service's engine
    pub fn router(&self) -> Router {
        build_router(&self.config, Arc::clone(&self.engine))
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            tx: Arc::clone(&self.shutdown_tx),
        }
    }

    /// Bind the configured address and serve until shutdown
    pub async fn start(&self) -> Result<(), GatewayError> {
        let addr = self.config.http_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| GatewayError::Bind(format!("{addr}: {e}")))?;

        self.serve(listener).await
    }

    /// Serve on an already bound listener until Ctrl+C or
    /// [`ShutdownHandle::shutdown`].
    pub async fn serve(&self, listener: TcpListener) -> Result<(), GatewayError> {
        let local_addr = listener
            .local_addr()
            .map_err(|e| GatewayError::Bind(e.to_string()))?;

        let token_auth = if self.config.service_token.is_some() {
            "enabled"
        } else {
            "disabled"
        };
        info!(
            addr = %local_addr,
            environment = %self.config.environment,
            token_auth,
            "Starting GPU compute service"
        );
        if self.config.service_token.is_none() {
            warn!("GPU_SERVICE_TOKEN is not set; protected routes will answer 500");
        }

        let app = self
            .router()
            .into_make_service_with_connect_info::<SocketAddr>();

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(self.shutdown_tx.subscribe()))
            .await;

        match result {
            Ok(()) => {
                info!("GPU compute service stopped");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "HTTP server error");
                Err(GatewayError::Serve(e.to_string()))
            }
        }
    }
}

async fn shutdown_signal(mut rx: watch::Receiver<bool>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            // Only the explicit handle can stop the server now
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = rx.wait_for(|stop| *stop) => info!("Received shutdown signal"),
    }
}
