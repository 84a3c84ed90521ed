//! HTTP server core implementation
//!
//! This module provides the HttpServer struct and its core methods.

use crate::config::{Config, ServerConfig};
use crate::core::dispatch::BatchDispatcher;
use crate::server::handlers::health_check;
use crate::server::middleware::RequestIdMiddleware;
use crate::server::routes;
use crate::server::state::AppState;
use crate::storage::RequestLogStore;
use crate::utils::error::{GatewayError, Result};
use actix_web::{
    App, HttpServer as ActixHttpServer,
    middleware::{DefaultHeaders, Logger},
    web,
};
use tokio::runtime::Handle;
use tracing::{info, warn};

/// HTTP server
pub struct HttpServer {
    /// Server configuration
    config: ServerConfig,
    /// Application state
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server
    pub async fn new(config: &Config) -> Result<Self> {
        info!("Creating HTTP server");

        let mut dispatcher = BatchDispatcher::new(config.dispatch())?;
        if let Ok(runtime) = Handle::try_current() {
            dispatcher = dispatcher.with_runtime(runtime);
        }

        let request_log = Self::open_request_log(config).await;
        let state = AppState::new(config.clone(), dispatcher, request_log);

        Ok(Self {
            config: config.gateway.server.clone(),
            state,
        })
    }

    /// Connect and migrate the request log when enabled
    ///
    /// A storage failure disables logging instead of failing startup.
    async fn open_request_log(config: &Config) -> Option<RequestLogStore> {
        let database = &config.storage().database;
        if !database.enabled {
            info!("Request log disabled");
            return None;
        }

        let store = match RequestLogStore::connect(database).await {
            Ok(store) => store,
            Err(e) => {
                warn!(error = %e, "Request log unavailable, continuing without it");
                return None;
            }
        };
        if let Err(e) = store.migrate().await {
            warn!(error = %e, "Request log migration failed, continuing without it");
            return None;
        }
        Some(store)
    }

    /// Create the Actix-web application
    pub fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let max_body_size = state.config.server().max_body_size;

        App::new()
            .app_data(state)
            .app_data(web::PayloadConfig::new(max_body_size))
            .wrap(Logger::default())
            .wrap(RequestIdMiddleware)
            .wrap(DefaultHeaders::new().add(("Server", "fanout-gateway")))
            .route("/health", web::get().to(health_check))
            .configure(routes::requests::configure_routes)
    }

    /// Start the HTTP server
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.address();
        let port = self.config.port;
        let workers = self.config.worker_count();

        info!(workers, "Starting HTTP server on {}", bind_addr);

        let state = web::Data::new(self.state);

        let server = ActixHttpServer::new(move || Self::create_app(state.clone()))
            .workers(workers)
            .bind(&bind_addr)
            .map_err(|e| Self::format_bind_error(e, &bind_addr, port))?
            .run();

        info!("HTTP server listening on {}", bind_addr);

        server
            .await
            .map_err(|e| GatewayError::server(format!("Server error: {}", e)))?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}
