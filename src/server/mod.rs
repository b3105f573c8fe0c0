pub mod handlers;
pub mod sessions;
pub mod types;

use crate::{
    Result,
    config::Config,
    flow::{GenerationFlow, RefinementFlow},
    llm::{ModelClient, OpenAiClient},
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};
use handlers::AppState;
use sessions::SessionStore;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

impl AppState {
    /// Both flows share the one model handle.
    pub fn new(model: Arc<dyn ModelClient>) -> Self {
        Self {
            generation: GenerationFlow::new(model.clone()),
            refinement: RefinementFlow::new(model),
            sessions: Arc::new(SessionStore::new()),
        }
    }
}

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/api/recipes", post(handlers::generate_recipe))
        .route("/api/recipes/improve", post(handlers::improve_recipe))
        .route("/api/sessions", post(handlers::create_session))
        .route(
            "/api/sessions/:id",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route(
            "/api/sessions/:id/image",
            put(handlers::select_image).delete(handlers::clear_image),
        )
        .route("/api/sessions/:id/submit", post(handlers::submit))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    let model: Arc<dyn ModelClient> = Arc::new(OpenAiClient::new(config.llm.clone()));
    info!(
        "Using model '{}' via provider '{}'",
        config.llm.model, config.llm.provider
    );

    let app = router(AppState::new(model), config.server.max_upload_bytes);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
