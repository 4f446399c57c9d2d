/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use bookshelf_api::{app::AppState, config::Config};
/// use bookshelf_shared::store::PgStore;
/// use sqlx::PgPool;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(Arc::new(PgStore::new(pool)), config);
/// let app = bookshelf_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    error::ApiError,
    graphql::{build_schema, BookshelfSchema},
    resolvers::Resolvers,
};
use axum::{
    http::{header, HeaderValue, Method, Uri},
    routing::get,
    Router,
};
use bookshelf_shared::{auth::jwt::TokenIssuer, store::Store};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Document store behind the resolvers
    pub store: Arc<dyn Store>,

    /// Executable GraphQL schema
    pub schema: BookshelfSchema,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    ///
    /// The token issuer is configured from `config.jwt` and handed to the
    /// resolvers together with the store.
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        let issuer = TokenIssuer::new(config.jwt.secret.clone())
            .with_expiration(chrono::Duration::hours(config.jwt.expiration_hours));
        let schema = build_schema(Resolvers::new(store.clone(), issuer));

        Self {
            store,
            schema,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /health     # Liveness and store status
/// ├── GET  /ready      # 503 until the store answers
/// ├── POST /graphql    # GraphQL endpoint
/// └── GET  /graphql    # GraphiQL IDE
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/ready", get(routes::health::readiness_check));

    let graphql_routes = Router::new().route(
        "/graphql",
        get(routes::graphql::graphiql).post(routes::graphql::graphql_handler),
    );

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.iter().any(|origin| origin == "*") {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .merge(graphql_routes)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, DatabaseConfig, JwtConfig};
    use bookshelf_shared::store::MemoryStore;

    fn test_config(cors_origins: Vec<String>) -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/unused".to_string(),
                max_connections: 1,
            },
            jwt: JwtConfig {
                secret: "test-secret-key-at-least-32-bytes-long".to_string(),
                expiration_hours: 2,
            },
        }
    }

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new(Arc::new(MemoryStore::new()), test_config(vec!["*".to_string()]));

        assert_eq!(state.config.jwt.expiration_hours, 2);
        assert!(state.schema.sdl().contains("createUser"));
    }

    #[test]
    fn test_router_builds_with_restricted_origins() {
        let state = AppState::new(
            Arc::new(MemoryStore::new()),
            test_config(vec!["https://books.example".to_string()]),
        );

        let _router = build_router(state);
    }
}
