/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use clubhouse_api::{app::{build_router, AppState}, config::Config};
/// use clubhouse_shared::{repository::MemoryStore, services::Services};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let services = Services::new(Arc::new(MemoryStore::new()));
/// let app = build_router(AppState::new(services, config));
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, extract::AuthUser};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, Uri},
    middleware::Next,
    response::Response,
    routing::{get, put},
    Router,
};
use clubhouse_shared::{auth::jwt, error::ServiceError, services::Services};
use sqlx::PgPool;
use std::{sync::Arc, time::Duration};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state, cloned into every handler
#[derive(Clone)]
pub struct AppState {
    pub services: Services,

    pub config: Arc<Config>,

    /// Present when running against Postgres; used by the health check
    pub db: Option<PgPool>,
}

impl AppState {
    pub fn new(services: Services, config: Config) -> Self {
        Self {
            services,
            config: Arc::new(config),
            db: None,
        }
    }

    pub fn with_db(mut self, db: PgPool) -> Self {
        self.db = Some(db);
        self
    }

    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the router with all routes and middleware
///
/// ```text
/// /health
/// /clubs                     GET, POST
/// /clubs/:id                 GET, PUT, DELETE
/// /clubs/:id/users           GET, POST (join), DELETE (leave)
/// /clubs/:id/users/:user_id  PUT (set role)
/// /clubs/:id/feeds           GET (?cursor=&limit=), POST
/// /feeds/:id                 GET, PUT, DELETE
/// /feeds/:id/comments        GET, POST
/// /comments/:id              GET, PUT, DELETE
/// /users                     GET, POST
/// /users/:id                 GET, PUT, DELETE
/// /users/:id/clubs           GET
/// ```
///
/// A bearer token, when sent, is validated for every route except
/// `/health`; handlers that need a caller extract [`AuthUser`]. Unknown paths
/// and unsupported methods get a `BadRequest` envelope.
pub fn build_router(state: AppState) -> Router {
    use crate::routes::{clubs, comments, feeds, health, users};

    let api_routes = Router::new()
        .route("/clubs", get(clubs::list_clubs).post(clubs::create_club))
        .route(
            "/clubs/:id",
            get(clubs::get_club)
                .put(clubs::update_club)
                .delete(clubs::delete_club),
        )
        .route(
            "/clubs/:id/users",
            get(clubs::list_members)
                .post(clubs::join_club)
                .delete(clubs::leave_club),
        )
        .route("/clubs/:id/users/:user_id", put(clubs::set_role))
        .route(
            "/clubs/:id/feeds",
            get(feeds::list_feeds).post(feeds::create_feed),
        )
        .route(
            "/feeds/:id",
            get(feeds::get_feed)
                .put(feeds::update_feed)
                .delete(feeds::delete_feed),
        )
        .route(
            "/feeds/:id/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/comments/:id",
            get(comments::get_comment)
                .put(comments::update_comment)
                .delete(comments::delete_comment),
        )
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/users/:id/clubs", get(users::list_user_clubs))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            authenticate,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(api_routes)
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .with_state(state)
}

/// Unknown paths still answer with the failure envelope
async fn route_not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::bad_request(format!("No route for {} {}", method, uri.path()))
}

async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::bad_request(format!("{} is not supported on {}", method, uri.path()))
}

/// CORS for browser clients; `*` in `CORS_ORIGINS` opens every origin
fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60))
}

/// Validates the bearer token when one is sent and records the caller
///
/// A request without an `Authorization` header passes through anonymously;
/// routes that need a caller reject it through the [`AuthUser`] extractor.
async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(value) = req.headers().get(header::AUTHORIZATION) {
        let token = value
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(ApiError::Service(ServiceError::InvalidToken))?;

        let user_id = jwt::authenticate(token, state.jwt_secret())?;
        req.extensions_mut().insert(AuthUser(user_id));
    }

    Ok(next.run(req).await)
}
