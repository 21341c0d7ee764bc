use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Method, Request},
    middleware, Router,
};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

use catering_api::{
    auth::{AuthConfig, AuthService},
    config::AppConfig,
    db,
    events::{self, EventSender},
    handlers::AppServices,
    AppState,
};

const TEST_JWT_SECRET: &str =
    "integration_test_secret_that_is_long_enough_for_hs256_signing_0123456789";

/// Helper harness for spinning up an application state backed by a
/// throwaway SQLite database.
pub struct TestApp {
    router: Router,
    #[allow(dead_code)]
    pub state: AppState,
    token: String,
    auth_service: Arc<AuthService>,
    db_file: String,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let db_file = format!("catering_test_{}.db", Uuid::new_v4().simple());

        let mut cfg = AppConfig::new(
            format!("sqlite://{db_file}?mode=rwc"),
            TEST_JWT_SECRET.to_string(),
            3600,
            86_400,
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.auto_migrate = true;
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        // No outbound calendar calls from tests.
        cfg.calendar_sync_enabled = false;
        // Small body cap so the limit is testable without huge payloads.
        cfg.max_body_size = 64 * 1024;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let auth_cfg = AuthConfig::new(
            cfg.jwt_secret.clone(),
            cfg.auth_audience.clone(),
            cfg.auth_issuer.clone(),
            Duration::from_secs(cfg.jwt_expiration as u64),
            Duration::from_secs(cfg.refresh_token_expiration as u64),
        );
        let auth_service = Arc::new(
            AuthService::new(auth_cfg, db_arc.clone())
                .with_event_sender(Arc::new(event_sender.clone())),
        );

        let user = auth_service
            .register("Test Staff", "staff@example.com", "s3cure-test-password")
            .await
            .expect("register test user");
        let tokens = auth_service
            .generate_token(&user)
            .await
            .expect("issue test token");

        let services = AppServices::new(db_arc.clone(), Arc::new(event_sender.clone()), &cfg);

        let state = AppState {
            db: db_arc,
            config: cfg.clone(),
            event_sender,
            services,
        };

        let auth_for_layer = auth_service.clone();
        let api_router =
            catering_api::api_v1_routes().layer(middleware::from_fn_with_state(
                auth_for_layer,
                |axum::extract::State(auth): axum::extract::State<Arc<AuthService>>,
                 mut req: Request<Body>,
                 next: axum::middleware::Next| async move {
                    req.extensions_mut().insert(auth);
                    next.run(req).await
                },
            ));

        let router = Router::new()
            .nest("/api/v1", api_router)
            .nest(
                "/auth",
                catering_api::auth::auth_routes().with_state(auth_service.clone()),
            )
            .layer(axum::extract::DefaultBodyLimit::max(cfg.max_body_size))
            .with_state(state.clone());

        Self {
            router,
            state,
            token: tokens.access_token,
            auth_service,
            db_file,
            _event_task: event_task,
        }
    }

    /// Access the auth service used by the test application.
    #[allow(dead_code)]
    pub fn auth_service(&self) -> Arc<AuthService> {
        self.auth_service.clone()
    }

    /// Access the bearer token for the default staff user.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Send a request against the router with an optional bearer token.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Convenience helper for authenticated JSON requests.
    pub async fn request_authenticated(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        self.request(method, uri, body, Some(self.token())).await
    }

    /// Seed a catalog item and return its id.
    #[allow(dead_code)]
    pub async fn seed_food_item(
        &self,
        name: &str,
        cutlery_type: &str,
        serving_spoon: &str,
    ) -> Uuid {
        let response = self
            .request_authenticated(
                Method::POST,
                "/api/v1/food-items",
                Some(serde_json::json!({
                    "item_name": name,
                    "item_type": true,
                    "cutlery_type": cutlery_type,
                    "serving_spoon": serving_spoon,
                    "category": "Starters",
                })),
            )
            .await;
        assert_eq!(response.status(), axum::http::StatusCode::CREATED);

        let body = read_json(response).await;
        body["data"]["id"]
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .expect("seeded food item id")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
        let _ = std::fs::remove_file(&self.db_file);
    }
}

/// Collect a response body into bytes.
#[allow(dead_code)]
pub async fn read_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body")
        .to_vec()
}

/// Collect a response body and parse it as JSON.
pub async fn read_json(response: axum::response::Response) -> Value {
    let bytes = read_bytes(response).await;
    serde_json::from_slice(&bytes).expect("response body is valid json")
}
