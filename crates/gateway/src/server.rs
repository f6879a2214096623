//! The webhook HTTP server.

use std::{collections::HashMap, sync::Arc, time::Duration};

use {
    axum::{
        Router,
        body::Bytes,
        extract::{Query, State},
        http::{HeaderMap, StatusCode},
        response::Json,
        routing::get,
    },
    tracing::{debug, info, warn},
};

use {
    khidmat_config::KhidmatConfig,
    khidmat_flow::ConversationStore,
    khidmat_sheets::SheetsSink,
    khidmat_whatsapp::{CloudApiOutbound, WebhookPayload, verify_signature, verify_subscription},
};

use crate::processor::Processor;

// ── Shared app state ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub verify_token: String,
    /// When set, `POST /` payloads must carry a valid `X-Hub-Signature-256`.
    pub app_secret: Option<String>,
    pub processor: Arc<Processor>,
}

/// Build the router (shared between production startup and tests).
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(verify_handler).post(webhook_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// `GET /` — the subscription handshake. Echoes `hub.challenge` on a token
/// match, 403 otherwise.
async fn verify_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<String, StatusCode> {
    verify_subscription(
        params.get("hub.mode").map(String::as_str),
        params.get("hub.verify_token").map(String::as_str),
        params.get("hub.challenge").map(String::as_str),
        &state.verify_token,
    )
    .ok_or(StatusCode::FORBIDDEN)
}

/// `POST /` — inbound webhook. Acknowledges immediately; processing runs in
/// a spawned task so a slow collaborator never stalls Meta's delivery.
async fn webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if let Some(ref secret) = state.app_secret {
        let signature = headers
            .get("x-hub-signature-256")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if !verify_signature(&body, signature, secret) {
            warn!("webhook signature verification failed");
            return StatusCode::FORBIDDEN;
        }
    }

    // A malformed body is acknowledged and dropped — Meta retries otherwise.
    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            debug!(error = %e, "ignoring unparsable webhook body");
            return StatusCode::OK;
        },
    };

    let processor = Arc::clone(&state.processor);
    tokio::spawn(async move { processor.process(payload).await });
    StatusCode::OK
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// ── Server startup ───────────────────────────────────────────────────────────

/// Bind and serve until shutdown. Also starts the idle-conversation sweep
/// when `flow.idle_minutes` is set.
pub async fn run(config: KhidmatConfig) -> anyhow::Result<()> {
    let store = Arc::new(ConversationStore::new());
    let outbound = Arc::new(CloudApiOutbound::new(
        &config.whatsapp.api_base,
        &config.whatsapp.phone_number_id,
        &config.whatsapp.access_token,
    ));
    let sink = Arc::new(SheetsSink::new(
        &config.sheets.api_base,
        &config.sheets.spreadsheet_id,
        &config.sheets.worksheet,
        &config.sheets.access_token,
    ));
    let processor = Arc::new(Processor::new(Arc::clone(&store), outbound, sink));

    if config.flow.idle_minutes > 0 {
        let max_idle = Duration::from_secs(config.flow.idle_minutes * 60);
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(max_idle / 2);
            loop {
                ticker.tick().await;
                store.evict_idle(max_idle);
            }
        });
    }

    let state = AppState {
        verify_token: config.whatsapp.verify_token.clone(),
        app_secret: config.whatsapp.app_secret.clone(),
        processor,
    };

    let addr = format!("{}:{}", config.server.bind, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "khidmat gateway listening");
    axum::serve(listener, build_app(state)).await?;
    Ok(())
}
