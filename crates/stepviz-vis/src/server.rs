//! Axum web server with WebSocket streaming for the visualizer.

use std::sync::{Arc, Weak};

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use stepviz_model::{catalog, AlgorithmInfo, AlgorithmKind, Operation, Step};
use tokio::sync::{broadcast, mpsc, RwLock};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::backend::{ExecutionBackend, LocalBackend};
use crate::config::VisConfig;
use crate::error::{BackendError, Error};
use crate::playback::Speed;
use crate::session::{OperationOutcome, OperationValue, Session, SessionStatus};
use crate::ticker::{Tick, TokioTicker};

/// Buffered frames per WebSocket subscriber before it starts lagging.
const FRAME_BUFFER: usize = 64;

/// What every presentation surface renders: the status and the step under
/// the cursor, read together under one lock.
#[derive(Debug, Clone, Serialize)]
pub struct SessionFrame {
    pub status: SessionStatus,
    pub step: Option<Step>,
}

impl SessionFrame {
    fn of(session: &Session<TokioTicker>) -> Self {
        Self {
            status: session.status(),
            step: session.current_step().cloned(),
        }
    }
}

/// Shared application state.
pub struct AppState {
    session: RwLock<Session<TokioTicker>>,
    backend: Arc<dyn ExecutionBackend>,
    default_value: OperationValue,
    frames: broadcast::Sender<SessionFrame>,
}

impl AppState {
    fn publish(&self, session: &Session<TokioTicker>) {
        // No subscribers is fine.
        let _ = self.frames.send(SessionFrame::of(session));
    }

    async fn frame(&self) -> SessionFrame {
        SessionFrame::of(&*self.session.read().await)
    }

    /// Apply a synchronous session change and publish the result.
    async fn update<F>(&self, change: F) -> SessionStatus
    where
        F: FnOnce(&mut Session<TokioTicker>),
    {
        let mut session = self.session.write().await;
        change(&mut session);
        self.publish(&session);
        session.status()
    }

    /// Run an operation without holding the session lock across the
    /// backend call.
    async fn operate(&self, operation: Operation) -> Result<OperationOutcome, Error> {
        let pending = self.session.write().await.begin_operation(operation)?;
        let result = pending.execute(self.backend.as_ref()).await;

        let mut session = self.session.write().await;
        let outcome = session.complete_operation(pending, result)?;
        if outcome == OperationOutcome::Loaded {
            self.publish(&session);
        }
        Ok(outcome)
    }
}

/// Visualization server.
pub struct VisServer {
    state: Arc<AppState>,
}

impl VisServer {
    /// Create a server running the generator in-process.
    ///
    /// Must be called from within a Tokio runtime: the tick pump is spawned
    /// here.
    pub fn new(config: VisConfig) -> Self {
        let backend = Arc::new(LocalBackend::with_strict(config.strict));
        Self::with_backend(config, backend)
    }

    /// Create a server over any execution backend.
    pub fn with_backend(config: VisConfig, backend: Arc<dyn ExecutionBackend>) -> Self {
        let (ticker, ticks) = TokioTicker::new();
        let (frames, _) = broadcast::channel(FRAME_BUFFER);
        let state = Arc::new(AppState {
            session: RwLock::new(Session::with_defaults(ticker, config.speed, config.value)),
            backend,
            default_value: config.value,
            frames,
        });

        tokio::spawn(pump_ticks(Arc::downgrade(&state), ticks));
        Self { state }
    }

    /// Build the router for the server.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/health", get(health_handler))
            .route("/api/algorithms", get(algorithms_handler))
            .route("/api/algorithm/operation", post(operation_handler))
            .route("/api/session", get(session_handler))
            .route("/api/session/step", get(current_step_handler).post(step_handler))
            .route("/api/session/select", post(select_handler))
            .route("/api/session/value", post(value_handler))
            .route("/api/session/operate", post(operate_handler))
            .route("/api/session/toggle", post(toggle_handler))
            .route("/api/session/speed", post(speed_handler))
            .route("/api/session/reset", post(reset_handler))
            // WebSocket for real-time updates
            .route("/ws", get(ws_handler))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the server on the given address.
    pub async fn serve(self, addr: std::net::SocketAddr) -> Result<(), Error> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Visualization server running on http://{}", listener.local_addr()?);
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

/// Apply timer ticks to the session as they arrive. Stops once the server
/// state is gone.
async fn pump_ticks(state: Weak<AppState>, mut ticks: mpsc::UnboundedReceiver<Tick>) {
    while let Some(tick) = ticks.recv().await {
        let Some(state) = state.upgrade() else {
            break;
        };
        let mut session = state.session.write().await;
        if session.apply_tick(tick) {
            state.publish(&session);
        }
    }
    debug!("Tick pump stopped");
}

/// API error with an HTTP status.
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(e)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            Error::InvalidSelection => StatusCode::CONFLICT,
            Error::GenerationFailure {
                cause: BackendError::Unsupported { .. },
                ..
            } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorBody { error: self.0.to_string() })).into_response()
    }
}

async fn health_handler() -> &'static str {
    "OK"
}

async fn algorithms_handler() -> Json<&'static [AlgorithmInfo]> {
    Json(catalog())
}

#[derive(Deserialize)]
struct OperationRequest {
    #[serde(rename = "type")]
    kind: AlgorithmKind,
    operation: Operation,
    value: Option<i64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OperationResponse {
    success: bool,
    execution_steps: Vec<Step>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
}

/// Stateless execution of one operation; does not touch the session.
async fn operation_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OperationRequest>,
) -> (StatusCode, Json<OperationResponse>) {
    let value = req.value.unwrap_or(state.default_value.get());
    match state.backend.perform_operation(req.kind, req.operation, value).await {
        Ok(sequence) => (
            StatusCode::OK,
            Json(OperationResponse {
                success: true,
                execution_steps: sequence.into_steps(),
                error_message: None,
            }),
        ),
        Err(e) => {
            let status = match e {
                BackendError::Unsupported { .. } => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (
                status,
                Json(OperationResponse {
                    success: false,
                    execution_steps: Vec::new(),
                    error_message: Some(e.to_string()),
                }),
            )
        }
    }
}

async fn session_handler(State(state): State<Arc<AppState>>) -> Json<SessionStatus> {
    Json(state.session.read().await.status())
}

async fn current_step_handler(State(state): State<Arc<AppState>>) -> Json<Option<Step>> {
    Json(state.session.read().await.current_step().cloned())
}

#[derive(Deserialize)]
struct SelectRequest {
    #[serde(rename = "type")]
    kind: AlgorithmKind,
}

async fn select_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SelectRequest>,
) -> Json<SessionStatus> {
    Json(state.update(|s| s.select(req.kind)).await)
}

#[derive(Deserialize)]
struct ValueRequest {
    value: i64,
}

async fn value_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ValueRequest>,
) -> Json<SessionStatus> {
    Json(state.update(|s| s.set_operation_value(req.value)).await)
}

#[derive(Deserialize)]
struct OperateRequest {
    operation: Operation,
}

#[derive(Serialize)]
struct OperateResponse {
    outcome: OperationOutcome,
    status: SessionStatus,
}

async fn operate_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OperateRequest>,
) -> Result<Json<OperateResponse>, ApiError> {
    let outcome = state.operate(req.operation).await?;
    let status = state.session.read().await.status();
    Ok(Json(OperateResponse { outcome, status }))
}

async fn toggle_handler(State(state): State<Arc<AppState>>) -> Json<SessionStatus> {
    Json(state.update(|s| s.toggle_play()).await)
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Direction {
    Forward,
    Backward,
}

#[derive(Deserialize)]
struct StepRequest {
    direction: Direction,
}

async fn step_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StepRequest>,
) -> Json<SessionStatus> {
    Json(state.update(|s| step(s, req.direction)).await)
}

fn step(session: &mut Session<TokioTicker>, direction: Direction) {
    match direction {
        Direction::Forward => session.step_forward(),
        Direction::Backward => session.step_backward(),
    }
}

#[derive(Deserialize)]
struct SpeedRequest {
    level: i64,
}

async fn speed_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SpeedRequest>,
) -> Json<SessionStatus> {
    Json(state.update(|s| s.set_speed(Speed::new(req.level))).await)
}

async fn reset_handler(State(state): State<Arc<AppState>>) -> Json<SessionStatus> {
    Json(state.update(|s| s.reset()).await)
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn send(socket: &mut WebSocket, response: &WsResponse) -> bool {
    match serde_json::to_string(response) {
        Ok(json) => socket.send(Message::Text(json.into())).await.is_ok(),
        Err(e) => {
            warn!(error = %e, "Failed to encode WebSocket message");
            true
        }
    }
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    debug!("WebSocket client connected");
    let mut frames = state.frames.subscribe();

    if !send(&mut socket, &WsResponse::Frame(state.frame().await)).await {
        return;
    }

    loop {
        tokio::select! {
            msg = socket.recv() => match msg {
                Some(Ok(Message::Text(text))) => {
                    let reply = match serde_json::from_str::<WsCommand>(&text) {
                        Ok(cmd) => handle_ws_command(&state, cmd).await,
                        Err(e) => Some(WsResponse::Error { message: e.to_string() }),
                    };
                    if let Some(reply) = reply {
                        if !send(&mut socket, &reply).await {
                            break;
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
            frame = frames.recv() => {
                let frame = match frame {
                    Ok(frame) => frame,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "WebSocket client lagged; resending latest frame");
                        state.frame().await
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };
                if !send(&mut socket, &WsResponse::Frame(frame)).await {
                    break;
                }
            }
        }
    }
    debug!("WebSocket client disconnected");
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsCommand {
    GetFrame,
    Select { algorithm: AlgorithmKind },
    SetValue { value: i64 },
    Operate { operation: Operation },
    Toggle,
    Step { direction: Direction },
    Speed { level: i64 },
    Reset,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsResponse {
    Frame(SessionFrame),
    Superseded,
    Error { message: String },
}

/// Mutations answer through the frame broadcast; only reads, stale
/// results and failures reply directly.
async fn handle_ws_command(state: &Arc<AppState>, cmd: WsCommand) -> Option<WsResponse> {
    match cmd {
        WsCommand::GetFrame => return Some(WsResponse::Frame(state.frame().await)),
        WsCommand::Select { algorithm } => {
            state.update(|s| s.select(algorithm)).await;
        }
        WsCommand::SetValue { value } => {
            state.update(|s| s.set_operation_value(value)).await;
        }
        WsCommand::Operate { operation } => {
            return match state.operate(operation).await {
                Ok(OperationOutcome::Loaded) => None,
                Ok(OperationOutcome::Superseded) => Some(WsResponse::Superseded),
                Err(e) => Some(WsResponse::Error { message: e.to_string() }),
            };
        }
        WsCommand::Toggle => {
            state.update(|s| s.toggle_play()).await;
        }
        WsCommand::Step { direction } => {
            state.update(|s| step(s, direction)).await;
        }
        WsCommand::Speed { level } => {
            state.update(|s| s.set_speed(Speed::new(level))).await;
        }
        WsCommand::Reset => {
            state.update(|s| s.reset()).await;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn router_builds() {
        let server = VisServer::new(VisConfig::default());
        let _router = server.router();
    }

    #[test]
    fn ws_commands_parse() {
        let cmd: WsCommand =
            serde_json::from_str(r#"{"type":"select","algorithm":"quicksort"}"#).unwrap();
        assert!(matches!(cmd, WsCommand::Select { algorithm: AlgorithmKind::QuickSort }));

        let cmd: WsCommand =
            serde_json::from_str(r#"{"type":"step","direction":"backward"}"#).unwrap();
        assert!(matches!(cmd, WsCommand::Step { direction: Direction::Backward }));

        assert!(serde_json::from_str::<WsCommand>(r#"{"type":"launch"}"#).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_are_published() {
        let server = VisServer::new(VisConfig::default());
        let state = server.state.clone();
        let mut frames = state.frames.subscribe();

        state.update(|s| s.select(AlgorithmKind::Bst)).await;
        frames.recv().await.unwrap();

        state.operate(Operation::Insert).await.unwrap();
        let loaded = frames.recv().await.unwrap();
        assert_eq!(loaded.status.playback.cursor, 0);

        let ticked = frames.recv().await.unwrap();
        assert_eq!(ticked.status.playback.cursor, 1);
        assert_eq!(ticked.step.unwrap().state.step, 2);
    }

    #[test]
    fn unsupported_maps_to_bad_request() {
        let err = ApiError(Error::generation(
            AlgorithmKind::Bst,
            Operation::Sort,
            BackendError::Unsupported {
                kind: AlgorithmKind::Bst,
                operation: Operation::Sort,
            },
        ));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError(Error::InvalidSelection).status(), StatusCode::CONFLICT);
    }
}
