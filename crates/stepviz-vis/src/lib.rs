//! Stepviz Playback & Server
//!
//! Steps through algorithm execution sequences with playback controls.
//!
//! # Architecture
//!
//! - **Ticker**: Timer seam; every tick names the timer that produced it
//! - **Playback**: Cursor over one sequence, with play/pause/step/speed
//! - **Session**: Algorithm selection, operation input, stale-result guard
//! - **Backend**: Produces sequences (in-process generator by default)
//! - **Server**: REST control surface and WebSocket frame stream
//!
//! # Usage
//!
//! ```ignore
//! let config = VisConfig::from_env()?;
//! let addr = config.addr;
//! VisServer::new(config).serve(addr).await?;
//! ```

mod backend;
mod config;
mod error;
mod playback;
mod server;
mod session;
mod ticker;

pub use backend::{ExecutionBackend, LocalBackend};
pub use config::VisConfig;
pub use error::{BackendError, Error, Result};
pub use playback::{PlaybackEngine, PlaybackState, PlaybackStatus, Speed};
pub use server::{ApiError, AppState, SessionFrame, VisServer};
pub use session::{OperationOutcome, OperationValue, PendingOperation, Session, SessionStatus};
pub use ticker::{ManualTicker, Tick, TickSource, TimerId, TokioTicker};
