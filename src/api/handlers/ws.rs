//! The research WebSocket.
//!
//! The command loop runs on the connection's task: a `start` command runs
//! its research inline, so a second command is only read once the current
//! run finishes (matching one-run-at-a-time session semantics). A client
//! disconnect mid-run only stops delivery; the run itself completes
//! regardless.

use crate::config::ResearchConfig;
use crate::research::Researcher;
use crate::session::{DeliveryMessage, MessageSink, SessionChannel};
use crate::types::{AppError, Result, StartCommand};
use crate::AppState;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

pub async fn websocket_endpoint(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Write half of the client connection, owned by the delivery task.
struct WebSocketSink(SplitSink<WebSocket, Message>);

#[async_trait::async_trait]
impl MessageSink for WebSocketSink {
    async fn send_text(&mut self, text: String) -> Result<()> {
        self.0
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| AppError::Internal(format!("websocket send failed: {}", e)))
    }
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (sink, mut stream) = socket.split();
    let channel = Arc::new(SessionChannel::open(Box::new(WebSocketSink(sink))));
    tracing::info!("research client connected");

    while let Some(Ok(message)) = stream.next().await {
        let Message::Text(text) = message else {
            continue;
        };

        if let Some(payload) = text.strip_prefix("start ") {
            match serde_json::from_str::<StartCommand>(payload) {
                Ok(command) => run_research(command, &state, Arc::clone(&channel)).await,
                Err(err) => {
                    tracing::warn!(error = %err, "rejecting malformed start command");
                    channel.send(DeliveryMessage::Error(format!(
                        "malformed start command: {}",
                        err
                    )));
                }
            }
        } else {
            tracing::debug!(command = %text, "ignoring unrecognized command");
        }
    }

    channel.close().await;
    tracing::info!("research client disconnected");
}

/// Resolve the session config and drive one research run, reporting the
/// outcome on the channel.
async fn run_research(command: StartCommand, state: &AppState, channel: Arc<SessionChannel>) {
    let started = Instant::now();

    let cfg = match command.config_path.as_deref() {
        Some(path) => ResearchConfig::load(Some(path)),
        None => Ok(state.research_defaults.as_ref().clone()),
    };
    let cfg = match cfg {
        Ok(cfg) => cfg.with_limits(command.prompt_token_limit, command.total_words),
        Err(err) => {
            tracing::error!(error = %err, "session config rejected");
            channel.send(DeliveryMessage::Error(err.to_string()));
            return;
        }
    };

    let researcher = match Researcher::from_config(
        command.task,
        command.report_type,
        command.source_urls,
        cfg,
        Arc::clone(&channel),
        PathBuf::from(&state.server.output_dir),
    ) {
        Ok(researcher) => researcher,
        Err(err) => {
            tracing::error!(error = %err, "failed to assemble research run");
            channel.send(DeliveryMessage::Error(err.to_string()));
            return;
        }
    };

    match researcher.run().await {
        Ok(_report) => {
            channel.send_log(format!(
                "\nTotal run time: {:.2} seconds\n",
                started.elapsed().as_secs_f64()
            ));
        }
        Err(err) => {
            tracing::error!(error = %err, "research run failed");
            channel.send(DeliveryMessage::Error(err.to_string()));
        }
    }
}
