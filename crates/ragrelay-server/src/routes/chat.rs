use crate::state::AppState;
use axum::{
    body::Body,
    extract::{DefaultBodyLimit, State},
    http::header,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use bytes::Bytes;
use futures::{
    stream::{BoxStream, StreamExt},
    FutureExt, Stream,
};
use ragrelay::models::message::ChatRequest;
use ragrelay::relay::{error_events, RelayEvent};
use std::{
    convert::Infallible,
    future::Future,
    panic::AssertUnwindSafe,
    pin::Pin,
    task::{Context, Poll},
};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

// Server-sent event stream of relay events
pub struct SseResponse {
    rx: ReceiverStream<RelayEvent>,
}

impl SseResponse {
    fn new(rx: ReceiverStream<RelayEvent>) -> Self {
        Self { rx }
    }
}

impl Stream for SseResponse {
    type Item = Result<Bytes, Infallible>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.rx)
            .poll_next(cx)
            .map(|opt| opt.map(|event| Ok(Bytes::from(event.to_sse()))))
    }
}

impl IntoResponse for SseResponse {
    fn into_response(self) -> Response {
        (
            [
                (header::CONTENT_TYPE, "text/event-stream"),
                (header::CACHE_CONTROL, "no-cache"),
                (header::CONNECTION, "keep-alive"),
            ],
            Body::from_stream(self),
        )
            .into_response()
    }
}

async fn send_all(tx: &mpsc::Sender<RelayEvent>, events: Vec<RelayEvent>) {
    for event in events {
        if tx.send(event).await.is_err() {
            break;
        }
    }
}

// Pull relay events until the relay ends or the client goes away. Returning
// drops the relay, which releases the upstream connection.
async fn forward(mut events: BoxStream<'static, RelayEvent>, tx: &mpsc::Sender<RelayEvent>) {
    loop {
        tokio::select! {
            _ = tx.closed() => {
                tracing::info!("Client disconnected, closing upstream stream");
                break;
            }
            event = events.next() => {
                match event {
                    Some(event) => {
                        if let Err(e) = tx.send(event).await {
                            tracing::error!("Error sending event through channel: {}", e);
                            break;
                        }
                    }
                    None => break,
                }
            }
        }
    }
}

// A panic inside `work` still ends the client's stream with an error and the sentinel
async fn guarded<F: Future<Output = ()>>(work: F, tx: &mpsc::Sender<RelayEvent>) {
    if AssertUnwindSafe(work).catch_unwind().await.is_err() {
        tracing::error!("Chat completion task panicked");
        send_all(tx, error_events("internal error")).await;
    }
}

async fn handler(State(state): State<AppState>, body: Bytes) -> SseResponse {
    let (tx, rx) = mpsc::channel(100);
    let stream = ReceiverStream::new(rx);

    let request = match serde_json::from_slice::<ChatRequest>(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::error!("Error in chat completion: {}", e);
            send_all(&tx, error_events(e)).await;
            return SseResponse::new(stream);
        }
    };

    tokio::spawn(async move {
        let work = async {
            let events = state.pipeline.chat(request).await;
            forward(events, &tx).await;
        };
        guarded(work, &tx).await;
    });

    SseResponse::new(stream)
}

// Configure routes for this module
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/chat/completions", post(handler))
        // Conversations are unbounded; an oversized body must not bypass the event stream
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}
