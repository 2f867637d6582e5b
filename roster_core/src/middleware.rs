//! Request logging middleware configuration

use axum::body::Body;
use http::Request;
use std::time::Duration;
use tower_http::classify::{ServerErrorsAsFailures, ServerErrorsFailureClass, SharedClassifier};
use tower_http::trace::{DefaultOnBodyChunk, DefaultOnEos, DefaultOnRequest, TraceLayer};
use tracing::info_span;

type MakeSpanFn = fn(&Request<Body>) -> tracing::Span;
type OnResponseFn = fn(&http::Response<Body>, Duration, &tracing::Span);
type OnFailureFn = fn(ServerErrorsFailureClass, Duration, &tracing::Span);

pub fn logging_layer() -> TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    MakeSpanFn,
    DefaultOnRequest,
    OnResponseFn,
    DefaultOnBodyChunk,
    DefaultOnEos,
    OnFailureFn,
> {
    let make_span: MakeSpanFn = |request| {
        info_span!(
            "http_request",
            method = %request.method(),
            path = %request.uri().path(),
        )
    };
    let on_response: OnResponseFn = |response, latency, _span| {
        let status = response.status();
        let latency_ms = latency.as_millis();

        if status.is_success() {
            tracing::info!(status = status.as_u16(), latency_ms, "request completed");
        } else if status.is_client_error() {
            tracing::warn!(status = status.as_u16(), latency_ms, "client error response");
        } else {
            tracing::error!(status = status.as_u16(), latency_ms, "server error response");
        }
    };
    let on_failure: OnFailureFn = |error, latency, _span| {
        tracing::error!(
            latency_ms = latency.as_millis(),
            error = ?error,
            "request failed"
        );
    };

    TraceLayer::new_for_http()
        .make_span_with(make_span)
        .on_response(on_response)
        .on_failure(on_failure)
}
