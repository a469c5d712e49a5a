//! Internal error rendering.
//!
//! [`AppError`] always answers a 500 with a generic body and attaches the
//! real cause as an [`ErrorDetail`] response extension. In development the
//! [`expose_error_detail`] layer swaps that cause into the `error` field;
//! elsewhere the layer is not installed and the detail never leaves the
//! process.

use std::any::Any;

use axum::{
    Json,
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::{AppError, ErrorDetail};

/// Middleware that puts the real error cause into 500 response bodies.
pub async fn expose_error_detail(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let Some(ErrorDetail(detail)) = response.extensions_mut().remove::<ErrorDetail>() else {
        return response;
    };

    let body = json!({
        "success": false,
        "message": "Internal server error",
        "error": detail,
    });
    (response.status(), Json(body)).into_response()
}

/// Render a handler panic as an internal error.
///
/// Used with `tower_http::catch_panic::CatchPanicLayer::custom`.
#[allow(clippy::needless_pass_by_value)]
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| err.downcast_ref::<&str>().map(ToString::to_string))
        .unwrap_or_else(|| "unknown panic".to_string());

    AppError::Internal(format!("handler panicked: {detail}")).into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode},
        middleware,
        routing::get,
    };
    use serde_json::Value;
    use tower::ServiceExt;
    use tower_http::catch_panic::CatchPanicLayer;

    use super::*;

    async fn failing() -> Result<&'static str, AppError> {
        Err(AppError::Internal("disk full".to_string()))
    }

    async fn panicking() -> &'static str {
        panic!("boom")
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn routes() -> Router {
        Router::new()
            .route("/fail", get(failing))
            .route("/panic", get(panicking))
            .layer(CatchPanicLayer::custom(panic_response))
    }

    #[tokio::test]
    async fn test_detail_exposed_when_layer_installed() {
        let app = routes().layer(middleware::from_fn(expose_error_detail));
        let (status, body) = get_json(app, "/fail").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error");
        assert!(body["error"].as_str().unwrap().contains("disk full"));
    }

    #[tokio::test]
    async fn test_detail_hidden_without_layer() {
        let (status, body) = get_json(routes(), "/fail").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Something went wrong");
    }

    #[tokio::test]
    async fn test_panic_becomes_internal_error() {
        let app = routes().layer(middleware::from_fn(expose_error_detail));
        let (status, body) = get_json(app, "/panic").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("boom"));
    }
}
