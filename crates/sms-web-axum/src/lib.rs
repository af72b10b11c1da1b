use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::IntoResponse,
    routing::post,
    Router,
};
use bytes::Bytes;
use sms_core::{Headers, InboundRegistry};
use sms_web_generic::{HeaderConverter, ResponseConverter, WebhookProcessor};

#[derive(Clone)]
pub struct AppState {
    pub registry: InboundRegistry,
}

/// Axum-specific header converter
pub struct AxumHeaderConverter;

impl HeaderConverter for AxumHeaderConverter {
    type HeaderType = HeaderMap;

    fn to_generic_headers(headers: &Self::HeaderType) -> Headers {
        headers
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    v.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect()
    }
}

/// Axum-specific response converter
pub struct AxumResponseConverter;

impl ResponseConverter for AxumResponseConverter {
    type ResponseType = axum::response::Response;

    fn from_webhook_response(response: sms_core::WebhookResponse) -> Self::ResponseType {
        let status = axum::http::StatusCode::from_u16(response.status.as_u16())
            .unwrap_or(axum::http::StatusCode::INTERNAL_SERVER_ERROR);

        (
            status,
            [(header::CONTENT_TYPE, response.content_type)],
            response.body,
        )
            .into_response()
    }
}

/// Handler for `POST /webhooks/{provider}`
pub async fn unified_webhook(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let processor = WebhookProcessor::new(state.registry);
    let generic_headers = AxumHeaderConverter::to_generic_headers(&headers);
    let response = processor.process_webhook(&provider, generic_headers, &body);
    AxumResponseConverter::from_webhook_response(response)
}

/// Handler for `POST /webhooks`; the provider is recognized from the payload
pub async fn detect_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let processor = WebhookProcessor::new(state.registry);
    let generic_headers = AxumHeaderConverter::to_generic_headers(&headers);
    let response = processor.process_detected(generic_headers, &body);
    AxumResponseConverter::from_webhook_response(response)
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/webhooks", post(detect_webhook))
        .route("/webhooks/{provider}", post(unified_webhook))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use sms_catapult::{CatapultClient, CatapultConfig};
    use std::sync::Arc;
    use tower::ServiceExt;

    const CALLBACK: &str = "eventType=sms&direction=in&messageId=m-1\
        &messageUri=https%3A%2F%2Fapi.catapult.inetwork.com%2Fv1%2Fusers%2Fu%2Fmessages%2Fm-1\
        &from=%2B13233326955&to=%2B13865245000&text=Example&applicationId=a-1\
        &time=2012-11-14T16%3A13%3A06.076Z&state=received";

    fn app() -> Router {
        let client = CatapultClient::new(CatapultConfig::new("u", "t", "s"));
        router(AppState {
            registry: InboundRegistry::new().with(Arc::new(client)),
        })
    }

    fn form_post(uri: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn detects_catapult_callback() {
        let res = app().oneshot(form_post("/webhooks", CALLBACK)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json");

        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body[0]["to"], "+13865245000");
    }

    #[tokio::test]
    async fn routes_named_provider() {
        let res = app()
            .oneshot(form_post("/webhooks/catapult", CALLBACK))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let res = app()
            .oneshot(form_post("/webhooks/plivo", CALLBACK))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn rejects_unknown_payload() {
        let res = app().oneshot(form_post("/webhooks", "text=hi")).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
