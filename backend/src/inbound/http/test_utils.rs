//! Test helpers for inbound HTTP components.

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::Value;

use crate::test_support::InMemoryBackend;

use super::api_routes;

/// Initialise the full `/api/v1` surface over `backend`.
pub(crate) async fn init_api(
    backend: &InMemoryBackend,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(backend.http_state()))
            .service(web::scope("/api/v1").configure(api_routes)),
    )
    .await
}

/// Read a response as `(status, json)`; empty bodies become `Value::Null`.
pub(crate) async fn read_json<B: MessageBody>(res: ServiceResponse<B>) -> (StatusCode, Value) {
    let status = res.status();
    let body = test::read_body(res).await;
    if body.is_empty() {
        return (status, Value::Null);
    }
    let value = serde_json::from_slice(&body).expect("json body");
    (status, value)
}

/// Read the `code` field of an error payload.
pub(crate) fn error_code(body: &Value) -> Option<&str> {
    body.get("code").and_then(Value::as_str)
}
