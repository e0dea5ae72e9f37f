//! Shared helper utilities for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`; this
//! module holds the app harness and request helpers they share.

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test, web};
use mealbook::Trace;
use mealbook::inbound::http::api_routes;
use mealbook::test_support::InMemoryBackend;
use serde_json::Value;

/// Full `/api/v1` app over `backend`, wrapped in the trace middleware.
pub async fn app(
    backend: &InMemoryBackend,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(backend.http_state()))
            .wrap(Trace)
            .service(web::scope("/api/v1").configure(api_routes)),
    )
    .await
}

/// Read a response as `(status, json)`; empty bodies become `Value::Null`.
pub async fn read_json<B: MessageBody>(res: ServiceResponse<B>) -> (StatusCode, Value) {
    let status = res.status();
    let body = test::read_body(res).await;
    if body.is_empty() {
        return (status, Value::Null);
    }
    (status, serde_json::from_slice(&body).expect("json body"))
}

/// Send `method uri` with an optional bearer token and JSON body.
pub async fn send<S>(
    app: &S,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let mut req = match method {
        "POST" => test::TestRequest::post(),
        "PUT" => test::TestRequest::put(),
        "DELETE" => test::TestRequest::delete(),
        _ => test::TestRequest::get(),
    }
    .uri(uri);
    if let Some(token) = token {
        req = req.insert_header((AUTHORIZATION, format!("Bearer {token}")));
    }
    if let Some(body) = body {
        req = req.set_json(body);
    }
    read_json(test::call_service(app, req.to_request()).await).await
}

/// Read a string field from a JSON payload.
pub fn text<'a>(body: &'a Value, field: &str) -> &'a str {
    body.get(field)
        .and_then(Value::as_str)
        .unwrap_or_else(|| panic!("{field} in {body}"))
}
