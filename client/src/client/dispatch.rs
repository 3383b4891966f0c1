//! The request cycle: execute, classify the status, decode the envelope.

use serde::de::IgnoredAny;
use tracing::field::Empty;
use tracing::{debug, error, instrument, warn, Span};

use super::executor::Executor;
use crate::encoding::Encoding;
use crate::endpoint::BadRequestKind;
use crate::error::{ApiError, AuthError, ClientError, ErrorKind};
use crate::request::ApiRequest;
use crate::response::{ApiResponse, ResponseShape};

/// Per-call settings the dispatcher needs from the client.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DispatchContext {
    pub encoding: Encoding,
    pub debug: bool,
    pub bad_request: BadRequestKind,
}

/// Executes `request` and decodes the response as `O`.
#[instrument(
    name = "api-client-v1",
    skip_all,
    fields(
        http.method = %request.method,
        http.url = Empty,
        http.host = Empty,
        http.path = %request.url.path(),
        http.status_code = Empty,
        otel.kind = "client",
        otel.status_code = Empty,
    )
)]
pub(crate) async fn execute_and_unmarshal<O: ResponseShape>(
    executor: &Executor,
    request: &ApiRequest,
    ctx: DispatchContext,
) -> Result<O::Output, ApiError> {
    let span = Span::current();
    span.record("http.url", request.url.as_str());
    if let Some(host) = request.url.host_str() {
        span.record("http.host", host);
    }
    if ctx.debug {
        debug!(curl = %request.to_curl(), "dispatching request");
    }

    let response = match round_trip::<O>(executor, request, ctx.bad_request).await {
        Ok(response) => response,
        Err(e) => {
            if e.kind() == ErrorKind::NotFound {
                if let Some(absent) = O::not_found() {
                    debug!("resource does not exist");
                    return Ok(absent);
                }
            }
            error!(error = %e, "request failed");
            return Err(e);
        }
    };

    if !O::READS_BODY {
        return Ok(O::decode(&[], ctx.encoding)?);
    }

    let body = response.bytes().await.map_err(ClientError::Request)?;
    O::decode(&body, ctx.encoding).map_err(|e| {
        error!(error = %e, bytes = body.len(), "failed to decode response");
        e.into()
    })
}

/// Executes `request` and classifies the status, returning the response
/// only if `O` accepts it.
pub(crate) async fn round_trip<O: ResponseShape>(
    executor: &Executor,
    request: &ApiRequest,
    bad_request: BadRequestKind,
) -> Result<reqwest::Response, ApiError> {
    let span = Span::current();
    let response = executor.execute(request).await.inspect_err(|_| {
        span.record("otel.status_code", "ERROR");
    })?;

    let status = response.status().as_u16();
    span.record("http.status_code", status);

    if O::accepts(status) {
        span.record("otel.status_code", "OK");
        return Ok(response);
    }

    let otel_status = if response.status().is_server_error() {
        "ERROR"
    } else {
        "UNSET"
    };
    span.record("otel.status_code", otel_status);

    let text = match response.text().await {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, status, "failed to read error response body");
            String::new()
        }
    };
    Err(status_error(
        status,
        O::STRICT_STATUS,
        bad_request,
        failure_message(&text, status),
    ))
}

/// Maps a status the endpoint did not accept onto the error taxonomy.
///
/// 401 and 404 always keep their meaning. A strict endpoint reports every
/// other status as an unexpected response code.
pub(crate) fn status_error(
    status: u16,
    strict: bool,
    bad_request: BadRequestKind,
    message: String,
) -> ApiError {
    match status {
        400 if bad_request == BadRequestKind::InvalidTotpToken => {
            AuthError::InvalidTotpToken.into()
        }
        401 => AuthError::Unauthorized { message }.into(),
        404 => ClientError::NotFound.into(),
        _ if strict => ClientError::UnexpectedStatus { status }.into(),
        400..=499 => ClientError::BadRequest { status, message }.into(),
        500..=599 => ClientError::Server { status, message }.into(),
        _ => ClientError::UnexpectedStatus { status }.into(),
    }
}

/// Prefers the envelope's error message, then the raw body, then the
/// status reason.
fn failure_message(body: &str, status: u16) -> String {
    let from_envelope = serde_json::from_str::<ApiResponse<IgnoredAny>>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .map(|e| e.message)
        .filter(|m| !m.is_empty());
    if let Some(message) = from_envelope {
        return message;
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("unknown status")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use reqwest::header::HeaderMap;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::auth::DefaultTransport;
    use crate::client::executor::{http_client, DEFAULT_TIMEOUT};
    use crate::error::ErrorKind;
    use crate::method::RestMethod;
    use crate::response::{Empty, Item};
    use crate::retry::RetryPolicy;
    use crate::types::Household;

    fn kind(status: u16, strict: bool, bad_request: BadRequestKind) -> ErrorKind {
        status_error(status, strict, bad_request, String::new()).kind()
    }

    #[test]
    fn test_status_classification() {
        let generic = BadRequestKind::Generic;
        assert_eq!(kind(400, false, generic), ErrorKind::BadRequest);
        assert_eq!(kind(401, false, generic), ErrorKind::Unauthorized);
        assert_eq!(kind(403, false, generic), ErrorKind::BadRequest);
        assert_eq!(kind(404, false, generic), ErrorKind::NotFound);
        assert_eq!(kind(409, false, generic), ErrorKind::BadRequest);
        assert_eq!(kind(500, false, generic), ErrorKind::ServerError);
        assert_eq!(kind(503, false, generic), ErrorKind::ServerError);
        assert_eq!(kind(302, false, generic), ErrorKind::InvalidResponseCode);
    }

    #[test]
    fn test_totp_endpoint_specializes_400() {
        assert_eq!(
            kind(400, true, BadRequestKind::InvalidTotpToken),
            ErrorKind::InvalidTotpToken
        );
        assert_eq!(
            kind(422, false, BadRequestKind::InvalidTotpToken),
            ErrorKind::BadRequest
        );
    }

    #[test]
    fn test_strict_endpoints() {
        let generic = BadRequestKind::Generic;
        assert_eq!(kind(200, true, generic), ErrorKind::InvalidResponseCode);
        assert_eq!(kind(400, true, generic), ErrorKind::InvalidResponseCode);
        assert_eq!(kind(500, true, generic), ErrorKind::InvalidResponseCode);
        assert_eq!(kind(401, true, generic), ErrorKind::Unauthorized);
        assert_eq!(kind(404, true, generic), ErrorKind::NotFound);
    }

    #[test]
    fn test_failure_message_sources() {
        assert_eq!(
            failure_message(r#"{"error":{"code":"E1","message":"name taken"}}"#, 400),
            "name taken"
        );
        assert_eq!(failure_message("  plain text  ", 400), "plain text");
        assert_eq!(failure_message("", 503), "Service Unavailable");
    }

    fn plain_executor() -> Executor {
        Executor::new(
            http_client(DEFAULT_TIMEOUT).unwrap(),
            Arc::new(DefaultTransport::new("mealplan-client/test").unwrap()),
            RetryPolicy::default(),
            DEFAULT_TIMEOUT,
        )
    }

    fn get(server: &MockServer, route: &str) -> ApiRequest {
        ApiRequest {
            method: RestMethod::Get,
            url: Url::parse(&format!("{}{route}", server.uri())).unwrap(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    fn ctx(debug: bool) -> DispatchContext {
        DispatchContext {
            encoding: Encoding::Json,
            debug,
            bad_request: BadRequestKind::Generic,
        }
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn test_debug_logs_curl_and_records_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/households/h1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"data": {"id": "h1", "name": "home"}})),
            )
            .mount(&server)
            .await;

        let household = execute_and_unmarshal::<Item<Household>>(
            &plain_executor(),
            &get(&server, "/api/v1/households/h1"),
            ctx(true),
        )
        .await
        .unwrap();

        assert_eq!(household.name, "home");
        assert!(logs_contain("dispatching request"));
        assert!(logs_contain("curl -X GET"));
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn test_failed_decode_is_logged() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = execute_and_unmarshal::<Item<Household>>(
            &plain_executor(),
            &get(&server, "/api/v1/households/h1"),
            ctx(false),
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(logs_contain("failed to decode response"));
        assert!(!logs_contain("dispatching request"));
    }

    #[tokio::test]
    async fn test_empty_shape_skips_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let request = get(&server, "/_meta_/ready");
        execute_and_unmarshal::<Empty>(&plain_executor(), &request, ctx(false))
            .await
            .unwrap();
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn test_unreadable_error_body_is_logged() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 2048];
            let _ = socket.read(&mut buf).await;
            let _ = socket
                .write_all(
                    b"HTTP/1.1 502 Bad Gateway\r\ncontent-length: 64\r\nconnection: close\r\n\r\npartial",
                )
                .await;
        });

        let request = ApiRequest {
            method: RestMethod::Get,
            url: Url::parse(&format!("http://{addr}/api/v1/households")).unwrap(),
            headers: HeaderMap::new(),
            body: None,
        };
        let err = round_trip::<Empty>(&plain_executor(), &request, BadRequestKind::Generic)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ServerError);
        assert_eq!(err.status_code(), Some(502));
        assert!(logs_contain("failed to read error response body"));
    }

    #[test]
    fn test_status_message_is_kept() {
        let err = status_error(422, false, BadRequestKind::Generic, "bad zip".to_string());
        assert_eq!(err.status_code(), Some(422));
        assert!(err.to_string().contains("bad zip"));
    }
}
