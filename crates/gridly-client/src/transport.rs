//! HTTP transport seam for the Gridly API.
//!
//! [`ApiRequest`] describes one outbound call independently of the HTTP stack.
//! [`HttpTransport`] executes it; [`ReqwestTransport`] is the production
//! implementation, tests substitute a recording double.

use std::fmt;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// HTTP verbs used by the Gridly API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One outbound API call: verb, path segments, query pairs and JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

impl ApiRequest {
    pub fn new<I, S>(method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::Get, segments)
    }

    pub fn post<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::Post, segments)
    }

    pub fn patch<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::Patch, segments)
    }

    pub fn delete<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::Delete, segments)
    }

    /// Append a scalar query parameter as a plain token.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append a scalar query parameter only when present.
    #[must_use]
    pub fn optional_query<T: ToString>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    /// Append a structured query parameter encoded as a JSON string, only when present.
    pub fn optional_json_query<T: Serialize>(
        mut self,
        key: &str,
        value: Option<&T>,
    ) -> ClientResult<Self> {
        if let Some(v) = value {
            self.query
                .push((key.to_string(), serde_json::to_string(v)?));
        }
        Ok(self)
    }

    /// Attach a JSON body.
    pub fn json_body<T: Serialize>(mut self, body: &T) -> ClientResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Path relative to the base address, e.g. `/views/v1/columns/c1`.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// Value of a query parameter, if present.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Resolve against a base address. Segments and query values are percent-encoded.
    ///
    /// Empty, `.` and `..` segments are rejected: URL normalization would
    /// drop or collapse them and address a different resource.
    pub fn url(&self, base_url: &str) -> ClientResult<Url> {
        if let Some(segment) = self
            .segments
            .iter()
            .find(|s| matches!(s.as_str(), "" | "." | ".."))
        {
            return Err(ClientError::InvalidPathSegment {
                segment: segment.clone(),
            });
        }
        let mut url = Url::parse(base_url)?;
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                ClientError::config_error(format!("base URL cannot carry a path: {base_url}"))
            })?;
            path.pop_if_empty().extend(&self.segments);
        }
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }
}

/// Raw HTTP response: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub const NO_CONTENT: u16 = 204;

    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A 2xx response carrying a JSON body.
    pub fn json(value: &Value) -> Self {
        Self::new(200, value.to_string())
    }

    pub fn no_content() -> Self {
        Self::new(Self::NO_CONTENT, "")
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_no_content(&self) -> bool {
        self.status == Self::NO_CONTENT
    }

    /// Parse the body as JSON. Non-2xx statuses become [`ClientError::ApiError`].
    pub fn into_json(self) -> ClientResult<Value> {
        if !self.is_success() {
            return Err(ClientError::api_error(self.status, self.body));
        }
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Executes [`ApiRequest`]s against the remote API.
#[async_trait]
pub trait HttpTransport: Send + Sync + fmt::Debug {
    async fn execute(&self, request: ApiRequest) -> ClientResult<ApiResponse>;
}

/// Production transport backed by `reqwest`.
#[derive(Debug)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ReqwestTransport {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("gridly-mcp/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(config, http))
    }

    /// Use a preconfigured `reqwest` client.
    pub fn with_client(config: ClientConfig, http: reqwest::Client) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: ApiRequest) -> ClientResult<ApiResponse> {
        let url = request.url(self.config.base_url())?;
        debug!(method = %request.method(), path = %request.path(), "Sending Gridly API request");

        let mut builder = self
            .http
            .request(request.method().into(), url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, self.config.authorization());
        if let Some(body) = request.body() {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(status, "Gridly API responded");

        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const BASE: &str = "https://api.gridly.com/v1";

    #[test]
    fn test_path_joins_segments() {
        let request = ApiRequest::get(["views", "v1", "columns", "c1"]);
        assert_eq!(request.method(), Method::Get);
        assert_eq!(request.path(), "/views/v1/columns/c1");
    }

    #[test]
    fn test_url_appends_segments_to_base_path() {
        let url = ApiRequest::get(["grids", "g1"]).url(BASE).unwrap();
        assert_eq!(url.as_str(), "https://api.gridly.com/v1/grids/g1");
    }

    #[test]
    fn test_url_tolerates_trailing_slash_on_base() {
        let url = ApiRequest::get(["projects"])
            .url("https://api.gridly.com/v1/")
            .unwrap();
        assert_eq!(url.as_str(), "https://api.gridly.com/v1/projects");
    }

    #[test]
    fn test_url_encodes_path_segments() {
        let url = ApiRequest::get(["grids", "a/b c"]).url(BASE).unwrap();
        assert_eq!(url.as_str(), "https://api.gridly.com/v1/grids/a%2Fb%20c");
    }

    #[test]
    fn test_url_rejects_navigation_segments() {
        for segment in ["", ".", ".."] {
            let err = ApiRequest::delete(["views", "v1", "columns", segment])
                .url(BASE)
                .unwrap_err();
            match err {
                ClientError::InvalidPathSegment { segment: found } => assert_eq!(found, segment),
                other => panic!("Expected InvalidPathSegment, got {other:?}"),
            }
        }
        assert!(ApiRequest::get(["grids", "..."]).url(BASE).is_ok());
    }

    #[test]
    fn test_url_without_query_has_no_question_mark() {
        let url = ApiRequest::get(["databases"])
            .optional_query::<u64>("projectId", None)
            .url(BASE)
            .unwrap();
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_scalar_query_is_plain_token() {
        let url = ApiRequest::get(["databases"])
            .optional_query("projectId", Some(42))
            .url(BASE)
            .unwrap();
        assert_eq!(url.query(), Some("projectId=42"));
    }

    #[test]
    fn test_structured_query_is_encoded_json() {
        let page = json!({"offset": 0, "limit": 10});
        let request = ApiRequest::get(["views", "v1", "records"])
            .optional_json_query("page", Some(&page))
            .unwrap();
        let encoded: serde_json::Value =
            serde_json::from_str(request.query_value("page").unwrap()).unwrap();
        assert_eq!(encoded, page);

        let url = request.url(BASE).unwrap();
        let (key, value) = url.query_pairs().next().unwrap();
        assert_eq!(key, "page");
        assert_eq!(serde_json::from_str::<serde_json::Value>(&value).unwrap(), page);
        assert!(!url.query().unwrap().contains('{'));
    }

    #[test]
    fn test_json_body_is_attached() {
        let request = ApiRequest::patch(["grids", "g1"])
            .json_body(&json!({"name": "Sheet"}))
            .unwrap();
        assert_eq!(request.body(), Some(&json!({"name": "Sheet"})));
    }

    #[test]
    fn test_into_json_parses_success_body() {
        let value = ApiResponse::new(200, r#"{"id":"g1"}"#).into_json().unwrap();
        assert_eq!(value, json!({"id": "g1"}));
    }

    #[test]
    fn test_into_json_maps_error_status() {
        let err = ApiResponse::new(404, r#"{"message":"Grid not found"}"#)
            .into_json()
            .unwrap_err();
        match err {
            ClientError::ApiError { status, message } => {
                assert_eq!(status, 404);
                assert!(message.contains("Grid not found"));
            }
            other => panic!("Expected ApiError, got {other:?}"),
        }
    }

    #[test]
    fn test_into_json_rejects_malformed_body() {
        let err = ApiResponse::new(200, "<html>").into_json().unwrap_err();
        assert!(matches!(err, ClientError::SerializationError(_)));
    }

    #[test]
    fn test_no_content_detection() {
        assert!(ApiResponse::no_content().is_no_content());
        assert!(!ApiResponse::new(200, "").is_no_content());
    }

    /// One HTTP request as it arrived on the socket.
    #[derive(Debug)]
    struct CapturedRequest {
        request_line: String,
        headers: Vec<(String, String)>,
        body: String,
    }

    impl CapturedRequest {
        fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
        }
    }

    /// Answers one connection per canned response and returns what was sent.
    async fn capture_server(
        listener: TcpListener,
        responses: Vec<(u16, &'static str)>,
    ) -> Vec<CapturedRequest> {
        let mut captured = Vec::new();
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut raw = Vec::new();
            let mut chunk = [0u8; 1024];
            let head_end = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                assert!(n > 0, "connection closed before headers ended");
                raw.extend_from_slice(&chunk[..n]);
                if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos;
                }
            };

            let head = String::from_utf8(raw[..head_end].to_vec()).unwrap();
            let mut lines = head.split("\r\n");
            let request_line = lines.next().unwrap().to_string();
            let headers: Vec<(String, String)> = lines
                .filter_map(|line| line.split_once(':'))
                .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
                .collect();
            let length: usize = headers
                .iter()
                .find(|(k, _)| k == "content-length")
                .map_or(0, |(_, v)| v.parse().unwrap());

            let mut body_bytes = raw[head_end + 4..].to_vec();
            while body_bytes.len() < length {
                let n = socket.read(&mut chunk).await.unwrap();
                assert!(n > 0, "connection closed before body ended");
                body_bytes.extend_from_slice(&chunk[..n]);
            }

            let reply = if status == ApiResponse::NO_CONTENT {
                format!("HTTP/1.1 {status} No Content\r\nconnection: close\r\n\r\n")
            } else {
                format!(
                    "HTTP/1.1 {status} OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                )
            };
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();

            captured.push(CapturedRequest {
                request_line,
                headers,
                body: String::from_utf8(body_bytes).unwrap(),
            });
        }
        captured
    }

    #[tokio::test]
    async fn test_reqwest_transport_sends_method_path_headers_and_body() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(capture_server(
            listener,
            vec![
                (200, r#"[{"id":"g1"}]"#),
                (200, r#"{"id":"g1","name":"Sheet"}"#),
                (204, ""),
            ],
        ));

        let config = ClientConfig::new(format!("http://127.0.0.1:{port}/v1"), "secret-key");
        let http = reqwest::Client::builder()
            .no_proxy()
            .pool_max_idle_per_host(0)
            .build()
            .unwrap();
        let transport = ReqwestTransport::with_client(config, http);

        let listed = transport
            .execute(ApiRequest::get(["grids"]).query("dbId", "db1"))
            .await
            .unwrap();
        assert_eq!(listed, ApiResponse::new(200, r#"[{"id":"g1"}]"#));

        let patched = transport
            .execute(
                ApiRequest::patch(["grids", "g1"])
                    .json_body(&json!({"name": "Sheet"}))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(patched.status, 200);
        assert_eq!(patched.body, r#"{"id":"g1","name":"Sheet"}"#);

        let deleted = transport
            .execute(
                ApiRequest::delete(["views", "v1", "records"])
                    .json_body(&json!({"ids": ["r1", "r2"]}))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(deleted, ApiResponse::new(204, ""));

        let captured = server.await.unwrap();
        assert_eq!(captured.len(), 3);

        assert_eq!(captured[0].request_line, "GET /v1/grids?dbId=db1 HTTP/1.1");
        assert_eq!(captured[0].body, "");

        assert_eq!(captured[1].request_line, "PATCH /v1/grids/g1 HTTP/1.1");
        assert_eq!(
            serde_json::from_str::<Value>(&captured[1].body).unwrap(),
            json!({"name": "Sheet"})
        );

        assert_eq!(captured[2].request_line, "DELETE /v1/views/v1/records HTTP/1.1");
        assert_eq!(
            serde_json::from_str::<Value>(&captured[2].body).unwrap(),
            json!({"ids": ["r1", "r2"]})
        );

        for request in &captured {
            assert_eq!(request.header("authorization"), Some("ApiKey secret-key"));
            assert_eq!(request.header("content-type"), Some("application/json"));
        }
    }

    #[tokio::test]
    async fn test_reqwest_transport_rejects_navigation_segment_without_sending() {
        let config = ClientConfig::new("http://127.0.0.1:9/v1", "secret-key");
        let transport = ReqwestTransport::new(config).unwrap();

        let err = transport
            .execute(ApiRequest::get(["grids", ".."]))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidPathSegment { .. }));
    }
}
