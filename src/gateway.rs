//! The single path every API call takes.

use crate::{
    request::{Request, RequestBody},
    session::SessionStore,
};
use hyper::ext::ReasonPhrase;
use reqwest::{
    header::{HeaderMap, HeaderValue, InvalidHeaderValue, CONTENT_TYPE},
    Client, Response, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Used when a failed response doesn't say what went wrong.
pub const FALLBACK_ERROR_MESSAGE: &str = "Request failed";

const JSON_CONTENT_TYPE: &str = "application/json";

/// Sends [`Request`]s to the help-desk API on behalf of the current session.
#[derive(Debug, Clone)]
pub struct Gateway {
    client: Client,
    base_url: String,
    session: SessionStore,
}

impl Gateway {
    pub fn new(client: Client, base_url: &str, session: SessionStore) -> Self {
        Gateway {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn session(&self) -> &SessionStore { &self.session }

    pub fn base_url(&self) -> &str { &self.base_url }

    /// Send a request, giving back the parsed JSON body or, for anything
    /// that isn't JSON (e.g. file downloads), the untouched response.
    ///
    /// Any non-2xx status becomes an [`ApiError::Rejected`] carrying the
    /// server's `error` message.
    pub async fn send(&self, request: Request) -> Result<Outcome, ApiError> {
        let request = self.prepare(request)?;

        log::debug!("Sending a {} request to {}", request.method(), request.url());
        log::trace!(
            "Header names: {:?}",
            request.headers().keys().collect::<Vec<_>>()
        );

        let response = self.client.execute(request).await?;
        log::trace!("Response Headers: {:#?}", response.headers());

        classify(response).await
    }

    /// Send a request and deserialize its JSON response.
    pub async fn fetch<T>(&self, request: Request) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let value = self.send(request).await?.into_json()?;

        serde_json::from_value(value).map_err(ApiError::Decode)
    }

    fn prepare(&self, request: Request) -> Result<reqwest::Request, ApiError> {
        let Request {
            method,
            path,
            headers,
            body,
        } = request;
        let url = format!("{}{}", self.base_url, path);

        let mut headers = headers;
        for (name, value) in self.session.auth_header()?.iter() {
            headers.insert(name.clone(), value.clone());
        }

        let builder = self.client.request(method, &url);

        let builder = match body {
            RequestBody::Multipart(form) => builder.headers(headers).multipart(form),
            RequestBody::Json(value) => {
                with_json_content_type(&mut headers);
                builder.headers(headers).body(value.to_string())
            },
            RequestBody::Empty => {
                with_json_content_type(&mut headers);
                builder.headers(headers)
            },
        };

        builder.build().map_err(ApiError::from)
    }
}

fn with_json_content_type(headers: &mut HeaderMap) {
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
}

async fn classify(response: Response) -> Result<Outcome, ApiError> {
    let status = response.status();

    if !status.is_success() {
        let reason = reason_phrase(&response);
        let body = match response.bytes().await {
            Ok(bytes) => serde_json::from_slice::<Value>(&bytes).ok(),
            Err(e) => {
                log::debug!("Unable to read the error response: {}", e);
                None
            },
        };
        let message = failure_message(reason.as_deref(), body.as_ref());
        log::debug!("The server rejected the request with {}: {}", status, message);

        return Err(ApiError::Rejected { status, message });
    }

    if declares_json(response.headers()) {
        let bytes = response.bytes().await?;
        let value = serde_json::from_slice(&bytes).map_err(ApiError::Decode)?;

        Ok(Outcome::Json(value))
    } else {
        Ok(Outcome::Raw(response))
    }
}

fn declares_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map_or(false, |value| value.contains(JSON_CONTENT_TYPE))
}

/// The reason phrase the server sent, falling back to the canonical one
/// for the status code.
fn reason_phrase(response: &Response) -> Option<String> {
    let sent = response
        .extensions()
        .get::<ReasonPhrase>()
        .and_then(|reason| std::str::from_utf8(reason.as_bytes()).ok());

    sent.or_else(|| response.status().canonical_reason())
        .map(String::from)
}

/// Work out a human-readable message for a failed response.
///
/// A JSON body is trusted to carry an `error` field; anything else falls
/// back to the status's reason phrase.
fn failure_message(reason: Option<&str>, body: Option<&Value>) -> String {
    let message = match body {
        Some(body) => body
            .get("error")
            .filter(|error| is_truthy(error))
            .map(|error| match error {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
        None => reason.filter(|reason| !reason.is_empty()).map(String::from),
    };

    message.unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string())
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A successful response.
#[derive(Debug)]
pub enum Outcome {
    /// The server declared a JSON body and it was parsed.
    Json(Value),
    /// Any other content type. Reading the body is left to the caller.
    Raw(Response),
}

impl Outcome {
    pub fn into_json(self) -> Result<Value, ApiError> {
        match self {
            Outcome::Json(value) => Ok(value),
            Outcome::Raw(response) => Err(ApiError::NotJson {
                content_type: response
                    .headers()
                    .get(CONTENT_TYPE)
                    .and_then(|value| value.to_str().ok())
                    .map(String::from),
            }),
        }
    }

    pub fn into_raw(self) -> Result<Response, ApiError> {
        match self {
            Outcome::Raw(response) => Ok(response),
            Outcome::Json(_) => Err(ApiError::UnexpectedJson),
        }
    }
}

/// Errors that may be returned by the [`Gateway`].
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP client encountered an error.
    #[error("Unable to send the request")]
    HttpClient(#[from] reqwest::Error),
    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
    /// A response which claimed to be JSON couldn't be parsed.
    #[error("Unable to parse the response")]
    Decode(#[source] serde_json::Error),
    /// The request body couldn't be turned into JSON.
    #[error("Unable to serialize the request body")]
    Encode(#[source] serde_json::Error),
    #[error(
        "Expected a JSON response but got {}",
        content_type.as_deref().unwrap_or("no content type")
    )]
    NotJson { content_type: Option<String> },
    #[error("Expected a file but the server sent JSON")]
    UnexpectedJson,
    /// The stored token can't be sent as a header.
    #[error("The session token isn't a valid header value")]
    InvalidToken(#[from] InvalidHeaderValue),
}

impl ApiError {
    /// The HTTP status, if the server got far enough to send one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            ApiError::HttpClient(e) => e.status(),
            _ => None,
        }
    }
}
