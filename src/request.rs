use crate::gateway::ApiError;
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    multipart::Form,
    Method,
};
use serde::Serialize;
use serde_json::Value;

/// A single call to the help-desk API, relative to the gateway's base URL.
#[derive(Debug)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: RequestBody,
}

/// What gets sent as the request body.
#[derive(Debug)]
pub enum RequestBody {
    /// No body, although the request is still labelled as JSON.
    Empty,
    /// A value sent as JSON text.
    Json(Value),
    /// A pre-built multipart form, sent as-is.
    Multipart(Form),
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Request {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Request::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Request::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Request::new(Method::PATCH, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Request::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Request::new(Method::DELETE, path)
    }

    /// Add an extra header. The session's `Authorization` header takes
    /// precedence over one set here.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Send `body` as JSON, replacing any previous body.
    pub fn json<T>(mut self, body: &T) -> Result<Self, ApiError>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(body).map_err(ApiError::Encode)?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    /// Send a multipart form, replacing any previous body.
    pub fn multipart(mut self, form: Form) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn requests_default_to_no_body() {
        let request = Request::get("/api/tickets");

        assert_eq!(request.method, Method::GET);
        assert_eq!(request.path, "/api/tickets");
        assert!(request.headers.is_empty());
        assert!(matches!(request.body, RequestBody::Empty));
    }

    #[test]
    fn json_body_replaces_a_form() {
        let request = Request::post("/api/tickets")
            .multipart(Form::new().text("title", "x"))
            .json(&json!({ "title": "x" }))
            .unwrap();

        match request.body {
            RequestBody::Json(value) => {
                assert_eq!(value, json!({ "title": "x" }))
            },
            other => panic!("Expected a JSON body, found {:?}", other),
        }
    }

    #[test]
    fn form_replaces_a_json_body() {
        let request = Request::post("/api/tickets/1/attachments")
            .json(&json!({ "ignored": true }))
            .unwrap()
            .multipart(Form::new().text("file", "x"));

        assert!(matches!(request.body, RequestBody::Multipart(_)));
    }
}
