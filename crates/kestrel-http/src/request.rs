//! HTTP/1.1 request formatting.

use serde::Serialize;
use serde::ser::Serializer;

use crate::error::HttpError;

/// Content type used when the request does not set one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A request to send over a connection.
///
/// Form fields are encoded into the body according to the `Content-Type`
/// header: a JSON object for `application/json`, `key=value&...` for
/// `application/x-www-form-urlencoded`, and an empty body otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Request method, e.g. `GET`.
    pub method: String,
    /// Host to connect to.
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Request target.
    pub path: String,
    headers: Vec<(String, String)>,
    fields: Vec<(String, String)>,
}

impl Request {
    /// A `GET /` request to `host` on port 80.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            method: "GET".to_string(),
            host: host.into(),
            port: 80,
            path: "/".to_string(),
            headers: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Set the method.
    #[must_use]
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Set the port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the path.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set a header, replacing any header with the same name.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(name.into(), value.into());
        self
    }

    /// Add a body field.
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }

    /// Headers set by the caller, in insertion order.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Body fields, in insertion order.
    #[must_use]
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// The `Content-Type` header, or the form default.
    #[must_use]
    pub fn content_type(&self) -> &str {
        self.find_header("Content-Type").unwrap_or(DEFAULT_CONTENT_TYPE)
    }

    /// Encode the fields for the request's content type.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Encode`] if the encoder rejects the fields.
    pub fn encode_body(&self) -> Result<String, HttpError> {
        match self.content_type() {
            "application/json" => serde_json::to_string(&Fields(&self.fields))
                .map_err(|err| HttpError::Encode(err.to_string())),
            DEFAULT_CONTENT_TYPE => serde_urlencoded::to_string(&self.fields)
                .map_err(|err| HttpError::Encode(err.to_string())),
            _ => Ok(String::new()),
        }
    }

    /// Serialize the request line, headers and body.
    ///
    /// `Host` is added when missing, `Content-Type` defaults to the form
    /// encoding and `Content-Length` always reflects the encoded body.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Encode`] if the body cannot be encoded.
    pub fn to_bytes(&self) -> Result<Vec<u8>, HttpError> {
        let body = self.encode_body()?;

        let mut request = self.clone();
        if request.find_header("Host").is_none() {
            let host = request.host_header();
            request.headers.insert(0, ("Host".to_string(), host));
        }
        if request.find_header("Content-Type").is_none() {
            request.headers.push(("Content-Type".to_string(), DEFAULT_CONTENT_TYPE.to_string()));
        }
        request.set_header("Content-Length".to_string(), body.len().to_string());

        let mut out = format!("{} {} HTTP/1.1\r\n", request.method, request.path);
        for (name, value) in &request.headers {
            out.push_str(name);
            out.push_str(": ");
            out.push_str(value);
            out.push_str("\r\n");
        }
        out.push_str("\r\n");
        out.push_str(&body);
        Ok(out.into_bytes())
    }

    fn host_header(&self) -> String {
        if self.port == 80 {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    fn find_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn set_header(&mut self, name: String, value: String) {
        if let Some(slot) = self.headers.iter_mut().find(|(key, _)| *key == name) {
            slot.1 = value;
        } else {
            self.headers.push((name, value));
        }
    }
}

/// Fields as a JSON object, keys in insertion order.
struct Fields<'a>(&'a [(String, String)]);

impl Serialize for Fields<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}
