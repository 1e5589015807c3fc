//! Entry domain model.
//!
//! An `Entry` is the editable request/response payload a user works on,
//! independent of whether it has been persisted as an API record. History
//! items are plain entries as well.

use serde::{Deserialize, Serialize};

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Connect,
    Trace,
}

/// Content type of the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RequestContentType {
    #[default]
    #[serde(rename = "text/plain")]
    Raw,
    #[serde(rename = "application/json")]
    Json,
    #[serde(rename = "application/x-www-form-urlencoded")]
    Form,
}

/// A header or query parameter row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValuePair {
    pub key: String,
    pub value: String,
    /// Disabled rows are kept for editing but not sent
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl KeyValuePair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            is_enabled: true,
        }
    }
}

/// The request half of an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Request {
    pub url: String,
    #[serde(default)]
    pub method: RequestMethod,
    #[serde(default)]
    pub headers: Vec<KeyValuePair>,
    #[serde(default)]
    pub query_params: Vec<KeyValuePair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default)]
    pub content_type: RequestContentType,
}

impl Request {
    pub fn new(method: RequestMethod, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            ..Default::default()
        }
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(KeyValuePair::new(key, value));
        self
    }

    pub fn with_body(mut self, content_type: RequestContentType, body: impl Into<String>) -> Self {
        self.content_type = content_type;
        self.body = Some(body.into());
        self
    }
}

/// Response metadata captured after executing a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    #[serde(default)]
    pub status_text: String,
    #[serde(default)]
    pub headers: Vec<KeyValuePair>,
    #[serde(default)]
    pub body: String,
    /// Round-trip time in milliseconds
    #[serde(default)]
    pub time_ms: f64,
}

/// Request plus the last response, if the request has been executed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Entry {
    pub request: Request,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Response>,
}

impl Entry {
    /// A blank `GET` entry used for "new request".
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wraps an imported request into an entry that has not been executed.
    pub fn from_request(request: Request) -> Self {
        Self {
            request,
            response: None,
        }
    }

    pub fn with_response(mut self, response: Response) -> Self {
        self.response = Some(response);
        self
    }
}
