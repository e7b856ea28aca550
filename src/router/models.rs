// src/router/models.rs
use std::collections::HashMap;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Serverless HTTP event as delivered by the function host.
/// Example: `{"httpMethod":"GET","queryStringParameters":{"resource":"zakat","region":"SG"}}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEvent {
    pub http_method: String,
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
    /// Raw request body; POST handlers expect a JSON document.
    #[serde(default)]
    pub body: Option<String>,
}

impl RequestEvent {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query_string_parameters
            .as_ref()
            .and_then(|params| params.get(key))
            .map(String::as_str)
    }
}

#[cfg(test)]
impl RequestEvent {
    pub fn get(params: &[(&str, &str)]) -> Self {
        Self {
            http_method: "GET".to_string(),
            query_string_parameters: Some(
                params
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ),
            body: None,
        }
    }

    pub fn post(body: impl Into<String>) -> Self {
        Self {
            http_method: "POST".to_string(),
            query_string_parameters: None,
            body: Some(body.into()),
        }
    }
}

/// Body of a POST request.
#[derive(Debug, Deserialize)]
pub struct PostRequest {
    #[serde(default)]
    pub function: Option<String>,
}

/// What the function host sends back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnResponse {
    pub status_code: u16,
    pub body: String,
}

impl ReturnResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            body: body.into(),
        }
    }

    /// Returned when no handler branch produced a response.
    pub fn placeholder() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "API CALL RECEIVED")
    }
}
