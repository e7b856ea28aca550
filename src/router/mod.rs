// src/router/mod.rs
pub mod models;

use reqwest::StatusCode;

use crate::notify::Notifier;
use crate::resolver::FallbackChain;
use crate::utils::error::AppError;

pub use models::{PostRequest, RequestEvent, ReturnResponse};

pub const ALERT_HEADER: &str = "Nisab scraper API error";
pub const NISAB_ERROR_BODY: &str = "Error Getting Nisab Value";

/// Regions with a known nisab publisher.
const SUPPORTED_REGION: &str = "SG";

/// Dispatches serverless events to handlers and reports anything that escapes them.
pub struct Router {
    chain: FallbackChain,
    notifier: Notifier,
}

impl Router {
    pub fn new(chain: FallbackChain, notifier: Notifier) -> Self {
        Self { chain, notifier }
    }

    /// Always produces a response. Errors are sent to the notifier and the
    /// response reflects whatever the handler had set before failing.
    pub async fn handle(&self, event: &RequestEvent) -> ReturnResponse {
        let mut res = ReturnResponse::placeholder();

        if let Err(e) = self.dispatch(event, &mut res).await {
            tracing::error!("Request failed: {}", e);
            self.notifier.alert(ALERT_HEADER, &e.to_string()).await;
        }

        tracing::info!("Responding {} ({} bytes)", res.status_code, res.body.len());
        res
    }

    async fn dispatch(&self, event: &RequestEvent, res: &mut ReturnResponse) -> Result<(), AppError> {
        // Method names are matched exactly.
        match event.http_method.as_str() {
            "POST" => self.process_post(event.body.as_deref().unwrap_or_default(), res),
            "GET" => self.process_get(event, res).await,
            other => {
                tracing::warn!("Unsupported method: {}", other);
                Ok(())
            }
        }
    }

    fn process_post(&self, body: &str, res: &mut ReturnResponse) -> Result<(), AppError> {
        let request: PostRequest = serde_json::from_str(body)?;
        *res = match request.function.as_deref() {
            Some("test") => ReturnResponse::new(StatusCode::OK, "Test POST function executed"),
            _ => ReturnResponse::new(StatusCode::BAD_REQUEST, "Default POST Request Response Reached"),
        };
        Ok(())
    }

    async fn process_get(&self, event: &RequestEvent, res: &mut ReturnResponse) -> Result<(), AppError> {
        if event.query_string_parameters.is_none() {
            return Err(AppError::MissingQuery);
        }

        match event.param("resource") {
            Some("base_case") => {
                *res = ReturnResponse::new(StatusCode::OK, "Test GET function executed");
            }
            Some("zakat") => {
                if event.param("region") != Some(SUPPORTED_REGION) {
                    *res = ReturnResponse::new(StatusCode::BAD_REQUEST, "Region not coded yet.");
                    return Ok(());
                }
                match self.chain.resolve().await {
                    Ok(value) => *res = ReturnResponse::new(StatusCode::OK, value.into_inner()),
                    Err(e) => {
                        *res = ReturnResponse::new(StatusCode::INTERNAL_SERVER_ERROR, NISAB_ERROR_BODY);
                        return Err(e.into());
                    }
                }
            }
            _ => {
                *res = ReturnResponse::new(StatusCode::BAD_REQUEST, "Default GET Request Response Reached");
            }
        }
        Ok(())
    }
}
