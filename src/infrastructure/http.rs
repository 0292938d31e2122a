use crate::config::CheckoutConfig;
use crate::domain::ports::PurchaseTransport;
use crate::domain::response::{PurchaseResponse, RejectedPurchase};
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderName, HeaderValue};
use serde_json::Value;
use std::time::Duration;

const MAX_ERROR_BODY_CHARS: usize = 4 * 1024;

/// Sends purchase requests over HTTP.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    csrf: Option<(HeaderName, HeaderValue)>,
}

impl HttpTransport {
    pub fn new(config: &CheckoutConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let csrf = match &config.csrf_token {
            Some(token) => {
                let name = HeaderName::from_bytes(config.csrf_header.as_bytes())
                    .map_err(|e| CheckoutError::Config(format!("invalid csrf_header: {e}")))?;
                let mut value = HeaderValue::from_str(token)
                    .map_err(|e| CheckoutError::Config(format!("invalid csrf_token: {e}")))?;
                value.set_sensitive(true);
                Some((name, value))
            }
            None => None,
        };

        Ok(Self {
            client: builder.build()?,
            csrf,
        })
    }
}

#[async_trait]
impl PurchaseTransport for HttpTransport {
    async fn post(&self, endpoint: &str) -> Result<PurchaseResponse> {
        let mut request = self
            .client
            .post(endpoint)
            .header(ACCEPT, "application/json");
        if let Some((name, value)) = &self.csrf {
            request = request.header(name.clone(), value.clone());
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!(%endpoint, %status, "purchase endpoint answered");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(failure(status, body));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| CheckoutError::MalformedResponse(format!("body is not JSON: {e}")))?;
        Ok(PurchaseResponse::new(status.as_u16(), body))
    }
}

fn failure(status: StatusCode, body: String) -> CheckoutError {
    if status == StatusCode::UNPROCESSABLE_ENTITY
        && let Ok(rejected) = serde_json::from_str::<RejectedPurchase>(&body)
    {
        return CheckoutError::PurchaseRejected {
            message: rejected.purchasing_error_message,
        };
    }
    CheckoutError::Status {
        status,
        body: cap(body),
    }
}

fn cap(body: String) -> String {
    if body.chars().count() <= MAX_ERROR_BODY_CHARS {
        return body;
    }
    let mut capped: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    capped.push_str("...(truncated)");
    capped
}
