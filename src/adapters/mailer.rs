use crate::domain::model::OutgoingMessage;
use crate::domain::ports::MessageSender;
use crate::utils::error::{Result, TimesheetError};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use reqwest::Client;
use serde::Deserialize;

pub const DEFAULT_RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

/// Sends mail through the Resend HTTP API.
pub struct ResendMailer {
    client: Client,
    endpoint: String,
    api_key: String,
    from: String,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: Option<String>,
}

impl ResendMailer {
    pub fn new(endpoint: String, api_key: String, from: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            api_key,
            from,
        }
    }
}

#[async_trait]
impl MessageSender for ResendMailer {
    async fn send(&self, message: &OutgoingMessage) -> Result<Option<String>> {
        let payload = serde_json::json!({
            "from": self.from,
            "to": [message.to],
            "subject": message.subject,
            "html": message.html,
            "attachments": [{
                "filename": message.attachment.filename,
                "content": BASE64_STANDARD.encode(&message.attachment.bytes),
            }]
        });

        tracing::debug!("Posting email to {} for {}", self.endpoint, message.to);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or(body);
            tracing::error!("Email rejected ({}): {}", status, message);
            return Err(TimesheetError::DeliveryError {
                message: format!("Email rejected ({}): {}", status, message),
            });
        }

        let sent: SendResponse = response.json().await?;
        tracing::info!("Email accepted, id {:?}", sent.id);
        Ok(sent.id)
    }
}
