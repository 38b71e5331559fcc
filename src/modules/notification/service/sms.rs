use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use crate::types::{AppEnvironment, SmsConfig};

pub const PIN_PLACEHOLDER: &str = "$PIN";
pub const DEFAULT_MESSAGE_TEMPLATE: &str = "Your verification code is $PIN";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("sms not sent: {0}")]
    NotSent(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send_otp(&self, phone: &str, otp: &str) -> Result<()>;
}

pub fn render_message(template: &str, otp: &str) -> String {
    template.replace(PIN_PLACEHOLDER, otp)
}

/// Sends plain SMS through a JSON messaging gateway.
pub struct HttpSmsGateway {
    http: reqwest::Client,
    config: SmsConfig,
}

impl HttpSmsGateway {
    pub fn new(config: SmsConfig, timeout: Duration) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, config })
    }

    fn body(&self, phone: &str, otp: &str) -> Value {
        json!({
            "api_key": self.config.api_key,
            "to": phone,
            "from": self.config.sender_id,
            "sms": render_message(&self.config.message_template, otp),
            "type": "plain",
            "channel": "generic",
        })
    }
}

#[async_trait]
impl SmsSender for HttpSmsGateway {
    async fn send_otp(&self, phone: &str, otp: &str) -> Result<()> {
        let res = self
            .http
            .post(&self.config.send_endpoint)
            .json(&self.body(phone, otp))
            .send()
            .await
            .map_err(|err| {
                tracing::error!("Failed to send OTP sms: {}", err);
                Error::NotSent(err.to_string())
            })?;

        let status = res.status();

        if !status.is_success() {
            let formatted_err = match res.text().await {
                Ok(data) => format!("Failed to send OTP sms ({}): {}", status, data),
                Err(err) => format!("Failed to get response body ({}): {}", status, err),
            };
            tracing::error!("{}", formatted_err);
            return Err(Error::NotSent(format!("gateway responded with {}", status)));
        }

        tracing::info!("Successfully sent OTP sms");

        Ok(())
    }
}

/// Stands in when no gateway is configured. Only development treats a logged
/// code as delivered.
pub struct LogOnlySms {
    environment: AppEnvironment,
}

impl LogOnlySms {
    pub fn new(environment: AppEnvironment) -> Self {
        Self { environment }
    }
}

#[async_trait]
impl SmsSender for LogOnlySms {
    async fn send_otp(&self, phone: &str, otp: &str) -> Result<()> {
        match self.environment {
            AppEnvironment::Production => {
                tracing::error!("No SMS provider configured, OTP for {} was not sent", phone);
                Err(Error::NotSent("no SMS provider configured".to_string()))
            }
            AppEnvironment::Development => {
                tracing::warn!("No SMS provider configured, OTP for {} was only logged", phone);
                tracing::debug!("otp: {}", otp);
                Ok(())
            }
        }
    }
}
