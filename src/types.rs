use crate::{
    modules::{
        notification::service::sms::{self, HttpSmsGateway, LogOnlySms, SmsSender},
        user::repository::{ApitoUserDirectory, UserDirectory},
    },
    utils::{graphql, otp},
};
use std::{env, str::FromStr, sync::Arc, time::Duration};

pub const DEFAULT_GRAPHQL_ENDPOINT: &str = "https://api.apito.io/graphql";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AppEnvironment {
    Production,
    Development,
}

impl AppEnvironment {
    pub fn from(raw_environment: &str) -> Self {
        match raw_environment {
            "production" => Self::Production,
            _ => Self::Development,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("Invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
    #[error("Failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
}

#[derive(Clone)]
pub struct ApitoConfig {
    pub graphql_endpoint: String,
    pub token: String,
    pub timeout: Duration,
}

#[derive(Clone)]
pub struct OtpConfig {
    pub length: usize,
}

#[derive(Clone)]
pub struct SmsConfig {
    pub send_endpoint: String,
    pub api_key: String,
    pub sender_id: String,
    pub message_template: String,
}

#[derive(Clone)]
pub struct Config {
    pub app: AppConfig,
    pub apito: ApitoConfig,
    pub otp: OtpConfig,
    pub sms: Option<SmsConfig>,
}

#[derive(Clone)]
pub struct AppContext {
    pub environment: AppEnvironment,
}

#[derive(Clone)]
pub struct OtpContext {
    pub length: usize,
}

/// Everything an invocation needs, built once per cold start.
#[derive(Clone)]
pub struct Context {
    pub app: AppContext,
    pub users: Arc<dyn UserDirectory>,
    pub sms: Arc<dyn SmsSender>,
    pub otp: OtpContext,
}

fn parse<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|err| ConfigError::Invalid {
        name,
        reason: err.to_string(),
    })
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let token = var("APITO_TOKEN").ok_or(ConfigError::Missing("APITO_TOKEN"))?;
        let graphql_endpoint = var("APITO_GRAPHQL_ENDPOINT")
            .unwrap_or_else(|| DEFAULT_GRAPHQL_ENDPOINT.to_string());
        let timeout_secs = match var("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => parse::<u64>("UPSTREAM_TIMEOUT_SECS", &raw)?,
            None => DEFAULT_UPSTREAM_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "UPSTREAM_TIMEOUT_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }
        let environment = var("APP_ENV").unwrap_or_else(|| "development".to_string());

        let otp_length = match var("OTP_LENGTH") {
            Some(raw) => parse::<usize>("OTP_LENGTH", &raw)?,
            None => otp::DEFAULT_LENGTH,
        };
        if !otp::ALLOWED_LENGTHS.contains(&otp_length) {
            return Err(ConfigError::Invalid {
                name: "OTP_LENGTH",
                reason: format!(
                    "must be between {} and {}",
                    otp::ALLOWED_LENGTHS.start(),
                    otp::ALLOWED_LENGTHS.end()
                ),
            });
        }

        let sms_api_key = var("SMS_API_KEY");
        let sms_sender_id = var("SMS_SENDER_ID");
        let sms = match var("SMS_SEND_ENDPOINT") {
            Some(send_endpoint) => {
                let message_template = var("SMS_MESSAGE_TEMPLATE")
                    .unwrap_or_else(|| sms::DEFAULT_MESSAGE_TEMPLATE.to_string());
                if !message_template.contains(sms::PIN_PLACEHOLDER) {
                    return Err(ConfigError::Invalid {
                        name: "SMS_MESSAGE_TEMPLATE",
                        reason: format!("must contain {}", sms::PIN_PLACEHOLDER),
                    });
                }

                Some(SmsConfig {
                    send_endpoint,
                    api_key: sms_api_key.ok_or(ConfigError::Missing("SMS_API_KEY"))?,
                    sender_id: sms_sender_id.ok_or(ConfigError::Missing("SMS_SENDER_ID"))?,
                    message_template,
                })
            }
            None if sms_api_key.is_some() || sms_sender_id.is_some() => {
                return Err(ConfigError::Missing("SMS_SEND_ENDPOINT"));
            }
            None => None,
        };

        Ok(Self {
            app: AppConfig {
                environment: AppEnvironment::from(&environment),
            },
            apito: ApitoConfig {
                graphql_endpoint,
                token,
                timeout: Duration::from_secs(timeout_secs),
            },
            otp: OtpConfig { length: otp_length },
            sms,
        })
    }
}

pub trait ToContext {
    fn to_context(self) -> Result<Context, ConfigError>;
}

impl ToContext for Config {
    fn to_context(self) -> Result<Context, ConfigError> {
        let client = graphql::Client::new(
            self.apito.graphql_endpoint,
            self.apito.token,
            self.apito.timeout,
        )?;
        tracing::debug!("GraphQL endpoint: {}", client.endpoint());

        let sms: Arc<dyn SmsSender> = match self.sms {
            Some(config) => Arc::new(HttpSmsGateway::new(config, self.apito.timeout)?),
            None => {
                match self.app.environment {
                    AppEnvironment::Production => tracing::warn!(
                        "SMS_SEND_ENDPOINT not set, every invocation will fail to deliver"
                    ),
                    AppEnvironment::Development => {
                        tracing::warn!("SMS_SEND_ENDPOINT not set, OTPs will only be logged")
                    }
                }
                Arc::new(LogOnlySms::new(self.app.environment))
            }
        };

        Ok(Context {
            app: AppContext {
                environment: self.app.environment,
            },
            users: Arc::new(ApitoUserDirectory::new(client)),
            sms,
            otp: OtpContext {
                length: self.otp.length,
            },
        })
    }
}
