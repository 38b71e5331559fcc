use crate::{
    modules::auth::functions::send_otp::{self, types::{request, response}},
    types::{Config, ConfigError, Context, ToContext},
};
use lambda_runtime::{service_fn, LambdaEvent};
use serde_json::Value;
use std::sync::Arc;

pub struct App {
    ctx: Arc<Context>,
}

impl App {
    pub fn new() -> Result<Self, ConfigError> {
        let ctx: Arc<Context> = Arc::new(Config::from_env()?.to_context()?);

        tracing::debug!("Running in {:?} environment", ctx.app.environment);

        Ok(Self { ctx })
    }

    pub async fn serve(self) -> Result<(), lambda_runtime::Error> {
        let ctx = self.ctx;

        lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
            send_otp::handler(ctx.clone(), event)
        }))
        .await
    }

    /// Runs a single invocation on a raw event, outside the Lambda runtime.
    pub async fn invoke_local(&self, raw: &[u8]) -> response::Response {
        let input = request::InputMessage::from_slice(raw)?;
        send_otp::service(self.ctx.clone(), input).await
    }
}
