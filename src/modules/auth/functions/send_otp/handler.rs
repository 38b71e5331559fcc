use super::{
    service::service,
    types::{request, response},
};
use crate::types::Context;
use lambda_runtime::LambdaEvent;
use serde_json::Value;
use std::{
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use tracing::Instrument;

pub async fn handler(
    ctx: Arc<Context>,
    event: LambdaEvent<Value>,
) -> Result<Value, lambda_runtime::Error> {
    let (payload, invocation) = event.into_parts();
    let span = tracing::info_span!("send_otp", request_id = %invocation.request_id);

    invoke(ctx, payload, remaining(invocation.deadline))
        .instrument(span)
        .await
        .map_err(|err| {
            tracing::error!("send_otp failed: {}", err);
            lambda_runtime::Error::from(err)
        })
}

/// Runs one invocation, giving up once `budget` has elapsed.
pub async fn invoke(
    ctx: Arc<Context>,
    payload: Value,
    budget: Duration,
) -> Result<Value, response::Error> {
    let input = request::InputMessage::from_value(payload)?;

    tokio::time::timeout(budget, service(ctx, input))
        .await
        .map_err(|_| response::Error::DeadlineExceeded)?
        .map(response::Success::into_response)
}

/// Time left until the runtime's deadline, given in epoch milliseconds.
fn remaining(deadline_ms: u64) -> Duration {
    let deadline = UNIX_EPOCH + Duration::from_millis(deadline_ms);
    deadline
        .duration_since(SystemTime::now())
        .unwrap_or(Duration::ZERO)
}
