use super::types::{request, response};
use crate::{types::Context, utils::{graphql, otp}};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, input: request::InputMessage) -> response::Response {
    tracing::info!("Input message: {}", input);

    let payload = input.into_payload()?;

    let users = ctx.users.find_by_phone(&payload.phone).await?;

    if users.len() > 1 {
        tracing::warn!(
            "Found {} users using {}, picking the first one",
            users.len(),
            payload.phone
        );
    }

    let user = users
        .into_iter()
        .next()
        .ok_or_else(|| response::Error::UserNotFound(payload.phone.clone()))?;

    let otp = otp::generate(ctx.otp.length);

    // the secret is only stored once the provider accepted the code
    ctx.sms.send_otp(&payload.phone, &otp).await?;

    let user = ctx
        .users
        .update_secret(&user.id, &otp)
        .await?
        .ok_or_else(|| {
            tracing::error!("updateUser returned no user for {}", user.id);
            response::Error::UpstreamError(graphql::Error::MissingData)
        })?;

    tracing::info!("Stored OTP as secret of user {}", user.id);

    Ok(response::Success { user })
}
