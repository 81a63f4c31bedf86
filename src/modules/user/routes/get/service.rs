use super::types::{request, response};
use crate::{
    modules::user::service::{profile, resolver},
    types::Context,
};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    let resolved = resolver::resolve(&ctx.partitions, &payload.id)
        .await
        .map_err(|err| {
            tracing::error!("Failed to resolve user {}: {}", payload.id, err);
            response::Error::FailedToResolveUser
        })?
        .ok_or(response::Error::UserNotFound)?;

    Ok(response::Success::Profile(profile::format(
        resolved.record,
        payload.viewer_id.as_deref(),
    )))
}
