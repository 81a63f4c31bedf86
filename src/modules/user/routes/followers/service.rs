use super::types::{request, response};
use crate::{
    modules::user::{repository::EdgeField, service::profile},
    types::Context,
};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    profile::list_connections(
        &ctx.partitions,
        &payload.id,
        EdgeField::Followers,
        payload.viewer_id.as_deref(),
        &payload.pagination,
    )
    .await
    .map_err(|err| {
        tracing::error!("Failed to list followers of user {}: {}", payload.id, err);
        response::Error::FailedToFetchFollowers
    })?
    .ok_or(response::Error::UserNotFound)
    .map(response::Success::Followers)
}
