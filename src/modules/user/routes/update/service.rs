use super::types::{request, response};
use crate::{
    modules::user::{
        identifier::storage_keys,
        repository::ProfileUpdate,
        service::resolver,
    },
    types::Context,
};
use std::sync::Arc;
use validator::Validate;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    let body = payload.body.trimmed();
    body.validate().map_err(|errors| {
        tracing::warn!("Failed to validate payload: {errors}");
        response::Error::FailedToValidate(errors)
    })?;

    let resolved = resolver::resolve(&ctx.partitions, &payload.id)
        .await
        .map_err(|err| {
            tracing::error!("Failed to resolve user {}: {}", payload.id, err);
            response::Error::FailedToResolveUser
        })?
        .ok_or(response::Error::UserNotFound)?;

    // Profile fields are only ever written to the partition the user resolved from.
    let partition = ctx
        .partitions
        .get(resolved.partition)
        .ok_or(response::Error::FailedToUpdateProfile)?;

    let update = ProfileUpdate {
        name: body.name,
        bio: body.bio,
        location: body.location,
        avatar: body.avatar,
    };

    partition
        .update_profile(&storage_keys(&resolved.record.id), &update)
        .await
        .map_err(|err| {
            tracing::error!(
                "Failed to update profile of user {} in {}: {}",
                resolved.record.id,
                partition.name(),
                err
            );
            response::Error::FailedToUpdateProfile
        })
        .map(|_| response::Success::ProfileUpdated)
}
