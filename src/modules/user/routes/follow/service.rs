use super::types::{request, response};
use crate::{modules::user::service::graph, types::Context};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    let actor_id = payload
        .body
        .actor_id
        .filter(|actor_id| !actor_id.trim().is_empty())
        .ok_or(response::Error::MissingActorId)?;

    let outcome = graph::follow(&ctx.partitions, &actor_id, &payload.target_id).await?;

    Ok(match outcome.changed {
        true => response::Success::Followed,
        false => response::Success::AlreadyFollowing,
    })
}
