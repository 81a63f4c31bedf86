mod follow;
mod followers;
mod following;
mod get;
mod unfollow;
mod update;

use crate::types::Context;
use axum::routing::Router;
use serde::Deserialize;
use std::sync::Arc;

/// `?viewerId=` (or the older `?currentUserId=`) on read endpoints.
#[derive(Deserialize, Default)]
pub struct ViewerQuery {
    #[serde(rename = "viewerId", alias = "currentUserId")]
    pub viewer_id: Option<String>,
}

impl ViewerQuery {
    pub fn into_viewer_id(self) -> Option<String> {
        self.viewer_id.filter(|viewer_id| !viewer_id.trim().is_empty())
    }
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .merge(get::get_router())
        .merge(update::get_router())
        .merge(follow::get_router())
        .merge(unfollow::get_router())
        .merge(followers::get_router())
        .merge(following::get_router())
}
