use super::{service::service, types::request};
use crate::{
    modules::user::routes::ViewerQuery, types::Context, utils::pagination::Pagination,
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use std::sync::Arc;

pub async fn handler(
    State(ctx): State<Arc<Context>>,
    Path(id): Path<String>,
    Query(viewer): Query<ViewerQuery>,
    pagination: Pagination,
) -> impl IntoResponse {
    service(
        ctx,
        request::Payload {
            id,
            viewer_id: viewer.into_viewer_id(),
            pagination,
        },
    )
    .await
}
