use super::{service::service, types::request};
use crate::types::Context;
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
};
use std::sync::Arc;

pub async fn handler(
    State(ctx): State<Arc<Context>>,
    Path(target_id): Path<String>,
    body: Option<Json<request::Body>>,
) -> impl IntoResponse {
    service(
        ctx,
        request::Payload {
            target_id,
            body: body.map(|Json(body)| body).unwrap_or_default(),
        },
    )
    .await
}
