use super::{
    service::service,
    types::{request, response},
};
use crate::types::Context;
use axum::{
    extract::{rejection::JsonRejection, Json, Path, State},
    response::IntoResponse,
};
use std::sync::Arc;

pub async fn handler(
    State(ctx): State<Arc<Context>>,
    Path(id): Path<String>,
    body: Result<Json<request::Body>, JsonRejection>,
) -> impl IntoResponse {
    match body {
        Ok(Json(body)) => service(ctx, request::Payload { id, body }).await,
        Err(rejection) => {
            tracing::warn!("Rejected profile update body: {}", rejection.body_text());
            Err(response::Error::InvalidBody(rejection))
        }
    }
}
