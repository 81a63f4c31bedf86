pub mod request {
    use serde::Deserialize;

    #[derive(Deserialize, Default)]
    pub struct Body {
        #[serde(rename = "actorId", alias = "userId")]
        pub actor_id: Option<String>,
    }

    pub struct Payload {
        pub target_id: String,
        pub body: Body,
    }
}

pub mod response {
    use crate::modules::user::service::graph::GraphError;
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    pub enum Success {
        Unfollowed,
        NotFollowing,
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Unfollowed => (
                    StatusCode::OK,
                    Json(json!({ "success": true, "message": "Unfollowed user successfully" })),
                )
                    .into_response(),
                Self::NotFollowing => (
                    StatusCode::OK,
                    Json(json!({ "success": true, "message": "Not following user" })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        MissingActorId,
        Graph(GraphError),
    }

    impl From<GraphError> for Error {
        fn from(err: GraphError) -> Self {
            Self::Graph(err)
        }
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            let (status, message) = match &self {
                Self::MissingActorId => (StatusCode::BAD_REQUEST, "actorId is required"),
                Self::Graph(GraphError::SelfFollow) => {
                    (StatusCode::BAD_REQUEST, "You cannot unfollow yourself")
                }
                Self::Graph(GraphError::UserNotFound(_)) => {
                    (StatusCode::NOT_FOUND, "User not found")
                }
                Self::Graph(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to unfollow user",
                ),
            };

            let mut body = json!({ "success": false, "error": message });
            match self {
                Self::MissingActorId => body["code"] = json!("MISSING_ACTOR_ID"),
                Self::Graph(err) => {
                    body["code"] = json!(err.code());
                    if let GraphError::UserNotFound(side) = &err {
                        body["side"] = json!(side.to_string());
                    }
                    if status == StatusCode::INTERNAL_SERVER_ERROR {
                        body["retryable"] = json!(err.is_retryable());
                    }
                }
            }

            (status, Json(body)).into_response()
        }
    }

    pub type Response = Result<Success, Error>;
}
