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
    use crate::modules::user::service::graph::{GraphError, Side};
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    pub enum Success {
        Followed,
        AlreadyFollowing,
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Followed => (
                    StatusCode::OK,
                    Json(json!({ "success": true, "message": "Started following user" })),
                )
                    .into_response(),
                Self::AlreadyFollowing => (
                    StatusCode::OK,
                    Json(json!({ "success": true, "message": "Already following user" })),
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
            match self {
                Self::MissingActorId => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "success": false,
                        "code": "MISSING_ACTOR_ID",
                        "error": "actorId is required"
                    })),
                )
                    .into_response(),
                Self::Graph(err @ GraphError::SelfFollow) => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "success": false,
                        "code": err.code(),
                        "error": "You cannot follow yourself"
                    })),
                )
                    .into_response(),
                Self::Graph(err @ GraphError::UserNotFound(side)) => {
                    let message = match side {
                        Side::Actor => "Follower not found",
                        Side::Target => "User to follow not found",
                    };
                    (
                        StatusCode::NOT_FOUND,
                        Json(json!({
                            "success": false,
                            "code": err.code(),
                            "side": side.to_string(),
                            "error": message
                        })),
                    )
                        .into_response()
                }
                Self::Graph(err) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "code": err.code(),
                        "retryable": err.is_retryable(),
                        "error": "Failed to follow user"
                    })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
