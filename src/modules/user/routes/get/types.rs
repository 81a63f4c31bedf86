pub mod request {
    pub struct Payload {
        pub id: String,
        pub viewer_id: Option<String>,
    }
}

pub mod response {
    use crate::modules::user::service::profile::ProfileView;
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    pub enum Success {
        Profile(ProfileView),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Profile(profile) => (StatusCode::OK, Json(json!(profile))).into_response(),
            }
        }
    }

    pub enum Error {
        UserNotFound,
        FailedToResolveUser,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::UserNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({
                        "success": false,
                        "code": "USER_NOT_FOUND",
                        "error": "User not found"
                    })),
                )
                    .into_response(),
                Self::FailedToResolveUser => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "code": "RESOLUTION_FAILED",
                        "error": "Failed to fetch user"
                    })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
