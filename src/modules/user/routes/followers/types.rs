pub mod request {
    use crate::utils::pagination::Pagination;

    pub struct Payload {
        pub id: String,
        pub viewer_id: Option<String>,
        pub pagination: Pagination,
    }
}

pub mod response {
    use crate::{modules::user::service::profile::ProfileSummary, utils::pagination::Paginated};
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    pub enum Success {
        Followers(Paginated<ProfileSummary>),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Followers(page) => (StatusCode::OK, Json(json!(page))).into_response(),
            }
        }
    }

    pub enum Error {
        UserNotFound,
        FailedToFetchFollowers,
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
                Self::FailedToFetchFollowers => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "code": "RESOLUTION_FAILED",
                        "error": "Failed to fetch followers"
                    })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
