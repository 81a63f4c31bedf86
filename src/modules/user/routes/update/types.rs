pub mod request {
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Deserialize, Validate)]
    pub struct Body {
        #[validate(length(
            min = 1,
            max = 80,
            code = "INVALID_NAME",
            message = "Name must be between 1 and 80 characters"
        ))]
        pub name: Option<String>,
        #[validate(length(max = 500, code = "INVALID_BIO", message = "Bio is too long"))]
        pub bio: Option<String>,
        #[validate(length(
            max = 120,
            code = "INVALID_LOCATION",
            message = "Location is too long"
        ))]
        pub location: Option<String>,
        #[validate(url(code = "INVALID_AVATAR", message = "Avatar must be a valid URL"))]
        pub avatar: Option<String>,
    }

    fn trim(value: Option<String>) -> Option<String> {
        value.map(|value| value.trim().to_string())
    }

    impl Body {
        /// Surrounding whitespace never counts towards a field's length.
        pub fn trimmed(self) -> Self {
            Self {
                name: trim(self.name),
                bio: trim(self.bio),
                location: trim(self.location),
                avatar: trim(self.avatar),
            }
        }
    }

    pub struct Payload {
        pub id: String,
        pub body: Body,
    }
}

pub mod response {
    use crate::utils;
    use axum::{
        extract::{rejection::JsonRejection, Json},
        http::StatusCode,
        response::IntoResponse,
    };
    use serde_json::json;
    use validator::ValidationErrors;

    pub enum Success {
        ProfileUpdated,
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::ProfileUpdated => (
                    StatusCode::OK,
                    Json(json!({ "success": true, "message": "Profile updated successfully" })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        InvalidBody(JsonRejection),
        FailedToValidate(ValidationErrors),
        UserNotFound,
        FailedToResolveUser,
        FailedToUpdateProfile,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::InvalidBody(rejection) => (
                    rejection.status(),
                    Json(json!({
                        "success": false,
                        "code": "INVALID_PAYLOAD",
                        "error": rejection.body_text()
                    })),
                )
                    .into_response(),
                Self::FailedToValidate(errors) => {
                    utils::validation::into_response(errors).into_response()
                }
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
                Self::FailedToUpdateProfile => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "code": "UPDATE_FAILED",
                        "retryable": true,
                        "error": "Failed to update profile"
                    })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
