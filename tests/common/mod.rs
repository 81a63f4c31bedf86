use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use localbiz_backend_rs::{
    app::App,
    modules::user::repository::{memory::MemoryPartition, Partitions, UserDocument},
    types::{AppConfig, AppEnvironment, Context},
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const NATIVE: &str = "01HZY3M7Q8V2K5TFX9C4WJD6NB";

pub struct TestApp {
    pub primary: Arc<MemoryPartition>,
    pub legacy: Arc<MemoryPartition>,
    router: Router,
}

pub fn user(id: &str, name: &str) -> UserDocument {
    UserDocument {
        id: id.to_string(),
        name: Some(name.to_string()),
        followers: Some(vec![]),
        following: Some(vec![]),
        ..Default::default()
    }
}

impl TestApp {
    pub fn new(primary: Vec<UserDocument>, legacy: Vec<UserDocument>) -> Self {
        let primary = Arc::new(MemoryPartition::with_documents("users", primary));
        let legacy = Arc::new(MemoryPartition::with_documents("users_info", legacy));
        let partitions = Partitions::new()
            .with(primary.clone())
            .with(legacy.clone());

        let app = App::new(Context::new(
            AppConfig {
                host: "127.0.0.1".to_string(),
                environment: AppEnvironment::Development,
                port: 0,
                url: "http://127.0.0.1".to_string(),
            },
            partitions,
        ));

        Self {
            primary,
            legacy,
            router: app.router(),
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = match bytes.is_empty() {
            true => Value::Null,
            false => serde_json::from_slice(&bytes).unwrap(),
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }
}
