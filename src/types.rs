pub use crate::utils::config::{AppConfig, AppEnvironment, Config};
pub use crate::utils::database;
use crate::modules::user::repository::{postgres::PgPartition, Partitions};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppContext {
    pub host: String,
    pub environment: AppEnvironment,
    pub port: u16,
    pub url: String,
}

impl From<AppConfig> for AppContext {
    fn from(config: AppConfig) -> Self {
        Self {
            host: config.host,
            environment: config.environment,
            port: config.port,
            url: config.url,
        }
    }
}

/// Everything a request handler may reach for. Built once by the entry point
/// and shared behind an `Arc`; there is no other process-wide state.
#[derive(Clone)]
pub struct Context {
    pub app: AppContext,
    pub partitions: Partitions,
}

impl Context {
    pub fn new(app: AppConfig, partitions: Partitions) -> Self {
        Self {
            app: app.into(),
            partitions,
        }
    }
}

pub trait ToContext {
    fn to_context(self, db_conn: &database::DatabaseConnection) -> Context;
}

impl ToContext for Config {
    fn to_context(self, db_conn: &database::DatabaseConnection) -> Context {
        let partitions = self
            .database
            .partitions
            .iter()
            .fold(Partitions::new(), |partitions, table| {
                partitions.with(Arc::new(PgPartition::new(
                    db_conn.pool.clone(),
                    table.clone(),
                )))
            });

        Context::new(self.app, partitions)
    }
}
