use localbiz_backend_rs::{
    app::App,
    types::{database, ToContext},
    utils::config,
};
use tracing_subscriber::prelude::*;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = config::get_config().map_err(|err| {
        tracing::error!("Invalid configuration: {}", err);
        err
    })?;

    let db_conn = database::connect(&config.database).await?;
    database::migrate(&db_conn).await?;

    let ctx = config.to_context(&db_conn);
    let served = App::new(ctx).serve().await;

    db_conn.close().await;

    Ok(served?)
}
