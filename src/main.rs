//! Car service server: reads settings, connects the store, serves the API.

use car_service::{
    app, ensure_database_exists, ensure_schema, AppState, CarRepository, InMemoryCarRepository,
    PgCarRepository, Settings,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("car_service=info".parse()?))
        .init();

    let settings = Settings::from_env()?;
    let repository: Arc<dyn CarRepository> = match &settings.database_url {
        Some(database_url) => {
            ensure_database_exists(database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(settings.max_connections)
                .connect(database_url)
                .await?;
            ensure_schema(&pool).await?;
            tracing::info!("connected to database");
            Arc::new(PgCarRepository::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; cars are kept in memory");
            Arc::new(InMemoryCarRepository::new())
        }
    };

    let state = AppState::new(repository, &settings.app_name);
    let router = app(state, &settings);

    let listener = TcpListener::bind(settings.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
