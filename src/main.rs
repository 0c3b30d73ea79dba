// src/main.rs

use std::{error::Error, sync::Arc, time::Duration};

use dotenvy::dotenv;
use petualangan_backend::{
    config::{Config, SeedTeacher},
    models::teacher::NewTeacher,
    routes,
    state::AppState,
    store::{DynStore, PgStore},
    utils::hash::hash_password,
};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load .env file (if present)
    dotenv().ok();

    let config = Config::from_env()?;

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Initialize Database Pool with Retry
    let mut retry_count = 0;
    let pool = loop {
        match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
        {
            Ok(pool) => break pool,
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    tracing::error!("Failed to connect to database after 5 retries: {}", e);
                    return Err(e.into());
                }
                tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", retry_count);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    };

    tracing::info!("Database connected...");

    tracing::info!("Running migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Migrations applied successfully.");

    let store: DynStore = Arc::new(PgStore::new(pool));

    if let Some(seed) = &config.seed_teacher {
        if let Err(e) = seed_teacher(&store, seed).await {
            tracing::error!("Failed to seed guru account: {:?}", e);
        }
    }

    let state = AppState::new(store, config.clone());
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Creates the bootstrap teacher account when its NIP is not taken yet.
async fn seed_teacher(store: &DynStore, seed: &SeedTeacher) -> Result<(), Box<dyn Error>> {
    if store.find_teacher_by_nip(&seed.nip).await?.is_some() {
        return Ok(());
    }

    if store.find_school(seed.school_id).await?.is_none() {
        tracing::warn!(
            "Skipping guru seed: sekolah {} does not exist yet",
            seed.school_id
        );
        return Ok(());
    }

    tracing::info!("Seeding guru account: {}", seed.nip);
    let password_hash = hash_password(&seed.password)?;
    store
        .create_teacher(NewTeacher {
            full_name: seed.name.clone(),
            nip: seed.nip.clone(),
            password_hash,
            school_id: seed.school_id,
        })
        .await?;
    tracing::info!("Guru account created successfully.");

    Ok(())
}
