use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, Layer};

use gramboard::config::Config;
use gramboard::{routes, AppState};

#[tokio::main]
async fn main() {
    // ".env" is optional, env vars all have defaults
    let _ = dotenv::dotenv();

    // Initialize logging
    let file_appender = tracing_appender::rolling::daily("./log", "log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing::subscriber::set_global_default(
        tracing_subscriber::registry()
            .with(
                fmt::Layer::default()
                    .with_ansi(false)
                    .with_timer(fmt::time::UtcTime::rfc_3339())
                    .with_writer(file_writer)
                    .with_filter(LevelFilter::INFO),
            )
            .with(
                fmt::Layer::default()
                    .with_ansi(true)
                    .with_timer(fmt::time::UtcTime::rfc_3339())
                    .with_writer(std::io::stdout)
                    .with_filter(LevelFilter::INFO),
            ),
    )
    .expect("Failed to set global log subscriber");

    let config = Config::load();
    let db = chatdb::DB::new(&config.db_file, config.db_max_conn).await;
    let state = AppState::new(db);

    let app = routes::router(state);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind listen address");
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.expect("Could not register ctrl+c handler");
    info!("Shutting down");
}
