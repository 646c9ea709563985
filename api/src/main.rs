use api::routes::routes;
use api::state::AppState;
use axum::Router;
use db::repositories::SqlRepository;
use migration::Migrator;
use sea_orm_migration::MigratorTrait;
use services::mail_queue::mail_queue;
use services::mail_worker::MailWorker;
use services::mailer::SmtpMailer;
use services::settings::SupportSettings;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_appender::rolling;
use util::config;

#[tokio::main]
async fn main() {
    // Load configuration and initialize logging
    let _log_guard = init_logging(&config::log_file(), &config::log_level());

    let db = db::connect().await.expect("Failed to connect to database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    // Notification mails are handed to a background worker
    let (queue, receiver) = mail_queue(config::mail_queue_capacity());
    match SmtpMailer::from_config() {
        Ok(mailer) => {
            MailWorker::new(
                receiver,
                Arc::new(SqlRepository::new(db.clone())),
                Arc::new(mailer),
            )
            .spawn();
        }
        Err(err) => {
            // The receiver is dropped here, so every push reports a closed queue.
            tracing::error!(error = %err, "SMTP transport unavailable, notification mails disabled");
        }
    }

    let app_state = AppState::new(db, Arc::new(queue), SupportSettings::from_config());

    let cors = CorsLayer::very_permissive();

    let app = Router::new()
        .nest("/api", routes(app_state))
        .layer(cors);

    let addr: SocketAddr = format!("{}:{}", config::host(), config::port())
        .parse()
        .expect("Invalid address");

    tracing::info!(
        "Starting {} on http://{}:{}",
        config::project_name(),
        config::host(),
        config::port()
    );

    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server crashed");
}

fn init_logging(log_file: &str, log_level: &str) -> tracing_appender::non_blocking::WorkerGuard {
    use std::fs;
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    fs::create_dir_all("logs").ok();

    let file_appender = rolling::daily("logs", log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(true)
        .with_thread_ids(true);

    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("api=info"));

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);

    if config::log_to_stdout() {
        registry.with(stdout_layer).init();
    } else {
        registry.init();
    }

    guard
}
