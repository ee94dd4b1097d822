use lending_library::{
    adapters::postgres::{PostgresBookRepository, PostgresLoanRepository, PostgresMemberRepository},
    api::{handlers::AppState, router::create_router},
    application::loan_service::ServiceDependencies,
    auth::AuthKeys,
    config::Config,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lending_library=debug,tower_http=debug,axum=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    // Initialize database connection pool
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    // Initialize adapters
    let service_deps = ServiceDependencies {
        book_repository: Arc::new(PostgresBookRepository::new(pool.clone())),
        member_repository: Arc::new(PostgresMemberRepository::new(pool.clone())),
        loan_repository: Arc::new(PostgresLoanRepository::new(pool.clone())),
    };

    let auth_keys = AuthKeys::new(&config.jwt_secret, config.token_expiry_minutes);

    // Create application state
    let app_state = Arc::new(AppState {
        service_deps,
        auth_keys,
    });

    // Create router
    let app = create_router(app_state);

    // Server configuration
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
