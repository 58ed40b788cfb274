use backend::{
    config,
    contact::ContactService,
    db, mail,
    notify::Dispatcher,
    routes, AppState,
};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> config::Result<()> {
    // 1. Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load configuration
    let cfg = config::load()?;
    info!("Starting backend in {:?} mode", cfg.env);

    // 3. Connect the store and the mail relay
    let store = db::build_store(&cfg.database_url).await?;
    let mailer = mail::build_mailer(&cfg)?;
    if cfg.admin_token.is_none() {
        info!("ADMIN_TOKEN not set; admin listing will reject every request");
    }

    // 4. Build application state
    let contacts = ContactService::new(
        store,
        Dispatcher::new(mailer),
        cfg.admin_email.clone(),
        cfg.admin_token.clone(),
        cfg.brand_name.clone(),
    );
    let state = AppState::new(contacts);

    // 5. Build router
    let app = routes::router(state, &cfg.client_origins);

    // 6. Start HTTP server
    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.http_port));
    info!("Listening on http://{}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
