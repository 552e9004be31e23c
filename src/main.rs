use anyhow::Context;
use defensoria::{app, config::settings::Settings, modules::session::store::SessionStore, AppState};
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("defensoria=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let addr = settings.bind_address();

    if settings.default_api_key.is_none() {
        tracing::warn!("GROQ_API_KEY not set; requests must supply their own api_key");
    }

    let idle_window = settings.session_idle_window();
    let state = AppState::new(settings);

    if let Some(max_idle) = idle_window {
        tokio::spawn(sweep_idle_sessions(state.sessions.clone(), max_idle));
    }
    let router = app(state).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!(%addr, "defensoria listening");
    axum::serve(listener, router).await?;

    Ok(())
}

/// Periodically drops sessions with no activity inside `max_idle`.
async fn sweep_idle_sessions(sessions: SessionStore, max_idle: chrono::Duration) {
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
    loop {
        interval.tick().await;
        let removed = sessions.remove_idle_since(chrono::Utc::now() - max_idle).await;
        if removed > 0 {
            tracing::info!(removed, "idle sessions swept");
        }
    }
}
