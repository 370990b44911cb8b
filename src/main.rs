use std::sync::Arc;

use writer_onboarding::api::{BackendApi, HttpBackend};
use writer_onboarding::config::ClientConfig;
use writer_onboarding::gate::{GateView, ProfileGuard};
use writer_onboarding::services::{ProfileService, ProfileState, SessionService, TokenStore};
use writer_onboarding::wizard::{WizardFields, resume_step};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ClientConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        eprintln!("  export ONBOARDING_API_BASE_URL=https://api.example.com/api");
        std::process::exit(1);
    });

    eprintln!("✍️  Writer Onboarding v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: {}", config.api_base_url);
    eprintln!("   Session file: {}\n", config.token_path.display());

    run(config).await?;
    Ok(())
}

async fn run(config: ClientConfig) -> writer_onboarding::error::Result<()> {
    let backend = Arc::new(HttpBackend::new(config.clone())?);
    let api: Arc<dyn BackendApi> = backend.clone();

    // ── Session ──────────────────────────────────────────────────────────
    let store = TokenStore::new(config.token_path.clone());
    let session = SessionService::new(Arc::clone(&api), store);
    let Some(token) = session.restore().await? else {
        eprintln!("No stored session. Sign in with the web client first.");
        return Ok(());
    };
    backend.set_token(Some(token));

    let user = match session.refresh().await {
        Ok(user) => user,
        Err(e) => {
            eprintln!("Session check failed: {}", e.user_message());
            return Ok(());
        }
    };
    eprintln!(
        "Signed in as {} {} <{}> ({}, application {:?})",
        user.first_name, user.last_name, user.email, user.role, user.application_status
    );

    // ── Profile + gate ───────────────────────────────────────────────────
    let profiles = ProfileService::new(Arc::clone(&api));
    let guard = ProfileGuard::new(Arc::clone(&profiles), user.role);
    guard.load().await;

    match guard.view() {
        GateView::Content => eprintln!("Gate: open"),
        GateView::CallToAction { missing_fields } => {
            eprintln!("Gate: blocked, profile incomplete");
            for field in &missing_fields {
                eprintln!("   missing: {}", field);
            }
            if let ProfileState::Ready(profile) = profiles.current() {
                let step = resume_step(&WizardFields::from_profile(&profile));
                eprintln!("   wizard would resume at step {} ({})", step.number(), step);
            }
        }
        GateView::Error(message) => eprintln!("Gate: error: {}", message),
        GateView::Spinner => eprintln!("Gate: still loading"),
    }

    Ok(())
}
