use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::domain::ports::{KeyValueStore, Prompt};
use crate::frameworks::config::ClientConfig;
use crate::frameworks::context::ClientContext;
use crate::frameworks::debug::{MOUNT_CHECK_DELAY, watch_startup};
use crate::interface_adapters::navigator::RouteHistory;
use crate::interface_adapters::prompt::ConsolePrompt;
use crate::interface_adapters::storage::FileStore;
use crate::use_cases::csrf::CsrfTokenAcquirer;
use crate::use_cases::normalize_error::{HandleOptions, handle_api_error};

// Grace period before the first priming call.
pub const INITIAL_PRIMING_DELAY: Duration = Duration::from_millis(100);

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run() {
    // Local `.env` is optional.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return;
        }
    };
    info!(
        api = %config.api_base_url(),
        mode = ?config.mode,
        storage = %config.storage_path.display(),
        "starting procurement client"
    );

    let token_store: Arc<dyn KeyValueStore> = match FileStore::open(&config.storage_path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!(error = %e, "failed to open session store");
            return;
        }
    };
    let navigator = Arc::new(RouteHistory::new("/"));

    let context = match ClientContext::connect(config, token_store, navigator.clone()) {
        Ok(context) => context,
        Err(e) => {
            error!(error = %e, "failed to build http client");
            return;
        }
    };

    let outcome = watch_startup(start(&context, &ConsolePrompt), MOUNT_CHECK_DELAY).await;
    if outcome.stalled {
        warn!("startup finished late");
    }
    info!(route = ?navigator.current(), "procurement client ready");
}

/// Startup sequence: delayed CSRF priming, then session verification.
///
/// Returns whether a logged-in session was confirmed.
pub async fn start(context: &ClientContext, prompt: &dyn Prompt) -> bool {
    let priming = spawn_initial_priming(context.csrf.clone(), INITIAL_PRIMING_DELAY);
    if let Err(e) = priming.await {
        error!(error = %e, "csrf priming task failed");
    }
    verify_session(context, prompt).await
}

pub fn spawn_initial_priming(csrf: Arc<CsrfTokenAcquirer>, delay: Duration) -> JoinHandle<bool> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        prime_initial_csrf(&csrf).await
    })
}

// Tries the primary priming endpoint, then the fallback one once.
pub async fn prime_initial_csrf(csrf: &CsrfTokenAcquirer) -> bool {
    info!("initializing csrf protection");
    if csrf.ensure_token().await {
        info!("csrf protection initialized");
        return true;
    }

    warn!("csrf initialization failed, trying fallback endpoint");
    if csrf.prime_fallback().await {
        info!("fallback csrf cookie retrieved");
        return true;
    }

    error!("all csrf initialization attempts failed");
    false
}

// A stored token is checked against `/user`; a 401 clears it through the
// response pipeline.
pub async fn verify_session(context: &ClientContext, prompt: &dyn Prompt) -> bool {
    if !context.auth.is_logged_in() {
        info!("no stored session");
        return false;
    }

    match context.auth.get_user().await {
        Ok(_) => {
            info!("stored session is valid");
            true
        }
        Err(err) if err.is_unauthorized() => {
            info!("stored session expired");
            false
        }
        Err(err) => {
            handle_api_error(err, HandleOptions::default(), prompt);
            false
        }
    }
}
