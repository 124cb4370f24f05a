use std::future::Future;
use std::time::Duration;
use tracing::{error, info};

// How long startup may take before the fallback report is written.
pub const MOUNT_CHECK_DELAY: Duration = Duration::from_secs(5);

pub struct StartupOutcome<T> {
    pub output: T,
    // Startup outlived the deadline and the fallback report was logged.
    pub stalled: bool,
}

/// Drives `startup` to completion, logging a diagnostic report if it is
/// still running once `deadline` passes.
///
/// The startup future is never cancelled; the report only tells the operator
/// where to look while it keeps going.
pub async fn watch_startup<F>(startup: F, deadline: Duration) -> StartupOutcome<F::Output>
where
    F: Future,
{
    tokio::pin!(startup);

    tokio::select! {
        output = &mut startup => {
            info!("startup completed");
            return StartupOutcome { output, stalled: false };
        }
        _ = tokio::time::sleep(deadline) => {}
    }

    error!(report = %fallback_report(deadline), "startup did not complete");
    let output = startup.await;
    info!("startup completed after fallback report");
    StartupOutcome {
        output,
        stalled: true,
    }
}

pub fn fallback_report(deadline: Duration) -> String {
    format!(
        "Application did not finish starting within {}s. Possible causes:\n\
         - an application error during startup (check the log above)\n\
         - the API server is not reachable\n\
         - CSRF protection issues (the csrf-cookie endpoint did not answer)",
        deadline.as_secs()
    )
}
