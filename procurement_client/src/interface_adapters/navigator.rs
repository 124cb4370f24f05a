use std::sync::Mutex;
use tracing::info;

use crate::domain::ports::Navigator;

// Keeps the current route of the embedding application.
pub struct RouteHistory {
    routes: Mutex<Vec<String>>,
}

impl RouteHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            routes: Mutex::new(vec![initial.into()]),
        }
    }

    pub fn current(&self) -> Option<String> {
        self.routes.lock().ok()?.last().cloned()
    }

    pub fn history(&self) -> Vec<String> {
        self.routes
            .lock()
            .map(|routes| routes.clone())
            .unwrap_or_default()
    }
}

impl Navigator for RouteHistory {
    fn navigate(&self, route: &str) {
        info!(route, "navigating");
        if let Ok(mut routes) = self.routes.lock() {
            routes.push(route.to_string());
        }
    }
}
