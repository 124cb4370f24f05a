use std::sync::Arc;

use crate::domain::ports::{HttpTransport, KeyValueStore, Navigator};
use crate::frameworks::config::ClientConfig;
use crate::interface_adapters::clients::ApiClient;
use crate::interface_adapters::services::{
    AuthService, DashboardService, NotificationService, PermohonanService, ReportService,
    SettingService, StaffService, SupplierService,
};
use crate::interface_adapters::storage::CookieJar;
use crate::interface_adapters::transport::ReqwestTransport;
use crate::use_cases::csrf::{CsrfTokenAcquirer, CsrfTokenReader};
use crate::use_cases::pipeline::{
    BearerTokenDecorator, CsrfHeaderDecorator, LoggingObserver, SessionExpiryObserver,
};

// Collaborators a context is assembled from.
pub struct ContextParts {
    pub transport: Arc<dyn HttpTransport>,
    pub token_store: Arc<dyn KeyValueStore>,
    pub cookie_store: Arc<dyn KeyValueStore>,
    pub navigator: Arc<dyn Navigator>,
}

/// Everything the embedding application talks to, wired once.
///
/// Services share one [`ApiClient`], one cookie store and one token store.
/// Build it with [`ClientContext::connect`] for a real network client or
/// [`ClientContext::assemble`] to bring your own transport.
pub struct ClientContext {
    pub config: ClientConfig,
    pub api: Arc<ApiClient>,
    pub csrf: Arc<CsrfTokenAcquirer>,
    pub auth: AuthService,
    pub permohonan: PermohonanService,
    pub staff: StaffService,
    pub supplier: SupplierService,
    pub notification: NotificationService,
    pub report: ReportService,
    pub setting: SettingService,
    pub dashboard: DashboardService,
}

impl ClientContext {
    pub fn connect(
        config: ClientConfig,
        token_store: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, reqwest::Error> {
        let jar = Arc::new(CookieJar::for_host(config.api_host()));
        let transport = Arc::new(ReqwestTransport::new(jar.clone())?);

        Ok(Self::assemble(
            config,
            ContextParts {
                transport,
                token_store,
                cookie_store: jar,
                navigator,
            },
        ))
    }

    pub fn assemble(config: ClientConfig, parts: ContextParts) -> Self {
        let reader = Arc::new(CsrfTokenReader::new(parts.cookie_store, config.mode));
        let csrf = Arc::new(CsrfTokenAcquirer::new(
            reader.clone(),
            parts.transport.clone(),
            config.origin(),
            config.csrf_timeout,
        ));

        // Bearer first, then CSRF; logging before the 401 handler.
        let api = Arc::new(
            ApiClient::builder(config.api_base_url(), parts.transport)
                .decorator(Arc::new(BearerTokenDecorator::new(parts.token_store.clone())))
                .decorator(Arc::new(CsrfHeaderDecorator::new(reader)))
                .observer(Arc::new(LoggingObserver))
                .observer(Arc::new(SessionExpiryObserver::new(
                    parts.token_store.clone(),
                    parts.navigator,
                )))
                .build(),
        );

        Self {
            auth: AuthService::new(api.clone(), csrf.clone(), parts.token_store),
            permohonan: PermohonanService::new(api.clone(), csrf.clone()),
            staff: StaffService::new(api.clone()),
            supplier: SupplierService::new(api.clone()),
            notification: NotificationService::new(api.clone()),
            report: ReportService::new(api.clone()),
            setting: SettingService::new(api.clone()),
            dashboard: DashboardService::new(api.clone()),
            config,
            api,
            csrf,
        }
    }
}
