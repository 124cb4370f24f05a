// REST wrappers, one per backend resource. Each call forwards to the shared
// `ApiClient`; none of them interpret the payloads.

pub mod auth;
pub mod dashboard;
pub mod notification;
pub mod permohonan;
pub mod report;
pub mod setting;
pub mod staff;
pub mod supplier;

pub use auth::{AuthService, Credentials};
pub use dashboard::DashboardService;
pub use notification::NotificationService;
pub use permohonan::PermohonanService;
pub use report::ReportService;
pub use setting::SettingService;
pub use staff::StaffService;
pub use supplier::SupplierService;

// Default page size for the "latest" listings.
pub const DEFAULT_LATEST_LIMIT: u32 = 5;
