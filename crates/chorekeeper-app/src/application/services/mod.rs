mod entitlement_service;
mod progress_service;

pub use entitlement_service::EntitlementService;
pub use progress_service::ProgressService;
