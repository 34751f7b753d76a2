//! HTTP adapters - REST API implementations.

pub mod health;
pub mod middleware;
pub mod notification;
pub mod router;

pub use health::HealthState;
pub use notification::{notification_routes, NotificationAppState};
pub use router::{build_router, AppState};
