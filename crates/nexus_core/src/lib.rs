//! Core domain logic for Nexus CRM.
//! This crate is the single source of truth for session state and persistence.

pub mod assistant;
pub mod clock;
pub mod config;
pub mod controller;
pub mod db;
pub mod events;
pub mod logging;
pub mod model;
pub mod seed;
pub mod store;
pub mod view;

pub use assistant::{
    AssistantError, AssistantService, CrmSnapshot, DealAnalysis, GeminiTransport,
    GenerateRequest, GenerativeTransport,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AssistantConfig, ConfigError, CoreConfig};
pub use controller::{AppState, CrmController, CrmError, CrmResult, MutationKind, WriteStrategy};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use events::{Change, ChangeEvent, ChangeSubscriber};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::activity::{ActivityLogEntry, ActivityType, EntityType};
pub use model::contact::Contact;
pub use model::deal::{Deal, DealStage};
pub use model::notification::{Notification, NotificationKind};
pub use model::profile::{NotificationPreferences, UserProfile};
pub use model::task::Task;
pub use model::{RecordId, ValidationError};
pub use store::latency::{Delay, LatencyProfile, NoDelay, RecordingDelay, ThreadDelay};
pub use store::slots::{MemorySlotStorage, SlotError, SlotStorage, SqliteSlotStorage};
pub use store::{Slot, Store, StoreError, StoreResult};
pub use view::navigation::View;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
