pub mod app_config;
pub mod catalog;
pub mod config;
pub mod reimbursements;
pub mod route;
pub mod schedule;
pub mod store;
pub mod weekday;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use catalog::{
    load_catalog, parse_catalog, CatalogFile, ManagerConfig, StoreConfig, SupervisorConfig,
    VisitPlanConfig,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use reimbursements::{
    Category, NewReimbursement, Reimbursement, ReimbursementSummary, DEFAULT_HISTORY_LIMIT,
};
pub use route::{group_by_day, DailyRoute, MapPin, RouteStop};
pub use schedule::{compute_change_set, ChangeSet, ScheduleChange, WeeklySchedule};
pub use store::{validate_tier, Coordinates, Store};
pub use weekday::Weekday;

/// Caller-correctable validation failures raised by the domain types.
///
/// Every variant names the offending value and the constraint it broke so the
/// input can be fixed without guessing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid amount {amount}: amount must be a positive integer in the smallest currency unit")]
    InvalidAmount { amount: i64 },
    #[error("invalid category '{value}': expected one of TRANSPORT, FOOD, MATERIALS, OTHER")]
    InvalidCategory { value: String },
    #[error("invalid weekday '{value}': expected MONDAY through SATURDAY")]
    InvalidWeekday { value: String },
    #[error("invalid tier {tier}: tier must be between 1 and 5")]
    InvalidTier { tier: i16 },
}

impl CoreError {
    /// Name of the input field the error refers to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            CoreError::InvalidAmount { .. } => "amount",
            CoreError::InvalidCategory { .. } => "category",
            CoreError::InvalidWeekday { .. } => "weekday",
            CoreError::InvalidTier { .. } => "tier",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog file: {0}")]
    CatalogFileParse(#[from] serde_yaml::Error),
    #[error("catalog validation failed: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_error_names_the_field() {
        assert_eq!(CoreError::InvalidAmount { amount: 0 }.field(), "amount");
        assert_eq!(
            CoreError::InvalidCategory {
                value: "UNKNOWN".to_string()
            }
            .field(),
            "category"
        );
    }

    #[test]
    fn invalid_category_message_lists_accepted_values() {
        let err = CoreError::InvalidCategory {
            value: "UNKNOWN".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("'UNKNOWN'"));
        assert!(message.contains("TRANSPORT, FOOD, MATERIALS, OTHER"));
    }
}
