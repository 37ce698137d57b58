use thiserror::Error;

use baloto_db::error::SpecError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    #[error("invalid game spec: {0}")]
    InvalidGameSpec(#[from] SpecError),

    #[error("invalid value for {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}
