pub mod app_config;
pub mod config;
pub mod records;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env, DEFAULT_DB_NAME};
pub use records::{
    Article, DirtyData, ImpactAssessment, PredictedImpact, RawPost, Review, ReviewSource,
    Sentiment, SentimentLabel, SourceInfo, SourceType, NATIONWIDE,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
