//! CLI command implementations.

pub mod migrate;
pub mod seed;
pub mod user;

/// Error shared by every command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("repository error: {0}")]
    Repository(#[from] fleet_logistics_api::db::RepositoryError),

    #[error("state error: {0}")]
    State(#[from] fleet_logistics_dashboard::db::StateError),

    #[error("{0}")]
    Signup(#[from] fleet_logistics_dashboard::services::SignupError),
}

impl From<fleet_logistics_api::config::ConfigError> for CommandError {
    fn from(e: fleet_logistics_api::config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<fleet_logistics_dashboard::config::ConfigError> for CommandError {
    fn from(e: fleet_logistics_dashboard::config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}
